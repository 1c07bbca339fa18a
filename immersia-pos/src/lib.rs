//! Immersia POS - front-desk workflow for the game center
//!
//! Catalog -> cart -> split payment -> PC queue, plus tickets, admin tools
//! and reports. Every screen is a thin view over [`immersia_client`]; this
//! crate holds the state and rules between the calls.

pub mod admin;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod customer;
pub mod error;
pub mod logging;
pub mod payment;
pub mod report;
pub mod status;
pub mod ticket;
mod validation;

pub use admin::{AdminSession, CatalogEditor, GameDraft, NewUserForm};
pub use cart::{Cart, CartLine, build_cart, parse_quantity};
pub use catalog::{Catalog, CatalogLoader, LoadState, load_catalog};
pub use checkout::{Checkout, PaidOrder};
pub use customer::CustomerContact;
pub use error::{PosError, PosResult, ValidationError};
pub use payment::{PaymentPlan, PaymentSplitter, Tender, TenderEdit};
pub use report::{DateRange, ExportedReport, ReportAggregator, ReportView, print_document};
pub use status::{StatusBoard, StatusDisplay, StatusFeedConsumer};
pub use ticket::{TicketView, load_ticket, render_ticket};
