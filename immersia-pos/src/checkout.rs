//! Checkout orchestration
//!
//! Cart Builder -> Payment Splitter -> paid order handed to the queue stage.

use serde::Serialize;
use shared::models::CatalogItem;

use crate::cart::{Cart, build_cart};
use crate::customer::CustomerContact;
use crate::error::ValidationError;
use crate::logging::AUDIT_TARGET;
use crate::payment::{PaymentPlan, PaymentSplitter, TenderEdit};

/// Order whose payment plan balanced, ready for queueing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaidOrder {
    pub cart: Cart,
    pub plan: PaymentPlan,
    pub contact: CustomerContact,
}

/// One checkout in progress
#[derive(Debug, Clone)]
pub struct Checkout {
    cart: Cart,
    splitter: PaymentSplitter,
}

impl Checkout {
    /// Build the cart and open a splitter seeded with the cart's own total
    pub fn begin<S: AsRef<str>>(
        catalog: &[CatalogItem],
        quantities: &[S],
    ) -> Result<Self, ValidationError> {
        let cart = build_cart(catalog, quantities)?;
        tracing::debug!(lines = cart.lines().len(), total = %cart.total(), "Checkout started");
        let splitter = PaymentSplitter::new(cart.total());
        Ok(Self { cart, splitter })
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn splitter(&self) -> &PaymentSplitter {
        &self.splitter
    }

    pub fn add_tender(&mut self) -> bool {
        self.splitter.add_tender()
    }

    pub fn edit_tender(&mut self, index: usize, edit: TenderEdit) -> Result<(), ValidationError> {
        self.splitter.edit_tender(index, edit)
    }

    /// Submit the plan; tender processing itself is delegated to the backend
    pub fn pay(self, contact: CustomerContact) -> Result<PaidOrder, ValidationError> {
        let plan = self.splitter.submit().inspect_err(|e| {
            tracing::warn!("Payment rejected: {}", e);
        })?;

        for tender in &plan.tenders {
            tracing::info!(
                target: AUDIT_TARGET,
                phone = %contact.phone,
                method = %tender.method,
                amount = %tender.amount,
                "Processing {} payment of ₦{}",
                tender.method,
                tender.amount
            );
        }

        Ok(PaidOrder {
            cart: self.cart,
            plan,
            contact,
        })
    }
}
