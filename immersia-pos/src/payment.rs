//! Payment Splitter
//!
//! Covers an authoritative cart total with one or more tenders. The plan
//! starts fully paid in cash; `remaining` is derived from the tenders on
//! every read, and submission re-sums the tenders and demands an exact match.

use rust_decimal::Decimal;
use serde::Serialize;
use shared::models::{BankAccount, PaymentMethod, TRANSFER_ACCOUNT};

use crate::error::ValidationError;

/// One declared payment instrument and amount
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Tender {
    pub method: PaymentMethod,
    pub amount: Decimal,
}

impl Tender {
    pub fn new(method: PaymentMethod, amount: Decimal) -> Self {
        Self { method, amount }
    }

    /// Receiving account, shown only for transfers
    pub fn bank_details(&self) -> Option<&'static BankAccount> {
        (self.method == PaymentMethod::Transfer).then_some(&TRANSFER_ACCOUNT)
    }
}

/// A single-field change to one tender
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TenderEdit {
    Method(PaymentMethod),
    Amount(Decimal),
}

/// Validated plan handed to the next stage
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentPlan {
    pub total: Decimal,
    pub tenders: Vec<Tender>,
}

impl PaymentPlan {
    pub fn tendered(&self) -> Decimal {
        self.tenders.iter().map(|t| t.amount).sum()
    }

    pub fn uses(&self, method: PaymentMethod) -> bool {
        self.tenders.iter().any(|t| t.method == method)
    }
}

/// Editable split of a fixed total
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentSplitter {
    total: Decimal,
    tenders: Vec<Tender>,
}

impl PaymentSplitter {
    /// Start with a single cash tender for the whole total
    pub fn new(total: Decimal) -> Self {
        Self {
            total,
            tenders: vec![Tender::new(PaymentMethod::Cash, total)],
        }
    }

    pub fn total(&self) -> Decimal {
        self.total
    }

    pub fn tenders(&self) -> &[Tender] {
        &self.tenders
    }

    pub fn tendered(&self) -> Decimal {
        self.tenders.iter().map(|t| t.amount).sum()
    }

    /// `total - sum(amounts)`, recomputed on every call
    pub fn remaining(&self) -> Decimal {
        self.total - self.tendered()
    }

    pub fn can_add_tender(&self) -> bool {
        self.remaining() > Decimal::ZERO
    }

    /// Append an empty cash tender; a no-op once nothing remains
    pub fn add_tender(&mut self) -> bool {
        if !self.can_add_tender() {
            return false;
        }
        self.tenders.push(Tender::new(PaymentMethod::Cash, Decimal::ZERO));
        true
    }

    /// Largest amount tender `index` may hold without overshooting the total
    pub fn max_amount(&self, index: usize) -> Option<Decimal> {
        self.tenders
            .get(index)
            .map(|tender| self.remaining() + tender.amount)
    }

    /// Change one field of one tender
    ///
    /// Amount edits that would push the sum past the total are rejected and
    /// leave the plan unchanged.
    pub fn edit_tender(&mut self, index: usize, edit: TenderEdit) -> Result<(), ValidationError> {
        let max = self
            .max_amount(index)
            .ok_or(ValidationError::NoSuchTender(index))?;

        match edit {
            TenderEdit::Method(method) => {
                self.tenders[index].method = method;
            }
            TenderEdit::Amount(amount) => {
                if amount < Decimal::ZERO {
                    return Err(ValidationError::NegativeAmount);
                }
                if amount > max {
                    return Err(ValidationError::AmountExceedsRemaining { amount, max });
                }
                self.tenders[index].amount = amount;
            }
        }
        Ok(())
    }

    pub fn can_submit(&self) -> bool {
        self.remaining() == Decimal::ZERO
    }

    /// Validate the plan; exact equality, no tolerance
    pub fn submit(&self) -> Result<PaymentPlan, ValidationError> {
        let tendered = self.tendered();
        if tendered != self.total {
            return Err(ValidationError::PaymentMismatch {
                expected: self.total,
                tendered,
            });
        }
        Ok(PaymentPlan {
            total: self.total,
            tenders: self.tenders.clone(),
        })
    }
}
