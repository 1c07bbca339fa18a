//! Payment reference data

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Payment instrument a tender is declared with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Cash,
    /// Card terminal
    Pos,
    /// Bank transfer to the venue account
    Transfer,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 3] = [Self::Cash, Self::Pos, Self::Transfer];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Pos => "pos",
            Self::Transfer => "transfer",
        }
    }

    /// Label shown in the method selector
    pub fn label(&self) -> &'static str {
        match self {
            Self::Cash => "Cash",
            Self::Pos => "POS",
            Self::Transfer => "Bank Transfer",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cash" => Ok(Self::Cash),
            "pos" => Ok(Self::Pos),
            "transfer" => Ok(Self::Transfer),
            other => Err(format!("unknown payment method: {}", other)),
        }
    }
}

/// Receiving account shown next to a transfer tender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BankAccount {
    pub account_name: &'static str,
    pub account_number: &'static str,
    pub bank: &'static str,
}

/// Venue account for bank transfers; static, never user-editable
pub const TRANSFER_ACCOUNT: BankAccount = BankAccount {
    account_name: "OLUWASEUN Aina-SCOTT MODUPEOLA",
    account_number: "611 162 7471",
    bank: "OPAY",
};
