//! Workflow errors
//!
//! Every failure a screen can hit maps onto one of three categories:
//! network (generic message, logged), validation (specific message, fix the
//! input) and not-found (rendered as an explicit empty state).

use immersia_client::ClientError;
use rust_decimal::Decimal;
use shared::error::ErrorCategory;

/// Generic message shown for any network failure
pub const NETWORK_MESSAGE: &str = "Something went wrong while contacting the server. Please try again.";

/// Local input that fails a constraint
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("No games selected for checkout")]
    EmptyCart,

    #[error("Total payment must equal the cart total (expected {expected}, tendered {tendered})")]
    PaymentMismatch { expected: Decimal, tendered: Decimal },

    #[error("Amount {amount} exceeds the maximum of {max} for this payment")]
    AmountExceedsRemaining { amount: Decimal, max: Decimal },

    #[error("Amount cannot be negative")]
    NegativeAmount,

    #[error("No payment at position {0}")]
    NoSuchTender(usize),

    #[error("Please enter a valid phone number (10 to 15 digits)")]
    InvalidPhone,

    #[error("Please enter a valid 11-digit phone number")]
    InvalidAdminPhone,

    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("{0} is required")]
    Required(&'static str),

    #[error("Game {0} is not in the catalog")]
    UnknownGame(i64),
}

/// Workflow error
#[derive(Debug, thiserror::Error)]
pub enum PosError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Network error: {0}")]
    Network(#[source] ClientError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ClientError> for PosError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::NotFound(message) => PosError::NotFound(message),
            other => PosError::Network(other),
        }
    }
}

impl PosError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            PosError::Validation(_) => ErrorCategory::Validation,
            PosError::NotFound(_) => ErrorCategory::NotFound,
            PosError::Network(_) | PosError::Io(_) => ErrorCategory::Network,
        }
    }

    /// Text for the user: specific for validation, generic otherwise
    pub fn user_message(&self) -> String {
        match self {
            PosError::Validation(err) => err.to_string(),
            PosError::NotFound(_) => "Not found.".to_string(),
            PosError::Network(_) | PosError::Io(_) => NETWORK_MESSAGE.to_string(),
        }
    }
}

pub type PosResult<T> = Result<T, PosError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_mapping() {
        let err: PosError = ClientError::NotFound("user".into()).into();
        assert_eq!(err.category(), ErrorCategory::NotFound);

        let err: PosError = ClientError::Status {
            status: 500,
            message: "boom".into(),
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::Network);
        assert_eq!(err.user_message(), NETWORK_MESSAGE);

        let client = ClientError::from_status(400, r#"{"error": "bad id"}"#);
        assert_eq!(client.category(), ErrorCategory::Network);
        let err: PosError = client.into();
        assert_eq!(err.category(), ErrorCategory::Network);

        let err: PosError = ValidationError::EmptyCart.into();
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert_eq!(err.user_message(), "No games selected for checkout");
    }
}
