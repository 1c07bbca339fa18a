//! Input format checks shared by the customer and admin forms

use regex::Regex;
use std::sync::LazyLock;

type Pattern = LazyLock<Result<Regex, regex::Error>>;

static CUSTOMER_PHONE: Pattern = LazyLock::new(|| Regex::new(r"^\d{10,15}$"));
static ADMIN_FORM_PHONE: Pattern = LazyLock::new(|| Regex::new(r"^[0-9]{11}$"));
static EMAIL: Pattern = LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+"));

fn matches(pattern: &Pattern, input: &str) -> bool {
    match &**pattern {
        Ok(re) => re.is_match(input),
        Err(e) => {
            tracing::error!("Invalid validation pattern: {}", e);
            false
        }
    }
}

/// 10 to 15 digits, nothing else
pub fn is_valid_phone(phone: &str) -> bool {
    matches(&CUSTOMER_PHONE, phone)
}

/// Exactly 11 digits (admin user form)
pub fn is_valid_admin_phone(phone: &str) -> bool {
    matches(&ADMIN_FORM_PHONE, phone)
}

pub fn is_valid_email(email: &str) -> bool {
    matches(&EMAIL, email)
}
