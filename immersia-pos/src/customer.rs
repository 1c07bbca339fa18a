//! Customer capture
//!
//! Phone and optional email collected on the payment form, registered with
//! or looked up from the backend.

use immersia_client::{ApiClient, HttpClient};
use serde::Serialize;
use shared::ResourceId;
use shared::models::{User, UserCreate};

use crate::error::{PosResult, ValidationError};
use crate::validation::{is_valid_email, is_valid_phone};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerContact {
    pub phone: String,
    pub email: Option<String>,
}

impl CustomerContact {
    /// Validate raw form input; an empty email means none was given
    pub fn new(phone: &str, email: &str) -> Result<Self, ValidationError> {
        let phone = phone.trim();
        if !is_valid_phone(phone) {
            return Err(ValidationError::InvalidPhone);
        }

        let email = email.trim();
        let email = if email.is_empty() {
            None
        } else if is_valid_email(email) {
            Some(email.to_string())
        } else {
            return Err(ValidationError::InvalidEmail);
        };

        Ok(Self {
            phone: phone.to_string(),
            email,
        })
    }

    pub fn to_user_create(&self) -> UserCreate {
        UserCreate {
            phone: self.phone.clone(),
            email: self.email.clone(),
            role: None,
        }
    }

    /// Register this contact as a customer
    pub async fn register<H: HttpClient>(&self, api: &ApiClient<H>) -> PosResult<User> {
        match api.create_user(&self.to_user_create()).await {
            Ok(user) => {
                tracing::info!(phone = %self.phone, "Customer registered");
                Ok(user)
            }
            Err(e) => {
                tracing::error!(phone = %self.phone, "Error creating user: {}", e);
                Err(e.into())
            }
        }
    }

    /// Find the customer record; a missing user is `PosError::NotFound`
    pub async fn lookup<H: HttpClient>(
        &self,
        api: &ApiClient<H>,
        id: &ResourceId,
    ) -> PosResult<User> {
        api.find_user(id, &self.phone).await.map_err(|e| {
            tracing::warn!(%id, "Error fetching user: {}", e);
            e.into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_validation() {
        let contact = CustomerContact::new(" 08012345678 ", "").unwrap();
        assert_eq!(contact.phone, "08012345678");
        assert!(contact.email.is_none());

        let contact = CustomerContact::new("08012345678", "ada@example.com").unwrap();
        assert_eq!(contact.email.as_deref(), Some("ada@example.com"));

        assert_eq!(
            CustomerContact::new("123", ""),
            Err(ValidationError::InvalidPhone)
        );
        assert_eq!(
            CustomerContact::new("08012345678", "not-an-email"),
            Err(ValidationError::InvalidEmail)
        );
    }

    #[test]
    fn test_user_create_body() {
        let contact = CustomerContact::new("08012345678", "").unwrap();
        let body = serde_json::to_value(contact.to_user_create()).unwrap();
        assert_eq!(body, serde_json::json!({"phone": "08012345678"}));
    }
}
