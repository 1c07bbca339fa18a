//! Admin session, user form and catalog draft editor

use std::collections::HashMap;

use immersia_client::{ApiClient, CachedToken, HttpClient, TokenStore};
use rust_decimal::Decimal;
use shared::models::{CatalogItem, GameUpdate, User, UserCreate, UserRole};

use crate::catalog::{Catalog, load_catalog};
use crate::error::{PosError, PosResult, ValidationError};
use crate::logging::AUDIT_TARGET;
use crate::validation::is_valid_admin_phone;

// ========== Session ==========

/// Logged-in admin with a persisted token
#[derive(Debug)]
pub struct AdminSession<H: HttpClient> {
    api: ApiClient<H>,
    store: TokenStore,
    username: Option<String>,
}

impl<H: HttpClient> AdminSession<H> {
    pub fn new(api: ApiClient<H>, store: TokenStore) -> Self {
        Self {
            api,
            store,
            username: None,
        }
    }

    pub fn api(&self) -> &ApiClient<H> {
        &self.api
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.api.token().is_some()
    }

    /// Login and persist the token; returns the backend's message
    pub async fn login(&mut self, username: &str, password: &str) -> PosResult<String> {
        let username = username.trim();
        if username.is_empty() {
            return Err(ValidationError::Required("Username").into());
        }
        if password.is_empty() {
            return Err(ValidationError::Required("Password").into());
        }

        let response = self.api.login(username, password).await.map_err(|e| {
            tracing::warn!(username, "Login failed: {}", e);
            PosError::from(e)
        })?;

        // The session works without the cache; only a restart loses it
        if let Err(e) = self.store.save(&CachedToken::new(username, &response.token)) {
            tracing::warn!(path = %self.store.path().display(), "Failed to persist admin token: {}", e);
        }
        self.username = Some(username.to_string());
        tracing::info!(target: AUDIT_TARGET, username, action = "login", "Admin logged in");
        Ok(response.message)
    }

    /// Re-apply a cached token; returns whether one was found
    pub fn restore(&mut self) -> bool {
        match self.store.load() {
            Some(cached) => {
                self.api.set_token(Some(cached.token));
                tracing::debug!(username = %cached.username, "Admin session restored");
                self.username = Some(cached.username);
                true
            }
            None => false,
        }
    }

    pub fn logout(&mut self) -> PosResult<()> {
        self.api.logout();
        self.username = None;
        self.store.delete()?;
        tracing::info!(target: AUDIT_TARGET, action = "logout", "Admin logged out");
        Ok(())
    }

    pub async fn reset_password(&self, username: &str, new_password: &str) -> PosResult<String> {
        if username.trim().is_empty() {
            return Err(ValidationError::Required("Username").into());
        }
        if new_password.is_empty() {
            return Err(ValidationError::Required("New password").into());
        }
        let response = self
            .api
            .reset_password(username.trim(), new_password)
            .await
            .map_err(|e| {
                tracing::warn!(username, "Password reset failed: {}", e);
                PosError::from(e)
            })?;
        Ok(response.message)
    }

    pub async fn create_admin(&self, username: &str, password: &str) -> PosResult<String> {
        if username.trim().is_empty() {
            return Err(ValidationError::Required("Username").into());
        }
        let response = self
            .api
            .create_admin(username.trim(), password)
            .await
            .map_err(|e| {
                tracing::warn!(username, "Admin creation failed: {}", e);
                PosError::from(e)
            })?;
        Ok(response.message)
    }

    pub async fn create_user(&self, form: &NewUserForm) -> PosResult<User> {
        let body = form.validate()?;
        self.api.create_user(&body).await.map_err(|e| {
            tracing::error!("Error creating user: {}", e);
            PosError::from(e)
        })
    }
}

// ========== User form ==========

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewUserForm {
    pub email: String,
    pub phone: String,
    pub role: Option<UserRole>,
}

impl NewUserForm {
    pub const ROLES: [UserRole; 2] = [UserRole::Admin, UserRole::Customer];

    /// Phone must be exactly 11 digits; email is sent as entered
    pub fn validate(&self) -> Result<UserCreate, ValidationError> {
        let phone = self.phone.trim();
        if !is_valid_admin_phone(phone) {
            return Err(ValidationError::InvalidAdminPhone);
        }
        let email = self.email.trim();
        Ok(UserCreate {
            phone: phone.to_string(),
            email: (!email.is_empty()).then(|| email.to_string()),
            role: self.role,
        })
    }
}

// ========== Catalog editor ==========

/// Unsaved edits to one game
#[derive(Debug, Clone, PartialEq)]
pub struct GameDraft {
    pub title: String,
    pub url: Option<String>,
    pub price: Decimal,
    pub duration_minutes: u32,
}

impl From<&CatalogItem> for GameDraft {
    fn from(item: &CatalogItem) -> Self {
        Self {
            title: item.title.clone(),
            url: item.url.clone(),
            price: item.unit_price,
            duration_minutes: item.duration_minutes,
        }
    }
}

impl GameDraft {
    fn to_update(&self) -> GameUpdate {
        GameUpdate {
            title: self.title.clone(),
            url: self.url.clone(),
            price: self.price,
            duration_minutes: self.duration_minutes,
        }
    }
}

/// Confirmed catalog plus a draft overlay, committed per item on save
#[derive(Debug)]
pub struct CatalogEditor<H: HttpClient> {
    api: ApiClient<H>,
    catalog: Catalog,
    drafts: HashMap<i64, GameDraft>,
}

impl<H: HttpClient> CatalogEditor<H> {
    pub fn new(api: ApiClient<H>, catalog: Catalog) -> Self {
        Self {
            api,
            catalog,
            drafts: HashMap::new(),
        }
    }

    pub async fn load(api: ApiClient<H>) -> PosResult<Self> {
        let catalog = load_catalog(&api).await?;
        Ok(Self::new(api, catalog))
    }

    /// Confirmed items only
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn has_draft(&self, id: i64) -> bool {
        self.drafts.contains_key(&id)
    }

    fn draft_mut(&mut self, id: i64) -> Result<&mut GameDraft, ValidationError> {
        let item = self.catalog.get(id).ok_or(ValidationError::UnknownGame(id))?;
        let seed = GameDraft::from(item);
        Ok(self.drafts.entry(id).or_insert(seed))
    }

    pub fn edit_title(&mut self, id: i64, title: &str) -> Result<(), ValidationError> {
        self.draft_mut(id)?.title = title.to_string();
        Ok(())
    }

    /// Empty input clears the preview id
    pub fn edit_url(&mut self, id: i64, url: &str) -> Result<(), ValidationError> {
        let url = url.trim();
        self.draft_mut(id)?.url = (!url.is_empty()).then(|| url.to_string());
        Ok(())
    }

    pub fn edit_price(&mut self, id: i64, price: Decimal) -> Result<(), ValidationError> {
        if price < Decimal::ZERO {
            return Err(ValidationError::NegativeAmount);
        }
        self.draft_mut(id)?.price = price;
        Ok(())
    }

    pub fn edit_duration(&mut self, id: i64, minutes: u32) -> Result<(), ValidationError> {
        self.draft_mut(id)?.duration_minutes = minutes;
        Ok(())
    }

    /// Draft over confirmed, as the edit row shows it
    pub fn view(&self, id: i64) -> Option<CatalogItem> {
        let item = self.catalog.get(id)?;
        Some(match self.drafts.get(&id) {
            Some(draft) => item.with_update(&draft.to_update()),
            None => item.clone(),
        })
    }

    pub fn discard(&mut self, id: i64) {
        self.drafts.remove(&id);
    }

    /// Commit the draft; the confirmed item changes only if the backend accepts
    pub async fn save(&mut self, id: i64) -> PosResult<()> {
        let item = self.catalog.get(id).ok_or(ValidationError::UnknownGame(id))?;
        let Some(draft) = self.drafts.get(&id) else {
            tracing::debug!(id, "Nothing to save");
            return Ok(());
        };
        let update = draft.to_update();
        let updated = item.with_update(&update);

        self.api.update_game(id, &update).await.map_err(|e| {
            tracing::error!(id, "Error updating game: {}", e);
            PosError::from(e)
        })?;

        self.catalog.replace(updated);
        self.drafts.remove(&id);
        tracing::info!(id, "Game updated");
        Ok(())
    }

    /// Send only the duration
    pub async fn save_duration(&mut self, id: i64) -> PosResult<()> {
        let minutes = self
            .view(id)
            .map(|item| item.duration_minutes)
            .ok_or(ValidationError::UnknownGame(id))?;

        self.api.update_game_duration(id, minutes).await.map_err(|e| {
            tracing::error!(id, "Error updating game duration: {}", e);
            PosError::from(e)
        })?;

        if let Some(confirmed) = self.catalog.get(id) {
            let confirmed = CatalogItem {
                duration_minutes: minutes,
                ..confirmed.clone()
            };
            // A draft that only carried the duration is now fully committed
            if self.drafts.get(&id) == Some(&GameDraft::from(&confirmed)) {
                self.drafts.remove(&id);
            }
            self.catalog.replace(confirmed);
        }
        tracing::info!(id, minutes, "Game duration updated");
        Ok(())
    }
}
