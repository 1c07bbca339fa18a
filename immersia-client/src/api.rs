//! Typed API over the game-center backend
//!
//! One method per endpoint. Methods return the decoded body; mapping
//! failures onto view state is the caller's concern.

use serde_json::Value;
use shared::client::{LoginRequest, LoginResponse, MessageResponse, ResetPasswordRequest};
use shared::models::{
    CatalogItem, GameDurationUpdate, GameUpdate, Pc, ReportSummary, Ticket, TransactionRecord,
    User, UserCreate,
};
use shared::{Envelope, ResourceId, routes};

use crate::http::{HttpClient, NetworkHttpClient};
use crate::{ClientError, ClientResult};

/// MIME type of the spreadsheet returned by `report/export`
pub const EXPORT_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Typed API client, generic over the HTTP transport
#[derive(Debug, Clone)]
pub struct ApiClient<H: HttpClient = NetworkHttpClient> {
    http: H,
}

impl<H: HttpClient> ApiClient<H> {
    pub fn new(http: H) -> Self {
        Self { http }
    }

    /// Underlying HTTP client
    pub fn http(&self) -> &H {
        &self.http
    }

    /// Current admin token, if logged in
    pub fn token(&self) -> Option<String> {
        self.http.token()
    }

    /// Apply (or clear) the admin token for subsequent calls
    pub fn set_token(&self, token: Option<String>) {
        self.http.set_token(token);
    }

    // ========== Catalog API ==========

    /// Fetch the full catalog
    pub async fn list_games(&self) -> ClientResult<Vec<CatalogItem>> {
        let envelope: Envelope<Vec<CatalogItem>> = self.http.get(routes::GAMES).await?;
        envelope
            .into_data()
            .map_err(|reason| ClientError::InvalidResponse(format!("Unexpected response: {}", reason)))
    }

    /// Change only the duration of one game
    pub async fn update_game_duration(&self, id: i64, duration_minutes: u32) -> ClientResult<()> {
        let body = GameDurationUpdate { duration_minutes };
        let _: Value = self.http.put(&routes::game(id), &body).await?;
        Ok(())
    }

    /// Replace the editable fields of one game
    pub async fn update_game(&self, id: i64, update: &GameUpdate) -> ClientResult<()> {
        let _: Value = self.http.put(&routes::game(id), update).await?;
        Ok(())
    }

    // ========== User API ==========

    pub async fn create_user(&self, user: &UserCreate) -> ClientResult<User> {
        self.http.post(routes::USERS, user).await
    }

    /// Look a user up by id and phone; a missing user is `ClientError::NotFound`
    pub async fn find_user(&self, id: &ResourceId, phone: &str) -> ClientResult<User> {
        self.http
            .get_with_query(&routes::user(id), &[("phone", phone)])
            .await
    }

    // ========== Auth API ==========

    /// Login with username and password; the returned token is applied
    pub async fn login(&self, username: &str, password: &str) -> ClientResult<LoginResponse> {
        let req = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let login: LoginResponse = self.http.post(routes::LOGIN, &req).await?;
        if login.token.is_empty() {
            return Err(ClientError::InvalidResponse("Missing login token".into()));
        }
        self.http.set_token(Some(login.token.clone()));
        Ok(login)
    }

    pub async fn reset_password(
        &self,
        username: &str,
        new_password: &str,
    ) -> ClientResult<MessageResponse> {
        let req = ResetPasswordRequest {
            username: username.to_string(),
            new_password: new_password.to_string(),
        };
        self.http.post(routes::RESET_PASSWORD, &req).await
    }

    /// Create another admin account
    pub async fn create_admin(
        &self,
        username: &str,
        password: &str,
    ) -> ClientResult<MessageResponse> {
        let req = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        self.http.post(routes::CREATE_ADMIN, &req).await
    }

    /// Forget the admin token (the backend keeps no session)
    pub fn logout(&self) {
        self.http.set_token(None);
    }

    // ========== Ticket / PC API ==========

    pub async fn get_ticket(&self, id: &ResourceId) -> ClientResult<Ticket> {
        self.http.get(&routes::transaction(id)).await
    }

    /// Snapshot of the PC list
    pub async fn list_pcs(&self) -> ClientResult<Vec<Pc>> {
        self.http.get(routes::PCS).await
    }

    // ========== Report API ==========

    pub async fn report_summary(&self, start: &str, end: &str) -> ClientResult<ReportSummary> {
        self.http
            .get_with_query(routes::REPORT_SUMMARY, &date_range_query(start, end))
            .await
    }

    pub async fn transactions(
        &self,
        start: &str,
        end: &str,
    ) -> ClientResult<Vec<TransactionRecord>> {
        self.http
            .get_with_query(routes::TRANSACTIONS, &date_range_query(start, end))
            .await
    }

    /// Download the spreadsheet export as an opaque blob
    pub async fn export_report(&self, start: &str, end: &str) -> ClientResult<Vec<u8>> {
        self.http
            .get_bytes(routes::REPORT_EXPORT, &date_range_query(start, end))
            .await
    }
}

fn date_range_query<'a>(start: &'a str, end: &'a str) -> [(&'static str, &'a str); 2] {
    [("startDate", start), ("endDate", end)]
}
