pub mod accounts;
pub mod chats;
pub mod envelope;
pub mod goals;
pub mod payments;
pub mod points;
pub mod products;
pub mod promotions;
pub mod users;

use std::fmt;
use std::time::Duration;

use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;

pub use chats::CreateRoomRequest;
pub use envelope::Envelope;
pub use products::CreateProductRequest;
pub use promotions::{CreatePromotionRequest, PromotionAction};

/// Errors surfaced by the REST layer. Unauthorized is separated so the UI can
/// drop back to the login screen.
#[derive(Debug)]
pub enum ApiError {
    Http(reqwest::Error),
    Status(StatusCode),
    Unauthorized,
    /// Backend replied with `isSuccess: false`; carries its `message`.
    Backend(String),
    Decode(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Http(err) => write!(f, "network error: {err}"),
            ApiError::Status(code) => write!(f, "unexpected status {code}"),
            ApiError::Unauthorized => write!(f, "not authorized"),
            ApiError::Backend(msg) => write!(f, "{msg}"),
            ApiError::Decode(msg) => write!(f, "bad response: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Http(err)
    }
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}

/// Thin wrapper over `reqwest::Client` carrying the base URL and the bearer
/// token. Cheap to clone; one instance is shared by the UI and the chat task.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base: &str, token: Option<String>) -> Self {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            http,
            base: base.trim_end_matches('/').to_string(),
            token,
        }
    }

    /// Client without a session, for login/signup.
    pub fn anonymous(base: &str) -> Self {
        Self::new(base, None)
    }

    pub fn with_token(&self, token: String) -> Self {
        Self {
            http: self.http.clone(),
            base: self.base.clone(),
            token: Some(token),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => req.header("Authorization", format!("Bearer {token}")),
            None => req,
        }
    }

    async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ApiError> {
        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ApiError::Unauthorized);
        }
        if !status.is_success() {
            return Err(ApiError::Status(status));
        }
        resp.json::<T>()
            .await
            .map_err(|err| ApiError::Decode(err.to_string()))
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let resp = self.authorize(self.http.get(self.url(path))).send().await?;
        Self::decode(resp).await
    }

    pub(crate) async fn get_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let resp = self
            .authorize(self.http.get(self.url(path)).query(query))
            .send()
            .await?;
        Self::decode(resp).await
    }

    pub(crate) async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let resp = self
            .authorize(self.http.post(self.url(path)).json(body))
            .send()
            .await?;
        Self::decode(resp).await
    }

    pub(crate) async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let resp = self.authorize(self.http.post(self.url(path))).send().await?;
        Self::decode(resp).await
    }

    pub(crate) async fn patch_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let resp = self
            .authorize(self.http.patch(self.url(path)).json(body))
            .send()
            .await?;
        Self::decode(resp).await
    }

    pub(crate) async fn delete_query(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<(), ApiError> {
        let resp = self
            .authorize(self.http.delete(self.url(path)).query(query))
            .send()
            .await?;
        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ApiError::Unauthorized);
        }
        if !status.is_success() {
            return Err(ApiError::Status(status));
        }
        Ok(())
    }
}
