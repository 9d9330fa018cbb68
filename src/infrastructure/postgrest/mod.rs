use crate::shared::error::{AppError, AppResult};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

mod assignments;
mod auth;
mod balances;
mod holidays;
pub mod rows;
mod workers;

const CLIENT_INFO: &str = "careshift";

/// Query string pairs for a Postgrest request.
pub type Query = Vec<(&'static str, String)>;

/// HTTP client for the Postgrest (`/rest/v1`) and GoTrue (`/auth/v1`) APIs.
///
/// Clones share the bearer token, so a sign-in through one clone authorizes
/// table reads through every other.
#[derive(Clone)]
pub struct PostgrestClient {
    http: Client,
    base_url: String,
    anon_key: String,
    token: Arc<RwLock<Option<String>>>,
}

impl PostgrestClient {
    pub fn new(base_url: &str, anon_key: &str, timeout: Duration) -> AppResult<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
            token: Arc::new(RwLock::new(None)),
        })
    }

    pub async fn set_token(&self, token: Option<String>) {
        *self.token.write().await = token;
    }

    async fn bearer(&self) -> String {
        self.token
            .read()
            .await
            .clone()
            .unwrap_or_else(|| self.anon_key.clone())
    }

    pub(crate) fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    pub(crate) fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Attach the headers every backend call carries.
    fn authorize(&self, request: RequestBuilder, bearer: &str) -> RequestBuilder {
        request
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", bearer))
            .header("X-Client-Info", CLIENT_INFO)
    }

    /// Read rows of `table` matching `query`.
    pub async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &Query,
    ) -> AppResult<Vec<T>> {
        let bearer = self.bearer().await;
        let request = self
            .authorize(self.http.get(self.rest_url(table)), &bearer)
            .header("Accept", "application/json")
            .query(query);

        let response = check(request.send().await?).await?;
        let rows = response.json::<Vec<T>>().await?;
        tracing::debug!("Fetched {} rows from {}", rows.len(), table);
        Ok(rows)
    }

    pub(crate) async fn auth_request(
        &self,
        request: RequestBuilder,
        bearer: Option<&str>,
    ) -> AppResult<Response> {
        let bearer = match bearer {
            Some(token) => token.to_string(),
            None => self.anon_key.clone(),
        };
        check(self.authorize(request, &bearer).send().await?).await
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }
}

/// Turn a non-2xx response into `AppError::Backend`.
async fn check(response: Response) -> AppResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let err = AppError::backend(status.as_u16(), &body);
    tracing::error!("Backend call to {} failed: {}", status, err);
    Err(err)
}
