use reqwest::{Client, Method, RequestBuilder, Response};

use std::time::Duration;

use crate::common::BackendError;
use crate::config::BackendConfig;
use crate::models::AccessToken;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP handle on the hosted service: relational API, auth and storage.
///
/// Every request carries the anon key as `apikey`. The bearer token is the
/// signed-in admin's access token when there is one, otherwise the anon key.
#[derive(Clone)]
pub struct Backend {
    http: Client,
    base_url: String,
    anon_key: String,
}

impl Backend {
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self::from_client(http, config))
    }

    pub fn from_client(http: Client, config: &BackendConfig) -> Self {
        Self {
            http,
            base_url: config.url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key.clone(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    pub fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub fn storage_url(&self, path: &str) -> String {
        format!("{}/storage/v1/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub(crate) fn request(
        &self,
        method: Method,
        url: &str,
        token: Option<&AccessToken>,
    ) -> RequestBuilder {
        let bearer = token.map(AccessToken::as_str).unwrap_or(&self.anon_key);

        self.http
            .request(method, url)
            .header("apikey", &self.anon_key)
            .bearer_auth(bearer)
    }
}

/// Passes successful responses through and turns the rest into `BackendError::Status`.
pub(crate) async fn check_status(response: Response) -> Result<Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(BackendError::Status {
        status: status.as_u16(),
        message: error_message(&body),
    })
}

/// Picks the human-readable part of the service's JSON error bodies.
pub(crate) fn error_message(body: &str) -> String {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();

    parsed
        .as_ref()
        .and_then(|v| {
            ["message", "msg", "error_description", "error"]
                .iter()
                .find_map(|key| v.get(*key).and_then(|m| m.as_str()))
        })
        .map(str::to_string)
        .unwrap_or_else(|| body.trim().to_string())
}
