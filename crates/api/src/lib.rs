pub mod alert;
pub mod customer_log;
pub mod endpoints;
pub mod error;
pub mod integration;
pub mod retry;
pub mod user;

pub use endpoints::OpsgenieApi;

use std::path::Path;
use std::time::Duration;

use error::{ApiError, Result};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, Response, StatusCode};
use retry::{retry_with_backoff_when, RetryConfig};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error};
use url::Url;

pub const DEFAULT_API_URL: &str = "https://api.opsgenie.com";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the OpsGenie JSON API.
///
/// The API key is not sent as a header: it travels as the `apiKey` field of
/// the JSON body, or as a query parameter for GET and DELETE requests.
#[derive(Clone)]
pub struct OpsgenieClient {
    client: Client,
    base_url: Url,
    api_key: Option<String>,
    retry_config: RetryConfig,
}

impl OpsgenieClient {
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl AsRef<str>, timeout: Duration) -> Result<Self> {
        let url = Url::parse(base_url.as_ref()).map_err(ApiError::InvalidUrl)?;

        let client = Client::builder()
            .user_agent(format!("opsgenie-lamp/{}", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(ApiError::RequestFailed)?;

        Ok(Self {
            client,
            base_url: url,
            api_key: None,
            retry_config: RetryConfig::default(),
        })
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_retry_config(mut self, config: RetryConfig) -> Self {
        self.retry_config = config;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub async fn get<T, Q>(&self, path: &str, query: &Q) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let url = self.url_with_query(path, query)?;
        self.send(Method::GET, url, None, ApiError::is_retryable)
            .await
    }

    pub async fn delete<T, Q>(&self, path: &str, query: &Q) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let url = self.url_with_query(path, query)?;
        self.send(Method::DELETE, url, None, ApiError::is_retryable)
            .await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.join(path)?;
        let body = self.body_with_key(body)?;
        self.send(Method::POST, url, Some(body), ApiError::is_retryable)
            .await
    }

    /// POST for requests that must not take effect twice. They are only sent
    /// again when the server provably never handled them.
    pub async fn post_once<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.join(path)?;
        let body = self.body_with_key(body)?;
        self.send(Method::POST, url, Some(body), ApiError::is_safe_to_replay)
            .await
    }

    /// Uploads `file` as the `attachment` part, with every field of `fields`
    /// sent alongside as a text part. Like [`post_once`](Self::post_once), an
    /// upload is only repeated when it never reached the server.
    pub async fn post_multipart<T, B>(&self, path: &str, fields: &B, file: &Path) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.join(path)?;
        let mut params = form_params(serde_json::to_value(fields)?);
        if let Some(key) = &self.api_key {
            params.push(("apiKey".to_string(), key.clone()));
        }

        let bytes = std::fs::read(file).map_err(|source| ApiError::Attachment {
            path: file.to_path_buf(),
            source,
        })?;
        let file_name = file
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("attachment")
            .to_string();

        debug!(url = %url.path(), file = %file_name, size = bytes.len(), "Uploading attachment");

        retry_with_backoff_when(&self.retry_config, ApiError::is_safe_to_replay, || async {
            let mut form = Form::new();
            for (name, value) in &params {
                form = form.text(name.clone(), value.clone());
            }
            form = form.part(
                "attachment",
                Part::bytes(bytes.clone()).file_name(file_name.clone()),
            );

            let response = self
                .client
                .post(url.clone())
                .multipart(form)
                .send()
                .await
                .map_err(ApiError::RequestFailed)?;

            read_response(response, &url).await
        })
        .await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<Value>,
        should_retry: fn(&ApiError) -> bool,
    ) -> Result<T> {
        // The query string may carry the API key, so only the path is logged.
        debug!(method = %method, path = %url.path(), "Sending request");

        retry_with_backoff_when(&self.retry_config, should_retry, || async {
            let mut req = self.client.request(method.clone(), url.clone());
            if let Some(body) = &body {
                req = req.json(body);
            }

            let response = req.send().await.map_err(ApiError::RequestFailed)?;
            read_response(response, &url).await
        })
        .await
    }

    fn join(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path.strip_prefix('/').unwrap_or(path))
            .map_err(ApiError::InvalidUrl)
    }

    fn url_with_query<Q: Serialize + ?Sized>(&self, path: &str, query: &Q) -> Result<Url> {
        let mut url = self.join(path)?;
        let params = form_params(serde_json::to_value(query)?);
        {
            let mut pairs = url.query_pairs_mut();
            if let Some(key) = &self.api_key {
                pairs.append_pair("apiKey", key);
            }
            for (name, value) in &params {
                pairs.append_pair(name, value);
            }
        }
        Ok(url)
    }

    fn body_with_key<B: Serialize + ?Sized>(&self, body: &B) -> Result<Value> {
        let mut value = serde_json::to_value(body)?;
        if let (Some(key), Value::Object(map)) = (&self.api_key, &mut value) {
            map.insert("apiKey".to_string(), Value::String(key.clone()));
        }
        Ok(value)
    }
}

/// Flattens a serialized request into `name=value` pairs. Lists are
/// comma-joined, nested objects are sent as JSON text and nulls are dropped.
pub(crate) fn form_params(value: Value) -> Vec<(String, String)> {
    let Value::Object(map) = value else {
        return Vec::new();
    };

    map.into_iter()
        .filter_map(|(name, value)| {
            let text = match value {
                Value::Null => return None,
                Value::String(s) => s,
                Value::Array(items) => items
                    .iter()
                    .map(scalar_text)
                    .collect::<Vec<_>>()
                    .join(","),
                other @ Value::Object(_) => other.to_string(),
                other => scalar_text(&other),
            };
            Some((name, text))
        })
        .collect()
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

async fn read_response<T: DeserializeOwned>(response: Response, url: &Url) -> Result<T> {
    let status = response.status();

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::AuthenticationFailed {
                message: error_message(&body, "Invalid or expired API key"),
            })
        }
        StatusCode::NOT_FOUND => {
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::NotFound {
                message: error_message(&body, url.path()),
            })
        }
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::BadRequest {
                message: error_message(&body, "Bad request"),
            })
        }
        StatusCode::TOO_MANY_REQUESTS => {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            Err(ApiError::RateLimitExceeded { retry_after })
        }
        status if status.is_server_error() => {
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::ServerError {
                status: status.as_u16(),
                message: error_message(&body, "Server error"),
            })
        }
        status if status.is_success() => {
            let body = response.text().await.map_err(ApiError::RequestFailed)?;
            let body = if body.trim().is_empty() { "{}" } else { body.as_str() };
            serde_json::from_str(body).map_err(|e| {
                error!("Failed to parse JSON response: {}", e);
                ApiError::InvalidResponse(e.to_string())
            })
        }
        _ => {
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::ServerError {
                status: status.as_u16(),
                message: error_message(&body, &format!("Unexpected status: {status}")),
            })
        }
    }
}

/// Picks the service's own error text out of an error body when there is one.
fn error_message(body: &str, fallback: &str) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        for key in ["error", "message"] {
            if let Some(Value::String(message)) = map.get(key) {
                return message.clone();
            }
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}
