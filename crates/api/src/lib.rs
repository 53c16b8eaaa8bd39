//! HTTP client for the automation bot's control API.
//!
//! This module provides a lightweight client for the handful of
//! endpoints the bot exposes. It focuses on:
//!
//! - Constructing an HTTP client with sensible defaults
//! - Validating `APPLYDECK_API_BASE` before any request is made
//! - Typed request/response methods for each endpoint
//! - Mapping error replies into messages fit for direct display
//!
//! The primary entry point is [`BotClient`]. Create an instance via
//! [`BotClient::new_from_env`] and call the endpoint methods directly.
//!
//! # Example
//!
//! ```ignore
//! use applydeck_api::BotClient;
//!
//! # async fn run() -> Result<(), applydeck_api::ApiError> {
//! let client = BotClient::new_from_env()?;
//! let status = client.status().await?;
//! println!("running: {}", status.running);
//! # Ok(())
//! # }
//! ```

use std::env;
use std::time::Duration;

use applydeck_types::{BotStatus, ControlReply, LogEntry};
use reqwest::{header, Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// Environment variable overriding the bot API base URL.
pub const API_BASE_ENV: &str = "APPLYDECK_API_BASE";

/// Base URL used when `APPLYDECK_API_BASE` is not set. The bot serves
/// its API on this address when run on the same machine.
pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:8000";

/// Error produced by [`BotClient`] calls.
///
/// The `Display` form of every variant is suitable for direct display
/// in a toast or status line.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never completed: connection refused, timeout, DNS.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    /// The server answered with a non-success status. `message` holds
    /// the server-provided detail when the body carried one.
    #[error("{message}")]
    Server { status: StatusCode, message: String },
    /// The configured base URL cannot be used.
    #[error("invalid API base URL '{base}': {reason}")]
    InvalidBase { base: String, reason: String },
}

/// Thin wrapper around a configured `reqwest::Client` for bot API access.
///
/// The client pre-configures default headers and builds requests against
/// a validated base URL. The bot API is unauthenticated; operators are
/// expected to keep it on a private interface.
#[derive(Debug, Clone)]
pub struct BotClient {
    base_url: String,
    http: Client,
    user_agent: String,
}

impl BotClient {
    /// Construct a [`BotClient`] from the environment.
    ///
    /// The base URL is taken from `APPLYDECK_API_BASE` (if set) or falls
    /// back to the local default.
    pub fn new_from_env() -> Result<Self, ApiError> {
        let base = env::var(API_BASE_ENV).unwrap_or_else(|_| DEFAULT_API_BASE.to_owned());
        Self::new(&base)
    }

    /// Construct a [`BotClient`] against an explicit base URL.
    pub fn new(base: &str) -> Result<Self, ApiError> {
        validate_base_url(base)?;

        let mut default_headers = header::HeaderMap::new();
        default_headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        let http = Client::builder()
            .default_headers(default_headers)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            base_url: base.trim_end_matches('/').to_owned(),
            http,
            user_agent: format!("applydeck-tui/0.1; {}", env::consts::OS),
        })
    }

    /// The validated base URL this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Current bot process status plus its captured output tail.
    pub async fn status(&self) -> Result<BotStatus, ApiError> {
        let response = self.request(Method::GET, "/api/status").send().await?;
        read_json(response).await
    }

    /// Ask the bot to start. Replies `already_running` when it is.
    pub async fn start(&self) -> Result<ControlReply, ApiError> {
        let response = self.request(Method::POST, "/api/start").send().await?;
        read_json(response).await
    }

    /// Ask the bot to stop. Replies `not_running` when nothing runs.
    pub async fn stop(&self) -> Result<ControlReply, ApiError> {
        let response = self.request(Method::POST, "/api/stop").send().await?;
        read_json(response).await
    }

    /// Fetch run records, newest last, capped at `limit` when given
    /// (the server applies its own default otherwise).
    ///
    /// Individual records that fail to decode are skipped rather than
    /// failing the whole fetch; the bot's log file is append-only and
    /// can carry half-written lines.
    pub async fn logs(&self, limit: Option<u32>) -> Result<Vec<LogEntry>, ApiError> {
        let path = match limit {
            Some(limit) => format!("/api/logs?limit={limit}"),
            None => "/api/logs".to_owned(),
        };
        let response = self.request(Method::GET, &path).send().await?;
        let raw: Vec<Value> = read_json(response).await?;
        let mut entries = Vec::with_capacity(raw.len());
        for record in raw {
            match serde_json::from_value::<LogEntry>(record) {
                Ok(entry) => entries.push(entry),
                Err(error) => debug!(%error, "skipping malformed log record"),
            }
        }
        Ok(entries)
    }

    /// Fetch the bot configuration as a JSON tree.
    pub async fn config(&self) -> Result<Value, ApiError> {
        let response = self.request(Method::GET, "/api/config").send().await?;
        read_json(response).await
    }

    /// Submit edited configuration text. The server parses the text;
    /// parse failures come back as an [`ApiError::Server`] carrying the
    /// server's own description of the problem.
    pub async fn save_config(&self, config_text: &str) -> Result<(), ApiError> {
        let body = serde_json::json!({ "config_yaml": config_text });
        let response = self
            .request(Method::POST, "/api/config")
            .json(&body)
            .send()
            .await?;
        let _: Value = read_json(response).await?;
        Ok(())
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "building request");

        self.http
            .request(method, url)
            .header(header::USER_AGENT, &self.user_agent)
    }
}

/// Validate that a base URL is acceptable for use by the client.
///
/// The bot is self-hosted, so any host is allowed; the URL must parse,
/// name a host, and use an HTTP scheme.
fn validate_base_url(base: &str) -> Result<(), ApiError> {
    let invalid = |reason: String| ApiError::InvalidBase {
        base: base.to_owned(),
        reason,
    };

    let parsed = Url::parse(base).map_err(|error| invalid(error.to_string()))?;
    if parsed.host_str().is_none() {
        return Err(invalid("missing host".to_owned()));
    }
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(invalid(format!("unsupported scheme '{other}'"))),
    }
}

async fn read_json<T>(response: Response) -> Result<T, ApiError>
where
    T: DeserializeOwned,
{
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ApiError::Server {
            status,
            message: extract_server_message(&body, status),
        });
    }
    Ok(response.json().await?)
}

/// Pull a human-readable message out of an error body. The server
/// varies its key by endpoint (`detail` from request validation,
/// `error` from config reads, `message` from control replies), so all
/// three are tried before falling back to the status line.
fn extract_server_message(body: &str, status: StatusCode) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        for key in ["detail", "message", "error"] {
            match value.get(key) {
                Some(Value::String(text)) if !text.is_empty() => return text.clone(),
                Some(Value::Null) | None => {}
                Some(other) => return other.to_string(),
            }
        }
    }
    format!("HTTP {status}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_prefers_detail_key() {
        let body = r#"{"detail":"Invalid YAML: mapping values are not allowed here"}"#;
        assert_eq!(
            extract_server_message(body, StatusCode::BAD_REQUEST),
            "Invalid YAML: mapping values are not allowed here"
        );
    }

    #[test]
    fn server_message_falls_through_known_keys() {
        assert_eq!(
            extract_server_message(r#"{"error":"config.yaml missing"}"#, StatusCode::INTERNAL_SERVER_ERROR),
            "config.yaml missing"
        );
        assert_eq!(
            extract_server_message(r#"{"message":"stopped"}"#, StatusCode::INTERNAL_SERVER_ERROR),
            "stopped"
        );
    }

    #[test]
    fn structured_detail_is_rendered_verbatim() {
        let body = r#"{"detail":[{"loc":["body","config_yaml"],"msg":"field required"}]}"#;
        let message = extract_server_message(body, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(message.contains("field required"));
    }

    #[test]
    fn unreadable_bodies_fall_back_to_the_status_line() {
        assert_eq!(
            extract_server_message("<html>boom</html>", StatusCode::BAD_GATEWAY),
            "HTTP 502 Bad Gateway"
        );
        assert_eq!(
            extract_server_message("", StatusCode::INTERNAL_SERVER_ERROR),
            "HTTP 500 Internal Server Error"
        );
    }

    #[test]
    fn base_url_must_name_a_host_and_http_scheme() {
        assert!(BotClient::new("http://127.0.0.1:8000").is_ok());
        assert!(BotClient::new("https://bot.example.com/").is_ok());
        assert!(matches!(
            BotClient::new("ftp://bot.example.com"),
            Err(ApiError::InvalidBase { .. })
        ));
        assert!(matches!(
            BotClient::new("127.0.0.1:8000"),
            Err(ApiError::InvalidBase { .. })
        ));
    }

    #[test]
    fn trailing_slash_is_normalized_away() {
        let client = BotClient::new("http://127.0.0.1:8000/").unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:8000");
    }
}
