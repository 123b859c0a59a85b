//! Shared HTTP plumbing for collaborator services

use arkcutt_domain::HandlerError;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

/// Longest response body kept in error details
const MAX_BODY_DETAIL: usize = 2_000;

/// Failure talking to a collaborator service
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("{service} request failed: {message}")]
    Request {
        service: &'static str,
        message: String,
    },

    #[error("{service} timed out")]
    Timeout { service: &'static str },

    #[error("{service} returned HTTP {status}")]
    Status {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("{service} returned an unreadable response: {message}")]
    InvalidResponse {
        service: &'static str,
        message: String,
    },

    #[error("{service} reported failure: {message}")]
    Rejected {
        service: &'static str,
        message: String,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl ServiceError {
    pub(crate) fn from_reqwest(service: &'static str, error: reqwest::Error) -> Self {
        if error.is_timeout() {
            ServiceError::Timeout { service }
        } else {
            ServiceError::Request {
                service,
                message: error.to_string(),
            }
        }
    }

    /// Structured detail for the tool result envelope
    pub fn detail(&self) -> serde_json::Value {
        match self {
            ServiceError::Status {
                service,
                status,
                body,
            } => serde_json::json!({
                "service": service,
                "status": status,
                "body": body,
            }),
            ServiceError::Request { service, message }
            | ServiceError::InvalidResponse { service, message }
            | ServiceError::Rejected { service, message } => serde_json::json!({
                "service": service,
                "reason": message,
            }),
            ServiceError::Timeout { service } => serde_json::json!({
                "service": service,
                "reason": "timeout",
            }),
            ServiceError::InvalidInput(message) => serde_json::json!({ "reason": message }),
        }
    }
}

impl From<ServiceError> for HandlerError {
    fn from(error: ServiceError) -> Self {
        let detail = error.detail();
        HandlerError::new(error.to_string()).with_detail(detail)
    }
}

/// Build the client shared by all collaborator calls.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client, ServiceError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ServiceError::Request {
            service: "http",
            message: e.to_string(),
        })
}

/// Join a base URL and an endpoint path with exactly one slash.
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Read a response body, failing on non-2xx status or malformed JSON.
pub(crate) async fn read_json<T: DeserializeOwned>(
    service: &'static str,
    response: reqwest::Response,
) -> Result<T, ServiceError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| ServiceError::from_reqwest(service, e))?;

    if !status.is_success() {
        tracing::warn!(service, status = status.as_u16(), "Collaborator returned error status");
        return Err(ServiceError::Status {
            service,
            status: status.as_u16(),
            body: truncate(body),
        });
    }

    serde_json::from_str(&body).map_err(|e| ServiceError::InvalidResponse {
        service,
        message: e.to_string(),
    })
}

fn truncate(mut body: String) -> String {
    if body.len() > MAX_BODY_DETAIL {
        let mut cut = MAX_BODY_DETAIL;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
        body.push('…');
    }
    body
}
