//! Outbound calls to the chat-completion and text-to-speech vendors.
//!
//! Both clients share one `reqwest::Client`. Calls are made once; a vendor
//! error status is surfaced as [`VendorError::Upstream`] so the handler can
//! relay it unchanged.

pub mod elevenlabs;
pub mod openai;

use axum::body::Bytes;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VendorError {
    #[error("{0} is not configured")]
    NotConfigured(&'static str),

    #[error("Vendor request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Vendor returned {status}")]
    Upstream {
        status: u16,
        content_type: Option<String>,
        body: Bytes,
    },

    #[error("Unexpected vendor response: {0}")]
    Decode(String),
}

/// Shared HTTP client for vendor calls
pub fn build_http_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .timeout(Duration::from_secs(120))
        .user_agent(concat!("caseway-api/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Turn a non-2xx vendor response into [`VendorError::Upstream`]
pub(crate) async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, VendorError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let content_type = resp
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = resp.bytes().await?;
    tracing::warn!(status = status.as_u16(), "Vendor returned an error status");
    Err(VendorError::Upstream {
        status: status.as_u16(),
        content_type,
        body,
    })
}
