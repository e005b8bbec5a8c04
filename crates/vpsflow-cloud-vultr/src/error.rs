//! Vultr provider error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VultrError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Vultr API error on {endpoint} (HTTP {status}): {body}")]
    Api {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("Unexpected response from {endpoint}: {reason}")]
    UnexpectedResponse { endpoint: String, reason: String },
}

pub type Result<T> = std::result::Result<T, VultrError>;
