//! Error types for the mentor core.

use std::time::Duration;
use thiserror::Error;

/// Errors raised while loading or validating the knowledge base. Startup only.
#[derive(Error, Debug)]
pub enum KnowledgeError {
    #[error("knowledge base read failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("knowledge base parse failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{category} key {key:?} is not in normalized form")]
    InvalidKey { category: &'static str, key: String },

    #[error("duplicate {category} key {key:?}")]
    DuplicateKey { category: &'static str, key: String },
}

/// Errors from a single model call. Never surfaced to HTTP callers.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("model request failed: {0}")]
    Request(String),

    #[error("model API error {0}: {1}")]
    Status(u16, String),

    #[error("model response parse failed: {0}")]
    Parse(String),

    #[error("model returned empty text")]
    Empty,

    #[error("model call timed out after {0:?}")]
    Timeout(Duration),
}
