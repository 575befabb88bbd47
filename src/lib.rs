//! Readon - open GitHub repositories on external reading sites.
//!
//! This library provides the configuration core behind the "read on"
//! browser extension and the `readon` CLI: the built-in site registry,
//! persistence of the synced configuration document, the configuration
//! manager, and the keyboard shortcut dispatch rule.

#[cfg(not(target_arch = "wasm32"))]
pub mod cli;
#[cfg(not(target_arch = "wasm32"))]
pub mod commands;
pub mod dispatch;
#[cfg(not(target_arch = "wasm32"))]
pub mod logging;
pub mod manager;
pub mod models;
pub mod registry;
pub mod repo;
pub mod shortcuts;
pub mod storage;
#[cfg(feature = "wasm")]
pub mod wasm;

pub use manager::ConfigManager;
pub use models::{Category, Chord, Configuration, Modifier, Settings, Site};


/// Library-level error type for Readon operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Shortcut {shortcut} is already used by: {}", .sites.join(", "))]
    Conflict { shortcut: String, sites: Vec<String> },

    #[error("Duplicate site id: {0}")]
    DuplicateId(String),

    #[error("Site not found: {0}")]
    NotFound(String),

    #[error("Built-in site cannot be deleted (disable it instead): {0}")]
    Immutable(String),

    #[error("Custom site limit reached ({0})")]
    LimitExceeded(usize),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Malformed configuration document: {0}")]
    MalformedDocument(String),
}

impl Error {
    /// Short machine-readable kind, used in JSON error output.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Io(_) | Error::Storage(_) => "storage",
            Error::Json(_) | Error::MalformedDocument(_) => "malformed_document",
            Error::Validation(_) => "validation",
            Error::Conflict { .. } | Error::DuplicateId(_) => "conflict",
            Error::NotFound(_) => "not_found",
            Error::Immutable(_) => "immutable",
            Error::LimitExceeded(_) => "limit_exceeded",
        }
    }
}

/// Result type alias for Readon operations.
pub type Result<T> = std::result::Result<T, Error>;
