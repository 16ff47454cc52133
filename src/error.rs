// SPDX-License-Identifier: PMPL-1.0-or-later
//! Error types for wcagbot

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid selector `{selector}`: {reason}")]
    Selector { selector: String, reason: String },

    #[error("Audit engine error: {0}")]
    Audit(String),

    #[error("Audit engine `{engine}` timed out after {secs}s")]
    Timeout { engine: String, secs: u64 },
}
