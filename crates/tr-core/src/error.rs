//! Core error type.
//!
//! Sub-crates define their own error enums and convert `CoreError` into them
//! via `From` impls where a core failure can surface through their API.

use thiserror::Error;

/// Errors produced by `tr-core`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoreError {
    #[error("invalid coordinate ({lat}, {lon})")]
    InvalidCoordinate { lat: f64, lon: f64 },

    #[error("parse error: {0}")]
    Parse(String),
}

/// Shorthand result type for `tr-core`.
pub type CoreResult<T> = Result<T, CoreError>;
