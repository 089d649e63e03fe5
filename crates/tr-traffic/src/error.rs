//! Traffic-model error type.

use thiserror::Error;

/// Errors produced by `tr-traffic`.
///
/// Neither is retried internally; the caller decides whether to rebuild
/// from a fresh raw network.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TrafficError {
    #[error("invalid traffic configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid input network: {0}")]
    InvalidInput(String),
}

pub type TrafficResult<T> = Result<T, TrafficError>;
