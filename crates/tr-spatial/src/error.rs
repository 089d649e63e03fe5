//! Spatial-subsystem error type.

use thiserror::Error;

use tr_core::NodeId;

/// Errors produced by `tr-spatial`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SpatialError {
    /// The index has no nodes to snap to.
    #[error("no node found: network is empty")]
    NotFound,

    #[error("no path from {from} to {to}")]
    NoPath { from: NodeId, to: NodeId },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("search cancelled")]
    Cancelled,
}

pub type SpatialResult<T> = Result<T, SpatialError>;
