//! Planner error type.

use thiserror::Error;

use tr_core::{CoreError, NodeId};
use tr_spatial::{SearchStrategy, SpatialError};
use tr_traffic::TrafficError;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PlanError {
    /// One segment of the request is unreachable.  The whole request fails;
    /// no partial route is returned.
    #[error("segment {segment} ({from} -> {to}) has no {strategy} path")]
    NoPath {
        segment:  usize,
        from:     NodeId,
        to:       NodeId,
        strategy: SearchStrategy,
    },

    #[error("no node found: network is empty")]
    NotFound,

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("route search cancelled")]
    Cancelled,

    #[error("traffic model error: {0}")]
    Traffic(#[from] TrafficError),
}

impl PlanError {
    /// Attach segment context to a search failure.
    pub(crate) fn in_segment(err: SpatialError, segment: usize, strategy: SearchStrategy) -> Self {
        match err {
            SpatialError::NoPath { from, to } => PlanError::NoPath { segment, from, to, strategy },
            other => Self::from_lookup(other),
        }
    }

    /// Convert an index or validation failure.
    pub(crate) fn from_lookup(err: SpatialError) -> Self {
        match err {
            SpatialError::NotFound         => PlanError::NotFound,
            SpatialError::InvalidInput(m)  => PlanError::InvalidInput(m),
            SpatialError::Cancelled        => PlanError::Cancelled,
            SpatialError::NoPath { from, to } => {
                PlanError::InvalidInput(format!("unexpected no-path {from} -> {to} outside a segment"))
            }
        }
    }
}

impl From<CoreError> for PlanError {
    fn from(err: CoreError) -> Self {
        PlanError::InvalidInput(err.to_string())
    }
}

pub type PlanResult<T> = Result<T, PlanError>;
