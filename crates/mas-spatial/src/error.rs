//! Spatial-index error type.

use thiserror::Error;

use mas_core::{ActorId, Rect, Vec2};

/// Errors produced by `mas-spatial`.
///
/// `NotFound` and `AlreadyInserted` indicate a consistency bug in the caller
/// (population and index out of sync) and should be propagated, not
/// swallowed.  `OutOfBounds` is recoverable: the caller may clamp the
/// position or reject the actor.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("position {pos} of {actor} lies outside the index region {bounds}")]
    OutOfBounds {
        actor:  ActorId,
        pos:    Vec2,
        bounds: Rect,
    },

    #[error("{0} not present in the spatial index")]
    NotFound(ActorId),

    #[error("{0} already present in the spatial index")]
    AlreadyInserted(ActorId),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
