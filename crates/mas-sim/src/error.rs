use mas_core::ActorId;
use mas_spatial::SpatialError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("{0} is not part of the simulation")]
    ActorNotFound(ActorId),

    #[error("spatial index error: {0}")]
    Spatial(#[from] SpatialError),
}

pub type SimResult<T> = Result<T, SimError>;
