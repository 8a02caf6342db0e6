use thiserror::Error;
use uuid::Uuid;

/// Errors returned by the planner, its stores and the capacity engine.
#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("No configuration available: add a configuration before adding resources")]
    NoConfiguration,

    #[error("Configuration not found: {0}")]
    ConfigNotFound(Uuid),

    #[error("Resource not found: {0}")]
    ResourceNotFound(Uuid),

    #[error("Story point mapping row not found: {0}")]
    MappingRowNotFound(Uuid),

    #[error("Position {index} is out of range (list has {len} entries)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Leaves cannot be less than {minimum} (got {leaves})")]
    InvalidLeaves { leaves: i64, minimum: i64 },

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, PlannerError>;
