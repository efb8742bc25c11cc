use thiserror::Error;

use crate::ids::StructureId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),
    /// The structure was evicted or never existed.
    #[error("structure {0} is no longer in the world")]
    StaleReference(StructureId),
}
