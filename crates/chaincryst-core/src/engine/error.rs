use thiserror::Error;

use super::config::ConfigError;
use crate::core::io::poscar::PoscarError;
use crate::core::models::structure::StructureError;
use std::path::PathBuf;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Degenerate sampling grid: {reason}")]
    DegenerateGrid { reason: String },

    #[error("Malformed input structure '{path}': {source}", path = path.display())]
    MalformedInput {
        path: PathBuf,
        #[source]
        source: PoscarError,
    },

    #[error("Structure invariant violated: {0}")]
    Structure(#[from] StructureError),

    #[error("Failed to prepare output directory '{path}': {source}", path = path.display())]
    OutputDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write summary '{path}': {source}", path = path.display())]
    Summary {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}
