use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("unknown material: {0}")]
    UnknownMaterial(String),
    #[error("workbench occupied by {0}")]
    Occupied(String),
    #[error("invalid state: {0}")]
    State(String),
    #[error("configuration error: {0}")]
    Config(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("missing material catalog")]
    MissingMaterials,
    #[error("duplicate material id: {0}")]
    DuplicateMaterial(String),
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
