use thiserror::Error;

/// Hard failures surfaced to the caller. Skippable input problems (unknown
/// lines, dangling edges during bulk build, adjustments aimed at unknown ids)
/// are logged instead and never show up here.
#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot connect {from} -> {to}: endpoint shape not found")]
    MissingEndpoint { from: String, to: String },

    #[error("invalid icon mapping: {0}")]
    InvalidIconMap(#[source] serde_json::Error),

    #[error("invalid adjustment commands: {0}")]
    InvalidAdjustments(#[source] serde_json::Error),

    #[error("invalid model completion: {0}")]
    InvalidCompletion(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
