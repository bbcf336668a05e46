use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the simulation core, configuration loading and the CLI.
///
/// Collision prediction never produces an error: a missing collision is reported
/// through [`crate::core::particle::NO_COLLISION`]. Each variant here carries enough
/// context to be actionable.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid user or API parameter.
    #[error("invalid parameter: {0}")]
    InvalidParam(String),

    /// The event queue holds no scheduled collision.
    #[error("event queue is empty: no collision is scheduled")]
    EmptyQueue,

    /// A particle index does not address the particle collection.
    #[error("particle index {index} out of range for {len} particles")]
    IndexOutOfRange { index: usize, len: usize },

    /// Malformed TOML configuration.
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// Propagated I/O errors (configuration files, snapshot output).
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
