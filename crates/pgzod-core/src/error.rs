use thiserror::Error;

/// Error type returned by user-supplied hooks.
pub type HookError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Core error type shared across pgzod crates.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or contradictory configuration, detected before any I/O.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// The database transport could not be established.
    #[error("connection error: {0}")]
    Connection(String),
    /// The catalog query failed after the connection was established.
    #[error("catalog error: {0}")]
    Catalog(String),
    /// Error raised by a user hook, passed through untouched.
    #[error(transparent)]
    Hook(HookError),
    /// Filters left nothing to generate.
    #[error("no tables matched the configured filters in schema '{schema}'")]
    NoTablesMatched { schema: String },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Wrap a hook failure without altering it.
    pub fn hook(err: HookError) -> Self {
        Error::Hook(err)
    }
}

/// Convenience alias for results returned by pgzod crates.
pub type Result<T> = std::result::Result<T, Error>;
