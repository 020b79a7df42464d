use thiserror::Error;

/// User-safe failure of a dashboard read. The underlying cause is logged where
/// it happens and never carried past this boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct DataFetchError {
    message: &'static str,
}

impl DataFetchError {
    pub const fn new(message: &'static str) -> Self {
        Self { message }
    }

    pub fn message(&self) -> &'static str {
        self.message
    }
}

/// An administrative route was invoked outside a development environment
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Forbidden: Not allowed in production.")]
pub struct SeedGuardError {
    pub environment: String,
}
