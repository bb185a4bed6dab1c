//! Registry errors.

use thiserror::Error;

/// Errors raised by [`crate::ProviderRegistry`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The provider key was empty after trimming.
    #[error("provider key must not be blank")]
    BlankKey,
}

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
