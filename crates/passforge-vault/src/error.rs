//! Vault error types.
//!
//! Callers see exactly two kinds of failure: the input was rejected
//! ([`VaultError::Validation`]) or durable storage failed
//! ([`VaultError::Storage`]). Neither leaves a partial record behind.

use passforge_store::StoreError;

/// Unified error type for the PassForge vault.
#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    /// The caller supplied an empty account name or secret, or asked to
    /// generate with no character class selected. Re-prompt and retry.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Reading or writing the credential database failed.
    #[error("storage failed: {0}")]
    Storage(#[source] StoreError),
}

impl VaultError {
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<StoreError> for VaultError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InvalidArgument(message) => Self::Validation(message),
            other => Self::Storage(other),
        }
    }
}

/// Convenience alias used throughout the vault crate.
pub type Result<T> = std::result::Result<T, VaultError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_argument_maps_to_validation() {
        let err = VaultError::from(StoreError::InvalidArgument("empty".into()));
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "validation failed: empty");
    }

    #[test]
    fn everything_else_maps_to_storage() {
        let err = VaultError::from(StoreError::Closed);
        assert!(matches!(err, VaultError::Storage(StoreError::Closed)));
        assert!(!err.is_validation());
    }
}
