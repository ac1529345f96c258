//! Registry error types

use qprof_types::{ProfileId, RuleKey};
use thiserror::Error;

/// Registry errors
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Rule not found: {0}")]
    RuleNotFound(RuleKey),

    #[error("Profile not found: {0}")]
    ProfileNotFound(ProfileId),

    #[error("Profile already exists: {0}")]
    ProfileAlreadyExists(ProfileId),

    #[error("Rule already exists: {0}")]
    RuleAlreadyExists(RuleKey),

    #[error("Profile {child} ({child_language}) cannot inherit from {parent} ({parent_language}): languages differ")]
    LanguageMismatch {
        child: ProfileId,
        child_language: String,
        parent: ProfileId,
        parent_language: String,
    },

    #[error("Profile {0} cannot be its own parent")]
    SelfParent(ProfileId),

    #[error("Stale snapshot for rule {rule} in profile {profile}")]
    ConcurrentModification { rule: RuleKey, profile: ProfileId },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Lock error")]
    Lock,
}

/// Result type for registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;
