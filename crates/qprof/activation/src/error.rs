//! Error types for the activation core
//!
//! Every rejection of a request surfaces as one of these variants; nothing
//! is silently swallowed. Registry-layer errors are mapped into this
//! taxonomy at the boundary.

use qprof_registry::RegistryError;
use qprof_types::{ProfileId, RuleKey};
use thiserror::Error;

/// Activation errors
#[derive(Debug, Error)]
pub enum ActivationError {
    #[error("Rule not found: {0}")]
    RuleNotFound(RuleKey),

    #[error("Profile not found: {0}")]
    ProfileNotFound(ProfileId),

    #[error("Parameter {name:?} is not declared on rule {rule}")]
    UnknownParameter { rule: RuleKey, name: String },

    #[error("Rule {0} is a template and cannot be activated directly")]
    RuleIsTemplate(RuleKey),

    #[error("Rule {0} is removed and can no longer be activated")]
    RuleRemoved(RuleKey),

    #[error("Profile hierarchy exceeds depth {depth} below {origin}; refusing to traverse")]
    HierarchyCorrupt { origin: ProfileId, depth: usize },

    #[error("Concurrent modification of rule {rule} in profile {profile}; retry the request")]
    ConcurrentModification { rule: RuleKey, profile: ProfileId },

    #[error("Storage error: {0}")]
    Store(String),
}

impl From<RegistryError> for ActivationError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::RuleNotFound(key) => ActivationError::RuleNotFound(key),
            RegistryError::ProfileNotFound(id) => ActivationError::ProfileNotFound(id),
            RegistryError::ConcurrentModification { rule, profile } => {
                ActivationError::ConcurrentModification { rule, profile }
            }
            other => ActivationError::Store(other.to_string()),
        }
    }
}

/// Result type for activation operations
pub type Result<T> = std::result::Result<T, ActivationError>;
