//! Profile hierarchy trait
//!
//! Profiles form a forest, one tree per language. The hierarchy collaborator
//! owns the parent relation and guarantees it is acyclic and
//! language-consistent; the activation core treats that as a precondition
//! and only walks it defensively.

use crate::error::Result;
use qprof_types::{ProfileId, QualityProfile};

/// Read-only lookup over the profile forest.
pub trait ProfileHierarchy: Send + Sync {
    /// Get a profile by id.
    fn profile(&self, id: &ProfileId) -> Result<QualityProfile>;

    /// Direct children of a profile, in deterministic order.
    fn children(&self, id: &ProfileId) -> Result<Vec<ProfileId>>;
}
