//! Active-rule store trait
//!
//! Reads serve the context builder and the propagation engine. Writes only
//! ever arrive as a whole `ChangeSet`: the store applies it all-or-nothing,
//! validating every entry's prior snapshot first. A stale snapshot rejects
//! the entire batch with `ConcurrentModification`; no partial cascade is
//! ever observable.

use crate::error::Result;
use qprof_types::{ActiveRule, ChangeSet, ProfileId, RuleKey};

/// Storage for active rules.
pub trait ActiveRuleStore: Send + Sync {
    /// Current active rule for (rule, profile), if any.
    fn get(&self, rule: &RuleKey, profile: &ProfileId) -> Result<Option<ActiveRule>>;

    /// All active rules of a profile.
    fn for_profile(&self, profile: &ProfileId) -> Result<Vec<ActiveRule>>;

    /// Apply a change set atomically.
    fn apply(&self, changes: &ChangeSet) -> Result<()>;
}
