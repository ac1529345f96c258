//! Change sets: the outcome of one activation or deactivation request
//!
//! A `ChangeSet` is an ordered list of per-profile transitions, parent
//! before child. It is pure data: the activation core produces it in full
//! before anything is applied, and the storage collaborator applies it
//! all-or-nothing.

use crate::active_rule::ActiveRule;
use crate::ids::{ProfileId, RuleKey};
use serde::{Deserialize, Serialize};

/// The operation carried by one change entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", tag = "op", content = "state")]
pub enum ChangeOp {
    /// Create or replace the active rule with this state.
    Upsert(ActiveRule),
    /// Remove the active rule (deactivation tombstone).
    Remove,
}

/// One (profile, rule) transition.
///
/// `prior` snapshots the record the decision was computed against; apply-time
/// validation compares it to the stored state and rejects the whole change
/// set on divergence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveRuleChange {
    pub profile_id: ProfileId,
    pub rule_key: RuleKey,
    pub op: ChangeOp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prior: Option<ActiveRule>,
}

impl ActiveRuleChange {
    pub fn upsert(
        profile_id: ProfileId,
        rule_key: RuleKey,
        prior: Option<ActiveRule>,
        state: ActiveRule,
    ) -> Self {
        Self {
            profile_id,
            rule_key,
            op: ChangeOp::Upsert(state),
            prior,
        }
    }

    pub fn remove(profile_id: ProfileId, rule_key: RuleKey, prior: ActiveRule) -> Self {
        Self {
            profile_id,
            rule_key,
            op: ChangeOp::Remove,
            prior: Some(prior),
        }
    }

    /// The state after this change, if any remains.
    pub fn new_state(&self) -> Option<&ActiveRule> {
        match &self.op {
            ChangeOp::Upsert(state) => Some(state),
            ChangeOp::Remove => None,
        }
    }

    /// Whether the entry records no actual transition (re-activation with
    /// identical values and classification).
    pub fn is_noop(&self) -> bool {
        match (&self.op, &self.prior) {
            (ChangeOp::Upsert(state), Some(prior)) => state == prior,
            _ => false,
        }
    }
}

/// Ordered transition batch for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSet {
    pub rule_key: RuleKey,
    pub origin: ProfileId,
    pub entries: Vec<ActiveRuleChange>,
}

impl ChangeSet {
    pub fn new(rule_key: RuleKey, origin: ProfileId) -> Self {
        Self {
            rule_key,
            origin,
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, entry: ActiveRuleChange) {
        self.entries.push(entry);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// The entry for a given profile, if this request touched it.
    pub fn entry_for(&self, profile_id: &ProfileId) -> Option<&ActiveRuleChange> {
        self.entries.iter().find(|e| &e.profile_id == profile_id)
    }

    /// Entries that record an actual transition.
    pub fn effective_entries(&self) -> impl Iterator<Item = &ActiveRuleChange> {
        self.entries.iter().filter(|e| !e.is_noop())
    }
}
