//! Propagation engine
//!
//! Cascades an accepted change at one profile down the child subtree.
//! The walk is breadth-first by hierarchy level, so a profile is processed
//! only after its own parent's outcome is finalized: a child's inheritance
//! basis is always the already-updated parent state, never the stale one.
//!
//! The hierarchy is trusted to be acyclic as a precondition, but traversal
//! depth is still bounded: a corrupted parent relation surfaces as
//! `HierarchyCorrupt` instead of non-termination.

use crate::error::{ActivationError, Result};
use qprof_registry::{ActiveRuleStore, ProfileHierarchy};
use qprof_types::{
    ActiveRule, ActiveRuleChange, ChangeSet, Inheritance, ProfileId, RuleKey,
};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tracing::{debug, warn};

/// Default bound on hierarchy depth below the origin profile.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Walks the subtree under an origin profile and re-resolves every
/// descendant whose state is inheritance-derived.
pub struct PropagationEngine {
    hierarchy: Arc<dyn ProfileHierarchy>,
    store: Arc<dyn ActiveRuleStore>,
    max_depth: usize,
}

impl PropagationEngine {
    pub fn new(hierarchy: Arc<dyn ProfileHierarchy>, store: Arc<dyn ActiveRuleStore>) -> Self {
        Self {
            hierarchy,
            store,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Extend `changes` with every descendant transition implied by the
    /// origin's finalized outcome.
    ///
    /// `origin_state` is the origin profile's new active rule (`None` for a
    /// deactivation). Entries are appended parent-before-child; no-op visits
    /// append nothing.
    pub fn propagate(
        &self,
        rule_key: &RuleKey,
        origin: &ProfileId,
        origin_state: Option<&ActiveRule>,
        changes: &mut ChangeSet,
    ) -> Result<()> {
        // New state per finalized profile; a child's basis is looked up
        // here, never in the store.
        let mut finalized: HashMap<ProfileId, Option<ActiveRule>> = HashMap::new();
        finalized.insert(origin.clone(), origin_state.cloned());

        let mut queue: VecDeque<(ProfileId, ProfileId, usize)> = VecDeque::new();
        for child in self.hierarchy.children(origin)? {
            queue.push_back((child, origin.clone(), 1));
        }

        while let Some((profile_id, parent_id, depth)) = queue.pop_front() {
            if depth > self.max_depth {
                warn!(
                    rule = %rule_key,
                    origin = %origin,
                    depth,
                    "Traversal depth bound exceeded"
                );
                return Err(ActivationError::HierarchyCorrupt {
                    origin: origin.clone(),
                    depth,
                });
            }

            let parent_state = finalized
                .get(&parent_id)
                .cloned()
                .flatten();
            let current = self.store.get(rule_key, &profile_id)?;
            let mut descend = true;

            match (parent_state, current) {
                // Parent activated, rule absent here: new inherited copy.
                (Some(parent), None) => {
                    let state = ActiveRule::new(
                        rule_key.clone(),
                        profile_id.clone(),
                        parent.severity,
                        parent.params.clone(),
                        Inheritance::Inherited,
                    );
                    finalized.insert(profile_id.clone(), Some(state.clone()));
                    changes.push(ActiveRuleChange::upsert(
                        profile_id.clone(),
                        rule_key.clone(),
                        None,
                        state,
                    ));
                }
                // Purely inherited chain: overwrite with the new parent
                // values and keep walking.
                (Some(parent), Some(current))
                    if current.inheritance == Inheritance::Inherited =>
                {
                    let state = ActiveRule::new(
                        rule_key.clone(),
                        profile_id.clone(),
                        parent.severity,
                        parent.params.clone(),
                        Inheritance::Inherited,
                    );
                    finalized.insert(profile_id.clone(), Some(state.clone()));
                    if state != current {
                        changes.push(ActiveRuleChange::upsert(
                            profile_id.clone(),
                            rule_key.clone(),
                            Some(current),
                            state,
                        ));
                    }
                }
                // Local decision (OVERRIDDEN, or NONE from before the parent
                // was active): values are preserved; only the classification
                // is re-evaluated, and only an exact value match demotes it
                // back to INHERITED. The subtree's basis did not change, so
                // the walk stops here.
                (Some(parent), Some(current)) => {
                    let inheritance = if current.values_match(&parent) {
                        Inheritance::Inherited
                    } else {
                        Inheritance::Overridden
                    };
                    if inheritance != current.inheritance {
                        let mut state = current.clone();
                        state.inheritance = inheritance;
                        changes.push(ActiveRuleChange::upsert(
                            profile_id.clone(),
                            rule_key.clone(),
                            Some(current),
                            state,
                        ));
                    }
                    descend = false;
                }
                // Parent deactivated: inherited copies disappear with it.
                (None, Some(current))
                    if current.inheritance == Inheritance::Inherited =>
                {
                    finalized.insert(profile_id.clone(), None);
                    changes.push(ActiveRuleChange::remove(
                        profile_id.clone(),
                        rule_key.clone(),
                        current,
                    ));
                }
                // Parent deactivated over a local decision: values stay, but
                // there is no inherited basis left to point at.
                (None, Some(current)) => {
                    if current.inheritance != Inheritance::None {
                        let mut state = current.clone();
                        state.inheritance = Inheritance::None;
                        changes.push(ActiveRuleChange::upsert(
                            profile_id.clone(),
                            rule_key.clone(),
                            Some(current),
                            state,
                        ));
                    }
                    descend = false;
                }
                // Nothing here and nothing above: keep walking so that any
                // orphaned inherited copies further down still get cleared.
                (None, None) => {
                    finalized.insert(profile_id.clone(), None);
                }
            }

            if descend {
                for child in self.hierarchy.children(&profile_id)? {
                    queue.push_back((child, profile_id.clone(), depth + 1));
                }
            }
        }

        debug!(
            rule = %rule_key,
            origin = %origin,
            entries = changes.len(),
            "Propagation complete"
        );
        Ok(())
    }
}
