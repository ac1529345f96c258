//! Rule activator: the entry point for activation requests
//!
//! One call = one unit of work: build the context, resolve the local
//! outcome, propagate through the subtree, apply the resulting change set
//! all-or-nothing, return it. A rejected request leaves the store untouched.
//!
//! Callers must serialize concurrent requests that target the same rule
//! within overlapping subtrees; this facade does not lock.

use crate::context::ContextBuilder;
use crate::error::Result;
use crate::propagation::{PropagationEngine, DEFAULT_MAX_DEPTH};
use crate::resolver::{resolve, ActivationRequest};
use qprof_registry::{ActiveRuleStore, ProfileHierarchy, RuleCatalog};
use qprof_types::{ActiveRuleChange, ChangeSet, ProfileId, RuleKey};
use std::sync::Arc;
use tracing::{info, warn};

/// Activation/deactivation facade over the collaborator seams.
pub struct RuleActivator {
    catalog: Arc<dyn RuleCatalog>,
    hierarchy: Arc<dyn ProfileHierarchy>,
    store: Arc<dyn ActiveRuleStore>,
    max_depth: usize,
}

impl RuleActivator {
    pub fn new(
        catalog: Arc<dyn RuleCatalog>,
        hierarchy: Arc<dyn ProfileHierarchy>,
        store: Arc<dyn ActiveRuleStore>,
    ) -> Self {
        Self {
            catalog,
            hierarchy,
            store,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Bound on hierarchy depth below the origin profile.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Activate `rule_key` in `profile_id` with the requested overrides and
    /// cascade to descendants. Returns the applied change set.
    pub fn activate(
        &self,
        rule_key: &RuleKey,
        profile_id: &ProfileId,
        request: &ActivationRequest,
    ) -> Result<ChangeSet> {
        let ctx = self.context_builder().build(rule_key, profile_id)?;
        let resolved = match resolve(&ctx, request) {
            Ok(resolved) => resolved,
            Err(err) => {
                warn!(rule = %rule_key, profile = %profile_id, %err, "Activation rejected");
                return Err(err);
            }
        };
        let state = resolved.into_active_rule(rule_key.clone(), profile_id.clone());

        let mut changes = ChangeSet::new(rule_key.clone(), profile_id.clone());
        // The origin entry is always recorded, even when it is a no-op.
        changes.push(ActiveRuleChange::upsert(
            profile_id.clone(),
            rule_key.clone(),
            ctx.active.clone(),
            state.clone(),
        ));
        self.propagation_engine()
            .propagate(rule_key, profile_id, Some(&state), &mut changes)?;

        self.store.apply(&changes)?;
        info!(
            rule = %rule_key,
            profile = %profile_id,
            severity = %state.severity,
            inheritance = %state.inheritance,
            entries = changes.len(),
            "Rule activated"
        );
        Ok(changes)
    }

    /// Deactivate `rule_key` in `profile_id` and cascade to descendants.
    ///
    /// Deactivating a rule that was never active is an idempotent success
    /// with an empty change set.
    pub fn deactivate(&self, rule_key: &RuleKey, profile_id: &ProfileId) -> Result<ChangeSet> {
        let ctx = self.context_builder().build(rule_key, profile_id)?;

        let mut changes = ChangeSet::new(rule_key.clone(), profile_id.clone());
        let Some(active) = ctx.active else {
            return Ok(changes);
        };

        changes.push(ActiveRuleChange::remove(
            profile_id.clone(),
            rule_key.clone(),
            active,
        ));
        self.propagation_engine()
            .propagate(rule_key, profile_id, None, &mut changes)?;

        self.store.apply(&changes)?;
        info!(
            rule = %rule_key,
            profile = %profile_id,
            entries = changes.len(),
            "Rule deactivated"
        );
        Ok(changes)
    }

    fn context_builder(&self) -> ContextBuilder {
        ContextBuilder::new(
            self.catalog.clone(),
            self.hierarchy.clone(),
            self.store.clone(),
        )
    }

    fn propagation_engine(&self) -> PropagationEngine {
        PropagationEngine::new(self.hierarchy.clone(), self.store.clone())
            .with_max_depth(self.max_depth)
    }
}
