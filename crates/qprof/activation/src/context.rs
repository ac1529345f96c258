//! Activation context: the request-scoped snapshot a resolution runs on
//!
//! Built fresh for every (rule, profile) pair, including every descendant
//! visited during propagation, because parent and target shift at each
//! hierarchy level. The context is immutable once built; the resolver never
//! mutates it.

use crate::error::Result;
use qprof_registry::{ActiveRuleStore, ProfileHierarchy, RuleCatalog};
use qprof_types::{ActiveRule, ProfileId, QualityProfile, RuleDefinition, RuleKey, Severity};
use std::sync::Arc;
use tracing::debug;

/// Everything one activation resolution needs, loaded up front.
#[derive(Debug, Clone)]
pub struct ActivationContext {
    pub rule: RuleDefinition,
    pub profile: QualityProfile,
    pub parent: Option<QualityProfile>,
    /// Existing active rule for (rule, profile), if any.
    pub active: Option<ActiveRule>,
    /// Active rule for (rule, parent profile), if a parent exists and the
    /// rule is active there.
    pub parent_active: Option<ActiveRule>,
}

impl ActivationContext {
    /// Severity used when the request does not name one: the parent's
    /// current active severity if the rule is active in the parent,
    /// otherwise the rule's intrinsic default.
    pub fn default_severity(&self) -> Severity {
        self.parent_active
            .as_ref()
            .map_or(self.rule.severity, |parent| parent.severity)
    }
}

/// Assembles activation contexts from the collaborator seams. Pure read, no
/// side effects.
pub struct ContextBuilder {
    catalog: Arc<dyn RuleCatalog>,
    hierarchy: Arc<dyn ProfileHierarchy>,
    store: Arc<dyn ActiveRuleStore>,
}

impl ContextBuilder {
    pub fn new(
        catalog: Arc<dyn RuleCatalog>,
        hierarchy: Arc<dyn ProfileHierarchy>,
        store: Arc<dyn ActiveRuleStore>,
    ) -> Self {
        Self {
            catalog,
            hierarchy,
            store,
        }
    }

    /// Build the context for one (rule, profile) pair.
    pub fn build(&self, rule_key: &RuleKey, profile_id: &ProfileId) -> Result<ActivationContext> {
        let rule = self.catalog.rule(rule_key)?;
        let profile = self.hierarchy.profile(profile_id)?;

        let parent = match &profile.parent_id {
            Some(parent_id) => Some(self.hierarchy.profile(parent_id)?),
            None => None,
        };

        let active = self.store.get(rule_key, profile_id)?;
        let parent_active = match &parent {
            Some(parent) => self.store.get(rule_key, &parent.id)?,
            None => None,
        };

        debug!(
            rule = %rule_key,
            profile = %profile_id,
            has_parent = parent.is_some(),
            active = active.is_some(),
            parent_active = parent_active.is_some(),
            "Activation context built"
        );

        Ok(ActivationContext {
            rule,
            profile,
            parent,
            active,
            parent_active,
        })
    }
}
