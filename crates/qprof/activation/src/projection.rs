//! Read projection for external rendering
//!
//! Flattens a profile's active rules into self-contained view records: rule
//! key, severity, inheritance label, the parent profile the values relate to
//! (when inherited or overridden), parameters, and remediation metadata.

use crate::error::Result;
use qprof_registry::{ActiveRuleStore, ProfileHierarchy, RuleCatalog};
use qprof_types::{Inheritance, ProfileId, Remediation, Severity};
use serde::{Deserialize, Serialize};

/// One active rule, rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveRuleView {
    pub rule_key: String,
    pub rule_name: String,
    pub severity: Severity,
    pub inheritance: Inheritance,
    /// Parent profile the inheritance classification relates to; absent for
    /// `NONE`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_profile_id: Option<ProfileId>,
    /// Effective parameters in deterministic order.
    pub params: Vec<(String, String)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation: Option<Remediation>,
}

/// Render every active rule of a profile, sorted by rule key.
pub fn profile_view(
    catalog: &dyn RuleCatalog,
    hierarchy: &dyn ProfileHierarchy,
    store: &dyn ActiveRuleStore,
    profile_id: &ProfileId,
) -> Result<Vec<ActiveRuleView>> {
    let profile = hierarchy.profile(profile_id)?;

    let mut views = Vec::new();
    for active in store.for_profile(profile_id)? {
        let rule = catalog.rule(&active.rule_key)?;
        let parent_profile_id = match active.inheritance {
            Inheritance::None => None,
            Inheritance::Inherited | Inheritance::Overridden => profile.parent_id.clone(),
        };
        views.push(ActiveRuleView {
            rule_key: active.rule_key.to_string(),
            rule_name: rule.name,
            severity: active.severity,
            inheritance: active.inheritance,
            parent_profile_id,
            params: active.params.into_iter().collect(),
            remediation: rule.remediation,
        });
    }
    Ok(views)
}
