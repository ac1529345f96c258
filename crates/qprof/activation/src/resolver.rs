//! Activation resolver
//!
//! Pure computation of one activation outcome from an `ActivationContext`
//! and the requested overrides. No I/O, no mutation: given the same inputs
//! the result is always the same, which is what makes the cascade
//! deterministic.

use crate::context::ActivationContext;
use crate::error::{ActivationError, Result};
use qprof_types::{ActiveRule, Inheritance, ProfileId, RuleKey, RuleStatus, Severity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Requested overrides for one activation.
///
/// An empty request activates with inherited/default values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivationRequest {
    /// Explicit severity; absent inherits the parent's severity, falling
    /// back to the rule's intrinsic default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    /// Explicit parameter values. Every key must be declared on the rule.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, String>,
}

impl ActivationRequest {
    /// Request with no explicit overrides.
    pub fn inherit() -> Self {
        Self::default()
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }
}

/// The computed activation state for one (rule, profile) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedActivation {
    pub severity: Severity,
    pub params: BTreeMap<String, String>,
    pub inheritance: Inheritance,
}

impl ResolvedActivation {
    pub fn into_active_rule(self, rule_key: RuleKey, profile_id: ProfileId) -> ActiveRule {
        ActiveRule::new(
            rule_key,
            profile_id,
            self.severity,
            self.params,
            self.inheritance,
        )
    }
}

/// Resolve one activation.
///
/// Effective severity: explicit request, else the parent's current active
/// severity, else the rule's catalog default.
///
/// Effective value per declared parameter: explicit request, else the
/// parent's current value, else the catalog default; a parameter resolving
/// to no value is omitted.
///
/// Classification: without a parent basis the result is `NONE`; with one,
/// the result is `INHERITED` exactly when severity and the full parameter
/// map equal the parent's current record, `OVERRIDDEN` otherwise.
pub fn resolve(ctx: &ActivationContext, request: &ActivationRequest) -> Result<ResolvedActivation> {
    if ctx.rule.is_template {
        return Err(ActivationError::RuleIsTemplate(ctx.rule.key.clone()));
    }
    if ctx.rule.status == RuleStatus::Removed {
        return Err(ActivationError::RuleRemoved(ctx.rule.key.clone()));
    }
    for name in request.params.keys() {
        if ctx.rule.param(name).is_none() {
            return Err(ActivationError::UnknownParameter {
                rule: ctx.rule.key.clone(),
                name: name.clone(),
            });
        }
    }

    let severity = request.severity.unwrap_or_else(|| ctx.default_severity());

    let mut params = BTreeMap::new();
    for declared in &ctx.rule.params {
        let value = request
            .params
            .get(&declared.name)
            .map(String::as_str)
            .or_else(|| {
                ctx.parent_active
                    .as_ref()
                    .and_then(|parent| parent.param(&declared.name))
            })
            .or(declared.default_value.as_deref());
        if let Some(value) = value {
            params.insert(declared.name.clone(), value.to_string());
        }
    }

    let inheritance = match &ctx.parent_active {
        None => Inheritance::None,
        Some(parent) => {
            if severity == parent.severity && params == parent.params {
                Inheritance::Inherited
            } else {
                Inheritance::Overridden
            }
        }
    };

    debug!(
        rule = %ctx.rule.key,
        profile = %ctx.profile.id,
        severity = %severity,
        inheritance = %inheritance,
        "Activation resolved"
    );

    Ok(ResolvedActivation {
        severity,
        params,
        inheritance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use qprof_types::{QualityProfile, RuleDefinition, RuleParam};

    fn s100() -> RuleDefinition {
        RuleDefinition::new(
            RuleKey::new("squid", "S100"),
            "Method names should comply with a naming convention",
            Severity::Minor,
        )
        .with_param(RuleParam::new("format").with_default("^[a-z][a-zA-Z0-9]*$"))
        .with_param(RuleParam::new("message"))
    }

    fn root_ctx(rule: RuleDefinition) -> ActivationContext {
        ActivationContext {
            rule,
            profile: QualityProfile::root(ProfileId::new("java-default"), "Java Default", "java"),
            parent: None,
            active: None,
            parent_active: None,
        }
    }

    fn child_ctx(rule: RuleDefinition, parent_active: Option<ActiveRule>) -> ActivationContext {
        let root = QualityProfile::root(ProfileId::new("java-default"), "Java Default", "java");
        let child = QualityProfile::child(
            ProfileId::new("java-strict"),
            "Java Strict",
            "java",
            root.id.clone(),
        );
        ActivationContext {
            rule,
            profile: child,
            parent: Some(root),
            active: None,
            parent_active,
        }
    }

    fn parent_record(severity: Severity, params: &[(&str, &str)]) -> ActiveRule {
        ActiveRule::new(
            RuleKey::new("squid", "S100"),
            ProfileId::new("java-default"),
            severity,
            params
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            Inheritance::None,
        )
    }

    #[test]
    fn root_activation_uses_rule_default_severity_and_none() {
        let resolved = resolve(&root_ctx(s100()), &ActivationRequest::inherit()).unwrap();
        assert_eq!(resolved.severity, Severity::Minor);
        assert_eq!(resolved.inheritance, Inheritance::None);
        assert_eq!(
            resolved.params.get("format").map(String::as_str),
            Some("^[a-z][a-zA-Z0-9]*$")
        );
        // No default and nothing requested: omitted.
        assert!(!resolved.params.contains_key("message"));
    }

    #[test]
    fn explicit_severity_wins_at_the_root() {
        let request = ActivationRequest::inherit().with_severity(Severity::Blocker);
        let resolved = resolve(&root_ctx(s100()), &request).unwrap();
        assert_eq!(resolved.severity, Severity::Blocker);
        assert_eq!(resolved.inheritance, Inheritance::None);
    }

    #[test]
    fn child_without_overrides_inherits_parent_values() {
        let parent = parent_record(Severity::Blocker, &[("format", "^[A-Z]+$")]);
        let ctx = child_ctx(s100(), Some(parent));
        let resolved = resolve(&ctx, &ActivationRequest::inherit()).unwrap();
        assert_eq!(resolved.severity, Severity::Blocker);
        assert_eq!(
            resolved.params.get("format").map(String::as_str),
            Some("^[A-Z]+$")
        );
        assert_eq!(resolved.inheritance, Inheritance::Inherited);
    }

    #[test]
    fn child_with_diverging_severity_is_overridden() {
        let parent = parent_record(Severity::Minor, &[("format", "^[a-z][a-zA-Z0-9]*$")]);
        let ctx = child_ctx(s100(), Some(parent));
        let request = ActivationRequest::inherit().with_severity(Severity::Blocker);
        let resolved = resolve(&ctx, &request).unwrap();
        assert_eq!(resolved.severity, Severity::Blocker);
        assert_eq!(resolved.inheritance, Inheritance::Overridden);
    }

    #[test]
    fn explicitly_requesting_parent_values_stays_inherited() {
        // Exact-match reconciliation: an explicit request equal to the
        // parent's record must not flip to OVERRIDDEN.
        let parent = parent_record(Severity::Critical, &[("format", "^[A-Z]+$")]);
        let ctx = child_ctx(s100(), Some(parent));
        let request = ActivationRequest::inherit()
            .with_severity(Severity::Critical)
            .with_param("format", "^[A-Z]+$");
        let resolved = resolve(&ctx, &request).unwrap();
        assert_eq!(resolved.inheritance, Inheritance::Inherited);
    }

    #[test]
    fn child_of_inactive_parent_is_none() {
        let ctx = child_ctx(s100(), None);
        let resolved = resolve(&ctx, &ActivationRequest::inherit()).unwrap();
        assert_eq!(resolved.severity, Severity::Minor);
        assert_eq!(resolved.inheritance, Inheritance::None);
    }

    #[test]
    fn requested_param_beats_parent_and_default() {
        let parent = parent_record(Severity::Minor, &[("format", "parent-value")]);
        let ctx = child_ctx(s100(), Some(parent));
        let request = ActivationRequest::inherit().with_param("format", "requested-value");
        let resolved = resolve(&ctx, &request).unwrap();
        assert_eq!(
            resolved.params.get("format").map(String::as_str),
            Some("requested-value")
        );
        assert_eq!(resolved.inheritance, Inheritance::Overridden);
    }

    #[test]
    fn unknown_parameter_is_rejected() {
        let request = ActivationRequest::inherit().with_param("no-such-param", "x");
        let err = resolve(&root_ctx(s100()), &request).unwrap_err();
        assert!(matches!(
            err,
            ActivationError::UnknownParameter { ref name, .. } if name == "no-such-param"
        ));
    }

    #[test]
    fn template_rules_cannot_be_activated() {
        let rule = s100().as_template();
        let err = resolve(&root_ctx(rule), &ActivationRequest::inherit()).unwrap_err();
        assert!(matches!(err, ActivationError::RuleIsTemplate(_)));
    }

    #[test]
    fn removed_rules_cannot_be_activated() {
        let rule = s100().with_status(RuleStatus::Removed);
        let err = resolve(&root_ctx(rule), &ActivationRequest::inherit()).unwrap_err();
        assert!(matches!(err, ActivationError::RuleRemoved(_)));
    }

    fn severity_strategy() -> impl Strategy<Value = Severity> {
        prop::sample::select(Severity::ALL.to_vec())
    }

    proptest! {
        /// Re-resolving with the resulting effective values explicitly
        /// requested never changes the outcome: same values, and
        /// OVERRIDDEN only when they differ from the parent.
        #[test]
        fn resolve_is_stable_under_explicit_round_trip(
            parent_severity in severity_strategy(),
            requested_severity in prop::option::of(severity_strategy()),
            parent_format in "[a-z]{1,8}",
            requested_format in prop::option::of("[a-z]{1,8}"),
        ) {
            let parent = parent_record(parent_severity, &[("format", parent_format.as_str())]);
            let ctx = child_ctx(s100(), Some(parent));

            let mut request = ActivationRequest::inherit();
            request.severity = requested_severity;
            if let Some(format) = requested_format {
                request = request.with_param("format", format);
            }

            let first = resolve(&ctx, &request).unwrap();

            let mut explicit = ActivationRequest::inherit().with_severity(first.severity);
            for (name, value) in &first.params {
                explicit = explicit.with_param(name.clone(), value.clone());
            }
            let second = resolve(&ctx, &explicit).unwrap();

            prop_assert_eq!(&second.severity, &first.severity);
            prop_assert_eq!(&second.params, &first.params);
            prop_assert_eq!(second.inheritance, first.inheritance);
        }

        /// An empty request against an active parent always lands exactly on
        /// the parent's record.
        #[test]
        fn empty_request_converges_on_parent(
            parent_severity in severity_strategy(),
            parent_format in "[a-z]{1,8}",
        ) {
            let parent = parent_record(parent_severity, &[("format", parent_format.as_str())]);
            let ctx = child_ctx(s100(), Some(parent.clone()));
            let resolved = resolve(&ctx, &ActivationRequest::inherit()).unwrap();
            prop_assert_eq!(resolved.severity, parent.severity);
            prop_assert_eq!(&resolved.params, &parent.params);
            prop_assert_eq!(resolved.inheritance, Inheritance::Inherited);
        }
    }
}
