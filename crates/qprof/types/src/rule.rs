//! Rule definitions as published by the rule catalog
//!
//! A `RuleDefinition` is immutable once published. The catalog owns these;
//! the activation core only reads them.

use crate::ids::RuleKey;
use crate::severity::Severity;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleStatus {
    Beta,
    Ready,
    Deprecated,
    /// Removed rules stay in the catalog for historical lookups but can no
    /// longer be activated.
    Removed,
}

/// Kind of debt remediation function attached to a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RemediationFunction {
    Linear,
    LinearOffset,
    Constant,
}

/// Debt/remediation metadata of a rule. Carried for rendering; the
/// activation algorithms never read it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Remediation {
    pub function: RemediationFunction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coefficient: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<String>,
}

/// A parameter declared on a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleParam {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Default value applied when neither the request nor a parent profile
    /// supplies one. A parameter without a default resolves to no value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

impl RuleParam {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            default_value: None,
        }
    }

    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// An immutable rule definition.
///
/// Parameters keep their declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleDefinition {
    pub key: RuleKey,
    pub name: String,
    /// Intrinsic severity, used when activation does not inherit one.
    pub severity: Severity,
    pub status: RuleStatus,
    /// Template rules are blueprints for instantiated rules and cannot be
    /// activated directly.
    pub is_template: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation: Option<Remediation>,
    pub params: Vec<RuleParam>,
}

impl RuleDefinition {
    pub fn new(key: RuleKey, name: impl Into<String>, severity: Severity) -> Self {
        Self {
            key,
            name: name.into(),
            severity,
            status: RuleStatus::Ready,
            is_template: false,
            remediation: None,
            params: Vec::new(),
        }
    }

    pub fn with_status(mut self, status: RuleStatus) -> Self {
        self.status = status;
        self
    }

    pub fn as_template(mut self) -> Self {
        self.is_template = true;
        self
    }

    pub fn with_remediation(mut self, remediation: Remediation) -> Self {
        self.remediation = Some(remediation);
        self
    }

    pub fn with_param(mut self, param: RuleParam) -> Self {
        self.params.push(param);
        self
    }

    /// Look up a declared parameter by name.
    pub fn param(&self, name: &str) -> Option<&RuleParam> {
        self.params.iter().find(|p| p.name == name)
    }
}
