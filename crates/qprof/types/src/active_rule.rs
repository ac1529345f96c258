//! Active rules: a rule enabled within a specific profile
//!
//! The parameter map holds the *effective* values produced by resolution,
//! in deterministic (sorted) order so that two records can be compared
//! byte-for-byte. A parameter that resolved to no value is absent from the
//! map.

use crate::ids::{ProfileId, RuleKey};
use crate::severity::Severity;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Where an active rule's values come from.
///
/// - `None`: the profile is a root, or the rule is not active in the parent.
/// - `Inherited`: values equal exactly what the parent profile holds.
/// - `Overridden`: values were set locally and differ from the parent's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Inheritance {
    None,
    Inherited,
    Overridden,
}

impl Inheritance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Inheritance::None => "NONE",
            Inheritance::Inherited => "INHERITED",
            Inheritance::Overridden => "OVERRIDDEN",
        }
    }
}

impl fmt::Display for Inheritance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The record of a rule being enabled within a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveRule {
    pub rule_key: RuleKey,
    pub profile_id: ProfileId,
    pub severity: Severity,
    pub params: BTreeMap<String, String>,
    pub inheritance: Inheritance,
}

impl ActiveRule {
    pub fn new(
        rule_key: RuleKey,
        profile_id: ProfileId,
        severity: Severity,
        params: BTreeMap<String, String>,
        inheritance: Inheritance,
    ) -> Self {
        Self {
            rule_key,
            profile_id,
            severity,
            params,
            inheritance,
        }
    }

    /// Whether this record carries exactly the same effective values
    /// (severity and full parameter map) as `other`. Classification is
    /// deliberately excluded: an `INHERITED` child matches its parent's
    /// record even though the parent is typically `NONE` or `OVERRIDDEN`.
    pub fn values_match(&self, other: &ActiveRule) -> bool {
        self.severity == other.severity && self.params == other.params
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}
