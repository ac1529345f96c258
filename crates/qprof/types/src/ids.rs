//! Strongly-typed identifiers for qprof entities

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Key of a rule: the repository that publishes it plus the rule's own key
/// within that repository. Rendered as `repository:rule`, e.g. `squid:S100`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RuleKey {
    repository: String,
    rule: String,
}

impl RuleKey {
    pub fn new(repository: impl Into<String>, rule: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            rule: rule.into(),
        }
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    pub fn rule(&self) -> &str {
        &self.rule
    }
}

impl fmt::Display for RuleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.repository, self.rule)
    }
}

/// Error parsing a `repository:rule` string.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid rule key: {0:?} (expected \"repository:rule\")")]
pub struct RuleKeyParseError(pub String);

impl FromStr for RuleKey {
    type Err = RuleKeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((repo, rule)) if !repo.is_empty() && !rule.is_empty() => {
                Ok(Self::new(repo, rule))
            }
            _ => Err(RuleKeyParseError(s.to_string())),
        }
    }
}

/// Unique identifier for a quality profile
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProfileId(String);

impl ProfileId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "profile:{}", self.0)
    }
}
