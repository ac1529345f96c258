//! Rule catalog trait
//!
//! The catalog is the read-only source of rule definitions. Rules are
//! immutable once published; the activation core looks them up but never
//! mutates them.

use crate::error::Result;
use qprof_types::{RuleDefinition, RuleKey};

/// Read-only lookup of rule definitions.
pub trait RuleCatalog: Send + Sync {
    /// Get a rule definition by key.
    fn rule(&self, key: &RuleKey) -> Result<RuleDefinition>;

    /// Declared parameters of a rule with their default values, in
    /// declaration order.
    fn parameter_defaults(&self, key: &RuleKey) -> Result<Vec<(String, Option<String>)>> {
        let rule = self.rule(key)?;
        Ok(rule
            .params
            .into_iter()
            .map(|p| (p.name, p.default_value))
            .collect())
    }

    /// Whether the rule is a non-instantiable template.
    fn is_template(&self, key: &RuleKey) -> Result<bool> {
        Ok(self.rule(key)?.is_template)
    }
}
