//! Quality profiles
//!
//! Profiles form a forest: one tree per language, linked by the optional
//! parent id. A profile's parent must share its language; the hierarchy
//! collaborator enforces this on insert.

use crate::ids::ProfileId;
use serde::{Deserialize, Serialize};

/// A named, language-scoped set of activated rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityProfile {
    pub id: ProfileId,
    pub name: String,
    pub language: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<ProfileId>,
}

impl QualityProfile {
    /// Create a root profile (no parent).
    pub fn root(id: ProfileId, name: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            language: language.into(),
            parent_id: None,
        }
    }

    /// Create a child profile inheriting from `parent_id`.
    pub fn child(
        id: ProfileId,
        name: impl Into<String>,
        language: impl Into<String>,
        parent_id: ProfileId,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            language: language.into(),
            parent_id: Some(parent_id),
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_and_child_constructors() {
        let root = QualityProfile::root(ProfileId::new("java-default"), "Java Default", "java");
        assert!(root.is_root());

        let child = QualityProfile::child(
            ProfileId::new("java-strict"),
            "Java Strict",
            "java",
            root.id.clone(),
        );
        assert!(!child.is_root());
        assert_eq!(child.parent_id.as_ref(), Some(&root.id));
    }
}
