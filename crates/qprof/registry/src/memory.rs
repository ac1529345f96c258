//! In-memory implementations of the collaborator traits
//!
//! These are suitable for development and testing. Production deployments
//! should use persistent backends that implement the same traits.

use crate::catalog::RuleCatalog;
use crate::error::{RegistryError, Result};
use crate::hierarchy::ProfileHierarchy;
use crate::store::ActiveRuleStore;
use dashmap::DashMap;
use qprof_types::{
    ActiveRule, ChangeOp, ChangeSet, ProfileId, QualityProfile, RuleDefinition, RuleKey,
};
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::{debug, info};

/// In-memory rule catalog
#[derive(Default)]
pub struct InMemoryRuleCatalog {
    rules: DashMap<RuleKey, RuleDefinition>,
}

impl InMemoryRuleCatalog {
    pub fn new() -> Self {
        Self {
            rules: DashMap::new(),
        }
    }

    /// Publish a rule definition. Rules are immutable once published.
    pub fn publish(&self, rule: RuleDefinition) -> Result<()> {
        let key = rule.key.clone();
        if self.rules.contains_key(&key) {
            return Err(RegistryError::RuleAlreadyExists(key));
        }
        info!(rule = %key, severity = %rule.severity, "Rule published");
        self.rules.insert(key, rule);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl RuleCatalog for InMemoryRuleCatalog {
    fn rule(&self, key: &RuleKey) -> Result<RuleDefinition> {
        self.rules
            .get(key)
            .map(|r| r.clone())
            .ok_or_else(|| RegistryError::RuleNotFound(key.clone()))
    }
}

/// In-memory profile hierarchy
///
/// Enforces on insert what the core assumes as a precondition: a known
/// parent, matching languages, no self-parenting.
#[derive(Default)]
pub struct InMemoryProfileHierarchy {
    profiles: DashMap<ProfileId, QualityProfile>,
    children: DashMap<ProfileId, Vec<ProfileId>>,
}

impl InMemoryProfileHierarchy {
    pub fn new() -> Self {
        Self {
            profiles: DashMap::new(),
            children: DashMap::new(),
        }
    }

    /// Insert a profile, validating its parent link.
    pub fn insert(&self, profile: QualityProfile) -> Result<()> {
        if self.profiles.contains_key(&profile.id) {
            return Err(RegistryError::ProfileAlreadyExists(profile.id));
        }
        if let Some(parent_id) = &profile.parent_id {
            if parent_id == &profile.id {
                return Err(RegistryError::SelfParent(profile.id));
            }
            let parent = self
                .profiles
                .get(parent_id)
                .ok_or_else(|| RegistryError::ProfileNotFound(parent_id.clone()))?;
            if parent.language != profile.language {
                return Err(RegistryError::LanguageMismatch {
                    child: profile.id.clone(),
                    child_language: profile.language.clone(),
                    parent: parent_id.clone(),
                    parent_language: parent.language.clone(),
                });
            }
            drop(parent);
            self.children
                .entry(parent_id.clone())
                .or_default()
                .push(profile.id.clone());
        }
        debug!(profile = %profile.id, language = %profile.language, "Profile registered");
        self.profiles.insert(profile.id.clone(), profile);
        Ok(())
    }
}

impl ProfileHierarchy for InMemoryProfileHierarchy {
    fn profile(&self, id: &ProfileId) -> Result<QualityProfile> {
        self.profiles
            .get(id)
            .map(|p| p.clone())
            .ok_or_else(|| RegistryError::ProfileNotFound(id.clone()))
    }

    fn children(&self, id: &ProfileId) -> Result<Vec<ProfileId>> {
        if !self.profiles.contains_key(id) {
            return Err(RegistryError::ProfileNotFound(id.clone()));
        }
        Ok(self
            .children
            .get(id)
            .map(|c| c.clone())
            .unwrap_or_default())
    }
}

/// In-memory active-rule store
///
/// A single `RwLock` guards the whole map so that `apply` can validate every
/// prior snapshot and commit the batch under one write lock.
#[derive(Default)]
pub struct InMemoryActiveRuleStore {
    records: RwLock<HashMap<(ProfileId, RuleKey), ActiveRule>>,
}

impl InMemoryActiveRuleStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ActiveRuleStore for InMemoryActiveRuleStore {
    fn get(&self, rule: &RuleKey, profile: &ProfileId) -> Result<Option<ActiveRule>> {
        let records = self.records.read().map_err(|_| RegistryError::Lock)?;
        Ok(records.get(&(profile.clone(), rule.clone())).cloned())
    }

    fn for_profile(&self, profile: &ProfileId) -> Result<Vec<ActiveRule>> {
        let records = self.records.read().map_err(|_| RegistryError::Lock)?;
        let mut rules: Vec<ActiveRule> = records
            .values()
            .filter(|r| &r.profile_id == profile)
            .cloned()
            .collect();
        rules.sort_by(|a, b| a.rule_key.cmp(&b.rule_key));
        Ok(rules)
    }

    fn apply(&self, changes: &ChangeSet) -> Result<()> {
        let mut records = self.records.write().map_err(|_| RegistryError::Lock)?;

        // Validate every prior snapshot before mutating anything.
        for entry in &changes.entries {
            let key = (entry.profile_id.clone(), entry.rule_key.clone());
            if records.get(&key) != entry.prior.as_ref() {
                return Err(RegistryError::ConcurrentModification {
                    rule: entry.rule_key.clone(),
                    profile: entry.profile_id.clone(),
                });
            }
        }

        for entry in &changes.entries {
            let key = (entry.profile_id.clone(), entry.rule_key.clone());
            match &entry.op {
                ChangeOp::Upsert(state) => {
                    records.insert(key, state.clone());
                }
                ChangeOp::Remove => {
                    records.remove(&key);
                }
            }
        }
        info!(
            rule = %changes.rule_key,
            origin = %changes.origin,
            entries = changes.len(),
            "Change set applied"
        );
        Ok(())
    }
}
