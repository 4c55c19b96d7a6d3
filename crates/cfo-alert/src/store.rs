use crate::defaults::default_rules;
use cfo_common::types::AlertRule;

/// Ordered collection of alert rules with unique ids.
#[derive(Debug, Clone, Default)]
pub struct RuleStore {
    rules: Vec<AlertRule>,
}

impl RuleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store seeded with [`default_rules`].
    pub fn with_default_rules() -> Self {
        let mut store = Self::new();
        for rule in default_rules() {
            store.add(rule);
        }
        store
    }

    /// Inserts `rule` at the end of the store.
    ///
    /// A rule with the same id is removed first and returned; its cooldown
    /// state is discarded along with it.
    pub fn add(&mut self, rule: AlertRule) -> Option<AlertRule> {
        let replaced = self.take(&rule.id);
        self.rules.push(rule);
        replaced
    }

    /// Remove a rule by ID. Returns true if found and removed.
    pub fn remove(&mut self, id: &str) -> bool {
        self.take(id).is_some()
    }

    /// Remove and return a rule by ID.
    pub fn take(&mut self, id: &str) -> Option<AlertRule> {
        let pos = self.rules.iter().position(|r| r.id == id)?;
        Some(self.rules.remove(pos))
    }

    pub fn get(&self, id: &str) -> Option<&AlertRule> {
        self.rules.iter().find(|r| r.id == id)
    }

    pub fn set_enabled(&mut self, id: &str, enabled: bool) -> bool {
        match self.rules.iter_mut().find(|r| r.id == id) {
            Some(rule) => {
                rule.enabled = enabled;
                true
            }
            None => false,
        }
    }

    pub fn rules(&self) -> &[AlertRule] {
        &self.rules
    }

    pub(crate) fn iter_mut(&mut self) -> std::slice::IterMut<'_, AlertRule> {
        self.rules.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn enabled_count(&self) -> usize {
        self.rules.iter().filter(|r| r.enabled).count()
    }
}
