use crate::config::RulesSeedFile;
use anyhow::Context;
use cfo_alert::AlertEngine;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedOutcome {
    pub added: u32,
    pub replaced: u32,
    pub rejected: u32,
}

pub fn load_rules_seed(path: &str) -> anyhow::Result<RulesSeedFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read rules seed file '{path}'"))?;
    let seed: RulesSeedFile = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse rules seed file '{path}'"))?;
    Ok(seed)
}

/// Adds every seeded rule through the engine. A seed entry sharing an id
/// with an existing rule replaces it; invalid entries are skipped.
pub fn apply_rules_seed(engine: &mut AlertEngine, seed: RulesSeedFile) -> SeedOutcome {
    let mut outcome = SeedOutcome::default();

    for rule in seed.rules {
        let rule_id = rule.id.clone();
        match engine.add_rule(rule) {
            Ok(Some(_)) => outcome.replaced += 1,
            Ok(None) => outcome.added += 1,
            Err(e) => {
                tracing::warn!(rule_id = %rule_id, error = %e, "Skipping seeded alert rule");
                outcome.rejected += 1;
            }
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn seed_file_adds_and_replaces_rules() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "rules": [
                    {{"id": "runway_critical", "name": "Runway Critical", "metric": "cash_runway_months",
                      "condition": "below", "threshold": 4, "severity": "critical"}},
                    {{"id": "churn_high", "name": "High Churn", "metric": "churn_rate_percent",
                      "condition": "above", "threshold": 5, "severity": "high", "cooldown_minutes": 15,
                      "push_enabled": false}},
                    {{"id": "", "name": "Broken", "metric": "x", "condition": "above",
                      "threshold": 1, "severity": "low"}}
                ]
            }}"#
        )
        .unwrap();

        let seed = load_rules_seed(file.path().to_str().unwrap()).unwrap();
        let mut engine = AlertEngine::with_default_rules();
        let outcome = apply_rules_seed(&mut engine, seed);

        assert_eq!(
            outcome,
            SeedOutcome {
                added: 1,
                replaced: 1,
                rejected: 1
            }
        );
        assert_eq!(engine.rules().len(), 9);
        assert_eq!(engine.get_rule("runway_critical").unwrap().threshold, 4.0);

        let churn = engine.get_rule("churn_high").unwrap();
        assert_eq!(churn.cooldown_minutes, 15);
        assert!(churn.enabled);
        assert!(churn.email_enabled);
        assert!(!churn.push_enabled);
    }

    #[test]
    fn missing_seed_file_is_an_error() {
        let err = load_rules_seed("/nonexistent/rules.json").unwrap_err();
        assert!(err.to_string().contains("rules seed"));
    }
}
