use crate::config::ServerConfig;
use crate::rule_seed;
use cfo_alert::store::RuleStore;
use cfo_alert::AlertEngine;
use cfo_notify::channels::log::LogChannel;
use cfo_notify::manager::NotificationDispatcher;
use cfo_notify::routing::ChannelKind;
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub struct AppState {
    pub alert_engine: Arc<Mutex<AlertEngine>>,
    pub start_time: DateTime<Utc>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(engine: AlertEngine, config: ServerConfig) -> Self {
        Self {
            alert_engine: Arc::new(Mutex::new(engine)),
            start_time: Utc::now(),
            config: Arc::new(config),
        }
    }

    /// Locks the engine. A poisoned lock is recovered since every engine
    /// mutation leaves it consistent.
    pub fn engine(&self) -> MutexGuard<'_, AlertEngine> {
        self.alert_engine
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Builds the alert engine described by `config`: built-in rules, the
/// optional rules seed file and the log-backed notification channels.
pub fn build_alert_engine(config: &ServerConfig) -> anyhow::Result<AlertEngine> {
    let rules = if config.alert.load_default_rules {
        RuleStore::with_default_rules()
    } else {
        RuleStore::new()
    };

    let mut notifier = NotificationDispatcher::new(config.notification.delivery_log_capacity);
    for kind in ChannelKind::ALL {
        let enabled = match kind {
            ChannelKind::Email => config.notification.email_enabled,
            ChannelKind::Push => config.notification.push_enabled,
        };
        if enabled {
            notifier.register(kind, Box::new(LogChannel::new(kind)));
        } else {
            tracing::info!(channel = %kind, "Notification channel disabled");
        }
    }

    let mut engine = AlertEngine::new(rules, notifier);

    if let Some(path) = &config.alert.rules_seed {
        let seed = rule_seed::load_rules_seed(path)?;
        let outcome = rule_seed::apply_rules_seed(&mut engine, seed);
        tracing::info!(
            path = %path,
            added = outcome.added,
            replaced = outcome.replaced,
            rejected = outcome.rejected,
            "Rules seed applied"
        );
    }

    Ok(engine)
}
