use crate::routing::ChannelKind;
use crate::NotificationChannel;
use anyhow::Result;
use cfo_common::types::{AlertEvent, AlertRule};

/// Writes the alert to the tracing log instead of an external service.
///
/// Used as the default email and push channel until real delivery backends
/// are wired in.
pub struct LogChannel {
    kind: ChannelKind,
    name: String,
}

impl LogChannel {
    pub fn new(kind: ChannelKind) -> Self {
        Self {
            kind,
            name: kind.to_string(),
        }
    }
}

impl NotificationChannel for LogChannel {
    fn send(&self, event: &AlertEvent, rule: &AlertRule) -> Result<()> {
        tracing::info!(
            channel = %self.kind,
            event_id = %event.id,
            rule_id = %rule.id,
            severity = %event.severity,
            "{} ALERT: {}",
            self.name.to_uppercase(),
            event.message
        );
        Ok(())
    }

    fn channel_name(&self) -> &str {
        &self.name
    }
}
