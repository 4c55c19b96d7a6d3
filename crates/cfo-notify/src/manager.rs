use crate::error::NotifyError;
use crate::routing::ChannelKind;
use crate::utils::{panic_message, truncate_string, MAX_ERROR_LENGTH};
use crate::NotificationChannel;
use cfo_common::types::{AlertEvent, AlertRule};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, VecDeque};
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing;

pub const DEFAULT_DELIVERY_LOG_CAPACITY: usize = 500;

/// One channel invocation for one fired event.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct DeliveryRecord {
    pub event_id: String,
    pub rule_id: String,
    pub channel: ChannelKind,
    pub success: bool,
    pub error: Option<String>,
    pub sent_at: DateTime<Utc>,
}

/// Outcome of dispatching a single event.
#[derive(Debug, Default)]
pub struct DispatchReport {
    pub delivered: Vec<ChannelKind>,
    pub failures: Vec<NotifyError>,
}

impl DispatchReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Registry of notification channels keyed by [`ChannelKind`].
///
/// At most one channel is registered per kind; registering again replaces
/// the previous channel. Channels are invoked in [`ChannelKind`] order.
pub struct NotificationDispatcher {
    channels: BTreeMap<ChannelKind, Box<dyn NotificationChannel>>,
    deliveries: VecDeque<DeliveryRecord>,
    delivery_log_capacity: usize,
}

impl NotificationDispatcher {
    pub fn new(delivery_log_capacity: usize) -> Self {
        Self {
            channels: BTreeMap::new(),
            deliveries: VecDeque::new(),
            delivery_log_capacity,
        }
    }

    pub fn register(&mut self, kind: ChannelKind, channel: Box<dyn NotificationChannel>) {
        if self.channels.insert(kind, channel).is_some() {
            tracing::warn!(channel = %kind, "Replaced existing notification channel");
        } else {
            tracing::info!(channel = %kind, "Registered notification channel");
        }
    }

    /// Remove the channel for `kind`. Returns true if one was registered.
    pub fn unregister(&mut self, kind: ChannelKind) -> bool {
        self.channels.remove(&kind).is_some()
    }

    pub fn has_channel(&self, kind: ChannelKind) -> bool {
        self.channels.contains_key(&kind)
    }

    pub fn registered(&self) -> Vec<ChannelKind> {
        self.channels.keys().copied().collect()
    }

    /// Sends `event` through every registered channel that `rule` enables.
    ///
    /// Failures and panics are logged and returned in the report; they never
    /// stop the remaining channels.
    pub fn dispatch(&mut self, event: &AlertEvent, rule: &AlertRule) -> DispatchReport {
        let mut report = DispatchReport::default();

        for (kind, channel) in &self.channels {
            if !kind.enabled_for(rule) {
                continue;
            }

            let outcome = match catch_unwind(AssertUnwindSafe(|| channel.send(event, rule))) {
                Ok(Ok(())) => Ok(()),
                Ok(Err(e)) => Err(NotifyError::HandlerFailed {
                    channel: *kind,
                    reason: truncate_string(&format!("{e:#}"), MAX_ERROR_LENGTH),
                }),
                Err(payload) => Err(NotifyError::HandlerPanicked {
                    channel: *kind,
                    reason: truncate_string(&panic_message(payload.as_ref()), MAX_ERROR_LENGTH),
                }),
            };

            let error = match outcome {
                Ok(()) => {
                    report.delivered.push(*kind);
                    None
                }
                Err(e) => {
                    tracing::error!(
                        channel = channel.channel_name(),
                        event_id = %event.id,
                        rule_id = %rule.id,
                        error = %e,
                        "Failed to send notification"
                    );
                    let msg = e.to_string();
                    report.failures.push(e);
                    Some(msg)
                }
            };

            Self::push_record(
                &mut self.deliveries,
                self.delivery_log_capacity,
                DeliveryRecord {
                    event_id: event.id.clone(),
                    rule_id: rule.id.clone(),
                    channel: *kind,
                    success: error.is_none(),
                    error,
                    sent_at: Utc::now(),
                },
            );
        }

        report
    }

    fn push_record(log: &mut VecDeque<DeliveryRecord>, capacity: usize, record: DeliveryRecord) {
        if capacity == 0 {
            return;
        }
        while log.len() >= capacity {
            log.pop_front();
        }
        log.push_back(record);
    }

    /// Delivery history, oldest first.
    pub fn deliveries(&self) -> impl DoubleEndedIterator<Item = &DeliveryRecord> + ExactSizeIterator {
        self.deliveries.iter()
    }
}

impl Default for NotificationDispatcher {
    fn default() -> Self {
        Self::new(DEFAULT_DELIVERY_LOG_CAPACITY)
    }
}
