//! Notification delivery for fired alert events.
//!
//! Alert events are handed to the [`NotificationChannel`] registered for
//! each [`routing::ChannelKind`] the originating rule has enabled. Channels
//! run synchronously inside the evaluation pass; a failing or panicking
//! channel is recorded and logged but never interrupts the caller.

pub mod channels;
pub mod error;
pub mod manager;
pub mod routing;
pub mod utils;


use anyhow::Result;
use cfo_common::types::{AlertEvent, AlertRule};

/// A notification delivery channel (e.g. email, push).
///
/// Implementations are registered in the
/// [`manager::NotificationDispatcher`] under a [`routing::ChannelKind`].
pub trait NotificationChannel: Send + Sync {
    /// Delivers the event fired by `rule` through this channel.
    ///
    /// # Errors
    ///
    /// Returns an error if delivery fails. The dispatcher logs it and moves
    /// on to the next channel.
    fn send(&self, event: &AlertEvent, rule: &AlertRule) -> Result<()>;

    /// Returns the channel type name (e.g., `"email"`, `"push"`).
    fn channel_name(&self) -> &str;
}
