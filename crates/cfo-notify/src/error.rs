use crate::routing::ChannelKind;

/// Errors that can occur while delivering a notification.
///
/// These are never propagated out of an evaluation pass; the dispatcher
/// collects them into a [`crate::manager::DispatchReport`].
///
/// # Examples
///
/// ```rust
/// use cfo_notify::error::NotifyError;
/// use cfo_notify::routing::ChannelKind;
///
/// let err = NotifyError::HandlerFailed {
///     channel: ChannelKind::Email,
///     reason: "smtp timeout".to_string(),
/// };
/// assert!(err.to_string().contains("email"));
/// assert_eq!(err.channel(), ChannelKind::Email);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotifyError {
    /// The channel returned an error.
    #[error("Notify: {channel} handler failed: {reason}")]
    HandlerFailed { channel: ChannelKind, reason: String },

    /// The channel panicked while sending.
    #[error("Notify: {channel} handler panicked: {reason}")]
    HandlerPanicked { channel: ChannelKind, reason: String },
}

impl NotifyError {
    pub fn channel(&self) -> ChannelKind {
        match self {
            NotifyError::HandlerFailed { channel, .. }
            | NotifyError::HandlerPanicked { channel, .. } => *channel,
        }
    }
}
