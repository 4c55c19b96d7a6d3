use cfo_common::types::AlertRule;
use serde::{Deserialize, Serialize};

/// The notification channels a rule can opt into.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, utoipa::ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    Email,
    Push,
}

impl ChannelKind {
    pub const ALL: [ChannelKind; 2] = [ChannelKind::Email, ChannelKind::Push];

    /// Whether `rule` has this channel switched on.
    pub fn enabled_for(&self, rule: &AlertRule) -> bool {
        match self {
            ChannelKind::Email => rule.email_enabled,
            ChannelKind::Push => rule.push_enabled,
        }
    }
}

impl std::fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChannelKind::Email => write!(f, "email"),
            ChannelKind::Push => write!(f, "push"),
        }
    }
}

impl std::str::FromStr for ChannelKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "email" => Ok(ChannelKind::Email),
            "push" => Ok(ChannelKind::Push),
            _ => Err(format!("unknown channel kind: {s}")),
        }
    }
}
