/// Errors returned by the [`crate::AlertEngine`] facade.
///
/// Missing metrics and zero-division during evaluation are not errors; the
/// affected rule is skipped for that pass.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AlertError {
    #[error("alert rule '{0}' not found")]
    RuleNotFound(String),

    #[error("alert event '{0}' not found")]
    EventNotFound(String),

    #[error("invalid alert rule: {0}")]
    InvalidRule(String),
}

impl AlertError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, AlertError::RuleNotFound(_) | AlertError::EventNotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, AlertError>;
