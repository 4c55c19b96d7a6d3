//! Alert rule engine for financial dashboard metrics.
//!
//! The engine owns an ordered [`store::RuleStore`] and an append-only
//! [`event_log::EventLog`]. Each evaluation pass walks the enabled rules in
//! store order, applies the per-rule cooldown, evaluates the rule condition
//! against the supplied metrics and hands every fired event to the
//! notification dispatcher before appending it to the log.

pub mod defaults;
pub mod engine;
pub mod error;
pub mod event_log;
pub mod rules;
pub mod store;
pub mod summary;


pub use engine::AlertEngine;
pub use error::{AlertError, Result};
