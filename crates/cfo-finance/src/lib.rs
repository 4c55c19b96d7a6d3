//! Stateless financial calculations backing the CFO dashboard.
//!
//! Every function here is pure. The [`snapshot::FinancialSnapshot`] type
//! turns raw financial inputs into the metric map consumed by the alert
//! engine.

pub mod budget;
pub mod dataset;
pub mod error;
pub mod forecast;
pub mod kpi;
pub mod metrics;
pub mod report;
pub mod snapshot;

#[cfg(test)]
mod tests;

pub use error::{FinanceError, Result};
