use serde::{Deserialize, Serialize};

/// Changes smaller than this many percent count as stable.
pub const STABLE_BAND_PERCENT: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Stable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceStatus {
    Excellent,
    Good,
    NeedsImprovement,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Kpi {
    pub id: String,
    pub name: String,
    pub value: f64,
    pub target: f64,
    pub unit: String,
    pub trend: TrendDirection,
    /// Last reported change, in percent
    pub change: f64,
}

impl Kpi {
    /// Value as a percentage of target; zero target yields zero.
    pub fn progress_percentage(&self) -> f64 {
        if self.target == 0.0 {
            return 0.0;
        }
        self.value / self.target * 100.0
    }

    pub fn performance_status(&self) -> PerformanceStatus {
        let progress = self.progress_percentage();
        if progress >= 90.0 {
            PerformanceStatus::Excellent
        } else if progress >= 70.0 {
            PerformanceStatus::Good
        } else {
            PerformanceStatus::NeedsImprovement
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Trend {
    pub trend: TrendDirection,
    /// Percent change of the last value over the one before, two decimals
    pub change: f64,
    pub latest_value: Option<f64>,
    pub previous_value: Option<f64>,
}

/// Trend of the last value relative to the previous one.
///
/// # Examples
///
/// ```
/// use cfo_finance::kpi::{calculate_trend, TrendDirection};
///
/// let t = calculate_trend(&[100.0, 110.0]);
/// assert_eq!(t.trend, TrendDirection::Up);
/// assert_eq!(t.change, 10.0);
///
/// assert_eq!(calculate_trend(&[42.0]).trend, TrendDirection::Stable);
/// ```
pub fn calculate_trend(values: &[f64]) -> Trend {
    let [.., previous, latest] = values else {
        return Trend {
            trend: TrendDirection::Stable,
            change: 0.0,
            latest_value: None,
            previous_value: None,
        };
    };

    let change = if *previous == 0.0 {
        0.0
    } else {
        (latest - previous) / previous * 100.0
    };

    let trend = if change.abs() < STABLE_BAND_PERCENT {
        TrendDirection::Stable
    } else if change > 0.0 {
        TrendDirection::Up
    } else {
        TrendDirection::Down
    };

    Trend {
        trend,
        change: (change * 100.0).round() / 100.0,
        latest_value: Some(*latest),
        previous_value: Some(*previous),
    }
}
