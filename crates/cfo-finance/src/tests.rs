use crate::budget::{analyze_budget, BudgetItem};
use crate::dataset::{sample_dataset, validate, DatasetRecords};
use crate::error::FinanceError;
use crate::forecast::{
    forecast_cash_flow, scenario_analysis, DEFAULT_OPTIMISTIC_MULTIPLIER,
    DEFAULT_PESSIMISTIC_MULTIPLIER, MAX_FORECAST_MONTHS,
};
use crate::kpi::{calculate_trend, PerformanceStatus, TrendDirection};
use crate::metrics::{self, CashFlowItem, CashFlowKind, RunwayEstimate};
use crate::report::{financial_report, summarize_cash_flow};
use crate::snapshot::{self, FinancialSnapshot};
use std::collections::BTreeMap;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

#[test]
fn runway_is_infinite_without_burn() {
    assert_eq!(metrics::runway(100.0, 0.0), None);
    assert_eq!(metrics::runway(100.0, -5.0), None);
    assert_eq!(metrics::runway(300_000.0, 100_000.0), Some(3.0));

    let estimate = RunwayEstimate::new(1_000.0, 0.0);
    assert!(estimate.is_infinite());
    let json = serde_json::to_value(estimate).unwrap();
    assert!(json["runway_months"].is_null());
}

#[test]
fn burn_rate_and_mrr_from_cash_flow() {
    let items = sample_dataset().cash_flow_data;
    assert!(approx(metrics::burn_rate(&items, 1), 67_000.0));
    assert!(approx(metrics::burn_rate(&items, 3), 22_333.333333));
    assert_eq!(metrics::burn_rate(&items, 0), 0.0);
    assert_eq!(metrics::mrr(&items), 75_000.0);
}

#[test]
fn negative_outflow_amounts_still_count_as_burn() {
    let mut items = sample_dataset().cash_flow_data;
    items[1].amount = -50_000.0;
    assert!(approx(metrics::burn_rate(&items, 1), 67_000.0));
}

#[test]
fn ratio_helpers_guard_zero_denominators() {
    assert_eq!(metrics::gross_margin(0.0, 10.0), 0.0);
    assert!(approx(metrics::gross_margin(75_000.0, 23_625.0), 68.5));
    assert_eq!(metrics::cac(10_000.0, 0), 0.0);
    assert_eq!(metrics::cac(15_000.0, 100), 150.0);
    assert_eq!(metrics::burn_multiple(100.0, 0.0), None);
    assert_eq!(metrics::burn_multiple(150.0, 100.0), Some(1.5));
}

#[test]
fn budget_item_variance_and_progress() {
    let item = BudgetItem {
        id: "1".into(),
        category: "Personnel".into(),
        budgeted: 50_000.0,
        actual: 52_000.0,
        month: "2025-01".into(),
    };
    assert!(approx(item.variance(), 4.0));
    assert!(approx(item.progress(), 104.0));

    let zero = BudgetItem {
        budgeted: 0.0,
        ..item
    };
    assert_eq!(zero.variance(), 0.0);
    assert_eq!(zero.progress(), 0.0);
}

#[test]
fn budget_analysis_groups_categories_in_first_seen_order() {
    let mut items = sample_dataset().budget_data;
    items.push(BudgetItem {
        id: "5".into(),
        category: "Marketing".into(),
        budgeted: 5_000.0,
        actual: 6_000.0,
        month: "2025-02".into(),
    });

    let analysis = analyze_budget(&items);
    let order: Vec<&str> = analysis
        .categories
        .iter()
        .map(|c| c.category.as_str())
        .collect();
    assert_eq!(order, vec!["Personnel", "Marketing", "Operations", "R&D"]);

    let marketing = &analysis.categories[1];
    assert_eq!(marketing.items.len(), 2);
    assert_eq!(marketing.budgeted, 20_000.0);
    assert_eq!(marketing.actual, 18_000.0);
    assert!(approx(marketing.variance, -10.0));

    assert_eq!(analysis.total_budgeted, 98_000.0);
    assert_eq!(analysis.total_actual, 96_500.0);
}

#[test]
fn budget_analysis_of_empty_input_has_zero_variance() {
    let analysis = analyze_budget(&[]);
    assert_eq!(analysis.total_variance, 0.0);
    assert!(analysis.categories.is_empty());
}

#[test]
fn forecast_rolls_balance_forward() {
    let rows = forecast_cash_flow(100_000.0, 20_000.0, 30_000.0, 3).unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].month, 1);
    assert_eq!(rows[0].starting_balance, 100_000.0);
    assert_eq!(rows[0].ending_balance, 90_000.0);
    assert_eq!(rows[2].starting_balance, 80_000.0);
    assert_eq!(rows[2].ending_balance, 70_000.0);
    assert!(rows.iter().all(|r| r.net_flow == -10_000.0));

    assert!(forecast_cash_flow(1.0, 1.0, 1.0, 0).unwrap().is_empty());
}

#[test]
fn forecast_rejects_bad_input() {
    let err = forecast_cash_flow(0.0, 0.0, 0.0, MAX_FORECAST_MONTHS + 1).unwrap_err();
    assert!(matches!(err, FinanceError::InvalidInput { field: "months", .. }));

    let err = forecast_cash_flow(f64::NAN, 0.0, 0.0, 12).unwrap_err();
    assert!(err.to_string().contains("current_balance"));
}

#[test]
fn scenarios_scale_every_value_and_compute_runway() {
    let base: BTreeMap<String, f64> = [
        ("cash_balance", 500_000.0),
        ("monthly_burn", 50_000.0),
        ("monthly_revenue", 80_000.0),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect();

    let analysis = scenario_analysis(
        &base,
        DEFAULT_OPTIMISTIC_MULTIPLIER,
        DEFAULT_PESSIMISTIC_MULTIPLIER,
    )
    .unwrap();

    assert_eq!(analysis.base_case.values, base);
    assert!(approx(analysis.optimistic.values["monthly_revenue"], 96_000.0));
    assert!(approx(analysis.pessimistic.values["cash_balance"], 400_000.0));
    for scenario in [&analysis.base_case, &analysis.optimistic, &analysis.pessimistic] {
        let months = scenario.runway.unwrap().runway_months.unwrap();
        assert!(approx(months, 10.0));
    }
}

#[test]
fn scenarios_without_runway_inputs_omit_runway() {
    let base: BTreeMap<String, f64> = [("monthly_revenue".to_string(), 10.0)].into();
    let analysis = scenario_analysis(&base, 1.5, 0.5).unwrap();
    assert!(analysis.optimistic.runway.is_none());
    let json = serde_json::to_value(&analysis).unwrap();
    assert!(json["optimistic"].get("runway").is_none());

    assert!(scenario_analysis(&base, -1.0, 0.5).is_err());
}

#[test]
fn kpi_status_thresholds() {
    let kpis = sample_dataset().kpi_data;
    let statuses: Vec<PerformanceStatus> = kpis.iter().map(|k| k.performance_status()).collect();
    assert_eq!(
        statuses,
        vec![
            PerformanceStatus::Excellent,
            PerformanceStatus::Excellent,
            PerformanceStatus::Excellent,
            PerformanceStatus::Good,
        ]
    );

    let mut kpi = kpis[0].clone();
    kpi.target = 0.0;
    assert_eq!(kpi.progress_percentage(), 0.0);
    assert_eq!(kpi.performance_status(), PerformanceStatus::NeedsImprovement);
    assert_eq!(
        serde_json::to_string(&PerformanceStatus::NeedsImprovement).unwrap(),
        "\"needs_improvement\""
    );
}

#[test]
fn trend_of_last_two_values() {
    let t = calculate_trend(&[50.0, 100.0, 90.0]);
    assert_eq!(t.trend, TrendDirection::Down);
    assert_eq!(t.change, -10.0);
    assert_eq!(t.latest_value, Some(90.0));
    assert_eq!(t.previous_value, Some(100.0));

    let t = calculate_trend(&[100.0, 100.5]);
    assert_eq!(t.trend, TrendDirection::Stable);
    assert_eq!(t.change, 0.5);

    let t = calculate_trend(&[3.0, 4.0]);
    assert_eq!(t.change, 33.33);
}

#[test]
fn trend_with_zero_previous_or_short_history_is_stable() {
    assert_eq!(calculate_trend(&[0.0, 5.0]).trend, TrendDirection::Stable);
    assert_eq!(calculate_trend(&[0.0, 5.0]).change, 0.0);
    let empty = calculate_trend(&[]);
    assert_eq!(empty.trend, TrendDirection::Stable);
    assert_eq!(empty.latest_value, None);
}

#[test]
fn sample_dataset_passes_validation() {
    let json = serde_json::to_value(sample_dataset()).unwrap();
    assert_eq!(json["cash_flow_data"][0]["type"], "inflow");

    let records: DatasetRecords = serde_json::from_value(json).unwrap();
    let report = validate(&records);
    assert!(report.is_valid());
    assert!(report.warnings.is_empty());
}

#[test]
fn validation_reports_errors_and_warnings() {
    let records: DatasetRecords = serde_json::from_value(serde_json::json!({
        "budget_data": [{"id": "b1", "category": "", "budgeted": -5.0}],
        "cash_flow_data": [{"id": "c1", "type": "transfer", "amount": 0.0}],
        "kpi_data": [{"target": 10.0}, {"id": "k2", "name": "NPS"}]
    }))
    .unwrap();

    let report = validate(&records);
    assert_eq!(
        report.errors,
        vec![
            "Budget item b1 missing category",
            "Cash flow item c1 has invalid type",
            "KPI item unknown missing name",
        ]
    );
    assert_eq!(
        report.warnings,
        vec![
            "Budget item b1 has negative budgeted amount",
            "Cash flow item c1 has zero or negative amount",
            "KPI item k2 has zero or negative target",
        ]
    );
    assert!(!report.is_valid());
}

#[test]
fn validation_of_empty_dataset_is_clean() {
    let report = validate(&DatasetRecords::default());
    assert!(report.is_valid());
    assert!(report.warnings.is_empty());
}

#[test]
fn snapshot_derives_alert_metrics() {
    let data = sample_dataset();
    let snap = FinancialSnapshot {
        cash_balance: Some(200_000.0),
        monthly_burn_rate: Some(120_000.0),
        cogs: Some(23_625.0),
        marketing_spend: Some(15_000.0),
        new_customers: Some(100),
        budget_items: data.budget_data,
        cash_flow_items: data.cash_flow_data,
        ..Default::default()
    };

    let m = snap.alert_metrics();
    assert_eq!(m.len(), 7);
    assert_eq!(m[snapshot::CASH_BALANCE], 200_000.0);
    assert_eq!(m[snapshot::MONTHLY_BURN_RATE], 120_000.0);
    assert!(approx(m[snapshot::CASH_RUNWAY_MONTHS], 200_000.0 / 120_000.0));
    assert_eq!(m[snapshot::MONTHLY_REVENUE], 75_000.0);
    assert!(approx(m[snapshot::GROSS_MARGIN_PERCENT], 68.5));
    assert_eq!(m[snapshot::CUSTOMER_ACQUISITION_COST], 150.0);
    assert!(approx(m[snapshot::BUDGET_VARIANCE_PERCENT], -2.688172043));
}

#[test]
fn snapshot_derives_burn_from_cash_flow_when_not_given() {
    let snap = FinancialSnapshot {
        cash_balance: Some(67_000.0),
        cash_flow_items: sample_dataset().cash_flow_data,
        burn_months: 1,
        ..Default::default()
    };
    let m = snap.alert_metrics();
    assert_eq!(m[snapshot::MONTHLY_BURN_RATE], 67_000.0);
    assert_eq!(m[snapshot::CASH_RUNWAY_MONTHS], 1.0);
}

#[test]
fn snapshot_omits_metrics_without_inputs() {
    let snap = FinancialSnapshot {
        cash_balance: Some(10.0),
        monthly_burn_rate: Some(0.0),
        marketing_spend: Some(1_000.0),
        new_customers: Some(0),
        ..Default::default()
    };
    let m = snap.alert_metrics();
    assert!(!m.contains_key(snapshot::CASH_RUNWAY_MONTHS));
    assert!(!m.contains_key(snapshot::CUSTOMER_ACQUISITION_COST));
    assert!(!m.contains_key(snapshot::MONTHLY_REVENUE));
    assert_eq!(m.len(), 2);

    assert!(FinancialSnapshot::default().alert_metrics().is_empty());
}

#[test]
fn snapshot_reports_burn_multiple_when_arr_was_added() {
    let snap = FinancialSnapshot {
        monthly_burn_rate: Some(150_000.0),
        net_new_arr: Some(100_000.0),
        ..Default::default()
    };
    let m = snap.alert_metrics();
    assert_eq!(m[snapshot::BURN_MULTIPLE], 1.5);

    let no_growth = FinancialSnapshot {
        monthly_burn_rate: Some(150_000.0),
        net_new_arr: Some(0.0),
        ..Default::default()
    };
    assert!(!no_growth.alert_metrics().contains_key(snapshot::BURN_MULTIPLE));
}

#[test]
fn cash_flow_summary_totals_sample_data() {
    let summary = summarize_cash_flow(&sample_dataset().cash_flow_data);
    assert_eq!(summary.total_inflow, 75_000.0);
    assert_eq!(summary.total_outflow, 67_000.0);
    assert_eq!(summary.net_flow, 8_000.0);
}

#[test]
fn cash_flow_summary_ignores_amount_sign() {
    let refund = CashFlowItem {
        id: "r1".to_string(),
        description: "Vendor refund booked negative".to_string(),
        amount: -2_000.0,
        category: "Operations".to_string(),
        kind: CashFlowKind::Outflow,
        date: "2025-01-20".to_string(),
        recurring: false,
    };
    let summary = summarize_cash_flow(&[refund]);
    assert_eq!(summary.total_inflow, 0.0);
    assert_eq!(summary.total_outflow, 2_000.0);
    assert_eq!(summary.net_flow, -2_000.0);
}

#[test]
fn financial_report_bundles_sections() {
    let data = sample_dataset();
    let report = financial_report(&data.budget_data, &data.cash_flow_data, &data.kpi_data);

    assert_eq!(report.budget_analysis.total_budgeted, 93_000.0);
    assert_eq!(report.budget_analysis.categories.len(), 4);
    assert_eq!(report.kpi_summary, data.kpi_data);
    assert_eq!(report.cash_flow_summary.net_flow, 8_000.0);

    let empty = financial_report(&[], &[], &[]);
    assert_eq!(empty.cash_flow_summary, Default::default());
    assert!(empty.kpi_summary.is_empty());
}
