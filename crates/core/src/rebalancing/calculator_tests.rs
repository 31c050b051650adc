//! Tests for the rebalance calculator.

use std::collections::HashMap;

use crate::holdings::HoldingsSummary;
use crate::keys::AssetKey;
use crate::rebalancing::RebalanceCalculator;

fn summary(present_value: f64) -> HoldingsSummary {
    HoldingsSummary {
        present_value,
        cost_basis: present_value,
        count: 1,
    }
}

fn allocation(entries: &[(&str, f64)]) -> HashMap<AssetKey, f64> {
    entries.iter().map(|(k, v)| ((*k).into(), *v)).collect()
}

fn holdings(entries: &[(&str, f64)]) -> HashMap<AssetKey, HoldingsSummary> {
    entries.iter().map(|(k, v)| ((*k).into(), summary(*v))).collect()
}

#[test]
fn test_diff_is_target_minus_current() {
    let calculator = RebalanceCalculator::new();
    let diffs = calculator.calculate(
        &allocation(&[("us total", 0.6), ("bonds", 0.4)]),
        &holdings(&[("us total", 5_000.0), ("bonds", 5_000.0)]),
        10_000.0,
    );

    assert_eq!(diffs.len(), 2);
    assert!((diffs["us total"] - 1_000.0).abs() < 1e-9);
    assert!((diffs["bonds"] + 1_000.0).abs() < 1e-9);
}

#[test]
fn test_orphan_holdings_are_fully_liquidated() {
    let calculator = RebalanceCalculator::new();
    let diffs = calculator.calculate(
        &allocation(&[("us total", 1.0)]),
        &holdings(&[("us total", 7_000.0), ("gold", 3_000.0)]),
        10_000.0,
    );

    assert!((diffs["us total"] - 3_000.0).abs() < 1e-9);
    assert!((diffs["gold"] + 3_000.0).abs() < 1e-9);
}

#[test]
fn test_cash_is_excluded_on_both_sides() {
    let calculator = RebalanceCalculator::new();
    let diffs = calculator.calculate(
        &allocation(&[("us total", 0.5), ("cash", 0.5)]),
        &holdings(&[("$cash:usd", 2_000.0), ("us total", 3_000.0)]),
        10_000.0,
    );

    assert_eq!(diffs.len(), 1);
    assert!((diffs["us total"] - 2_000.0).abs() < 1e-9);
}

#[test]
fn test_near_zero_diffs_are_dropped() {
    let calculator = RebalanceCalculator::new();
    let diffs = calculator.calculate(
        &allocation(&[("us total", 0.5)]),
        &holdings(&[("us total", 5_000.0005)]),
        10_000.0,
    );
    assert!(diffs.is_empty());
}

#[test]
fn test_round_trip_reproduces_target_dollars() {
    let calculator = RebalanceCalculator::new();
    let target = allocation(&[("us total", 0.55), ("intl", 0.25), ("bonds", 0.2)]);
    let current = holdings(&[("us total", 4_200.0), ("intl", 3_100.0), ("bonds", 2_700.0)]);
    let total = 10_000.0;

    let diffs = calculator.calculate(&target, &current, total);

    for (asset, fraction) in &target {
        let held = current.get(asset).map(|s| s.present_value).unwrap_or(0.0);
        let diff = diffs.get(asset).copied().unwrap_or(0.0);
        assert!((held + diff - fraction * total).abs() < 0.001);
    }
}
