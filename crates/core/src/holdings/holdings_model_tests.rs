//! Tests for holdings aggregation and liquidation ordering.

use crate::holdings::{
    sorted_for_liquidation, summarize_by_asset, total_present_value, Holding,
};

fn lot(id: &str, asset: &str, present_value: f64, cost_basis: Option<f64>) -> Holding {
    Holding {
        id: id.to_string(),
        account: "brokerage".into(),
        asset: asset.into(),
        security: "vti".into(),
        share_count: 10.0,
        present_value,
        cost_basis,
    }
}

#[test]
fn test_gain_loss_requires_cost_basis() {
    assert_eq!(lot("a", "us total", 1200.0, Some(1000.0)).gain_loss(), Some(200.0));
    assert_eq!(lot("a", "us total", 1200.0, None).gain_loss(), None);
}

#[test]
fn test_summarize_by_asset_buckets_and_counts() {
    let holdings = vec![
        lot("a", "US Total", 1000.0, Some(800.0)),
        lot("b", "us  total", 500.0, Some(600.0)),
        lot("c", "bonds", 200.0, None),
    ];

    let summaries = summarize_by_asset(&holdings);
    assert_eq!(summaries.len(), 2);

    let us = summaries.get("us total").unwrap();
    assert_eq!(us.count, 2);
    assert!((us.present_value - 1500.0).abs() < 1e-9);
    assert!((us.gain_loss() - 100.0).abs() < 1e-9);

    // Unknown basis contributes as zero gain.
    let bonds = summaries.get("bonds").unwrap();
    assert!((bonds.gain_loss() - 0.0).abs() < 1e-9);
}

#[test]
fn test_total_present_value() {
    let holdings = vec![
        lot("a", "us total", 1000.0, None),
        lot("b", "bonds", 250.0, None),
    ];
    assert!((total_present_value(&holdings) - 1250.0).abs() < 1e-9);
}

#[test]
fn test_sorted_for_liquidation_losses_first() {
    let holdings = vec![
        lot("gain", "us total", 1000.0, Some(700.0)),
        lot("loss", "us total", 1000.0, Some(1400.0)),
        lot("unknown", "us total", 1000.0, None),
    ];

    let sorted = sorted_for_liquidation(&holdings);
    let ids: Vec<&str> = sorted.iter().map(|h| h.id.as_str()).collect();
    assert_eq!(ids, vec!["loss", "unknown", "gain"]);
}
