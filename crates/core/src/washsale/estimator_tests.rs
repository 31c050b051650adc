//! Tests for wash-sale estimation.

use chrono::NaiveDate;

use crate::holdings::Holding;
use crate::liquidation::{LiquidateHolding, Purchase, Sale};
use crate::washsale::{PurchaseInfo, RealizedTransaction, TrackerGroups, WashSaleEstimator};

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 28).unwrap()
}

fn lot(security: &str, present_value: f64, cost_basis: f64) -> LiquidateHolding {
    LiquidateHolding::new(
        Holding {
            id: format!("lot-{}", security),
            account: "brokerage".into(),
            asset: "us total".into(),
            security: security.into(),
            share_count: 10.0,
            present_value,
            cost_basis: Some(cost_basis),
        },
        1.0,
    )
}

fn sale(lots: Vec<LiquidateHolding>) -> Sale {
    let target_amount = lots.iter().map(|l| l.fractional_value()).sum();
    Sale { asset: "us total".into(), target_amount, holdings: lots }
}

fn purchase_info(security: &str, shares: f64, basis: f64, days_ago: i64) -> PurchaseInfo {
    PurchaseInfo {
        security: security.into(),
        share_count: shares,
        share_basis: basis,
        purchased_at: as_of() - chrono::Duration::days(days_ago),
    }
}

#[test]
fn test_sale_wash_is_zero_without_net_loss() {
    let estimator = WashSaleEstimator::new();
    let winning = sale(vec![lot("vti", 1_200.0, 1_000.0)]);
    let purchases = vec![purchase_info("vti", 10.0, 100.0, 5)];

    let wash = estimator.sale_wash_amount(
        &winning,
        &TrackerGroups::default(),
        &purchases,
        as_of(),
        30,
    );
    assert_eq!(wash, 0.0);
}

#[test]
fn test_sale_wash_capped_by_loss_and_by_purchases() {
    let estimator = WashSaleEstimator::new();
    let trackers = TrackerGroups::default();
    // $400 net loss on VTI.
    let losing = sale(vec![lot("vti", 1_000.0, 1_400.0)]);

    // Small replacement purchase: capped by the purchase basis.
    let small = vec![purchase_info("vti", 1.0, 150.0, 10)];
    let wash = estimator.sale_wash_amount(&losing, &trackers, &small, as_of(), 30);
    assert!((wash - 150.0).abs() < 1e-9);

    // Large replacement purchase: capped by the loss.
    let large = vec![purchase_info("vti", 50.0, 100.0, 10)];
    let wash = estimator.sale_wash_amount(&losing, &trackers, &large, as_of(), 30);
    assert!((wash - 400.0).abs() < 1e-9);
}

#[test]
fn test_sale_wash_sees_tracker_equivalents_only() {
    let estimator = WashSaleEstimator::new();
    // VOO and SPLG track the same index as the sold VTI does not.
    let trackers = TrackerGroups::new(vec![vec!["vti".into(), "voo".into(), "splg".into()]]);
    let losing = sale(vec![lot("vti", 1_000.0, 1_300.0)]);

    let purchases = vec![
        purchase_info("voo", 1.0, 120.0, 3),
        purchase_info("splg", 2.0, 60.0, 8),
        purchase_info("bnd", 100.0, 70.0, 5),
    ];

    let wash = estimator.sale_wash_amount(&losing, &trackers, &purchases, as_of(), 30);
    // 120 + 120 from equivalents; the unrelated BND purchase is invisible.
    assert!((wash - 240.0).abs() < 1e-9);
}

#[test]
fn test_sale_wash_ignores_purchases_outside_window() {
    let estimator = WashSaleEstimator::new();
    let losing = sale(vec![lot("vti", 1_000.0, 1_300.0)]);
    let purchases = vec![
        purchase_info("vti", 1.0, 100.0, 45),
        purchase_info("vti", 1.0, 80.0, 12),
    ];

    let wash = estimator.sale_wash_amount(
        &losing,
        &TrackerGroups::default(),
        &purchases,
        as_of(),
        30,
    );
    assert!((wash - 80.0).abs() < 1e-9);
}

#[test]
fn test_purchase_wash_flags_recent_realized_losses() {
    let estimator = WashSaleEstimator::new();
    let buy = Purchase { asset: "us total".into(), amount: 500.0 };

    let realized = vec![
        RealizedTransaction {
            asset: "us total".into(),
            security: "vti".into(),
            share_count: -10.0,
            short_term_gain_loss: -250.0,
            long_term_gain_loss: -100.0,
            traded_at: as_of() - chrono::Duration::days(7),
        },
        // A buy in the window is not a realization.
        RealizedTransaction {
            asset: "us total".into(),
            security: "vti".into(),
            share_count: 5.0,
            short_term_gain_loss: -900.0,
            long_term_gain_loss: 0.0,
            traded_at: as_of() - chrono::Duration::days(3),
        },
        // Different asset class.
        RealizedTransaction {
            asset: "bonds".into(),
            security: "bnd".into(),
            share_count: -10.0,
            short_term_gain_loss: -800.0,
            long_term_gain_loss: 0.0,
            traded_at: as_of() - chrono::Duration::days(2),
        },
    ];

    let wash = estimator.purchase_wash_amount(&buy, &realized, as_of(), 30);
    assert!((wash + 350.0).abs() < 1e-9);
}

#[test]
fn test_purchase_wash_bounded_by_buy_amount_and_never_positive() {
    let estimator = WashSaleEstimator::new();
    let buy = Purchase { asset: "us total".into(), amount: 200.0 };

    let big_loss = vec![RealizedTransaction {
        asset: "us total".into(),
        security: "vti".into(),
        share_count: -10.0,
        short_term_gain_loss: -1_000.0,
        long_term_gain_loss: 0.0,
        traded_at: as_of() - chrono::Duration::days(1),
    }];
    let wash = estimator.purchase_wash_amount(&buy, &big_loss, as_of(), 30);
    assert!((wash + 200.0).abs() < 1e-9);

    let gains = vec![RealizedTransaction {
        asset: "us total".into(),
        security: "vti".into(),
        share_count: -10.0,
        short_term_gain_loss: 600.0,
        long_term_gain_loss: 100.0,
        traded_at: as_of() - chrono::Duration::days(1),
    }];
    let wash = estimator.purchase_wash_amount(&buy, &gains, as_of(), 30);
    assert_eq!(wash, 0.0);
}
