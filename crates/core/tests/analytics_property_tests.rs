//! Property-based integration tests for the analytics calculators.
//!
//! These tests verify that universal properties hold across all valid inputs,
//! using the `proptest` crate for random test case generation.

use nestegg_core::config::{RebalanceConfig, RiskConfig, SizingConfig};
use nestegg_core::constants::WEIGHT_TOLERANCE;
use nestegg_core::portfolio::{AssetClass, NewPosition, PortfolioStore};
use nestegg_core::rebalance::{evaluate, RebalanceAction};
use nestegg_core::risk::{annualized_volatility, max_drawdown, sharpe_ratio, sortino_ratio};
use nestegg_core::sizing::{kelly_fraction, recommended_size};
use proptest::prelude::*;
use rust_decimal::Decimal;

// =============================================================================
// Generators
// =============================================================================

/// Daily return between -10% and +10%, four decimal places.
fn arb_daily_return() -> impl Strategy<Value = Decimal> {
    (-1000i64..=1000).prop_map(|bp| Decimal::new(bp, 4))
}

fn arb_series(min_len: usize) -> impl Strategy<Value = Vec<Decimal>> {
    prop::collection::vec(arb_daily_return(), min_len..120)
}

/// Fraction in [0, 1] with three decimal places.
fn arb_unit_fraction() -> impl Strategy<Value = Decimal> {
    (0i64..=1000).prop_map(|v| Decimal::new(v, 3))
}

fn arb_asset_class() -> impl Strategy<Value = AssetClass> {
    prop::sample::select(AssetClass::ALL.to_vec())
}

/// Holdings as (class, quantity, price) with at least one non-zero value.
fn arb_holdings() -> impl Strategy<Value = Vec<(AssetClass, Decimal, Decimal)>> {
    prop::collection::vec(
        (arb_asset_class(), 1i64..10_000, 1i64..1_000_000)
            .prop_map(|(class, qty, price)| (class, Decimal::new(qty, 2), Decimal::from(price))),
        1..12,
    )
}

fn store_from(holdings: &[(AssetClass, Decimal, Decimal)], cash: Decimal) -> PortfolioStore {
    let mut store = PortfolioStore::new("IDR");
    for (i, (class, quantity, price)) in holdings.iter().enumerate() {
        store
            .add_position(NewPosition::new(
                format!("T{}", i),
                *class,
                *quantity,
                *price,
                "broker",
            ))
            .unwrap();
    }
    store.set_cash(cash).unwrap();
    store
}

// =============================================================================
// Risk metrics
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Volatility is never negative and drawdown never positive.
    #[test]
    fn prop_volatility_non_negative_drawdown_non_positive(series in arb_series(1)) {
        let config = RiskConfig::default();
        prop_assert!(annualized_volatility(&series, &config) >= Decimal::ZERO);

        let drawdown = max_drawdown(&series);
        prop_assert!(drawdown <= Decimal::ZERO);
        prop_assert!(drawdown >= Decimal::NEGATIVE_ONE);
    }

    /// Series shorter than two observations resolve every ratio to zero.
    #[test]
    fn prop_degenerate_series_yield_zero(series in prop::collection::vec(arb_daily_return(), 0..2)) {
        let config = RiskConfig::default();
        prop_assert_eq!(annualized_volatility(&series, &config), Decimal::ZERO);
        prop_assert_eq!(sharpe_ratio(&series, &config), Decimal::ZERO);
        prop_assert_eq!(sortino_ratio(&series, &config), Decimal::ZERO);
    }

    /// Non-negative returns never draw down.
    #[test]
    fn prop_rising_path_has_no_drawdown(
        series in prop::collection::vec((0i64..=1000).prop_map(|bp| Decimal::new(bp, 4)), 0..60)
    ) {
        prop_assert_eq!(max_drawdown(&series), Decimal::ZERO);
    }
}

// =============================================================================
// Position sizing
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// The recommended amount never exceeds the hard cap of the bankroll.
    #[test]
    fn prop_size_never_exceeds_cap(
        p in arb_unit_fraction(),
        b in (1i64..100_000).prop_map(|v| Decimal::new(v, 3)),
        bankroll in (0i64..10_000_000_000).prop_map(Decimal::from),
        discount in (1i64..=1000).prop_map(|v| Decimal::new(v, 3)),
        cap in (1i64..=1000).prop_map(|v| Decimal::new(v, 3)),
    ) {
        let config = SizingConfig { discount_factor: discount, hard_cap_fraction: cap };
        let kelly = kelly_fraction(p, b).unwrap();
        let amount = recommended_size(kelly, bankroll, &config);

        prop_assert!(amount >= Decimal::ZERO);
        prop_assert!(amount <= cap * bankroll);
    }
}

// =============================================================================
// Portfolio weights and drift
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Class weights sum to one whenever the portfolio has value.
    #[test]
    fn prop_class_weights_sum_to_one(
        holdings in arb_holdings(),
        cash in (0i64..1_000_000).prop_map(Decimal::from),
    ) {
        let store = store_from(&holdings, cash);
        prop_assume!(store.total_value() > Decimal::ZERO);

        let sum: Decimal = store.weights_by_class().values().copied().sum();
        prop_assert!((sum - Decimal::ONE).abs() <= WEIGHT_TOLERANCE, "sum was {}", sum);
    }

    /// Hold exactly when the drift is inside the threshold.
    #[test]
    fn prop_evaluate_respects_threshold(
        current in arb_unit_fraction(),
        target in arb_unit_fraction(),
        threshold in (0i64..=200).prop_map(|v| Decimal::new(v, 3)),
    ) {
        let decision = evaluate(current, target, threshold, Decimal::from(1_000_000)).unwrap();
        prop_assert_eq!(decision.drift_abs, (current - target).abs());

        match decision.action {
            RebalanceAction::Hold => {
                prop_assert!(decision.drift_abs < threshold || decision.drift.is_zero())
            }
            RebalanceAction::Sell => prop_assert!(decision.drift >= threshold),
            RebalanceAction::Buy => prop_assert!(-decision.drift >= threshold),
        }
    }

    /// The default threshold applies when no override is set.
    #[test]
    fn prop_default_threshold_is_used(holdings in arb_holdings()) {
        let store = store_from(&holdings, Decimal::ZERO);
        let target = nestegg_core::phase::phase_allocation_target(
            nestegg_core::phase::Phase::Phase2Accumulation,
        );
        let config = RebalanceConfig::default();
        let entries = nestegg_core::rebalance::analyze(&store, &target, &config).unwrap();
        prop_assert!(entries.iter().all(|e| e.threshold == config.default_drift_threshold));
        prop_assert!(entries
            .windows(2)
            .all(|w| w[0].drift.abs() >= w[1].drift.abs()));
    }
}
