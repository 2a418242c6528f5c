//! Tests for concentration policy checks.

#[cfg(test)]
mod tests {
    use crate::config::PolicyLimits;
    use crate::portfolio::{AssetClass, NewPosition, PortfolioStore};
    use crate::rebalance::{check_policy_limits, PolicyRule, PolicyStatus};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn add(store: &mut PortfolioStore, ticker: &str, class: AssetClass, value: i64, venue: &str) {
        store
            .add_position(NewPosition::new(
                ticker,
                class,
                Decimal::from(value),
                Decimal::ONE,
                venue,
            ))
            .unwrap();
    }

    fn balanced_store() -> PortfolioStore {
        let mut store = PortfolioStore::new("IDR");
        add(&mut store, "RDPU", AssetClass::MoneyMarket, 400, "bibit");
        add(&mut store, "BBCA", AssetClass::EquityDomestic, 200, "stockbit");
        add(&mut store, "TLKM", AssetClass::EquityDomestic, 200, "stockbit");
        add(&mut store, "BTC", AssetClass::Crypto, 200, "indodax");
        store
    }

    #[test]
    fn test_single_position_violation_per_ticker() {
        let report = check_policy_limits(&balanced_store(), &PolicyLimits::default());

        let violations: Vec<_> = report
            .checks
            .iter()
            .filter(|c| c.rule == PolicyRule::SinglePositionLimit)
            .collect();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].subject.as_deref(), Some("RDPU"));
        assert_eq!(violations[0].observed_weight, Some(dec!(0.4)));
        assert!(!report.compliant);
        assert_eq!(report.violations, 1);
    }

    #[test]
    fn test_ticker_weight_aggregates_across_venues() {
        let mut store = PortfolioStore::new("IDR");
        add(&mut store, "RDPU", AssetClass::MoneyMarket, 500, "bibit");
        add(&mut store, "BBCA", AssetClass::EquityDomestic, 150, "stockbit");
        add(&mut store, "BBCA", AssetClass::EquityDomestic, 150, "ajaib");
        add(&mut store, "VOO", AssetClass::EquityForeign, 200, "gotrade");

        let limits = PolicyLimits {
            max_single_position_weight: dec!(0.5),
            ..PolicyLimits::default()
        };
        let report = check_policy_limits(&store, &limits);
        assert!(report.compliant);

        let limits = PolicyLimits {
            max_single_position_weight: dec!(0.25),
            ..PolicyLimits::default()
        };
        let report = check_policy_limits(&store, &limits);
        let subjects: Vec<_> = report
            .checks
            .iter()
            .filter_map(|c| c.subject.as_deref())
            .collect();
        assert_eq!(subjects, vec!["BBCA", "RDPU"]);
    }

    #[test]
    fn test_crypto_limit() {
        let limits = PolicyLimits {
            max_single_position_weight: dec!(1),
            max_crypto_weight: dec!(0.15),
        };
        let report = check_policy_limits(&balanced_store(), &limits);
        let crypto = report
            .checks
            .iter()
            .find(|c| c.rule == PolicyRule::CryptoAllocationLimit)
            .unwrap();
        assert_eq!(crypto.status, PolicyStatus::Violation);
        assert_eq!(crypto.observed_weight, Some(dec!(0.2)));

        let report = check_policy_limits(&balanced_store(), &PolicyLimits::default());
        let crypto = report
            .checks
            .iter()
            .find(|c| c.rule == PolicyRule::CryptoAllocationLimit)
            .unwrap();
        assert_eq!(crypto.status, PolicyStatus::Ok);
    }

    #[test]
    fn test_missing_emergency_fund_warns() {
        let mut store = PortfolioStore::new("IDR");
        add(&mut store, "BBCA", AssetClass::EquityDomestic, 100, "stockbit");
        add(&mut store, "VOO", AssetClass::EquityForeign, 100, "gotrade");
        add(&mut store, "ANTM", AssetClass::Commodity, 100, "pluang");
        add(&mut store, "TLKM", AssetClass::EquityDomestic, 100, "stockbit");
        add(&mut store, "BMRI", AssetClass::EquityDomestic, 100, "stockbit");

        let report = check_policy_limits(&store, &PolicyLimits::default());
        let ef = report
            .checks
            .iter()
            .find(|c| c.rule == PolicyRule::EmergencyFundPresent)
            .unwrap();
        assert_eq!(ef.status, PolicyStatus::Warning);
        assert_eq!(report.warnings, 1);
        assert!(report.compliant);
    }

    #[test]
    fn test_empty_portfolio_only_warns() {
        let report = check_policy_limits(&PortfolioStore::new("IDR"), &PolicyLimits::default());
        assert_eq!(report.violations, 0);
        assert_eq!(report.warnings, 1);
        assert_eq!(report.checks.len(), 2);
    }
}
