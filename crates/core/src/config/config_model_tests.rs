//! Tests for analytics configuration parsing and validation.

#[cfg(test)]
mod tests {
    use crate::config::AnalyticsConfig;
    use crate::errors::Error;
    use rust_decimal_macros::dec;
    use std::io::Write;

    #[test]
    fn test_default_config_matches_conventions() {
        let config = AnalyticsConfig::default();
        assert_eq!(config.risk.trading_days_per_year, 252);
        assert_eq!(config.risk.risk_free_annual, dec!(0.05));
        assert_eq!(config.sizing.discount_factor, dec!(0.5));
        assert_eq!(config.sizing.hard_cap_fraction, dec!(0.10));
        assert_eq!(config.phase.target_months, 6);
        assert_eq!(config.rebalance.default_drift_threshold, dec!(0.05));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config =
            AnalyticsConfig::from_json_str(r#"{"sizing": {"hardCapFraction": 0.25}}"#).unwrap();
        assert_eq!(config.sizing.hard_cap_fraction, dec!(0.25));
        assert_eq!(config.sizing.discount_factor, dec!(0.5));
        assert_eq!(config.risk.trading_days_per_year, 252);
    }

    #[test]
    fn test_empty_object_is_default() {
        let config = AnalyticsConfig::from_json_str("{}").unwrap();
        assert_eq!(config, AnalyticsConfig::default());
    }

    #[test]
    fn test_zero_trading_days_rejected() {
        let err = AnalyticsConfig::from_json_str(r#"{"risk": {"tradingDaysPerYear": 0}}"#)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfigValue(_)));
    }

    #[test]
    fn test_cap_above_one_rejected() {
        let err = AnalyticsConfig::from_json_str(r#"{"sizing": {"hardCapFraction": 1.5}}"#)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfigValue(_)));
    }

    #[test]
    fn test_split_must_sum_to_one() {
        let err = AnalyticsConfig::from_json_str(
            r#"{"phase": {"phase1Split": {"efShare": 0.7, "investShare": 0.2}}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidConfigValue(_)));
    }

    #[test]
    fn test_malformed_json_is_config_io() {
        let err = AnalyticsConfig::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, Error::ConfigIO(_)));
    }

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AnalyticsConfig::load(dir.path().join("absent.json")).unwrap();
        assert_eq!(config, AnalyticsConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("analytics.json");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, r#"{{"rebalance": {{"defaultDriftThreshold": 0.03}}}}"#).unwrap();

        let config = AnalyticsConfig::load(&path).unwrap();
        assert_eq!(config.rebalance.default_drift_threshold, dec!(0.03));
    }
}
