//! Tests for JSON snapshot persistence.

#[cfg(test)]
mod tests {
    use crate::errors::Error;
    use crate::portfolio::{AssetClass, NewPosition, PortfolioStore};
    use crate::snapshot::*;
    use rust_decimal_macros::dec;
    use tempfile::tempdir;

    fn sample_store() -> PortfolioStore {
        let mut store = PortfolioStore::new("IDR");
        store
            .add_position(NewPosition::new(
                "BBCA",
                AssetClass::EquityDomestic,
                dec!(100),
                dec!(9000),
                "stockbit",
            ))
            .unwrap();
        store
            .add_position(NewPosition::new(
                "RDPU",
                AssetClass::MoneyMarket,
                dec!(1500),
                dec!(1200),
                "bibit",
            ))
            .unwrap();
        store.update_price("BBCA", dec!(9500)).unwrap();
        store.set_cash(dec!(250000)).unwrap();
        store
    }

    #[test]
    fn test_missing_file_loads_empty_portfolio() {
        let dir = tempdir().unwrap();
        let portfolio = load_snapshot(dir.path().join("portfolio.json")).unwrap();
        assert!(portfolio.positions.is_empty());
        assert_eq!(portfolio.base_currency, "IDR");
    }

    #[test]
    fn test_save_then_load_restores_store() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data").join("portfolio.json");
        let mut store = sample_store();
        store
            .add_position(NewPosition::new(
                "ETH",
                AssetClass::Crypto,
                dec!(1.234567890123456789),
                dec!(45000000.000000000001),
                "indodax",
            ))
            .unwrap();
        store
            .set_drift_threshold("ETH", None, Some(dec!(0.0125)))
            .unwrap();

        save_snapshot(&path, store.portfolio()).unwrap();
        let restored = PortfolioStore::from_portfolio(load_snapshot(&path).unwrap()).unwrap();

        assert_eq!(restored.positions().len(), 3);
        assert_eq!(restored.total_value(), store.total_value());
        assert_eq!(restored.cash(), dec!(250000));
        let bbca = restored.get_position("BBCA", Some("stockbit")).unwrap();
        assert_eq!(bbca.last_price, dec!(9500));
        assert!(bbca.last_updated.is_some());

        let eth = restored.get_position("ETH", None).unwrap();
        assert_eq!(eth.quantity, dec!(1.234567890123456789));
        assert_eq!(eth.cost_basis, dec!(45000000.000000000001));
        assert_eq!(eth.drift_threshold, Some(dec!(0.0125)));
    }

    #[test]
    fn test_save_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("portfolio.json");
        save_snapshot(&path, sample_store().portfolio()).unwrap();

        assert!(path.exists());
        assert!(!dir.path().join("portfolio.json.tmp").exists());
    }

    #[test]
    fn test_save_overwrites_previous_snapshot() {
        let dir = tempdir().unwrap();
        let repo = JsonSnapshotRepository::new(dir.path().join("portfolio.json"));

        let mut store = sample_store();
        repo.save(store.portfolio()).unwrap();
        store.remove_position("RDPU").unwrap();
        repo.save(store.portfolio()).unwrap();

        let loaded = repo.load().unwrap();
        assert_eq!(loaded.positions.len(), 1);
        assert_eq!(loaded.positions[0].ticker, "BBCA");
    }

    #[test]
    fn test_snapshot_is_camel_case_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("portfolio.json");
        save_snapshot(&path, sample_store().portfolio()).unwrap();

        let json = std::fs::read_to_string(&path).unwrap();
        assert!(json.contains("\"baseCurrency\""));
        assert!(json.contains("\"savedAt\""));
        assert!(json.contains("\"MONEY_MARKET\""));
        assert!(json.contains("\"cash\": \"250000\""));
    }

    #[test]
    fn test_corrupt_snapshot_is_snapshot_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("portfolio.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(load_snapshot(&path).unwrap_err(), Error::Snapshot(_)));
    }
}
