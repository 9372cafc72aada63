use crate::error::ConfigError;
use crate::pricing::TierTable;
use crate::quota::QuotaThresholds;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

pub const DEFAULT_FREE_TIER_LIMIT: u64 = 5_000;
pub const DEFAULT_MIN_BILLING_AMOUNT: f64 = 5.0;
pub const DEFAULT_CURRENCY: &str = "€";

/// Process-wide pricing configuration. Loaded once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BillingConfig {
    free_tier_limit: u64,
    min_billing_amount: f64,
    currency: String,
    tiers: TierTable,
    quota: QuotaThresholds,
}

impl BillingConfig {
    pub fn new(
        free_tier_limit: u64,
        min_billing_amount: f64,
        tiers: TierTable,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            free_tier_limit,
            min_billing_amount,
            tiers,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    pub fn with_quota_thresholds(
        mut self,
        quota: QuotaThresholds,
    ) -> Result<Self, ConfigError> {
        quota.validate()?;
        self.quota = quota;
        Ok(self)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read billing config: {}", path.display()))?;
        let config = Self::from_json(&content)
            .with_context(|| format!("Invalid billing config: {}", path.display()))?;

        debug!(
            path = %path.display(),
            free_tier_limit = config.free_tier_limit,
            tiers = config.tiers.len(),
            "loaded billing config"
        );
        Ok(config)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let config: BillingConfig =
            serde_json::from_str(content).context("Failed to parse billing config JSON")?;
        config.validate()?;
        Ok(config)
    }

    pub fn free_tier_limit(&self) -> u64 {
        self.free_tier_limit
    }

    pub fn min_billing_amount(&self) -> f64 {
        self.min_billing_amount
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn tiers(&self) -> &TierTable {
        &self.tiers
    }

    pub fn quota_thresholds(&self) -> &QuotaThresholds {
        &self.quota
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.min_billing_amount.is_finite() || self.min_billing_amount < 0.0 {
            return Err(ConfigError::InvalidMinimum);
        }
        self.quota.validate()
    }
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            free_tier_limit: DEFAULT_FREE_TIER_LIMIT,
            min_billing_amount: DEFAULT_MIN_BILLING_AMOUNT,
            currency: DEFAULT_CURRENCY.to_string(),
            tiers: TierTable::default(),
            quota: QuotaThresholds::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = BillingConfig::default();
        assert_eq!(config.free_tier_limit(), 5_000);
        assert_eq!(config.min_billing_amount(), 5.0);
        assert_eq!(config.currency(), "€");
        assert_eq!(config.tiers(), &TierTable::default());
        assert_eq!(config.quota_thresholds().warning_percent(), 80.0);
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let config = BillingConfig::from_json(r#"{"minBillingAmount": 10, "currency": "$"}"#)
            .unwrap();
        assert_eq!(config.free_tier_limit(), 5_000);
        assert_eq!(config.min_billing_amount(), 10.0);
        assert_eq!(config.currency(), "$");
        assert_eq!(config.tiers().len(), 4);
    }

    #[test]
    fn test_rejects_negative_minimum() {
        assert!(BillingConfig::from_json(r#"{"minBillingAmount": -1}"#).is_err());
        assert_eq!(
            BillingConfig::new(0, -1.0, TierTable::default()).unwrap_err(),
            ConfigError::InvalidMinimum
        );
    }

    #[test]
    fn test_rejects_invalid_tiers() {
        let json = r#"{"tiers": [{"from": 1, "to": 10, "pricePerEvent": 0}]}"#;
        assert!(BillingConfig::from_json(json).is_err());
    }

    #[test]
    fn test_rejects_inverted_thresholds() {
        let json = r#"{"quota": {"warningPercent": 100, "exceededPercent": 80}}"#;
        assert!(BillingConfig::from_json(json).is_err());
    }

    #[test]
    fn test_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        let content = r#"{
            "freeTierLimit": 1000,
            "minBillingAmount": 2.5,
            "tiers": [
                {"from": 1, "to": 1000, "pricePerEvent": 0},
                {"from": 1001, "pricePerEvent": 0.01}
            ]
        }"#;
        temp_file.write_all(content.as_bytes()).unwrap();

        let config = BillingConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.free_tier_limit(), 1_000);
        assert_eq!(config.min_billing_amount(), 2.5);
        assert_eq!(config.tiers().len(), 2);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(BillingConfig::from_file("/nonexistent/ludiks/billing.json").is_err());
    }
}
