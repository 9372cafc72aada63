pub mod calculator;
pub mod config;
pub mod data_structures;
pub mod error;
pub mod format;
pub mod loader;
pub mod monitor;
pub mod pricing;
pub mod quota;

pub use calculator::{effective_charge, estimate_cost, CostEstimator, TierCharge};
pub use config::BillingConfig;
pub use data_structures::{Organization, Plan, UsageSnapshot};
pub use error::ConfigError;
pub use loader::OrganizationLoader;
pub use monitor::{BillingState, UsageSummary};
pub use pricing::{PricingTier, TierTable};
pub use quota::{
    evaluate_quota, evaluate_quota_with, BannerKind, QuotaBanner, QuotaLevel, QuotaState,
    QuotaThresholds,
};

pub use anyhow::Result;
pub use chrono::{DateTime, Utc};

pub mod prelude {
    pub use crate::config::BillingConfig;
    pub use crate::monitor::{BillingState, UsageSummary};
    pub use crate::quota::{QuotaBanner, QuotaLevel, QuotaState};
    pub use anyhow::Result;
    pub use chrono::{DateTime, Utc};
}
