use crate::calculator::{CostEstimator, TierCharge};
use crate::config::BillingConfig;
use crate::data_structures::{Organization, Plan};
use crate::loader::OrganizationLoader;
use crate::quota::{QuotaBanner, QuotaState};
use anyhow::Result;
use chrono::{DateTime, Utc};
use std::path::Path;

/// Everything a dashboard widget needs, derived in one pass.
#[derive(Debug, Clone, PartialEq)]
pub struct UsageSummary {
    organization_name: Option<String>,
    plan: Plan,
    events_used: u64,
    quota: QuotaState,
    estimated_cost: f64,
    charged_amount: f64,
    breakdown: Vec<TierCharge>,
}

impl UsageSummary {
    pub fn organization_name(&self) -> Option<&str> {
        self.organization_name.as_deref()
    }

    pub fn plan(&self) -> Plan {
        self.plan
    }

    pub fn events_used(&self) -> u64 {
        self.events_used
    }

    pub fn quota(&self) -> &QuotaState {
        &self.quota
    }

    /// Raw tiered estimate, before the minimum billing amount.
    pub fn estimated_cost(&self) -> f64 {
        self.estimated_cost
    }

    pub fn charged_amount(&self) -> f64 {
        self.charged_amount
    }

    pub fn breakdown(&self) -> &[TierCharge] {
        &self.breakdown
    }
}

/// Application state shared by every billing widget.
///
/// Owns the billing configuration and the currently loaded organization.
/// Banner dismissal lives here and is lost when the state is rebuilt.
pub struct BillingState {
    config: BillingConfig,
    organization: Option<Organization>,
    loader: OrganizationLoader,
    banner_dismissed: bool,
    last_loaded: Option<DateTime<Utc>>,
}

impl BillingState {
    pub fn new(config: BillingConfig) -> Self {
        Self {
            config,
            organization: None,
            loader: OrganizationLoader::new(),
            banner_dismissed: false,
            last_loaded: None,
        }
    }

    pub fn load_organization<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let organization = self.loader.load_from_file(path)?;
        self.set_organization(organization);
        Ok(())
    }

    pub fn set_organization(&mut self, organization: Organization) {
        self.organization = Some(organization);
        self.last_loaded = Some(Utc::now());
    }

    pub fn clear_organization(&mut self) {
        self.organization = None;
        self.last_loaded = None;
    }

    pub fn config(&self) -> &BillingConfig {
        &self.config
    }

    pub fn organization(&self) -> Option<&Organization> {
        self.organization.as_ref()
    }

    pub fn last_loaded(&self) -> Option<DateTime<Utc>> {
        self.last_loaded
    }

    pub fn estimator(&self) -> CostEstimator<'_> {
        CostEstimator::new(&self.config)
    }

    pub fn events_used(&self) -> u64 {
        self.organization
            .as_ref()
            .map(|org| org.events_used())
            .unwrap_or(0)
    }

    pub fn quota_state(&self) -> QuotaState {
        QuotaState::for_organization_with(
            self.config.quota_thresholds(),
            self.organization.as_ref(),
        )
    }

    /// Banner to display, unless the user dismissed it.
    pub fn banner(&self) -> Option<QuotaBanner> {
        if self.banner_dismissed {
            return None;
        }
        QuotaBanner::from_state(&self.quota_state())
    }

    pub fn dismiss_banner(&mut self) {
        self.banner_dismissed = true;
    }

    pub fn is_banner_dismissed(&self) -> bool {
        self.banner_dismissed
    }

    pub fn summary(&self) -> UsageSummary {
        let estimator = self.estimator();
        let snapshot = self
            .organization
            .as_ref()
            .map(|org| org.snapshot())
            .unwrap_or_default();
        let events_used = snapshot.events_used();

        UsageSummary {
            organization_name: self.organization.as_ref().map(|org| org.name().to_string()),
            plan: snapshot.plan(),
            events_used,
            quota: self.quota_state(),
            estimated_cost: estimator.estimate_cost(events_used),
            charged_amount: estimator.effective_charge(events_used),
            breakdown: estimator.cost_breakdown(events_used),
        }
    }
}

impl Default for BillingState {
    fn default() -> Self {
        Self::new(BillingConfig::default())
    }
}
