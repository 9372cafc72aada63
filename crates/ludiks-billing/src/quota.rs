//! Quota status evaluation.
//!
//! A quota of `0` means the organization has no event limit. Percentages are
//! kept unclamped so callers can tell "warning" from "exceeded"; progress
//! bars use [`QuotaState::display_percentage`] instead.

use crate::data_structures::Organization;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_WARNING_PERCENT: f64 = 80.0;
pub const DEFAULT_EXCEEDED_PERCENT: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuotaThresholds {
    warning_percent: f64,
    exceeded_percent: f64,
}

impl QuotaThresholds {
    pub fn new(warning_percent: f64, exceeded_percent: f64) -> Result<Self, ConfigError> {
        let thresholds = Self {
            warning_percent,
            exceeded_percent,
        };
        thresholds.validate()?;
        Ok(thresholds)
    }

    pub fn warning_percent(&self) -> f64 {
        self.warning_percent
    }

    pub fn exceeded_percent(&self) -> f64 {
        self.exceeded_percent
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        let ordered = self.warning_percent.is_finite()
            && self.exceeded_percent.is_finite()
            && self.warning_percent >= 0.0
            && self.warning_percent <= self.exceeded_percent;

        if ordered {
            Ok(())
        } else {
            Err(ConfigError::InvalidThresholds)
        }
    }
}

impl Default for QuotaThresholds {
    fn default() -> Self {
        Self {
            warning_percent: DEFAULT_WARNING_PERCENT,
            exceeded_percent: DEFAULT_EXCEEDED_PERCENT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaLevel {
    Unlimited,
    Normal,
    Warning,
    Exceeded,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuotaState {
    events_quota: u64,
    events_used: u64,
    percentage: f64,
    is_unlimited: bool,
    should_warn: bool,
    exceeded_percent: f64,
}

impl QuotaState {
    /// State used when no organization is loaded: nothing used, nothing to warn about.
    pub fn neutral() -> Self {
        Self {
            events_quota: 0,
            events_used: 0,
            percentage: 0.0,
            is_unlimited: false,
            should_warn: false,
            exceeded_percent: DEFAULT_EXCEEDED_PERCENT,
        }
    }

    pub fn for_organization(organization: Option<&Organization>) -> Self {
        Self::for_organization_with(&QuotaThresholds::default(), organization)
    }

    pub fn for_organization_with(
        thresholds: &QuotaThresholds,
        organization: Option<&Organization>,
    ) -> Self {
        match organization {
            Some(org) => evaluate_quota_with(thresholds, org.events_quota(), org.events_used()),
            None => Self::neutral(),
        }
    }

    pub fn events_quota(&self) -> u64 {
        self.events_quota
    }

    pub fn events_used(&self) -> u64 {
        self.events_used
    }

    /// Unclamped; can exceed 100.
    pub fn percentage(&self) -> f64 {
        self.percentage
    }

    /// Clamped to `[0, 100]` for gauges.
    pub fn display_percentage(&self) -> f64 {
        self.percentage.clamp(0.0, 100.0)
    }

    pub fn is_unlimited(&self) -> bool {
        self.is_unlimited
    }

    pub fn should_warn(&self) -> bool {
        self.should_warn
    }

    pub fn is_exceeded(&self) -> bool {
        !self.is_unlimited && self.events_quota > 0 && self.percentage >= self.exceeded_percent
    }

    pub fn remaining(&self) -> Option<u64> {
        if self.is_unlimited {
            None
        } else {
            Some(self.events_quota.saturating_sub(self.events_used))
        }
    }

    pub fn level(&self) -> QuotaLevel {
        if self.is_unlimited {
            QuotaLevel::Unlimited
        } else if self.is_exceeded() {
            QuotaLevel::Exceeded
        } else if self.should_warn {
            QuotaLevel::Warning
        } else {
            QuotaLevel::Normal
        }
    }
}

pub fn evaluate_quota(quota: u64, used: u64) -> QuotaState {
    evaluate_quota_with(&QuotaThresholds::default(), quota, used)
}

pub fn evaluate_quota_with(thresholds: &QuotaThresholds, quota: u64, used: u64) -> QuotaState {
    if quota == 0 {
        return QuotaState {
            events_quota: 0,
            events_used: used,
            percentage: 0.0,
            is_unlimited: true,
            should_warn: false,
            exceeded_percent: thresholds.exceeded_percent,
        };
    }

    let percentage = (used as f64 / quota as f64) * 100.0;

    QuotaState {
        events_quota: quota,
        events_used: used,
        percentage,
        is_unlimited: false,
        should_warn: percentage >= thresholds.warning_percent,
        exceeded_percent: thresholds.exceeded_percent,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Warning,
    Exceeded,
}

/// Message shown above the dashboard when an organization nears or passes its quota.
#[derive(Debug, Clone, PartialEq)]
pub struct QuotaBanner {
    kind: BannerKind,
    percentage: f64,
    events_used: u64,
    events_quota: u64,
}

impl QuotaBanner {
    pub fn from_state(state: &QuotaState) -> Option<Self> {
        if !state.should_warn() {
            return None;
        }

        let kind = if state.is_exceeded() {
            BannerKind::Exceeded
        } else {
            BannerKind::Warning
        };

        Some(Self {
            kind,
            percentage: state.percentage(),
            events_used: state.events_used(),
            events_quota: state.events_quota(),
        })
    }

    pub fn kind(&self) -> BannerKind {
        self.kind
    }

    pub fn title(&self) -> &'static str {
        match self.kind {
            BannerKind::Warning => "Approaching event quota",
            BannerKind::Exceeded => "Event quota exceeded",
        }
    }

    pub fn message(&self) -> String {
        let used = crate::format::format_events(self.events_used);
        let quota = crate::format::format_events(self.events_quota);
        match self.kind {
            BannerKind::Warning => format!(
                "You have used {} of your {} monthly events ({:.0}%). Upgrade your plan to avoid interruptions.",
                used, quota, self.percentage
            ),
            BannerKind::Exceeded => format!(
                "You have used {} events, over your {} monthly quota ({:.0}%). New events may be rejected until you upgrade.",
                used, quota, self.percentage
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_structures::Plan;

    #[test]
    fn test_zero_quota_is_unlimited() {
        for used in [0, 1, 5_000, u64::MAX] {
            let state = evaluate_quota(0, used);
            assert!(state.is_unlimited());
            assert!(!state.should_warn());
            assert_eq!(state.percentage(), 0.0);
            assert_eq!(state.level(), QuotaLevel::Unlimited);
            assert_eq!(state.remaining(), None);
        }
    }

    #[test]
    fn test_warning_boundary_is_inclusive() {
        let state = evaluate_quota(1000, 800);
        assert_eq!(state.percentage(), 80.0);
        assert!(state.should_warn());
        assert_eq!(state.level(), QuotaLevel::Warning);

        let state = evaluate_quota(1000, 799);
        assert!(!state.should_warn());
        assert_eq!(state.level(), QuotaLevel::Normal);
    }

    #[test]
    fn test_exceeded_is_unclamped() {
        let state = evaluate_quota(1000, 1200);
        assert_eq!(state.percentage(), 120.0);
        assert_eq!(state.display_percentage(), 100.0);
        assert!(state.should_warn());
        assert_eq!(state.level(), QuotaLevel::Exceeded);
        assert_eq!(state.remaining(), Some(0));

        let banner = QuotaBanner::from_state(&state).unwrap();
        assert_eq!(banner.kind(), BannerKind::Exceeded);
        assert_eq!(banner.title(), "Event quota exceeded");
        assert!(banner.message().contains("120%"));
    }

    #[test]
    fn test_exactly_full_is_exceeded() {
        let state = evaluate_quota(1000, 1000);
        assert_eq!(state.level(), QuotaLevel::Exceeded);
    }

    #[test]
    fn test_banner_selection() {
        assert!(QuotaBanner::from_state(&evaluate_quota(1000, 500)).is_none());
        assert!(QuotaBanner::from_state(&evaluate_quota(0, 500)).is_none());

        let banner = QuotaBanner::from_state(&evaluate_quota(1000, 900)).unwrap();
        assert_eq!(banner.kind(), BannerKind::Warning);
        assert!(banner.message().contains("900 of your 1,000"));
    }

    #[test]
    fn test_missing_organization_is_neutral() {
        let state = QuotaState::for_organization(None);
        assert!(!state.should_warn());
        assert!(!state.is_unlimited());
        assert_eq!(state.events_used(), 0);
        assert_eq!(state.percentage(), 0.0);
        assert_eq!(state.level(), QuotaLevel::Normal);
        assert!(QuotaBanner::from_state(&state).is_none());
    }

    #[test]
    fn test_for_organization() {
        let org = Organization::new("o".into(), "Acme".into(), 10_000, 8_500, Plan::Free);
        let state = QuotaState::for_organization(Some(&org));
        assert_eq!(state.percentage(), 85.0);
        assert_eq!(state.remaining(), Some(1_500));
        assert_eq!(state.level(), QuotaLevel::Warning);
    }

    #[test]
    fn test_custom_thresholds() {
        let thresholds = QuotaThresholds::new(50.0, 90.0).unwrap();
        assert_eq!(
            evaluate_quota_with(&thresholds, 100, 50).level(),
            QuotaLevel::Warning
        );
        assert_eq!(
            evaluate_quota_with(&thresholds, 100, 90).level(),
            QuotaLevel::Exceeded
        );
        assert!(QuotaThresholds::new(90.0, 50.0).is_err());
        assert!(QuotaThresholds::new(f64::NAN, 100.0).is_err());
    }
}
