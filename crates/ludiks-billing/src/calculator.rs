use crate::config::BillingConfig;
use crate::pricing::PricingTier;

/// Events billed within one tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierCharge {
    tier: PricingTier,
    events: u64,
    subtotal: f64,
}

impl TierCharge {
    pub fn tier(&self) -> &PricingTier {
        &self.tier
    }

    pub fn events(&self) -> u64 {
        self.events
    }

    pub fn subtotal(&self) -> f64 {
        self.subtotal
    }
}

/// Monthly cost estimation over a [`BillingConfig`].
///
/// Tier ranges are expressed in absolute monthly events; only events above
/// the free allowance are charged. Results are not rounded.
pub struct CostEstimator<'a> {
    config: &'a BillingConfig,
}

impl<'a> CostEstimator<'a> {
    pub fn new(config: &'a BillingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BillingConfig {
        self.config
    }

    pub fn billable_events(&self, events: u64) -> u64 {
        events.saturating_sub(self.config.free_tier_limit())
    }

    pub fn estimate_cost(&self, events: u64) -> f64 {
        self.cost_breakdown(events)
            .iter()
            .map(|charge| charge.subtotal)
            .sum()
    }

    /// Raw estimate with the minimum billing amount applied once usage
    /// passes the free allowance.
    pub fn effective_charge(&self, events: u64) -> f64 {
        let estimate = self.estimate_cost(events);
        if events > self.config.free_tier_limit() {
            estimate.max(self.config.min_billing_amount())
        } else {
            estimate
        }
    }

    pub fn cost_breakdown(&self, events: u64) -> Vec<TierCharge> {
        let free_limit = self.config.free_tier_limit();
        if events <= free_limit {
            return Vec::new();
        }

        let first_billable = free_limit + 1;
        let mut remaining = events - free_limit;
        let mut charges = Vec::new();

        for tier in self.config.tiers() {
            if remaining == 0 {
                break;
            }

            let in_tier = tier.overlap(first_billable, events).min(remaining);
            if in_tier == 0 {
                continue;
            }

            remaining -= in_tier;
            charges.push(TierCharge {
                tier: *tier,
                events: in_tier,
                subtotal: in_tier as f64 * tier.price_per_event(),
            });
        }

        charges
    }
}

pub fn estimate_cost(config: &BillingConfig, events: u64) -> f64 {
    CostEstimator::new(config).estimate_cost(events)
}

pub fn effective_charge(config: &BillingConfig, events: u64) -> f64 {
    CostEstimator::new(config).effective_charge(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::TierTable;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_free_allowance_costs_nothing() {
        let config = BillingConfig::default();
        let estimator = CostEstimator::new(&config);

        for events in [0, 1, 2_500, 4_999, 5_000] {
            assert_eq!(estimator.estimate_cost(events), 0.0);
            assert!(estimator.cost_breakdown(events).is_empty());
        }
    }

    #[test]
    fn test_first_billable_event() {
        let config = BillingConfig::default();
        let estimator = CostEstimator::new(&config);

        assert_close(estimator.estimate_cost(5_001), 0.001);
        assert_eq!(estimator.billable_events(5_001), 1);
    }

    #[test]
    fn test_tier_boundaries() {
        let config = BillingConfig::default();
        let estimator = CostEstimator::new(&config);

        assert_close(estimator.estimate_cost(100_000), 95.0);
        assert_close(estimator.estimate_cost(100_001), 95.0008);
        assert_close(estimator.estimate_cost(500_000), 95.0 + 400_000.0 * 0.0008);
        assert_close(
            estimator.estimate_cost(500_001),
            95.0 + 400_000.0 * 0.0008 + 0.0006,
        );
    }

    #[test]
    fn test_breakdown_sums_to_estimate() {
        let config = BillingConfig::default();
        let estimator = CostEstimator::new(&config);

        let breakdown = estimator.cost_breakdown(750_000);
        assert_eq!(breakdown.len(), 3);
        assert_eq!(breakdown[0].events(), 95_000);
        assert_eq!(breakdown[1].events(), 400_000);
        assert_eq!(breakdown[2].events(), 250_000);
        assert_eq!(
            breakdown.iter().map(|c| c.events()).sum::<u64>(),
            estimator.billable_events(750_000)
        );

        let total: f64 = breakdown.iter().map(|c| c.subtotal()).sum();
        assert_close(total, estimator.estimate_cost(750_000));
    }

    #[test]
    fn test_monotonic() {
        let config = BillingConfig::default();
        let estimator = CostEstimator::new(&config);

        let mut previous = 0.0;
        let mut events = 0;
        while events <= 1_200_000 {
            let cost = estimator.estimate_cost(events);
            assert!(cost >= previous, "cost dropped at {events}");
            previous = cost;
            events += 997;
        }
    }

    #[test]
    fn test_idempotent() {
        let config = BillingConfig::default();
        let estimator = CostEstimator::new(&config);
        assert_eq!(
            estimator.estimate_cost(123_456),
            estimator.estimate_cost(123_456)
        );
    }

    #[test]
    fn test_minimum_billing_amount() {
        let config = BillingConfig::default();

        assert_close(estimate_cost(&config, 5_001), 0.001);
        assert_eq!(effective_charge(&config, 5_001), 5.0);
        assert_eq!(effective_charge(&config, 5_000), 0.0);
        assert_eq!(effective_charge(&config, 0), 0.0);
        assert_close(effective_charge(&config, 100_000), 95.0);
    }

    #[test]
    fn test_free_limit_inside_paid_tier() {
        // Free allowance that ends halfway through a priced tier.
        let tiers = TierTable::new(vec![
            PricingTier::new(1, Some(1_000), 0.01),
            PricingTier::new(1_001, None, 0.001),
        ])
        .unwrap();
        let config = BillingConfig::new(500, 0.0, tiers).unwrap();
        let estimator = CostEstimator::new(&config);

        assert_close(estimator.estimate_cost(1_000), 500.0 * 0.01);
        assert_close(estimator.estimate_cost(1_100), 500.0 * 0.01 + 100.0 * 0.001);
    }

    #[test]
    fn test_every_billable_event_is_priced() {
        let tiers = TierTable::new(vec![PricingTier::new(1, None, 0.01)]).unwrap();
        let config = BillingConfig::new(0, 0.0, tiers).unwrap();

        assert_close(estimate_cost(&config, 999), 9.99);
        assert_eq!(CostEstimator::new(&config).cost_breakdown(999)[0].events(), 999);
    }

    #[test]
    fn test_extreme_event_counts_do_not_overflow() {
        let config = BillingConfig::default();
        let estimator = CostEstimator::new(&config);
        assert!(estimator.estimate_cost(u64::MAX).is_finite());
    }
}
