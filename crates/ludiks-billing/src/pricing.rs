use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// A contiguous range of total monthly events billed at a fixed rate.
///
/// `to == None` marks the open-ended last tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingTier {
    from: u64,
    #[serde(default)]
    to: Option<u64>,
    price_per_event: f64,
}

impl PricingTier {
    pub fn new(from: u64, to: Option<u64>, price_per_event: f64) -> Self {
        Self {
            from,
            to,
            price_per_event,
        }
    }

    pub fn from(&self) -> u64 {
        self.from
    }

    pub fn to(&self) -> Option<u64> {
        self.to
    }

    pub fn price_per_event(&self) -> f64 {
        self.price_per_event
    }

    pub fn is_unbounded(&self) -> bool {
        self.to.is_none()
    }

    pub fn is_free(&self) -> bool {
        self.price_per_event == 0.0
    }

    /// Number of events in `[lo, hi]` that fall inside this tier.
    pub fn overlap(&self, lo: u64, hi: u64) -> u64 {
        let start = lo.max(self.from);
        let end = match self.to {
            Some(to) => hi.min(to),
            None => hi,
        };

        if end < start {
            0
        } else {
            end - start + 1
        }
    }

    /// Human-readable range, e.g. `"5,001 - 100,000"` or `"500,001+"`.
    pub fn label(&self) -> String {
        match self.to {
            Some(to) => format!(
                "{} - {}",
                crate::format::format_events(self.from),
                crate::format::format_events(to)
            ),
            None => format!("{}+", crate::format::format_events(self.from)),
        }
    }
}

const DEFAULT_TIERS: [PricingTier; 4] = [
    PricingTier {
        from: 1,
        to: Some(5_000),
        price_per_event: 0.0,
    },
    PricingTier {
        from: 5_001,
        to: Some(100_000),
        price_per_event: 0.001,
    },
    PricingTier {
        from: 100_001,
        to: Some(500_000),
        price_per_event: 0.0008,
    },
    PricingTier {
        from: 500_001,
        to: None,
        price_per_event: 0.0006,
    },
];

/// Ordered, gapless, immutable list of pricing tiers.
///
/// Used both to compute costs and to render the rate card, so the two can
/// never disagree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TierTable {
    tiers: Vec<PricingTier>,
}

impl TierTable {
    pub fn new(tiers: Vec<PricingTier>) -> Result<Self, ConfigError> {
        Self::validate(&tiers)?;
        Ok(Self { tiers })
    }

    pub fn tiers(&self) -> &[PricingTier] {
        &self.tiers
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PricingTier> {
        self.tiers.iter()
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    /// Tier containing the given absolute event count, if any.
    pub fn tier_for(&self, events: u64) -> Option<&PricingTier> {
        self.tiers.iter().find(|tier| tier.overlap(events, events) == 1)
    }

    fn validate(tiers: &[PricingTier]) -> Result<(), ConfigError> {
        if tiers.is_empty() {
            return Err(ConfigError::EmptyTierTable);
        }

        if tiers[0].from > 1 {
            return Err(ConfigError::FirstTierStart {
                found: tiers[0].from,
            });
        }

        let last = tiers.len() - 1;
        for (index, tier) in tiers.iter().enumerate() {
            if !tier.price_per_event.is_finite() || tier.price_per_event < 0.0 {
                return Err(ConfigError::InvalidPrice { index });
            }

            match tier.to {
                Some(to) if to < tier.from => return Err(ConfigError::InvertedTier { index }),
                Some(_) if index == last => return Err(ConfigError::BoundedLastTier),
                None if index != last => return Err(ConfigError::UnboundedInnerTier { index }),
                _ => {}
            }

            if let Some(next) = tiers.get(index + 1) {
                // `to` is Some here: an unbounded inner tier was rejected above.
                let expected = tier.to.map_or(u64::MAX, |to| to.saturating_add(1));
                if next.from != expected {
                    return Err(ConfigError::TierGap {
                        index: index + 1,
                        expected,
                        found: next.from,
                    });
                }
            }
        }

        Ok(())
    }
}

impl Default for TierTable {
    fn default() -> Self {
        Self {
            tiers: DEFAULT_TIERS.to_vec(),
        }
    }
}

impl<'de> Deserialize<'de> for TierTable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let tiers = Vec::<PricingTier>::deserialize(deserializer)?;
        TierTable::new(tiers).map_err(serde::de::Error::custom)
    }
}

impl<'a> IntoIterator for &'a TierTable {
    type Item = &'a PricingTier;
    type IntoIter = std::slice::Iter<'a, PricingTier>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_is_valid() {
        let table = TierTable::default();
        assert_eq!(table.len(), 4);
        assert!(TierTable::new(table.tiers().to_vec()).is_ok());
        assert!(table.tiers()[0].is_free());
        assert!(table.tiers()[3].is_unbounded());
    }

    #[test]
    fn test_tier_for_boundaries() {
        let table = TierTable::default();
        assert_eq!(table.tier_for(5_000).unwrap().from(), 1);
        assert_eq!(table.tier_for(5_001).unwrap().from(), 5_001);
        assert_eq!(table.tier_for(100_000).unwrap().from(), 5_001);
        assert_eq!(table.tier_for(100_001).unwrap().from(), 100_001);
        assert_eq!(table.tier_for(10_000_000).unwrap().from(), 500_001);
        assert!(table.tier_for(0).is_none());
    }

    #[test]
    fn test_overlap() {
        let tier = PricingTier::new(5_001, Some(100_000), 0.001);
        assert_eq!(tier.overlap(5_001, 100_001), 95_000);
        assert_eq!(tier.overlap(1, 5_000), 0);
        assert_eq!(tier.overlap(50_000, 50_000), 1);

        let open = PricingTier::new(500_001, None, 0.0006);
        assert_eq!(open.overlap(1, 500_010), 10);
    }

    #[test]
    fn test_rejects_gap() {
        let err = TierTable::new(vec![
            PricingTier::new(1, Some(100), 0.0),
            PricingTier::new(102, None, 0.01),
        ])
        .unwrap_err();

        assert_eq!(
            err,
            ConfigError::TierGap {
                index: 1,
                expected: 101,
                found: 102
            }
        );
    }

    #[test]
    fn test_rejects_bounded_last_and_negative_price() {
        assert_eq!(
            TierTable::new(vec![PricingTier::new(1, Some(100), 0.0)]).unwrap_err(),
            ConfigError::BoundedLastTier
        );
        assert_eq!(
            TierTable::new(vec![PricingTier::new(1, None, -0.5)]).unwrap_err(),
            ConfigError::InvalidPrice { index: 0 }
        );
        assert_eq!(
            TierTable::new(vec![]).unwrap_err(),
            ConfigError::EmptyTierTable
        );
        assert_eq!(
            TierTable::new(vec![
                PricingTier::new(1, None, 0.0),
                PricingTier::new(2, None, 0.0)
            ])
            .unwrap_err(),
            ConfigError::UnboundedInnerTier { index: 0 }
        );
    }

    #[test]
    fn test_rejects_hole_below_first_tier() {
        assert_eq!(
            TierTable::new(vec![PricingTier::new(1_000, None, 0.01)]).unwrap_err(),
            ConfigError::FirstTierStart { found: 1_000 }
        );
        assert!(TierTable::new(vec![PricingTier::new(0, None, 0.01)]).is_ok());

        let json = r#"[{"from": 2, "pricePerEvent": 0.5}]"#;
        assert!(serde_json::from_str::<TierTable>(json).is_err());
    }

    #[test]
    fn test_deserialize_validates() {
        let json = r#"[{"from": 1, "to": 10, "pricePerEvent": 0}, {"from": 11, "pricePerEvent": 0.5}]"#;
        let table: TierTable = serde_json::from_str(json).unwrap();
        assert_eq!(table.len(), 2);

        let bad = r#"[{"from": 1, "to": 10, "pricePerEvent": 0}, {"from": 20, "pricePerEvent": 0.5}]"#;
        assert!(serde_json::from_str::<TierTable>(bad).is_err());
    }

    #[test]
    fn test_labels() {
        let table = TierTable::default();
        assert_eq!(table.tiers()[1].label(), "5,001 - 100,000");
        assert_eq!(table.tiers()[3].label(), "500,001+");
    }
}
