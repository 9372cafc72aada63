use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("tier table must contain at least one tier")]
    EmptyTierTable,

    #[error("first tier starts at {found}, events below it would never be priced")]
    FirstTierStart { found: u64 },

    #[error("tier {index} starts at {found}, expected {expected}")]
    TierGap {
        index: usize,
        expected: u64,
        found: u64,
    },

    #[error("tier {index} ends before it starts")]
    InvertedTier { index: usize },

    #[error("only the last tier may be unbounded (tier {index} is not last)")]
    UnboundedInnerTier { index: usize },

    #[error("the last tier must be unbounded")]
    BoundedLastTier,

    #[error("tier {index} has a negative or non-finite price")]
    InvalidPrice { index: usize },

    #[error("minimum billing amount must be finite and non-negative")]
    InvalidMinimum,

    #[error("quota thresholds must satisfy 0 <= warning <= exceeded")]
    InvalidThresholds,
}
