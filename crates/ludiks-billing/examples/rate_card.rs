use ludiks_billing::format::{format_amount, format_events, format_rate};
use ludiks_billing::prelude::*;
use ludiks_billing::CostEstimator;
use std::env;

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    let config = if let Some(path) = args.get(1) {
        println!("Loading billing config from: {}", path);
        BillingConfig::from_file(path)?
    } else {
        BillingConfig::default()
    };
    let currency = config.currency();

    println!("Rate card");
    println!("=========");
    println!(
        "Free allowance: {} events/month",
        format_events(config.free_tier_limit())
    );
    println!(
        "Minimum bill once over the allowance: {}",
        format_amount(config.min_billing_amount(), currency)
    );
    println!();

    for tier in config.tiers() {
        println!("  {:<22} {}", tier.label(), format_rate(tier.price_per_event(), currency));
    }

    println!();
    println!("Sample estimates");
    println!("================");

    let estimator = CostEstimator::new(&config);
    for events in [1_000, 5_000, 5_001, 50_000, 100_000, 100_001, 750_000, 2_000_000] {
        println!(
            "  {:>12} events  estimate {:>12}  charged {:>12}",
            format_events(events),
            format_amount(estimator.estimate_cost(events), currency),
            format_amount(estimator.effective_charge(events), currency)
        );
    }

    Ok(())
}
