//! Display helpers shared by every consumer of the billing numbers.

pub fn format_events(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Two decimals followed by the currency suffix, e.g. `"95.00 €"`.
pub fn format_amount(amount: f64, currency: &str) -> String {
    format!("{:.2} {}", amount, currency)
}

/// Per-event rates are tiny, so keep enough precision to tell tiers apart.
pub fn format_rate(price_per_event: f64, currency: &str) -> String {
    if price_per_event == 0.0 {
        "Free".to_string()
    } else {
        format!("{} {}/event", trim_decimal(price_per_event), currency)
    }
}

pub fn format_percentage(percentage: f64) -> String {
    format!("{:.1}%", percentage)
}

fn trim_decimal(value: f64) -> String {
    let s = format!("{:.6}", value);
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}
