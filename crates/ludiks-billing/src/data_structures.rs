use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    Free,
    Pro,
    #[serde(other)]
    Other,
}

impl Plan {
    pub fn name(&self) -> &'static str {
        match self {
            Plan::Free => "Free",
            Plan::Pro => "Pro",
            Plan::Other => "Custom",
        }
    }
}

impl Default for Plan {
    fn default() -> Self {
        Plan::Free
    }
}

impl std::fmt::Display for Plan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Read-only view of an organization's monthly consumption.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UsageSnapshot {
    events_used: u64,
    plan: Plan,
}

impl UsageSnapshot {
    pub fn new(events_used: u64, plan: Plan) -> Self {
        Self { events_used, plan }
    }

    pub fn events_used(&self) -> u64 {
        self.events_used
    }

    pub fn plan(&self) -> Plan {
        self.plan
    }
}

/// Organization as returned by the platform API.
///
/// Counters are deserialized leniently: negative, null, non-numeric or
/// non-finite values become `0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    #[serde(default)]
    id: String,
    #[serde(default)]
    name: String,
    /// `0` means unlimited.
    #[serde(default, deserialize_with = "lenient_count")]
    events_quota: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    events_used: u64,
    #[serde(default)]
    plan: Plan,
}

impl Organization {
    pub fn new(id: String, name: String, events_quota: u64, events_used: u64, plan: Plan) -> Self {
        Self {
            id,
            name,
            events_quota,
            events_used,
            plan,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn events_quota(&self) -> u64 {
        self.events_quota
    }

    pub fn events_used(&self) -> u64 {
        self.events_used
    }

    pub fn plan(&self) -> Plan {
        self.plan
    }

    pub fn is_unlimited(&self) -> bool {
        self.events_quota == 0
    }

    pub fn snapshot(&self) -> UsageSnapshot {
        UsageSnapshot::new(self.events_used, self.plan)
    }
}

fn lenient_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(coerce_count(&value))
}

pub(crate) fn coerce_count(value: &serde_json::Value) -> u64 {
    use serde_json::Value;

    match value {
        Value::Number(n) => {
            if let Some(v) = n.as_u64() {
                v
            } else {
                let f = n.as_f64().unwrap_or(0.0);
                if f.is_finite() && f > 0.0 {
                    f.floor() as u64
                } else {
                    warn!(value = %n, "clamping invalid event count to 0");
                    0
                }
            }
        }
        Value::String(s) => match s.trim().parse::<f64>() {
            Ok(f) if f.is_finite() && f > 0.0 => f.floor() as u64,
            _ => {
                warn!(value = %s, "clamping non-numeric event count to 0");
                0
            }
        },
        Value::Null => 0,
        other => {
            warn!(value = %other, "clamping non-numeric event count to 0");
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_organization_payload() {
        let org: Organization = serde_json::from_value(json!({
            "id": "org_1",
            "name": "Acme",
            "eventsQuota": 10000,
            "eventsUsed": 8200,
            "plan": "pro"
        }))
        .unwrap();

        assert_eq!(org.name(), "Acme");
        assert_eq!(org.events_quota(), 10_000);
        assert_eq!(org.events_used(), 8_200);
        assert_eq!(org.plan(), Plan::Pro);
        assert!(!org.is_unlimited());
    }

    #[test]
    fn test_negative_and_null_counts_become_zero() {
        let org: Organization = serde_json::from_value(json!({
            "name": "Acme",
            "eventsQuota": null,
            "eventsUsed": -42
        }))
        .unwrap();

        assert_eq!(org.events_quota(), 0);
        assert_eq!(org.events_used(), 0);
        assert!(org.is_unlimited());
        assert_eq!(org.plan(), Plan::Free);
    }

    #[test]
    fn test_string_and_fractional_counts() {
        let org: Organization = serde_json::from_value(json!({
            "eventsQuota": "5000",
            "eventsUsed": 12.9
        }))
        .unwrap();

        assert_eq!(org.events_quota(), 5_000);
        assert_eq!(org.events_used(), 12);

        let org: Organization =
            serde_json::from_value(json!({ "eventsUsed": "lots" })).unwrap();
        assert_eq!(org.events_used(), 0);
    }

    #[test]
    fn test_unknown_plan_maps_to_other() {
        let org: Organization =
            serde_json::from_value(json!({ "plan": "enterprise" })).unwrap();
        assert_eq!(org.plan(), Plan::Other);
    }

    #[test]
    fn test_snapshot() {
        let org = Organization::new("o".into(), "Acme".into(), 0, 42, Plan::Pro);
        let snapshot = org.snapshot();
        assert_eq!(snapshot.events_used(), 42);
        assert_eq!(snapshot.plan(), Plan::Pro);
        assert_eq!(UsageSnapshot::default(), UsageSnapshot::new(0, Plan::Free));
    }
}
