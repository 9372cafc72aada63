use crate::data_structures::Organization;
use anyhow::{Context, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Reads organization payloads exported from the platform API.
///
/// Accepts either the bare organization object or the `{"organization": {...}}`
/// envelope returned by the API.
pub struct OrganizationLoader;

impl OrganizationLoader {
    pub fn new() -> Self {
        Self
    }

    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<Organization> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to open file: {}", path.display()))?;

        let organization = self
            .parse(&content)
            .with_context(|| format!("Failed to parse organization: {}", path.display()))?;

        debug!(
            path = %path.display(),
            organization = organization.id(),
            events_used = organization.events_used(),
            events_quota = organization.events_quota(),
            "loaded organization"
        );
        Ok(organization)
    }

    pub fn parse(&self, content: &str) -> Result<Organization> {
        let mut json: Value = serde_json::from_str(content).context("Failed to parse JSON")?;

        if json.get("organization").is_some_and(Value::is_object) {
            json = json["organization"].take();
        }

        if !json.is_object() {
            return Err(anyhow::anyhow!("Expected an organization object"));
        }

        serde_json::from_value(json).context("Invalid organization payload")
    }
}

impl Default for OrganizationLoader {
    fn default() -> Self {
        Self::new()
    }
}
