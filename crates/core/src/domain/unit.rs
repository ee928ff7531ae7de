// Unit Domain Model

use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, Result};

/// Unit identifier (slug such as "pb-carolina")
pub type UnitId = String;

pub const DEFAULT_PREFIX: &str = "A";
pub const DEFAULT_UNIT_NAME: &str = "Default unit";

/// Kind of service point (informational)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Segment {
    Health,
    Government,
    #[default]
    Commercial,
}

/// Whether a unit accepts new tickets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    #[default]
    Active,
    Pending,
    Suspended,
}

/// Entry of a unit's service catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDef {
    pub id: String,
    pub name: String,
}

/// Unit configuration (immutable once loaded)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitConfig {
    pub id: UnitId,

    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub segment: Segment,
    #[serde(default)]
    pub availability: Availability,

    // Visible numbering
    #[serde(default = "default_prefix")]
    pub prefix: String,
    #[serde(default)]
    pub offset: u32,

    // Feature flags
    #[serde(default)]
    pub priority_eligible: bool,
    #[serde(default)]
    pub table_mode: bool,

    /// Empty means any service label is accepted
    #[serde(default)]
    pub services: Vec<ServiceDef>,
}

fn default_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}

impl UnitConfig {
    /// Configuration used for units nobody configured: prefix "A", offset 0, no features
    pub fn fallback(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: DEFAULT_UNIT_NAME.to_string(),
            segment: Segment::default(),
            availability: Availability::Active,
            prefix: default_prefix(),
            offset: 0,
            priority_eligible: false,
            table_mode: false,
            services: Vec::new(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(DomainError::ValidationError("unit id cannot be empty".to_string()));
        }

        if self.prefix.is_empty() {
            return Err(DomainError::ValidationError(format!(
                "unit '{}': prefix cannot be empty",
                self.id
            )));
        }

        let mut seen = std::collections::HashSet::new();
        for service in &self.services {
            if service.id.trim().is_empty() {
                return Err(DomainError::ValidationError(format!(
                    "unit '{}': service id cannot be empty",
                    self.id
                )));
            }
            if !seen.insert(service.id.as_str()) {
                return Err(DomainError::ValidationError(format!(
                    "unit '{}': duplicate service id '{}'",
                    self.id, service.id
                )));
            }
        }

        Ok(())
    }

    pub fn accepts_tickets(&self) -> bool {
        self.availability == Availability::Active
    }

    pub fn has_catalog(&self) -> bool {
        !self.services.is_empty()
    }

    pub fn find_service(&self, id: &str) -> Option<&ServiceDef> {
        self.services.iter().find(|service| service.id == id)
    }
}
