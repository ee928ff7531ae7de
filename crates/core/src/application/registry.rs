// Unit Registry - resolves unit ids to their configuration

use std::collections::HashMap;

use tracing::debug;

use crate::domain::{UnitConfig, UnitId};
use crate::error::{AppError, Result};

/// Read-only catalog of configured units
///
/// Built once at startup; the engine never mutates it.
#[derive(Debug, Clone, Default)]
pub struct UnitRegistry {
    units: HashMap<UnitId, UnitConfig>,
}

impl UnitRegistry {
    /// Build a registry, rejecting invalid or duplicate unit definitions
    pub fn new(units: impl IntoIterator<Item = UnitConfig>) -> Result<Self> {
        let mut map = HashMap::new();

        for unit in units {
            unit.validate().map_err(|e| AppError::Config(e.to_string()))?;

            if map.contains_key(&unit.id) {
                return Err(AppError::Config(format!(
                    "unit '{}' is configured more than once",
                    unit.id
                )));
            }
            map.insert(unit.id.clone(), unit);
        }

        Ok(Self { units: map })
    }

    /// Registry with no configured units; every lookup falls back
    pub fn empty() -> Self {
        Self::default()
    }

    /// Configuration for `unit_id`, or the default configuration when unknown
    pub fn resolve(&self, unit_id: &str) -> UnitConfig {
        match self.units.get(unit_id) {
            Some(config) => config.clone(),
            None => {
                debug!(unit_id = %unit_id, "Unit not configured, using default configuration");
                UnitConfig::fallback(unit_id)
            }
        }
    }

    /// Strict lookup: unknown units are an error
    pub fn lookup(&self, unit_id: &str) -> Result<&UnitConfig> {
        self.units
            .get(unit_id)
            .ok_or_else(|| AppError::UnitNotFound(unit_id.to_string()))
    }

    pub fn is_configured(&self, unit_id: &str) -> bool {
        self.units.contains_key(unit_id)
    }

    pub fn unit_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.units.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clinic() -> UnitConfig {
        let mut config = UnitConfig::fallback("pb-carolina");
        config.name = "UBS PB Carolina".to_string();
        config.offset = 1;
        config.priority_eligible = true;
        config
    }

    #[test]
    fn test_resolve_configured_unit() {
        let registry = UnitRegistry::new(vec![clinic()]).unwrap();
        let config = registry.resolve("pb-carolina");
        assert_eq!(config.name, "UBS PB Carolina");
        assert!(config.priority_eligible);
    }

    #[test]
    fn test_resolve_unknown_falls_back() {
        let registry = UnitRegistry::new(vec![clinic()]).unwrap();
        let config = registry.resolve("never-configured");
        assert_eq!(config.id, "never-configured");
        assert_eq!(config.prefix, "A");
        assert_eq!(config.offset, 0);
    }

    #[test]
    fn test_lookup_is_strict() {
        let registry = UnitRegistry::empty();
        assert_eq!(
            registry.lookup("nowhere").unwrap_err(),
            AppError::UnitNotFound("nowhere".to_string())
        );
    }

    #[test]
    fn test_duplicate_units_rejected() {
        let err = UnitRegistry::new(vec![clinic(), clinic()]).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_invalid_unit_rejected() {
        let mut bad = clinic();
        bad.prefix = String::new();
        assert!(matches!(
            UnitRegistry::new(vec![bad]),
            Err(AppError::Config(_))
        ));
    }
}
