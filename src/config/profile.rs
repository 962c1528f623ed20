use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::snmp::parse_oid;
use crate::stats::{Catalog, Mapper, Statistic};

/// Набор статистик для конкретных устройств, например MIB производителя.
///
/// ```yaml
/// name: apc
/// statistics:
///   - name: ApcBatteryCapacity
///     unit: "%"
///     oids: [1.3.6.1.4.1.318.1.1.1.2.2.1.0]
///   - name: ApcBatteryVoltage
///     unit: volts (DC)
///     oids: [1.3.6.1.4.1.318.1.1.1.2.3.4.0, 1.3.6.1.4.1.318.1.1.1.2.2.8.0]
///     mapper: {div: 10}
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub statistics: Vec<StatisticDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatisticDef {
    pub name: String,
    #[serde(default)]
    pub unit: String,
    /// OID-кандидаты по приоритету
    pub oids: Vec<String>,
    #[serde(default, with = "serde_yml::with::singleton_map")]
    pub mapper: Mapper,
}

impl Profile {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let profile: Profile = serde_yml::from_str(&content).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })?;

        if profile.statistics.is_empty() {
            return Err(ConfigError::EmptyProfile(profile.name));
        }

        Ok(profile)
    }

    pub fn statistics(&self) -> Result<Vec<Statistic>, ConfigError> {
        self.statistics
            .iter()
            .map(|def| self.build(def))
            .collect()
    }

    /// Регистрирует все статистики поверх `catalog`.
    pub fn apply(&self, catalog: &mut Catalog) -> Result<(), ConfigError> {
        for stat in self.statistics()? {
            catalog.register(stat);
        }
        Ok(())
    }

    fn build(&self, def: &StatisticDef) -> Result<Statistic, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidStatistic {
            profile: self.name.clone(),
            name: def.name.clone(),
            reason,
        };

        if def.name.is_empty() {
            return Err(invalid("missing name".to_string()));
        }
        if def.oids.is_empty() {
            return Err(invalid("no object ID specified".to_string()));
        }

        let oids = def
            .oids
            .iter()
            .map(|oid| parse_oid(oid).map_err(|e| invalid(e.to_string())))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Statistic {
            name: def.name.clone(),
            unit: def.unit.clone(),
            oids,
            mapper: def.mapper.clone(),
        })
    }
}
