use std::collections::HashMap;

use tracing::debug;

use super::mapper::Mapper;
use super::statistic::Statistic;
use crate::error::{ParseError, StatisticError};
use crate::snmp::parse_oid;

/// Значения upsOutputSource (UPS-MIB, RFC 1628).
pub mod output_source {
    pub const OTHER: i64 = 1;
    pub const NONE: i64 = 2;
    pub const NORMAL: i64 = 3;
    pub const BYPASS: i64 = 4;
    pub const BATTERY: i64 = 5;
    pub const BOOSTER: i64 = 6;
    pub const REDUCER: i64 = 7;
}

/// Ключевое слово, раскрывающееся во все статистики каталога.
pub const ALL: &str = "all";

/// Статистики по именам. Поиск без учёта регистра, обход в порядке
/// регистрации.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<Statistic>,
    index: HashMap<String, usize>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Статистики UPS-MIB, которые поддерживает почти любое устройство.
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        for stat in [
            Statistic::builtin(
                "EstimatedMinutesRemaining",
                "minutes",
                &["1.3.6.1.2.1.33.1.2.3.0"],
                Mapper::Ident,
            ),
            Statistic::builtin(
                "EstimatedChargeRemaining",
                "%",
                &["1.3.6.1.2.1.33.1.2.4.0"],
                Mapper::Ident,
            ),
            Statistic::builtin(
                "BatteryVoltage",
                "volts (DC)",
                &["1.3.6.1.2.1.33.1.2.5.0"],
                Mapper::Div(10.0),
            ),
            Statistic::builtin(
                "BatteryTemperature",
                "°C",
                &["1.3.6.1.2.1.33.1.2.7.0"],
                Mapper::Ident,
            ),
            Statistic::builtin(
                "OnBattery",
                "yes/no",
                &["1.3.6.1.2.1.33.1.4.1.0"],
                Mapper::matching([output_source::BATTERY]),
            ),
            Statistic::builtin(
                "InputVoltage",
                "volts",
                &["1.3.6.1.2.1.33.1.3.3.1.3.1"],
                Mapper::Ident,
            ),
            Statistic::builtin(
                "InputCurrent",
                "amps",
                &["1.3.6.1.2.1.33.1.3.3.1.4.1"],
                Mapper::Div(10.0),
            ),
            Statistic::builtin(
                "OutputVoltage",
                "volts",
                &["1.3.6.1.2.1.33.1.4.4.1.2.1"],
                Mapper::Ident,
            ),
            Statistic::builtin(
                "OutputCurrent",
                "amps",
                &["1.3.6.1.2.1.33.1.4.4.1.3.1"],
                Mapper::Div(10.0),
            ),
            Statistic::builtin(
                "OutputPower",
                "watts",
                &["1.3.6.1.2.1.33.1.4.4.1.4.1"],
                Mapper::Ident,
            ),
            Statistic::builtin(
                "OutputPercentLoad",
                "%",
                &["1.3.6.1.2.1.33.1.4.4.1.5.1"],
                Mapper::Ident,
            ),
        ] {
            catalog.register(stat);
        }
        catalog
    }

    /// Добавляет `stat`. Запись с тем же именем заменяется на своём месте.
    pub fn register(&mut self, stat: Statistic) {
        let key = stat.name.to_lowercase();
        match self.index.get(&key) {
            Some(&position) => {
                debug!(statistic = %stat.name, "replacing catalog entry");
                self.entries[position] = stat;
            }
            None => {
                self.index.insert(key, self.entries.len());
                self.entries.push(stat);
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Statistic> {
        self.index
            .get(&key.to_lowercase())
            .map(|&position| &self.entries[position])
    }

    /// Все записи в порядке регистрации.
    pub fn all(&self) -> &[Statistic] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Парсит описание статистики вида
    ///
    /// ```text
    /// KEY,name:NAME,oid:OID,unit:UNIT
    /// ```
    ///
    /// Сегмент без двоеточия копирует запись каталога с этим именем,
    /// сегменты `property:value` заменяют отдельные поля. Побеждает более
    /// поздний сегмент. Неизвестные свойства пропускаются. Примеры:
    ///
    /// ```text
    /// EstimatedMinutesRemaining
    /// name:WidgetDuration,oid:1.3.6.1.4.1.99.1.0
    /// EstimatedMinutesRemaining,name:ZomboMinutes,unit:min
    /// ```
    pub fn parse_statistic(&self, s: &str) -> Result<Statistic, StatisticError> {
        if s.is_empty() {
            return Err(StatisticError::Empty);
        }

        let mut stat = Statistic::default();

        for segment in s.split(',') {
            let Some((property, value)) = segment.split_once(':') else {
                stat = self
                    .get(segment)
                    .cloned()
                    .ok_or_else(|| StatisticError::Unknown(segment.to_string()))?;
                continue;
            };

            match property.to_lowercase().as_str() {
                "name" => stat.name = value.to_string(),
                "unit" => stat.unit = value.to_string(),
                "oid" => {
                    let oid = parse_oid(value).map_err(|e| StatisticError::InvalidOid {
                        input: s.to_string(),
                        oid: value.to_string(),
                        reason: e.reason,
                    })?;
                    stat.oids = vec![oid];
                }
                _ => debug!(statistic = s, property, "ignoring unknown statistic property"),
            }
        }

        if stat.oids.is_empty() {
            return Err(StatisticError::NoObjectId(s.to_string()));
        }

        Ok(stat)
    }

    /// Парсит список описаний. Элемент `all` раскрывается во все записи
    /// каталога.
    pub fn parse_statistics<S: AsRef<str>>(&self, items: &[S]) -> Result<Vec<Statistic>, ParseError> {
        let mut stats = Vec::new();
        for (index, item) in items.iter().enumerate() {
            let item = item.as_ref().trim();
            if item.eq_ignore_ascii_case(ALL) {
                stats.extend_from_slice(self.all());
                continue;
            }
            let stat = self
                .parse_statistic(item)
                .map_err(|source| ParseError::Statistic { index, source })?;
            stats.push(stat);
        }
        Ok(stats)
    }
}
