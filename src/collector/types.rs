use std::fmt;

use chrono::{DateTime, Utc};

use crate::error::StatError;
use crate::source::Source;
use crate::stats::Statistic;

/// Значение одной статистики с одного источника.
#[derive(Debug)]
pub struct Value<'a> {
    pub source: &'a Source,
    pub stat: &'a Statistic,
    pub time: DateTime<Utc>,
    pub result: Result<f64, StatError>,
}

impl Value<'_> {
    /// Ошибка, если значения нет.
    pub fn error(&self) -> Option<&StatError> {
        self.result.as_ref().err()
    }

    pub fn is_not_supported(&self) -> bool {
        self.error().is_some_and(StatError::is_not_supported)
    }

    /// `"<source label> <statistic name>"`.
    pub fn stat_name(&self) -> String {
        format!("{} {}", self.source.label(), self.stat.name)
    }
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.result {
            Ok(value) if self.stat.unit.is_empty() => write!(f, "{}", value),
            Ok(value) => write!(f, "{} {}", value, self.stat.unit),
            Err(err) => write!(f, "{}", err),
        }
    }
}
