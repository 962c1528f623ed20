use std::fmt;

use snmp2::Oid;

use super::mapper::Mapper;
use crate::snmp::parse_oid;

/// Именованная величина с единицей измерения и одним или несколькими
/// OID-кандидатами.
///
/// `oids` упорядочены по приоритету: берётся первый кандидат с корректным
/// значением.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Statistic {
    pub name: String,
    pub unit: String,
    pub oids: Vec<Oid<'static>>,
    pub mapper: Mapper,
}

impl Statistic {
    /// Создаёт статистику из заведомо корректных OID.
    ///
    /// Паникует на некорректном OID, только для литералов.
    pub(crate) fn builtin(name: &str, unit: &str, oids: &[&str], mapper: Mapper) -> Self {
        let oids = oids
            .iter()
            .map(|oid| parse_oid(oid).unwrap_or_else(|e| panic!("built-in statistic {}: {}", name, e)))
            .collect();

        Self {
            name: name.to_string(),
            unit: unit.to_string(),
            oids,
            mapper,
        }
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.unit.is_empty() {
            write!(f, " ({})", self.unit)?;
        }
        Ok(())
    }
}
