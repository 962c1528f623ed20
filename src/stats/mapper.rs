use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::MapError;
use crate::snmp::Variable;

/// Преобразует сырое SNMP целое в значение статистики.
///
/// В YAML профилях записывается как `ident`, `{mul: 0.1}`, `{div: 10}` или
/// `{match: [2, 3]}`; полю нужен `serde_yml::with::singleton_map`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mapper {
    /// Значение без изменений.
    #[default]
    Ident,
    /// Значение, умноженное на множитель.
    Mul(f64),
    /// Значение, делённое на делитель.
    Div(f64),
    /// 1.0, если значение есть в множестве, иначе 0.0.
    Match(BTreeSet<i64>),
}

impl Mapper {
    pub fn matching(set: impl IntoIterator<Item = i64>) -> Self {
        Mapper::Match(set.into_iter().collect())
    }

    pub fn map(&self, variable: &Variable) -> Result<f64, MapError> {
        let Variable::Integer(raw) = variable else {
            return Err(MapError::UnexpectedType(variable.type_name()));
        };

        let value = match self {
            Mapper::Ident => *raw as f64,
            Mapper::Mul(multiplier) => *raw as f64 * multiplier,
            Mapper::Div(divisor) => *raw as f64 / divisor,
            Mapper::Match(set) => {
                if set.contains(raw) {
                    1.0
                } else {
                    0.0
                }
            }
        };

        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ident_passes_integers_through() {
        assert_eq!(Mapper::Ident.map(&Variable::Integer(87)), Ok(87.0));
        assert_eq!(Mapper::Ident.map(&Variable::Integer(-3)), Ok(-3.0));
    }

    #[test]
    fn scales_by_multiplier_and_divisor() {
        assert_eq!(Mapper::Mul(0.5).map(&Variable::Integer(30)), Ok(15.0));
        assert_eq!(Mapper::Div(10.0).map(&Variable::Integer(245)), Ok(24.5));
    }

    #[test]
    fn set_membership_is_an_indicator() {
        let mapper = Mapper::matching([2, 3]);
        assert_eq!(mapper.map(&Variable::Integer(3)), Ok(1.0));
        assert_eq!(mapper.map(&Variable::Integer(5)), Ok(0.0));
    }

    #[test]
    fn rejects_non_integer_variables() {
        let mappers = [
            Mapper::Ident,
            Mapper::Mul(2.0),
            Mapper::Div(10.0),
            Mapper::matching([1]),
        ];
        for mapper in mappers {
            let err = mapper
                .map(&Variable::OctetString(b"online".to_vec()))
                .unwrap_err();
            assert_eq!(
                err.to_string(),
                "unexpected non-integer SNMP variable type OCTET STRING"
            );
        }

        assert_eq!(
            Mapper::Ident.map(&Variable::Counter32(7)),
            Err(MapError::UnexpectedType("Counter32"))
        );
    }

    #[derive(Debug, Deserialize)]
    struct Entry {
        #[serde(with = "serde_yml::with::singleton_map")]
        mapper: Mapper,
    }

    #[test]
    fn deserializes_from_yaml_maps() {
        let entries: Vec<Entry> = serde_yml::from_str(
            "- mapper: ident\n- mapper: {mul: 0.1}\n- mapper: {div: 10}\n- mapper: {match: [2, 3]}\n",
        )
        .unwrap();
        let mappers: Vec<Mapper> = entries.into_iter().map(|e| e.mapper).collect();
        assert_eq!(
            mappers,
            vec![
                Mapper::Ident,
                Mapper::Mul(0.1),
                Mapper::Div(10.0),
                Mapper::matching([2, 3]),
            ]
        );
    }
}
