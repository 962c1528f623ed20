//! Ошибки powerstat.
//!
//! Ошибки разбора фатальны при запуске. Ошибка запроса прерывает только один
//! источник. Ошибки статистик идут вместе со значениями и цикл не
//! останавливают.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Не удалось разобрать адрес источника.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SourceError {
    #[error("empty source address")]
    Empty,

    #[error("no host address specified for source \"{0}\"")]
    MissingHost(String),

    #[error("invalid host port for source \"{input}\": {reason}")]
    InvalidHostPort { input: String, reason: String },

    #[error("invalid port \"{port}\" for source \"{input}\"")]
    InvalidPort { input: String, port: String },
}

/// Не удалось разобрать описание статистики.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StatisticError {
    #[error("empty statistic description")]
    Empty,

    #[error("unknown statistic \"{0}\"")]
    Unknown(String),

    #[error("unable to parse oid \"{oid}\" in statistic description \"{input}\": {reason}")]
    InvalidOid {
        input: String,
        oid: String,
        reason: String,
    },

    #[error("no object ID specified within \"{0}\"")]
    NoObjectId(String),
}

/// Не удалось разобрать или создать получателя.
#[derive(Debug, Error)]
pub enum RecipientError {
    #[error("empty recipient definition")]
    Empty,

    #[error("unknown recipient type: \"{0}\"")]
    UnknownType(String),

    #[error("invalid {kind} recipient address \"{address}\": {reason}")]
    InvalidAddress {
        kind: &'static str,
        address: String,
        reason: String,
    },

    #[error("failed to build {kind} recipient: {source}")]
    Build {
        kind: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

/// Ошибка разбора списка на элементе с указанным индексом (с нуля).
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("unable to parse source address {index}: {source}")]
    Source {
        index: usize,
        #[source]
        source: SourceError,
    },

    #[error("unable to parse statistic definition {index}: {source}")]
    Statistic {
        index: usize,
        #[source]
        source: StatisticError,
    },

    #[error("unable to parse recipient {index}: {source}")]
    Recipient {
        index: usize,
        #[source]
        source: RecipientError,
    },
}

/// SNMP переменную не удалось преобразовать в число.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MapError {
    #[error("unexpected non-integer SNMP variable type {0}")]
    UnexpectedType(&'static str),
}

/// Ошибка SNMP на транспортном уровне.
#[derive(Debug, Error)]
pub enum SnmpError {
    #[error("failed to open SNMP session to {target}: {source}")]
    Session {
        target: String,
        #[source]
        source: io::Error,
    },

    #[error("{0}")]
    Request(String),

    #[error("no response after {attempts} attempt(s)")]
    Timeout { attempts: u32 },
}

/// Почему у статистики нет значения.
#[derive(Debug, Error)]
pub enum StatError {
    #[error("not supported (no such instance)")]
    NoSuchInstance,

    #[error("not supported (no such object)")]
    NoSuchObject,

    #[error("failed to execute SNMP request: {0}")]
    Request(#[source] SnmpError),

    #[error("SNMP agent returned an error: [{index}] {status}")]
    Agent { status: &'static str, index: u32 },

    #[error("unable to parse returned value {value}: {source}")]
    Map {
        value: String,
        #[source]
        source: MapError,
    },

    #[error("no value returned")]
    NoValue,
}

impl StatError {
    /// true, если агент сообщил, что объекта или экземпляра на устройстве нет.
    pub fn is_not_supported(&self) -> bool {
        matches!(self, StatError::NoSuchInstance | StatError::NoSuchObject)
    }
}

/// Запрос к источнику целиком не удался, значений нет.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("failed to open connection: {0}")]
    Connect(#[source] SnmpError),
}

/// Ошибки файлов конфигурации.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse YAML in {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yml::Error,
    },

    #[error("profile '{0}' declares no statistics")]
    EmptyProfile(String),

    #[error("statistic \"{name}\" in profile '{profile}': {reason}")]
    InvalidStatistic {
        profile: String,
        name: String,
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_missing_objects_are_not_supported() {
        assert!(StatError::NoSuchInstance.is_not_supported());
        assert!(StatError::NoSuchObject.is_not_supported());
        assert!(!StatError::NoValue.is_not_supported());

        let mapping = StatError::Map {
            value: "\"abc\"".to_string(),
            source: MapError::UnexpectedType("OCTET STRING"),
        };
        assert!(!mapping.is_not_supported());
    }

    #[test]
    fn batch_errors_carry_the_index() {
        let err = ParseError::Source {
            index: 3,
            source: SourceError::Empty,
        };
        assert_eq!(
            err.to_string(),
            "unable to parse source address 3: empty source address"
        );
    }
}
