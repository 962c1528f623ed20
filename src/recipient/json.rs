use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{ErrorHandler, Recipient};
use crate::collector::Value;
use crate::error::{QueryError, RecipientError};
use crate::source::Source;

/// Один JSON документ на значение.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueJson {
    pub source: String,
    pub host: String,
    pub port: u16,
    pub statistic: String,
    pub unit: String,
    pub timestamp: String,
    pub value: Option<f64>,
    pub status: String, // "success" | "not_supported" | "error"
    pub error: Option<String>,
}

/// Выводится вместо значений, если источник опросить не удалось.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryErrorJson {
    pub source: String,
    pub host: String,
    pub port: u16,
    pub index: usize,
    pub timestamp: String,
    pub status: String, // "query_error"
    pub error: String,
}

pub struct JsonFormatter;

impl JsonFormatter {
    pub fn format_value(value: &Value<'_>) -> ValueJson {
        let status = match value.error() {
            None => "success",
            Some(err) if err.is_not_supported() => "not_supported",
            Some(_) => "error",
        };

        ValueJson {
            source: value.source.label(),
            host: value.source.host.clone(),
            port: value.source.port,
            statistic: value.stat.name.clone(),
            unit: value.stat.unit.clone(),
            timestamp: value.time.to_rfc3339(),
            value: value.result.as_ref().ok().copied(),
            status: status.to_string(),
            error: value.error().map(ToString::to_string),
        }
    }

    pub fn format_query_error(index: usize, source: &Source, err: &QueryError) -> QueryErrorJson {
        QueryErrorJson {
            source: source.label(),
            host: source.host.clone(),
            port: source.port,
            index,
            timestamp: chrono::Utc::now().to_rfc3339(),
            status: "query_error".to_string(),
            error: err.to_string(),
        }
    }

    pub fn to_json_string<T: Serialize>(document: &T, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(document)
        } else {
            serde_json::to_string(document)
        }
    }
}

/// Пишет JSON строки в stdout. Адрес `pretty` включает форматированный
/// вывод.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRecipient {
    pretty: bool,
}

pub fn parse(address: &str) -> Result<Box<dyn Recipient>, RecipientError> {
    let pretty = match address.to_lowercase().as_str() {
        "" | "compact" => false,
        "pretty" => true,
        _ => {
            return Err(RecipientError::InvalidAddress {
                kind: "json",
                address: address.to_string(),
                reason: "expected \"pretty\" or \"compact\"".to_string(),
            });
        }
    };
    Ok(Box::new(JsonRecipient { pretty }))
}

impl JsonRecipient {
    fn emit<T: Serialize>(&self, document: &T) {
        match JsonFormatter::to_json_string(document, self.pretty) {
            Ok(json) => println!("{}", json),
            Err(e) => warn!(error = %e, "JSON serialization failed"),
        }
    }
}

#[async_trait]
impl Recipient for JsonRecipient {
    async fn send(&self, value: &Value<'_>) {
        self.emit(&JsonFormatter::format_value(value));
    }

    fn error_handler(&self) -> Option<&dyn ErrorHandler> {
        Some(self)
    }
}

impl ErrorHandler for JsonRecipient {
    fn send_query_error(&self, index: usize, source: &Source, err: &QueryError) {
        self.emit(&JsonFormatter::format_query_error(index, source, err));
    }
}
