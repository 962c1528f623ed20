//! Получатели собранных значений.
//!
//! Получатель записывается как `type` или `type:address`. Формат адреса
//! определяет тип получателя.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::collector::Value;
use crate::error::{ParseError, QueryError, RecipientError};
use crate::source::Source;

pub mod console;
pub mod dispatch;
pub mod json;
pub mod stathat;

pub use console::ConsoleRecipient;
pub use dispatch::{CycleSummary, execute};
pub use json::JsonRecipient;
pub use stathat::StatHatRecipient;

/// То, чему можно отправлять значения.
///
/// Дополнительные возможности сообщаются через методы-обработчики.
#[async_trait]
pub trait Recipient: Send + Sync {
    async fn send(&self, value: &Value<'_>);

    /// Есть, если получатель хочет знать о каждом источнике до запроса.
    fn source_handler(&self) -> Option<&dyn SourceHandler> {
        None
    }

    /// Есть, если получатель хочет знать о неудачных запросах.
    fn error_handler(&self) -> Option<&dyn ErrorHandler> {
        None
    }
}

pub trait SourceHandler: Send + Sync {
    fn send_source(&self, index: usize, source: &Source);
}

pub trait ErrorHandler: Send + Sync {
    fn send_query_error(&self, index: usize, source: &Source, err: &QueryError);
}

/// Создаёт получателя из адресной части определения.
pub type RecipientParser = fn(&str) -> Result<Box<dyn Recipient>, RecipientError>;

/// Типы получателей по имени без учёта регистра.
#[derive(Clone, Default)]
pub struct RecipientRegistry {
    parsers: HashMap<String, RecipientParser>,
}

impl RecipientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// `console`, `json`, `stathat`.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(console::parse, &["console"]);
        registry.register(json::parse, &["json"]);
        registry.register(stathat::parse, &["stathat"]);
        registry
    }

    pub fn register(&mut self, parser: RecipientParser, names: &[&str]) {
        for name in names {
            self.parsers.insert(name.to_lowercase(), parser);
        }
    }

    /// Зарегистрированные имена типов, по алфавиту.
    pub fn types(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.parsers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn parse_recipient(&self, s: &str) -> Result<Box<dyn Recipient>, RecipientError> {
        if s.is_empty() {
            return Err(RecipientError::Empty);
        }

        let (kind, address) = s.split_once(':').unwrap_or((s, ""));

        let parse = self
            .parsers
            .get(&kind.to_lowercase())
            .ok_or_else(|| RecipientError::UnknownType(kind.to_string()))?;

        parse(address)
    }

    /// Парсит список определений через запятую. Результат только если
    /// разобрались все.
    pub fn parse_recipients(&self, s: &str) -> Result<Vec<Box<dyn Recipient>>, ParseError> {
        s.split(',')
            .enumerate()
            .map(|(index, item)| {
                self.parse_recipient(item.trim())
                    .map_err(|source| ParseError::Recipient { index, source })
            })
            .collect()
    }
}
