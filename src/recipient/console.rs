use async_trait::async_trait;

use super::{ErrorHandler, Recipient, SourceHandler};
use crate::collector::Value;
use crate::error::{QueryError, RecipientError};
use crate::source::Source;

/// Печатает значения в stdout, группируя их под заголовком источника.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleRecipient;

/// Адрес игнорируется.
pub fn parse(_address: &str) -> Result<Box<dyn Recipient>, RecipientError> {
    Ok(Box::new(ConsoleRecipient))
}

impl ConsoleRecipient {
    pub fn source_line(index: usize, source: &Source) -> String {
        format!("Source {} ({}):", index, source)
    }

    pub fn value_line(value: &Value<'_>) -> String {
        format!("  {}: {}", value.stat.name, value)
    }

    pub fn error_line(err: &QueryError) -> String {
        format!("  Error: {}", err)
    }
}

#[async_trait]
impl Recipient for ConsoleRecipient {
    async fn send(&self, value: &Value<'_>) {
        println!("{}", Self::value_line(value));
    }

    fn source_handler(&self) -> Option<&dyn SourceHandler> {
        Some(self)
    }

    fn error_handler(&self) -> Option<&dyn ErrorHandler> {
        Some(self)
    }
}

impl SourceHandler for ConsoleRecipient {
    fn send_source(&self, index: usize, source: &Source) {
        println!("{}", Self::source_line(index, source));
    }
}

impl ErrorHandler for ConsoleRecipient {
    fn send_query_error(&self, _index: usize, _source: &Source, err: &QueryError) {
        println!("{}", Self::error_line(err));
    }
}
