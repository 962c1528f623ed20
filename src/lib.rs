//! Опрос ИБП и устройств питания по SNMP v2c с передачей статистики
//! подключаемым получателям.
//!
//! Один цикл опроса обходит источники ([`Source`]) по порядку, запрашивает
//! каждую [`Statistic`] в рамках одной сессии через [`collector::query`] и
//! отдаёт полученные [`Value`] каждому [`Recipient`] через
//! [`recipient::execute`].

pub mod collector;
pub mod config;
pub mod error;
pub mod recipient;
pub mod snmp;
pub mod source;
pub mod stats;

pub use collector::{Value, query};
pub use error::{ParseError, QueryError, StatError};
pub use recipient::{Recipient, RecipientRegistry};
pub use source::{Source, SourceDefaults, SourceParser};
pub use stats::{Catalog, Mapper, Statistic};
