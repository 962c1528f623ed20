use std::time::Duration;

use async_trait::async_trait;
use snmp2::Oid;

use crate::error::SnmpError;
use crate::source::Source;

pub mod oid;
pub mod v2c;
pub mod variable;

pub use oid::{InvalidOid, parse_oid};
pub use v2c::SnmpClientV2c;
pub use variable::{Response, Variable, error_status_name};

/// Открытая сессия с SNMP агентом.
#[async_trait]
pub trait Agent: Send {
    /// Один get-запрос сразу для всех `oids`.
    async fn get_many(&mut self, oids: &[Oid<'static>]) -> Result<Response, SnmpError>;
}

/// Открывает сессии с агентами источников.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, source: &Source) -> Result<Box<dyn Agent>, SnmpError>;
}

#[async_trait]
impl Agent for SnmpClientV2c {
    async fn get_many(&mut self, oids: &[Oid<'static>]) -> Result<Response, SnmpError> {
        SnmpClientV2c::get_many(self, oids).await
    }
}

/// Подключение к источникам по UDP, SNMP v2c.
#[derive(Debug, Clone)]
pub struct V2cConnector {
    timeout: Duration,
}

impl V2cConnector {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl Connector for V2cConnector {
    async fn connect(&self, source: &Source) -> Result<Box<dyn Agent>, SnmpError> {
        let client = SnmpClientV2c::new(
            &source.host_port(),
            source.community.as_bytes(),
            source.retries,
            self.timeout,
        )
        .await?;
        Ok(Box::new(client))
    }
}
