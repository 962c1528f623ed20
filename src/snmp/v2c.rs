use std::time::Duration;

use snmp2::{AsyncSession, Oid};
use tokio::time::timeout;
use tracing::debug;

use super::variable::Response;
use crate::error::SnmpError;

const STARTING_REQUEST_ID: i32 = 1;
/// Шаг начального request-id между переоткрытиями сессии.
const REQUEST_ID_STRIDE: i32 = 65_536;

/// Сессия SNMP v2c с одним агентом.
///
/// Каждая попытка ограничена `timeout`; без ответа запрос повторяется ещё
/// `retries` раз. Перед повтором сессия открывается заново на новом UDP
/// сокете, поэтому запоздавший ответ на старый запрос не попадёт к
/// следующему. Сокет закрывается при drop.
pub struct SnmpClientV2c {
    session: AsyncSession,
    target: String,
    community: Vec<u8>,
    reopened: i32,
    retries: u32,
    timeout: Duration,
}

/// Чем закончилась неудачная попытка.
enum Miss {
    TimedOut,
    StaleReply,
}

impl SnmpClientV2c {
    pub async fn new(
        target: &str,
        community: &[u8],
        retries: u32,
        timeout: Duration,
    ) -> Result<Self, SnmpError> {
        let session = open(target, community, STARTING_REQUEST_ID).await?;

        Ok(Self {
            session,
            target: target.to_string(),
            community: community.to_vec(),
            reopened: 0,
            retries,
            timeout,
        })
    }

    /// Отправляет один get-запрос со всеми OID из `oids`.
    pub async fn get_many(&mut self, oids: &[Oid<'static>]) -> Result<Response, SnmpError> {
        let names: Vec<&Oid<'_>> = oids.iter().collect();
        let attempts = self.retries + 1;

        for attempt in 1..=attempts {
            let miss = match timeout(self.timeout, self.session.get_many(&names)).await {
                Ok(Ok(pdu)) => return Ok(Response::from_pdu(pdu)),
                Ok(Err(snmp2::Error::RequestIdMismatch)) => Miss::StaleReply,
                Ok(Err(e)) => return Err(SnmpError::Request(e.to_string())),
                Err(_) => Miss::TimedOut,
            };

            match miss {
                Miss::TimedOut => debug!(target_addr = %self.target, attempt, attempts, "SNMP request timed out"),
                Miss::StaleReply => debug!(target_addr = %self.target, attempt, attempts, "discarded reply to an earlier request"),
            }

            // Ответ на брошенный запрос может ещё прийти: новый сокет и
            // другие request-id.
            self.reopened = (self.reopened + 1) % (i32::MAX / REQUEST_ID_STRIDE);
            let request_id = STARTING_REQUEST_ID + self.reopened * REQUEST_ID_STRIDE;
            self.session = open(&self.target, &self.community, request_id).await?;
        }

        Err(SnmpError::Timeout { attempts })
    }
}

async fn open(target: &str, community: &[u8], request_id: i32) -> Result<AsyncSession, SnmpError> {
    AsyncSession::new_v2c(target, community, request_id)
        .await
        .map_err(|source| SnmpError::Session {
            target: target.to_string(),
            source,
        })
}
