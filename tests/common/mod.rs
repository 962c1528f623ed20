#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use snmp2::Oid;
use tokio_util::sync::CancellationToken;

use powerstat::collector::Value;
use powerstat::error::{QueryError, SnmpError};
use powerstat::recipient::{ErrorHandler, Recipient, SourceHandler};
use powerstat::snmp::{Agent, Connector, Response, Variable, parse_oid};
use powerstat::source::Source;

/// Как отвечает поддельное устройство.
#[derive(Clone)]
pub enum Device {
    /// Сессию не открыть.
    Unreachable,
    /// Привязки по OID; отсутствующих в списке OID в ответе нет.
    Answers(HashMap<String, Variable>),
    /// Каждый запрос получает этот error-status.
    Status(u32),
    /// Сессия открывается, но все запросы падают.
    Silent,
}

impl Device {
    pub fn answers(bindings: &[(&str, Variable)]) -> Self {
        Device::Answers(
            bindings
                .iter()
                .map(|(oid, variable)| (oid.to_string(), variable.clone()))
                .collect(),
        )
    }
}

/// Выдаёт поддельных агентов по хосту источника.
#[derive(Clone, Default)]
pub struct MockConnector {
    devices: HashMap<String, Device>,
    pub connects: Arc<Mutex<Vec<String>>>,
    pub requests: Arc<Mutex<Vec<Vec<String>>>>,
    pub closed: Arc<AtomicUsize>,
}

impl MockConnector {
    pub fn with(mut self, host: &str, device: Device) -> Self {
        self.devices.insert(host.to_string(), device);
        self
    }

    pub fn connects(&self) -> Vec<String> {
        self.connects.lock().unwrap().clone()
    }

    pub fn requests(&self) -> Vec<Vec<String>> {
        self.requests.lock().unwrap().clone()
    }

    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Connector for MockConnector {
    async fn connect(&self, source: &Source) -> Result<Box<dyn Agent>, SnmpError> {
        self.connects.lock().unwrap().push(source.host.clone());
        match self.devices.get(&source.host) {
            None | Some(Device::Unreachable) => Err(SnmpError::Session {
                target: source.host_port(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such host"),
            }),
            Some(device) => Ok(Box::new(MockAgent {
                device: device.clone(),
                requests: self.requests.clone(),
                closed: self.closed.clone(),
            })),
        }
    }
}

struct MockAgent {
    device: Device,
    requests: Arc<Mutex<Vec<Vec<String>>>>,
    closed: Arc<AtomicUsize>,
}

#[async_trait]
impl Agent for MockAgent {
    async fn get_many(&mut self, oids: &[Oid<'static>]) -> Result<Response, SnmpError> {
        self.requests
            .lock()
            .unwrap()
            .push(oids.iter().map(ToString::to_string).collect());

        match &self.device {
            Device::Answers(bindings) => Ok(Response {
                bindings: oids
                    .iter()
                    .filter_map(|oid| {
                        bindings
                            .get(&oid.to_string())
                            .map(|variable| (oid.clone(), variable.clone()))
                    })
                    .collect(),
                ..Default::default()
            }),
            Device::Status(status) => Ok(Response {
                error_status: *status,
                error_index: 1,
                bindings: Vec::new(),
            }),
            Device::Silent => Err(SnmpError::Timeout { attempts: 2 }),
            Device::Unreachable => unreachable!("unreachable devices never connect"),
        }
    }
}

impl Drop for MockAgent {
    fn drop(&mut self) {
        self.closed.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn oid(s: &str) -> Oid<'static> {
    parse_oid(s).unwrap()
}

/// Записывает всё полученное по порядку.
#[derive(Clone, Default)]
pub struct Recorder {
    pub events: Arc<Mutex<Vec<String>>>,
    /// Отменяется, когда объявлен источник с этим индексом.
    pub cancel_at: Option<(usize, CancellationToken)>,
}

impl Recorder {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl Recipient for Recorder {
    async fn send(&self, value: &Value<'_>) {
        self.events
            .lock()
            .unwrap()
            .push(format!("value {} = {}", value.stat_name(), value));
    }

    fn source_handler(&self) -> Option<&dyn SourceHandler> {
        Some(self)
    }

    fn error_handler(&self) -> Option<&dyn ErrorHandler> {
        Some(self)
    }
}

impl SourceHandler for Recorder {
    fn send_source(&self, index: usize, source: &Source) {
        self.events
            .lock()
            .unwrap()
            .push(format!("source {} {}", index, source.label()));
        if let Some((at, token)) = &self.cancel_at {
            if *at == index {
                token.cancel();
            }
        }
    }
}

impl ErrorHandler for Recorder {
    fn send_query_error(&self, index: usize, source: &Source, err: &QueryError) {
        self.events
            .lock()
            .unwrap()
            .push(format!("error {} {}: {}", index, source.label(), err));
    }
}

/// Получатель без дополнительных возможностей.
#[derive(Clone, Default)]
pub struct ValuesOnly {
    pub values: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl Recipient for ValuesOnly {
    async fn send(&self, value: &Value<'_>) {
        self.values.lock().unwrap().push(value.stat_name());
    }
}
