use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, warn};

use super::Recipient;
use crate::collector::Value;
use crate::error::RecipientError;

/// Адрес StatHat EZ API.
pub const EZ_API_URL: &str = "https://api.stathat.com/ez";

/// Шаблон имени, если в адресе его нет.
pub const DEFAULT_TEMPLATE: &str = "{source.host} {stat.name}";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    SourceName,
    SourceHost,
    SourcePort,
    SourceLabel,
    StatName,
    StatUnit,
}

impl Field {
    fn parse(placeholder: &str) -> Option<Self> {
        match placeholder {
            "source.name" => Some(Field::SourceName),
            "source.host" => Some(Field::SourceHost),
            "source.port" => Some(Field::SourcePort),
            "source.label" => Some(Field::SourceLabel),
            "stat.name" => Some(Field::StatName),
            "stat.unit" => Some(Field::StatUnit),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field(Field),
}

/// Шаблон имени статистики с подстановками вида `{source.host}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameTemplate {
    segments: Vec<Segment>,
}

impl NameTemplate {
    pub fn parse(template: &str) -> Result<Self, String> {
        let mut segments = Vec::new();
        let mut rest = template;

        while let Some(open) = rest.find(['{', '}']) {
            if rest[open..].starts_with('}') {
                return Err(format!("unexpected '}}' at offset {}", template.len() - rest.len() + open));
            }
            if open > 0 {
                segments.push(Segment::Literal(rest[..open].to_string()));
            }
            let after = &rest[open + 1..];
            let close = after
                .find('}')
                .ok_or_else(|| "unterminated placeholder".to_string())?;
            let placeholder = &after[..close];
            let field = Field::parse(placeholder)
                .ok_or_else(|| format!("unknown placeholder {{{}}}", placeholder))?;
            segments.push(Segment::Field(field));
            rest = &after[close + 1..];
        }

        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_string()));
        }

        Ok(Self { segments })
    }

    pub fn render(&self, value: &Value<'_>) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field(Field::SourceName) => {
                    out.push_str(value.source.name.as_deref().unwrap_or_default())
                }
                Segment::Field(Field::SourceHost) => out.push_str(&value.source.host),
                Segment::Field(Field::SourcePort) => out.push_str(&value.source.port.to_string()),
                Segment::Field(Field::SourceLabel) => out.push_str(&value.source.label()),
                Segment::Field(Field::StatName) => out.push_str(&value.stat.name),
                Segment::Field(Field::StatUnit) => out.push_str(&value.stat.unit),
            }
        }
        out
    }
}

#[derive(Debug, Serialize)]
struct EzReport<'a> {
    ezkey: &'a str,
    data: Vec<EzStat>,
}

#[derive(Debug, Serialize)]
struct EzStat {
    stat: String,
    value: f64,
    t: i64,
}

/// Отправляет успешные значения в StatHat как value-статистики.
pub struct StatHatRecipient {
    ezkey: String,
    template: NameTemplate,
    client: Client,
    endpoint: String,
}

impl fmt::Debug for StatHatRecipient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatHatRecipient")
            .field("template", &self.template)
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

/// Адрес: `EZKEY` или `EZKEY~TEMPLATE`.
pub fn parse(address: &str) -> Result<Box<dyn Recipient>, RecipientError> {
    let (ezkey, template) = address.split_once('~').unwrap_or((address, DEFAULT_TEMPLATE));
    Ok(Box::new(StatHatRecipient::new(ezkey, template)?))
}

impl StatHatRecipient {
    pub fn new(ezkey: &str, template: &str) -> Result<Self, RecipientError> {
        // ezkey секретный, в сообщения об ошибках не попадает.
        let invalid = |reason: String| RecipientError::InvalidAddress {
            kind: "stathat",
            address: template.to_string(),
            reason,
        };

        if ezkey.is_empty() {
            return Err(invalid("missing ezkey".to_string()));
        }
        let template = NameTemplate::parse(template).map_err(invalid)?;

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|source| RecipientError::Build {
                kind: "stathat",
                source,
            })?;

        Ok(Self {
            ezkey: ezkey.to_string(),
            template,
            client,
            endpoint: EZ_API_URL.to_string(),
        })
    }

    /// Отправлять не в публичный API, а на другой адрес.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Имя `value` в StatHat.
    pub fn stat_name(&self, value: &Value<'_>) -> String {
        self.template.render(value)
    }
}

#[async_trait]
impl Recipient for StatHatRecipient {
    async fn send(&self, value: &Value<'_>) {
        // Несобранные статистики не отправляем.
        let Ok(number) = value.result else {
            return;
        };

        let name = self.stat_name(value);
        let report = EzReport {
            ezkey: &self.ezkey,
            data: vec![EzStat {
                stat: name.clone(),
                value: number,
                t: value.time.timestamp(),
            }],
        };

        debug!(stat = %name, "sending data to StatHat");
        match self.client.post(&self.endpoint).json(&report).send().await {
            Ok(resp) if resp.status().is_success() => debug!(stat = %name, "StatHat accepted value"),
            Ok(resp) => warn!(stat = %name, status = %resp.status(), "StatHat rejected value"),
            Err(e) => warn!(stat = %name, error = %e, "failed to send value to StatHat"),
        }
    }
}
