//! Адреса источников.
//!
//! Источник записывается как `community@host:port~name`. Обязателен только
//! хост:
//!
//! ```text
//! community@host:port~name    community@host~name    host:port~name
//! host~name                   community@host:port    community@host
//! host:port                   host                   community@[fe80::1]:161
//! ```

use std::fmt;

use crate::error::{ParseError, SourceError};

pub const DEFAULT_COMMUNITY: &str = "public";
pub const DEFAULT_PORT: u16 = 161;
pub const DEFAULT_RETRIES: u32 = 1;

/// SNMP агент и параметры подключения к нему.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub name: Option<String>,
    pub host: String,
    pub port: u16,
    pub community: String,
    pub retries: u32,
}

impl Source {
    /// `host:port`, IPv6 хост в квадратных скобках.
    pub fn host_port(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    /// Имя для вывода, либо `host:port`, если имени нет.
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => self.host_port(),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.community.is_empty() {
            write!(f, "{}@", self.community)?;
        }
        f.write_str(&self.host_port())?;
        if let Some(name) = &self.name {
            write!(f, "~{}", name)?;
        }
        Ok(())
    }
}

/// Значения для частей, пропущенных в адресе.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDefaults {
    pub community: String,
    pub port: u16,
    pub retries: u32,
}

impl Default for SourceDefaults {
    fn default() -> Self {
        Self {
            community: DEFAULT_COMMUNITY.to_string(),
            port: DEFAULT_PORT,
            retries: DEFAULT_RETRIES,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SourceParser {
    defaults: SourceDefaults,
}

impl SourceParser {
    pub fn new(defaults: SourceDefaults) -> Self {
        Self { defaults }
    }

    pub fn parse(&self, s: &str) -> Result<Source, SourceError> {
        if s.is_empty() {
            return Err(SourceError::Empty);
        }

        let (rest, name) = match s.split_once('~') {
            Some((rest, name)) => (rest, (!name.is_empty()).then(|| name.to_string())),
            None => (s, None),
        };

        let (community, hostport) = match rest.split_once('@') {
            Some((community, hostport)) => (community.to_string(), hostport),
            None => (self.defaults.community.clone(), rest),
        };

        // IPv6 хост выглядит как "[::1]:161": порт отделяет только двоеточие
        // после закрывающей скобки.
        let has_port = hostport.rfind(':') > hostport.rfind(']');
        let (host, port) = if has_port {
            split_host_port(s, hostport)?
        } else {
            (strip_brackets(hostport).to_string(), self.defaults.port)
        };

        if host.is_empty() {
            return Err(SourceError::MissingHost(s.to_string()));
        }

        Ok(Source {
            name,
            host,
            port,
            community,
            retries: self.defaults.retries,
        })
    }

    /// Разбирает все адреса до первой ошибки.
    pub fn parse_all<S: AsRef<str>>(&self, items: &[S]) -> Result<Vec<Source>, ParseError> {
        items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                self.parse(item.as_ref().trim())
                    .map_err(|source| ParseError::Source { index, source })
            })
            .collect()
    }
}

fn strip_brackets(host: &str) -> &str {
    host.strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host)
}

fn split_host_port(input: &str, hostport: &str) -> Result<(String, u16), SourceError> {
    let invalid = |reason: &str| SourceError::InvalidHostPort {
        input: input.to_string(),
        reason: reason.to_string(),
    };

    let (host, port) = if let Some(bracketed) = hostport.strip_prefix('[') {
        let (host, after) = bracketed
            .split_once(']')
            .ok_or_else(|| invalid("missing ']' in address"))?;
        let port = after
            .strip_prefix(':')
            .ok_or_else(|| invalid("missing port in address"))?;
        (host, port)
    } else {
        let (host, port) = hostport
            .rsplit_once(':')
            .ok_or_else(|| invalid("missing port in address"))?;
        if host.contains(':') {
            return Err(invalid("too many colons in address"));
        }
        (host, port)
    };

    let port = port.parse::<u16>().map_err(|_| SourceError::InvalidPort {
        input: input.to_string(),
        port: port.to_string(),
    })?;

    Ok((host.to_string(), port))
}
