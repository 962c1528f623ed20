use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing::info;

use crate::error::ConfigError;
use crate::source::{DEFAULT_PORT, SourceDefaults};
use crate::stats::Catalog;

pub mod profile;
pub mod settings;

pub use profile::{Profile, StatisticDef};
pub use settings::{ConnectionSettings, Settings};

/// Опрос ИБП и устройств питания по SNMP v2c.
#[derive(Parser, Debug, Clone)]
#[command(name = "powerstat", author, version, about, long_about = None)]
pub struct Cli {
    /// Источники вида community@host:port~name (заменяют --sources)
    #[arg(value_name = "SOURCE")]
    pub targets: Vec<String>,

    /// Источники через запятую
    #[arg(short = 's', long, env = "SOURCE", value_delimiter = ',', default_value = "localhost")]
    pub sources: Vec<String>,

    /// Статистика для запроса; можно повторять, несколько через ";". "all" означает все встроенные
    #[arg(
        short = 'q',
        long = "statistic",
        env = "STATISTICS",
        value_delimiter = ';',
        default_value = "all"
    )]
    pub statistics: Vec<String>,

    /// SNMP community по умолчанию
    #[arg(short = 'c', long, env = "COMMUNITY")]
    pub community: Option<String>,

    /// Интервал между опросами ("30s", "5m", "1h 30m"; число без единиц в секундах). Без него один опрос
    #[arg(short = 'n', long, env = "INTERVAL", value_parser = parse_interval)]
    pub interval: Option<Duration>,

    /// Получатели через запятую
    #[arg(short = 'r', long, env = "RECIPIENT", default_value = "console")]
    pub recipients: String,

    /// Показывать ответы на неподдерживаемые запросы
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Файл настроек YAML
    #[arg(long, env = "POWERSTAT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Фильтр логов (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

fn parse_interval(s: &str) -> Result<Duration, humantime::DurationError> {
    match s.trim().parse::<u64>() {
        Ok(secs) => Ok(Duration::from_secs(secs)),
        Err(_) => humantime::parse_duration(s),
    }
}

/// Параметры командной строки вместе с файлом настроек.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub cli: Cli,
    pub settings: Settings,
}

impl AppConfig {
    /// Загружает файл настроек, если он указан.
    pub fn load(cli: Cli) -> Result<Self, ConfigError> {
        let settings = match &cli.config {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };

        Ok(Self { cli, settings })
    }

    /// Позиционные источники важнее `--sources`.
    pub fn get_sources(&self) -> &[String] {
        if self.cli.targets.is_empty() {
            &self.cli.sources
        } else {
            &self.cli.targets
        }
    }

    pub fn get_community(&self) -> String {
        self.cli
            .community
            .clone()
            .unwrap_or_else(|| self.settings.community.clone())
    }

    pub fn get_timeout(&self) -> Duration {
        Duration::from_secs(self.settings.connection.timeout)
    }

    /// None означает один опрос. Нулевой интервал тоже.
    pub fn get_interval(&self) -> Option<Duration> {
        self.cli.interval.filter(|interval| !interval.is_zero())
    }

    pub fn source_defaults(&self) -> SourceDefaults {
        SourceDefaults {
            community: self.get_community(),
            port: DEFAULT_PORT,
            retries: self.settings.connection.retries,
        }
    }

    /// Встроенные статистики плюс профиль из настроек.
    pub fn catalog(&self) -> Result<Catalog, ConfigError> {
        let mut catalog = Catalog::builtin();
        if let Some(path) = &self.settings.profile {
            let profile = Profile::load(path)?;
            info!(profile = %profile.name, statistics = profile.statistics.len(), "loaded statistics profile");
            profile.apply(&mut catalog)?;
        }
        Ok(catalog)
    }

    pub fn debug_config(&self) {
        info!(
            sources = self.get_sources().len(),
            statistics = ?self.cli.statistics,
            recipients = %self.cli.recipients,
            interval = ?self.get_interval(),
            timeout = ?self.get_timeout(),
            retries = self.settings.connection.retries,
            verbose = self.cli.verbose,
            "configuration"
        );
    }
}
