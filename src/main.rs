use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

use powerstat::config::{AppConfig, Cli};
use powerstat::recipient::{self, Recipient, RecipientRegistry};
use powerstat::snmp::V2cConnector;
use powerstat::{Source, SourceParser, Statistic};

/// Всё, что нужно циклу опроса. Разбирается один раз при запуске.
struct Poller {
    connector: V2cConnector,
    sources: Vec<Source>,
    stats: Vec<Statistic>,
    recipients: Vec<Box<dyn Recipient>>,
    verbose: bool,
}

impl Poller {
    fn from_config(config: &AppConfig) -> Result<Self> {
        let sources = SourceParser::new(config.source_defaults())
            .parse_all(config.get_sources())
            .context("source parsing error")?;
        if sources.is_empty() {
            bail!("no sources specified");
        }

        let recipients = RecipientRegistry::builtin()
            .parse_recipients(&config.cli.recipients)
            .context("recipients parsing error")?;
        if recipients.is_empty() {
            bail!("no recipients specified");
        }

        let catalog = config.catalog().context("statistics profile error")?;
        let stats = catalog
            .parse_statistics(&config.cli.statistics[..])
            .context("statistics parsing error")?;
        if stats.is_empty() {
            bail!("no statistics specified");
        }

        Ok(Self {
            connector: V2cConnector::new(config.get_timeout()),
            sources,
            stats,
            recipients,
            verbose: config.cli.verbose,
        })
    }

    async fn run_cycle(&self, shutdown: &CancellationToken) {
        recipient::execute(
            &self.connector,
            shutdown,
            &self.sources,
            &self.stats,
            &self.recipients,
            self.verbose,
        )
        .await;
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    fmt()
        .with_env_filter(EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = match AppConfig::load(cli).context("configuration error") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{:#}", e);
            return ExitCode::from(2);
        }
    };
    config.debug_config();

    let poller = match Poller::from_config(&config) {
        Ok(poller) => poller,
        Err(e) => {
            eprintln!("{:#}", e);
            return ExitCode::from(2);
        }
    };

    let shutdown = CancellationToken::new();
    tokio::spawn(wait_for_signal(shutdown.clone()));

    poller.run_cycle(&shutdown).await;

    if let Some(period) = config.get_interval() {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // Первый тик срабатывает сразу.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => poller.run_cycle(&shutdown).await,
                _ = shutdown.cancelled() => break,
            }
        }
    }

    info!("shutting down");
    ExitCode::SUCCESS
}

/// Отменяет `shutdown` по SIGINT или SIGTERM.
async fn wait_for_signal(shutdown: CancellationToken) {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut terminate = match signal(SignalKind::terminate()) {
            Ok(stream) => stream,
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                let _ = tokio::signal::ctrl_c().await;
                shutdown.cancel();
                return;
            }
        };

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = terminate.recv() => {}
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }

    info!("shutdown requested");
    shutdown.cancel();
}
