use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::Recipient;
use crate::collector;
use crate::snmp::Connector;
use crate::source::Source;
use crate::stats::Statistic;

/// Итоги цикла опроса.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleSummary {
    pub sources_queried: usize,
    pub sources_failed: usize,
    pub values_delivered: usize,
    pub cancelled: bool,
}

/// Выполняет один цикл опроса.
///
/// Источники обходятся по порядку. Каждый получатель узнаёт об источнике до
/// запроса, затем получает его значения в порядке запроса, либо ошибку, если
/// источник недоступен. Неподдерживаемые значения отправляются только при
/// `verbose`.
///
/// `cancel` проверяется перед каждым источником и каждой отправкой; после
/// отмены больше ничего не отправляется.
pub async fn execute(
    connector: &dyn Connector,
    cancel: &CancellationToken,
    sources: &[Source],
    stats: &[Statistic],
    recipients: &[Box<dyn Recipient>],
    verbose: bool,
) -> CycleSummary {
    let mut summary = CycleSummary::default();

    for (index, source) in sources.iter().enumerate() {
        for recipient in recipients {
            if cancel.is_cancelled() {
                return cancelled(summary);
            }
            if let Some(handler) = recipient.source_handler() {
                handler.send_source(index, source);
            }
        }

        if cancel.is_cancelled() {
            return cancelled(summary);
        }

        summary.sources_queried += 1;
        match collector::query(connector, source, stats).await {
            Ok(values) => {
                for recipient in recipients {
                    for value in &values {
                        if cancel.is_cancelled() {
                            return cancelled(summary);
                        }
                        if verbose || !value.is_not_supported() {
                            recipient.send(value).await;
                            summary.values_delivered += 1;
                        }
                    }
                }
            }
            Err(err) => {
                warn!(source = %source.label(), error = %err, "query failed");
                summary.sources_failed += 1;
                for recipient in recipients {
                    if cancel.is_cancelled() {
                        return cancelled(summary);
                    }
                    if let Some(handler) = recipient.error_handler() {
                        handler.send_query_error(index, source, &err);
                    }
                }
            }
        }
    }

    info!(
        sources = summary.sources_queried,
        failed = summary.sources_failed,
        delivered = summary.values_delivered,
        "polling cycle complete"
    );
    summary
}

fn cancelled(mut summary: CycleSummary) -> CycleSummary {
    debug!("polling cycle cancelled");
    summary.cancelled = true;
    summary
}
