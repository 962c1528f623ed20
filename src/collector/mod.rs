//! Получение значений статистик с источника.

use chrono::Utc;
use snmp2::Oid;
use tracing::{debug, warn};

use crate::error::{QueryError, StatError};
use crate::snmp::{Agent, Connector, Response, Variable, error_status_name};
use crate::source::Source;
use crate::stats::{Mapper, Statistic};

pub mod types;

pub use types::Value;

/// Запрашивает все статистики с `source` в одной сессии.
///
/// Ошибкой завершается только неудачное открытие сессии. Проблемы отдельных
/// статистик лежат в `result` каждого значения, в порядке `stats`.
pub async fn query<'a>(
    connector: &dyn Connector,
    source: &'a Source,
    stats: &'a [Statistic],
) -> Result<Vec<Value<'a>>, QueryError> {
    let mut agent = connector.connect(source).await.map_err(QueryError::Connect)?;

    let mut results = Vec::with_capacity(stats.len());
    for stat in stats {
        let result = query_statistic(agent.as_mut(), stat).await;
        if let Err(err) = &result {
            debug!(source = %source.label(), statistic = %stat.name, error = %err, "statistic unavailable");
        }
        results.push(Value {
            source,
            stat,
            time: Utc::now(),
            result,
        });
    }

    Ok(results)
}

/// Один запрос со всеми OID-кандидатами `stat`.
async fn query_statistic(agent: &mut dyn Agent, stat: &Statistic) -> Result<f64, StatError> {
    let response = agent.get_many(&stat.oids).await.map_err(|err| {
        warn!(statistic = %stat.name, error = %err, "SNMP request failed");
        StatError::Request(err)
    })?;

    if response.error_status != 0 {
        return Err(StatError::Agent {
            status: error_status_name(response.error_status),
            index: response.error_index,
        });
    }

    resolve(&stat.oids, &response, &stat.mapper)
}

/// Проходит ответ в порядке приоритета кандидатов и возвращает первое
/// значение, принятое преобразователем. Иначе последнюю встреченную ошибку.
pub fn resolve(oids: &[Oid<'static>], response: &Response, mapper: &Mapper) -> Result<f64, StatError> {
    let mut last_err = None;

    for oid in oids {
        let Some(variable) = response.binding(oid) else {
            continue;
        };

        match variable {
            Variable::NoSuchInstance => last_err = Some(StatError::NoSuchInstance),
            Variable::NoSuchObject => last_err = Some(StatError::NoSuchObject),
            _ => match mapper.map(variable) {
                Ok(value) => return Ok(value),
                Err(source) => {
                    last_err = Some(StatError::Map {
                        value: variable.to_string(),
                        source,
                    })
                }
            },
        }
    }

    Err(last_err.unwrap_or(StatError::NoValue))
}
