mod common;

use pretty_assertions::assert_eq;
use tokio_util::sync::CancellationToken;

use common::{Device, MockConnector, Recorder, ValuesOnly};
use powerstat::recipient::{CycleSummary, execute};
use powerstat::snmp::Variable;
use powerstat::{Catalog, Recipient, Source, SourceDefaults, SourceParser, Statistic};

const MINUTES: &str = "1.3.6.1.2.1.33.1.2.3.0";
const VOLTAGE: &str = "1.3.6.1.2.1.33.1.2.5.0";

fn connector() -> MockConnector {
    MockConnector::default()
        .with(
            "ups1",
            Device::answers(&[
                (MINUTES, Variable::Integer(42)),
                (VOLTAGE, Variable::Integer(136)),
            ]),
        )
        .with("down", Device::Unreachable)
        .with(
            "ups2",
            Device::answers(&[
                (MINUTES, Variable::NoSuchInstance),
                (VOLTAGE, Variable::Integer(120)),
            ]),
        )
}

fn sources(items: &[&str]) -> Vec<Source> {
    SourceParser::new(SourceDefaults::default())
        .parse_all(items)
        .unwrap()
}

fn stats() -> Vec<Statistic> {
    Catalog::builtin()
        .parse_statistics(&["EstimatedMinutesRemaining", "BatteryVoltage"])
        .unwrap()
}

#[tokio::test]
async fn unreachable_source_does_not_stop_the_cycle() {
    let connector = connector();
    let sources = sources(&["ups1~One", "down~Down", "ups2~Two"]);
    let stats = stats();
    let recorder = Recorder::default();
    let values_only = ValuesOnly::default();
    let recipients: Vec<Box<dyn Recipient>> =
        vec![Box::new(recorder.clone()), Box::new(values_only.clone())];

    let summary = execute(
        &connector,
        &CancellationToken::new(),
        &sources,
        &stats,
        &recipients,
        false,
    )
    .await;

    assert_eq!(
        recorder.events(),
        [
            "source 0 One",
            "value One EstimatedMinutesRemaining = 42 minutes",
            "value One BatteryVoltage = 13.6 volts (DC)",
            "source 1 Down",
            "error 1 Down: failed to open connection: failed to open SNMP session to down:161: no such host",
            "source 2 Two",
            "value Two BatteryVoltage = 12 volts (DC)",
        ]
    );
    assert_eq!(
        *values_only.values.lock().unwrap(),
        ["One EstimatedMinutesRemaining", "One BatteryVoltage", "Two BatteryVoltage"]
    );
    assert_eq!(
        summary,
        CycleSummary {
            sources_queried: 3,
            sources_failed: 1,
            values_delivered: 6,
            cancelled: false,
        }
    );
    assert_eq!(connector.connects(), ["ups1", "down", "ups2"]);
    assert_eq!(connector.closed(), 2);
}

#[tokio::test]
async fn verbose_delivers_unsupported_values() {
    let connector = connector();
    let sources = sources(&["ups2~Two"]);
    let stats = stats();
    let recorder = Recorder::default();
    let recipients: Vec<Box<dyn Recipient>> = vec![Box::new(recorder.clone())];

    let summary = execute(
        &connector,
        &CancellationToken::new(),
        &sources,
        &stats,
        &recipients,
        true,
    )
    .await;

    assert_eq!(
        recorder.events(),
        [
            "source 0 Two",
            "value Two EstimatedMinutesRemaining = not supported (no such instance)",
            "value Two BatteryVoltage = 12 volts (DC)",
        ]
    );
    assert_eq!(summary.values_delivered, 2);
}

#[tokio::test]
async fn cancellation_stops_before_the_next_query() {
    let connector = connector();
    let sources = sources(&["ups1~One", "ups2~Two", "ups1~Again"]);
    let stats = stats();
    let cancel = CancellationToken::new();
    let recorder = Recorder {
        cancel_at: Some((1, cancel.clone())),
        ..Default::default()
    };
    let recipients: Vec<Box<dyn Recipient>> = vec![Box::new(recorder.clone())];

    let summary = execute(&connector, &cancel, &sources, &stats, &recipients, false).await;

    assert_eq!(
        recorder.events(),
        [
            "source 0 One",
            "value One EstimatedMinutesRemaining = 42 minutes",
            "value One BatteryVoltage = 13.6 volts (DC)",
            "source 1 Two",
        ]
    );
    assert!(summary.cancelled);
    assert_eq!(summary.sources_queried, 1);
    assert_eq!(connector.connects(), ["ups1"]);
}

#[tokio::test]
async fn cancelled_cycle_sends_nothing() {
    let connector = connector();
    let sources = sources(&["ups1"]);
    let stats = stats();
    let cancel = CancellationToken::new();
    cancel.cancel();
    let recorder = Recorder::default();
    let recipients: Vec<Box<dyn Recipient>> = vec![Box::new(recorder.clone())];

    let summary = execute(&connector, &cancel, &sources, &stats, &recipients, false).await;

    assert!(recorder.events().is_empty());
    assert!(connector.connects().is_empty());
    assert_eq!(
        summary,
        CycleSummary {
            cancelled: true,
            ..Default::default()
        }
    );
}
