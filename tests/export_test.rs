//! Export Tests
//!
//! CSV layout, statistics block and the versioned JSON schema.

use chrono::{TimeZone, Utc};
use dice_lab::experiment::{ExperimentConfig, ExperimentSession, SuccessFaces};
use dice_lab::export::{
    to_csv, write_csv, ExportableStatistics, CSV_HEADER, STATISTICS_SCHEMA_VERSION,
};
use dice_lab::Error;

fn session_with(rolls: &[[u8; 2]]) -> ExperimentSession {
    let config = ExperimentConfig::new(2, SuccessFaces::new([6]).unwrap(), 5).unwrap();
    let mut session = ExperimentSession::new(config);
    for roll in rolls {
        let ticket = session.begin_roll().unwrap();
        session.complete_roll(ticket, roll.to_vec()).unwrap();
    }
    session
}

#[test]
fn test_csv_header_and_rows() {
    let session = session_with(&[[6, 3], [2, 2], [6, 6]]);
    let csv = to_csv(session.log(), None).unwrap();
    let lines: Vec<&str> = csv.lines().collect();

    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "Intento,Resultados,Exitos,Timestamp");
    assert!(lines[1].starts_with("1,\"6;3\",1,"));
    assert!(lines[2].starts_with("2,\"2;2\",0,"));
    assert!(lines[3].starts_with("3,\"6;6\",2,"));
    assert!(lines[3].ends_with('Z'));
}

#[test]
fn test_csv_with_statistics_block() {
    let session = session_with(&[[6, 3], [2, 2]]);
    let stats = session.statistics();
    let csv = to_csv(session.log(), Some(&stats)).unwrap();

    assert!(csv.starts_with(CSV_HEADER));
    assert!(csv.contains("\nParametros\nn,5\n"));
    assert!(csv.contains("k,P(X=k),P(X<=k)"));
    assert!(csv.contains("Intervalo de confianza (95%)"));
    assert!(csv.contains("Exitos observados,1"));
    assert!(csv.contains("Intentos,2"));

    // one distribution row per k = 0..=n
    let rows = csv
        .lines()
        .skip_while(|l| *l != "k,P(X=k),P(X<=k)")
        .skip(1)
        .take_while(|l| !l.is_empty())
        .count();
    assert_eq!(rows, 6);
}

#[test]
fn test_write_csv_to_writer() {
    let session = session_with(&[[1, 1]]);
    let mut out = Vec::new();
    write_csv(&mut out, session.log(), None).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("1,\"1;1\",0,"));
}

#[test]
fn test_empty_export_is_refused() {
    let session = session_with(&[]);
    assert!(matches!(
        to_csv(session.log(), None),
        Err(Error::EmptyExperiment)
    ));
    let mut out = Vec::new();
    assert!(write_csv(&mut out, session.log(), None).is_err());
    assert!(out.is_empty());
}

#[test]
fn test_exportable_statistics_schema() {
    let session = session_with(&[[6, 3], [2, 2], [6, 6]]);
    let at = Utc.with_ymd_and_hms(2024, 5, 17, 9, 30, 0).unwrap();
    let payload = ExportableStatistics::new(&session.statistics(), at);

    assert_eq!(payload.schema_version, STATISTICS_SCHEMA_VERSION);
    let json = payload.to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["schemaVersion"], 1);
    assert_eq!(value["n"], 5);
    assert_eq!(value["observedSuccesses"], 2);
    assert_eq!(value["totalTrials"], 3);
    assert_eq!(value["confidenceInterval"]["confidence"], 95);
    assert_eq!(value["distribution"].as_array().unwrap().len(), 6);
    assert!(value["distribution"][0].get("cumulativeProbability").is_some());

    let back: ExportableStatistics = serde_json::from_str(&json).unwrap();
    assert_eq!(back.exported_at, at);
    assert_eq!(back.distribution.len(), payload.distribution.len());
    assert_eq!(back.success_event, payload.success_event);
}
