//! The driver's JSONL log: one valid record per step, bracketed by start and
//! completion records.

use std::io::Cursor;

use linebound_core::Session;
use linebound_harness::structured_log::{validate_log_file, validate_log_line};
use linebound_harness::{DemoConfig, LogEmitter, LogLevel, Outcome, run};
use linebound_membrane::{AllocationRegistry, SafetyLevel};

fn logged_run(input: &str, level: SafetyLevel) -> String {
    let mut session = Session::new(Cursor::new(input.as_bytes().to_vec()), Vec::new());
    let registry = AllocationRegistry::new();
    let mut diag = Vec::new();
    let mut emitter = LogEmitter::to_buffer("test-run");
    let config = DemoConfig {
        capacity: 8,
        banner: false,
    };
    run(&mut session, &registry, level, &mut diag, &mut emitter, &config).unwrap();
    emitter.contents()
}

#[test]
fn every_line_validates_in_order() {
    let log = logged_run("Ada\nGrace Hopper\nAlan\nEdsger\n", SafetyLevel::Strict);
    let entries: Vec<_> = log
        .lines()
        .enumerate()
        .map(|(i, line)| validate_log_line(line, i + 1).unwrap())
        .collect();

    assert_eq!(entries.len(), 6);
    assert_eq!(entries[0].event, "demo_start");
    assert_eq!(entries[5].event, "demo_complete");

    let variants: Vec<_> = entries[1..5]
        .iter()
        .map(|e| e.variant.clone().unwrap())
        .collect();
    assert_eq!(variants, ["stack", "heap", "owned", "managed"]);

    let ids: Vec<_> = entries.iter().map(|e| e.trace_id.as_str()).collect();
    assert_eq!(
        ids,
        [
            "test-run::001",
            "test-run::002",
            "test-run::003",
            "test-run::004",
            "test-run::005",
            "test-run::006"
        ]
    );

    // "Grace Hopper" in an 8-byte heap buffer keeps 7 bytes.
    assert_eq!(entries[2].length, Some(7));
    assert_eq!(entries[2].capacity, Some(8));
    assert_eq!(entries[2].truncated, Some(true));
    assert_eq!(entries[2].outcome, Some(Outcome::Truncated));
    assert_eq!(entries[1].truncated, Some(false));
    assert!(entries.iter().skip(1).take(4).all(|e| e.mode.as_deref() == Some("strict")));

    let details = entries[5].details.as_ref().unwrap();
    assert_eq!(details["stored"], 4);
    assert_eq!(details["live_allocations"], 0);
}

#[test]
fn failed_steps_log_at_warn() {
    let log = logged_run("", SafetyLevel::Hardened);
    let entries: Vec<_> = log
        .lines()
        .map(|line| validate_log_line(line, 0).unwrap())
        .collect();

    for entry in &entries[1..5] {
        assert_eq!(entry.level, LogLevel::Warn);
        assert_eq!(entry.outcome, Some(Outcome::ReadFailed));
        assert_eq!(entry.length, None);
        assert_eq!(entry.mode.as_deref(), Some("hardened"));
    }
}

#[test]
fn log_file_round_trip() {
    let path = std::env::temp_dir().join(format!(
        "linebound-log-{}-{:?}.jsonl",
        std::process::id(),
        std::thread::current().id()
    ));
    {
        let mut session = Session::new(Cursor::new(b"a\nb\nc\nd\n".to_vec()), Vec::new());
        let registry = AllocationRegistry::new();
        let mut diag = Vec::new();
        let mut emitter = LogEmitter::to_file(&path, "file-run").unwrap();
        run(
            &mut session,
            &registry,
            SafetyLevel::Strict,
            &mut diag,
            &mut emitter,
            &DemoConfig::default(),
        )
        .unwrap();
    }

    let (valid, errors) = validate_log_file(&path).unwrap();
    std::fs::remove_file(&path).ok();
    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(valid, 6);
}
