//! End-to-end transcript tests for the demo driver over scripted input.

use std::io::Cursor;

use linebound_core::Session;
use linebound_harness::{DemoConfig, LogEmitter, Outcome, Variant, run};
use linebound_membrane::{AllocationRegistry, SafetyLevel};

struct Run {
    stdout: String,
    stderr: String,
    report: linebound_harness::DemoReport,
    live: usize,
}

fn demo(input: &str, config: DemoConfig) -> Run {
    let mut session = Session::new(Cursor::new(input.as_bytes().to_vec()), Vec::new());
    let registry = AllocationRegistry::new();
    let mut diag = Vec::new();
    let mut emitter = LogEmitter::disabled();
    let report = run(
        &mut session,
        &registry,
        SafetyLevel::Strict,
        &mut diag,
        &mut emitter,
        &config,
    )
    .unwrap();
    let (_, out) = session.into_parts();
    Run {
        stdout: String::from_utf8(out).unwrap(),
        stderr: String::from_utf8(diag).unwrap(),
        report,
        live: registry.live_count(),
    }
}

fn quiet(capacity: usize) -> DemoConfig {
    DemoConfig {
        capacity,
        banner: false,
    }
}

#[test]
fn full_transcript_for_four_names() {
    let run = demo("Ada\nGrace\nAlan\nEdsger\n", quiet(100));
    let expected = "\
=== Multi-Language Input Demo ===

1. Stack-based version (caller-owned buffer):
Enter your name: Hello, Ada!
Stored in stack: Ada

2. Heap-based version (malloc):
Enter your name: Hello, Grace!
Stored in heap: Grace

3. Owned buffer version:
Enter your name (owned buffer version): Hello from Rust (owned), Alan!
Stored in owned buffer: Alan

4. Managed string version:
Enter your name (managed string version): Hello from Rust (managed), Edsger!
Managed string: Edsger

=== All tests completed ===
";
    assert_eq!(run.stdout, expected);
    assert!(run.stderr.is_empty());
    assert!(run.report.all_stored());
    assert_eq!(run.live, 0);
}

#[test]
fn banner_precedes_header() {
    let run = demo("a\nb\nc\nd\n", DemoConfig::default());
    let header = run.stdout.find("=== Multi-Language Input Demo ===").unwrap();
    let title = run.stdout.find("Multi Programming Language Codebase").unwrap();
    assert!(title < header);
    assert!(run.stdout.starts_with("\n\n"));
}

#[test]
fn end_of_input_fails_every_step_but_completes() {
    let run = demo("", quiet(100));

    for variant in Variant::ALL {
        let step = run.report.get(variant).unwrap();
        assert_eq!(step.outcome, Outcome::ReadFailed, "{variant}");
        assert_eq!(step.name, None);
    }
    assert!(run.stdout.contains("Stored in stack: \n"));
    assert!(!run.stdout.contains("Stored in heap"));
    assert!(!run.stdout.contains("Stored in owned buffer"));
    assert!(run.stdout.contains("Managed string: \n"));
    assert!(run.stdout.ends_with("=== All tests completed ===\n"));
    assert!(!run.stdout.contains("Hello"));
    // Only the two raw-pointer steps report to the diagnostic stream.
    assert_eq!(run.stderr, "Error reading input\nError reading input\n");
    assert_eq!(run.live, 0);
}

#[test]
fn small_capacity_truncates_bounded_variants_only() {
    let run = demo(
        "Bartholomew\nBartholomew\nBartholomew\nBartholomew\n",
        quiet(5),
    );

    let name = |v| run.report.get(v).unwrap().name.clone().unwrap();
    assert_eq!(name(Variant::Stack), "Bart");
    assert_eq!(name(Variant::Heap), "Bart");
    assert_eq!(name(Variant::Owned), "Bart");
    assert_eq!(name(Variant::Managed), "Bartholomew");

    let owned = run.report.get(Variant::Owned).unwrap();
    assert_eq!(owned.outcome, Outcome::Truncated);
    assert_eq!(owned.truncated, Some(true));
    assert!(run.stdout.contains("Hello, Bart!\n"));
    assert!(run.stdout.contains("Managed string: Bartholomew\n"));
}

#[test]
fn bounded_steps_report_truncation_at_capacity_8() {
    let run = demo(
        "Grace Hopper\nGrace Hopper\nGrace Hopper\nGrace Hopper\n",
        quiet(8),
    );

    for variant in [Variant::Stack, Variant::Heap, Variant::Owned] {
        let step = run.report.get(variant).unwrap();
        assert_eq!(step.outcome, Outcome::Truncated, "{variant}");
        assert_eq!(step.truncated, Some(true), "{variant}");
        assert_eq!(step.name.as_deref(), Some("Grace H"), "{variant}");
    }
    let managed = run.report.get(Variant::Managed).unwrap();
    assert_eq!(managed.outcome, Outcome::Stored);
    assert_eq!(managed.name.as_deref(), Some("Grace Hopper"));
    assert_eq!(run.live, 0);
}

#[test]
fn lines_that_fit_are_not_truncated() {
    let run = demo("Ada\nAda\nAda\nAda\n", quiet(8));
    for variant in Variant::ALL {
        let step = run.report.get(variant).unwrap();
        assert_eq!(step.outcome, Outcome::Stored, "{variant}");
        assert_eq!(step.truncated, Some(false), "{variant}");
    }
}

#[test]
fn session_prompt_is_restored_after_run() {
    let mut session = Session::new(Cursor::new(b"a\nb\nc\nd\ne\n".to_vec()), Vec::new());
    let registry = AllocationRegistry::new();
    let mut emitter = LogEmitter::disabled();
    run(
        &mut session,
        &registry,
        SafetyLevel::Strict,
        &mut Vec::<u8>::new(),
        &mut emitter,
        &quiet(100),
    )
    .unwrap();

    session.output_mut().clear();
    assert_eq!(session.read_line_managed(), "e");
    let (_, out) = session.into_parts();
    assert_eq!(String::from_utf8(out).unwrap(), "Enter your name: Hello, e!\n");
}

#[test]
fn stack_step_is_capped_at_its_array() {
    let long = "x".repeat(150);
    let input = format!("{long}\n{long}\n{long}\n{long}\n");
    let run = demo(&input, quiet(200));

    let stack = run.report.get(Variant::Stack).unwrap();
    assert_eq!(stack.capacity, 100);
    assert_eq!(stack.name.as_deref().map(str::len), Some(99));
    let heap = run.report.get(Variant::Heap).unwrap();
    assert_eq!(heap.name.as_deref().map(str::len), Some(150));
}

#[test]
fn crlf_and_empty_lines() {
    let run = demo("Ada\r\n\nAlan\r\n\n", quiet(100));
    let name = |v| run.report.get(v).unwrap().name.clone().unwrap();
    assert_eq!(name(Variant::Stack), "Ada");
    assert_eq!(name(Variant::Heap), "");
    assert_eq!(name(Variant::Owned), "Alan");
    assert_eq!(name(Variant::Managed), "");
    assert!(run.report.all_stored());
}

#[test]
fn zero_capacity_is_rejected_up_front() {
    let mut session = Session::new(Cursor::new(b"Ada\n".to_vec()), Vec::new());
    let registry = AllocationRegistry::new();
    let mut diag = Vec::new();
    let mut emitter = LogEmitter::disabled();
    let err = run(
        &mut session,
        &registry,
        SafetyLevel::Strict,
        &mut diag,
        &mut emitter,
        &quiet(0),
    )
    .unwrap_err();
    assert!(matches!(err, linebound_harness::HarnessError::ZeroCapacity));
    let (_, out) = session.into_parts();
    assert!(out.is_empty());
}
