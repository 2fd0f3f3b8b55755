//! End-to-end exercise of the `demo-arithmetic` module through the compiled
//! binary: spawns it exactly as the (out-of-scope) harness would, parses its
//! command-stream JSON lines, and checks the lifecycle/outcome invariants
//! from the runner's event schema against a real process rather than the
//! library's internal state.

use std::process::Command;

use serde_json::Value;

/// Runs the compiled `demo-arithmetic` binary with `args`, returning its
/// exit code and each line of its standard output parsed as a JSON event.
fn run_module(args: &[&str]) -> (i32, Vec<Value>) {
    let output = Command::new(env!("CARGO_BIN_EXE_demo-arithmetic"))
        .args(args)
        .output()
        .expect("failed to spawn demo-arithmetic");

    let stdout = String::from_utf8(output.stdout).expect("command stream is valid UTF-8");
    let events = stdout
        .lines()
        .filter(|line| !line.is_empty())
        .map(|line| serde_json::from_str(line).unwrap_or_else(|e| panic!("bad event line {line:?}: {e}")))
        .collect();
    (output.status.code().unwrap_or(-1), events)
}

fn event_name(event: &Value) -> &str {
    event["event"].as_str().expect("event field")
}

#[test]
fn list_mode_enumerates_every_registered_case() {
    let (code, events) = run_module(&["--list"]);
    assert_eq!(code, 0);

    assert_eq!(event_name(&events[0]), "module_list");
    assert_eq!(events[0]["name"], "arithmetic");

    let cases: Vec<&Value> = events[1..].iter().collect();
    assert_eq!(cases.len(), 6, "expected all six demo cases listed");
    for case in &cases {
        assert_eq!(event_name(case), "testcase_list");
        assert!(case["name"].as_str().is_some());
        assert!(case["line"].as_u64().is_some());
    }

    // Declaration order is preserved once sorted by source line.
    let names: Vec<&str> = cases.iter().map(|c| c["name"].as_str().unwrap()).collect();
    assert_eq!(
        names,
        vec![
            "addition_is_commutative",
            "integer_width_is_respected",
            "deliberately_wrong_sum",
            "fatal_short_circuits",
            "string_helpers",
            "memory_mismatch_reports_hex_dump",
        ]
    );
}

#[test]
fn passing_test_reports_one_clean_assertion() {
    let (code, events) = run_module(&["--run", "0"]);
    assert_eq!(code, 0);

    let names: Vec<&str> = events.iter().map(event_name).collect();
    assert_eq!(
        names,
        vec![
            "module_start",
            "setup_start",
            "setup_end",
            "testcase_start",
            "testcase_end",
            "teardown_start",
            "teardown_end",
            "module_end",
        ]
    );

    let testcase_end = &events[4];
    assert_eq!(testcase_end["index"], 0);
    assert_eq!(testcase_end["success"], true);
    assert_eq!(testcase_end["asserts"], 1);
    assert!(testcase_end["failures"].as_array().unwrap().is_empty());
    assert!(testcase_end["duration"].as_f64().unwrap() >= 0.0);
    assert!(testcase_end["cpu_time"].as_f64().unwrap() >= 0.0);
}

#[test]
fn failing_equality_assertion_is_reported_with_values() {
    let (code, events) = run_module(&["--run", "2"]);
    assert_eq!(code, 0, "the process exits 0 even though the test itself failed");

    let testcase_end = events
        .iter()
        .find(|e| event_name(e) == "testcase_end")
        .expect("a testcase_end event");
    assert_eq!(testcase_end["success"], false);
    assert_eq!(testcase_end["asserts"], 1);

    let failures = testcase_end["failures"].as_array().unwrap();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0]["assert_method"], "SCU_ASSERT_EQUAL");
}

#[test]
fn fatal_assertion_short_circuits_the_remaining_thunk() {
    let (code, events) = run_module(&["--run", "3"]);
    assert_eq!(code, 0);

    let testcase_end = events
        .iter()
        .find(|e| event_name(e) == "testcase_end")
        .expect("a testcase_end event");
    assert_eq!(testcase_end["success"], false);
    // Only the fatal assertion counted; the `scu::assert!(true)` after it
    // never ran.
    assert_eq!(testcase_end["asserts"], 1);
    assert_eq!(testcase_end["failures"].as_array().unwrap().len(), 1);

    // after_each still ran: teardown's final report should reflect the
    // before_each increment for this single test, i.e. the process didn't
    // abort mid-test.
    assert_eq!(event_name(events.last().unwrap()), "module_end");
}

#[test]
fn memory_mismatch_renders_a_hex_dump() {
    let (_, events) = run_module(&["--run", "5"]);

    let testcase_end = events
        .iter()
        .find(|e| event_name(e) == "testcase_end")
        .expect("a testcase_end event");
    let failures = testcase_end["failures"].as_array().unwrap();
    assert_eq!(failures.len(), 1);

    let values = failures[0]["assert_method_values"].as_array().unwrap();
    assert_eq!(values.len(), 2);
    let lhs = values[0]["value"].as_str().unwrap();
    let rhs = values[1]["value"].as_str().unwrap();
    // 20 zero bytes vs. 20 bytes differing only at index 0; both wrap at
    // 16 bytes per line with an ASCII gutter.
    assert!(lhs.starts_with("00 00 00"));
    assert!(rhs.starts_with("01 00 00"));
    assert!(lhs.contains('\n'));
}

#[test]
fn run_executes_requested_indices_in_the_given_order() {
    let (code, events) = run_module(&["--run", "2", "0", "1"]);
    assert_eq!(code, 0);

    let indices: Vec<u64> = events
        .iter()
        .filter(|e| event_name(e) == "testcase_start")
        .map(|e| e["index"].as_u64().unwrap())
        .collect();
    assert_eq!(indices, vec![2, 0, 1]);

    let end_indices: Vec<u64> = events
        .iter()
        .filter(|e| event_name(e) == "testcase_end")
        .map(|e| e["index"].as_u64().unwrap())
        .collect();
    assert_eq!(end_indices, vec![2, 0, 1]);
}

#[test]
fn captured_output_never_reaches_the_command_stream() {
    let (_, events) = run_module(&["--run", "0"]);

    for event in &events {
        let line = event.to_string();
        assert!(
            !line.contains("teardown ran with final counter"),
            "teardown's println! output leaked onto the command stream: {line}"
        );
    }

    // The teardown capture file itself does contain it.
    let teardown_start = events
        .iter()
        .find(|e| event_name(e) == "teardown_start")
        .expect("a teardown_start event");
    let path = teardown_start["output"].as_str().expect("capture file path");
    let contents = std::fs::read_to_string(path).unwrap_or_default();
    assert!(contents.contains("teardown ran with final counter"));
}

#[test]
fn invalid_cli_usage_exits_non_zero_before_any_event() {
    let output = Command::new(env!("CARGO_BIN_EXE_demo-arithmetic"))
        .args(["--run"])
        .output()
        .expect("failed to spawn demo-arithmetic");
    assert!(!output.status.success());
    assert!(output.stdout.is_empty(), "no protocol events on a CLI usage error");
}
