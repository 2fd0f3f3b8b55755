//! Exercises the "process crash inside a test" error path: teardown
//! aborts the process, so the command stream is truncated before
//! `module_end` ever gets written.

use std::process::Command;

use serde_json::Value;

fn run_module(args: &[&str]) -> (Option<i32>, Vec<Value>) {
    let output = Command::new(env!("CARGO_BIN_EXE_demo-crash-in-teardown"))
        .args(args)
        .output()
        .expect("failed to spawn demo-crash-in-teardown");

    let stdout = String::from_utf8(output.stdout).expect("command stream is valid UTF-8");
    let events = stdout
        .lines()
        .filter(|line| !line.is_empty())
        .map(|line| serde_json::from_str(line).unwrap_or_else(|e| panic!("bad event line {line:?}: {e}")))
        .collect();
    (output.status.code(), events)
}

fn event_name(event: &Value) -> &str {
    event["event"].as_str().expect("event field")
}

#[test]
fn teardown_crash_truncates_the_stream_before_module_end() {
    let (code, events) = run_module(&["--run", "0"]);

    // `abort()` does not produce a normal exit code.
    assert_ne!(code, Some(0));

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
        ]
    );
    // The test itself passed; only teardown crashed afterward.
    let testcase_end = &events[4];
    assert_eq!(testcase_end["success"], true);
}
