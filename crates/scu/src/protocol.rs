//! Composes the eleven event shapes of the command-stream protocol from
//! the [`crate::json`] primitives.
//!
//! Every function here writes exactly one JSON object, terminated with a
//! newline, to the given file descriptor.

use std::os::fd::RawFd;

use crate::json::Writer;
use crate::registry::TestCase;
use crate::state::Failure;

/// `module_list{name}` — list mode only, one per run.
pub fn write_module_list(fd: RawFd, name: &str) {
    let mut w = Writer::new(fd);
    w.str_field("event", "module_list");
    w.str_field("name", name);
    w.finish();
}

/// `testcase_list{line,name,description,tags[]}` — list mode, one per
/// registered test case.
pub fn write_testcase_list(fd: RawFd, case: &TestCase) {
    let mut w = Writer::new(fd);
    w.str_field("event", "testcase_list");
    w.int_field("line", i64::from(case.line));
    w.str_field("name", case.name);
    w.str_field("description", case.description);
    w.str_array_field("tags", case.tags.iter().copied());
    w.finish();
}

/// `module_start{name}`.
pub fn write_module_start(fd: RawFd, name: &str) {
    let mut w = Writer::new(fd);
    w.str_field("event", "module_start");
    w.str_field("name", name);
    w.finish();
}

/// `module_end{}`.
pub fn write_module_end(fd: RawFd) {
    let mut w = Writer::new(fd);
    w.str_field("event", "module_end");
    w.finish();
}

/// `setup_start{output}`.
pub fn write_setup_start(fd: RawFd, output: &str) {
    let mut w = Writer::new(fd);
    w.str_field("event", "setup_start");
    w.str_field("output", output);
    w.finish();
}

/// `setup_end{}`.
pub fn write_setup_end(fd: RawFd) {
    let mut w = Writer::new(fd);
    w.str_field("event", "setup_end");
    w.finish();
}

/// `teardown_start{output}`.
pub fn write_teardown_start(fd: RawFd, output: &str) {
    let mut w = Writer::new(fd);
    w.str_field("event", "teardown_start");
    w.str_field("output", output);
    w.finish();
}

/// `teardown_end{}`.
pub fn write_teardown_end(fd: RawFd) {
    let mut w = Writer::new(fd);
    w.str_field("event", "teardown_end");
    w.finish();
}

/// `testcase_start{index,name,output}`.
pub fn write_testcase_start(fd: RawFd, index: usize, name: &str, output: &str) {
    let mut w = Writer::new(fd);
    w.str_field("event", "testcase_start");
    w.int_field("index", index as i64);
    w.str_field("name", name);
    w.str_field("output", output);
    w.finish();
}

/// `testcase_end{index,success,asserts,duration,cpu_time,failures[]}`.
#[allow(clippy::too_many_arguments)]
pub fn write_testcase_end(
    fd: RawFd,
    index: usize,
    success: bool,
    asserts: u64,
    duration_secs: f64,
    cpu_time_secs: f64,
    failures: &[Failure],
) {
    let mut w = Writer::new(fd);
    w.str_field("event", "testcase_end");
    w.int_field("index", index as i64);
    w.bool_field("success", success);
    w.int_field("asserts", asserts as i64);
    w.real_field("duration", duration_secs);
    w.real_field("cpu_time", cpu_time_secs);
    {
        let mut arr = w.array_field("failures");
        for failure in failures {
            arr.object(|obj| {
                obj.str_field("file", &failure.file);
                obj.int_field("line", i64::from(failure.line));
                obj.str_field("message", &failure.message);
                obj.str_field("assert_method", &failure.assert_method);
                obj.object_array_field(
                    "assert_method_values",
                    failure
                        .values
                        .iter()
                        .map(|v| (v.name.as_str(), v.value.as_deref())),
                );
            });
        }
        arr.finish();
    }
    w.finish();
}

/// `testcase_error{message,file,line,crash:true}`.
pub fn write_testcase_error(fd: RawFd, message: &str, file: &str, line: u32) {
    let mut w = Writer::new(fd);
    w.str_field("event", "testcase_error");
    w.str_field("message", message);
    w.str_field("file", file);
    w.int_field("line", i64::from(line));
    w.bool_field("crash", true);
    w.finish();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AssertValue;
    use nix::unistd::{close, pipe, read};

    fn drain(fd: RawFd) -> String {
        let mut out = Vec::new();
        let mut chunk = [0u8; 512];
        loop {
            let n = read(fd, &mut chunk).unwrap();
            if n == 0 {
                break;
            }
            out.extend_from_slice(&chunk[..n]);
            if n < chunk.len() {
                break;
            }
        }
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn testcase_end_embeds_assert_method_values() {
        let (read_fd, write_fd) = pipe().unwrap();
        let failures = vec![Failure {
            file: "t.rs".to_string(),
            line: 10,
            assert_method: "SCU_ASSERT_INT_EQUAL".to_string(),
            message: "expected equal integer values".to_string(),
            values: vec![
                AssertValue { name: "1".to_string(), value: Some("1 (0x1)".to_string()) },
                AssertValue { name: "2".to_string(), value: Some("2 (0x2)".to_string()) },
            ],
        }];
        write_testcase_end(write_fd, 0, false, 1, 0.5, 0.1, &failures);
        close(write_fd).unwrap();

        let got = drain(read_fd);
        close(read_fd).unwrap();
        assert!(got.contains("\"assert_method\":\"SCU_ASSERT_INT_EQUAL\""));
        assert!(got.contains(
            "\"assert_method_values\":[{\"name\":\"1\",\"value\":\"1 (0x1)\"},{\"name\":\"2\",\"value\":\"2 (0x2)\"}]"
        ));
        assert!(got.ends_with('\n'));
    }

    #[test]
    fn testcase_end_with_no_failures_has_empty_array() {
        let (read_fd, write_fd) = pipe().unwrap();
        write_testcase_end(write_fd, 2, true, 3, 0.0, 0.0, &[]);
        close(write_fd).unwrap();

        let got = drain(read_fd);
        close(read_fd).unwrap();
        assert!(got.contains("\"failures\":[]"));
        assert!(got.contains("\"success\":true"));
    }

    #[test]
    fn module_list_and_testcase_list_round_trip() {
        let (read_fd, write_fd) = pipe().unwrap();
        write_module_list(write_fd, "demo");
        close(write_fd).unwrap();
        let got = drain(read_fd);
        close(read_fd).unwrap();
        assert_eq!(got, "{\"event\":\"module_list\",\"name\":\"demo\"}\n");
    }
}
