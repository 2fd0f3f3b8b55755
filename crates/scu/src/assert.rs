//! The assertion macro surface and the shared accounting/failure logic
//! behind every variant.
//!
//! Each assertion, fatal or not, performs the same steps: account an
//! attempt (skipped by `fail!`/`fail_fatal!`, which have no attempt to
//! count) and, if fatal, verify the thread-of-origin rule before the
//! predicate is even evaluated — a fatal assertion invoked from the wrong
//! thread aborts the process whether or not its condition would have
//! passed. Then evaluate the predicate; return on success, or on failure
//! record a [`crate::state::Failure`] and — if fatal — unwind to the
//! engine's recovery landing pad by panicking with [`FatalAssertion`].

use crate::pretty;
use crate::state::{AssertValue, PadCheck};

/// The panic payload used to unwind a fatal assertion failure to the
/// engine's `catch_unwind` boundary. Downcast-matched by the engine's
/// panic hook so the expected control-flow unwind doesn't print a
/// spurious "thread panicked" message into the test's capture file.
pub struct FatalAssertion;

fn finish(file: &str, line: u32, method: &str, fatal: bool, passed: bool, message: String, values: Vec<AssertValue>) {
    if passed {
        return;
    }
    crate::state::global()
        .lock()
        .expect("run state poisoned")
        .record_failure(file, line, method, &message, values);

    if fatal {
        // The thread-of-origin rule was already enforced by `account`
        // (or, for `FAIL_FATAL`, by `verify_pad_or_abort` below) before
        // the predicate was evaluated, so reaching here means this thread
        // owns a currently-armed pad.
        std::panic::panic_any(FatalAssertion);
    }
}

/// Verifies the thread-of-origin rule for a fatal assertion. If the
/// calling thread doesn't own an armed pad, this is a contract violation:
/// it emits `testcase_error{crash:true}` on the command stream and aborts
/// the process, per the engine's error handling design — there is no
/// landing pad to safely unwind to. A no-op for non-fatal assertions.
fn verify_pad_or_abort(fatal: bool, file: &str, line: u32, method: &str) {
    if !fatal {
        return;
    }
    let check = crate::state::global()
        .lock()
        .expect("run state poisoned")
        .check_recovery_pad();
    if let PadCheck::WrongThreadOrUnarmed = check {
        let message = format!(
            "fatal assertion {method} at {file}:{line} invoked outside the owning thread's recovery window"
        );
        crate::protocol::write_testcase_error(crate::stream::command_fd(), &message, file, line);
        std::process::abort();
    }
}

/// Accounts an assertion attempt (not called by `FAIL`/`FAIL_FATAL`) and,
/// for fatal variants, verifies the thread-of-origin rule before the
/// predicate is evaluated — so a fatal assertion called from the wrong
/// thread aborts the process even when its condition happens to pass.
pub fn account(fatal: bool, file: &str, line: u32, method: &str) {
    crate::state::global()
        .lock()
        .expect("run state poisoned")
        .account_assert();
    verify_pad_or_abort(fatal, file, line, method);
}

/// Handles a boolean assertion (`ASSERT`/`ASSERT_WITH_MESSAGE`).
pub fn handle_bool(file: &str, line: u32, method: &str, fatal: bool, cond: bool, expr: &str, message: Option<String>) {
    account(fatal, file, line, method);
    let msg = message.unwrap_or_else(|| format!("expected `{expr}` to be true"));
    finish(file, line, method, fatal, cond, msg, vec![]);
}

/// Handles `FAIL`/`FAIL_FATAL`: an unconditional failure with no attempt
/// accounted.
pub fn handle_fail(file: &str, line: u32, method: &str, fatal: bool, message: String) {
    verify_pad_or_abort(fatal, file, line, method);
    finish(file, line, method, fatal, false, message, vec![]);
}

/// Handles a generic equality assertion over any `Debug + PartialEq` type.
pub fn handle_eq<T: std::fmt::Debug + PartialEq>(
    file: &str,
    line: u32,
    method: &str,
    fatal: bool,
    not_equal: bool,
    lhs_expr: &str,
    rhs_expr: &str,
    lhs: &T,
    rhs: &T,
) {
    account(fatal, file, line, method);
    let equal = lhs == rhs;
    let passed = if not_equal { !equal } else { equal };
    let message = if not_equal {
        format!("expected `{lhs_expr}` != `{rhs_expr}`, but both were {lhs:?}")
    } else {
        format!("expected `{lhs_expr}` == `{rhs_expr}`")
    };
    let values = vec![
        AssertValue { name: lhs_expr.to_string(), value: Some(format!("{lhs:?}")) },
        AssertValue { name: rhs_expr.to_string(), value: Some(format!("{rhs:?}")) },
    ];
    finish(file, line, method, fatal, passed, message, values);
}

/// Handles a width-aware integer equality assertion. `lhs`/`rhs` are
/// widened to `u64`; `width` (in bytes: 1, 2, 4, or 8) drives sign-aware
/// pretty-printing, mirroring the original's `typeof`-captured
/// temporaries.
#[allow(clippy::too_many_arguments)]
pub fn handle_int_eq(
    file: &str,
    line: u32,
    method: &str,
    fatal: bool,
    not_equal: bool,
    lhs_expr: &str,
    rhs_expr: &str,
    lhs: u64,
    rhs: u64,
    width: u8,
) {
    account(fatal, file, line, method);
    let bits = u32::from(width) * 8;
    let mask: u64 = if bits >= 64 { u64::MAX } else { (1u64 << bits) - 1 };
    let equal = (lhs & mask) == (rhs & mask);
    let passed = if not_equal { !equal } else { equal };
    let message = if not_equal {
        "expected differing integer values".to_string()
    } else {
        "expected equal integer values".to_string()
    };
    let values = vec![
        AssertValue { name: lhs_expr.to_string(), value: Some(pretty::format_integer(lhs, width)) },
        AssertValue { name: rhs_expr.to_string(), value: Some(pretty::format_integer(rhs, width)) },
    ];
    finish(file, line, method, fatal, passed, message, values);
}

/// Handles `ASSERT_PTR_NULL`.
pub fn handle_ptr_null(file: &str, line: u32, method: &str, fatal: bool, expr: &str, ptr: *const ()) {
    account(fatal, file, line, method);
    let passed = ptr.is_null();
    let message = format!("expected `{expr}` to be NULL");
    let values = vec![AssertValue { name: expr.to_string(), value: Some(pretty::format_pointer(ptr)) }];
    finish(file, line, method, fatal, passed, message, values);
}

/// Handles `ASSERT_PTR_NOT_NULL`.
pub fn handle_ptr_not_null(file: &str, line: u32, method: &str, fatal: bool, expr: &str, ptr: *const ()) {
    account(fatal, file, line, method);
    let passed = !ptr.is_null();
    let message = format!("expected `{expr}` to not be NULL");
    let values = vec![
        AssertValue { name: expr.to_string(), value: Some(pretty::format_pointer(ptr)) },
        AssertValue { name: expr.to_string(), value: Some(pretty::NOT_NULL_LABEL.to_string()) },
    ];
    finish(file, line, method, fatal, passed, message, values);
}

/// Handles `ASSERT_PTR_EQUAL`/`_NOT_EQUAL`.
#[allow(clippy::too_many_arguments)]
pub fn handle_ptr_eq(
    file: &str,
    line: u32,
    method: &str,
    fatal: bool,
    not_equal: bool,
    lhs_expr: &str,
    rhs_expr: &str,
    lhs: *const (),
    rhs: *const (),
) {
    account(fatal, file, line, method);
    let equal = lhs == rhs;
    let passed = if not_equal { !equal } else { equal };
    let message = if not_equal {
        "expected differing pointer values".to_string()
    } else {
        "expected equal pointer values".to_string()
    };
    let values = vec![
        AssertValue { name: lhs_expr.to_string(), value: Some(pretty::format_pointer(lhs)) },
        AssertValue { name: rhs_expr.to_string(), value: Some(pretty::format_pointer(rhs)) },
    ];
    finish(file, line, method, fatal, passed, message, values);
}

/// Handles `ASSERT_STRING_EQUAL`/`_NOT_EQUAL`.
#[allow(clippy::too_many_arguments)]
pub fn handle_str_eq(
    file: &str,
    line: u32,
    method: &str,
    fatal: bool,
    not_equal: bool,
    lhs_expr: &str,
    rhs_expr: &str,
    lhs: &str,
    rhs: &str,
) {
    account(fatal, file, line, method);
    let equal = lhs == rhs;
    let passed = if not_equal { !equal } else { equal };
    let message = if not_equal {
        "expected differing strings".to_string()
    } else {
        "expected equal strings".to_string()
    };
    let values = vec![
        AssertValue { name: lhs_expr.to_string(), value: Some(pretty::format_string(lhs)) },
        AssertValue { name: rhs_expr.to_string(), value: Some(pretty::format_string(rhs)) },
    ];
    finish(file, line, method, fatal, passed, message, values);
}

/// Handles `ASSERT_NSTRING_EQUAL`/`_NOT_EQUAL`: compares the first `n`
/// bytes of each string.
#[allow(clippy::too_many_arguments)]
pub fn handle_nstr_eq(
    file: &str,
    line: u32,
    method: &str,
    fatal: bool,
    not_equal: bool,
    lhs_expr: &str,
    rhs_expr: &str,
    lhs: &str,
    rhs: &str,
    n: usize,
) {
    account(fatal, file, line, method);
    let lhs_prefix = &lhs.as_bytes()[..n.min(lhs.len())];
    let rhs_prefix = &rhs.as_bytes()[..n.min(rhs.len())];
    let equal = lhs_prefix == rhs_prefix && lhs.len().min(n) == rhs.len().min(n);
    let passed = if not_equal { !equal } else { equal };
    let message = if not_equal {
        format!("expected first {n} bytes to differ")
    } else {
        format!("expected first {n} bytes to be equal")
    };
    let values = vec![
        AssertValue { name: lhs_expr.to_string(), value: Some(pretty::format_string(lhs)) },
        AssertValue { name: rhs_expr.to_string(), value: Some(pretty::format_string(rhs)) },
    ];
    finish(file, line, method, fatal, passed, message, values);
}

/// Handles `ASSERT_MEM_EQUAL`/`_NOT_EQUAL`: compares two byte slices of
/// equal length; on failure both render as a hex dump.
#[allow(clippy::too_many_arguments)]
pub fn handle_mem_eq(
    file: &str,
    line: u32,
    method: &str,
    fatal: bool,
    not_equal: bool,
    lhs_expr: &str,
    rhs_expr: &str,
    lhs: &[u8],
    rhs: &[u8],
) {
    account(fatal, file, line, method);
    let equal = lhs == rhs;
    let passed = if not_equal { !equal } else { equal };
    let message = if not_equal {
        "expected differing memory contents".to_string()
    } else {
        "expected equal memory contents".to_string()
    };
    let values = vec![
        AssertValue { name: lhs_expr.to_string(), value: Some(pretty::format_bytes(lhs)) },
        AssertValue { name: rhs_expr.to_string(), value: Some(pretty::format_bytes(rhs)) },
    ];
    finish(file, line, method, fatal, passed, message, values);
}

/// `ASSERT(cond)` — boolean, non-fatal.
#[macro_export]
macro_rules! assert {
    ($cond:expr) => {
        $crate::assert::handle_bool(file!(), line!(), "SCU_ASSERT", false, $cond, stringify!($cond), None)
    };
}

/// `ASSERT_FATAL(cond)` — boolean, fatal.
#[macro_export]
macro_rules! assert_fatal {
    ($cond:expr) => {
        $crate::assert::handle_bool(file!(), line!(), "SCU_ASSERT_FATAL", true, $cond, stringify!($cond), None)
    };
}

/// `ASSERT_WITH_MESSAGE(cond, fmt, args...)` — boolean with a formatted
/// message, non-fatal.
#[macro_export]
macro_rules! assert_msg {
    ($cond:expr, $($arg:tt)+) => {
        $crate::assert::handle_bool(file!(), line!(), "SCU_ASSERT_WITH_MESSAGE", false, $cond, stringify!($cond), Some(format!($($arg)+)))
    };
}

/// `ASSERT_WITH_MESSAGE_FATAL(cond, fmt, args...)`.
#[macro_export]
macro_rules! assert_msg_fatal {
    ($cond:expr, $($arg:tt)+) => {
        $crate::assert::handle_bool(file!(), line!(), "SCU_ASSERT_WITH_MESSAGE_FATAL", true, $cond, stringify!($cond), Some(format!($($arg)+)))
    };
}

/// `FAIL(msg)` — unconditional, does not account an attempt.
#[macro_export]
macro_rules! fail {
    ($($arg:tt)+) => {
        $crate::assert::handle_fail(file!(), line!(), "SCU_FAIL", false, format!($($arg)+))
    };
}

/// `FAIL_FATAL(msg)`.
#[macro_export]
macro_rules! fail_fatal {
    ($($arg:tt)+) => {
        $crate::assert::handle_fail(file!(), line!(), "SCU_FAIL_FATAL", true, format!($($arg)+))
    };
}

/// `ASSERT_EQUAL(lhs, rhs)` — generic equality.
#[macro_export]
macro_rules! assert_eq {
    ($lhs:expr, $rhs:expr) => {
        $crate::assert::handle_eq(file!(), line!(), "SCU_ASSERT_EQUAL", false, false, stringify!($lhs), stringify!($rhs), &($lhs), &($rhs))
    };
}

/// `ASSERT_EQUAL_FATAL(lhs, rhs)`.
#[macro_export]
macro_rules! assert_eq_fatal {
    ($lhs:expr, $rhs:expr) => {
        $crate::assert::handle_eq(file!(), line!(), "SCU_ASSERT_EQUAL_FATAL", true, false, stringify!($lhs), stringify!($rhs), &($lhs), &($rhs))
    };
}

/// `ASSERT_NOT_EQUAL(lhs, rhs)`.
#[macro_export]
macro_rules! assert_ne {
    ($lhs:expr, $rhs:expr) => {
        $crate::assert::handle_eq(file!(), line!(), "SCU_ASSERT_NOT_EQUAL", false, true, stringify!($lhs), stringify!($rhs), &($lhs), &($rhs))
    };
}

/// `ASSERT_NOT_EQUAL_FATAL(lhs, rhs)`.
#[macro_export]
macro_rules! assert_ne_fatal {
    ($lhs:expr, $rhs:expr) => {
        $crate::assert::handle_eq(file!(), line!(), "SCU_ASSERT_NOT_EQUAL_FATAL", true, true, stringify!($lhs), stringify!($rhs), &($lhs), &($rhs))
    };
}

/// `ASSERT_INT_EQUAL(lhs, rhs, width)` — width in bytes (1, 2, 4, or 8).
#[macro_export]
macro_rules! assert_int_eq {
    ($lhs:expr, $rhs:expr, $width:expr) => {
        $crate::assert::handle_int_eq(file!(), line!(), "SCU_ASSERT_INT_EQUAL", false, false, stringify!($lhs), stringify!($rhs), ($lhs) as u64, ($rhs) as u64, $width)
    };
}

/// `ASSERT_INT_EQUAL_FATAL(lhs, rhs, width)`.
#[macro_export]
macro_rules! assert_int_eq_fatal {
    ($lhs:expr, $rhs:expr, $width:expr) => {
        $crate::assert::handle_int_eq(file!(), line!(), "SCU_ASSERT_INT_EQUAL_FATAL", true, false, stringify!($lhs), stringify!($rhs), ($lhs) as u64, ($rhs) as u64, $width)
    };
}

/// `ASSERT_INT_NOT_EQUAL(lhs, rhs, width)`.
#[macro_export]
macro_rules! assert_int_ne {
    ($lhs:expr, $rhs:expr, $width:expr) => {
        $crate::assert::handle_int_eq(file!(), line!(), "SCU_ASSERT_INT_NOT_EQUAL", false, true, stringify!($lhs), stringify!($rhs), ($lhs) as u64, ($rhs) as u64, $width)
    };
}

/// `ASSERT_INT_NOT_EQUAL_FATAL(lhs, rhs, width)`.
#[macro_export]
macro_rules! assert_int_ne_fatal {
    ($lhs:expr, $rhs:expr, $width:expr) => {
        $crate::assert::handle_int_eq(file!(), line!(), "SCU_ASSERT_INT_NOT_EQUAL_FATAL", true, true, stringify!($lhs), stringify!($rhs), ($lhs) as u64, ($rhs) as u64, $width)
    };
}

/// `ASSERT_PTR_NULL(ptr)`.
#[macro_export]
macro_rules! assert_ptr_null {
    ($ptr:expr) => {
        $crate::assert::handle_ptr_null(file!(), line!(), "SCU_ASSERT_PTR_NULL", false, stringify!($ptr), ($ptr) as *const ())
    };
}

/// `ASSERT_PTR_NULL_FATAL(ptr)`.
#[macro_export]
macro_rules! assert_ptr_null_fatal {
    ($ptr:expr) => {
        $crate::assert::handle_ptr_null(file!(), line!(), "SCU_ASSERT_PTR_NULL_FATAL", true, stringify!($ptr), ($ptr) as *const ())
    };
}

/// `ASSERT_PTR_NOT_NULL(ptr)`.
#[macro_export]
macro_rules! assert_ptr_not_null {
    ($ptr:expr) => {
        $crate::assert::handle_ptr_not_null(file!(), line!(), "SCU_ASSERT_PTR_NOT_NULL", false, stringify!($ptr), ($ptr) as *const ())
    };
}

/// `ASSERT_PTR_NOT_NULL_FATAL(ptr)`.
#[macro_export]
macro_rules! assert_ptr_not_null_fatal {
    ($ptr:expr) => {
        $crate::assert::handle_ptr_not_null(file!(), line!(), "SCU_ASSERT_PTR_NOT_NULL_FATAL", true, stringify!($ptr), ($ptr) as *const ())
    };
}

/// `ASSERT_PTR_EQUAL(lhs, rhs)`.
#[macro_export]
macro_rules! assert_ptr_eq {
    ($lhs:expr, $rhs:expr) => {
        $crate::assert::handle_ptr_eq(file!(), line!(), "SCU_ASSERT_PTR_EQUAL", false, false, stringify!($lhs), stringify!($rhs), ($lhs) as *const (), ($rhs) as *const ())
    };
}

/// `ASSERT_PTR_EQUAL_FATAL(lhs, rhs)`.
#[macro_export]
macro_rules! assert_ptr_eq_fatal {
    ($lhs:expr, $rhs:expr) => {
        $crate::assert::handle_ptr_eq(file!(), line!(), "SCU_ASSERT_PTR_EQUAL_FATAL", true, false, stringify!($lhs), stringify!($rhs), ($lhs) as *const (), ($rhs) as *const ())
    };
}

/// `ASSERT_PTR_NOT_EQUAL(lhs, rhs)`.
#[macro_export]
macro_rules! assert_ptr_ne {
    ($lhs:expr, $rhs:expr) => {
        $crate::assert::handle_ptr_eq(file!(), line!(), "SCU_ASSERT_PTR_NOT_EQUAL", false, true, stringify!($lhs), stringify!($rhs), ($lhs) as *const (), ($rhs) as *const ())
    };
}

/// `ASSERT_PTR_NOT_EQUAL_FATAL(lhs, rhs)`.
#[macro_export]
macro_rules! assert_ptr_ne_fatal {
    ($lhs:expr, $rhs:expr) => {
        $crate::assert::handle_ptr_eq(file!(), line!(), "SCU_ASSERT_PTR_NOT_EQUAL_FATAL", true, true, stringify!($lhs), stringify!($rhs), ($lhs) as *const (), ($rhs) as *const ())
    };
}

/// `ASSERT_STRING_EQUAL(lhs, rhs)`.
#[macro_export]
macro_rules! assert_str_eq {
    ($lhs:expr, $rhs:expr) => {
        $crate::assert::handle_str_eq(file!(), line!(), "SCU_ASSERT_STRING_EQUAL", false, false, stringify!($lhs), stringify!($rhs), ($lhs).as_ref(), ($rhs).as_ref())
    };
}

/// `ASSERT_STRING_EQUAL_FATAL(lhs, rhs)`.
#[macro_export]
macro_rules! assert_str_eq_fatal {
    ($lhs:expr, $rhs:expr) => {
        $crate::assert::handle_str_eq(file!(), line!(), "SCU_ASSERT_STRING_EQUAL_FATAL", true, false, stringify!($lhs), stringify!($rhs), ($lhs).as_ref(), ($rhs).as_ref())
    };
}

/// `ASSERT_STRING_NOT_EQUAL(lhs, rhs)`.
#[macro_export]
macro_rules! assert_str_ne {
    ($lhs:expr, $rhs:expr) => {
        $crate::assert::handle_str_eq(file!(), line!(), "SCU_ASSERT_STRING_NOT_EQUAL", false, true, stringify!($lhs), stringify!($rhs), ($lhs).as_ref(), ($rhs).as_ref())
    };
}

/// `ASSERT_STRING_NOT_EQUAL_FATAL(lhs, rhs)`.
#[macro_export]
macro_rules! assert_str_ne_fatal {
    ($lhs:expr, $rhs:expr) => {
        $crate::assert::handle_str_eq(file!(), line!(), "SCU_ASSERT_STRING_NOT_EQUAL_FATAL", true, true, stringify!($lhs), stringify!($rhs), ($lhs).as_ref(), ($rhs).as_ref())
    };
}

/// `ASSERT_NSTRING_EQUAL(lhs, rhs, n)`.
#[macro_export]
macro_rules! assert_nstr_eq {
    ($lhs:expr, $rhs:expr, $n:expr) => {
        $crate::assert::handle_nstr_eq(file!(), line!(), "SCU_ASSERT_NSTRING_EQUAL", false, false, stringify!($lhs), stringify!($rhs), ($lhs).as_ref(), ($rhs).as_ref(), $n)
    };
}

/// `ASSERT_NSTRING_EQUAL_FATAL(lhs, rhs, n)`.
#[macro_export]
macro_rules! assert_nstr_eq_fatal {
    ($lhs:expr, $rhs:expr, $n:expr) => {
        $crate::assert::handle_nstr_eq(file!(), line!(), "SCU_ASSERT_NSTRING_EQUAL_FATAL", true, false, stringify!($lhs), stringify!($rhs), ($lhs).as_ref(), ($rhs).as_ref(), $n)
    };
}

/// `ASSERT_NSTRING_NOT_EQUAL(lhs, rhs, n)`.
#[macro_export]
macro_rules! assert_nstr_ne {
    ($lhs:expr, $rhs:expr, $n:expr) => {
        $crate::assert::handle_nstr_eq(file!(), line!(), "SCU_ASSERT_NSTRING_NOT_EQUAL", false, true, stringify!($lhs), stringify!($rhs), ($lhs).as_ref(), ($rhs).as_ref(), $n)
    };
}

/// `ASSERT_NSTRING_NOT_EQUAL_FATAL(lhs, rhs, n)`.
#[macro_export]
macro_rules! assert_nstr_ne_fatal {
    ($lhs:expr, $rhs:expr, $n:expr) => {
        $crate::assert::handle_nstr_eq(file!(), line!(), "SCU_ASSERT_NSTRING_NOT_EQUAL_FATAL", true, true, stringify!($lhs), stringify!($rhs), ($lhs).as_ref(), ($rhs).as_ref(), $n)
    };
}

/// `ASSERT_MEM_EQUAL(lhs, rhs)` — `lhs`/`rhs` must be `&[u8]` of equal
/// length.
#[macro_export]
macro_rules! assert_mem_eq {
    ($lhs:expr, $rhs:expr) => {
        $crate::assert::handle_mem_eq(file!(), line!(), "SCU_ASSERT_MEM_EQUAL", false, false, stringify!($lhs), stringify!($rhs), ($lhs).as_ref(), ($rhs).as_ref())
    };
}

/// `ASSERT_MEM_EQUAL_FATAL(lhs, rhs)`.
#[macro_export]
macro_rules! assert_mem_eq_fatal {
    ($lhs:expr, $rhs:expr) => {
        $crate::assert::handle_mem_eq(file!(), line!(), "SCU_ASSERT_MEM_EQUAL_FATAL", true, false, stringify!($lhs), stringify!($rhs), ($lhs).as_ref(), ($rhs).as_ref())
    };
}

/// `ASSERT_MEM_NOT_EQUAL(lhs, rhs)`.
#[macro_export]
macro_rules! assert_mem_ne {
    ($lhs:expr, $rhs:expr) => {
        $crate::assert::handle_mem_eq(file!(), line!(), "SCU_ASSERT_MEM_NOT_EQUAL", false, true, stringify!($lhs), stringify!($rhs), ($lhs).as_ref(), ($rhs).as_ref())
    };
}

/// `ASSERT_MEM_NOT_EQUAL_FATAL(lhs, rhs)`.
#[macro_export]
macro_rules! assert_mem_ne_fatal {
    ($lhs:expr, $rhs:expr) => {
        $crate::assert::handle_mem_eq(file!(), line!(), "SCU_ASSERT_MEM_NOT_EQUAL_FATAL", true, true, stringify!($lhs), stringify!($rhs), ($lhs).as_ref(), ($rhs).as_ref())
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ModuleRunState;

    fn with_fresh_global<T>(f: impl FnOnce() -> T) -> T {
        // Assertion handlers reach through the process-wide singleton, so
        // these tests reset it first and run serially (the default test
        // harness would otherwise interleave threads on the same state).
        crate::state::reset();
        f()
    }

    #[test]
    fn passing_bool_assert_records_nothing() {
        with_fresh_global(|| {
            handle_bool("t.rs", 1, "SCU_ASSERT", false, true, "true", None);
            let outcome = crate::state::global().lock().unwrap().snapshot();
            core::assert!(outcome.success);
            core::assert_eq!(outcome.asserts, 1);
            core::assert!(outcome.failures.is_empty());
        });
    }

    #[test]
    fn failing_bool_assert_records_a_failure() {
        with_fresh_global(|| {
            handle_bool("t.rs", 2, "SCU_ASSERT", false, false, "false", None);
            let outcome = crate::state::global().lock().unwrap().snapshot();
            core::assert!(!outcome.success);
            core::assert_eq!(outcome.failures.len(), 1);
            core::assert_eq!(outcome.failures[0].assert_method, "SCU_ASSERT");
        });
    }

    #[test]
    fn passing_fatal_assert_on_the_owning_thread_does_not_abort() {
        with_fresh_global(|| {
            crate::state::global().lock().unwrap().arm_recovery_pad();
            handle_bool("t.rs", 99, "SCU_ASSERT_FATAL", true, true, "true", None);
            crate::state::global().lock().unwrap().disarm_recovery_pad();
            let outcome = crate::state::global().lock().unwrap().snapshot();
            core::assert!(outcome.success);
            core::assert_eq!(outcome.asserts, 1);
        });
    }

    #[test]
    fn int_eq_masks_to_declared_width() {
        with_fresh_global(|| {
            // 0x1FF truncates to 0xFF at width 1, equal to plain 0xFF.
            handle_int_eq("t.rs", 3, "SCU_ASSERT_INT_EQUAL", false, false, "a", "b", 0x1ff, 0xff, 1);
            let outcome = crate::state::global().lock().unwrap().snapshot();
            core::assert!(outcome.success);
        });
    }

    #[test]
    fn mem_eq_failure_renders_hex_dump_values() {
        with_fresh_global(|| {
            handle_mem_eq("t.rs", 4, "SCU_ASSERT_MEM_EQUAL", false, false, "a", "b", &[1, 2, 3], &[1, 2, 4]);
            let outcome = crate::state::global().lock().unwrap().snapshot();
            core::assert!(!outcome.success);
            let failure = &outcome.failures[0];
            core::assert_eq!(failure.values.len(), 2);
            core::assert!(failure.values[0].value.as_ref().unwrap().contains("01 02 03"));
        });
    }

    #[test]
    fn fail_handles_as_unconditional_failure_without_accounting() {
        crate::state::reset();
        let mut state = ModuleRunState::default();
        state.record_failure("t.rs", 5, "SCU_FAIL", "nope", vec![]);
        let outcome = state.snapshot();
        core::assert_eq!(outcome.asserts, 0);
        core::assert_eq!(outcome.failures.len(), 1);
    }

    #[test]
    fn ptr_not_null_failure_puts_the_pointer_value_before_the_label() {
        with_fresh_global(|| {
            handle_ptr_not_null("t.rs", 6, "SCU_ASSERT_PTR_NOT_NULL", false, "p", std::ptr::null());
            let outcome = crate::state::global().lock().unwrap().snapshot();
            core::assert!(!outcome.success);
            let values = &outcome.failures[0].values;
            core::assert_eq!(values.len(), 2);
            core::assert_eq!(values[0].value.as_deref(), Some("NULL"));
            core::assert_eq!(values[1].value.as_deref(), Some(pretty::NOT_NULL_LABEL));
        });
    }

    #[test]
    fn ptr_null_failure_reports_the_non_null_pointer_value() {
        with_fresh_global(|| {
            let x = 0u8;
            handle_ptr_null("t.rs", 7, "SCU_ASSERT_PTR_NULL", false, "p", std::ptr::from_ref(&x).cast());
            let outcome = crate::state::global().lock().unwrap().snapshot();
            core::assert!(!outcome.success);
            core::assert_eq!(outcome.failures[0].values.len(), 1);
        });
    }
}
