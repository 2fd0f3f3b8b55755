//! Per-test run state: assertion accounting, the failure ring, and the
//! fatal-assertion recovery landing pad.
//!
//! This state is unavoidably process-global: it must be reachable from
//! deeply nested user code (inside assertion macros) without threading a
//! parameter through every call in the test module. It is single-threaded
//! by construction — a test's thunk runs on exactly one thread — so the
//! `Mutex` guarding the process-wide singleton below exists only to keep a
//! misbehaving worker thread's *non-fatal* assertion call sound rather
//! than undefined behavior; the fatal path additionally checks thread
//! identity before touching the state at all, which is the actual
//! correctness contract (see [`ModuleRunState::check_recovery_pad`]).

use std::sync::{Mutex, OnceLock};
use std::thread::ThreadId;

use crate::escape::{truncate_to, FAILURE_MESSAGE_LENGTH};

/// Maximum number of failure records retained per test.
pub const MAX_FAILURES: usize = 1024;

/// One operand of a failed assertion: the source expression text and,
/// when applicable, its pretty-printed value (absent for e.g. `FAIL`,
/// which has no operands).
#[derive(Debug, Clone)]
pub struct AssertValue {
    /// The source expression text (e.g. `"1"`, `"x"`).
    pub name: String,
    /// The pretty-printed value, if this operand has one to show.
    pub value: Option<String>,
}

/// One recorded assertion failure.
#[derive(Debug, Clone)]
pub struct Failure {
    /// Source file of the failing assertion.
    pub file: String,
    /// Source line of the failing assertion.
    pub line: u32,
    /// Assertion macro name, e.g. `"ASSERT_INT_EQUAL"`.
    pub assert_method: String,
    /// Free-form failure message, truncated to [`FAILURE_MESSAGE_LENGTH`].
    pub message: String,
    /// Zero, one, or two operand descriptions (LHS, RHS).
    pub values: Vec<AssertValue>,
}

/// The outcome of checking a fatal assertion's right to use the recovery
/// pad.
pub enum PadCheck {
    /// The calling thread owns a currently-armed pad; it may proceed.
    Ok,
    /// The pad is unarmed, or owned by a different thread. This is a
    /// programming error in the test module and the engine must abort the
    /// process after reporting a `testcase_error`.
    WrongThreadOrUnarmed,
}

/// A snapshot of the outcome of a finished test.
pub struct Outcome {
    /// Whether the test ended with no recorded failures.
    pub success: bool,
    /// Total number of `ASSERT_*`/`ASSERT_*_FATAL` invocations (not
    /// counting `FAIL`/`FAIL_FATAL`).
    pub asserts: u64,
    /// Failures in the order they were recorded.
    pub failures: Vec<Failure>,
}

/// Mutable state for one test's execution.
///
/// The production runner only ever touches the process-wide singleton via
/// [`global`], but the type itself carries no global state, which makes it
/// possible to drive it directly (and in isolation) from unit tests.
pub struct ModuleRunState {
    success: bool,
    asserts: u64,
    failures: Vec<Failure>,
    pad: Option<ThreadId>,
}

impl Default for ModuleRunState {
    fn default() -> Self {
        Self {
            success: true,
            asserts: 0,
            failures: Vec::new(),
            pad: None,
        }
    }
}

impl ModuleRunState {
    /// Arms the recovery landing pad, recording the current thread as the
    /// thunk's owning thread. Must be called immediately before invoking
    /// the test thunk.
    pub fn arm_recovery_pad(&mut self) {
        self.pad = Some(std::thread::current().id());
    }

    /// Disarms the recovery landing pad. Must be called immediately after
    /// the thunk call returns (by normal return or by unwinding through
    /// `catch_unwind`), before `after_each` runs.
    pub fn disarm_recovery_pad(&mut self) {
        self.pad = None;
    }

    /// Checks whether the calling thread may use the recovery landing pad,
    /// per the thread-of-origin rule. Must be called by every fatal
    /// assertion variant before recording a failure or unwinding.
    pub fn check_recovery_pad(&self) -> PadCheck {
        match self.pad {
            Some(owner) if owner == std::thread::current().id() => PadCheck::Ok,
            _ => PadCheck::WrongThreadOrUnarmed,
        }
    }

    /// Records one assertion attempt. `FAIL`/`FAIL_FATAL` do not call
    /// this — per the original runner's observed behavior, they
    /// contribute a failure record but do not increment the attempt
    /// counter.
    pub fn account_assert(&mut self) {
        self.asserts += 1;
    }

    /// Records a failure. Beyond [`MAX_FAILURES`] records, further
    /// failures are dropped but `success` still flips to false.
    pub fn record_failure(
        &mut self,
        file: &str,
        line: u32,
        assert_method: &str,
        message: &str,
        values: Vec<AssertValue>,
    ) {
        self.success = false;
        if self.failures.len() < MAX_FAILURES {
            self.failures.push(Failure {
                file: file.to_string(),
                line,
                assert_method: assert_method.to_string(),
                message: truncate_to(message, FAILURE_MESSAGE_LENGTH),
                values,
            });
        }
    }

    /// Snapshots the current outcome without resetting the state.
    pub fn snapshot(&self) -> Outcome {
        Outcome {
            success: self.success,
            asserts: self.asserts,
            failures: self.failures.clone(),
        }
    }
}

/// Returns the process-wide run state, used by the assertion macros and
/// the execution engine. Initialized lazily on first use.
pub fn global() -> &'static Mutex<ModuleRunState> {
    static STATE: OnceLock<Mutex<ModuleRunState>> = OnceLock::new();
    STATE.get_or_init(|| Mutex::new(ModuleRunState::default()))
}

/// Resets the process-wide run state before a new test case runs.
pub fn reset() {
    let mut state = global().lock().expect("run state poisoned");
    *state = ModuleRunState::default();
}
