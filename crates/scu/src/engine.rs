//! The execution engine: owns `main`'s control flow.
//!
//! Dispatches between list and run mode; for `run`, duplicates the command
//! stream, waits for a debugger if asked, drives module setup/teardown and
//! each selected test in source order, redirecting stdout/stderr into a
//! fresh capture file per phase.

use std::io::Write;
use std::os::fd::RawFd;
use std::time::Instant;

use nix::sys::resource::{getrusage, UsageWho};
use nix::sys::signal::{signal, SigHandler, Signal};
use nix::unistd::{dup, dup2, mkstemp, pause};

use crate::assert::FatalAssertion;
use crate::cli::{self, Mode};
use crate::error::ScuError;
use crate::hooks::{self, Hooks};
use crate::module;
use crate::protocol;
use crate::registry::{self, TestCase};
use crate::state;
use crate::stream;
use crate::verbosity::{self, dprintln, vprintln};

/// File descriptor of the process's standard output, per POSIX convention.
const STDOUT_FD: RawFd = 1;
/// File descriptor of the process's standard error, per POSIX convention.
const STDERR_FD: RawFd = 2;

/// Parses arguments, resolves the registry and hooks, and dispatches to
/// list or run mode. Returns the process exit code.
///
/// Intended to be called from a generated `fn main()`; see [`crate::main`].
/// Never returns `Err` itself — it collapses [`try_run`]'s `Result` into an
/// exit code and a stderr diagnostic, since by the point most of these
/// errors are known there is no event stream to report them on.
#[must_use]
pub fn run() -> i32 {
    match try_run() {
        Ok(code) => code,
        Err(err @ ScuError::Cli(_)) => {
            eprintln!("scu: {err}");
            eprintln!("usage: scu --list | scu --run <index>...");
            2
        }
        Err(err) => {
            eprintln!("scu: {err}");
            1
        }
    }
}

/// Parses arguments, resolves the registry and hooks, and dispatches to
/// list or run mode, returning the exit code on success.
///
/// # Errors
///
/// Returns the first [`ScuError`] encountered resolving the registry,
/// command line, module name, or hook overrides.
pub fn try_run() -> Result<i32, ScuError> {
    verbosity::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let cases = registry::all()?;
    let mode = cli::parse(args, cases.len())?;
    let name = module::resolve()?;
    let hooks = hooks::resolve()?;

    match mode {
        Mode::List => list_tests(&name, cases),
        Mode::Run(indices) => run_tests(&name, cases, &hooks, &indices),
    }
    Ok(0)
}

/// `list` mode: no redirection, one `module_list` then one `testcase_list`
/// per registered case, written straight to the inherited standard output.
fn list_tests(name: &str, cases: &[&TestCase]) {
    protocol::write_module_list(STDOUT_FD, name);
    for case in cases {
        protocol::write_testcase_list(STDOUT_FD, case);
    }
}

/// `run` mode: the full module lifecycle — command stream setup, optional
/// debugger wait, module setup, each selected test in the given order,
/// module teardown.
fn run_tests(name: &str, cases: &[&TestCase], hooks: &Hooks, indices: &[usize]) {
    install_fatal_assertion_panic_hook();

    let cmd_fd = dup(STDOUT_FD).unwrap_or_else(|err| {
        eprintln!("scu: failed to duplicate the command stream: {err}");
        std::process::abort();
    });
    stream::set_command_fd(cmd_fd);

    if std::env::var_os("SCU_WAIT_FOR_DEBUGGER").is_some() {
        wait_for_debugger();
    }

    protocol::write_module_start(cmd_fd, name);

    let (setup_fd, setup_path) = create_capture_file();
    redirect_output(setup_fd);
    protocol::write_setup_start(cmd_fd, &setup_path);
    (hooks.setup)();
    flush_captured_output();
    protocol::write_setup_end(cmd_fd);

    for &index in indices {
        run_one_test(cmd_fd, index, cases[index], hooks);
    }

    let (teardown_fd, teardown_path) = create_capture_file();
    redirect_output(teardown_fd);
    protocol::write_teardown_start(cmd_fd, &teardown_path);
    (hooks.teardown)();
    flush_captured_output();
    protocol::write_teardown_end(cmd_fd);

    protocol::write_module_end(cmd_fd);
}

/// Runs one selected test case: redirect, `before_each`, timed and
/// recovery-guarded thunk invocation, `after_each`, `testcase_end`.
fn run_one_test(cmd_fd: RawFd, index: usize, case: &TestCase, hooks: &Hooks) {
    let (capture_fd, capture_path) = create_capture_file();
    redirect_output(capture_fd);

    protocol::write_testcase_start(cmd_fd, index, case.name, &capture_path);
    vprintln!("scu: running test {index} ({})", case.name);

    (hooks.before_each)();

    state::reset();
    let start_mono = Instant::now();
    let start_cpu = process_cpu_seconds();

    state::global().lock().expect("run state poisoned").arm_recovery_pad();
    let result = std::panic::catch_unwind(case.func);
    state::global().lock().expect("run state poisoned").disarm_recovery_pad();

    if let Err(payload) = result {
        // Only our own fatal-assertion marker is expected here; anything
        // else is a genuine crash in the test, which must still terminate
        // the process rather than be swallowed as a normal test failure —
        // the harness infers the crash from the missing `testcase_end`.
        if payload.downcast_ref::<FatalAssertion>().is_none() {
            std::panic::resume_unwind(payload);
        }
    }

    let duration = start_mono.elapsed().as_secs_f64();
    let cpu_time = process_cpu_seconds() - start_cpu;

    (hooks.after_each)();
    flush_captured_output();

    let outcome = state::global().lock().expect("run state poisoned").snapshot();
    protocol::write_testcase_end(
        cmd_fd,
        index,
        outcome.success,
        outcome.asserts,
        duration,
        cpu_time,
        &outcome.failures,
    );
}

/// Creates a fresh, uniquely named capture file under `/tmp`.
///
/// # Aborts
///
/// Aborts the process if `/tmp` is not writable — the engine's contract is
/// that capture files can always be created; there is no recovery path.
fn create_capture_file() -> (RawFd, String) {
    match mkstemp("/tmp/scu.XXXXXX") {
        Ok((fd, path)) => {
            let path = path.to_string_lossy().into_owned();
            dprintln!("scu: capture file created at {path}");
            (fd, path)
        }
        Err(err) => {
            eprintln!("scu: failed to create capture file: {err}");
            std::process::abort();
        }
    }
}

/// Redirects the process's standard output and standard error onto `fd`.
///
/// The original runner additionally calls `setvbuf(..., _IONBF, 0)` here;
/// Rust's `Stdout`/`Stderr` expose no such knob, so output is flushed
/// explicitly at each phase boundary instead (see [`flush_captured_output`]).
fn redirect_output(fd: RawFd) {
    if let Err(err) = dup2(fd, STDOUT_FD) {
        eprintln!("scu: failed to redirect stdout: {err}");
        std::process::abort();
    }
    if let Err(err) = dup2(fd, STDERR_FD) {
        eprintln!("scu: failed to redirect stderr: {err}");
        std::process::abort();
    }
}

/// Flushes buffered stdout/stderr writes so they land in the current
/// capture file before the enclosing phase's `*_end` event is emitted.
fn flush_captured_output() {
    let _ = std::io::stdout().flush();
    let _ = std::io::stderr().flush();
}

/// Total process CPU time (user + system), in seconds.
fn process_cpu_seconds() -> f64 {
    let usage = getrusage(UsageWho::RUSAGE_SELF).expect("getrusage should not fail for RUSAGE_SELF");
    let user = usage.user_time();
    let system = usage.system_time();
    (user.tv_sec() + system.tv_sec()) as f64 + (user.tv_usec() + system.tv_usec()) as f64 / 1_000_000.0
}

extern "C" fn sigcont_noop(_signal: i32) {}

/// Installs an empty `SIGCONT` handler and blocks until it arrives, when
/// `SCU_WAIT_FOR_DEBUGGER` is set.
fn wait_for_debugger() {
    dprintln!("scu: waiting for SIGCONT (pid {})", std::process::id());
    // SAFETY: the handler only returns; it touches no shared state and is
    // async-signal-safe.
    unsafe {
        signal(Signal::SIGCONT, SigHandler::Handler(sigcont_noop))
            .expect("failed to install SIGCONT handler");
    }
    let _ = pause();
}

/// Suppresses the default panic report for the [`FatalAssertion`] marker
/// panic, which is expected control flow rather than a crash. Any other
/// panic still prints through the previous hook before this test's thunk
/// re-raises it via [`std::panic::resume_unwind`].
fn install_fatal_assertion_panic_hook() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            if info.payload().downcast_ref::<FatalAssertion>().is_some() {
                return;
            }
            previous(info);
        }));
    });
}
