//! The process-wide command stream file descriptor.
//!
//! Set once by the execution engine at the start of `run` mode (a dup of
//! the inherited standard output); read by the assertion engine so a
//! thread-of-origin violation can emit a `testcase_error` event before
//! aborting the process.

use std::os::fd::RawFd;
use std::sync::OnceLock;

static COMMAND_FD: OnceLock<RawFd> = OnceLock::new();

/// Records the command stream file descriptor. Must be called exactly
/// once, before any assertion macro can run.
pub fn set_command_fd(fd: RawFd) {
    COMMAND_FD
        .set(fd)
        .unwrap_or_else(|_| panic!("command stream fd already set"));
}

/// Returns the command stream file descriptor.
///
/// # Panics
///
/// Panics if called before [`set_command_fd`] — a bug in the engine, since
/// no assertion can run before the command stream is established.
pub fn command_fd() -> RawFd {
    *COMMAND_FD
        .get()
        .expect("command stream used before it was established")
}
