//! Diagnostic logging for the runner's own operator.
//!
//! This is separate from, and never written to, the command stream
//! (`scu::protocol`): it is plain text on the inherited standard error,
//! useful when something about the runner itself — not the test module —
//! needs explaining (a capture file path, a debugger wait). Controlled by
//! `SCU_VERBOSE`/`SCU_QUIET` rather than a CLI flag, since the CLI surface
//! is fixed to `--list`/`--run` and gains no flags of its own.

use std::sync::atomic::{AtomicU8, Ordering};

/// Diagnostic output level.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    /// Nothing from this module; only errors the caller prints itself.
    Quiet = 0,
    /// The default: silent unless `SCU_VERBOSE` is set.
    Default = 1,
    /// Every diagnostic line.
    Verbose = 2,
}

static VERBOSITY: AtomicU8 = AtomicU8::new(Verbosity::Default as u8);

/// Reads `SCU_VERBOSE`/`SCU_QUIET` from the environment and latches the
/// level for the rest of the process. Idempotent; the first call wins.
pub fn init() {
    let level = if std::env::var_os("SCU_QUIET").is_some() {
        Verbosity::Quiet
    } else if std::env::var_os("SCU_VERBOSE").is_some() {
        Verbosity::Verbose
    } else {
        Verbosity::Default
    };
    VERBOSITY.store(level as u8, Ordering::Relaxed);
}

/// The current diagnostic level.
#[must_use]
pub fn verbosity() -> Verbosity {
    match VERBOSITY.load(Ordering::Relaxed) {
        0 => Verbosity::Quiet,
        2 => Verbosity::Verbose,
        _ => Verbosity::Default,
    }
}

/// `true` once `SCU_VERBOSE` has been observed by [`init`].
#[must_use]
pub fn is_verbose() -> bool {
    verbosity() == Verbosity::Verbose
}

/// `true` once `SCU_QUIET` has been observed by [`init`].
#[must_use]
pub fn is_quiet() -> bool {
    verbosity() == Verbosity::Quiet
}

/// Prints to stderr only when `SCU_VERBOSE` is set. Usage mirrors `eprintln!`.
macro_rules! vprintln {
    ($($arg:tt)*) => {
        if $crate::verbosity::is_verbose() {
            eprintln!($($arg)*);
        }
    };
}

/// Prints to stderr unless `SCU_QUIET` is set. Usage mirrors `eprintln!`.
macro_rules! dprintln {
    ($($arg:tt)*) => {
        if !$crate::verbosity::is_quiet() {
            eprintln!($($arg)*);
        }
    };
}

pub(crate) use dprintln;
pub(crate) use vprintln;
