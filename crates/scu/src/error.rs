//! The library's structured error type.
//!
//! Each variant wraps the typed error from the module that detected it;
//! [`crate::engine::run`] is the only place these are collapsed into an exit
//! code, since by the time most of them surface no event stream has been
//! written yet and a plain diagnostic on stderr is all that's needed.

use thiserror::Error;

/// Anything that can stop a test module from starting normally.
#[derive(Debug, Error)]
pub enum ScuError {
    /// The registry holds more test cases than it can sort and index.
    #[error(transparent)]
    TooManyTests(#[from] crate::registry::TooManyTests),

    /// More than one function is registered for the same hook kind.
    #[error(transparent)]
    DuplicateHook(#[from] crate::hooks::DuplicateHook),

    /// More than one `scu::module!` declaration in this binary.
    #[error(transparent)]
    DuplicateModuleName(#[from] crate::module::DuplicateModuleName),

    /// The command line did not match `--list` or `--run <index>...`.
    #[error(transparent)]
    Cli(#[from] crate::cli::UsageError),
}
