//! A self-contained unit-test runner embedded in a test-module executable.
//!
//! Each test module links this crate, registers test cases and hooks with
//! `#[scu::test_case]` and friends (from `scu-macros`), and ends with a
//! [`main!`] invocation. The resulting binary either enumerates its
//! registered cases (`--list`) or executes a selected subset (`--run`),
//! narrating lifecycle and outcomes as one JSON event per line on a
//! duplicated standard output — the command stream a controlling harness
//! consumes.
//!
//! ```ignore
//! scu::module!("arithmetic");
//!
//! #[scu::test_case(description = "adds two numbers")]
//! fn addition_works() {
//!     scu::assert_eq!(2 + 2, 4);
//! }
//!
//! scu::main!();
//! ```

pub mod assert;
pub mod cli;
pub mod engine;
pub mod error;
pub mod escape;
pub mod hooks;
pub mod json;
pub mod module;
pub mod pretty;
pub mod protocol;
pub mod registry;
pub mod state;
pub mod stream;
pub mod verbosity;

/// Re-exported so the `#[scu::test_case]` and `scu::module!`/`scu::main!`
/// expansions can refer to `::scu::inventory` without test modules needing
/// their own dependency on it.
pub use inventory;

/// Re-exported so test modules can write `#[scu::test_case]`,
/// `#[scu::setup]`, and friends.
pub use scu_macros::{after_each, before_each, setup, teardown, test_case};

/// Expands to a `fn main()` that runs the module and exits with its status
/// code. Call once, typically at the bottom of a test module's entry file.
#[macro_export]
macro_rules! main {
    () => {
        fn main() {
            std::process::exit(::scu::engine::run());
        }
    };
}
