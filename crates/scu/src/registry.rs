//! Compile-time test registration.
//!
//! Every `#[scu::test_case]`-annotated function expands to an
//! [`inventory::submit!`] entry carrying a [`TestCase`]. `inventory` arranges
//! for these entries to be collected into a linker section and iterated
//! before `main` begins, playing the role the original runner filled with
//! `__attribute__((constructor))` registration.

use std::sync::OnceLock;

/// Maximum number of tags a single test case may carry.
pub const MAX_TAGS: usize = 128;

/// Maximum number of registered test cases a single module may contain.
pub const MAX_TESTS: usize = 4096;

/// A single registered test case.
///
/// Constructed once, at link time, by the `#[scu::test_case]` macro; never
/// mutated after registration. `line` is used as the primary sort key so
/// that execution order matches source-declaration order regardless of the
/// order in which static constructors ran.
pub struct TestCase {
    /// Source line of the `#[scu::test_case]` attribute.
    pub line: u32,
    /// The function's identifier, used as the test's symbolic name.
    pub name: &'static str,
    /// Human-readable description, empty string if none was given.
    pub description: &'static str,
    /// Up to [`MAX_TAGS`] tags; emitted in events but never acted on.
    pub tags: &'static [&'static str],
    /// The test thunk. Takes no parameters; failures are recorded through
    /// the global per-test accounting state rather than a return value.
    pub func: fn(),
}

inventory::collect!(TestCase);

/// Registry overflow: more tests were registered than `MAX_TESTS` allows.
#[derive(Debug, thiserror::Error)]
#[error("module registers {0} test cases, exceeding the limit of {MAX_TESTS}")]
pub struct TooManyTests(pub usize);

static SORTED: OnceLock<Vec<&'static TestCase>> = OnceLock::new();

/// Returns all registered test cases, sorted by source line ascending.
///
/// The sort is stable, so two test cases declared on the same line (only
/// possible across distinct translation units linked together) keep
/// `inventory`'s iteration order relative to each other, which corresponds
/// to registration order.
///
/// # Errors
///
/// Returns [`TooManyTests`] if the module registers more than [`MAX_TESTS`]
/// cases. This indicates a misbuilt module, not a test failure, so it is
/// reported once rather than silently truncating the registry.
pub fn all() -> Result<&'static [&'static TestCase], TooManyTests> {
    if let Some(sorted) = SORTED.get() {
        return Ok(sorted);
    }

    let mut cases: Vec<&'static TestCase> = inventory::iter::<TestCase>().collect();
    if cases.len() > MAX_TESTS {
        return Err(TooManyTests(cases.len()));
    }
    cases.sort_by_key(|case| case.line);

    Ok(SORTED.get_or_init(|| cases))
}
