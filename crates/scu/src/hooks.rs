//! The four named module-level hooks.
//!
//! Each hook has a no-op default; a test module may override any subset by
//! annotating a function with `#[scu::setup]`, `#[scu::teardown]`,
//! `#[scu::before_each]`, or `#[scu::after_each]`. This plays the role the
//! original runner filled with weak-symbol defaults: Rust has no silent
//! weak-linkage override, so instead each override is collected through
//! `inventory` and validated — at most one override per kind is accepted.

use thiserror::Error;

/// Which hook a [`HookEntry`] overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookKind {
    /// Runs once per module, before any test case.
    Setup,
    /// Runs once per module, after all test cases.
    Teardown,
    /// Runs immediately before every test case's thunk.
    BeforeEach,
    /// Runs immediately after every test case's thunk (including after a
    /// fatal assertion returned through the recovery landing pad).
    AfterEach,
}

/// A hook override, registered via `#[scu::setup]` and friends.
pub struct HookEntry {
    /// Which hook this entry overrides.
    pub kind: HookKind,
    /// The hook body. Takes no parameters and returns nothing; failures
    /// inside a hook are ordinary assertion failures recorded against
    /// whichever phase is active when it runs.
    pub func: fn(),
}

inventory::collect!(HookEntry);

/// More than one test module function was registered for the same hook
/// kind.
#[derive(Debug, Error)]
#[error("module registers more than one {0:?} hook")]
pub struct DuplicateHook(pub HookKind);

fn no_op() {}

/// The four resolved hooks for a module, each defaulting to a no-op.
pub struct Hooks {
    pub setup: fn(),
    pub teardown: fn(),
    pub before_each: fn(),
    pub after_each: fn(),
}

/// Resolves the module's hooks from registered overrides.
///
/// # Errors
///
/// Returns [`DuplicateHook`] if more than one override was registered for
/// the same kind — a misbuilt-module error, surfaced before `module_start`
/// is emitted.
pub fn resolve() -> Result<Hooks, DuplicateHook> {
    let mut hooks = Hooks {
        setup: no_op,
        teardown: no_op,
        before_each: no_op,
        after_each: no_op,
    };
    let mut seen = [false; 4];

    for entry in inventory::iter::<HookEntry>() {
        let slot = match entry.kind {
            HookKind::Setup => &mut hooks.setup,
            HookKind::Teardown => &mut hooks.teardown,
            HookKind::BeforeEach => &mut hooks.before_each,
            HookKind::AfterEach => &mut hooks.after_each,
        };
        let idx = entry.kind as usize;
        if seen[idx] {
            return Err(DuplicateHook(entry.kind));
        }
        seen[idx] = true;
        *slot = entry.func;
    }

    Ok(hooks)
}
