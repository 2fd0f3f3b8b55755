//! Resolution of the test module's name, reported in `module_list` and
//! `module_start` events.
//!
//! The original runner takes this from a single `extern const char
//! *_scu_module_name` set by `SCU_MODULE(name)`. Rust has no equivalent
//! single-definition-per-binary guarantee to lean on, so the name is
//! collected the same way hooks are: through `inventory`, with a duplicate
//! check standing in for "defined twice across translation units".

use thiserror::Error;

/// One `scu::module!("name")` invocation.
pub struct ModuleNameEntry(pub &'static str);

inventory::collect!(ModuleNameEntry);

/// More than one `scu::module!(...)` was declared in this binary.
#[derive(Debug, Error)]
#[error("module name declared more than once: {0:?} and {1:?}")]
pub struct DuplicateModuleName(pub &'static str, pub &'static str);

/// Resolves the module's name.
///
/// # Errors
///
/// Returns [`DuplicateModuleName`] if `scu::module!` was invoked more than
/// once in this binary.
pub fn resolve() -> Result<String, DuplicateModuleName> {
    let mut names = inventory::iter::<ModuleNameEntry>().map(|e| e.0);
    let Some(first) = names.next() else {
        return Ok(fallback_name());
    };
    if let Some(second) = names.next() {
        return Err(DuplicateModuleName(first, second));
    }
    Ok(first.to_string())
}

/// Falls back to the running executable's file name when no `scu::module!`
/// was declared, so a module built without one still produces a usable
/// name instead of an empty string.
fn fallback_name() -> String {
    std::env::current_exe()
        .ok()
        .and_then(|path| path.file_name().map(|name| name.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "test_module".to_string())
}

/// Declares this binary's module name, reported in `module_list` and
/// `module_start` events.
///
/// # Examples
///
/// ```ignore
/// scu::module!("arithmetic");
/// ```
#[macro_export]
macro_rules! module {
    ($name:literal) => {
        ::scu::inventory::submit! {
            ::scu::module::ModuleNameEntry($name)
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_a_non_empty_name_with_no_declaration() {
        // This test binary has no `scu::module!` call of its own, so the
        // registry is empty and resolution must fall back rather than
        // error or return an empty string.
        let name = resolve().expect("no duplicate in this binary");
        assert!(!name.is_empty());
    }
}
