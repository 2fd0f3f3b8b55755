//! Proc-macro crate backing `scu`'s `#[scu::test_case]` and hook attributes.
//!
//! Expands each annotated function into an `inventory::submit!` entry that
//! `scu`'s registry collects before `main` runs, replacing the
//! constructor-attribute registration of the C runner this crate's sibling
//! is modeled on.

mod codegen;
mod parse;

use proc_macro::TokenStream;
use syn::parse_macro_input;

use codegen::HookKind;
use parse::TestCaseArgs;

/// Marks a function as a registered test case.
///
/// # Examples
///
/// ```ignore
/// #[scu::test_case(description = "adds two numbers", tags("math", "fast"))]
/// fn addition_works() {
///     scu::assert_eq!(2 + 2, 4);
/// }
/// ```
#[proc_macro_attribute]
pub fn test_case(attr: TokenStream, item: TokenStream) -> TokenStream {
    let def = parse_macro_input!(attr as TestCaseArgs);
    let func = parse_macro_input!(item as syn::ItemFn);

    match codegen::generate_test_case(def, func) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// Marks a function as the module setup hook. At most one per module.
#[proc_macro_attribute]
pub fn setup(attr: TokenStream, item: TokenStream) -> TokenStream {
    generate_hook(HookKind::Setup, attr, item)
}

/// Marks a function as the module teardown hook. At most one per module.
#[proc_macro_attribute]
pub fn teardown(attr: TokenStream, item: TokenStream) -> TokenStream {
    generate_hook(HookKind::Teardown, attr, item)
}

/// Marks a function as the before-each hook. At most one per module.
#[proc_macro_attribute]
pub fn before_each(attr: TokenStream, item: TokenStream) -> TokenStream {
    generate_hook(HookKind::BeforeEach, attr, item)
}

/// Marks a function as the after-each hook. At most one per module.
#[proc_macro_attribute]
pub fn after_each(attr: TokenStream, item: TokenStream) -> TokenStream {
    generate_hook(HookKind::AfterEach, attr, item)
}

fn generate_hook(kind: HookKind, attr: TokenStream, item: TokenStream) -> TokenStream {
    parse_macro_input!(attr as syn::parse::Nothing);
    let func = parse_macro_input!(item as syn::ItemFn);

    match codegen::generate_hook(kind, func) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}
