//! Code generation for the `#[scu::test_case]` and hook attribute macros.
//!
//! Each generates:
//! 1. The original function, unchanged.
//! 2. An `inventory::submit!` entry referencing it, collected by `scu`
//!    before `main` runs.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::ItemFn;

use crate::parse::TestCaseArgs;

/// Which of the four module-level hooks a function is registered as.
pub enum HookKind {
    Setup,
    Teardown,
    BeforeEach,
    AfterEach,
}

/// Generates the registration for `#[scu::test_case(...)]`.
pub fn generate_test_case(def: TestCaseArgs, func: ItemFn) -> syn::Result<TokenStream> {
    if !func.sig.inputs.is_empty() {
        return Err(syn::Error::new_spanned(
            &func.sig,
            "test case functions must take no parameters",
        ));
    }
    if func.sig.asyncness.is_some() {
        return Err(syn::Error::new_spanned(
            &func.sig,
            "test case functions must be synchronous",
        ));
    }

    let fn_name = &func.sig.ident;
    let fn_name_str = fn_name.to_string();
    let description = def.description.map(|d| d.value()).unwrap_or_default();
    let tags = def.tags.iter().map(syn::LitStr::value);
    let thunk_name = format_ident!("__scu_thunk_{}", fn_name);

    Ok(quote! {
        #func

        fn #thunk_name() {
            #fn_name()
        }

        ::scu::inventory::submit! {
            ::scu::registry::TestCase {
                line: line!(),
                name: #fn_name_str,
                description: #description,
                tags: &[#(#tags),*],
                func: #thunk_name,
            }
        }
    })
}

/// Generates the registration for `#[scu::setup]`/`#[scu::teardown]`/
/// `#[scu::before_each]`/`#[scu::after_each]`.
pub fn generate_hook(kind: HookKind, func: ItemFn) -> syn::Result<TokenStream> {
    if !func.sig.inputs.is_empty() {
        return Err(syn::Error::new_spanned(
            &func.sig,
            "hook functions must take no parameters",
        ));
    }
    if func.sig.asyncness.is_some() {
        return Err(syn::Error::new_spanned(
            &func.sig,
            "hook functions must be synchronous",
        ));
    }

    let fn_name = &func.sig.ident;
    let kind_tokens = match kind {
        HookKind::Setup => quote! { ::scu::hooks::HookKind::Setup },
        HookKind::Teardown => quote! { ::scu::hooks::HookKind::Teardown },
        HookKind::BeforeEach => quote! { ::scu::hooks::HookKind::BeforeEach },
        HookKind::AfterEach => quote! { ::scu::hooks::HookKind::AfterEach },
    };

    Ok(quote! {
        #func

        ::scu::inventory::submit! {
            ::scu::hooks::HookEntry {
                kind: #kind_tokens,
                func: #fn_name,
            }
        }
    })
}
