//! Parsing logic for the `#[scu::test_case(...)]` attribute arguments.

use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::{LitStr, Token};

/// Mirrors `scu::registry::MAX_TAGS`; duplicated here because this crate
/// cannot depend on `scu` without creating a dependency cycle.
const MAX_TAGS: usize = 128;

/// Parsed `#[scu::test_case(...)]` attribute arguments.
pub struct TestCaseArgs {
    pub description: Option<LitStr>,
    pub tags: Vec<LitStr>,
}

impl Parse for TestCaseArgs {
    fn parse(input: ParseStream<'_>) -> syn::Result<Self> {
        let mut description = None;
        let mut tags = Vec::new();

        while !input.is_empty() {
            let key: syn::Ident = input.parse()?;
            match key.to_string().as_str() {
                "description" => {
                    input.parse::<Token![=]>()?;
                    let value: LitStr = input.parse()?;
                    description = Some(value);
                }
                "tags" => {
                    let content;
                    syn::parenthesized!(content in input);
                    let list: Punctuated<LitStr, Token![,]> =
                        Punctuated::parse_terminated(&content)?;
                    if list.len() > MAX_TAGS {
                        return Err(syn::Error::new(
                            key.span(),
                            format!("at most {MAX_TAGS} tags are supported"),
                        ));
                    }
                    tags = list.into_iter().collect();
                }
                _ => {
                    return Err(syn::Error::new(
                        key.span(),
                        format!(
                            "unknown attribute `{key}`; expected one of: description, tags"
                        ),
                    ));
                }
            }

            if !input.is_empty() {
                input.parse::<Token![,]>()?;
            }
        }

        Ok(Self { description, tags })
    }
}
