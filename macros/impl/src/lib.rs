//! Implementation of the procedural macros re-exported by `webform-macros`.

use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{parse_macro_input, DeriveInput, Ident, ItemFn, LitStr};

mod form;

/// Derives the `webform_codec` traits for a struct.
///
/// Structs with named fields become records. Each field may carry a `#[form = "..."]` tag
/// (`name`, `name,omitempty`, `-`, `,ignore`); untagged fields use their declared name.
/// Ignored fields are never touched and may be of any type.
///
/// Types with their own wire form add a container attribute and implement the hook traits:
///
/// - `#[form(hook)]`: `Marshaler` and `Unmarshaler`.
/// - `#[form(marshal)]`: `Marshaler` only (encode).
/// - `#[form(unmarshal)]`: `Unmarshaler` only (decode).
#[proc_macro_derive(Form, attributes(form))]
pub fn derive_form(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    form::expand(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// Run a test with a `tracing` subscriber that writes to the test output.
///
/// The optional argument is the maximum level to capture (`TRACE`, `DEBUG`, `INFO`, `WARN`
/// or `ERROR`). Defaults to `DEBUG`.
///
/// # Example
/// ```rust
/// use webform_macros::test_traced;
/// use tracing::{debug, info};
///
/// #[test_traced("INFO")]
/// fn test_info_level() {
///     info!("This is an info log");
///     debug!("This is a debug log (won't be shown)");
///     assert_eq!(2 + 2, 4);
/// }
/// ```
#[proc_macro_attribute]
pub fn test_traced(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);

    // Parse the level, if provided
    let level = if attr.is_empty() {
        LitStr::new("DEBUG", Span::call_site())
    } else {
        parse_macro_input!(attr as LitStr)
    };
    let level_str = level.value().to_uppercase();
    if !matches!(
        level_str.as_str(),
        "TRACE" | "DEBUG" | "INFO" | "WARN" | "ERROR"
    ) {
        return syn::Error::new(
            level.span(),
            "level must be one of TRACE, DEBUG, INFO, WARN or ERROR",
        )
        .into_compile_error()
        .into();
    }
    let level_ident = Ident::new(&level_str, level.span());

    // Extract function components
    let attrs = input.attrs;
    let vis = input.vis;
    let sig = input.sig;
    let block = input.block;

    let expanded = quote! {
        #[test]
        #(#attrs)*
        #vis #sig {
            let subscriber = ::webform_macros::tracing_subscriber::fmt()
                .with_test_writer()
                .with_max_level(::webform_macros::tracing::Level::#level_ident)
                .with_line_number(true)
                .with_span_events(::webform_macros::tracing_subscriber::fmt::format::FmtSpan::CLOSE)
                .finish();
            let dispatcher = ::webform_macros::tracing::Dispatch::new(subscriber);
            ::webform_macros::tracing::dispatcher::with_default(&dispatcher, || #block)
        }
    };
    TokenStream::from(expanded)
}
