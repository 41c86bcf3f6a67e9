//! Derive macros for rxtodo
//!
//! # Available Macros
//!
//! - `#[derive(Action)]` - Implements `rxtodo_core::action::Action` for an
//!   action enum, naming each variant for logs and metric labels
//!
//! # Example
//!
//! ```ignore
//! use rxtodo_macros::Action;
//!
//! #[derive(Action, Clone, Debug)]
//! enum TodoAction {
//!     AddTodo { id: u64, text: String },
//!     #[action(name = "toggle")]
//!     ToggleTodo { id: u64 },
//! }
//!
//! assert_eq!(TodoAction::AddTodo { id: 0, text: "a".into() }.name(), "AddTodo");
//! assert_eq!(TodoAction::ToggleTodo { id: 0 }.name(), "toggle");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Fields, LitStr};

/// Derive macro for action enums
///
/// Implements `rxtodo_core::action::Action`, whose `name()` returns the
/// variant name, or the value of `#[action(name = "...")]` when present.
///
/// # Panics
///
/// This macro will produce a compile error (not a runtime panic) if:
/// - Applied to a non-enum type
/// - Applied to an enum without variants
/// - An `#[action(...)]` attribute is malformed
#[proc_macro_derive(Action, attributes(action))]
pub fn derive_action(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let Data::Enum(data_enum) = &input.data else {
        return syn::Error::new_spanned(input, "#[derive(Action)] can only be used on enums")
            .to_compile_error()
            .into();
    };

    if data_enum.variants.is_empty() {
        return syn::Error::new_spanned(
            input,
            "#[derive(Action)] needs at least one variant",
        )
        .to_compile_error()
        .into();
    }

    let mut name_arms = Vec::with_capacity(data_enum.variants.len());

    for variant in &data_enum.variants {
        let variant_name = &variant.ident;
        let label = match renamed(&variant.attrs) {
            Ok(Some(label)) => label,
            Ok(None) => variant_name.to_string(),
            Err(err) => return err.to_compile_error().into(),
        };

        let pattern = match &variant.fields {
            Fields::Named(_) => quote! { Self::#variant_name { .. } },
            Fields::Unnamed(_) => quote! { Self::#variant_name(..) },
            Fields::Unit => quote! { Self::#variant_name },
        };
        name_arms.push(quote! { #pattern => #label, });
    }

    let expanded = quote! {
        impl #impl_generics ::rxtodo_core::action::Action for #name #ty_generics #where_clause {
            fn name(&self) -> &'static str {
                match self {
                    #(#name_arms)*
                }
            }
        }
    };

    TokenStream::from(expanded)
}

/// Reads `#[action(name = "...")]` from a variant's attributes
fn renamed(attrs: &[Attribute]) -> syn::Result<Option<String>> {
    let mut label = None;

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("action")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                let value: LitStr = meta.value()?.parse()?;
                label = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("unsupported action attribute, expected `name = \"...\"`"))
            }
        })?;
    }

    Ok(label)
}
