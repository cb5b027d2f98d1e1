//! # tagwire-core-derive
//!
//! Derive macros for the tagwire-core injection container.
//!
//! - `#[derive(Injectable)]`: describe a struct as a record so its
//!   `#[inject]` tagged fields can be populated by the container

use proc_macro::TokenStream;

mod injectable;

/// Derive record metadata for field injection.
///
/// Fields of type `Inject<T>` become injection slots; a field is injected
/// when it is also `pub` and tagged `#[inject]`. Contracts the struct
/// implements are listed with `#[injectable(implements(dyn Trait, ...))]`.
#[proc_macro_derive(Injectable, attributes(inject, injectable))]
pub fn derive_injectable(input: TokenStream) -> TokenStream {
    injectable::derive_injectable_impl(input)
}
