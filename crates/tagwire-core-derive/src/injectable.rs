//! Injectable derive macro implementation
//!
//! Generates the `Reflect` and `Record` implementations that let the container
//! classify a struct as a record, enumerate its fields and view it through the
//! contracts it declares.

use proc_macro::TokenStream;
use proc_macro2::Ident;
use quote::quote;
use syn::{
    parse::{Parse, Result},
    parse_macro_input, Attribute, Data, DeriveInput, Error, Fields, GenericArgument,
    PathArguments, Token, Type, Visibility,
};

/// Main implementation function for the Injectable derive
pub fn derive_injectable_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match expand(&input) {
        Ok(result) => result.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// Field information extracted from the struct definition
#[derive(Debug, Clone)]
struct FieldInfo {
    ident: Ident,
    /// Declared with `#[inject]`
    tagged: bool,
    /// Visible outside the struct
    exported: bool,
    /// Typed as `Inject<T>`
    slot: bool,
}

fn expand(input: &DeriveInput) -> Result<proc_macro2::TokenStream> {
    let fields = extract_fields(input)?;
    let contracts = extract_contracts(&input.attrs)?;

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let field_descriptors = fields.iter().map(|field| {
        let ident = &field.ident;
        let label = ident.to_string().trim_start_matches("r#").to_string();
        let tagged = field.tagged;
        let exported = field.exported;

        if field.slot {
            quote! {
                ::tagwire_core::reflect::Field::slot(#label, &self.#ident, #tagged, #exported)
            }
        } else {
            quote! {
                ::tagwire_core::reflect::Field::plain(#label, #tagged, #exported)
            }
        }
    });

    Ok(quote! {
        impl #impl_generics ::tagwire_core::reflect::Reflect for #name #ty_generics #where_clause {
            fn type_of() -> ::tagwire_core::reflect::Type {
                ::tagwire_core::reflect::Type::record::<Self>()
            }

            fn implementations() -> ::std::vec::Vec<::tagwire_core::reflect::Implementation> {
                ::std::vec![
                    #(
                        ::tagwire_core::reflect::Implementation::new::<Self, #contracts>(
                            |this| this as ::std::sync::Arc<#contracts>
                        )
                    ),*
                ]
            }

            fn as_record(
                this: &::std::sync::Arc<Self>,
            ) -> ::std::option::Option<::std::sync::Arc<dyn ::tagwire_core::reflect::Record>> {
                ::std::option::Option::Some(
                    ::std::sync::Arc::clone(this)
                        as ::std::sync::Arc<dyn ::tagwire_core::reflect::Record>,
                )
            }
        }

        impl #impl_generics ::tagwire_core::reflect::Record for #name #ty_generics #where_clause {
            fn fields(&self) -> ::std::vec::Vec<::tagwire_core::reflect::Field<'_>> {
                ::std::vec![#(#field_descriptors),*]
            }
        }
    })
}

/// Extract field information from a struct with named fields (or none)
fn extract_fields(input: &DeriveInput) -> Result<Vec<FieldInfo>> {
    let data = match &input.data {
        Data::Struct(data) => data,
        _ => {
            return Err(Error::new_spanned(
                &input.ident,
                "#[derive(Injectable)] can only be applied to structs",
            ))
        }
    };

    match &data.fields {
        Fields::Named(fields) => {
            let mut infos = Vec::new();
            for field in &fields.named {
                let Some(ident) = field.ident.clone() else {
                    continue;
                };
                let tagged = field.attrs.iter().any(|attr| attr.path().is_ident("inject"));
                if tagged && is_shared_type(&field.ty) {
                    return Err(Error::new_spanned(
                        &field.ty,
                        "use Inject<T> for #[inject] fields",
                    ));
                }

                infos.push(FieldInfo {
                    ident,
                    tagged,
                    exported: !matches!(field.vis, Visibility::Inherited),
                    slot: is_slot_type(&field.ty),
                });
            }
            Ok(infos)
        }
        Fields::Unit => Ok(Vec::new()),
        Fields::Unnamed(_) => Err(Error::new_spanned(
            &input.ident,
            "#[derive(Injectable)] requires structs with named fields",
        )),
    }
}

/// Check if a field type is `Inject<T>`, however the path is spelled
fn is_slot_type(ty: &Type) -> bool {
    match ty {
        Type::Path(type_path) => type_path
            .path
            .segments
            .last()
            .map(|segment| segment.ident == "Inject")
            .unwrap_or(false),
        _ => false,
    }
}

/// Check if a field type is `Arc<T>` or `Option<Arc<T>>`, which the container
/// cannot write through a shared record
fn is_shared_type(ty: &Type) -> bool {
    let Type::Path(type_path) = ty else {
        return false;
    };
    let Some(segment) = type_path.path.segments.last() else {
        return false;
    };

    if segment.ident == "Arc" {
        return true;
    }
    if segment.ident != "Option" {
        return false;
    }

    match &segment.arguments {
        PathArguments::AngleBracketed(args) => match args.args.first() {
            Some(GenericArgument::Type(inner)) => is_shared_type(inner),
            _ => false,
        },
        _ => false,
    }
}

/// Collect the contracts listed in `#[injectable(implements(...))]`
fn extract_contracts(attrs: &[Attribute]) -> Result<Vec<Type>> {
    let mut contracts = Vec::new();

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("injectable")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("implements") {
                let content;
                syn::parenthesized!(content in meta.input);
                let types = content.parse_terminated(Type::parse, Token![,])?;
                contracts.extend(types);
                Ok(())
            } else {
                Err(meta.error("unsupported injectable attribute, expected `implements(...)`"))
            }
        })?;
    }

    Ok(contracts)
}
