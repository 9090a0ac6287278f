// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! This crate provides procedural macros for `wiring`.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::spanned::Spanned;
use syn::{
    parse_macro_input, Data, DeriveInput, Field, Fields, GenericArgument, Path, PathArguments, Type,
};

/// A derive macro that turns a struct into a discoverable component.
///
/// It implements `wiring::Injectable` and submits a `wiring::Registration`
/// so that a scan of the struct's module finds it.
///
/// * Every field must be an `Arc<T>`; it becomes a dependency on `T`, in
///   field order.
/// * A field marked `#[component(default)]` is filled with
///   `Default::default()` instead and is not a dependency.
/// * `#[component(marker = path::ToMarker)]` on the struct picks the marker
///   (`wiring::Component` otherwise).
#[proc_macro_derive(Component, attributes(component))]
pub fn derive_component(input: TokenStream) -> TokenStream {
    // Parse the input tokens into a syntax tree.
    let input = parse_macro_input!(input as DeriveInput);

    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;

    // Registrations are statics, so the type must be concrete.
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new(
            input.generics.span(),
            "generic structs cannot be components",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => &data.fields,
        _ => {
            return Err(syn::Error::new(
                name.span(),
                "only structs can derive `Component`",
            ))
        }
    };

    let marker = marker_of(input)?;

    let mut dependencies = Vec::new();
    let mut values = Vec::new();
    for field in fields.iter() {
        if is_default(field)? {
            values.push(quote! { ::core::default::Default::default() });
            continue;
        }
        let dependency = arc_target(&field.ty).ok_or_else(|| {
            syn::Error::new(
                field.ty.span(),
                "component fields must be `Arc<T>` or marked `#[component(default)]`",
            )
        })?;
        dependencies.push(quote! { ::wiring::TypeKey::of::<#dependency>() });
        values.push(quote! { deps.take::<#dependency>()? });
    }

    let body = match fields {
        Fields::Named(named) => {
            let idents = named.named.iter().map(|field| &field.ident);
            quote! { Self { #(#idents: #values),* } }
        }
        Fields::Unnamed(_) => quote! { Self(#(#values),*) },
        Fields::Unit => quote! { Self },
    };

    Ok(quote! {
        impl ::wiring::Injectable for #name {
            fn dependencies() -> ::std::vec::Vec<::wiring::TypeKey> {
                ::std::vec![#(#dependencies),*]
            }

            #[allow(unused_variables)]
            fn construct(
                deps: &mut ::wiring::Dependencies<'_>,
            ) -> ::core::result::Result<Self, ::wiring::BoxError> {
                ::core::result::Result::Ok(#body)
            }
        }

        ::wiring::inventory::submit! {
            ::wiring::Registration::new::<#name, #marker>(::core::module_path!())
        }
    })
}

/// Reads `#[component(marker = ...)]` from the struct attributes.
fn marker_of(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let mut marker: Option<Path> = None;
    for attr in &input.attrs {
        if !attr.path().is_ident("component") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("marker") {
                marker = Some(meta.value()?.parse()?);
                Ok(())
            } else {
                Err(meta.error("expected `marker = <type>`"))
            }
        })?;
    }

    Ok(match marker {
        Some(path) => quote! { #path },
        None => quote! { ::wiring::Component },
    })
}

/// Returns `true` for fields marked `#[component(default)]`.
fn is_default(field: &Field) -> syn::Result<bool> {
    let mut default = false;
    for attr in &field.attrs {
        if !attr.path().is_ident("component") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("default") {
                default = true;
                Ok(())
            } else {
                Err(meta.error("expected `default`"))
            }
        })?;
    }
    Ok(default)
}

/// Extracts `T` from `Arc<T>` (under any path ending in `Arc`).
fn arc_target(ty: &Type) -> Option<&Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    if type_path.qself.is_some() {
        return None;
    }
    let segment = type_path.path.segments.last()?;
    if segment.ident != "Arc" {
        return None;
    }
    let PathArguments::AngleBracketed(arguments) = &segment.arguments else {
        return None;
    };
    match arguments.args.first() {
        Some(GenericArgument::Type(inner)) if arguments.args.len() == 1 => Some(inner),
        _ => None,
    }
}
