// Copyright 2019 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Derive macro for [sizecache]'s traits.
//!
//! [sizecache]: https://docs.rs/sizecache

#![deny(missing_docs, rust_2018_idioms, unreachable_pub)]
#![deny(clippy::all, clippy::unwrap_used)]

mod repr;

use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::{
    ext::IdentExt, parse_macro_input, parse_quote, Attribute, Data, DataEnum, DataStruct,
    DeriveInput, Error, Expr, Fields, Generics, TypeParamBound,
};

use crate::repr::Repr;

/// Implements `Describe` and `ValueType` for a struct or a fieldless enum.
///
/// Structs are described field by field, in declaration order. A field may
/// carry a `#[marshal(...)]` attribute naming a `MarshalAs` variant:
///
/// ```rust,ignore
/// #[derive(ValueType, Clone, Copy)]
/// #[repr(C)]
/// struct Point {
///     #[marshal(I4)]
///     x: u32,
///     y: u32,
/// }
/// ```
///
/// Only `#[repr(C)]` and `#[repr(transparent)]` structs have a native size;
/// the size of any other struct is the sum of its fields.
///
/// Enums must be fieldless and carry an integer representation such as
/// `#[repr(u8)]`; they resolve as that integer type.
#[proc_macro_derive(ValueType, attributes(marshal))]
pub fn derive_value_type(ts: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let ast = parse_macro_input!(ts as DeriveInput);
    let res = match &ast.data {
        Data::Struct(strct) => derive_value_type_struct(&ast, strct),
        Data::Enum(enm) => derive_value_type_enum(&ast, enm),
        Data::Union(_) => Err(Error::new(
            Span::call_site(),
            "unsupported on unions; overlapping fields have no single layout",
        )),
    };
    res.unwrap_or_else(Error::into_compile_error).into()
}

fn derive_value_type_struct(ast: &DeriveInput, strct: &DataStruct) -> Result<TokenStream, Error> {
    let reprs = repr::reprs(&ast.attrs)?;
    let native = if reprs.iter().any(Repr::is_c_compatible) {
        quote!(::sizecache::native::c_layout::<Self>())
    } else {
        quote!(::sizecache::native::unspecified_layout())
    };

    let fields = strct
        .fields
        .iter()
        .enumerate()
        .map(|(index, field)| {
            let name = match &field.ident {
                Some(ident) => ident.unraw().to_string(),
                None => index.to_string(),
            };
            let ty = &field.ty;
            let desc = quote!(::sizecache::FieldDescriptor::new::<#ty>(#name));
            Ok(match marshal_attr(&field.attrs)? {
                Some(marshal) => quote!(#desc.with_marshal(#marshal)),
                None => desc,
            })
        })
        .collect::<Result<Vec<_>, Error>>()?;

    let fields = quote! {
        const FIELDS: &'static [::sizecache::FieldDescriptor] = &[#(#fields),*];
    };
    Ok(impl_traits(ast, quote!(::sizecache::TypeKind::Composite), fields, native))
}

fn derive_value_type_enum(ast: &DeriveInput, enm: &DataEnum) -> Result<TokenStream, Error> {
    if let Some(variant) = enm.variants.iter().find(|v| !matches!(v.fields, Fields::Unit)) {
        return Err(Error::new_spanned(variant, "only fieldless enums are value types"));
    }
    let reprs = repr::reprs(&ast.attrs)?;
    let int = reprs.iter().find_map(Repr::integer).ok_or_else(|| {
        Error::new(
            Span::call_site(),
            "enums must have an integer representation, such as `#[repr(u32)]`",
        )
    })?;

    let kind = quote! {
        ::sizecache::TypeKind::Enum { underlying: ::sizecache::TypeDescriptor::of::<#int> }
    };
    Ok(impl_traits(ast, kind, TokenStream::new(), quote!(::sizecache::native::primitive::<Self>())))
}

/// Emits the `Describe` and `ValueType` impls, bounding every type parameter
/// by the trait being implemented.
fn impl_traits(
    ast: &DeriveInput,
    kind: TokenStream,
    fields: TokenStream,
    native: TokenStream,
) -> TokenStream {
    let name = &ast.ident;
    let describe_generics = with_bound(&ast.generics, parse_quote!(::sizecache::Describe));
    let value_generics = with_bound(&ast.generics, parse_quote!(::sizecache::ValueType));
    let (impl_generics, ty_generics, where_clause) = describe_generics.split_for_impl();
    let (value_impl_generics, _, value_where_clause) = value_generics.split_for_impl();

    quote! {
        impl #impl_generics ::sizecache::Describe for #name #ty_generics #where_clause {
            const KIND: ::sizecache::TypeKind = #kind;

            #fields

            fn native_size() -> ::core::result::Result<usize, ::sizecache::NativeSizeError> {
                #native
            }

            fn only_derive_is_allowed_to_implement_this_trait() {}
        }

        impl #value_impl_generics ::sizecache::ValueType for #name #ty_generics #value_where_clause {}
    }
}

fn with_bound(generics: &Generics, bound: TypeParamBound) -> Generics {
    let mut generics = generics.clone();
    for param in generics.type_params_mut() {
        param.bounds.push(bound.clone());
    }
    generics
}

/// Parses the `#[marshal(...)]` attribute of a field into a `MarshalAs`
/// expression.
fn marshal_attr(attrs: &[Attribute]) -> Result<Option<TokenStream>, Error> {
    let mut marshal = None;
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("marshal")) {
        if marshal.is_some() {
            return Err(Error::new_spanned(attr, "a field takes at most one `marshal` attribute"));
        }
        let expr: Expr = attr.parse_args()?;
        marshal = Some(marshal_variant(&expr)?);
    }
    Ok(marshal)
}

fn marshal_variant(expr: &Expr) -> Result<TokenStream, Error> {
    match expr {
        Expr::Path(path) if path.path.get_ident().is_some() => {
            let variant = &path.path;
            return Ok(quote!(::sizecache::MarshalAs::#variant));
        }
        Expr::Call(call) => {
            if let Expr::Path(path) = &*call.func {
                if path.path.get_ident().is_some() {
                    let variant = &path.path;
                    let args = &call.args;
                    return Ok(quote!(::sizecache::MarshalAs::#variant(#args)));
                }
            }
        }
        Expr::Struct(strct) if strct.path.get_ident().is_some() => {
            let variant = &strct.path;
            let fields = &strct.fields;
            return Ok(quote!(::sizecache::MarshalAs::#variant { #fields }));
        }
        _ => {}
    }
    Err(Error::new_spanned(
        expr,
        "expected a `MarshalAs` variant, such as `I4` or `ByValArray { len: 8 }`",
    ))
}
