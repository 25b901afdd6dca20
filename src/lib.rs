// Copyright 2018 The Fuchsia Authors. All rights reserved.
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

// After updating the following doc comment, update `README.md` to match.

//! Lazily-resolved layout facts for plain value types.
//!
//! For any [`ValueType`] `T`, this crate answers three questions, each computed
//! once per type and cached for the lifetime of the process:
//! - how many bytes `T` occupies ([`SizeCache::size`])
//! - whether any of `T`'s fields carries an explicit interop marshaling rule,
//!   meaning a `T` cannot simply be reinterpreted as its native counterpart
//!   ([`SizeCache::requires_marshal`])
//! - the raw address of a `T` without copying it ([`SizeCache::get_address`])
//!
//! Type information comes from the [`Describe`] trait, which is implemented
//! for primitives, arrays and a handful of `core` wrappers in this crate, and
//! which can be derived for your own types with `#[derive(ValueType)]`:
//!
//! ```rust
//! use sizecache::{SizeCache, ValueType};
//!
//! #[derive(ValueType, Clone, Copy)]
//! struct Header {
//!     magic: u32,
//!     version: u16,
//!     #[marshal(ByValTStr { len: 8 })]
//!     tag: [u8; 8],
//! }
//!
//! assert_eq!(SizeCache::<Header>::size(), 14);
//! // Only the first field path is inspected; see "Marshaling" below.
//! assert!(!SizeCache::<Header>::requires_marshal());
//! ```
//!
//! # Sizes
//!
//! Resolution follows these rules, in order:
//! 1. `bool` is always 1 byte.
//! 2. An enum resolves to its underlying integer type.
//! 3. If the type has a native layout (a primitive, a `#[repr(C)]` or
//!    `#[repr(transparent)]` struct whose fields are all plain value types, or
//!    an array of such), its `size_of` is used.
//! 4. Otherwise the sizes of the fields are summed. Fixed-size inline arrays
//!    contribute `element size * length`.
//!
//! Note that the summation in step 4 does not insert padding. A
//! `struct { a: i32, b: i32, c: bool }` without `#[repr(C)]` resolves to 9
//! bytes; the same struct with `#[repr(C)]` resolves to 12.
//!
//! # Marshaling
//!
//! By default the marshal check follows the first field path of a type. An
//! annotated first field answers `true` and a nested struct is inspected
//! recursively. Any other first field answers `false`, including a
//! pointer-sized one. Annotations on later fields are therefore not seen. Use
//! [`MarshalScan::Exhaustive`] with a dedicated [`LayoutCache`] to inspect
//! every field.
//!
//! # Logging
//!
//! Resolution is reported through the [`log`] facade at `debug` level, and
//! native-layout fallbacks at `trace` level.

// Sometimes we want to use lints which were added after our MSRV.
// `unknown_lints` is `warn` by default and we deny warnings in CI, so without
// this attribute, any unknown lint would cause a CI failure when testing with
// our MSRV.
#![allow(unknown_lints)]
#![deny(renamed_and_removed_lints)]
#![deny(
    anonymous_parameters,
    deprecated_in_future,
    late_bound_lifetime_arguments,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    path_statements,
    patterns_in_fns_without_body,
    rust_2018_idioms,
    trivial_numeric_casts,
    unreachable_pub,
    unsafe_op_in_unsafe_fn,
    unused_extern_crates,
    unused_qualifications,
    variant_size_differences
)]
#![deny(
    clippy::all,
    clippy::alloc_instead_of_core,
    clippy::arithmetic_side_effects,
    clippy::as_underscore,
    clippy::assertions_on_result_states,
    clippy::as_conversions,
    clippy::correctness,
    clippy::dbg_macro,
    clippy::decimal_literal_representation,
    clippy::get_unwrap,
    clippy::indexing_slicing,
    clippy::obfuscated_if_else,
    clippy::perf,
    clippy::print_stdout,
    clippy::std_instead_of_core,
    clippy::style,
    clippy::suspicious,
    clippy::todo,
    clippy::undocumented_unsafe_blocks,
    clippy::unimplemented,
    clippy::unnested_or_patterns,
    clippy::unwrap_used,
    clippy::use_debug
)]
#![deny(
    rustdoc::bare_urls,
    rustdoc::broken_intra_doc_links,
    rustdoc::invalid_codeblock_attributes,
    rustdoc::invalid_html_tags,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::missing_crate_level_docs,
    rustdoc::private_intra_doc_links
)]
// In test code, it makes sense to weight more heavily towards concise, readable
// code over correct or debuggable code.
#![cfg_attr(test, allow(
    // In tests, you get line numbers and have access to source code, so panic
    // messages are less important. You also often unwrap a lot, which would
    // make expect'ing instead very verbose.
    clippy::unwrap_used,
    // In tests, there's no harm to "panic risks" - the worst that can happen is
    // that your test will fail, and you'll fix it. By contrast, panic risks in
    // production code introduce the possibly of code panicking unexpectedly "in
    // the field".
    clippy::arithmetic_side_effects,
    clippy::indexing_slicing,
))]

mod address;
mod cache;
mod descriptor;
mod error;
mod impls;
pub mod native;
mod options;
mod resolve;

pub use address::{get_address, get_address_mut};
pub use cache::{requires_marshal, size_of, LayoutCache, LayoutEntry, SizeCache};
pub use descriptor::{
    Describe, DescriptorFn, FieldDescriptor, InlineArray, MarshalAs, TypeDescriptor, TypeKind,
    ValueType,
};
pub use error::LayoutError;
pub use native::NativeSizeError;
pub use options::{MarshalScan, ResolveOptions};
pub use sizecache_derive::*;

// This allows `#[derive(ValueType)]` to work in this crate, since the derive
// references the name `sizecache`.
#[cfg(test)]
extern crate self as sizecache;
