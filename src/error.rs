use thiserror::Error;

use crate::NativeSizeError;

/// The reasons a type's layout cannot be resolved.
///
/// Resolution errors are cached along with successful results, so a type that
/// fails to resolve fails the same way on every call.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutError {
    /// A reference was reached while summing fields.
    ///
    /// References point at data of arbitrary size, so a type containing one has
    /// no fixed layout.
    #[error("`{type_name}` is a reference; only value types have a fixed size")]
    ReferenceType {
        /// The reference type encountered.
        type_name: &'static str,
    },

    /// A scalar type reported no native size, leaving nothing to sum.
    #[error("`{type_name}` has no fields and no native size: {reason}")]
    NoNativeSize {
        /// The scalar type.
        type_name: &'static str,
        /// Why its native query failed.
        reason: NativeSizeError,
    },

    /// The size of the type does not fit in a `usize`.
    ///
    /// No real type reaches this, since the compiler rejects types that large;
    /// only hand-written descriptors can.
    #[error("the size of `{type_name}` overflows `usize`")]
    Overflow {
        /// The type whose size overflowed.
        type_name: &'static str,
    },

    /// Fields were nested more deeply than the configured limit.
    #[error("resolving `{type_name}` exceeded the nesting limit of {limit}")]
    RecursionLimit {
        /// The type at which the limit was hit.
        type_name: &'static str,
        /// The configured limit.
        limit: usize,
    },
}
