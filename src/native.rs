//! Native layout queries.
//!
//! Every [`Describe`] impl answers [`Describe::native_size`] with one of the
//! functions in this module. A native size is only reported when the
//! in-memory layout of a type is guaranteed to be the layout native code sees;
//! otherwise the query fails and the resolver falls back to summing fields.

use core::mem::size_of;

use thiserror::Error;

use crate::Describe;

/// Why a type has no authoritative native size.
///
/// None of these are surfaced to callers of [`SizeCache`](crate::SizeCache);
/// they are recorded in the `trace` log when the resolver falls back to manual
/// summation, and in [`LayoutError::NoNativeSize`](crate::LayoutError).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeSizeError {
    /// The type uses the default Rust representation, whose field order and
    /// padding are unspecified.
    #[error("the type has no C-compatible representation")]
    UnspecifiedLayout,

    /// A field carries an explicit marshal annotation, so the marshaled layout
    /// differs from the in-memory one.
    #[error("a field carries an explicit marshal annotation")]
    MarshaledField,

    /// A field is a reference.
    #[error("a field is a reference")]
    ReferenceField,

    /// The type itself is a reference.
    #[error("the type is a reference")]
    ReferenceType,
}

/// The native size of a type whose layout is fixed by the language.
///
/// Used for primitives, raw pointers, fieldless enums with an integer
/// representation, and zero-sized markers.
pub fn primitive<T>() -> Result<usize, NativeSizeError> {
    Ok(size_of::<T>())
}

/// The native size of a `#[repr(C)]` or `#[repr(transparent)]` struct.
///
/// Fails if any field carries a marshal annotation, is a reference, or itself
/// lacks a native size.
pub fn c_layout<T: Describe>() -> Result<usize, NativeSizeError> {
    for field in T::FIELDS {
        if field.has_explicit_marshal_attribute() {
            return Err(NativeSizeError::MarshaledField);
        }
        let ty = field.field_type();
        if ty.kind().is_reference() {
            return Err(NativeSizeError::ReferenceField);
        }
        ty.native_size()?;
    }
    Ok(size_of::<T>())
}

/// The native size of an array `T` of `E`: present when `E` has one.
pub fn array<T, E: Describe>() -> Result<usize, NativeSizeError> {
    E::native_size()?;
    Ok(size_of::<T>())
}

/// The native query of a struct with the default Rust representation.
pub fn unspecified_layout() -> Result<usize, NativeSizeError> {
    Err(NativeSizeError::UnspecifiedLayout)
}

/// The native query of a reference type.
pub fn reference() -> Result<usize, NativeSizeError> {
    Err(NativeSizeError::ReferenceType)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ValueType;

    #[derive(ValueType, Clone, Copy)]
    #[repr(C)]
    struct Plain {
        a: u32,
        b: u8,
    }

    #[derive(ValueType, Clone, Copy)]
    #[repr(C)]
    struct Annotated {
        #[marshal(Bool)]
        a: u32,
    }

    #[derive(ValueType, Clone, Copy)]
    struct Loose {
        a: u32,
    }

    #[derive(ValueType, Clone, Copy)]
    #[repr(C)]
    struct HoldsLoose {
        inner: Loose,
    }

    #[derive(ValueType, Clone, Copy)]
    #[repr(C)]
    struct HoldsRef {
        name: &'static str,
    }

    #[test]
    fn test_native_queries() {
        assert_eq!(primitive::<u64>(), Ok(8));
        assert_eq!(c_layout::<Plain>(), Ok(8));
        assert_eq!(c_layout::<Annotated>(), Err(NativeSizeError::MarshaledField));
        assert_eq!(c_layout::<HoldsLoose>(), Err(NativeSizeError::UnspecifiedLayout));
        assert_eq!(c_layout::<HoldsRef>(), Err(NativeSizeError::ReferenceField));
        assert_eq!(array::<[Plain; 2], Plain>(), Ok(16));
        assert_eq!(array::<[Loose; 2], Loose>(), Err(NativeSizeError::UnspecifiedLayout));
        assert_eq!(reference(), Err(NativeSizeError::ReferenceType));
    }
}
