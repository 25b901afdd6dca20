//! Most of the implementations of `Describe` and `ValueType` for known types
//! are done here.

use core::marker::PhantomData;
use core::num::{
    NonZeroI128, NonZeroI16, NonZeroI32, NonZeroI64, NonZeroI8, NonZeroIsize, NonZeroU128,
    NonZeroU16, NonZeroU32, NonZeroU64, NonZeroU8, NonZeroUsize, Wrapping,
};
use core::ptr::NonNull;

#[cfg(test)]
use core::mem::size_of;

use crate::{native, Describe, FieldDescriptor, InlineArray, TypeKind, ValueType};

/// Implements `Describe` and `ValueType` for types whose native layout is
/// fixed by the language.
macro_rules! impl_value_type {
    (@impl $ty:ty, $kind:ident) => {
        impl Describe for $ty {
            const KIND: TypeKind = TypeKind::$kind;
            fn native_size() -> Result<usize, crate::NativeSizeError> {
                native::primitive::<Self>()
            }
            fn only_derive_is_allowed_to_implement_this_trait() {}
        }
        impl ValueType for $ty {}
    };
    // For all `$tyvar: ?Sized`, implement for `$ty` of kind `$kind`.
    ($tyvar:ident: ?Sized => $kind:ident for $ty:ty) => {
        impl<$tyvar: ?Sized + 'static> Describe for $ty {
            const KIND: TypeKind = TypeKind::$kind;
            fn native_size() -> Result<usize, crate::NativeSizeError> {
                native::primitive::<Self>()
            }
            fn only_derive_is_allowed_to_implement_this_trait() {}
        }
        impl<$tyvar: ?Sized + 'static> ValueType for $ty {}
    };
    // Implement for each `$ty`, all of kind `$kind`.
    ($kind:ident: $($ty:ty),* $(,)?) => {
        $( impl_value_type!(@impl $ty, $kind); )*
    };
}

/// Uses `size_of` to confirm that a type or set of types have the expected
/// native size.
macro_rules! assert_native_size {
    ($($ty:ty => $size:expr),* $(,)?) => {
        // `static_assertions` is a dev-dependency only.
        $(
            #[cfg(test)]
            static_assertions::const_assert_eq!(size_of::<$ty>(), $size);
        )*
    };
}

impl_value_type!(Bool: bool);
impl_value_type!(Primitive: u8, i8, u16, i16, u32, i32, u64, i64, u128, i128, f32, f64, char);
impl_value_type!(PointerSized: usize, isize);
assert_native_size!(bool => 1, u8 => 1, i16 => 2, u32 => 4, f32 => 4, char => 4, f64 => 8);

// `NonZeroXxx` and `Option<NonZeroXxx>` have the same layout as their
// associated primitive.
impl_value_type!(
    Primitive: NonZeroU8,
    NonZeroI8,
    NonZeroU16,
    NonZeroI16,
    NonZeroU32,
    NonZeroI32,
    NonZeroU64,
    NonZeroI64,
    NonZeroU128,
    NonZeroI128,
    Option<NonZeroU8>,
    Option<NonZeroI8>,
    Option<NonZeroU16>,
    Option<NonZeroI16>,
    Option<NonZeroU32>,
    Option<NonZeroI32>,
    Option<NonZeroU64>,
    Option<NonZeroI64>,
    Option<NonZeroU128>,
    Option<NonZeroI128>,
);
impl_value_type!(
    PointerSized: NonZeroUsize,
    NonZeroIsize,
    Option<NonZeroUsize>,
    Option<NonZeroIsize>,
);
assert_native_size!(Option<NonZeroU16> => 2, Option<NonZeroU64> => 8);

// Raw pointers are treated like the native pointer-sized integer: always safe
// to reinterpret.
impl_value_type!(T: ?Sized => PointerSized for *const T);
impl_value_type!(T: ?Sized => PointerSized for *mut T);
impl_value_type!(T: ?Sized => PointerSized for NonNull<T>);
impl_value_type!(T: ?Sized => PointerSized for Option<NonNull<T>>);
assert_native_size!(
    *const u8 => size_of::<usize>(),
    Option<NonNull<u8>> => size_of::<usize>(),
);

// `()` and `PhantomData` are structs without fields.
impl_value_type!(Composite: ());
impl_value_type!(T: ?Sized => Composite for PhantomData<T>);
assert_native_size!(() => 0, PhantomData<u64> => 0);

// `Wrapping<T>` is `#[repr(transparent)]` over its single public field.
impl<T: Describe> Describe for Wrapping<T> {
    const KIND: TypeKind = TypeKind::Composite;
    const FIELDS: &'static [FieldDescriptor] = &[FieldDescriptor::new::<T>("0")];
    fn native_size() -> Result<usize, crate::NativeSizeError> {
        native::c_layout::<Self>()
    }
    fn only_derive_is_allowed_to_implement_this_trait() {}
}
impl<T: ValueType> ValueType for Wrapping<T> {}

// Per the reference, an array `[T; N]` has a size of `size_of::<T>() * N`,
// with elements laid out back-to-back.
impl<T: Describe, const N: usize> Describe for [T; N] {
    const KIND: TypeKind = TypeKind::InlineArray(InlineArray::new::<T>(N));
    fn native_size() -> Result<usize, crate::NativeSizeError> {
        native::array::<Self, T>()
    }
    fn only_derive_is_allowed_to_implement_this_trait() {}
}
impl<T: ValueType, const N: usize> ValueType for [T; N] {}
assert_native_size!([u8; 16] => 16, [u32; 4] => 16, [(); 8] => 0);

// References describe fields but are never value types.
impl<T: ?Sized + 'static> Describe for &'static T {
    const KIND: TypeKind = TypeKind::Reference;
    fn native_size() -> Result<usize, crate::NativeSizeError> {
        native::reference()
    }
    fn only_derive_is_allowed_to_implement_this_trait() {}
}
impl<T: ?Sized + 'static> Describe for &'static mut T {
    const KIND: TypeKind = TypeKind::Reference;
    fn native_size() -> Result<usize, crate::NativeSizeError> {
        native::reference()
    }
    fn only_derive_is_allowed_to_implement_this_trait() {}
}
