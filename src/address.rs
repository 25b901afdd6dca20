//! Raw addresses of values.
//!
//! These are the accessors behind [`SizeCache::get_address`]; each is
//! monomorphized per value type, so no accessor has to be built at runtime.
//!
//! [`SizeCache::get_address`]: crate::SizeCache::get_address

use core::ffi::c_void;

use crate::ValueType;

/// Returns the address of `value`.
///
/// The returned pointer aliases the caller's storage; nothing is copied. It is
/// valid for as long as the borrow it came from, and only for reads.
#[inline(always)]
pub fn get_address<T: ValueType>(value: &T) -> *const c_void {
    let ptr: *const T = value;
    ptr.cast()
}

/// Returns the address of `value`, valid for writes.
///
/// Writes through the returned pointer are observed through `value` once the
/// pointer is no longer used. The caller is responsible for writing only valid
/// bytes for `T`.
#[inline(always)]
pub fn get_address_mut<T: ValueType>(value: &mut T) -> *mut c_void {
    let ptr: *mut T = value;
    ptr.cast()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_aliases_value() {
        let mut x = 0x1234_5678u32;
        assert_eq!(get_address(&x), <*const _>::cast::<c_void>(&x));

        let ptr = get_address_mut(&mut x).cast::<u32>();
        // SAFETY: `ptr` was derived from `&mut x` and is used before `x` is
        // read again.
        unsafe { ptr.write(7) };
        assert_eq!(x, 7);
    }

    #[test]
    fn test_address_of_array_element() {
        let arr = [1u16, 2, 3];
        let base = get_address(&arr).cast::<u8>();
        let second = get_address(&arr[1]).cast::<u8>();
        assert_eq!(second.wrapping_sub(2), base);
    }
}
