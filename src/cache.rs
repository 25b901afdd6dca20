//! Per-type memoization of resolved layouts.

use core::{
    any::TypeId,
    ffi::c_void,
    fmt::{self, Debug, Formatter},
    marker::PhantomData,
    sync::atomic::{AtomicUsize, Ordering},
};
use std::sync::OnceLock;

use crossbeam_skiplist::SkipMap;
use log::{debug, warn};

use crate::{
    address,
    resolve::{Resolved, Resolver},
    LayoutError, ResolveOptions, TypeDescriptor, ValueType,
};

/// Everything the cache knows about one type.
///
/// Entries are handed out by value; the cached copy is never modified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutEntry {
    ty: TypeDescriptor,
    canonical_type: TypeDescriptor,
    size: usize,
    requires_marshal: bool,
}

impl LayoutEntry {
    fn new(ty: TypeDescriptor, resolved: Resolved) -> LayoutEntry {
        LayoutEntry {
            ty,
            canonical_type: resolved.canonical_type,
            size: resolved.size,
            requires_marshal: resolved.requires_marshal,
        }
    }

    /// The type this entry was resolved for.
    pub fn type_descriptor(&self) -> TypeDescriptor {
        self.ty
    }

    /// The type this entry's facts were computed on: the underlying integer
    /// type for enums, the type itself otherwise.
    pub fn canonical_type(&self) -> TypeDescriptor {
        self.canonical_type
    }

    /// The size of the type in bytes.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether the type's fields carry explicit marshal annotations.
    pub fn requires_marshal(&self) -> bool {
        self.requires_marshal
    }
}

type Slot = OnceLock<Result<LayoutEntry, LayoutError>>;

/// A table of resolved layouts, keyed by type.
///
/// Each type is resolved the first time it is asked for, and never again:
/// when several threads ask for the same new type at once, one of them
/// resolves it while the others wait for and then share its result. Lookups of
/// resolved types take no locks.
///
/// Most code should use the process-wide [`LayoutCache::global`] through
/// [`SizeCache`]. Separate caches are useful for non-default
/// [`ResolveOptions`].
pub struct LayoutCache {
    options: ResolveOptions,
    entries: SkipMap<TypeId, Slot>,
    resolutions: AtomicUsize,
}

impl LayoutCache {
    /// Creates an empty cache with the default options.
    pub fn new() -> LayoutCache {
        LayoutCache::with_options(ResolveOptions::new())
    }

    /// Creates an empty cache with the given options.
    pub fn with_options(options: ResolveOptions) -> LayoutCache {
        LayoutCache { options, entries: SkipMap::new(), resolutions: AtomicUsize::new(0) }
    }

    /// The process-wide cache used by [`SizeCache`] and the free functions of
    /// this crate.
    pub fn global() -> &'static LayoutCache {
        static GLOBAL: OnceLock<LayoutCache> = OnceLock::new();
        GLOBAL.get_or_init(LayoutCache::new)
    }

    /// The options this cache resolves with.
    pub fn options(&self) -> ResolveOptions {
        self.options
    }

    /// Returns the layout of `T`, resolving it if this is the first request.
    pub fn entry<T: ValueType>(&self) -> Result<LayoutEntry, LayoutError> {
        self.entry_for(TypeDescriptor::of::<T>())
    }

    /// Returns the layout of the type described by `ty`, resolving it if this
    /// is the first request.
    ///
    /// Unlike [`entry`](LayoutCache::entry), this accepts descriptors of types
    /// which are not [`ValueType`]s; those fail to resolve.
    pub fn entry_for(&self, ty: TypeDescriptor) -> Result<LayoutEntry, LayoutError> {
        let slot = match self.entries.get(&ty.id()) {
            Some(slot) => slot,
            // If another thread inserts first, its slot is returned and ours
            // is dropped unused.
            None => self.entries.get_or_insert(ty.id(), OnceLock::new()),
        };
        *slot.value().get_or_init(|| self.resolve(ty))
    }

    fn resolve(&self, ty: TypeDescriptor) -> Result<LayoutEntry, LayoutError> {
        self.resolutions.fetch_add(1, Ordering::Relaxed);
        match Resolver::new(self.options).resolve(ty) {
            Ok(resolved) => {
                let entry = LayoutEntry::new(ty, resolved);
                debug!(
                    "resolved `{}`: {} bytes as `{}`, requires marshal: {}",
                    ty,
                    entry.size,
                    entry.canonical_type,
                    entry.requires_marshal
                );
                Ok(entry)
            }
            Err(err) => {
                warn!("cannot resolve layout of `{}`: {}", ty, err);
                Err(err)
            }
        }
    }

    /// Returns true if `T` has already been resolved by this cache.
    pub fn is_resolved<T: ValueType>(&self) -> bool {
        self.entries.get(&TypeId::of::<T>()).is_some_and(|slot| slot.value().get().is_some())
    }

    /// The number of types this cache has resolved, including those which
    /// failed to resolve.
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|slot| slot.value().get().is_some()).count()
    }

    /// Returns true if this cache has not resolved any type yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The number of times this cache has run the resolver.
    ///
    /// Since every type is resolved at most once, this never exceeds the
    /// number of distinct types requested.
    pub fn resolutions(&self) -> usize {
        self.resolutions.load(Ordering::Relaxed)
    }
}

impl Default for LayoutCache {
    fn default() -> LayoutCache {
        LayoutCache::new()
    }
}

impl Debug for LayoutCache {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutCache")
            .field("options", &self.options)
            .field("entries", &self.len())
            .field("resolutions", &self.resolutions())
            .finish()
    }
}

/// Cached layout facts for the value type `T`, resolved through
/// [`LayoutCache::global`].
///
/// `SizeCache` is never instantiated; all of its functions are associated
/// functions:
///
/// ```rust
/// use sizecache::{SizeCache, ValueType};
///
/// #[derive(ValueType, Clone, Copy)]
/// #[repr(u32)]
/// enum Mode {
///     Read = 1,
///     Write = 2,
/// }
///
/// assert_eq!(SizeCache::<u64>::size(), 8);
/// assert_eq!(SizeCache::<Mode>::size(), 4);
/// assert!(SizeCache::<Mode>::canonical_type().is::<u32>());
/// ```
#[allow(missing_copy_implementations, missing_debug_implementations)]
pub struct SizeCache<T: ValueType> {
    _marker: PhantomData<fn() -> T>,
}

impl<T: ValueType> SizeCache<T> {
    /// Returns the cached layout entry of `T`.
    pub fn entry() -> Result<LayoutEntry, LayoutError> {
        LayoutCache::global().entry::<T>()
    }

    /// The size of `T` in bytes.
    ///
    /// # Panics
    ///
    /// Panics if `T` cannot be resolved, such as when it contains a reference.
    /// Use [`try_size`](SizeCache::try_size) to handle that case.
    pub fn size() -> usize {
        Self::resolved().size()
    }

    /// The size of `T` in bytes, or why it cannot be resolved.
    pub fn try_size() -> Result<usize, LayoutError> {
        Self::entry().map(|entry| entry.size())
    }

    /// Whether `T`'s fields carry explicit marshal annotations.
    ///
    /// # Panics
    ///
    /// Panics if `T` cannot be resolved. Use
    /// [`try_requires_marshal`](SizeCache::try_requires_marshal) to handle
    /// that case.
    pub fn requires_marshal() -> bool {
        Self::resolved().requires_marshal()
    }

    /// Whether `T`'s fields carry explicit marshal annotations, or why `T`
    /// cannot be resolved.
    pub fn try_requires_marshal() -> Result<bool, LayoutError> {
        Self::entry().map(|entry| entry.requires_marshal())
    }

    /// The type `T`'s layout was resolved as.
    ///
    /// # Panics
    ///
    /// Panics if `T` cannot be resolved.
    pub fn canonical_type() -> TypeDescriptor {
        Self::resolved().canonical_type()
    }

    /// Returns the address of `value` without copying it.
    pub fn get_address(value: &T) -> *const c_void {
        address::get_address(value)
    }

    /// Returns the address of `value` without copying it, for writing.
    pub fn get_address_mut(value: &mut T) -> *mut c_void {
        address::get_address_mut(value)
    }

    /// The address accessor specialized for `T`.
    pub fn address_accessor() -> fn(&T) -> *const c_void {
        address::get_address::<T>
    }

    fn resolved() -> LayoutEntry {
        match Self::entry() {
            Ok(entry) => entry,
            Err(err) => panic!("{}", err),
        }
    }
}

/// The size of `T` in bytes, from the global cache.
pub fn size_of<T: ValueType>() -> Result<usize, LayoutError> {
    SizeCache::<T>::try_size()
}

/// Whether `T`'s fields carry explicit marshal annotations, from the global
/// cache.
pub fn requires_marshal<T: ValueType>() -> Result<bool, LayoutError> {
    SizeCache::<T>::try_requires_marshal()
}
