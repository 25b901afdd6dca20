/// How far the marshal check looks into a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MarshalScan {
    /// Look only at the first field at each level.
    ///
    /// An annotated first field answers `true`. A nested struct or array of
    /// structs is inspected recursively and its answer returned. Any other
    /// first field, pointer-sized ones included, answers `false`. Annotations
    /// on later fields are not seen.
    #[default]
    FirstField,
    /// Inspect every field of every nested struct.
    Exhaustive,
}

/// Configuration of a [`LayoutCache`](crate::LayoutCache).
///
/// ```rust
/// use sizecache::{LayoutCache, MarshalScan, ResolveOptions};
///
/// let cache = LayoutCache::with_options(
///     ResolveOptions::new().with_marshal_scan(MarshalScan::Exhaustive).with_max_depth(16),
/// );
/// assert_eq!(cache.options().max_depth(), 16);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResolveOptions {
    marshal_scan: MarshalScan,
    max_depth: usize,
}

impl ResolveOptions {
    /// The nesting limit used unless configured otherwise.
    pub const DEFAULT_MAX_DEPTH: usize = 64;

    /// The default options: [`MarshalScan::FirstField`] and
    /// [`DEFAULT_MAX_DEPTH`](ResolveOptions::DEFAULT_MAX_DEPTH).
    pub const fn new() -> ResolveOptions {
        ResolveOptions { marshal_scan: MarshalScan::FirstField, max_depth: Self::DEFAULT_MAX_DEPTH }
    }

    /// Sets how the marshal check walks fields.
    #[must_use]
    pub const fn with_marshal_scan(self, marshal_scan: MarshalScan) -> ResolveOptions {
        ResolveOptions { marshal_scan, ..self }
    }

    /// Sets how many levels of nested types resolution may descend through
    /// before failing with [`LayoutError::RecursionLimit`](crate::LayoutError).
    #[must_use]
    pub const fn with_max_depth(self, max_depth: usize) -> ResolveOptions {
        ResolveOptions { max_depth, ..self }
    }

    /// How the marshal check walks fields.
    pub const fn marshal_scan(&self) -> MarshalScan {
        self.marshal_scan
    }

    /// The nesting limit.
    pub const fn max_depth(&self) -> usize {
        self.max_depth
    }
}

impl Default for ResolveOptions {
    fn default() -> ResolveOptions {
        ResolveOptions::new()
    }
}
