//! The layout resolver.
//!
//! The resolver walks [`TypeDescriptor`]s without caching anything itself;
//! memoization is the job of [`LayoutCache`](crate::LayoutCache), which runs
//! it at most once per type.

use log::trace;

use crate::{
    InlineArray, LayoutError, MarshalScan, NativeSizeError, ResolveOptions, TypeDescriptor,
    TypeKind,
};

/// The facts resolved for one type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Resolved {
    pub(crate) canonical_type: TypeDescriptor,
    pub(crate) size: usize,
    pub(crate) requires_marshal: bool,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Resolver {
    options: ResolveOptions,
}

impl Resolver {
    pub(crate) const fn new(options: ResolveOptions) -> Resolver {
        Resolver { options }
    }

    /// Resolves everything the cache stores about `ty`.
    pub(crate) fn resolve(&self, ty: TypeDescriptor) -> Result<Resolved, LayoutError> {
        let canonical_type = self.canonical(ty, 0)?;
        let size = self.size(ty)?;
        let requires_marshal = self.requires_marshal(canonical_type)?;
        Ok(Resolved { canonical_type, size, requires_marshal })
    }

    /// The type `ty` is resolved as: enums become their underlying integer
    /// type, everything else is itself.
    fn canonical(&self, ty: TypeDescriptor, depth: usize) -> Result<TypeDescriptor, LayoutError> {
        let depth = self.descend(ty, depth)?;
        match ty.kind().underlying() {
            Some(underlying) => self.canonical(underlying, depth),
            None => Ok(ty),
        }
    }

    /// Computes the size of `ty` in bytes.
    pub(crate) fn size(&self, ty: TypeDescriptor) -> Result<usize, LayoutError> {
        self.size_at(ty, 0)
    }

    fn size_at(&self, ty: TypeDescriptor, depth: usize) -> Result<usize, LayoutError> {
        let depth = self.descend(ty, depth)?;
        match ty.kind() {
            TypeKind::Bool => return Ok(1),
            TypeKind::Enum { underlying } => return self.size_at(underlying(), depth),
            _ => {}
        }
        match ty.native_size() {
            Ok(size) => Ok(size),
            Err(reason) => {
                trace!("no native layout for `{}` ({}); summing fields", ty, reason);
                self.manual_size(ty, reason, depth)
            }
        }
    }

    fn manual_size(
        &self,
        ty: TypeDescriptor,
        reason: NativeSizeError,
        depth: usize,
    ) -> Result<usize, LayoutError> {
        match ty.kind() {
            TypeKind::Composite => ty.fields().iter().try_fold(0usize, |total, field| {
                let size = match field.inline_array() {
                    Some(array) => self.array_size(ty, array, depth)?,
                    None => self.size_at(field.field_type(), depth)?,
                };
                total.checked_add(size).ok_or(LayoutError::Overflow { type_name: ty.name() })
            }),
            TypeKind::InlineArray(array) => self.array_size(ty, array, depth),
            TypeKind::Reference => Err(LayoutError::ReferenceType { type_name: ty.name() }),
            TypeKind::Bool | TypeKind::Primitive | TypeKind::PointerSized | TypeKind::Enum { .. } => {
                Err(LayoutError::NoNativeSize { type_name: ty.name(), reason })
            }
        }
    }

    fn array_size(
        &self,
        owner: TypeDescriptor,
        array: InlineArray,
        depth: usize,
    ) -> Result<usize, LayoutError> {
        self.size_at(array.element(), depth)?
            .checked_mul(array.len())
            .ok_or(LayoutError::Overflow { type_name: owner.name() })
    }

    /// Determines whether `ty` has fields carrying explicit marshal
    /// annotations, walking them as configured by [`MarshalScan`].
    pub(crate) fn requires_marshal(&self, ty: TypeDescriptor) -> Result<bool, LayoutError> {
        self.marshal_at(ty, 0)
    }

    fn marshal_at(&self, ty: TypeDescriptor, depth: usize) -> Result<bool, LayoutError> {
        let depth = self.descend(ty, depth)?;
        match ty.kind() {
            TypeKind::Enum { underlying } => self.marshal_at(underlying(), depth),
            TypeKind::InlineArray(array) => self.marshal_at(array.element(), depth),
            TypeKind::Composite => match self.options.marshal_scan() {
                MarshalScan::FirstField => self.first_field_marshal(ty, depth),
                MarshalScan::Exhaustive => self.any_field_marshal(ty, depth),
            },
            TypeKind::Bool | TypeKind::Primitive | TypeKind::PointerSized | TypeKind::Reference => {
                Ok(false)
            }
        }
    }

    /// Answers from the first field alone. Pointer-sized fields are always
    /// reinterpretable, so they answer `false` like any other scalar.
    fn first_field_marshal(&self, ty: TypeDescriptor, depth: usize) -> Result<bool, LayoutError> {
        let Some(field) = ty.fields().first() else {
            return Ok(false);
        };
        if field.has_explicit_marshal_attribute() {
            return Ok(true);
        }
        let field_type = field.field_type();
        let kind = field_type.kind();
        if kind.is_composite() || kind.inline_array().is_some() {
            self.marshal_at(field_type, depth)
        } else {
            Ok(false)
        }
    }

    fn any_field_marshal(&self, ty: TypeDescriptor, depth: usize) -> Result<bool, LayoutError> {
        for field in ty.fields() {
            if field.has_explicit_marshal_attribute() || self.marshal_at(field.field_type(), depth)?
            {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Checks the nesting limit before looking at `ty`, returning the depth
    /// for its fields.
    fn descend(&self, ty: TypeDescriptor, depth: usize) -> Result<usize, LayoutError> {
        let limit = self.options.max_depth();
        if depth >= limit {
            return Err(LayoutError::RecursionLimit { type_name: ty.name(), limit });
        }
        Ok(depth.saturating_add(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Describe, FieldDescriptor, ValueType};

    #[derive(ValueType, Clone, Copy)]
    struct Leaf {
        a: u16,
    }

    #[derive(ValueType, Clone, Copy)]
    struct Middle {
        leaf: Leaf,
    }

    #[derive(ValueType, Clone, Copy)]
    struct Top {
        middle: Middle,
    }

    #[derive(ValueType, Clone, Copy, PartialEq, Eq, Debug)]
    #[repr(u8)]
    enum Level {
        Low = 1,
        High = 2,
    }

    fn resolver() -> Resolver {
        Resolver::new(ResolveOptions::new())
    }

    #[test]
    fn test_size_rules() {
        let r = resolver();
        assert_eq!(r.size(TypeDescriptor::of::<bool>()), Ok(1));
        assert_eq!(r.size(TypeDescriptor::of::<u64>()), Ok(8));
        assert_eq!(r.size(TypeDescriptor::of::<Level>()), Ok(1));
        assert_eq!(r.size(TypeDescriptor::of::<Top>()), Ok(2));
        assert_eq!(r.size(TypeDescriptor::of::<[Top; 3]>()), Ok(6));
        assert_eq!(r.size(TypeDescriptor::of::<()>()), Ok(0));
        assert_eq!(
            r.size(TypeDescriptor::of::<&'static u8>()),
            Err(LayoutError::ReferenceType { type_name: "&u8" })
        );
    }

    #[test]
    fn test_canonical_type() {
        let r = resolver();
        let resolved = r.resolve(TypeDescriptor::of::<Level>()).unwrap();
        assert!(resolved.canonical_type.is::<u8>());
        assert_eq!(resolved.size, 1);
        assert!(!resolved.requires_marshal);

        let resolved = r.resolve(TypeDescriptor::of::<bool>()).unwrap();
        assert!(resolved.canonical_type.is::<bool>());
        assert_eq!(resolved.size, 1);
    }

    #[test]
    fn test_recursion_limit() {
        let r = Resolver::new(ResolveOptions::new().with_max_depth(3));
        // `Top` -> `Middle` -> `Leaf` -> `u16` is four levels.
        assert_eq!(
            r.size(TypeDescriptor::of::<Top>()),
            Err(LayoutError::RecursionLimit { type_name: "u16", limit: 3 })
        );
        assert_eq!(r.size(TypeDescriptor::of::<Middle>()), Ok(2));
    }

    // Descriptors too large for any real type.
    enum Huge {}

    impl Describe for Huge {
        const KIND: TypeKind = TypeKind::InlineArray(InlineArray::new::<u64>(usize::MAX));
        fn native_size() -> Result<usize, NativeSizeError> {
            Err(NativeSizeError::UnspecifiedLayout)
        }
        fn only_derive_is_allowed_to_implement_this_trait() {}
    }

    enum Half {}

    impl Describe for Half {
        const KIND: TypeKind = TypeKind::InlineArray(InlineArray::new::<u8>(usize::MAX / 2 + 1));
        fn native_size() -> Result<usize, NativeSizeError> {
            Err(NativeSizeError::UnspecifiedLayout)
        }
        fn only_derive_is_allowed_to_implement_this_trait() {}
    }

    enum TwoHalves {}

    impl Describe for TwoHalves {
        const KIND: TypeKind = TypeKind::Composite;
        const FIELDS: &'static [FieldDescriptor] =
            &[FieldDescriptor::new::<Half>("a"), FieldDescriptor::new::<Half>("b")];
        fn native_size() -> Result<usize, NativeSizeError> {
            Err(NativeSizeError::UnspecifiedLayout)
        }
        fn only_derive_is_allowed_to_implement_this_trait() {}
    }

    #[test]
    fn test_overflow() {
        let r = resolver();
        let huge = TypeDescriptor::of::<Huge>();
        assert_eq!(r.size(huge), Err(LayoutError::Overflow { type_name: huge.name() }));

        let half = TypeDescriptor::of::<Half>();
        assert_eq!(r.size(half), Ok(usize::MAX / 2 + 1));
        let halves = TypeDescriptor::of::<TwoHalves>();
        assert_eq!(r.size(halves), Err(LayoutError::Overflow { type_name: halves.name() }));
    }

    #[test]
    fn test_first_field_only() {
        #[derive(ValueType, Clone, Copy)]
        struct PointerFirst {
            handle: usize,
            #[marshal(LPStr)]
            text: *const u8,
        }

        #[derive(ValueType, Clone, Copy)]
        struct AnnotatedFirst {
            #[marshal(SysUInt)]
            handle: usize,
        }

        let first = resolver();
        let exhaustive =
            Resolver::new(ResolveOptions::new().with_marshal_scan(MarshalScan::Exhaustive));
        let pointer_first = TypeDescriptor::of::<PointerFirst>();
        assert_eq!(first.requires_marshal(pointer_first), Ok(false));
        assert_eq!(exhaustive.requires_marshal(pointer_first), Ok(true));
        assert_eq!(first.requires_marshal(TypeDescriptor::of::<AnnotatedFirst>()), Ok(true));
        assert_eq!(first.requires_marshal(TypeDescriptor::of::<[Top; 2]>()), Ok(false));
    }
}
