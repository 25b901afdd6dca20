//! Traits and descriptors through which the resolver introspects a type.

mod field;
mod marshal;

use core::{
    any::{self, TypeId},
    fmt::{self, Debug, Display, Formatter},
    hash::{Hash, Hasher},
};

pub use field::{FieldDescriptor, InlineArray};
pub use marshal::MarshalAs;

use crate::native::NativeSizeError;

/// A function producing the descriptor of some type.
///
/// Descriptors refer to other descriptors (field types, enum representations,
/// array elements) through these functions rather than by value, so that they
/// can be stored in `const` tables.
pub type DescriptorFn = fn() -> TypeDescriptor;

/// Types whose layout can be introspected.
///
/// WARNING: Do not implement this trait yourself! Instead, use
/// `#[derive(ValueType)]`.
///
/// `Describe` is the reflective side of this crate: it tells the resolver what
/// kind of type `Self` is, which fields it declares, and whether its in-memory
/// layout can be used as its native layout. It is implemented for reference
/// types too, so that a struct holding a reference can still be described and
/// then rejected with a useful error. Only [`ValueType`]s can be handed to
/// [`SizeCache`](crate::SizeCache).
pub trait Describe: 'static {
    /// The kind of type `Self` is.
    const KIND: TypeKind;

    /// The instance fields declared on `Self`, in declaration order.
    ///
    /// Empty for everything except structs.
    const FIELDS: &'static [FieldDescriptor] = &[];

    /// Queries the native layout of `Self`.
    ///
    /// Returns the number of bytes `Self` occupies when its in-memory layout is
    /// also its native layout. Failure is not an error condition for the
    /// resolver; it merely makes it sum up [`FIELDS`](Describe::FIELDS)
    /// instead.
    fn native_size() -> Result<usize, NativeSizeError>;

    #[doc(hidden)]
    fn only_derive_is_allowed_to_implement_this_trait();
}

/// Types which are copied by value and have a fixed layout.
///
/// WARNING: Do not implement this trait yourself! Instead, use
/// `#[derive(ValueType)]`.
///
/// `ValueType` is the bound on every entry point of this crate. References are
/// [`Describe`] but never `ValueType`, so asking for the size of a reference is
/// a compile error rather than a runtime one.
pub trait ValueType: Describe + Copy {}

/// The kind of a described type, as far as layout resolution is concerned.
#[derive(Clone, Copy)]
pub enum TypeKind {
    /// `bool`, which always occupies exactly one byte.
    Bool,
    /// A primitive scalar such as `u32`, `f64` or `char`.
    Primitive,
    /// A native pointer-sized integer or raw pointer.
    ///
    /// These are always safe to reinterpret, and are skipped by the marshal
    /// check.
    PointerSized,
    /// A fieldless enum, resolved through its integer representation.
    Enum {
        /// The integer type the enum is represented as.
        underlying: DescriptorFn,
    },
    /// A fixed-size inline array.
    InlineArray(InlineArray),
    /// A struct (or other aggregate) made of [`Describe::FIELDS`].
    Composite,
    /// A reference. References have no fixed layout of their referent and are
    /// rejected during resolution.
    Reference,
}

impl TypeKind {
    /// Returns the descriptor of the underlying integer type for an enum.
    pub fn underlying(&self) -> Option<TypeDescriptor> {
        match self {
            TypeKind::Enum { underlying } => Some(underlying()),
            _ => None,
        }
    }

    /// Returns the inline array shape, if this is an array kind.
    pub const fn inline_array(&self) -> Option<InlineArray> {
        match self {
            TypeKind::InlineArray(array) => Some(*array),
            _ => None,
        }
    }

    /// Returns true for [`TypeKind::Composite`].
    pub const fn is_composite(&self) -> bool {
        matches!(self, TypeKind::Composite)
    }

    /// Returns true for [`TypeKind::Reference`].
    pub const fn is_reference(&self) -> bool {
        matches!(self, TypeKind::Reference)
    }

    fn label(&self) -> &'static str {
        match self {
            TypeKind::Bool => "bool",
            TypeKind::Primitive => "primitive",
            TypeKind::PointerSized => "pointer-sized",
            TypeKind::Enum { .. } => "enum",
            TypeKind::InlineArray(_) => "inline array",
            TypeKind::Composite => "composite",
            TypeKind::Reference => "reference",
        }
    }
}

// Function pointers are compared through the descriptors they produce, since
// the same function may have several addresses after codegen.
impl PartialEq for TypeKind {
    fn eq(&self, other: &TypeKind) -> bool {
        match (self, other) {
            (TypeKind::Enum { underlying: a }, TypeKind::Enum { underlying: b }) => a() == b(),
            (TypeKind::InlineArray(a), TypeKind::InlineArray(b)) => a == b,
            (TypeKind::Bool, TypeKind::Bool)
            | (TypeKind::Primitive, TypeKind::Primitive)
            | (TypeKind::PointerSized, TypeKind::PointerSized)
            | (TypeKind::Composite, TypeKind::Composite)
            | (TypeKind::Reference, TypeKind::Reference) => true,
            _ => false,
        }
    }
}

impl Eq for TypeKind {}

impl Debug for TypeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            TypeKind::Enum { underlying } => {
                f.debug_struct("Enum").field("underlying", &underlying().name()).finish()
            }
            TypeKind::InlineArray(array) => f.debug_tuple("InlineArray").field(array).finish(),
            TypeKind::Bool => f.write_str("Bool"),
            TypeKind::Primitive => f.write_str("Primitive"),
            TypeKind::PointerSized => f.write_str("PointerSized"),
            TypeKind::Composite => f.write_str("Composite"),
            TypeKind::Reference => f.write_str("Reference"),
        }
    }
}

impl Display for TypeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Identifies a concrete type and gives access to its layout metadata.
///
/// A `TypeDescriptor` is what the [`LayoutCache`](crate::LayoutCache) is keyed
/// on. Two descriptors are equal exactly when they describe the same type.
#[derive(Clone, Copy)]
pub struct TypeDescriptor {
    id: TypeId,
    name: &'static str,
    kind: TypeKind,
    fields: &'static [FieldDescriptor],
    native_size: fn() -> Result<usize, NativeSizeError>,
}

impl TypeDescriptor {
    /// Returns the descriptor of `T`.
    pub fn of<T: Describe>() -> TypeDescriptor {
        TypeDescriptor {
            id: TypeId::of::<T>(),
            name: any::type_name::<T>(),
            kind: T::KIND,
            fields: T::FIELDS,
            native_size: T::native_size,
        }
    }

    /// Returns true if this descriptor describes `T`.
    pub fn is<T: 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }

    /// The [`TypeId`] of the described type.
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// The name of the described type, as given by [`core::any::type_name`].
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The kind of the described type.
    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    /// The instance fields of the described type, in declaration order.
    pub fn fields(&self) -> &'static [FieldDescriptor] {
        self.fields
    }

    /// Runs the native layout query of the described type.
    pub fn native_size(&self) -> Result<usize, NativeSizeError> {
        (self.native_size)()
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &TypeDescriptor) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeDescriptor {}

impl Hash for TypeDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Debug for TypeDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("fields", &self.fields.len())
            .finish()
    }
}

impl Display for TypeDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
