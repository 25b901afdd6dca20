use core::fmt::{self, Debug, Formatter};

use super::{Describe, DescriptorFn, MarshalAs, TypeDescriptor};

/// The shape of a fixed-size inline array: `len` elements of `element`, laid
/// out back to back.
#[derive(Clone, Copy)]
pub struct InlineArray {
    element: DescriptorFn,
    len: usize,
}

impl InlineArray {
    /// Describes an inline array of `len` elements of type `E`.
    pub const fn new<E: Describe>(len: usize) -> InlineArray {
        InlineArray { element: TypeDescriptor::of::<E>, len }
    }

    /// The element type.
    pub fn element(&self) -> TypeDescriptor {
        (self.element)()
    }

    /// The number of elements.
    #[allow(clippy::len_without_is_empty)]
    pub const fn len(&self) -> usize {
        self.len
    }
}

impl PartialEq for InlineArray {
    fn eq(&self, other: &InlineArray) -> bool {
        self.len == other.len && self.element() == other.element()
    }
}

impl Eq for InlineArray {}

impl Debug for InlineArray {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("InlineArray")
            .field("element", &self.element().name())
            .field("len", &self.len)
            .finish()
    }
}

/// A single instance field of a described struct.
///
/// Field descriptors are built in `const` context by `#[derive(ValueType)]`,
/// one per declared field, in declaration order.
#[derive(Clone, Copy)]
pub struct FieldDescriptor {
    name: &'static str,
    ty: DescriptorFn,
    inline_array: Option<InlineArray>,
    marshal: Option<MarshalAs>,
}

impl FieldDescriptor {
    /// Describes a field called `name` of type `F`.
    ///
    /// If `F` is an array type, the field is recorded as a fixed-size inline
    /// array.
    pub const fn new<F: Describe>(name: &'static str) -> FieldDescriptor {
        FieldDescriptor {
            name,
            ty: TypeDescriptor::of::<F>,
            inline_array: F::KIND.inline_array(),
            marshal: None,
        }
    }

    /// Attaches an explicit marshal annotation to this field.
    #[must_use]
    pub const fn with_marshal(self, marshal: MarshalAs) -> FieldDescriptor {
        FieldDescriptor { marshal: Some(marshal), ..self }
    }

    /// The name of the field; the index for tuple struct fields.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// The declared type of the field.
    pub fn field_type(&self) -> TypeDescriptor {
        (self.ty)()
    }

    /// The element type and length if this field is a fixed-size inline array.
    pub const fn inline_array(&self) -> Option<InlineArray> {
        self.inline_array
    }

    /// Returns true if this field is a fixed-size inline array.
    pub const fn is_fixed_inline_array(&self) -> bool {
        self.inline_array.is_some()
    }

    /// The explicit marshal annotation on this field, if any.
    pub const fn marshal(&self) -> Option<MarshalAs> {
        self.marshal
    }

    /// Returns true if this field carries an explicit marshal annotation.
    pub const fn has_explicit_marshal_attribute(&self) -> bool {
        self.marshal.is_some()
    }
}

impl Debug for FieldDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("type", &self.field_type().name())
            .field("inline_array", &self.inline_array)
            .field("marshal", &self.marshal)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_array_field() {
        const FIELD: FieldDescriptor = FieldDescriptor::new::<[u8; 16]>("name");
        assert_eq!(FIELD.name(), "name");
        assert!(FIELD.is_fixed_inline_array());
        let array = FIELD.inline_array().unwrap();
        assert_eq!(array.len(), 16);
        assert!(array.element().is::<u8>());
        assert!(FIELD.field_type().is::<[u8; 16]>());
        assert!(!FIELD.has_explicit_marshal_attribute());
    }

    #[test]
    fn test_marshal_annotation() {
        const FIELD: FieldDescriptor =
            FieldDescriptor::new::<u32>("flag").with_marshal(MarshalAs::Bool);
        assert!(!FIELD.is_fixed_inline_array());
        assert!(FIELD.has_explicit_marshal_attribute());
        assert_eq!(FIELD.marshal(), Some(MarshalAs::Bool));
    }
}
