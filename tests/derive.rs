#![allow(dead_code)]

use core::mem;

use sizecache::{
    Describe, FieldDescriptor, InlineArray, MarshalAs, SizeCache, TypeDescriptor, TypeKind,
    ValueType,
};

#[derive(ValueType, Clone, Copy)]
struct Unit;

#[derive(ValueType, Clone, Copy)]
struct Pair(u16, #[marshal(U4)] u16);

#[derive(ValueType, Clone, Copy)]
struct Annotations {
    #[marshal(SysInt)]
    handle: isize,
    #[marshal(ByValArray { len: 4 })]
    samples: [u16; 4],
    #[marshal(Custom("utf16"))]
    label: [u16; 8],
    r#type: u8,
}

#[derive(ValueType, Clone, Copy)]
#[repr(transparent)]
struct Handle(u64);

#[derive(ValueType, Clone, Copy)]
#[repr(C, align(8))]
struct Aligned {
    a: u8,
}

#[derive(ValueType, Clone, Copy)]
#[repr(u8)]
enum Color {
    Red = 1,
    Green = 2,
    Blue = 4,
}

#[derive(ValueType, Clone, Copy)]
#[repr(C)]
struct Generic<T, const N: usize> {
    items: [T; N],
    count: u32,
}

fn field(fields: &[FieldDescriptor], name: &str) -> FieldDescriptor {
    *fields.iter().find(|f| f.name() == name).unwrap()
}

#[test]
fn test_unit_struct() {
    assert_eq!(<Unit as Describe>::KIND, TypeKind::Composite);
    assert!(<Unit as Describe>::FIELDS.is_empty());
    assert_eq!(SizeCache::<Unit>::size(), 0);
    assert!(!SizeCache::<Unit>::requires_marshal());
}

#[test]
fn test_tuple_struct_fields() {
    let fields = <Pair as Describe>::FIELDS;
    assert_eq!(fields.iter().map(FieldDescriptor::name).collect::<Vec<_>>(), ["0", "1"]);
    assert_eq!(fields[0].marshal(), None);
    assert_eq!(fields[1].marshal(), Some(MarshalAs::U4));
    assert_eq!(SizeCache::<Pair>::size(), 4);
    // The first field is plain, so the annotation on the second is not seen.
    assert!(!SizeCache::<Pair>::requires_marshal());
}

#[test]
fn test_marshal_forms() {
    let fields = <Annotations as Describe>::FIELDS;
    assert_eq!(fields.len(), 4);
    assert_eq!(field(fields, "handle").marshal(), Some(MarshalAs::SysInt));
    assert_eq!(field(fields, "samples").marshal(), Some(MarshalAs::ByValArray { len: 4 }));
    assert_eq!(field(fields, "label").marshal(), Some(MarshalAs::Custom("utf16")));
    assert_eq!(field(fields, "type").marshal(), None);

    let samples = field(fields, "samples");
    assert!(samples.is_fixed_inline_array());
    assert_eq!(samples.inline_array(), Some(InlineArray::new::<u16>(4)));
    assert!(samples.field_type().is::<[u16; 4]>());

    assert_eq!(SizeCache::<Annotations>::size(), mem::size_of::<isize>() + 8 + 16 + 1);
    assert!(SizeCache::<Annotations>::requires_marshal());
}

#[test]
fn test_c_compatible_reprs() {
    assert_eq!(<Handle as Describe>::native_size(), Ok(8));
    assert_eq!(SizeCache::<Handle>::size(), 8);
    assert_eq!(<Aligned as Describe>::native_size(), Ok(8));
    assert_eq!(SizeCache::<Aligned>::size(), 8);
    assert!(<Annotations as Describe>::native_size().is_err());
}

#[test]
fn test_enum() {
    assert_eq!(
        <Color as Describe>::KIND,
        TypeKind::Enum { underlying: TypeDescriptor::of::<u8> }
    );
    assert_eq!(<Color as Describe>::KIND.underlying(), Some(TypeDescriptor::of::<u8>()));
    assert_eq!(SizeCache::<Color>::size(), 1);
    assert!(SizeCache::<Color>::canonical_type().is::<u8>());
}

#[test]
fn test_generic_struct() {
    assert_eq!(SizeCache::<Generic<u16, 3>>::size(), mem::size_of::<Generic<u16, 3>>());
    assert_eq!(SizeCache::<Generic<Color, 2>>::size(), 8);
    assert_eq!(SizeCache::<Generic<Pair, 2>>::size(), 12);
    assert!(!SizeCache::<Generic<Pair, 2>>::requires_marshal());
    assert!(SizeCache::<Generic<Annotations, 1>>::requires_marshal());

    let descriptor = TypeDescriptor::of::<Generic<u16, 3>>();
    assert_eq!(descriptor.fields().len(), 2);
    assert_eq!(descriptor.fields()[0].inline_array().map(|a| a.len()), Some(3));
}
