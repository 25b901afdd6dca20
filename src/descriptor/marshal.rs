use core::fmt::{self, Display, Formatter};

/// An explicit interop marshaling rule attached to a field.
///
/// A field carrying one of these is converted when it crosses into native
/// code instead of being copied bit for bit, so its in-memory layout says
/// nothing about its native layout. Annotate fields with
/// `#[marshal(...)]` under `#[derive(ValueType)]`:
///
/// ```rust
/// # use sizecache::ValueType;
/// #[derive(ValueType, Clone, Copy)]
/// struct Record {
///     #[marshal(Bool)]
///     active: u8,
///     #[marshal(ByValArray { len: 4 })]
///     samples: [u16; 4],
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarshalAs {
    /// A 4-byte Win32 `BOOL`.
    Bool,
    /// Signed 8-bit integer.
    I1,
    /// Unsigned 8-bit integer.
    U1,
    /// Signed 16-bit integer.
    I2,
    /// Unsigned 16-bit integer.
    U2,
    /// Signed 32-bit integer.
    I4,
    /// Unsigned 32-bit integer.
    U4,
    /// Signed 64-bit integer.
    I8,
    /// Unsigned 64-bit integer.
    U8,
    /// 32-bit float.
    R4,
    /// 64-bit float.
    R8,
    /// Platform-sized signed integer.
    SysInt,
    /// Platform-sized unsigned integer.
    SysUInt,
    /// Pointer to a NUL-terminated ANSI string.
    LPStr,
    /// Pointer to a NUL-terminated UTF-16 string.
    LPWStr,
    /// Pointer to a NUL-terminated UTF-8 string.
    LPUtf8Str,
    /// Length-prefixed OLE automation string.
    BStr,
    /// A fixed-length character buffer embedded in the struct.
    ByValTStr {
        /// Buffer length in characters.
        len: usize,
    },
    /// A fixed-length array embedded in the struct.
    ByValArray {
        /// Number of elements.
        len: usize,
    },
    /// A nested native struct.
    Struct,
    /// A COM interface pointer.
    Interface,
    /// A native function pointer.
    FunctionPtr,
    /// A custom marshaler, identified by name.
    Custom(&'static str),
}

impl Display for MarshalAs {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            MarshalAs::Bool => f.write_str("Bool"),
            MarshalAs::I1 => f.write_str("I1"),
            MarshalAs::U1 => f.write_str("U1"),
            MarshalAs::I2 => f.write_str("I2"),
            MarshalAs::U2 => f.write_str("U2"),
            MarshalAs::I4 => f.write_str("I4"),
            MarshalAs::U4 => f.write_str("U4"),
            MarshalAs::I8 => f.write_str("I8"),
            MarshalAs::U8 => f.write_str("U8"),
            MarshalAs::R4 => f.write_str("R4"),
            MarshalAs::R8 => f.write_str("R8"),
            MarshalAs::SysInt => f.write_str("SysInt"),
            MarshalAs::SysUInt => f.write_str("SysUInt"),
            MarshalAs::LPStr => f.write_str("LPStr"),
            MarshalAs::LPWStr => f.write_str("LPWStr"),
            MarshalAs::LPUtf8Str => f.write_str("LPUtf8Str"),
            MarshalAs::BStr => f.write_str("BStr"),
            MarshalAs::ByValTStr { len } => write!(f, "ByValTStr[{}]", len),
            MarshalAs::ByValArray { len } => write!(f, "ByValArray[{}]", len),
            MarshalAs::Struct => f.write_str("Struct"),
            MarshalAs::Interface => f.write_str("Interface"),
            MarshalAs::FunctionPtr => f.write_str("FunctionPtr"),
            MarshalAs::Custom(name) => write!(f, "Custom({})", name),
        }
    }
}
