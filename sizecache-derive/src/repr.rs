use proc_macro2::Ident;
use syn::{parenthesized, token, Attribute, Error, LitInt};

/// A single representation hint from a `#[repr(...)]` attribute.
#[derive(Debug)]
pub(crate) enum Repr {
    C,
    Transparent,
    Packed,
    Align,
    /// A primitive integer representation, such as `u8` or `isize`.
    Int(Ident),
}

impl Repr {
    /// Whether the layout under this hint is the layout native code sees.
    pub(crate) fn is_c_compatible(&self) -> bool {
        matches!(self, Repr::C | Repr::Transparent)
    }

    pub(crate) fn integer(&self) -> Option<&Ident> {
        match self {
            Repr::Int(ident) => Some(ident),
            _ => None,
        }
    }
}

const INTEGERS: &[&str] =
    &["u8", "u16", "u32", "u64", "u128", "usize", "i8", "i16", "i32", "i64", "i128", "isize"];

/// Collects the representation hints from every `#[repr(...)]` attribute.
pub(crate) fn reprs(attrs: &[Attribute]) -> Result<Vec<Repr>, Error> {
    let mut reprs = Vec::new();
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("repr")) {
        attr.parse_nested_meta(|meta| {
            let ident =
                meta.path.get_ident().ok_or_else(|| meta.error("unrecognized representation hint"))?;
            let repr = match ident.to_string().as_str() {
                "C" => Repr::C,
                "transparent" => Repr::Transparent,
                "packed" | "align" => {
                    // `packed(N)` and `align(N)` do not change what we emit, but
                    // their argument still has to be consumed.
                    if meta.input.peek(token::Paren) {
                        let content;
                        parenthesized!(content in meta.input);
                        content.parse::<LitInt>()?;
                    }
                    if ident == "packed" {
                        Repr::Packed
                    } else {
                        Repr::Align
                    }
                }
                name if INTEGERS.contains(&name) => Repr::Int(ident.clone()),
                _ => return Err(meta.error("unrecognized representation hint")),
            };
            reprs.push(repr);
            Ok(())
        })?;
    }
    Ok(reprs)
}
