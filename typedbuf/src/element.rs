use alloc::string::{String, ToString};
use core::mem::size_of;

use crate::render::ElementRenderer;

/// Semantic type of the elements a buffer holds.
///
/// The tag decides two things: which default renderer a buffer gets and
/// whether the slots own heap values that must be released with them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeTag {
    /// Uninterpreted bytes
    #[default]
    Opaque,
    /// Unicode scalar values (4 bytes) or ASCII bytes (1 byte)
    Char,
    /// Signed integers of 1, 2, 4, 8 or 16 bytes
    Signed,
    /// Unsigned integers of 1, 2, 4, 8 or 16 bytes
    Unsigned,
    /// `f32` or `f64`
    Float,
    /// Addresses of boxed values owned by the buffer
    Owning,
}

impl TypeTag {
    /// `true` when each slot owns a heap value that the buffer must release.
    #[must_use]
    pub fn owns_elements(self) -> bool {
        matches!(self, Self::Owning)
    }

    /// The renderer used when a buffer of this type is built without one.
    #[must_use]
    pub fn default_renderer(self) -> Option<ElementRenderer> {
        match self {
            Self::Char => Some(render_char),
            Self::Signed => Some(render_signed),
            Self::Unsigned => Some(render_unsigned),
            Self::Float => Some(render_float),
            Self::Opaque | Self::Owning => None,
        }
    }
}

/// A fixed-size value that can be copied into and out of a slot.
///
/// Implemented for the primitive integers, floats and `char`, using native
/// byte order.
pub trait Element: Copy {
    /// Bytes one value occupies; a buffer must have exactly this slot width.
    const SIZE: usize;
    /// Tag given to buffers built with `TypedBuffer::for_type`.
    const TAG: TypeTag;

    /// Writes the value into `out`, which is exactly `SIZE` bytes long.
    fn write_to(self, out: &mut [u8]);

    /// Reads a value back, or `None` if `bytes` is not a valid encoding.
    fn read_from(bytes: &[u8]) -> Option<Self>;
}

macro_rules! impl_element {
    ($tag:ident: $($t:ty),+) => {
        $(
            impl Element for $t {
                const SIZE: usize = size_of::<$t>();
                const TAG: TypeTag = TypeTag::$tag;

                fn write_to(self, out: &mut [u8]) {
                    out.copy_from_slice(&self.to_ne_bytes());
                }

                fn read_from(bytes: &[u8]) -> Option<Self> {
                    bytes.try_into().ok().map(<$t>::from_ne_bytes)
                }
            }
        )+
    };
}

impl_element!(Signed: i8, i16, i32, i64, i128, isize);
impl_element!(Unsigned: u8, u16, u32, u64, u128, usize);
impl_element!(Float: f32, f64);

impl Element for char {
    const SIZE: usize = size_of::<char>();
    const TAG: TypeTag = TypeTag::Char;

    fn write_to(self, out: &mut [u8]) {
        u32::from(self).write_to(out);
    }

    fn read_from(bytes: &[u8]) -> Option<Self> {
        u32::read_from(bytes).and_then(char::from_u32)
    }
}

macro_rules! render_by_width {
    ($bytes:expr, $($width:literal => $t:ty),+) => {
        match $bytes.len() {
            $($width => <$t>::read_from($bytes).map(|v| v.to_string()),)+
            _ => None,
        }
    };
}

/// Decimal rendering of a native-endian signed integer slot.
#[must_use]
pub fn render_signed(bytes: &[u8]) -> Option<String> {
    render_by_width!(bytes, 1 => i8, 2 => i16, 4 => i32, 8 => i64, 16 => i128)
}

/// Decimal rendering of a native-endian unsigned integer slot.
#[must_use]
pub fn render_unsigned(bytes: &[u8]) -> Option<String> {
    render_by_width!(bytes, 1 => u8, 2 => u16, 4 => u32, 8 => u64, 16 => u128)
}

#[must_use]
pub fn render_float(bytes: &[u8]) -> Option<String> {
    render_by_width!(bytes, 4 => f32, 8 => f64)
}

/// Renders a 4-byte `char` slot, or a 1-byte ASCII slot.
#[must_use]
pub fn render_char(bytes: &[u8]) -> Option<String> {
    match bytes {
        [byte] if byte.is_ascii() => Some(char::from(*byte).to_string()),
        _ => char::read_from(bytes).map(|c| c.to_string()),
    }
}
