//! Element formats - how one buffer element is bit-encoded.

use crate::util::{Error, Result};
use std::fmt;

/// Numeric encoding of a single scalar within a buffer element.
///
/// This is a closed set: the codec matches on it exhaustively, so adding a
/// kind is a compile-time-checked change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum ElementKind {
    /// Signed 8-bit integer, raw value
    Int8,
    /// Signed 16-bit integer, raw value
    Int16,
    /// Signed 32-bit integer, raw value
    Int32,
    /// Unsigned 8-bit integer, raw value
    UInt8,
    /// Unsigned 16-bit integer, raw value
    UInt16,
    /// Unsigned 32-bit integer, raw value
    UInt32,
    /// IEEE 754 single precision
    Float32,
    /// IEEE 754 half precision
    Half16,
    /// Unsigned byte mapped to [0, 1] (b / 255)
    NormUInt8,
    /// Unsigned short mapped to [0, 1] (s / 65535)
    NormUInt16,
    /// Signed byte mapped to [-1, 1] (b / 127)
    NormInt8,
    /// Signed short mapped to [-1, 1] (s / 32767)
    NormInt16,
    /// One 32-bit word holding three signed 10-bit fields normalized to
    /// [-1, 1] plus an unused 2-bit field. Used for compressed
    /// normals/tangents; always exposes arity 3.
    Snorm10_10_10_2,
}

impl ElementKind {
    /// Byte width of one scalar of this kind.
    ///
    /// For [`Snorm10_10_10_2`](Self::Snorm10_10_10_2) this is the width of
    /// the whole packed word, since its scalars are not byte-addressable.
    #[inline]
    pub const fn scalar_bytes(self) -> usize {
        match self {
            Self::Int8 | Self::UInt8 | Self::NormUInt8 | Self::NormInt8 => 1,
            Self::Int16 | Self::UInt16 | Self::Half16 | Self::NormUInt16 | Self::NormInt16 => 2,
            Self::Int32 | Self::UInt32 | Self::Float32 => 4,
            Self::Snorm10_10_10_2 => 4,
        }
    }

    /// Returns true if decoded values carry a sign.
    #[inline]
    pub const fn is_signed(self) -> bool {
        matches!(
            self,
            Self::Int8
                | Self::Int16
                | Self::Int32
                | Self::Float32
                | Self::Half16
                | Self::NormInt8
                | Self::NormInt16
                | Self::Snorm10_10_10_2
        )
    }

    /// Returns true if values decode to raw (unscaled) integers.
    #[inline]
    pub const fn is_integer_valued(self) -> bool {
        matches!(
            self,
            Self::Int8 | Self::Int16 | Self::Int32 | Self::UInt8 | Self::UInt16 | Self::UInt32
        )
    }

    /// Returns true for the normalized encodings (including the packed one).
    #[inline]
    pub const fn is_normalized(self) -> bool {
        matches!(
            self,
            Self::NormUInt8
                | Self::NormUInt16
                | Self::NormInt8
                | Self::NormInt16
                | Self::Snorm10_10_10_2
        )
    }

    /// Returns the name of this kind as a string.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::UInt8 => "uint8",
            Self::UInt16 => "uint16",
            Self::UInt32 => "uint32",
            Self::Float32 => "float32",
            Self::Half16 => "half16",
            Self::NormUInt8 => "norm_uint8",
            Self::NormUInt16 => "norm_uint16",
            Self::NormInt8 => "norm_int8",
            Self::NormInt16 => "norm_int16",
            Self::Snorm10_10_10_2 => "snorm10_10_10_2",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// ElementFormat describes how one buffer element is encoded.
///
/// It combines an [`ElementKind`] with a scalar count (1 for scalar, 2 for
/// Vec2, 3 for Vec3, 4 for Vec4). For example, a position would typically be
/// `Float32` with count 3; a compressed normal is `Snorm10_10_10_2`, which
/// always has count 3 and occupies 4 bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementFormat {
    /// The scalar encoding
    pub kind: ElementKind,
    /// Number of scalars per element (1..=4)
    pub scalar_count: u8,
}

impl ElementFormat {
    const fn raw(kind: ElementKind, scalar_count: u8) -> Self {
        Self { kind, scalar_count }
    }

    /// Create a new ElementFormat with given kind and scalar count.
    ///
    /// Fails if the count is outside 1..=4, or is not 3 for the packed
    /// SNORM 10-10-10-2 kind (which fixes its external arity).
    pub fn new(kind: ElementKind, scalar_count: u8) -> Result<Self> {
        if scalar_count == 0 || scalar_count > 4 {
            return Err(Error::invalid(format!(
                "scalar count {scalar_count} outside 1..=4"
            )));
        }
        if kind == ElementKind::Snorm10_10_10_2 && scalar_count != 3 {
            return Err(Error::invalid(format!(
                "{kind} always has 3 components, got {scalar_count}"
            )));
        }
        Ok(Self::raw(kind, scalar_count))
    }

    /// Create a scalar ElementFormat (count = 1).
    pub fn scalar(kind: ElementKind) -> Result<Self> {
        Self::new(kind, 1)
    }

    /// Total size in bytes for one element.
    ///
    /// `scalar_count * scalar_bytes`, except the packed kind which is always
    /// a single 4-byte word regardless of its arity.
    #[inline]
    pub const fn byte_size(&self) -> usize {
        match self.kind {
            ElementKind::Snorm10_10_10_2 => 4,
            kind => kind.scalar_bytes() * self.scalar_count as usize,
        }
    }

    // === Common predefined formats ===

    // Scalars
    pub const UINT8: Self = Self::raw(ElementKind::UInt8, 1);
    pub const UINT16: Self = Self::raw(ElementKind::UInt16, 1);
    pub const UINT32: Self = Self::raw(ElementKind::UInt32, 1);
    pub const INT8: Self = Self::raw(ElementKind::Int8, 1);
    pub const INT16: Self = Self::raw(ElementKind::Int16, 1);
    pub const INT32: Self = Self::raw(ElementKind::Int32, 1);
    pub const FLOAT32: Self = Self::raw(ElementKind::Float32, 1);
    pub const HALF16: Self = Self::raw(ElementKind::Half16, 1);

    // Float vectors
    pub const VEC2F: Self = Self::raw(ElementKind::Float32, 2);
    pub const VEC3F: Self = Self::raw(ElementKind::Float32, 3);
    pub const VEC4F: Self = Self::raw(ElementKind::Float32, 4);

    // Half vectors
    pub const VEC2H: Self = Self::raw(ElementKind::Half16, 2);
    pub const VEC4H: Self = Self::raw(ElementKind::Half16, 4);

    // Normalized colors
    pub const VEC3_NUINT8: Self = Self::raw(ElementKind::NormUInt8, 3);
    pub const VEC4_NUINT8: Self = Self::raw(ElementKind::NormUInt8, 4);

    // Skin weights
    pub const VEC4_NUINT16: Self = Self::raw(ElementKind::NormUInt16, 4);

    /// Compressed normal/tangent (three signed 10-bit fields in one word)
    pub const PACKED_NORMAL: Self = Self::raw(ElementKind::Snorm10_10_10_2, 3);
}

impl fmt::Debug for ElementFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.scalar_count == 1 {
            write!(f, "{}", self.kind.name())
        } else {
            write!(f, "{}[{}]", self.kind.name(), self.scalar_count)
        }
    }
}

impl fmt::Display for ElementFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_sizes() {
        assert_eq!(ElementFormat::UINT32.byte_size(), 4);
        assert_eq!(ElementFormat::VEC3F.byte_size(), 12);
        assert_eq!(ElementFormat::VEC3_NUINT8.byte_size(), 3);
        assert_eq!(ElementFormat::VEC4_NUINT16.byte_size(), 8);
        assert_eq!(ElementFormat::VEC2H.byte_size(), 4);
        // packed kind is one word no matter the arity
        assert_eq!(ElementFormat::PACKED_NORMAL.byte_size(), 4);
    }

    #[test]
    fn test_constructor_validation() {
        assert!(ElementFormat::new(ElementKind::Float32, 0).is_err());
        assert!(ElementFormat::new(ElementKind::Float32, 5).is_err());
        assert!(ElementFormat::new(ElementKind::Snorm10_10_10_2, 4).is_err());
        assert!(ElementFormat::new(ElementKind::Snorm10_10_10_2, 3).is_ok());
        assert_eq!(
            ElementFormat::new(ElementKind::Float32, 3).unwrap(),
            ElementFormat::VEC3F
        );
    }

    #[test]
    fn test_kind_predicates() {
        assert!(ElementKind::Int16.is_signed());
        assert!(!ElementKind::UInt16.is_signed());
        assert!(ElementKind::UInt32.is_integer_valued());
        assert!(!ElementKind::NormUInt8.is_integer_valued());
        assert!(ElementKind::Snorm10_10_10_2.is_normalized());
        assert!(!ElementKind::Float32.is_normalized());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", ElementFormat::FLOAT32), "float32");
        assert_eq!(format!("{}", ElementFormat::VEC3F), "float32[3]");
        assert_eq!(
            format!("{}", ElementFormat::PACKED_NORMAL),
            "snorm10_10_10_2[3]"
        );
    }
}
