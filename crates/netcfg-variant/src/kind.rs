//! Type tags and their wire signature codes.

use std::fmt;

/// Discriminant of a [`crate::Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// No payload; the zero value.
    Invalid,
    /// Boolean.
    Bool,
    /// Unsigned 8-bit integer.
    Byte,
    /// Signed 16-bit integer.
    Int16,
    /// Unsigned 16-bit integer.
    Uint16,
    /// Signed 32-bit integer.
    Int32,
    /// Unsigned 32-bit integer.
    Uint32,
    /// Signed 64-bit integer.
    Int64,
    /// Unsigned 64-bit integer.
    Uint64,
    /// IEEE 754 double.
    Double,
    /// UTF-8 text.
    String,
    /// Object path.
    ObjectPath,
    /// A homogeneous sequence; the element kind is tracked separately.
    Array,
    /// A value wrapping exactly one other value.
    Variant,
}

impl Kind {
    /// Single-character wire code, or `None` for [`Kind::Invalid`].
    #[must_use]
    pub const fn code(self) -> Option<char> {
        match self {
            Self::Invalid => None,
            Self::Bool => Some('b'),
            Self::Byte => Some('y'),
            Self::Int16 => Some('n'),
            Self::Uint16 => Some('q'),
            Self::Int32 => Some('i'),
            Self::Uint32 => Some('u'),
            Self::Int64 => Some('x'),
            Self::Uint64 => Some('t'),
            Self::Double => Some('d'),
            Self::String => Some('s'),
            Self::ObjectPath => Some('o'),
            Self::Array => Some('a'),
            Self::Variant => Some('v'),
        }
    }

    /// Inverse of [`Kind::code`].
    #[must_use]
    pub const fn from_code(code: char) -> Option<Self> {
        let kind = match code {
            'b' => Self::Bool,
            'y' => Self::Byte,
            'n' => Self::Int16,
            'q' => Self::Uint16,
            'i' => Self::Int32,
            'u' => Self::Uint32,
            'x' => Self::Int64,
            't' => Self::Uint64,
            'd' => Self::Double,
            's' => Self::String,
            'o' => Self::ObjectPath,
            'a' => Self::Array,
            'v' => Self::Variant,
            _ => return None,
        };
        Some(kind)
    }

    /// Lowercase name used in diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Invalid => "invalid",
            Self::Bool => "bool",
            Self::Byte => "byte",
            Self::Int16 => "int16",
            Self::Uint16 => "uint16",
            Self::Int32 => "int32",
            Self::Uint32 => "uint32",
            Self::Int64 => "int64",
            Self::Uint64 => "uint64",
            Self::Double => "double",
            Self::String => "string",
            Self::ObjectPath => "object-path",
            Self::Array => "array",
            Self::Variant => "variant",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}
