//! The tagged value type.

use std::borrow::Cow;

use crate::errors::{AllocationError, ValueError};
use crate::kind::Kind;
use crate::sequence::Sequence;

/// Text rendered by [`Value::describe`] for kinds without a textual form.
pub const UNKNOWN_TYPE: &str = "<unknown type>";

/// A single dynamically typed unit of wire data.
///
/// The payload always matches the tag because the tag *is* the enum variant.
/// Setters replace the whole value: the previous payload (and any buffer it
/// owns) is released before the new one is built.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// The zero value; carries nothing.
    #[default]
    Invalid,
    /// Boolean, signature `b`.
    Bool(bool),
    /// Unsigned byte, signature `y`.
    Byte(u8),
    /// Signature `n`.
    Int16(i16),
    /// Signature `q`.
    Uint16(u16),
    /// Signature `i`.
    Int32(i32),
    /// Signature `u`.
    Uint32(u32),
    /// Signature `x`.
    Int64(i64),
    /// Signature `t`.
    Uint64(u64),
    /// Signature `d`.
    Double(f64),
    /// UTF-8 text, signature `s`.
    String(String),
    /// Object path, signature `o`.
    ObjectPath(String),
    /// Byte sequence, signature `ay`.
    ByteArray(Sequence<u8>),
    /// String sequence, signature `as`.
    StringArray(Sequence<String>),
    /// Sequence of values, signature `av`.
    VariantArray(Sequence<Value>),
    /// One level of value wrapping.
    Variant(Box<Value>),
}

impl Value {
    /// Tag of this value.
    #[must_use]
    pub const fn kind(&self) -> Kind {
        match self {
            Self::Invalid => Kind::Invalid,
            Self::Bool(_) => Kind::Bool,
            Self::Byte(_) => Kind::Byte,
            Self::Int16(_) => Kind::Int16,
            Self::Uint16(_) => Kind::Uint16,
            Self::Int32(_) => Kind::Int32,
            Self::Uint32(_) => Kind::Uint32,
            Self::Int64(_) => Kind::Int64,
            Self::Uint64(_) => Kind::Uint64,
            Self::Double(_) => Kind::Double,
            Self::String(_) => Kind::String,
            Self::ObjectPath(_) => Kind::ObjectPath,
            Self::ByteArray(_) | Self::StringArray(_) | Self::VariantArray(_) => Kind::Array,
            Self::Variant(_) => Kind::Variant,
        }
    }

    /// Element tag for the array kinds, `None` otherwise.
    #[must_use]
    pub const fn element_kind(&self) -> Option<Kind> {
        match self {
            Self::ByteArray(_) => Some(Kind::Byte),
            Self::StringArray(_) => Some(Kind::String),
            Self::VariantArray(_) => Some(Kind::Variant),
            _ => None,
        }
    }

    /// Element count for the array kinds, `None` otherwise.
    #[must_use]
    pub fn sequence_len(&self) -> Option<usize> {
        match self {
            Self::ByteArray(items) => Some(items.len()),
            Self::StringArray(items) => Some(items.len()),
            Self::VariantArray(items) => Some(items.len()),
            _ => None,
        }
    }

    /// Whether the value holds a payload.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        !matches!(self, Self::Invalid)
    }

    /// Releases the payload and resets the value to [`Value::Invalid`].
    /// Destroying an invalid value does nothing.
    pub fn destroy(&mut self) {
        *self = Self::Invalid;
    }

    fn adopt(&mut self, build: impl FnOnce() -> Self) {
        self.destroy();
        *self = build();
    }

    /// Replaces the value with a boolean.
    pub fn set_bool(&mut self, value: bool) {
        self.adopt(|| Self::Bool(value));
    }

    /// Replaces the value with a byte.
    pub fn set_byte(&mut self, value: u8) {
        self.adopt(|| Self::Byte(value));
    }

    /// Replaces the value with a signed 16-bit integer.
    pub fn set_int16(&mut self, value: i16) {
        self.adopt(|| Self::Int16(value));
    }

    /// Replaces the value with an unsigned 16-bit integer.
    pub fn set_uint16(&mut self, value: u16) {
        self.adopt(|| Self::Uint16(value));
    }

    /// Replaces the value with a signed 32-bit integer.
    pub fn set_int32(&mut self, value: i32) {
        self.adopt(|| Self::Int32(value));
    }

    /// Replaces the value with an unsigned 32-bit integer.
    pub fn set_uint32(&mut self, value: u32) {
        self.adopt(|| Self::Uint32(value));
    }

    /// Replaces the value with a signed 64-bit integer.
    pub fn set_int64(&mut self, value: i64) {
        self.adopt(|| Self::Int64(value));
    }

    /// Replaces the value with an unsigned 64-bit integer.
    pub fn set_uint64(&mut self, value: u64) {
        self.adopt(|| Self::Uint64(value));
    }

    /// Replaces the value with a double.
    pub fn set_double(&mut self, value: f64) {
        self.adopt(|| Self::Double(value));
    }

    /// Stores a copy of `value`.
    pub fn set_string(&mut self, value: &str) {
        self.adopt(|| Self::String(value.to_owned()));
    }

    /// Stores a copy of `value` as an object path.
    pub fn set_object_path(&mut self, value: &str) {
        self.adopt(|| Self::ObjectPath(value.to_owned()));
    }

    /// Replaces the value with a byte sequence copied from `data`.
    ///
    /// # Errors
    ///
    /// On allocation failure the value is left [`Value::Invalid`].
    pub fn set_byte_array(&mut self, data: &[u8]) -> Result<(), AllocationError> {
        self.destroy();
        *self = Self::ByteArray(Sequence::from_slice(data)?);
        Ok(())
    }

    /// Replaces the value with a string sequence holding copies of `data`.
    ///
    /// # Errors
    ///
    /// On allocation failure the value is left [`Value::Invalid`].
    pub fn set_string_array<S: AsRef<str>>(&mut self, data: &[S]) -> Result<(), AllocationError> {
        self.destroy();
        let mut items = Sequence::new();
        for item in data {
            items.push(item.as_ref().to_owned())?;
        }
        *self = Self::StringArray(items);
        Ok(())
    }

    /// Appends to an existing byte sequence.
    ///
    /// # Errors
    ///
    /// Fails with [`ValueError::NotASequence`] unless the value already is a
    /// byte sequence; the value is then left untouched.
    pub fn append_byte(&mut self, byte: u8) -> Result<(), ValueError> {
        match self {
            Self::ByteArray(items) => Ok(items.push(byte)?),
            other => Err(ValueError::NotASequence {
                element: Kind::Byte,
                found: other.signature().unwrap_or_else(|| other.kind().as_str()),
            }),
        }
    }

    /// Appends a copy of `text` to an existing string sequence.
    ///
    /// # Errors
    ///
    /// Fails with [`ValueError::NotASequence`] unless the value already is a
    /// string sequence; the value is then left untouched.
    pub fn append_string(&mut self, text: &str) -> Result<(), ValueError> {
        match self {
            Self::StringArray(items) => Ok(items.push(text.to_owned())?),
            other => Err(ValueError::NotASequence {
                element: Kind::String,
                found: other.signature().unwrap_or_else(|| other.kind().as_str()),
            }),
        }
    }

    /// Human-readable rendering used in logs and diagnostics.
    #[must_use]
    pub fn describe(&self) -> Cow<'_, str> {
        match self {
            Self::String(text) | Self::ObjectPath(text) => Cow::Borrowed(text),
            Self::Byte(value) => Cow::Owned(format!("0x{value:02x}")),
            Self::Bool(value) => Cow::Borrowed(if *value { "true" } else { "false" }),
            Self::Int16(value) => Cow::Owned(value.to_string()),
            Self::Uint16(value) => Cow::Owned(value.to_string()),
            Self::Int32(value) => Cow::Owned(value.to_string()),
            Self::Uint32(value) => Cow::Owned(value.to_string()),
            Self::Int64(value) => Cow::Owned(value.to_string()),
            Self::Uint64(value) => Cow::Owned(value.to_string()),
            _ => Cow::Borrowed(UNKNOWN_TYPE),
        }
    }

    /// Wire signature: a scalar code, `ay`/`as`/`av` for sequences. A bare
    /// [`Value::Variant`] has no signature of its own, so it and an invalid
    /// value give `None`.
    #[must_use]
    pub const fn signature(&self) -> Option<&'static str> {
        match self {
            Self::Invalid => None,
            Self::Bool(_) => Some("b"),
            Self::Byte(_) => Some("y"),
            Self::Int16(_) => Some("n"),
            Self::Uint16(_) => Some("q"),
            Self::Int32(_) => Some("i"),
            Self::Uint32(_) => Some("u"),
            Self::Int64(_) => Some("x"),
            Self::Uint64(_) => Some("t"),
            Self::Double(_) => Some("d"),
            Self::String(_) => Some("s"),
            Self::ObjectPath(_) => Some("o"),
            Self::ByteArray(_) => Some("ay"),
            Self::StringArray(_) => Some("as"),
            Self::VariantArray(_) => Some("av"),
            Self::Variant(_) => None,
        }
    }

    /// Removes one level of [`Value::Variant`] wrapping, if present.
    #[must_use]
    pub fn into_unwrapped(self) -> Self {
        match self {
            Self::Variant(inner) => *inner,
            other => other,
        }
    }

    /// Payload of a boolean value.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Payload of an unsigned 32-bit value.
    #[must_use]
    pub const fn as_u32(&self) -> Option<u32> {
        match self {
            Self::Uint32(value) => Some(*value),
            _ => None,
        }
    }

    /// Text of a string or object-path value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(text) | Self::ObjectPath(text) => Some(text),
            _ => None,
        }
    }

    /// Elements of a byte sequence.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::ByteArray(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Elements of a string sequence.
    #[must_use]
    pub fn as_strings(&self) -> Option<&[String]> {
        match self {
            Self::StringArray(items) => Some(items.as_slice()),
            _ => None,
        }
    }
}

macro_rules! value_from {
    ($($source:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$source> for Value {
                fn from(value: $source) -> Self {
                    Self::$variant(value)
                }
            }
        )*
    };
}

value_from! {
    bool => Bool,
    u8 => Byte,
    i16 => Int16,
    u16 => Uint16,
    i32 => Int32,
    u32 => Uint32,
    i64 => Int64,
    u64 => Uint64,
    f64 => Double,
    String => String,
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

/// Takes at most `max` arguments, drilling into one level of variant
/// wrapping on each.
pub fn unwrap_arguments<I>(arguments: I, max: usize) -> Vec<Value>
where
    I: IntoIterator<Item = Value>,
{
    arguments
        .into_iter()
        .take(max)
        .map(Value::into_unwrapped)
        .collect()
}

#[cfg(test)]
#[path = "value_tests.rs"]
mod tests;
