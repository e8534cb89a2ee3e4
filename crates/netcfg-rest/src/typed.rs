//! Typed property elements inside XML bodies.
//!
//! A property is an element whose `type` attribute holds the value's wire
//! signature, for example `<mtu type="u">1500</mtu>`. Elements without the
//! attribute are strings. Byte arrays are colon-separated hex, string and
//! variant arrays use one child element per item, and `type="v"` wraps a
//! single inner typed element.

use std::str::FromStr;

use netcfg_variant::{
    AllocationError, DictEntry, INVALID_ARGS, PropertyError, PropertySource, Sequence, Value,
};
use thiserror::Error;

use crate::document::XmlNode;
use crate::errors::HandlerError;

/// Attribute carrying the signature.
pub const TYPE_ATTR: &str = "type";
/// Element name used for array items.
pub const ITEM_ELEMENT: &str = "e";

/// A property element that does not describe a valid value.
#[derive(Debug, Error)]
pub enum TypedValueError {
    /// The `type` attribute names no supported signature.
    #[error("property \"{name}\" has unsupported type \"{signature}\"")]
    UnknownSignature {
        /// Element name.
        name: String,
        /// Signature as written.
        signature: String,
    },
    /// The element text does not parse as its declared type.
    #[error("property \"{name}\" of type \"{signature}\" has invalid content \"{text}\"")]
    BadScalar {
        /// Element name.
        name: String,
        /// Declared signature.
        signature: &'static str,
        /// Offending text.
        text: String,
    },
    /// A `type="v"` element without an inner element.
    #[error("variant property \"{name}\" carries no value")]
    EmptyVariant {
        /// Element name.
        name: String,
    },
    /// An array value could not be allocated.
    #[error(transparent)]
    Allocation(#[from] AllocationError),
}

impl From<TypedValueError> for HandlerError {
    fn from(error: TypedValueError) -> Self {
        Self::new(INVALID_ARGS, error.to_string())
    }
}

fn parse_scalar<T: FromStr>(
    node: &XmlNode,
    signature: &'static str,
    text: &str,
) -> Result<T, TypedValueError> {
    text.parse().map_err(|_| bad_scalar(node, signature, text))
}

fn bad_scalar(node: &XmlNode, signature: &'static str, text: &str) -> TypedValueError {
    TypedValueError::BadScalar {
        name: node.name().to_owned(),
        signature,
        text: text.to_owned(),
    }
}

fn parse_bool(node: &XmlNode, text: &str) -> Result<bool, TypedValueError> {
    match text {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(bad_scalar(node, "b", text)),
    }
}

fn parse_byte(text: &str) -> Option<u8> {
    match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16).ok(),
        None => text.parse().ok(),
    }
}

fn parse_hex_bytes(node: &XmlNode, text: &str) -> Result<Vec<u8>, TypedValueError> {
    if text.is_empty() {
        return Ok(Vec::new());
    }
    text.split(':')
        .map(|part| u8::from_str_radix(part, 16).map_err(|_| bad_scalar(node, "ay", text)))
        .collect()
}

/// Decodes the value described by `node`.
///
/// # Errors
///
/// Returns [`TypedValueError`] for unknown signatures, unparsable scalar
/// text, or an empty variant.
pub fn decode_value(node: &XmlNode) -> Result<Value, TypedValueError> {
    let text = node.text().unwrap_or_default().trim();
    let signature = node.attr(TYPE_ATTR).unwrap_or("s");
    let value = match signature {
        "b" => Value::Bool(parse_bool(node, text)?),
        "y" => Value::Byte(parse_byte(text).ok_or_else(|| bad_scalar(node, "y", text))?),
        "n" => Value::Int16(parse_scalar(node, "n", text)?),
        "q" => Value::Uint16(parse_scalar(node, "q", text)?),
        "i" => Value::Int32(parse_scalar(node, "i", text)?),
        "u" => Value::Uint32(parse_scalar(node, "u", text)?),
        "x" => Value::Int64(parse_scalar(node, "x", text)?),
        "t" => Value::Uint64(parse_scalar(node, "t", text)?),
        "d" => Value::Double(parse_scalar(node, "d", text)?),
        "s" => Value::String(node.text().unwrap_or_default().to_owned()),
        "o" => Value::ObjectPath(text.to_owned()),
        "ay" => {
            let mut value = Value::default();
            value.set_byte_array(&parse_hex_bytes(node, text)?)?;
            value
        }
        "as" => {
            let items: Vec<&str> = node
                .children()
                .iter()
                .map(|item| item.text().unwrap_or_default())
                .collect();
            let mut value = Value::default();
            value.set_string_array(&items)?;
            value
        }
        "av" => {
            let mut items = Sequence::new();
            for item in node.children() {
                items.push(decode_value(item)?)?;
            }
            Value::VariantArray(items)
        }
        "v" => {
            let inner = node
                .children()
                .first()
                .ok_or_else(|| TypedValueError::EmptyVariant {
                    name: node.name().to_owned(),
                })?;
            Value::Variant(Box::new(decode_value(inner)?))
        }
        other => {
            return Err(TypedValueError::UnknownSignature {
                name: node.name().to_owned(),
                signature: other.to_owned(),
            });
        }
    };
    Ok(value)
}

/// Failure applying a typed property element.
#[derive(Debug, Error)]
pub enum TypedPropertyError {
    /// The element does not describe a valid value.
    #[error(transparent)]
    Decode(#[from] TypedValueError),
    /// The decoded value was rejected by its handler.
    #[error(transparent)]
    Property(#[from] PropertyError),
}

impl From<TypedPropertyError> for HandlerError {
    fn from(error: TypedPropertyError) -> Self {
        match error {
            TypedPropertyError::Decode(inner) => inner.into(),
            TypedPropertyError::Property(inner) => inner.into(),
        }
    }
}

/// A child element read as a dictionary entry only when a handler claims it.
#[derive(Debug, Clone, Copy)]
pub struct TypedProperty<'a> {
    node: &'a XmlNode,
}

impl PropertySource for TypedProperty<'_> {
    type Error = TypedPropertyError;

    fn name(&self) -> &str {
        self.node.name()
    }

    fn decode(self) -> Result<DictEntry, TypedPropertyError> {
        let value = decode_value(self.node)?;
        Ok(DictEntry::new(self.node.name(), value))
    }
}

/// The children of `parent` as lazily decoded dictionary entries named
/// after each child element.
pub fn typed_properties(parent: &XmlNode) -> impl Iterator<Item = TypedProperty<'_>> {
    parent
        .children()
        .iter()
        .map(|node| TypedProperty { node })
}

fn scalar_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::Bool(flag) => flag.to_string(),
        Value::Double(number) => number.to_string(),
        Value::Byte(_)
        | Value::Int16(_)
        | Value::Uint16(_)
        | Value::Int32(_)
        | Value::Uint32(_)
        | Value::Int64(_)
        | Value::Uint64(_)
        | Value::String(_)
        | Value::ObjectPath(_) => value.describe().into_owned(),
        _ => return None,
    };
    Some(text)
}

/// Encodes `value` as an element called `name`; `None` for an invalid value.
#[must_use]
pub fn encode_value(name: &str, value: &Value) -> Option<XmlNode> {
    if let Value::Variant(inner) = value {
        let node = XmlNode::new(name).with_attr(TYPE_ATTR, "v");
        return Some(node.with_child(encode_value(ITEM_ELEMENT, inner)?));
    }
    let signature = value.signature()?;
    let mut node = XmlNode::new(name).with_attr(TYPE_ATTR, signature);
    match value {
        Value::ByteArray(bytes) => {
            let text: Vec<String> = bytes.iter().map(|byte| format!("{byte:02x}")).collect();
            node.set_text(text.join(":"));
        }
        Value::StringArray(items) => {
            for item in items {
                node.push_child(XmlNode::new(ITEM_ELEMENT).with_text(item.as_str()));
            }
        }
        Value::VariantArray(items) => {
            for item in items {
                node.push_child(encode_value(ITEM_ELEMENT, item)?);
            }
        }
        scalar => node.set_text(scalar_text(scalar)?),
    }
    Some(node)
}

#[cfg(test)]
mod tests {
    use netcfg_variant::Kind;
    use rstest::rstest;

    use super::*;

    fn element(xml: &str) -> XmlNode {
        XmlNode::scan(xml)
            .expect("xml")
            .into_single_element()
            .expect("one element")
    }

    #[rstest]
    #[case::uint32("<mtu type=\"u\">1500</mtu>", Value::Uint32(1500))]
    #[case::boolean("<up type=\"b\">true</up>", Value::Bool(true))]
    #[case::numeric_bool("<up type=\"b\">0</up>", Value::Bool(false))]
    #[case::byte("<ttl type=\"y\">0x40</ttl>", Value::Byte(64))]
    #[case::int16("<metric type=\"n\">-5</metric>", Value::Int16(-5))]
    #[case::untyped("<alias>uplink</alias>", Value::from("uplink"))]
    #[case::empty_string("<alias type=\"s\"/>", Value::from(""))]
    #[case::padded_string("<alias> a </alias>", Value::from(" a "))]
    #[case::padded_number("<mtu type=\"u\"> 1500\n</mtu>", Value::Uint32(1500))]
    #[case::object_path("<ref type=\"o\">/org/netcfg/1</ref>", Value::ObjectPath("/org/netcfg/1".into()))]
    fn scalars_decode(#[case] xml: &str, #[case] expected: Value) {
        assert_eq!(decode_value(&element(xml)).expect("decode"), expected);
    }

    #[test]
    fn byte_arrays_decode_from_hex() {
        let value = decode_value(&element("<hwaddr type=\"ay\">00:1b:21:0A:ff:01</hwaddr>"))
            .expect("decode");
        assert_eq!(value.as_bytes(), Some(&[0x00, 0x1b, 0x21, 0x0a, 0xff, 0x01][..]));
    }

    #[test]
    fn string_arrays_decode_from_items() {
        let value = decode_value(&element(
            "<addresses type=\"as\"><e>10.0.0.1/24</e><e>fe80::1/64</e></addresses>",
        ))
        .expect("decode");
        assert_eq!(
            value.as_strings(),
            Some(&["10.0.0.1/24".to_owned(), "fe80::1/64".to_owned()][..])
        );
    }

    #[test]
    fn variant_entries_are_unwrapped_once() {
        let parent = element("<interface><mtu type=\"v\"><e type=\"u\">9000</e></mtu></interface>");
        let entries: Vec<DictEntry> = typed_properties(&parent)
            .map(|property| property.decode().expect("decode"))
            .collect();
        assert_eq!(entries, vec![DictEntry::new("mtu", Value::Uint32(9000))]);
        assert_eq!(entries.first().map(|entry| entry.value.kind()), Some(Kind::Uint32));
    }

    #[rstest]
    #[case::bad_int("<mtu type=\"u\">big</mtu>")]
    #[case::negative_unsigned("<mtu type=\"u\">-1</mtu>")]
    #[case::bad_hex("<hwaddr type=\"ay\">00:zz</hwaddr>")]
    #[case::unknown_type("<mtu type=\"a{sv}\">1</mtu>")]
    #[case::empty_variant("<mtu type=\"v\"/>")]
    fn invalid_elements_are_rejected(#[case] xml: &str) {
        let error = decode_value(&element(xml)).expect_err("invalid");
        assert_eq!(HandlerError::from(error).error_name(), INVALID_ARGS);
    }

    #[rstest]
    #[case::scalar(Value::Uint32(1500))]
    #[case::flag(Value::Bool(false))]
    #[case::text(Value::from("uplink"))]
    #[case::byte(Value::Byte(7))]
    fn encoded_scalars_decode_back(#[case] value: Value) {
        let node = encode_value("p", &value).expect("encodable");
        assert_eq!(decode_value(&node).expect("decode"), value);
    }

    #[test]
    fn encoded_arrays_decode_back() {
        let mut bytes = Value::default();
        bytes.set_byte_array(&[0, 0x1b, 0xff]).expect("bytes");
        let node = encode_value("hwaddr", &bytes).expect("encodable");
        assert_eq!(node.text(), Some("00:1b:ff"));
        assert_eq!(decode_value(&node).expect("decode"), bytes);

        let mut strings = Value::default();
        strings.set_string_array(&["a", "b"]).expect("strings");
        let node = encode_value("addresses", &strings).expect("encodable");
        assert_eq!(node.children().len(), 2);
        assert_eq!(decode_value(&node).expect("decode"), strings);
    }

    #[test]
    fn variants_encode_as_wrapped_elements() {
        let value = Value::Variant(Box::new(Value::Uint32(1280)));
        let node = encode_value("mtu", &value).expect("encodable");
        assert_eq!(node.attr(TYPE_ATTR), Some("v"));
        assert_eq!(node.child(ITEM_ELEMENT).and_then(|item| item.attr(TYPE_ATTR)), Some("u"));
        assert_eq!(decode_value(&node).expect("decode"), value);
        assert_eq!(encode_value("x", &Value::Variant(Box::new(Value::Invalid))), None);
    }

    #[test]
    fn invalid_values_are_not_encoded() {
        assert_eq!(encode_value("x", &Value::Invalid), None);
    }
}
