//! The interface model shared by the live registry and the config store.
//!
//! On the wire an interface is an `<interface name="...">` element whose
//! children are typed properties (see `netcfg_rest::decode_value`). Updates
//! are applied through the property processor, so an element only needs to
//! carry the properties it changes.

use netcfg_rest::{
    HandlerError, TypedPropertyError, TypedValueError, XmlNode, encode_value, typed_properties,
};
use netcfg_variant::{
    AllocationError, DictEntry, HandlerSpec, Kind, PropertyError, Value, process_properties,
};
use thiserror::Error;

/// Element name of one interface.
pub const INTERFACE_ELEMENT: &str = "interface";
/// Element name of an interface listing.
pub const INTERFACES_ELEMENT: &str = "interfaces";
/// Attribute holding the interface name.
pub const NAME_ATTR: &str = "name";

const HWADDR_MIN: usize = 6;
const HWADDR_MAX: usize = 20;

/// Reasons an interface element cannot be applied or rendered.
#[derive(Debug, Error)]
pub enum InterfaceError {
    /// The element carries no `name` attribute.
    #[error("interface element has no name")]
    MissingName,
    /// A claimed property element does not describe a valid value.
    #[error(transparent)]
    Decode(#[from] TypedValueError),
    /// A property has the wrong type or length.
    #[error(transparent)]
    Property(#[from] PropertyError),
    /// An array property could not be allocated.
    #[error(transparent)]
    Allocation(#[from] AllocationError),
}

impl From<TypedPropertyError> for InterfaceError {
    fn from(error: TypedPropertyError) -> Self {
        match error {
            TypedPropertyError::Decode(inner) => Self::Decode(inner),
            TypedPropertyError::Property(inner) => Self::Property(inner),
        }
    }
}

impl From<InterfaceError> for HandlerError {
    fn from(error: InterfaceError) -> Self {
        match error {
            InterfaceError::Decode(inner) => inner.into(),
            InterfaceError::Property(inner) => inner.into(),
            other @ (InterfaceError::MissingName | InterfaceError::Allocation(_)) => {
                Self::failed(other.to_string())
            }
        }
    }
}

/// Configuration of one network interface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Interface {
    /// Interface name, unique within a registry or store.
    pub name: String,
    /// Maximum transmission unit, when configured.
    pub mtu: Option<u32>,
    /// Administrative state.
    pub up: bool,
    /// Free-form label.
    pub alias: Option<String>,
    /// Hardware address, empty when unset.
    pub hwaddr: Vec<u8>,
    /// Addresses in CIDR notation.
    pub addresses: Vec<String>,
}

fn set_mtu(entry: &DictEntry, interface: &mut Interface) {
    interface.mtu = entry.value.as_u32();
}

fn set_up(entry: &DictEntry, interface: &mut Interface) {
    interface.up = entry.value.as_bool().unwrap_or_default();
}

fn set_alias(entry: &DictEntry, interface: &mut Interface) {
    interface.alias = entry.value.as_str().map(str::to_owned);
}

fn set_hwaddr(entry: &DictEntry, interface: &mut Interface) {
    interface.hwaddr = entry.value.as_bytes().map(<[u8]>::to_vec).unwrap_or_default();
}

fn set_addresses(entry: &DictEntry, interface: &mut Interface) {
    interface.addresses = entry.value.as_strings().map(<[String]>::to_vec).unwrap_or_default();
}

/// Properties an interface element may carry, with their required types.
#[must_use]
pub fn property_handlers() -> [HandlerSpec<Interface>; 5] {
    [
        HandlerSpec::scalar("mtu", Kind::Uint32, set_mtu),
        HandlerSpec::scalar("up", Kind::Bool, set_up),
        HandlerSpec::scalar("alias", Kind::String, set_alias),
        HandlerSpec::array("hwaddr", Kind::Byte, HWADDR_MIN, HWADDR_MAX, set_hwaddr),
        HandlerSpec::array("addresses", Kind::String, 0, 0, set_addresses),
    ]
}

impl Interface {
    /// An interface named `name` with every property unset.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Builds an interface from a complete `<interface>` element.
    ///
    /// # Errors
    ///
    /// Fails when the element has no `name` attribute or a property is
    /// malformed or of the wrong type.
    pub fn from_xml(element: &XmlNode) -> Result<Self, InterfaceError> {
        let name = element.attr(NAME_ATTR).ok_or(InterfaceError::MissingName)?;
        let mut interface = Self::new(name);
        interface.apply(element)?;
        Ok(interface)
    }

    /// Applies the typed properties found under `element`.
    ///
    /// Children run through the processor in document order. Elements no
    /// handler claims are skipped without being decoded. The first decode,
    /// type or length failure stops processing; properties before it remain
    /// applied.
    ///
    /// # Errors
    ///
    /// See [`InterfaceError`].
    pub fn apply(&mut self, element: &XmlNode) -> Result<(), InterfaceError> {
        process_properties(typed_properties(element), &property_handlers(), self)
            .map_err(InterfaceError::from)
    }

    /// Renders the interface as an `<interface>` element.
    ///
    /// # Errors
    ///
    /// Fails only when an array property cannot be allocated.
    pub fn to_xml(&self) -> Result<XmlNode, InterfaceError> {
        let mut node = XmlNode::new(INTERFACE_ELEMENT).with_attr(NAME_ATTR, self.name.as_str());
        let mut properties = Vec::with_capacity(5);
        if let Some(mtu) = self.mtu {
            properties.push(("mtu", Value::from(mtu)));
        }
        properties.push(("up", Value::from(self.up)));
        if let Some(alias) = &self.alias {
            properties.push(("alias", Value::from(alias.as_str())));
        }
        if !self.hwaddr.is_empty() {
            let mut hwaddr = Value::default();
            hwaddr.set_byte_array(&self.hwaddr)?;
            properties.push(("hwaddr", hwaddr));
        }
        if !self.addresses.is_empty() {
            let mut addresses = Value::default();
            addresses.set_string_array(&self.addresses)?;
            properties.push(("addresses", addresses));
        }
        for (name, value) in &properties {
            if let Some(child) = encode_value(name, value) {
                node.push_child(child);
            }
        }
        Ok(node)
    }
}

/// Renders `interfaces` as an `<interfaces>` listing.
///
/// # Errors
///
/// Propagates [`Interface::to_xml`] failures.
pub fn listing<'a, I>(interfaces: I) -> Result<XmlNode, InterfaceError>
where
    I: IntoIterator<Item = &'a Interface>,
{
    let mut node = XmlNode::new(INTERFACES_ELEMENT);
    for interface in interfaces {
        node.push_child(interface.to_xml()?);
    }
    Ok(node)
}

/// Finds the `<interface name="{name}">` element in a request body.
///
/// The element may sit directly under the document root or inside an
/// `<interfaces>` listing.
#[must_use]
pub fn find_element<'a>(document: &'a XmlNode, name: &str) -> Option<&'a XmlNode> {
    let named = |node: &&XmlNode| node.name() == INTERFACE_ELEMENT && node.attr(NAME_ATTR) == Some(name);
    document.children().iter().find(named).or_else(|| {
        document
            .children()
            .iter()
            .filter(|node| node.name() == INTERFACES_ELEMENT)
            .find_map(|listing| listing.children().iter().find(named))
    })
}
