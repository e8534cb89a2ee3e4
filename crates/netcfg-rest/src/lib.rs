//! Request routing and the netcfg wire protocol.
//!
//! A [`Request`] names a [`Verb`] and a slash-separated path and carries
//! options plus an optional XML body. The daemon decodes requests with
//! [`parse_request`] and routes them through a [`DispatchTree`] via
//! [`call_direct`]; clients ship them over a socket with [`call_indirect`].

mod call;
mod dispatch;
mod document;
mod errors;
mod request;
mod transport;
mod typed;
mod verb;
mod wire;

pub use call::{call_direct, call_indirect};
pub use dispatch::{
    DispatchContext, DispatchTree, HandlerFn, MAX_CHILDREN, META_ELEMENT, MethodTable, Node,
    NodeBuilder, ROOT_NAME,
};
pub use document::{DocumentError, XmlNode};
pub use errors::{
    CallError, FAILED, HandlerError, IO_ERROR, NO_SERVER, RequestError, TransportError, TreeError,
    UNKNOWN_OBJECT, WireError,
};
pub use request::Request;
pub use transport::{CONNECTION_TIMEOUT, Connection, connect};
pub use typed::{
    ITEM_ELEMENT, TYPE_ATTR, TypedProperty, TypedPropertyError, TypedValueError, decode_value,
    encode_value, typed_properties,
};
pub use verb::Verb;
pub use wire::{
    MAX_BODY_BYTES, MAX_LINE_BYTES, MAX_OPTIONS, parse_request, read_response, write_request,
    write_response,
};
