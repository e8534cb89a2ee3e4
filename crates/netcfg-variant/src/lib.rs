//! Dynamically typed values exchanged between netcfg processes.
//!
//! A [`Value`] carries exactly one typed payload, identified on the wire by
//! a one- or two-character signature (`u`, `s`, `ay`, ...). Typed property
//! dictionaries are applied to caller state through [`process_properties`],
//! and symbolic error names reported by peers are mapped to local error
//! codes by an [`ErrorTranslator`].

mod error_map;
mod errors;
mod kind;
mod properties;
mod sequence;
mod value;

pub use error_map::{
    ACCESS_DENIED, ErrorMap, ErrorTranslator, INVALID_ARGS, NamedError, UNKNOWN_METHOD,
};
pub use errors::{AllocationError, PropertyError, ValueError};
pub use kind::Kind;
pub use properties::{DictEntry, HandlerSpec, PropertySetter, PropertySource, process_properties};
pub use sequence::{ARRAY_CHUNK, Sequence, chunked_capacity};
pub use value::{UNKNOWN_TYPE, Value, unwrap_arguments};

/// Errno values produced by [`ErrorTranslator`], re-exported for callers.
pub use nix::errno::Errno;
