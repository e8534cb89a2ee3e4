//! Error types for requests, the wire codec, dispatch and the call drivers.
//!
//! Every error that can end a call knows its symbolic error name so callers
//! can map it to an errno through [`netcfg_variant::ErrorTranslator`].

use std::io;

use netcfg_variant::{INVALID_ARGS, NamedError, PropertyError, UNKNOWN_METHOD};
use thiserror::Error;

use crate::document::DocumentError;
use crate::verb::Verb;

/// The addressed path does not exist.
pub const UNKNOWN_OBJECT: &str = "org.freedesktop.DBus.Error.UnknownObject";
/// Generic failure with no more specific name.
pub const FAILED: &str = "org.freedesktop.DBus.Error.Failed";
/// The daemon could not be reached.
pub const NO_SERVER: &str = "org.freedesktop.DBus.Error.NoServer";
/// Reading or writing the connection failed mid-call.
pub const IO_ERROR: &str = "org.freedesktop.DBus.Error.IOError";

/// Rejected request options.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// The name contains a line break.
    #[error("bad option name \"{name}\"")]
    BadOptionName {
        /// Offending name.
        name: String,
    },
    /// The value contains a line break.
    #[error("bad value for option {name}")]
    BadOptionValue {
        /// Name of the option.
        name: String,
    },
}

/// Failures encoding or decoding the line protocol.
#[derive(Debug, Error)]
pub enum WireError {
    /// The request could not be read from the connection.
    #[error("unable to read request from socket")]
    Unreadable {
        /// Read failure; `None` when the peer closed the connection.
        #[source]
        source: Option<io::Error>,
    },
    /// The request line is not `VERB PATH`.
    #[error("cannot parse REST request")]
    Unparseable,
    /// The request line names no known verb.
    #[error("unknown command \"{verb}\"")]
    UnknownVerb {
        /// Verb as received.
        verb: String,
    },
    /// A header line exceeds the line limit.
    #[error("request line exceeds {limit} bytes")]
    LineTooLong {
        /// Limit in bytes.
        limit: usize,
    },
    /// More option lines than allowed.
    #[error("request carries more than {limit} options")]
    TooManyOptions {
        /// Maximum option count.
        limit: usize,
    },
    /// An option line was rejected.
    #[error(transparent)]
    BadOption(#[from] RequestError),
    /// The body exceeds the body limit.
    #[error("request body exceeds {limit} bytes")]
    BodyTooLarge {
        /// Limit in bytes.
        limit: usize,
    },
    /// The body is not a well-formed document.
    #[error("unable to parse xml document")]
    BadDocument {
        /// Parse failure.
        #[source]
        source: DocumentError,
    },
    /// A request was written without a verb.
    #[error("request has no verb")]
    MissingVerb,
    /// Writing to the connection failed.
    #[error("write error on socket: {source}")]
    Write {
        /// Write failure.
        #[source]
        source: io::Error,
    },
    /// The connection closed before a status line arrived.
    #[error("error receiving response from server: EOF")]
    ResponseEof,
    /// The response body could not be read or parsed.
    #[error("error receiving response from server: {message}")]
    ResponseBody {
        /// Failure detail.
        message: String,
    },
}

impl WireError {
    pub(crate) const fn unreadable(source: io::Error) -> Self {
        Self::Unreadable {
            source: Some(source),
        }
    }

    /// Symbolic name reported for this failure.
    #[must_use]
    pub const fn error_name(&self) -> &'static str {
        match self {
            Self::Unreadable { .. }
            | Self::Write { .. }
            | Self::ResponseEof
            | Self::ResponseBody { .. } => IO_ERROR,
            _ => INVALID_ARGS,
        }
    }
}

/// Failures connecting to the daemon.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The TCP endpoint did not resolve.
    #[error("failed to resolve {endpoint}: {source}")]
    Resolve {
        /// Endpoint as rendered.
        endpoint: String,
        /// Resolution failure.
        #[source]
        source: io::Error,
    },
    /// Connecting to the endpoint failed.
    #[error("cannot connect to {endpoint}: {source}")]
    Connect {
        /// Endpoint as rendered.
        endpoint: String,
        /// Connection failure.
        #[source]
        source: io::Error,
    },
    /// Unix sockets are unavailable on this platform.
    #[error("unix sockets are unsupported on this platform: {endpoint}")]
    UnsupportedUnix {
        /// Endpoint as rendered.
        endpoint: String,
    },
}

/// Failure reported by a route handler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct HandlerError {
    name: &'static str,
    message: String,
}

impl HandlerError {
    /// An error called `name` carrying `message`.
    pub fn new(name: &'static str, message: impl Into<String>) -> Self {
        Self {
            name,
            message: message.into(),
        }
    }

    /// Failure without a more specific error name.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::new(FAILED, message)
    }

    /// The request's arguments or body were unacceptable.
    pub fn invalid_args(message: impl Into<String>) -> Self {
        Self::new(INVALID_ARGS, message)
    }

    /// Wire error name.
    #[must_use]
    pub const fn error_name(&self) -> &'static str {
        self.name
    }

    /// Human-readable detail.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<PropertyError> for HandlerError {
    fn from(error: PropertyError) -> Self {
        Self::new(error.error_name(), error.to_string())
    }
}

/// Build-time errors of a dispatch tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// Two children of one node share a name.
    #[error("node \"{parent}\" has two children named \"{name}\"")]
    DuplicateChild {
        /// Name of the parent node.
        parent: String,
        /// Repeated child name.
        name: String,
    },
    /// A node has more children than allowed.
    #[error("node \"{parent}\" has more than {max} children")]
    TooManyChildren {
        /// Name of the parent node.
        parent: String,
        /// Maximum child count.
        max: usize,
    },
    /// A child name is empty or contains `/`.
    #[error("child of node \"{parent}\" has an empty or separator-bearing name \"{name}\"")]
    InvalidName {
        /// Name of the parent node.
        parent: String,
        /// Offending child name.
        name: String,
    },
}

/// Outcome of a failed direct or indirect call.
#[derive(Debug, Error)]
pub enum CallError {
    /// Encoding or decoding the exchange failed.
    #[error(transparent)]
    Wire(#[from] WireError),
    /// The daemon could not be reached.
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// No node matches the path.
    #[error("unknown path \"{path}\"")]
    UnknownPath {
        /// Requested path.
        path: String,
    },
    /// The node has no handler for the verb.
    #[error("{verb} command not supported for this path")]
    MethodNotSupported {
        /// Requested verb.
        verb: Verb,
    },
    /// The handler failed.
    #[error(transparent)]
    Handler(#[from] HandlerError),
    /// The daemon answered with an error line.
    #[error("{message}")]
    Remote {
        /// Message from the status line.
        message: String,
    },
}

impl CallError {
    /// Symbolic name used for errno translation.
    #[must_use]
    pub const fn error_name(&self) -> &'static str {
        match self {
            Self::Wire(error) => error.error_name(),
            Self::Transport(_) => NO_SERVER,
            Self::UnknownPath { .. } => UNKNOWN_OBJECT,
            Self::MethodNotSupported { .. } => UNKNOWN_METHOD,
            Self::Handler(error) => error.error_name(),
            Self::Remote { .. } => FAILED,
        }
    }

    /// Name and message pair for [`netcfg_variant::ErrorTranslator`].
    #[must_use]
    pub fn to_named(&self) -> NamedError {
        NamedError::new(self.error_name(), self.to_string())
    }
}
