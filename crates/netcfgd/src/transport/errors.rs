//! Error types for socket listener operations.

use std::io;
use std::net::SocketAddr;

use thiserror::Error;

/// Errors surfaced while binding or running the socket listener.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// Resolving the TCP host failed.
    #[error("failed to resolve TCP address {host}:{port}: {source}")]
    Resolve {
        /// Host as configured.
        host: String,
        /// Port as configured.
        port: u16,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The TCP host resolved to no addresses.
    #[error("no TCP addresses resolved for {host}:{port}")]
    ResolveEmpty {
        /// Host as configured.
        host: String,
        /// Port as configured.
        port: u16,
    },
    /// Binding the TCP listener failed.
    #[error("failed to bind TCP listener at {addr}: {source}")]
    BindTcp {
        /// Resolved address.
        addr: SocketAddr,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The listener could not be switched to non-blocking accepts.
    #[error("failed to enable non-blocking accept on {endpoint}: {source}")]
    NonBlocking {
        /// Endpoint as rendered.
        endpoint: String,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// Unix sockets are unavailable on this platform.
    #[cfg(not(unix))]
    #[error("unix sockets are unsupported for endpoint {endpoint}")]
    UnsupportedUnix {
        /// Endpoint as rendered.
        endpoint: String,
    },
    /// Binding the Unix listener failed.
    #[cfg(unix)]
    #[error("failed to bind unix listener at {path}: {source}")]
    BindUnix {
        /// Socket path.
        path: String,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// A live daemon already answers on the socket path.
    #[cfg(unix)]
    #[error("another daemon is already serving {path}")]
    UnixInUse {
        /// Socket path.
        path: String,
    },
    /// The socket path is occupied by something other than a socket.
    #[cfg(unix)]
    #[error("{path} exists and is not a socket")]
    UnixNotSocket {
        /// Socket path.
        path: String,
    },
    /// The existing socket path could not be inspected.
    #[cfg(unix)]
    #[error("failed to inspect {path}: {source}")]
    UnixMetadata {
        /// Socket path.
        path: String,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// Checking whether an existing socket is live failed.
    #[cfg(unix)]
    #[error("failed to check existing socket {path}: {source}")]
    UnixConnect {
        /// Socket path.
        path: String,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// A stale socket could not be removed.
    #[cfg(unix)]
    #[error("failed to remove stale socket {path}: {source}")]
    UnixCleanup {
        /// Socket path.
        path: String,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The accept loop thread panicked.
    #[error("listener thread panicked")]
    ThreadPanic,
}
