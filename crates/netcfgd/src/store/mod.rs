//! Interface stores backing the `/system` and `/config` namespaces.

mod file;
mod memory;

use std::io;

use camino::Utf8PathBuf;
use netcfg_rest::{DocumentError, HandlerError};
use thiserror::Error;

use crate::interface::{Interface, InterfaceError};

pub use self::file::FileStore;
pub use self::memory::MemoryStore;

pub(crate) const STORE_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::store");

/// Failures reading or writing a store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The name cannot be used as a store key.
    #[error("invalid interface name \"{name}\"")]
    InvalidName {
        /// Offending name.
        name: String,
    },
    /// Reading or writing a stored file failed.
    #[error("cannot access {path}: {source}")]
    Io {
        /// File or directory involved.
        path: Utf8PathBuf,
        /// I/O failure.
        #[source]
        source: io::Error,
    },
    /// A stored file is not a well-formed document.
    #[error("cannot parse {path}: {source}")]
    Document {
        /// Stored file.
        path: Utf8PathBuf,
        /// Parse failure.
        #[source]
        source: DocumentError,
    },
    /// A stored file does not describe a valid interface.
    #[error("bad interface definition in {path}: {source}")]
    Definition {
        /// Stored file.
        path: Utf8PathBuf,
        /// Interface failure.
        #[source]
        source: InterfaceError,
    },
    /// A thread panicked while holding the registry lock.
    #[error("interface store lock poisoned")]
    Poisoned,
}

impl From<StoreError> for HandlerError {
    fn from(error: StoreError) -> Self {
        Self::failed(error.to_string())
    }
}

/// A keyed collection of interfaces.
pub trait InterfaceStore {
    /// Every stored interface, ordered by name.
    fn list(&self) -> Result<Vec<Interface>, StoreError>;

    /// The interface called `name`, if stored.
    fn get(&self, name: &str) -> Result<Option<Interface>, StoreError>;

    /// Inserts or replaces `interface`.
    fn put(&self, interface: Interface) -> Result<(), StoreError>;

    /// Removes `name`; `false` when nothing was stored under it.
    fn delete(&self, name: &str) -> Result<bool, StoreError>;
}

/// Interface names become file names, so they must be a single path
/// component that is neither hidden nor empty.
pub(crate) fn check_name(name: &str) -> Result<(), StoreError> {
    if name.is_empty() || name.starts_with('.') || name.contains(['/', '\0']) {
        return Err(StoreError::InvalidName {
            name: name.to_owned(),
        });
    }
    Ok(())
}
