//! Mapping of symbolic error names to local errno values.

use nix::errno::Errno;
use tracing::{debug, warn};

const TRANSLATE_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::errors");

/// Peer lacks permission for the requested operation.
pub const ACCESS_DENIED: &str = "org.freedesktop.DBus.Error.AccessDenied";
/// Arguments were malformed or of the wrong type.
pub const INVALID_ARGS: &str = "org.freedesktop.DBus.Error.InvalidArgs";
/// The addressed method does not exist.
pub const UNKNOWN_METHOD: &str = "org.freedesktop.DBus.Error.UnknownMethod";

/// An error reported by a peer: a symbolic name and a human-readable text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedError {
    /// Dotted symbolic name such as [`INVALID_ARGS`].
    pub name: String,
    /// Message accompanying the error.
    pub message: String,
}

impl NamedError {
    /// Builds an error from its parts.
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }
}

/// Ordered name to errno table. Earlier entries shadow later ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorMap {
    entries: Vec<(String, Errno)>,
}

impl ErrorMap {
    /// Empty table.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends an entry, returning the table for chaining.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, code: Errno) -> Self {
        self.entries.push((name.into(), code));
        self
    }

    /// The first code registered for `name`.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<Errno> {
        self.entries
            .iter()
            .find(|(candidate, _)| candidate == name)
            .map(|(_, code)| *code)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resolves [`NamedError`]s against a caller table and a builtin table.
#[derive(Debug, Clone)]
pub struct ErrorTranslator {
    builtin: ErrorMap,
}

impl Default for ErrorTranslator {
    fn default() -> Self {
        Self {
            builtin: ErrorMap::new()
                .with(ACCESS_DENIED, Errno::EACCES)
                .with(INVALID_ARGS, Errno::EINVAL)
                .with(UNKNOWN_METHOD, Errno::EOPNOTSUPP),
        }
    }
}

impl ErrorTranslator {
    /// Translator using `builtin` in place of the default table.
    #[must_use]
    pub const fn with_builtin(builtin: ErrorMap) -> Self {
        Self { builtin }
    }

    /// Maps `error` to an errno.
    ///
    /// `caller` is searched first, then the builtin table. Unknown names
    /// produce a warning and [`Errno::EIO`].
    #[must_use]
    pub fn translate(&self, error: &NamedError, caller: Option<&ErrorMap>) -> Errno {
        let found = caller
            .and_then(|map| map.lookup(&error.name))
            .or_else(|| self.builtin.lookup(&error.name));
        if let Some(code) = found {
            debug!(
                target: TRANSLATE_TARGET,
                name = %error.name,
                message = %error.message,
                errno = %code,
                "translated error"
            );
            return code;
        }
        warn!(
            target: TRANSLATE_TARGET,
            name = %error.name,
            message = %error.message,
            "cannot translate error; using EIO"
        );
        Errno::EIO
    }
}
