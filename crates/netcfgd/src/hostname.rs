//! Access to the system host name.

use nix::errno::Errno;
use thiserror::Error;

/// Failures reading or changing the host name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostnameError {
    /// Reading the host name failed.
    #[error("unable to get hostname: {source}")]
    Read {
        /// System error.
        #[source]
        source: Errno,
    },
    /// Setting the host name failed.
    #[error("unable to set hostname: {source}")]
    Write {
        /// System error.
        #[source]
        source: Errno,
    },
    /// The host name is not UTF-8.
    #[error("hostname is not valid UTF-8")]
    NotUtf8,
}

/// Where `/system/hostname` reads and writes the host name.
pub trait HostnameSource: Send + Sync {
    /// Current host name.
    fn hostname(&self) -> Result<String, HostnameError>;

    /// Replaces the host name.
    fn set_hostname(&self, name: &str) -> Result<(), HostnameError>;
}

/// The kernel's host name via `gethostname(2)` and `sethostname(2)`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemHostname;

impl HostnameSource for SystemHostname {
    fn hostname(&self) -> Result<String, HostnameError> {
        nix::unistd::gethostname()
            .map_err(|source| HostnameError::Read { source })?
            .into_string()
            .map_err(|_| HostnameError::NotUtf8)
    }

    fn set_hostname(&self, name: &str) -> Result<(), HostnameError> {
        nix::unistd::sethostname(name).map_err(|source| HostnameError::Write { source })
    }
}
