//! State shared by every request handler.

use camino::{Utf8Path, Utf8PathBuf};
use netcfg_rest::Request;

use crate::hostname::HostnameSource;
use crate::store::{FileStore, MemoryStore};

/// Request option overriding the configuration store directory.
pub const ROOT_OPTION: &str = "root";

/// Default location of the kernel's interface directory.
pub const SYSFS_NET: &str = "/sys/class/net";

/// What the daemon's route handlers operate on.
pub struct DaemonState {
    system: MemoryStore,
    config_root: Utf8PathBuf,
    hostname: Box<dyn HostnameSource>,
}

impl DaemonState {
    /// State over the live `system` registry, the default `config_root` and a `hostname` source.
    pub fn new(
        system: MemoryStore,
        config_root: impl Into<Utf8PathBuf>,
        hostname: Box<dyn HostnameSource>,
    ) -> Self {
        Self {
            system,
            config_root: config_root.into(),
            hostname,
        }
    }

    /// Live interface registry behind `/system/interface`.
    #[must_use]
    pub fn system(&self) -> &MemoryStore {
        &self.system
    }

    /// Default directory behind `/config/interface`.
    #[must_use]
    pub fn config_root(&self) -> &Utf8Path {
        &self.config_root
    }

    /// Configuration store for `request`, honouring its `root` option.
    #[must_use]
    pub fn config_store(&self, request: &Request) -> FileStore {
        request
            .option(ROOT_OPTION)
            .map_or_else(|| FileStore::new(self.config_root.clone()), FileStore::new)
    }

    /// Source behind `/system/hostname`.
    #[must_use]
    pub fn hostname(&self) -> &dyn HostnameSource {
        self.hostname.as_ref()
    }
}

impl std::fmt::Debug for DaemonState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DaemonState")
            .field("system", &self.system)
            .field("config_root", &self.config_root)
            .finish_non_exhaustive()
    }
}
