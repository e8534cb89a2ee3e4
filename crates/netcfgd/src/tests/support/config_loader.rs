//! Configuration loaders covering success and failure paths.

use std::ffi::OsString;
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use netcfg_config::{Config, LogFormat, SocketEndpoint};
use ortho_config::{OrthoConfig, OrthoError};
use tempfile::TempDir;

use crate::bootstrap::ConfigLoader;

/// Places the daemon socket and configuration store under a temporary
/// directory that lives as long as the loader.
pub struct TestConfigLoader {
    dir: TempDir,
}

impl TestConfigLoader {
    #[must_use]
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("temporary directory"),
        }
    }

    fn base(&self) -> &Utf8Path {
        Utf8Path::from_path(self.dir.path()).expect("temporary directory is UTF-8")
    }

    pub fn socket_path(&self) -> Utf8PathBuf {
        self.base().join("run").join("netcfgd.sock")
    }

    pub fn config_root(&self) -> Utf8PathBuf {
        self.base().join("etc")
    }
}

impl ConfigLoader for TestConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Ok(Config {
            daemon_socket: SocketEndpoint::unix(self.socket_path()),
            log_format: LogFormat::Compact,
            config_root: self.config_root(),
            ..Config::default()
        })
    }
}

/// Loader that fails by passing an unparsable socket on the command line.
pub struct FailingConfigLoader;

impl ConfigLoader for FailingConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Config::load_from_iter([
            OsString::from("netcfgd"),
            OsString::from("--daemon-socket"),
            OsString::from("ftp://socket"),
        ])
    }
}
