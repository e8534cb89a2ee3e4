//! Doubles shared by the CLI suites.

mod fake_daemon;

use std::ffi::OsString;

use netcfg_config::{Config, SocketEndpoint};

pub(in crate::tests) use fake_daemon::FakeDaemon;

use crate::config::ConfigLoader;
use crate::errors::AppError;

/// Loader returning a fixed configuration, ignoring the flags.
pub(in crate::tests) struct StaticConfigLoader {
    config: Config,
}

impl StaticConfigLoader {
    pub(in crate::tests) fn tcp(port: u16) -> Self {
        Self {
            config: Config {
                daemon_socket: SocketEndpoint::tcp("127.0.0.1", port),
                ..Config::default()
            },
        }
    }
}

impl ConfigLoader for StaticConfigLoader {
    fn load(&self, _args: &[OsString]) -> Result<Config, AppError> {
        Ok(self.config.clone())
    }
}
