//! Shared configuration for the netcfg daemon and command-line client.
//!
//! Values are layered by [`ortho_config`]: built-in defaults, then an optional
//! TOML file (`--config-path` or `NETCFG_CONFIG_PATH`), then `NETCFG_*`
//! environment variables, then command-line flags. Both binaries load the
//! same [`Config`] so they agree on where the daemon socket lives.

mod defaults;
mod logging;
mod socket;

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

pub use defaults::{
    DEFAULT_LOG_FILTER, DEFAULT_TCP_PORT, SOCKET_FILE_NAME, default_config_root,
    default_log_filter, default_log_filter_string, default_log_format, default_socket_endpoint,
};
pub use logging::{LogFormat, LogFormatParseError};
pub use socket::{SocketEndpoint, SocketParseError, SocketPreparationError};

/// Resolved configuration shared by `netcfgd` and `netcfg`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "NETCFG")]
pub struct Config {
    /// Endpoint the daemon listens on and clients connect to.
    #[ortho_config(default = default_socket_endpoint())]
    pub daemon_socket: SocketEndpoint,
    /// `tracing` filter expression, for example `info,netcfgd=debug`.
    #[ortho_config(default = default_log_filter_string())]
    pub log_filter: String,
    /// Output format of daemon log events.
    #[ortho_config(default = default_log_format())]
    pub log_format: LogFormat,
    /// Directory backing the `/config` namespace when a request carries no
    /// `root` option.
    #[ortho_config(default = default_config_root())]
    pub config_root: Utf8PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            daemon_socket: default_socket_endpoint(),
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
            config_root: default_config_root(),
        }
    }
}

impl Config {
    /// Socket the daemon binds and clients dial.
    #[must_use]
    pub fn daemon_socket(&self) -> &SocketEndpoint {
        &self.daemon_socket
    }

    /// Log filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Log output format.
    #[must_use]
    pub fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Default configuration-store directory.
    #[must_use]
    pub fn config_root(&self) -> &Utf8PathBuf {
        &self.config_root
    }
}
