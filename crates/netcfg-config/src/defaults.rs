//! Built-in defaults applied before files, environment and flags.

use camino::Utf8PathBuf;
#[cfg(unix)]
use std::env;

#[cfg(unix)]
use dirs::runtime_dir;
#[cfg(unix)]
use libc::geteuid;

use crate::logging::LogFormat;
use crate::socket::SocketEndpoint;

/// TCP port used on platforms without Unix domain sockets.
pub const DEFAULT_TCP_PORT: u16 = 9779;

/// Filter expression installed when none is configured.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// File name of the daemon socket inside the runtime directory.
pub const SOCKET_FILE_NAME: &str = "netcfgd.sock";

/// Default log filter expression.
pub fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter, for serde and the config derive.
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format.
pub fn default_log_format() -> LogFormat {
    LogFormat::Json
}

/// Default directory backing the `/config` namespace when no `root` option
/// is supplied with a request.
pub fn default_config_root() -> Utf8PathBuf {
    Utf8PathBuf::from("/etc/netcfg")
}

/// Computes the default socket endpoint for the daemon.
pub fn default_socket_endpoint() -> SocketEndpoint {
    default_socket_endpoint_inner()
}

#[cfg(unix)]
fn default_socket_endpoint_inner() -> SocketEndpoint {
    let mut base = match runtime_dir().and_then(|path| Utf8PathBuf::from_path_buf(path).ok()) {
        Some(dir) => {
            let mut dir = dir;
            dir.push("netcfg");
            dir
        }
        None => {
            let mut dir = Utf8PathBuf::from_path_buf(env::temp_dir())
                .unwrap_or_else(|_| Utf8PathBuf::from("/tmp"));
            dir.push("netcfg");
            // SAFETY: geteuid has no preconditions and cannot fail.
            dir.push(format!("uid-{}", unsafe { geteuid() }));
            dir
        }
    };
    base.push(SOCKET_FILE_NAME);
    SocketEndpoint::unix(base)
}

#[cfg(not(unix))]
fn default_socket_endpoint_inner() -> SocketEndpoint {
    SocketEndpoint::tcp("127.0.0.1", DEFAULT_TCP_PORT)
}
