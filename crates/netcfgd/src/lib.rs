//! The netcfg control-plane daemon.
//!
//! `netcfgd` loads the shared [`netcfg_config::Config`], installs structured
//! telemetry, then binds the configured socket and serves one request per
//! connection. Each request is decoded with the `netcfg-rest` line protocol,
//! routed through the daemon's [`DispatchTree`](netcfg_rest::DispatchTree)
//! and answered with a status line plus an optional XML document.
//!
//! The routed namespace is:
//!
//! ```text
//! /
//! ├── config/interface   GET PUT DELETE   file-backed interface store
//! ├── system/interface   GET PUT DELETE   live interface registry
//! ├── system/hostname    GET PUT
//! └── meta               GET              description of this tree
//! ```
//!
//! Lifecycle events are surfaced through a [`HealthReporter`], and the
//! process exits cleanly on SIGTERM, SIGINT, SIGQUIT or SIGHUP.

mod bootstrap;
mod health;
mod hostname;
mod interface;
mod process;
mod routes;
mod server;
mod state;
mod store;
mod telemetry;
mod transport;

pub use bootstrap::{BootstrapError, ConfigLoader, Daemon, SystemConfigLoader, bootstrap_with};
pub use health::{HealthReporter, StructuredHealthReporter};
pub use hostname::{HostnameError, HostnameSource, SystemHostname};
pub use interface::{Interface, InterfaceError, property_handlers};
pub use process::{LaunchError, run_daemon};
pub use routes::build_tree;
pub use state::DaemonState;
pub use store::{FileStore, InterfaceStore, MemoryStore, StoreError};
pub use telemetry::{TelemetryError, TelemetryHandle};
pub use transport::ListenerError;

#[cfg(test)]
mod tests;
