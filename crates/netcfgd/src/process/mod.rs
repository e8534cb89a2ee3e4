//! Process lifecycle: launch, serve, and shut down on a signal.

mod errors;
mod launch;
mod shutdown;

pub use errors::LaunchError;
pub use launch::run_daemon;

#[cfg(test)]
pub(crate) use launch::{LaunchPlan, run_daemon_with};
#[cfg(test)]
pub(crate) use shutdown::{ShutdownError, ShutdownSignal};

pub(crate) const PROCESS_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::process");
