//! Supervises daemon launch sequencing and runtime orchestration.

use std::sync::Arc;

use tracing::info;

use crate::bootstrap::{ConfigLoader, SystemConfigLoader, bootstrap_with};
use crate::health::{HealthReporter, StructuredHealthReporter};
use crate::hostname::{HostnameSource, SystemHostname};
use crate::transport::{ListenerHandle, SocketListener};

use super::PROCESS_TARGET;
use super::errors::LaunchError;
use super::shutdown::{ShutdownSignal, SystemShutdownSignal};

/// Collaborators required to launch the daemon runtime.
pub(crate) struct LaunchPlan<L, S> {
    pub(crate) loader: L,
    pub(crate) reporter: Arc<dyn HealthReporter>,
    pub(crate) hostname: Box<dyn HostnameSource>,
    pub(crate) shutdown: S,
}

/// Runs the daemon with the production collaborators until a termination
/// signal arrives.
///
/// # Errors
///
/// Returns [`LaunchError`] when bootstrap, socket binding or signal
/// installation fails.
pub fn run_daemon() -> Result<(), LaunchError> {
    run_daemon_with(LaunchPlan {
        loader: SystemConfigLoader,
        reporter: Arc::new(StructuredHealthReporter::new()),
        hostname: Box::new(SystemHostname),
        shutdown: SystemShutdownSignal,
    })
}

/// Runs the daemon with injected collaborators.
///
/// Bootstrap loads the configuration once and installs telemetry, so every
/// later failure is reported through `reporter` and logged.
pub(crate) fn run_daemon_with<L, S>(plan: LaunchPlan<L, S>) -> Result<(), LaunchError>
where
    L: ConfigLoader,
    S: ShutdownSignal,
{
    let LaunchPlan {
        loader,
        reporter,
        hostname,
        shutdown,
    } = plan;

    let daemon = bootstrap_with(&loader, Arc::clone(&reporter), hostname)?;
    let endpoint = daemon.config().daemon_socket();
    info!(
        target: PROCESS_TARGET,
        endpoint = %endpoint,
        "starting daemon runtime"
    );
    // A live socket at the endpoint fails the bind, so a second daemon exits here.
    let listener = match SocketListener::bind(endpoint) {
        Ok(listener) => listener,
        Err(error) => {
            reporter.listener_failed(&error);
            return Err(error.into());
        }
    };

    let handle = match listener.start(daemon.connection_handler()) {
        Ok(handle) => handle,
        Err(error) => {
            reporter.listener_failed(&error);
            return Err(error.into());
        }
    };
    reporter.listener_started(endpoint);

    let waited = shutdown.wait();
    reporter.shutdown_started();
    stop(handle)?;
    waited?;
    info!(target: PROCESS_TARGET, "shutdown sequence completed");
    Ok(())
}

fn stop(handle: ListenerHandle) -> Result<(), LaunchError> {
    handle.shutdown();
    handle.join()?;
    Ok(())
}
