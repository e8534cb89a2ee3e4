//! Daemon bootstrap orchestration.

use std::sync::Arc;

use camino::Utf8Path;
use ortho_config::{OrthoConfig, OrthoError};
use thiserror::Error;

use netcfg_config::{Config, SocketPreparationError};
use netcfg_rest::{DispatchTree, TreeError};

use crate::health::HealthReporter;
use crate::hostname::HostnameSource;
use crate::routes::build_tree;
use crate::server::RestConnectionHandler;
use crate::state::{DaemonState, SYSFS_NET};
use crate::store::MemoryStore;
use crate::telemetry::{self, TelemetryError, TelemetryHandle};

/// Trait abstracting configuration loading for testability.
pub trait ConfigLoader: Send + Sync {
    /// Loads the daemon configuration.
    fn load(&self) -> Result<Config, Arc<OrthoError>>;
}

/// Loader that delegates to [`Config::load`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemConfigLoader;

impl ConfigLoader for SystemConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Config::load()
    }
}

/// Errors surfaced during bootstrap.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// Configuration failed to load.
    #[error("failed to load configuration: {source}")]
    Configuration {
        /// Loader failure.
        #[source]
        source: Arc<OrthoError>,
    },
    /// Telemetry initialisation failed.
    #[error("failed to initialise telemetry: {source}")]
    Telemetry {
        /// Subscriber failure.
        #[source]
        source: TelemetryError,
    },
    /// Socket preparation failed.
    #[error("failed to prepare daemon socket: {source}")]
    Socket {
        /// Directory failure.
        #[source]
        source: SocketPreparationError,
    },
    /// The routed namespace could not be assembled.
    #[error("failed to build dispatch tree: {source}")]
    Routes {
        /// Tree build failure.
        #[source]
        source: TreeError,
    },
}

/// A bootstrapped daemon, ready to be attached to a listener.
pub struct Daemon {
    config: Config,
    tree: Arc<DispatchTree<DaemonState>>,
    state: Arc<DaemonState>,
    telemetry: TelemetryHandle,
    reporter: Arc<dyn HealthReporter>,
}

impl Daemon {
    /// Configuration the daemon was bootstrapped with.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Handle proving telemetry is installed.
    #[must_use]
    pub fn telemetry(&self) -> TelemetryHandle {
        self.telemetry
    }

    /// Routing tree shared by every connection.
    #[must_use]
    pub fn tree(&self) -> &DispatchTree<DaemonState> {
        &self.tree
    }

    /// State shared by request handlers.
    #[must_use]
    pub fn state(&self) -> &DaemonState {
        &self.state
    }

    /// Reporter receiving lifecycle events.
    #[must_use]
    pub fn reporter(&self) -> &Arc<dyn HealthReporter> {
        &self.reporter
    }

    pub(crate) fn connection_handler(&self) -> Arc<RestConnectionHandler> {
        Arc::new(RestConnectionHandler::new(
            Arc::clone(&self.tree),
            Arc::clone(&self.state),
        ))
    }
}

fn fail<T>(reporter: &dyn HealthReporter, error: BootstrapError) -> Result<T, BootstrapError> {
    reporter.bootstrap_failed(&error);
    Err(error)
}

/// Bootstraps the daemon using the supplied collaborators.
///
/// Stages run in order: configuration, telemetry, socket directory, live
/// interface discovery and the dispatch tree. The first failing stage is
/// reported through `reporter` and returned.
///
/// # Errors
///
/// See [`BootstrapError`].
pub fn bootstrap_with(
    loader: &dyn ConfigLoader,
    reporter: Arc<dyn HealthReporter>,
    hostname: Box<dyn HostnameSource>,
) -> Result<Daemon, BootstrapError> {
    reporter.bootstrap_starting();

    let config = match loader.load() {
        Ok(config) => config,
        Err(source) => return fail(&*reporter, BootstrapError::Configuration { source }),
    };

    let telemetry = match telemetry::initialise(&config) {
        Ok(handle) => handle,
        Err(source) => return fail(&*reporter, BootstrapError::Telemetry { source }),
    };

    if let Err(source) = config.daemon_socket().prepare_filesystem() {
        return fail(&*reporter, BootstrapError::Socket { source });
    }

    let tree = match build_tree() {
        Ok(tree) => Arc::new(tree),
        Err(source) => return fail(&*reporter, BootstrapError::Routes { source }),
    };
    let system = MemoryStore::discover(Utf8Path::new(SYSFS_NET));
    let state = Arc::new(DaemonState::new(
        system,
        config.config_root().clone(),
        hostname,
    ));
    reporter.bootstrap_succeeded(&config);

    Ok(Daemon {
        config,
        tree,
        state,
        telemetry,
        reporter,
    })
}
