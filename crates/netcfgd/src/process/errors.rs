//! Defines the unified error surface for daemon launch and supervision.

use thiserror::Error;

use crate::bootstrap::BootstrapError;
use crate::transport::ListenerError;

use super::shutdown::ShutdownError;

/// Errors surfaced while launching or supervising the daemon process.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// Waiting for the termination signal failed.
    #[error("failed to await shutdown signal: {source}")]
    Shutdown {
        /// Underlying signal failure.
        #[source]
        source: ShutdownError,
    },
    /// A bootstrap stage failed; already reported as `bootstrap_failed`.
    #[error("daemon bootstrap failed: {source}")]
    Bootstrap {
        /// Failing stage.
        #[source]
        source: BootstrapError,
    },
    /// The socket listener could not be bound, started or joined.
    #[error("daemon socket listener failed: {source}")]
    Listener {
        /// Underlying listener failure.
        #[source]
        source: ListenerError,
    },
}

impl From<ShutdownError> for LaunchError {
    fn from(source: ShutdownError) -> Self {
        Self::Shutdown { source }
    }
}

impl From<BootstrapError> for LaunchError {
    fn from(source: BootstrapError) -> Self {
        Self::Bootstrap { source }
    }
}

impl From<ListenerError> for LaunchError {
    fn from(source: ListenerError) -> Self {
        Self::Listener { source }
    }
}
