//! Failures raised before or after the daemon call.

use std::io;
use std::sync::Arc;

use camino::Utf8PathBuf;
use netcfg_rest::{DocumentError, RequestError};
use netcfg_variant::Errno;
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("failed to load configuration: {0}")]
    LoadConfiguration(Arc<ortho_config::OrthoError>),
    #[error("{0}")]
    CliUsage(clap::Error),
    #[error("cannot read input from {path}: {source}")]
    ReadInput { path: Utf8PathBuf, source: io::Error },
    #[error("cannot read input from standard input: {0}")]
    ReadStdin(io::Error),
    #[error("input is not a valid XML document: {0}")]
    ParseInput(DocumentError),
    #[error(transparent)]
    Option(#[from] RequestError),
    #[error("failed to write output: {0}")]
    Emit(io::Error),
}

impl AppError {
    /// Errno reported as the exit status.
    pub(crate) fn errno(&self) -> Errno {
        match self {
            Self::ReadInput { source, .. } | Self::ReadStdin(source) | Self::Emit(source) => {
                source.raw_os_error().map_or(Errno::EIO, Errno::from_raw)
            }
            Self::LoadConfiguration(_)
            | Self::CliUsage(_)
            | Self::ParseInput(_)
            | Self::Option(_) => Errno::EINVAL,
        }
    }
}
