//! Serves one wire-protocol request per connection.

use std::io::BufReader;
use std::sync::Arc;

use netcfg_rest::{DispatchTree, call_direct, parse_request, write_response};
use netcfg_variant::ErrorTranslator;
use tracing::{debug, warn};

use crate::state::DaemonState;
use crate::transport::{ConnectionHandler, ConnectionStream};

const SERVER_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::server");

/// Decodes the request, runs it through the dispatch tree and writes the
/// status line plus body back on the same stream.
#[derive(Debug)]
pub(crate) struct RestConnectionHandler {
    tree: Arc<DispatchTree<DaemonState>>,
    state: Arc<DaemonState>,
    translator: ErrorTranslator,
}

impl RestConnectionHandler {
    pub(crate) fn new(tree: Arc<DispatchTree<DaemonState>>, state: Arc<DaemonState>) -> Self {
        Self {
            tree,
            state,
            translator: ErrorTranslator::default(),
        }
    }

    fn respond(&self, stream: &mut ConnectionStream) -> std::io::Result<()> {
        let parsed = parse_request(&mut BufReader::new(&mut *stream));
        let mut request = match parsed {
            Ok(request) => request,
            Err(error) => {
                warn!(target: SERVER_TARGET, %error, "rejected malformed request");
                return write_response(stream, Err(&error.to_string()));
            }
        };
        match call_direct(&self.tree, &self.state, &mut request) {
            Ok(()) => {
                debug!(
                    target: SERVER_TARGET,
                    path = %request.path,
                    has_body = request.output.is_some(),
                    "request completed"
                );
                write_response(stream, Ok(request.output.as_ref()))
            }
            Err(error) => {
                let errno = self.translator.translate(&error.to_named(), None);
                debug!(
                    target: SERVER_TARGET,
                    path = %request.path,
                    error_name = error.error_name(),
                    errno = %errno,
                    "request failed"
                );
                let message = request.error().map_or_else(|| error.to_string(), str::to_owned);
                write_response(stream, Err(&message))
            }
        }
    }
}

impl ConnectionHandler for RestConnectionHandler {
    fn handle(&self, mut stream: ConnectionStream) {
        if let Err(error) = self.respond(&mut stream) {
            warn!(target: SERVER_TARGET, %error, "failed to write response");
        }
        if let Err(error) = stream.close() {
            debug!(target: SERVER_TARGET, %error, "connection already closed");
        }
    }
}
