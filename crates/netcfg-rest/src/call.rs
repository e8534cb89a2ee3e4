//! Call drivers: run a request in-process or ship it to the daemon.
//!
//! Both drivers record the failure message on the request (keeping the
//! first one) and return the typed error to the caller.

use std::io::BufReader;

use netcfg_config::SocketEndpoint;
use tracing::debug;

use crate::dispatch::{DISPATCH_TARGET, DispatchTree};
use crate::document::XmlNode;
use crate::errors::{CallError, WireError};
use crate::request::Request;
use crate::transport::{Connection, connect};
use crate::wire::{read_response, write_request};

fn record<T>(request: &mut Request, result: Result<T, CallError>) -> Result<T, CallError> {
    result.inspect_err(|error| request.fail(error.to_string()))
}

/// Processes `request` against `tree` in the calling thread.
///
/// # Errors
///
/// See [`DispatchTree::dispatch`].
pub fn call_direct<S>(
    tree: &DispatchTree<S>,
    state: &S,
    request: &mut Request,
) -> Result<(), CallError> {
    let result = tree.dispatch(state, request);
    record(request, result)
}

/// Sends `request` to the daemon at `endpoint` and stores the reply body in
/// `request.output`.
///
/// One connection carries exactly one request: the request is written, the
/// write side is half-closed, then the response is read to the end.
///
/// # Errors
///
/// [`CallError::Transport`] when the daemon cannot be reached,
/// [`CallError::Remote`] when it reports a failure, and [`CallError::Wire`]
/// for write failures or an undecodable response.
pub fn call_indirect(endpoint: &SocketEndpoint, request: &mut Request) -> Result<(), CallError> {
    let result = connect(endpoint)
        .map_err(CallError::from)
        .and_then(|connection| exchange(connection, request));
    let body = record(request, result)?;
    debug!(
        target: DISPATCH_TARGET,
        endpoint = %endpoint,
        path = %request.path,
        "call completed"
    );
    request.output = Some(body);
    Ok(())
}

fn exchange(mut connection: Connection, request: &Request) -> Result<XmlNode, CallError> {
    write_request(&mut connection, request)?;
    connection
        .shutdown_write()
        .map_err(|source| WireError::Write { source })?;
    let mut reader = BufReader::new(connection);
    read_response(&mut reader)
}
