//! `/config/interface` and `/system/interface`.
//!
//! Both nodes share one set of handlers parameterised by the store; the path
//! remainder names the interface.

use netcfg_rest::{DispatchContext, HandlerError, Request};
use tracing::info;

use crate::interface::{Interface, find_element, listing};
use crate::state::DaemonState;
use crate::store::InterfaceStore;

use super::ROUTES_TARGET;

type Context<'a> = DispatchContext<'a, DaemonState>;

fn interface_name(remainder: &str) -> Result<&str, HandlerError> {
    let name = remainder.trim_end_matches('/');
    if name.contains('/') {
        return Err(HandlerError::invalid_args("excess elements in path"));
    }
    Ok(name)
}

fn get(
    store: &dyn InterfaceStore,
    remainder: &str,
    request: &mut Request,
) -> Result<(), HandlerError> {
    let name = interface_name(remainder)?;
    if name.is_empty() {
        let interfaces = store.list()?;
        request.respond(listing(&interfaces)?);
        return Ok(());
    }
    let interface = store
        .get(name)?
        .ok_or_else(|| HandlerError::failed(format!("interface {name} not known")))?;
    request.respond(interface.to_xml()?);
    Ok(())
}

fn put(
    store: &dyn InterfaceStore,
    remainder: &str,
    request: &mut Request,
) -> Result<(), HandlerError> {
    let name = interface_name(remainder)?;
    if name.is_empty() {
        return Err(HandlerError::invalid_args("no interface name given"));
    }
    let element = request
        .input
        .as_ref()
        .and_then(|document| find_element(document, name))
        .ok_or_else(|| {
            HandlerError::invalid_args(format!("cannot find configuration for interface {name}"))
        })?;
    let mut interface = store.get(name)?.unwrap_or_else(|| Interface::new(name));
    interface.apply(element)?;
    let output = interface.to_xml()?;
    store.put(interface)?;
    info!(target: ROUTES_TARGET, interface = name, path = %request.path, "interface updated");
    request.respond(output);
    Ok(())
}

fn delete(
    store: &dyn InterfaceStore,
    remainder: &str,
    request: &Request,
) -> Result<(), HandlerError> {
    let name = interface_name(remainder)?;
    if name.is_empty() {
        return Err(HandlerError::invalid_args("DELETE: no interface name given"));
    }
    if !store.delete(name)? {
        return Err(HandlerError::failed(format!("unable to delete {name}")));
    }
    info!(target: ROUTES_TARGET, interface = name, path = %request.path, "interface deleted");
    Ok(())
}

pub(super) fn system_get(
    context: &Context<'_>,
    remainder: &str,
    request: &mut Request,
) -> Result<(), HandlerError> {
    get(context.state.system(), remainder, request)
}

pub(super) fn system_put(
    context: &Context<'_>,
    remainder: &str,
    request: &mut Request,
) -> Result<(), HandlerError> {
    put(context.state.system(), remainder, request)
}

pub(super) fn system_delete(
    context: &Context<'_>,
    remainder: &str,
    request: &mut Request,
) -> Result<(), HandlerError> {
    delete(context.state.system(), remainder, request)
}

pub(super) fn config_get(
    context: &Context<'_>,
    remainder: &str,
    request: &mut Request,
) -> Result<(), HandlerError> {
    let store = context.state.config_store(request);
    get(&store, remainder, request)
}

pub(super) fn config_put(
    context: &Context<'_>,
    remainder: &str,
    request: &mut Request,
) -> Result<(), HandlerError> {
    let store = context.state.config_store(request);
    put(&store, remainder, request)
}

pub(super) fn config_delete(
    context: &Context<'_>,
    remainder: &str,
    request: &mut Request,
) -> Result<(), HandlerError> {
    let store = context.state.config_store(request);
    delete(&store, remainder, request)
}
