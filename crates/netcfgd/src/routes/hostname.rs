//! `/system/hostname`.

use netcfg_rest::{DispatchContext, HandlerError, Request, XmlNode};
use tracing::info;

use crate::state::DaemonState;

use super::{ROUTES_TARGET, reject_remainder};

const HOSTNAME_ELEMENT: &str = "hostname";

fn is_legal(name: &str) -> bool {
    name.bytes().all(|byte| byte > 0x20 && byte < 0x7f)
}

pub(super) fn get(
    context: &DispatchContext<'_, DaemonState>,
    remainder: &str,
    request: &mut Request,
) -> Result<(), HandlerError> {
    reject_remainder(remainder)?;
    let name = context
        .state
        .hostname()
        .hostname()
        .map_err(|error| HandlerError::failed(error.to_string()))?;
    request.respond(XmlNode::new(HOSTNAME_ELEMENT).with_text(name));
    Ok(())
}

pub(super) fn put(
    context: &DispatchContext<'_, DaemonState>,
    remainder: &str,
    request: &mut Request,
) -> Result<(), HandlerError> {
    reject_remainder(remainder)?;
    let name = request
        .input
        .clone()
        .and_then(XmlNode::into_single_element)
        .filter(|element| element.name() == HOSTNAME_ELEMENT)
        .and_then(|element| element.text().map(|text| text.trim().to_owned()))
        .filter(|name| !name.is_empty())
        .ok_or_else(|| HandlerError::invalid_args("bad or missing XML document"))?;
    if !is_legal(&name) {
        return Err(HandlerError::invalid_args("illegal character in hostname"));
    }
    context
        .state
        .hostname()
        .set_hostname(&name)
        .map_err(|error| HandlerError::failed(error.to_string()))?;
    info!(
        target: ROUTES_TARGET,
        hostname = %name,
        "hostname changed"
    );
    request.respond(XmlNode::new(HOSTNAME_ELEMENT).with_text(name));
    Ok(())
}
