//! `/meta`: describes the tree the request was routed through.

use netcfg_rest::{DispatchContext, HandlerError, Request};

use crate::state::DaemonState;

use super::reject_remainder;

pub(super) fn get(
    context: &DispatchContext<'_, DaemonState>,
    remainder: &str,
    request: &mut Request,
) -> Result<(), HandlerError> {
    reject_remainder(remainder)?;
    request.respond(context.tree.describe());
    Ok(())
}
