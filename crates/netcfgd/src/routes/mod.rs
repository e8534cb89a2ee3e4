//! The daemon's routed namespace.

mod hostname;
mod interface;
mod meta;
#[cfg(test)]
mod tests;

use netcfg_rest::{DispatchTree, HandlerError, NodeBuilder, ROOT_NAME, TreeError};

use crate::state::DaemonState;

const ROUTES_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::routes");

/// Builds the dispatch tree served by the daemon.
///
/// # Errors
///
/// Only fails if the static layout violates the tree's naming rules.
pub fn build_tree() -> Result<DispatchTree<DaemonState>, TreeError> {
    DispatchTree::build(
        NodeBuilder::new(ROOT_NAME)
            .child(
                NodeBuilder::new("config").child(
                    NodeBuilder::new("interface")
                        .get(interface::config_get)
                        .put(interface::config_put)
                        .delete(interface::config_delete),
                ),
            )
            .child(
                NodeBuilder::new("system")
                    .child(
                        NodeBuilder::new("interface")
                            .get(interface::system_get)
                            .put(interface::system_put)
                            .delete(interface::system_delete),
                    )
                    .child(
                        NodeBuilder::new("hostname")
                            .get(hostname::get)
                            .put(hostname::put),
                    ),
            )
            .child(NodeBuilder::new("meta").get(meta::get)),
    )
}

pub(crate) fn reject_remainder(remainder: &str) -> Result<(), HandlerError> {
    if remainder.is_empty() {
        Ok(())
    } else {
        Err(HandlerError::invalid_args("excess elements in path"))
    }
}
