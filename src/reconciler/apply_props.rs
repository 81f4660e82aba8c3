//! Host property application.
//!
//! One full remove-then-reapply pass per update: every previous listener
//! is detached, every previous attribute cleared, then every next listener
//! attached and every next attribute set - even for props that did not
//! change. The engine diffs trees, not individual prop values.

use crate::element::Props;
use crate::error::HostError;
use crate::host::{HostBackend, NodeId};

/// Apply the transition from `prev` props to `next` props on a host node.
///
/// Order is fixed: detach previous listeners, clear previous attributes,
/// attach next listeners, set next attributes.
pub fn apply_props(
    host: &dyn HostBackend,
    node: NodeId,
    prev: &Props,
    next: &Props,
) -> Result<(), HostError> {
    for (event, handler) in prev.listeners() {
        host.remove_listener(node, event, handler)?;
    }
    for name in prev.attr_names() {
        host.clear_attribute(node, name)?;
    }
    for (event, handler) in next.listeners() {
        host.add_listener(node, event, handler.clone())?;
    }
    for (name, value) in next.attrs() {
        host.set_attribute(node, name, value)?;
    }
    Ok(())
}
