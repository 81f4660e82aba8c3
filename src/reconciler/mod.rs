//! Tree reconciler - diff a committed tree against a new description.
//!
//! The reconciler turns one previously committed [`Instance`] tree plus a
//! newly produced [`Element`] tree into an updated live tree, mutating the
//! host through its primitive operations as a byproduct. Four rules, in
//! order:
//!
//! 1. no instance, element present -> mount the whole subtree
//! 2. instance present, no element -> detach the subtree
//! 3. same type tag -> update the host node in place, recurse into children
//! 4. different type tag -> replace the subtree wholesale
//!
//! Child pairing is positional, never keyed: children are matched strictly
//! by index, so reordering a child list reads as per-position updates (or
//! replace/mount/unmount churn where types stop coinciding). That is an
//! acknowledged property of the algorithm, not a defect to paper over.
//!
//! Host failures propagate unchanged; the reconciler never swallows them.

mod apply_props;

pub use apply_props::apply_props;

use log::{debug, trace};

use crate::element::{Element, ElementKind, Props, TEXT_VALUE};
use crate::error::RenderError;
use crate::host::{HostBackend, NodeId};

// =============================================================================
// Instance
// =============================================================================

/// Live tree node mirroring one committed element.
///
/// Owns the host node handle, the element it was last reconciled against,
/// and its child instances. The instance tree's shape always matches the
/// most recently committed element tree, node for node.
#[derive(Debug)]
pub struct Instance {
    node: NodeId,
    element: Element,
    children: Vec<Instance>,
}

impl Instance {
    /// Host node this instance controls.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// The committed element.
    pub fn element(&self) -> &Element {
        &self.element
    }

    /// Child instances, in order.
    pub fn children(&self) -> &[Instance] {
        &self.children
    }
}

// =============================================================================
// Reconciliation
// =============================================================================

/// Reconcile a previous instance (or none) against a new element (or none)
/// under `parent`, returning the new instance (or none).
pub fn reconcile(
    host: &dyn HostBackend,
    parent: NodeId,
    instance: Option<Instance>,
    element: Option<&Element>,
) -> Result<Option<Instance>, RenderError> {
    match (instance, element) {
        (None, None) => Ok(None),

        // Mount: instantiate the whole subtree, then attach it.
        (None, Some(element)) => {
            trace!("mount <{}> under {parent:?}", element.kind);
            let new = instantiate(host, element)?;
            host.append_child(parent, new.node)?;
            Ok(Some(new))
        }

        // Unmount: detach; the discarded subtree needs no per-prop teardown.
        (Some(instance), None) => {
            trace!("unmount <{}> from {parent:?}", instance.element.kind);
            host.remove_child(parent, instance.node)?;
            Ok(None)
        }

        // Same type: update the existing host node in place.
        (Some(mut instance), Some(element)) if instance.element.kind == element.kind => {
            apply_props(host, instance.node, &instance.element.props, &element.props)?;
            let previous_children = std::mem::take(&mut instance.children);
            instance.children =
                reconcile_children(host, instance.node, previous_children, &element.children)?;
            instance.element = element.clone();
            Ok(Some(instance))
        }

        // Type mismatch: replace the subtree wholesale.
        (Some(instance), Some(element)) => {
            debug!(
                "replace <{}> with <{}> under {parent:?}",
                instance.element.kind, element.kind
            );
            let new = instantiate(host, element)?;
            host.replace_child(parent, instance.node, new.node)?;
            Ok(Some(new))
        }
    }
}

/// Instantiate an element subtree depth-first: allocate the host node,
/// apply all props, then instantiate and attach every child.
fn instantiate(host: &dyn HostBackend, element: &Element) -> Result<Instance, RenderError> {
    let node = match &element.kind {
        ElementKind::Host(kind) => host.create_node(kind)?,
        ElementKind::Text => {
            let value = element
                .props
                .get(TEXT_VALUE)
                .map(|v| v.to_string())
                .unwrap_or_default();
            host.create_text_node(&value)?
        }
    };

    apply_props(host, node, &Props::new(), &element.props)?;

    let mut children = Vec::with_capacity(element.children.len());
    for child_element in &element.children {
        let child = instantiate(host, child_element)?;
        host.append_child(node, child.node)?;
        children.push(child);
    }

    Ok(Instance {
        node,
        element: element.clone(),
        children,
    })
}

/// Pair old child instances with new child elements strictly by index.
///
/// Indices beyond either side's length fall into the mount/unmount rules
/// of [`reconcile`].
fn reconcile_children(
    host: &dyn HostBackend,
    parent: NodeId,
    previous: Vec<Instance>,
    next: &[Element],
) -> Result<Vec<Instance>, RenderError> {
    let count = previous.len().max(next.len());
    let mut previous: Vec<Option<Instance>> = previous.into_iter().map(Some).collect();

    let mut children = Vec::with_capacity(next.len());
    for index in 0..count {
        let child_instance = previous.get_mut(index).and_then(Option::take);
        let child_element = next.get(index);
        if let Some(child) = reconcile(host, parent, child_instance, child_element)? {
            children.push(child);
        }
    }
    Ok(children)
}

// =============================================================================
// Tests
// =============================================================================
