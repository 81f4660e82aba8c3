//! In-memory host backend.
//!
//! A concrete host tree the engine can be exercised against without a real
//! platform binding: nodes live in a `NodeId`-addressed arena, listeners are
//! plain callback vectors, and [`MemoryHost::dispatch`] delivers synthetic
//! events so listener -> setter -> re-render round trips are testable.
//!
//! Detached nodes stay in the arena (the engine may still hold handles to
//! them); attachment is tracked through the parent pointer.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use indexmap::IndexMap;

use super::{HostBackend, NodeId};
use crate::error::HostError;
use crate::types::{Event, EventHandler, Value};

// =============================================================================
// Nodes
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum NodeKind {
    Element(String),
    Text,
}

struct MemoryNode {
    kind: NodeKind,
    attrs: IndexMap<String, Value>,
    listeners: IndexMap<String, Vec<EventHandler>>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

impl MemoryNode {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            attrs: IndexMap::new(),
            listeners: IndexMap::new(),
            children: Vec::new(),
            parent: None,
        }
    }
}

// =============================================================================
// Memory Host
// =============================================================================

struct HostTree {
    nodes: HashMap<NodeId, MemoryNode>,
    next_id: u64,
}

/// In-memory [`HostBackend`] implementation.
pub struct MemoryHost {
    tree: RefCell<HostTree>,
}

impl MemoryHost {
    /// Create an empty host tree.
    pub fn new() -> Self {
        Self {
            tree: RefCell::new(HostTree {
                nodes: HashMap::new(),
                next_id: 0,
            }),
        }
    }

    /// Create a detached container node to mount into.
    pub fn create_root(&self) -> NodeId {
        self.alloc(NodeKind::Element("root".to_string()))
    }

    fn alloc(&self, kind: NodeKind) -> NodeId {
        let mut tree = self.tree.borrow_mut();
        let id = NodeId::new(tree.next_id);
        tree.next_id += 1;
        tree.nodes.insert(id, MemoryNode::new(kind));
        id
    }

    // -------------------------------------------------------------------------
    // Inspection
    // -------------------------------------------------------------------------

    /// Whether the node exists in the arena.
    pub fn contains(&self, node: NodeId) -> bool {
        self.tree.borrow().nodes.contains_key(&node)
    }

    /// The node's type name (`None` for text nodes or unknown ids).
    pub fn kind(&self, node: NodeId) -> Option<String> {
        match &self.tree.borrow().nodes.get(&node)?.kind {
            NodeKind::Element(name) => Some(name.clone()),
            NodeKind::Text => None,
        }
    }

    /// Whether the node is a text node.
    pub fn is_text(&self, node: NodeId) -> bool {
        matches!(
            self.tree.borrow().nodes.get(&node).map(|n| &n.kind),
            Some(NodeKind::Text)
        )
    }

    /// Current value of an attribute.
    pub fn attr(&self, node: NodeId, name: &str) -> Option<Value> {
        self.tree.borrow().nodes.get(&node)?.attrs.get(name).cloned()
    }

    /// The text payload of a text node (its `node_value` attribute).
    pub fn text(&self, node: NodeId) -> Option<String> {
        self.attr(node, crate::element::TEXT_VALUE)
            .map(|v| v.to_string())
    }

    /// Children of a node, in order.
    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.tree
            .borrow()
            .nodes
            .get(&node)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    /// Parent of a node, if attached.
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.tree.borrow().nodes.get(&node)?.parent
    }

    /// Whether the node is attached to a parent.
    pub fn is_attached(&self, node: NodeId) -> bool {
        self.parent(node).is_some()
    }

    /// Number of listeners registered for an event on a node.
    pub fn listener_count(&self, node: NodeId, event: &str) -> usize {
        self.tree
            .borrow()
            .nodes
            .get(&node)
            .and_then(|n| n.listeners.get(event))
            .map(|handlers| handlers.len())
            .unwrap_or(0)
    }

    // -------------------------------------------------------------------------
    // Event Dispatch
    // -------------------------------------------------------------------------

    /// Deliver a synthetic event to every listener registered on `node`
    /// for `event`. Returns the number of listeners invoked.
    ///
    /// Handlers are cloned out of the tree before invocation, so a handler
    /// is free to trigger a re-render that rewrites the listener table.
    pub fn dispatch(&self, node: NodeId, event: &str) -> Result<usize, HostError> {
        let handlers: Vec<EventHandler> = {
            let tree = self.tree.borrow();
            let entry = tree.nodes.get(&node).ok_or(HostError::UnknownNode(node))?;
            entry.listeners.get(event).cloned().unwrap_or_default()
        };

        let payload = Event {
            name: event.to_string(),
            target: node,
        };
        for handler in &handlers {
            handler(&payload);
        }
        Ok(handlers.len())
    }
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// HostBackend Implementation
// =============================================================================

impl HostTree {
    fn node_mut(&mut self, id: NodeId) -> Result<&mut MemoryNode, HostError> {
        self.nodes.get_mut(&id).ok_or(HostError::UnknownNode(id))
    }

    fn check(&self, id: NodeId) -> Result<(), HostError> {
        if self.nodes.contains_key(&id) {
            Ok(())
        } else {
            Err(HostError::UnknownNode(id))
        }
    }

    /// Detach `child` from its current parent, if any.
    fn detach(&mut self, child: NodeId) -> Result<(), HostError> {
        let old_parent = self.node_mut(child)?.parent.take();
        if let Some(parent) = old_parent {
            let siblings = &mut self.node_mut(parent)?.children;
            siblings.retain(|&c| c != child);
        }
        Ok(())
    }
}

impl HostBackend for MemoryHost {
    fn create_node(&self, kind: &str) -> Result<NodeId, HostError> {
        Ok(self.alloc(NodeKind::Element(kind.to_string())))
    }

    fn create_text_node(&self, value: &str) -> Result<NodeId, HostError> {
        let id = self.alloc(NodeKind::Text);
        self.set_attribute(id, crate::element::TEXT_VALUE, &Value::from(value))?;
        Ok(id)
    }

    fn append_child(&self, parent: NodeId, child: NodeId) -> Result<(), HostError> {
        let mut tree = self.tree.borrow_mut();
        tree.check(parent)?;
        tree.check(child)?;
        // Appending an attached node moves it.
        tree.detach(child)?;
        tree.node_mut(child)?.parent = Some(parent);
        tree.node_mut(parent)?.children.push(child);
        Ok(())
    }

    fn remove_child(&self, parent: NodeId, child: NodeId) -> Result<(), HostError> {
        let mut tree = self.tree.borrow_mut();
        tree.check(child)?;
        let siblings = &mut tree.node_mut(parent)?.children;
        let position = siblings
            .iter()
            .position(|&c| c == child)
            .ok_or(HostError::NotAChild { parent, child })?;
        siblings.remove(position);
        tree.node_mut(child)?.parent = None;
        Ok(())
    }

    fn replace_child(&self, parent: NodeId, old: NodeId, new: NodeId) -> Result<(), HostError> {
        let mut tree = self.tree.borrow_mut();
        tree.check(old)?;
        tree.check(new)?;
        let position = tree
            .node_mut(parent)?
            .children
            .iter()
            .position(|&c| c == old)
            .ok_or(HostError::NotAChild { parent, child: old })?;
        tree.detach(new)?;
        tree.node_mut(parent)?.children[position] = new;
        tree.node_mut(old)?.parent = None;
        tree.node_mut(new)?.parent = Some(parent);
        Ok(())
    }

    fn set_attribute(&self, node: NodeId, name: &str, value: &Value) -> Result<(), HostError> {
        let mut tree = self.tree.borrow_mut();
        tree.node_mut(node)?.attrs.insert(name.to_string(), value.clone());
        Ok(())
    }

    fn clear_attribute(&self, node: NodeId, name: &str) -> Result<(), HostError> {
        let mut tree = self.tree.borrow_mut();
        tree.node_mut(node)?.attrs.shift_remove(name);
        Ok(())
    }

    fn add_listener(
        &self,
        node: NodeId,
        event: &str,
        handler: EventHandler,
    ) -> Result<(), HostError> {
        let mut tree = self.tree.borrow_mut();
        tree.node_mut(node)?
            .listeners
            .entry(event.to_string())
            .or_default()
            .push(handler);
        Ok(())
    }

    fn remove_listener(
        &self,
        node: NodeId,
        event: &str,
        handler: &EventHandler,
    ) -> Result<(), HostError> {
        let mut tree = self.tree.borrow_mut();
        if let Some(handlers) = tree.node_mut(node)?.listeners.get_mut(event) {
            handlers.retain(|h| !Rc::ptr_eq(h, handler));
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
