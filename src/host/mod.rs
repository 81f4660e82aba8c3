//! Host tree capability surface.
//!
//! The engine never touches a platform tree directly. It drives a
//! [`HostBackend`] - the set of primitive operations a platform binding
//! (a DOM bridge, a terminal compositor, a test double) must supply.
//!
//! Host nodes are addressed by opaque [`NodeId`] handles rather than object
//! identity, so backends are free to store nodes however they like
//! (arena, generational index, foreign pointer table).

mod memory;

pub use memory::MemoryHost;

use crate::error::HostError;
use crate::types::{EventHandler, Value};

// =============================================================================
// Node Identity
// =============================================================================

/// Opaque handle identifying one host node.
///
/// Allocated by the backend, meaningful only to the backend. The engine
/// uses it as a lookup key and as the identity of a mounted component
/// (the mount point's id).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    /// Create a handle from a raw backend value.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw backend value.
    pub const fn raw(self) -> u64 {
        self.0
    }
}

// =============================================================================
// Host Backend
// =============================================================================

/// Primitive operations of the host tree.
///
/// All methods take `&self`; backends use interior mutability so a single
/// backend can be shared (`Rc<dyn HostBackend>`) between the runtime and
/// event dispatch.
///
/// Every operation is fallible. Errors propagate unchanged through the
/// reconciler to the caller that triggered the render pass.
pub trait HostBackend {
    /// Create a node of the given type (e.g. `"div"`, `"row"`).
    fn create_node(&self, kind: &str) -> Result<NodeId, HostError>;

    /// Create a text node carrying the given value.
    fn create_text_node(&self, value: &str) -> Result<NodeId, HostError>;

    /// Attach `child` as the last child of `parent`.
    fn append_child(&self, parent: NodeId, child: NodeId) -> Result<(), HostError>;

    /// Detach `child` from `parent`.
    fn remove_child(&self, parent: NodeId, child: NodeId) -> Result<(), HostError>;

    /// Substitute `new` for `old` at `old`'s position under `parent`.
    fn replace_child(&self, parent: NodeId, old: NodeId, new: NodeId) -> Result<(), HostError>;

    /// Set an attribute on a node.
    fn set_attribute(&self, node: NodeId, name: &str, value: &Value) -> Result<(), HostError>;

    /// Reset an attribute to its absent state.
    fn clear_attribute(&self, node: NodeId, name: &str) -> Result<(), HostError>;

    /// Attach an event listener.
    fn add_listener(&self, node: NodeId, event: &str, handler: EventHandler)
    -> Result<(), HostError>;

    /// Detach a previously attached listener (matched by pointer identity).
    fn remove_listener(
        &self,
        node: NodeId,
        event: &str,
        handler: &EventHandler,
    ) -> Result<(), HostError>;
}
