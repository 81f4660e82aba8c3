//! # sapling-ui
//!
//! Minimal declarative UI rendering engine for Rust.
//!
//! Components are plain functions of props that return a description of a
//! tree; the engine turns successive descriptions into incremental
//! mutations of a persistent host tree.
//!
//! ## Architecture
//!
//! Two tightly coupled pieces do the real work:
//!
//! - the **hook engine** lets a stateless function retain state and
//!   memoized values across invocations, indexed purely by call order;
//! - the **reconciler** diffs the previously committed tree against the
//!   newly produced one and applies minimal create/update/remove
//!   operations through the [`HostBackend`] capability surface.
//!
//! The rendering pipeline is a single synchronous pass:
//! ```text
//! Runtime::mount -> render context -> component fn -> Element tree
//!                -> reconcile vs committed Instance -> host mutations
//! ```
//!
//! State writes through a [`Setter`] re-render the owning mount point
//! synchronously. There is no scheduling, batching or keyed diffing.
//!
//! ## Example
//!
//! ```ignore
//! use std::rc::Rc;
//! use sapling_ui::{Element, MemoryHost, Props, Runtime, use_state};
//!
//! let host = Rc::new(MemoryHost::new());
//! let runtime = Runtime::new(host.clone());
//! let root = host.create_root();
//!
//! runtime.mount(
//!     |_props: &Props| {
//!         let (count, set_count) = use_state(0i64);
//!         Element::node("button")
//!             .attr("count", count)
//!             .on("click", move |_| {
//!                 set_count.update(|c| c + 1).unwrap();
//!             })
//!     },
//!     Props::new(),
//!     root,
//! )?;
//!
//! host.dispatch(host.children(root)[0], "click")?; // re-renders synchronously
//! ```
//!
//! ## Modules
//!
//! - [`types`] - shared value/callback types ([`Value`], [`Cleanup`], [`Event`])
//! - [`element`] - immutable element model and constructors
//! - [`hooks`] - `use_state` / `use_effect` / `use_memo`
//! - [`host`] - host capability trait and the in-memory backend
//! - [`reconciler`] - instance tree and the diff algorithm
//! - [`runtime`] - the render driver

pub mod element;
pub mod error;
pub mod hooks;
pub mod host;
pub mod reconciler;
pub mod runtime;
pub mod types;

// Re-export commonly used items
pub use element::{
    Child, Element, ElementKind, IntoElement, Props, TEXT_VALUE, create_element,
    create_text_element,
};
pub use error::{HostError, RenderError};
pub use hooks::{Setter, use_effect, use_memo, use_state, use_state_with};
pub use host::{HostBackend, MemoryHost, NodeId};
pub use reconciler::{Instance, apply_props, reconcile};
pub use runtime::Runtime;
pub use types::{Cleanup, Event, EventHandler, Value, cleanup};
