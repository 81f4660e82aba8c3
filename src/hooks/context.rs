//! Render context - the cursor hooks read from.
//!
//! A [`RenderContext`] is created by the render driver for exactly one
//! render pass and installed in a thread-local slot for the duration of the
//! component function call. Hooks never receive it as an argument; they
//! read "the identity currently rendering" and "the next unused slot index"
//! through the accessor functions here.
//!
//! Exactly one context may be active per thread. Installing a second one is
//! a bug in the driver (renders are non-reentrant) and panics.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use super::slots::HookSlot;
use crate::host::NodeId;
use crate::runtime::RuntimeInner;

// =============================================================================
// Render Context
// =============================================================================

/// Per-pass render context: the identity being rendered, its hook slot
/// arena, the slot cursor, and a handle back to the runtime for setters.
pub(crate) struct RenderContext {
    identity: NodeId,
    slots: Rc<RefCell<Vec<HookSlot>>>,
    cursor: Cell<usize>,
    runtime: Weak<RefCell<RuntimeInner>>,
}

impl RenderContext {
    pub(crate) fn new(
        identity: NodeId,
        slots: Rc<RefCell<Vec<HookSlot>>>,
        runtime: Weak<RefCell<RuntimeInner>>,
    ) -> Self {
        Self {
            identity,
            slots,
            cursor: Cell::new(0),
            runtime,
        }
    }
}

thread_local! {
    /// The context of the in-flight render pass, if any.
    static CURRENT: RefCell<Option<RenderContext>> = const { RefCell::new(None) };
}

// =============================================================================
// Install / Teardown
// =============================================================================

/// Guard keeping a render context installed; tears it down on drop,
/// including during unwinding from a panicking component.
pub(crate) struct ContextGuard {
    _private: (),
}

/// Install `context` as the active render context.
pub(crate) fn enter(context: RenderContext) -> ContextGuard {
    CURRENT.with(|current| {
        let mut current = current.borrow_mut();
        assert!(
            current.is_none(),
            "render context already installed; renders are not reentrant"
        );
        *current = Some(context);
    });
    ContextGuard { _private: () }
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        CURRENT.with(|current| current.borrow_mut().take());
    }
}

// =============================================================================
// Accessors
// =============================================================================

fn with<R>(f: impl FnOnce(&RenderContext) -> R) -> R {
    CURRENT.with(|current| {
        let current = current.borrow();
        let context = current
            .as_ref()
            .expect("hook called outside of an active render pass");
        f(context)
    })
}

/// Whether a render pass is active on this thread.
pub(crate) fn is_active() -> bool {
    CURRENT.with(|current| current.borrow().is_some())
}

/// The identity currently rendering.
pub(crate) fn current_identity() -> NodeId {
    with(|context| context.identity)
}

/// Consume and return the next slot index for the current identity.
pub(crate) fn next_slot_index() -> usize {
    with(|context| {
        let index = context.cursor.get();
        context.cursor.set(index + 1);
        index
    })
}

/// The slot arena of the identity currently rendering.
pub(crate) fn current_slots() -> Rc<RefCell<Vec<HookSlot>>> {
    with(|context| context.slots.clone())
}

/// Handle to the runtime, for setters created during this pass.
pub(crate) fn current_runtime() -> Weak<RefCell<RuntimeInner>> {
    with(|context| context.runtime.clone())
}
