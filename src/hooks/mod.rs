//! Hook engine - persistent state for stateless functions.
//!
//! Hooks let a plain component function retain state, side-effect
//! bookkeeping and memoized values across repeated invocations. Storage is
//! indexed purely by call order: each hook call consumes the next slot
//! index for the identity currently rendering, supplied implicitly by the
//! render context (see [`context`]).
//!
//! # Call-order invariant
//!
//! The number and kind of hook calls must be identical on every render of
//! one component identity. Conditional hooks corrupt unrelated slots, so a
//! kind mismatch panics immediately, naming the identity and slot index.
//!
//! # Re-render contract
//!
//! [`Setter`] writes re-render the owning identity synchronously, with its
//! last-known props, before returning. There is no equality bail-out and
//! no batching. A write from inside a render pass (component body or
//! effect) fails with [`RenderError::ReentrantRender`] instead of
//! recursing.

pub(crate) mod context;
pub(crate) mod slots;

use std::cell::RefCell;
use std::marker::PhantomData;
use std::rc::Weak;

use log::trace;

use self::slots::{HookKind, HookSlot, deps_changed};
use crate::error::RenderError;
use crate::host::NodeId;
use crate::runtime::RuntimeInner;
use crate::types::{Cleanup, Value};

/// Build the dependency sequence for `use_effect` / `use_memo`.
///
/// `deps![]` gates on nothing (run once); `deps![a, b]` converts each
/// entry via `Value::from`. For "rerun every render", pass `None` instead.
#[macro_export]
macro_rules! deps {
    () => {
        Some(Vec::new())
    };
    ($($dep:expr),+ $(,)?) => {
        Some(vec![$($crate::Value::from($dep)),+])
    };
}

fn hook_kind_mismatch(identity: NodeId, index: usize, expected: HookKind, found: HookKind) -> ! {
    panic!(
        "hook call order changed across renders of component {identity:?}: \
         slot {index} was created by {found} but is now addressed by {expected}"
    );
}

// =============================================================================
// use_state
// =============================================================================

/// Persistent state: returns the current value and a [`Setter`].
///
/// The initial value is materialized on the first render of this call
/// site and ignored afterwards. For initial values that are expensive to
/// build, use [`use_state_with`].
pub fn use_state<T: Clone + 'static>(initial: T) -> (T, Setter<T>) {
    use_state_with(move || initial)
}

/// [`use_state`] with a lazy initializer, invoked only on the first render.
pub fn use_state_with<T: Clone + 'static>(init: impl FnOnce() -> T) -> (T, Setter<T>) {
    let identity = context::current_identity();
    let index = context::next_slot_index();
    let slots = context::current_slots();

    let value = {
        let mut slots = slots.borrow_mut();
        if index == slots.len() {
            slots.push(HookSlot::State {
                value: Box::new(init()),
            });
        }
        match &slots[index] {
            HookSlot::State { value } => value
                .downcast_ref::<T>()
                .unwrap_or_else(|| {
                    panic!(
                        "state type changed across renders of component {identity:?} \
                         at hook slot {index}"
                    )
                })
                .clone(),
            other => hook_kind_mismatch(identity, index, HookKind::State, other.kind()),
        }
    };

    let setter = Setter {
        runtime: context::current_runtime(),
        identity,
        index,
        _marker: PhantomData,
    };
    (value, setter)
}

/// Write handle for one `use_state` slot.
///
/// Cloneable and usable from outside the render pass (typically captured
/// in an event listener). Every write mutates the slot in place and then
/// synchronously re-renders the owning identity.
pub struct Setter<T> {
    runtime: Weak<RefCell<RuntimeInner>>,
    identity: NodeId,
    index: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Setter<T> {
    fn clone(&self) -> Self {
        Self {
            runtime: self.runtime.clone(),
            identity: self.identity,
            index: self.index,
            _marker: PhantomData,
        }
    }
}

impl<T: Clone + 'static> Setter<T> {
    /// Replace the value.
    pub fn set(&self, next: T) -> Result<(), RenderError> {
        self.write(move |_| next)
    }

    /// Replace the value with a function of the current value.
    pub fn update(&self, f: impl FnOnce(&T) -> T) -> Result<(), RenderError> {
        self.write(f)
    }

    fn write(&self, apply: impl FnOnce(&T) -> T) -> Result<(), RenderError> {
        let runtime = self.runtime.upgrade().ok_or(RenderError::RuntimeDropped)?;

        let slots = {
            let inner = runtime.borrow();
            // A reentrant write aborts before touching the slot: the failed
            // operation must leave hook state and committed tree in agreement.
            if inner.in_render_pass() {
                return Err(RenderError::ReentrantRender);
            }
            let record = inner
                .records
                .get(&self.identity)
                .ok_or(RenderError::NotMounted(self.identity))?;
            record.slots.clone()
        };

        {
            let mut slots = slots.borrow_mut();
            let slot = slots.get_mut(self.index).unwrap_or_else(|| {
                panic!(
                    "state slot {} of {:?} no longer exists",
                    self.index, self.identity
                )
            });
            match slot {
                HookSlot::State { value } => {
                    let current = value.downcast_mut::<T>().unwrap_or_else(|| {
                        panic!(
                            "state type changed across renders of component {:?} \
                             at hook slot {}",
                            self.identity, self.index
                        )
                    });
                    let next = apply(&*current);
                    *current = next;
                }
                other => {
                    hook_kind_mismatch(self.identity, self.index, HookKind::State, other.kind())
                }
            }
        }

        crate::runtime::render_identity(&runtime, self.identity)
    }
}

// =============================================================================
// use_effect
// =============================================================================

/// Dependency-gated side effect.
///
/// Runs synchronously, inline with this hook call, whenever the
/// dependency sequence differs from the recorded one. `None` dependencies
/// rerun every render; `deps![]` runs on the first render only. Before the
/// effect reruns, the cleanup returned by its previous run (if any) is
/// invoked. Pending cleanups also run when the identity is unmounted.
pub fn use_effect(deps: Option<Vec<Value>>, callback: impl FnOnce() -> Option<Cleanup>) {
    let identity = context::current_identity();
    let index = context::next_slot_index();
    let slots = context::current_slots();

    let (changed, previous_cleanup) = {
        let mut slots = slots.borrow_mut();
        if index == slots.len() {
            slots.push(HookSlot::Effect {
                deps: None,
                cleanup: None,
            });
        }
        match &mut slots[index] {
            HookSlot::Effect {
                deps: recorded,
                cleanup,
            } => {
                let changed = deps_changed(recorded.as_ref(), deps.as_ref());
                let previous = if changed { cleanup.take() } else { None };
                (changed, previous)
            }
            other => hook_kind_mismatch(identity, index, HookKind::Effect, other.kind()),
        }
    };

    if !changed {
        return;
    }

    if let Some(cleanup) = previous_cleanup {
        cleanup();
    }
    trace!("effect slot {index} of {identity:?} firing");
    let next_cleanup = callback();

    let mut slots = slots.borrow_mut();
    match &mut slots[index] {
        HookSlot::Effect {
            deps: recorded,
            cleanup,
        } => {
            *recorded = deps;
            *cleanup = next_cleanup;
        }
        _ => unreachable!("slot kind verified above"),
    }
}

// =============================================================================
// use_memo
// =============================================================================

/// Dependency-gated memoized value.
///
/// Same dependency policy as [`use_effect`]: the compute closure runs on
/// the first render and whenever the dependency sequence changes; otherwise
/// the cached value is returned.
pub fn use_memo<T: Clone + 'static>(deps: Option<Vec<Value>>, compute: impl FnOnce() -> T) -> T {
    let identity = context::current_identity();
    let index = context::next_slot_index();
    let slots = context::current_slots();

    let needs_compute = {
        let slots = slots.borrow();
        match slots.get(index) {
            None => true,
            Some(HookSlot::Memo { deps: recorded, .. }) => {
                deps_changed(recorded.as_ref(), deps.as_ref())
            }
            Some(other) => hook_kind_mismatch(identity, index, HookKind::Memo, other.kind()),
        }
    };

    if needs_compute {
        trace!("memo slot {index} of {identity:?} recomputing");
        let value = compute();
        let mut slots = slots.borrow_mut();
        if index == slots.len() {
            slots.push(HookSlot::Memo {
                deps,
                value: Box::new(value.clone()),
            });
        } else {
            match &mut slots[index] {
                HookSlot::Memo {
                    deps: recorded,
                    value: cached,
                } => {
                    *recorded = deps;
                    *cached = Box::new(value.clone());
                }
                _ => unreachable!("slot kind verified above"),
            }
        }
        value
    } else {
        let slots = slots.borrow();
        match &slots[index] {
            HookSlot::Memo { value, .. } => value
                .downcast_ref::<T>()
                .unwrap_or_else(|| {
                    panic!(
                        "memo type changed across renders of component {identity:?} \
                         at hook slot {index}"
                    )
                })
                .clone(),
            _ => unreachable!("slot kind verified above"),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
