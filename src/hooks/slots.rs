//! Hook slot storage.
//!
//! Each component identity owns an ordered, growable sequence of slots -
//! one per hook call site, appended the first time a call index is reached
//! and addressed by position thereafter. Position is the only key: the
//! number and kind of hook calls must be identical on every render of one
//! identity (the call-order invariant), and every hook checks the recorded
//! kind against its own on each call.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::element::{Element, Props};
use crate::types::{Cleanup, Value};

// =============================================================================
// Hook Slots
// =============================================================================

/// One persistent per-call-site storage cell.
pub(crate) enum HookSlot {
    /// `use_state` value.
    State { value: Box<dyn Any> },
    /// `use_effect` bookkeeping: last dependency sequence and pending cleanup.
    Effect {
        deps: Option<Vec<Value>>,
        cleanup: Option<Cleanup>,
    },
    /// `use_memo` bookkeeping: last dependency sequence and cached value.
    Memo {
        deps: Option<Vec<Value>>,
        value: Box<dyn Any>,
    },
}

impl HookSlot {
    pub(crate) fn kind(&self) -> HookKind {
        match self {
            HookSlot::State { .. } => HookKind::State,
            HookSlot::Effect { .. } => HookKind::Effect,
            HookSlot::Memo { .. } => HookKind::Memo,
        }
    }
}

/// Hook slot kind, for call-order diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HookKind {
    State,
    Effect,
    Memo,
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookKind::State => write!(f, "use_state"),
            HookKind::Effect => write!(f, "use_effect"),
            HookKind::Memo => write!(f, "use_memo"),
        }
    }
}

// =============================================================================
// Dependency Comparison
// =============================================================================

/// Dependency-change policy shared by `use_effect` and `use_memo`.
///
/// `None` on either side counts as changed: a `None` request means "rerun
/// every render", and a `None` record means the slot has never run.
/// Otherwise the sequences are compared pairwise (a length change counts
/// as changed).
pub(crate) fn deps_changed(prev: Option<&Vec<Value>>, next: Option<&Vec<Value>>) -> bool {
    match (prev, next) {
        (_, None) => true,
        (None, Some(_)) => true,
        (Some(prev), Some(next)) => prev != next,
    }
}

// =============================================================================
// Component Records
// =============================================================================

/// Per-identity bookkeeping: hook slots, the component function and the
/// props it was last rendered with.
///
/// Created on the first render of an identity, updated in place on every
/// subsequent render, destroyed by `Runtime::unmount` (which drains the
/// pending effect cleanups first).
pub(crate) struct ComponentRecord {
    /// Hook slot arena, shared with the render context during a pass.
    pub(crate) slots: Rc<RefCell<Vec<HookSlot>>>,
    /// The component function.
    pub(crate) render_fn: Rc<dyn Fn(&Props) -> Element>,
    /// Props from the most recent render; setters re-render with these.
    pub(crate) last_props: Props,
}

impl ComponentRecord {
    pub(crate) fn new(render_fn: Rc<dyn Fn(&Props) -> Element>, props: Props) -> Self {
        Self {
            slots: Rc::new(RefCell::new(Vec::new())),
            render_fn,
            last_props: props,
        }
    }

    /// Take every pending effect cleanup, in slot order.
    pub(crate) fn drain_cleanups(&self) -> Vec<Cleanup> {
        let mut slots = self.slots.borrow_mut();
        slots
            .iter_mut()
            .filter_map(|slot| match slot {
                HookSlot::Effect { cleanup, .. } => cleanup.take(),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(items: &[i64]) -> Vec<Value> {
        items.iter().map(|&i| Value::from(i)).collect()
    }

    #[test]
    fn test_deps_changed_policy() {
        // No requested deps: always changed.
        assert!(deps_changed(None, None));
        assert!(deps_changed(Some(&values(&[1])), None));

        // No recorded deps: first run always fires.
        assert!(deps_changed(None, Some(&values(&[1]))));
        assert!(deps_changed(None, Some(&Vec::new())));

        // Pairwise comparison.
        assert!(!deps_changed(Some(&values(&[1, 2])), Some(&values(&[1, 2]))));
        assert!(deps_changed(Some(&values(&[1, 2])), Some(&values(&[1, 3]))));

        // Empty deps never change once recorded.
        assert!(!deps_changed(Some(&Vec::new()), Some(&Vec::new())));

        // A length change counts as changed.
        assert!(deps_changed(Some(&values(&[1, 2])), Some(&values(&[1]))));
    }

    #[test]
    fn test_drain_cleanups_takes_effect_slots_only() {
        use std::cell::Cell;

        let record = ComponentRecord::new(Rc::new(|_| Element::node("div")), Props::new());
        let ran = Rc::new(Cell::new(0));
        let ran_clone = ran.clone();

        record.slots.borrow_mut().push(HookSlot::State {
            value: Box::new(1i64),
        });
        record.slots.borrow_mut().push(HookSlot::Effect {
            deps: Some(Vec::new()),
            cleanup: Some(Box::new(move || ran_clone.set(ran_clone.get() + 1))),
        });
        record.slots.borrow_mut().push(HookSlot::Effect {
            deps: None,
            cleanup: None,
        });

        let cleanups = record.drain_cleanups();
        assert_eq!(cleanups.len(), 1);
        for cleanup in cleanups {
            cleanup();
        }
        assert_eq!(ran.get(), 1);

        // Drained: a second pass finds nothing.
        assert!(record.drain_cleanups().is_empty());
    }
}
