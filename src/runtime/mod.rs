//! Render driver - mounts components and owns everything between renders.
//!
//! The [`Runtime`] owns the per-identity component records (hook slots,
//! component function, last props) and the committed [`Instance`] tree for
//! each mount point. A render pass:
//!
//! 1. installs a render context for the identity (hooks read it),
//! 2. invokes the component function to produce an element tree,
//! 3. tears the context down,
//! 4. hands the element tree and the previous instance to the reconciler,
//! 5. stores the new instance for the next cycle.
//!
//! Execution is single-threaded and fully synchronous. Renders are not
//! reentrant: a state write during an in-flight pass fails with
//! [`RenderError::ReentrantRender`] instead of recursing.

use std::cell::RefCell;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::rc::{Rc, Weak};

use log::{debug, warn};

use crate::element::{Element, IntoElement, Props};
use crate::error::RenderError;
use crate::hooks::context::{self, RenderContext};
use crate::hooks::slots::ComponentRecord;
use crate::host::{HostBackend, NodeId};
use crate::reconciler::{Instance, reconcile};

// =============================================================================
// Runtime
// =============================================================================

/// Shared driver state. Setters hold a weak handle to this.
pub(crate) struct RuntimeInner {
    pub(crate) host: Rc<dyn HostBackend>,
    pub(crate) records: HashMap<NodeId, ComponentRecord>,
    roots: HashMap<NodeId, Instance>,
    rendering: bool,
}

impl RuntimeInner {
    /// Whether a render pass is currently in flight.
    pub(crate) fn in_render_pass(&self) -> bool {
        self.rendering
    }
}

/// The render driver.
///
/// One runtime drives one host backend and any number of mount points.
/// Component identity is the mount point's [`NodeId`]: repeated mounts on
/// the same mount point re-render against the committed instance tree
/// instead of remounting from scratch.
pub struct Runtime {
    inner: Rc<RefCell<RuntimeInner>>,
}

impl Runtime {
    /// Create a runtime driving the given host backend.
    pub fn new(host: Rc<dyn HostBackend>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(RuntimeInner {
                host,
                records: HashMap::new(),
                roots: HashMap::new(),
                rendering: false,
            })),
        }
    }

    /// Mount (or re-render) a component at `mount_point`.
    ///
    /// The component function receives the props and returns anything
    /// [`IntoElement`] - an element tree, or a plain string for the
    /// hook-only variant. The first call creates the component record;
    /// subsequent calls for the same mount point update the record in
    /// place and diff against the committed tree.
    pub fn mount<R, F>(&self, component: F, props: Props, mount_point: NodeId) -> Result<(), RenderError>
    where
        F: Fn(&Props) -> R + 'static,
        R: IntoElement,
    {
        let render_fn: Rc<dyn Fn(&Props) -> Element> =
            Rc::new(move |props| component(props).into_element());

        {
            let mut inner = self.inner.borrow_mut();
            match inner.records.entry(mount_point) {
                Entry::Occupied(mut entry) => {
                    let record = entry.get_mut();
                    record.render_fn = render_fn;
                    record.last_props = props;
                }
                Entry::Vacant(entry) => {
                    entry.insert(ComponentRecord::new(render_fn, props));
                }
            }
        }

        render_identity(&self.inner, mount_point)
    }

    /// Unmount the component at `mount_point`.
    ///
    /// Runs every pending effect cleanup, detaches the committed instance
    /// tree from the host, and drops the component record (hook state does
    /// not survive an unmount).
    pub fn unmount(&self, mount_point: NodeId) -> Result<(), RenderError> {
        let (record, root, host) = {
            let mut inner = self.inner.borrow_mut();
            if inner.rendering {
                return Err(RenderError::ReentrantRender);
            }
            let record = inner
                .records
                .remove(&mount_point)
                .ok_or(RenderError::NotMounted(mount_point))?;
            let root = inner.roots.remove(&mount_point);
            (record, root, inner.host.clone())
        };

        debug!("unmounting identity {mount_point:?}");
        for cleanup in record.drain_cleanups() {
            cleanup();
        }
        reconcile(host.as_ref(), mount_point, root, None)?;
        Ok(())
    }

    /// Whether a component is mounted at `mount_point`.
    pub fn is_mounted(&self, mount_point: NodeId) -> bool {
        self.inner.borrow().records.contains_key(&mount_point)
    }
}

// =============================================================================
// Render Pass
// =============================================================================

/// Clears the in-flight flag when the pass ends, including during
/// unwinding from a panicking component.
struct RenderFlag {
    inner: Weak<RefCell<RuntimeInner>>,
}

impl Drop for RenderFlag {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.borrow_mut().rendering = false;
        }
    }
}

/// Run one render pass for `identity` with its last-known props.
pub(crate) fn render_identity(
    inner: &Rc<RefCell<RuntimeInner>>,
    identity: NodeId,
) -> Result<(), RenderError> {
    let (render_fn, props, slots, host, previous) = {
        let mut runtime = inner.borrow_mut();
        if runtime.rendering {
            return Err(RenderError::ReentrantRender);
        }
        let (render_fn, props, slots) = {
            let record = match runtime.records.get(&identity) {
                Some(record) => record,
                None => return Err(RenderError::NotMounted(identity)),
            };
            (
                record.render_fn.clone(),
                record.last_props.clone(),
                record.slots.clone(),
            )
        };
        let previous = runtime.roots.remove(&identity);
        let host = runtime.host.clone();
        runtime.rendering = true;
        (render_fn, props, slots, host, previous)
    };
    let _flag = RenderFlag {
        inner: Rc::downgrade(inner),
    };

    debug!("render pass for identity {identity:?}");
    let element = {
        let _context = context::enter(RenderContext::new(
            identity,
            slots,
            Rc::downgrade(inner),
        ));
        render_fn(&props)
    };

    let previous_node = previous.as_ref().map(Instance::node);
    let next = match reconcile(host.as_ref(), identity, previous, Some(&element)) {
        Ok(next) => next,
        Err(err) => {
            // The committed instance is gone from the bookkeeping, so the
            // half-updated tree must leave the host too; otherwise the next
            // render would mount a second tree beside it.
            if let Some(node) = previous_node {
                if let Err(detach) = host.remove_child(identity, node) {
                    warn!("failed to detach stale tree under {identity:?}: {detach}");
                }
            }
            return Err(err);
        }
    };

    if let Some(instance) = next {
        inner.borrow_mut().roots.insert(identity, instance);
    }
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use super::*;
    use crate::element::Element;
    use crate::error::HostError;
    use crate::hooks::{use_effect, use_state};
    use crate::host::MemoryHost;
    use crate::types::{EventHandler, Value, cleanup};

    fn setup() -> (Rc<MemoryHost>, Runtime, NodeId) {
        let _ = env_logger::builder().is_test(true).try_init();
        let host = Rc::new(MemoryHost::new());
        let runtime = Runtime::new(host.clone());
        let root = host.create_root();
        (host, runtime, root)
    }

    #[test]
    fn test_mount_commits_tree() {
        let (host, runtime, root) = setup();

        runtime
            .mount(
                |props: &Props| {
                    let label = props
                        .get("label")
                        .map(|v| v.to_string())
                        .unwrap_or_default();
                    Element::node("div").child(Element::node("span").child(label))
                },
                Props::new().attr("label", "hi"),
                root,
            )
            .unwrap();

        assert!(runtime.is_mounted(root));
        let div = host.children(root)[0];
        let span = host.children(div)[0];
        let text = host.children(span)[0];
        assert_eq!(host.text(text), Some("hi".to_string()));
    }

    #[test]
    fn test_remount_reuses_committed_tree() {
        let (host, runtime, root) = setup();

        let component =
            |props: &Props| Element::node("div").attr("n", props.get("n").cloned().unwrap());

        runtime
            .mount(component, Props::new().attr("n", 1i64), root)
            .unwrap();
        let node = host.children(root)[0];

        runtime
            .mount(component, Props::new().attr("n", 2i64), root)
            .unwrap();

        // Same host node: the second mount diffed, it did not remount.
        assert_eq!(host.children(root), vec![node]);
        assert_eq!(host.attr(node, "n"), Some(Value::from(2i64)));
    }

    #[test]
    fn test_string_component_renders_text() {
        let (host, runtime, root) = setup();

        runtime
            .mount(
                |_props: &Props| {
                    let (count, _set) = use_state(3i64);
                    format!("count: {count}")
                },
                Props::new(),
                root,
            )
            .unwrap();

        let text = host.children(root)[0];
        assert_eq!(host.text(text), Some("count: 3".to_string()));
    }

    #[test]
    fn test_listener_write_rerenders() {
        let (host, runtime, root) = setup();

        runtime
            .mount(
                |_props: &Props| {
                    let (count, set_count) = use_state(0i64);
                    Element::node("button")
                        .attr("count", count)
                        .on("click", move |_| {
                            set_count.update(|c| c + 1).unwrap();
                        })
                },
                Props::new(),
                root,
            )
            .unwrap();

        let button = host.children(root)[0];
        assert_eq!(host.attr(button, "count"), Some(Value::from(0i64)));

        host.dispatch(button, "click").unwrap();
        assert_eq!(host.attr(button, "count"), Some(Value::from(1i64)));

        host.dispatch(button, "click").unwrap();
        host.dispatch(button, "click").unwrap();
        assert_eq!(host.attr(button, "count"), Some(Value::from(3i64)));
    }

    #[test]
    fn test_setter_during_render_fails_fast() {
        let (_host, runtime, root) = setup();
        let seen: Rc<RefCell<Option<RenderError>>> = Rc::new(RefCell::new(None));

        let seen_inner = seen.clone();
        runtime
            .mount(
                move |_props: &Props| {
                    let (count, set_count) = use_state(0i64);
                    if count == 0 {
                        // Writing from inside the render body must not recurse.
                        *seen_inner.borrow_mut() = set_count.set(1).err();
                    }
                    Element::node("div")
                },
                Props::new(),
                root,
            )
            .unwrap();

        assert!(matches!(
            *seen.borrow(),
            Some(RenderError::ReentrantRender)
        ));
    }

    #[test]
    fn test_unmount_detaches_and_runs_cleanups() {
        let (host, runtime, root) = setup();
        let cleanups = Rc::new(Cell::new(0));

        let cleanups_outer = cleanups.clone();
        runtime
            .mount(
                move |_props: &Props| {
                    let cleanups = cleanups_outer.clone();
                    use_effect(Some(Vec::new()), move || {
                        cleanup(move || cleanups.set(cleanups.get() + 1))
                    });
                    Element::node("div")
                },
                Props::new(),
                root,
            )
            .unwrap();

        let node = host.children(root)[0];
        assert_eq!(cleanups.get(), 0);

        runtime.unmount(root).unwrap();

        assert_eq!(cleanups.get(), 1);
        assert!(!host.is_attached(node));
        assert!(!runtime.is_mounted(root));
    }

    #[test]
    fn test_unmount_drops_hook_state() {
        let (host, runtime, root) = setup();
        let setter_cell: Rc<RefCell<Option<crate::hooks::Setter<i64>>>> =
            Rc::new(RefCell::new(None));

        let captured = setter_cell.clone();
        let component = move |_props: &Props| {
            let (count, set_count) = use_state(0i64);
            *captured.borrow_mut() = Some(set_count);
            Element::node("div").attr("count", count)
        };

        runtime.mount(component.clone(), Props::new(), root).unwrap();
        let setter = setter_cell.borrow().clone().unwrap();
        setter.set(7).unwrap();
        let node = host.children(root)[0];
        assert_eq!(host.attr(node, "count"), Some(Value::from(7i64)));

        runtime.unmount(root).unwrap();

        // A fresh mount starts from the initial value again.
        runtime.mount(component, Props::new(), root).unwrap();
        let node = host.children(root)[0];
        assert_eq!(host.attr(node, "count"), Some(Value::from(0i64)));
    }

    #[test]
    fn test_unmount_when_nothing_mounted() {
        let (_host, runtime, root) = setup();
        let err = runtime.unmount(root).unwrap_err();
        assert!(matches!(err, RenderError::NotMounted(id) if id == root));
    }

    #[test]
    fn test_two_mount_points_are_independent() {
        let (host, runtime, root_a) = setup();
        let root_b = host.create_root();

        let component = |props: &Props| {
            let (count, _set) = use_state(0i64);
            let offset = props.get("offset").and_then(Value::as_int).unwrap_or(0);
            Element::node("div").attr("value", count + offset)
        };

        runtime
            .mount(component, Props::new().attr("offset", 10i64), root_a)
            .unwrap();
        runtime
            .mount(component, Props::new().attr("offset", 20i64), root_b)
            .unwrap();

        let a = host.children(root_a)[0];
        let b = host.children(root_b)[0];
        assert_eq!(host.attr(a, "value"), Some(Value::from(10i64)));
        assert_eq!(host.attr(b, "value"), Some(Value::from(20i64)));

        runtime.unmount(root_a).unwrap();
        assert!(!runtime.is_mounted(root_a));
        assert!(runtime.is_mounted(root_b));
        assert_eq!(host.attr(b, "value"), Some(Value::from(20i64)));
    }

    /// Delegates to a [`MemoryHost`], failing the next attribute write on
    /// demand.
    struct FlakyHost {
        tree: MemoryHost,
        fail_next_set: Cell<bool>,
    }

    impl FlakyHost {
        fn new() -> Self {
            Self {
                tree: MemoryHost::new(),
                fail_next_set: Cell::new(false),
            }
        }
    }

    impl HostBackend for FlakyHost {
        fn create_node(&self, kind: &str) -> Result<NodeId, HostError> {
            self.tree.create_node(kind)
        }

        fn create_text_node(&self, value: &str) -> Result<NodeId, HostError> {
            self.tree.create_text_node(value)
        }

        fn append_child(&self, parent: NodeId, child: NodeId) -> Result<(), HostError> {
            self.tree.append_child(parent, child)
        }

        fn remove_child(&self, parent: NodeId, child: NodeId) -> Result<(), HostError> {
            self.tree.remove_child(parent, child)
        }

        fn replace_child(&self, parent: NodeId, old: NodeId, new: NodeId) -> Result<(), HostError> {
            self.tree.replace_child(parent, old, new)
        }

        fn set_attribute(&self, node: NodeId, name: &str, value: &Value) -> Result<(), HostError> {
            if self.fail_next_set.replace(false) {
                return Err(HostError::Backend("attribute store offline".into()));
            }
            self.tree.set_attribute(node, name, value)
        }

        fn clear_attribute(&self, node: NodeId, name: &str) -> Result<(), HostError> {
            self.tree.clear_attribute(node, name)
        }

        fn add_listener(
            &self,
            node: NodeId,
            event: &str,
            handler: EventHandler,
        ) -> Result<(), HostError> {
            self.tree.add_listener(node, event, handler)
        }

        fn remove_listener(
            &self,
            node: NodeId,
            event: &str,
            handler: &EventHandler,
        ) -> Result<(), HostError> {
            self.tree.remove_listener(node, event, handler)
        }
    }

    #[test]
    fn test_failed_render_does_not_duplicate_tree() {
        let _ = env_logger::builder().is_test(true).try_init();
        let host = Rc::new(FlakyHost::new());
        let runtime = Runtime::new(host.clone());
        let root = host.tree.create_root();

        let component =
            |props: &Props| Element::node("div").attr("n", props.get("n").cloned().unwrap());

        runtime
            .mount(component, Props::new().attr("n", 1i64), root)
            .unwrap();
        assert_eq!(host.tree.children(root).len(), 1);

        // The update pass fails while rewriting attributes.
        host.fail_next_set.set(true);
        let err = runtime
            .mount(component, Props::new().attr("n", 2i64), root)
            .unwrap_err();
        assert!(matches!(err, RenderError::Host(HostError::Backend(_))));

        // The stale tree was detached with the failed pass, so the next
        // render commits exactly one tree under the mount point.
        runtime
            .mount(component, Props::new().attr("n", 3i64), root)
            .unwrap();
        let children = host.tree.children(root);
        assert_eq!(children.len(), 1);
        assert_eq!(host.tree.attr(children[0], "n"), Some(Value::from(3i64)));
    }

    #[test]
    fn test_children_shrink_and_grow_through_runtime() {
        let (host, runtime, root) = setup();

        let component = |props: &Props| {
            let n = props.get("n").and_then(Value::as_int).unwrap_or(0);
            let mut element = Element::node("list");
            for i in 0..n {
                element = element.child(Element::node("item").attr("i", i));
            }
            element
        };

        runtime
            .mount(component, Props::new().attr("n", 2i64), root)
            .unwrap();
        let list = host.children(root)[0];
        assert_eq!(host.children(list).len(), 2);

        runtime
            .mount(component, Props::new().attr("n", 3i64), root)
            .unwrap();
        assert_eq!(host.children(list).len(), 3);

        runtime
            .mount(component, Props::new().attr("n", 1i64), root)
            .unwrap();
        assert_eq!(host.children(list).len(), 1);
    }
}
