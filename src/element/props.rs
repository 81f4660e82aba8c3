//! Props - partitioned attribute and listener mappings.
//!
//! Props are split into attributes and event listeners at construction
//! time. The split replaces key-text sniffing (an `on` prefix) with an
//! explicit capability distinction: the reconciler never has to ask what
//! kind of prop a key is while applying updates.
//!
//! Both partitions preserve insertion order, so host mutations happen in
//! the order props were declared.

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::types::{Event, EventHandler, Value};

/// Attribute and listener mappings for one element (or one component).
#[derive(Clone, Default)]
pub struct Props {
    attrs: IndexMap<String, Value>,
    listeners: IndexMap<String, EventHandler>,
}

impl Props {
    /// Empty props.
    pub fn new() -> Self {
        Self::default()
    }

    // -------------------------------------------------------------------------
    // Construction
    // -------------------------------------------------------------------------

    /// Add an attribute (builder style).
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Add an event listener (builder style).
    pub fn on(mut self, event: impl Into<String>, handler: impl Fn(&Event) + 'static) -> Self {
        self.set_listener(event, Rc::new(handler));
        self
    }

    /// Insert an attribute.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.attrs.insert(name.into(), value.into());
    }

    /// Insert an event listener (replaces any previous listener for the event).
    pub fn set_listener(&mut self, event: impl Into<String>, handler: EventHandler) {
        self.listeners.insert(event.into(), handler);
    }

    // -------------------------------------------------------------------------
    // Access
    // -------------------------------------------------------------------------

    /// Look up an attribute value.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attrs.get(name)
    }

    /// Look up a listener.
    pub fn listener(&self, event: &str) -> Option<&EventHandler> {
        self.listeners.get(event)
    }

    /// Iterate attributes in declaration order.
    pub fn attrs(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.attrs.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterate attribute names in declaration order.
    pub fn attr_names(&self) -> impl Iterator<Item = &str> {
        self.attrs.keys().map(String::as_str)
    }

    /// Iterate listeners in declaration order.
    pub fn listeners(&self) -> impl Iterator<Item = (&str, &EventHandler)> {
        self.listeners.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Whether no attributes or listeners are set.
    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty() && self.listeners.is_empty()
    }
}

impl fmt::Debug for Props {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Props")
            .field("attrs", &self.attrs)
            .field(
                "listeners",
                &self.listeners.keys().collect::<Vec<&String>>(),
            )
            .finish()
    }
}
