//! Element model - immutable descriptions of UI tree nodes.
//!
//! An [`Element`] is a pure value: a type tag, partitioned props and an
//! ordered child list. Elements are the only thing component functions
//! produce - the reconciler turns them into live host mutations.
//!
//! Construction normalizes children: scalar children are wrapped as text
//! elements and absent entries are dropped, so `children` always holds
//! real elements.

mod props;

pub use props::Props;

use std::fmt;

use crate::types::Value;

/// Attribute name carrying the payload of a text element.
pub const TEXT_VALUE: &str = "node_value";

// =============================================================================
// Element
// =============================================================================

/// Type tag of an element: a host node type name, or the reserved text
/// marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementKind {
    /// Host node of the named type (e.g. `"div"`, `"row"`).
    Host(String),
    /// Text leaf.
    Text,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementKind::Host(name) => write!(f, "{name}"),
            ElementKind::Text => write!(f, "#text"),
        }
    }
}

/// Immutable description of one UI tree node.
#[derive(Debug, Clone)]
pub struct Element {
    /// Type tag.
    pub kind: ElementKind,
    /// Attributes and listeners.
    pub props: Props,
    /// Ordered child elements (always present, possibly empty).
    pub children: Vec<Element>,
}

impl Element {
    /// Start a host element of the given type (builder style).
    pub fn node(kind: impl Into<String>) -> Self {
        Self {
            kind: ElementKind::Host(kind.into()),
            props: Props::new(),
            children: Vec::new(),
        }
    }

    /// A text element carrying the given value.
    pub fn text(value: impl Into<Value>) -> Self {
        create_text_element(value)
    }

    /// Add an attribute (builder style).
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.props.set_attr(name, value);
        self
    }

    /// Add an event listener (builder style).
    pub fn on(
        mut self,
        event: impl Into<String>,
        handler: impl Fn(&crate::types::Event) + 'static,
    ) -> Self {
        self.props.set_listener(event, std::rc::Rc::new(handler));
        self
    }

    /// Append one child. Scalars are wrapped as text elements; `None`
    /// entries are dropped.
    pub fn child(mut self, child: impl Into<Child>) -> Self {
        if let Child(Some(element)) = child.into() {
            self.children.push(element);
        }
        self
    }

    /// Append several children of one convertible type.
    pub fn children<C: Into<Child>>(mut self, children: impl IntoIterator<Item = C>) -> Self {
        for child in children {
            self = self.child(child);
        }
        self
    }

    /// Whether this is a text element.
    pub fn is_text(&self) -> bool {
        self.kind == ElementKind::Text
    }

    /// The text payload, for text elements.
    pub fn text_value(&self) -> Option<&Value> {
        self.props.get(TEXT_VALUE)
    }
}

// =============================================================================
// Construction
// =============================================================================

/// A normalized child entry: either an element, or nothing.
///
/// `From` conversions give `child()`/`create_element` their variadic feel:
/// elements pass through, scalars become text elements, and `None` marks
/// an entry to drop (the conditional-rendering idiom).
pub struct Child(Option<Element>);

impl From<Element> for Child {
    fn from(element: Element) -> Self {
        Child(Some(element))
    }
}

impl From<Option<Element>> for Child {
    fn from(element: Option<Element>) -> Self {
        Child(element)
    }
}

impl From<&str> for Child {
    fn from(value: &str) -> Self {
        Child(Some(create_text_element(value)))
    }
}

impl From<String> for Child {
    fn from(value: String) -> Self {
        Child(Some(create_text_element(value)))
    }
}

impl From<i64> for Child {
    fn from(value: i64) -> Self {
        Child(Some(create_text_element(value)))
    }
}

impl From<Value> for Child {
    fn from(value: Value) -> Self {
        Child(Some(create_text_element(value)))
    }
}

/// Build a host element from a type tag, props and children.
///
/// Children are normalized: absent entries are dropped and scalar entries
/// are wrapped as text elements. Construction is pure - this and
/// [`create_text_element`] are the only places element trees are built.
pub fn create_element<C: Into<Child>>(
    kind: impl Into<String>,
    props: Props,
    children: impl IntoIterator<Item = C>,
) -> Element {
    Element {
        kind: ElementKind::Host(kind.into()),
        props,
        children: children
            .into_iter()
            .filter_map(|child| child.into().0)
            .collect(),
    }
}

/// Build a text element carrying a single value and no children.
pub fn create_text_element(value: impl Into<Value>) -> Element {
    Element {
        kind: ElementKind::Text,
        props: Props::new().attr(TEXT_VALUE, value),
        children: Vec::new(),
    }
}

// =============================================================================
// IntoElement
// =============================================================================

/// Conversion of a component function's return value into an element.
///
/// Lets components return a full element tree, or just a string (the
/// hook-only variant) which renders as a single text node.
pub trait IntoElement {
    /// Convert into an element.
    fn into_element(self) -> Element;
}

impl IntoElement for Element {
    fn into_element(self) -> Element {
        self
    }
}

impl IntoElement for String {
    fn into_element(self) -> Element {
        create_text_element(self)
    }
}

impl IntoElement for &str {
    fn into_element(self) -> Element {
        create_text_element(self)
    }
}

// =============================================================================
// Tests
// =============================================================================
