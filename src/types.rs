//! Core types for sapling-ui.
//!
//! These types define the foundation that everything builds on.
//! They flow through elements, hook slots and the host capability surface.

use std::fmt;
use std::rc::Rc;

use crate::host::NodeId;

// =============================================================================
// Value
// =============================================================================

/// A scalar property value.
///
/// Used both as the attribute payload on elements and as the unit of
/// dependency comparison in the hook engine (`use_effect` / `use_memo`).
/// `PartialEq` is the only comparison the engine ever performs on values.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// String value.
    Str(String),
    /// Signed integer value.
    Int(i64),
    /// Floating point value.
    Float(f64),
    /// Boolean value.
    Bool(bool),
}

impl Value {
    /// Borrow the string payload, if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Get the integer payload, if this is an integer value.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get the boolean payload, if this is a boolean value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => write!(f, "{s}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value as i64)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Int(value as i64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(value as f64)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

// =============================================================================
// Cleanup Function
// =============================================================================

/// Cleanup thunk returned by effects.
///
/// Invoked before the effect reruns, and when the owning component identity
/// is unmounted.
pub type Cleanup = Box<dyn FnOnce()>;

/// Wrap a closure as an effect cleanup.
///
/// Sugar for the common `use_effect` return:
///
/// ```ignore
/// use_effect(deps![button], || {
///     // attach something...
///     cleanup(move || { /* detach it */ })
/// });
/// ```
pub fn cleanup(f: impl FnOnce() + 'static) -> Option<Cleanup> {
    Some(Box::new(f))
}

// =============================================================================
// Events
// =============================================================================

/// An event delivered to a listener by the host backend.
#[derive(Debug, Clone)]
pub struct Event {
    /// Event name the listener was registered under (e.g. `"click"`).
    pub name: String,
    /// Host node the event was dispatched on.
    pub target: NodeId,
}

/// Event listener callback (Rc for shared ownership in closures).
///
/// Using Rc<dyn Fn> instead of Box<dyn Fn> allows handlers to be cloned
/// into the host tree and compared by pointer identity on removal.
pub type EventHandler = Rc<dyn Fn(&Event)>;

// =============================================================================
// Tests
// =============================================================================
