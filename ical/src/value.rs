// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! The value tree produced by the parser.
//!
//! Every leaf is a string. Components (`BEGIN`/`END` blocks) and inline
//! parameter lists become objects, and a component type that repeats among
//! siblings becomes an array of objects.

use indexmap::IndexMap;
use serde::ser::{Serialize, Serializer};

/// An insertion-ordered mapping from property or component name to value.
pub type Object = IndexMap<String, Value>;

/// A node of the parsed tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// A scalar property value.
    String(String),

    /// A single component, or a decoded inline-parameter property.
    Object(Object),

    /// A component type that occurred more than once under the same parent,
    /// in source order.
    Array(Vec<Object>),
}

impl Value {
    /// Returns the string if this is a `String`.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the object if this is an `Object`.
    #[must_use]
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Returns the objects if this is an `Array`.
    #[must_use]
    pub fn as_array(&self) -> Option<&[Object]> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// Returns `true` if this is a `String`.
    #[must_use]
    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    /// Returns `true` if this is an `Object`.
    #[must_use]
    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    /// Returns `true` if this is an `Array`.
    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    /// Iterate the objects behind a component slot.
    ///
    /// A bare object yields itself once, an array yields each element, and a
    /// string yields nothing. Useful when a caller does not care whether a
    /// component occurred once or many times.
    pub fn objects(&self) -> impl Iterator<Item = &Object> {
        let (single, many): (Option<&Object>, &[Object]) = match self {
            Value::Object(obj) => (Some(obj), &[]),
            Value::Array(arr) => (None, arr),
            Value::String(_) => (None, &[]),
        };
        single.into_iter().chain(many)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::String(s) => serializer.serialize_str(s),
            Value::Object(obj) => obj.serialize(serializer),
            Value::Array(arr) => arr.serialize(serializer),
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<Object> for Value {
    fn from(obj: Object) -> Self {
        Value::Object(obj)
    }
}

impl From<Vec<Object>> for Value {
    fn from(arr: Vec<Object>) -> Self {
        Value::Array(arr)
    }
}
