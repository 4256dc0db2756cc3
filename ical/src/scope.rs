// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Tracking of nested `BEGIN`/`END` scopes.
//!
//! The stack does not hold references into the tree. Each open scope records
//! the key it occupies in its parent and, when that slot is an array, its
//! index in the array. The current object is found again by walking from the
//! root, which keeps the tree singly owned and makes a rejected `END` leave
//! the stack untouched.

use crate::diagnostic::{ScopeTrace, TraceSegment};
use crate::error::ParseError;
use crate::util::assert_defined;
use crate::value::{Object, Value};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Scope {
    /// Component type, also the key in the parent object.
    name: String,
    /// Position in the parent's array, or `None` for a bare object slot.
    index: Option<usize>,
}

/// Stack of open scopes, outermost first. Empty means "at the root".
#[derive(Debug, Clone, Default)]
pub(crate) struct ScopeStack {
    scopes: Vec<Scope>,
}

impl ScopeStack {
    pub(crate) fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Resolve the innermost open object.
    pub(crate) fn current_mut<'a>(&self, root: &'a mut Object) -> Result<&'a mut Object, ParseError> {
        let mut obj = root;
        for scope in &self.scopes {
            let slot = assert_defined(obj.get_mut(&scope.name), "open scope missing from parent")?;
            obj = match (slot, scope.index) {
                (Value::Object(child), None) => child,
                (Value::Array(children), Some(i)) => {
                    assert_defined(children.get_mut(i), "open scope index out of bounds")?
                }
                _ => return Err(ParseError::Invariant("open scope slot changed shape")),
            };
        }
        Ok(obj)
    }

    /// Render the open scopes, reading array lengths from the live tree.
    pub(crate) fn trace(&self, root: &Object) -> ScopeTrace {
        let mut segments = Vec::with_capacity(self.scopes.len());
        let mut parent = Some(root);
        for scope in &self.scopes {
            let slot = parent.and_then(|obj| obj.get(&scope.name));
            let len = match slot {
                Some(Value::Array(children)) => Some(children.len()),
                _ => None,
            };
            segments.push(TraceSegment {
                name: scope.name.clone(),
                len,
            });
            parent = match (slot, scope.index) {
                (Some(Value::Object(child)), None) => Some(child),
                (Some(Value::Array(children)), Some(i)) => children.get(i),
                _ => None,
            };
        }
        ScopeTrace::new(segments)
    }

    /// Open a scope named `name` under the current object and descend into it.
    ///
    /// The first occurrence of a name stores a bare object. A repeat turns the
    /// slot into an array (if it is not one already) and appends a fresh
    /// object.
    ///
    /// ## Errors
    ///
    /// Returns [`ParseError::ConflictingName`] if `name` already holds a
    /// string property.
    pub(crate) fn begin(
        &mut self,
        root: &mut Object,
        name: &str,
        line: usize,
    ) -> Result<(), ParseError> {
        let parent = self.current_mut(root)?;
        let index = match parent.get_mut(name) {
            None => {
                parent.insert(name.to_owned(), Value::Object(Object::new()));
                None
            }
            Some(Value::String(_)) => {
                return Err(ParseError::ConflictingName {
                    name: name.to_owned(),
                    line,
                    trace: self.trace(root),
                });
            }
            Some(Value::Array(children)) => {
                children.push(Object::new());
                Some(children.len() - 1)
            }
            Some(slot) => {
                let Value::Object(first) = std::mem::replace(slot, Value::Array(Vec::new())) else {
                    return Err(ParseError::Invariant("object slot changed while promoting"));
                };
                *slot = Value::Array(vec![first, Object::new()]);
                Some(1)
            }
        };

        tracing::trace!(name, ?index, depth = self.depth() + 1, "entering scope");
        self.scopes.push(Scope {
            name: name.to_owned(),
            index,
        });
        Ok(())
    }

    /// Close the innermost scope, which must be named `name`.
    ///
    /// ## Errors
    ///
    /// Returns [`ParseError::UnexpectedEnd`] at the root and
    /// [`ParseError::MismatchedEnd`] on a name mismatch; the stack is left
    /// unchanged in both cases.
    pub(crate) fn end(&mut self, root: &Object, name: &str, line: usize) -> Result<(), ParseError> {
        let Some(innermost) = self.scopes.last() else {
            return Err(ParseError::UnexpectedEnd {
                name: name.to_owned(),
                line,
            });
        };

        if innermost.name != name {
            return Err(ParseError::MismatchedEnd {
                found: name.to_owned(),
                expected: innermost.name.clone(),
                line,
                trace: self.trace(root),
            });
        }

        let closed = assert_defined(self.scopes.pop(), "scope vanished before pop")?;
        tracing::trace!(name = %closed.name, depth = self.depth(), "leaving scope");
        Ok(())
    }

    /// Check that every scope has been closed.
    ///
    /// ## Errors
    ///
    /// Returns [`ParseError::UnexpectedEof`] if any scope is still open.
    pub(crate) fn finish(&self, root: &Object) -> Result<(), ParseError> {
        match self.depth() {
            0 => Ok(()),
            depth => Err(ParseError::UnexpectedEof {
                depth,
                trace: self.trace(root),
            }),
        }
    }
}
