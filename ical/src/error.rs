// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

use crate::diagnostic::ScopeTrace;

/// Fatal errors. Any of these aborts the parse and no tree is returned.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// `END` with no open scope.
    #[error("Unexpected END:{name} at the root object (line {line})")]
    UnexpectedEnd {
        /// Name on the `END` line.
        name: String,
        /// 1-based logical line number.
        line: usize,
    },

    /// `END` naming a type other than the innermost open scope.
    #[error(
        "Unexpected END:{found}, expected END:{expected} (line {line})\nParse stack: {trace}"
    )]
    MismatchedEnd {
        /// Name on the `END` line.
        found: String,
        /// Type of the innermost open scope.
        expected: String,
        /// 1-based logical line number.
        line: usize,
        /// Open scopes, unchanged by the failed `END`.
        trace: ScopeTrace,
    },

    /// `BEGIN` naming a key that already holds a string property.
    #[error(
        "{name} was used both as a component type and a property name (line {line})\nParse stack: {trace}"
    )]
    ConflictingName {
        /// The conflicting name.
        name: String,
        /// 1-based logical line number.
        line: usize,
        /// Open scopes at the `BEGIN` line.
        trace: ScopeTrace,
    },

    /// Input ended while scopes were still open.
    #[error("Unexpected EOF: still {depth} levels deep\nParse stack: {trace}")]
    UnexpectedEof {
        /// Number of scopes left open.
        depth: usize,
        /// The scopes left open.
        trace: ScopeTrace,
    },

    /// Internal state disagreed with itself.
    #[error("Internal parser invariant violated: {0}")]
    Invariant(&'static str),
}

impl ParseError {
    /// 1-based logical line number the error points at, if any.
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        match self {
            ParseError::UnexpectedEnd { line, .. }
            | ParseError::MismatchedEnd { line, .. }
            | ParseError::ConflictingName { line, .. } => Some(*line),
            ParseError::UnexpectedEof { .. } | ParseError::Invariant(_) => None,
        }
    }
}
