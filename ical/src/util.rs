// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use crate::error::ParseError;

/// Unwrap a value that the parser's own bookkeeping guarantees is present.
///
/// ## Errors
///
/// Returns [`ParseError::Invariant`] with `what` when the value is absent.
pub(crate) fn assert_defined<T>(value: Option<T>, what: &'static str) -> Result<T, ParseError> {
    value.ok_or(ParseError::Invariant(what))
}
