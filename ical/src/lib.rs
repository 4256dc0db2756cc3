// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Turn iCalendar-style documents into a nested, JSON-like value tree.
//!
//! `BEGIN`/`END` blocks become nested objects, keyed by their type; a type that
//! repeats among siblings becomes an array of objects. `KEY:value` lines become
//! string properties, and `KEY;A=1;B=2` lines become objects of their inline
//! parameters. Folded lines (starting with a single space) are joined onto the
//! previous property.
//!
//! This is deliberately not an RFC 5545 implementation: values are never
//! unescaped or typed, and dates, time zones and recurrences are left as text.
//!
//! Problems that can be recovered from are reported as [`Warning`]s through a
//! [`WarningSink`]; broken nesting aborts the parse with a [`ParseError`].

#![warn(
    trivial_casts,
    trivial_numeric_casts,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    unused_qualifications,
    clippy::dbg_macro,
    clippy::indexing_slicing,
    clippy::pedantic
)]
// Allow certain clippy lints that are too restrictive for this crate
#![allow(clippy::single_match_else, clippy::match_bool)]

mod diagnostic;
mod error;
pub mod line;
mod parser;
mod property;
mod scope;
mod util;
mod value;

pub use crate::diagnostic::{ScopeTrace, TraceSegment, TracingSink, Warning, WarningKind, WarningSink};
pub use crate::error::ParseError;
pub use crate::parser::{ParseOptions, TreeBuilder, parse, parse_with};
pub use crate::value::{Object, Value};
