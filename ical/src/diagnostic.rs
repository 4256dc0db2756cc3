// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Non-fatal diagnostics and where they are delivered.

use std::fmt::{self, Display};

/// The currently open scopes, outermost first.
///
/// Rendered as `VCALENDAR -> VEVENT[2] -> VALARM`, where `[n]` marks a level
/// whose slot in the parent is an array and `n` is its length at the time the
/// trace was taken.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeTrace {
    segments: Vec<TraceSegment>,
}

/// One level of a [`ScopeTrace`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceSegment {
    /// Component type or property name.
    pub name: String,

    /// Array length, if the slot holding this level is an array.
    pub len: Option<usize>,
}

impl ScopeTrace {
    /// Create a trace from its segments, outermost first.
    #[must_use]
    pub fn new(segments: Vec<TraceSegment>) -> Self {
        Self { segments }
    }

    /// Extend the trace with the name of a property being decoded.
    #[must_use]
    pub fn with_property(mut self, name: &str) -> Self {
        self.segments.push(TraceSegment {
            name: name.to_owned(),
            len: None,
        });
        self
    }

    /// Segments of the trace, outermost first.
    #[must_use]
    pub fn segments(&self) -> &[TraceSegment] {
        &self.segments
    }

    /// Returns `true` at the root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl Display for ScopeTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(" -> ")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl Display for TraceSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.len {
            Some(len) => write!(f, "{}[{len}]", self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// What a [`Warning`] is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningKind {
    /// A continuation line with no property to continue.
    OrphanContinuation,

    /// A property line with neither `:` nor a leading `;` segment.
    MissingColon,

    /// A property whose name is already present on the same object.
    DuplicateProperty,

    /// An inline parameter whose name already appeared in the same list.
    DuplicateInlineParameter,

    /// An inline parameter segment without `=`.
    MissingEquals,
}

impl WarningKind {
    /// Short machine-friendly name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            WarningKind::OrphanContinuation => "orphan-continuation",
            WarningKind::MissingColon => "missing-colon",
            WarningKind::DuplicateProperty => "duplicate-property",
            WarningKind::DuplicateInlineParameter => "duplicate-inline-parameter",
            WarningKind::MissingEquals => "missing-equals",
        }
    }
}

impl Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recoverable problem. Parsing continues after it is reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    /// Category of the problem.
    pub kind: WarningKind,

    /// Human-readable description.
    pub message: String,

    /// Open scopes at the moment the problem was found.
    pub trace: ScopeTrace,

    /// 1-based logical line number.
    pub line: usize,
}

impl Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (line {})\nParse stack: {}",
            self.message, self.line, self.trace
        )
    }
}

/// Receiver of parser warnings.
///
/// Called synchronously on the parser's stack, in source order.
pub trait WarningSink {
    /// Report one warning.
    fn warn(&mut self, warning: Warning);
}

impl<F: FnMut(Warning)> WarningSink for F {
    fn warn(&mut self, warning: Warning) {
        self(warning);
    }
}

/// Reports warnings as `tracing` events at `WARN` level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl WarningSink for TracingSink {
    fn warn(&mut self, warning: Warning) {
        tracing::warn!(
            kind = %warning.kind,
            line = warning.line,
            trace = %warning.trace,
            "{}",
            warning.message
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(name: &str, len: Option<usize>) -> TraceSegment {
        TraceSegment {
            name: name.to_owned(),
            len,
        }
    }

    #[test]
    fn test_trace_display() {
        let trace = ScopeTrace::new(vec![
            segment("VCALENDAR", None),
            segment("VEVENT", Some(2)),
            segment("VALARM", None),
        ]);
        assert_eq!(trace.to_string(), "VCALENDAR -> VEVENT[2] -> VALARM");
    }

    #[test]
    fn test_trace_empty() {
        let trace = ScopeTrace::default();
        assert!(trace.is_empty());
        assert_eq!(trace.to_string(), "");
    }

    #[test]
    fn test_trace_with_property() {
        let trace = ScopeTrace::new(vec![segment("VEVENT", None)]).with_property("ORGANIZER");
        assert_eq!(trace.to_string(), "VEVENT -> ORGANIZER");
        assert_eq!(trace.segments().len(), 2);
    }

    #[test]
    fn test_warning_display() {
        let warning = Warning {
            kind: WarningKind::DuplicateProperty,
            message: "Duplicate property: SUMMARY".to_owned(),
            trace: ScopeTrace::new(vec![segment("VEVENT", None)]),
            line: 3,
        };
        assert_eq!(
            warning.to_string(),
            "Duplicate property: SUMMARY (line 3)\nParse stack: VEVENT"
        );
    }

    #[test]
    fn test_closure_sink() {
        let mut seen = Vec::new();
        let mut sink = |w: Warning| seen.push(w.kind);
        sink.warn(Warning {
            kind: WarningKind::MissingColon,
            message: String::new(),
            trace: ScopeTrace::default(),
            line: 1,
        });
        assert_eq!(seen, [WarningKind::MissingColon]);
    }
}
