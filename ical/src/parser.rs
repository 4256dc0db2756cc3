// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use crate::diagnostic::{TracingSink, Warning, WarningKind, WarningSink};
use crate::error::ParseError;
use crate::line::{Line, logical_lines, trim};
use crate::property::{Pending, PropertyLine, decode_inline};
use crate::scope::ScopeStack;
use crate::value::{Object, Value};

/// Parse an iCalendar-style document into a value tree.
///
/// Warnings are reported through [`TracingSink`] with the default
/// [`ParseOptions`].
///
/// ## Errors
///
/// Returns a [`ParseError`] on broken nesting: an `END` with nothing open or
/// naming the wrong scope, a `BEGIN` that reuses a string property's name, or
/// a document that ends with scopes still open.
///
/// ## Examples
///
/// ```
/// # use icstree::parse;
/// let src = "\
/// BEGIN:VCALENDAR\r\n\
/// BEGIN:VEVENT\r\n\
/// SUMMARY:Hello\r\n\
/// \x20World\r\n\
/// END:VEVENT\r\n\
/// END:VCALENDAR\r\n\
/// ";
/// let root = parse(src).unwrap();
/// let event = root["VCALENDAR"].as_object().unwrap()["VEVENT"].as_object().unwrap();
/// assert_eq!(event["SUMMARY"].as_str(), Some("HelloWorld"));
/// ```
pub fn parse(src: &str) -> Result<Object, ParseError> {
    parse_with(src, ParseOptions::default(), TracingSink)
}

/// Parse a document with explicit options, sending warnings to `sink`.
///
/// ## Errors
///
/// See [`parse`].
///
/// ## Examples
///
/// ```
/// # use icstree::{ParseOptions, WarningKind, parse_with};
/// let mut warnings = Vec::new();
/// let src = "BEGIN:VEVENT\nSUMMARY:First\nSUMMARY:Second\nEND:VEVENT";
/// let root = parse_with(src, ParseOptions::default(), |w| warnings.push(w)).unwrap();
///
/// let event = root["VEVENT"].as_object().unwrap();
/// assert_eq!(event["SUMMARY"].as_str(), Some("First"));
/// assert_eq!(warnings.len(), 1);
/// assert_eq!(warnings[0].kind, WarningKind::DuplicateProperty);
/// ```
pub fn parse_with<S: WarningSink>(
    src: &str,
    options: ParseOptions,
    sink: S,
) -> Result<Object, ParseError> {
    let _span = tracing::debug_span!("parse", bytes = src.len()).entered();
    let mut builder = TreeBuilder::new(options, sink);
    for line in logical_lines(src) {
        builder.feed_line(line)?;
    }
    builder.finish()
}

/// Options for [`parse_with`] and [`TreeBuilder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Finalize the property still pending when input ends.
    ///
    /// With `true` (the default) the last property is trimmed or decoded like
    /// every other one. With `false` the last scalar keeps its untrimmed text
    /// and a last inline-parameter property is dropped, matching parsers that
    /// only finalize a property when the next line arrives.
    pub finalize_trailing_property: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            finalize_trailing_property: true,
        }
    }
}

/// Incremental tree builder, fed one logical line at a time.
///
/// All parse state lives here, so independent builders never interfere.
/// Lines must already be split and stripped of their terminators, as
/// [`parse_with`] does.
#[derive(Debug)]
pub struct TreeBuilder<S> {
    options: ParseOptions,
    sink: S,
    root: Object,
    scopes: ScopeStack,
    pending: Pending,
    line: usize,
}

impl<S: WarningSink> TreeBuilder<S> {
    /// Start an empty tree.
    pub fn new(options: ParseOptions, sink: S) -> Self {
        Self {
            options,
            sink,
            root: Object::new(),
            scopes: ScopeStack::default(),
            pending: Pending::None,
            line: 0,
        }
    }

    /// Number of scopes currently open.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.scopes.depth()
    }

    /// Process the next logical line.
    ///
    /// ## Errors
    ///
    /// Returns a [`ParseError`] on an unexpected or mismatched `END`, or on a
    /// `BEGIN` that conflicts with a string property.
    pub fn feed_line(&mut self, line: &str) -> Result<(), ParseError> {
        self.line += 1;
        match Line::classify(line) {
            Line::Continuation(content) => self.continue_property(content),
            Line::Begin(name) => {
                self.finalize_pending()?;
                self.scopes.begin(&mut self.root, name, self.line)
            }
            Line::End(name) => {
                self.finalize_pending()?;
                self.scopes.end(&self.root, name, self.line)
            }
            Line::Property(line) => {
                self.finalize_pending()?;
                self.property(line)
            }
        }
    }

    /// Finish the document and return the tree.
    ///
    /// ## Errors
    ///
    /// Returns [`ParseError::UnexpectedEof`] if scopes are still open.
    pub fn finish(mut self) -> Result<Object, ParseError> {
        if self.options.finalize_trailing_property {
            self.finalize_pending()?;
        }
        self.scopes.finish(&self.root)?;
        Ok(self.root)
    }

    fn continue_property(&mut self, content: &str) -> Result<(), ParseError> {
        match &mut self.pending {
            Pending::None => self.warn(
                WarningKind::OrphanContinuation,
                "Encountered split line with no previous key".to_owned(),
            ),
            Pending::Inline { raw, .. } => raw.push_str(content),
            Pending::Scalar(key) => {
                let current = self.scopes.current_mut(&mut self.root)?;
                match current.get_mut(key.as_str()) {
                    Some(Value::String(value)) => value.push_str(content),
                    _ => return Err(ParseError::Invariant("pending key is not a string")),
                }
            }
        }
        Ok(())
    }

    /// Commit the pending property: decode an inline list or trim a scalar.
    fn finalize_pending(&mut self) -> Result<(), ParseError> {
        match std::mem::take(&mut self.pending) {
            Pending::None => {}
            Pending::Scalar(key) => {
                let current = self.scopes.current_mut(&mut self.root)?;
                match current.get_mut(&key) {
                    Some(Value::String(value)) => {
                        let trimmed = trim(value);
                        if trimmed.len() != value.len() {
                            *value = trimmed.to_owned();
                        }
                    }
                    _ => return Err(ParseError::Invariant("pending key is not a string")),
                }
            }
            Pending::Inline { key, raw } => {
                let (object, problems) = decode_inline(&raw);
                for (kind, message) in problems {
                    self.warn_in_property(kind, message, &key);
                }
                let current = self.scopes.current_mut(&mut self.root)?;
                current.insert(key, Value::Object(object));
            }
        }
        Ok(())
    }

    fn property(&mut self, line: &str) -> Result<(), ParseError> {
        match PropertyLine::split(line) {
            PropertyLine::Inline { key, params } => {
                if self.scopes.current_mut(&mut self.root)?.contains_key(key) {
                    self.warn_duplicate(key);
                } else {
                    self.pending = Pending::Inline {
                        key: key.to_owned(),
                        raw: params.to_owned(),
                    };
                }
            }
            PropertyLine::Plain { key, value } => {
                let current = self.scopes.current_mut(&mut self.root)?;
                if current.contains_key(key) {
                    self.warn_duplicate(key);
                } else {
                    current.insert(key.to_owned(), Value::from(value));
                    self.pending = Pending::Scalar(key.to_owned());
                }
            }
            PropertyLine::MissingColon => self.warn(
                WarningKind::MissingColon,
                format!("Encountered a property line with no : delimiter: {line}"),
            ),
        }
        Ok(())
    }

    fn warn_duplicate(&mut self, key: &str) {
        self.warn(
            WarningKind::DuplicateProperty,
            format!("Duplicate property encountered: {key}"),
        );
    }

    fn warn(&mut self, kind: WarningKind, message: String) {
        let trace = self.scopes.trace(&self.root);
        self.sink.warn(Warning {
            kind,
            message,
            trace,
            line: self.line,
        });
    }

    fn warn_in_property(&mut self, kind: WarningKind, message: String, property: &str) {
        let trace = self.scopes.trace(&self.root).with_property(property);
        self.sink.warn(Warning {
            kind,
            message,
            trace,
            line: self.line,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_collect(src: &str, options: ParseOptions) -> (Result<Object, ParseError>, Vec<Warning>) {
        let mut warnings = Vec::new();
        let result = parse_with(src, options, |w| warnings.push(w));
        (result, warnings)
    }

    #[test]
    fn test_plain_property_at_root() {
        let (root, warnings) = parse_collect("VERSION:2.0", ParseOptions::default());
        let root = root.unwrap();
        assert_eq!(root["VERSION"].as_str(), Some("2.0"));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_scalar_trimmed_on_next_line() {
        let (root, _) = parse_collect("A:  padded  \nB:x", ParseOptions::default());
        assert_eq!(root.unwrap()["A"].as_str(), Some("padded"));
    }

    #[test]
    fn test_continuation_into_inline_buffer() {
        let src = "BEGIN:VEVENT\nATTENDEE;CN=Jo\n hn;ROLE=CHAIR\nEND:VEVENT";
        let (root, warnings) = parse_collect(src, ParseOptions::default());
        let root = root.unwrap();
        let attendee = root["VEVENT"].as_object().unwrap()["ATTENDEE"]
            .as_object()
            .unwrap();
        assert_eq!(attendee["CN"].as_str(), Some("John"));
        assert_eq!(attendee["ROLE"].as_str(), Some("CHAIR"));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_orphan_continuation_warns() {
        let (root, warnings) = parse_collect("BEGIN:X\n dangling\nEND:X", ParseOptions::default());
        assert!(root.unwrap()["X"].as_object().unwrap().is_empty());
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, WarningKind::OrphanContinuation);
        assert_eq!(warnings[0].line, 2);
    }

    #[test]
    fn test_continuation_after_begin_is_orphan() {
        let src = "A:1\nBEGIN:X\n more\nEND:X";
        let (root, warnings) = parse_collect(src, ParseOptions::default());
        assert_eq!(root.unwrap()["A"].as_str(), Some("1"));
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, WarningKind::OrphanContinuation);
        assert_eq!(warnings[0].trace.to_string(), "X");
    }

    #[test]
    fn test_continuation_after_duplicate_is_orphan() {
        let src = "A:1\nA:2\n more";
        let (root, warnings) = parse_collect(src, ParseOptions::default());
        assert_eq!(root.unwrap()["A"].as_str(), Some("1"));
        let kinds: Vec<_> = warnings.iter().map(|w| w.kind).collect();
        assert_eq!(
            kinds,
            [WarningKind::DuplicateProperty, WarningKind::OrphanContinuation]
        );
    }

    #[test]
    fn test_missing_colon_warns() {
        let (root, warnings) = parse_collect("BEGIN:X\nGARBAGE\nEND:X", ParseOptions::default());
        assert!(root.unwrap()["X"].as_object().unwrap().is_empty());
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, WarningKind::MissingColon);
        assert_eq!(warnings[0].line, 2);
    }

    #[test]
    fn test_duplicate_inline_property_cancelled() {
        let src = "X;A=1\nX;A=2\n B";
        let (root, warnings) = parse_collect(src, ParseOptions::default());
        let root = root.unwrap();
        assert_eq!(root["X"].as_object().unwrap()["A"].as_str(), Some("1"));
        let kinds: Vec<_> = warnings.iter().map(|w| w.kind).collect();
        assert_eq!(
            kinds,
            [WarningKind::DuplicateProperty, WarningKind::OrphanContinuation]
        );
    }

    #[test]
    fn test_inline_warning_trace_names_property() {
        let src = "BEGIN:VEVENT\nORGANIZER;oops\nEND:VEVENT";
        let (_, warnings) = parse_collect(src, ParseOptions::default());
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, WarningKind::MissingEquals);
        assert_eq!(warnings[0].trace.to_string(), "VEVENT -> ORGANIZER");
    }

    #[test]
    fn test_begin_over_inline_object_promotes() {
        let src = "X;A=1\nBEGIN:X\nB:2\nEND:X";
        let (root, _) = parse_collect(src, ParseOptions::default());
        let xs = root.unwrap()["X"].as_array().unwrap().to_vec();
        assert_eq!(xs.len(), 2);
        assert_eq!(xs[0]["A"].as_str(), Some("1"));
        assert_eq!(xs[1]["B"].as_str(), Some("2"));
    }

    #[test]
    fn test_trailing_scalar_finalized_by_default() {
        let (root, _) = parse_collect("A:1\nB:  two", ParseOptions::default());
        assert_eq!(root.unwrap()["B"].as_str(), Some("two"));
    }

    #[test]
    fn test_trailing_inline_finalized_by_default() {
        let (root, _) = parse_collect("X;A=1", ParseOptions::default());
        let root = root.unwrap();
        assert_eq!(root["X"].as_object().unwrap()["A"].as_str(), Some("1"));
    }

    #[test]
    fn test_trailing_property_legacy() {
        let legacy = ParseOptions {
            finalize_trailing_property: false,
        };

        let (root, _) = parse_collect("A:1\nB:  two", legacy);
        assert_eq!(root.unwrap()["B"].as_str(), Some("  two"));

        let (root, _) = parse_collect("A:1\nX;A=1", legacy);
        let root = root.unwrap();
        assert!(!root.contains_key("X"));
        assert_eq!(root.len(), 1);
    }

    #[test]
    fn test_builder_incremental() {
        let mut builder = TreeBuilder::new(ParseOptions::default(), TracingSink);
        builder.feed_line("BEGIN:VCALENDAR").unwrap();
        builder.feed_line("BEGIN:VTODO").unwrap();
        assert_eq!(builder.depth(), 2);
        builder.feed_line("END:VTODO").unwrap();
        builder.feed_line("END:VCALENDAR").unwrap();
        assert_eq!(builder.depth(), 0);

        let root = builder.finish().unwrap();
        assert!(root["VCALENDAR"].as_object().unwrap()["VTODO"].is_object());
    }

    #[test]
    fn test_folded_crlf_scalar() {
        let src = concat!(
            "BEGIN:VEVENT\r\n",
            "SUMMARY:Hello\r\n",
            " World\r\n",
            "END:VEVENT\r\n",
        );
        let (root, warnings) = parse_collect(src, ParseOptions::default());
        let root = root.unwrap();
        assert_eq!(
            root["VEVENT"].as_object().unwrap()["SUMMARY"].as_str(),
            Some("HelloWorld")
        );
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_builder_continuation_does_not_finalize() {
        let mut builder = TreeBuilder::new(ParseOptions::default(), TracingSink);
        builder.feed_line("X;A=1").unwrap();
        builder.feed_line(" 2;B=3").unwrap();
        builder.feed_line("Y:  y").unwrap();
        builder.feed_line(" z  ").unwrap();

        let root = builder.finish().unwrap();
        let x = root["X"].as_object().unwrap();
        assert_eq!(x["A"].as_str(), Some("12"));
        assert_eq!(x["B"].as_str(), Some("3"));
        assert_eq!(root["Y"].as_str(), Some("yz"));
    }

    #[test]
    fn test_error_line_numbers() {
        let (result, _) = parse_collect("BEGIN:A\nX:1\nEND:B", ParseOptions::default());
        let err = result.unwrap_err();
        assert_eq!(err.line(), Some(3));
    }
}
