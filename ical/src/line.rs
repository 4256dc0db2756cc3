// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Splitting a document into logical lines and classifying each line.

/// Marker opening a component scope.
pub const KW_BEGIN: &str = "BEGIN:";

/// Marker closing a component scope.
pub const KW_END: &str = "END:";

/// A folded line continues the previous one when it starts with exactly this.
const CONTINUATION_MARKER: char = ' ';

/// One logical line, classified by its leading marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    /// A folded line; holds the content after the single leading space.
    Continuation(&'a str),

    /// `BEGIN:<name>`; holds the trimmed name.
    Begin(&'a str),

    /// `END:<name>`; holds the trimmed name.
    End(&'a str),

    /// Anything else, to be split into a key and a value.
    Property(&'a str),
}

impl<'a> Line<'a> {
    /// Classify a single logical line.
    #[must_use]
    pub fn classify(line: &'a str) -> Self {
        if let Some(rest) = line.strip_prefix(CONTINUATION_MARKER) {
            Line::Continuation(rest)
        } else if let Some(name) = line.strip_prefix(KW_BEGIN) {
            Line::Begin(trim(name))
        } else if let Some(name) = line.strip_prefix(KW_END) {
            Line::End(trim(name))
        } else {
            Line::Property(line)
        }
    }
}

/// Split a whole document into logical lines.
///
/// Surrounding whitespace of the document is dropped, CRLF and LF are both
/// accepted as line terminators, and a blank document yields no lines at all.
/// Individual lines are not trimmed.
pub fn logical_lines(src: &str) -> impl Iterator<Item = &str> {
    let src = trim(src);
    src.split('\n')
        .filter(move |_| !src.is_empty())
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
}

/// Trim whitespace, including byte-order marks, from both ends.
pub(crate) fn trim(s: &str) -> &str {
    s.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}
