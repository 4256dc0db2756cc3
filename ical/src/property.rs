// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Property lines: splitting them into key and value, and decoding inline
//! parameter lists.

use crate::diagnostic::WarningKind;
use crate::line::trim;
use crate::value::{Object, Value};

/// Separator between a property name and its value.
const VALUE_DELIMITER: char = ':';

/// Separator between a property name and its inline parameters, and between
/// the parameters themselves.
const PARAMETER_DELIMITER: char = ';';

/// Separator between an inline parameter's name and value.
const ASSIGN_DELIMITER: char = '=';

/// A property line split at its first delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PropertyLine<'a> {
    /// `KEY;A=1;B=2...`: a `;` comes before any `:`.
    Inline { key: &'a str, params: &'a str },

    /// `KEY:value`.
    Plain { key: &'a str, value: &'a str },

    /// Neither delimiter is present.
    MissingColon,
}

impl<'a> PropertyLine<'a> {
    pub(crate) fn split(line: &'a str) -> Self {
        match (
            line.split_once(PARAMETER_DELIMITER),
            line.split_once(VALUE_DELIMITER),
        ) {
            (Some((key, params)), Some((before_colon, _))) if key.len() < before_colon.len() => {
                PropertyLine::Inline { key, params }
            }
            (Some((key, params)), None) => PropertyLine::Inline { key, params },
            (_, Some((key, value))) => PropertyLine::Plain { key, value },
            (None, None) => PropertyLine::MissingColon,
        }
    }
}

/// The property that later continuation lines may still extend.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) enum Pending {
    /// Nothing to extend.
    #[default]
    None,

    /// A scalar already stored under this key on the current object.
    Scalar(String),

    /// An inline parameter list, kept raw until it is finalized.
    Inline { key: String, raw: String },
}

/// Decode a raw inline parameter list into an object.
///
/// The list is trimmed and split on every `;`; each segment is split on its
/// first `=`. Later `:` characters are kept verbatim. Segments without `=` and
/// repeated names are skipped and reported, the first occurrence wins.
pub(crate) fn decode_inline(raw: &str) -> (Object, Vec<(WarningKind, String)>) {
    let mut object = Object::new();
    let mut problems = Vec::new();
    for segment in trim(raw).split(PARAMETER_DELIMITER) {
        let Some((key, value)) = segment.split_once(ASSIGN_DELIMITER) else {
            problems.push((
                WarningKind::MissingEquals,
                format!("Encountered an inline parameter with no = delimiter: {segment}"),
            ));
            continue;
        };

        if object.contains_key(key) {
            problems.push((
                WarningKind::DuplicateInlineParameter,
                format!("Duplicate parameter encountered in inline property: {key}"),
            ));
            continue;
        }

        object.insert(key.to_owned(), Value::from(value));
    }
    (object, problems)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_plain() {
        assert_eq!(
            PropertyLine::split("SUMMARY:Hello: World"),
            PropertyLine::Plain {
                key: "SUMMARY",
                value: "Hello: World"
            }
        );
    }

    #[test]
    fn test_split_plain_with_semicolon_in_value() {
        assert_eq!(
            PropertyLine::split("RRULE:FREQ=WEEKLY;COUNT=3"),
            PropertyLine::Plain {
                key: "RRULE",
                value: "FREQ=WEEKLY;COUNT=3"
            }
        );
    }

    #[test]
    fn test_split_inline() {
        assert_eq!(
            PropertyLine::split("ORGANIZER;CN=Jane:mailto:jane@example.com"),
            PropertyLine::Inline {
                key: "ORGANIZER",
                params: "CN=Jane:mailto:jane@example.com"
            }
        );
    }

    #[test]
    fn test_split_inline_without_colon() {
        assert_eq!(
            PropertyLine::split("X-PARAMS;A=1;B=2"),
            PropertyLine::Inline {
                key: "X-PARAMS",
                params: "A=1;B=2"
            }
        );
    }

    #[test]
    fn test_split_missing_colon() {
        assert_eq!(PropertyLine::split("GARBAGE"), PropertyLine::MissingColon);
        assert_eq!(PropertyLine::split(""), PropertyLine::MissingColon);
    }

    #[test]
    fn test_split_empty_key_and_value() {
        assert_eq!(
            PropertyLine::split(":"),
            PropertyLine::Plain { key: "", value: "" }
        );
    }

    #[test]
    fn test_split_picks_earlier_delimiter() {
        assert_eq!(
            PropertyLine::split(";:"),
            PropertyLine::Inline {
                key: "",
                params: ":"
            }
        );
        assert_eq!(
            PropertyLine::split("A:B;C"),
            PropertyLine::Plain {
                key: "A",
                value: "B;C"
            }
        );
        assert_eq!(
            PropertyLine::split("ATTENDEE;CN=a;ROLE=b"),
            PropertyLine::Inline {
                key: "ATTENDEE",
                params: "CN=a;ROLE=b"
            }
        );
    }

    #[test]
    fn test_decode_inline() {
        let (object, problems) = decode_inline("CN=Jane;ROLE=CHAIR:mailto:jane@example.com  ");
        assert!(problems.is_empty());
        assert_eq!(object.len(), 2);
        assert_eq!(object["CN"].as_str(), Some("Jane"));
        assert_eq!(object["ROLE"].as_str(), Some("CHAIR:mailto:jane@example.com"));
    }

    #[test]
    fn test_decode_inline_splits_on_first_equals() {
        let (object, _) = decode_inline("X=a=b");
        assert_eq!(object["X"].as_str(), Some("a=b"));
    }

    #[test]
    fn test_decode_inline_missing_equals() {
        let (object, problems) = decode_inline("A=1;oops;B=2");
        assert_eq!(object.keys().collect::<Vec<_>>(), ["A", "B"]);
        assert_eq!(problems.len(), 1);
        assert_eq!(problems[0].0, WarningKind::MissingEquals);
    }

    #[test]
    fn test_decode_inline_duplicate_first_wins() {
        let (object, problems) = decode_inline("A=1;A=2");
        assert_eq!(object["A"].as_str(), Some("1"));
        assert_eq!(problems.len(), 1);
        assert_eq!(problems[0].0, WarningKind::DuplicateInlineParameter);
    }

    #[test]
    fn test_decode_inline_empty() {
        let (object, problems) = decode_inline("");
        assert!(object.is_empty());
        assert_eq!(problems.len(), 1);
        assert_eq!(problems[0].0, WarningKind::MissingEquals);
    }
}
