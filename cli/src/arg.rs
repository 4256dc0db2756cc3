// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use clap::{Arg, ArgMatches, ValueHint, arg, value_parser};

use crate::source::Source;

#[derive(Debug, Clone, Copy)]
pub struct CommonArgs;

impl CommonArgs {
    pub fn files() -> Arg {
        arg!(files: [FILE] "Documents to read, `-` or nothing for stdin")
            .num_args(0..)
            .value_parser(value_parser!(PathBuf))
            .value_hint(ValueHint::FilePath)
    }

    pub fn get_files(matches: &ArgMatches) -> Vec<Source> {
        let sources: Vec<_> = matches
            .get_many::<PathBuf>("files")
            .into_iter()
            .flatten()
            .map(|path| Source::from_path(path))
            .collect();

        if sources.is_empty() {
            vec![Source::Stdin]
        } else {
            sources
        }
    }

    pub fn deny_warnings() -> Arg {
        arg!(--"deny-warnings" "Exit with failure when any warning is reported")
    }

    pub fn get_deny_warnings(matches: &ArgMatches) -> bool {
        matches.get_flag("deny-warnings")
    }

    pub fn legacy_eof() -> Arg {
        arg!(--"legacy-eof" "Leave the last property unfinalized at end of input")
    }

    pub fn get_legacy_eof(matches: &ArgMatches) -> bool {
        matches.get_flag("legacy-eof")
    }
}
