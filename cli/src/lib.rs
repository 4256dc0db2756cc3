// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Command-line front end for the `icstree` parser.

mod arg;
mod cli;
mod cmd_check;
mod cmd_generate_completion;
mod cmd_parse;
mod config;
mod source;

pub use crate::cli::{Cli, Commands, Status, run};
pub use crate::config::{Config, OutputConfig, ParserConfig};
pub use crate::source::{Parsed, Source, parse_sources};
