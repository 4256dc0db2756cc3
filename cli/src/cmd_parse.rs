// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;

use clap::{ArgMatches, Command, arg};
use colored::Colorize;
use icstree::{Object, TracingSink, WarningSink};
use serde::{Serialize, Serializer};

use crate::arg::CommonArgs;
use crate::cli::Status;
use crate::config::Config;
use crate::source::{Parsed, Source, parse_sources};

#[derive(Debug, Clone)]
pub struct CmdParse {
    pub sources: Vec<Source>,
    pub compact: bool,
    pub deny_warnings: bool,
    pub legacy_eof: bool,
}

impl CmdParse {
    pub const NAME: &str = "parse";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Parse documents and print their tree as JSON")
            .long_about(
                "\
Parse documents and print their tree as JSON. A single document is printed as \
its root object; several documents are printed as one object keyed by path, in \
the order given. Warnings are logged to stderr.",
            )
            .arg(CommonArgs::files())
            .arg(arg!(--compact "Print JSON on a single line"))
            .arg(CommonArgs::deny_warnings())
            .arg(CommonArgs::legacy_eof())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            sources: CommonArgs::get_files(matches),
            compact: matches.get_flag("compact"),
            deny_warnings: CommonArgs::get_deny_warnings(matches),
            legacy_eof: CommonArgs::get_legacy_eof(matches),
        }
    }

    pub async fn run(self, config: &Config) -> Result<Status, Box<dyn Error>> {
        tracing::debug!(?self, "parsing documents...");
        let options = config.parser.options(self.legacy_eof);
        let pretty = config.output.pretty && !self.compact;
        let deny_warnings = config.output.deny_warnings || self.deny_warnings;

        let parsed = parse_sources(self.sources, options).await?;
        let (status, output) = render(parsed, pretty, deny_warnings)?;
        if let Some(output) = output {
            println!("{output}");
        }
        Ok(status)
    }
}

/// Report diagnostics and render the trees.
///
/// Nothing is rendered unless every document parsed and no warning was denied.
fn render(
    parsed: Vec<Parsed>,
    pretty: bool,
    deny_warnings: bool,
) -> Result<(Status, Option<String>), serde_json::Error> {
    let mut status = Status::Success;
    let mut documents = Vec::with_capacity(parsed.len());
    for Parsed {
        source,
        result,
        warnings,
    } in parsed
    {
        let _span = tracing::warn_span!("document", %source).entered();
        if deny_warnings && !warnings.is_empty() {
            status = Status::Failure;
        }
        for warning in warnings {
            TracingSink.warn(warning);
        }

        match result {
            Ok(root) => documents.push((source.to_string(), root)),
            Err(err) => {
                eprintln!("{} {source}: {err}", "Error:".red());
                status = Status::Failure;
            }
        }
    }

    if status == Status::Failure {
        return Ok((status, None));
    }

    let output = match documents.as_slice() {
        [(_, root)] => to_json(root, pretty)?,
        all => to_json(&Documents(all), pretty)?,
    };
    Ok((status, Some(output)))
}

fn to_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}

/// Several trees keyed by their source, in argument order.
struct Documents<'a>(&'a [(String, Object)]);

impl Serialize for Documents<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(name, root)| (name, root)))
    }
}
