// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{error::Error, io};

use clap::{ArgMatches, Command};
use colored::Colorize;
use icstree::{ParseError, Warning};

use crate::arg::CommonArgs;
use crate::cli::Status;
use crate::config::Config;
use crate::source::{Parsed, Source, parse_sources};

#[derive(Debug, Clone)]
pub struct CmdCheck {
    pub sources: Vec<Source>,
    pub deny_warnings: bool,
    pub legacy_eof: bool,
}

impl CmdCheck {
    pub const NAME: &str = "check";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Report warnings and errors without printing trees")
            .arg(CommonArgs::files())
            .arg(CommonArgs::deny_warnings())
            .arg(CommonArgs::legacy_eof())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            sources: CommonArgs::get_files(matches),
            deny_warnings: CommonArgs::get_deny_warnings(matches),
            legacy_eof: CommonArgs::get_legacy_eof(matches),
        }
    }

    pub async fn run(self, config: &Config) -> Result<Status, Box<dyn Error>> {
        tracing::debug!(?self, "checking documents...");
        let options = config.parser.options(self.legacy_eof);
        let deny_warnings = config.output.deny_warnings || self.deny_warnings;

        let parsed = parse_sources(self.sources, options).await?;
        let status = report(&mut io::stdout().lock(), &parsed, deny_warnings)?;
        Ok(status)
    }
}

/// Write one line per diagnostic and a closing summary.
fn report(
    w: &mut impl io::Write,
    parsed: &[Parsed],
    deny_warnings: bool,
) -> io::Result<Status> {
    let mut warnings = 0;
    let mut errors = 0;
    for doc in parsed {
        for warning in &doc.warnings {
            writeln!(w, "{}", format_warning(&doc.source, warning))?;
        }
        warnings += doc.warnings.len();

        match &doc.result {
            Ok(_) if doc.warnings.is_empty() => writeln!(w, "{}: {}", doc.source, "ok".green())?,
            Ok(_) => {}
            Err(err) => {
                errors += 1;
                writeln!(w, "{}", format_error(&doc.source, err))?;
            }
        }
    }

    writeln!(
        w,
        "{} {}: {} {}, {} {}",
        parsed.len(),
        plural(parsed.len(), "document", "documents"),
        warnings,
        plural(warnings, "warning", "warnings"),
        errors,
        plural(errors, "error", "errors"),
    )?;

    if errors > 0 || (deny_warnings && warnings > 0) {
        Ok(Status::Failure)
    } else {
        Ok(Status::Success)
    }
}

fn format_warning(source: &Source, warning: &Warning) -> String {
    format!(
        "{source}:{}: {}[{}]: {}\n    Parse stack: {}",
        warning.line,
        "warning".yellow().bold(),
        warning.kind,
        warning.message,
        warning.trace,
    )
}

/// Render a fatal error. Later lines of its message, such as the parse stack,
/// are indented like a warning's.
fn format_error(source: &Source, err: &ParseError) -> String {
    let location = match err.line() {
        Some(line) => format!("{source}:{line}"),
        None => source.to_string(),
    };
    let message = err.to_string();
    let mut lines = message.lines();
    let mut out = format!(
        "{location}: {}: {}",
        "error".red().bold(),
        lines.next().unwrap_or_default()
    );
    for line in lines {
        out.push_str("\n    ");
        out.push_str(line);
    }
    out
}

fn plural<'a>(n: usize, one: &'a str, many: &'a str) -> &'a str {
    if n == 1 { one } else { many }
}
