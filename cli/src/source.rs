// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{
    collections::HashSet,
    error::Error,
    fmt::{self, Display},
    io,
    path::{Path, PathBuf},
};

use icstree::{Object, ParseError, ParseOptions, Warning};
use tokio::{fs, io::AsyncReadExt, task, task::JoinSet};

/// The argument that stands for standard input.
const STDIN_ARG: &str = "-";

/// Where a document is read from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Source {
    /// Standard input.
    Stdin,

    /// A file on disk.
    File(PathBuf),
}

impl Source {
    /// Create a source from a command-line path, where `-` means stdin.
    pub fn from_path(path: &Path) -> Self {
        if path.as_os_str() == STDIN_ARG {
            Source::Stdin
        } else {
            Source::File(path.to_path_buf())
        }
    }

    async fn read(&self) -> io::Result<String> {
        match self {
            Source::Stdin => {
                let mut buf = String::new();
                tokio::io::stdin().read_to_string(&mut buf).await?;
                Ok(buf)
            }
            Source::File(path) => fs::read_to_string(path).await,
        }
    }
}

impl Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Stdin => write!(f, "<stdin>"),
            Source::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// The outcome of parsing one source.
#[derive(Debug)]
pub struct Parsed {
    /// Where the document came from.
    pub source: Source,

    /// The tree, or the error that stopped the parse.
    pub result: Result<Object, ParseError>,

    /// Warnings in the order they were reported.
    pub warnings: Vec<Warning>,
}

impl Parsed {
    /// Parse `text`, collecting its warnings.
    pub fn parse(source: Source, text: &str, options: ParseOptions) -> Self {
        let mut warnings = Vec::new();
        let result = icstree::parse_with(text, options, |w| warnings.push(w));
        tracing::debug!(
            %source,
            ok = result.is_ok(),
            warnings = warnings.len(),
            "parsed document"
        );
        Self {
            source,
            result,
            warnings,
        }
    }
}

/// Read and parse every source.
///
/// Each document is parsed on the blocking pool, so several files are parsed
/// at once. Results come back in the order the sources were given. A source
/// that is given twice or cannot be read fails the whole call.
pub async fn parse_sources(
    sources: Vec<Source>,
    options: ParseOptions,
) -> Result<Vec<Parsed>, Box<dyn Error>> {
    ensure_distinct(&sources)?;

    let mut tasks = JoinSet::new();
    for (index, source) in sources.into_iter().enumerate() {
        tasks.spawn(async move {
            let text = source
                .read()
                .await
                .map_err(|e| format!("Failed to read {source}: {e}"))?;

            let parsed = task::spawn_blocking(move || Parsed::parse(source, &text, options))
                .await
                .map_err(|e| format!("Parser task failed: {e}"))?;

            Ok::<_, String>((index, parsed))
        });
    }

    let mut results = Vec::with_capacity(tasks.len());
    while let Some(joined) = tasks.join_next().await {
        results.push(joined??);
    }
    results.sort_by_key(|(index, _)| *index);
    Ok(results.into_iter().map(|(_, parsed)| parsed).collect())
}

/// Reject a source given more than once.
///
/// Stdin can only be read once, and output is keyed by source name.
fn ensure_distinct(sources: &[Source]) -> Result<(), String> {
    let mut seen = HashSet::with_capacity(sources.len());
    for source in sources {
        if !seen.insert(source) {
            return Err(format!("{source} was given more than once"));
        }
    }
    Ok(())
}
