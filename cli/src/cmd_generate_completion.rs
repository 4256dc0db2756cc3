// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{error::Error, io};

use clap::{ArgMatches, Command, ValueEnum, arg, value_parser};
use clap_complete::generate;
use clap_complete_nushell::Nushell;

use crate::Cli;

/// Print a completion script for `icstree` to stdout.
#[derive(Debug, Clone, Copy)]
pub struct CmdGenerateCompletion {
    pub shell: Shell,
}

impl CmdGenerateCompletion {
    pub const NAME: &str = "generate-completion";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Print a completion script for icstree")
            .hide(true)
            .arg(
                arg!(shell: <SHELL> "Shell to write the script for")
                    .value_parser(value_parser!(Shell)),
            )
    }

    pub fn from(matches: &ArgMatches) -> Result<Self, Box<dyn Error>> {
        let shell = matches
            .get_one::<Shell>("shell")
            .copied()
            .ok_or("Missing shell name")?;
        Ok(Self { shell })
    }

    pub fn run(self) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "writing completion script...");
        self.write_script(&mut io::stdout());
        Ok(())
    }

    pub fn write_script(self, buf: &mut impl io::Write) {
        let mut cmd = Cli::command();
        let bin = cmd.get_name().to_string();
        match self.shell.builtin() {
            Some(shell) => generate(shell, &mut cmd, bin, buf),
            None => generate(Nushell, &mut cmd, bin, buf),
        }
    }
}

/// Shells with a completion generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    Bash,
    Elvish,
    Fish,
    Nushell,
    #[value(name = "powershell")]
    PowerShell,
    Zsh,
}

impl Shell {
    /// The generator bundled with `clap_complete`, or `None` for nushell.
    fn builtin(self) -> Option<clap_complete::Shell> {
        use clap_complete::Shell as Builtin;

        match self {
            Shell::Bash => Some(Builtin::Bash),
            Shell::Elvish => Some(Builtin::Elvish),
            Shell::Fish => Some(Builtin::Fish),
            Shell::PowerShell => Some(Builtin::PowerShell),
            Shell::Zsh => Some(Builtin::Zsh),
            Shell::Nushell => None,
        }
    }
}
