//! Shell completions for `pathhdr`.
//!
//! Scripts go to stdout unless `--out-dir` names a directory, in which case
//! the file takes the shell's conventional name (`pathhdr.bash`, `_pathhdr`, ...).

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::CommandFactory;
use clap_complete::{Shell as CompletionShell, generate, generate_to};
use tracing::debug;

use crate::cli::{AppContext, Cli, CompletionsArgs, Shell};

const BIN_NAME: &str = "pathhdr";

impl From<Shell> for CompletionShell {
    fn from(shell: Shell) -> Self {
        match shell {
            Shell::Bash => CompletionShell::Bash,
            Shell::Zsh => CompletionShell::Zsh,
            Shell::Fish => CompletionShell::Fish,
            Shell::PowerShell => CompletionShell::PowerShell,
            Shell::Elvish => CompletionShell::Elvish,
        }
    }
}

pub fn run(args: CompletionsArgs, ctx: &AppContext) -> Result<()> {
    let shell: CompletionShell = args.shell.into();

    match args.out_dir.filter(|_| !args.stdout) {
        Some(dir) => {
            let path = write_to_dir(shell, &dir)?;
            if !ctx.quiet {
                eprintln!("Wrote {shell} completion to {}", path.display());
            }
        }
        None => {
            // Script straight to the terminal or a pipe
            let mut out = io::stdout().lock();
            write_script(shell, &mut out)?;
            out.flush().context("flush completion script")?;
        }
    }
    Ok(())
}

/// Render the script for `shell` into `out`.
pub fn write_script(shell: CompletionShell, out: &mut dyn Write) -> Result<()> {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, BIN_NAME, out);
    Ok(())
}

/// Write the script into `dir`, creating it first. Returns the file written.
pub fn write_to_dir(shell: CompletionShell, dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;

    let mut cmd = Cli::command();
    let path = generate_to(shell, &mut cmd, BIN_NAME, dir)
        .with_context(|| format!("write {shell} completion into {}", dir.display()))?;
    debug!(path = %path.display(), "completion written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::TempDir;
    use assert_fs::prelude::*;
    use predicates::prelude::*;

    #[test]
    fn script_names_the_binary_and_its_subcommands() {
        let mut buf = Vec::new();
        write_script(CompletionShell::Bash, &mut buf).unwrap();
        let script = String::from_utf8(buf).unwrap();
        assert!(script.contains(BIN_NAME));
        for sub in ["classify", "sort", "tree", "rules", "init"] {
            assert!(script.contains(sub), "missing {sub}");
        }
    }

    #[test]
    fn out_dir_is_created_and_filled() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.child("nested/completions");

        let path = write_to_dir(CompletionShell::Zsh, dir.path()).unwrap();
        assert_eq!(path, dir.path().join("_pathhdr"));
        dir.child("_pathhdr").assert(predicate::str::contains("#compdef pathhdr"));
    }

    #[test]
    fn every_shell_maps_across() {
        let shells = [Shell::Bash, Shell::Zsh, Shell::Fish, Shell::PowerShell, Shell::Elvish];
        let mapped: Vec<CompletionShell> = shells.into_iter().map(Into::into).collect();
        assert_eq!(mapped.len(), 5);
        assert_eq!(mapped[3], CompletionShell::PowerShell);
    }
}
