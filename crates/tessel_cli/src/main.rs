//! Tessel CLI — lowers elaborated designs into a technology-independent
//! graph.
//!
//! Exit codes: 0 on success (and for `--help`/`--version`), 2 when loading
//! or lowering fails, 1 for an unrecognized command or bad usage.

#![warn(missing_docs)]

use std::path::PathBuf;
use std::process;

use clap::error::ErrorKind;
use clap::{ArgAction, Parser, Subcommand};
use tessel_common::Interner;

/// Tessel — a logic-synthesis front end.
#[derive(Parser, Debug)]
#[command(
    name = "tessel",
    about = "Tessel logic synthesis toolchain",
    version,
    disable_version_flag = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Print version information.
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    version: Option<bool>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Lower elaborated design files into a technology-independent graph.
    Parse(ParseArgs),
}

/// Arguments for the `tessel parse` subcommand.
#[derive(Parser, Debug)]
pub struct ParseArgs {
    /// Elaborated design files produced by the external front end.
    pub files: Vec<PathBuf>,

    /// Lower only hierarchies rooted at this module.
    #[arg(long)]
    pub top: Option<String>,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp
            | ErrorKind::DisplayVersion
            | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                print!("{err}");
                process::exit(0);
            }
            _ => {
                eprint!("{err}");
                process::exit(1);
            }
        },
    };

    match cli.command {
        Command::Parse(args) => {
            let interner = Interner::new();
            match tessel_frontend::parse_files(&args.files, args.top.as_deref(), &interner) {
                Ok(design) => {
                    println!("parse ok: lowered {} module(s)", design.module_count());
                }
                Err(err) => {
                    eprintln!("parse failed: {err}");
                    process::exit(2);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_accepts_files_and_top() {
        let cli = Cli::try_parse_from([
            "tessel",
            "parse",
            "a.json",
            "b.json",
            "--top",
            "soc",
        ])
        .unwrap();
        let Command::Parse(args) = cli.command;
        assert_eq!(args.files.len(), 2);
        assert_eq!(args.top.as_deref(), Some("soc"));
    }

    #[test]
    fn unknown_subcommand_is_an_error() {
        let err = Cli::try_parse_from(["tessel", "synthesize"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidSubcommand);
    }
}
