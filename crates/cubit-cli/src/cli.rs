use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser, Debug)]
#[clap(author, version, about)]
pub struct Cli {
    /// Log more details to stderr (-v: debug, -vv: trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
    /// Highlight the headings of diagnostics
    #[arg(long, global = true)]
    pub color: bool,
    /// cubit subcommands
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, PartialEq, Eq, Debug)]
pub enum Command {
    /// Run (r) a source file
    #[clap(alias = "r")]
    Run {
        /// Path to the source file
        path: PathBuf,
    },
    /// Check (c) the syntax of a source file without running it
    #[clap(alias = "c")]
    Check {
        /// Path to the source file
        path: PathBuf,
    },
    /// Evaluate (e) source code given as an argument
    #[clap(alias = "e")]
    Eval {
        /// The source code to run
        code: String,
    },
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags() {
        let cli = Cli::parse_from(["cubit", "r", "main.cb", "-vv", "--color"]);
        assert_eq!(cli.verbose, 2);
        assert!(cli.color);
        assert_eq!(
            cli.command,
            Command::Run {
                path: "main.cb".into()
            }
        );

        let cli = Cli::parse_from(["cubit", "eval", "print(1);"]);
        assert_eq!(cli.verbose, 0);
        assert!(!cli.color);
        assert_eq!(
            cli.command,
            Command::Eval {
                code: "print(1);".to_string()
            }
        );
    }
}
