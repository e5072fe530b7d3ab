use std::{fmt::Display, fs, path::Path, process::ExitCode};

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Command};
use log::{debug, LevelFilter};

mod cli;
mod report;

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_logger(cli.verbose);
    debug!("{cli:?}");

    let code = match &cli.command {
        Command::Run { path } => {
            let text = read(path)?;
            let path = path.to_string_lossy();
            exit_code(cubit_interpreter::run(&text, &path), cli.color)
        }
        Command::Check { path } => {
            let text = read(path)?;
            let path = path.to_string_lossy();
            let res = cubit_parser::parse(&path, &text).map(|program| {
                println!("`{path}` has no syntax errors");
                program
            });
            exit_code(res, cli.color)
        }
        Command::Eval { code } => exit_code(cubit_interpreter::run(code, "<stdin>"), cli.color),
    };
    Ok(code)
}

fn init_logger(verbose: u8) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(LevelFilter::Warn).parse_default_env();
    match verbose {
        0 => {}
        1 => {
            builder.filter_level(LevelFilter::Debug);
        }
        _ => {
            builder.filter_level(LevelFilter::Trace);
        }
    }
    builder.init();
}

fn read(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("cannot read `{}`", path.display()))
}

/// Prints the diagnostic of a failed run and maps the result to the exit code of the process.
fn exit_code<T>(res: Result<T, impl Display>, color: bool) -> ExitCode {
    match res {
        Ok(_) => ExitCode::SUCCESS,
        Err(diagnostic) => {
            report::print_diagnostic(&diagnostic, color);
            ExitCode::FAILURE
        }
    }
}
