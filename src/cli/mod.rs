//! Command-line front end: one subcommand per invocation, state kept in the app directory.

mod dispatch;
pub mod output;

use thiserror::Error;

use crate::{core::BankContext, errors::BankError};

pub use dispatch::dispatch;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Bank(#[from] BankError),
    #[error("{0}")]
    Usage(String),
}

/// Runs one command taken from `args` (program name already stripped).
///
/// With no arguments the help text is printed.
pub fn run_cli<I>(args: I) -> Result<(), CliError>
where
    I: IntoIterator<Item = String>,
{
    let args: Vec<String> = args.into_iter().collect();
    let Some((command, rest)) = args.split_first() else {
        return dispatch_without_context("help");
    };
    if matches!(command.as_str(), "help" | "--help" | "-h" | "version" | "--version") {
        return dispatch_without_context(command.trim_start_matches('-'));
    }

    let context = BankContext::open_default()?;
    crate::init_with_filter(context.config.log_filter.as_deref());
    dispatch(&context, command, rest)
}

fn dispatch_without_context(command: &str) -> Result<(), CliError> {
    match command {
        "version" => output::info(crate::utils::build_info::current().summary()),
        _ => output::info(dispatch::USAGE),
    }
    Ok(())
}
