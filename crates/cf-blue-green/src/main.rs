mod commands;
mod config;
mod error;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::commands::{Commands, Context};
use crate::config::Config;
use crate::error::CliError;

#[derive(Parser)]
#[command(name = "cf-blue-green")]
#[command(bin_name = "cf-blue-green")]
#[command(version)]
#[command(about = "Zero-downtime blue-green pushes for Cloud Foundry", long_about = None)]
struct Cli {
    /// Config file (default: blue-green.toml in the current directory, if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// cf executable to run, overriding the config file
    #[arg(long = "cf-binary", global = true)]
    cf_binary: Option<PathBuf>,

    /// Log every cf invocation
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let context = match load_context(&cli) {
        Ok(context) => context,
        Err(e) => {
            output::print_error(&e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = cli.command.execute(&context) {
        output::print_error(&e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_context(cli: &Cli) -> Result<Context, CliError> {
    let config = Config::load(cli.config.as_deref(), std::path::Path::new("."))?;
    Ok(Context {
        config,
        cf_binary: cli.cf_binary.clone(),
    })
}
