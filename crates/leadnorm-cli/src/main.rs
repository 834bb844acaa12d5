mod commands;
mod error;
mod runner;
mod util;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

use crate::commands::{canon, completions, config as config_cmd, import, prompt, run, show, Context};
use crate::error::{exit_code_for, report_error};
use leadnorm_config as config;
use leadnorm_store::{paths, Store};

#[derive(Debug, Parser)]
#[command(name = "leadnorm", version, about = "Normalize intake-form leads")]
struct Cli {
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true)]
    json: bool,
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run one normalization pass over the stored leads
    Run(run::RunArgs),
    /// Load leads from a JSON array
    Import(import::ImportArgs),
    Show(show::ShowArgs),
    /// Canonicalize a single value locally
    Canon(canon::CanonArgs),
    /// Print the instruction a run would send for a lead
    Prompt(prompt::PromptArgs),
    #[command(subcommand)]
    Config(config_cmd::ConfigCommand),
    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let verbose = cli.verbose;
    init_logging(verbose);
    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err, verbose);
            exit_code_for(&err)
        }
    }
}

fn execute(cli: Cli) -> Result<()> {
    let Cli {
        db_path,
        config: config_path,
        json,
        verbose,
        command,
    } = cli;

    match command {
        Command::Completions(args) => completions::emit(args),
        Command::Canon(args) => canon::canon(args, json),
        command => {
            let app_config = config::load(config_path.clone()).with_context(|| "load config")?;
            if verbose {
                match config::resolve_config_path(config_path.clone()) {
                    Ok(path) if path.exists() => {
                        debug!(path = %path.display(), "config resolved");
                    }
                    Ok(path) => {
                        debug!(path = %path.display(), "config missing, using defaults");
                    }
                    Err(err) => {
                        debug!(error = %err, "config unavailable");
                    }
                }
            }

            let db_path =
                paths::resolve_db_path(db_path).with_context(|| "resolve database path")?;
            debug!(path = %db_path.display(), "database path resolved");

            let store = Store::open(&db_path)
                .with_context(|| format!("open database {}", db_path.display()))?;
            store.migrate().with_context(|| "run migrations")?;

            let ctx = Context {
                store: &store,
                json,
                config: &app_config,
            };

            match command {
                Command::Run(args) => run::run(&ctx, args),
                Command::Import(args) => import::import(&ctx, args),
                Command::Show(args) => show::show(&ctx, args),
                Command::Prompt(args) => prompt::prompt(&ctx, args),
                Command::Config(cmd) => match cmd {
                    config_cmd::ConfigCommand::Show => config_cmd::show(&ctx),
                    config_cmd::ConfigCommand::Set(args) => config_cmd::set(&ctx, args),
                    config_cmd::ConfigCommand::Reset => config_cmd::reset(&ctx),
                },
                Command::Completions(_) | Command::Canon(_) => {
                    unreachable!("handled before store initialization")
                }
            }
        }
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
