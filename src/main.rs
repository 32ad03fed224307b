use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;

use logsec::cli;

#[derive(Parser)]
#[command(name = "logsec")]
#[command(about = "Validate and mask structured log entries", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (default: .logsec/config.yml in the current directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase diagnostic output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default .logsec/config.yml
    Init,

    /// Sanitize a JSON document and print the result
    Sanitize {
        /// JSON file to read (stdin when omitted)
        #[arg(long)]
        input: Option<PathBuf>,

        /// Override the configured mask token
        #[arg(long)]
        mask: Option<String>,

        #[arg(long)]
        pretty: bool,
    },

    /// Report whether keys would be masked
    CheckKey {
        #[arg(required = true)]
        keys: Vec<String>,
    },

    /// Validate, sanitize and append one entry to a log file
    Write {
        #[arg(long)]
        level: String,

        #[arg(long)]
        message: String,

        #[arg(long)]
        channel: Option<String>,

        /// Context as a JSON object
        #[arg(long)]
        context: Option<String>,

        /// Override the configured log directory
        #[arg(long)]
        dir: Option<PathBuf>,
    },

    /// Scan log files for leaked secrets
    Scan {
        /// File or directory (default: configured log directory)
        path: Option<PathBuf>,

        /// File name patterns to include (default: *.log)
        #[arg(long = "glob")]
        globs: Vec<String>,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let settings = cli::load_settings(cli.config.as_deref())?;

    let clean = match cli.command {
        Commands::Init => {
            let cwd = std::env::current_dir()?;
            cli::init::run(&cwd)?
        }
        Commands::Sanitize {
            input,
            mask,
            pretty,
        } => cli::sanitize::run(&settings, input.as_deref(), mask.as_deref(), pretty)?,
        Commands::CheckKey { keys } => cli::check_key::run(&settings, &keys)?,
        Commands::Write {
            level,
            message,
            channel,
            context,
            dir,
        } => cli::write::run(
            &settings,
            cli::write::WriteArgs {
                level: &level,
                message: &message,
                channel: channel.as_deref(),
                context: context.as_deref(),
                dir: dir.as_deref(),
            },
        )?,
        Commands::Scan { path, globs } => cli::scan::run(&settings, path.as_deref(), &globs)?,
    };

    Ok(if clean {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
