//! localpersist - operator CLI for the local volume registry.
//!
//! Bootstraps the registry from the configured state and data directories,
//! performs one lifecycle call, and prints the response as JSON.
//!
//! ```bash
//! localpersist create vol1 --mountpoint projects/vol1
//! localpersist list
//! localpersist mount vol1
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;

use localpersist::runtime::constants::{dirs, envs};
use localpersist::{
    CreateOptions, LocalPersistRuntime, LoggingOptions, MountpointResponse, RuntimeOptions,
    debug_from_env, init_logging,
};

#[derive(Parser, Debug)]
#[command(name = "localpersist", version, about = "Manage locally persisted volumes")]
struct Cli {
    /// Directory holding the state file
    #[arg(long, env = envs::STATE_DIR, default_value = dirs::DEFAULT_STATE_DIR)]
    state_dir: PathBuf,

    /// Root directory for all volume mountpoints
    #[arg(long, env = envs::DATA_DIR, default_value = dirs::DEFAULT_DATA_DIR)]
    data_dir: PathBuf,

    /// Also write logs to this directory
    #[arg(long, env = envs::LOG_DIR)]
    log_dir: Option<PathBuf>,

    /// Enable debug logging (also enabled by DEBUG=true)
    #[arg(long)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Register a volume and create its directory
    Create {
        name: String,
        /// Mountpoint relative to the data directory (defaults to the name)
        #[arg(long)]
        mountpoint: Option<String>,
    },
    /// Show one volume
    Get { name: String },
    /// Show all volumes
    List,
    /// Forget a volume (its directory is kept)
    Remove { name: String },
    /// Check a volume's directory and print its mountpoint
    Mount { name: String },
    /// Acknowledge an unmount
    Unmount { name: String },
    /// Print a volume's recorded mountpoint
    Path { name: String },
    /// Print driver capabilities
    Capabilities,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let _log_guard = match init_logging(&LoggingOptions {
        debug: cli.debug || debug_from_env(),
        log_dir: cli.log_dir.clone(),
    }) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: failed to initialize logging: {e}");
            return ExitCode::FAILURE;
        }
    };

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let runtime = LocalPersistRuntime::new(RuntimeOptions::new(cli.state_dir, cli.data_dir))
        .context("failed to start volume registry")?;
    let registry = runtime.registry();

    match cli.command {
        Command::Create { name, mountpoint } => {
            let options = CreateOptions { mountpoint };
            print_json(&registry.create(&name, &options)?)
        }
        Command::Get { name } => print_json(&registry.get(&name)?),
        Command::List => {
            let mut volumes = registry.list();
            volumes.sort_by(|a, b| a.name.cmp(&b.name));
            print_json(&volumes)
        }
        Command::Remove { name } => {
            registry.remove(&name)?;
            Ok(())
        }
        Command::Mount { name } => print_json(&MountpointResponse {
            mountpoint: registry.mount(&name)?,
        }),
        Command::Unmount { name } => {
            registry.unmount(&name)?;
            Ok(())
        }
        Command::Path { name } => print_json(&MountpointResponse {
            mountpoint: registry.path(&name)?,
        }),
        Command::Capabilities => print_json(&registry.capabilities()),
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(value).context("failed to encode response")?;
    println!("{text}");
    Ok(())
}
