mod adapters;
mod cli;
mod config;
mod core;
mod device;
mod models;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "appsentinel")]
#[command(about = "Mobile Application Security Scanning Orchestrator")]
#[command(version = core::version())]
struct Cli {
    /// Debug-level logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default appsentinel.toml
    Init,
    /// Scan an APK or IPA and write a report
    Scan {
        #[arg(value_name = "ARTIFACT")]
        artifact: PathBuf,

        /// static, dynamic or all
        #[arg(long)]
        class: Option<String>,

        /// html, pdf, json or sarif
        #[arg(short, long)]
        format: Option<String>,

        #[arg(short, long, value_name = "REPORT_FILE_NAME")]
        output: Option<PathBuf>,

        #[arg(short, long, value_name = "PATH_TO_CONFIG")]
        config: Option<PathBuf>,

        #[arg(long, value_delimiter = ',')]
        exclude_adapters: Option<Vec<String>>,

        #[arg(long)]
        scratch_dir: Option<PathBuf>,
    },
    /// List scanning adapters
    Adapters {
        #[arg(long)]
        class: Option<String>,

        #[arg(short, long)]
        details: Option<String>,
    },
    /// Remove all session scratch data
    Reset {
        #[arg(short, long, value_name = "PATH_TO_CONFIG")]
        config: Option<PathBuf>,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Init => cli::handle_init_command(),

        Commands::Scan {
            artifact,
            class,
            format,
            output,
            config,
            exclude_adapters,
            scratch_dir,
        } => {
            cli::handle_scan_command(cli::ScanArgs {
                artifact,
                class,
                format,
                output,
                config_path: config,
                exclude_adapters,
                scratch_dir,
            })
            .await
        }

        Commands::Adapters { class, details } => cli::handle_adapters_command(class, details),

        Commands::Reset { config } => cli::handle_reset_command(config),
    }
}
