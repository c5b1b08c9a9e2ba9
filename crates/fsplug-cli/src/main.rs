mod cmd;

use clap::{Parser, Subcommand};
use fsplug_core::config::{FsConfig, DEFAULT_MAX_FILE_SIZE};
use fsplug_core::FileSystem;

#[derive(Parser)]
#[command(name = "fsplug", version, about = "List, search and manipulate files on the host filesystem")]
struct Cli {
    /// Output as JSON instead of human-readable tables
    #[arg(long, global = true)]
    json: bool,

    /// Largest file `cat` will read, in bytes
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_FILE_SIZE)]
    max_file_size: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Fs(cmd::fs::FsCommands),
    /// Find files by name pattern and optional content
    Search(cmd::search::SearchArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let json = cli.json;

    // Invoking rm/rmdir from a shell is the opt-in.
    let fs = FileSystem::new(
        FsConfig::builder()
            .enable_write(true)
            .enable_delete(true)
            .max_file_size(cli.max_file_size)
            .build(),
    );

    tracing::debug!(json, max_file_size = cli.max_file_size, "dispatching command");
    match cli.command {
        Commands::Fs(sub) => cmd::fs::run(&fs, sub, json).await,
        Commands::Search(args) => cmd::search::run(&fs, args, json).await,
    }
}
