mod config;
mod handlers;
mod mime;
mod protocol;
mod resources;
mod server;
mod tools;

use clap::Parser;
use fsplug_core::FileSystem;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{error, info};

use config::ServerArgs;
use protocol::{JsonRpcRequest, JsonRpcResponse, PARSE_ERROR};
use server::Server;
use tools::ToolRegistry;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Tracing goes to stderr; stdout is the protocol channel
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = ServerArgs::parse();
    let config = args.fs_config();
    info!(
        enable_write = config.enable_write,
        enable_delete = config.enable_delete,
        max_file_size = config.max_file_size,
        "fsplug-mcp starting"
    );
    let server = Server::new(
        FileSystem::new(config),
        ToolRegistry::filesystem(),
        args.call_timeout(),
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<JsonRpcRequest>(line) {
            Ok(request) => server.handle(request).await,
            Err(e) => Some(JsonRpcResponse::error(
                None,
                PARSE_ERROR,
                format!("parse error: {e}"),
            )),
        };

        if let Some(response) = response {
            send_response(&mut stdout, &response).await?;
        }
    }

    info!("stdin closed, shutting down");
    Ok(())
}

async fn send_response(stdout: &mut tokio::io::Stdout, response: &JsonRpcResponse) -> std::io::Result<()> {
    match serde_json::to_string(response) {
        Ok(mut json) => {
            json.push('\n');
            stdout.write_all(json.as_bytes()).await?;
            stdout.flush().await
        }
        Err(e) => {
            error!(error = %e, "failed to serialize response");
            Ok(())
        }
    }
}
