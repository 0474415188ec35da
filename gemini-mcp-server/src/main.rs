// ABOUTME: Stdio MCP server binary - loads configuration, wires the Gemini
// ABOUTME: client into the dispatcher, and owns process lifecycle and exit codes.

use std::sync::Arc;

use gemini_mcp::prelude::*;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "gemini_mcp=info,gemini_mcp_server=info";

#[tokio::main]
async fn main() {
    // A missing .env file is fine; real environment variables still apply.
    let _ = dotenvy::dotenv();

    // stdout carries the protocol, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    install_panic_hook();

    tokio::select! {
        result = run() => match result {
            Ok(()) => {
                tracing::info!("stdin closed, exiting");
                std::process::exit(0);
            }
            Err(e) => {
                tracing::error!(error = %e, "fatal error");
                std::process::exit(1);
            }
        },
        signal = shutdown_signal() => {
            tracing::info!(signal, "shutdown signal received");
            std::process::exit(0);
        }
    }
}

async fn run() -> Result<(), GeminiMcpError> {
    let config = ServerConfig::from_env()?;

    let registry = Registry::builtin();
    registry.check()?;

    let client = GeminiClient::from_config(&config);
    let dispatcher = Dispatcher::new(registry, Arc::new(client));
    let server = McpServer::new(dispatcher, &config);

    tracing::info!(
        name = %config.server_name,
        version = %config.server_version,
        base_url = %config.base_url,
        tools = ?server.dispatcher().registry().names(),
        "starting MCP server on stdio"
    );

    server.serve_stdio().await?;
    Ok(())
}

/// Any panic is fatal: log it and exit non-zero rather than keep serving.
fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        tracing::error!(panic = %info, "uncaught panic");
        default_hook(info);
        std::process::exit(1);
    }));
}

/// Resolves with the name of the first termination signal received.
async fn shutdown_signal() -> &'static str {
    let ctrl_c = async {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => "SIGINT",
        _ = terminate => "SIGTERM",
    }
}
