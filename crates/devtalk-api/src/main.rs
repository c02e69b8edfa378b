//! DevTalk CLI and REST API entry point.
//!
//! Binary name: `devtalk`
//!
//! Parses CLI arguments, initializes database and services, then dispatches
//! to the appropriate command handler or starts the REST API server.

mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;

use cli::{Cli, Commands};
use devtalk_core::exchange::store::SessionStore;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,devtalk=debug",
        _ => "trace",
    };
    let enable_otel = matches!(cli.command, Commands::Serve { otel: true, .. });
    devtalk_observe::tracing_setup::init_tracing(filter, enable_otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "devtalk", &mut std::io::stdout());
        return Ok(());
    }

    // Initialize application state (DB, coordinator)
    let state = AppState::init().await?;

    match cli.command {
        Commands::Serve { port, host, .. } => {
            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            println!(
                "  {} DevTalk API listening on {}",
                console::style("⚡").bold(),
                console::style(format!("http://{addr}")).cyan()
            );
            println!("  {}", console::style("Press Ctrl+C to stop").dim());

            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            println!("\n  Server stopped.");
            devtalk_observe::tracing_setup::shutdown_tracing();
        }

        Commands::Status => {
            let sessions = state.coordinator.store().count_sessions().await?;
            let messages = state.coordinator.store().count_messages().await?;

            if cli.json {
                let status = serde_json::json!({
                    "sessions": sessions,
                    "messages": messages,
                    "data_dir": state.data_dir.display().to_string(),
                    "model": state.config.responder.model,
                });
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else {
                println!();
                println!("  {} DevTalk status", console::style("💬").bold());
                println!();
                println!("  Sessions:  {}", console::style(sessions).cyan());
                println!("  Messages:  {}", console::style(messages).cyan());
                println!(
                    "  Model:     {}",
                    console::style(&state.config.responder.model).dim()
                );
                println!(
                    "  Data dir:  {}",
                    console::style(state.data_dir.display()).dim()
                );
                println!();
            }
        }

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
