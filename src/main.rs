//! notaryd - transaction notary server daemon.
//!
//! Startup: CLI args -> configuration -> logging -> subsystem bootstrap
//! -> endpoint query -> accept loop. Shutdown: signal -> serve loop
//! exits -> reverse-order subsystem teardown.
//!
//! Every fatal condition is logged and converted into a controlled
//! non-zero exit; the library itself never terminates the process.

use std::path::PathBuf;

use clap::Parser;

use notaryd::config::loader::load_config;
use notaryd::config::ServerConfig;
use notaryd::lifecycle::ServerLoader;
use notaryd::observability;

#[derive(Parser)]
#[command(name = "notaryd")]
#[command(about = "Transaction notary server daemon", long_about = None)]
struct Args {
    /// Path to the configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the data directory root.
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let mut config: ServerConfig = match args.config.as_deref().map(load_config).transpose() {
        Ok(loaded) => loaded.unwrap_or_default(),
        Err(err) => {
            eprintln!("notaryd: invalid configuration: {err}");
            std::process::exit(1);
        }
    };
    if let Some(data_dir) = args.data_dir {
        config.storage.data_dir = Some(data_dir);
    }

    observability::logging::init(&config.observability.log_level);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "notaryd starting");

    let loader = match ServerLoader::bootstrap(&config) {
        Ok(loader) => loader,
        Err(err) => {
            tracing::error!(error = %err, "bootstrap failed");
            std::process::exit(1);
        }
    };

    // We listen on the port listed in our own server contract, not on
    // anything supplied from outside.
    let port = match loader.listen_port() {
        Ok(port) => port,
        Err(err) => {
            tracing::error!(error = %err, "cannot determine listening port");
            drop(loader);
            std::process::exit(1);
        }
    };
    tracing::info!(port, "listening port resolved from server contract");

    let shutdown = loader.shutdown_handle();
    let serve_result = match loader.server() {
        Some(server) => server.serve(&config.listener, shutdown.subscribe()).await,
        None => Ok(()),
    };
    if let Err(err) = serve_result {
        tracing::error!(error = %err, "server terminated abnormally");
        drop(loader);
        std::process::exit(1);
    }
}
