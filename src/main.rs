use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use teashop_api::RestApi;
use teashop_storage::Store;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Backend for a small online tea and coffee storefront
#[derive(Parser, Debug)]
#[command(name = "teashop")]
#[command(about = "A small online storefront backend", long_about = None)]
struct Args {
    /// Path to the SQLite database file
    #[arg(short, long, default_value = "./data/teashop.db", env = "TEASHOP_DB")]
    database: PathBuf,

    /// HTTP API port
    #[arg(long, default_value_t = 8080, env = "TEASHOP_PORT")]
    http_port: u16,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting teashop v{}", env!("CARGO_PKG_VERSION"));
    info!("Database: {:?}", args.database);
    info!("HTTP API port: {}", args.http_port);

    let storage = Arc::new(Store::open(&args.database)?);
    info!("Storage initialized");

    let storage_http = storage.clone();
    let http_port = args.http_port;
    let http_handle = std::thread::spawn(move || {
        info!("Starting HTTP server on port {}", http_port);
        let sys = actix_web::rt::System::new();
        sys.block_on(async {
            if let Err(e) = RestApi::start(storage_http, http_port).await {
                eprintln!("HTTP server error: {}", e);
            }
        })
    });

    info!("teashop started successfully");
    info!("HTTP API: http://localhost:{}/", args.http_port);

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
        _ = tokio::task::spawn_blocking(move || {
            http_handle.join().ok();
        }) => {
            info!("HTTP server stopped");
        }
    }

    info!("Shutting down...");
    Ok(())
}
