//! perf-gateway - salon API performance layer
//!
//! Serves the health and performance endpoints behind the interceptor chain.

#![allow(missing_docs)]

use clap::Parser;
use salon_perf::server::{load_config, run_server};
use salon_perf::utils::logging::{LogFormat, init_tracing};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

#[derive(Debug, Parser)]
#[command(name = "perf-gateway", version, about)]
struct Args {
    /// Configuration file; defaults are used when it does not exist
    #[arg(short, long, env = "PERF_CONFIG", default_value = "config/perf.yaml")]
    config: PathBuf,

    /// Override the bind host
    #[arg(long)]
    host: Option<String>,

    /// Override the bind port
    #[arg(short, long)]
    port: Option<u16>,

    /// Log output format
    #[arg(long, value_enum, env = "PERF_LOG_FORMAT", default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
}

#[actix_web::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    if let Err(e) = init_tracing(args.log_format, "info") {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    let mut config = match load_config(&args.config).await {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    match run_server(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Display, not Debug, to keep multi-line messages readable
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
