use atlas::cli::{self, Args};
use atlas::core::config::{load_config, resolve};
use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    dotenv::dotenv().ok();

    let file_config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };
    let config = resolve(&file_config, args.api_url.as_deref());

    // Initialize file logger - writes to atlas.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();
    let level = config.log_level.parse().unwrap_or(LevelFilter::Debug);

    if let Ok(log_file) = File::create("atlas.log") {
        let _ = WriteLogger::init(level, log_config, log_file);
    }

    log::info!("Atlas starting up against {}", config.api_base_url);

    match cli::run(args.command, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::warn!("Command failed: {}", e);
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
