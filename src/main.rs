use clap::Parser;
use iss_passes::app::display;
use iss_passes::utils::{logger, validation::Validate};
use iss_passes::{CallStyle, CliConfig, ErrorKind, HttpPassFinder, PassError, PassList, TomlConfig};

fn build_finder(config: &CliConfig) -> Result<HttpPassFinder, PassError> {
    match &config.config {
        Some(path) => {
            tracing::info!("📄 Loading configuration from {}", path);
            let toml_config = TomlConfig::from_file(path)?;
            toml_config.validate()?;
            HttpPassFinder::from_config(&toml_config)
        }
        None => {
            config.validate()?;
            HttpPassFinder::from_config(config)
        }
    }
}

async fn run(finder: &HttpPassFinder, style: CallStyle) -> Result<PassList, PassError> {
    match style {
        CallStyle::Promise => finder.next_passes().await,
        CallStyle::Callback => {
            let (tx, rx) = tokio::sync::oneshot::channel();
            let handle = finder.next_passes_with_callback(move |result| {
                let _ = tx.send(result);
            });
            let result = rx.await.map_err(|e| PassError::ConfigError {
                message: format!("Callback was dropped before completion: {}", e),
            })?;
            let _ = handle.await;
            result
        }
    }
}

fn exit_code(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::Config => 2,
        ErrorKind::Network => 3,
        ErrorKind::UpstreamStatus => 4,
        ErrorKind::Parse => 5,
    }
}

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    if config.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting iss-passes");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    let result = match build_finder(&config) {
        Ok(finder) => run(&finder, config.style).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(passes) => {
            tracing::info!("✅ Found {} upcoming passes", passes.len());
            if let Err(e) = display::print_passes(&passes) {
                eprintln!("❌ Failed to write output: {}", e);
                std::process::exit(1);
            }
        }
        Err(e) => {
            tracing::error!("❌ Pass lookup failed: {} (Kind: {:?})", e, e.kind());
            eprintln!("It didn't work! {}", e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(exit_code(e.kind()));
        }
    }
}
