use nearby_customers::config::LoggingSettings;
use nearby_customers::{CustomerPipeline, Settings};
use serde_json::Value;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Initialize logging; `RUST_LOG` wins over the configured level
fn init_tracing(logging: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true);

    if logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&settings.logging);
    info!("Configuration loaded successfully");

    // Overrides come in as a JSON object on the command line; anything that
    // isn't JSON is passed through so the pipeline rejects it consistently
    let overrides = match std::env::args().nth(1) {
        Some(raw) => serde_json::from_str(&raw).unwrap_or(Value::String(raw)),
        None => Value::Object(Default::default()),
    };

    let mut pipeline = CustomerPipeline::from_settings(&settings);

    match pipeline.get_eligible_customers(&overrides).await {
        Ok(customers) => match serde_json::to_string_pretty(&customers) {
            Ok(json) => {
                println!("{}", json);
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!("Failed to serialize result: {}", e);
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            error!("Error received: {}", e);
            ExitCode::FAILURE
        }
    }
}
