use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter};

use crate::config::LoggingConfig;
use crate::error::AppError;

/// `RUST_LOG` wins over `logging.level`; sqlx statement logs stay at warn
/// unless asked for explicitly.
fn filter_for(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},sqlx=warn", config.level)))
}

pub fn init_logging(config: &LoggingConfig) -> Result<(), AppError> {
    let formatting_layer = match config.format.as_str() {
        "json" => fmt::layer().json().with_current_span(false).boxed(),
        "compact" => fmt::layer().compact().with_target(false).boxed(),
        _ => fmt::layer().pretty().boxed(),
    };

    registry()
        .with(filter_for(config))
        .with(formatting_layer)
        .try_init()
        .map_err(|e| AppError::Internal(format!("Failed to initialize logging: {}", e)))?;

    Ok(())
}
