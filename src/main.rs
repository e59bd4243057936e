use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use spoollog::{log_debug, log_error, log_info, log_warn, Logger, LoggerConfig};

/// Number of concurrent producer tasks in the demo
const PRODUCERS: usize = 4;

/// Messages logged by each producer
const MESSAGES_PER_PRODUCER: usize = 1_000;

#[tokio::main]
async fn main() -> Result<()> {
    // The logger's own diagnostics (rotation failures etc.) go to stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "spoollog=info".into()),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = load_config(&args)?;

    tracing::info!(
        "Logging to {} and {}",
        config.log_file_path().display(),
        config.warn_file_path().display()
    );

    let logger = Arc::new(Logger::new(config).context("Failed to start logger")?);

    let producers: Vec<_> = (0..PRODUCERS)
        .map(|id| {
            let logger = Arc::clone(&logger);
            tokio::spawn(async move {
                for i in 0..MESSAGES_PER_PRODUCER {
                    match i % 4 {
                        0 => log_debug!(logger, "producer {} tick {}", id, i),
                        1 => log_info!(logger, "producer {} handled item {}", id, i),
                        2 => log_warn!(logger, "producer {} slow item {}", id, i),
                        _ => log_error!(logger, "producer {} failed item {}", id, i),
                    }
                }
            })
        })
        .collect();

    for producer in producers {
        producer.await.context("Producer task failed")?;
    }

    // Joining the writer blocks, so keep it off the async workers
    let closer = Arc::clone(&logger);
    tokio::task::spawn_blocking(move || closer.close())
        .await
        .context("Failed to close logger")?;

    let stats = logger.stats();
    println!(
        "enqueued={} written={} dropped={} rotations={} rotation_failures={} write_errors={}",
        stats.enqueued,
        stats.written,
        stats.dropped,
        stats.rotations,
        stats.rotation_failures,
        stats.write_errors
    );

    Ok(())
}

/// Build the configuration from command-line arguments
///
/// Accepts a single TOML file path, a list of `key=value` options, or nothing
/// (reads the default config file).
fn load_config(args: &[String]) -> Result<LoggerConfig> {
    match args {
        [] => {
            let path = default_config_path()?;
            LoggerConfig::load(&path)
                .with_context(|| format!("Failed to load config from {}", path.display()))
        }
        [path] if !path.contains('=') => LoggerConfig::load(Path::new(path))
            .with_context(|| format!("Failed to load config from {}", path)),
        options => {
            let map = parse_options(options)?;
            LoggerConfig::from_map(&map).context("Invalid logger options")
        }
    }
}

/// Parse `key=value` arguments into an option map
fn parse_options(options: &[String]) -> Result<HashMap<String, String>> {
    options
        .iter()
        .map(|option| {
            option
                .split_once('=')
                .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
                .with_context(|| format!("Expected key=value, got '{}'", option))
        })
        .collect()
}

/// Get the default config file path (`<config dir>/spoollog/config.toml`)
fn default_config_path() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join("spoollog").join("config.toml"))
        .context("Could not determine config directory")
}
