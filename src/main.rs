use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;

use symptom_tui::analysis::provider::DEFAULT_ENDPOINT;
use symptom_tui::app::App;
use symptom_tui::config::{AppConfig, ProviderConfig};
use symptom_tui::error::AppError;
use symptom_tui::logging;

/// Describe your symptoms, get a possible diagnosis and next steps.
#[derive(Debug, Parser)]
#[command(name = "symptom-tui", version, about)]
struct Cli {
    /// Answer with canned results instead of calling the endpoint.
    #[arg(long)]
    mock: bool,

    /// Analysis endpoint.
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Delay of the mock provider, in milliseconds.
    #[arg(long, default_value_t = 2000)]
    mock_delay_ms: u64,

    /// Request timeout, in seconds.
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// Pixels per terminal row used for visibility measurements.
    #[arg(long, default_value_t = 16)]
    cell_height: i32,

    /// Frames per second.
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Append logs to this file. `RUST_LOG` sets the filter.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn into_config(self) -> AppConfig {
        let provider = if self.mock {
            ProviderConfig::Mock {
                delay: Duration::from_millis(self.mock_delay_ms),
            }
        } else {
            ProviderConfig::Live {
                endpoint: self.endpoint,
                timeout: Duration::from_secs(self.timeout_secs),
            }
        };
        let config = AppConfig::new()
            .with_provider(provider)
            .with_cell_height(self.cell_height)
            .with_fps(self.fps);
        match self.log_file {
            Some(path) => config.with_log_file(path),
            None => config,
        }
    }
}

fn run(config: AppConfig) -> Result<(), AppError> {
    logging::init(config.log_file.as_deref())?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let local = tokio::task::LocalSet::new();
    local.block_on(&runtime, async move { App::new(config)?.run().await })
}

fn main() -> ExitCode {
    let config = Cli::parse().into_config();
    match run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "exiting");
            eprintln!("symptom-tui: {err}");
            ExitCode::FAILURE
        }
    }
}
