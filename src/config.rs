//! Application configuration.
//!
//! [`AppConfig`] is plain data with `with_*` builders; `main` fills it from
//! command-line flags.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::analysis::provider::{DEFAULT_ENDPOINT, DEFAULT_MOCK_DELAY, DEFAULT_TIMEOUT};
use crate::analysis::{HttpProvider, MockProvider, ResultProvider};
use crate::error::AppError;
use crate::surface::backdrop::PARTICLE_COUNT;
use crate::visibility::scroll::DEFAULT_CELL_HEIGHT;
use crate::visibility::ObserverOptions;

// ---------------------------------------------------------------------------
// ProviderConfig
// ---------------------------------------------------------------------------

/// Which result provider answers submissions.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderConfig {
    /// POST to a live endpoint.
    Live { endpoint: String, timeout: Duration },
    /// Canned result after a fixed delay.
    Mock { delay: Duration },
}

impl ProviderConfig {
    /// The live provider with default endpoint and timeout.
    pub fn live() -> Self {
        ProviderConfig::Live {
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// The mock provider with the default delay.
    pub fn mock() -> Self {
        ProviderConfig::Mock {
            delay: DEFAULT_MOCK_DELAY,
        }
    }

    /// Construct the provider.
    pub fn build(&self) -> Result<Arc<dyn ResultProvider>, AppError> {
        Ok(match self {
            ProviderConfig::Live { endpoint, timeout } => {
                Arc::new(HttpProvider::new(endpoint, *timeout)?)
            }
            ProviderConfig::Mock { delay } => Arc::new(MockProvider::new(*delay)),
        })
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self::live()
    }
}

// ---------------------------------------------------------------------------
// AppConfig
// ---------------------------------------------------------------------------

/// Configuration for the application.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub provider: ProviderConfig,
    /// Threshold and root margin of the visibility tracker.
    pub observer: ObserverOptions,
    /// Pixels per terminal row.
    pub cell_height: i32,
    /// Target frames per second for the render loop.
    pub fps: u32,
    /// Backdrop particle count.
    pub particles: usize,
    /// Seed for particle placement.
    pub seed: u64,
    /// Where log output goes. No file, no logging.
    pub log_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            provider: ProviderConfig::default(),
            observer: ObserverOptions::default(),
            cell_height: DEFAULT_CELL_HEIGHT,
            fps: 30,
            particles: PARTICLE_COUNT,
            seed: 0x5eed,
            log_file: None,
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_provider(mut self, provider: ProviderConfig) -> Self {
        self.provider = provider;
        self
    }

    pub fn with_observer(mut self, observer: ObserverOptions) -> Self {
        self.observer = observer;
        self
    }

    /// Set pixels per row (at least 1).
    pub fn with_cell_height(mut self, cell_height: i32) -> Self {
        self.cell_height = cell_height.max(1);
        self
    }

    /// Set the target FPS (at least 1).
    pub fn with_fps(mut self, fps: u32) -> Self {
        self.fps = fps.max(1);
        self
    }

    pub fn with_particles(mut self, particles: usize) -> Self {
        self.particles = particles;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = Some(path.into());
        self
    }

    /// Time between frames.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs(1) / self.fps.max(1)
    }
}
