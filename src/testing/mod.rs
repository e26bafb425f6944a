//! Headless testing framework: Pilot, snapshot helpers, fixed providers.
//!
//! Use the [`Pilot`] to drive an [`App`](crate::app::App) without a real
//! terminal, and [`StaticProvider`] to answer submissions without a network.

pub mod pilot;
pub mod snapshot;

use async_trait::async_trait;

use crate::analysis::{Diagnosis, ResultProvider};
use crate::error::AnalysisError;

pub use pilot::Pilot;
pub use snapshot::{frame_to_string, rows_containing, strips_to_string};

/// Answers every request with the same outcome, immediately.
#[derive(Debug, Clone)]
pub struct StaticProvider {
    outcome: Option<Diagnosis>,
}

impl StaticProvider {
    /// Always succeed with `diagnosis`.
    pub fn success(diagnosis: Diagnosis) -> Self {
        Self {
            outcome: Some(diagnosis),
        }
    }

    /// Always fail as if the endpoint answered HTTP 503.
    pub fn failure() -> Self {
        Self { outcome: None }
    }
}

#[async_trait]
impl ResultProvider for StaticProvider {
    async fn analyze(&self, _symptoms: &str) -> Result<Diagnosis, AnalysisError> {
        self.outcome.clone().ok_or(AnalysisError::Status(503))
    }

    fn name(&self) -> &str {
        "static"
    }
}
