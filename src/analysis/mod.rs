//! Symptom submission: wire model, result providers, submission flow.

pub mod flow;
pub mod model;
pub mod provider;

pub use flow::{PendingSubmission, SubmissionFlow, SubmissionState};
pub use model::{Diagnosis, SymptomRequest};
pub use provider::{HttpProvider, MockProvider, ResultProvider};
