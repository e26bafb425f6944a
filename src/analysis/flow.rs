//! The submission state machine: `idle -> loading -> (success | failure)`.
//!
//! State lives in a signal so the page (and the visibility tracker behind it)
//! reacts to every transition. [`SubmissionFlow`] is `Copy`; clones share the
//! same state.

use std::sync::Arc;

use super::model::Diagnosis;
use super::provider::ResultProvider;
use crate::error::AnalysisError;
use crate::reactive::{create_signal, ReadSignal, WriteSignal};

// ---------------------------------------------------------------------------
// SubmissionState
// ---------------------------------------------------------------------------

/// Where the current submission stands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmissionState {
    /// Nothing submitted yet, or the last outcome was cleared.
    #[default]
    Idle,
    /// Waiting on the result provider.
    Loading,
    /// The provider answered.
    Success(Diagnosis),
    /// The provider failed; holds the user-facing message.
    Failure(String),
}

impl SubmissionState {
    pub fn is_loading(&self) -> bool {
        matches!(self, SubmissionState::Loading)
    }

    pub fn result(&self) -> Option<&Diagnosis> {
        match self {
            SubmissionState::Success(diagnosis) => Some(diagnosis),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            SubmissionState::Failure(message) => Some(message),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// SubmissionFlow
// ---------------------------------------------------------------------------

/// Drives [`SubmissionState`] through one submission at a time.
#[derive(Debug, Clone, Copy)]
pub struct SubmissionFlow {
    state: ReadSignal<SubmissionState>,
    set_state: WriteSignal<SubmissionState>,
}

impl SubmissionFlow {
    /// Create a flow in the idle state.
    pub fn new() -> Self {
        let (state, set_state) = create_signal(SubmissionState::Idle);
        Self { state, set_state }
    }

    /// The reactive state signal.
    pub fn state_signal(&self) -> ReadSignal<SubmissionState> {
        self.state
    }

    /// Current state (tracked when read inside an effect).
    pub fn state(&self) -> SubmissionState {
        self.state.get()
    }

    pub fn is_loading(&self) -> bool {
        self.state.with(SubmissionState::is_loading)
    }

    /// Whether `symptoms` may be submitted right now: non-blank text and no
    /// submission in flight.
    pub fn can_submit(&self, symptoms: &str) -> bool {
        !symptoms.trim().is_empty() && !self.is_loading()
    }

    /// Start a submission. Clears the previous outcome and enters `Loading`.
    ///
    /// Returns `None`, without any transition, when [`can_submit`] is false.
    ///
    /// [`can_submit`]: Self::can_submit
    pub fn begin(&self, symptoms: &str) -> Option<PendingSubmission> {
        if !self.can_submit(symptoms) {
            tracing::debug!("submission rejected: blank input or already loading");
            return None;
        }
        tracing::info!(chars = symptoms.chars().count(), "submission started");
        self.set_state.set(SubmissionState::Loading);
        Some(PendingSubmission {
            flow: *self,
            symptoms: symptoms.to_owned(),
            settled: false,
        })
    }

    /// Submit `symptoms` to `provider` and wait for the outcome.
    ///
    /// Returns `None` when the submission was not allowed.
    pub async fn submit(
        &self,
        symptoms: &str,
        provider: Arc<dyn ResultProvider>,
    ) -> Option<SubmissionState> {
        let pending = self.begin(symptoms)?;
        Some(pending.run(provider).await)
    }

    /// Clear a finished outcome back to `Idle`. Ignored while loading.
    pub fn reset(&self) {
        if self.is_loading() {
            return;
        }
        let idle = self.state.with_untracked(|s| *s == SubmissionState::Idle);
        if !idle {
            self.set_state.set(SubmissionState::Idle);
        }
    }
}

impl Default for SubmissionFlow {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// PendingSubmission
// ---------------------------------------------------------------------------

/// A submission that has entered `Loading` and must leave it.
///
/// Completing it records the outcome. Dropping it unsettled (the future was
/// cancelled or a panic unwound through it) returns the flow to `Idle`.
#[derive(Debug)]
pub struct PendingSubmission {
    flow: SubmissionFlow,
    symptoms: String,
    settled: bool,
}

impl PendingSubmission {
    /// The text being analyzed.
    pub fn symptoms(&self) -> &str {
        &self.symptoms
    }

    /// Ask `provider` and record the outcome.
    pub async fn run(self, provider: Arc<dyn ResultProvider>) -> SubmissionState {
        let outcome = provider.analyze(&self.symptoms).await;
        if let Err(err) = &outcome {
            tracing::warn!(provider = provider.name(), error = %err, "analysis failed");
        }
        self.complete(outcome)
    }

    /// Record `outcome` and leave `Loading`.
    pub fn complete(mut self, outcome: Result<Diagnosis, AnalysisError>) -> SubmissionState {
        let next = match outcome {
            Ok(diagnosis) => {
                tracing::info!(
                    diagnoses = diagnosis.diagnoses.len(),
                    recommendations = diagnosis.recommendations.len(),
                    "submission succeeded"
                );
                SubmissionState::Success(diagnosis)
            }
            Err(err) => SubmissionState::Failure(err.user_message().to_owned()),
        };
        self.settled = true;
        self.flow.set_state.set(next.clone());
        next
    }
}

impl Drop for PendingSubmission {
    fn drop(&mut self) {
        if !self.settled {
            tracing::debug!("submission dropped before settling");
            self.flow.set_state.set(SubmissionState::Idle);
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::provider::MockProvider;
    use crate::error::ANALYSIS_FAILED_MESSAGE;
    use crate::reactive::create_effect;
    use crate::reactive::signal::reset_runtime;
    use crate::testing::StaticProvider;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn starts_idle() {
        reset_runtime();
        let flow = SubmissionFlow::new();
        assert_eq!(flow.state(), SubmissionState::Idle);
        assert!(!flow.is_loading());
    }

    #[test]
    fn blank_input_is_rejected_without_transition() {
        reset_runtime();
        let flow = SubmissionFlow::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let log_c = log.clone();
        let signal = flow.state_signal();
        create_effect(move || log_c.borrow_mut().push(signal.get()));

        assert!(flow.begin("").is_none());
        assert!(flow.begin("   ").is_none());
        assert!(flow.begin("\n\t").is_none());
        assert_eq!(*log.borrow(), vec![SubmissionState::Idle]);
    }

    #[test]
    fn begin_enters_loading_immediately() {
        reset_runtime();
        let flow = SubmissionFlow::new();
        let pending = flow.begin("I have a headache").unwrap();
        assert_eq!(pending.symptoms(), "I have a headache");
        assert!(flow.is_loading());
        drop(pending);
    }

    #[test]
    fn second_begin_while_loading_is_rejected() {
        reset_runtime();
        let flow = SubmissionFlow::new();
        let _pending = flow.begin("cough").unwrap();
        assert!(!flow.can_submit("fever"));
        assert!(flow.begin("fever").is_none());
    }

    #[test]
    fn complete_success_populates_result() {
        reset_runtime();
        let flow = SubmissionFlow::new();
        let pending = flow.begin("cough").unwrap();
        pending.complete(Ok(Diagnosis::new(["Cold"], ["Tea"])));
        let state = flow.state();
        assert_eq!(state.result(), Some(&Diagnosis::new(["Cold"], ["Tea"])));
        assert_eq!(state.error(), None);
        assert!(flow.can_submit("again"));
    }

    #[test]
    fn complete_failure_sets_fixed_message() {
        reset_runtime();
        let flow = SubmissionFlow::new();
        let pending = flow.begin("cough").unwrap();
        pending.complete(Err(AnalysisError::Status(503)));
        assert_eq!(flow.state().error(), Some(ANALYSIS_FAILED_MESSAGE));
        assert_eq!(flow.state().result(), None);
    }

    #[test]
    fn new_submission_clears_previous_outcome() {
        reset_runtime();
        let flow = SubmissionFlow::new();
        flow.begin("a").unwrap().complete(Err(AnalysisError::Status(500)));
        let pending = flow.begin("b").unwrap();
        assert_eq!(flow.state(), SubmissionState::Loading);
        assert_eq!(flow.state().error(), None);
        drop(pending);
    }

    #[test]
    fn dropping_unsettled_submission_leaves_loading() {
        reset_runtime();
        let flow = SubmissionFlow::new();
        let pending = flow.begin("cough").unwrap();
        drop(pending);
        assert_eq!(flow.state(), SubmissionState::Idle);
    }

    #[test]
    fn reset_clears_outcome_but_not_loading() {
        reset_runtime();
        let flow = SubmissionFlow::new();
        flow.begin("a").unwrap().complete(Ok(Diagnosis::default()));
        flow.reset();
        assert_eq!(flow.state(), SubmissionState::Idle);

        let pending = flow.begin("b").unwrap();
        flow.reset();
        assert!(flow.is_loading());
        drop(pending);
    }

    #[tokio::test]
    async fn submit_success_transitions_loading_then_success() {
        reset_runtime();
        let flow = SubmissionFlow::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let log_c = log.clone();
        let signal = flow.state_signal();
        create_effect(move || log_c.borrow_mut().push(signal.get()));

        let provider = Arc::new(StaticProvider::success(Diagnosis::new(["Migraine"], ["Rest"])));
        let outcome = flow.submit("I have a headache", provider).await.unwrap();

        let expected = SubmissionState::Success(Diagnosis::new(["Migraine"], ["Rest"]));
        assert_eq!(outcome, expected);
        assert_eq!(
            *log.borrow(),
            vec![SubmissionState::Idle, SubmissionState::Loading, expected]
        );
    }

    #[tokio::test]
    async fn submit_failure_never_populates_result() {
        reset_runtime();
        let flow = SubmissionFlow::new();
        let provider = Arc::new(StaticProvider::failure());
        let outcome = flow.submit("I have a headache", provider).await.unwrap();
        assert_eq!(outcome.error(), Some(ANALYSIS_FAILED_MESSAGE));
        assert_eq!(outcome.result(), None);
        assert!(!flow.is_loading());
    }

    #[tokio::test]
    async fn submit_blank_returns_none() {
        reset_runtime();
        let flow = SubmissionFlow::new();
        let provider = Arc::new(StaticProvider::failure());
        assert!(flow.submit("   ", provider).await.is_none());
        assert_eq!(flow.state(), SubmissionState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn submit_against_mock_provider_succeeds_after_delay() {
        reset_runtime();
        let flow = SubmissionFlow::new();
        let provider: Arc<dyn ResultProvider> = Arc::new(MockProvider::default());
        let outcome = flow.submit("headache", provider).await.unwrap();
        assert_eq!(outcome, SubmissionState::Success(MockProvider::content()));
    }
}
