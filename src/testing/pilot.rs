//! Pilot: programmatic interaction with a headless App.
//!
//! The `Pilot` wraps an [`App`](crate::app::App) built without a terminal and
//! provides methods to simulate user input, settle submissions, scroll, and
//! render frames to text for assertions.

use std::sync::Arc;

use crate::analysis::{PendingSubmission, ResultProvider, SubmissionState};
use crate::app::App;
use crate::config::AppConfig;
use crate::error::AppError;
use crate::event::{InputEvent, Key, KeyEvent, Modifiers, Wheel};
use crate::render::Frame;
use crate::visibility::RegionKey;

use super::snapshot::frame_to_string;

// ---------------------------------------------------------------------------
// Pilot
// ---------------------------------------------------------------------------

/// A headless app driver for testing.
///
/// Submissions started by input are held until [`settle`](Self::settle) runs
/// them against the app's provider, so a test controls exactly when the
/// outcome lands.
///
/// # Examples
///
/// ```ignore
/// use symptom_tui::testing::{Pilot, StaticProvider};
///
/// let mut pilot = Pilot::new(80, 24, StaticProvider::failure());
/// pilot.type_text("headache");
/// let outcome = pilot.submit().await;
/// ```
pub struct Pilot {
    app: App,
    pending: Option<PendingSubmission>,
}

impl Pilot {
    /// A `width x height` app answered by `provider`, without backdrop
    /// particles so frame text only holds the page.
    pub fn new(width: u16, height: u16, provider: impl ResultProvider + 'static) -> Self {
        let config = AppConfig::default().with_particles(0);
        Self::with_config(config, Arc::new(provider), width, height)
    }

    pub fn with_config(
        config: AppConfig,
        provider: Arc<dyn ResultProvider>,
        width: u16,
        height: u16,
    ) -> Self {
        Self {
            app: App::with_provider(config, provider, width, height),
            pending: None,
        }
    }

    // ── Input simulation ─────────────────────────────────────────────

    /// Feed one raw input event.
    pub fn input(&mut self, event: InputEvent) {
        if let Some(pending) = self.app.handle_input(event) {
            self.pending = Some(pending);
        }
    }

    /// Simulate a key press with no modifiers.
    pub fn press_key(&mut self, key: Key) {
        self.input(InputEvent::Key(KeyEvent::plain(key)));
    }

    /// Simulate a key press with the given modifiers.
    pub fn press_key_with(&mut self, key: Key, modifiers: Modifiers) {
        self.input(InputEvent::Key(KeyEvent::new(key, modifiers)));
    }

    /// Type each character of `text` as its own key press.
    pub fn type_text(&mut self, text: &str) {
        for ch in text.chars() {
            self.press_key(Key::Char(ch));
        }
    }

    /// Scroll with the mouse wheel, `notches` positive for down.
    pub fn wheel(&mut self, notches: i32) {
        let direction = if notches < 0 { Wheel::Up } else { Wheel::Down };
        for _ in 0..notches.unsigned_abs() {
            self.input(InputEvent::Wheel(direction));
        }
    }

    /// Scroll the page by `rows`.
    pub fn scroll_by(&mut self, rows: i32) -> bool {
        self.app.scroll_by(rows)
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.input(InputEvent::Resize { width, height });
    }

    // ── Submissions ──────────────────────────────────────────────────

    /// Whether a submission is waiting to be settled.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Run the held submission to completion. `None` when nothing is held.
    pub async fn settle(&mut self) -> Option<SubmissionState> {
        let pending = self.pending.take()?;
        Some(pending.run(self.app.provider()).await)
    }

    /// Press Enter and settle whatever it started.
    pub async fn submit(&mut self) -> Option<SubmissionState> {
        self.press_key(Key::Enter);
        self.settle().await
    }

    /// Drop the held submission without settling it.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    // ── Query ────────────────────────────────────────────────────────

    pub fn app(&self) -> &App {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }

    pub fn state(&self) -> SubmissionState {
        self.app.state()
    }

    pub fn is_visible(&self, key: RegionKey) -> bool {
        self.app.is_visible(key)
    }

    pub fn mounted(&self) -> Vec<RegionKey> {
        self.app.mounted_regions()
    }

    pub fn is_running(&self) -> bool {
        !self.app.should_quit()
    }

    // ── Render helpers ───────────────────────────────────────────────

    /// Render one frame, updating visibility on the way.
    pub fn render(&mut self) -> Result<Frame, AppError> {
        self.app.render_frame()
    }

    /// Render one frame as plain text.
    pub fn screen_text(&mut self) -> Result<String, AppError> {
        self.render().map(|frame| frame_to_string(&frame))
    }

    /// Scroll until `key` is laid out inside the viewport, then render.
    pub fn scroll_into_view(&mut self, key: RegionKey) -> Result<Frame, AppError> {
        self.render()?;
        if let Some(bounds) = self.app.region_bounds(key) {
            self.app.scroll_by(bounds.y - self.app.scroll().row());
        }
        self.render()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
