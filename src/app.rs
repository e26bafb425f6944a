//! App struct: wiring, input handling, frame building, event loop.
//!
//! [`App`] ties together the submission flow, the page, the visibility
//! tracker, and the terminal driver. The page's region set is a memo over the
//! submission state; one effect maps it to the observed set, and its cleanup
//! releases the previous [`Subscription`] before the next one is taken.
//! `new_headless` builds an app without touching the terminal, for tests.

use std::cell::{Ref, RefCell};
use std::io::Write;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::EventStream;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_stream::StreamExt;

use crate::analysis::{
    MockProvider, PendingSubmission, ResultProvider, SubmissionFlow, SubmissionState,
};
use crate::config::{AppConfig, ProviderConfig};
use crate::error::AppError;
use crate::event::{from_crossterm, BindingAction, InputEvent, Key, KeyBindingRegistry, Modifiers, Wheel};
use crate::geometry::Rect;
use crate::reactive::{
    create_effect, create_owned_memo, create_signal, dispose_effect, on_cleanup, EffectId, ReadSignal,
};
use crate::render::{Driver, Frame, TerminalGuard};
use crate::surface::{draw_scrollbar, regions_for, Backdrop, Page, RegionContext, TextArea};
use crate::visibility::{
    RegionKey, ScrollOffset, ScrollView, Subscription, VisibilityMap, VisibilityTracker,
};

/// Rows scrolled per mouse wheel notch.
pub const WHEEL_STEP: i32 = 3;

/// The application.
pub struct App {
    config: AppConfig,
    provider: Arc<dyn ResultProvider>,
    flow: SubmissionFlow,
    textarea: TextArea,
    tracker: Rc<RefCell<VisibilityTracker>>,
    page: Rc<RefCell<Page>>,
    scroll: ScrollView,
    /// Last offset reported through the scroll listener.
    scroll_offset: ReadSignal<ScrollOffset>,
    region_set: EffectId,
    observation: EffectId,
    bindings: KeyBindingRegistry,
    backdrop: Backdrop,
    width: u16,
    height: u16,
    tick: u64,
    previous: Option<Frame>,
    running: bool,
}

impl App {
    /// Build the configured provider and size the page to the terminal.
    pub fn new(config: AppConfig) -> Result<Self, AppError> {
        let provider = config.provider.build()?;
        let (width, height) = Driver::terminal_size()?;
        Ok(Self::with_provider(config, provider, width, height))
    }

    /// Create a headless app for testing, answered by the mock provider.
    pub fn new_headless(width: u16, height: u16) -> Self {
        let config = AppConfig::default().with_provider(ProviderConfig::mock());
        Self::with_provider(config, Arc::new(MockProvider::default()), width, height)
    }

    /// Create an app answered by `provider`, `width x height` cells large.
    pub fn with_provider(
        config: AppConfig,
        provider: Arc<dyn ResultProvider>,
        width: u16,
        height: u16,
    ) -> Self {
        let flow = SubmissionFlow::new();
        let tracker = Rc::new(RefCell::new(VisibilityTracker::new(config.observer)));
        let page = Rc::new(RefCell::new(Page::new()));
        let mut scroll = ScrollView::new(config.cell_height);
        scroll.set_viewport_height(height as i32);
        let (scroll_offset, set_scroll_offset) = create_signal(ScrollOffset::ZERO);

        let state = flow.state_signal();
        let (regions, region_set) = create_owned_memo(move || state.with(regions_for));
        let observation = create_effect({
            let tracker = Rc::clone(&tracker);
            let page = Rc::clone(&page);
            let events = scroll.events().clone();
            move || {
                let wanted = regions.get();
                let mounted = page.borrow_mut().reconcile(&wanted, &mut tracker.borrow_mut());
                let subscription = Subscription::new(&tracker, mounted, &events, move |offset| {
                    set_scroll_offset.set(offset)
                });
                on_cleanup(move || drop(subscription));
            }
        });

        Self {
            backdrop: Backdrop::new(config.particles, config.seed),
            config,
            provider,
            flow,
            textarea: TextArea::new(),
            tracker,
            page,
            scroll,
            scroll_offset,
            region_set,
            observation,
            bindings: KeyBindingRegistry::with_defaults(),
            width,
            height,
            tick: 0,
            previous: None,
            running: true,
        }
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn provider(&self) -> Arc<dyn ResultProvider> {
        Arc::clone(&self.provider)
    }

    pub fn flow(&self) -> SubmissionFlow {
        self.flow
    }

    pub fn state(&self) -> SubmissionState {
        self.flow.state_signal().get_untracked()
    }

    pub fn textarea(&self) -> &TextArea {
        &self.textarea
    }

    pub fn textarea_mut(&mut self) -> &mut TextArea {
        &mut self.textarea
    }

    pub fn bindings_mut(&mut self) -> &mut KeyBindingRegistry {
        &mut self.bindings
    }

    pub fn tracker(&self) -> Ref<'_, VisibilityTracker> {
        self.tracker.borrow()
    }

    /// Snapshot of the per-region visibility flags.
    pub fn visibility(&self) -> VisibilityMap {
        self.tracker.borrow().map().clone()
    }

    pub fn is_visible(&self, key: RegionKey) -> bool {
        self.tracker.borrow().is_visible(key)
    }

    /// Mounted regions in page order.
    pub fn mounted_regions(&self) -> Vec<RegionKey> {
        self.page.borrow().mounted().into_iter().map(|(key, _)| key).collect()
    }

    /// Bounds of a mounted region in page cells, as of the last frame.
    pub fn region_bounds(&self, key: RegionKey) -> Option<Rect> {
        self.page.borrow().geometry().bounds(key)
    }

    pub fn scroll(&self) -> &ScrollView {
        &self.scroll
    }

    /// Offset last delivered to scroll listeners.
    pub fn scroll_offset(&self) -> ScrollOffset {
        self.scroll_offset.get_untracked()
    }

    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    pub fn should_quit(&self) -> bool {
        !self.running
    }

    pub fn request_quit(&mut self) {
        self.running = false;
    }

    // ── Input ────────────────────────────────────────────────────────

    /// Apply one input event.
    ///
    /// Returns the started submission when the event submitted the form; the
    /// caller decides where it runs.
    pub fn handle_input(&mut self, event: InputEvent) -> Option<PendingSubmission> {
        match event {
            InputEvent::Key(key) => {
                if let Some(action) = self.bindings.resolve(&key) {
                    return self.apply(action);
                }
                self.edit(key.code, key.modifiers);
            }
            InputEvent::Wheel(Wheel::Up) => {
                self.scroll.scroll_by(-WHEEL_STEP);
            }
            InputEvent::Wheel(Wheel::Down) => {
                self.scroll.scroll_by(WHEEL_STEP);
            }
            InputEvent::Resize { width, height } => self.resize(width, height),
            InputEvent::Paste(text) => self.textarea.insert_str(&text),
        }
        None
    }

    fn apply(&mut self, action: BindingAction) -> Option<PendingSubmission> {
        match action {
            BindingAction::Quit => self.request_quit(),
            BindingAction::Submit => return self.submit(),
            BindingAction::Newline => self.textarea.newline(),
            BindingAction::Clear => self.flow.reset(),
            BindingAction::ScrollUp => {
                self.scroll.scroll_by(-1);
            }
            BindingAction::ScrollDown => {
                self.scroll.scroll_by(1);
            }
            BindingAction::PageUp => {
                self.scroll.page_up();
            }
            BindingAction::PageDown => {
                self.scroll.page_down();
            }
        }
        None
    }

    fn edit(&mut self, key: Key, modifiers: Modifiers) {
        if modifiers.contains(Modifiers::CTRL) || modifiers.contains(Modifiers::ALT) {
            return;
        }
        match key {
            Key::Char(ch) => self.textarea.insert_char(ch),
            Key::Backspace => self.textarea.backspace(),
            Key::Delete => self.textarea.delete(),
            Key::Left => self.textarea.move_left(),
            Key::Right => self.textarea.move_right(),
            Key::Home => self.textarea.move_home(),
            Key::End => self.textarea.move_end(),
            _ => {}
        }
    }

    /// Submit the current text. `None` when submission is not allowed.
    pub fn submit(&mut self) -> Option<PendingSubmission> {
        self.flow.begin(self.textarea.value())
    }

    /// Scroll the page by `rows`. Returns whether the offset moved.
    pub fn scroll_by(&mut self, rows: i32) -> bool {
        self.scroll.scroll_by(rows)
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        tracing::debug!(width, height, "resize");
        self.width = width;
        self.height = height;
        self.scroll.set_viewport_height(height as i32);
        self.previous = None;
    }

    /// Advance the animation clock one frame.
    pub fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    // ── Rendering ────────────────────────────────────────────────────

    /// Lay the page out, update visibility, and draw a full frame.
    pub fn render_frame(&mut self) -> Result<Frame, AppError> {
        let state = self.state();
        let ctx = RegionContext {
            state: &state,
            textarea: &self.textarea,
            can_submit: self.flow.can_submit(self.textarea.value()),
            tick: self.tick,
        };
        self.page.borrow_mut().layout(&ctx, self.width)?;

        let content_height = self.page.borrow().geometry().content_height;
        self.scroll.set_content_height(content_height);
        self.refresh_visibility();

        let mut frame = Frame::new(self.width, self.height);
        let elapsed = Duration::from_secs_f64(self.tick as f64 / self.config.fps.max(1) as f64);
        let backdrop = self.backdrop.render(
            self.width,
            self.height,
            self.scroll_offset(),
            self.config.cell_height,
            elapsed,
        );
        frame.place(&backdrop, 0, frame.area());

        let tracker = self.tracker.borrow();
        self.page
            .borrow()
            .compose(&mut frame, self.scroll.row(), |key| tracker.is_visible(key));
        draw_scrollbar(&mut frame, self.scroll.state());
        Ok(frame)
    }

    /// Measure the observed regions against the current viewport.
    ///
    /// Returns the keys whose flag changed.
    pub fn refresh_visibility(&mut self) -> Vec<RegionKey> {
        let viewport = Rect::new(0, self.scroll.row(), self.width as i32, self.height as i32);
        let page = self.page.borrow();
        let host = page.host(viewport, self.config.cell_height);
        let changed = self.tracker.borrow_mut().evaluate(&host);
        if !changed.is_empty() {
            tracing::debug!(?changed, "visibility changed");
        }
        changed
    }

    /// Render and write only the cells that changed since the last frame.
    pub fn present<W: Write>(&mut self, driver: &mut Driver<W>) -> Result<(), AppError> {
        let frame = self.render_frame()?;
        let updates = match &self.previous {
            Some(previous) => frame.diff(previous),
            None => frame.diff(&Frame::new(0, 0)),
        };
        driver.apply_updates(&updates)?;
        driver.flush()?;
        self.previous = Some(frame);
        Ok(())
    }

    // ── Event loop ───────────────────────────────────────────────────

    /// Take over the terminal and run until quit.
    ///
    /// Must be called inside a [`tokio::task::LocalSet`]: submissions run as
    /// local tasks.
    pub async fn run(mut self) -> Result<(), AppError> {
        let mut guard = TerminalGuard::enter()?;
        let mut driver = Driver::stdout();
        let mut events = EventStream::new();
        let mut frames = tokio::time::interval(self.config.frame_interval());
        frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut in_flight: Option<JoinHandle<SubmissionState>> = None;

        tracing::info!(provider = self.provider.name(), width = self.width, height = self.height, "running");
        while self.running {
            tokio::select! {
                _ = frames.tick() => {
                    self.tick();
                    self.present(&mut driver)?;
                }
                event = events.next() => match event {
                    Some(Ok(event)) => {
                        let pending = from_crossterm(event).and_then(|input| self.handle_input(input));
                        if let Some(pending) = pending {
                            in_flight = Some(tokio::task::spawn_local(pending.run(self.provider())));
                        }
                    }
                    Some(Err(err)) => return Err(err.into()),
                    None => break,
                },
            }
        }

        if let Some(task) = in_flight {
            task.abort();
        }
        guard.restore()?;
        tracing::info!("stopped");
        Ok(())
    }
}

impl Drop for App {
    fn drop(&mut self) {
        dispose_effect(self.observation);
        dispose_effect(self.region_set);
    }
}

// ===========================================================================
// Tests
// ===========================================================================
