//! Vertical page scrolling and scroll listeners.
//!
//! `ScrollState` tracks the page offset in rows, clamped to the content.
//! `ScrollView` wraps it with a pixel conversion and notifies registered
//! listeners with the new [`ScrollOffset`] each time the offset moves.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use slotmap::{new_key_type, SlotMap};

/// Default pixel height of one terminal row.
pub const DEFAULT_CELL_HEIGHT: i32 = 16;

// ---------------------------------------------------------------------------
// ScrollOffset
// ---------------------------------------------------------------------------

/// Vertical scroll distance in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScrollOffset(pub i32);

impl ScrollOffset {
    pub const ZERO: ScrollOffset = ScrollOffset(0);

    pub fn px(self) -> i32 {
        self.0
    }

    /// The offset scaled by `factor`, for decorative parallax.
    pub fn parallax(self, factor: f64) -> f64 {
        self.0 as f64 * factor
    }
}

// ---------------------------------------------------------------------------
// ScrollState
// ---------------------------------------------------------------------------

/// Scroll position of the page, in rows.
///
/// The offset is always clamped to `[0, max_scroll]` where
/// `max_scroll = content_height - viewport_height` (clamped to zero).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrollState {
    pub offset: i32,
    pub content_height: i32,
    pub viewport_height: i32,
}

impl ScrollState {
    pub fn new(content_height: i32, viewport_height: i32) -> Self {
        Self {
            offset: 0,
            content_height,
            viewport_height,
        }
    }

    pub fn max_scroll(&self) -> i32 {
        (self.content_height - self.viewport_height).max(0)
    }

    /// Scroll to an absolute row, clamping to the valid range.
    pub fn scroll_to(&mut self, y: i32) {
        self.offset = y.clamp(0, self.max_scroll());
    }

    pub fn scroll_by(&mut self, dy: i32) {
        self.scroll_to(self.offset + dy);
    }

    pub fn is_scrollable(&self) -> bool {
        self.content_height > self.viewport_height
    }

    /// Scroll progress in `[0.0, 1.0]`; 0.0 when not scrollable.
    pub fn scroll_percent(&self) -> f32 {
        let max = self.max_scroll();
        if max <= 0 {
            0.0
        } else {
            self.offset as f32 / max as f32
        }
    }

    pub fn set_content_height(&mut self, height: i32) {
        self.content_height = height;
        self.scroll_to(self.offset);
    }

    pub fn set_viewport_height(&mut self, height: i32) {
        self.viewport_height = height;
        self.scroll_to(self.offset);
    }
}

// ---------------------------------------------------------------------------
// ScrollbarState
// ---------------------------------------------------------------------------

/// Thumb geometry for a vertical scrollbar, as fractions of the track.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollbarState {
    pub thumb_position: f32,
    pub thumb_size: f32,
}

impl ScrollbarState {
    pub fn from_scroll_state(state: &ScrollState) -> Self {
        let content = state.content_height;
        let viewport = state.viewport_height;
        if content <= 0 || viewport <= 0 {
            return ScrollbarState {
                thumb_position: 0.0,
                thumb_size: 1.0,
            };
        }
        ScrollbarState {
            thumb_position: state.scroll_percent().clamp(0.0, 1.0),
            thumb_size: (viewport as f32 / content as f32).clamp(0.0, 1.0),
        }
    }

    /// Thumb rows `(start, len)` on a track `track` rows tall.
    pub fn thumb_rows(&self, track: i32) -> (i32, i32) {
        if track <= 0 {
            return (0, 0);
        }
        let len = ((self.thumb_size * track as f32).round() as i32).clamp(1, track);
        let start = (self.thumb_position * (track - len) as f32).round() as i32;
        (start, len)
    }
}

// ---------------------------------------------------------------------------
// Scroll listeners
// ---------------------------------------------------------------------------

new_key_type! {
    /// Handle of one registered scroll listener.
    pub struct ListenerId;
}

type Listener = Rc<dyn Fn(ScrollOffset)>;
type ListenerSlots = RefCell<SlotMap<ListenerId, Listener>>;

/// Registry of scroll listeners. Clones share the registry.
#[derive(Clone, Default)]
pub struct ScrollEvents {
    listeners: Rc<ListenerSlots>,
}

impl ScrollEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `f`. It stays registered until the returned guard is dropped
    /// or [removed](ScrollListener::remove).
    pub fn listen(&self, f: impl Fn(ScrollOffset) + 'static) -> ScrollListener {
        let id = self.listeners.borrow_mut().insert(Rc::new(f));
        ScrollListener {
            slots: Rc::downgrade(&self.listeners),
            id: Some(id),
        }
    }

    /// Call every listener with `offset`.
    ///
    /// Listeners may register or remove listeners while being called; changes
    /// take effect from the next dispatch.
    pub fn dispatch(&self, offset: ScrollOffset) {
        let snapshot: Vec<Listener> = self.listeners.borrow().values().cloned().collect();
        for listener in snapshot {
            listener(offset);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

impl std::fmt::Debug for ScrollEvents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollEvents")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// Registration guard for one scroll listener.
#[derive(Debug)]
pub struct ScrollListener {
    slots: Weak<ListenerSlots>,
    id: Option<ListenerId>,
}

impl ScrollListener {
    /// Unregister now. Removing twice is a no-op.
    pub fn remove(&mut self) {
        let Some(id) = self.id.take() else {
            return;
        };
        if let Some(slots) = self.slots.upgrade() {
            // Dropped outside the borrow: the closure may own listeners too.
            let removed = slots.borrow_mut().remove(id);
            drop(removed);
        }
    }

    pub fn is_active(&self) -> bool {
        match (self.id, self.slots.upgrade()) {
            (Some(id), Some(slots)) => slots.borrow().contains_key(id),
            _ => false,
        }
    }
}

impl Drop for ScrollListener {
    fn drop(&mut self) {
        self.remove();
    }
}

// ---------------------------------------------------------------------------
// ScrollView
// ---------------------------------------------------------------------------

/// The scrollable page: row-based state, pixel conversion, listeners.
#[derive(Debug)]
pub struct ScrollView {
    state: ScrollState,
    cell_height: i32,
    events: ScrollEvents,
}

impl ScrollView {
    pub fn new(cell_height: i32) -> Self {
        Self {
            state: ScrollState::default(),
            cell_height: cell_height.max(1),
            events: ScrollEvents::new(),
        }
    }

    pub fn state(&self) -> &ScrollState {
        &self.state
    }

    pub fn events(&self) -> &ScrollEvents {
        &self.events
    }

    pub fn cell_height(&self) -> i32 {
        self.cell_height
    }

    /// Current offset in rows.
    pub fn row(&self) -> i32 {
        self.state.offset
    }

    /// Current offset in pixels.
    pub fn offset(&self) -> ScrollOffset {
        ScrollOffset(self.state.offset * self.cell_height)
    }

    /// Scroll by `rows`. Returns true (and notifies listeners) if the offset
    /// moved.
    pub fn scroll_by(&mut self, rows: i32) -> bool {
        self.apply(|s| s.scroll_by(rows))
    }

    pub fn scroll_to(&mut self, row: i32) -> bool {
        self.apply(|s| s.scroll_to(row))
    }

    /// Scroll up one viewport, keeping one row of overlap.
    pub fn page_up(&mut self) -> bool {
        let step = (self.state.viewport_height - 1).max(1);
        self.scroll_by(-step)
    }

    /// Scroll down one viewport, keeping one row of overlap.
    pub fn page_down(&mut self) -> bool {
        let step = (self.state.viewport_height - 1).max(1);
        self.scroll_by(step)
    }

    /// Update the content height. Notifies listeners if re-clamping moved the
    /// offset.
    pub fn set_content_height(&mut self, rows: i32) -> bool {
        self.apply(|s| s.set_content_height(rows))
    }

    pub fn set_viewport_height(&mut self, rows: i32) -> bool {
        self.apply(|s| s.set_viewport_height(rows))
    }

    fn apply(&mut self, f: impl FnOnce(&mut ScrollState)) -> bool {
        let before = self.state.offset;
        f(&mut self.state);
        let moved = self.state.offset != before;
        if moved {
            self.events.dispatch(self.offset());
        }
        moved
    }
}

impl Default for ScrollView {
    fn default() -> Self {
        Self::new(DEFAULT_CELL_HEIGHT)
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    // -----------------------------------------------------------------------
    // ScrollState
    // -----------------------------------------------------------------------

    #[test]
    fn max_scroll_normal_and_short_content() {
        assert_eq!(ScrollState::new(200, 30).max_scroll(), 170);
        assert_eq!(ScrollState::new(10, 30).max_scroll(), 0);
        assert_eq!(ScrollState::new(30, 30).max_scroll(), 0);
    }

    #[test]
    fn scroll_to_clamps() {
        let mut state = ScrollState::new(200, 30);
        state.scroll_to(999);
        assert_eq!(state.offset, 170);
        state.scroll_to(-5);
        assert_eq!(state.offset, 0);
    }

    #[test]
    fn shrinking_content_reclamps() {
        let mut state = ScrollState::new(200, 30);
        state.scroll_to(150);
        state.set_content_height(100);
        assert_eq!(state.offset, 70);
    }

    #[test]
    fn scroll_percent() {
        let mut state = ScrollState::new(130, 30);
        assert_eq!(state.scroll_percent(), 0.0);
        state.scroll_to(50);
        assert!((state.scroll_percent() - 0.5).abs() < f32::EPSILON);
        assert_eq!(ScrollState::new(10, 30).scroll_percent(), 0.0);
    }

    #[test]
    fn scrollbar_thumb() {
        let mut state = ScrollState::new(100, 25);
        state.scroll_to(75);
        let bar = ScrollbarState::from_scroll_state(&state);
        assert!((bar.thumb_size - 0.25).abs() < f32::EPSILON);
        assert_eq!(bar.thumb_rows(20), (15, 5));
    }

    #[test]
    fn scrollbar_without_content_fills_track() {
        let bar = ScrollbarState::from_scroll_state(&ScrollState::default());
        assert_eq!(bar.thumb_size, 1.0);
        assert_eq!(bar.thumb_rows(0), (0, 0));
    }

    // -----------------------------------------------------------------------
    // Listeners
    // -----------------------------------------------------------------------

    #[test]
    fn listener_receives_offsets_until_dropped() {
        let events = ScrollEvents::new();
        let seen = Rc::new(Cell::new(ScrollOffset::ZERO));
        let seen_c = seen.clone();
        let guard = events.listen(move |offset| seen_c.set(offset));
        events.dispatch(ScrollOffset(32));
        assert_eq!(seen.get(), ScrollOffset(32));
        assert!(guard.is_active());

        drop(guard);
        events.dispatch(ScrollOffset(64));
        assert_eq!(seen.get(), ScrollOffset(32));
        assert_eq!(events.listener_count(), 0);
    }

    #[test]
    fn remove_twice_is_a_no_op() {
        let events = ScrollEvents::new();
        let mut guard = events.listen(|_| {});
        guard.remove();
        guard.remove();
        assert!(!guard.is_active());
        assert_eq!(events.listener_count(), 0);
    }

    #[test]
    fn listener_outliving_registry_is_inert() {
        let events = ScrollEvents::new();
        let guard = events.listen(|_| {});
        drop(events);
        assert!(!guard.is_active());
        drop(guard);
    }

    // -----------------------------------------------------------------------
    // ScrollView
    // -----------------------------------------------------------------------

    #[test]
    fn view_converts_rows_to_pixels() {
        let mut view = ScrollView::new(16);
        view.set_viewport_height(10);
        view.set_content_height(100);
        assert!(view.scroll_by(3));
        assert_eq!(view.row(), 3);
        assert_eq!(view.offset(), ScrollOffset(48));
    }

    #[test]
    fn view_notifies_only_on_movement() {
        let mut view = ScrollView::new(16);
        view.set_viewport_height(10);
        view.set_content_height(20);
        let calls = Rc::new(Cell::new(0));
        let calls_c = calls.clone();
        let _guard = view.events().listen(move |_| calls_c.set(calls_c.get() + 1));

        assert!(!view.scroll_by(-1));
        assert!(view.page_down());
        assert_eq!(view.row(), 9);
        assert!(view.page_down());
        assert_eq!(view.row(), 10);
        assert!(view.scroll_to(0));
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn view_reclamp_notifies() {
        let mut view = ScrollView::new(8);
        view.set_viewport_height(10);
        view.set_content_height(50);
        view.scroll_to(40);
        let last = Rc::new(Cell::new(ScrollOffset::ZERO));
        let last_c = last.clone();
        let _guard = view.events().listen(move |o| last_c.set(o));
        assert!(view.set_content_height(20));
        assert_eq!(last.get(), ScrollOffset(80));
    }

    #[test]
    fn parallax_scales_offset() {
        assert!((ScrollOffset(200).parallax(0.05) - 10.0).abs() < 1e-9);
    }
}
