//! Scoped observation: tracker attachment plus scroll listener, released
//! together.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use super::region::{ElementId, RegionKey};
use super::scroll::{ScrollEvents, ScrollListener, ScrollOffset};
use super::tracker::VisibilityTracker;

/// One live observation set.
///
/// Creating it attaches the tracker to a set of regions and registers a scroll
/// listener. Dropping it (or calling [`release`](Self::release)) detaches the
/// tracker and removes the listener, on every exit path including unwinding.
///
/// A subscription only owns the attachment it made. Once a newer one replaces
/// it, releasing the older guard leaves the tracker alone.
#[derive(Debug)]
pub struct Subscription {
    tracker: Weak<RefCell<VisibilityTracker>>,
    generation: u64,
    listener: Option<ScrollListener>,
}

impl Subscription {
    /// Attach `tracker` to `regions` and start forwarding scroll offsets to
    /// `on_scroll`.
    pub fn new<I>(
        tracker: &Rc<RefCell<VisibilityTracker>>,
        regions: I,
        scroll: &ScrollEvents,
        on_scroll: impl Fn(ScrollOffset) + 'static,
    ) -> Self
    where
        I: IntoIterator<Item = (RegionKey, ElementId)>,
    {
        let generation = {
            let mut tracker = tracker.borrow_mut();
            tracker.attach(regions);
            tracker.attach_count()
        };
        Self {
            tracker: Rc::downgrade(tracker),
            generation,
            listener: Some(scroll.listen(on_scroll)),
        }
    }

    /// Whether this subscription still holds its resources and its attachment
    /// is the tracker's current one.
    pub fn is_active(&self) -> bool {
        if self.listener.is_none() {
            return false;
        }
        self.tracker.upgrade().is_some_and(|tracker| {
            let tracker = tracker.borrow();
            tracker.is_attached() && tracker.attach_count() == self.generation
        })
    }

    /// Detach and unregister. Releasing twice is a no-op.
    pub fn release(&mut self) {
        let Some(mut listener) = self.listener.take() else {
            return;
        };
        listener.remove();
        if let Some(tracker) = self.tracker.upgrade() {
            tracker.borrow_mut().detach_if_current(self.generation);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}
