//! The visibility tracker: registered regions, the active observation set, and
//! the resulting [`VisibilityMap`].
//!
//! Regions register on mount and deregister on unmount. [`attach`] replaces the
//! observation set; [`detach`] drops it. Each frame the host calls
//! [`evaluate`], which folds the observer's reports into the map.
//!
//! [`attach`]: VisibilityTracker::attach
//! [`detach`]: VisibilityTracker::detach
//! [`evaluate`]: VisibilityTracker::evaluate

use std::collections::HashMap;

use super::map::VisibilityMap;
use super::observer::{IntersectionEntry, IntersectionHost, IntersectionObserver, ObserverOptions};
use super::region::{ElementId, RegionKey};

/// Tracks which mounted regions have entered the viewport.
#[derive(Debug)]
pub struct VisibilityTracker {
    options: ObserverOptions,
    /// Mounted region elements.
    mounted: HashMap<ElementId, RegionKey>,
    /// Present while attached.
    observer: Option<IntersectionObserver>,
    /// Elements in the current observation set.
    observed: HashMap<ElementId, RegionKey>,
    map: VisibilityMap,
    attach_count: u64,
}

impl VisibilityTracker {
    pub fn new(options: ObserverOptions) -> Self {
        Self {
            options,
            mounted: HashMap::new(),
            observer: None,
            observed: HashMap::new(),
            map: VisibilityMap::new(),
            attach_count: 0,
        }
    }

    pub fn options(&self) -> ObserverOptions {
        self.options
    }

    // -- registration -------------------------------------------------------

    /// Record that `element` now renders region `key`.
    ///
    /// A key is held by at most one element; an older element holding the
    /// same key is deregistered first. The key enters the map as not visible.
    pub fn register(&mut self, key: RegionKey, element: ElementId) {
        let previous: Vec<ElementId> = self
            .mounted
            .iter()
            .filter(|(id, k)| **k == key && **id != element)
            .map(|(id, _)| *id)
            .collect();
        for id in previous {
            self.deregister(id);
        }
        if self.mounted.insert(element, key).is_none() {
            tracing::trace!(region = %key, "region mounted");
            self.map.set(key, false);
        }
    }

    /// Record that `element` has unmounted.
    ///
    /// Its key leaves the map and the element leaves the observation set.
    /// Unknown elements are ignored.
    pub fn deregister(&mut self, element: ElementId) {
        let Some(key) = self.mounted.remove(&element) else {
            return;
        };
        tracing::trace!(region = %key, "region unmounted");
        self.map.remove(key);
        if self.observed.remove(&element).is_some() {
            if let Some(observer) = self.observer.as_mut() {
                observer.unobserve(element);
            }
        }
    }

    pub fn is_registered(&self, element: ElementId) -> bool {
        self.mounted.contains_key(&element)
    }

    /// Mounted regions in page order.
    pub fn registered(&self) -> Vec<(RegionKey, ElementId)> {
        let mut regions: Vec<(RegionKey, ElementId)> =
            self.mounted.iter().map(|(id, key)| (*key, *id)).collect();
        regions.sort_by_key(|(key, _)| *key);
        regions
    }

    /// The element currently rendering `key`, if mounted.
    pub fn element_for(&self, key: RegionKey) -> Option<ElementId> {
        self.mounted
            .iter()
            .find_map(|(id, k)| (*k == key).then_some(*id))
    }

    // -- observation --------------------------------------------------------

    /// Replace the observation set with `regions`.
    ///
    /// Any previous set is detached first. Pairs whose element is not mounted,
    /// or is mounted under a different key, are skipped.
    pub fn attach<I>(&mut self, regions: I)
    where
        I: IntoIterator<Item = (RegionKey, ElementId)>,
    {
        self.detach();
        let mut observer = IntersectionObserver::new(self.options);
        for (key, element) in regions {
            if self.mounted.get(&element) != Some(&key) {
                tracing::trace!(region = %key, "skipping unmounted region");
                continue;
            }
            observer.observe(element);
            self.observed.insert(element, key);
        }
        self.attach_count += 1;
        tracing::debug!(observed = observer.len(), "visibility tracker attached");
        self.observer = Some(observer);
    }

    /// Attach to every mounted region.
    pub fn attach_mounted(&mut self) {
        let regions = self.registered();
        self.attach(regions);
    }

    /// Stop all observation. Calling it again is a no-op.
    ///
    /// Flags already in the map are kept; they stop changing until the next
    /// [`attach`](Self::attach).
    pub fn detach(&mut self) {
        if let Some(mut observer) = self.observer.take() {
            observer.disconnect();
            self.observed.clear();
            tracing::debug!("visibility tracker detached");
        }
    }

    /// Detach only if attachment number `generation` (see
    /// [`attach_count`](Self::attach_count)) is still the current one.
    ///
    /// Returns whether anything was detached.
    pub fn detach_if_current(&mut self, generation: u64) -> bool {
        if generation != self.attach_count || !self.is_attached() {
            return false;
        }
        self.detach();
        true
    }

    pub fn is_attached(&self) -> bool {
        self.observer.is_some()
    }

    pub fn is_observing(&self, element: ElementId) -> bool {
        self.observed.contains_key(&element)
    }

    /// Number of elements in the observation set.
    pub fn observed_count(&self) -> usize {
        self.observed.len()
    }

    /// How many times [`attach`](Self::attach) has run.
    pub fn attach_count(&self) -> u64 {
        self.attach_count
    }

    /// Apply one intersection report.
    ///
    /// Ignored unless the target is both observed and mounted. Returns the
    /// region key when its flag changed.
    pub fn report(&mut self, entry: IntersectionEntry) -> Option<RegionKey> {
        let key = *self.observed.get(&entry.target)?;
        if self.mounted.get(&entry.target) != Some(&key) {
            return None;
        }
        self.map.set(key, entry.is_intersecting).then(|| {
            tracing::trace!(region = %key, visible = entry.is_intersecting, ratio = entry.ratio, "visibility changed");
            key
        })
    }

    /// Measure the observation set against `host` and apply the reports.
    ///
    /// Returns the keys whose flag changed. Does nothing while detached or
    /// when the host has no viewport.
    pub fn evaluate(&mut self, host: &dyn IntersectionHost) -> Vec<RegionKey> {
        let entries = match self.observer.as_mut() {
            Some(observer) => observer.evaluate(host),
            None => return Vec::new(),
        };
        entries
            .into_iter()
            .filter_map(|entry| self.report(entry))
            .collect()
    }

    // -- queries ------------------------------------------------------------

    pub fn is_visible(&self, key: RegionKey) -> bool {
        self.map.is_visible(key)
    }

    pub fn map(&self) -> &VisibilityMap {
        &self.map
    }
}

impl Default for VisibilityTracker {
    fn default() -> Self {
        Self::new(ObserverOptions::default())
    }
}

// ===========================================================================
// Tests
// ===========================================================================
