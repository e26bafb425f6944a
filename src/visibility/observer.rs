//! Viewport intersection observation.
//!
//! [`IntersectionObserver`] watches a set of elements. Each time the host calls
//! [`evaluate`](IntersectionObserver::evaluate) (once per frame), the observer
//! measures every watched element against the root rectangle (the host
//! viewport grown by the configured root margin) and reports the elements whose
//! intersecting state changed. All coordinates are in pixels.

use crate::geometry::{Rect, Spacing};

use super::region::ElementId;

/// Fraction of an element's area that must be inside the root.
pub const DEFAULT_THRESHOLD: f64 = 0.1;

/// Pixels trimmed off the bottom of the viewport before measuring.
pub const DEFAULT_BOTTOM_INSET: i32 = 100;

// ---------------------------------------------------------------------------
// ObserverOptions
// ---------------------------------------------------------------------------

/// Threshold and root margin.
///
/// `root_margin` follows CSS `rootMargin` signs: positive values grow the
/// root, negative values shrink it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserverOptions {
    pub threshold: f64,
    pub root_margin: Spacing,
}

impl ObserverOptions {
    pub fn new(threshold: f64, root_margin: Spacing) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
            root_margin,
        }
    }

    /// Set the threshold (builder). Clamped to `[0, 1]`.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Set the root margin (builder).
    pub fn with_root_margin(mut self, margin: Spacing) -> Self {
        self.root_margin = margin;
        self
    }
}

impl Default for ObserverOptions {
    /// 10% threshold, root margin `0 0 -100px 0`.
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD, Spacing::bottom(-DEFAULT_BOTTOM_INSET))
    }
}

// ---------------------------------------------------------------------------
// IntersectionHost
// ---------------------------------------------------------------------------

/// Geometry the observer measures against.
pub trait IntersectionHost {
    /// The viewport in page coordinates, or `None` when the host has no
    /// viewport. Without one nothing is ever reported.
    fn viewport(&self) -> Option<Rect>;

    /// Bounds of `element` in page coordinates, or `None` if it has none yet.
    fn element_bounds(&self, element: ElementId) -> Option<Rect>;
}

// ---------------------------------------------------------------------------
// IntersectionEntry
// ---------------------------------------------------------------------------

/// One reported change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    pub target: ElementId,
    pub is_intersecting: bool,
    /// Visible fraction of the element, `[0, 1]`.
    pub ratio: f64,
    pub bounds: Rect,
    pub root: Rect,
}

impl IntersectionEntry {
    /// An entry carrying only the target and flag, as a platform callback
    /// would deliver it.
    pub fn flag(target: ElementId, is_intersecting: bool) -> Self {
        Self {
            target,
            is_intersecting,
            ratio: if is_intersecting { 1.0 } else { 0.0 },
            bounds: Rect::EMPTY,
            root: Rect::EMPTY,
        }
    }
}

/// Visible fraction of `bounds` inside `root`.
///
/// A zero-area element counts as fully visible when its origin lies within
/// `root` (edges included), otherwise as hidden.
pub fn intersection_ratio(bounds: Rect, root: Rect) -> f64 {
    let area = bounds.area();
    if area == 0 {
        return if root.contains_inclusive(bounds.x, bounds.y) { 1.0 } else { 0.0 };
    }
    bounds.intersection(root).area() as f64 / area as f64
}

/// Edge-inclusive overlap: rectangles that merely share an edge touch.
fn touches(a: Rect, b: Rect) -> bool {
    a.x <= b.right() && a.right() >= b.x && a.y <= b.bottom() && a.bottom() >= b.y
}

// ---------------------------------------------------------------------------
// IntersectionObserver
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Target {
    element: ElementId,
    /// Last reported state; `None` until the first evaluation.
    last: Option<bool>,
}

/// Watches elements and reports threshold crossings.
#[derive(Debug, Clone)]
pub struct IntersectionObserver {
    options: ObserverOptions,
    targets: Vec<Target>,
}

impl IntersectionObserver {
    pub fn new(options: ObserverOptions) -> Self {
        Self {
            options,
            targets: Vec::new(),
        }
    }

    pub fn options(&self) -> ObserverOptions {
        self.options
    }

    /// Start watching `element`. Watching twice is a no-op.
    pub fn observe(&mut self, element: ElementId) {
        if !self.is_observing(element) {
            self.targets.push(Target { element, last: None });
        }
    }

    /// Stop watching `element`.
    pub fn unobserve(&mut self, element: ElementId) {
        self.targets.retain(|t| t.element != element);
    }

    /// Stop watching everything.
    pub fn disconnect(&mut self) {
        self.targets.clear();
    }

    pub fn is_observing(&self, element: ElementId) -> bool {
        self.targets.iter().any(|t| t.element == element)
    }

    /// Number of watched elements.
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// The root rectangle for a given viewport.
    pub fn root_for(&self, viewport: Rect) -> Rect {
        viewport.grow(self.options.root_margin)
    }

    /// Measure every watched element and return the ones whose state changed.
    ///
    /// An element is reported on its first measurement after `observe`, then
    /// only when it crosses the threshold. Elements without bounds are skipped
    /// and keep their last state.
    pub fn evaluate(&mut self, host: &dyn IntersectionHost) -> Vec<IntersectionEntry> {
        let Some(viewport) = host.viewport() else {
            return Vec::new();
        };
        let root = self.root_for(viewport);
        let threshold = self.options.threshold;

        let mut entries = Vec::new();
        for target in &mut self.targets {
            let Some(bounds) = host.element_bounds(target.element) else {
                continue;
            };
            let ratio = intersection_ratio(bounds, root);
            let is_intersecting = if threshold > 0.0 {
                ratio >= threshold
            } else {
                touches(bounds, root)
            };
            if target.last != Some(is_intersecting) {
                target.last = Some(is_intersecting);
                entries.push(IntersectionEntry {
                    target: target.element,
                    is_intersecting,
                    ratio,
                    bounds,
                    root,
                });
            }
        }
        entries
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;
    use std::collections::HashMap;

    struct Page {
        viewport: Option<Rect>,
        bounds: HashMap<ElementId, Rect>,
    }

    impl IntersectionHost for Page {
        fn viewport(&self) -> Option<Rect> {
            self.viewport
        }

        fn element_bounds(&self, element: ElementId) -> Option<Rect> {
            self.bounds.get(&element).copied()
        }
    }

    fn ids<const N: usize>() -> [ElementId; N] {
        let mut sm: SlotMap<ElementId, ()> = SlotMap::with_key();
        std::array::from_fn(|_| sm.insert(()))
    }

    fn page(viewport: Rect, items: &[(ElementId, Rect)]) -> Page {
        Page {
            viewport: Some(viewport),
            bounds: items.iter().copied().collect(),
        }
    }

    #[test]
    fn default_options_match_reveal_settings() {
        let o = ObserverOptions::default();
        assert_eq!(o.threshold, 0.1);
        assert_eq!(o.root_margin, Spacing::new(0, 0, -100, 0));
    }

    #[test]
    fn threshold_is_clamped() {
        assert_eq!(ObserverOptions::default().with_threshold(3.0).threshold, 1.0);
        assert_eq!(ObserverOptions::default().with_threshold(-1.0).threshold, 0.0);
    }

    #[test]
    fn ratio_of_partially_visible_element() {
        let root = Rect::new(0, 0, 100, 100);
        let half = Rect::new(0, 50, 100, 100);
        assert!((intersection_ratio(half, root) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn ratio_of_zero_area_element() {
        let root = Rect::new(0, 0, 100, 100);
        assert_eq!(intersection_ratio(Rect::new(10, 100, 0, 0), root), 1.0);
        assert_eq!(intersection_ratio(Rect::new(10, 200, 0, 0), root), 0.0);
    }

    #[test]
    fn first_evaluation_reports_every_measured_target() {
        let [a, b] = ids();
        let mut observer = IntersectionObserver::new(ObserverOptions::default());
        observer.observe(a);
        observer.observe(b);
        let host = page(
            Rect::new(0, 0, 800, 600),
            &[(a, Rect::new(0, 0, 800, 100)), (b, Rect::new(0, 2000, 800, 100))],
        );
        let entries = observer.evaluate(&host);
        assert_eq!(entries.len(), 2);
        assert!(entries[0].is_intersecting);
        assert!(!entries[1].is_intersecting);
    }

    #[test]
    fn unchanged_state_is_not_reported_again() {
        let [a] = ids();
        let mut observer = IntersectionObserver::new(ObserverOptions::default());
        observer.observe(a);
        let host = page(Rect::new(0, 0, 800, 600), &[(a, Rect::new(0, 0, 800, 100))]);
        assert_eq!(observer.evaluate(&host).len(), 1);
        assert!(observer.evaluate(&host).is_empty());
    }

    #[test]
    fn bottom_margin_delays_entry() {
        let [a] = ids();
        let mut observer = IntersectionObserver::new(ObserverOptions::default());
        observer.observe(a);
        // Element occupies y 550..650; viewport 0..600, root 0..500.
        let host = page(Rect::new(0, 0, 800, 600), &[(a, Rect::new(0, 550, 800, 100))]);
        let entries = observer.evaluate(&host);
        assert!(!entries[0].is_intersecting);
        assert_eq!(entries[0].root, Rect::new(0, 0, 800, 500));

        // Scroll down 70px: root 70..570 covers 550..570 => 20%.
        let host = page(Rect::new(0, 70, 800, 600), &[(a, Rect::new(0, 550, 800, 100))]);
        let entries = observer.evaluate(&host);
        assert_eq!(entries.len(), 1);
        assert!(entries[0].is_intersecting);
        assert!((entries[0].ratio - 0.2).abs() < 1e-9);
    }

    #[test]
    fn below_threshold_is_not_intersecting() {
        let [a] = ids();
        let mut observer = IntersectionObserver::new(ObserverOptions::default());
        observer.observe(a);
        // 5% of a 200px element inside the root.
        let host = page(Rect::new(0, 0, 800, 600), &[(a, Rect::new(0, 490, 800, 200))]);
        let entries = observer.evaluate(&host);
        assert!(!entries[0].is_intersecting);
        assert!((entries[0].ratio - 0.05).abs() < 1e-9);
    }

    #[test]
    fn no_viewport_reports_nothing() {
        let [a] = ids();
        let mut observer = IntersectionObserver::new(ObserverOptions::default());
        observer.observe(a);
        let host = Page {
            viewport: None,
            bounds: [(a, Rect::new(0, 0, 10, 10))].into_iter().collect(),
        };
        assert!(observer.evaluate(&host).is_empty());
    }

    #[test]
    fn missing_bounds_are_skipped() {
        let [a] = ids();
        let mut observer = IntersectionObserver::new(ObserverOptions::default());
        observer.observe(a);
        let host = page(Rect::new(0, 0, 800, 600), &[]);
        assert!(observer.evaluate(&host).is_empty());
    }

    #[test]
    fn observe_unobserve_disconnect() {
        let [a, b] = ids();
        let mut observer = IntersectionObserver::new(ObserverOptions::default());
        observer.observe(a);
        observer.observe(a);
        observer.observe(b);
        assert_eq!(observer.len(), 2);
        observer.unobserve(a);
        assert!(!observer.is_observing(a));
        observer.disconnect();
        assert!(observer.is_empty());
    }

    #[test]
    fn zero_threshold_counts_edge_contact() {
        let [a] = ids();
        let options = ObserverOptions::new(0.0, Spacing::ZERO);
        let mut observer = IntersectionObserver::new(options);
        observer.observe(a);
        let host = page(Rect::new(0, 0, 800, 600), &[(a, Rect::new(0, 600, 800, 50))]);
        assert!(observer.evaluate(&host)[0].is_intersecting);
    }
}
