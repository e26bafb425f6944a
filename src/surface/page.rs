//! The page: mounted region elements, their layout, and composition.
//!
//! Elements live in a slotmap arena. Mounting a region allocates a fresh
//! [`ElementId`] and registers it with the tracker; unmounting removes it and
//! deregisters. [`PageHost`] exposes laid-out bounds in pixels so the tracker
//! can measure them against the viewport.

use slotmap::SlotMap;

use crate::analysis::SubmissionState;
use crate::geometry::Rect;
use crate::render::frame::Frame;
use crate::render::strip::{CellStyle, Strip, StyledCell, Tone};
use crate::visibility::{
    ElementId, IntersectionHost, RegionKey, ScrollState, ScrollbarState, VisibilityTracker,
};

use super::content::{height_of, render_region, RegionContext};
use super::layout::{content_width, layout_page, PageGeometry};

/// Terminal cells are about twice as tall as they are wide.
pub const CELL_ASPECT: i32 = 2;

/// Regions the page shows for `state`, in page order.
pub fn regions_for(state: &SubmissionState) -> Vec<RegionKey> {
    let mut regions = vec![RegionKey::Header, RegionKey::Form];
    match state {
        SubmissionState::Failure(_) => regions.push(RegionKey::Error),
        SubmissionState::Success(_) => regions.extend([
            RegionKey::Diagnoses,
            RegionKey::Recommendations,
            RegionKey::Disclaimer,
        ]),
        SubmissionState::Idle | SubmissionState::Loading => {}
    }
    regions
}

/// Mounted region elements plus their latest layout.
#[derive(Debug, Default)]
pub struct Page {
    elements: SlotMap<ElementId, RegionKey>,
    geometry: PageGeometry,
    blocks: Vec<(RegionKey, Vec<Strip>)>,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount and unmount elements until exactly `wanted` is mounted.
    ///
    /// Returns the mounted `(key, element)` pairs in page order.
    pub fn reconcile(
        &mut self,
        wanted: &[RegionKey],
        tracker: &mut VisibilityTracker,
    ) -> Vec<(RegionKey, ElementId)> {
        let stale: Vec<ElementId> = self
            .elements
            .iter()
            .filter(|(_, key)| !wanted.contains(key))
            .map(|(id, _)| id)
            .collect();
        for id in stale {
            if let Some(key) = self.elements.remove(id) {
                tracing::debug!(region = %key, "unmount");
            }
            tracker.deregister(id);
        }

        for &key in wanted {
            if self.element(key).is_none() {
                let id = self.elements.insert(key);
                tracker.register(key, id);
                tracing::debug!(region = %key, "mount");
            }
        }

        self.blocks.retain(|(key, _)| wanted.contains(key));
        self.geometry.regions.retain(|(key, _)| wanted.contains(key));
        self.mounted()
    }

    /// Mounted `(key, element)` pairs in page order.
    pub fn mounted(&self) -> Vec<(RegionKey, ElementId)> {
        let mut mounted: Vec<_> = self.elements.iter().map(|(id, key)| (*key, id)).collect();
        mounted.sort_by_key(|(key, _)| *key);
        mounted
    }

    pub fn element(&self, key: RegionKey) -> Option<ElementId> {
        self.elements
            .iter()
            .find_map(|(id, k)| (*k == key).then_some(id))
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    /// Render every mounted region and lay the page out `width` columns wide.
    pub fn layout(&mut self, ctx: &RegionContext<'_>, width: u16) -> Result<(), taffy::TaffyError> {
        let inner = content_width(width);
        let mut rendered: Vec<(RegionKey, Vec<Strip>)> = self
            .mounted()
            .into_iter()
            .map(|(key, _)| (key, render_region(key, ctx, inner)))
            .collect();
        let heights: Vec<(RegionKey, u16)> = rendered
            .iter()
            .map(|(key, strips)| (*key, height_of(strips)))
            .collect();
        self.geometry = layout_page(&heights, width)?;

        for (key, strips) in &mut rendered {
            let Some(bounds) = self.geometry.bounds(*key) else {
                continue;
            };
            for strip in strips.iter_mut() {
                strip.y += bounds.y;
                strip.x_offset += bounds.x;
            }
        }
        self.blocks = rendered;
        Ok(())
    }

    /// Intersection host for a viewport given in page cells.
    pub fn host(&self, viewport: Rect, cell_height: i32) -> PageHost<'_> {
        let cell_height = cell_height.max(1);
        PageHost {
            page: self,
            viewport: (viewport.area() > 0).then_some(viewport),
            scale: ((cell_height / CELL_ASPECT).max(1), cell_height),
        }
    }

    /// Draw the laid-out regions into `frame`, scrolled by `scroll_rows`.
    ///
    /// Regions `visible` reports false for are dimmed.
    pub fn compose(&self, frame: &mut Frame, scroll_rows: i32, visible: impl Fn(RegionKey) -> bool) {
        let clip = frame.area();
        for (key, strips) in &self.blocks {
            if visible(*key) {
                frame.place(strips, scroll_rows, clip);
            } else {
                let mut dimmed = strips.clone();
                dimmed.iter_mut().for_each(Strip::dim);
                frame.place(&dimmed, scroll_rows, clip);
            }
        }
    }
}

/// Draw a one-column scrollbar on the right edge when the page scrolls.
pub fn draw_scrollbar(frame: &mut Frame, state: &ScrollState) {
    if !state.is_scrollable() || frame.width() == 0 {
        return;
    }
    let track = frame.height() as i32;
    let x = frame.width() as i32 - 1;
    let (start, len) = ScrollbarState::from_scroll_state(state).thumb_rows(track);
    for y in 0..track {
        let cell = if (start..start + len).contains(&y) {
            StyledCell::new('┃', CellStyle::fg(Tone::AccentAlt))
        } else {
            StyledCell::new('│', CellStyle::fg(Tone::Muted).dimmed())
        };
        frame.put(x, y, cell);
    }
}

/// Pixel-space view of a [`Page`] for the intersection observer.
#[derive(Debug)]
pub struct PageHost<'a> {
    page: &'a Page,
    viewport: Option<Rect>,
    scale: (i32, i32),
}

impl IntersectionHost for PageHost<'_> {
    fn viewport(&self) -> Option<Rect> {
        self.viewport.map(|v| v.scale(self.scale.0, self.scale.1))
    }

    fn element_bounds(&self, element: ElementId) -> Option<Rect> {
        let key = self.page.elements.get(element)?;
        self.page
            .geometry
            .bounds(*key)
            .map(|r| r.scale(self.scale.0, self.scale.1))
    }
}
