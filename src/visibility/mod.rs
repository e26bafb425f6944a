//! Scroll-driven region visibility.
//!
//! - [`region`]: region keys and element handles
//! - [`map`]: the per-key visibility flags
//! - [`observer`]: intersection measurement against the viewport
//! - [`tracker`]: registration, attach/detach, and report folding
//! - [`scroll`]: page scroll state and scroll listeners
//! - [`subscription`]: RAII bundle of an attachment and a scroll listener

pub mod map;
pub mod observer;
pub mod region;
pub mod scroll;
pub mod subscription;
pub mod tracker;

pub use map::VisibilityMap;
pub use observer::{
    intersection_ratio, IntersectionEntry, IntersectionHost, IntersectionObserver,
    ObserverOptions,
};
pub use region::{ElementId, RegionKey, UnknownRegion};
pub use scroll::{ScrollEvents, ScrollListener, ScrollOffset, ScrollState, ScrollView, ScrollbarState};
pub use subscription::Subscription;
pub use tracker::VisibilityTracker;
