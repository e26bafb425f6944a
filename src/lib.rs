//! # symptom-tui
//!
//! A terminal symptom checker. The user describes symptoms, a result provider
//! (a live HTTP endpoint or a fixed-delay mock) answers with possible
//! diagnoses and recommendations, and each page region is revealed as it
//! scrolls into view.
//!
//! ## Core Systems
//!
//! - **[`visibility`]**: intersection observer, visibility tracker, scroll
//!   listeners, scoped subscriptions
//! - **[`analysis`]**: result providers and the submission state machine
//! - **[`reactive`]**: signals, effects with cleanup, memos (Leptos-style
//!   auto-tracking)
//! - **[`surface`]**: page regions, taffy layout, text area, backdrop
//! - **[`render`]**: strips, frame diffing, crossterm driver
//! - **[`event`]**: input events and key bindings
//! - **[`app`]**: application struct tying everything together
//! - **[`testing`]**: headless pilot and snapshot helpers

// Foundation
pub mod error;
pub mod geometry;

// Core systems
pub mod analysis;
pub mod reactive;
pub mod visibility;

// Presentation
pub mod event;
pub mod render;
pub mod surface;

// Application
pub mod app;
pub mod config;
pub mod logging;

// Headless harness
pub mod testing;
