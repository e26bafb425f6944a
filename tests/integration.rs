//! Integration tests for symptom-tui.
//!
//! These tests drive the public API from outside the crate: a headless pilot
//! submits symptoms, settles the provider call, scrolls, and checks which
//! regions the visibility tracker has revealed.

use std::time::Duration;

use pretty_assertions::assert_eq;
use slotmap::SlotMap;

use symptom_tui::analysis::{Diagnosis, HttpProvider, MockProvider, SubmissionState};
use symptom_tui::error::ANALYSIS_FAILED_MESSAGE;
use symptom_tui::event::Key;
use symptom_tui::geometry::Rect;
use symptom_tui::testing::{rows_containing, Pilot, StaticProvider};
use symptom_tui::visibility::{
    ElementId, IntersectionEntry, IntersectionHost, RegionKey, VisibilityTracker,
};

fn migraine() -> Diagnosis {
    Diagnosis::new(["Migraine"], ["Rest"])
}

const RESULT_REGIONS: [RegionKey; 5] = [
    RegionKey::Header,
    RegionKey::Form,
    RegionKey::Diagnoses,
    RegionKey::Recommendations,
    RegionKey::Disclaimer,
];

// ---------------------------------------------------------------------------
// Submission scenarios
// ---------------------------------------------------------------------------

#[tokio::test]
async fn scenario_a_success_shows_results() {
    let mut pilot = Pilot::new(80, 60, StaticProvider::success(migraine()));
    pilot.type_text("I have a headache");
    pilot.press_key(Key::Enter);
    assert_eq!(pilot.state(), SubmissionState::Loading);
    assert!(pilot.screen_text().unwrap().contains("Analyzing symptoms..."));

    let outcome = pilot.settle().await;
    assert_eq!(outcome, Some(SubmissionState::Success(migraine())));
    assert_eq!(pilot.mounted(), RESULT_REGIONS.to_vec());

    let text = pilot.screen_text().unwrap();
    assert!(text.contains("Possible Diagnoses"));
    assert!(text.contains("1. Migraine"));
    assert!(text.contains("✓ Rest"));
    assert!(text.contains("Medical Disclaimer"));
    assert!(text.contains("Get AI Analysis"));
}

#[tokio::test]
async fn scenario_b_transport_failure_shows_the_message() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let provider = HttpProvider::new(
        &format!("http://127.0.0.1:{port}/api/diagnose"),
        Duration::from_secs(5),
    )
    .unwrap();
    let mut pilot = Pilot::new(80, 40, provider);
    pilot.type_text("I have a headache");

    let outcome = pilot.submit().await;
    assert_eq!(
        outcome,
        Some(SubmissionState::Failure(ANALYSIS_FAILED_MESSAGE.to_owned()))
    );
    assert_eq!(
        pilot.mounted(),
        vec![RegionKey::Header, RegionKey::Form, RegionKey::Error]
    );
    assert!(pilot.screen_text().unwrap().contains(ANALYSIS_FAILED_MESSAGE));
}

#[tokio::test]
async fn scenario_c_whitespace_stays_idle() {
    let mut pilot = Pilot::new(80, 24, StaticProvider::success(migraine()));
    pilot.type_text("   ");
    assert_eq!(pilot.submit().await, None);
    assert_eq!(pilot.state(), SubmissionState::Idle);
    assert_eq!(pilot.mounted(), vec![RegionKey::Header, RegionKey::Form]);
}

#[tokio::test]
async fn scenario_d_results_revealed_on_scroll() {
    let mut pilot = Pilot::new(80, 20, StaticProvider::success(migraine()));
    pilot.render().unwrap();
    let attaches = pilot.app().tracker().attach_count();

    pilot.type_text("I have a headache");
    pilot.submit().await;
    assert!(pilot.app().tracker().attach_count() > attaches);
    let diagnoses = pilot.app().tracker().element_for(RegionKey::Diagnoses).unwrap();
    assert!(pilot.app().tracker().is_observing(diagnoses));

    pilot.render().unwrap();
    assert!(pilot.is_visible(RegionKey::Form));
    assert!(!pilot.is_visible(RegionKey::Diagnoses));

    pilot.scroll_into_view(RegionKey::Diagnoses).unwrap();
    assert!(pilot.is_visible(RegionKey::Diagnoses));
}

#[tokio::test]
async fn scrolling_never_resubscribes() {
    let mut pilot = Pilot::new(80, 20, StaticProvider::success(migraine()));
    pilot.type_text("I have a headache");
    pilot.submit().await;
    pilot.render().unwrap();
    let attaches = pilot.app().tracker().attach_count();
    let observed = pilot.app().tracker().observed_count();
    assert_eq!(observed, RESULT_REGIONS.len());

    pilot.wheel(2);
    pilot.render().unwrap();
    pilot.press_key(Key::PageDown);
    pilot.render().unwrap();
    pilot.wheel(-1);
    pilot.scroll_into_view(RegionKey::Disclaimer).unwrap();
    pilot.scroll_by(-100);
    pilot.render().unwrap();

    assert_eq!(pilot.app().tracker().attach_count(), attaches);
    assert_eq!(pilot.app().tracker().observed_count(), observed);
    assert!(pilot.app().tracker().is_attached());
}

#[tokio::test]
async fn new_submission_remounts_results_hidden() {
    let mut pilot = Pilot::new(80, 20, StaticProvider::success(migraine()));
    pilot.type_text("headache");
    pilot.submit().await;
    pilot.scroll_into_view(RegionKey::Diagnoses).unwrap();
    assert!(pilot.is_visible(RegionKey::Diagnoses));
    let first = pilot.app().tracker().element_for(RegionKey::Diagnoses);

    pilot.press_key(Key::Enter);
    assert!(!pilot.mounted().contains(&RegionKey::Diagnoses));
    assert!(!pilot.is_visible(RegionKey::Diagnoses));
    pilot.settle().await;
    assert_ne!(pilot.app().tracker().element_for(RegionKey::Diagnoses), first);
}

#[tokio::test(start_paused = true)]
async fn mock_provider_answers_after_its_delay() {
    let mut pilot = Pilot::new(80, 40, MockProvider::new(Duration::from_millis(2000)));
    pilot.type_text("headache");
    pilot.press_key(Key::Enter);
    assert_eq!(pilot.state(), SubmissionState::Loading);

    let start = tokio::time::Instant::now();
    let outcome = pilot.settle().await;
    assert!(start.elapsed() >= Duration::from_millis(2000));
    assert_eq!(outcome, Some(SubmissionState::Success(MockProvider::content())));
}

#[tokio::test]
async fn escape_clears_the_result() {
    let mut pilot = Pilot::new(80, 24, StaticProvider::failure());
    pilot.type_text("headache");
    pilot.submit().await;
    assert!(pilot.mounted().contains(&RegionKey::Error));

    pilot.press_key(Key::Escape);
    assert_eq!(pilot.state(), SubmissionState::Idle);
    assert_eq!(pilot.app().textarea().value(), "headache");
    assert_eq!(pilot.mounted(), vec![RegionKey::Header, RegionKey::Form]);
}

// ---------------------------------------------------------------------------
// Tracker properties
// ---------------------------------------------------------------------------

fn element_ids<const N: usize>() -> [ElementId; N] {
    let mut arena: SlotMap<ElementId, ()> = SlotMap::with_key();
    std::array::from_fn(|_| arena.insert(()))
}

#[test]
fn detach_twice_leaves_nothing_observed() {
    let [header] = element_ids::<1>();
    let mut tracker = VisibilityTracker::default();
    tracker.register(RegionKey::Header, header);
    tracker.attach([(RegionKey::Header, header)]);
    assert!(tracker.is_attached());

    tracker.detach();
    tracker.detach();
    assert!(!tracker.is_attached());
    assert_eq!(tracker.observed_count(), 0);
}

#[test]
fn intersection_round_trip_flips_the_flag() {
    let [form] = element_ids::<1>();
    let mut tracker = VisibilityTracker::default();
    tracker.register(RegionKey::Form, form);
    tracker.attach_mounted();
    assert!(!tracker.is_visible(RegionKey::Form));

    assert_eq!(
        tracker.report(IntersectionEntry::flag(form, true)),
        Some(RegionKey::Form)
    );
    assert!(tracker.is_visible(RegionKey::Form));
    assert_eq!(
        tracker.report(IntersectionEntry::flag(form, false)),
        Some(RegionKey::Form)
    );
    assert!(!tracker.is_visible(RegionKey::Form));
}

struct Headless;

impl IntersectionHost for Headless {
    fn viewport(&self) -> Option<Rect> {
        None
    }

    fn element_bounds(&self, _element: ElementId) -> Option<Rect> {
        Some(Rect::new(0, 0, 100, 100))
    }
}

#[test]
fn no_viewport_reports_nothing() {
    let [header, form] = element_ids::<2>();
    let mut tracker = VisibilityTracker::default();
    tracker.register(RegionKey::Header, header);
    tracker.register(RegionKey::Form, form);
    tracker.attach_mounted();

    assert!(tracker.evaluate(&Headless).is_empty());
    assert!(!tracker.is_visible(RegionKey::Header));
    assert!(!tracker.is_visible(RegionKey::Form));
}

#[test]
fn zero_sized_terminal_reveals_nothing() {
    let mut pilot = Pilot::new(0, 0, StaticProvider::failure());
    pilot.render().unwrap();
    assert!(pilot.app().visibility().visible_keys().is_empty());
}

// ---------------------------------------------------------------------------
// Layout and rendering
// ---------------------------------------------------------------------------

#[test]
fn header_sits_above_the_form() {
    let mut pilot = Pilot::new(80, 24, StaticProvider::failure());
    let text = pilot.screen_text().unwrap();
    let title = rows_containing(&text, "AI Symptom Checker");
    let label = rows_containing(&text, "Describe your symptoms in detail");
    assert_eq!(title, vec![1]);
    assert!(label[0] > title[0]);
}

#[test]
fn placeholder_shows_until_typing() {
    let mut pilot = Pilot::new(80, 24, StaticProvider::failure());
    assert!(pilot.screen_text().unwrap().contains("Example: I have been"));
    pilot.type_text("sore throat");
    let text = pilot.screen_text().unwrap();
    assert!(!text.contains("Example: I have been"));
    assert!(text.contains("sore throat"));
}

#[test]
fn resize_relayouts_the_page() {
    let mut pilot = Pilot::new(80, 24, StaticProvider::failure());
    pilot.render().unwrap();
    let wide = pilot.app().region_bounds(RegionKey::Form).unwrap();
    pilot.resize(40, 24);
    pilot.render().unwrap();
    let narrow = pilot.app().region_bounds(RegionKey::Form).unwrap();
    assert_eq!(wide.width, 76);
    assert_eq!(narrow.width, 36);
}
