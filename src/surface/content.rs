//! What each region draws.
//!
//! Regions render at the origin, `width` columns wide; the page translates the
//! strips to the region's laid-out position. A region's height is the number of
//! rows it renders.

use crate::analysis::SubmissionState;
use crate::render::strip::{CellStyle, Strip, Tone};
use crate::visibility::RegionKey;

use super::text::{center, display_width, wrap};
use super::textarea::TextArea;

pub const TITLE: &str = "AI Symptom Checker";
pub const SUBTITLE: &str = "Advanced medical insights powered by artificial intelligence";
pub const FORM_LABEL: &str = "Describe your symptoms in detail";
pub const SUBMIT_LABEL: &str = "Get AI Analysis";
pub const LOADING_LABEL: &str = "Analyzing symptoms...";
pub const KEY_HINTS: &str =
    "Enter submit · Alt+Enter newline · Esc clear · ↑↓ PgUp PgDn scroll · Ctrl+C quit";
pub const DIAGNOSES_TITLE: &str = "Possible Diagnoses";
pub const DIAGNOSES_SUBTITLE: &str = "AI-analyzed potential conditions";
pub const NO_DIAGNOSES: &str = "No specific diagnoses available";
pub const RECOMMENDATIONS_TITLE: &str = "Recommendations";
pub const RECOMMENDATIONS_SUBTITLE: &str = "Suggested next steps";
pub const NO_RECOMMENDATIONS: &str = "No recommendations available";
pub const DISCLAIMER_TITLE: &str = "Medical Disclaimer";
pub const DISCLAIMER_BODY: &str = "This AI analysis is for informational purposes only. Always consult with qualified healthcare professionals for proper medical diagnosis and treatment.";

const SPINNER: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Everything a region reads while rendering.
#[derive(Debug, Clone, Copy)]
pub struct RegionContext<'a> {
    pub state: &'a SubmissionState,
    pub textarea: &'a TextArea,
    pub can_submit: bool,
    /// Frame counter, drives the spinner.
    pub tick: u64,
}

/// Render `key` at the origin.
pub fn render_region(key: RegionKey, ctx: &RegionContext<'_>, width: u16) -> Vec<Strip> {
    let width = width as i32;
    match key {
        RegionKey::Header => header(width),
        RegionKey::Form => form(ctx, width),
        RegionKey::Error => error(ctx.state.error().unwrap_or_default(), width),
        RegionKey::Diagnoses => {
            let items = ctx.state.result().map(|r| r.diagnoses.as_slice()).unwrap_or_default();
            result_card(
                width,
                DIAGNOSES_TITLE,
                DIAGNOSES_SUBTITLE,
                items,
                NO_DIAGNOSES,
                Tone::Accent,
                |i| format!("{}. ", i + 1),
            )
        }
        RegionKey::Recommendations => {
            let items = ctx
                .state
                .result()
                .map(|r| r.recommendations.as_slice())
                .unwrap_or_default();
            result_card(
                width,
                RECOMMENDATIONS_TITLE,
                RECOMMENDATIONS_SUBTITLE,
                items,
                NO_RECOMMENDATIONS,
                Tone::Success,
                |_| "✓ ".to_owned(),
            )
        }
        RegionKey::Disclaimer => disclaimer(width),
    }
}

/// Rows a set of region strips occupies.
pub fn height_of(strips: &[Strip]) -> u16 {
    strips
        .iter()
        .map(|s| s.y + 1)
        .max()
        .unwrap_or(0)
        .clamp(0, u16::MAX as i32) as u16
}

// ---------------------------------------------------------------------------
// Regions
// ---------------------------------------------------------------------------

fn header(width: i32) -> Vec<Strip> {
    let w = width.max(0) as usize;
    let title = format!("✚  {TITLE}  ✚");
    vec![
        Strip::text(0, 0, &center(&title, w), CellStyle::fg(Tone::Accent).bold()),
        Strip::text(1, 0, &center(SUBTITLE, w), CellStyle::fg(Tone::Muted).italic()),
        Strip::text(2, 0, &center(&"─".repeat(w.min(24)), w), CellStyle::fg(Tone::AccentAlt)),
    ]
}

fn form(ctx: &RegionContext<'_>, width: i32) -> Vec<Strip> {
    let inner = inner_width(width);
    let mut body = ctx.textarea.render(0, 0, inner, !ctx.state.is_loading(), false);
    body.push(Strip::new(0, 0));

    let button = if ctx.state.is_loading() {
        let spin = SPINNER[(ctx.tick % SPINNER.len() as u64) as usize];
        Strip::text(
            0,
            0,
            &center(&format!("{spin} {LOADING_LABEL}"), inner as usize),
            CellStyle::fg(Tone::Accent).bold(),
        )
    } else {
        let label = format!("  {SUBMIT_LABEL}  →  ");
        let pad = (inner as usize).saturating_sub(display_width(&label)) / 2;
        let style = if ctx.can_submit {
            CellStyle::fg(Tone::Accent).bold().reverse()
        } else {
            CellStyle::fg(Tone::Muted).dimmed()
        };
        let mut strip = Strip::text(0, 0, &" ".repeat(pad), CellStyle::PLAIN);
        strip.push_str(&label, style);
        strip
    };
    body.push(button);
    body.push(Strip::text(
        0,
        0,
        &center(KEY_HINTS, inner as usize),
        CellStyle::fg(Tone::Muted).dimmed(),
    ));
    card(width, Tone::Accent, Some(FORM_LABEL), body)
}

fn error(message: &str, width: i32) -> Vec<Strip> {
    let inner = inner_width(width);
    let body = wrap(&format!("⚠ {message}"), inner as usize)
        .iter()
        .map(|line| Strip::text(0, 0, line, CellStyle::fg(Tone::Danger).bold()))
        .collect();
    card(width, Tone::Danger, None, body)
}

fn result_card(
    width: i32,
    title: &str,
    subtitle: &str,
    items: &[String],
    empty: &str,
    tone: Tone,
    marker: impl Fn(usize) -> String,
) -> Vec<Strip> {
    let inner = inner_width(width) as usize;
    let mut body = vec![
        Strip::text(0, 0, subtitle, CellStyle::fg(Tone::Muted).italic()),
        Strip::new(0, 0),
    ];
    if items.is_empty() {
        body.push(Strip::text(0, 0, empty, CellStyle::fg(Tone::Muted).italic()));
    }
    for (i, item) in items.iter().enumerate() {
        let mark = marker(i);
        let indent = display_width(&mark);
        let lines = wrap(item, inner.saturating_sub(indent).max(1));
        for (j, line) in lines.iter().enumerate() {
            let mut strip = if j == 0 {
                Strip::text(0, 0, &mark, CellStyle::fg(tone).bold())
            } else {
                Strip::text(0, 0, &" ".repeat(indent), CellStyle::PLAIN)
            };
            strip.push_str(line, CellStyle::fg(Tone::Text));
            body.push(strip);
        }
    }
    card(width, tone, Some(title), body)
}

fn disclaimer(width: i32) -> Vec<Strip> {
    let inner = inner_width(width);
    let body = wrap(DISCLAIMER_BODY, inner as usize)
        .iter()
        .map(|line| Strip::text(0, 0, line, CellStyle::fg(Tone::Warning)))
        .collect();
    card(width, Tone::Warning, Some(DISCLAIMER_TITLE), body)
}

// ---------------------------------------------------------------------------
// Card frame
// ---------------------------------------------------------------------------

fn inner_width(width: i32) -> i32 {
    (width - 4).max(0)
}

/// Box `body` in a rounded border, with an optional title in the top edge.
fn card(width: i32, tone: Tone, title: Option<&str>, body: Vec<Strip>) -> Vec<Strip> {
    if width < 2 {
        return Vec::new();
    }
    let border = CellStyle::fg(tone);
    let inner = inner_width(width);

    let mut top = Strip::new(0, 0);
    top.push('╭', border);
    if let Some(title) = title {
        top.push_str("─ ", border);
        top.push_str(title, CellStyle::fg(tone).bold());
        top.push(' ', border);
    }
    let mut top = top.crop(0, width - 1);
    while top.width() < width - 1 {
        top.push('─', border);
    }
    top.push('╮', border);

    let mut out = vec![top];
    for (i, mut line) in body.into_iter().enumerate() {
        let mut row = Strip::new(i as i32 + 1, 0);
        row.push('│', border);
        row.push(' ', CellStyle::PLAIN);
        line.x_offset = 0;
        line.fill(inner, CellStyle::PLAIN);
        row.cells.extend(line.cells);
        let mut row = row.crop(0, width - 1);
        while row.width() < width - 1 {
            row.push(' ', CellStyle::PLAIN);
        }
        row.push('│', border);
        out.push(row);
    }

    let y = out.len() as i32;
    let mut bottom = Strip::new(y, 0);
    bottom.push('╰', border);
    for _ in 0..width - 2 {
        bottom.push('─', border);
    }
    bottom.push('╯', border);
    out.push(bottom);
    out
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Diagnosis;
    use crate::error::ANALYSIS_FAILED_MESSAGE;

    fn text(strips: &[Strip]) -> String {
        strips.iter().map(|s| s.to_text()).collect::<Vec<_>>().join("\n")
    }

    fn ctx<'a>(state: &'a SubmissionState, area: &'a TextArea) -> RegionContext<'a> {
        RegionContext {
            state,
            textarea: area,
            can_submit: false,
            tick: 0,
        }
    }

    #[test]
    fn header_shows_title_and_subtitle() {
        let state = SubmissionState::Idle;
        let area = TextArea::new();
        let out = text(&render_region(RegionKey::Header, &ctx(&state, &area), 80));
        assert!(out.contains(TITLE));
        assert!(out.contains(SUBTITLE));
    }

    #[test]
    fn card_rows_have_full_width() {
        let strips = card(20, Tone::Accent, Some("Title"), vec![Strip::text(0, 0, "body", CellStyle::PLAIN)]);
        assert_eq!(strips.len(), 3);
        assert!(strips.iter().all(|s| s.width() == 20));
        assert_eq!(strips[1].to_text(), "│ body             │");
        assert!(strips[0].to_text().starts_with("╭─ Title ─"));
    }

    #[test]
    fn card_truncates_long_content() {
        let strips = card(8, Tone::Accent, Some("A very long title"), vec![Strip::text(0, 0, "abcdefghijk", CellStyle::PLAIN)]);
        assert!(strips.iter().all(|s| s.width() == 8));
    }

    #[test]
    fn wide_items_keep_the_border_aligned() {
        let area = TextArea::new();
        let item = "偏頭痛 migraine ".repeat(4);
        let state = SubmissionState::Success(Diagnosis::new([item], ["休息"]));
        for key in [RegionKey::Diagnoses, RegionKey::Recommendations] {
            let strips = render_region(key, &ctx(&state, &area), 30);
            assert!(strips.iter().all(|s| s.width() == 30), "{key}");
            assert!(strips.iter().all(|s| s.cells[29].ch != ' '), "{key}");
        }
    }

    #[test]
    fn form_button_label_follows_state() {
        let area = TextArea::new();
        let idle = SubmissionState::Idle;
        let out = text(&render_region(RegionKey::Form, &ctx(&idle, &area), 80));
        assert!(out.contains(SUBMIT_LABEL));
        assert!(out.contains(FORM_LABEL));

        let loading = SubmissionState::Loading;
        let out = text(&render_region(RegionKey::Form, &ctx(&loading, &area), 80));
        assert!(out.contains(LOADING_LABEL));
        assert!(!out.contains(SUBMIT_LABEL));
    }

    #[test]
    fn form_height_is_stable() {
        let area = TextArea::new();
        let state = SubmissionState::Idle;
        let strips = render_region(RegionKey::Form, &ctx(&state, &area), 60);
        assert_eq!(height_of(&strips), 11);
    }

    #[test]
    fn error_card_shows_message() {
        let area = TextArea::new();
        let state = SubmissionState::Failure(ANALYSIS_FAILED_MESSAGE.into());
        let out = text(&render_region(RegionKey::Error, &ctx(&state, &area), 80));
        assert!(out.contains(ANALYSIS_FAILED_MESSAGE));
    }

    #[test]
    fn result_cards_list_items() {
        let area = TextArea::new();
        let state = SubmissionState::Success(Diagnosis::new(["Migraine"], ["Rest"]));
        let diagnoses = text(&render_region(RegionKey::Diagnoses, &ctx(&state, &area), 60));
        assert!(diagnoses.contains("1. Migraine"));
        let recs = text(&render_region(RegionKey::Recommendations, &ctx(&state, &area), 60));
        assert!(recs.contains("✓ Rest"));
    }

    #[test]
    fn empty_results_show_placeholders() {
        let area = TextArea::new();
        let state = SubmissionState::Success(Diagnosis::default());
        let diagnoses = text(&render_region(RegionKey::Diagnoses, &ctx(&state, &area), 60));
        assert!(diagnoses.contains(NO_DIAGNOSES));
        let recs = text(&render_region(RegionKey::Recommendations, &ctx(&state, &area), 60));
        assert!(recs.contains(NO_RECOMMENDATIONS));
    }

    #[test]
    fn long_items_use_hanging_indent() {
        let area = TextArea::new();
        let state = SubmissionState::Success(Diagnosis::new(
            ["Tension headache caused by stress and poor posture"],
            Vec::<String>::new(),
        ));
        let strips = render_region(RegionKey::Diagnoses, &ctx(&state, &area), 30);
        let rows: Vec<String> = strips.iter().map(|s| s.to_text()).collect();
        assert!(rows.iter().any(|r| r.starts_with("│ 1. Tension")));
        assert!(rows.iter().any(|r| r.starts_with("│    ")));
    }

    #[test]
    fn disclaimer_wraps_body() {
        let area = TextArea::new();
        let state = SubmissionState::Idle;
        let strips = render_region(RegionKey::Disclaimer, &ctx(&state, &area), 40);
        assert!(height_of(&strips) > 3);
        assert!(text(&strips).contains(DISCLAIMER_TITLE));
    }
}
