//! Report layout
//!
//! Produces the ordered text placements for a health report. All positions
//! are PDF points with the origin at the bottom-left of an A4 page. The
//! vertical [`Cursor`] is threaded through each block by value.

use chrono::NaiveDate;

use super::metrics::{text_width, FontFace};
use crate::advice::{AdviceResult, HealthMetrics};

pub const PAGE_WIDTH: f32 = 595.2756;
pub const PAGE_HEIGHT: f32 = 841.8898;
pub const CM: f32 = 28.346457;

pub const LEFT: f32 = 2.0 * CM;
pub const RIGHT: f32 = PAGE_WIDTH - 2.0 * CM;
pub const TOP: f32 = PAGE_HEIGHT - 2.0 * CM;

/// Lowest baseline for flowing content; the footer lives below it
pub const BOTTOM_LIMIT: f32 = 2.5 * CM;

const LINE_HEIGHT: f32 = 14.0;
const BODY_INDENT: f32 = 12.0;
const SECTION_GAP: f32 = 10.0;
const BODY_SIZE: f32 = 10.0;

/// Widest a wrapped body line may measure
pub const MAX_LINE_WIDTH: f32 = RIGHT - (LEFT + BODY_INDENT);

const DETAIL_VALUE_X: f32 = LEFT + 5.0 * CM;
const VITAL_VALUE_X: f32 = LEFT + 7.0 * CM;

pub const BULLET: char = '•';

pub const TITLE: &str = "MEDICAL HEALTH REPORT";
pub const SUBTITLE: &str = "(Auto-Generated Digital Health Report)";
pub const DISCLAIMER: &str =
    "This report is AI-generated and not a substitute for professional medical advice.";
pub const GENERATED_BY: &str = "Generated by Personalized Health System";

pub const COLOR_BLACK: (u8, u8, u8) = (0, 0, 0);
pub const COLOR_GRAY: (u8, u8, u8) = (128, 128, 128);

/// Identity block at the top of the report
#[derive(Debug, Clone, PartialEq)]
pub struct PatientProfile {
    pub name: String,
    pub email: String,
    pub patient_id: String,
    pub generated_on: NaiveDate,
}

/// One stored submission of the ten metrics
#[derive(Debug, Clone, PartialEq)]
pub struct VitalsSnapshot {
    pub metrics: HealthMetrics,
    pub recorded_at: String,
}

/// Vertical position on a given page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cursor {
    pub page: usize,
    pub y: f32,
}

impl Cursor {
    pub fn top() -> Self {
        Self { page: 0, y: TOP }
    }

    pub fn down(self, dy: f32) -> Self {
        Self { y: self.y - dy, ..self }
    }

    /// Move to the next page when the baseline would enter the footer zone
    pub fn fit(self) -> Self {
        if self.y < BOTTOM_LIMIT {
            Self { page: self.page + 1, y: TOP }
        } else {
            self
        }
    }
}

/// A single piece of text to draw
#[derive(Debug, Clone, PartialEq)]
pub struct TextOp {
    pub page: usize,
    pub x: f32,
    pub y: f32,
    pub face: FontFace,
    pub size: f32,
    pub color: (u8, u8, u8),
    pub text: String,
}

/// Complete set of draw operations for a report
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportLayout {
    pub page_count: usize,
    pub ops: Vec<TextOp>,
}

impl ReportLayout {
    fn put(&mut self, cursor: Cursor, x: f32, face: FontFace, size: f32, text: impl Into<String>) {
        self.put_colored(cursor.page, x, cursor.y, face, size, COLOR_BLACK, text);
    }

    #[allow(clippy::too_many_arguments)]
    fn put_colored(
        &mut self,
        page: usize,
        x: f32,
        y: f32,
        face: FontFace,
        size: f32,
        color: (u8, u8, u8),
        text: impl Into<String>,
    ) {
        self.page_count = self.page_count.max(page + 1);
        self.ops.push(TextOp {
            page,
            x,
            y,
            face,
            size,
            color,
            text: text.into(),
        });
    }

    fn put_centered(&mut self, page: usize, y: f32, face: FontFace, size: f32, color: (u8, u8, u8), text: &str) {
        let x = (PAGE_WIDTH - text_width(text, face, size)) / 2.0;
        self.put_colored(page, x, y, face, size, color, text);
    }

    /// Ops on one page, in draw order
    pub fn page_ops(&self, page: usize) -> impl Iterator<Item = &TextOp> {
        self.ops.iter().filter(move |op| op.page == page)
    }
}

/// Lay out the whole report
pub fn layout_report(profile: &PatientProfile, vitals: &VitalsSnapshot, advice: &AdviceResult) -> ReportLayout {
    let mut layout = ReportLayout::default();

    let cursor = header(&mut layout, Cursor::top());
    let cursor = patient_details(&mut layout, cursor, profile, &vitals.metrics);
    let cursor = vital_signs(&mut layout, cursor, &vitals.metrics);
    insights(&mut layout, cursor, advice);

    for page in 0..layout.page_count {
        footer(&mut layout, page);
    }

    layout
}

fn header(layout: &mut ReportLayout, cursor: Cursor) -> Cursor {
    layout.put_centered(cursor.page, cursor.y, FontFace::Bold, 18.0, COLOR_BLACK, TITLE);
    let cursor = cursor.down(18.0);

    layout.put_centered(cursor.page, cursor.y, FontFace::Regular, 10.0, COLOR_BLACK, SUBTITLE);
    cursor.down(30.0)
}

fn patient_details(
    layout: &mut ReportLayout,
    cursor: Cursor,
    profile: &PatientProfile,
    metrics: &HealthMetrics,
) -> Cursor {
    layout.put(cursor, LEFT, FontFace::Bold, 12.0, "PATIENT DETAILS");
    let mut cursor = cursor.down(14.0);

    let rows = [
        ("Name", profile.name.clone()),
        ("Email", profile.email.clone()),
        ("Patient ID", profile.patient_id.clone()),
        ("Age", format_number(metrics.age)),
        ("Gender", metrics.gender.clone()),
        ("Generated On", profile.generated_on.format("%d %b %Y").to_string()),
    ];

    for (label, value) in rows {
        cursor = cursor.fit();
        layout.put(cursor, LEFT, FontFace::Regular, BODY_SIZE, format!("{}:", label));
        layout.put(cursor, DETAIL_VALUE_X, FontFace::Regular, BODY_SIZE, value);
        cursor = cursor.down(LINE_HEIGHT);
    }

    cursor
}

fn vital_signs(layout: &mut ReportLayout, cursor: Cursor, m: &HealthMetrics) -> Cursor {
    let cursor = cursor.down(10.0).fit();
    layout.put(cursor, LEFT, FontFace::Bold, 12.0, "VITAL SIGNS & HEALTH METRICS");
    let mut cursor = cursor.down(16.0);

    let rows = [
        ("Height", format!("{} in", format_number(m.height))),
        ("Weight", format!("{} kg", format_number(m.weight))),
        (
            "Blood Pressure",
            format!(
                "{}/{} mmHg",
                format_number(m.blood_pressure_sys),
                format_number(m.blood_pressure_dia)
            ),
        ),
        ("Heart Rate", format!("{} bpm", format_number(m.heart_rate))),
        ("Sleep", format!("{} hrs/day", format_number(m.sleep_hours))),
        ("Water Intake", format!("{} L/day", format_number(m.water_intake))),
        ("Workout", format!("{} mins/day", format_number(m.workout_minutes))),
    ];

    for (label, value) in rows {
        cursor = cursor.fit();
        layout.put(cursor, LEFT, FontFace::Regular, BODY_SIZE, label);
        layout.put(cursor, VITAL_VALUE_X, FontFace::Regular, BODY_SIZE, value);
        cursor = cursor.down(LINE_HEIGHT);
    }

    cursor
}

fn insights(layout: &mut ReportLayout, cursor: Cursor, advice: &AdviceResult) -> Cursor {
    let cursor = cursor.down(16.0).fit();
    layout.put(cursor, LEFT, FontFace::Bold, 12.0, "AI HEALTH INSIGHTS");
    let mut cursor = cursor.down(18.0);

    let sections = [
        ("Summary:", &advice.summary),
        ("Risk Level:", &advice.risk_level),
        ("Diet Recommendations:", &advice.diet),
        ("Fitness Guidance:", &advice.fitness),
        ("Health Goals:", &advice.goals),
    ];

    for (title, content) in sections {
        cursor = section(layout, cursor, title, content);
    }

    cursor
}

fn section(layout: &mut ReportLayout, cursor: Cursor, title: &str, content: &str) -> Cursor {
    let cursor = cursor.fit();
    layout.put(cursor, LEFT, FontFace::Bold, 11.0, title);
    let mut cursor = cursor.down(LINE_HEIGHT);

    for line in section_lines(content) {
        cursor = cursor.fit();
        layout.put(cursor, LEFT + BODY_INDENT, FontFace::Regular, BODY_SIZE, line);
        cursor = cursor.down(LINE_HEIGHT);
    }

    cursor.down(SECTION_GAP)
}

fn footer(layout: &mut ReportLayout, page: usize) {
    layout.put_centered(page, 1.5 * CM, FontFace::Oblique, 8.0, COLOR_GRAY, DISCLAIMER);
    layout.put_centered(page, 1.0 * CM, FontFace::Oblique, 8.0, COLOR_GRAY, GENERATED_BY);
}

/// Split free advice text into the lines the report prints.
///
/// Emphasis markers are dropped, every `•` starts its own line, bullet lines
/// are kept whole and everything else is word-wrapped to [`MAX_LINE_WIDTH`].
pub fn section_lines(content: &str) -> Vec<String> {
    let content = if content.is_empty() { "N/A" } else { content };

    let cleaned = content
        .replace("**", "")
        .replace('*', "")
        .replace(BULLET, &format!("\n{}", BULLET));

    let mut lines = Vec::new();
    for line in cleaned.split('\n').map(str::trim).filter(|l| !l.is_empty()) {
        if line.starts_with(BULLET) {
            lines.push(line.to_string());
        } else {
            lines.extend(wrap_words(line, MAX_LINE_WIDTH));
        }
    }
    lines
}

/// Greedy word wrap measured in Helvetica 10.
///
/// A word that alone exceeds `max_width` still gets its own line.
pub fn wrap_words(line: &str, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut buffer = String::new();

    for word in line.split_whitespace() {
        let candidate = format!("{}{} ", buffer, word);
        if buffer.is_empty() || text_width(&candidate, FontFace::Regular, BODY_SIZE) <= max_width {
            buffer = candidate;
        } else {
            lines.push(buffer.trim_end().to_string());
            buffer = format!("{} ", word);
        }
    }

    if !buffer.is_empty() {
        lines.push(buffer.trim_end().to_string());
    }
    lines
}

/// Whole numbers print without a trailing `.0`
fn format_number(value: f64) -> String {
    format!("{}", value)
}
