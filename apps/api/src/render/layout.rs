//! Résumé page layout — turns a `NormalizedResume` into a display list.
//!
//! # Architecture
//! - `LayoutCursor` is a plain value: page index plus the vertical position of
//!   the next line box (PDF coordinates, origin bottom-left, decreasing downward).
//!   Every drawing routine takes a cursor and returns the advanced one.
//! - `Canvas` only collects draw operations per page; it holds no position.
//! - Sections are drawn in `SECTION_ORDER`. A section with no content is skipped
//!   entirely: no header, no gap.
//!
//! Nothing here knows about PDF encoding; see `pdf.rs`.

use crate::models::{EducationEntry, ExperienceEntry, NormalizedResume, ProjectEntry};
use crate::render::font_metrics::Weight;
use crate::render::fonts::FontSet;
use crate::render::wrap::wrap_text;

// ────────────────────────────────────────────────────────────────────────────
// Geometry and typography
// ────────────────────────────────────────────────────────────────────────────

/// Fixed page geometry in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
}

/// US Letter with 0.75" margins.
pub const LETTER: PageGeometry = PageGeometry {
    width: 612.0,
    height: 792.0,
    margin: 54.0,
};

impl PageGeometry {
    pub fn left(&self) -> f32 {
        self.margin
    }

    pub fn right(&self) -> f32 {
        self.width - self.margin
    }

    pub fn top(&self) -> f32 {
        self.height - self.margin
    }

    pub fn bottom(&self) -> f32 {
        self.margin
    }

    pub fn content_width(&self) -> f32 {
        self.right() - self.left()
    }
}

pub const NAME_SIZE: f32 = 20.0;
pub const CONTACT_SIZE: f32 = 9.5;
pub const HEADER_SIZE: f32 = 11.0;
pub const BODY_SIZE: f32 = 10.0;
/// Line box height as a multiple of font size.
const LINE_SPACING: f32 = 1.3;
/// Gap above every drawn section header.
pub const SECTION_GAP: f32 = 10.0;
const RULE_OFFSET: f32 = 3.0;
const RULE_THICKNESS: f32 = 0.75;
const HEADER_AFTER_GAP: f32 = 4.0;
const ENTRY_GAP: f32 = 4.0;
const COLUMN_GAP: f32 = 12.0;
/// Below this share of the content width the primary column is too cramped;
/// the secondary text then moves to its own line.
const MIN_PRIMARY_FRACTION: f32 = 0.35;
pub const BULLET_GLYPH: &str = "\u{2022}";
pub const BULLET_INDENT: f32 = 8.0;
pub const BULLET_TEXT_INDENT: f32 = 20.0;
const CONTACT_SEPARATOR: &str = "  |  ";

// ────────────────────────────────────────────────────────────────────────────
// Display list
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// Text placed with its baseline at `y`.
    Text {
        x: f32,
        y: f32,
        size: f32,
        weight: Weight,
        text: String,
    },
    /// Horizontal rule.
    Rule {
        x1: f32,
        x2: f32,
        y: f32,
        thickness: f32,
    },
}

/// Laid-out pages, ready for encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayList {
    pub geometry: PageGeometry,
    pub pages: Vec<Vec<DrawOp>>,
}

impl DisplayList {
    /// All text runs in drawing order, across pages.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().flatten().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            DrawOp::Rule { .. } => None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutCursor {
    pub page: usize,
    pub y: f32,
}

impl LayoutCursor {
    pub fn top(geometry: &PageGeometry) -> Self {
        Self {
            page: 0,
            y: geometry.top(),
        }
    }

    pub fn advance(self, dy: f32) -> Self {
        Self {
            y: self.y - dy,
            ..self
        }
    }
}

/// Baseline position handed out for one line of text.
#[derive(Debug, Clone, Copy)]
struct Line {
    page: usize,
    baseline: f32,
}

// ────────────────────────────────────────────────────────────────────────────
// Sections
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Summary,
    Education,
    Skills,
    Experience,
    Projects,
    Certifications,
}

/// Order in which sections follow the name/contact header.
pub const SECTION_ORDER: [Section; 6] = [
    Section::Summary,
    Section::Education,
    Section::Skills,
    Section::Experience,
    Section::Projects,
    Section::Certifications,
];

impl Section {
    pub fn title(self) -> &'static str {
        match self {
            Section::Summary => "Summary",
            Section::Education => "Education",
            Section::Skills => "Skills",
            Section::Experience => "Experience",
            Section::Projects => "Projects",
            Section::Certifications => "Certifications",
        }
    }

    pub fn has_content(self, record: &NormalizedResume) -> bool {
        match self {
            Section::Summary => !is_blank(&record.summary),
            Section::Education => record.education.iter().any(|e| !education_is_blank(e)),
            Section::Skills => !is_blank(&record.skills),
            Section::Experience => record.experience.iter().any(|e| !experience_is_blank(e)),
            Section::Projects => record.projects.iter().any(|p| !project_is_blank(p)),
            Section::Certifications => record.certifications.iter().any(|c| !is_blank(c)),
        }
    }
}

/// Sections that will be drawn for this record, in page order.
pub fn sections_to_render(record: &NormalizedResume) -> Vec<Section> {
    SECTION_ORDER
        .into_iter()
        .filter(|s| s.has_content(record))
        .collect()
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

fn experience_is_blank(e: &ExperienceEntry) -> bool {
    [&e.job_title, &e.company, &e.location, &e.start_date, &e.end_date]
        .iter()
        .all(|s| is_blank(s))
        && e.responsibilities.iter().all(|r| is_blank(r))
}

fn education_is_blank(e: &EducationEntry) -> bool {
    [&e.degree, &e.institution, &e.graduation_date, &e.cgpa]
        .iter()
        .all(|s| is_blank(s))
}

fn project_is_blank(p: &ProjectEntry) -> bool {
    is_blank(&p.name) && p.responsibilities.iter().all(|r| is_blank(r))
}

// ────────────────────────────────────────────────────────────────────────────
// Canvas and layout primitives
// ────────────────────────────────────────────────────────────────────────────

struct Canvas<'a> {
    fonts: &'a FontSet,
    geometry: PageGeometry,
    pages: Vec<Vec<DrawOp>>,
}

impl<'a> Canvas<'a> {
    fn new(fonts: &'a FontSet, geometry: PageGeometry) -> Self {
        Self {
            fonts,
            geometry,
            pages: vec![Vec::new()],
        }
    }

    fn width(&self, text: &str, weight: Weight, size: f32) -> f32 {
        self.fonts.metrics(weight).width_pt(text, size)
    }

    fn wrap(&self, text: &str, weight: Weight, size: f32, max_width: f32) -> Vec<String> {
        wrap_text(text, self.fonts.metrics(weight), size, max_width)
    }

    /// Moves to a fresh page when `height` no longer fits above the bottom margin.
    fn ensure_space(&mut self, cursor: LayoutCursor, height: f32) -> LayoutCursor {
        let at_page_top = (cursor.y - self.geometry.top()).abs() < f32::EPSILON;
        if cursor.y - height >= self.geometry.bottom() || at_page_top {
            return cursor;
        }
        self.pages.push(Vec::new());
        LayoutCursor {
            page: self.pages.len() - 1,
            y: self.geometry.top(),
        }
    }

    /// Reserves one line box of text at `size` and returns its baseline.
    fn take_line(&mut self, cursor: LayoutCursor, size: f32) -> (LayoutCursor, Line) {
        let height = size * LINE_SPACING;
        let cursor = self.ensure_space(cursor, height);
        let line = Line {
            page: cursor.page,
            baseline: cursor.y - size,
        };
        (cursor.advance(height), line)
    }

    fn text(&mut self, line: Line, x: f32, text: &str, weight: Weight, size: f32) {
        self.pages[line.page].push(DrawOp::Text {
            x,
            y: line.baseline,
            size,
            weight,
            text: text.to_string(),
        });
    }

    fn text_right(&mut self, line: Line, text: &str, weight: Weight, size: f32) {
        let x = self.geometry.right() - self.width(text, weight, size);
        self.text(line, x, text, weight, size);
    }

    fn text_centered(&mut self, line: Line, text: &str, weight: Weight, size: f32) {
        let x = self.geometry.left() + (self.geometry.content_width() - self.width(text, weight, size)) / 2.0;
        self.text(line, x, text, weight, size);
    }

    /// Wrapped block of left-aligned text starting at `x`.
    fn paragraph(
        &mut self,
        mut cursor: LayoutCursor,
        text: &str,
        weight: Weight,
        size: f32,
        x: f32,
    ) -> LayoutCursor {
        let max_width = self.geometry.right() - x;
        for line_text in self.wrap(text, weight, size, max_width) {
            let (next, line) = self.take_line(cursor, size);
            self.text(line, x, &line_text, weight, size);
            cursor = next;
        }
        cursor
    }

    /// Shared section header: upper-cased bold title, full-width rule, fixed spacing.
    fn section_header(&mut self, cursor: LayoutCursor, title: &str) -> LayoutCursor {
        let cursor = cursor.advance(SECTION_GAP);
        // Keep the header on the same page as the first body line.
        let needed = HEADER_SIZE * LINE_SPACING + HEADER_AFTER_GAP + BODY_SIZE * LINE_SPACING;
        let cursor = self.ensure_space(cursor, needed);

        let (cursor, line) = self.take_line(cursor, HEADER_SIZE);
        self.text(line, self.geometry.left(), &title.to_uppercase(), Weight::Bold, HEADER_SIZE);
        self.pages[line.page].push(DrawOp::Rule {
            x1: self.geometry.left(),
            x2: self.geometry.right(),
            y: line.baseline - RULE_OFFSET,
            thickness: RULE_THICKNESS,
        });
        cursor.advance(HEADER_AFTER_GAP)
    }

    /// Two-column row: `primary` left-aligned, `secondary` right-aligned on the
    /// first baseline. The primary text wraps inside the space left of the
    /// secondary text. If that space is too narrow, the secondary text moves to
    /// its own right-aligned line(s) below.
    fn dated_row(
        &mut self,
        cursor: LayoutCursor,
        primary: &str,
        weight: Weight,
        secondary: &str,
    ) -> LayoutCursor {
        let size = BODY_SIZE;
        let left = self.geometry.left();
        let content = self.geometry.content_width();
        let secondary = secondary.trim();

        if secondary.is_empty() {
            return self.paragraph(cursor, primary, weight, size, left);
        }

        let secondary_width = self.width(secondary, Weight::Regular, size);
        let room = content - secondary_width - COLUMN_GAP;

        if room < content * MIN_PRIMARY_FRACTION {
            let mut cursor = self.paragraph(cursor, primary, weight, size, left);
            for line_text in self.wrap(secondary, Weight::Regular, size, content) {
                let (next, line) = self.take_line(cursor, size);
                self.text_right(line, &line_text, Weight::Regular, size);
                cursor = next;
            }
            return cursor;
        }

        let mut lines = self.wrap(primary, weight, size, room);
        if lines.is_empty() {
            lines.push(String::new());
        }

        let mut cursor = cursor;
        for (i, line_text) in lines.iter().enumerate() {
            let (next, line) = self.take_line(cursor, size);
            if !line_text.is_empty() {
                self.text(line, left, line_text, weight, size);
            }
            if i == 0 {
                self.text_right(line, secondary, Weight::Regular, size);
            }
            cursor = next;
        }
        cursor
    }

    /// Bulleted list with fixed indent. Blank items are skipped.
    fn bullets(&mut self, mut cursor: LayoutCursor, items: &[String]) -> LayoutCursor {
        let bullet_x = self.geometry.left() + BULLET_INDENT;
        let text_x = self.geometry.left() + BULLET_TEXT_INDENT;
        let max_width = self.geometry.right() - text_x;

        for item in items.iter().filter(|i| !is_blank(i)) {
            let lines = self.wrap(item, Weight::Regular, BODY_SIZE, max_width);
            for (i, line_text) in lines.iter().enumerate() {
                let (next, line) = self.take_line(cursor, BODY_SIZE);
                if i == 0 {
                    self.text(line, bullet_x, BULLET_GLYPH, Weight::Regular, BODY_SIZE);
                }
                self.text(line, text_x, line_text, Weight::Regular, BODY_SIZE);
                cursor = next;
            }
        }
        cursor
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Résumé flow
// ────────────────────────────────────────────────────────────────────────────

/// Lays out the full résumé. Pure: same record and fonts, same display list.
pub fn layout_resume(record: &NormalizedResume, fonts: &FontSet, geometry: PageGeometry) -> DisplayList {
    let mut canvas = Canvas::new(fonts, geometry);
    let mut cursor = draw_header(&mut canvas, LayoutCursor::top(&geometry), record);

    for section in sections_to_render(record) {
        cursor = canvas.section_header(cursor, section.title());
        cursor = match section {
            Section::Summary => draw_text_block(&mut canvas, cursor, &record.summary),
            Section::Education => draw_education(&mut canvas, cursor, &record.education),
            Section::Skills => draw_text_block(&mut canvas, cursor, &record.skills),
            Section::Experience => draw_experience(&mut canvas, cursor, &record.experience),
            Section::Projects => draw_projects(&mut canvas, cursor, &record.projects),
            Section::Certifications => canvas.bullets(cursor, &record.certifications),
        };
    }

    DisplayList {
        geometry,
        pages: canvas.pages,
    }
}

fn draw_header(canvas: &mut Canvas, mut cursor: LayoutCursor, record: &NormalizedResume) -> LayoutCursor {
    let contact = &record.contact_info;
    let content = canvas.geometry.content_width();

    for name_line in canvas.wrap(&contact.name, Weight::Bold, NAME_SIZE, content) {
        let (next, line) = canvas.take_line(cursor, NAME_SIZE);
        canvas.text_centered(line, &name_line, Weight::Bold, NAME_SIZE);
        cursor = next;
    }

    let details: Vec<&str> = [&contact.email, &contact.phone, &contact.linkedin, &contact.github]
        .into_iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();

    for text in pack_contact_lines(canvas, &details, content) {
        let (next, line) = canvas.take_line(cursor, CONTACT_SIZE);
        canvas.text_centered(line, &text, Weight::Regular, CONTACT_SIZE);
        cursor = next;
    }
    cursor
}

/// Joins contact details with the separator, starting a new line whenever the
/// next detail would overflow. A single over-wide detail is wrapped on its own.
fn pack_contact_lines(canvas: &Canvas, details: &[&str], max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for detail in details {
        let candidate = if current.is_empty() {
            detail.to_string()
        } else {
            format!("{current}{CONTACT_SEPARATOR}{detail}")
        };
        if canvas.width(&candidate, Weight::Regular, CONTACT_SIZE) <= max_width {
            current = candidate;
            continue;
        }
        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if canvas.width(detail, Weight::Regular, CONTACT_SIZE) <= max_width {
            current = detail.to_string();
        } else {
            lines.extend(canvas.wrap(detail, Weight::Regular, CONTACT_SIZE, max_width));
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn draw_text_block(canvas: &mut Canvas, cursor: LayoutCursor, text: &str) -> LayoutCursor {
    let left = canvas.geometry.left();
    canvas.paragraph(cursor, text, Weight::Regular, BODY_SIZE, left)
}

fn draw_education(canvas: &mut Canvas, mut cursor: LayoutCursor, entries: &[EducationEntry]) -> LayoutCursor {
    for (i, entry) in entries.iter().filter(|e| !education_is_blank(e)).enumerate() {
        if i > 0 {
            cursor = cursor.advance(ENTRY_GAP);
        }
        cursor = canvas.dated_row(cursor, &entry.degree, Weight::Bold, &entry.graduation_date);
        let cgpa = match entry.cgpa.trim() {
            "" => String::new(),
            value => format!("CGPA: {value}"),
        };
        if !is_blank(&entry.institution) || !cgpa.is_empty() {
            cursor = canvas.dated_row(cursor, &entry.institution, Weight::Regular, &cgpa);
        }
    }
    cursor
}

fn draw_experience(canvas: &mut Canvas, mut cursor: LayoutCursor, entries: &[ExperienceEntry]) -> LayoutCursor {
    for (i, entry) in entries.iter().filter(|e| !experience_is_blank(e)).enumerate() {
        if i > 0 {
            cursor = cursor.advance(ENTRY_GAP);
        }
        cursor = canvas.dated_row(cursor, &entry.job_title, Weight::Bold, &entry.date_range());
        if !is_blank(&entry.company) || !is_blank(&entry.location) {
            cursor = canvas.dated_row(cursor, &entry.company, Weight::Regular, &entry.location);
        }
        cursor = canvas.bullets(cursor, &entry.responsibilities);
    }
    cursor
}

fn draw_projects(canvas: &mut Canvas, mut cursor: LayoutCursor, projects: &[ProjectEntry]) -> LayoutCursor {
    let left = canvas.geometry.left();
    for (i, project) in projects.iter().filter(|p| !project_is_blank(p)).enumerate() {
        if i > 0 {
            cursor = cursor.advance(ENTRY_GAP);
        }
        cursor = canvas.paragraph(cursor, &project.name, Weight::Bold, BODY_SIZE, left);
        cursor = canvas.bullets(cursor, &project.responsibilities);
    }
    cursor
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
