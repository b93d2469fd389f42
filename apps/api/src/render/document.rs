//! In-memory flow document: an ordered list of paragraphs made of text runs.
//!
//! The renderer appends to a [`Document`]; [`crate::render::docx`] turns it into
//! WordprocessingML. Measurements are kept in points and inches here and converted
//! to twentieths of a point (twips) only at serialization time.

use crate::render::styles::{Rgb, StyleId};

pub const PAGE_MARGIN_IN: f32 = 0.7;
pub const BULLET_INDENT_IN: f32 = 0.25;
pub const DIVIDER_SPACE_AFTER_PT: f32 = 12.0;
pub const BULLET: char = '\u{2022}';

/// Converts points to twips (1/20 pt).
pub fn pt_to_twips(pt: f32) -> u32 {
    (pt * 20.0).round() as u32
}

/// Converts inches to twips (1440 per inch).
pub fn in_to_twips(inches: f32) -> u32 {
    (inches * 1440.0).round() as u32
}

/// Converts points to the half-point unit used for font sizes.
pub fn pt_to_half_points(pt: f32) -> u32 {
    (pt * 2.0).round() as u32
}

// ────────────────────────────────────────────────────────────────────────────
// Runs and paragraphs
// ────────────────────────────────────────────────────────────────────────────

/// A span of text with optional character formatting on top of its paragraph style.
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    /// Overrides the paragraph style's size.
    pub size_pt: Option<f32>,
}

impl Run {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            italic: false,
            size_pt: None,
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            bold: true,
            ..Self::plain(text)
        }
    }
}

/// Paragraph bottom border used for section dividers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BottomBorder {
    /// Line width in eighths of a point.
    pub width_eighths: u32,
    /// Gap between text and border, in points.
    pub space_pt: u32,
    pub color: Rgb,
}

impl BottomBorder {
    pub const HAIRLINE: BottomBorder = BottomBorder {
        width_eighths: 4,
        space_pt: 1,
        color: Rgb::LIGHT_GRAY,
    };
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Paragraph {
    /// `None` uses the document's default (Normal) style.
    pub style: Option<StyleId>,
    pub runs: Vec<Run>,
    pub left_indent_in: Option<f32>,
    pub space_after_pt: Option<f32>,
    pub bottom_border: Option<BottomBorder>,
}

impl Paragraph {
    pub fn styled(style: StyleId) -> Self {
        Self {
            style: Some(style),
            ..Default::default()
        }
    }

    pub fn with_run(mut self, run: Run) -> Self {
        self.runs.push(run);
        self
    }

    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_run(Run::plain(text))
    }

    pub fn with_left_indent(mut self, inches: f32) -> Self {
        self.left_indent_in = Some(inches);
        self
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Document
// ────────────────────────────────────────────────────────────────────────────

/// Page margins in inches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageMargins {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
}

impl PageMargins {
    pub fn uniform(inches: f32) -> Self {
        Self {
            top: inches,
            bottom: inches,
            left: inches,
            right: inches,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub margins: PageMargins,
    pub paragraphs: Vec<Paragraph>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Empty document with the CV page margins.
    pub fn new() -> Self {
        Self {
            margins: PageMargins::uniform(PAGE_MARGIN_IN),
            paragraphs: Vec::new(),
        }
    }

    pub fn push(&mut self, paragraph: Paragraph) {
        self.paragraphs.push(paragraph);
    }

    /// Appends a single-run paragraph in `style`.
    pub fn add_text(&mut self, style: StyleId, text: impl Into<String>) {
        self.push(Paragraph::styled(style).with_text(text));
    }

    /// Appends an empty Normal paragraph used as vertical space between entries.
    pub fn add_spacer(&mut self) {
        self.push(Paragraph::default());
    }

    /// Appends an empty paragraph whose bottom border draws a thin rule.
    pub fn add_divider(&mut self) {
        self.push(Paragraph {
            space_after_pt: Some(DIVIDER_SPACE_AFTER_PT),
            bottom_border: Some(BottomBorder::HAIRLINE),
            ..Default::default()
        });
    }
}

#[cfg(test)]
impl Paragraph {
    /// Concatenated text of all runs.
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    pub fn is_divider(&self) -> bool {
        self.bottom_border.is_some()
    }
}

#[cfg(test)]
impl Document {
    /// Texts of all paragraphs in `style`, in document order.
    pub fn texts_in(&self, style: StyleId) -> Vec<String> {
        self.paragraphs
            .iter()
            .filter(|p| p.style == Some(style))
            .map(Paragraph::text)
            .collect()
    }

    pub fn divider_count(&self) -> usize {
        self.paragraphs.iter().filter(|p| p.is_divider()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_conversions() {
        assert_eq!(pt_to_twips(12.0), 240);
        assert_eq!(pt_to_twips(3.0), 60);
        assert_eq!(in_to_twips(PAGE_MARGIN_IN), 1008);
        assert_eq!(in_to_twips(BULLET_INDENT_IN), 360);
        assert_eq!(pt_to_half_points(11.0), 22);
        assert_eq!(pt_to_half_points(24.0), 48);
    }

    #[test]
    fn test_new_document_has_uniform_margins() {
        let doc = Document::new();
        assert_eq!(doc.margins, PageMargins::uniform(0.7));
        assert!(doc.paragraphs.is_empty());
    }

    #[test]
    fn test_divider_is_empty_bordered_paragraph() {
        let mut doc = Document::new();
        doc.add_divider();
        let p = &doc.paragraphs[0];
        assert!(p.runs.is_empty());
        assert!(p.style.is_none());
        assert_eq!(p.space_after_pt, Some(12.0));
        assert_eq!(p.bottom_border, Some(BottomBorder::HAIRLINE));
        assert_eq!(doc.divider_count(), 1);
    }

    #[test]
    fn test_paragraph_text_joins_runs() {
        let p = Paragraph::styled(StyleId::Body)
            .with_run(Run::bold("Languages: "))
            .with_text("Rust | Go");
        assert_eq!(p.text(), "Languages: Rust | Go");
        assert!(p.runs[0].bold);
        assert!(!p.runs[1].bold);
    }

    #[test]
    fn test_texts_in_filters_by_style() {
        let mut doc = Document::new();
        doc.add_text(StyleId::Body, "one");
        doc.add_spacer();
        doc.add_text(StyleId::Company, "two");
        doc.add_text(StyleId::Body, "three");
        assert_eq!(doc.texts_in(StyleId::Body), vec!["one", "three"]);
    }
}
