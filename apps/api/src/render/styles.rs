//! Paragraph style table for generated CVs.
//!
//! Every style is defined once in [`CV_STYLES`] and collected into a
//! [`StyleRegistry`] when a renderer is built. Nothing mutates a style after that.

// ────────────────────────────────────────────────────────────────────────────
// Style primitives
// ────────────────────────────────────────────────────────────────────────────

pub const SERIF_FONT: &str = "Georgia";
pub const SANS_FONT: &str = "Calibri";

/// 24-bit RGB colour, serialized as six upper-case hex digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const DARK_NAVY: Rgb = Rgb(0, 32, 96);
    pub const DARK_GRAY: Rgb = Rgb(64, 64, 64);
    pub const MEDIUM_GRAY: Rgb = Rgb(96, 96, 96);
    pub const LIGHT_GRAY: Rgb = Rgb(204, 204, 204);

    pub fn hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
}

impl Alignment {
    /// WordprocessingML `w:jc` value.
    pub fn ooxml_value(self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
        }
    }
}

/// The six paragraph styles a CV is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleId {
    Name,
    SectionHeading,
    Contact,
    Position,
    Company,
    Body,
}

impl StyleId {
    /// Identifier written to `w:styleId` and referenced by `w:pStyle`.
    pub fn ooxml_id(self) -> &'static str {
        match self {
            StyleId::Name => "CVName",
            StyleId::SectionHeading => "CVSection",
            StyleId::Contact => "CVContact",
            StyleId::Position => "CVPosition",
            StyleId::Company => "CVCompany",
            StyleId::Body => "CVBody",
        }
    }
}

/// A named paragraph style. Sizes and spacing are in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyleSpec {
    pub id: StyleId,
    /// Display name shown in the word processor's style gallery.
    pub name: &'static str,
    pub font: &'static str,
    pub size_pt: f32,
    pub bold: bool,
    pub italic: bool,
    pub all_caps: bool,
    /// `None` inherits the document default text colour.
    pub color: Option<Rgb>,
    pub alignment: Alignment,
    pub space_before_pt: f32,
    pub space_after_pt: f32,
}

const BASE: StyleSpec = StyleSpec {
    id: StyleId::Body,
    name: "CV Body",
    font: SANS_FONT,
    size_pt: 11.0,
    bold: false,
    italic: false,
    all_caps: false,
    color: None,
    alignment: Alignment::Left,
    space_before_pt: 0.0,
    space_after_pt: 6.0,
};

pub const CV_STYLES: [StyleSpec; 6] = [
    StyleSpec {
        id: StyleId::Name,
        name: "CV Name",
        font: SERIF_FONT,
        size_pt: 24.0,
        bold: true,
        color: Some(Rgb::DARK_NAVY),
        alignment: Alignment::Center,
        ..BASE
    },
    StyleSpec {
        id: StyleId::SectionHeading,
        name: "CV Section",
        font: SERIF_FONT,
        size_pt: 14.0,
        bold: true,
        all_caps: true,
        color: Some(Rgb::DARK_NAVY),
        space_before_pt: 12.0,
        ..BASE
    },
    StyleSpec {
        id: StyleId::Contact,
        name: "CV Contact",
        color: Some(Rgb::DARK_GRAY),
        alignment: Alignment::Center,
        space_after_pt: 12.0,
        ..BASE
    },
    StyleSpec {
        id: StyleId::Position,
        name: "CV Position",
        size_pt: 12.0,
        bold: true,
        space_after_pt: 3.0,
        ..BASE
    },
    StyleSpec {
        id: StyleId::Company,
        name: "CV Company",
        italic: true,
        color: Some(Rgb::MEDIUM_GRAY),
        ..BASE
    },
    BASE,
];

// ────────────────────────────────────────────────────────────────────────────
// Registry
// ────────────────────────────────────────────────────────────────────────────

/// Ordered set of style definitions, unique by name.
#[derive(Debug, Clone, Default)]
pub struct StyleRegistry {
    styles: Vec<StyleSpec>,
}

impl StyleRegistry {
    /// Registry holding every style in [`CV_STYLES`].
    pub fn standard() -> Self {
        let mut registry = Self::default();
        for spec in CV_STYLES {
            registry.define(spec);
        }
        registry
    }

    /// Adds `spec` unless a style with the same name already exists.
    /// Returns whether the style was added.
    pub fn define(&mut self, spec: StyleSpec) -> bool {
        if self.styles.iter().any(|s| s.name == spec.name) {
            return false;
        }
        self.styles.push(spec);
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &StyleSpec> {
        self.styles.iter()
    }
}

#[cfg(test)]
impl StyleRegistry {
    pub fn get(&self, id: StyleId) -> Option<&StyleSpec> {
        self.styles.iter().find(|s| s.id == id)
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_registry_has_all_six_styles() {
        let registry = StyleRegistry::standard();
        assert_eq!(registry.len(), 6);
        for id in [
            StyleId::Name,
            StyleId::SectionHeading,
            StyleId::Contact,
            StyleId::Position,
            StyleId::Company,
            StyleId::Body,
        ] {
            assert!(registry.get(id).is_some(), "missing {id:?}");
        }
    }

    #[test]
    fn test_define_skips_existing_name() {
        let mut registry = StyleRegistry::standard();
        let duplicate = StyleSpec {
            size_pt: 40.0,
            ..CV_STYLES[0]
        };
        assert!(!registry.define(duplicate));
        assert_eq!(registry.len(), 6);
        assert_eq!(registry.get(StyleId::Name).unwrap().size_pt, 24.0);
    }

    #[test]
    fn test_style_table_values() {
        let registry = StyleRegistry::standard();

        let name = registry.get(StyleId::Name).unwrap();
        assert_eq!(name.font, SERIF_FONT);
        assert_eq!(name.size_pt, 24.0);
        assert!(name.bold);
        assert_eq!(name.alignment, Alignment::Center);
        assert_eq!(name.space_after_pt, 6.0);

        let heading = registry.get(StyleId::SectionHeading).unwrap();
        assert!(heading.all_caps);
        assert_eq!(heading.space_before_pt, 12.0);
        assert_eq!(heading.space_after_pt, 6.0);

        let contact = registry.get(StyleId::Contact).unwrap();
        assert_eq!(contact.font, SANS_FONT);
        assert_eq!(contact.color, Some(Rgb::DARK_GRAY));
        assert_eq!(contact.space_after_pt, 12.0);

        let position = registry.get(StyleId::Position).unwrap();
        assert_eq!(position.size_pt, 12.0);
        assert_eq!(position.space_after_pt, 3.0);

        let company = registry.get(StyleId::Company).unwrap();
        assert!(company.italic);
        assert_eq!(company.color, Some(Rgb::MEDIUM_GRAY));

        let body = registry.get(StyleId::Body).unwrap();
        assert!(!body.bold && !body.italic);
        assert_eq!(body.color, None);
    }

    #[test]
    fn test_rgb_hex() {
        assert_eq!(Rgb::DARK_NAVY.hex(), "002060");
        assert_eq!(Rgb::LIGHT_GRAY.hex(), "CCCCCC");
    }
}
