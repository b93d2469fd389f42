//! Résumé record → CV document.
//!
//! Generation is a fixed sequence of section emitters. Each emitter checks for its
//! own data and writes nothing when the section is absent, so section order never
//! depends on the input.

use bytes::Bytes;
use tracing::debug;

use crate::models::resume::{present, Education, Experience, Project, ResumeRecord};
use crate::render::document::{Document, Paragraph, Run, BULLET, BULLET_INDENT_IN};
use crate::render::docx::write_docx;
use crate::render::styles::{StyleId, StyleRegistry};
use crate::render::validation::{validate_record, ValidationError};
use crate::render::RenderError;

pub const SUMMARY_HEADING: &str = "PROFESSIONAL SUMMARY";
pub const EXPERIENCE_HEADING: &str = "PROFESSIONAL EXPERIENCE";
pub const EDUCATION_HEADING: &str = "EDUCATION";
pub const SKILLS_HEADING: &str = "CORE COMPETENCIES";
pub const PROJECTS_HEADING: &str = "KEY PROJECTS";

const FIELD_SEPARATOR: &str = " | ";
const TITLE_SIZE_PT: f32 = 14.0;

type SectionEmitter = fn(&ResumeRecord, &mut Document);

/// Emission order of the document's sections.
const SECTIONS: [SectionEmitter; 6] = [
    emit_header,
    emit_summary,
    emit_experience,
    emit_education,
    emit_skills,
    emit_projects,
];

/// Renders one résumé. Construct per request; holds no state besides its styles.
#[derive(Debug, Clone)]
pub struct DocumentRenderer {
    styles: StyleRegistry,
}

impl Default for DocumentRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentRenderer {
    pub fn new() -> Self {
        Self {
            styles: StyleRegistry::standard(),
        }
    }

    /// Validates `record` and lays it out as a flow document.
    pub fn build(&self, record: &ResumeRecord) -> Result<Document, ValidationError> {
        validate_record(record)?;

        let mut doc = Document::new();
        for emit in SECTIONS {
            emit(record, &mut doc);
        }

        debug!(
            experiences = record.experiences.len(),
            education = record.education.len(),
            skill_groups = record.skills.len(),
            projects = record.projects.len(),
            paragraphs = doc.paragraphs.len(),
            "CV document laid out"
        );
        Ok(doc)
    }

    /// Validates, lays out and serializes `record` into DOCX bytes.
    pub fn render(&self, record: &ResumeRecord) -> Result<Bytes, RenderError> {
        let doc = self.build(record)?;
        let bytes = write_docx(&doc, &self.styles)?;
        Ok(Bytes::from(bytes))
    }
}

/// Renders `record` with a fresh [`DocumentRenderer`].
pub fn render(record: &ResumeRecord) -> Result<Bytes, RenderError> {
    DocumentRenderer::new().render(record)
}

// ────────────────────────────────────────────────────────────────────────────
// Section emitters
// ────────────────────────────────────────────────────────────────────────────

fn emit_header(record: &ResumeRecord, doc: &mut Document) {
    doc.add_text(
        StyleId::Name,
        format!("{} {}", record.first_name, record.last_name),
    );

    if let Some(title) = present(&record.professional_title) {
        doc.push(Paragraph::styled(StyleId::Contact).with_run(Run {
            italic: true,
            size_pt: Some(TITLE_SIZE_PT),
            ..Run::plain(title)
        }));
    }

    doc.add_text(StyleId::Contact, contact_line(record));
    doc.add_divider();
}

/// `email | phone | city, state, country | LinkedIn: … | GitHub: … | Portfolio: …`
pub fn contact_line(record: &ResumeRecord) -> String {
    let mut location = vec![record.city.as_str()];
    location.extend(present(&record.state));
    location.extend(present(&record.country));

    let mut parts = vec![
        record.email.clone(),
        record.phone.clone(),
        location.join(", "),
    ];

    let links = [
        ("LinkedIn", &record.linkedin),
        ("GitHub", &record.github),
        ("Portfolio", &record.portfolio),
    ];
    for (label, value) in links {
        if let Some(url) = present(value) {
            parts.push(format!("{label}: {url}"));
        }
    }

    parts.join(FIELD_SEPARATOR)
}

fn emit_summary(record: &ResumeRecord, doc: &mut Document) {
    let Some(summary) = present(&record.summary) else {
        return;
    };
    doc.add_text(StyleId::SectionHeading, SUMMARY_HEADING);
    doc.add_text(StyleId::Body, summary);
    doc.add_divider();
}

fn emit_experience(record: &ResumeRecord, doc: &mut Document) {
    if record.experiences.is_empty() {
        return;
    }
    doc.add_text(StyleId::SectionHeading, EXPERIENCE_HEADING);
    for experience in &record.experiences {
        emit_experience_entry(experience, doc);
        doc.add_spacer();
    }
    doc.add_divider();
}

fn emit_experience_entry(exp: &Experience, doc: &mut Document) {
    let mut title = Paragraph::styled(StyleId::Position).with_run(Run::bold(&exp.job_title));
    if let Some(kind) = exp.employment_suffix() {
        title = title.with_text(format!(" ({kind})"));
    }
    doc.push(title);

    doc.add_text(
        StyleId::Company,
        format!(
            "{} | {} | {} - {}",
            exp.company, exp.location, exp.start_date, exp.end_date
        ),
    );

    for responsibility in exp.responsibilities.iter().filter(|r| !r.trim().is_empty()) {
        doc.push(
            Paragraph::styled(StyleId::Body)
                .with_text(format!("{BULLET} {responsibility}"))
                .with_left_indent(BULLET_INDENT_IN),
        );
    }
}

fn emit_education(record: &ResumeRecord, doc: &mut Document) {
    if record.education.is_empty() {
        return;
    }
    doc.add_text(StyleId::SectionHeading, EDUCATION_HEADING);
    for education in &record.education {
        emit_education_entry(education, doc);
        doc.add_spacer();
    }
    doc.add_divider();
}

fn emit_education_entry(edu: &Education, doc: &mut Document) {
    doc.push(
        Paragraph::styled(StyleId::Position)
            .with_run(Run::bold(format!("{} in {}", edu.degree, edu.field_of_study))),
    );

    let mut institution = format!("{}, {}", edu.institution, edu.location);
    if let Some(date) = present(&edu.graduation_date) {
        institution.push_str(&format!(" | Graduated: {date}"));
    }
    doc.add_text(StyleId::Company, institution);

    let mut extras = Vec::new();
    if let Some(gpa) = present(&edu.gpa) {
        extras.push(format!("GPA: {gpa}"));
    }
    if let Some(honors) = present(&edu.honors) {
        extras.push(format!("Honors: {honors}"));
    }
    if !extras.is_empty() {
        doc.add_text(StyleId::Body, extras.join(FIELD_SEPARATOR));
    }
}

fn emit_skills(record: &ResumeRecord, doc: &mut Document) {
    if record.skills.is_empty() {
        return;
    }
    doc.add_text(StyleId::SectionHeading, SKILLS_HEADING);
    for group in record.skills.iter().filter(|g| g.is_renderable()) {
        doc.push(
            Paragraph::styled(StyleId::Body)
                .with_run(Run::bold(format!("{}: ", group.category)))
                .with_text(group.skills.join(FIELD_SEPARATOR)),
        );
    }
    doc.add_divider();
}

fn emit_projects(record: &ResumeRecord, doc: &mut Document) {
    if record.projects.is_empty() {
        return;
    }
    doc.add_text(StyleId::SectionHeading, PROJECTS_HEADING);
    for project in &record.projects {
        emit_project_entry(project, doc);
        doc.add_spacer();
    }
    doc.add_divider();
}

fn emit_project_entry(project: &Project, doc: &mut Document) {
    let mut name = Paragraph::styled(StyleId::Position).with_run(Run::bold(&project.name));
    if let Some(kind) = present(&project.project_type) {
        name = name.with_text(format!(" ({kind} Project)"));
    }
    doc.push(name);

    let details: Vec<&str> = [present(&project.duration), present(&project.url)]
        .into_iter()
        .flatten()
        .collect();
    if !details.is_empty() {
        doc.add_text(StyleId::Company, details.join(FIELD_SEPARATOR));
    }

    if let Some(description) = present(&project.description) {
        doc.add_text(StyleId::Body, description);
    }

    if !project.technologies.is_empty() {
        doc.push(
            Paragraph::styled(StyleId::Body)
                .with_run(Run::bold("Technologies: "))
                .with_text(project.technologies.join(", ")),
        );
    }
}
