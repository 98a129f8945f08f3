pub mod font_metrics;
pub mod fonts;
pub mod layout;
pub mod pdf;
pub mod wrap;

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::errors::AppError;
use crate::models::NormalizedResume;
use crate::render::fonts::FontSet;
use crate::render::layout::{layout_resume, DisplayList, PageGeometry, LETTER};

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// A rendered résumé, ready to be sent as a download.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub filename: String,
}

/// Deterministic résumé renderer. Fonts are resolved once and shared.
#[derive(Debug, Clone)]
pub struct Renderer {
    fonts: Arc<FontSet>,
    geometry: PageGeometry,
}

impl Renderer {
    pub fn new(fonts: FontSet) -> Self {
        Self {
            fonts: Arc::new(fonts),
            geometry: LETTER,
        }
    }

    pub fn fonts(&self) -> &FontSet {
        &self.fonts
    }

    pub fn layout(&self, record: &NormalizedResume) -> DisplayList {
        layout_resume(record, &self.fonts, self.geometry)
    }

    /// Renders a record to PDF. CPU-bound; call from `spawn_blocking` in handlers.
    pub fn render(&self, record: &NormalizedResume) -> Result<RenderedDocument, AppError> {
        let list = self.layout(record);
        let bytes = pdf::encode_pdf(&list, &self.fonts)?;
        debug!(pages = list.pages.len(), bytes = bytes.len(), "Rendered résumé");

        Ok(RenderedDocument {
            bytes,
            content_type: PDF_CONTENT_TYPE,
            filename: download_filename(&record.contact_info.name),
        })
    }

    /// Renders an arbitrary JSON value, rejecting anything that does not
    /// deserialize as a résumé record.
    pub fn render_value(&self, value: Value) -> Result<RenderedDocument, AppError> {
        let record = NormalizedResume::from_value(value)
            .map_err(|e| AppError::RenderFailed(format!("malformed résumé record: {e}")))?;
        self.render(&record)
    }
}

/// `Jane Doe` becomes `jane_doe_resume.pdf`; an unusable name gives `resume.pdf`.
pub fn download_filename(name: &str) -> String {
    let slug = name
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| part.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join("_");

    if slug.is_empty() {
        "resume.pdf".to_string()
    } else {
        format!("{slug}_resume.pdf")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ContactInfo, ExperienceEntry};
    use serde_json::json;

    fn renderer() -> Renderer {
        Renderer::new(FontSet::standard())
    }

    fn record() -> NormalizedResume {
        NormalizedResume {
            contact_info: ContactInfo {
                name: "Jane Doe".into(),
                email: "jane@x.com".into(),
                ..Default::default()
            },
            experience: vec![ExperienceEntry {
                job_title: "Engineer".into(),
                company: "Acme".into(),
                start_date: "2020".into(),
                end_date: "2023".into(),
                responsibilities: vec!["Built X".into(), "Led Y".into()],
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_render_is_byte_identical_across_runs() {
        let first = renderer().render(&record()).unwrap();
        let second = renderer().render(&record()).unwrap();
        assert_eq!(first.bytes, second.bytes);
        assert_eq!(first.content_type, "application/pdf");
        assert_eq!(first.filename, "jane_doe_resume.pdf");
    }

    #[test]
    fn test_empty_record_renders_one_page() {
        let doc = renderer().render(&NormalizedResume::default()).unwrap();
        let parsed = lopdf::Document::load_mem(&doc.bytes).unwrap();
        assert_eq!(parsed.get_pages().len(), 1);
        assert_eq!(doc.filename, "resume.pdf");
    }

    #[test]
    fn test_render_value_accepts_partial_record() {
        let doc = renderer()
            .render_value(json!({ "contact_info": { "name": "Jane Doe" }, "skills": null }))
            .unwrap();
        assert!(doc.bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_render_value_rejects_malformed_input() {
        let err = renderer()
            .render_value(json!({ "experience": "not a list" }))
            .unwrap_err();
        assert!(matches!(err, AppError::RenderFailed(_)));

        let err = renderer().render_value(json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, AppError::RenderFailed(_)));
    }

    #[test]
    fn test_download_filename() {
        assert_eq!(download_filename("Jane Doe"), "jane_doe_resume.pdf");
        assert_eq!(download_filename("  José  O'Neil "), "jos_o_neil_resume.pdf");
        assert_eq!(download_filename(""), "resume.pdf");
        assert_eq!(download_filename("***"), "resume.pdf");
    }
}
