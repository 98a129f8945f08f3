// Text Extractor: uploaded PDF/DOCX bytes → plain text.
// Decoding is CPU-bound and runs inside tokio::task::spawn_blocking.

pub mod codecs;

use std::io::Write;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use tempfile::NamedTempFile;
use tracing::{info, warn};

use crate::errors::AppError;

pub const PDF_MIME: &str = "application/pdf";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// The two upload formats the extractor can decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Pdf,
    Docx,
}

impl MediaType {
    /// Resolves the declared MIME type. A missing or generic declaration falls
    /// back to the file extension; anything else is rejected.
    pub fn from_declared(mime: Option<&str>, filename: Option<&str>) -> Result<Self, AppError> {
        let essence = mime
            .map(|m| m.split(';').next().unwrap_or("").trim().to_ascii_lowercase())
            .unwrap_or_default();

        match essence.as_str() {
            PDF_MIME => Ok(MediaType::Pdf),
            DOCX_MIME => Ok(MediaType::Docx),
            "" | "application/octet-stream" => {
                let ext = filename
                    .and_then(|f| Path::new(f).extension())
                    .and_then(|e| e.to_str())
                    .map(str::to_ascii_lowercase);
                match ext.as_deref() {
                    Some("pdf") => Ok(MediaType::Pdf),
                    Some("docx") => Ok(MediaType::Docx),
                    _ => Err(AppError::UnsupportedMediaType(format!(
                        "undeclared type for file {:?}",
                        filename.unwrap_or("<unnamed>")
                    ))),
                }
            }
            other => Err(AppError::UnsupportedMediaType(other.to_string())),
        }
    }

    fn suffix(self) -> &'static str {
        match self {
            MediaType::Pdf => ".pdf",
            MediaType::Docx => ".docx",
        }
    }
}

/// An uploaded document as received: bytes plus whatever the client declared.
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub bytes: Bytes,
    pub declared_type: Option<String>,
    pub filename: Option<String>,
}

/// Stages uploads in `staging_dir` and decodes them to text.
#[derive(Debug, Clone)]
pub struct Extractor {
    staging_dir: PathBuf,
}

impl Extractor {
    pub fn new(staging_dir: PathBuf) -> Self {
        Self { staging_dir }
    }

    /// Extracts plain text from a document.
    ///
    /// The media type is checked before anything touches disk. The staged copy
    /// is a `NamedTempFile`, removed on every exit path including a panicking codec.
    pub async fn extract(&self, document: RawDocument) -> Result<String, AppError> {
        let media_type = MediaType::from_declared(
            document.declared_type.as_deref(),
            document.filename.as_deref(),
        )?;

        let staging_dir = self.staging_dir.clone();
        let bytes = document.bytes;
        let text = tokio::task::spawn_blocking(move || {
            extract_blocking(&staging_dir, media_type, &bytes)
        })
        .await
        .map_err(|e| AppError::ExtractionFailed(format!("decoder aborted: {e}")))??;

        info!(
            ?media_type,
            chars = text.len(),
            "Extracted text from uploaded document"
        );
        Ok(text)
    }
}

fn extract_blocking(
    staging_dir: &Path,
    media_type: MediaType,
    bytes: &[u8],
) -> Result<String, AppError> {
    let staged = stage(staging_dir, media_type, bytes)?;

    let decoded = match media_type {
        MediaType::Pdf => codecs::pdf_text(staged.path()),
        MediaType::Docx => codecs::docx_text(staged.path()),
    };

    let path = staged.path().to_path_buf();
    if let Err(e) = staged.close() {
        warn!(path = %path.display(), "Failed to remove staged upload: {e}");
    }

    decoded.map(|text| clean_text(&text))
}

fn stage(staging_dir: &Path, media_type: MediaType, bytes: &[u8]) -> Result<NamedTempFile, AppError> {
    let mut staged = tempfile::Builder::new()
        .prefix("upload-")
        .suffix(media_type.suffix())
        .tempfile_in(staging_dir)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("could not stage upload: {e}")))?;
    staged
        .write_all(bytes)
        .and_then(|_| staged.flush())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("could not stage upload: {e}")))?;
    Ok(staged)
}

/// Normalizes line endings and drops NULs left behind by some PDF encoders.
fn clean_text(text: &str) -> String {
    text.replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace('\0', "")
        .trim_end()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use docx_rs::{Docx, Paragraph, Run};
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};
    use std::io::Cursor;

    fn staging_entries(dir: &Path) -> usize {
        std::fs::read_dir(dir).unwrap().count()
    }

    fn sample_pdf(text: &str) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![72.into(), 700.into()]),
                Operation::new("Tj", vec![Object::string_literal(text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    fn sample_docx() -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        Docx::new()
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("Jane Doe")))
            .build()
            .pack(&mut buf)
            .unwrap();
        buf.into_inner()
    }

    fn raw(bytes: Vec<u8>, mime: Option<&str>, filename: Option<&str>) -> RawDocument {
        RawDocument {
            bytes: Bytes::from(bytes),
            declared_type: mime.map(String::from),
            filename: filename.map(String::from),
        }
    }

    #[test]
    fn test_media_type_from_mime() {
        assert_eq!(
            MediaType::from_declared(Some("application/pdf"), None).unwrap(),
            MediaType::Pdf
        );
        assert_eq!(
            MediaType::from_declared(Some(DOCX_MIME), None).unwrap(),
            MediaType::Docx
        );
        assert_eq!(
            MediaType::from_declared(Some("Application/PDF; charset=binary"), None).unwrap(),
            MediaType::Pdf
        );
    }

    #[test]
    fn test_media_type_extension_fallback() {
        assert_eq!(
            MediaType::from_declared(Some("application/octet-stream"), Some("cv.DOCX")).unwrap(),
            MediaType::Docx
        );
        assert_eq!(
            MediaType::from_declared(None, Some("cv.pdf")).unwrap(),
            MediaType::Pdf
        );
    }

    #[test]
    fn test_media_type_rejects_other_types() {
        for mime in ["text/plain", "application/msword", "image/png"] {
            assert!(matches!(
                MediaType::from_declared(Some(mime), Some("cv.pdf")),
                Err(AppError::UnsupportedMediaType(_))
            ));
        }
        assert!(matches!(
            MediaType::from_declared(None, Some("cv.txt")),
            Err(AppError::UnsupportedMediaType(_))
        ));
    }

    #[tokio::test]
    async fn test_unsupported_type_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let extractor = Extractor::new(dir.path().to_path_buf());
        let err = extractor
            .extract(raw(b"hello".to_vec(), Some("text/plain"), Some("cv.txt")))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UnsupportedMediaType(_)));
        assert_eq!(staging_entries(dir.path()), 0);
    }

    #[tokio::test]
    async fn test_extract_pdf_and_release_staging() {
        let dir = tempfile::tempdir().unwrap();
        let extractor = Extractor::new(dir.path().to_path_buf());
        let text = extractor
            .extract(raw(sample_pdf("Hello Resume"), Some(PDF_MIME), Some("cv.pdf")))
            .await
            .unwrap();
        assert!(text.contains("Hello Resume"), "got {text:?}");
        assert_eq!(staging_entries(dir.path()), 0);
    }

    #[tokio::test]
    async fn test_extract_docx() {
        let dir = tempfile::tempdir().unwrap();
        let extractor = Extractor::new(dir.path().to_path_buf());
        let text = extractor
            .extract(raw(sample_docx(), Some(DOCX_MIME), Some("cv.docx")))
            .await
            .unwrap();
        assert_eq!(text, "Jane Doe");
        assert_eq!(staging_entries(dir.path()), 0);
    }

    #[tokio::test]
    async fn test_corrupt_pdf_fails_and_releases_staging() {
        let dir = tempfile::tempdir().unwrap();
        let extractor = Extractor::new(dir.path().to_path_buf());
        let err = extractor
            .extract(raw(b"%PDF-1.4 truncated".to_vec(), Some(PDF_MIME), None))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ExtractionFailed(_)));
        assert_eq!(staging_entries(dir.path()), 0);
    }

    #[test]
    fn test_clean_text_normalizes_line_endings() {
        assert_eq!(clean_text("a\r\nb\rc\0\n\n  "), "a\nb\nc");
    }
}
