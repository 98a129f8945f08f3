//! Font resolution with fallback.
//!
//! The preferred typeface is Inter, embedded from `Inter-Regular.ttf` and
//! `Inter-Bold.ttf` in the configured font directory. If either file is missing
//! or is not a TrueType program, both weights fall back to the standard
//! Helvetica family. Resolution happens once at startup and never fails.

use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use crate::render::font_metrics::{get_metrics, FontFamily, FontMetricTable, Weight};

const INTER_REGULAR_FILE: &str = "Inter-Regular.ttf";
const INTER_BOLD_FILE: &str = "Inter-Bold.ttf";

/// How a face reaches the PDF.
#[derive(Debug, Clone)]
pub enum FontProgram {
    /// One of the 14 standard PDF fonts; viewers supply the glyphs.
    Standard { base_font: &'static str },
    /// A TrueType program embedded as `/FontFile2`.
    Embedded {
        base_font: &'static str,
        data: Arc<Vec<u8>>,
    },
}

#[derive(Debug, Clone)]
pub struct ResolvedFont {
    pub program: FontProgram,
    pub metrics: &'static FontMetricTable,
}

impl ResolvedFont {
    pub fn base_font(&self) -> &'static str {
        match &self.program {
            FontProgram::Standard { base_font } | FontProgram::Embedded { base_font, .. } => {
                *base_font
            }
        }
    }
}

/// The regular and bold faces used by a render.
#[derive(Debug, Clone)]
pub struct FontSet {
    pub regular: ResolvedFont,
    pub bold: ResolvedFont,
}

impl FontSet {
    /// Standard Helvetica faces. Always available.
    pub fn standard() -> Self {
        Self {
            regular: ResolvedFont {
                program: FontProgram::Standard {
                    base_font: "Helvetica",
                },
                metrics: get_metrics(FontFamily::Helvetica, Weight::Regular),
            },
            bold: ResolvedFont {
                program: FontProgram::Standard {
                    base_font: "Helvetica-Bold",
                },
                metrics: get_metrics(FontFamily::Helvetica, Weight::Bold),
            },
        }
    }

    /// Tries the preferred typeface in `font_dir`, falling back to `standard()`.
    pub fn resolve(font_dir: Option<&Path>) -> Self {
        let Some(dir) = font_dir else {
            info!("No font directory configured; using standard Helvetica");
            return Self::standard();
        };

        match (
            load_truetype(&dir.join(INTER_REGULAR_FILE)),
            load_truetype(&dir.join(INTER_BOLD_FILE)),
        ) {
            (Ok(regular), Ok(bold)) => {
                info!(dir = %dir.display(), "Embedding preferred typeface Inter");
                Self {
                    regular: ResolvedFont {
                        program: FontProgram::Embedded {
                            base_font: "Inter-Regular",
                            data: Arc::new(regular),
                        },
                        metrics: get_metrics(FontFamily::Inter, Weight::Regular),
                    },
                    bold: ResolvedFont {
                        program: FontProgram::Embedded {
                            base_font: "Inter-Bold",
                            data: Arc::new(bold),
                        },
                        metrics: get_metrics(FontFamily::Inter, Weight::Bold),
                    },
                }
            }
            (Err(e), _) | (_, Err(e)) => {
                warn!(dir = %dir.display(), "Preferred typeface unavailable ({e}); falling back to Helvetica");
                Self::standard()
            }
        }
    }

    pub fn face(&self, weight: Weight) -> &ResolvedFont {
        match weight {
            Weight::Regular => &self.regular,
            Weight::Bold => &self.bold,
        }
    }

    pub fn metrics(&self, weight: Weight) -> &'static FontMetricTable {
        self.face(weight).metrics
    }
}

fn load_truetype(path: &Path) -> Result<Vec<u8>, String> {
    let data = std::fs::read(path).map_err(|e| format!("{}: {e}", path.display()))?;
    // sfnt version tags for TrueType outlines
    match data.get(..4) {
        Some([0x00, 0x01, 0x00, 0x00]) | Some(b"true") => Ok(data),
        _ => Err(format!("{}: not a TrueType font", path.display())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_dir_uses_standard_fonts() {
        let fonts = FontSet::resolve(None);
        assert_eq!(fonts.regular.base_font(), "Helvetica");
        assert_eq!(fonts.bold.base_font(), "Helvetica-Bold");
    }

    #[test]
    fn test_missing_files_fall_back() {
        let dir = tempfile::tempdir().unwrap();
        let fonts = FontSet::resolve(Some(dir.path()));
        assert!(matches!(fonts.regular.program, FontProgram::Standard { .. }));
    }

    #[test]
    fn test_non_truetype_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(INTER_REGULAR_FILE), b"<html>not a font</html>").unwrap();
        std::fs::write(dir.path().join(INTER_BOLD_FILE), b"<html>not a font</html>").unwrap();
        let fonts = FontSet::resolve(Some(dir.path()));
        assert_eq!(fonts.regular.base_font(), "Helvetica");
    }

    #[test]
    fn test_truetype_files_are_embedded() {
        let dir = tempfile::tempdir().unwrap();
        let fake_ttf = [0x00, 0x01, 0x00, 0x00, 0x00, 0x0A];
        std::fs::write(dir.path().join(INTER_REGULAR_FILE), fake_ttf).unwrap();
        std::fs::write(dir.path().join(INTER_BOLD_FILE), fake_ttf).unwrap();
        let fonts = FontSet::resolve(Some(dir.path()));
        assert_eq!(fonts.bold.base_font(), "Inter-Bold");
        assert!(matches!(
            &fonts.regular.program,
            FontProgram::Embedded { data, .. } if data.len() == fake_ttf.len()
        ));
    }
}
