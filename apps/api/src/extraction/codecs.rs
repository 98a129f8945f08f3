//! Text codecs for the two supported upload formats.
//!
//! Both decode from a staged file path and return plain text in reading order.
//! Styling, layout and images are discarded.

use std::path::Path;

use docx_rs::{
    DocumentChild, Paragraph, ParagraphChild, RunChild, Table, TableCellContent, TableChild,
    TableRowChild,
};

use crate::errors::AppError;

/// PDF → text via `pdf-extract`. Column and table structure is best-effort.
pub fn pdf_text(path: &Path) -> Result<String, AppError> {
    pdf_extract::extract_text(path)
        .map_err(|e| AppError::ExtractionFailed(format!("PDF decode failed: {e}")))
}

/// DOCX → text via `docx-rs`, one line per paragraph. Table cells are read row by row.
pub fn docx_text(path: &Path) -> Result<String, AppError> {
    let bytes = std::fs::read(path)
        .map_err(|e| AppError::ExtractionFailed(format!("could not read staged file: {e}")))?;
    let docx = docx_rs::read_docx(&bytes)
        .map_err(|e| AppError::ExtractionFailed(format!("DOCX decode failed: {e}")))?;

    let mut text = String::new();
    for child in &docx.document.children {
        match child {
            DocumentChild::Paragraph(p) => push_paragraph(p, &mut text),
            DocumentChild::Table(t) => push_table(t, &mut text),
            _ => {}
        }
    }
    Ok(text)
}

fn push_paragraph(paragraph: &Paragraph, out: &mut String) {
    for child in &paragraph.children {
        if let ParagraphChild::Run(run) = child {
            for run_child in &run.children {
                match run_child {
                    RunChild::Text(t) => out.push_str(&t.text),
                    RunChild::Tab(_) => out.push('\t'),
                    RunChild::Break(_) => out.push('\n'),
                    _ => {}
                }
            }
        }
    }
    out.push('\n');
}

fn push_table(table: &Table, out: &mut String) {
    for row in &table.rows {
        let TableChild::TableRow(row) = row;
        for cell in &row.cells {
            let TableRowChild::TableCell(cell) = cell;
            for content in &cell.children {
                match content {
                    TableCellContent::Paragraph(p) => push_paragraph(p, out),
                    TableCellContent::Table(t) => push_table(t, out),
                    _ => {}
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docx_rs::{Docx, Run};
    use std::io::{Cursor, Write};

    fn write_temp(bytes: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(bytes).unwrap();
        file
    }

    fn sample_docx() -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        Docx::new()
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("Jane Doe")))
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("jane@x.com")))
            .build()
            .pack(&mut buf)
            .unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_docx_text_one_line_per_paragraph() {
        let file = write_temp(&sample_docx());
        let text = docx_text(file.path()).unwrap();
        assert_eq!(text, "Jane Doe\njane@x.com\n");
    }

    #[test]
    fn test_docx_text_rejects_garbage() {
        let file = write_temp(b"definitely not a zip archive");
        assert!(matches!(
            docx_text(file.path()),
            Err(AppError::ExtractionFailed(_))
        ));
    }
}
