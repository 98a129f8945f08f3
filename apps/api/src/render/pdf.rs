//! PDF encoding of a laid-out display list.
//!
//! Output is byte-stable: lopdf writes objects in id order, object ids are
//! allocated in a fixed sequence, and no creation date or document id is
//! written. `F1` is the regular face, `F2` the bold face. Text is encoded as
//! WinAnsi single bytes; characters outside that code page become `?`.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use tracing::warn;

use crate::errors::AppError;
use crate::render::font_metrics::Weight;
use crate::render::fonts::{FontProgram, FontSet, ResolvedFont};
use crate::render::layout::{DisplayList, DrawOp};

const FIRST_CHAR: u8 = 32;
const LAST_CHAR: u8 = 255;

fn resource_name(weight: Weight) -> &'static str {
    match weight {
        Weight::Regular => "F1",
        Weight::Bold => "F2",
    }
}

/// Encodes `list` into a complete PDF file.
pub fn encode_pdf(list: &DisplayList, fonts: &FontSet) -> Result<Vec<u8>, AppError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = add_font(&mut doc, &fonts.regular);
    let bold_id = add_font(&mut doc, &fonts.bold);
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            resource_name(Weight::Regular) => regular_id,
            resource_name(Weight::Bold) => bold_id,
        },
    });

    let geometry = list.geometry;
    let mut kids: Vec<Object> = Vec::with_capacity(list.pages.len());
    let mut replaced = 0;
    for ops in &list.pages {
        let (content, page_replaced) = page_content(ops);
        replaced += page_replaced;
        let bytes = content
            .encode()
            .map_err(|e| AppError::RenderFailed(format!("content stream encoding failed: {e}")))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, bytes));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), geometry.width.into(), geometry.height.into()],
        });
        kids.push(page_id.into());
    }

    if replaced > 0 {
        warn!(replaced, "Characters outside WinAnsi were rendered as '?'");
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut buf = Vec::new();
    doc.save_to(&mut buf)
        .map_err(|e| AppError::RenderFailed(format!("PDF serialization failed: {e}")))?;
    Ok(buf)
}

/// Content stream for one page, plus how many characters had no WinAnsi code.
fn page_content(ops: &[DrawOp]) -> (Content, usize) {
    let mut operations = Vec::new();
    let mut replaced = 0;
    for op in ops {
        match op {
            DrawOp::Text {
                x,
                y,
                size,
                weight,
                text,
            } => {
                operations.push(Operation::new("BT", vec![]));
                operations.push(Operation::new(
                    "Tf",
                    vec![Object::Name(resource_name(*weight).as_bytes().to_vec()), (*size).into()],
                ));
                operations.push(Operation::new("Td", vec![(*x).into(), (*y).into()]));
                replaced += text.chars().filter(|c| win_ansi_byte(*c).is_none()).count();
                operations.push(Operation::new(
                    "Tj",
                    vec![Object::String(encode_win_ansi(text), StringFormat::Literal)],
                ));
                operations.push(Operation::new("ET", vec![]));
            }
            DrawOp::Rule { x1, x2, y, thickness } => {
                operations.push(Operation::new("w", vec![(*thickness).into()]));
                operations.push(Operation::new("m", vec![(*x1).into(), (*y).into()]));
                operations.push(Operation::new("l", vec![(*x2).into(), (*y).into()]));
                operations.push(Operation::new("S", vec![]));
            }
        }
    }
    (Content { operations }, replaced)
}

fn add_font(doc: &mut Document, font: &ResolvedFont) -> ObjectId {
    match &font.program {
        FontProgram::Standard { base_font } => doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => Object::Name(base_font.as_bytes().to_vec()),
            "Encoding" => "WinAnsiEncoding",
        }),
        FontProgram::Embedded { base_font, data } => {
            let name = Object::Name(base_font.as_bytes().to_vec());
            let file_id = doc.add_object(Stream::new(
                dictionary! { "Length1" => data.len() as i64 },
                data.to_vec(),
            ));

            let descriptor_id = doc.add_object(dictionary! {
                "Type" => "FontDescriptor",
                "FontName" => name.clone(),
                "Flags" => 32,
                "FontBBox" => vec![(-200).into(), (-250).into(), 1200.into(), 950.into()],
                "ItalicAngle" => 0,
                "Ascent" => 900,
                "Descent" => -220,
                "CapHeight" => 700,
                "StemV" => if font.metrics.weight == Weight::Bold { 140 } else { 80 },
                "FontFile2" => file_id,
            });

            let widths: Vec<Object> = (FIRST_CHAR..=LAST_CHAR)
                .map(|code| font.metrics.pdf_width(code).into())
                .collect();

            let mut dict = Dictionary::new();
            dict.set("Type", "Font");
            dict.set("Subtype", "TrueType");
            dict.set("BaseFont", name);
            dict.set("FirstChar", FIRST_CHAR as i64);
            dict.set("LastChar", LAST_CHAR as i64);
            dict.set("Widths", widths);
            dict.set("FontDescriptor", descriptor_id);
            dict.set("Encoding", "WinAnsiEncoding");
            doc.add_object(dict)
        }
    }
}

/// Maps text to WinAnsi (cp1252) bytes. Unmapped characters become `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars().map(|c| win_ansi_byte(c).unwrap_or(b'?')).collect()
}

fn win_ansi_byte(c: char) -> Option<u8> {
    let byte = match c {
        ' '..='~' => c as u8,
        '\t' => b' ',
        '\u{20AC}' => 0x80,
        '\u{2026}' => 0x85,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201C}' => 0x93,
        '\u{201D}' => 0x94,
        '\u{2022}' => 0x95,
        '\u{2013}' => 0x96,
        '\u{2014}' => 0x97,
        '\u{2122}' => 0x99,
        '\u{00A0}'..='\u{00FF}' => c as u32 as u8,
        _ => return None,
    };
    Some(byte)
}
