//! Single-page A4 PDF generation with `lopdf`.
//!
//! Two layouts are produced: one raster image placed unscaled near the
//! top-left corner, and plain text laid out one paragraph per line. Neither
//! paginates; content past the page edge is clipped by viewers.

use super::raster;
use super::scratch::Scratch;
use crate::error::{ConvertError, ConvertResult};
use image::{DynamicImage, ImageFormat};
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, Stream, dictionary};
use std::io::Cursor;
use tracing::debug;

pub const A4_WIDTH: f32 = 595.28;
pub const A4_HEIGHT: f32 = 841.89;

/// Distance of the image's top-left corner from the page's top-left corner.
const IMAGE_OFFSET: f32 = 10.0;
const IMAGE_NAME: &[u8] = b"Im1";

const FONT_NAME: &[u8] = b"F1";
const FONT_SIZE: f32 = 12.0;
const TEXT_MARGIN: f32 = 10.0;
const PARAGRAPH_GAP: f32 = 20.0;

fn generation_error(e: impl std::fmt::Display) -> ConvertError {
    ConvertError::PdfGeneration(e.to_string())
}

pub fn image_to_pdf(input: &[u8], scratch: &Scratch) -> ConvertResult<Vec<u8>> {
    let img = raster::decode(input)?;
    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
    let (width, height) = (rgb.width() as f32, rgb.height() as f32);

    let mut png = Vec::new();
    rgb.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(generation_error)?;

    // lopdf embeds images from a path; the file lives until this scope ends.
    let staged = scratch.write(".png", &png)?;
    let xobject = lopdf::xobject::image(staged.path()).map_err(generation_error)?;

    let mut doc = Document::with_version("1.5");
    let image_id = doc.add_object(xobject);
    let resources = dictionary! {
        "XObject" => dictionary! {
            "Im1" => image_id,
        },
    };

    let x = IMAGE_OFFSET;
    let y = A4_HEIGHT - IMAGE_OFFSET - height;
    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    width.into(),
                    0f32.into(),
                    0f32.into(),
                    height.into(),
                    x.into(),
                    y.into(),
                ],
            ),
            Operation::new("Do", vec![Object::Name(IMAGE_NAME.to_vec())]),
            Operation::new("Q", vec![]),
        ],
    };

    debug!("Placing {}x{} image on A4 page", width, height);
    finish_single_page(doc, resources, content)
}

/// Lays `text` out on one page: one Helvetica line per paragraph, with a
/// fixed gap between paragraphs.
pub fn text_to_pdf(text: &str) -> ConvertResult<Vec<u8>> {
    let mut doc = Document::with_version("1.5");
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources = dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    };

    let mut operations = Vec::new();
    let mut y = A4_HEIGHT - TEXT_MARGIN - FONT_SIZE;
    let paragraphs = split_paragraphs(text);
    for paragraph in &paragraphs {
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new(
            "Tf",
            vec![Object::Name(FONT_NAME.to_vec()), FONT_SIZE.into()],
        ));
        operations.push(Operation::new("Td", vec![TEXT_MARGIN.into(), y.into()]));
        operations.push(Operation::new(
            "Tj",
            vec![Object::string_literal(encode_win_ansi(paragraph))],
        ));
        operations.push(Operation::new("ET", vec![]));
        y -= FONT_SIZE + PARAGRAPH_GAP;
    }

    debug!("Laid out {} paragraphs", paragraphs.len());
    finish_single_page(doc, resources, Content { operations })
}

/// Splits on blank lines. Lines inside a paragraph are joined with spaces.
pub fn split_paragraphs(text: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            if !current.is_empty() {
                paragraphs.push(current.join(" "));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        paragraphs.push(current.join(" "));
    }
    paragraphs
}

/// Helvetica with WinAnsiEncoding covers Latin-1; anything else becomes `?`.
fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\t' => b' ',
            c if (c as u32) <= 0xFF => c as u8,
            _ => b'?',
        })
        .collect()
}

fn finish_single_page(
    mut doc: Document,
    resources: Dictionary,
    content: Content,
) -> ConvertResult<Vec<u8>> {
    let pages_id = doc.new_object_id();
    let encoded = content.encode().map_err(generation_error)?;
    let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources,
    });

    let media_box: Vec<Object> = vec![
        Object::Integer(0),
        Object::Integer(0),
        A4_WIDTH.into(),
        A4_HEIGHT.into(),
    ];
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![Object::Reference(page_id)],
        "Count" => 1,
        "MediaBox" => media_box,
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut buf = Vec::new();
    doc.save_to(&mut buf).map_err(generation_error)?;
    Ok(buf)
}
