//! Builders and inspectors shared by the integration tests

#![allow(dead_code)]

use base64::{engine::general_purpose::STANDARD, Engine};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream};
use std::io::Cursor;

/// PDF whose pages have the given MediaBox sizes, each with existing content
pub fn pdf_with_pages(sizes: &[(i64, i64)]) -> Vec<u8> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();
    let mut kids = Vec::new();
    for &(width, height) in sizes {
        let content_id = doc.add_object(Stream::new(
            Dictionary::new(),
            b"2 w 0 0 1 RG 10 10 m 100 100 l S".to_vec(),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), width.into(), height.into()],
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Count" => sizes.len() as i64,
            "Kids" => kids,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

/// Solid-color RGBA PNG
pub fn png_rgba(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    let pixels: Vec<u8> = rgba
        .iter()
        .copied()
        .cycle()
        .take((width * height * 4) as usize)
        .collect();
    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(&pixels).unwrap();
    }
    out
}

/// Solid-color RGB JPEG
pub fn jpeg_rgb(width: u32, height: u32, rgb: [u8; 3]) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb(rgb));
    let mut out = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Jpeg)
        .unwrap();
    out
}

pub fn data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

pub fn load(bytes: &[u8]) -> Document {
    Document::load_mem(bytes).unwrap()
}

pub fn page_operations(doc: &Document, page: u32) -> Vec<Operation> {
    let page_id = doc.get_pages()[&page];
    let content = doc.get_page_content(page_id).unwrap();
    Content::decode(&content).unwrap().operations
}

/// Operands of every operation named `operator`, as numbers
pub fn numeric_operands(ops: &[Operation], operator: &str) -> Vec<Vec<f64>> {
    ops.iter()
        .filter(|op| op.operator == operator)
        .map(|op| {
            op.operands
                .iter()
                .map(|o| f64::from(o.as_float().unwrap()))
                .collect()
        })
        .collect()
}

/// Strings shown with `Tj`
pub fn shown_strings(ops: &[Operation]) -> Vec<Vec<u8>> {
    ops.iter()
        .filter(|op| op.operator == "Tj")
        .map(|op| op.operands[0].as_str().unwrap().to_vec())
        .collect()
}

/// Font size operands of every `Tf`
pub fn font_sizes(ops: &[Operation]) -> Vec<f64> {
    ops.iter()
        .filter(|op| op.operator == "Tf")
        .map(|op| f64::from(op.operands[1].as_float().unwrap()))
        .collect()
}

/// Page XObject resource (resolved stream dictionary) with the given name
pub fn xobject<'a>(doc: &'a Document, page: u32, name: &[u8]) -> &'a Stream {
    let page_id = doc.get_pages()[&page];
    let resources = doc
        .get_dictionary(page_id)
        .unwrap()
        .get(b"Resources")
        .unwrap()
        .as_dict()
        .unwrap();
    let id = resources
        .get(b"XObject")
        .unwrap()
        .as_dict()
        .unwrap()
        .get(name)
        .unwrap()
        .as_reference()
        .unwrap();
    doc.get_object(id).unwrap().as_stream().unwrap()
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-3,
        "expected {}, got {}",
        expected,
        actual
    );
}
