//! Checkbox and radio rendering
//!
//! The drawn box has a fixed size (scaled with the page) and is centered in
//! the field rectangle, whatever size the user gave the field. The check
//! glyph comes from ZapfDingbats and is centered on the box using the
//! glyph's own metrics.

use crate::config::MarkStyle;
use crate::paint::{fill_color, op, real, stroke_color};
use lopdf::content::Operation;
use lopdf::{Object, StringFormat};
use shared_pdf::{PdfRect, Placement};
use shared_types::FieldKind;

/// Bezier control distance for a quarter circle
const KAPPA: f64 = 0.552_284_8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkShape {
    Checkbox,
    Radio,
}

impl MarkShape {
    pub fn for_kind(kind: FieldKind) -> Option<Self> {
        match kind {
            FieldKind::Checkbox => Some(MarkShape::Checkbox),
            FieldKind::Radio => Some(MarkShape::Radio),
            _ => None,
        }
    }

    fn glyph(&self) -> Glyph {
        match self {
            // ZapfDingbats a20 (check mark)
            MarkShape::Checkbox => Glyph {
                code: b'4',
                width: 0.846,
                y_min: -0.014,
                y_max: 0.705,
                size_ratio: 0.8,
            },
            // ZapfDingbats a71 (filled circle)
            MarkShape::Radio => Glyph {
                code: b'l',
                width: 0.791,
                y_min: -0.014,
                y_max: 0.708,
                size_ratio: 0.6,
            },
        }
    }
}

/// Glyph metrics in text space units (1/1000 em scaled to 1.0)
struct Glyph {
    code: u8,
    width: f64,
    y_min: f64,
    y_max: f64,
    /// Font size relative to the box side
    size_ratio: f64,
}

/// The box a checkbox or radio draws, centered in the field rectangle
pub fn mark_box(placement: &Placement, style: &MarkStyle) -> PdfRect {
    placement
        .rect
        .centered_square(placement.points(style.size))
}

/// Where the check glyph lands inside `bounds`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphPlacement {
    pub x: f64,
    pub y: f64,
    pub font_size: f64,
}

impl GlyphPlacement {
    pub fn center_in(bounds: &PdfRect, shape: MarkShape) -> Self {
        let glyph = shape.glyph();
        let font_size = bounds.width * glyph.size_ratio;
        let (cx, cy) = bounds.center();
        Self {
            x: cx - glyph.width * font_size / 2.0,
            y: cy - (glyph.y_min + glyph.y_max) / 2.0 * font_size,
            font_size,
        }
    }

    /// Center of the glyph's ink box
    pub fn ink_center(&self, shape: MarkShape) -> (f64, f64) {
        let glyph = shape.glyph();
        (
            self.x + glyph.width * self.font_size / 2.0,
            self.y + (glyph.y_min + glyph.y_max) / 2.0 * self.font_size,
        )
    }
}

pub(crate) fn border_operations(
    shape: MarkShape,
    bounds: &PdfRect,
    line_width: f64,
    style: &MarkStyle,
) -> Vec<Operation> {
    let mut ops = vec![
        op("w", vec![real(line_width)]),
        stroke_color(style.border_color),
    ];
    match shape {
        MarkShape::Checkbox => ops.push(op(
            "re",
            vec![
                real(bounds.x),
                real(bounds.y),
                real(bounds.width),
                real(bounds.height),
            ],
        )),
        MarkShape::Radio => ops.extend(circle_path(bounds)),
    }
    ops.push(op("S", vec![]));
    ops
}

pub(crate) fn glyph_operations(
    shape: MarkShape,
    font: Vec<u8>,
    bounds: &PdfRect,
    style: &MarkStyle,
) -> Vec<Operation> {
    let placement = GlyphPlacement::center_in(bounds, shape);
    vec![
        op("BT", vec![]),
        op("Tf", vec![Object::Name(font), real(placement.font_size)]),
        fill_color(style.check_color),
        op("Td", vec![real(placement.x), real(placement.y)]),
        op(
            "Tj",
            vec![Object::String(
                vec![shape.glyph().code],
                StringFormat::Literal,
            )],
        ),
        op("ET", vec![]),
    ]
}

fn circle_path(bounds: &PdfRect) -> Vec<Operation> {
    let (cx, cy) = bounds.center();
    let r = bounds.width / 2.0;
    let k = r * KAPPA;
    let curve = |c1: (f64, f64), c2: (f64, f64), end: (f64, f64)| {
        op(
            "c",
            vec![
                real(c1.0),
                real(c1.1),
                real(c2.0),
                real(c2.1),
                real(end.0),
                real(end.1),
            ],
        )
    };

    vec![
        op("m", vec![real(cx + r), real(cy)]),
        curve((cx + r, cy + k), (cx + k, cy + r), (cx, cy + r)),
        curve((cx - k, cy + r), (cx - r, cy + k), (cx - r, cy)),
        curve((cx - r, cy - k), (cx - k, cy - r), (cx, cy - r)),
        curve((cx + k, cy - r), (cx + r, cy - k), (cx + r, cy)),
        op("h", vec![]),
    ]
}
