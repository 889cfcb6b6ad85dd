//! Single-line text rendering with the built-in Helvetica font

use crate::config::TextLayout;
use crate::paint::{fill_color, op, real};
use lopdf::content::Operation;
use lopdf::{Object, StringFormat};
use shared_pdf::Placement;

/// Text encoded for a `/WinAnsiEncoding` font
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedText {
    pub bytes: Vec<u8>,
    /// Characters outside WinAnsi that were replaced with `?`
    pub replaced: usize,
}

/// Encode a string as WinAnsi (Windows-1252).
///
/// Control characters (including newlines) become spaces so the value
/// stays on one line.
pub fn encode_win_ansi(text: &str) -> EncodedText {
    let mut bytes = Vec::with_capacity(text.len());
    let mut replaced = 0;
    for ch in text.chars() {
        if ch.is_control() {
            bytes.push(b' ');
            continue;
        }
        match win_ansi_byte(ch) {
            Some(b) => bytes.push(b),
            None => {
                bytes.push(b'?');
                replaced += 1;
            }
        }
    }
    EncodedText { bytes, replaced }
}

fn win_ansi_byte(ch: char) -> Option<u8> {
    let code = ch as u32;
    if (0x20..0x7F).contains(&code) || (0xA0..=0xFF).contains(&code) {
        return Some(code as u8);
    }
    // The 0x80..=0x9F block differs from Latin-1
    let b = match ch {
        '€' => 0x80,
        '‚' => 0x82,
        'ƒ' => 0x83,
        '„' => 0x84,
        '…' => 0x85,
        '†' => 0x86,
        '‡' => 0x87,
        'ˆ' => 0x88,
        '‰' => 0x89,
        'Š' => 0x8A,
        '‹' => 0x8B,
        'Œ' => 0x8C,
        'Ž' => 0x8E,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '˜' => 0x98,
        '™' => 0x99,
        'š' => 0x9A,
        '›' => 0x9B,
        'œ' => 0x9C,
        'ž' => 0x9E,
        'Ÿ' => 0x9F,
        _ => return None,
    };
    Some(b)
}

/// Where the first glyph of a text field sits, in PDF space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextOrigin {
    pub x: f64,
    pub baseline: f64,
    pub font_size: f64,
}

impl TextOrigin {
    pub fn for_field(placement: &Placement, layout: &TextLayout) -> Self {
        let rect = placement.rect;
        let baseline = if rect.height > 0.0 {
            rect.top() - rect.height * layout.baseline_ratio
        } else {
            rect.top() - placement.points(layout.default_baseline_offset)
        };
        Self {
            x: rect.x + placement.points(layout.padding),
            baseline,
            font_size: placement.points(layout.font_size),
        }
    }
}

pub(crate) fn text_operations(
    font: Vec<u8>,
    origin: TextOrigin,
    layout: &TextLayout,
    text: Vec<u8>,
) -> Vec<Operation> {
    vec![
        op("BT", vec![]),
        op("Tf", vec![Object::Name(font), real(origin.font_size)]),
        fill_color(layout.color),
        op("Td", vec![real(origin.x), real(origin.baseline)]),
        op("Tj", vec![Object::String(text, StringFormat::Literal)]),
        op("ET", vec![]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use shared_pdf::PdfRect;

    fn placement(x: f64, y: f64, width: f64, height: f64, scale: f64) -> Placement {
        Placement {
            rect: PdfRect {
                x,
                y,
                width,
                height,
            },
            scale,
        }
    }

    #[test]
    fn test_ascii_passes_through() {
        let encoded = encode_win_ansi("Jane Doe <jane@example.com>");
        assert_eq!(encoded.bytes, b"Jane Doe <jane@example.com>".to_vec());
        assert_eq!(encoded.replaced, 0);
    }

    #[test]
    fn test_latin1_and_cp1252_specials() {
        let encoded = encode_win_ansi("Café – 5€ “ok”");
        assert_eq!(
            encoded.bytes,
            vec![
                b'C', b'a', b'f', 0xE9, b' ', 0x96, b' ', b'5', 0x80, b' ', 0x93, b'o', b'k', 0x94
            ]
        );
        assert_eq!(encoded.replaced, 0);
    }

    #[test]
    fn test_unsupported_characters_are_counted() {
        let encoded = encode_win_ansi("Łódź 漢");
        assert_eq!(encoded.bytes, b"?\xF3d? ?".to_vec());
        assert_eq!(encoded.replaced, 3);
    }

    #[test]
    fn test_control_characters_become_spaces() {
        assert_eq!(encode_win_ansi("a\nb\tc").bytes, b"a b c".to_vec());
    }

    #[test]
    fn test_origin_with_height() {
        let origin = TextOrigin::for_field(
            &placement(100.0, 700.0, 200.0, 20.0, 1.0),
            &TextLayout::default(),
        );
        assert_eq!(origin.x, 104.0);
        assert_eq!(origin.baseline, 720.0 - 20.0 * 0.65);
        assert_eq!(origin.font_size, 12.0);
    }

    #[test]
    fn test_origin_without_height_scales_defaults() {
        let origin = TextOrigin::for_field(
            &placement(200.0, 1500.0, 400.0, 0.0, 2.0),
            &TextLayout::default(),
        );
        assert_eq!(origin.x, 208.0);
        assert_eq!(origin.baseline, 1476.0);
        assert_eq!(origin.font_size, 24.0);
    }
}
