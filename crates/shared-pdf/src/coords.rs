//! Coordinate transformation between editor (UI) space and PDF space
//!
//! The editor always renders a page at a fixed 612px width with a top-left
//! origin. PDF user space has a bottom-left origin and the page's native
//! size. One uniform scale (`page_width / 612`) maps both axes, since the
//! editor renders the whole page proportionally.

use shared_types::FieldPosition;

/// Width in UI pixels at which the editor renders every page
pub const UI_REFERENCE_WIDTH: f64 = 612.0;

/// Page box in PDF user space, as [x, y, width, height]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub origin_x: f64,
    pub origin_y: f64,
    pub width: f64,
    pub height: f64,
}

impl PageGeometry {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            origin_x: 0.0,
            origin_y: 0.0,
            width,
            height,
        }
    }

    pub fn from_media_box(media_box: [f64; 4]) -> Self {
        let [origin_x, origin_y, width, height] = media_box;
        Self {
            origin_x,
            origin_y,
            width,
            height,
        }
    }

    pub fn letter() -> Self {
        Self::new(612.0, 792.0)
    }

    pub fn a4() -> Self {
        Self::new(595.0, 842.0)
    }

    /// UI pixels to PDF points for this page
    pub fn scale(&self) -> f64 {
        self.width / UI_REFERENCE_WIDTH
    }
}

/// Rectangle in PDF space, bottom-left corner plus size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PdfRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PdfRect {
    pub fn top(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// A `size`×`size` square sharing this rectangle's center
    pub fn centered_square(&self, size: f64) -> PdfRect {
        PdfRect {
            x: self.x + (self.width - size) / 2.0,
            y: self.y + (self.height - size) / 2.0,
            width: size,
            height: size,
        }
    }
}

/// A field rectangle placed on a concrete page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub rect: PdfRect,
    pub scale: f64,
}

impl Placement {
    /// Scale a UI-pixel length (font size, padding, ...) to PDF points
    pub fn points(&self, ui_length: f64) -> f64 {
        ui_length * self.scale
    }
}

/// Convert a UI-space field rectangle to PDF space.
///
/// `pdf_y` is the bottom edge: the UI top edge flipped, minus the scaled
/// height. Zero-sized fields yield a zero-area rectangle.
pub fn ui_rect_to_pdf(position: &FieldPosition, page: &PageGeometry) -> Placement {
    let scale = page.scale();
    let width = position.width * scale;
    let height = position.height * scale;
    let (x, top) = ui_point_to_pdf(position.x, position.y, page);

    Placement {
        rect: PdfRect {
            x,
            y: top - height,
            width,
            height,
        },
        scale,
    }
}

/// Convert a UI point (top-left origin) to a PDF point (bottom-left origin)
pub fn ui_point_to_pdf(ui_x: f64, ui_y: f64, page: &PageGeometry) -> (f64, f64) {
    let scale = page.scale();
    let pdf_x = page.origin_x + ui_x * scale;
    let pdf_y = page.origin_y + page.height - ui_y * scale;
    (pdf_x, pdf_y)
}

/// Convert a PDF point back to UI space
pub fn pdf_point_to_ui(pdf_x: f64, pdf_y: f64, page: &PageGeometry) -> (f64, f64) {
    let scale = page.scale();
    let ui_x = (pdf_x - page.origin_x) / scale;
    let ui_y = (page.origin_y + page.height - pdf_y) / scale;
    (ui_x, ui_y)
}
