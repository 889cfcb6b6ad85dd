//! Open-once, draw-many embedding session
//!
//! Every draw resolves the field's page, converts its UI rectangle with the
//! shared transform and appends one isolated content stream to that page.
//! Inputs are decoded and the page resolved before the document is touched,
//! so a failed draw leaves the document as it was.

use crate::config::EmbedConfig;
use crate::error::{EmbedError, EmbedFailure};
use crate::field::FieldContent;
use crate::image::{EncodedImage, ImageBlob};
use crate::mark::{border_operations, glyph_operations, mark_box, MarkShape};
use crate::paint::{encode_isolated, op, real};
use crate::text::{encode_win_ansi, text_operations, TextOrigin};
use chrono::NaiveDate;
use lopdf::{Object, ObjectId};
use shared_pdf::{ui_rect_to_pdf, PdfDocument, PdfRect, Placement, ResolvedPage, StandardFont};
use shared_types::{FieldKind, FieldPosition};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Operation name reported in errors for a field kind
pub fn operation_name(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::Signature => "embed_signature",
        FieldKind::Initials => "embed_initials",
        FieldKind::Image => "embed_image",
        FieldKind::Text => "embed_text",
        FieldKind::Name => "embed_name",
        FieldKind::Hyperlink => "embed_hyperlink",
        FieldKind::Date => "embed_date",
        FieldKind::Checkbox => "embed_checkbox",
        FieldKind::Radio => "embed_radio",
    }
}

pub struct FieldStamper {
    pdf: PdfDocument,
    config: EmbedConfig,
    /// Pages whose original content is already enclosed in q/Q
    wrapped: HashSet<ObjectId>,
}

impl FieldStamper {
    /// Parse a PDF for a series of draws
    pub fn open(bytes: &[u8], config: EmbedConfig) -> Result<Self, EmbedError> {
        let pdf = PdfDocument::from_bytes(bytes).map_err(|e| EmbedError::document("load", e))?;
        Ok(Self {
            pdf,
            config,
            wrapped: HashSet::new(),
        })
    }

    pub fn config(&self) -> &EmbedConfig {
        &self.config
    }

    pub fn page_count(&self) -> u32 {
        self.pdf.page_count()
    }

    /// Draw any decoded content, dispatching on its shape
    pub fn draw(
        &mut self,
        kind: FieldKind,
        content: &FieldContent,
        position: &FieldPosition,
    ) -> Result<(), EmbedError> {
        match content {
            FieldContent::Image(blob) => self.draw_image(kind, blob, position),
            FieldContent::Text(text) => self.draw_text(kind, text, position),
            FieldContent::Date(date) => {
                if kind != FieldKind::Date {
                    return Err(field_error(
                        kind,
                        position,
                        EmbedFailure::ContentMismatch {
                            kind,
                            content: content.describe(),
                        },
                    ));
                }
                self.draw_date(*date, position)
            }
            FieldContent::Checked(checked) => self.draw_mark(kind, *checked, position),
        }
    }

    /// Draw an image stretched to fill the field rectangle
    pub fn draw_image(
        &mut self,
        kind: FieldKind,
        blob: &ImageBlob,
        position: &FieldPosition,
    ) -> Result<(), EmbedError> {
        self.image_field(kind, blob, position)
            .map_err(|source| field_error(kind, position, source))
    }

    /// Draw a single line of text (text, name and hyperlink fields)
    pub fn draw_text(
        &mut self,
        kind: FieldKind,
        text: &str,
        position: &FieldPosition,
    ) -> Result<(), EmbedError> {
        self.text_field(kind, text, position)
            .map_err(|source| field_error(kind, position, source))
    }

    /// Draw a date using the configured locale and pattern
    pub fn draw_date(&mut self, date: NaiveDate, position: &FieldPosition) -> Result<(), EmbedError> {
        let kind = FieldKind::Date;
        self.config
            .date
            .format(date)
            .and_then(|formatted| self.text_field(kind, &formatted, position))
            .map_err(|source| field_error(kind, position, source))
    }

    /// Draw a checkbox or radio mark
    pub fn draw_mark(
        &mut self,
        kind: FieldKind,
        checked: bool,
        position: &FieldPosition,
    ) -> Result<(), EmbedError> {
        self.mark_field(kind, checked, position)
            .map_err(|source| field_error(kind, position, source))
    }

    /// Serialize the edited document
    pub fn finish(mut self) -> Result<Vec<u8>, EmbedError> {
        self.pdf.save().map_err(|e| EmbedError::document("save", e))
    }

    fn image_field(
        &mut self,
        kind: FieldKind,
        blob: &ImageBlob,
        position: &FieldPosition,
    ) -> Result<(), EmbedFailure> {
        ensure_fits(kind, kind.is_image(), "image")?;
        let image = EncodedImage::decode(blob)?;
        let (page, placement) = self.place(position)?;

        self.isolate_page(page.id)?;
        let image_id = image.add_to(self.pdf.doc_mut());
        let name = self.pdf.register_xobject(page.id, image_id)?;

        let rect = placement.rect;
        let content = encode_isolated(vec![
            op(
                "cm",
                vec![
                    real(rect.width),
                    real(0.0),
                    real(0.0),
                    real(rect.height),
                    real(rect.x),
                    real(rect.y),
                ],
            ),
            op("Do", vec![Object::Name(name)]),
        ])?;
        self.pdf.append_page_content(page.id, content)?;

        log_drawn(kind, &page, &rect);
        Ok(())
    }

    fn text_field(
        &mut self,
        kind: FieldKind,
        text: &str,
        position: &FieldPosition,
    ) -> Result<(), EmbedFailure> {
        ensure_fits(
            kind,
            matches!(
                kind,
                FieldKind::Text | FieldKind::Name | FieldKind::Hyperlink | FieldKind::Date
            ),
            "text",
        )?;
        let encoded = encode_win_ansi(text);
        let (page, placement) = self.place(position)?;
        if encoded.replaced > 0 {
            warn!(
                "Replaced {} character(s) outside WinAnsi with '?' in {} field on page {}",
                encoded.replaced,
                kind,
                page.number
            );
        }

        self.isolate_page(page.id)?;
        let font = self.pdf.register_font(page.id, StandardFont::Helvetica)?;
        let origin = TextOrigin::for_field(&placement, &self.config.text);
        let content = encode_isolated(text_operations(
            font,
            origin,
            &self.config.text,
            encoded.bytes,
        ))?;
        self.pdf.append_page_content(page.id, content)?;

        log_drawn(kind, &page, &placement.rect);
        Ok(())
    }

    fn mark_field(
        &mut self,
        kind: FieldKind,
        checked: bool,
        position: &FieldPosition,
    ) -> Result<(), EmbedFailure> {
        let shape = MarkShape::for_kind(kind).ok_or(EmbedFailure::ContentMismatch {
            kind,
            content: "checked-state",
        })?;
        let (page, placement) = self.place(position)?;
        let style = &self.config.checkbox;
        let bounds = mark_box(&placement, style);
        let mut ops = border_operations(shape, &bounds, placement.points(style.border_width), style);

        self.isolate_page(page.id)?;
        if checked {
            let font = self.pdf.register_font(page.id, StandardFont::ZapfDingbats)?;
            ops.extend(glyph_operations(shape, font, &bounds, &self.config.checkbox));
        }
        let content = encode_isolated(ops)?;
        self.pdf.append_page_content(page.id, content)?;

        log_drawn(kind, &page, &bounds);
        Ok(())
    }

    fn place(&self, position: &FieldPosition) -> Result<(ResolvedPage, Placement), EmbedFailure> {
        let page = self
            .pdf
            .resolve_page(position.page, self.config.page_policy)?;
        let placement = ui_rect_to_pdf(position, &page.geometry);
        Ok((page, placement))
    }

    fn isolate_page(&mut self, page_id: ObjectId) -> Result<(), EmbedFailure> {
        if !self.wrapped.contains(&page_id) {
            self.pdf.wrap_page_contents(page_id)?;
            self.wrapped.insert(page_id);
        }
        Ok(())
    }
}

fn ensure_fits(kind: FieldKind, fits: bool, content: &'static str) -> Result<(), EmbedFailure> {
    if fits {
        Ok(())
    } else {
        Err(EmbedFailure::ContentMismatch { kind, content })
    }
}

fn field_error(kind: FieldKind, position: &FieldPosition, source: EmbedFailure) -> EmbedError {
    EmbedError::Field {
        operation: operation_name(kind),
        kind,
        page: position.page,
        source,
    }
}

fn log_drawn(kind: FieldKind, page: &ResolvedPage, rect: &PdfRect) {
    debug!(
        "Drew {} field on page {} at [{:.2}, {:.2}, {:.2}, {:.2}]",
        kind,
        page.number,
        rect.x,
        rect.y,
        rect.width,
        rect.height
    );
}
