//! PDF loading, page lookup and serialization using lopdf

use crate::coords::PageGeometry;
use crate::error::PdfError;
use lopdf::{Dictionary, Document, Object, ObjectId};
use serde::{Deserialize, Serialize};

/// Parent chains deeper than this are treated as malformed
const MAX_INHERITANCE_DEPTH: usize = 64;

/// What to do when a field names a page the document does not have
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PagePolicy {
    /// Fall back to page 1 and log a warning
    #[default]
    Lenient,
    /// Fail with `PdfError::PageOutOfRange`
    Strict,
}

/// A page resolved from a 1-based field page index
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedPage {
    /// 1-based page number actually used
    pub number: u32,
    pub id: ObjectId,
    pub geometry: PageGeometry,
    /// True when the requested page was out of range and page 1 was used
    pub fell_back: bool,
}

/// Wrapper around lopdf::Document for whole-buffer-in, whole-buffer-out edits
pub struct PdfDocument {
    doc: Document,
}

impl PdfDocument {
    /// Load a PDF from raw bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PdfError> {
        let doc = Document::load_mem(bytes).map_err(|e| PdfError::Parse(e.to_string()))?;
        Ok(Self { doc })
    }

    pub fn doc(&self) -> &Document {
        &self.doc
    }

    pub fn doc_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    /// Get the number of pages
    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// Get page object ID for a given page number (1-indexed)
    pub fn page_id(&self, page_num: u32) -> Option<ObjectId> {
        self.doc.get_pages().get(&page_num).copied()
    }

    /// Resolve a field's page index under the given policy
    pub fn resolve_page(
        &self,
        requested: u32,
        policy: PagePolicy,
    ) -> Result<ResolvedPage, PdfError> {
        let pages = self.doc.get_pages();
        let page_count = pages.len() as u32;
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        let (number, fell_back) = match pages.get(&requested) {
            Some(_) => (requested, false),
            None => match policy {
                PagePolicy::Strict => {
                    return Err(PdfError::PageOutOfRange {
                        requested,
                        page_count,
                    })
                }
                PagePolicy::Lenient => {
                    tracing::warn!(
                        "Field page {} is out of range (document has {} pages), using page 1",
                        requested,
                        page_count
                    );
                    (1, true)
                }
            },
        };

        let id = pages
            .get(&number)
            .copied()
            .ok_or(PdfError::PageOutOfRange {
                requested,
                page_count,
            })?;
        let geometry = self.page_geometry(id)?;

        Ok(ResolvedPage {
            number,
            id,
            geometry,
            fell_back,
        })
    }

    /// Page box of a page, read from its (possibly inherited) MediaBox
    pub fn page_geometry(&self, page_id: ObjectId) -> Result<PageGeometry, PdfError> {
        match self.inherited_attribute(page_id, b"MediaBox")? {
            Some(media_box) => Ok(PageGeometry::from_media_box(self.parse_rect(media_box)?)),
            // Default to US Letter size
            None => Ok(PageGeometry::letter()),
        }
    }

    /// Look up a page attribute, walking up the Parent chain when absent
    pub fn inherited_attribute(
        &self,
        page_id: ObjectId,
        key: &[u8],
    ) -> Result<Option<&Object>, PdfError> {
        let mut node = self.dict(page_id)?;
        for _ in 0..MAX_INHERITANCE_DEPTH {
            if let Ok(value) = node.get(key) {
                return Ok(Some(value));
            }
            match node.get(b"Parent").and_then(Object::as_reference) {
                Ok(parent_id) => node = self.dict(parent_id)?,
                Err(_) => return Ok(None),
            }
        }
        Err(PdfError::Structure(format!(
            "Page tree deeper than {} levels",
            MAX_INHERITANCE_DEPTH
        )))
    }

    /// Follow a reference if `obj` is one
    pub fn resolve<'a>(&'a self, obj: &'a Object) -> Result<&'a Object, PdfError> {
        match obj {
            Object::Reference(id) => self
                .doc
                .get_object(*id)
                .map_err(|e| PdfError::structure("Failed to resolve reference", e)),
            other => Ok(other),
        }
    }

    /// Serialize to a new byte buffer
    pub fn save(&mut self) -> Result<Vec<u8>, PdfError> {
        let mut output = Vec::new();
        self.doc
            .save_to(&mut output)
            .map_err(|e| PdfError::Serialize(e.to_string()))?;
        Ok(output)
    }

    fn dict(&self, id: ObjectId) -> Result<&Dictionary, PdfError> {
        self.doc
            .get_object(id)
            .and_then(Object::as_dict)
            .map_err(|e| PdfError::structure("Expected a dictionary", e))
    }

    /// Parse a PDF rectangle array into [x, y, width, height]
    fn parse_rect(&self, obj: &Object) -> Result<[f64; 4], PdfError> {
        let arr = self
            .resolve(obj)?
            .as_array()
            .map_err(|_| PdfError::Structure("MediaBox is not an array".to_string()))?;

        if arr.len() != 4 {
            return Err(PdfError::Structure(format!(
                "MediaBox has {} elements, expected 4",
                arr.len()
            )));
        }

        let mut values = [0.0f64; 4];
        for (i, obj) in arr.iter().enumerate() {
            values[i] = self.extract_number(obj)?;
        }

        // Normalize corners, then convert from [x1, y1, x2, y2] to [x, y, width, height]
        let (x1, x2) = (values[0].min(values[2]), values[0].max(values[2]));
        let (y1, y2) = (values[1].min(values[3]), values[1].max(values[3]));
        Ok([x1, y1, x2 - x1, y2 - y1])
    }

    /// Extract a number from a PDF object
    fn extract_number(&self, obj: &Object) -> Result<f64, PdfError> {
        match self.resolve(obj)? {
            Object::Integer(i) => Ok(*i as f64),
            Object::Real(r) => Ok(*r as f64),
            other => Err(PdfError::Structure(format!(
                "Expected a number, found {:?}",
                other
            ))),
        }
    }
}

/// Number of pages in a PDF byte buffer
pub fn page_count(bytes: &[u8]) -> Result<u32, PdfError> {
    Ok(PdfDocument::from_bytes(bytes)?.page_count())
}
