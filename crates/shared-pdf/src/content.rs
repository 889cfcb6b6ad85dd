//! Page resources and content streams
//!
//! New drawing is appended as separate content streams; existing streams
//! are never rewritten.

use crate::error::PdfError;
use crate::parser::PdfDocument;
use lopdf::{Dictionary, Object, ObjectId, Stream};

/// Standard 14 fonts used for field rendering (never embedded)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardFont {
    Helvetica,
    ZapfDingbats,
}

impl StandardFont {
    pub fn base_name(&self) -> &'static str {
        match self {
            StandardFont::Helvetica => "Helvetica",
            StandardFont::ZapfDingbats => "ZapfDingbats",
        }
    }

    /// Symbol fonts keep their built-in encoding
    fn encoding(&self) -> Option<&'static str> {
        match self {
            StandardFont::Helvetica => Some("WinAnsiEncoding"),
            StandardFont::ZapfDingbats => None,
        }
    }

    fn dictionary(&self) -> Dictionary {
        let mut font = Dictionary::new();
        font.set("Type", Object::Name(b"Font".to_vec()));
        font.set("Subtype", Object::Name(b"Type1".to_vec()));
        font.set("BaseFont", Object::Name(self.base_name().as_bytes().to_vec()));
        if let Some(encoding) = self.encoding() {
            font.set("Encoding", Object::Name(encoding.as_bytes().to_vec()));
        }
        font
    }

    fn matches(&self, font: &Dictionary) -> bool {
        name_entry(font, b"Subtype") == Some(b"Type1".as_slice())
            && name_entry(font, b"BaseFont") == Some(self.base_name().as_bytes())
            && name_entry(font, b"Encoding") == self.encoding().map(str::as_bytes)
    }
}

impl PdfDocument {
    /// Make `font` available on the page; returns its resource name
    pub fn register_font(
        &mut self,
        page_id: ObjectId,
        font: StandardFont,
    ) -> Result<Vec<u8>, PdfError> {
        let fonts = self.resource_category_mut(page_id, b"Font")?;

        let existing = fonts.iter().find_map(|(name, obj)| match obj {
            Object::Dictionary(dict) if font.matches(dict) => Some(name.clone()),
            _ => None,
        });
        if let Some(name) = existing {
            return Ok(name);
        }

        let name = unique_name(fonts, "FsF");
        fonts.set(name.clone(), Object::Dictionary(font.dictionary()));
        Ok(name)
    }

    /// Make an XObject available on the page; returns its resource name
    pub fn register_xobject(
        &mut self,
        page_id: ObjectId,
        xobject_id: ObjectId,
    ) -> Result<Vec<u8>, PdfError> {
        let xobjects = self.resource_category_mut(page_id, b"XObject")?;
        let name = unique_name(xobjects, "FsIm");
        xobjects.set(name.clone(), Object::Reference(xobject_id));
        Ok(name)
    }

    /// Enclose the page's existing content in q/Q so leftover graphics
    /// state cannot leak into content appended afterwards
    pub fn wrap_page_contents(&mut self, page_id: ObjectId) -> Result<(), PdfError> {
        let mut streams = self.content_streams(page_id)?;
        if streams.is_empty() {
            return Ok(());
        }

        let doc = self.doc_mut();
        let open = doc.add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
        let close = doc.add_object(Stream::new(Dictionary::new(), b"\nQ\n".to_vec()));
        streams.insert(0, Object::Reference(open));
        streams.push(Object::Reference(close));

        self.set_contents(page_id, streams)
    }

    /// Append a content stream to the page, drawn over existing content
    pub fn append_page_content(
        &mut self,
        page_id: ObjectId,
        content: Vec<u8>,
    ) -> Result<(), PdfError> {
        let mut streams = self.content_streams(page_id)?;

        let mut data = Vec::with_capacity(content.len() + 2);
        data.push(b'\n');
        data.extend_from_slice(&content);
        data.push(b'\n');
        let stream_id = self
            .doc_mut()
            .add_object(Stream::new(Dictionary::new(), data));
        streams.push(Object::Reference(stream_id));

        self.set_contents(page_id, streams)
    }

    /// Current content streams of a page as a list of references
    fn content_streams(&self, page_id: ObjectId) -> Result<Vec<Object>, PdfError> {
        let page = self.page_dict(page_id)?;
        match page.get(b"Contents") {
            Err(_) => Ok(Vec::new()),
            Ok(Object::Array(items)) => Ok(items.clone()),
            Ok(Object::Reference(id)) => match self.doc().get_object(*id) {
                Ok(Object::Array(items)) => Ok(items.clone()),
                Ok(Object::Stream(_)) => Ok(vec![Object::Reference(*id)]),
                Ok(_) => Err(PdfError::Structure(
                    "Page Contents is neither a stream nor an array".to_string(),
                )),
                Err(e) => Err(PdfError::structure("Failed to resolve page Contents", e)),
            },
            Ok(_) => Err(PdfError::Structure(
                "Page Contents must be a reference or an array".to_string(),
            )),
        }
    }

    fn set_contents(&mut self, page_id: ObjectId, streams: Vec<Object>) -> Result<(), PdfError> {
        self.page_dict_mut(page_id)?
            .set("Contents", Object::Array(streams));
        Ok(())
    }

    /// Resource sub-dictionary (`Font`, `XObject`, ...) of a page, created if missing
    fn resource_category_mut(
        &mut self,
        page_id: ObjectId,
        category: &[u8],
    ) -> Result<&mut Dictionary, PdfError> {
        let resources_id = self.materialize_resources(page_id)?;

        let category_ref = {
            let resources = match resources_id {
                Some(id) => self.doc().get_object(id).and_then(Object::as_dict),
                None => self
                    .doc()
                    .get_object(page_id)
                    .and_then(Object::as_dict)
                    .and_then(|page| page.get(b"Resources"))
                    .and_then(Object::as_dict),
            }
            .map_err(|e| PdfError::structure("Resources is not a dictionary", e))?;
            resources.get(category).and_then(Object::as_reference).ok()
        };

        let doc = self.doc_mut();
        if let Some(id) = category_ref {
            return doc
                .get_object_mut(id)
                .and_then(Object::as_dict_mut)
                .map_err(|e| PdfError::structure("Resource category is not a dictionary", e));
        }

        let resources = match resources_id {
            Some(id) => doc.get_object_mut(id).and_then(Object::as_dict_mut),
            None => doc
                .get_object_mut(page_id)
                .and_then(Object::as_dict_mut)
                .and_then(|page| page.get_mut(b"Resources"))
                .and_then(Object::as_dict_mut),
        }
        .map_err(|e| PdfError::structure("Resources is not a dictionary", e))?;

        if !matches!(resources.get(category), Ok(Object::Dictionary(_))) {
            resources.set(category.to_vec(), Dictionary::new());
        }
        resources
            .get_mut(category)
            .and_then(Object::as_dict_mut)
            .map_err(|e| PdfError::structure("Resource category is not a dictionary", e))
    }

    /// Ensure the page carries its own Resources entry.
    ///
    /// Returns the object id when Resources is an indirect object, `None`
    /// when it is a direct dictionary on the page. Inherited resources are
    /// copied onto the page first.
    fn materialize_resources(&mut self, page_id: ObjectId) -> Result<Option<ObjectId>, PdfError> {
        match self.page_dict(page_id)?.get(b"Resources") {
            Ok(Object::Reference(id)) => return Ok(Some(*id)),
            Ok(Object::Dictionary(_)) => return Ok(None),
            Ok(_) => {
                return Err(PdfError::Structure(
                    "Page Resources is neither a dictionary nor a reference".to_string(),
                ))
            }
            Err(_) => {}
        }

        let inherited = match self.inherited_attribute(page_id, b"Resources")? {
            Some(obj) => self
                .resolve(obj)?
                .as_dict()
                .map(|dict| dict.clone())
                .map_err(|e| PdfError::structure("Inherited Resources is not a dictionary", e))?,
            None => Dictionary::new(),
        };

        self.page_dict_mut(page_id)?
            .set("Resources", Object::Dictionary(inherited));
        Ok(None)
    }

    fn page_dict(&self, page_id: ObjectId) -> Result<&Dictionary, PdfError> {
        self.doc()
            .get_object(page_id)
            .and_then(Object::as_dict)
            .map_err(|e| PdfError::structure("Page is not a dictionary", e))
    }

    fn page_dict_mut(&mut self, page_id: ObjectId) -> Result<&mut Dictionary, PdfError> {
        self.doc_mut()
            .get_object_mut(page_id)
            .and_then(Object::as_dict_mut)
            .map_err(|e| PdfError::structure("Page is not a dictionary", e))
    }
}

fn name_entry<'a>(dict: &'a Dictionary, key: &[u8]) -> Option<&'a [u8]> {
    match dict.get(key) {
        Ok(Object::Name(name)) => Some(name.as_slice()),
        _ => None,
    }
}

fn unique_name(dict: &Dictionary, prefix: &str) -> Vec<u8> {
    (1u32..)
        .map(|n| format!("{}{}", prefix, n).into_bytes())
        .find(|candidate| !dict.has(candidate))
        .unwrap_or_else(|| prefix.as_bytes().to_vec())
}
