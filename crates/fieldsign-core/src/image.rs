//! Raster image decoding for signature, initials and image fields
//!
//! PNG and JPEG take different paths: PNG is decoded to raw samples and
//! re-compressed with Flate (alpha becomes a soft mask), JPEG is validated
//! and passed through untouched under `/DCTDecode`.

use crate::error::EmbedFailure;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::fmt;
use std::io::{Cursor, Write};

const PNG_MAGIC: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
const JPEG_MAGIC: [u8; 3] = [0xFF, 0xD8, 0xFF];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
}

impl ImageFormat {
    /// Detect the format from the leading magic bytes
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(&PNG_MAGIC) {
            Some(ImageFormat::Png)
        } else if bytes.starts_with(&JPEG_MAGIC) {
            Some(ImageFormat::Jpeg)
        } else {
            None
        }
    }

    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/png" => Some(ImageFormat::Png),
            "image/jpeg" | "image/jpg" | "image/pjpeg" => Some(ImageFormat::Jpeg),
            _ => None,
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageFormat::Png => f.write_str("PNG"),
            ImageFormat::Jpeg => f.write_str("JPEG"),
        }
    }
}

/// Image bytes plus the media type they were declared with, if any
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBlob {
    bytes: Vec<u8>,
    mime: Option<String>,
}

impl ImageBlob {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes, mime: None }
    }

    pub fn with_mime(bytes: Vec<u8>, mime: impl Into<String>) -> Self {
        Self {
            bytes,
            mime: Some(mime.into()),
        }
    }

    /// Parse a `data:image/...;base64,` URL, or bare base64
    pub fn from_data_url(input: &str) -> Result<Self, EmbedFailure> {
        let input = input.trim();
        let Some(rest) = input.strip_prefix("data:") else {
            return Ok(Self::new(decode_base64(input)?));
        };

        let (meta, payload) = rest.split_once(',').ok_or_else(|| {
            EmbedFailure::InvalidDataUrl("missing ',' before the payload".to_string())
        })?;
        let mut params = meta.split(';');
        let mime = params
            .next()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_ascii_lowercase);
        if !params.any(|p| p.trim().eq_ignore_ascii_case("base64")) {
            return Err(EmbedFailure::InvalidDataUrl(
                "only base64-encoded data URLs are supported".to_string(),
            ));
        }

        Ok(Self {
            bytes: decode_base64(payload)?,
            mime,
        })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mime(&self) -> Option<&str> {
        self.mime.as_deref()
    }

    /// Resolve the format: magic bytes first, declared media type second
    pub fn format(&self) -> Result<ImageFormat, EmbedFailure> {
        let sniffed = ImageFormat::sniff(&self.bytes);
        let declared = self.mime.as_deref().and_then(ImageFormat::from_mime);

        match (sniffed, declared) {
            (Some(actual), Some(claimed)) if actual != claimed => {
                tracing::warn!(
                    "Image declared as {} but contains {} data, decoding as {}",
                    claimed,
                    actual,
                    actual
                );
                Ok(actual)
            }
            (Some(actual), _) => Ok(actual),
            (None, Some(claimed)) => Ok(claimed),
            (None, None) => Err(EmbedFailure::UnsupportedImageFormat(
                self.mime
                    .clone()
                    .unwrap_or_else(|| "unrecognized image header".to_string()),
            )),
        }
    }
}

fn decode_base64(payload: &str) -> Result<Vec<u8>, EmbedFailure> {
    let cleaned: String = payload
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    BASE64
        .decode(cleaned)
        .map_err(|e| EmbedFailure::InvalidDataUrl(format!("invalid base64 payload: {}", e)))
}

/// Image samples ready to become a PDF image XObject
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct EncodedImage {
    pub width: u32,
    pub height: u32,
    pub color_space: &'static str,
    pub filter: &'static str,
    pub data: Vec<u8>,
    /// Flate-compressed 8-bit alpha, present only when some pixel is not opaque
    pub soft_mask: Option<Vec<u8>>,
}

impl EncodedImage {
    pub fn decode(blob: &ImageBlob) -> Result<Self, EmbedFailure> {
        match blob.format()? {
            ImageFormat::Png => decode_png(blob.bytes()),
            ImageFormat::Jpeg => decode_jpeg(blob.bytes()),
        }
    }

    /// Add the image (and its soft mask) to the document
    pub fn add_to(self, doc: &mut Document) -> ObjectId {
        let EncodedImage {
            width,
            height,
            color_space,
            filter,
            data,
            soft_mask,
        } = self;

        let mask_id = soft_mask.map(|mask| {
            doc.add_object(image_stream(
                width,
                height,
                "DeviceGray",
                "FlateDecode",
                mask,
                None,
            ))
        });
        doc.add_object(image_stream(
            width,
            height,
            color_space,
            filter,
            data,
            mask_id,
        ))
    }
}

fn image_stream(
    width: u32,
    height: u32,
    color_space: &str,
    filter: &str,
    data: Vec<u8>,
    soft_mask: Option<ObjectId>,
) -> Stream {
    let mut dict = Dictionary::new();
    dict.set("Type", Object::Name(b"XObject".to_vec()));
    dict.set("Subtype", Object::Name(b"Image".to_vec()));
    dict.set("Width", Object::Integer(width as i64));
    dict.set("Height", Object::Integer(height as i64));
    dict.set("ColorSpace", Object::Name(color_space.as_bytes().to_vec()));
    dict.set("BitsPerComponent", Object::Integer(8));
    dict.set("Filter", Object::Name(filter.as_bytes().to_vec()));
    if let Some(mask_id) = soft_mask {
        dict.set("SMask", Object::Reference(mask_id));
    }
    // Data is already encoded with `filter`
    Stream::new(dict, data).with_compression(false)
}

fn decode_png(bytes: &[u8]) -> Result<EncodedImage, EmbedFailure> {
    let png_error = |e: png::DecodingError| EmbedFailure::ImageDecode {
        format: ImageFormat::Png,
        reason: e.to_string(),
    };

    let mut decoder = png::Decoder::new(Cursor::new(bytes));
    // Palette and sub-byte samples become 8-bit, 16-bit samples are stripped
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder.read_info().map_err(png_error)?;
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf).map_err(png_error)?;
    let pixels = &buf[..info.buffer_size()];

    let (color_channels, has_alpha, color_space) = match info.color_type {
        png::ColorType::Rgb => (3, false, "DeviceRGB"),
        png::ColorType::Rgba => (3, true, "DeviceRGB"),
        png::ColorType::Grayscale => (1, false, "DeviceGray"),
        png::ColorType::GrayscaleAlpha => (1, true, "DeviceGray"),
        png::ColorType::Indexed => {
            return Err(EmbedFailure::ImageDecode {
                format: ImageFormat::Png,
                reason: "palette was not expanded".to_string(),
            })
        }
    };
    let stride = color_channels + usize::from(has_alpha);

    let pixel_count = (info.width as usize) * (info.height as usize);
    let mut color = Vec::with_capacity(pixel_count * color_channels);
    let mut alpha = Vec::with_capacity(if has_alpha { pixel_count } else { 0 });
    for pixel in pixels.chunks_exact(stride) {
        color.extend_from_slice(&pixel[..color_channels]);
        if has_alpha {
            alpha.push(pixel[color_channels]);
        }
    }
    let translucent = alpha.iter().any(|&a| a != 255);

    Ok(EncodedImage {
        width: info.width,
        height: info.height,
        color_space,
        filter: "FlateDecode",
        data: flate_compress(&color)?,
        soft_mask: if translucent {
            Some(flate_compress(&alpha)?)
        } else {
            None
        },
    })
}

fn decode_jpeg(bytes: &[u8]) -> Result<EncodedImage, EmbedFailure> {
    // Full decode so truncated or corrupt data is rejected here, not by the viewer
    let decoded = image::load_from_memory_with_format(bytes, image::ImageFormat::Jpeg).map_err(
        |e| EmbedFailure::ImageDecode {
            format: ImageFormat::Jpeg,
            reason: e.to_string(),
        },
    )?;

    let color_space = match decoded.color() {
        image::ColorType::L8 | image::ColorType::L16 => "DeviceGray",
        _ => "DeviceRGB",
    };

    Ok(EncodedImage {
        width: decoded.width(),
        height: decoded.height(),
        color_space,
        filter: "DCTDecode",
        data: bytes.to_vec(),
        soft_mask: None,
    })
}

fn flate_compress(data: &[u8]) -> Result<Vec<u8>, EmbedFailure> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .and_then(|_| encoder.finish())
        .map_err(|e| EmbedFailure::ImageEncode(e.to_string()))
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::io::Cursor;

    /// Encode an 8-bit PNG
    pub fn encode_png(width: u32, height: u32, color: png::ColorType, pixels: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, width, height);
            encoder.set_color(color);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(pixels).unwrap();
        }
        out
    }

    /// Encode an RGB JPEG of a solid color
    pub fn encode_jpeg(width: u32, height: u32, rgb: [u8; 3]) -> Vec<u8> {
        let img = image::RgbImage::from_pixel(width, height, image::Rgb(rgb));
        let mut out = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Jpeg)
            .unwrap();
        out
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{encode_jpeg, encode_png};
    use super::*;
    use flate2::read::ZlibDecoder;
    use pretty_assertions::assert_eq;
    use std::io::Read;

    fn inflate(data: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        ZlibDecoder::new(data).read_to_end(&mut out).unwrap();
        out
    }

    #[test]
    fn test_sniff_magic() {
        assert_eq!(ImageFormat::sniff(&PNG_MAGIC), Some(ImageFormat::Png));
        assert_eq!(
            ImageFormat::sniff(&[0xFF, 0xD8, 0xFF, 0xE0]),
            Some(ImageFormat::Jpeg)
        );
        assert_eq!(ImageFormat::sniff(b"GIF89a"), None);
    }

    #[test]
    fn test_data_url_keeps_mime() {
        let bytes = encode_png(1, 1, png::ColorType::Rgb, &[1, 2, 3]);
        let url = format!("data:image/png;base64,{}", BASE64.encode(&bytes));
        let blob = ImageBlob::from_data_url(&url).unwrap();
        assert_eq!(blob.bytes(), bytes.as_slice());
        assert_eq!(blob.mime(), Some("image/png"));
        assert_eq!(blob.format().unwrap(), ImageFormat::Png);
    }

    #[test]
    fn test_bare_base64_is_accepted() {
        let bytes = encode_jpeg(2, 2, [10, 20, 30]);
        let blob = ImageBlob::from_data_url(&BASE64.encode(&bytes)).unwrap();
        assert_eq!(blob.format().unwrap(), ImageFormat::Jpeg);
        assert_eq!(blob.mime(), None);
    }

    #[test]
    fn test_non_base64_data_url_is_rejected() {
        let err = ImageBlob::from_data_url("data:image/png,%89PNG").unwrap_err();
        assert!(matches!(err, EmbedFailure::InvalidDataUrl(_)));
    }

    #[test]
    fn test_magic_wins_over_declared_mime() {
        let blob = ImageBlob::with_mime(encode_jpeg(2, 2, [0, 0, 0]), "image/png");
        assert_eq!(blob.format().unwrap(), ImageFormat::Jpeg);
    }

    #[test]
    fn test_unknown_format_is_unsupported() {
        let blob = ImageBlob::with_mime(b"GIF89a....".to_vec(), "image/gif");
        assert!(matches!(
            blob.format(),
            Err(EmbedFailure::UnsupportedImageFormat(ref m)) if m == "image/gif"
        ));
    }

    #[test]
    fn test_declared_png_with_garbage_fails_to_decode() {
        let blob = ImageBlob::with_mime(b"definitely not a png".to_vec(), "image/png");
        assert!(matches!(
            EncodedImage::decode(&blob),
            Err(EmbedFailure::ImageDecode {
                format: ImageFormat::Png,
                ..
            })
        ));
    }

    #[test]
    fn test_truncated_jpeg_fails_to_decode() {
        let mut bytes = encode_jpeg(16, 16, [200, 10, 10]);
        bytes.truncate(20);
        assert!(matches!(
            EncodedImage::decode(&ImageBlob::new(bytes)),
            Err(EmbedFailure::ImageDecode {
                format: ImageFormat::Jpeg,
                ..
            })
        ));
    }

    #[test]
    fn test_png_alpha_becomes_soft_mask() {
        // 2x1: opaque red, fully transparent black
        let bytes = encode_png(2, 1, png::ColorType::Rgba, &[255, 0, 0, 255, 0, 0, 0, 0]);
        let image = EncodedImage::decode(&ImageBlob::new(bytes)).unwrap();

        assert_eq!(image.color_space, "DeviceRGB");
        assert_eq!(image.filter, "FlateDecode");
        assert_eq!(inflate(&image.data), vec![255, 0, 0, 0, 0, 0]);
        assert_eq!(inflate(image.soft_mask.as_ref().unwrap()), vec![255, 0]);
    }

    #[test]
    fn test_opaque_png_has_no_mask() {
        let bytes = encode_png(1, 2, png::ColorType::GrayscaleAlpha, &[10, 255, 20, 255]);
        let image = EncodedImage::decode(&ImageBlob::new(bytes)).unwrap();
        assert_eq!(image.color_space, "DeviceGray");
        assert_eq!(inflate(&image.data), vec![10, 20]);
        assert!(image.soft_mask.is_none());
    }

    #[test]
    fn test_jpeg_passes_through() {
        let bytes = encode_jpeg(4, 3, [0, 128, 255]);
        let image = EncodedImage::decode(&ImageBlob::new(bytes.clone())).unwrap();
        assert_eq!((image.width, image.height), (4, 3));
        assert_eq!(image.filter, "DCTDecode");
        assert_eq!(image.color_space, "DeviceRGB");
        assert_eq!(image.data, bytes);
    }

    #[test]
    fn test_add_to_links_soft_mask() {
        let bytes = encode_png(1, 1, png::ColorType::Rgba, &[0, 0, 0, 128]);
        let image = EncodedImage::decode(&ImageBlob::new(bytes)).unwrap();
        let mut doc = Document::with_version("1.7");
        let id = image.add_to(&mut doc);

        let stream = doc.get_object(id).unwrap().as_stream().unwrap();
        let mask_id = stream.dict.get(b"SMask").unwrap().as_reference().unwrap();
        let mask = doc.get_object(mask_id).unwrap().as_stream().unwrap();
        assert_eq!(
            mask.dict.get(b"ColorSpace").unwrap().as_name().unwrap(),
            b"DeviceGray"
        );
    }
}
