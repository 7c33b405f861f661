//! Image handling for PDF documents

use crate::{PdfError, Result};
use image::{DynamicImage, ImageDecoder, ImageReader};
use lopdf::{Dictionary, Stream};
use std::io::Cursor;

impl From<image::ImageError> for PdfError {
    fn from(err: image::ImageError) -> Self {
        PdfError::Image(err.to_string())
    }
}

/// Detected image format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ImageFormat {
    Jpeg,
    Png,
}

/// Detect image format from magic bytes
fn detect_format(data: &[u8]) -> Result<ImageFormat> {
    if data.len() < 8 {
        return Err(PdfError::Image("Image data too short".to_string()));
    }

    if data[0] == 0xFF && data[1] == 0xD8 && data[2] == 0xFF {
        return Ok(ImageFormat::Jpeg);
    }

    if data[0..8] == [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A] {
        return Ok(ImageFormat::Png);
    }

    Err(PdfError::Image("Unknown image format".to_string()))
}

/// Pixel dimensions of a JPEG or PNG, read from the header without decoding.
pub fn image_dimensions(data: &[u8]) -> Result<(u32, u32)> {
    match detect_format(data)? {
        ImageFormat::Jpeg => {
            let (width, height, _) = jpeg_header_info(data)?;
            Ok((width, height))
        }
        ImageFormat::Png => png_dimensions(data),
    }
}

/// Parse a JPEG SOF segment: (width, height, component count).
fn jpeg_header_info(data: &[u8]) -> Result<(u32, u32, u8)> {
    // Scan for an SOF marker (0xFFC0-0xFFCF minus the huffman/arithmetic ones)
    let mut i = 2;
    while i + 10 < data.len() {
        if data[i] != 0xFF {
            i += 1;
            continue;
        }

        let marker = data[i + 1];
        if (0xC0..=0xCF).contains(&marker) && marker != 0xC4 && marker != 0xC8 && marker != 0xCC {
            let height = u32::from(u16::from_be_bytes([data[i + 5], data[i + 6]]));
            let width = u32::from(u16::from_be_bytes([data[i + 7], data[i + 8]]));
            return Ok((width, height, data[i + 9]));
        }

        if i + 4 < data.len() {
            let length = u16::from_be_bytes([data[i + 2], data[i + 3]]) as usize;
            if length < 2 {
                break;
            }
            i += 2 + length;
        } else {
            break;
        }
    }

    Err(PdfError::Image("Could not parse JPEG header".to_string()))
}

/// Read PNG dimensions from the IHDR chunk.
fn png_dimensions(data: &[u8]) -> Result<(u32, u32)> {
    if data.len() < 24 {
        return Err(PdfError::Image("PNG data too short".to_string()));
    }

    if &data[12..16] != b"IHDR" {
        return Err(PdfError::Image("Invalid PNG: IHDR not found".to_string()));
    }

    let width = u32::from_be_bytes([data[16], data[17], data[18], data[19]]);
    let height = u32::from_be_bytes([data[20], data[21], data[22], data[23]]);
    Ok((width, height))
}

/// Image XObject for PDF embedding
#[derive(Debug, Clone)]
pub struct ImageXObject {
    pub width: u32,
    pub height: u32,
    /// Color space ("DeviceRGB", "DeviceGray")
    color_space: &'static str,
    /// PDF filter ("DCTDecode" for JPEG, "FlateDecode" for PNG)
    filter: &'static str,
    data: Vec<u8>,
}

impl ImageXObject {
    /// Build an XObject from JPEG or PNG bytes, dispatching on the header.
    pub fn decode(data: &[u8]) -> Result<Self> {
        match detect_format(data)? {
            ImageFormat::Jpeg => Self::from_jpeg(data),
            ImageFormat::Png => Self::from_png(data),
        }
    }

    /// JPEG images embed directly with the DCTDecode filter.
    fn from_jpeg(data: &[u8]) -> Result<Self> {
        let (width, height, components) = jpeg_header_info(data)?;

        Ok(Self {
            width,
            height,
            color_space: if components == 1 {
                "DeviceGray"
            } else {
                "DeviceRGB"
            },
            filter: "DCTDecode",
            data: data.to_vec(),
        })
    }

    /// PNG images are decoded to raw samples and re-compressed with Flate.
    /// Alpha channels are blended against white.
    fn from_png(data: &[u8]) -> Result<Self> {
        let reader = ImageReader::new(Cursor::new(data)).with_guessed_format()?;
        let decoder = reader.into_decoder()?;

        let (width, height) = decoder.dimensions();
        let color_type = decoder.color_type();
        let decoded = DynamicImage::from_decoder(decoder)?;

        let (raw, color_space) = match color_type {
            image::ColorType::L8 | image::ColorType::L16 => {
                (decoded.to_luma8().into_raw(), "DeviceGray")
            }
            image::ColorType::La8 | image::ColorType::La16 => {
                let la = decoded.to_luma_alpha8();
                let mut gray = Vec::with_capacity((width * height) as usize);
                for pixel in la.pixels() {
                    let alpha = f32::from(pixel[1]) / 255.0;
                    gray.push((f32::from(pixel[0]) * alpha + 255.0 * (1.0 - alpha)) as u8);
                }
                (gray, "DeviceGray")
            }
            image::ColorType::Rgba8 | image::ColorType::Rgba16 => {
                let rgba = decoded.to_rgba8();
                let mut rgb = Vec::with_capacity((width * height * 3) as usize);
                for pixel in rgba.pixels() {
                    let alpha = f32::from(pixel[3]) / 255.0;
                    for channel in 0..3 {
                        rgb.push(
                            (f32::from(pixel[channel]) * alpha + 255.0 * (1.0 - alpha)) as u8,
                        );
                    }
                }
                (rgb, "DeviceRGB")
            }
            _ => (decoded.to_rgb8().into_raw(), "DeviceRGB"),
        };

        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        std::io::Write::write_all(&mut encoder, &raw)?;
        let compressed = encoder.finish()?;

        Ok(Self {
            width,
            height,
            color_space,
            filter: "FlateDecode",
            data: compressed,
        })
    }

    /// Convert to a lopdf stream object.
    pub fn to_pdf_stream(&self) -> Stream {
        let mut dict = Dictionary::new();
        dict.set("Type", lopdf::Object::Name(b"XObject".to_vec()));
        dict.set("Subtype", lopdf::Object::Name(b"Image".to_vec()));
        dict.set("Width", i64::from(self.width));
        dict.set("Height", i64::from(self.height));
        dict.set(
            "ColorSpace",
            lopdf::Object::Name(self.color_space.as_bytes().to_vec()),
        );
        dict.set("BitsPerComponent", 8);
        dict.set(
            "Filter",
            lopdf::Object::Name(self.filter.as_bytes().to_vec()),
        );
        dict.set("Length", self.data.len() as i64);

        Stream::new(dict, self.data.clone())
    }
}

/// Generate operators to place an image resource at `(x, y)` (bottom-left
/// corner of the image) with the given display size.
pub(crate) fn image_operators(
    resource_name: &str,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
) -> Vec<u8> {
    format!("q\n{width} 0 0 {height} {x} {y} cm\n/{resource_name} Do\nQ\n").into_bytes()
}
