//! PDF Document wrapper

use crate::font::BuiltinFont;
use crate::graphics::{line_operators, rect_fill_operators, rect_stroke_operators};
use crate::image::{image_operators, ImageXObject};
use crate::text::text_operators;
use crate::{PdfError, Result};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::hash::{Hash, Hasher};
use std::path::Path;

/// A4 page width in points.
pub const A4_WIDTH: f64 = 595.0;
/// A4 page height in points.
pub const A4_HEIGHT: f64 = 842.0;

/// RGB Color (values 0.0 - 1.0)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    /// Create a new RGB color (values 0.0 - 1.0)
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn black() -> Self {
        Self::rgb(0.0, 0.0, 0.0)
    }

    pub fn red() -> Self {
        Self::rgb(1.0, 0.0, 0.0)
    }

    pub fn blue() -> Self {
        Self::rgb(0.0, 0.0, 1.0)
    }

    /// Uniform gray at the given level (0.0 = black, 1.0 = white).
    pub fn gray(level: f32) -> Self {
        Self::rgb(level, level, level)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::black()
    }
}

/// Basic metadata probed from a document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentInfo {
    pub page_count: usize,
    pub title: Option<String>,
    pub author: Option<String>,
    pub creator: Option<String>,
}

/// PDF Document wrapper providing high-level drawing operations.
///
/// Draw calls buffer content operators per page; the buffers are appended to
/// the page content streams once, at save time. Pages are 0-indexed and all
/// coordinates are PDF user space (origin bottom-left).
pub struct PdfDocument {
    /// The underlying lopdf document
    inner: Document,
    /// Buffered content operators per page
    page_contents: BTreeMap<usize, Vec<u8>>,
    /// Fonts referenced per page (resources installed at save time)
    page_fonts: BTreeMap<usize, BTreeSet<BuiltinFont>>,
    /// Embedded images (data hash -> PDF object ID)
    embedded_images: HashMap<u64, ObjectId>,
    /// Image resources registered per page (resource name -> object ID)
    page_images: BTreeMap<usize, Vec<(String, ObjectId)>>,
    /// Next image resource number
    next_image_resource: u32,
}

impl PdfDocument {
    fn wrap(inner: Document) -> Self {
        Self {
            inner,
            page_contents: BTreeMap::new(),
            page_fonts: BTreeMap::new(),
            embedded_images: HashMap::new(),
            page_images: BTreeMap::new(),
            next_image_resource: 1,
        }
    }

    /// Open a PDF document from a file path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let inner = Document::load(path).map_err(|e| PdfError::Open(e.to_string()))?;
        Ok(Self::wrap(inner))
    }

    /// Open a PDF document from bytes
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let inner = Document::load_mem(data).map_err(|e| PdfError::Open(e.to_string()))?;
        Ok(Self::wrap(inner))
    }

    /// Create a fresh document with a single blank page of the given size.
    pub fn new_blank(width: f64, height: f64) -> Self {
        let mut inner = Document::with_version("1.5");

        let pages_id = inner.new_object_id();
        let content_id = inner.add_object(Stream::new(Dictionary::new(), Vec::new()));

        let mut page_dict = Dictionary::new();
        page_dict.set("Type", Object::Name(b"Page".to_vec()));
        page_dict.set("Parent", Object::Reference(pages_id));
        page_dict.set(
            "MediaBox",
            Object::Array(vec![
                Object::Real(0.0),
                Object::Real(0.0),
                Object::Real(width as f32),
                Object::Real(height as f32),
            ]),
        );
        page_dict.set("Resources", Object::Dictionary(Dictionary::new()));
        page_dict.set("Contents", Object::Reference(content_id));
        let page_id = inner.add_object(page_dict);

        let mut pages_dict = Dictionary::new();
        pages_dict.set("Type", Object::Name(b"Pages".to_vec()));
        pages_dict.set("Kids", Object::Array(vec![Object::Reference(page_id)]));
        pages_dict.set("Count", Object::Integer(1));
        inner.objects.insert(pages_id, Object::Dictionary(pages_dict));

        let mut catalog = Dictionary::new();
        catalog.set("Type", Object::Name(b"Catalog".to_vec()));
        catalog.set("Pages", Object::Reference(pages_id));
        let catalog_id = inner.add_object(catalog);
        inner.trailer.set("Root", Object::Reference(catalog_id));

        Self::wrap(inner)
    }

    /// Append a blank page of the given size.
    ///
    /// Returns the new page index (0-based).
    pub fn add_blank_page(&mut self, width: f64, height: f64) -> Result<usize> {
        let page_count = self.page_count();

        let content_id = self
            .inner
            .add_object(Stream::new(Dictionary::new(), Vec::new()));

        let mut page_dict = Dictionary::new();
        page_dict.set("Type", Object::Name(b"Page".to_vec()));
        page_dict.set(
            "MediaBox",
            Object::Array(vec![
                Object::Real(0.0),
                Object::Real(0.0),
                Object::Real(width as f32),
                Object::Real(height as f32),
            ]),
        );
        page_dict.set("Resources", Object::Dictionary(Dictionary::new()));
        page_dict.set("Contents", Object::Reference(content_id));
        let new_page_id = self.inner.add_object(Object::Dictionary(page_dict));

        let pages_id = self.root_pages_id()?;

        // Link the new page to its parent
        if let Ok(Object::Dictionary(dict)) = self.inner.get_object_mut(new_page_id) {
            dict.set("Parent", Object::Reference(pages_id));
        }

        let pages_dict = self
            .inner
            .get_object(pages_id)?
            .as_dict()
            .map_err(|_| PdfError::Parse("Pages object is not a dictionary".to_string()))?;

        let mut kids = pages_dict
            .get(b"Kids")
            .map_err(|_| PdfError::Parse("Pages object missing Kids array".to_string()))?
            .as_array()
            .map_err(|_| PdfError::Parse("Kids is not an array".to_string()))?
            .clone();
        kids.push(Object::Reference(new_page_id));

        let count = pages_dict
            .get(b"Count")
            .ok()
            .and_then(|c| c.as_i64().ok())
            .unwrap_or(page_count as i64);

        let mut new_pages_dict = pages_dict.clone();
        new_pages_dict.set(b"Kids", Object::Array(kids));
        new_pages_dict.set(b"Count", Object::Integer(count + 1));
        self.inner.objects.insert(pages_id, new_pages_dict.into());

        Ok(page_count)
    }

    /// Get the number of pages in the document
    pub fn page_count(&self) -> usize {
        self.inner.get_pages().len()
    }

    /// Get the page size (width, height) in points.
    pub fn page_size(&self, page: usize) -> Result<(f64, f64)> {
        let media_box = self.media_box(page)?;
        Ok((media_box[2] - media_box[0], media_box[3] - media_box[1]))
    }

    /// Buffer a text draw on `page` at `(x, y)`.
    pub fn draw_text(
        &mut self,
        text: &str,
        page: usize,
        x: f64,
        y: f64,
        font: BuiltinFont,
        size: f64,
        color: Color,
    ) -> Result<()> {
        self.check_page(page)?;

        // Nothing to render
        if text.is_empty() {
            return Ok(());
        }

        self.page_fonts.entry(page).or_default().insert(font);
        let ops = text_operators(text, x, y, font, size, color);
        self.buffer(page, &ops);
        Ok(())
    }

    /// Buffer an image draw on `page`. `(x, y)` is the bottom-left corner of
    /// the placed image; `width`/`height` are the display size in points.
    ///
    /// Accepts JPEG and PNG bytes. Identical image data is embedded once per
    /// document.
    pub fn draw_image(
        &mut self,
        data: &[u8],
        page: usize,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Result<()> {
        self.check_page(page)?;

        let resource_name = self.image_resource(data, page)?;
        let ops = image_operators(&resource_name, x, y, width, height);
        self.buffer(page, &ops);
        Ok(())
    }

    /// Buffer a stroked line on `page`.
    pub fn draw_line(
        &mut self,
        page: usize,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        thickness: f64,
        color: Color,
    ) -> Result<()> {
        self.check_page(page)?;
        let ops = line_operators(x1, y1, x2, y2, thickness, color);
        self.buffer(page, &ops);
        Ok(())
    }

    /// Buffer a stroked rectangle on `page` with bottom-left at `(x, y)`.
    pub fn draw_rect(
        &mut self,
        page: usize,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        thickness: f64,
        color: Color,
    ) -> Result<()> {
        self.check_page(page)?;
        let ops = rect_stroke_operators(x, y, width, height, thickness, color);
        self.buffer(page, &ops);
        Ok(())
    }

    /// Buffer a filled rectangle on `page` with bottom-left at `(x, y)`.
    pub fn fill_rect(
        &mut self,
        page: usize,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: Color,
    ) -> Result<()> {
        self.check_page(page)?;
        let ops = rect_fill_operators(x, y, width, height, color);
        self.buffer(page, &ops);
        Ok(())
    }

    /// Save the document to a file
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.install_font_resources()?;
        self.flush_content_buffers()?;
        self.inner
            .save(path)
            .map_err(|e| PdfError::Save(e.to_string()))?;
        Ok(())
    }

    /// Save the document to bytes
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        self.install_font_resources()?;
        self.flush_content_buffers()?;

        let mut buffer = Vec::new();
        self.inner
            .save_to(&mut buffer)
            .map_err(|e| PdfError::Save(e.to_string()))?;
        Ok(buffer)
    }

    /// Get a reference to the underlying lopdf document
    pub fn inner(&self) -> &Document {
        &self.inner
    }

    /// Page count and Info-dictionary metadata.
    pub fn info(&self) -> DocumentInfo {
        let mut info = DocumentInfo {
            page_count: self.page_count(),
            ..Default::default()
        };

        if let Ok(info_obj) = self.inner.trailer.get(b"Info") {
            let info_dict = match info_obj {
                Object::Reference(id) => self
                    .inner
                    .get_object(*id)
                    .ok()
                    .and_then(|obj| obj.as_dict().ok()),
                Object::Dictionary(dict) => Some(dict),
                _ => None,
            };

            if let Some(dict) = info_dict {
                info.title = info_string(dict, b"Title");
                info.author = info_string(dict, b"Author");
                info.creator = info_string(dict, b"Creator");
            }
        }

        info
    }

    fn check_page(&self, page: usize) -> Result<()> {
        let count = self.page_count();
        if page >= count {
            return Err(PdfError::PageOutOfRange { page, count });
        }
        Ok(())
    }

    /// lopdf keys its page table 1-based; this is the only place the
    /// conversion happens.
    fn page_id(&self, page: usize) -> Result<ObjectId> {
        let pages = self.inner.get_pages();
        pages
            .get(&((page + 1) as u32))
            .copied()
            .ok_or(PdfError::PageOutOfRange {
                page,
                count: pages.len(),
            })
    }

    fn root_pages_id(&self) -> Result<ObjectId> {
        let root = self
            .inner
            .trailer
            .get(b"Root")
            .map_err(|_| PdfError::Parse("Document trailer missing Root entry".to_string()))?;
        let catalog_id = root
            .as_reference()
            .map_err(|_| PdfError::Parse("Root is not a reference".to_string()))?;
        let catalog = self
            .inner
            .get_object(catalog_id)?
            .as_dict()
            .map_err(|_| PdfError::Parse("Catalog is not a dictionary".to_string()))?;
        catalog
            .get(b"Pages")
            .map_err(|_| PdfError::Parse("Catalog missing Pages entry".to_string()))?
            .as_reference()
            .map_err(|_| PdfError::Parse("Pages is not a reference".to_string()))
    }

    /// Get MediaBox (or CropBox), following the parent inheritance chain.
    fn media_box(&self, page: usize) -> Result<[f64; 4]> {
        let mut current = self.page_id(page)?;

        // Parent chain walk, bounded for safety
        for _ in 0..10 {
            let dict = self
                .inner
                .get_object(current)?
                .as_dict()
                .map_err(|_| PdfError::Parse("Page object is not a dictionary".to_string()))?;

            if let Ok(media_box) = dict.get(b"MediaBox").or_else(|_| dict.get(b"CropBox")) {
                let array = match media_box {
                    Object::Array(arr) => arr.clone(),
                    Object::Reference(ref_id) => self
                        .inner
                        .get_object(*ref_id)?
                        .as_array()
                        .map_err(|_| {
                            PdfError::Parse("MediaBox reference is not an array".to_string())
                        })?
                        .clone(),
                    _ => {
                        return Err(PdfError::Parse("MediaBox is not an array".to_string()));
                    }
                };

                if array.len() < 4 {
                    return Err(PdfError::Parse("Invalid MediaBox format".to_string()));
                }

                let mut values = [0.0f64; 4];
                for (i, obj) in array.iter().take(4).enumerate() {
                    values[i] = object_to_f64(obj)
                        .ok_or_else(|| PdfError::Parse("Invalid MediaBox value".to_string()))?;
                }
                return Ok(values);
            }

            if let Ok(Object::Reference(parent_id)) = dict.get(b"Parent") {
                current = *parent_id;
                continue;
            }
            break;
        }

        Ok([0.0, 0.0, A4_WIDTH, A4_HEIGHT])
    }

    fn buffer(&mut self, page: usize, content: &[u8]) {
        self.page_contents
            .entry(page)
            .or_default()
            .extend_from_slice(content);
    }

    /// Embed the font objects for every buffered draw and reference them from
    /// the page resources. Called once at save time.
    fn install_font_resources(&mut self) -> Result<()> {
        let page_fonts: Vec<(usize, Vec<BuiltinFont>)> = std::mem::take(&mut self.page_fonts)
            .into_iter()
            .map(|(page, fonts)| (page, fonts.into_iter().collect()))
            .collect();

        if page_fonts.is_empty() {
            return Ok(());
        }

        let mut used: Vec<BuiltinFont> = page_fonts
            .iter()
            .flat_map(|(_, fonts)| fonts.iter().copied())
            .collect();
        used.sort();
        used.dedup();

        let mut font_ids: BTreeMap<BuiltinFont, ObjectId> = BTreeMap::new();
        for font in used {
            let mut dict = Dictionary::new();
            dict.set("Type", Object::Name(b"Font".to_vec()));
            dict.set("Subtype", Object::Name(b"Type1".to_vec()));
            dict.set("BaseFont", Object::Name(font.base_name().as_bytes().to_vec()));
            dict.set("Encoding", Object::Name(b"WinAnsiEncoding".to_vec()));
            font_ids.insert(font, self.inner.add_object(dict));
        }

        for (page, fonts) in page_fonts {
            for font in fonts {
                self.add_page_resource(page, b"Font", font.resource_name(), font_ids[&font])?;
            }
        }

        Ok(())
    }

    /// Flush all buffered content to page streams.
    fn flush_content_buffers(&mut self) -> Result<()> {
        let buffers: Vec<(usize, Vec<u8>)> =
            std::mem::take(&mut self.page_contents).into_iter().collect();

        for (page, content) in buffers {
            if !content.is_empty() {
                self.append_to_content_stream(page, &content)?;
            }
        }
        Ok(())
    }

    /// Append content to a page's content stream.
    ///
    /// Existing streams (single, referenced, or an array of either) are
    /// decompressed and concatenated, then replaced by one plain stream.
    fn append_to_content_stream(&mut self, page: usize, content: &[u8]) -> Result<()> {
        let page_id = self.page_id(page)?;

        let page_dict = self
            .inner
            .get_object(page_id)?
            .as_dict()
            .map_err(|_| PdfError::Parse("Page object is not a dictionary".to_string()))?
            .clone();

        let mut combined = match page_dict.get(b"Contents") {
            Ok(Object::Stream(stream)) => stream
                .decompressed_content()
                .unwrap_or_else(|_| stream.content.clone()),
            Ok(Object::Reference(ref_id)) => match self.inner.get_object(*ref_id) {
                Ok(Object::Stream(stream)) => stream
                    .decompressed_content()
                    .unwrap_or_else(|_| stream.content.clone()),
                _ => Vec::new(),
            },
            Ok(Object::Array(array)) => {
                let mut data = Vec::new();
                for entry in array {
                    let stream = match entry {
                        Object::Reference(ref_id) => match self.inner.get_object(*ref_id) {
                            Ok(Object::Stream(stream)) => Some(stream),
                            _ => None,
                        },
                        Object::Stream(stream) => Some(stream),
                        _ => None,
                    };
                    if let Some(stream) = stream {
                        data.extend(
                            stream
                                .decompressed_content()
                                .unwrap_or_else(|_| stream.content.clone()),
                        );
                    }
                }
                data
            }
            _ => Vec::new(),
        };

        // Keep the operator boundary intact between old and new content
        if !combined.is_empty() && combined.last() != Some(&b'\n') {
            combined.push(b'\n');
        }
        combined.extend_from_slice(content);

        let stream_id = self
            .inner
            .add_object(Stream::new(Dictionary::new(), combined));

        let mut new_page_dict = page_dict;
        new_page_dict.set(b"Contents", Object::Reference(stream_id));
        self.inner.objects.insert(page_id, new_page_dict.into());

        Ok(())
    }

    /// Get or create an image resource for this page.
    ///
    /// Images are deduplicated by a hash of their bytes; resource names are
    /// per page.
    fn image_resource(&mut self, data: &[u8], page: usize) -> Result<String> {
        let mut hasher = DefaultHasher::new();
        data.hash(&mut hasher);
        let data_hash = hasher.finish();

        if !self.embedded_images.contains_key(&data_hash) {
            let xobject = ImageXObject::decode(data)?;
            let id = self.inner.add_object(xobject.to_pdf_stream());
            self.embedded_images.insert(data_hash, id);
        }
        let object_id = self.embedded_images[&data_hash];

        let page_resources = self.page_images.entry(page).or_default();
        if let Some((name, _)) = page_resources.iter().find(|(_, id)| *id == object_id) {
            return Ok(name.clone());
        }

        let resource_name = format!("Im{}", self.next_image_resource);
        self.next_image_resource += 1;
        page_resources.push((resource_name.clone(), object_id));

        self.add_page_resource(page, b"XObject", &resource_name, object_id)?;
        Ok(resource_name)
    }

    /// Register an object under `Resources/<category>/<name>` on a page.
    fn add_page_resource(
        &mut self,
        page: usize,
        category: &[u8],
        name: &str,
        object_id: ObjectId,
    ) -> Result<()> {
        let page_id = self.page_id(page)?;

        let page_dict = self
            .inner
            .get_object(page_id)?
            .as_dict()
            .map_err(|_| PdfError::Parse("Page object is not a dictionary".to_string()))?
            .clone();

        let mut resources = match page_dict.get(b"Resources") {
            Ok(Object::Dictionary(dict)) => dict.clone(),
            Ok(Object::Reference(ref_id)) => self
                .inner
                .get_object(*ref_id)?
                .as_dict()
                .map(Clone::clone)
                .unwrap_or_else(|_| Dictionary::new()),
            _ => Dictionary::new(),
        };

        let mut category_dict = match resources.get(category) {
            Ok(Object::Dictionary(dict)) => dict.clone(),
            Ok(Object::Reference(ref_id)) => self
                .inner
                .get_object(*ref_id)?
                .as_dict()
                .map(Clone::clone)
                .unwrap_or_else(|_| Dictionary::new()),
            _ => Dictionary::new(),
        };

        category_dict.set(name.as_bytes(), Object::Reference(object_id));
        resources.set(category, Object::Dictionary(category_dict));

        let mut new_page_dict = page_dict;
        new_page_dict.set(b"Resources", Object::Dictionary(resources));
        self.inner.objects.insert(page_id, new_page_dict.into());

        Ok(())
    }
}

fn info_string(dict: &Dictionary, key: &[u8]) -> Option<String> {
    match dict.get(key) {
        Ok(Object::String(bytes, _)) => Some(String::from_utf8_lossy(bytes).into_owned()),
        _ => None,
    }
}

fn object_to_f64(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(value) => Some(*value as f64),
        Object::Real(value) => Some(f64::from(*value)),
        _ => None,
    }
}
