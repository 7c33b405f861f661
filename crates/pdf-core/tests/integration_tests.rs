//! Integration tests for pdf-core
//!
//! These tests verify end-to-end behavior against real lopdf documents.

use lopdf::dictionary;
use pdf_core::{BuiltinFont, Color, PdfDocument, PdfError, A4_HEIGHT, A4_WIDTH};

/// Create a minimal valid PDF with the given number of A4 pages.
fn create_test_pdf(page_count: usize) -> Vec<u8> {
    let mut doc = lopdf::Document::with_version("1.5");

    let pages_id = doc.add_object(lopdf::Object::Dictionary(lopdf::dictionary! {
        "Type" => "Pages",
        "Count" => page_count as i64,
        "Kids" => vec![], // updated below
    }));

    let mut page_ids = Vec::new();
    for _ in 0..page_count {
        let contents_id = doc.add_object(lopdf::Object::Stream(lopdf::Stream::new(
            lopdf::dictionary! {},
            vec![],
        )));

        let page_id = doc.add_object(lopdf::Object::Dictionary(lopdf::dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            "Resources" => lopdf::dictionary! {},
            "Contents" => contents_id,
        }));
        page_ids.push(page_id);
    }

    let mut pages_dict = doc.get_object(pages_id).unwrap().as_dict().unwrap().clone();
    pages_dict.set(
        "Kids",
        lopdf::Object::Array(page_ids.into_iter().map(|id| id.into()).collect()),
    );
    doc.objects.insert(pages_id, pages_dict.into());

    let catalog_id = doc.add_object(lopdf::Object::Dictionary(lopdf::dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    }));
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

/// Create a minimal JPEG for testing
fn create_test_jpeg() -> Vec<u8> {
    vec![
        0xFF, 0xD8, // SOI
        0xFF, 0xC0, // SOF0
        0x00, 0x11, // length
        0x08, // precision
        0x00, 0x10, // height (16)
        0x00, 0x10, // width (16)
        0x03, // components
        0x01, 0x22, 0x00, // Y
        0x02, 0x11, 0x01, // Cb
        0x03, 0x11, 0x01, // Cr
        0xFF, 0xD9, // EOI
    ]
}

/// Extract the concatenated content stream of a page as text.
fn page_content_text(pdf_bytes: &[u8], page: usize) -> String {
    let doc = lopdf::Document::load_mem(pdf_bytes).expect("Failed to load PDF");
    let pages = doc.get_pages();
    let page_id = *pages.get(&((page + 1) as u32)).expect("Missing page");
    let content = doc.get_page_content(page_id).expect("Failed to read content");
    String::from_utf8_lossy(&content).into_owned()
}

#[test]
fn test_open_save_roundtrip() {
    let pdf_data = create_test_pdf(1);

    let mut doc = PdfDocument::from_bytes(&pdf_data).expect("Failed to open PDF");
    assert_eq!(doc.page_count(), 1);

    let saved = doc.to_bytes().expect("Failed to save PDF");
    let doc2 = PdfDocument::from_bytes(&saved).expect("Failed to re-open PDF");
    assert_eq!(doc2.page_count(), 1);
}

#[test]
fn test_open_invalid_bytes() {
    let result = PdfDocument::from_bytes(b"not a pdf at all");
    assert!(matches!(result, Err(PdfError::Open(_))));
}

#[test]
fn test_draw_text_appears_in_content() {
    let pdf_data = create_test_pdf(1);
    let mut doc = PdfDocument::from_bytes(&pdf_data).expect("Failed to open PDF");

    doc.draw_text(
        "Juan Perez",
        0,
        100.0,
        700.0,
        BuiltinFont::Helvetica,
        12.0,
        Color::black(),
    )
    .expect("Failed to draw text");

    let saved = doc.to_bytes().expect("Failed to save PDF");
    let content = page_content_text(&saved, 0);

    assert!(content.contains("(Juan Perez) Tj"));
    assert!(content.contains("100 700 Td"));
    assert!(content.contains("/F1 12 Tf"));
}

#[test]
fn test_draw_text_installs_font_resource() {
    let pdf_data = create_test_pdf(1);
    let mut doc = PdfDocument::from_bytes(&pdf_data).expect("Failed to open PDF");

    doc.draw_text(
        "X",
        0,
        10.0,
        10.0,
        BuiltinFont::HelveticaBold,
        12.0,
        Color::black(),
    )
    .expect("Failed to draw text");

    let saved = doc.to_bytes().expect("Failed to save PDF");
    let reloaded = lopdf::Document::load_mem(&saved).expect("Failed to load PDF");
    let pages = reloaded.get_pages();
    let page_id = *pages.get(&1).expect("Missing page");
    let page_dict = reloaded.get_object(page_id).unwrap().as_dict().unwrap();
    let resources = page_dict.get(b"Resources").unwrap().as_dict().unwrap();
    let fonts = resources.get(b"Font").unwrap().as_dict().unwrap();

    let font_ref = fonts.get(b"F2").expect("F2 not registered");
    let font_dict = reloaded
        .get_object(font_ref.as_reference().unwrap())
        .unwrap()
        .as_dict()
        .unwrap();
    assert_eq!(
        font_dict.get(b"BaseFont").unwrap().as_name().unwrap(),
        b"Helvetica-Bold"
    );
}

#[test]
fn test_draw_text_on_second_page() {
    let pdf_data = create_test_pdf(3);
    let mut doc = PdfDocument::from_bytes(&pdf_data).expect("Failed to open PDF");

    doc.draw_text(
        "pagina tres",
        2,
        50.0,
        400.0,
        BuiltinFont::Helvetica,
        11.0,
        Color::black(),
    )
    .expect("Failed to draw text");

    let saved = doc.to_bytes().expect("Failed to save PDF");
    assert!(page_content_text(&saved, 2).contains("(pagina tres) Tj"));
    assert!(!page_content_text(&saved, 0).contains("(pagina tres) Tj"));
}

#[test]
fn test_draw_text_invalid_page() {
    let pdf_data = create_test_pdf(1);
    let mut doc = PdfDocument::from_bytes(&pdf_data).expect("Failed to open PDF");

    let result = doc.draw_text(
        "Test",
        99,
        100.0,
        700.0,
        BuiltinFont::Helvetica,
        12.0,
        Color::black(),
    );

    match result {
        Err(PdfError::PageOutOfRange { page, count }) => {
            assert_eq!(page, 99);
            assert_eq!(count, 1);
        }
        _ => panic!("Expected PageOutOfRange error"),
    }
}

#[test]
fn test_empty_text_is_a_no_op() {
    let pdf_data = create_test_pdf(1);
    let mut doc = PdfDocument::from_bytes(&pdf_data).expect("Failed to open PDF");

    doc.draw_text(
        "",
        0,
        100.0,
        700.0,
        BuiltinFont::Helvetica,
        12.0,
        Color::black(),
    )
    .expect("Failed to draw empty text");

    let saved = doc.to_bytes().expect("Failed to save PDF");
    assert!(!page_content_text(&saved, 0).contains("Tj"));
}

#[test]
fn test_draw_image_jpeg() {
    let pdf_data = create_test_pdf(1);
    let mut doc = PdfDocument::from_bytes(&pdf_data).expect("Failed to open PDF");

    doc.draw_image(&create_test_jpeg(), 0, 100.0, 600.0, 50.0, 50.0)
        .expect("Failed to draw JPEG");

    let saved = doc.to_bytes().expect("Failed to save PDF");
    let content = page_content_text(&saved, 0);
    assert!(content.contains("/Im1 Do"));
}

#[test]
fn test_draw_image_png() {
    use image::{ImageBuffer, Luma};

    let img: ImageBuffer<Luma<u8>, Vec<u8>> = ImageBuffer::new(16, 16);
    let mut png = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
        .expect("Failed to create PNG");

    let pdf_data = create_test_pdf(1);
    let mut doc = PdfDocument::from_bytes(&pdf_data).expect("Failed to open PDF");
    doc.draw_image(&png, 0, 100.0, 600.0, 50.0, 50.0)
        .expect("Failed to draw PNG");

    let saved = doc.to_bytes().expect("Failed to save PDF");
    assert!(page_content_text(&saved, 0).contains("/Im1 Do"));
}

#[test]
fn test_image_deduplication() {
    let pdf_data = create_test_pdf(1);
    let mut doc = PdfDocument::from_bytes(&pdf_data).expect("Failed to open PDF");
    let jpeg = create_test_jpeg();

    doc.draw_image(&jpeg, 0, 100.0, 600.0, 50.0, 50.0)
        .expect("Failed to draw image 1");
    doc.draw_image(&jpeg, 0, 200.0, 600.0, 50.0, 50.0)
        .expect("Failed to draw image 2");

    let saved = doc.to_bytes().expect("Failed to save PDF");
    let content = page_content_text(&saved, 0);
    // Same resource, drawn twice
    assert_eq!(content.matches("/Im1 Do").count(), 2);
    assert!(!content.contains("/Im2 Do"));
}

#[test]
fn test_draw_line_and_rects() {
    let pdf_data = create_test_pdf(1);
    let mut doc = PdfDocument::from_bytes(&pdf_data).expect("Failed to open PDF");

    doc.draw_line(0, 50.0, 700.0, 545.0, 700.0, 2.0, Color::rgb(0.2, 0.4, 0.8))
        .expect("Failed to draw line");
    doc.draw_rect(0, 98.0, 98.0, 12.0, 12.0, 1.0, Color::red())
        .expect("Failed to draw rect");
    doc.fill_rect(0, 0.0, 0.0, 6.0, 6.0, Color::red())
        .expect("Failed to fill rect");

    let saved = doc.to_bytes().expect("Failed to save PDF");
    let content = page_content_text(&saved, 0);
    assert!(content.contains("50 700 m"));
    assert!(content.contains("98 98 12 12 re"));
    assert!(content.contains("0 0 6 6 re"));
}

#[test]
fn test_new_blank_document_is_valid() {
    let mut doc = PdfDocument::new_blank(A4_WIDTH, A4_HEIGHT);
    doc.draw_text(
        "documento nuevo",
        0,
        50.0,
        792.0,
        BuiltinFont::HelveticaBold,
        18.0,
        Color::black(),
    )
    .expect("Failed to draw text");

    let saved = doc.to_bytes().expect("Failed to save PDF");
    let reloaded = PdfDocument::from_bytes(&saved).expect("Blank document not parseable");
    assert_eq!(reloaded.page_count(), 1);
    assert!(page_content_text(&saved, 0).contains("(documento nuevo) Tj"));
}

#[test]
fn test_add_blank_page_roundtrip() {
    let mut doc = PdfDocument::new_blank(A4_WIDTH, A4_HEIGHT);
    assert_eq!(doc.add_blank_page(A4_WIDTH, A4_HEIGHT).unwrap(), 1);
    assert_eq!(doc.add_blank_page(A4_WIDTH, A4_HEIGHT).unwrap(), 2);

    doc.draw_text(
        "tercera",
        2,
        50.0,
        400.0,
        BuiltinFont::Helvetica,
        12.0,
        Color::black(),
    )
    .expect("Failed to draw text");

    let saved = doc.to_bytes().expect("Failed to save PDF");
    let reloaded = PdfDocument::from_bytes(&saved).expect("Failed to re-open PDF");
    assert_eq!(reloaded.page_count(), 3);
    assert!(page_content_text(&saved, 2).contains("(tercera) Tj"));
}

#[test]
fn test_page_size_from_media_box() {
    let pdf_data = create_test_pdf(1);
    let doc = PdfDocument::from_bytes(&pdf_data).expect("Failed to open PDF");
    let (width, height) = doc.page_size(0).expect("Failed to read page size");
    assert_eq!(width, 595.0);
    assert_eq!(height, 842.0);
}

#[test]
fn test_accented_text_encodes_as_latin1() {
    let pdf_data = create_test_pdf(1);
    let mut doc = PdfDocument::from_bytes(&pdf_data).expect("Failed to open PDF");

    doc.draw_text(
        "Previsión",
        0,
        50.0,
        500.0,
        BuiltinFont::Helvetica,
        11.0,
        Color::black(),
    )
    .expect("Failed to draw text");

    let saved = doc.to_bytes().expect("Failed to save PDF");
    let doc2 = lopdf::Document::load_mem(&saved).unwrap();
    let pages = doc2.get_pages();
    let content = doc2.get_page_content(*pages.get(&1).unwrap()).unwrap();
    // "Previsi" ASCII prefix plus the Latin-1 byte for ó
    let needle: &[u8] = b"(Previsi\xF3n) Tj";
    assert!(content
        .windows(needle.len())
        .any(|window| window == needle));
}
