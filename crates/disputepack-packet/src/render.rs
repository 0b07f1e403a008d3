use bytes::Bytes;
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Line, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerReference, Point, Rgb,
};
use tracing::warn;

use crate::format::{format_bytes, format_datetime, wrap_text};
use crate::model::{PacketModel, NO_EVIDENCE_NOTE, NO_IMAGE_EXHIBITS_NOTE};
use crate::PacketError;

// US Letter, matching the original packet layout.
const PAGE_WIDTH_MM: f32 = 215.9;
const PAGE_HEIGHT_MM: f32 = 279.4;
const MARGIN_MM: f32 = 18.0;
const USABLE_WIDTH_MM: f32 = PAGE_WIDTH_MM - 2.0 * MARGIN_MM;

const PT_TO_MM: f32 = 0.352_778;

const TITLE_SIZE: f32 = 20.0;
const SUBTITLE_SIZE: f32 = 12.0;
const HEADING_SIZE: f32 = 16.0;
const BODY_SIZE: f32 = 11.0;
const TABLE_SIZE: f32 = 10.0;

// Evidence index column offsets/widths as fractions of the usable width.
const COL_EXHIBIT: (f32, f32) = (0.0, 0.09);
const COL_TYPE: (f32, f32) = (0.10, 0.17);
const COL_FILENAME: (f32, f32) = (0.28, 0.26);
const COL_DESC: (f32, f32) = (0.55, 0.45);

fn line_height(size_pt: f32) -> f32 {
    size_pt * 1.45 * PT_TO_MM
}

/// Character budget for a column, from the average Helvetica glyph width
/// (~0.5 em). Good enough for table layout; text never overflows the page
/// because wrapping errs narrow.
fn max_chars(size_pt: f32, width_mm: f32) -> usize {
    let char_width = size_pt * 0.5 * PT_TO_MM;
    (width_mm / char_width).floor().max(1.0) as usize
}

/// Cursor-based writer over a growing printpdf document. `y` tracks the
/// top of the next line in mm from the page bottom; every write path goes
/// through `ensure_room` so content never runs below the margin.
struct PageWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    y: f32,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl PageWriter {
    fn new(title: &str) -> Result<Self, PacketError> {
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| PacketError::Render(format!("add font: {e}")))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| PacketError::Render(format!("add font: {e}")))?;
        let layer = doc.get_page(page).get_layer(layer);
        Ok(Self {
            doc,
            layer,
            y: PAGE_HEIGHT_MM - MARGIN_MM,
            regular,
            bold,
        })
    }

    fn new_page(&mut self) {
        let (page, layer) = self
            .doc
            .add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = PAGE_HEIGHT_MM - MARGIN_MM;
    }

    fn ensure_room(&mut self, needed_mm: f32) {
        if self.y - needed_mm < MARGIN_MM {
            self.new_page();
        }
    }

    fn font(&self, bold: bool) -> &IndirectFontRef {
        if bold {
            &self.bold
        } else {
            &self.regular
        }
    }

    /// One line of text at an absolute x position; advances the cursor.
    fn write_line(&mut self, text: &str, size: f32, bold: bool, x: f32) {
        self.ensure_room(line_height(size));
        let baseline = self.y - size * PT_TO_MM;
        self.layer
            .use_text(text, size, Mm(x), Mm(baseline), self.font(bold));
        self.y -= line_height(size);
    }

    fn write_wrapped(&mut self, text: &str, size: f32, bold: bool, x: f32, width_mm: f32) {
        for line in wrap_text(text, max_chars(size, width_mm)) {
            self.write_line(&line, size, bold, x);
        }
    }

    fn write_centered(&mut self, text: &str, size: f32, bold: bool) {
        let text_width = text.chars().count() as f32 * size * 0.5 * PT_TO_MM;
        let x = ((PAGE_WIDTH_MM - text_width) / 2.0).max(MARGIN_MM);
        self.write_line(text, size, bold, x);
    }

    /// Section heading; keeps at least a couple of body lines attached so
    /// a heading never sits alone at the bottom of a page.
    fn section_heading(&mut self, text: &str) {
        self.ensure_room(line_height(HEADING_SIZE) + 3.0 * line_height(BODY_SIZE));
        self.write_line(text, HEADING_SIZE, true, MARGIN_MM);
        self.y -= 1.5;
    }

    fn move_down(&mut self, mm: f32) {
        self.y -= mm;
    }

    fn hline(&mut self) {
        let y = self.y;
        self.layer.set_outline_thickness(0.5);
        self.layer.add_line(Line {
            points: vec![
                (Point::new(Mm(MARGIN_MM), Mm(y)), false),
                (Point::new(Mm(MARGIN_MM + USABLE_WIDTH_MM), Mm(y)), false),
            ],
            is_closed: false,
        });
        self.y -= 1.5;
    }

    /// One table row with independently wrapped cells. Cells are
    /// (x-offset fraction, width fraction, text) over the usable width.
    fn table_row(&mut self, cells: &[((f32, f32), &str)], size: f32, bold: bool) {
        let wrapped: Vec<Vec<String>> = cells
            .iter()
            .map(|((_, width), text)| wrap_text(text, max_chars(size, width * USABLE_WIDTH_MM)))
            .collect();
        let row_lines = wrapped.iter().map(Vec::len).max().unwrap_or(1);
        let row_height = row_lines as f32 * line_height(size);
        self.ensure_room(row_height);

        let top = self.y;
        for (((offset, _), _), lines) in cells.iter().zip(&wrapped) {
            let x = MARGIN_MM + offset * USABLE_WIDTH_MM;
            for (i, line) in lines.iter().enumerate() {
                let baseline = top - i as f32 * line_height(size) - size * PT_TO_MM;
                self.layer
                    .use_text(line.as_str(), size, Mm(x), Mm(baseline), self.font(bold));
            }
        }
        self.y = top - row_height - 1.0;
    }

    /// Red inline notice used when an exhibit image cannot be embedded.
    fn warning_line(&mut self, text: &str) {
        self.layer
            .set_fill_color(Color::Rgb(Rgb::new(0.8, 0.1, 0.1, None)));
        self.write_wrapped(text, TABLE_SIZE, false, MARGIN_MM, USABLE_WIDTH_MM);
        self.layer
            .set_fill_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
    }

    /// Decode and place an image under the cursor, scaled (down only) to
    /// fit the remaining page area within the margins.
    fn embed_image(&mut self, data: &[u8]) -> Result<(), String> {
        use printpdf::image_crate::GenericImageView;

        const IMAGE_DPI: f32 = 96.0;

        let dynamic =
            printpdf::image_crate::load_from_memory(data).map_err(|e| format!("decode: {e}"))?;
        let (width_px, height_px) = dynamic.dimensions();
        let natural_w = width_px as f32 * 25.4 / IMAGE_DPI;
        let natural_h = height_px as f32 * 25.4 / IMAGE_DPI;
        if natural_w <= 0.0 || natural_h <= 0.0 {
            return Err("image has zero dimensions".into());
        }

        // Keep a little headroom so a caption-sized remainder never forces
        // the image onto a fresh page by itself.
        if self.y - MARGIN_MM < 40.0 {
            self.new_page();
        }
        let max_h = self.y - MARGIN_MM;
        let scale = (USABLE_WIDTH_MM / natural_w)
            .min(max_h / natural_h)
            .min(1.0);
        let draw_h = natural_h * scale;

        let image = Image::from_dynamic_image(&dynamic);
        image.add_to_layer(
            self.layer.clone(),
            ImageTransform {
                translate_x: Some(Mm(MARGIN_MM)),
                translate_y: Some(Mm(self.y - draw_h)),
                scale_x: Some(scale),
                scale_y: Some(scale),
                dpi: Some(IMAGE_DPI),
                ..Default::default()
            },
        );
        self.y -= draw_h;
        Ok(())
    }

    fn finish(self) -> Result<Vec<u8>, PacketError> {
        self.doc
            .save_to_bytes()
            .map_err(|e| PacketError::Render(format!("save: {e}")))
    }
}

/// Render the packet model to PDF bytes. `images` pairs with
/// `model.exhibits`: `None` marks a blob missing from the store. A missing
/// or undecodable image becomes an inline warning, never a failure.
pub fn render_packet(model: &PacketModel, images: &[Option<Bytes>]) -> Result<Vec<u8>, PacketError> {
    debug_assert_eq!(images.len(), model.exhibits.len());

    let mut w = PageWriter::new(&format!("Dispute Evidence Packet {}", model.dispute_id))?;

    // Cover
    w.write_centered("Stripe Dispute Evidence Packet", TITLE_SIZE, true);
    w.write_centered(&format!("Dispute ID: {}", model.dispute_id), SUBTITLE_SIZE, false);
    w.move_down(10.0);

    // 1. Summary
    w.section_heading("1. Dispute Summary");
    for (label, value) in &model.summary {
        w.write_wrapped(
            &format!("{label}: {value}"),
            BODY_SIZE,
            false,
            MARGIN_MM,
            USABLE_WIDTH_MM,
        );
    }
    w.move_down(6.0);

    // 2. Explanation
    w.section_heading("2. Dispute Explanation");
    w.write_wrapped(&model.explanation, BODY_SIZE, false, MARGIN_MM, USABLE_WIDTH_MM);
    w.move_down(6.0);

    // 3. Customer details
    w.section_heading("3. Transaction & Customer Details");
    for (label, value) in &model.customer_details {
        w.write_wrapped(
            &format!("{label}: {value}"),
            BODY_SIZE,
            false,
            MARGIN_MM,
            USABLE_WIDTH_MM,
        );
    }
    w.move_down(6.0);

    // 4. Evidence index
    w.section_heading("4. Evidence Index");
    if model.index.is_empty() {
        w.write_wrapped(NO_EVIDENCE_NOTE, BODY_SIZE, false, MARGIN_MM, USABLE_WIDTH_MM);
    } else {
        w.table_row(
            &[
                (COL_EXHIBIT, "Exhibit"),
                (COL_TYPE, "Type"),
                (COL_FILENAME, "Filename"),
                (COL_DESC, "Description"),
            ],
            TABLE_SIZE,
            true,
        );
        w.hline();
        for row in &model.index {
            let kind = row.kind.as_str().to_uppercase();
            w.table_row(
                &[
                    (COL_EXHIBIT, row.label.as_str()),
                    (COL_TYPE, kind.as_str()),
                    (COL_FILENAME, row.filename.as_str()),
                    (COL_DESC, row.description),
                ],
                TABLE_SIZE,
                false,
            );
        }
    }

    // 5. Exhibits, one page per image
    w.new_page();
    w.section_heading("5. Exhibits");
    if model.exhibits.is_empty() {
        w.write_wrapped(
            NO_IMAGE_EXHIBITS_NOTE,
            BODY_SIZE,
            false,
            MARGIN_MM,
            USABLE_WIDTH_MM,
        );
    } else {
        for (i, (exhibit, image)) in model.exhibits.iter().zip(images).enumerate() {
            if i > 0 {
                w.new_page();
            }
            let heading = format!(
                "Exhibit {} - {} ({})",
                exhibit.label,
                exhibit.kind.as_str().to_uppercase(),
                exhibit.filename
            );
            w.write_wrapped(&heading, SUBTITLE_SIZE, true, MARGIN_MM, USABLE_WIDTH_MM);
            let caption = format!(
                "Uploaded: {} - Size: {}",
                format_datetime(exhibit.uploaded_at),
                format_bytes(exhibit.size_bytes)
            );
            w.write_wrapped(&caption, TABLE_SIZE, false, MARGIN_MM, USABLE_WIDTH_MM);
            w.move_down(4.0);

            match image {
                Some(data) => {
                    if let Err(e) = w.embed_image(data) {
                        warn!(
                            "failed to embed exhibit {} ({}): {e}",
                            exhibit.label, exhibit.filename
                        );
                        w.warning_line(
                            "Warning: an error occurred while embedding this exhibit image. \
                             The evidence is still listed in the index above.",
                        );
                    }
                }
                None => {
                    w.warning_line(
                        "Warning: unable to embed exhibit image: file not found on server.",
                    );
                }
            }
        }
    }

    w.finish()
}
