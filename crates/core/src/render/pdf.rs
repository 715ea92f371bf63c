//! PDF rendering of the first paper-space layout.

use async_trait::async_trait;
use printpdf::{BuiltinFont, Line, Mm, PdfDocument, Point};
use std::io::BufWriter;
use tracing::debug;

use super::error::RenderError;
use super::layout::{extract_layout, LayoutPage, Shape};
use super::traits::Renderer;
use super::types::{RenderJob, RenderResult};
use crate::dxf::DxfDocument;

/// A4 short and long edges in millimetres.
const PAGE_SHORT_MM: f64 = 210.0;
const PAGE_LONG_MM: f64 = 297.0;
const MARGIN_MM: f64 = 10.0;
const LINE_WIDTH_PT: f32 = 0.3;
const PT_PER_MM: f64 = 72.0 / 25.4;

/// Renders DXF documents to single-page PDF files.
#[derive(Debug, Clone, Default)]
pub struct PdfRenderer;

impl PdfRenderer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Renderer for PdfRenderer {
    fn name(&self) -> &str {
        "pdf"
    }

    fn extension(&self) -> &str {
        ".pdf"
    }

    async fn render(&self, job: RenderJob) -> Result<RenderResult, RenderError> {
        let bytes = tokio::fs::read(&job.source)
            .await
            .map_err(|source| RenderError::SourceUnreadable {
                path: job.source.clone(),
                source,
            })?;

        let title = job.title.clone();
        let pdf = tokio::task::spawn_blocking(move || render_pdf(&bytes, &title))
            .await
            .map_err(|e| RenderError::Task(e.to_string()))??;

        if let Some(parent) = job.output.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| RenderError::WriteFailed {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }
        tokio::fs::write(&job.output, &pdf)
            .await
            .map_err(|source| RenderError::WriteFailed {
                path: job.output.clone(),
                source,
            })?;

        debug!(output = %job.output.display(), size = pdf.len(), "Rendered PDF");

        Ok(RenderResult {
            output: job.output,
            size_bytes: pdf.len() as u64,
        })
    }
}

/// Renders DXF bytes to PDF bytes.
pub(crate) fn render_pdf(bytes: &[u8], title: &str) -> Result<Vec<u8>, RenderError> {
    let document =
        DxfDocument::from_bytes(bytes).map_err(|e| RenderError::InvalidDocument(e.to_string()))?;
    let page = extract_layout(&document).ok_or(RenderError::NoPrintLayout)?;
    draw_page(&page, title)
}

/// Maps drawing coordinates onto the printable area of the page, keeping
/// the aspect ratio and centring the drawing.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Placement {
    page_width: f64,
    page_height: f64,
    scale: f64,
    offset_x: f64,
    offset_y: f64,
}

impl Placement {
    fn fit(bounds: (f64, f64, f64, f64)) -> Self {
        let (min_x, min_y, max_x, max_y) = bounds;
        let width = max_x - min_x;
        let height = max_y - min_y;

        let (page_width, page_height) = if width > height {
            (PAGE_LONG_MM, PAGE_SHORT_MM)
        } else {
            (PAGE_SHORT_MM, PAGE_LONG_MM)
        };
        let usable_w = page_width - 2.0 * MARGIN_MM;
        let usable_h = page_height - 2.0 * MARGIN_MM;

        let scale = match (width > 0.0, height > 0.0) {
            (true, true) => (usable_w / width).min(usable_h / height),
            (true, false) => usable_w / width,
            (false, true) => usable_h / height,
            (false, false) => 1.0,
        };

        Self {
            page_width,
            page_height,
            scale,
            offset_x: MARGIN_MM + (usable_w - width * scale) / 2.0 - min_x * scale,
            offset_y: MARGIN_MM + (usable_h - height * scale) / 2.0 - min_y * scale,
        }
    }

    fn map(&self, x: f64, y: f64) -> (f64, f64) {
        (self.offset_x + x * self.scale, self.offset_y + y * self.scale)
    }
}

fn draw_page(page: &LayoutPage, title: &str) -> Result<Vec<u8>, RenderError> {
    let bounds = page.bounds().ok_or(RenderError::NoPrintLayout)?;
    let placement = Placement::fit(bounds);

    let (doc, page_index, layer_index) = PdfDocument::new(
        title,
        Mm(placement.page_width as f32),
        Mm(placement.page_height as f32),
        &page.name,
    );
    let layer = doc.get_page(page_index).get_layer(layer_index);
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| RenderError::Pdf(format!("font error: {e}")))?;
    layer.set_outline_thickness(LINE_WIDTH_PT);

    for shape in &page.shapes {
        match shape {
            Shape::Polyline { points, closed } => {
                let points = points
                    .iter()
                    .map(|&(x, y)| {
                        let (px, py) = placement.map(x, y);
                        (Point::new(Mm(px as f32), Mm(py as f32)), false)
                    })
                    .collect();
                layer.add_line(Line {
                    points,
                    is_closed: *closed,
                });
            }
            Shape::Text { x, y, height, text } => {
                let (px, py) = placement.map(*x, *y);
                let size = (height * placement.scale * PT_PER_MM).max(1.0);
                layer.use_text(text.as_str(), size as f32, Mm(px as f32), Mm(py as f32), &font);
            }
        }
    }

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| RenderError::Pdf(format!("save error: {e}")))?;
    buf.into_inner()
        .map_err(|e| RenderError::Pdf(format!("buffer error: {e}")))
}
