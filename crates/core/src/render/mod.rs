//! Page rendering of populated documents.
//!
//! The `Renderer` trait turns a populated document into a page document.
//! `PdfRenderer` draws the first paper-space layout of a DXF file onto a
//! single PDF page.

mod error;
mod layout;
mod pdf;
mod traits;
mod types;

pub use error::RenderError;
pub use layout::{extract_layout, LayoutPage, Shape};
pub use pdf::PdfRenderer;
pub use traits::Renderer;
pub use types::{RenderJob, RenderResult};
