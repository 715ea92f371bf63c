//! Document backend: fills template attributes and saves the result.
//!
//! The `DocumentBackend` trait is the boundary to the drawing format. The
//! engine hands it a template path, an output path and the normalized
//! `AttributeSet`; the backend locates the template's attribute elements,
//! writes every value whose tag matches and saves a new file.
//!
//! `DxfBackend` implements it for ASCII DXF templates, filling `ATTRIB`
//! elements of block references placed in paper-space layouts.

mod dxf_backend;
mod error;
mod traits;
mod types;

pub use dxf_backend::DxfBackend;
pub use error::DocumentError;
pub use traits::DocumentBackend;
pub use types::{PopulateJob, PopulateResult};
