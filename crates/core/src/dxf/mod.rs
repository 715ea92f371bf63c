//! Minimal ASCII DXF support.
//!
//! Enough of the format to fill block attributes and to read paper-space
//! geometry back for page rendering. Documents are kept as the original list
//! of group code/value pairs so that saving only changes the values that were
//! written.

mod document;
mod entity;

pub use document::{decode_unicode_escapes, DxfDocument, DxfError, Encoding};
pub use entity::{AttributeElement, Entity, Space};
