//! Types for the document module.

use serde::Serialize;
use std::path::PathBuf;

use crate::normalize::AttributeSet;

/// A request to populate one template.
#[derive(Debug, Clone)]
pub struct PopulateJob {
    /// Template to read (never modified).
    pub template: PathBuf,
    /// Path of the populated document.
    pub output: PathBuf,
    /// Values to inject, by tag.
    pub attributes: AttributeSet,
}

/// Result of a successful population.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PopulateResult {
    /// Path of the saved document.
    pub output: PathBuf,
    /// Attribute elements located in the template.
    pub elements_found: usize,
    /// Elements that received a value.
    pub attributes_written: usize,
}
