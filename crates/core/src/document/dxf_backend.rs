//! ASCII DXF document backend.

use async_trait::async_trait;
use std::path::Path;
use tracing::debug;

use super::error::DocumentError;
use super::traits::DocumentBackend;
use super::types::{PopulateJob, PopulateResult};
use crate::dxf::DxfDocument;
use crate::normalize::AttributeSet;

/// Fills `ATTRIB` elements of paper-space block references in DXF templates.
///
/// Tags are matched upper-cased. Attributes in model space and in ordinary
/// block definitions are left untouched.
#[derive(Debug, Clone, Default)]
pub struct DxfBackend;

impl DxfBackend {
    pub fn new() -> Self {
        Self
    }

    async fn read_template(path: &Path) -> Result<Vec<u8>, DocumentError> {
        tokio::fs::read(path)
            .await
            .map_err(|e| DocumentError::TemplateUnreadable {
                path: path.to_path_buf(),
                source: e,
            })
    }
}

/// Outcome of filling one template in memory.
struct Filled {
    bytes: Vec<u8>,
    elements_found: usize,
    attributes_written: usize,
}

/// Decodes the template, writes every matching attribute and re-encodes it.
fn fill_template(
    template: &Path,
    bytes: &[u8],
    attributes: &AttributeSet,
) -> Result<Filled, DocumentError> {
    let mut document =
        DxfDocument::from_bytes(bytes).map_err(|e| DocumentError::InvalidTemplate {
            path: template.to_path_buf(),
            reason: e.to_string(),
        })?;

    let elements = document.attribute_elements();
    let mut written = 0;
    for element in &elements {
        if let Some(value) = attributes.get(&element.tag) {
            if document.set_attribute_text(element, value) {
                written += 1;
            }
        }
    }

    debug!(
        "Template {:?} ({}): {} attribute elements, {} written",
        template,
        document.version().unwrap_or("no version"),
        elements.len(),
        written
    );

    if written == 0 {
        return Err(DocumentError::NoAttributes {
            path: template.to_path_buf(),
        });
    }

    Ok(Filled {
        bytes: document.to_bytes(),
        elements_found: elements.len(),
        attributes_written: written,
    })
}

#[async_trait]
impl DocumentBackend for DxfBackend {
    fn name(&self) -> &str {
        "dxf"
    }

    async fn populate(&self, job: PopulateJob) -> Result<PopulateResult, DocumentError> {
        let bytes = Self::read_template(&job.template).await?;

        let template = job.template.clone();
        let attributes = job.attributes;
        let filled = tokio::task::spawn_blocking(move || {
            fill_template(&template, &bytes, &attributes)
        })
        .await
        .map_err(|e| DocumentError::Task(e.to_string()))??;

        tokio::fs::write(&job.output, &filled.bytes)
            .await
            .map_err(|e| DocumentError::SaveFailed {
                path: job.output.clone(),
                source: e,
            })?;

        Ok(PopulateResult {
            output: job.output,
            elements_found: filled.elements_found,
            attributes_written: filled.attributes_written,
        })
    }
}
