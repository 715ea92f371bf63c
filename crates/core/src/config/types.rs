use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub templates: TemplatesConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub render: RenderConfig,
}

/// Tabular input configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InputConfig {
    /// Field delimiter of the exported sheet (default: ';')
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
        }
    }
}

fn default_delimiter() -> char {
    ';'
}

/// Template store configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TemplatesConfig {
    /// Folder holding `<TemplateName><extension>` files
    #[serde(default = "default_template_folder")]
    pub folder: PathBuf,
    #[serde(default = "default_extension")]
    pub extension: String,
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            folder: default_template_folder(),
            extension: default_extension(),
        }
    }
}

fn default_template_folder() -> PathBuf {
    PathBuf::from("templates")
}

fn default_extension() -> String {
    ".dxf".to_string()
}

/// Output configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Output folder; when unset, artifacts are written beside the input file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<PathBuf>,
    #[serde(default = "default_extension")]
    pub extension: String,
    /// chrono format string for the DATA_ATUAL attribute
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            folder: None,
            extension: default_extension(),
            date_format: default_date_format(),
        }
    }
}

fn default_date_format() -> String {
    "%d/%m/%Y".to_string()
}

impl OutputConfig {
    /// Resolves the output folder for a given input file.
    pub fn folder_for(&self, input: &Path) -> PathBuf {
        match &self.folder {
            Some(folder) => folder.clone(),
            None => input
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(".")),
        }
    }
}

/// Page render configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RenderConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Subfolder of the output folder receiving the rendered pages
    #[serde(default = "default_render_subfolder")]
    pub subfolder: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            subfolder: default_render_subfolder(),
        }
    }
}

fn default_render_subfolder() -> String {
    "Pdf".to_string()
}
