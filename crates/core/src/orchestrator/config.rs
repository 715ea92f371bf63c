//! Per-run settings.

use chrono::{DateTime, Local};
use std::fmt::Write;
use std::path::{Path, PathBuf};

use crate::config::Config;

const FALLBACK_DATE_FORMAT: &str = "%d/%m/%Y";

/// Settings of one run, derived from the configuration and the input path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    /// Input file of the run.
    pub input: PathBuf,
    pub template_folder: PathBuf,
    pub template_extension: String,
    pub output_folder: PathBuf,
    pub output_extension: String,
    /// chrono format of the current-date tag.
    pub date_format: String,
    /// Folder for rendered pages; `None` disables rendering.
    pub render_folder: Option<PathBuf>,
}

impl RunSettings {
    /// Builds the settings for a run over `input`.
    ///
    /// Without a configured output folder, documents go beside the input file.
    pub fn from_config(config: &Config, input: &Path) -> Self {
        let output_folder = config.output.folder_for(input);
        let render_folder = config
            .render
            .enabled
            .then(|| output_folder.join(config.render.subfolder.trim()));

        Self {
            input: input.to_path_buf(),
            template_folder: config.templates.folder.clone(),
            template_extension: config.templates.extension.clone(),
            output_folder,
            output_extension: config.output.extension.clone(),
            date_format: config.output.date_format.clone(),
            render_folder,
        }
    }

    /// Formats the current-date tag value.
    pub fn date_stamp(&self, now: DateTime<Local>) -> String {
        let mut stamp = String::new();
        if write!(stamp, "{}", now.format(&self.date_format)).is_err() {
            stamp.clear();
            let _ = write!(stamp, "{}", now.format(FALLBACK_DATE_FORMAT));
        }
        stamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_from_config_defaults() {
        let settings = RunSettings::from_config(&Config::default(), Path::new("/data/list.csv"));

        assert_eq!(settings.template_folder, PathBuf::from("templates"));
        assert_eq!(settings.output_folder, PathBuf::from("/data"));
        assert_eq!(settings.output_extension, ".dxf");
        assert!(settings.render_folder.is_none());
    }

    #[test]
    fn test_render_folder_under_output() {
        let mut config = Config::default();
        config.render.enabled = true;
        config.output.folder = Some(PathBuf::from("/out"));

        let settings = RunSettings::from_config(&config, Path::new("list.csv"));
        assert_eq!(settings.render_folder, Some(PathBuf::from("/out/Pdf")));
    }

    #[test]
    fn test_date_stamp() {
        let settings = RunSettings::from_config(&Config::default(), Path::new("list.csv"));
        let now = Local.with_ymd_and_hms(2026, 3, 7, 10, 30, 0).unwrap();
        assert_eq!(settings.date_stamp(now), "07/03/2026");
    }

    #[test]
    fn test_invalid_date_format_falls_back() {
        let mut settings = RunSettings::from_config(&Config::default(), Path::new("list.csv"));
        settings.date_format = "%d/%".to_string();
        let now = Local.with_ymd_and_hms(2026, 3, 7, 10, 30, 0).unwrap();
        assert_eq!(settings.date_stamp(now), "07/03/2026");
    }
}
