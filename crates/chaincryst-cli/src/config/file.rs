use crate::error::{CliError, Result};
use chaincryst::engine::config::RadiusPolicy;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// `radius` accepts either `"auto"` or a bare number.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum FileRadius {
    Value(f64),
    Text(String),
}

impl FileRadius {
    pub fn to_policy(&self) -> Result<RadiusPolicy> {
        let policy = match self {
            FileRadius::Value(v) => RadiusPolicy::fixed(*v),
            FileRadius::Text(s) => s.parse(),
        };
        policy.map_err(|e| CliError::Config(e.to_string()))
    }
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileSearchConfig {
    pub n_samples: Option<usize>,
    pub radius: Option<FileRadius>,
    pub clash_threshold: Option<f64>,
    pub padding: Option<f64>,
    pub contact_threshold: Option<f64>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileOutputConfig {
    pub extension: Option<String>,
    pub summary: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConfig {
    pub search: Option<FileSearchConfig>,
    pub output: Option<FileOutputConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn full_file_is_parsed() {
        let config: FileConfig = toml::from_str(
            r#"
            [search]
            n-samples = 12
            radius = "auto"
            clash-threshold = 2.2
            padding = 3.0
            contact-threshold = 0.9

            [output]
            extension = "POSCAR"
            summary = "summary.csv"
            "#,
        )
        .unwrap();

        let search = config.search.unwrap();
        assert_eq!(search.n_samples, Some(12));
        assert_eq!(search.radius, Some(FileRadius::Text("auto".to_string())));
        assert_eq!(search.clash_threshold, Some(2.2));
        let output = config.output.unwrap();
        assert_eq!(output.extension.as_deref(), Some("POSCAR"));
        assert_eq!(output.summary, Some(PathBuf::from("summary.csv")));
    }

    #[test]
    fn numeric_radius_becomes_fixed_policy() {
        let config: FileConfig = toml::from_str("[search]\nradius = 6.5\n").unwrap();
        let radius = config.search.unwrap().radius.unwrap();
        assert_eq!(radius.to_policy().unwrap(), RadiusPolicy::Fixed(6.5));
    }

    #[test]
    fn invalid_radius_text_is_a_config_error() {
        let radius = FileRadius::Text("wide".to_string());
        assert!(matches!(radius.to_policy(), Err(CliError::Config(_))));
        assert!(FileRadius::Value(0.0).to_policy().is_err());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[search]\nn-sample = 4\n").unwrap();

        let result = FileConfig::from_file(&path);
        assert!(matches!(result, Err(CliError::FileParsing { .. })));
    }
}
