use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_file_extensions, validate_non_empty_string, validate_output_formats, validate_path,
    validate_url, Validate,
};
use serde::{Deserialize, Serialize};

/// File-driven variant of the CLI configuration, for scripted runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub pipeline: PipelineMeta,
    pub source: SourceConfig,
    pub load: LoadConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineMeta {
    pub name: String,
    pub description: Option<String>,
    pub version: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default)]
    pub files: Vec<String>,
    pub sample_endpoint: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    #[serde(default = "default_formats")]
    pub formats: Vec<String>,
}

fn default_formats() -> Vec<String> {
    vec!["csv".to_string(), "txt".to_string()]
}

impl TomlConfig {
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: TomlConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }
}

impl ConfigProvider for TomlConfig {
    fn input_files(&self) -> &[String] {
        &self.source.files
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn sample_endpoint(&self) -> &str {
        self.source.sample_endpoint.as_deref().unwrap_or("")
    }

    fn output_formats(&self) -> &[String] {
        &self.load.formats
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("pipeline.name", &self.pipeline.name)?;
        validate_path("load.output_path", &self.load.output_path)?;
        validate_file_extensions("source.files", &self.source.files, &["json", "html", "htm", "zip"])?;
        validate_output_formats("load.formats", &self.load.formats)?;
        if let Some(endpoint) = self.source.sample_endpoint.as_deref() {
            if !endpoint.is_empty() {
                validate_url("source.sample_endpoint", endpoint)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        [pipeline]
        name = "weekly-audit"

        [source]
        files = ["followers_1.json", "following.json"]

        [load]
        output_path = "./output"
    "#;

    #[test]
    fn test_parse_minimal_config() {
        let config: TomlConfig = toml::from_str(SAMPLE).unwrap();
        assert_eq!(config.pipeline.name, "weekly-audit");
        assert_eq!(config.input_files().len(), 2);
        assert_eq!(config.output_formats(), default_formats());
        assert_eq!(config.sample_endpoint(), "");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("unfollowr.toml");
        std::fs::write(&path, SAMPLE).unwrap();

        let config = TomlConfig::from_file(path.to_str().unwrap()).unwrap();
        assert_eq!(config.output_path(), "./output");
    }

    #[test]
    fn test_invalid_format_rejected() {
        let mut config: TomlConfig = toml::from_str(SAMPLE).unwrap();
        config.load.formats = vec!["xlsx".to_string()];
        assert!(config.validate().is_err());
    }
}
