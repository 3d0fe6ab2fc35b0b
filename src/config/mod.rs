pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_file_extensions, validate_output_formats, validate_path, validate_url, Validate,
};
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "unfollowr")]
#[command(about = "Find who doesn't follow you back from an Instagram data export")]
pub struct CliConfig {
    /// Export files to analyze: JSON or HTML parts, or the downloaded ZIP.
    /// Filenames must contain 'followers' / 'following' for role matching
    /// (ZIP entries already do).
    #[arg(long, value_delimiter = ',')]
    pub files: Vec<String>,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    /// Where the bundled demo files live; fetched when no files are given.
    /// Pass an empty string to disable.
    #[arg(long, default_value = "https://unfollowr.app")]
    pub sample_endpoint: String,

    #[arg(long, value_delimiter = ',', default_values_t = vec!["csv".to_string(), "txt".to_string()])]
    pub formats: Vec<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl ConfigProvider for CliConfig {
    fn input_files(&self) -> &[String] {
        &self.files
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn sample_endpoint(&self) -> &str {
        &self.sample_endpoint
    }

    fn output_formats(&self) -> &[String] {
        &self.formats
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("output_path", &self.output_path)?;
        validate_file_extensions("files", &self.files, &["json", "html", "htm", "zip"])?;
        validate_output_formats("formats", &self.formats)?;
        if !self.sample_endpoint.is_empty() {
            validate_url("sample_endpoint", &self.sample_endpoint)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> CliConfig {
        CliConfig {
            files: vec!["followers_1.json".to_string()],
            output_path: "./output".to_string(),
            sample_endpoint: "https://unfollowr.app".to_string(),
            formats: vec!["csv".to_string()],
            verbose: false,
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn test_rejects_unknown_extension() {
        let mut config = base_config();
        config.files = vec!["followers.pdf".to_string()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_endpoint() {
        let mut config = base_config();
        config.sample_endpoint = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_endpoint_disables_sampling() {
        let mut config = base_config();
        config.sample_endpoint = String::new();
        assert!(config.validate().is_ok());
    }
}
