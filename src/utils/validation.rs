use crate::utils::error::{Result, UnfollowrError};
use std::collections::HashSet;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(UnfollowrError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(UnfollowrError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(UnfollowrError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(UnfollowrError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(UnfollowrError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_file_extensions(
    field_name: &str,
    files: &[String],
    allowed_extensions: &[&str],
) -> Result<()> {
    let allowed_set: HashSet<&str> = allowed_extensions.iter().copied().collect();

    for file in files {
        if let Some(extension) = std::path::Path::new(file)
            .extension()
            .and_then(|ext| ext.to_str())
        {
            if !allowed_set.contains(extension) {
                return Err(UnfollowrError::InvalidConfigValueError {
                    field: field_name.to_string(),
                    value: file.clone(),
                    reason: format!(
                        "Unsupported file extension: {}. Allowed extensions: {}",
                        extension,
                        allowed_extensions.join(", ")
                    ),
                });
            }
        } else {
            return Err(UnfollowrError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: file.clone(),
                reason: "File has no extension or invalid filename".to_string(),
            });
        }
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(UnfollowrError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_output_formats(field_name: &str, formats: &[String]) -> Result<()> {
    const KNOWN: [&str; 2] = ["csv", "txt"];

    for format in formats {
        if !KNOWN.contains(&format.as_str()) {
            return Err(UnfollowrError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: format.clone(),
                reason: format!("Unknown output format. Supported: {}", KNOWN.join(", ")),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("sample_endpoint", "https://example.com").is_ok());
        assert!(validate_url("sample_endpoint", "http://example.com").is_ok());
        assert!(validate_url("sample_endpoint", "").is_err());
        assert!(validate_url("sample_endpoint", "invalid-url").is_err());
        assert!(validate_url("sample_endpoint", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_file_extensions() {
        let files = vec!["followers_1.json".to_string(), "following.html".to_string()];
        assert!(validate_file_extensions("files", &files, &["json", "html", "htm", "zip"]).is_ok());

        let invalid_files = vec!["followers.pdf".to_string()];
        assert!(
            validate_file_extensions("files", &invalid_files, &["json", "html", "htm", "zip"])
                .is_err()
        );
    }

    #[test]
    fn test_validate_output_formats() {
        let formats = vec!["csv".to_string(), "txt".to_string()];
        assert!(validate_output_formats("formats", &formats).is_ok());

        let bad = vec!["xlsx".to_string()];
        assert!(validate_output_formats("formats", &bad).is_err());
    }
}
