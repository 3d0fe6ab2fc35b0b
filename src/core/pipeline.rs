use crate::core::export::{dated_export_name, render_csv, render_txt};
use crate::core::extract::extract;
use crate::core::project::project;
use crate::core::reconcile::reconcile;
use crate::core::{ConfigProvider, Pipeline, Storage};
use crate::domain::model::{AnalysisReport, RawExportDocument, Role, SessionStats};
use crate::utils::error::Result;
use reqwest::Client;
use std::io::Read;
use std::path::Path;

const SAMPLE_FILES: [(&str, &str); 2] = [
    ("followers_sample.html", "instagram_followers_sample.html"),
    ("following_sample.html", "instagram_following_sample.html"),
];

// Same demo pair the hosted samples contain, used when the fetch fails.
const BUILTIN_FOLLOWERS_SAMPLE: &str =
    r#"<ul><li><a href="https://www.instagram.com/janedoe/">janedoe</a></li></ul>"#;
const BUILTIN_FOLLOWING_SAMPLE: &str = concat!(
    r#"<ul><li><a href="https://www.instagram.com/janedoe/">janedoe</a></li>"#,
    r#"<li><a href="https://www.instagram.com/taylorswift/">taylorswift</a></li></ul>"#
);

pub struct ExportPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    client: Client,
}

impl<S: Storage, C: ConfigProvider> ExportPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self {
            storage,
            config,
            client: Client::new(),
        }
    }

    fn documents_from_zip(path: &str, data: Vec<u8>) -> Result<Vec<RawExportDocument>> {
        let mut documents = Vec::new();
        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(data))?;
        for index in 0..archive.len() {
            let mut entry = archive.by_index(index)?;
            let name = Path::new(entry.name())
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default()
                .to_string();
            let lower = name.to_lowercase();
            if !(lower.ends_with(".json") || lower.ends_with(".html") || lower.ends_with(".htm")) {
                continue;
            }
            let mut content = String::new();
            if entry.read_to_string(&mut content).is_err() {
                tracing::warn!("Skipping non-text entry '{}' in {}", name, path);
                continue;
            }
            documents.push(RawExportDocument::new(name, content));
        }
        Ok(documents)
    }

    async fn fetch_samples(&self) -> Vec<RawExportDocument> {
        let base = self.config.sample_endpoint().trim_end_matches('/');
        let mut documents = Vec::new();
        for (doc_name, remote_name) in SAMPLE_FILES {
            let url = format!("{}/{}", base, remote_name);
            tracing::debug!("Fetching sample file: {}", url);
            let body = match self.client.get(&url).send().await {
                Ok(response) if response.status().is_success() => response.text().await.ok(),
                Ok(response) => {
                    tracing::warn!("Sample fetch returned {}: {}", response.status(), url);
                    None
                }
                Err(e) => {
                    tracing::warn!("Sample fetch failed: {}", e);
                    None
                }
            };
            match body {
                Some(content) => documents.push(RawExportDocument::new(doc_name, content)),
                None => return Self::builtin_samples(),
            }
        }
        documents
    }

    fn builtin_samples() -> Vec<RawExportDocument> {
        vec![
            RawExportDocument::new("followers_sample.html", BUILTIN_FOLLOWERS_SAMPLE),
            RawExportDocument::new("following_sample.html", BUILTIN_FOLLOWING_SAMPLE),
        ]
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for ExportPipeline<S, C> {
    /// Read every configured input into raw documents. A path that cannot
    /// be read is logged and skipped rather than aborting the run. ZIP
    /// inputs (the form Instagram delivers exports in) are unpacked and
    /// their JSON/HTML entries loaded individually. When nothing was
    /// loaded and a sample endpoint is configured, the bundled demo files
    /// are fetched instead.
    async fn extract(&self) -> Result<Vec<RawExportDocument>> {
        let mut documents = Vec::new();

        for path in self.config.input_files() {
            if path.to_lowercase().ends_with(".zip") {
                match tokio::fs::read(path).await {
                    Ok(data) => match Self::documents_from_zip(path, data) {
                        Ok(entries) => documents.extend(entries),
                        Err(e) => tracing::warn!("Skipping unreadable archive {}: {}", path, e),
                    },
                    Err(e) => tracing::warn!("Skipping unreadable file {}: {}", path, e),
                }
                continue;
            }

            match tokio::fs::read_to_string(path).await {
                Ok(content) => {
                    let name = Path::new(path)
                        .file_name()
                        .and_then(|n| n.to_str())
                        .unwrap_or(path)
                        .to_string();
                    documents.push(RawExportDocument::new(name, content));
                }
                Err(e) => tracing::warn!("Skipping unreadable file {}: {}", path, e),
            }
        }

        if documents.is_empty() && !self.config.sample_endpoint().is_empty() {
            tracing::info!("No input documents, loading sample files");
            documents = self.fetch_samples().await;
        }

        Ok(documents)
    }

    /// Extract both role sets, reconcile, classify and project the
    /// difference lists, and render the export payloads. Pure over the
    /// document list.
    async fn transform(&self, documents: Vec<RawExportDocument>) -> Result<AnalysisReport> {
        let followers = extract(Role::Followers, &documents);
        let following = extract(Role::Following, &documents);

        let result = reconcile(&followers, &following);
        tracing::debug!(
            "Reconciled {} followers / {} following into {} non-followers, {} fans",
            result.follower_count,
            result.following_count,
            result.non_followers.len(),
            result.not_following_back.len()
        );

        let records = project(&result.non_followers);
        let reverse_records = project(&result.not_following_back);
        let csv_output = render_csv(&records)?;
        let txt_output = render_txt(&records);

        Ok(AnalysisReport {
            records,
            reverse_records,
            stats: SessionStats {
                followers: result.follower_count,
                following: result.following_count,
            },
            csv_output,
            txt_output,
        })
    }

    /// Write the session snapshot (both direction lists plus stats) and
    /// the requested download formats. Returns the output directory.
    async fn load(&self, report: AnalysisReport) -> Result<String> {
        self.storage
            .write_file(
                "unfollowr-items.json",
                serde_json::to_string_pretty(&report.records)?.as_bytes(),
            )
            .await?;
        self.storage
            .write_file(
                "unfollowr-items-reverse.json",
                serde_json::to_string_pretty(&report.reverse_records)?.as_bytes(),
            )
            .await?;
        self.storage
            .write_file(
                "unfollowr-stats.json",
                serde_json::to_string_pretty(&report.stats)?.as_bytes(),
            )
            .await?;

        for format in self.config.output_formats() {
            match format.as_str() {
                "csv" => {
                    self.storage
                        .write_file(&dated_export_name("csv"), report.csv_output.as_bytes())
                        .await?;
                }
                "txt" => {
                    self.storage
                        .write_file(&dated_export_name("txt"), report.txt_output.as_bytes())
                        .await?;
                }
                other => tracing::warn!("Ignoring unknown output format '{}'", other),
            }
        }

        Ok(self.config.output_path().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Tag;
    use httpmock::prelude::*;
    use std::collections::HashMap;
    use std::io::Write;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                crate::utils::error::UnfollowrError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct MockConfig {
        input_files: Vec<String>,
        output_path: String,
        sample_endpoint: String,
        output_formats: Vec<String>,
    }

    impl MockConfig {
        fn new(input_files: Vec<String>) -> Self {
            Self {
                input_files,
                output_path: "test_output".to_string(),
                sample_endpoint: String::new(),
                output_formats: vec!["csv".to_string(), "txt".to_string()],
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn input_files(&self) -> &[String] {
            &self.input_files
        }

        fn output_path(&self) -> &str {
            &self.output_path
        }

        fn sample_endpoint(&self) -> &str {
            &self.sample_endpoint
        }

        fn output_formats(&self) -> &[String] {
            &self.output_formats
        }
    }

    fn pipeline(config: MockConfig) -> ExportPipeline<MockStorage, MockConfig> {
        ExportPipeline::new(MockStorage::default(), config)
    }

    #[tokio::test]
    async fn test_extract_reads_loose_files() {
        let dir = tempfile::tempdir().unwrap();
        let followers = dir.path().join("followers_1.json");
        std::fs::write(&followers, r#"[{"string_list_data": [{"value": "alice"}]}]"#).unwrap();

        let config = MockConfig::new(vec![followers.to_str().unwrap().to_string()]);
        let documents = pipeline(config).extract().await.unwrap();

        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].name, "followers_1.json");
        assert!(documents[0].content.contains("alice"));
    }

    #[tokio::test]
    async fn test_extract_unreadable_path_is_skipped() {
        let config = MockConfig::new(vec!["/definitely/not/here.json".to_string()]);
        let documents = pipeline(config).extract().await.unwrap();
        assert!(documents.is_empty());
    }

    #[tokio::test]
    async fn test_extract_unpacks_zip_archives() {
        let dir = tempfile::tempdir().unwrap();
        let archive_path = dir.path().join("instagram_export.zip");

        let file = std::fs::File::create(&archive_path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        zip.start_file::<_, ()>(
            "connections/followers_and_following/followers_1.json",
            zip::write::FileOptions::default(),
        )
        .unwrap();
        zip.write_all(br#"[{"string_list_data": [{"value": "alice"}]}]"#)
            .unwrap();
        zip.start_file::<_, ()>(
            "connections/followers_and_following/following.html",
            zip::write::FileOptions::default(),
        )
        .unwrap();
        zip.write_all(br#"<a href="https://instagram.com/bob">bob</a>"#)
            .unwrap();
        zip.start_file::<_, ()>("media/photo.bin", zip::write::FileOptions::default())
            .unwrap();
        zip.write_all(&[0u8, 159, 146, 150]).unwrap();
        zip.finish().unwrap();

        let config = MockConfig::new(vec![archive_path.to_str().unwrap().to_string()]);
        let documents = pipeline(config).extract().await.unwrap();

        let names: Vec<&str> = documents.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["followers_1.json", "following.html"]);
    }

    #[tokio::test]
    async fn test_extract_fetches_samples_when_no_inputs() {
        let server = MockServer::start();
        let followers_mock = server.mock(|when, then| {
            when.method(GET).path("/instagram_followers_sample.html");
            then.status(200)
                .body(r#"<a href="https://instagram.com/janedoe">janedoe</a>"#);
        });
        let following_mock = server.mock(|when, then| {
            when.method(GET).path("/instagram_following_sample.html");
            then.status(200)
                .body(r#"<a href="https://instagram.com/janedoe">janedoe</a>"#);
        });

        let mut config = MockConfig::new(vec![]);
        config.sample_endpoint = server.base_url();
        let documents = pipeline(config).extract().await.unwrap();

        followers_mock.assert();
        following_mock.assert();
        assert_eq!(documents.len(), 2);
        assert_eq!(documents[0].name, "followers_sample.html");
        assert_eq!(documents[1].name, "following_sample.html");
    }

    #[tokio::test]
    async fn test_extract_sample_fetch_failure_uses_builtin_pair() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET);
            then.status(404);
        });

        let mut config = MockConfig::new(vec![]);
        config.sample_endpoint = server.base_url();
        let documents = pipeline(config).extract().await.unwrap();

        assert_eq!(documents.len(), 2);
        assert!(documents[1].content.contains("taylorswift"));
    }

    #[tokio::test]
    async fn test_transform_reconciles_and_classifies() {
        let documents = vec![
            RawExportDocument::new(
                "followers_1.json",
                r#"[{"string_list_data": [{"href": "https://instagram.com/janedoe/", "value": "janedoe"}]}]"#,
            ),
            RawExportDocument::new(
                "following.json",
                r#"{"relationships_following": [
                    {"string_list_data": [{"value": "janedoe"}]},
                    {"string_list_data": [{"value": "taylorswift"}]}
                ]}"#,
            ),
        ];

        let config = MockConfig::new(vec![]);
        let report = pipeline(config).transform(documents).await.unwrap();

        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].handle, "taylorswift");
        assert!(report.reverse_records.is_empty());
        assert_eq!(report.stats.followers, 1);
        assert_eq!(report.stats.following, 2);
        assert!(report
            .csv_output
            .contains("taylorswift,https://instagram.com/taylorswift/"));
        assert_eq!(report.txt_output, "taylorswift\n");
    }

    #[tokio::test]
    async fn test_transform_classifies_projected_records() {
        let documents = vec![
            RawExportDocument::new("followers.html", ""),
            RawExportDocument::new(
                "following.html",
                r#"<a href="https://instagram.com/win_free_crypto_5000">x</a>"#,
            ),
        ];

        let config = MockConfig::new(vec![]);
        let report = pipeline(config).transform(documents).await.unwrap();

        assert_eq!(report.records.len(), 1);
        assert!(report.records[0].tags.contains(&Tag::Spam));
    }

    #[tokio::test]
    async fn test_transform_empty_documents() {
        let config = MockConfig::new(vec![]);
        let report = pipeline(config).transform(vec![]).await.unwrap();

        assert!(report.records.is_empty());
        assert!(report.reverse_records.is_empty());
        assert_eq!(report.stats, SessionStats::default());
    }

    #[tokio::test]
    async fn test_load_writes_session_and_formats() {
        let storage = MockStorage::default();
        let config = MockConfig::new(vec![]);
        let pipeline = ExportPipeline::new(storage.clone(), config);

        let report = AnalysisReport {
            records: crate::core::project::project(&["taylorswift".to_string()]),
            reverse_records: vec![],
            stats: SessionStats {
                followers: 1,
                following: 2,
            },
            csv_output: "Username,Instagram URL\ntaylorswift,https://instagram.com/taylorswift/\n"
                .to_string(),
            txt_output: "taylorswift\n".to_string(),
        };

        let output_path = pipeline.load(report).await.unwrap();
        assert_eq!(output_path, "test_output");

        let items = storage.get_file("unfollowr-items.json").await.unwrap();
        let parsed: Vec<crate::domain::model::ResultRecord> =
            serde_json::from_slice(&items).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].handle, "taylorswift");

        let stats = storage.get_file("unfollowr-stats.json").await.unwrap();
        let parsed: SessionStats = serde_json::from_slice(&stats).unwrap();
        assert_eq!(parsed.followers, 1);

        assert!(storage
            .get_file("unfollowr-items-reverse.json")
            .await
            .is_some());
        assert!(storage.get_file(&dated_export_name("csv")).await.is_some());
        assert!(storage.get_file(&dated_export_name("txt")).await.is_some());
    }

    #[tokio::test]
    async fn test_load_respects_format_selection() {
        let storage = MockStorage::default();
        let mut config = MockConfig::new(vec![]);
        config.output_formats = vec!["txt".to_string()];
        let pipeline = ExportPipeline::new(storage.clone(), config);

        let report = AnalysisReport {
            records: vec![],
            reverse_records: vec![],
            stats: SessionStats::default(),
            csv_output: String::new(),
            txt_output: String::new(),
        };

        pipeline.load(report).await.unwrap();
        assert!(storage.get_file(&dated_export_name("csv")).await.is_none());
        assert!(storage.get_file(&dated_export_name("txt")).await.is_some());
    }
}
