use crate::domain::model::{AnalysisReport, RawExportDocument};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_files(&self) -> &[String];
    fn output_path(&self) -> &str;
    /// Base URL the bundled demo files are fetched from when no input
    /// files yield documents. Empty string disables the fetch.
    fn sample_endpoint(&self) -> &str;
    fn output_formats(&self) -> &[String];
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<RawExportDocument>>;
    async fn transform(&self, documents: Vec<RawExportDocument>) -> Result<AnalysisReport>;
    async fn load(&self, report: AnalysisReport) -> Result<String>;
}
