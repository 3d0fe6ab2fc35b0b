pub mod classify;
pub mod engine;
pub mod export;
pub mod extract;
pub mod pipeline;
pub mod project;
pub mod reconcile;

pub use crate::domain::model::{AnalysisReport, RawExportDocument, ReconciliationResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
