use crate::core::Pipeline;
use crate::utils::error::Result;

pub struct AnalysisEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> AnalysisEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        println!("Starting export analysis...");

        println!("Reading export files...");
        let documents = self.pipeline.extract().await?;
        println!("Loaded {} documents", documents.len());

        println!("Analyzing relationships...");
        let report = self.pipeline.transform(documents).await?;
        println!(
            "{} followers / {} following: {} don't follow back, {} you don't follow",
            report.stats.followers,
            report.stats.following,
            report.records.len(),
            report.reverse_records.len()
        );

        println!("Writing results...");
        let output_path = self.pipeline.load(report).await?;
        println!("Output saved to: {}", output_path);

        Ok(output_path)
    }
}
