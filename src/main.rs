use clap::Parser;
use unfollowr::utils::{logger, validation::Validate};
use unfollowr::{AnalysisEngine, CliConfig, ExportPipeline, LocalStorage};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting unfollowr CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    let storage = LocalStorage::new(config.output_path.clone());
    let pipeline = ExportPipeline::new(storage, config);

    let engine = AnalysisEngine::new(pipeline);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("Analysis completed, output saved to {}", output_path);
        }
        Err(e) => {
            tracing::error!("Analysis failed: {}", e);
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}
