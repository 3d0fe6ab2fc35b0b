use clap::Parser;
use unfollowr::config::toml_config::TomlConfig;
use unfollowr::core::ConfigProvider;
use unfollowr::utils::{logger, validation::Validate};
use unfollowr::{AnalysisEngine, ExportPipeline, LocalStorage};

#[derive(Parser)]
#[command(name = "toml-analyze")]
#[command(about = "Run the export analysis from a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "unfollowr.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Show what would be processed without executing
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    logger::init_cli_logger(args.verbose);

    tracing::info!("Loading configuration from: {}", args.config);

    let config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config file '{}': {}", args.config, e);
            eprintln!("Make sure the file exists and is valid TOML");
            std::process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    display_config_summary(&config);

    if args.dry_run {
        tracing::info!("Dry run, no processing will occur");
        return Ok(());
    }

    let storage = LocalStorage::new(config.output_path().to_string());
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

fn display_config_summary(config: &TomlConfig) {
    println!("Configuration summary:");
    println!(
        "  Pipeline: {} v{}",
        config.pipeline.name,
        config.pipeline.version.as_deref().unwrap_or("0")
    );
    if config.input_files().is_empty() {
        println!("  Source: sample files ({})", config.sample_endpoint());
    } else {
        println!("  Source: {} export file(s)", config.input_files().len());
    }
    println!("  Output: {}", config.output_path());
    println!("  Formats: {}", config.output_formats().join(", "));
    println!();
}
