use anyhow::Context;
use clap::{Parser, Subcommand};
use holo_engine::{default_registry, run_extract, run_pipeline, PipelineSpec};
use std::path::PathBuf;
use tracing::info;

mod logging;

#[derive(Parser)]
#[command(name = "holo")]
#[command(about = "Holo - person record cleaning pipeline", long_about = None)]
struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a pipeline from YAML configuration
    Run {
        /// Path to pipeline YAML file
        #[arg(short, long)]
        config: PathBuf,
        /// Fetch a fresh raw snapshot first (needs an `extract` block)
        #[arg(long)]
        extract: bool,
    },
    /// Validate a pipeline configuration
    Validate {
        /// Path to pipeline YAML file
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Fetch every record from the API into a raw snapshot
    Extract {
        /// Path to pipeline YAML file
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show version information
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    match cli.command {
        Commands::Run { config, extract } => {
            let spec = PipelineSpec::from_yaml_file(&config)?;
            if extract {
                let extract = spec
                    .extract
                    .as_ref()
                    .context("--extract needs an `extract` block in the config")?;
                run_extract(extract)?;
            }
            let registry = default_registry()?;
            let stats = run_pipeline(spec, &registry)?;
            info!(
                input = stats.total_documents,
                output = stats.num_documents,
                failed = stats.num_failed,
                elapsed_ms = stats.elapsed_ms,
                "pipeline completed"
            );
            for step in &stats.step_statistics {
                println!(
                    "  step {:02} {:<20} in {:>6}  removed {:>6}  failed {:>6}",
                    step.step_index,
                    step.step_name,
                    step.documents_remaining_before,
                    step.documents_removed,
                    step.documents_failed
                );
            }
            println!(
                "✓ Pipeline completed: {} of {} records kept",
                stats.num_documents, stats.total_documents
            );
        }
        Commands::Validate { config } => {
            let spec = PipelineSpec::from_yaml_file(&config)?;
            let registry = default_registry()?;
            let plan = holo_engine::Plan::compile(spec, &registry)?;
            println!(
                "✓ Pipeline configuration is valid ({} steps: {})",
                plan.step_names().len(),
                plan.step_names().join(" → ")
            );
        }
        Commands::Extract { config } => {
            let spec = PipelineSpec::from_yaml_file(&config)?;
            let extract = spec
                .extract
                .as_ref()
                .context("Config has no `extract` block")?;
            let path = run_extract(extract)?;
            println!("✓ Wrote {}", path.display());
        }
        Commands::Version => {
            println!("holo version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
