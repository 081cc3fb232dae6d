use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use console::Style;
use indicatif::{ProgressBar, ProgressStyle};
use quell_core::pipeline::config::PipelineConfig;
use quell_core::pipeline::{run_pipeline_reported, ProgressReporter, Stage};

#[derive(Args)]
pub struct RunArgs {
    /// Input SER video file
    pub file: PathBuf,

    /// Pipeline config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Frame rate for the encoded output (not read from the source)
    #[arg(long, default_value = "30.0")]
    pub fps: f64,

    /// Output file path
    #[arg(short, long, default_value = "denoised.ser")]
    pub output: PathBuf,
}

/// Drives one indicatif bar from the pipeline's stage callbacks.
struct CliReporter {
    bar: ProgressBar,
}

impl ProgressReporter for CliReporter {
    fn begin_stage(&self, stage: Stage, total_items: Option<usize>) {
        self.bar.set_message(stage.to_string());
        self.bar.set_length(total_items.unwrap_or(1) as u64);
        self.bar.set_position(0);
    }

    fn advance(&self, items_done: usize) {
        self.bar.set_position(items_done as u64);
    }

    fn finish_stage(&self) {
        if let Some(len) = self.bar.length() {
            self.bar.set_position(len);
        }
    }
}

pub fn run(args: &RunArgs) -> Result<()> {
    let config = if let Some(ref config_path) = args.config {
        let contents = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config {}", config_path.display()))?;
        toml::from_str(&contents).context("Invalid pipeline config")?
    } else {
        PipelineConfig {
            input: args.file.clone(),
            output: args.output.clone(),
            fps: args.fps,
        }
    };

    print_summary(&config);

    let bar = ProgressBar::new(1);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{msg:28} [{bar:40}] {pos}/{len}")?
            .progress_chars("=> "),
    );

    let reporter = Arc::new(CliReporter { bar: bar.clone() });
    run_pipeline_reported(&config, reporter)?;

    bar.finish_with_message("Done");
    println!("\nOutput saved to {}", config.output.display());

    Ok(())
}

fn print_summary(config: &PipelineConfig) {
    let title = Style::new().cyan().bold();
    let label = Style::new().dim();
    let path = Style::new().underlined();

    println!();
    println!("  {}", title.apply_to("Quell Pipeline"));
    println!(
        "  {:<10}{}",
        label.apply_to("Input"),
        path.apply_to(config.input.display())
    );
    println!(
        "  {:<10}{}",
        label.apply_to("Output"),
        path.apply_to(config.output.display())
    );
    println!("  {:<10}{}", label.apply_to("FPS"), config.fps);
    println!();
}
