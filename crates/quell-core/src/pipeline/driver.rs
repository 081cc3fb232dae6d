use std::sync::Arc;

use ndarray::Array2;
use tracing::info;

use crate::buffer::VideoBuffer;
use crate::error::Result;
use crate::filters::{deflicker, despeckle};
use crate::io::ser::SerReader;
use crate::io::ser_writer::write_video;

use super::config::PipelineConfig;
use super::types::{NoOpReporter, ProgressReporter, Stage};

/// Run the full denoising pipeline: decode, despeckle, deflicker, encode.
pub fn run_pipeline_reported(
    config: &PipelineConfig,
    reporter: Arc<dyn ProgressReporter>,
) -> Result<()> {
    let reader = SerReader::open(&config.input)?;
    let total = reader.frame_count();
    info!(
        total_frames = total,
        width = reader.header.width,
        height = reader.header.height,
        "Opened source video"
    );

    reporter.begin_stage(Stage::Decoding, Some(total));
    let mut frames: Vec<Array2<u8>> = Vec::with_capacity(total);
    for i in 0..total {
        frames.push(reader.read_frame(i)?);
        reporter.advance(i + 1);
    }
    let buffer = VideoBuffer::from_frames(frames)?;
    reporter.finish_stage();

    reporter.begin_stage(Stage::Despeckling, Some(total));
    let mut buffer = despeckle(&buffer)?;
    info!("Impulse repair complete");
    reporter.finish_stage();

    reporter.begin_stage(Stage::Deflickering, Some(total));
    deflicker(&mut buffer)?;
    info!("Temporal median complete");
    reporter.finish_stage();

    reporter.begin_stage(Stage::Encoding, Some(total));
    write_video(&buffer, &config.output, config.fps)?;
    info!(output = %config.output.display(), fps = config.fps, "Output saved");
    reporter.finish_stage();

    Ok(())
}

/// Run the pipeline without progress feedback.
pub fn run_pipeline(config: &PipelineConfig) -> Result<()> {
    run_pipeline_reported(config, Arc::new(NoOpReporter))
}
