use ndarray::Array2;

use crate::buffer::VideoBuffer;
use crate::consts::{TEMPORAL_RADIUS, TEMPORAL_WINDOW};
use crate::error::{QuellError, Result};
use crate::sched::run_frame_batch;

/// Remove residual temporal flicker by replacing each pixel with the median
/// of its value across the 5-frame window centered on it.
///
/// Only frames in `[2, N-3]` are rewritten; the two leading and two trailing
/// frames are left untouched (no boundary mirroring). Every window read sees
/// the original pre-mutation samples: all replacement frames are computed
/// from the untouched buffer in a read-only batch, then written back after
/// the join, so no unit ever reads a cell another unit wrote.
pub fn deflicker(buffer: &mut VideoBuffer) -> Result<()> {
    let frames = buffer.frame_count();
    if frames < TEMPORAL_WINDOW {
        return Err(QuellError::TooFewFrames {
            required: TEMPORAL_WINDOW,
            actual: frames,
        });
    }

    let first = TEMPORAL_RADIUS;
    let last = frames - TEMPORAL_RADIUS;
    let snapshot = &*buffer;
    let replacements = run_frame_batch(first..last, |f| median_frame(snapshot, f))?;

    for (offset, frame) in replacements.into_iter().enumerate() {
        buffer.frame_mut(first + offset).assign(&frame);
    }

    Ok(())
}

/// Median-of-5 frame for center index `f`, read entirely from `buffer`.
fn median_frame(buffer: &VideoBuffer, f: usize) -> Array2<u8> {
    let (_, height, width) = buffer.dim();
    let base = f - TEMPORAL_RADIUS;
    let mut out = Array2::zeros((height, width));
    let mut window = [0u8; TEMPORAL_WINDOW];

    for i in 0..height {
        for j in 0..width {
            for (k, slot) in window.iter_mut().enumerate() {
                *slot = buffer.data[[base + k, i, j]];
            }
            window.sort_unstable();
            out[[i, j]] = window[TEMPORAL_RADIUS];
        }
    }

    out
}
