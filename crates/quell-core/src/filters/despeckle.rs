use ndarray::{Array2, ArrayView2};

use crate::buffer::VideoBuffer;
use crate::consts::{SENTINEL_BLACK, SENTINEL_WHITE};
use crate::error::Result;
use crate::sched::run_frame_batch;

/// Remove salt-and-pepper impulse noise from every frame.
///
/// Pixels valued exactly 0 or 255 are treated as suspected impulses and
/// replaced from their 3x3 in-frame neighborhood; all other pixels pass
/// through unchanged. Produces a new buffer of identical shape. One unit
/// of work per frame.
pub fn despeckle(input: &VideoBuffer) -> Result<VideoBuffer> {
    if input.frame_count() == 0 {
        return Ok(input.clone());
    }
    let frames = run_frame_batch(0..input.frame_count(), |f| {
        despeckle_frame(&input.frame(f))
    })?;
    // Every output frame shares the input frame shape, so reassembly
    // cannot hit a shape mismatch.
    VideoBuffer::from_frames(frames)
}

fn despeckle_frame(frame: &ArrayView2<u8>) -> Array2<u8> {
    let (height, width) = frame.dim();
    let mut out = Array2::zeros((height, width));

    for i in 0..height {
        for j in 0..width {
            let value = frame[[i, j]];
            out[[i, j]] = if value == SENTINEL_BLACK || value == SENTINEL_WHITE {
                repair_pixel(frame, i, j, value)
            } else {
                value
            };
        }
    }

    out
}

/// Estimate a replacement for the sentinel pixel at (i, j).
///
/// Out-of-bounds neighbors shrink the set (no wrap-around). A black-majority
/// neighborhood is preserved as true black; otherwise the replacement is the
/// truncating mean of all in-bounds neighbors. White (255) neighbors
/// contribute to that mean like any other value.
fn repair_pixel(frame: &ArrayView2<u8>, i: usize, j: usize, value: u8) -> u8 {
    let (height, width) = frame.dim();
    let mut sum = 0u32;
    let mut valid = 0u32;
    let mut black = 0u32;

    for di in -1i64..=1 {
        for dj in -1i64..=1 {
            if di == 0 && dj == 0 {
                continue;
            }
            let ni = i as i64 + di;
            let nj = j as i64 + dj;
            if ni < 0 || ni >= height as i64 || nj < 0 || nj >= width as i64 {
                continue;
            }
            let neighbor = frame[[ni as usize, nj as usize]];
            sum += u32::from(neighbor);
            valid += 1;
            if neighbor == SENTINEL_BLACK {
                black += 1;
            }
        }
    }

    if black > valid / 2 {
        SENTINEL_BLACK
    } else if valid > 0 {
        (sum / valid) as u8
    } else {
        // 1x1 frame: no neighbors to estimate from.
        value
    }
}
