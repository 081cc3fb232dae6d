use ndarray::{Array2, Array3, ArrayView2, ArrayViewMut2, Axis};

use crate::error::{QuellError, Result};

/// A decoded grayscale video held fully in memory.
///
/// Samples are u8 intensities, shape = (frames, height, width).
/// Every frame shares the same dimensions for the buffer's whole lifetime.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoBuffer {
    /// Pixel data, frame axis outermost, rows row-major within each frame.
    pub data: Array3<u8>,
}

impl VideoBuffer {
    pub fn new(data: Array3<u8>) -> Self {
        Self { data }
    }

    pub fn zeros(frames: usize, height: usize, width: usize) -> Self {
        Self {
            data: Array3::zeros((frames, height, width)),
        }
    }

    /// Assemble a buffer from per-frame arrays, validating that every frame
    /// matches the dimensions of the first. Mismatches are fatal, never
    /// truncated or padded.
    pub fn from_frames(frames: Vec<Array2<u8>>) -> Result<Self> {
        if frames.is_empty() {
            return Ok(Self::zeros(0, 0, 0));
        }
        let (height, width) = frames[0].dim();
        for (index, frame) in frames.iter().enumerate() {
            let (fh, fw) = frame.dim();
            if (fh, fw) != (height, width) {
                return Err(QuellError::ShapeMismatch {
                    frame: index,
                    width,
                    height,
                    found_width: fw,
                    found_height: fh,
                });
            }
        }

        let mut data = Array3::zeros((frames.len(), height, width));
        for (index, frame) in frames.into_iter().enumerate() {
            data.index_axis_mut(Axis(0), index).assign(&frame);
        }
        Ok(Self { data })
    }

    pub fn frame_count(&self) -> usize {
        self.data.len_of(Axis(0))
    }

    pub fn height(&self) -> usize {
        self.data.len_of(Axis(1))
    }

    pub fn width(&self) -> usize {
        self.data.len_of(Axis(2))
    }

    /// (frames, height, width)
    pub fn dim(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    pub fn frame(&self, index: usize) -> ArrayView2<'_, u8> {
        self.data.index_axis(Axis(0), index)
    }

    pub fn frame_mut(&mut self, index: usize) -> ArrayViewMut2<'_, u8> {
        self.data.index_axis_mut(Axis(0), index)
    }
}
