use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use ndarray::ArrayView2;

use crate::buffer::VideoBuffer;
use crate::consts::TICKS_PER_SECOND;
use crate::error::{QuellError, Result};
use crate::io::ser::{SerHeader, SER_COLOR_RGB, SER_HEADER_SIZE, SER_MAGIC};

/// Writes a valid SER file at the raw byte level: the encode boundary.
pub struct SerWriter {
    writer: BufWriter<File>,
    header: SerHeader,
    frames_written: u32,
}

impl SerWriter {
    /// Create a new SER file and write the header.
    pub fn create(path: &Path, header: &SerHeader) -> Result<Self> {
        let file = File::create(path).map_err(|e| QuellError::DestinationUnavailable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let mut writer = BufWriter::new(file);
        write_header(&mut writer, header)?;
        Ok(Self {
            writer,
            header: header.clone(),
            frames_written: 0,
        })
    }

    /// Write one grayscale frame as interleaved 8-bit RGB, replicating each
    /// sample across all three channels (the target container is
    /// color-capable; gray means R = G = B).
    pub fn write_gray_frame(&mut self, frame: &ArrayView2<u8>) -> Result<()> {
        let (h, w) = frame.dim();
        debug_assert_eq!((h, w), (self.header.height as usize, self.header.width as usize));

        let mut line = vec![0u8; w * 3];
        for row in 0..h {
            for col in 0..w {
                let gray = frame[[row, col]];
                let i = col * 3;
                line[i] = gray;
                line[i + 1] = gray;
                line[i + 2] = gray;
            }
            self.writer.write_all(&line)?;
        }
        self.frames_written += 1;
        Ok(())
    }

    /// Write the optional timestamp trailer (one u64 per frame, little-endian).
    pub fn write_timestamps(&mut self, timestamps: &[u64]) -> Result<()> {
        for &ts in timestamps {
            self.writer.write_all(&ts.to_le_bytes())?;
        }
        Ok(())
    }

    /// Flush and finalize the file.
    pub fn finalize(mut self) -> Result<()> {
        debug_assert_eq!(self.frames_written, self.header.frame_count);
        self.writer.flush()?;
        Ok(())
    }
}

/// Encode a denoised buffer as an 8-bit RGB SER file.
///
/// SER carries no frame-rate field, so the caller-supplied fps is encoded
/// as the timestamp trailer spacing (100 ns ticks).
pub fn write_video(buffer: &VideoBuffer, path: &Path, fps: f64) -> Result<()> {
    if !fps.is_finite() || fps <= 0.0 {
        return Err(QuellError::InvalidVideo(format!(
            "Frame rate must be positive, got {fps}"
        )));
    }

    let (frames, height, width) = buffer.dim();
    let header = SerHeader {
        color_id: SER_COLOR_RGB,
        little_endian: true,
        width: width as u32,
        height: height as u32,
        pixel_depth: 8,
        frame_count: frames as u32,
        observer: String::new(),
        instrument: String::new(),
        telescope: String::new(),
        date_time: 0,
        date_time_utc: 0,
    };

    let mut writer = SerWriter::create(path, &header)?;
    for f in 0..frames {
        writer.write_gray_frame(&buffer.frame(f))?;
    }

    let tick_step = TICKS_PER_SECOND / fps;
    let timestamps: Vec<u64> = (0..frames)
        .map(|f| (f as f64 * tick_step).round() as u64)
        .collect();
    writer.write_timestamps(&timestamps)?;
    writer.finalize()
}

fn write_header(w: &mut impl Write, header: &SerHeader) -> Result<()> {
    // Magic (14 bytes)
    w.write_all(SER_MAGIC)?;
    // LuID (4 bytes)
    w.write_all(&0i32.to_le_bytes())?;
    // ColorID (4 bytes)
    w.write_all(&header.color_id.to_le_bytes())?;
    // LittleEndian flag: 0 = little-endian (Siril convention)
    let le_flag: i32 = if header.little_endian { 0 } else { 1 };
    w.write_all(&le_flag.to_le_bytes())?;
    // Width (4 bytes)
    w.write_all(&(header.width as i32).to_le_bytes())?;
    // Height (4 bytes)
    w.write_all(&(header.height as i32).to_le_bytes())?;
    // PixelDepth (4 bytes)
    w.write_all(&(header.pixel_depth as i32).to_le_bytes())?;
    // FrameCount (4 bytes)
    w.write_all(&(header.frame_count as i32).to_le_bytes())?;
    // Observer (40 bytes)
    write_fixed_string(w, &header.observer, 40)?;
    // Instrument (40 bytes)
    write_fixed_string(w, &header.instrument, 40)?;
    // Telescope (40 bytes)
    write_fixed_string(w, &header.telescope, 40)?;
    // DateTime (8 bytes)
    w.write_all(&header.date_time.to_le_bytes())?;
    // DateTimeUTC (8 bytes)
    w.write_all(&header.date_time_utc.to_le_bytes())?;

    debug_assert_eq!(
        14 + 4 + 4 + 4 + 4 + 4 + 4 + 4 + 40 + 40 + 40 + 8 + 8,
        SER_HEADER_SIZE
    );
    Ok(())
}

fn write_fixed_string(w: &mut impl Write, s: &str, len: usize) -> Result<()> {
    let bytes = s.as_bytes();
    let to_write = bytes.len().min(len);
    w.write_all(&bytes[..to_write])?;
    // Pad with zeros
    for _ in to_write..len {
        w.write_all(&[0u8])?;
    }
    Ok(())
}
