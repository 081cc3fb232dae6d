use std::fs::File;
use std::path::{Path, PathBuf};

use byteorder::{LittleEndian, ReadBytesExt};
use memmap2::Mmap;
use ndarray::Array2;

use crate::buffer::VideoBuffer;
use crate::consts::{LUMINANCE_B, LUMINANCE_G, LUMINANCE_R};
use crate::error::{QuellError, Result};

pub const SER_HEADER_SIZE: usize = 178;
pub const SER_MAGIC: &[u8; 14] = b"LUCAM-RECORDER";

pub const SER_COLOR_MONO: i32 = 0;
pub const SER_COLOR_RGB: i32 = 100;
pub const SER_COLOR_BGR: i32 = 101;

/// Color layout of the source pixel data.
#[derive(Clone, Debug, PartialEq)]
pub enum ColorMode {
    Mono,
    RGB,
    BGR,
}

/// SER file header (178 bytes).
#[derive(Clone, Debug)]
pub struct SerHeader {
    pub color_id: i32,
    pub little_endian: bool,
    pub width: u32,
    pub height: u32,
    pub pixel_depth: u32,
    pub frame_count: u32,
    pub observer: String,
    pub instrument: String,
    pub telescope: String,
    pub date_time: u64,
    pub date_time_utc: u64,
}

impl SerHeader {
    /// Bytes per sample plane (1 for 8-bit, 2 for 9-16 bit).
    pub fn bytes_per_sample(&self) -> usize {
        if self.pixel_depth <= 8 {
            1
        } else {
            2
        }
    }

    /// Number of planes per pixel (1 for mono, 3 for RGB/BGR).
    pub fn planes_per_pixel(&self) -> usize {
        match self.color_id {
            SER_COLOR_RGB | SER_COLOR_BGR => 3,
            _ => 1,
        }
    }

    /// Total bytes per frame.
    pub fn frame_byte_size(&self) -> usize {
        let pixels = (self.width as usize)
            .checked_mul(self.height as usize)
            .expect("Frame dimensions too large");
        let bytes_per_pixel = self.bytes_per_sample() * self.planes_per_pixel();
        pixels
            .checked_mul(bytes_per_pixel)
            .expect("Frame size calculation overflow")
    }

    pub fn color_mode(&self) -> ColorMode {
        match self.color_id {
            SER_COLOR_RGB => ColorMode::RGB,
            SER_COLOR_BGR => ColorMode::BGR,
            // Bayer sources carry one raw plane per pixel; read as mono.
            _ => ColorMode::Mono,
        }
    }
}

/// Metadata about the source file, for operator-facing display.
#[derive(Clone, Debug)]
pub struct VideoInfo {
    pub filename: PathBuf,
    pub total_frames: usize,
    pub width: u32,
    pub height: u32,
    pub bit_depth: u8,
    pub color_mode: ColorMode,
}

/// Memory-mapped SER video reader: the decode boundary.
///
/// Whatever the source layout, frames decode to 8-bit grayscale. An
/// unopenable or malformed source is an explicit error, never an empty
/// or garbage buffer.
#[derive(Debug)]
pub struct SerReader {
    mmap: Mmap,
    pub header: SerHeader,
}

impl SerReader {
    /// Open a SER file and parse its header.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| QuellError::SourceUnavailable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let mmap = unsafe { Mmap::map(&file)? };

        if mmap.len() < SER_HEADER_SIZE {
            return Err(QuellError::InvalidVideo(
                "File too small for SER header".into(),
            ));
        }

        if &mmap[0..14] != SER_MAGIC {
            return Err(QuellError::InvalidVideo(
                "Missing LUCAM-RECORDER magic".into(),
            ));
        }

        let header = parse_header(&mmap[..SER_HEADER_SIZE])?;

        let expected_data_size =
            SER_HEADER_SIZE + header.frame_byte_size() * header.frame_count as usize;
        if mmap.len() < expected_data_size {
            return Err(QuellError::InvalidVideo(format!(
                "File truncated: expected at least {} bytes, got {}",
                expected_data_size,
                mmap.len()
            )));
        }

        Ok(Self { mmap, header })
    }

    pub fn frame_count(&self) -> usize {
        self.header.frame_count as usize
    }

    /// Get the raw bytes for a single frame (zero-copy from mmap).
    pub fn frame_raw(&self, index: usize) -> Result<&[u8]> {
        let count = self.frame_count();
        if index >= count {
            return Err(QuellError::InvalidVideo(format!(
                "Frame index {index} out of range (total: {count})"
            )));
        }
        let offset = SER_HEADER_SIZE + index * self.header.frame_byte_size();
        let end = offset + self.header.frame_byte_size();
        Ok(&self.mmap[offset..end])
    }

    /// Read a single frame as 8-bit grayscale.
    pub fn read_frame(&self, index: usize) -> Result<Array2<u8>> {
        let raw = self.frame_raw(index)?;
        let h = self.header.height as usize;
        let w = self.header.width as usize;
        let bps = self.header.bytes_per_sample();
        let planes = self.header.planes_per_pixel();
        let little_endian = self.header.little_endian;
        let color_mode = self.header.color_mode();

        let mut data = Array2::<u8>::zeros((h, w));
        for row in 0..h {
            for col in 0..w {
                let pixel = (row * w + col) * planes * bps;
                data[[row, col]] = match color_mode {
                    ColorMode::Mono => sample8(raw, pixel, bps, little_endian),
                    ColorMode::RGB => luminance(
                        sample8(raw, pixel, bps, little_endian),
                        sample8(raw, pixel + bps, bps, little_endian),
                        sample8(raw, pixel + 2 * bps, bps, little_endian),
                    ),
                    ColorMode::BGR => luminance(
                        sample8(raw, pixel + 2 * bps, bps, little_endian),
                        sample8(raw, pixel + bps, bps, little_endian),
                        sample8(raw, pixel, bps, little_endian),
                    ),
                };
            }
        }

        Ok(data)
    }

    /// Materialize the whole video as one grayscale buffer.
    pub fn read_video(&self) -> Result<VideoBuffer> {
        let frames: Vec<Array2<u8>> = (0..self.frame_count())
            .map(|i| self.read_frame(i))
            .collect::<Result<_>>()?;
        VideoBuffer::from_frames(frames)
    }

    /// Build VideoInfo from the header.
    pub fn source_info(&self, path: &Path) -> VideoInfo {
        VideoInfo {
            filename: path.to_path_buf(),
            total_frames: self.frame_count(),
            width: self.header.width,
            height: self.header.height,
            bit_depth: self.header.pixel_depth as u8,
            color_mode: self.header.color_mode(),
        }
    }
}

fn parse_header(buf: &[u8]) -> Result<SerHeader> {
    let mut cursor = std::io::Cursor::new(&buf[14..]); // skip magic

    let _lu_id = cursor.read_i32::<LittleEndian>()?;
    let color_id = cursor.read_i32::<LittleEndian>()?;
    let le_flag = cursor.read_i32::<LittleEndian>()?;
    let width = cursor.read_i32::<LittleEndian>()? as u32;
    let height = cursor.read_i32::<LittleEndian>()? as u32;
    let pixel_depth = cursor.read_i32::<LittleEndian>()? as u32;
    let frame_count = cursor.read_i32::<LittleEndian>()? as u32;

    let observer = read_fixed_string(&buf[42..82]);
    let instrument = read_fixed_string(&buf[82..122]);
    let telescope = read_fixed_string(&buf[122..162]);

    let mut cursor = std::io::Cursor::new(&buf[162..]);
    let date_time = cursor.read_u64::<LittleEndian>()?;
    let date_time_utc = cursor.read_u64::<LittleEndian>()?;

    if width == 0 || height == 0 {
        return Err(QuellError::InvalidDimensions { width, height });
    }

    // SER spec: LittleEndian field = 0 means big-endian pixel data,
    // but many writers (including FireCapture) use 0 for little-endian.
    // Follow Siril's convention: treat 0 as little-endian.
    let little_endian = le_flag != 1;

    Ok(SerHeader {
        color_id,
        little_endian,
        width,
        height,
        pixel_depth,
        frame_count,
        observer,
        instrument,
        telescope,
        date_time,
        date_time_utc,
    })
}

fn read_fixed_string(buf: &[u8]) -> String {
    String::from_utf8_lossy(buf)
        .trim_end_matches('\0')
        .trim()
        .to_string()
}

/// One sample plane value, reduced to 8 bits (16-bit sources keep the
/// high byte).
fn sample8(raw: &[u8], idx: usize, bytes_per_sample: usize, little_endian: bool) -> u8 {
    if bytes_per_sample == 1 {
        raw[idx]
    } else {
        let pair = [raw[idx], raw[idx + 1]];
        let val = if little_endian {
            u16::from_le_bytes(pair)
        } else {
            u16::from_be_bytes(pair)
        };
        (val >> 8) as u8
    }
}

/// BT.601 grayscale conversion, the same weighting OpenCV's BGR2GRAY uses.
fn luminance(r: u8, g: u8, b: u8) -> u8 {
    let y = f32::from(r) * LUMINANCE_R + f32::from(g) * LUMINANCE_G + f32::from(b) * LUMINANCE_B;
    y.round().clamp(0.0, 255.0) as u8
}
