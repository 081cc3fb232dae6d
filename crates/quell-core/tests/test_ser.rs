mod common;

use std::io::Read;

use common::{build_ser_header_full, build_ser_with_frames, video_buffer, write_test_ser};
use quell_core::error::QuellError;
use quell_core::io::ser::{ColorMode, SerReader, SER_HEADER_SIZE};
use quell_core::io::ser_writer::write_video;

#[test]
fn test_parse_8bit_mono() {
    let frame: Vec<u8> = (0u8..12).collect();
    let data = build_ser_with_frames(4, 3, &[frame]);
    let tmp = write_test_ser(&data);

    let reader = SerReader::open(tmp.path()).unwrap();
    assert_eq!(reader.frame_count(), 1);
    assert_eq!(reader.header.width, 4);
    assert_eq!(reader.header.height, 3);
    assert_eq!(reader.header.pixel_depth, 8);
    assert_eq!(reader.header.color_mode(), ColorMode::Mono);

    let frame = reader.read_frame(0).unwrap();
    assert_eq!(frame.dim(), (3, 4));
    assert_eq!(frame[[0, 0]], 0);
    assert_eq!(frame[[2, 3]], 11);
}

#[test]
fn test_missing_file_is_source_unavailable() {
    let err = SerReader::open(std::path::Path::new("/nonexistent/video.ser")).unwrap_err();
    assert!(matches!(err, QuellError::SourceUnavailable { .. }));
}

#[test]
fn test_bad_magic_rejected() {
    let mut data = build_ser_with_frames(2, 2, &[vec![0u8; 4]]);
    data[0..5].copy_from_slice(b"WRONG");
    let tmp = write_test_ser(&data);
    let err = SerReader::open(tmp.path()).unwrap_err();
    assert!(matches!(err, QuellError::InvalidVideo(_)));
}

#[test]
fn test_truncated_file_rejected() {
    let data = build_ser_with_frames(4, 4, &[vec![7u8; 16], vec![7u8; 16]]);
    let tmp = write_test_ser(&data[..data.len() - 8]);
    let err = SerReader::open(tmp.path()).unwrap_err();
    assert!(matches!(err, QuellError::InvalidVideo(_)));
}

#[test]
fn test_zero_dimensions_rejected() {
    let data = build_ser_header_full(0, 4, 8, 0, 0);
    let tmp = write_test_ser(&data);
    let err = SerReader::open(tmp.path()).unwrap_err();
    assert!(matches!(err, QuellError::InvalidDimensions { .. }));
}

#[test]
fn test_16bit_mono_scaled_to_8bit() {
    let mut data = build_ser_header_full(2, 1, 16, 1, 0);
    // Two little-endian 16-bit samples: 0x1234 -> 0x12, 0xFF00 -> 0xFF.
    data.extend_from_slice(&0x1234u16.to_le_bytes());
    data.extend_from_slice(&0xFF00u16.to_le_bytes());
    let tmp = write_test_ser(&data);

    let reader = SerReader::open(tmp.path()).unwrap();
    let frame = reader.read_frame(0).unwrap();
    assert_eq!(frame[[0, 0]], 0x12);
    assert_eq!(frame[[0, 1]], 0xFF);
}

#[test]
fn test_rgb_decodes_via_luminance() {
    let mut data = build_ser_header_full(1, 1, 8, 1, 100);
    data.extend_from_slice(&[255, 0, 0]); // pure red
    let tmp = write_test_ser(&data);

    let reader = SerReader::open(tmp.path()).unwrap();
    assert_eq!(reader.header.color_mode(), ColorMode::RGB);
    let frame = reader.read_frame(0).unwrap();
    // BT.601: 0.299 * 255 = 76.2
    assert_eq!(frame[[0, 0]], 76);
}

#[test]
fn test_write_video_roundtrip() {
    let frames: Vec<Vec<u8>> = (0..3).map(|f| vec![40 + f as u8; 6]).collect();
    let buffer = video_buffer(&frames, 2, 3);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.ser");
    write_video(&buffer, &path, 25.0).unwrap();

    let reader = SerReader::open(&path).unwrap();
    assert_eq!(reader.frame_count(), 3);
    assert_eq!(reader.header.color_mode(), ColorMode::RGB);
    assert_eq!(reader.header.pixel_depth, 8);

    // Gray replicated across R=G=B reads back as the same gray.
    let decoded = reader.read_video().unwrap();
    assert_eq!(decoded, buffer);
}

#[test]
fn test_written_channels_are_replicated() {
    let buffer = video_buffer(&[vec![9, 200]], 1, 2);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.ser");
    write_video(&buffer, &path, 30.0).unwrap();

    let mut raw = Vec::new();
    std::fs::File::open(&path)
        .unwrap()
        .read_to_end(&mut raw)
        .unwrap();
    let pixels = &raw[SER_HEADER_SIZE..SER_HEADER_SIZE + 6];
    assert_eq!(pixels, &[9, 9, 9, 200, 200, 200]);
}

#[test]
fn test_timestamp_trailer_encodes_fps() {
    let frames: Vec<Vec<u8>> = (0..2).map(|_| vec![1u8; 4]).collect();
    let buffer = video_buffer(&frames, 2, 2);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.ser");
    write_video(&buffer, &path, 25.0).unwrap();

    let mut raw = Vec::new();
    std::fs::File::open(&path)
        .unwrap()
        .read_to_end(&mut raw)
        .unwrap();
    // 2 frames of 2x2 RGB = 24 bytes, then the trailer.
    let trailer = &raw[SER_HEADER_SIZE + 24..];
    assert_eq!(trailer.len(), 16);
    let ts0 = u64::from_le_bytes(trailer[0..8].try_into().unwrap());
    let ts1 = u64::from_le_bytes(trailer[8..16].try_into().unwrap());
    assert_eq!(ts0, 0);
    // 10^7 ticks per second / 25 fps
    assert_eq!(ts1, 400_000);
}

#[test]
fn test_unwritable_destination() {
    let buffer = video_buffer(&[vec![1u8; 4]], 2, 2);
    let err = write_video(
        &buffer,
        std::path::Path::new("/nonexistent/dir/out.ser"),
        30.0,
    )
    .unwrap_err();
    assert!(matches!(err, QuellError::DestinationUnavailable { .. }));
}

#[test]
fn test_nonpositive_fps_rejected() {
    let buffer = video_buffer(&[vec![1u8; 4]], 2, 2);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.ser");
    let err = write_video(&buffer, &path, 0.0).unwrap_err();
    assert!(matches!(err, QuellError::InvalidVideo(_)));
}
