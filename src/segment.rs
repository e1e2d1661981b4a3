use crate::error::{SegmentFault, SlimeReadError};
use byteorder::{BigEndian, ReadBytesExt};
use log::trace;
use std::io::Read;

/// Default upper bound for a declared segment length: 256 MiB.
const DEFAULT_MAXIMUM_SEGMENT_LENGTH: u32 = 256 * 1024 * 1024;

/// Limits applied while decoding.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ReadOptions {
    /// Maximum declared length of a segment or length-prefixed buffer,
    /// compressed or uncompressed.
    pub maximum_segment_length: u32,
}

impl Default for ReadOptions {
    fn default() -> Self {
        ReadOptions {
            maximum_segment_length: DEFAULT_MAXIMUM_SEGMENT_LENGTH,
        }
    }
}

impl ReadOptions {
    fn check_length(&self, length: i32) -> Result<usize, SegmentFault> {
        if length < 0 {
            return Err(SegmentFault::NegativeLength { length });
        }

        let length = length as u32;

        if length > self.maximum_segment_length {
            return Err(SegmentFault::LengthExceedsMaximum {
                length,
                maximum_length: self.maximum_segment_length,
            });
        }

        Ok(length as usize)
    }
}

/// Reads a zstd segment: compressed length, uncompressed length, then the compressed bytes.
pub fn read_segment<R: Read>(
    reader: &mut R,
    options: &ReadOptions,
) -> Result<Vec<u8>, SlimeReadError> {
    let compressed_length = options.check_length(reader.read_i32::<BigEndian>()?)?;
    let uncompressed_length = options.check_length(reader.read_i32::<BigEndian>()?)?;

    let compressed = read_exact_vec(reader, compressed_length)?;

    trace!(
        target: "slime-loader",
        "Segment of {} bytes inflates to {} bytes",
        compressed_length,
        uncompressed_length
    );

    if uncompressed_length == 0 {
        return Ok(Vec::new());
    }

    let uncompressed = zstd::bulk::decompress(&compressed, uncompressed_length)
        .map_err(|io_error| SegmentFault::Decompression { io_error })?;

    if uncompressed.len() != uncompressed_length {
        return Err(SegmentFault::LengthMismatch {
            declared: uncompressed_length,
            actual: uncompressed.len(),
        }
        .into());
    }

    Ok(uncompressed)
}

/// Reads an uncompressed buffer prefixed by its `i32` length.
pub fn read_buffer<R: Read>(
    reader: &mut R,
    options: &ReadOptions,
) -> Result<Vec<u8>, SlimeReadError> {
    let length = options.check_length(reader.read_i32::<BigEndian>()?)?;

    read_exact_vec(reader, length)
}

/// Reads exactly `length` bytes without trusting `length` for the allocation.
fn read_exact_vec<R: Read>(reader: &mut R, length: usize) -> Result<Vec<u8>, SlimeReadError> {
    let mut buffer = Vec::new();
    reader.take(length as u64).read_to_end(&mut buffer)?;

    if buffer.len() != length {
        return Err(SegmentFault::UnexpectedEof.into());
    }

    Ok(buffer)
}
