use nbt::decode::TagDecodeError;
use std::{error::Error, fmt::Display, io};

/// Possible errors while decoding a slime world.
#[derive(Debug)]
pub enum SlimeReadError {
    /// File does not start with the `0xB10B` magic number.
    UnknownFileType { magic: u16 },
    /// Format version byte is not one of 9, 10, 11 or 12.
    UnsupportedFormatVersion { version: u8 },
    /// Version 9 payload version is older than 7.
    UnsupportedPayloadVersion { version: u8 },
    /// Version 10 world version is older than 7.
    UnsupportedWorldVersion { version: i32 },
    /// Chunk coordinates do not fit the `i16` origin and `u16` extent of the bounding box.
    BoundingBoxOutOfRange { min: i32, max: i32 },
    /// Segment or length-prefixed buffer could not be read.
    ///
    /// The file is truncated or corrupted.
    CorruptSegment { fault: SegmentFault },
    /// Bit-packed `data` array length does not match the length derived
    /// from the palette size.
    CorruptPackedArray {
        /// Bits used for one value.
        bits_per_value: u32,
        /// Amount of words expected for the palette size.
        expected_length: usize,
        /// Amount of words found.
        actual_length: usize,
    },
    /// Bit width of a packed array is outside `1..=32`.
    InvalidBitsPerValue { bits_per_value: u32 },
    /// Tag lacks a field the decoder requires, e.g. `palette`.
    MissingRequiredField { field: &'static str },
    /// I/O Error which happened while were reading from the source.
    IOError { io_error: io::Error },
    /// Error while decoding binary data to NBT tag.
    TagDecodeError { tag_decode_error: TagDecodeError },
}

/// Reason a segment was rejected.
#[derive(Debug)]
pub enum SegmentFault {
    /// Declared length is negative.
    NegativeLength { length: i32 },
    /// Declared length is above `ReadOptions::maximum_segment_length`.
    LengthExceedsMaximum { length: u32, maximum_length: u32 },
    /// Decompressed length differs from the declared one.
    LengthMismatch { declared: usize, actual: usize },
    /// Compressed payload is not a valid zstd frame.
    Decompression { io_error: io::Error },
    /// Cursor ran past the end of the data.
    UnexpectedEof,
}

impl From<io::Error> for SlimeReadError {
    fn from(io_error: io::Error) -> Self {
        if io_error.kind() == io::ErrorKind::UnexpectedEof {
            return SlimeReadError::CorruptSegment {
                fault: SegmentFault::UnexpectedEof,
            };
        }

        SlimeReadError::IOError { io_error }
    }
}

impl From<TagDecodeError> for SlimeReadError {
    fn from(tag_decode_error: TagDecodeError) -> Self {
        SlimeReadError::TagDecodeError { tag_decode_error }
    }
}

impl From<SegmentFault> for SlimeReadError {
    fn from(fault: SegmentFault) -> Self {
        SlimeReadError::CorruptSegment { fault }
    }
}

impl Error for SlimeReadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        use SlimeReadError::*;
        match self {
            CorruptSegment {
                fault: SegmentFault::Decompression { io_error },
            } => Some(io_error),
            IOError { io_error } => Some(io_error),
            TagDecodeError { tag_decode_error } => Some(tag_decode_error),
            _ => None,
        }
    }
}

impl Display for SlimeReadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use SlimeReadError::*;
        match self {
            UnknownFileType { magic } => write!(f, "Unknown file type (magic {:#06X})", magic),
            UnsupportedFormatVersion { version } => {
                write!(f, "Unsupported slime format version: {}", version)
            }
            UnsupportedPayloadVersion { version } => {
                write!(f, "Unsupported payload version: {}", version)
            }
            UnsupportedWorldVersion { version } => {
                write!(f, "Unsupported world version: {}", version)
            }
            BoundingBoxOutOfRange { min, max } => write!(
                f,
                "Chunk coordinates from {} to {} do not fit the bounding box",
                min, max
            ),
            CorruptSegment { fault } => write!(f, "Corrupt segment: {}", fault),
            CorruptPackedArray {
                bits_per_value,
                expected_length,
                actual_length,
            } => write!(
                f,
                "Invalid packed array length ({}). At {} bits per value, expected {}",
                actual_length, bits_per_value, expected_length
            ),
            InvalidBitsPerValue { bits_per_value } => {
                write!(f, "Invalid bits per value: {}", bits_per_value)
            }
            MissingRequiredField { field } => write!(f, "Missing required field `{}`", field),
            IOError { .. } => write!(f, "IO Error"),
            TagDecodeError { .. } => write!(f, "Failed to decode nbt"),
        }
    }
}

impl Display for SegmentFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use SegmentFault::*;
        match self {
            NegativeLength { length } => write!(f, "negative length {}", length),
            LengthExceedsMaximum {
                length,
                maximum_length,
            } => write!(f, "length of {} exceeds maximum ({})", length, maximum_length),
            LengthMismatch { declared, actual } => write!(
                f,
                "declared {} uncompressed bytes but got {}",
                declared, actual
            ),
            Decompression { io_error } => write!(f, "decompression failed: {}", io_error),
            UnexpectedEof => write!(f, "unexpected end of data"),
        }
    }
}

/// Possible errors while locating a world in a source.
#[derive(Debug)]
pub enum SourceError {
    /// World with specified name not found.
    WorldNotFound { name: String },
    /// World was found but could not be decoded.
    ReadError { read_error: SlimeReadError },
    /// I/O Error which happened while were opening the world.
    IOError { io_error: io::Error },
}

impl From<io::Error> for SourceError {
    fn from(io_error: io::Error) -> Self {
        SourceError::IOError { io_error }
    }
}

impl From<SlimeReadError> for SourceError {
    fn from(read_error: SlimeReadError) -> Self {
        SourceError::ReadError { read_error }
    }
}

impl Error for SourceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SourceError::ReadError { read_error } => Some(read_error),
            SourceError::IOError { io_error } => Some(io_error),
            _ => None,
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use SourceError::*;
        match self {
            WorldNotFound { name } => write!(f, "World {} not found", name),
            ReadError { read_error } => write!(f, "Failed to read world: {}", read_error),
            IOError { .. } => write!(f, "IO Error"),
        }
    }
}
