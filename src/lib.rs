//! Decoder for slime world files.
//!
//! A slime file stores a small set of chunks as zstd compressed segments behind a
//! `0xB10B` magic number and a format version byte. Versions 9 to 12 are supported.
//!
//! ```no_run
//! let bytes = std::fs::read("lobby.slime").unwrap();
//! let world = slime_loader::decode(&bytes).unwrap();
//!
//! for (_, chunk) in world.chunks() {
//!     for section in chunk.sections() {
//!         let blocks = section.block_indices().unwrap();
//!         assert_eq!(blocks.len(), 4096);
//!     }
//! }
//! ```
mod chunk;
pub mod error;
mod format;
pub mod packed;
pub mod position;
mod segment;
pub mod source;
pub mod tag;
mod world;
#[cfg(feature = "zip")]
pub mod zip_source;

#[cfg(test)]
mod test_support;

pub use error::{SegmentFault, SlimeReadError, SourceError};
pub use format::{WorldFormat, SLIME_MAGIC};
pub use nbt::{CompoundTag, Tag};
pub use position::{chunk_index, ChunkPosition};
pub use segment::ReadOptions;
pub use source::{FixedSource, FolderSlimeSource, NoOpFixer, SlimeSource, WorldFixer};
pub use world::{Chunk, Section, World};
#[cfg(feature = "zip")]
pub use zip_source::ZipSlimeSource;

use std::io::Read;

/// Decodes a whole slime file held in memory.
pub fn decode(bytes: &[u8]) -> Result<World, SlimeReadError> {
    let mut reader = bytes;

    read_world(&mut reader)
}

/// Decodes a slime file from a reader with the default [`ReadOptions`].
pub fn read_world<R: Read>(reader: &mut R) -> Result<World, SlimeReadError> {
    read_world_with_options(reader, &ReadOptions::default())
}

/// Decodes a slime file from a reader.
///
/// The reader is consumed front to back, every segment is buffered in memory.
pub fn read_world_with_options<R: Read>(
    reader: &mut R,
    options: &ReadOptions,
) -> Result<World, SlimeReadError> {
    format::read_world(reader, options)
}
