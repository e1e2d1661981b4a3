//! Format detection and the per-version world decoders.
use crate::error::SlimeReadError;
use crate::position::chunk_index;
use crate::segment::ReadOptions;
use crate::world::{Chunk, World};
use byteorder::{BigEndian, ReadBytesExt};
use log::debug;
use nbt::CompoundTag;
use std::collections::HashMap;
use std::convert::TryFrom;
use std::io::Read;

mod v10;
mod v11;
mod v12;
mod v9;

/// Magic number every slime file starts with.
pub const SLIME_MAGIC: u16 = 0xB10B;

/// Supported on-disk layouts.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum WorldFormat {
    V9,
    V10,
    V11,
    V12,
}

impl WorldFormat {
    pub fn from_version(version: u8) -> Result<WorldFormat, SlimeReadError> {
        match version {
            9 => Ok(WorldFormat::V9),
            10 => Ok(WorldFormat::V10),
            11 => Ok(WorldFormat::V11),
            12 => Ok(WorldFormat::V12),
            _ => Err(SlimeReadError::UnsupportedFormatVersion { version }),
        }
    }

    /// Version byte written after the magic number.
    pub fn version(&self) -> u8 {
        match self {
            WorldFormat::V9 => 9,
            WorldFormat::V10 => 10,
            WorldFormat::V11 => 11,
            WorldFormat::V12 => 12,
        }
    }

    /// Decodes the body following the version byte.
    fn read_body<R: Read>(
        self,
        reader: &mut R,
        options: &ReadOptions,
    ) -> Result<World, SlimeReadError> {
        match self {
            WorldFormat::V9 => v9::read_world(reader, options),
            WorldFormat::V10 => v10::read_world(reader, options),
            WorldFormat::V11 => v11::read_world(reader, options),
            WorldFormat::V12 => v12::read_world(reader, options),
        }
    }
}

/// Checks the magic number and version byte, then decodes the matching layout.
pub(crate) fn read_world<R: Read>(
    reader: &mut R,
    options: &ReadOptions,
) -> Result<World, SlimeReadError> {
    let magic = reader.read_u16::<BigEndian>()?;

    if magic != SLIME_MAGIC {
        return Err(SlimeReadError::UnknownFileType { magic });
    }

    let format = WorldFormat::from_version(reader.read_u8()?)?;

    debug!(
        target: "slime-loader",
        "Decoding slime world format version {}",
        format.version()
    );

    let world = format.read_body(reader, options)?;

    debug!(
        target: "slime-loader",
        "Decoded {} chunks, min x: {}, min z: {}, width: {}, depth: {}",
        world.chunks.len(),
        world.chunk_min_x,
        world.chunk_min_z,
        world.width,
        world.depth
    );

    Ok(world)
}

/// File level tags of a world whose bounds are derived from its chunks.
pub(crate) struct WorldTags {
    pub(crate) extra: Option<CompoundTag>,
    pub(crate) tile_entities: Option<CompoundTag>,
    pub(crate) entities: Option<CompoundTag>,
}

/// Origin and extent of the chunk coordinates along one axis.
fn axis_bounds(
    coordinates: impl Iterator<Item = i32> + Clone,
) -> Result<(i16, u16), SlimeReadError> {
    let min = coordinates.clone().min().unwrap_or(0);
    let max = coordinates.max().unwrap_or(0);

    let origin = i16::try_from(min);
    let extent = u16::try_from(max as i64 - min as i64);

    match (origin, extent) {
        (Ok(origin), Ok(extent)) => Ok((origin, extent)),
        _ => Err(SlimeReadError::BoundingBoxOutOfRange { min, max }),
    }
}

/// Builds a version 10+ world, its bounding box spans the decoded chunk coordinates.
pub(crate) fn world_from_chunks(
    format: WorldFormat,
    world_version: i32,
    chunks: Vec<Chunk>,
    tags: WorldTags,
) -> Result<World, SlimeReadError> {
    let (chunk_min_x, width) = axis_bounds(chunks.iter().map(|chunk| chunk.x))?;
    let (chunk_min_z, depth) = axis_bounds(chunks.iter().map(|chunk| chunk.z))?;

    let mut chunk_map = HashMap::with_capacity(chunks.len());

    for chunk in chunks {
        if let Some(previous) = chunk_map.insert(chunk_index(chunk.x, chunk.z), chunk) {
            debug!(
                target: "slime-loader",
                "Chunk x: {}, z: {} stored twice, keeping the last one",
                previous.x,
                previous.z
            );
        }
    }

    Ok(World {
        format,
        world_version: Some(world_version),
        chunk_min_x,
        chunk_min_z,
        width,
        depth,
        extra: tags.extra,
        tile_entities: tags.tile_entities,
        entities: tags.entities,
        chunks: chunk_map,
    })
}
