//! Version 12: chunk and extra segments, per-chunk tags stored as plain buffers.
use crate::chunk::{read_chunks, ChunkLayout};
use crate::error::SlimeReadError;
use crate::format::{world_from_chunks, WorldFormat, WorldTags};
use crate::segment::{read_segment, ReadOptions};
use crate::tag::read_optional_tag;
use crate::world::World;
use byteorder::{BigEndian, ReadBytesExt};
use log::debug;
use std::io::Read;

pub(super) fn read_world<R: Read>(
    reader: &mut R,
    options: &ReadOptions,
) -> Result<World, SlimeReadError> {
    let world_version = reader.read_i32::<BigEndian>()?;

    let chunk_data = read_segment(reader, options)?;
    let extra_data = read_segment(reader, options)?;

    debug!(
        target: "slime-loader",
        "World version {}, chunk data {} bytes",
        world_version,
        chunk_data.len()
    );

    let chunks = read_chunks(&chunk_data, ChunkLayout::V12, options)?;
    let tags = WorldTags {
        extra: read_optional_tag(&extra_data)?,
        tile_entities: None,
        entities: None,
    };

    world_from_chunks(WorldFormat::V12, world_version, chunks, tags)
}
