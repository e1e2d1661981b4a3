use crate::error::{SegmentFault, SlimeReadError};
use crate::segment::{read_buffer, read_segment, ReadOptions};
use crate::tag::{read_optional_tag, read_tag, CompoundTagExt};
use crate::world::{Chunk, Section};
use byteorder::{BigEndian, ReadBytesExt};
use log::{debug, trace};
use nbt::CompoundTag;
use std::io::Read;

/// Length of a block or sky light nibble array.
pub(crate) const LIGHT_ARRAY_LENGTH: usize = 16 * 16 * 16 / 2;

/// Chunk record layout of the count-prefixed chunk segments.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) enum ChunkLayout {
    /// Heightmap before sections, nothing after.
    V10,
    /// Heightmap after sections, then compressed tile entity and entity sub-segments.
    V11,
    /// Heightmap after sections, then plain tile entity, entity and extra buffers.
    V12,
}

/// Reads a non-negative `i32` element count.
fn read_count<R: Read>(reader: &mut R) -> Result<usize, SlimeReadError> {
    let count = reader.read_i32::<BigEndian>()?;

    if count < 0 {
        return Err(SegmentFault::NegativeLength { length: count }.into());
    }

    Ok(count as usize)
}

/// Reads a boolean flag followed, when set, by a light nibble array.
fn read_light_array<R: Read>(reader: &mut R) -> Result<Option<Vec<u8>>, SlimeReadError> {
    if reader.read_u8()? == 0 {
        return Ok(None);
    }

    let mut light = vec![0; LIGHT_ARRAY_LENGTH];
    reader.read_exact(&mut light)?;

    Ok(Some(light))
}

/// Reads a length-prefixed palette container tag, which must carry a `palette` list.
fn read_palette_tag<R: Read>(
    reader: &mut R,
    options: &ReadOptions,
) -> Result<CompoundTag, SlimeReadError> {
    let tag = read_tag(&read_buffer(reader, options)?)?;

    if tag.list("palette").is_none() {
        return Err(SlimeReadError::MissingRequiredField { field: "palette" });
    }

    Ok(tag)
}

/// Version 9 section: absolute Y, block light, block states, biomes, sky light.
fn read_section_v9<R: Read>(
    reader: &mut R,
    options: &ReadOptions,
) -> Result<Section, SlimeReadError> {
    let index = reader.read_i32::<BigEndian>()?;
    let block_light = read_light_array(reader)?;
    let block_states = read_palette_tag(reader, options)?;
    let biomes = read_palette_tag(reader, options)?;
    let sky_light = read_light_array(reader)?;

    Ok(Section {
        index,
        block_states,
        biomes,
        block_light,
        sky_light,
    })
}

/// Section of version 10 onward: block light, sky light, block states, biomes.
fn read_section<R: Read>(
    reader: &mut R,
    index: i32,
    options: &ReadOptions,
) -> Result<Section, SlimeReadError> {
    let block_light = read_light_array(reader)?;
    let sky_light = read_light_array(reader)?;
    let block_states = read_palette_tag(reader, options)?;
    let biomes = read_palette_tag(reader, options)?;

    Ok(Section {
        index,
        block_states,
        biomes,
        block_light,
        sky_light,
    })
}

/// Count-prefixed sections indexed by their position.
fn read_sections<R: Read>(
    reader: &mut R,
    options: &ReadOptions,
) -> Result<Vec<Section>, SlimeReadError> {
    let section_count = read_count(reader)?;
    let mut sections = Vec::new();

    for index in 0..section_count {
        sections.push(read_section(reader, index as i32, options)?);
    }

    Ok(sections)
}

/// Reads one version 9 chunk, its coordinates come from the chunk mask.
pub(crate) fn read_chunk_v9<R: Read>(
    reader: &mut R,
    x: i32,
    z: i32,
    options: &ReadOptions,
) -> Result<Chunk, SlimeReadError> {
    let height_maps = read_tag(&read_buffer(reader, options)?)?;

    let min_section_y = reader.read_i32::<BigEndian>()?;
    let max_section_y = reader.read_i32::<BigEndian>()?;
    let section_count = read_count(reader)?;

    let mut sections = Vec::new();

    for _ in 0..section_count {
        sections.push(read_section_v9(reader, options)?);
    }

    Ok(Chunk {
        x,
        z,
        sections,
        height_maps,
        section_bounds: Some((min_section_y, max_section_y)),
        tile_entities: None,
        entities: None,
        extra: None,
    })
}

fn read_chunk<R: Read>(
    reader: &mut R,
    layout: ChunkLayout,
    options: &ReadOptions,
) -> Result<Chunk, SlimeReadError> {
    let x = reader.read_i32::<BigEndian>()?;
    let z = reader.read_i32::<BigEndian>()?;

    trace!(target: "slime-loader", "Reading chunk x: {}, z: {}", x, z);

    let mut chunk = Chunk {
        x,
        z,
        sections: Vec::new(),
        height_maps: CompoundTag::new(),
        section_bounds: None,
        tile_entities: None,
        entities: None,
        extra: None,
    };

    match layout {
        ChunkLayout::V10 => {
            chunk.height_maps = read_tag(&read_buffer(reader, options)?)?;
            chunk.sections = read_sections(reader, options)?;
        }
        ChunkLayout::V11 => {
            chunk.sections = read_sections(reader, options)?;
            chunk.height_maps = read_tag(&read_buffer(reader, options)?)?;
            chunk.tile_entities = read_optional_tag(&read_segment(reader, options)?)?;
            chunk.entities = read_optional_tag(&read_segment(reader, options)?)?;
        }
        ChunkLayout::V12 => {
            chunk.sections = read_sections(reader, options)?;
            chunk.height_maps = read_tag(&read_buffer(reader, options)?)?;
            chunk.tile_entities = read_optional_tag(&read_buffer(reader, options)?)?;
            chunk.entities = read_optional_tag(&read_buffer(reader, options)?)?;
            chunk.extra = read_optional_tag(&read_buffer(reader, options)?)?;
        }
    }

    Ok(chunk)
}

/// Reads a decompressed count-prefixed chunk segment.
pub(crate) fn read_chunks(
    chunk_data: &[u8],
    layout: ChunkLayout,
    options: &ReadOptions,
) -> Result<Vec<Chunk>, SlimeReadError> {
    let mut reader = chunk_data;
    let chunk_count = read_count(&mut reader)?;
    let mut chunks = Vec::new();

    for _ in 0..chunk_count {
        chunks.push(read_chunk(&mut reader, layout, options)?);
    }

    if !reader.is_empty() {
        debug!(
            target: "slime-loader",
            "{} trailing bytes after {} chunks",
            reader.len(),
            chunk_count
        );
    }

    Ok(chunks)
}
