//! Version 9: explicit bounding box and a chunk mask over it.
use crate::chunk::read_chunk_v9;
use crate::error::SlimeReadError;
use crate::format::WorldFormat;
use crate::position::chunk_index;
use crate::segment::{read_segment, ReadOptions};
use crate::tag::read_optional_tag;
use crate::world::{Chunk, World};
use bitvec::prelude::*;
use byteorder::{BigEndian, ReadBytesExt};
use log::debug;
use std::collections::HashMap;
use std::io::Read;

/// Oldest supported payload version.
const MINIMUM_PAYLOAD_VERSION: u8 = 7;

/// Bounding box in chunk units.
struct Header {
    chunk_min_x: i16,
    chunk_min_z: i16,
    width: u16,
    depth: u16,
}

impl Header {
    /// One bit per column of the bounding box.
    fn chunk_mask_length(&self) -> usize {
        (self.width as usize * self.depth as usize + 7) / 8
    }
}

pub(super) fn read_world<R: Read>(
    reader: &mut R,
    options: &ReadOptions,
) -> Result<World, SlimeReadError> {
    let payload_version = reader.read_u8()?;

    if payload_version < MINIMUM_PAYLOAD_VERSION {
        return Err(SlimeReadError::UnsupportedPayloadVersion {
            version: payload_version,
        });
    }

    let header = Header {
        chunk_min_x: reader.read_i16::<BigEndian>()?,
        chunk_min_z: reader.read_i16::<BigEndian>()?,
        width: reader.read_u16::<BigEndian>()?,
        depth: reader.read_u16::<BigEndian>()?,
    };

    let mut chunk_mask = vec![0; header.chunk_mask_length()];
    reader.read_exact(&mut chunk_mask)?;

    let chunk_data = read_segment(reader, options)?;
    let tile_entity_data = read_segment(reader, options)?;
    let entity_data = if reader.read_u8()? != 0 {
        read_segment(reader, options)?
    } else {
        Vec::new()
    };
    let extra_data = read_segment(reader, options)?;

    debug!(
        target: "slime-loader",
        "Payload version {}, chunk data {} bytes, tile entity data {} bytes, entity data {} bytes",
        payload_version,
        chunk_data.len(),
        tile_entity_data.len(),
        entity_data.len()
    );

    let chunks = read_chunks(&chunk_data, &header, &chunk_mask, options)?;

    Ok(World {
        format: WorldFormat::V9,
        world_version: None,
        chunk_min_x: header.chunk_min_x,
        chunk_min_z: header.chunk_min_z,
        width: header.width,
        depth: header.depth,
        extra: read_optional_tag(&extra_data)?,
        tile_entities: read_optional_tag(&tile_entity_data)?,
        entities: read_optional_tag(&entity_data)?,
        chunks,
    })
}

/// Walks the bounding box `z` outer, `x` inner, reading a chunk for every set mask bit.
fn read_chunks(
    chunk_data: &[u8],
    header: &Header,
    chunk_mask: &[u8],
    options: &ReadOptions,
) -> Result<HashMap<i64, Chunk>, SlimeReadError> {
    let chunk_mask = chunk_mask.view_bits::<Lsb0>();
    let width = header.width as usize;
    let mut reader = chunk_data;
    let mut chunks = HashMap::new();

    for z in 0..header.depth as usize {
        for x in 0..width {
            if !chunk_mask[z * width + x] {
                continue;
            }

            let chunk_x = header.chunk_min_x as i32 + x as i32;
            let chunk_z = header.chunk_min_z as i32 + z as i32;

            let chunk = read_chunk_v9(&mut reader, chunk_x, chunk_z, options)?;
            chunks.insert(chunk_index(chunk_x, chunk_z), chunk);
        }
    }

    Ok(chunks)
}
