//! Writes slime streams for tests.
use crate::chunk::ChunkLayout;
use crate::format::SLIME_MAGIC;
use byteorder::{BigEndian, WriteBytesExt};
use nbt::encode::write_compound_tag;
use nbt::CompoundTag;

pub(crate) fn tag_bytes(tag: &CompoundTag) -> Vec<u8> {
    let mut bytes = Vec::new();
    write_compound_tag(&mut bytes, tag).unwrap();
    bytes
}

fn optional_tag_bytes(tag: &Option<CompoundTag>) -> Vec<u8> {
    tag.as_ref().map(tag_bytes).unwrap_or_default()
}

pub(crate) fn compressed_segment(payload: &[u8]) -> Vec<u8> {
    let compressed = zstd::bulk::compress(payload, 0).unwrap();

    let mut bytes = Vec::new();
    bytes.write_i32::<BigEndian>(compressed.len() as i32).unwrap();
    bytes.write_i32::<BigEndian>(payload.len() as i32).unwrap();
    bytes.extend_from_slice(&compressed);
    bytes
}

fn write_buffer(bytes: &mut Vec<u8>, buffer: &[u8]) {
    bytes.write_i32::<BigEndian>(buffer.len() as i32).unwrap();
    bytes.extend_from_slice(buffer);
}

fn write_light(bytes: &mut Vec<u8>, light: &Option<Vec<u8>>) {
    match light {
        Some(light) => {
            bytes.write_u8(1).unwrap();
            bytes.extend_from_slice(light);
        }
        None => bytes.write_u8(0).unwrap(),
    }
}

/// Block state container with one `Name` compound per palette entry.
pub(crate) fn block_states(names: &[&str], data: Option<Vec<i64>>) -> CompoundTag {
    let palette: Vec<CompoundTag> = names
        .iter()
        .map(|name| {
            let mut block = CompoundTag::new();
            block.insert_str("Name", *name);
            block
        })
        .collect();

    let mut tag = CompoundTag::new();
    tag.insert_compound_tag_vec("palette", palette);

    if let Some(data) = data {
        tag.insert_i64_vec("data", data);
    }

    tag
}

/// Biome container with a string palette.
pub(crate) fn biomes(names: &[&str], data: Option<Vec<i64>>) -> CompoundTag {
    let mut tag = CompoundTag::new();
    tag.insert_str_vec("palette", names.to_vec());

    if let Some(data) = data {
        tag.insert_i64_vec("data", data);
    }

    tag
}

pub(crate) struct SectionFixture {
    /// Only written by version 9.
    pub(crate) y: i32,
    pub(crate) block_light: Option<Vec<u8>>,
    pub(crate) sky_light: Option<Vec<u8>>,
    pub(crate) block_states: CompoundTag,
    pub(crate) biomes: CompoundTag,
}

impl SectionFixture {
    /// Section filled with one block and one biome.
    pub(crate) fn single(block: &str, biome: &str) -> SectionFixture {
        SectionFixture {
            y: 0,
            block_light: None,
            sky_light: None,
            block_states: block_states(&[block], None),
            biomes: biomes(&[biome], None),
        }
    }
}

pub(crate) struct ChunkFixture {
    pub(crate) x: i32,
    pub(crate) z: i32,
    pub(crate) sections: Vec<SectionFixture>,
    pub(crate) height_maps: CompoundTag,
    pub(crate) tile_entities: Option<CompoundTag>,
    pub(crate) entities: Option<CompoundTag>,
    pub(crate) extra: Option<CompoundTag>,
}

impl ChunkFixture {
    pub(crate) fn new(x: i32, z: i32) -> ChunkFixture {
        ChunkFixture {
            x,
            z,
            sections: Vec::new(),
            height_maps: CompoundTag::new(),
            tile_entities: None,
            entities: None,
            extra: None,
        }
    }
}

fn write_sections(bytes: &mut Vec<u8>, sections: &[SectionFixture]) {
    bytes.write_i32::<BigEndian>(sections.len() as i32).unwrap();

    for section in sections {
        write_light(bytes, &section.block_light);
        write_light(bytes, &section.sky_light);
        write_buffer(bytes, &tag_bytes(&section.block_states));
        write_buffer(bytes, &tag_bytes(&section.biomes));
    }
}

pub(crate) fn write_chunk(bytes: &mut Vec<u8>, chunk: &ChunkFixture, layout: ChunkLayout) {
    bytes.write_i32::<BigEndian>(chunk.x).unwrap();
    bytes.write_i32::<BigEndian>(chunk.z).unwrap();

    match layout {
        ChunkLayout::V10 => {
            write_buffer(bytes, &tag_bytes(&chunk.height_maps));
            write_sections(bytes, &chunk.sections);
        }
        ChunkLayout::V11 => {
            write_sections(bytes, &chunk.sections);
            write_buffer(bytes, &tag_bytes(&chunk.height_maps));
            bytes.extend(compressed_segment(&optional_tag_bytes(&chunk.tile_entities)));
            bytes.extend(compressed_segment(&optional_tag_bytes(&chunk.entities)));
        }
        ChunkLayout::V12 => {
            write_sections(bytes, &chunk.sections);
            write_buffer(bytes, &tag_bytes(&chunk.height_maps));
            write_buffer(bytes, &optional_tag_bytes(&chunk.tile_entities));
            write_buffer(bytes, &optional_tag_bytes(&chunk.entities));
            write_buffer(bytes, &optional_tag_bytes(&chunk.extra));
        }
    }
}

/// Uncompressed count-prefixed chunk segment.
pub(crate) fn write_chunks(chunks: &[ChunkFixture], layout: ChunkLayout) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.write_i32::<BigEndian>(chunks.len() as i32).unwrap();

    for chunk in chunks {
        write_chunk(&mut bytes, chunk, layout);
    }

    bytes
}

/// Version 9 chunk record, coordinates are implied by the chunk mask.
pub(crate) fn write_chunk_v9(bytes: &mut Vec<u8>, chunk: &ChunkFixture, section_bounds: (i32, i32)) {
    write_buffer(bytes, &tag_bytes(&chunk.height_maps));
    bytes.write_i32::<BigEndian>(section_bounds.0).unwrap();
    bytes.write_i32::<BigEndian>(section_bounds.1).unwrap();
    bytes.write_i32::<BigEndian>(chunk.sections.len() as i32).unwrap();

    for section in &chunk.sections {
        bytes.write_i32::<BigEndian>(section.y).unwrap();
        write_light(bytes, &section.block_light);
        write_buffer(bytes, &tag_bytes(&section.block_states));
        write_buffer(bytes, &tag_bytes(&section.biomes));
        write_light(bytes, &section.sky_light);
    }
}

/// Version 10, 11 or 12 world.
pub(crate) struct WorldFixture {
    pub(crate) layout: ChunkLayout,
    pub(crate) world_version: i32,
    pub(crate) chunks: Vec<ChunkFixture>,
    /// Only written by version 10.
    pub(crate) tile_entities: Option<CompoundTag>,
    /// Only written by version 10.
    pub(crate) entities: Option<CompoundTag>,
    pub(crate) extra: Option<CompoundTag>,
}

impl WorldFixture {
    pub(crate) fn new(layout: ChunkLayout, world_version: i32) -> WorldFixture {
        WorldFixture {
            layout,
            world_version,
            chunks: Vec::new(),
            tile_entities: None,
            entities: None,
            extra: None,
        }
    }

    pub(crate) fn to_bytes(&self) -> Vec<u8> {
        let version = match self.layout {
            ChunkLayout::V10 => 10,
            ChunkLayout::V11 => 11,
            ChunkLayout::V12 => 12,
        };

        let mut bytes = Vec::new();
        bytes.write_u16::<BigEndian>(SLIME_MAGIC).unwrap();
        bytes.write_u8(version).unwrap();
        bytes.write_i32::<BigEndian>(self.world_version).unwrap();
        bytes.extend(compressed_segment(&write_chunks(&self.chunks, self.layout)));

        if self.layout == ChunkLayout::V10 {
            bytes.extend(compressed_segment(&optional_tag_bytes(&self.tile_entities)));
            bytes.extend(compressed_segment(&optional_tag_bytes(&self.entities)));
        }

        bytes.extend(compressed_segment(&optional_tag_bytes(&self.extra)));
        bytes
    }
}

/// Version 9 world, `chunks` are written in mask order.
pub(crate) struct V9Fixture {
    pub(crate) payload_version: u8,
    pub(crate) chunk_min_x: i16,
    pub(crate) chunk_min_z: i16,
    pub(crate) width: u16,
    pub(crate) depth: u16,
    pub(crate) chunk_mask: Vec<u8>,
    pub(crate) chunks: Vec<ChunkFixture>,
    pub(crate) tile_entities: Option<CompoundTag>,
    /// Written behind a presence flag.
    pub(crate) entities: Option<CompoundTag>,
    pub(crate) extra: Option<CompoundTag>,
}

impl V9Fixture {
    pub(crate) fn new(chunk_min_x: i16, chunk_min_z: i16, width: u16, depth: u16) -> V9Fixture {
        let mask_length = (width as usize * depth as usize + 7) / 8;

        V9Fixture {
            payload_version: 9,
            chunk_min_x,
            chunk_min_z,
            width,
            depth,
            chunk_mask: vec![0; mask_length],
            chunks: Vec::new(),
            tile_entities: None,
            entities: None,
            extra: None,
        }
    }

    pub(crate) fn to_bytes(&self) -> Vec<u8> {
        let mut chunk_data = Vec::new();

        for chunk in &self.chunks {
            let min_y = chunk.sections.iter().map(|section| section.y).min().unwrap_or(0);
            let max_y = chunk.sections.iter().map(|section| section.y).max().unwrap_or(0);
            write_chunk_v9(&mut chunk_data, chunk, (min_y, max_y));
        }

        let mut bytes = Vec::new();
        bytes.write_u16::<BigEndian>(SLIME_MAGIC).unwrap();
        bytes.write_u8(9).unwrap();
        bytes.write_u8(self.payload_version).unwrap();
        bytes.write_i16::<BigEndian>(self.chunk_min_x).unwrap();
        bytes.write_i16::<BigEndian>(self.chunk_min_z).unwrap();
        bytes.write_u16::<BigEndian>(self.width).unwrap();
        bytes.write_u16::<BigEndian>(self.depth).unwrap();
        bytes.extend_from_slice(&self.chunk_mask);
        bytes.extend(compressed_segment(&chunk_data));
        bytes.extend(compressed_segment(&optional_tag_bytes(&self.tile_entities)));

        match &self.entities {
            Some(entities) => {
                bytes.write_u8(1).unwrap();
                bytes.extend(compressed_segment(&tag_bytes(entities)));
            }
            None => bytes.write_u8(0).unwrap(),
        }

        bytes.extend(compressed_segment(&optional_tag_bytes(&self.extra)));
        bytes
    }
}
