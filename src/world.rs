use crate::error::SlimeReadError;
use crate::format::WorldFormat;
use crate::packed::{unpack_palette_indices, BIOMES_PER_SECTION, BLOCKS_PER_SECTION};
use crate::position::{chunk_index, ChunkPosition};
use crate::tag::CompoundTagExt;
use nbt::{CompoundTag, Tag};
use std::collections::HashMap;

/// Decoded slime world.
#[derive(Debug)]
pub struct World {
    pub(crate) format: WorldFormat,
    pub(crate) world_version: Option<i32>,
    pub(crate) chunk_min_x: i16,
    pub(crate) chunk_min_z: i16,
    pub(crate) width: u16,
    pub(crate) depth: u16,
    pub(crate) extra: Option<CompoundTag>,
    pub(crate) tile_entities: Option<CompoundTag>,
    pub(crate) entities: Option<CompoundTag>,
    pub(crate) chunks: HashMap<i64, Chunk>,
}

impl World {
    /// Format the world was decoded from.
    pub fn format(&self) -> WorldFormat {
        self.format
    }

    /// Data version of the game that saved the world, absent before version 10.
    pub fn world_version(&self) -> Option<i32> {
        self.world_version
    }

    pub fn chunk_min_x(&self) -> i16 {
        self.chunk_min_x
    }

    pub fn chunk_min_z(&self) -> i16 {
        self.chunk_min_z
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn depth(&self) -> u16 {
        self.depth
    }

    /// File level metadata compound.
    pub fn extra(&self) -> Option<&CompoundTag> {
        self.extra.as_ref()
    }

    /// File level tile entities of version 9 and 10 worlds.
    ///
    /// They are kept as decoded and never merged into chunks.
    pub fn tile_entities(&self) -> Option<&CompoundTag> {
        self.tile_entities.as_ref()
    }

    /// File level entities of version 9 and 10 worlds.
    pub fn entities(&self) -> Option<&CompoundTag> {
        self.entities.as_ref()
    }

    pub fn chunk(&self, x: i32, z: i32) -> Option<&Chunk> {
        self.chunks.get(&chunk_index(x, z))
    }

    pub fn chunk_at(&self, position: ChunkPosition) -> Option<&Chunk> {
        self.chunks.get(&position.index())
    }

    /// Chunks keyed by [`chunk_index`], in no particular order.
    pub fn chunks(&self) -> impl Iterator<Item = (i64, &Chunk)> {
        self.chunks.iter().map(|(index, chunk)| (*index, chunk))
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }
}

/// Column of sections.
#[derive(Debug)]
pub struct Chunk {
    pub(crate) x: i32,
    pub(crate) z: i32,
    pub(crate) sections: Vec<Section>,
    pub(crate) height_maps: CompoundTag,
    pub(crate) section_bounds: Option<(i32, i32)>,
    pub(crate) tile_entities: Option<CompoundTag>,
    pub(crate) entities: Option<CompoundTag>,
    pub(crate) extra: Option<CompoundTag>,
}

impl Chunk {
    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn z(&self) -> i32 {
        self.z
    }

    pub fn position(&self) -> ChunkPosition {
        ChunkPosition::new(self.x, self.z)
    }

    /// Sections in file order.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Section with the given [`Section::index`].
    pub fn section(&self, index: i32) -> Option<&Section> {
        self.sections.iter().find(|section| section.index == index)
    }

    pub fn height_maps(&self) -> &CompoundTag {
        &self.height_maps
    }

    /// Minimum and maximum section Y stored by version 9 chunks.
    pub fn section_bounds(&self) -> Option<(i32, i32)> {
        self.section_bounds
    }

    /// Tile entities stored with the chunk, version 11 onward.
    pub fn tile_entities(&self) -> Option<&CompoundTag> {
        self.tile_entities.as_ref()
    }

    /// Entities stored with the chunk, version 11 onward.
    pub fn entities(&self) -> Option<&CompoundTag> {
        self.entities.as_ref()
    }

    /// Chunk metadata compound, version 12 onward.
    pub fn extra(&self) -> Option<&CompoundTag> {
        self.extra.as_ref()
    }
}

/// 16x16x16 slab of a chunk.
///
/// Palette indices stay packed until [`Section::block_indices`] or
/// [`Section::biome_indices`] is called.
#[derive(Debug)]
pub struct Section {
    pub(crate) index: i32,
    pub(crate) block_states: CompoundTag,
    pub(crate) biomes: CompoundTag,
    pub(crate) block_light: Option<Vec<u8>>,
    pub(crate) sky_light: Option<Vec<u8>>,
}

impl Section {
    /// Absolute section Y for version 9, position inside the chunk otherwise.
    pub fn index(&self) -> i32 {
        self.index
    }

    pub fn block_states(&self) -> &CompoundTag {
        &self.block_states
    }

    pub fn biomes(&self) -> &CompoundTag {
        &self.biomes
    }

    pub fn block_palette(&self) -> &[Tag] {
        self.block_states.list("palette").unwrap_or(&[])
    }

    pub fn biome_palette(&self) -> &[Tag] {
        self.biomes.list("palette").unwrap_or(&[])
    }

    /// 2048 byte block light nibble array.
    pub fn block_light(&self) -> Option<&[u8]> {
        self.block_light.as_deref()
    }

    /// 2048 byte sky light nibble array.
    pub fn sky_light(&self) -> Option<&[u8]> {
        self.sky_light.as_deref()
    }

    /// Block palette index of each of the 4096 blocks, ordered `y`, `z`, `x` from the outside in.
    pub fn block_indices(&self) -> Result<Vec<u32>, SlimeReadError> {
        unpack_palette_indices(
            self.block_palette().len(),
            self.block_states.long_array("data"),
            BLOCKS_PER_SECTION,
        )
    }

    /// Biome palette index of each of the 64 biome cells.
    pub fn biome_indices(&self) -> Result<Vec<u32>, SlimeReadError> {
        unpack_palette_indices(
            self.biome_palette().len(),
            self.biomes.long_array("data"),
            BIOMES_PER_SECTION,
        )
    }
}
