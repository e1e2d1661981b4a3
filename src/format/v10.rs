//! Version 10: chunk, tile entity, entity and extra segments; tags are file level only.
use crate::chunk::{read_chunks, ChunkLayout};
use crate::error::SlimeReadError;
use crate::format::{world_from_chunks, WorldFormat, WorldTags};
use crate::segment::{read_segment, ReadOptions};
use crate::tag::read_optional_tag;
use crate::world::World;
use byteorder::{BigEndian, ReadBytesExt};
use log::debug;
use std::io::Read;

/// Oldest supported world version.
const MINIMUM_WORLD_VERSION: i32 = 7;

pub(super) fn read_world<R: Read>(
    reader: &mut R,
    options: &ReadOptions,
) -> Result<World, SlimeReadError> {
    let world_version = reader.read_i32::<BigEndian>()?;

    if world_version < MINIMUM_WORLD_VERSION {
        return Err(SlimeReadError::UnsupportedWorldVersion {
            version: world_version,
        });
    }

    let chunk_data = read_segment(reader, options)?;
    let tile_entity_data = read_segment(reader, options)?;
    let entity_data = read_segment(reader, options)?;
    let extra_data = read_segment(reader, options)?;

    debug!(
        target: "slime-loader",
        "World version {}, chunk data {} bytes, tile entity data {} bytes, entity data {} bytes",
        world_version,
        chunk_data.len(),
        tile_entity_data.len(),
        entity_data.len()
    );

    let chunks = read_chunks(&chunk_data, ChunkLayout::V10, options)?;
    let tags = WorldTags {
        extra: read_optional_tag(&extra_data)?,
        tile_entities: read_optional_tag(&tile_entity_data)?,
        entities: read_optional_tag(&entity_data)?,
    };

    world_from_chunks(WorldFormat::V10, world_version, chunks, tags)
}

#[cfg(test)]
mod tests {
    use crate::chunk::ChunkLayout;
    use crate::decode;
    use crate::error::{SegmentFault, SlimeReadError};
    use crate::format::WorldFormat;
    use crate::position::chunk_index;
    use crate::tag::{CompoundTagExt, TagExt};
    use crate::test_support::{ChunkFixture, SectionFixture, WorldFixture};
    use nbt::CompoundTag;

    #[test]
    fn test_minimal_world() {
        let mut fixture = WorldFixture::new(ChunkLayout::V10, 7);
        fixture.extra = Some(CompoundTag::new());
        fixture.chunks = vec![ChunkFixture::new(0, 0)];

        let world = decode(&fixture.to_bytes()).unwrap();

        assert_eq!(world.format(), WorldFormat::V10);
        assert_eq!(world.world_version(), Some(7));
        assert_eq!(world.chunk_count(), 1);
        assert!(world.extra().is_some());

        let (index, chunk) = world.chunks().next().unwrap();
        assert_eq!(index, chunk_index(0, 0));
        assert!(chunk.sections().is_empty());
        assert_eq!(chunk.height_maps().iter().count(), 0);
    }

    #[test]
    fn test_derived_bounds() {
        let mut fixture = WorldFixture::new(ChunkLayout::V10, 3465);
        fixture.chunks = vec![
            ChunkFixture::new(-2, 5),
            ChunkFixture::new(4, -1),
            ChunkFixture::new(1, 9),
        ];

        let world = decode(&fixture.to_bytes()).unwrap();

        assert_eq!(world.chunk_count(), 3);
        assert_eq!(world.chunk_min_x(), -2);
        assert_eq!(world.chunk_min_z(), -1);
        assert_eq!(world.width(), 6);
        assert_eq!(world.depth(), 10);
    }

    #[test]
    fn test_file_level_tags() {
        let mut tile_entities = CompoundTag::new();
        tile_entities.insert_compound_tag_vec("tiles", vec![CompoundTag::new()]);

        let mut fixture = WorldFixture::new(ChunkLayout::V10, 3465);
        let mut chunk = ChunkFixture::new(0, 0);
        chunk.sections = vec![
            SectionFixture::single("minecraft:bedrock", "minecraft:plains"),
            SectionFixture::single("minecraft:air", "minecraft:plains"),
        ];
        fixture.chunks = vec![chunk];
        fixture.tile_entities = Some(tile_entities);

        let world = decode(&fixture.to_bytes()).unwrap();

        assert_eq!(world.tile_entities().unwrap().list("tiles").unwrap().len(), 1);
        assert!(world.entities().is_none());
        assert!(world.extra().is_none());

        let chunk = world.chunk(0, 0).unwrap();
        assert!(chunk.tile_entities().is_none());
        assert_eq!(chunk.sections()[1].index(), 1);
        assert_eq!(
            chunk.sections()[0].block_palette()[0]
                .as_compound()
                .and_then(|block| block.string("Name")),
            Some("minecraft:bedrock")
        );
    }

    #[test]
    fn test_truncated_world() {
        let mut fixture = WorldFixture::new(ChunkLayout::V10, 7);
        fixture.chunks = vec![ChunkFixture::new(0, 0)];

        let bytes = fixture.to_bytes();

        match decode(&bytes[..bytes.len() - 2]) {
            Err(SlimeReadError::CorruptSegment {
                fault: SegmentFault::UnexpectedEof,
            }) => {}
            result => panic!("Expected `UnexpectedEof` but got `{:?}`", result),
        }
    }

    #[test]
    fn test_old_world_version() {
        for &version in &[i32::MIN, -1, 0, 6] {
            let fixture = WorldFixture::new(ChunkLayout::V10, version);

            match decode(&fixture.to_bytes()) {
                Err(SlimeReadError::UnsupportedWorldVersion { version: found }) => {
                    assert_eq!(found, version)
                }
                result => panic!("Expected `UnsupportedWorldVersion` but got `{:?}`", result),
            }
        }
    }
}
