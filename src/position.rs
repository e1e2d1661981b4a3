/// Chunk coordinates in chunk units.
#[derive(Debug, Ord, PartialOrd, Eq, PartialEq, Hash, Copy, Clone)]
pub struct ChunkPosition {
    pub x: i32,
    pub z: i32,
}

impl ChunkPosition {
    pub fn new(x: i32, z: i32) -> ChunkPosition {
        ChunkPosition { x, z }
    }

    /// Map key of this position, see [`chunk_index`].
    pub fn index(&self) -> i64 {
        chunk_index(self.x, self.z)
    }

    /// Inverse of [`chunk_index`].
    pub fn from_index(index: i64) -> ChunkPosition {
        let x = (index >> 32) as i32;
        let z = index as i32;

        ChunkPosition::new(x, z)
    }
}

/// Packs chunk coordinates into one key: `x` in the high 32 bits, `z` in the low 32 bits.
pub fn chunk_index(x: i32, z: i32) -> i64 {
    ((x as i64) << 32) | (z as i64 & 0xFFFF_FFFF)
}
