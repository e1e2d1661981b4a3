//! Fixed bit-width palette index arrays.
//!
//! Values are packed starting from the least significant bits of each word and
//! never span two words, so the top `64 % bits` bits of every word are unused.
use crate::error::SlimeReadError;

/// Amount of blocks in a 16x16x16 section.
pub const BLOCKS_PER_SECTION: usize = 16 * 16 * 16;
/// Amount of biome cells in a 4x4x4 section.
pub const BIOMES_PER_SECTION: usize = 4 * 4 * 4;

/// Bits needed to address every entry of a palette, `ceil(log2(palette_len))` and at least one.
pub fn bits_per_value(palette_len: usize) -> u32 {
    let max_index = palette_len.max(2) - 1;

    usize::BITS - max_index.leading_zeros()
}

/// Resolves the palette indices of a section.
///
/// A palette with a single entry carries no `data` array and every index is zero.
pub fn unpack_palette_indices(
    palette_len: usize,
    data: Option<&[i64]>,
    count: usize,
) -> Result<Vec<u32>, SlimeReadError> {
    if palette_len <= 1 {
        return Ok(vec![0; count]);
    }

    let words = data.ok_or(SlimeReadError::MissingRequiredField { field: "data" })?;

    unpack_indices(words, bits_per_value(palette_len), count)
}

/// Unpacks exactly `count` values of `bits_per_value` bits from `words`.
pub fn unpack_indices(
    words: &[i64],
    bits_per_value: u32,
    count: usize,
) -> Result<Vec<u32>, SlimeReadError> {
    if !(1..=32).contains(&bits_per_value) {
        return Err(SlimeReadError::InvalidBitsPerValue { bits_per_value });
    }

    let values_per_word = 64 / bits_per_value as usize;
    let expected_length = (count + values_per_word - 1) / values_per_word;

    if words.len() != expected_length {
        return Err(SlimeReadError::CorruptPackedArray {
            bits_per_value,
            expected_length,
            actual_length: words.len(),
        });
    }

    let mask = (1u64 << bits_per_value) - 1;

    let values = (0..count)
        .map(|index| {
            let word = words[index / values_per_word] as u64;
            let shift = (index % values_per_word) as u32 * bits_per_value;

            ((word >> shift) & mask) as u32
        })
        .collect();

    Ok(values)
}

/// Inverse of [`unpack_indices`], used to build fixtures.
#[cfg(test)]
pub(crate) fn pack_indices(values: &[u32], bits_per_value: u32) -> Vec<i64> {
    let values_per_word = 64 / bits_per_value as usize;

    values
        .chunks(values_per_word)
        .map(|chunk| {
            let word = chunk.iter().enumerate().fold(0u64, |word, (index, &value)| {
                word | (value as u64) << (index as u32 * bits_per_value)
            });

            word as i64
        })
        .collect()
}
