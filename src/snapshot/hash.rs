//! Average perceptual hashing.
//!
//! A perceptual hash is a fixed-length fingerprint designed so that
//! visually similar images produce fingerprints with small Hamming
//! distance. The classic average-hash recipe: grayscale, shrink to a tiny
//! grid, then set one bit per cell for whether it is brighter than the
//! grid mean. Anti-aliasing and rendering noise perturb few cells; real
//! layout regressions perturb many.

use image::imageops::{self, FilterType};
use image::RgbaImage;

/// Packed hash bits for one image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageHash {
    bits: Vec<u8>,
    len: u32,
}

impl ImageHash {
    /// Number of bits in the fingerprint.
    pub fn len(&self) -> u32 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Hamming distance: count of differing bits. Both hashes must come
    /// from the same `hash_bits` setting.
    pub fn distance(&self, other: &ImageHash) -> u32 {
        debug_assert_eq!(self.len, other.len);
        self.bits
            .iter()
            .zip(&other.bits)
            .map(|(a, b)| (a ^ b).count_ones())
            .sum()
    }

    #[cfg(test)]
    pub(crate) fn from_bits(bits: Vec<u8>, len: u32) -> Self {
        Self { bits, len }
    }
}

/// Computes the average hash of `image` on a `hash_bits x hash_bits` grid.
pub fn average_hash(image: &RgbaImage, hash_bits: u32) -> ImageHash {
    let side = hash_bits.max(1);
    let gray = imageops::grayscale(image);
    let grid = imageops::resize(&gray, side, side, FilterType::Triangle);

    let cells = (side * side) as u64;
    let total: u64 = grid.pixels().map(|p| u64::from(p.0[0])).sum();
    let mean = total / cells;

    let mut bits = vec![0u8; cells.div_ceil(8) as usize];
    for (i, pixel) in grid.pixels().enumerate() {
        if u64::from(pixel.0[0]) > mean {
            bits[i / 8] |= 1 << (i % 8);
        }
    }
    ImageHash {
        bits,
        len: cells as u32,
    }
}
