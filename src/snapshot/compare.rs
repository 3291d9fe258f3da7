//! Snapshot comparators.
//!
//! Two interchangeable strategies share one question: do expected and
//! actual match? Data snapshots use exact structural equality; screenshots
//! use perceptual-hash distance under a configured threshold.

use image::RgbaImage;
use serde_json::Value;

use crate::config::ImageMatch;

use super::hash::{average_hash, ImageHash};

/// Exact comparator for data snapshots: structural equality of the decoded
/// value graphs, no tolerance.
pub fn data_matches(expected: &Value, actual: &Value) -> bool {
    expected == actual
}

/// Perceptual comparator for image snapshots.
///
/// Tolerates anti-aliasing and rendering noise while still catching real
/// visual regressions: two screenshots match when the Hamming distance of
/// their average hashes is *strictly* less than the threshold.
#[derive(Debug, Clone, Copy)]
pub struct PerceptualMatch {
    hash_bits: u32,
    threshold: u32,
}

impl PerceptualMatch {
    pub fn new(settings: ImageMatch) -> Self {
        Self {
            hash_bits: settings.hash_bits,
            threshold: settings.threshold,
        }
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    pub fn hash(&self, image: &RgbaImage) -> ImageHash {
        average_hash(image, self.hash_bits)
    }

    pub fn distance(&self, expected: &RgbaImage, actual: &RgbaImage) -> u32 {
        self.hash(expected).distance(&self.hash(actual))
    }

    /// Strict inequality: a distance equal to the threshold is a mismatch.
    pub fn is_within(&self, distance: u32) -> bool {
        distance < self.threshold
    }

    pub fn matches(&self, expected: &RgbaImage, actual: &RgbaImage) -> bool {
        self.is_within(self.distance(expected, actual))
    }
}

#[cfg(test)]
mod tests {
    use image::Rgba;

    use super::*;

    #[test]
    fn data_equality_is_structural() {
        let a = serde_json::json!({"items": [1, 2], "total": 3});
        let b = serde_json::json!({"total": 3, "items": [1, 2]});
        assert!(data_matches(&a, &b));
        let c = serde_json::json!({"items": [1, 2], "total": 4});
        assert!(!data_matches(&a, &c));
    }

    #[test]
    fn threshold_boundary_is_strict() {
        let cmp = PerceptualMatch::new(ImageMatch {
            hash_bits: 8,
            threshold: 4,
        });
        assert!(cmp.is_within(0));
        assert!(cmp.is_within(3));
        assert!(!cmp.is_within(4));
        assert!(!cmp.is_within(5));
    }

    #[test]
    fn identical_screenshots_match() {
        let img = RgbaImage::from_pixel(20, 20, Rgba([120, 10, 200, 255]));
        let cmp = PerceptualMatch::new(ImageMatch::default());
        assert!(cmp.matches(&img, &img.clone()));
    }

    /// Grid-sized images make each pixel one hash cell, so the comparator
    /// can be driven to the exact boundary: threshold - 1 differing cells
    /// match, threshold differing cells do not.
    #[test]
    fn boundary_holds_for_real_images() {
        let threshold = 4u32;
        let cmp = PerceptualMatch::new(ImageMatch {
            hash_bits: 4,
            threshold,
        });

        let mut expected = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));
        for x in 0..2 {
            for y in 0..4 {
                expected.put_pixel(x, y, Rgba([255, 255, 255, 255]));
            }
        }

        let mut near = expected.clone();
        for y in 0..threshold - 1 {
            near.put_pixel(2, y, Rgba([255, 255, 255, 255]));
        }
        assert_eq!(cmp.distance(&expected, &near), threshold - 1);
        assert!(cmp.matches(&expected, &near));

        let mut far = expected.clone();
        for y in 0..threshold {
            far.put_pixel(2, y, Rgba([255, 255, 255, 255]));
        }
        assert_eq!(cmp.distance(&expected, &far), threshold);
        assert!(!cmp.matches(&expected, &far));
    }
}
