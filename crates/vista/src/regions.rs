//! Diff region extraction from a similarity map.
//!
//! The map is rescaled to 8 bits and binarized with Otsu's threshold,
//! inverted so dissimilar pixels become foreground. Regions are the
//! 8-connected foreground components taken by their outer boundary: holes
//! and anything nested inside a hole count as part of the enclosing region.
//! Components of [`MIN_REGION_AREA`] pixels or fewer are rendering noise.

use crate::similarity::SimilarityMap;
use image::GrayImage;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Regions must be strictly larger than this many pixels to be reported
pub const MIN_REGION_AREA: u32 = 100;

/// Axis-aligned box around a cluster of change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffRegion {
    /// Left edge
    pub x: u32,
    /// Top edge
    pub y: u32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Pixels enclosed by the region's outer boundary
    pub area: u32,
}

impl DiffRegion {
    /// Create a region
    #[must_use]
    pub const fn new(x: u32, y: u32, width: u32, height: u32, area: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            area,
        }
    }

    /// Whether `(px, py)` is inside the bounding box
    #[must_use]
    pub const fn contains(&self, px: u32, py: u32) -> bool {
        px >= self.x && px < self.x + self.width && py >= self.y && py < self.y + self.height
    }
}

/// Otsu's threshold over a 256-bin histogram.
///
/// Returns the intensity `t` that maximizes between-class variance, with
/// classes `<= t` and `> t`.
#[must_use]
pub fn otsu_threshold(gray: &GrayImage) -> u8 {
    let mut hist = [0u64; 256];
    for &v in gray.as_raw() {
        hist[v as usize] += 1;
    }

    let total = gray.as_raw().len() as f64;
    let sum_all: f64 = hist
        .iter()
        .enumerate()
        .map(|(i, &count)| i as f64 * count as f64)
        .sum();

    let mut best_threshold = 0u8;
    let mut best_variance = 0.0f64;
    let mut weight_bg = 0.0f64;
    let mut sum_bg = 0.0f64;

    for (t, &count) in hist.iter().enumerate() {
        weight_bg += count as f64;
        if weight_bg == 0.0 {
            continue;
        }
        let weight_fg = total - weight_bg;
        if weight_fg == 0.0 {
            break;
        }

        sum_bg += t as f64 * count as f64;
        let mean_bg = sum_bg / weight_bg;
        let mean_fg = (sum_all - sum_bg) / weight_fg;
        let between = weight_bg * weight_fg * (mean_bg - mean_fg) * (mean_bg - mean_fg);

        if between > best_variance {
            best_variance = between;
            best_threshold = t as u8;
        }
    }

    best_threshold
}

/// Row-major foreground mask of pixels at or below `threshold`.
#[must_use]
pub fn binarize_inverted(gray: &GrayImage, threshold: u8) -> Vec<bool> {
    gray.as_raw().iter().map(|&v| v <= threshold).collect()
}

/// Outer-boundary components of `mask`, in row-major discovery order.
///
/// Every component is returned regardless of size.
#[must_use]
pub fn external_components(mask: &[bool], width: u32, height: u32) -> Vec<DiffRegion> {
    let (w, h) = (width as usize, height as usize);
    debug_assert_eq!(mask.len(), w * h);

    // Background reachable from the border (4-connected, the dual of
    // 8-connected foreground). Everything else is a component or its interior.
    let mut outside = vec![false; w * h];
    let mut queue = VecDeque::new();
    for row in 0..h {
        for col in 0..w {
            let on_border = row == 0 || col == 0 || row == h - 1 || col == w - 1;
            let idx = row * w + col;
            if on_border && !mask[idx] && !outside[idx] {
                outside[idx] = true;
                queue.push_back(idx);
            }
        }
    }
    while let Some(idx) = queue.pop_front() {
        let (row, col) = (idx / w, idx % w);
        let mut visit = |r: usize, c: usize| {
            let n = r * w + c;
            if !mask[n] && !outside[n] {
                outside[n] = true;
                queue.push_back(n);
            }
        };
        if row > 0 {
            visit(row - 1, col);
        }
        if row + 1 < h {
            visit(row + 1, col);
        }
        if col > 0 {
            visit(row, col - 1);
        }
        if col + 1 < w {
            visit(row, col + 1);
        }
    }

    let mut seen = outside;
    let mut regions = Vec::new();
    for start in 0..w * h {
        if seen[start] {
            continue;
        }
        seen[start] = true;
        queue.push_back(start);

        let (mut min_x, mut min_y) = (start % w, start / w);
        let (mut max_x, mut max_y) = (min_x, min_y);
        let mut area = 0u32;

        while let Some(idx) = queue.pop_front() {
            let (row, col) = (idx / w, idx % w);
            area += 1;
            min_x = min_x.min(col);
            max_x = max_x.max(col);
            min_y = min_y.min(row);
            max_y = max_y.max(row);

            for r in row.saturating_sub(1)..=(row + 1).min(h - 1) {
                for c in col.saturating_sub(1)..=(col + 1).min(w - 1) {
                    let n = r * w + c;
                    if !seen[n] {
                        seen[n] = true;
                        queue.push_back(n);
                    }
                }
            }
        }

        regions.push(DiffRegion::new(
            min_x as u32,
            min_y as u32,
            (max_x - min_x + 1) as u32,
            (max_y - min_y + 1) as u32,
            area,
        ));
    }

    regions
}

/// Locate significant change in a similarity map.
#[must_use]
pub fn extract_regions(map: &SimilarityMap) -> Vec<DiffRegion> {
    let intensity = map.to_intensity();
    let threshold = otsu_threshold(&intensity);
    let mask = binarize_inverted(&intensity, threshold);

    let components = external_components(&mask, map.width(), map.height());
    let found = components.len();
    let regions: Vec<DiffRegion> = components
        .into_iter()
        .filter(|r| r.area > MIN_REGION_AREA)
        .collect();

    tracing::debug!(
        threshold,
        components = found,
        significant = regions.len(),
        "extracted diff regions"
    );
    regions
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use image::Luma;
    use proptest::prelude::*;

    fn mask_from(rows: &[&str]) -> (Vec<bool>, u32, u32) {
        let h = rows.len() as u32;
        let w = rows[0].len() as u32;
        let mask = rows
            .iter()
            .flat_map(|r| r.chars().map(|c| c == '#'))
            .collect();
        (mask, w, h)
    }

    fn map_with_holes(width: u32, height: u32, boxes: &[(u32, u32, u32, u32)]) -> SimilarityMap {
        let mut values = vec![1.0; (width * height) as usize];
        for &(bx, by, bw, bh) in boxes {
            for y in by..by + bh {
                for x in bx..bx + bw {
                    values[(y * width + x) as usize] = 0.0;
                }
            }
        }
        SimilarityMap::from_values(width, height, values).unwrap()
    }

    #[test]
    fn test_otsu_bimodal() {
        let gray = GrayImage::from_fn(100, 1, |x, _| {
            if x < 50 {
                Luma([(x % 50) as u8])
            } else {
                Luma([(200 + x % 56) as u8])
            }
        });
        let t = otsu_threshold(&gray);
        assert!((49..200).contains(&t), "otsu threshold was {t}");
    }

    #[test]
    fn test_otsu_uniform_is_zero() {
        let gray = GrayImage::from_pixel(10, 10, Luma([255]));
        assert_eq!(otsu_threshold(&gray), 0);
    }

    #[test]
    fn test_single_component_bbox() {
        let (mask, w, h) = mask_from(&[
            "......", //
            ".##...", //
            ".###..", //
            "......",
        ]);
        let regions = external_components(&mask, w, h);
        assert_eq!(regions, vec![DiffRegion::new(1, 1, 3, 2, 5)]);
    }

    #[test]
    fn test_diagonal_pixels_are_connected() {
        let (mask, w, h) = mask_from(&[
            "#...", //
            ".#..", //
            "..#.",
        ]);
        let regions = external_components(&mask, w, h);
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0], DiffRegion::new(0, 0, 3, 3, 3));
    }

    #[test]
    fn test_separate_components_in_discovery_order() {
        let (mask, w, h) = mask_from(&[
            "...##", //
            ".....", //
            "#....",
        ]);
        let regions = external_components(&mask, w, h);
        assert_eq!(
            regions,
            vec![DiffRegion::new(3, 0, 2, 1, 2), DiffRegion::new(0, 2, 1, 1, 1)]
        );
    }

    #[test]
    fn test_nested_component_is_absorbed() {
        let (mask, w, h) = mask_from(&[
            ".........", //
            ".#######.", //
            ".#.....#.", //
            ".#..#..#.", //
            ".#.....#.", //
            ".#######.", //
            ".........",
        ]);
        let regions = external_components(&mask, w, h);
        assert_eq!(regions.len(), 1, "inner dot must not be its own region");
        // 7x5 ring including its interior
        assert_eq!(regions[0], DiffRegion::new(1, 1, 7, 5, 35));
    }

    #[test]
    fn test_foreground_touching_border() {
        let (mask, w, h) = mask_from(&[
            "##.", //
            "##.", //
            "...",
        ]);
        let regions = external_components(&mask, w, h);
        assert_eq!(regions, vec![DiffRegion::new(0, 0, 2, 2, 4)]);
    }

    #[test]
    fn test_extract_filters_small_regions() {
        // 20x20 = 400 survives, 8x8 = 64 is noise
        let map = map_with_holes(100, 100, &[(10, 10, 20, 20), (70, 70, 8, 8)]);
        let regions = extract_regions(&map);
        assert_eq!(regions, vec![DiffRegion::new(10, 10, 20, 20, 400)]);
    }

    #[test]
    fn test_area_of_exactly_minimum_is_dropped() {
        // 10x10 = 100 is not strictly greater than the minimum
        let map = map_with_holes(50, 50, &[(5, 5, 10, 10)]);
        assert!(extract_regions(&map).is_empty());
    }

    #[test]
    fn test_identical_map_has_no_regions() {
        let map = SimilarityMap::from_values(30, 30, vec![1.0; 900]).unwrap();
        assert!(extract_regions(&map).is_empty());
    }

    #[test]
    fn test_region_contains() {
        let r = DiffRegion::new(10, 10, 5, 5, 25);
        assert!(r.contains(10, 10));
        assert!(r.contains(14, 14));
        assert!(!r.contains(15, 10));
        assert!(!r.contains(9, 12));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        #[test]
        fn prop_no_reported_region_is_noise(
            values in proptest::collection::vec(0.0f64..=1.0, 40 * 30),
        ) {
            let map = SimilarityMap::from_values(40, 30, values).unwrap();
            for region in extract_regions(&map) {
                prop_assert!(region.area > MIN_REGION_AREA);
                prop_assert!(region.x + region.width <= 40);
                prop_assert!(region.y + region.height <= 30);
            }
        }

        #[test]
        fn prop_component_areas_cover_mask(
            bits in proptest::collection::vec(any::<bool>(), 12 * 9),
        ) {
            let regions = external_components(&bits, 12, 9);
            let fg = bits.iter().filter(|&&b| b).count() as u32;
            let area: u32 = regions.iter().map(|r| r.area).sum();
            // Filled interiors can only add to the foreground count
            prop_assert!(area >= fg);
            for r in &regions {
                prop_assert!(r.area <= r.width * r.height);
            }
        }
    }
}
