//! Comparison rendering: the side-by-side artifact a reviewer looks at.
//!
//! ```text
//! ┌────────────┬────────────┬─────────────┐
//! │ BASELINE   │ CURRENT    │ DIFFERENCES │
//! │            │            │   ┌──┐      │
//! │            │            │   └──┘      │
//! └────────────┴────────────┴─────────────┘
//! ```

use crate::bitmap::Bitmap;
use crate::regions::DiffRegion;
use crate::result::{VistaError, VistaResult};
use image::{imageops, Rgb};
use serde::{Deserialize, Serialize};

/// Label color for the baseline panel
pub const BASELINE_LABEL_COLOR: [u8; 3] = [0, 255, 0];
/// Label color for the current panel
pub const CURRENT_LABEL_COLOR: [u8; 3] = [255, 165, 0];
/// Label color for the annotated panel
pub const DIFF_LABEL_COLOR: [u8; 3] = [255, 0, 0];

/// Glyph cell width, including one column of spacing
const GLYPH_ADVANCE: u32 = 6;
const GLYPH_ROWS: usize = 7;

/// Rendering options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Rectangle stroke width in pixels
    pub stroke_width: u32,
    /// Rectangle color (RGB)
    pub box_color: [u8; 3],
    /// Integer scale applied to the 5x7 label font (0 disables labels)
    pub label_scale: u32,
    /// Label offset from the panel's top-left corner
    pub label_offset: (u32, u32),
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            stroke_width: 2,
            box_color: [255, 0, 0],
            label_scale: 4,
            label_offset: (10, 10),
        }
    }
}

impl RenderConfig {
    /// Set stroke width
    #[must_use]
    pub const fn with_stroke_width(mut self, width: u32) -> Self {
        self.stroke_width = width;
        self
    }

    /// Set box color
    #[must_use]
    pub const fn with_box_color(mut self, rgb: [u8; 3]) -> Self {
        self.box_color = rgb;
        self
    }

    /// Set label scale
    #[must_use]
    pub const fn with_label_scale(mut self, scale: u32) -> Self {
        self.label_scale = scale;
        self
    }
}

/// Draws region boxes and composes the review artifact
#[derive(Debug, Clone, Default)]
pub struct ComparisonRenderer {
    config: RenderConfig,
}

impl ComparisonRenderer {
    /// Create a renderer
    #[must_use]
    pub const fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Configuration
    #[must_use]
    pub const fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Copy of `current` with one rectangle outline per region
    #[must_use]
    pub fn annotate(&self, current: &Bitmap, regions: &[DiffRegion]) -> Bitmap {
        let mut annotated = current.clone();
        for region in regions {
            draw_rect_outline(
                &mut annotated,
                region,
                self.config.stroke_width,
                Rgb(self.config.box_color),
            );
        }
        annotated
    }

    /// Compose `[baseline | current | annotated current]` with labels
    ///
    /// # Errors
    ///
    /// Returns [`VistaError::InvalidImage`] if the two inputs differ in size.
    pub fn render(
        &self,
        baseline: &Bitmap,
        current: &Bitmap,
        regions: &[DiffRegion],
    ) -> VistaResult<Bitmap> {
        if baseline.dimensions() != current.dimensions() {
            return Err(VistaError::invalid_image(format!(
                "panels must share dimensions: baseline {:?}, current {:?}",
                baseline.dimensions(),
                current.dimensions()
            )));
        }

        let (width, height) = baseline.dimensions();
        let annotated = self.annotate(current, regions);

        let mut composite = Bitmap::new(width * 3, height);
        let panels = [
            (baseline, "BASELINE", BASELINE_LABEL_COLOR),
            (current, "CURRENT", CURRENT_LABEL_COLOR),
            (&annotated, "DIFFERENCES", DIFF_LABEL_COLOR),
        ];
        for (index, (panel, label, color)) in panels.into_iter().enumerate() {
            let mut labelled = panel.clone();
            if self.config.label_scale > 0 {
                let (x, y) = self.config.label_offset;
                draw_label(&mut labelled, label, x, y, self.config.label_scale, Rgb(color));
            }
            imageops::replace(&mut composite, &labelled, i64::from(width) * index as i64, 0);
        }

        Ok(composite)
    }
}

/// Draw a rectangle outline growing inward from the region's bounds.
fn draw_rect_outline(img: &mut Bitmap, region: &DiffRegion, stroke: u32, color: Rgb<u8>) {
    let (img_w, img_h) = img.dimensions();
    if region.width == 0 || region.height == 0 || stroke == 0 {
        return;
    }

    let x0 = region.x.min(img_w);
    let y0 = region.y.min(img_h);
    let x1 = region.x.saturating_add(region.width).min(img_w);
    let y1 = region.y.saturating_add(region.height).min(img_h);

    for y in y0..y1 {
        for x in x0..x1 {
            let on_edge = x < region.x + stroke
                || y < region.y + stroke
                || x + stroke >= region.x + region.width
                || y + stroke >= region.y + region.height;
            if on_edge {
                img.put_pixel(x, y, color);
            }
        }
    }
}

/// 5x7 bitmask rows for the label alphabet.
fn glyph(c: char) -> [u8; GLYPH_ROWS] {
    match c.to_ascii_uppercase() {
        'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'B' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110],
        'C' => [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
        'D' => [0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110],
        'E' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
        'F' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000],
        'I' => [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'N' => [0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001, 0b10001],
        'R' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
        'S' => [0b01110, 0b10001, 0b10000, 0b01110, 0b00001, 0b10001, 0b01110],
        'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        'U' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        ' ' => [0; GLYPH_ROWS],
        _ => [0b11111, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11111],
    }
}

/// Draw `text` with the built-in font, clipped to the image.
fn draw_label(img: &mut Bitmap, text: &str, x: u32, y: u32, scale: u32, color: Rgb<u8>) {
    let (img_w, img_h) = img.dimensions();
    let mut cursor_x = x;

    for c in text.chars() {
        for (row, &bits) in glyph(c).iter().enumerate() {
            for col in 0..5u32 {
                if (bits >> (4 - col)) & 1 == 0 {
                    continue;
                }
                for dy in 0..scale {
                    for dx in 0..scale {
                        let px = cursor_x + col * scale + dx;
                        let py = y + row as u32 * scale + dy;
                        if px < img_w && py < img_h {
                            img.put_pixel(px, py, color);
                        }
                    }
                }
            }
        }
        cursor_x = cursor_x.saturating_add(GLYPH_ADVANCE * scale);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
    const RED: Rgb<u8> = Rgb([255, 0, 0]);

    fn white(width: u32, height: u32) -> Bitmap {
        Bitmap::from_pixel(width, height, WHITE)
    }

    fn unlabelled() -> ComparisonRenderer {
        ComparisonRenderer::new(RenderConfig::default().with_label_scale(0))
    }

    #[test]
    fn test_annotate_draws_two_pixel_outline() {
        let renderer = ComparisonRenderer::default();
        let region = DiffRegion::new(10, 10, 20, 20, 400);
        let out = renderer.annotate(&white(50, 50), &[region]);

        assert_eq!(*out.get_pixel(10, 10), RED);
        assert_eq!(*out.get_pixel(11, 15), RED);
        assert_eq!(*out.get_pixel(29, 29), RED);
        assert_eq!(*out.get_pixel(28, 20), RED);
        // Inside and outside stay untouched
        assert_eq!(*out.get_pixel(12, 12), WHITE);
        assert_eq!(*out.get_pixel(20, 20), WHITE);
        assert_eq!(*out.get_pixel(9, 9), WHITE);
        assert_eq!(*out.get_pixel(30, 30), WHITE);
    }

    #[test]
    fn test_annotate_leaves_input_untouched() {
        let current = white(20, 20);
        let _ = ComparisonRenderer::default()
            .annotate(&current, &[DiffRegion::new(0, 0, 20, 20, 400)]);
        assert!(current.pixels().all(|p| *p == WHITE));
    }

    #[test]
    fn test_annotate_clips_to_image() {
        let out = ComparisonRenderer::default()
            .annotate(&white(10, 10), &[DiffRegion::new(5, 5, 40, 40, 1600)]);
        assert_eq!(*out.get_pixel(5, 5), RED);
        assert_eq!(*out.get_pixel(9, 9), WHITE);
    }

    #[test]
    fn test_custom_box_color() {
        let renderer =
            ComparisonRenderer::new(RenderConfig::default().with_box_color([0, 0, 255]));
        let out = renderer.annotate(&white(20, 20), &[DiffRegion::new(2, 2, 10, 10, 100)]);
        assert_eq!(*out.get_pixel(2, 2), Rgb([0, 0, 255]));
    }

    #[test]
    fn test_render_lays_out_three_panels() {
        let baseline = Bitmap::from_pixel(30, 20, Rgb([0, 0, 0]));
        let current = white(30, 20);
        let region = DiffRegion::new(5, 5, 10, 10, 100);
        let out = unlabelled().render(&baseline, &current, &[region]).unwrap();

        assert_eq!(out.dimensions(), (90, 20));
        assert_eq!(*out.get_pixel(0, 0), Rgb([0, 0, 0]));
        assert_eq!(*out.get_pixel(35, 5), WHITE);
        assert_eq!(*out.get_pixel(65, 5), RED);
        assert_eq!(*out.get_pixel(70, 10), WHITE);
    }

    #[test]
    fn test_render_draws_labels() {
        let out = ComparisonRenderer::default()
            .render(&white(200, 60), &white(200, 60), &[])
            .unwrap();
        // Top-left of 'B' is lit at the label offset
        assert_eq!(*out.get_pixel(10, 10), Rgb(BASELINE_LABEL_COLOR));
        // 'C' starts with an unlit corner
        assert_eq!(*out.get_pixel(210, 10), WHITE);
        assert_eq!(*out.get_pixel(214, 10), Rgb(CURRENT_LABEL_COLOR));
        assert_eq!(*out.get_pixel(410, 10), Rgb(DIFF_LABEL_COLOR));
    }

    #[test]
    fn test_render_rejects_mismatched_panels() {
        let result = unlabelled().render(&white(10, 10), &white(11, 10), &[]);
        assert!(matches!(result, Err(VistaError::InvalidImage { .. })));
    }

    #[test]
    fn test_labels_clip_on_tiny_images() {
        let out = ComparisonRenderer::default()
            .render(&white(8, 8), &white(8, 8), &[])
            .unwrap();
        assert_eq!(out.dimensions(), (24, 8));
    }
}
