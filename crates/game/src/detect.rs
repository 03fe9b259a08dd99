use image::imageops::FilterType;
use image::{DynamicImage, GrayImage, Luma, RgbImage};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::GameError;
use crate::region::{AnswerRegion, Rect};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DetectorConfig {
    /// Both images are resized to this size before comparing.
    pub width: u32,
    pub height: u32,
    /// Grey-level difference above which a pixel counts as changed.
    pub threshold: u8,
    /// Changed areas whose bounding box is not larger than this are noise.
    pub min_area: u64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            width: 440,
            height: 350,
            threshold: 30,
            min_area: 100,
        }
    }
}

/// Finds where two pictures of the same scene differ.
#[derive(Clone, Debug, Default)]
pub struct DifferenceDetector {
    config: DetectorConfig,
}

impl DifferenceDetector {
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    pub fn normalize(&self, image: &DynamicImage) -> RgbImage {
        image
            .resize_exact(self.config.width, self.config.height, FilterType::Triangle)
            .to_rgb8()
    }

    /// One box around every qualifying difference, or [`Rect::EMPTY`] when there is none.
    pub fn detect(&self, a: &RgbImage, b: &RgbImage) -> Result<AnswerRegion, GameError> {
        let regions = self.detect_all(a, b)?;
        Ok(regions.iter().fold(Rect::EMPTY, |acc, r| acc.union(r)))
    }

    /// Bounding box of each connected changed area that passes the size filter.
    pub fn detect_all(&self, a: &RgbImage, b: &RgbImage) -> Result<Vec<AnswerRegion>, GameError> {
        if a.dimensions() != b.dimensions() {
            return Err(GameError::DimensionMismatch {
                left: a.dimensions(),
                right: b.dimensions(),
            });
        }
        let mask = self.mask(a, b);
        let regions: Vec<AnswerRegion> = connected_boxes(&mask)
            .into_iter()
            .filter(|r| r.area() > self.config.min_area)
            .collect();
        debug!(count = regions.len(), "difference regions");
        Ok(regions)
    }

    /// Binary mask of pixels whose grey-level difference exceeds the threshold.
    fn mask(&self, a: &RgbImage, b: &RgbImage) -> GrayImage {
        let (width, height) = a.dimensions();
        GrayImage::from_fn(width, height, |x, y| {
            let pa = a.get_pixel(x, y);
            let pb = b.get_pixel(x, y);
            let d = |c: usize| (pa[c] as i32 - pb[c] as i32).unsigned_abs();
            let grey = (299 * d(0) + 587 * d(1) + 114 * d(2) + 500) / 1000;
            Luma([if grey > self.config.threshold as u32 { 255 } else { 0 }])
        })
    }
}

/// Bounding boxes of 8-connected foreground blobs.
fn connected_boxes(mask: &GrayImage) -> Vec<Rect> {
    let (width, height) = mask.dimensions();
    let mut seen = vec![false; (width * height) as usize];
    let mut boxes = Vec::new();
    let mut stack = Vec::new();

    for y in 0..height {
        for x in 0..width {
            let idx = (y * width + x) as usize;
            if seen[idx] || mask.get_pixel(x, y)[0] == 0 {
                continue;
            }
            seen[idx] = true;
            stack.push((x, y));
            let mut bounds = Rect::new(x, y, x + 1, y + 1);

            while let Some((cx, cy)) = stack.pop() {
                bounds.x1 = bounds.x1.min(cx);
                bounds.y1 = bounds.y1.min(cy);
                bounds.x2 = bounds.x2.max(cx + 1);
                bounds.y2 = bounds.y2.max(cy + 1);

                for ny in cy.saturating_sub(1)..=(cy + 1).min(height - 1) {
                    for nx in cx.saturating_sub(1)..=(cx + 1).min(width - 1) {
                        let nidx = (ny * width + nx) as usize;
                        if !seen[nidx] && mask.get_pixel(nx, ny)[0] != 0 {
                            seen[nidx] = true;
                            stack.push((nx, ny));
                        }
                    }
                }
            }
            boxes.push(bounds);
        }
    }
    boxes
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn canvas() -> RgbImage {
        RgbImage::from_fn(440, 350, |x, y| Rgb([(x % 200) as u8, (y % 200) as u8, 90]))
    }

    fn paint(image: &mut RgbImage, x: u32, y: u32, w: u32, h: u32) {
        for py in y..y + h {
            for px in x..x + w {
                image.put_pixel(px, py, Rgb([250, 250, 250]));
            }
        }
    }

    #[test]
    fn identical_images_have_no_region() {
        let detector = DifferenceDetector::default();
        let a = canvas();
        assert_eq!(detector.detect(&a, &a.clone()).unwrap(), Rect::EMPTY);
    }

    #[test]
    fn finds_single_block() {
        let detector = DifferenceDetector::default();
        let a = canvas();
        let mut b = a.clone();
        paint(&mut b, 100, 120, 20, 20);
        assert_eq!(detector.detect(&a, &b).unwrap(), Rect::new(100, 120, 120, 140));
    }

    #[test]
    fn small_specks_are_noise() {
        let detector = DifferenceDetector::default();
        let a = canvas();
        let mut b = a.clone();
        paint(&mut b, 10, 10, 5, 5);
        paint(&mut b, 300, 200, 10, 10);
        assert_eq!(detector.detect(&a, &b).unwrap(), Rect::EMPTY);
    }

    #[test]
    fn separate_blocks_are_listed_and_merged() {
        let detector = DifferenceDetector::default();
        let a = canvas();
        let mut b = a.clone();
        paint(&mut b, 20, 30, 15, 15);
        paint(&mut b, 300, 250, 30, 12);
        let all = detector.detect_all(&a, &b).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(detector.detect(&a, &b).unwrap(), Rect::new(20, 30, 330, 262));
    }

    #[test]
    fn rejects_unequal_sizes() {
        let detector = DifferenceDetector::default();
        let result = detector.detect(&RgbImage::new(10, 10), &RgbImage::new(10, 11));
        assert!(matches!(
            result,
            Err(GameError::DimensionMismatch { left: (10, 10), right: (10, 11) })
        ));
    }

    #[test]
    fn normalize_resizes() {
        let detector = DifferenceDetector::default();
        let small = DynamicImage::ImageRgb8(RgbImage::new(64, 48));
        assert_eq!(detector.normalize(&small).dimensions(), (440, 350));
    }
}
