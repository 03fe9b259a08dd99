use image::RgbImage;
use tracing::{info, instrument};

use musiquest_library::ImagePairPaths;

use crate::detect::{DetectorConfig, DifferenceDetector};
use crate::error::GameError;
use crate::region::AnswerRegion;

/// An original picture and its altered copy, already the same size.
#[derive(Debug, Clone)]
pub struct ImagePair {
    original: RgbImage,
    modified: RgbImage,
}

impl ImagePair {
    pub fn new(original: RgbImage, modified: RgbImage) -> Result<Self, GameError> {
        if original.dimensions() != modified.dimensions() {
            return Err(GameError::DimensionMismatch {
                left: original.dimensions(),
                right: modified.dimensions(),
            });
        }
        Ok(Self { original, modified })
    }

    pub fn original(&self) -> &RgbImage {
        &self.original
    }

    pub fn modified(&self) -> &RgbImage {
        &self.modified
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.original.dimensions()
    }
}

/// One round of the game: a picture pair and the region that scores it.
#[derive(Debug, Clone)]
pub struct Stage {
    pub number: u32,
    pub pair: ImagePair,
    pub answers: Vec<AnswerRegion>,
}

impl Stage {
    /// Runs the detector once over the pair. A pair with no detectable difference cannot
    /// be won and is rejected.
    pub fn from_pair(
        number: u32,
        pair: ImagePair,
        detector: &DifferenceDetector,
    ) -> Result<Self, GameError> {
        let answer = detector.detect(pair.original(), pair.modified())?;
        if answer.is_empty() {
            return Err(GameError::NoDifference(number));
        }
        Ok(Self {
            number,
            pair,
            answers: vec![answer],
        })
    }

    pub fn bounds(&self) -> (u32, u32) {
        self.pair.dimensions()
    }
}

/// Source of stages, loaded one at a time as the game advances.
pub trait StageProvider {
    fn count(&self) -> usize;
    fn load(&mut self, index: usize) -> Result<Stage, GameError>;
}

impl StageProvider for Vec<Stage> {
    fn count(&self) -> usize {
        self.len()
    }

    fn load(&mut self, index: usize) -> Result<Stage, GameError> {
        self.get(index).cloned().ok_or(GameError::NoStages)
    }
}

/// Stages read from image files on demand.
pub struct FileStages {
    pairs: Vec<ImagePairPaths>,
    detector: DifferenceDetector,
}

impl FileStages {
    pub fn new(pairs: Vec<ImagePairPaths>, config: DetectorConfig) -> Self {
        Self {
            pairs,
            detector: DifferenceDetector::new(config),
        }
    }
}

impl StageProvider for FileStages {
    fn count(&self) -> usize {
        self.pairs.len()
    }

    #[instrument(skip(self))]
    fn load(&mut self, index: usize) -> Result<Stage, GameError> {
        let paths = self.pairs.get(index).ok_or(GameError::NoStages)?;
        let original = self.detector.normalize(&image::open(&paths.original)?);
        let modified = self.detector.normalize(&image::open(&paths.modified)?);
        let stage = Stage::from_pair(
            paths.number,
            ImagePair::new(original, modified)?,
            &self.detector,
        )?;
        info!(number = stage.number, answer = ?stage.answers[0], "stage loaded");
        Ok(stage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::Rect;
    use image::Rgb;

    fn pair_with_block() -> ImagePair {
        let original = RgbImage::from_pixel(440, 350, Rgb([20, 40, 60]));
        let mut modified = original.clone();
        for y in 200..230 {
            for x in 300..330 {
                modified.put_pixel(x, y, Rgb([200, 40, 60]));
            }
        }
        ImagePair::new(original, modified).unwrap()
    }

    #[test]
    fn stage_records_answer() {
        let stage = Stage::from_pair(1, pair_with_block(), &DifferenceDetector::default()).unwrap();
        assert_eq!(stage.answers, vec![Rect::new(300, 200, 330, 230)]);
        assert_eq!(stage.bounds(), (440, 350));
    }

    #[test]
    fn stage_without_difference_is_rejected() {
        let plain = RgbImage::from_pixel(440, 350, Rgb([1, 2, 3]));
        let pair = ImagePair::new(plain.clone(), plain).unwrap();
        let result = Stage::from_pair(4, pair, &DifferenceDetector::default());
        assert!(matches!(result, Err(GameError::NoDifference(4))));
    }

    #[test]
    fn pair_requires_equal_sizes() {
        let result = ImagePair::new(RgbImage::new(4, 4), RgbImage::new(5, 4));
        assert!(matches!(result, Err(GameError::DimensionMismatch { .. })));
    }

    #[test]
    fn file_stages_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let pair = pair_with_block();
        let original = dir.path().join("1.png");
        let modified = dir.path().join("1-edit.png");
        pair.original().save(&original).unwrap();
        pair.modified().save(&modified).unwrap();

        let mut stages = FileStages::new(
            vec![ImagePairPaths {
                number: 1,
                original,
                modified,
            }],
            DetectorConfig::default(),
        );
        assert_eq!(stages.count(), 1);
        let stage = stages.load(0).unwrap();
        assert_eq!(stage.answers, vec![Rect::new(300, 200, 330, 230)]);
    }

    #[test]
    fn file_stages_report_missing_images() {
        let mut stages = FileStages::new(
            vec![ImagePairPaths {
                number: 9,
                original: "/missing/9.png".into(),
                modified: "/missing/9-edit.png".into(),
            }],
            DetectorConfig::default(),
        );
        assert!(matches!(stages.load(0), Err(GameError::Image(_))));
    }
}
