use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::cursor::{CursorBox, CursorConfig, Direction};
use crate::detect::DetectorConfig;
use crate::error::GameError;
use crate::progress::{LyricProgress, DEFAULT_BATCH};
use crate::region::AnswerRegion;
use crate::stage::{Stage, StageProvider};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct GameConfig {
    pub detector: DetectorConfig,
    pub cursor: CursorConfig,
    /// Lyric lines unlocked per correct answer.
    pub lyric_batch: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            detector: DetectorConfig::default(),
            cursor: CursorConfig::default(),
            lyric_batch: DEFAULT_BATCH,
        }
    }
}

impl GameConfig {
    /// Replaces values that would leave a game unwinnable with defaults. The selection box
    /// is shrunk to fit the picture.
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let mut config = self;
        if config.detector.width == 0 || config.detector.height == 0 {
            warn!(
                width = config.detector.width,
                height = config.detector.height,
                "picture size must be non-zero, using the default"
            );
            config.detector.width = defaults.detector.width;
            config.detector.height = defaults.detector.height;
        }
        let largest_box = config.detector.width.min(config.detector.height);
        if config.cursor.box_size == 0 {
            warn!("selection box size must be non-zero, using the default");
            config.cursor.box_size = defaults.cursor.box_size.min(largest_box);
        } else if config.cursor.box_size > largest_box {
            warn!(
                box_size = config.cursor.box_size,
                largest_box,
                "selection box larger than the picture"
            );
            config.cursor.box_size = largest_box;
        }
        if config.cursor.step == 0 {
            warn!("cursor step must be non-zero, using the default");
            config.cursor.step = defaults.cursor.step;
        }
        if config.lyric_batch == 0 {
            warn!("lyric batch must be non-zero, using the default");
            config.lyric_batch = defaults.lyric_batch;
        }
        config
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum GamePhase {
    /// Waiting for the track to be picked; input is ignored.
    Idle,
    Active,
    /// Every lyric line is unlocked.
    Complete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// The game is not accepting input.
    Ignored,
    Incorrect,
    Correct {
        revealed: Vec<String>,
        score: (usize, usize),
        /// Number of the stage now showing.
        next_stage: Option<u32>,
    },
    SessionComplete {
        revealed: Vec<String>,
        score: (usize, usize),
    },
    /// The answer counted but no further stage could be loaded; the game ends early.
    OutOfStages {
        revealed: Vec<String>,
        score: (usize, usize),
    },
}

/// Cursor, answer checking and stage progression for one lyric sheet.
pub struct GameSession<S> {
    stages: S,
    stage_index: usize,
    stage: Option<Stage>,
    found: Vec<AnswerRegion>,
    cursor: CursorBox,
    config: GameConfig,
    progress: LyricProgress,
    phase: GamePhase,
}

impl<S: StageProvider> GameSession<S> {
    /// Loads the first playable stage right away; the session starts idle.
    pub fn new(stages: S, lyrics: Vec<String>, config: GameConfig) -> Self {
        let config = config.sanitized();
        let mut session = Self {
            stages,
            stage_index: 0,
            stage: None,
            found: Vec::new(),
            cursor: CursorBox::new(config.cursor.box_size),
            config,
            progress: LyricProgress::new(lyrics),
            phase: GamePhase::Idle,
        };
        if let Err(err) = session.load_from(0) {
            warn!(%err, "game has no stage to show");
        }
        session
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn stage(&self) -> Option<&Stage> {
        self.stage.as_ref()
    }

    pub fn found(&self) -> &[AnswerRegion] {
        &self.found
    }

    pub fn cursor(&self) -> &CursorBox {
        &self.cursor
    }

    pub fn progress(&self) -> &LyricProgress {
        &self.progress
    }

    pub fn score(&self) -> (usize, usize) {
        self.progress.score_fraction()
    }

    /// Begins accepting input. Returns false when already started or finished.
    pub fn start(&mut self) -> bool {
        if self.phase != GamePhase::Idle {
            return false;
        }
        self.phase = GamePhase::Active;
        info!(stage = ?self.stage.as_ref().map(|s| s.number), "game started");
        true
    }

    pub fn move_cursor(&mut self, direction: Direction) {
        if self.phase != GamePhase::Active {
            return;
        }
        if let Some(bounds) = self.bounds() {
            self.cursor.step(direction, self.config.cursor.step, bounds);
        }
    }

    pub fn move_by(&mut self, dx: i64, dy: i64) {
        if self.phase != GamePhase::Active {
            return;
        }
        if let Some(bounds) = self.bounds() {
            self.cursor.move_by(dx, dy, bounds);
        }
    }

    /// Tests the cursor against this stage's unfound answers.
    pub fn check_selection(&mut self) -> SelectionOutcome {
        if self.phase != GamePhase::Active {
            return SelectionOutcome::Ignored;
        }
        let cursor = self.cursor.rect();
        let hit = self.stage.as_ref().and_then(|stage| {
            stage
                .answers
                .iter()
                .find(|answer| !self.found.contains(answer) && cursor.overlaps(answer))
                .copied()
        });
        let Some(answer) = hit else {
            return SelectionOutcome::Incorrect;
        };

        self.found.push(answer);
        let revealed = self.progress.advance(self.config.lyric_batch).lines.to_vec();
        let score = self.progress.score_fraction();

        if self.progress.is_complete() {
            self.phase = GamePhase::Complete;
            info!(?score, "all lyrics unlocked");
            return SelectionOutcome::SessionComplete { revealed, score };
        }

        let next = (self.stage_index + 1) % self.stages.count().max(1);
        if let Err(err) = self.load_from(next) {
            warn!(%err, "could not advance to another stage, ending the game");
            self.stage = None;
            self.phase = GamePhase::Complete;
            return SelectionOutcome::OutOfStages { revealed, score };
        }
        SelectionOutcome::Correct {
            revealed,
            score,
            next_stage: self.stage.as_ref().map(|s| s.number),
        }
    }

    /// Unlocks every lyric line and ends the game.
    pub fn unlock_all(&mut self) -> Vec<String> {
        let revealed = self.progress.reveal_all().lines.to_vec();
        self.phase = GamePhase::Complete;
        revealed
    }

    fn bounds(&self) -> Option<(u32, u32)> {
        self.stage.as_ref().map(Stage::bounds)
    }

    /// Loads the first stage that works, starting at `index` and wrapping around.
    /// Broken stages are skipped.
    fn load_from(&mut self, index: usize) -> Result<(), GameError> {
        let count = self.stages.count();
        for offset in 0..count {
            let candidate = (index + offset) % count;
            match self.stages.load(candidate) {
                Ok(stage) => {
                    self.stage_index = candidate;
                    self.stage = Some(stage);
                    self.found.clear();
                    self.cursor = CursorBox::new(self.config.cursor.box_size);
                    return Ok(());
                }
                Err(err) => warn!(candidate, %err, "skipping stage"),
            }
        }
        Err(GameError::NoStages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::DifferenceDetector;
    use crate::region::Rect;
    use crate::stage::ImagePair;
    use image::{Rgb, RgbImage};

    fn stage(number: u32, x: u32, y: u32) -> Stage {
        let original = RgbImage::from_pixel(440, 350, Rgb([10, 10, 10]));
        let mut modified = original.clone();
        for py in y..y + 20 {
            for px in x..x + 20 {
                modified.put_pixel(px, py, Rgb([220, 220, 220]));
            }
        }
        let pair = ImagePair::new(original, modified).unwrap();
        Stage::from_pair(number, pair, &DifferenceDetector::default()).unwrap()
    }

    fn lyrics(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("line {i}")).collect()
    }

    struct FlakyStages {
        good: Vec<Stage>,
    }

    impl StageProvider for FlakyStages {
        fn count(&self) -> usize {
            self.good.len() + 1
        }

        fn load(&mut self, index: usize) -> Result<Stage, GameError> {
            if index == 1 {
                return Err(GameError::NoDifference(99));
            }
            let slot = if index == 0 { 0 } else { index - 1 };
            self.good.load(slot)
        }
    }

    #[test]
    fn idle_session_ignores_input() {
        let mut session = GameSession::new(vec![stage(1, 0, 0)], lyrics(4), GameConfig::default());
        session.move_cursor(Direction::Right);
        assert_eq!(session.cursor().rect(), Rect::new(0, 0, 50, 50));
        assert_eq!(session.check_selection(), SelectionOutcome::Ignored);
        assert!(session.start());
        assert!(!session.start());
    }

    #[test]
    fn miss_changes_nothing() {
        let mut session =
            GameSession::new(vec![stage(1, 300, 250)], lyrics(4), GameConfig::default());
        session.start();
        assert_eq!(session.check_selection(), SelectionOutcome::Incorrect);
        assert_eq!(session.progress().revealed_count(), 0);
        assert!(session.found().is_empty());
    }

    #[test]
    fn one_pixel_overlap_scores_and_advances() {
        let stages = vec![stage(1, 100, 100), stage(2, 300, 250)];
        let mut session = GameSession::new(stages, lyrics(4), GameConfig::default());
        session.start();
        session.move_by(51, 51);
        assert_eq!(session.cursor().rect(), Rect::new(51, 51, 101, 101));

        let outcome = session.check_selection();
        assert_eq!(
            outcome,
            SelectionOutcome::Correct {
                revealed: vec!["line 1".into(), "line 2".into()],
                score: (1, 2),
                next_stage: Some(2),
            }
        );
        assert!(session.found().is_empty());
        assert_eq!(session.cursor().rect(), Rect::new(0, 0, 50, 50));
    }

    #[test]
    fn last_lines_complete_session() {
        let stages = vec![stage(1, 10, 10), stage(2, 20, 20)];
        let mut session = GameSession::new(stages, lyrics(3), GameConfig::default());
        session.start();
        assert!(matches!(
            session.check_selection(),
            SelectionOutcome::Correct { next_stage: Some(2), .. }
        ));
        assert_eq!(
            session.check_selection(),
            SelectionOutcome::SessionComplete {
                revealed: vec!["line 3".into()],
                score: (1, 1),
            }
        );
        assert_eq!(session.phase(), GamePhase::Complete);
        assert_eq!(session.stage().map(|s| s.number), Some(2));
        assert_eq!(session.check_selection(), SelectionOutcome::Ignored);
    }

    #[test]
    fn stages_wrap_around() {
        let mut session =
            GameSession::new(vec![stage(7, 10, 10)], lyrics(6), GameConfig::default());
        session.start();
        for _ in 0..2 {
            assert!(matches!(
                session.check_selection(),
                SelectionOutcome::Correct { next_stage: Some(7), .. }
            ));
        }
    }

    #[test]
    fn broken_stage_is_skipped() {
        let stages = FlakyStages {
            good: vec![stage(1, 10, 10), stage(3, 10, 10)],
        };
        let mut session = GameSession::new(stages, lyrics(6), GameConfig::default());
        session.start();
        assert!(matches!(
            session.check_selection(),
            SelectionOutcome::Correct { next_stage: Some(3), .. }
        ));
    }

    #[test]
    fn no_stages_means_every_guess_misses() {
        let mut session = GameSession::new(Vec::<Stage>::new(), lyrics(2), GameConfig::default());
        assert!(session.stage().is_none());
        session.start();
        session.move_cursor(Direction::Down);
        assert_eq!(session.check_selection(), SelectionOutcome::Incorrect);
    }

    struct OneShotStages {
        stage: Option<Stage>,
    }

    impl StageProvider for OneShotStages {
        fn count(&self) -> usize {
            1
        }

        fn load(&mut self, _index: usize) -> Result<Stage, GameError> {
            self.stage.take().ok_or(GameError::NoStages)
        }
    }

    #[test]
    fn game_ends_when_no_stage_can_follow() {
        let stages = OneShotStages {
            stage: Some(stage(1, 10, 10)),
        };
        let mut session = GameSession::new(stages, lyrics(6), GameConfig::default());
        session.start();
        assert_eq!(
            session.check_selection(),
            SelectionOutcome::OutOfStages {
                revealed: vec!["line 1".into(), "line 2".into()],
                score: (1, 3),
            }
        );
        assert_eq!(session.phase(), GamePhase::Complete);
        assert!(session.stage().is_none());
        assert_eq!(session.check_selection(), SelectionOutcome::Ignored);
    }

    #[test]
    fn sanitized_config_replaces_unplayable_values() {
        let mut config = GameConfig::default();
        config.lyric_batch = 0;
        config.cursor.box_size = 0;
        config.cursor.step = 0;
        config.detector.width = 0;
        let config = config.sanitized();
        assert_eq!(config, GameConfig::default());

        let mut config = GameConfig::default();
        config.cursor.box_size = 1_000;
        assert_eq!(config.sanitized().cursor.box_size, 350);
    }

    #[test]
    fn zero_batch_still_reaches_the_end() {
        let config = GameConfig {
            lyric_batch: 0,
            cursor: CursorConfig {
                box_size: 0,
                step: 10,
            },
            ..GameConfig::default()
        };
        let mut session = GameSession::new(vec![stage(1, 10, 10)], lyrics(2), config);
        session.start();
        assert_eq!(session.cursor().rect(), Rect::new(0, 0, 50, 50));
        assert_eq!(
            session.check_selection(),
            SelectionOutcome::SessionComplete {
                revealed: vec!["line 1".into(), "line 2".into()],
                score: (1, 1),
            }
        );
    }

    #[test]
    fn unlock_all_ends_game() {
        let mut session = GameSession::new(vec![stage(1, 0, 0)], lyrics(5), GameConfig::default());
        session.start();
        assert_eq!(session.unlock_all().len(), 5);
        assert_eq!(session.phase(), GamePhase::Complete);
        assert_eq!(session.score(), (2, 2));
    }
}
