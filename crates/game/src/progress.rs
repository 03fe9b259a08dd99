use serde::{Deserialize, Serialize};

/// Lyric lines are unlocked this many at a time.
pub const DEFAULT_BATCH: usize = 2;

/// Lines unlocked by a single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealedSlice<'a> {
    pub start: usize,
    pub lines: &'a [String],
}

/// Everything unlocked so far, split so the latest batch can be highlighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealedLines<'a> {
    pub earlier: &'a [String],
    pub latest: &'a [String],
}

/// Progressive reveal of a fixed lyric sheet. The revealed count only grows.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LyricProgress {
    lines: Vec<String>,
    revealed: usize,
}

impl LyricProgress {
    pub fn new(lines: Vec<String>) -> Self {
        Self {
            lines,
            revealed: 0,
        }
    }

    pub fn total_lines(&self) -> usize {
        self.lines.len()
    }

    pub fn revealed_count(&self) -> usize {
        self.revealed
    }

    pub fn is_complete(&self) -> bool {
        self.revealed >= self.lines.len()
    }

    /// Unlocks up to `batch` more lines, stopping at the end of the sheet.
    pub fn advance(&mut self, batch: usize) -> RevealedSlice<'_> {
        let start = self.revealed;
        let end = (start + batch).min(self.lines.len());
        self.revealed = end;
        RevealedSlice {
            start,
            lines: &self.lines[start..end],
        }
    }

    /// Unlocks the whole sheet at once.
    pub fn reveal_all(&mut self) -> RevealedSlice<'_> {
        let remaining = self.lines.len() - self.revealed;
        self.advance(remaining)
    }

    pub fn revealed(&self) -> RevealedLines<'_> {
        let shown = &self.lines[..self.revealed];
        let split = shown.len().saturating_sub(DEFAULT_BATCH);
        RevealedLines {
            earlier: &shown[..split],
            latest: &shown[split..],
        }
    }

    /// `(points, out_of)`: one point per two lines, and never zero possible points.
    pub fn score_fraction(&self) -> (usize, usize) {
        (self.revealed / 2, (self.lines.len() / 2).max(1))
    }
}
