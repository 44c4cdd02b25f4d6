//! Score and high-score tracking

use serde::{Deserialize, Serialize};

use crate::consts::BONUS_BOMB_EVERY;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreBoard {
    pub score: u64,
    pub high_score: u64,
}

impl ScoreBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add points, raising the high score as needed
    ///
    /// Returns true when the score crossed a bonus-bomb boundary.
    pub fn award(&mut self, points: u64) -> bool {
        if points == 0 {
            return false;
        }
        let before = self.score;
        self.score += points;
        self.high_score = self.high_score.max(self.score);
        self.score / BONUS_BOMB_EVERY > before / BONUS_BOMB_EVERY
    }

    /// Start a new game; the high score survives
    pub fn reset(&mut self) {
        self.score = 0;
    }
}

/// Read-only HUD view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSnapshot {
    pub score: u64,
    pub high_score: u64,
    pub lives: u32,
    pub bombs: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_award_tracks_high_score() {
        let mut board = ScoreBoard::new();
        board.award(100);
        board.award(10);
        assert_eq!(board.score, 110);
        assert_eq!(board.high_score, 110);

        board.reset();
        assert_eq!(board.score, 0);
        assert_eq!(board.high_score, 110);

        board.award(100);
        assert_eq!(board.high_score, 110);
    }

    #[test]
    fn test_bonus_boundary() {
        let mut board = ScoreBoard::new();
        for _ in 0..9 {
            assert!(!board.award(100));
        }
        assert!(board.award(100));
        assert!(!board.award(100));
        assert!(!board.award(0));
    }
}
