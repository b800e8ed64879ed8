//! Mutable state of one simulated game, owned exclusively by its engine.

use serde::{Deserialize, Serialize};

use crate::models::{PlayResult, Score, TeamSide};

/// Everything that changes between plays. Created fresh per simulated game
/// and discarded after summary extraction.
///
/// `yardline` is the distance to the opponent's goal line. It may leave
/// [0, 100] transiently during resolution (<= 0 is a touchdown, > 100 a
/// safety) before the engine normalizes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub quarter: u8,
    pub game_seconds_remaining: i32,
    pub quarter_seconds_remaining: i32,
    pub possession: TeamSide,
    pub yardline: f64,
    pub down: u8,
    pub distance: f64,
    pub score: Score,
    pub play_log: Vec<PlayResult>,
}

impl GameState {
    /// Opening kickoff state: home ball at its own 25 (yardline 75),
    /// first-and-ten, full clock.
    pub fn kickoff() -> Self {
        Self {
            quarter: 1,
            game_seconds_remaining: 3600,
            quarter_seconds_remaining: 900,
            possession: TeamSide::Home,
            yardline: 75.0,
            down: 1,
            distance: 10.0,
            score: Score::default(),
            play_log: Vec::new(),
        }
    }

    pub fn defense(&self) -> TeamSide {
        self.possession.opponent()
    }

    pub(crate) fn switch_possession(&mut self) {
        self.possession = self.possession.opponent();
    }

    pub(crate) fn reset_drive(&mut self, yardline: f64) {
        self.yardline = yardline;
        self.down = 1;
        self.distance = 10.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kickoff_state() {
        let state = GameState::kickoff();
        assert_eq!(state.quarter, 1);
        assert_eq!(state.game_seconds_remaining, 3600);
        assert_eq!(state.quarter_seconds_remaining, 900);
        assert_eq!(state.possession, TeamSide::Home);
        assert_eq!(state.yardline, 75.0);
        assert_eq!(state.down, 1);
        assert_eq!(state.distance, 10.0);
        assert_eq!(state.score, Score::default());
        assert!(state.play_log.is_empty());
    }

    #[test]
    fn test_switch_and_reset() {
        let mut state = GameState::kickoff();
        state.down = 3;
        state.distance = 2.0;
        state.switch_possession();
        state.reset_drive(60.0);
        assert_eq!(state.possession, TeamSide::Away);
        assert_eq!(state.defense(), TeamSide::Home);
        assert_eq!((state.yardline, state.down, state.distance), (60.0, 1, 10.0));
    }
}
