//! Per-play records and the home/away bookkeeping types shared by the
//! engine, the play models and the batch aggregation layer.

use serde::{Deserialize, Serialize};

/// Which bench a team occupies for the simulated matchup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamSide {
    Home,
    Away,
}

impl TeamSide {
    pub fn opponent(self) -> TeamSide {
        match self {
            TeamSide::Home => TeamSide::Away,
            TeamSide::Away => TeamSide::Home,
        }
    }
}

/// Outcome category of a resolved play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayType {
    Run,
    Pass,
    Punt,
    FieldGoal,
}

/// Accumulated points per side. Scores only ever increase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub home: u32,
    pub away: u32,
}

impl Score {
    pub fn get(&self, side: TeamSide) -> u32 {
        match side {
            TeamSide::Home => self.home,
            TeamSide::Away => self.away,
        }
    }

    pub fn add(&mut self, side: TeamSide, points: u32) {
        match side {
            TeamSide::Home => self.home += points,
            TeamSide::Away => self.away += points,
        }
    }

    /// Points for `side` minus points for the opponent.
    pub fn differential(&self, side: TeamSide) -> i32 {
        self.get(side) as i32 - self.get(side.opponent()) as i32
    }
}

/// One resolved play. Created by a play model, then enriched by the game
/// engine with pre-play state snapshots before it lands in the play log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayResult {
    pub play_type: PlayType,
    pub yards_gained: f64,
    /// Wall-clock seconds consumed by the play.
    pub time_elapsed: u32,
    pub turnover: bool,
    /// Set by the game engine once the yardline boundary is evaluated.
    pub touchdown: bool,
    /// `Some` only for field-goal plays.
    pub field_goal_made: Option<bool>,
    pub posteam: TeamSide,

    // Pre-play snapshots, stamped by the play model / game engine.
    pub quarter: u8,
    pub quarter_seconds_remaining: i32,
    pub game_seconds_remaining: i32,
    pub yardline: f64,
    pub down: u8,
    pub distance: f64,
    pub posteam_score: u32,
}

impl PlayResult {
    /// A play record carrying only the model-side fields; the engine stamps
    /// the remaining snapshots via [`PlayResult::stamp_pre_play`].
    pub fn of_play(
        play_type: PlayType,
        yards_gained: f64,
        time_elapsed: u32,
        turnover: bool,
        field_goal_made: Option<bool>,
        quarter: u8,
        quarter_seconds_remaining: i32,
        posteam: TeamSide,
    ) -> Self {
        Self {
            play_type,
            yards_gained,
            time_elapsed,
            turnover,
            touchdown: false,
            field_goal_made,
            posteam,
            quarter,
            quarter_seconds_remaining,
            game_seconds_remaining: 0,
            yardline: 0.0,
            down: 0,
            distance: 0.0,
            posteam_score: 0,
        }
    }

    pub fn stamp_pre_play(
        &mut self,
        game_seconds_remaining: i32,
        yardline: f64,
        down: u8,
        distance: f64,
        posteam_score: u32,
    ) {
        self.game_seconds_remaining = game_seconds_remaining;
        self.yardline = yardline;
        self.down = down;
        self.distance = distance;
        self.posteam_score = posteam_score;
    }

    /// Seconds of game time already played when this play was snapped.
    pub fn game_time_elapsed(&self) -> i32 {
        3600 - self.game_seconds_remaining
    }
}
