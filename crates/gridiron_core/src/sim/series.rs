//! Time-series extraction from a single game's play log, used to chart the
//! featured game of a batch.

use serde::{Deserialize, Serialize};

use crate::models::{GameSummary, PlayResult, PlayType, TeamSide};

/// Cumulative yardage at a point in elapsed game time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YardagePoint {
    pub game_time_elapsed: i32,
    pub cumulative_yards: f64,
}

/// Possession-team score at a point in elapsed game time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringPoint {
    pub game_time_elapsed: i32,
    pub posteam_score: u32,
}

fn cumulative_series(
    side: TeamSide,
    play_type: PlayType,
    play_log: &[PlayResult],
) -> Vec<YardagePoint> {
    let mut total = 0.0;
    play_log
        .iter()
        .filter(|p| p.posteam == side && p.play_type == play_type)
        .map(|p| {
            total += p.yards_gained;
            YardagePoint {
                game_time_elapsed: p.game_time_elapsed(),
                cumulative_yards: total,
            }
        })
        .collect()
}

/// Cumulative passing yards over elapsed game time for one side.
pub fn passing_series(side: TeamSide, play_log: &[PlayResult]) -> Vec<YardagePoint> {
    cumulative_series(side, PlayType::Pass, play_log)
}

/// Cumulative rushing yards over elapsed game time for one side.
pub fn rushing_series(side: TeamSide, play_log: &[PlayResult]) -> Vec<YardagePoint> {
    cumulative_series(side, PlayType::Run, play_log)
}

/// Pre-play possession-team score over elapsed game time for one side.
pub fn scoring_series(side: TeamSide, play_log: &[PlayResult]) -> Vec<ScoringPoint> {
    play_log
        .iter()
        .filter(|p| p.posteam == side)
        .map(|p| ScoringPoint {
            game_time_elapsed: p.game_time_elapsed(),
            posteam_score: p.posteam_score,
        })
        .collect()
}

/// The one game of a batch retained in full for detailed reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeaturedGame {
    pub index: usize,
    pub home_passing: Vec<YardagePoint>,
    pub away_passing: Vec<YardagePoint>,
    pub home_rushing: Vec<YardagePoint>,
    pub away_rushing: Vec<YardagePoint>,
    pub home_scoring: Vec<ScoringPoint>,
    pub away_scoring: Vec<ScoringPoint>,
    pub play_log: Vec<PlayResult>,
}

impl FeaturedGame {
    pub fn from_summary(index: usize, summary: &GameSummary) -> Self {
        let log = &summary.play_log;
        Self {
            index,
            home_passing: passing_series(TeamSide::Home, log),
            away_passing: passing_series(TeamSide::Away, log),
            home_rushing: rushing_series(TeamSide::Home, log),
            away_rushing: rushing_series(TeamSide::Away, log),
            home_scoring: scoring_series(TeamSide::Home, log),
            away_scoring: scoring_series(TeamSide::Away, log),
            play_log: log.clone(),
        }
    }
}
