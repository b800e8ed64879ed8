//! Per-game summaries: final score, play count, full play log and the
//! box score derived for each team by filtering the log.

use serde::{Deserialize, Serialize};

use super::play::{PlayResult, PlayType, Score, TeamSide};

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Box score for one team, derived from the plays it ran.
///
/// Rate fields divide by the relevant attempt count; a zero attempt count
/// propagates NaN rather than erroring, per the numeric edge-case policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamBoxScore {
    pub team: String,
    pub score: u32,
    pub run_rate: f64,
    pub pass_rate: f64,
    pub pass_cmp_rate: f64,
    pub pass_yards: f64,
    pub passing_tds: u32,
    pub sacks_allowed: u32,
    pub pass_yards_per_play: f64,
    pub rushing_attempts: u32,
    pub rushing_yards: f64,
    pub rushing_tds: u32,
    pub rush_yards_per_play: f64,
    pub total_turnovers: u32,
    /// None when the team attempted no field goals.
    pub fg_pct: Option<f64>,
}

impl TeamBoxScore {
    /// Derive a box score from the chronological play log of one game.
    ///
    /// Completions are pass plays that gained yards; sacks are pass plays
    /// that lost yards, mirroring how the log encodes them.
    pub fn from_play_log(
        team: String,
        side: TeamSide,
        final_score: u32,
        play_log: &[PlayResult],
    ) -> Self {
        let plays: Vec<&PlayResult> = play_log.iter().filter(|p| p.posteam == side).collect();
        let runs: Vec<&&PlayResult> = plays
            .iter()
            .filter(|p| p.play_type == PlayType::Run)
            .collect();
        let passes: Vec<&&PlayResult> = plays
            .iter()
            .filter(|p| p.play_type == PlayType::Pass)
            .collect();

        let total_plays = plays.len();
        let run_plays = runs.len();
        let pass_plays = passes.len();

        let rush_yards: f64 = runs.iter().map(|p| p.yards_gained).sum();
        let rush_tds = runs.iter().filter(|p| p.touchdown).count() as u32;
        let pass_yards: f64 = passes.iter().map(|p| p.yards_gained).sum();
        let pass_tds = passes.iter().filter(|p| p.touchdown).count() as u32;
        let completions = passes.iter().filter(|p| p.yards_gained > 0.0).count();
        let sacks = passes.iter().filter(|p| p.yards_gained < 0.0).count() as u32;
        let turnovers = plays.iter().filter(|p| p.turnover).count() as u32;

        let fg_attempts = plays
            .iter()
            .filter(|p| p.play_type == PlayType::FieldGoal)
            .count();
        let fg_makes = plays
            .iter()
            .filter(|p| p.field_goal_made == Some(true))
            .count();
        let fg_pct = if fg_attempts > 0 {
            Some(round2(100.0 * fg_makes as f64 / fg_attempts as f64))
        } else {
            None
        };

        Self {
            team,
            score: final_score,
            run_rate: round2(run_plays as f64 / total_plays as f64),
            pass_rate: round2(pass_plays as f64 / total_plays as f64),
            pass_cmp_rate: round2(completions as f64 / pass_plays as f64),
            pass_yards,
            passing_tds: pass_tds,
            sacks_allowed: sacks,
            pass_yards_per_play: round2(pass_yards / pass_plays as f64),
            rushing_attempts: run_plays as u32,
            rushing_yards: rush_yards,
            rushing_tds: rush_tds,
            rush_yards_per_play: round2(rush_yards / run_plays as f64),
            total_turnovers: turnovers,
            fg_pct,
        }
    }
}

/// Everything extracted from one completed game before its state is dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSummary {
    pub final_score: Score,
    pub num_plays_in_game: usize,
    pub home: TeamBoxScore,
    pub away: TeamBoxScore,
    pub play_log: Vec<PlayResult>,
}

impl GameSummary {
    pub fn winner(&self) -> Option<TeamSide> {
        if self.final_score.home > self.final_score.away {
            Some(TeamSide::Home)
        } else if self.final_score.away > self.final_score.home {
            Some(TeamSide::Away)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(play_type: PlayType, yards: f64, side: TeamSide) -> PlayResult {
        PlayResult::of_play(play_type, yards, 25, false, None, 1, 900, side)
    }

    fn fg(made: bool, side: TeamSide) -> PlayResult {
        PlayResult::of_play(PlayType::FieldGoal, 0.0, 25, false, Some(made), 1, 900, side)
    }

    #[test]
    fn test_box_score_counts_and_rates() {
        let mut log = vec![
            play(PlayType::Run, 5.0, TeamSide::Home),
            play(PlayType::Run, 3.0, TeamSide::Home),
            play(PlayType::Pass, 12.0, TeamSide::Home),
            play(PlayType::Pass, 0.0, TeamSide::Home),
            play(PlayType::Pass, -6.0, TeamSide::Home),
            play(PlayType::Run, 40.0, TeamSide::Away),
        ];
        log[2].touchdown = true;
        log[3].turnover = true;

        let box_score =
            TeamBoxScore::from_play_log("HOME".into(), TeamSide::Home, 10, &log);
        assert_eq!(box_score.rushing_attempts, 2);
        assert_eq!(box_score.rushing_yards, 8.0);
        assert_eq!(box_score.pass_yards, 6.0);
        assert_eq!(box_score.passing_tds, 1);
        assert_eq!(box_score.sacks_allowed, 1);
        assert_eq!(box_score.total_turnovers, 1);
        assert_eq!(box_score.run_rate, 0.4);
        assert_eq!(box_score.pass_rate, 0.6);
        // 1 completion out of 3 pass plays; the zero-yard incompletion and
        // the sack do not count as completions.
        assert_eq!(box_score.pass_cmp_rate, 0.33);
        assert_eq!(box_score.fg_pct, None);
    }

    #[test]
    fn test_box_score_field_goal_percentage() {
        let log = vec![
            fg(true, TeamSide::Home),
            fg(false, TeamSide::Home),
            fg(true, TeamSide::Home),
            play(PlayType::Run, 2.0, TeamSide::Home),
        ];
        let box_score = TeamBoxScore::from_play_log("HOME".into(), TeamSide::Home, 9, &log);
        assert_eq!(box_score.fg_pct, Some(66.67));
    }

    #[test]
    fn test_box_score_zero_passes_propagates_nan() {
        let log = vec![play(PlayType::Run, 2.0, TeamSide::Home)];
        let box_score = TeamBoxScore::from_play_log("HOME".into(), TeamSide::Home, 0, &log);
        assert!(box_score.pass_cmp_rate.is_nan());
        assert!(box_score.pass_yards_per_play.is_nan());
        assert_eq!(box_score.run_rate, 1.0);
    }

    #[test]
    fn test_winner_resolution() {
        let log = vec![play(PlayType::Run, 2.0, TeamSide::Home)];
        let summary = GameSummary {
            final_score: Score { home: 21, away: 17 },
            num_plays_in_game: 1,
            home: TeamBoxScore::from_play_log("H".into(), TeamSide::Home, 21, &log),
            away: TeamBoxScore::from_play_log("A".into(), TeamSide::Away, 17, &log),
            play_log: log,
        };
        assert_eq!(summary.winner(), Some(TeamSide::Home));
    }
}
