//! Drives one game: delegates each snap to the play model, applies the
//! outcome to the owned [`GameState`], and extracts the summary at the end.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::error::Result;
use crate::model::{GameModel, PlayContext};
use crate::models::{GameSummary, PlayResult, PlayType, TeamBoxScore, TeamSide};
use crate::team::Team;

use super::game_state::GameState;

const TOUCHDOWN_POINTS: u32 = 7;
const FIELD_GOAL_POINTS: u32 = 3;
const SAFETY_POINTS: u32 = 2;

/// Kickoff and post-score drive start, measured as distance to goal.
const DRIVE_START_YARDLINE: f64 = 75.0;
/// Free kicks after a safety travel shorter than kickoffs.
const FREE_KICK_YARDLINE: f64 = 60.0;
const TOUCHBACK_YARDLINE: f64 = 25.0;

/// One game worth of simulation. Teams and the play model are shared
/// read-only; the engine owns its state and RNG exclusively.
pub struct GameEngine<'a> {
    home: &'a Team,
    away: &'a Team,
    model: &'a dyn GameModel,
    state: GameState,
    rng: ChaCha8Rng,
}

impl<'a> GameEngine<'a> {
    pub fn new(home: &'a Team, away: &'a Team, model: &'a dyn GameModel, seed: u64) -> Self {
        Self {
            home,
            away,
            model,
            state: GameState::kickoff(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Resolve one play and stamp it with the pre-play state snapshots the
    /// reporting layer reads back out of the log.
    fn simulate_play(&mut self) -> Result<PlayResult> {
        let ctx = PlayContext {
            state: &self.state,
            home: self.home,
            away: self.away,
        };
        let mut play = self.model.resolve_play(&ctx, &mut self.rng)?;
        play.stamp_pre_play(
            self.state.game_seconds_remaining,
            self.state.yardline,
            self.state.down,
            self.state.distance,
            self.state.score.get(self.state.possession),
        );
        Ok(play)
    }

    /// Apply one resolved play. Returns true when the game is over.
    fn update_game_state(&mut self, mut play: PlayResult) -> bool {
        self.state.quarter_seconds_remaining -= play.time_elapsed as i32;
        self.state.game_seconds_remaining -= play.time_elapsed as i32;

        if play.turnover {
            self.apply_turnover();
        } else {
            match play.play_type {
                PlayType::Punt => self.apply_punt(play.yards_gained),
                PlayType::FieldGoal => self.apply_field_goal(play.field_goal_made == Some(true)),
                PlayType::Run | PlayType::Pass => self.apply_scrimmage(&mut play),
            }
        }

        self.state.play_log.push(play);

        if self.state.quarter_seconds_remaining > 0 {
            return false;
        }
        match self.state.quarter {
            4 => true,
            2 => {
                self.handle_halftime();
                false
            }
            _ => {
                self.state.quarter += 1;
                self.state.quarter_seconds_remaining = 900;
                false
            }
        }
    }

    fn apply_turnover(&mut self) {
        let mirrored = 100.0 - self.state.yardline;
        self.state.switch_possession();
        self.state.reset_drive(mirrored);
    }

    fn apply_punt(&mut self, yards: f64) {
        self.state.switch_possession();
        let mut landing = self.state.yardline - yards;
        if landing < 0.0 {
            landing = TOUCHBACK_YARDLINE;
        }
        self.state.reset_drive(100.0 - landing);
    }

    fn apply_field_goal(&mut self, made: bool) {
        if made {
            self.state
                .score
                .add(self.state.possession, FIELD_GOAL_POINTS);
        }
        self.state.switch_possession();
        self.state.reset_drive(DRIVE_START_YARDLINE);
    }

    /// Run/pass resolution: advance the ball, then down-and-distance, then
    /// the goal-line boundaries. Scoring boundaries attribute points to the
    /// pre-play offense even after a turnover on downs flipped possession.
    fn apply_scrimmage(&mut self, play: &mut PlayResult) {
        let offense = self.state.possession;
        let yards = play.yards_gained;
        self.state.yardline -= yards;

        if yards >= self.state.distance {
            self.state.down = 1;
            self.state.distance = 10.0;
        } else if self.state.down == 4 {
            // Turnover on downs: possession flips in place, field position
            // and down-and-distance carry over unmirrored.
            self.state.switch_possession();
        } else {
            self.state.down += 1;
            self.state.distance -= yards;
        }

        if self.state.yardline <= 0.0 {
            self.state.score.add(offense, TOUCHDOWN_POINTS);
            self.state.possession = offense.opponent();
            self.state.reset_drive(DRIVE_START_YARDLINE);
            play.touchdown = true;
        } else if self.state.yardline > 100.0 {
            self.state.score.add(offense.opponent(), SAFETY_POINTS);
            self.state.possession = offense.opponent();
            self.state.reset_drive(FREE_KICK_YARDLINE);
        }
    }

    fn handle_halftime(&mut self) {
        self.state.quarter += 1;
        self.state.quarter_seconds_remaining = 900;
        self.state.possession = TeamSide::Away;
        self.state.reset_drive(DRIVE_START_YARDLINE);
    }

    /// Run the game to the end of regulation and extract its summary.
    pub fn run_simulation(mut self) -> Result<GameSummary> {
        loop {
            let play = self.simulate_play()?;
            if self.update_game_state(play) {
                break;
            }
        }

        let state = self.state;
        Ok(GameSummary {
            final_score: state.score,
            num_plays_in_game: state.play_log.len(),
            home: TeamBoxScore::from_play_log(
                self.home.name().to_string(),
                TeamSide::Home,
                state.score.home,
                &state.play_log,
            ),
            away: TeamBoxScore::from_play_log(
                self.away.name().to_string(),
                TeamSide::Away,
                state.score.away,
                &state.play_log,
            ),
            play_log: state.play_log,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PrototypeModel;
    use crate::team::fixtures;

    fn engine<'a>(
        home: &'a Team,
        away: &'a Team,
        model: &'a dyn GameModel,
        seed: u64,
    ) -> GameEngine<'a> {
        GameEngine::new(home, away, model, seed)
    }

    fn scrimmage(yards: f64, turnover: bool) -> PlayResult {
        PlayResult::of_play(PlayType::Run, yards, 25, turnover, None, 1, 900, TeamSide::Home)
    }

    fn punt(yards: f64) -> PlayResult {
        PlayResult::of_play(PlayType::Punt, yards, 25, false, None, 1, 900, TeamSide::Home)
    }

    fn field_goal(made: bool) -> PlayResult {
        PlayResult::of_play(
            PlayType::FieldGoal,
            0.0,
            25,
            false,
            Some(made),
            1,
            900,
            TeamSide::Home,
        )
    }

    #[test]
    fn test_turnover_mirrors_field_position() {
        let home = fixtures::team("H");
        let away = fixtures::team("A");
        let model = PrototypeModel::default();
        let mut engine = engine(&home, &away, &model, 1);
        engine.state.yardline = 66.0;

        engine.update_game_state(scrimmage(0.0, true));
        assert_eq!(engine.state.possession, TeamSide::Away);
        assert_eq!(engine.state.yardline, 34.0);
        assert_eq!(engine.state.down, 1);
        assert_eq!(engine.state.distance, 10.0);
    }

    #[test]
    fn test_punt_mirrors_net_field_position() {
        let home = fixtures::team("H");
        let away = fixtures::team("A");
        let model = PrototypeModel::default();
        let mut engine = engine(&home, &away, &model, 1);
        engine.state.yardline = 40.0;

        engine.update_game_state(punt(0.0));
        assert_eq!(engine.state.possession, TeamSide::Away);
        assert_eq!(engine.state.yardline, 60.0);
        assert_eq!(engine.state.down, 1);
    }

    #[test]
    fn test_punt_past_goal_line_is_a_touchback() {
        let home = fixtures::team("H");
        let away = fixtures::team("A");
        let model = PrototypeModel::default();
        let mut engine = engine(&home, &away, &model, 1);
        engine.state.yardline = 40.0;

        engine.update_game_state(punt(45.0));
        // Receiving team starts at its own 25.
        assert_eq!(engine.state.yardline, 75.0);
        assert_eq!(engine.state.possession, TeamSide::Away);
    }

    #[test]
    fn test_field_goal_scores_and_always_flips() {
        let home = fixtures::team("H");
        let away = fixtures::team("A");
        let model = PrototypeModel::default();

        let mut made = engine(&home, &away, &model, 1);
        made.state.yardline = 20.0;
        made.update_game_state(field_goal(true));
        assert_eq!(made.state.score.home, 3);
        assert_eq!(made.state.possession, TeamSide::Away);
        assert_eq!(made.state.yardline, 75.0);

        let mut missed = engine(&home, &away, &model, 1);
        missed.state.yardline = 20.0;
        missed.update_game_state(field_goal(false));
        assert_eq!(missed.state.score.home, 0);
        assert_eq!(missed.state.possession, TeamSide::Away);
        assert_eq!(missed.state.yardline, 75.0);
    }

    #[test]
    fn test_touchdown_awards_pre_play_offense() {
        let home = fixtures::team("H");
        let away = fixtures::team("A");
        let model = PrototypeModel::default();
        let mut engine = engine(&home, &away, &model, 1);
        engine.state.yardline = 12.0;

        engine.update_game_state(scrimmage(15.0, false));
        assert_eq!(engine.state.score.home, 7);
        assert_eq!(engine.state.score.away, 0);
        assert_eq!(engine.state.possession, TeamSide::Away);
        assert_eq!(engine.state.yardline, 75.0);
        assert!(engine.state.play_log.last().unwrap().touchdown);
    }

    #[test]
    fn test_safety_awards_defense_and_free_kicks() {
        let home = fixtures::team("H");
        let away = fixtures::team("A");
        let model = PrototypeModel::default();
        let mut engine = engine(&home, &away, &model, 1);
        engine.state.yardline = 98.0;

        engine.update_game_state(scrimmage(-5.0, false));
        assert_eq!(engine.state.score.away, 2);
        assert_eq!(engine.state.score.home, 0);
        assert_eq!(engine.state.possession, TeamSide::Away);
        assert_eq!(engine.state.yardline, 60.0);
    }

    #[test]
    fn test_turnover_on_downs_flips_without_mirroring() {
        let home = fixtures::team("H");
        let away = fixtures::team("A");
        let model = PrototypeModel::default();
        let mut engine = engine(&home, &away, &model, 1);
        engine.state.yardline = 55.0;
        engine.state.down = 4;
        engine.state.distance = 8.0;

        engine.update_game_state(scrimmage(3.0, false));
        assert_eq!(engine.state.possession, TeamSide::Away);
        // Field position advances by the gain but is not mirrored.
        assert_eq!(engine.state.yardline, 52.0);
        assert_eq!(engine.state.down, 4);
        assert_eq!(engine.state.distance, 8.0);
    }

    #[test]
    fn test_first_down_resets_distance() {
        let home = fixtures::team("H");
        let away = fixtures::team("A");
        let model = PrototypeModel::default();
        let mut engine = engine(&home, &away, &model, 1);
        engine.state.down = 2;
        engine.state.distance = 6.0;
        engine.state.yardline = 50.0;

        engine.update_game_state(scrimmage(6.0, false));
        assert_eq!(engine.state.down, 1);
        assert_eq!(engine.state.distance, 10.0);
        assert_eq!(engine.state.yardline, 44.0);
    }

    #[test]
    fn test_short_gain_advances_down() {
        let home = fixtures::team("H");
        let away = fixtures::team("A");
        let model = PrototypeModel::default();
        let mut engine = engine(&home, &away, &model, 1);

        engine.update_game_state(scrimmage(4.0, false));
        assert_eq!(engine.state.down, 2);
        assert_eq!(engine.state.distance, 6.0);
        assert_eq!(engine.state.yardline, 71.0);
    }

    #[test]
    fn test_quarter_rollover_resets_clock() {
        let home = fixtures::team("H");
        let away = fixtures::team("A");
        let model = PrototypeModel::default();
        let mut engine = engine(&home, &away, &model, 1);
        engine.state.quarter_seconds_remaining = 10;

        let game_over = engine.update_game_state(scrimmage(2.0, false));
        assert!(!game_over);
        assert_eq!(engine.state.quarter, 2);
        assert_eq!(engine.state.quarter_seconds_remaining, 900);
    }

    #[test]
    fn test_halftime_gives_away_the_ball() {
        let home = fixtures::team("H");
        let away = fixtures::team("A");
        let model = PrototypeModel::default();
        let mut engine = engine(&home, &away, &model, 1);
        engine.state.quarter = 2;
        engine.state.quarter_seconds_remaining = 5;
        engine.state.possession = TeamSide::Home;
        engine.state.yardline = 33.0;
        engine.state.down = 3;

        let game_over = engine.update_game_state(scrimmage(2.0, false));
        assert!(!game_over);
        assert_eq!(engine.state.quarter, 3);
        assert_eq!(engine.state.quarter_seconds_remaining, 900);
        assert_eq!(engine.state.possession, TeamSide::Away);
        assert_eq!(engine.state.yardline, 75.0);
        assert_eq!((engine.state.down, engine.state.distance), (1, 10.0));
    }

    #[test]
    fn test_fourth_quarter_expiry_ends_the_game_once() {
        let home = fixtures::team("H");
        let away = fixtures::team("A");
        let model = PrototypeModel::default();
        let mut engine = engine(&home, &away, &model, 1);
        engine.state.quarter = 4;
        engine.state.quarter_seconds_remaining = 5;
        engine.state.game_seconds_remaining = 5;

        let game_over = engine.update_game_state(scrimmage(2.0, false));
        assert!(game_over);
        // The final play lands in the log exactly once.
        assert_eq!(engine.state.play_log.len(), 1);
    }

    #[test]
    fn test_run_simulation_terminates_with_consistent_summary() {
        let home = fixtures::team("H");
        let away = fixtures::team("A");
        let model = PrototypeModel::default();

        for seed in 0..10 {
            let summary = GameEngine::new(&home, &away, &model, seed)
                .run_simulation()
                .unwrap();
            assert_eq!(summary.num_plays_in_game, summary.play_log.len());
            assert!(summary.num_plays_in_game > 0);
            assert_eq!(summary.final_score.home, summary.home.score);
            assert_eq!(summary.final_score.away, summary.away.score);

            // Pre-play possession scores are non-decreasing per side.
            let mut last = (0u32, 0u32);
            for play in &summary.play_log {
                match play.posteam {
                    TeamSide::Home => {
                        assert!(play.posteam_score >= last.0);
                        last.0 = play.posteam_score;
                    }
                    TeamSide::Away => {
                        assert!(play.posteam_score >= last.1);
                        last.1 = play.posteam_score;
                    }
                }
            }
        }
    }

    #[test]
    fn test_run_simulation_is_deterministic_per_seed() {
        let home = fixtures::team("H");
        let away = fixtures::team("A");
        let model = PrototypeModel::default();

        let first = GameEngine::new(&home, &away, &model, 77)
            .run_simulation()
            .unwrap();
        let second = GameEngine::new(&home, &away, &model, 77)
            .run_simulation()
            .unwrap();
        assert_eq!(first.final_score, second.final_score);
        assert_eq!(first.num_plays_in_game, second.num_plays_in_game);
    }

    #[test]
    fn test_simulate_play_stamps_pre_play_snapshot() {
        let home = fixtures::team("H");
        let away = fixtures::team("A");
        let model = PrototypeModel::default();
        let mut engine = engine(&home, &away, &model, 4);
        engine.state.game_seconds_remaining = 2000;
        engine.state.yardline = 48.0;
        engine.state.down = 2;
        engine.state.distance = 7.0;
        engine.state.score.add(TeamSide::Home, 14);

        let play = engine.simulate_play().unwrap();
        assert_eq!(play.game_seconds_remaining, 2000);
        assert_eq!(play.yardline, 48.0);
        assert_eq!(play.down, 2);
        assert_eq!(play.distance, 7.0);
        assert_eq!(play.posteam_score, 14);
        assert_eq!(play.posteam, TeamSide::Home);
    }
}
