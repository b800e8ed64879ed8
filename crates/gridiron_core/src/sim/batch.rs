//! Monte Carlo batch orchestration: N independent games of the same matchup
//! fanned out over a thread pool, then aggregated.
//!
//! Work is partitioned into static contiguous chunks. Aggregation is
//! commutative, but the featured game is selected only after every chunk has
//! returned so the draw stays uniform over all N games.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::engine::GameEngine;
use crate::error::{Result, SimError};
use crate::model::GameModel;
use crate::models::summary::round2;
use crate::models::{GameSummary, TeamBoxScore, TeamSide};
use crate::team::Team;

use super::series::FeaturedGame;

#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub num_simulations: usize,
    /// Base seed; game `i` runs on `seed + i`.
    pub seed: u64,
    /// Worker count override; the thread pool's size when absent.
    pub workers: Option<usize>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            num_simulations: 3000,
            seed: 0,
            workers: None,
        }
    }
}

/// Mean box score across every simulated game, field by field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamAverages {
    pub team: String,
    pub score: f64,
    pub run_rate: f64,
    pub pass_rate: f64,
    pub pass_cmp_rate: f64,
    pub pass_yards: f64,
    pub passing_tds: f64,
    pub sacks_allowed: f64,
    pub pass_yards_per_play: f64,
    pub rushing_attempts: f64,
    pub rushing_yards: f64,
    pub rushing_tds: f64,
    pub rush_yards_per_play: f64,
    pub total_turnovers: f64,
    /// None when no simulated game attempted a field goal.
    pub fg_pct: Option<f64>,
}

/// Mean over the non-NaN values; NaN when none qualify.
fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for value in values.filter(|v| !v.is_nan()) {
        sum += value;
        count += 1;
    }
    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}

impl TeamAverages {
    fn from_box_scores(team: String, scores: &[&TeamBoxScore]) -> Self {
        let fg_values: Vec<f64> = scores.iter().filter_map(|s| s.fg_pct).collect();
        let fg_pct = if fg_values.is_empty() {
            None
        } else {
            Some(round2(mean(fg_values.iter().copied())))
        };

        Self {
            team,
            score: round2(mean(scores.iter().map(|s| s.score as f64))),
            run_rate: round2(mean(scores.iter().map(|s| s.run_rate))),
            pass_rate: round2(mean(scores.iter().map(|s| s.pass_rate))),
            pass_cmp_rate: round2(mean(scores.iter().map(|s| s.pass_cmp_rate))),
            pass_yards: round2(mean(scores.iter().map(|s| s.pass_yards))),
            passing_tds: round2(mean(scores.iter().map(|s| s.passing_tds as f64))),
            sacks_allowed: round2(mean(scores.iter().map(|s| s.sacks_allowed as f64))),
            pass_yards_per_play: round2(mean(scores.iter().map(|s| s.pass_yards_per_play))),
            rushing_attempts: round2(mean(scores.iter().map(|s| s.rushing_attempts as f64))),
            rushing_yards: round2(mean(scores.iter().map(|s| s.rushing_yards))),
            rushing_tds: round2(mean(scores.iter().map(|s| s.rushing_tds as f64))),
            rush_yards_per_play: round2(mean(scores.iter().map(|s| s.rush_yards_per_play))),
            total_turnovers: round2(mean(scores.iter().map(|s| s.total_turnovers as f64))),
            fg_pct,
        }
    }
}

/// Aggregated outcome of one simulation batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    pub home_win_pct: f64,
    pub average_score_diff: f64,
    pub result_string: String,
    pub home: TeamAverages,
    pub away: TeamAverages,
    pub featured_game: FeaturedGame,
}

/// Human-readable verdict for an average score differential.
pub fn parse_simulation_result(score_diff: f64, home_team: &str, away_team: &str) -> String {
    if score_diff > 0.0 {
        format!("{home_team} wins by {}", round2(score_diff))
    } else if score_diff < 0.0 {
        format!("{away_team} wins by {}", round2(-score_diff))
    } else {
        format!("{home_team} and {away_team} tie")
    }
}

/// Run one seeded game of the matchup.
pub fn run_single(
    home: &Team,
    away: &Team,
    model: &dyn GameModel,
    seed: u64,
) -> Result<GameSummary> {
    GameEngine::new(home, away, model, seed).run_simulation()
}

/// Run the full batch and aggregate. Teams must already be prepared for the
/// chosen model's sampler families.
pub fn run_batch(
    home: &Team,
    away: &Team,
    model: &dyn GameModel,
    config: &BatchConfig,
) -> Result<SimulationResult> {
    let n = config.num_simulations;
    if n == 0 {
        return Err(SimError::EmptyBatch);
    }

    let workers = config
        .workers
        .unwrap_or_else(rayon::current_num_threads)
        .clamp(1, n);
    let chunk_size = n.div_ceil(workers);
    log::info!(
        "running {n} simulations of {} vs {} ({} workers, chunk size {chunk_size})",
        home.name(),
        away.name(),
        workers
    );

    let indices: Vec<usize> = (0..n).collect();
    let summaries: Vec<GameSummary> = indices
        .par_chunks(chunk_size)
        .map(|chunk| {
            chunk
                .iter()
                .map(|&i| run_single(home, away, model, config.seed + i as u64))
                .collect::<Result<Vec<_>>>()
        })
        .collect::<Result<Vec<_>>>()?
        .into_iter()
        .flatten()
        .collect();

    let home_wins = summaries
        .iter()
        .filter(|s| s.winner() == Some(TeamSide::Home))
        .count();
    let home_win_pct = round2(100.0 * home_wins as f64 / n as f64);

    let home_scores: Vec<&TeamBoxScore> = summaries.iter().map(|s| &s.home).collect();
    let away_scores: Vec<&TeamBoxScore> = summaries.iter().map(|s| &s.away).collect();
    let home_avg = TeamAverages::from_box_scores(home.name().to_string(), &home_scores);
    let away_avg = TeamAverages::from_box_scores(away.name().to_string(), &away_scores);

    let average_score_diff = home_avg.score - away_avg.score;
    let result_string = format!(
        "Average score difference: {}\nAverage total score: {}",
        round2(average_score_diff),
        round2(home_avg.score + away_avg.score)
    );

    // Selected only after the whole result set is in, so the draw is uniform
    // over all N games.
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let featured_index = rng.gen_range(0..n);
    let featured_game = FeaturedGame::from_summary(featured_index, &summaries[featured_index]);

    Ok(SimulationResult {
        home_win_pct,
        average_score_diff,
        result_string,
        home: home_avg,
        away: away_avg,
        featured_game,
    })
}
