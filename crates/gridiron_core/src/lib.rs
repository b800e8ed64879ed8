//! # gridiron_core - Monte Carlo Football Game Simulation Engine
//!
//! This library simulates American-football games play by play and runs
//! Monte Carlo batches of a matchup to estimate win probability and
//! season-style box scores.
//!
//! ## Features
//! - 100% deterministic simulation (same seed = same result)
//! - Seven play-resolution models, from flat season rates to situational
//!   rate tables with strength bias
//! - Parallel batch execution with uniform featured-game selection

pub mod engine;
pub mod error;
pub mod model;
pub mod models;
pub mod sim;
pub mod team;

pub use engine::{GameEngine, GameState};
pub use error::{Result, SimError};
pub use model::{
    build_model, build_model_for, weighted_average, FourthDownFeatures, FourthDownModel,
    GameModel, ModelCode, ModelConfig, PlayContext,
};
pub use models::{GameSummary, PlayResult, PlayType, Score, TeamBoxScore, TeamProfile, TeamSide};
pub use sim::{run_batch, run_single, BatchConfig, SimulationResult};
pub use team::{Team, YardageSampler};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
