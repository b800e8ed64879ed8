//! Monte Carlo batch layer: orchestration over many independent games plus
//! featured-game reporting series.

pub mod batch;
pub mod series;

pub use batch::{
    parse_simulation_result, run_batch, run_single, BatchConfig, SimulationResult, TeamAverages,
};
pub use series::{FeaturedGame, ScoringPoint, YardagePoint};
