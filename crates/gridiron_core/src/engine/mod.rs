//! Game engine: the possession/clock state machine that drives one
//! simulated game from kickoff to the end of the fourth quarter.

pub mod game_engine;
pub mod game_state;

pub use game_engine::GameEngine;
pub use game_state::GameState;
