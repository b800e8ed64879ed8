pub mod play;
pub mod profile;
pub mod summary;

pub use play::{PlayResult, PlayType, Score, TeamSide};
pub use profile::{SituationalRates, TeamProfile};
pub use summary::{GameSummary, TeamBoxScore};
