pub mod events;
pub mod models;

pub use events::{CardKind, DiscreteEvent};
pub use models::{MatchPhase, MatchSnapshot, StandingsEntry};
