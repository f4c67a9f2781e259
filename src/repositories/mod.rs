mod memory;
mod traits;

pub use memory::{InMemoryExtractedNumberRepository, InMemoryMatchRepository, InMemoryRosterRepository};
pub use traits::{ExtractedNumberRepository, MatchRepository, RosterRepository};
