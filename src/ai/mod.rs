pub mod search;

pub use search::{Candidate, TwoPlySearcher};
