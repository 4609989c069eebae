//! Candidate selection and ranking.

pub mod candidates;
pub mod ranker;

pub use candidates::{select_candidates, DateWindow, DEFAULT_WINDOW_DAYS};
pub use ranker::{rank, RankedCandidate};
