//! lfmatch - TF-IDF retrieval evaluation for lost & found matching.
//!
//! The pipeline: load an item dataset (canonical or pairwise), vectorize
//! every item description with sublinear TF-IDF, rank each lost item's
//! opposite-kind candidates by cosine similarity, and reduce the labeled
//! ranks into MRR / Recall@k / nDCG@10.

pub mod app;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod eval;
pub mod retrieval;
#[cfg(test)]
pub mod test_utils;
pub mod text;

pub use error::{LfError, Result};
