//! Text processing: tokenization and tf-idf weighting.

pub mod tfidf;
pub mod tokenize;

pub use tfidf::{SparseVector, TfidfModel, TfidfOptions, DEFAULT_MIN_DOC_FREQ};
pub use tokenize::{tokenize, NgramRange};
