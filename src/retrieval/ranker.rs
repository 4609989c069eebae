//! Scoring and ranking of a candidate pool against one query vector.

use crate::text::tfidf::SparseVector;

/// One candidate after ranking: table row, cosine score, 1-based rank.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedCandidate {
    pub row: usize,
    pub score: f32,
    pub rank: usize,
}

/// Score every pool row against the query and assign ranks 1..N.
///
/// Scores are inner products of unit vectors, so they lie in [0, 1] and a
/// zero vector on either side scores 0. The sort is descending and stable:
/// equal scores keep the pool's row order. That tie-break is observable
/// output and deliberate, not an accident of the sort.
///
/// `vectors` is the corpus matrix indexed by table row; every pool entry
/// must be a valid index into it.
#[must_use]
pub fn rank(query: &SparseVector, pool: &[usize], vectors: &[SparseVector]) -> Vec<RankedCandidate> {
    let mut scored: Vec<(usize, f32)> = pool
        .iter()
        .map(|&row| (row, query.dot(&vectors[row])))
        .collect();
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    scored
        .into_iter()
        .enumerate()
        .map(|(position, (row, score))| RankedCandidate {
            row,
            score,
            rank: position + 1,
        })
        .collect()
}
