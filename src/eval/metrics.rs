//! Rank-quality metrics over an evaluation run.
//!
//! Evidence is collected per query into a [`RankAccumulator`] and reduced
//! once into a [`MetricsSummary`]. Every metric is `Option<f64>`: `None`
//! means "not computable" because no query contributed, which is a
//! different outcome from a legitimate 0.0 and serializes as JSON null.

use serde::{Deserialize, Serialize};

/// Positions considered by the nDCG metric.
pub const NDCG_CUTOFF: usize = 10;

#[inline]
fn usize_to_f64(value: usize) -> f64 {
    u32::try_from(value).map_or_else(|_| f64::from(u32::MAX), f64::from)
}

/// Per-query rank evidence collected during a run.
///
/// Two families feed it. [`record_best_rank`](Self::record_best_rank) is
/// called only for queries whose positive set intersected the candidate
/// pool. [`record_gains`](Self::record_gains) is called for every query
/// with a non-empty positive set, pool hit or not: a query whose positives
/// were all filtered out of the pool contributes an all-zero gains row
/// (later skipped by the ideal-DCG guard) and no best rank, so neither
/// metric family counts it.
#[derive(Debug, Clone, Default)]
pub struct RankAccumulator {
    best_ranks: Vec<usize>,
    gains: Vec<Vec<u8>>,
}

impl RankAccumulator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the best (lowest) 1-based rank of an in-pool positive.
    pub fn record_best_rank(&mut self, rank: usize) {
        debug_assert!(rank >= 1, "ranks are 1-based");
        self.best_ranks.push(rank);
    }

    /// Record the full ranked 0/1 relevance sequence for a labeled query.
    pub fn record_gains(&mut self, gains: Vec<u8>) {
        self.gains.push(gains);
    }

    /// Fold another accumulator in, preserving its recording order.
    pub fn merge(&mut self, mut other: Self) {
        self.best_ranks.append(&mut other.best_ranks);
        self.gains.append(&mut other.gains);
    }

    /// Queries with a positive inside the candidate pool.
    #[must_use]
    pub fn qualifying_queries(&self) -> usize {
        self.best_ranks.len()
    }

    /// Queries with any positive evidence at all.
    #[must_use]
    pub fn labeled_queries(&self) -> usize {
        self.gains.len()
    }

    /// Reduce the collected evidence into summary metrics.
    #[must_use]
    pub fn summarize(&self) -> MetricsSummary {
        let total = self.best_ranks.len();
        let mrr = (total > 0).then(|| {
            self.best_ranks
                .iter()
                .map(|&rank| 1.0 / usize_to_f64(rank))
                .sum::<f64>()
                / usize_to_f64(total)
        });
        let recall_at = |k: usize| {
            (total > 0).then(|| {
                let hits = self.best_ranks.iter().filter(|&&rank| rank <= k).count();
                usize_to_f64(hits) / usize_to_f64(total)
            })
        };

        MetricsSummary {
            mrr,
            recall_at_1: recall_at(1),
            recall_at_3: recall_at(3),
            recall_at_5: recall_at(5),
            recall_at_10: recall_at(10),
            ndcg_at_10: ndcg_over(&self.gains, NDCG_CUTOFF),
        }
    }
}

/// Mean per-query nDCG@k over all gains rows with a non-zero ideal DCG.
fn ndcg_over(gains: &[Vec<u8>], k: usize) -> Option<f64> {
    let mut scores = Vec::new();
    for row in gains {
        let mut ideal = row.clone();
        ideal.sort_unstable_by(|a, b| b.cmp(a));
        let idcg = dcg(&ideal, k);
        if idcg == 0.0 {
            continue;
        }
        scores.push(dcg(row, k) / idcg);
    }
    if scores.is_empty() {
        None
    } else {
        Some(scores.iter().sum::<f64>() / usize_to_f64(scores.len()))
    }
}

/// Discounted cumulative gain over the first `k` positions.
fn dcg(gains: &[u8], k: usize) -> f64 {
    gains
        .iter()
        .take(k)
        .enumerate()
        .map(|(position, &gain)| f64::from(gain) / (usize_to_f64(position) + 2.0).log2())
        .sum()
}

/// Summary metrics for one evaluation run. Keys in the serialized form
/// match the metric names exactly (`recall@1`, `ndcg@10`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub mrr: Option<f64>,
    #[serde(rename = "recall@1")]
    pub recall_at_1: Option<f64>,
    #[serde(rename = "recall@3")]
    pub recall_at_3: Option<f64>,
    #[serde(rename = "recall@5")]
    pub recall_at_5: Option<f64>,
    #[serde(rename = "recall@10")]
    pub recall_at_10: Option<f64>,
    #[serde(rename = "ndcg@10")]
    pub ndcg_at_10: Option<f64>,
}

impl MetricsSummary {
    /// (metric name, value) pairs in report order.
    #[must_use]
    pub fn entries(&self) -> [(&'static str, Option<f64>); 6] {
        [
            ("mrr", self.mrr),
            ("recall@1", self.recall_at_1),
            ("recall@3", self.recall_at_3),
            ("recall@5", self.recall_at_5),
            ("recall@10", self.recall_at_10),
            ("ndcg@10", self.ndcg_at_10),
        ]
    }
}
