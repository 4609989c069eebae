//! Evaluation driver: fit once, then score every lost query in parallel.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use indicatif::ProgressBar;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::catalog::item::ItemKind;
use crate::catalog::table::ItemTable;
use crate::error::{LfError, Result};
use crate::eval::metrics::{MetricsSummary, RankAccumulator};
use crate::retrieval::candidates::{select_candidates, DateWindow};
use crate::retrieval::ranker::rank;
use crate::text::tfidf::{SparseVector, TfidfModel, TfidfOptions};

/// Ranked rows kept per query in the saved output by default.
pub const DEFAULT_TOP_K: usize = 50;

/// Log a progress event after this many queries.
const PROGRESS_EVERY: usize = 50;

/// Options for one evaluation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvalOptions {
    pub tfidf: TfidfOptions,
    pub window: DateWindow,
    /// Per-query cap on saved rows. Metrics always use the full ranking.
    pub top_k: usize,
}

impl Default for EvalOptions {
    fn default() -> Self {
        Self {
            tfidf: TfidfOptions::default(),
            window: DateWindow::default(),
            top_k: DEFAULT_TOP_K,
        }
    }
}

/// One saved result row. Serialized field names match the output columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedRow {
    #[serde(rename = "queryId")]
    pub query_id: String,
    #[serde(rename = "candidateId")]
    pub candidate_id: String,
    pub score: f32,
    pub rank: usize,
    #[serde(rename = "isMatch")]
    pub is_match: u8,
}

/// Counters describing what a run actually did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub total_items: usize,
    pub lost_items: usize,
    pub found_items: usize,
    pub vocabulary_size: usize,
    pub queries_total: usize,
    /// Queries with a non-empty candidate pool.
    pub queries_scored: usize,
    /// Queries dropped because their pool was empty.
    pub queries_skipped: usize,
    /// Queries with any positive evidence.
    pub queries_labeled: usize,
    /// Queries whose positive actually appeared in the pool.
    pub queries_qualifying: usize,
    /// Total (query, candidate) pairs scored.
    pub candidates_scored: usize,
}

/// Everything one evaluation run produces.
#[derive(Debug)]
pub struct EvaluationRun {
    pub rows: Vec<RankedRow>,
    pub summary: MetricsSummary,
    pub stats: RunStats,
}

struct QueryOutcome {
    rows: Vec<RankedRow>,
    evidence: RankAccumulator,
    pool_size: usize,
}

/// Orchestrates one batch evaluation: fit, per-query scoring on a worker
/// pool, ordered merge, metric reduction.
pub struct Evaluator {
    options: EvalOptions,
    cancel: Arc<AtomicBool>,
    progress: Option<ProgressBar>,
}

impl Evaluator {
    #[must_use]
    pub fn new(options: EvalOptions) -> Self {
        Self {
            options,
            cancel: Arc::new(AtomicBool::new(false)),
            progress: None,
        }
    }

    /// Use an external cancellation flag. The flag is read once per query;
    /// a cancelled run fails with [`LfError::Cancelled`].
    #[must_use]
    pub fn with_cancel_token(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = cancel;
        self
    }

    /// Tick a progress bar once per processed query.
    #[must_use]
    pub fn with_progress(mut self, bar: ProgressBar) -> Self {
        self.progress = Some(bar);
        self
    }

    /// Run the full pipeline over `table`.
    ///
    /// The weighting model is fit over every item text before the query
    /// loop; queries are the lost rows in table order. Per-query work runs
    /// on the rayon pool and results are merged back in query order, so
    /// output is deterministic regardless of thread scheduling.
    pub fn run(&self, table: &ItemTable) -> Result<EvaluationRun> {
        let corpus: Vec<&str> = table.items().iter().map(|item| item.text.as_str()).collect();
        let (model, vectors) = TfidfModel::fit_transform(&corpus, self.options.tfidf)?;
        info!(
            items = table.len(),
            vocabulary = model.vocabulary_size(),
            "fitted weighting model"
        );

        let queries = table.indices_of_kind(ItemKind::Lost);
        let total = queries.len();
        let processed = AtomicUsize::new(0);

        let outcomes: Vec<QueryOutcome> = queries
            .par_iter()
            .map(|&row| {
                if self.cancel.load(Ordering::Relaxed) {
                    return Err(LfError::Cancelled);
                }
                let outcome = self.evaluate_query(table, row, &model, &vectors);
                let done = processed.fetch_add(1, Ordering::Relaxed) + 1;
                if done % PROGRESS_EVERY == 0 {
                    debug!(processed = done, total, "processed queries");
                }
                if let Some(bar) = &self.progress {
                    bar.inc(1);
                }
                Ok(outcome)
            })
            .collect::<Result<_>>()?;

        let mut stats = RunStats {
            total_items: table.len(),
            lost_items: table.count_of_kind(ItemKind::Lost),
            found_items: table.count_of_kind(ItemKind::Found),
            vocabulary_size: model.vocabulary_size(),
            queries_total: total,
            ..RunStats::default()
        };
        let mut rows = Vec::new();
        let mut accumulator = RankAccumulator::new();
        for outcome in outcomes {
            if outcome.pool_size == 0 {
                stats.queries_skipped += 1;
                continue;
            }
            stats.queries_scored += 1;
            stats.candidates_scored += outcome.pool_size;
            stats.queries_labeled += outcome.evidence.labeled_queries();
            stats.queries_qualifying += outcome.evidence.qualifying_queries();
            rows.extend(outcome.rows);
            accumulator.merge(outcome.evidence);
        }

        let summary = accumulator.summarize();
        info!(
            scored = stats.queries_scored,
            skipped = stats.queries_skipped,
            qualifying = stats.queries_qualifying,
            "evaluation complete"
        );
        Ok(EvaluationRun {
            rows,
            summary,
            stats,
        })
    }

    fn evaluate_query(
        &self,
        table: &ItemTable,
        row: usize,
        model: &TfidfModel,
        vectors: &[SparseVector],
    ) -> QueryOutcome {
        let query = &table.items()[row];
        let pool = select_candidates(table, query, self.options.window);
        if pool.is_empty() {
            debug!(query = %query.id, "empty candidate pool, skipping query");
            return QueryOutcome {
                rows: Vec::new(),
                evidence: RankAccumulator::new(),
                pool_size: 0,
            };
        }

        let query_vector = model.transform(&query.text);
        let ranked = rank(&query_vector, &pool, vectors);

        let positives = table.positives_for(query);
        let gains: Vec<u8> = ranked
            .iter()
            .map(|candidate| {
                u8::from(positives.contains(table.items()[candidate.row].id.as_str()))
            })
            .collect();

        let mut evidence = RankAccumulator::new();
        if !positives.is_empty() {
            let best_rank = ranked
                .iter()
                .zip(&gains)
                .find(|&(_, &gain)| gain == 1)
                .map(|(candidate, _)| candidate.rank);
            if let Some(best) = best_rank {
                evidence.record_best_rank(best);
            }
            evidence.record_gains(gains.clone());
        }

        let rows = ranked
            .iter()
            .take(self.options.top_k)
            .enumerate()
            .map(|(position, candidate)| RankedRow {
                query_id: query.id.clone(),
                candidate_id: table.items()[candidate.row].id.clone(),
                score: candidate.score,
                rank: candidate.rank,
                is_match: gains[position],
            })
            .collect();

        QueryOutcome {
            rows,
            evidence,
            pool_size: pool.len(),
        }
    }
}
