//! Batch evaluation: drive the retrieval pipeline over every query,
//! reduce ranks into summary metrics, persist the artifacts.

pub mod driver;
pub mod metrics;
pub mod sink;

pub use driver::{EvalOptions, EvaluationRun, Evaluator, RankedRow, RunStats, DEFAULT_TOP_K};
pub use metrics::{MetricsSummary, RankAccumulator, NDCG_CUTOFF};
pub use sink::{
    render_metrics_json, render_results_csv, write_metrics_json, write_results_csv, METRICS_FILE,
    RESULTS_FILE,
};
