//! lfmatch evaluate - run the retrieval evaluation end to end

use std::path::Path;
use std::path::PathBuf;

use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use crate::app::AppContext;
use crate::catalog::item::ItemKind;
use crate::catalog::loader::load_table;
use crate::cli::output::{emit_human, emit_robot, robot_ok, HumanLayout};
use crate::error::Result;
use crate::eval::driver::{EvalOptions, EvaluationRun, Evaluator};
use crate::eval::sink;
use crate::retrieval::candidates::DateWindow;
use crate::text::tokenize::NgramRange;

#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// Dataset file (.jsonl or .csv)
    #[arg(long, value_name = "PATH")]
    pub data: PathBuf,

    /// Directory for the result artifacts
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Minimum document frequency for vocabulary terms
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub min_df: Option<u32>,

    /// Candidate date window in days, or "disabled"
    #[arg(long, value_name = "DAYS", value_parser = parse_window, conflicts_with = "no_window")]
    pub days_window: Option<DateWindow>,

    /// Disable the candidate date window
    #[arg(long)]
    pub no_window: bool,

    /// Include word bigrams in the vocabulary
    #[arg(long, overrides_with = "no_bigrams")]
    pub bigrams: bool,

    /// Restrict the vocabulary to unigrams
    #[arg(long)]
    pub no_bigrams: bool,

    /// Ranked rows kept per query in the results file
    #[arg(long, value_name = "N", value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    pub top_k: Option<usize>,
}

pub fn run(ctx: &AppContext, args: &EvaluateArgs) -> Result<()> {
    let options = resolve_options(ctx, args);
    info!(data = %args.data.display(), "loading dataset");
    let loaded = load_table(&args.data)?;
    let table = &loaded.table;
    debug!(schema = %loaded.schema, items = table.len(), "dataset loaded");

    let mut evaluator = Evaluator::new(options);
    let bar = (!ctx.robot_mode).then(|| {
        let bar = ProgressBar::new(table.count_of_kind(ItemKind::Lost) as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )
                .unwrap()
                .progress_chars("#>-"),
        );
        bar.set_message("scoring queries");
        bar
    });
    if let Some(bar) = &bar {
        evaluator = evaluator.with_progress(bar.clone());
    }

    let run = evaluator.run(table)?;
    if let Some(bar) = bar {
        bar.finish_and_clear();
    }

    let results_path = args.output_dir.join(&ctx.config.output.results_file);
    let metrics_path = args.output_dir.join(&ctx.config.output.metrics_file);
    sink::write_results_csv(&results_path, &run.rows)?;
    sink::write_metrics_json(&metrics_path, &run.summary)?;

    if ctx.robot_mode {
        let response = robot_ok(serde_json::json!({
            "schema": loaded.schema,
            "options": options,
            "stats": run.stats,
            "summary": run.summary,
            "results_path": results_path,
            "metrics_path": metrics_path,
        }));
        emit_robot(&response)?;
    } else {
        display_human(&run, &results_path, &metrics_path);
    }

    Ok(())
}

/// Config supplies the baseline; explicit flags override field by field.
fn resolve_options(ctx: &AppContext, args: &EvaluateArgs) -> EvalOptions {
    let mut options = ctx.config.eval_options();
    if let Some(min_df) = args.min_df {
        options.tfidf.min_doc_freq = min_df;
    }
    if args.no_bigrams {
        options.tfidf.ngrams = NgramRange::Unigram;
    } else if args.bigrams {
        options.tfidf.ngrams = NgramRange::UnigramBigram;
    }
    if args.no_window {
        options.window = DateWindow::Disabled;
    } else if let Some(window) = args.days_window {
        options.window = window;
    }
    if let Some(top_k) = args.top_k {
        options.top_k = top_k;
    }
    options
}

fn display_human(run: &EvaluationRun, results_path: &Path, metrics_path: &Path) {
    let mut layout = HumanLayout::new();
    layout.title("Retrieval evaluation");

    layout.section("Corpus");
    layout.kv("items", &run.stats.total_items.to_string());
    layout.kv(
        "lost / found",
        &format!("{} / {}", run.stats.lost_items, run.stats.found_items),
    );
    layout.kv("vocabulary", &run.stats.vocabulary_size.to_string());
    layout.blank();

    layout.section("Queries");
    layout.kv("scored", &run.stats.queries_scored.to_string());
    layout.kv("skipped", &run.stats.queries_skipped.to_string());
    layout.kv("labeled", &run.stats.queries_labeled.to_string());
    layout.kv("qualifying", &run.stats.queries_qualifying.to_string());
    layout.blank();

    layout.section("Metrics");
    for (name, value) in run.summary.entries() {
        layout.kv(name, &format_metric(value));
    }
    layout.blank();

    layout.kv("results", &results_path.display().to_string());
    layout.kv("metrics", &metrics_path.display().to_string());
    emit_human(layout);
}

fn format_metric(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.4}"))
}

fn parse_window(raw: &str) -> std::result::Result<DateWindow, String> {
    raw.parse()
}
