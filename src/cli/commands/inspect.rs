//! lfmatch inspect - summarize a dataset without scoring anything

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Args;
use serde::Serialize;
use tracing::info;

use crate::app::AppContext;
use crate::catalog::item::{ItemKind, LabelEvidence};
use crate::catalog::loader::{load_table, LoadedTable, SourceSchema};
use crate::cli::output::{emit_human, emit_robot, robot_ok, HumanLayout};
use crate::error::Result;

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Dataset file (.jsonl or .csv)
    #[arg(long, value_name = "PATH")]
    pub data: PathBuf,
}

pub fn run(ctx: &AppContext, args: &InspectArgs) -> Result<()> {
    info!(data = %args.data.display(), "inspecting dataset");
    let loaded = load_table(&args.data)?;
    let report = InspectReport::build(&loaded);

    if ctx.robot_mode {
        emit_robot(&robot_ok(&report))?;
    } else {
        display_human(&report, &args.data);
    }
    Ok(())
}

/// Counts a dataset reviewer cares about before running an evaluation.
#[derive(Debug, Serialize)]
struct InspectReport {
    schema: SourceSchema,
    total_items: usize,
    lost_items: usize,
    found_items: usize,
    dated_items: usize,
    labeled_lost: usize,
    direct_labels: usize,
    group_labels: usize,
    earliest_date: Option<NaiveDate>,
    latest_date: Option<NaiveDate>,
}

impl InspectReport {
    fn build(loaded: &LoadedTable) -> Self {
        let items = loaded.table.items();
        let mut direct_labels = 0;
        let mut group_labels = 0;
        for item in items.iter().filter(|item| item.kind == ItemKind::Lost) {
            match item.label {
                LabelEvidence::Direct(_) => direct_labels += 1,
                LabelEvidence::Group(_) => group_labels += 1,
                LabelEvidence::None => {}
            }
        }
        Self {
            schema: loaded.schema,
            total_items: items.len(),
            lost_items: loaded.table.count_of_kind(ItemKind::Lost),
            found_items: loaded.table.count_of_kind(ItemKind::Found),
            dated_items: items.iter().filter(|item| item.date.is_some()).count(),
            labeled_lost: direct_labels + group_labels,
            direct_labels,
            group_labels,
            earliest_date: items.iter().filter_map(|item| item.date).min(),
            latest_date: items.iter().filter_map(|item| item.date).max(),
        }
    }
}

fn display_human(report: &InspectReport, data: &std::path::Path) {
    let mut layout = HumanLayout::new();
    layout.title("Dataset inspection");
    layout.kv("file", &data.display().to_string());
    layout.kv("schema", &report.schema.to_string());
    layout.blank();

    layout.section("Items");
    layout.kv("total", &report.total_items.to_string());
    layout.kv(
        "lost / found",
        &format!("{} / {}", report.lost_items, report.found_items),
    );
    layout.kv("with dates", &report.dated_items.to_string());
    layout.kv("labeled queries", &report.labeled_lost.to_string());
    layout.kv(
        "direct / group",
        &format!("{} / {}", report.direct_labels, report.group_labels),
    );

    if let (Some(earliest), Some(latest)) = (report.earliest_date, report.latest_date) {
        layout.blank();
        layout.kv("date range", &format!("{earliest} to {latest}"));
    }
    emit_human(layout);
}
