//! `coda eval` - score an annotated file against ground truth.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};

use coda_core::AnnotationSet;
use coda_evals::{EvalReport, Evaluator};

use crate::config::CodaConfig;

/// Eval arguments.
#[derive(Args, Debug)]
pub struct EvalArgs {
    /// Machine-annotated document
    pub auto: PathBuf,

    /// Human-annotated ground truth
    pub gt: PathBuf,

    /// Inclusive confidence threshold (overrides config)
    #[arg(long)]
    pub min_confidence: Option<f64>,

    /// Print the raw JSON report instead of tables
    #[arg(long)]
    pub json: bool,
}

/// Run eval command.
pub fn run(args: EvalArgs, config: CodaConfig) -> Result<()> {
    let auto = AnnotationSet::from_path(&args.auto)
        .with_context(|| format!("failed to load {}", args.auto.display()))?;
    let gt = AnnotationSet::from_path(&args.gt)
        .with_context(|| format!("failed to load {}", args.gt.display()))?;

    let min_confidence = args.min_confidence.unwrap_or(config.min_confidence);
    let evaluator = Evaluator::new(&auto, &gt);
    let report = evaluator.evaluate(min_confidence);

    for warning in evaluator.warnings() {
        eprintln!("Warning: {warning}");
    }
    if evaluator.skipped() > 0 {
        eprintln!(
            "Skipped {} auto entries with no ground-truth counterpart.",
            evaluator.skipped()
        );
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report, min_confidence);
    }
    Ok(())
}

fn print_report(report: &EvalReport, min_confidence: f64) {
    println!(
        "Evaluated {} aligned entries at min confidence {min_confidence}.",
        report.global.evaluated_entries
    );
    println!();

    let mut global = metrics_table(vec!["Precision", "Recall", "F1"]);
    global.add_row(vec![
        format!("{:.3}", report.global.precision),
        format!("{:.3}", report.global.recall),
        format!("{:.3}", report.global.f1),
    ]);
    println!("Global:");
    println!("{global}");

    if !report.per_theme.is_empty() {
        let mut table = metrics_table(vec!["Theme", "Precision", "Recall", "F1"]);
        for (theme, metrics) in &report.per_theme {
            table.add_row(vec![
                theme.clone(),
                format!("{:.3}", metrics.precision),
                format!("{:.3}", metrics.recall),
                format!("{:.3}", metrics.f1),
            ]);
        }
        println!();
        println!("Per theme:");
        println!("{table}");
    }

    if !report.per_code.is_empty() {
        let mut table = metrics_table(vec!["Theme|Code", "Precision", "Recall", "F1"]);
        for (code, metrics) in &report.per_code {
            table.add_row(vec![
                code.clone(),
                format!("{:.3}", metrics.precision),
                format!("{:.3}", metrics.recall),
                format!("{:.3}", metrics.f1),
            ]);
        }
        println!();
        println!("Per code:");
        println!("{table}");
    }
}

fn metrics_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header);
    table
}
