use std::io::Write;
use std::path::Path;

use anyhow::{bail, Context, Result};
use fpxref_core::{build_index, load_lookups, select_files, summarize, IndexConfig, RunReport};
use tracing::info;

pub fn build(cfg: &IndexConfig, json: bool, out: &mut impl Write) -> Result<()> {
    info!(
        input = %cfg.input_dir.display(),
        output = %cfg.output_dir.display(),
        budget = cfg.size_budget,
        "building lookup tables"
    );
    let report = build_index(cfg).with_context(|| {
        format!(
            "failed to build lookups from {} into {}",
            cfg.input_dir.display(),
            cfg.output_dir.display()
        )
    })?;
    if json {
        serde_json::to_writer_pretty(&mut *out, &report)?;
        writeln!(out)?;
    } else {
        write_report(&report, cfg, out)?;
    }
    Ok(())
}

fn write_report(report: &RunReport, cfg: &IndexConfig, out: &mut impl Write) -> Result<()> {
    writeln!(
        out,
        "selected {} of {} files ({} bytes, budget {})",
        report.selected_files, report.candidates, report.selected_bytes, cfg.size_budget
    )?;
    if !report.budget_exhausted {
        writeln!(out, "all files fit the budget")?;
    }
    writeln!(out, "paths: {}", report.paths)?;
    writeln!(out, "attributes: {}", report.attributes)?;
    writeln!(
        out,
        "cross-reference rows: {} ({} attribute references)",
        report.cross_ref_rows, report.attribute_references
    )?;
    writeln!(out, "warnings: {}", report.warnings.len())?;
    for warning in &report.warnings {
        writeln!(out, "  {warning}")?;
    }
    writeln!(out, "lookups written to {}", cfg.output_dir.display())?;
    Ok(())
}

pub fn select(input: &Path, budget: u64, json: bool, out: &mut impl Write) -> Result<()> {
    let selection = select_files(input, budget)
        .with_context(|| format!("failed to list {}", input.display()))?;
    if json {
        serde_json::to_writer_pretty(&mut *out, &selection)?;
        writeln!(out)?;
        return Ok(());
    }
    let mut cumulative = 0u64;
    for file in &selection.files {
        cumulative += file.size;
        writeln!(out, "{}\t{}\t{}", file.name, file.size, cumulative)?;
    }
    info!(
        selected = selection.len(),
        candidates = selection.candidates,
        bytes = selection.total_bytes,
        budget_exhausted = selection.budget_exhausted,
        "selection complete"
    );
    Ok(())
}

pub fn stats(dir: &Path, json: bool, out: &mut impl Write) -> Result<()> {
    let lookups = load_lookups(dir)
        .with_context(|| format!("failed to load lookups from {}", dir.display()))?;
    let summary = summarize(&lookups);
    if json {
        serde_json::to_writer_pretty(&mut *out, &summary)?;
        writeln!(out)?;
    } else {
        writeln!(out, "paths: {}", summary.paths)?;
        writeln!(out, "attributes: {}", summary.attributes)?;
        writeln!(
            out,
            "cross-reference rows: {} ({} empty, longest {})",
            summary.cross_ref_rows, summary.empty_rows, summary.longest_row
        )?;
        writeln!(out, "attribute references: {}", summary.attribute_references)?;
    }
    if !summary.is_consistent() {
        bail!(
            "inconsistent lookups in {}: {} unknown path ids, {} unknown attribute ids",
            dir.display(),
            summary.unknown_path_ids.len(),
            summary.unknown_attribute_ids.len()
        );
    }
    Ok(())
}
