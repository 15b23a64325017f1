// src/lib.rs
pub mod cli;
pub mod config;
pub mod error;
pub mod flags;
pub mod report;
pub mod samples;
pub mod tables;
pub mod types;

use indicatif::ProgressBar;
use rayon::prelude::*;
use std::path::Path;

pub use crate::config::ContaminationConfig;
pub use crate::error::{ContaminationError, Result};

use crate::flags::{
    check_frequencies, check_proportions, count_variants, secondary_assembly, secondary_size,
    SegmentFlagOutcome,
};
use crate::samples::{classify_primary, discover_samples, is_sample_folder};
use crate::types::{sample_report_path, FlagVector, SampleSummary, SegmentStates};

/// How a run treats failures and how many samples it evaluates at once.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Skip samples that fail instead of aborting the whole run
    pub keep_going: bool,
    /// Samples evaluated concurrently; 1 keeps the run fully sequential
    pub jobs: usize,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            keep_going: false,
            jobs: 1,
        }
    }
}

/// Everything a finished run produced besides the report files.
#[derive(Debug, Default)]
pub struct AnalysisResults {
    /// One summary per processed sample, in discovery order
    pub summaries: Vec<SampleSummary>,
    /// Directories under the root that are not IRMA output folders
    pub skipped: Vec<String>,
    /// Samples that failed (only filled with `keep_going`)
    pub failed: Vec<(String, ContaminationError)>,
}

impl AnalysisResults {
    pub fn flagged(&self) -> impl Iterator<Item = &SampleSummary> {
        self.summaries.iter().filter(|s| s.flagged)
    }

    /// Generate the aggregate report text on demand
    pub fn get_aggregate_report(&self) -> String {
        let mut output = String::new();
        for summary in &self.summaries {
            output.push_str(&report::render_summary_row(summary));
        }
        output
    }
}

/// Runs the contamination analysis on every sample folder under `root`.
///
/// The aggregate report is (re)created first and rows are appended in
/// discovery order as samples finish. Unless `options.keep_going` is set, the
/// first failing sample aborts the run; rows of earlier samples stay written.
pub fn analyze_samples(
    root: &Path,
    config: &ContaminationConfig,
    options: &RunOptions,
    progress: &ProgressBar,
) -> Result<AnalysisResults> {
    // 1. Fresh aggregate report
    report::init_aggregate_report(root)?;

    // 2. Find sample folders
    let (samples, skipped): (Vec<String>, Vec<String>) = discover_samples(root)?
        .into_iter()
        .partition(|name| is_sample_folder(&root.join(name)));
    for name in &skipped {
        log::debug!("Skipping {name}: not an IRMA output folder");
    }
    log::info!("Found {} sample folder(s) in {}", samples.len(), root.display());
    progress.set_length(samples.len() as u64);

    let jobs = options.jobs.max(1);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build()
        .map_err(|e| ContaminationError::ThreadPool(e.to_string()))?;

    let mut results = AnalysisResults {
        skipped,
        ..Default::default()
    };

    // 3. Evaluate samples batch by batch, appending rows in discovery order
    for batch in samples.chunks(jobs) {
        let outcomes: Vec<Result<SampleSummary>> = pool.install(|| {
            batch
                .par_iter()
                .map(|name| {
                    progress.set_message(name.clone());
                    let outcome = evaluate_sample(root, name, config);
                    progress.inc(1);
                    outcome
                })
                .collect()
        });

        let mut rows = Vec::with_capacity(batch.len());
        for (name, outcome) in batch.iter().zip(outcomes) {
            match outcome {
                Ok(summary) => rows.push(summary),
                Err(e) if options.keep_going => {
                    log::error!("{name}: {e}; skipping sample");
                    results.failed.push((name.clone(), e));
                }
                Err(e) => {
                    report::append_summaries(root, &rows)?;
                    return Err(e);
                }
            }
        }
        report::append_summaries(root, &rows)?;
        results.summaries.extend(rows);
    }

    Ok(results)
}

/// Classifies one sample folder, runs the five flags and writes its report.
pub fn evaluate_sample(root: &Path, name: &str, config: &ContaminationConfig) -> Result<SampleSummary> {
    let path = root.join(name);
    log_sample_banner(name);

    // Start from an empty report, even if classification fails
    report::create_with(&sample_report_path(&path, name), "")?;

    let sample = classify_primary(&path, name, config)?;
    let report_path = sample.report_path();
    report::append(&report_path, &report::render_primary_header(&sample))?;

    // 1. Minority variant count
    log::info!("--------1. Minority variant count--------");
    let mut states = SegmentStates::default();
    let flag1 = count_variants(&sample, config, &mut states)?;
    report::append(
        &report_path,
        &report::render_variant_counts(&sample, config, &flag1, &states),
    )?;

    // 2. and 3. only follow up on segments already flagged
    let mut flag2 = SegmentFlagOutcome::default();
    let mut flag3 = SegmentFlagOutcome::default();
    if flag1.raised {
        log::info!("--------2. Minority variant frequency--------");
        flag2 = check_frequencies(&sample, config, &flag1, &mut states)?;
        report::append(&report_path, &report::render_frequencies(&sample, config, &states))?;

        if flag2.raised {
            log::info!("--------3. High frequency proportion--------");
            flag3 = check_proportions(config, &flag2, &mut states);
            report::append(&report_path, &report::render_proportions(&sample, &flag3, &states))?;
        }
    }

    // 4. Secondary data size
    log::info!("--------4. Secondary data size--------");
    let size = secondary_size(&sample, config)?;
    report::append(&report_path, &report::render_secondary_size(&size))?;

    // 5. Secondary assembly
    log::info!("--------5. Secondary assembly--------");
    let assembly = secondary_assembly(&sample)?;
    report::append(&report_path, &report::render_secondary_assembly(&sample, &assembly))?;

    let flags = FlagVector {
        flags: [flag1.raised, flag2.raised, flag3.raised, size.raised, assembly.raised],
    };
    let flagged = flags.is_flagged(config.max_flags);
    log::info!("{name}: {} flag(s) raised, flagged = {flagged}", flags.raised_count());

    Ok(SampleSummary {
        sample: name.to_string(),
        flags,
        flagged,
    })
}

fn log_sample_banner(name: &str) {
    let border = "#".repeat(name.len() + 20);
    log::info!("{border}");
    log::info!("#         {name}         #");
    log::info!("{border}");
}
