use clap::Parser;
use env_logger::Builder;
use indicatif::{ProgressBar, ProgressStyle};
use log::LevelFilter;
use std::env;
use std::process;

use flu_contam::analyze_samples;
use flu_contam::cli::Args;
use flu_contam::report::aggregate_report_path;

fn usage() -> ! {
    eprintln!("\nUsage: flu-contam [--root <DIR>]");
    eprintln!("Your current working directory (or --root) has to be where the IRMA output folders are (e.g. .../run/human)");
    process::exit(1);
}

fn main() {
    let args = Args::parse();

    let log_level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    Builder::new()
        .filter_level(log_level)
        .parse_default_env()
        .init();

    let root = match args.root.clone() {
        Some(root) => root,
        None => match env::current_dir() {
            Ok(dir) => dir,
            Err(e) => {
                log::error!("Cannot read current directory: {e}");
                usage();
            }
        },
    };

    // 1. Progress over sample folders
    let progress = ProgressBar::new(0);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .tick_strings(&[
                "⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏",
            ]),
    );

    // 2. Run the analysis
    let results = match analyze_samples(&root, &args.config(), &args.run_options(), &progress) {
        Ok(results) => results,
        Err(e) => {
            progress.abandon();
            log::error!("{e}");
            usage();
        }
    };

    progress.finish_with_message("Contamination report done!");

    // 3. Final summary
    let flagged: Vec<&str> = results.flagged().map(|s| s.sample.as_str()).collect();
    log::info!(
        "{} sample(s) analysed, {} flagged{}",
        results.summaries.len(),
        flagged.len(),
        if flagged.is_empty() {
            String::new()
        } else {
            format!(": {}", flagged.join(", "))
        }
    );
    if !results.failed.is_empty() {
        log::warn!("{} sample(s) failed and were skipped", results.failed.len());
    }
    log::info!("Aggregate report written to {}", aggregate_report_path(&root).display());
}
