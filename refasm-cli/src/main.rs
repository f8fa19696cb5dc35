mod app;

use std::path::Path;

use anyhow::Context;
use clap::Parser;
use refasm::refgen::{GenerationStats, JobSummary};

use crate::app::Cli;

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            std::process::exit(1);
        }
        // --help and --version
        Err(e) => e.exit(),
    };

    // Show refasm info+ on stderr; --verbose enables debug; RUST_LOG overrides
    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_module("refasm", level)
        .parse_default_env()
        .target(env_logger::Target::Stderr)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false)
        .init();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let summary = cli
        .job()
        .run()
        .with_context(|| format!("reference generation failed: {}", cli.path.display()))?;

    display_summary(&cli.path, &summary);
    Ok(())
}

fn display_summary(input: &Path, summary: &JobSummary) {
    let stats: &GenerationStats = &summary.stats;

    eprintln!(
        "Reference generation complete: {} -> {}",
        file_display_name(input),
        file_display_name(&summary.output)
    );
    eprintln!("  Types removed:       {}", stats.removed_types);
    eprintln!(
        "  Members removed:     {} methods, {} fields, {} properties, {} events",
        stats.removed_methods, stats.removed_fields, stats.removed_properties, stats.removed_events
    );
    eprintln!(
        "  Bodies purged:       {} ({} without IL body)",
        stats.purged_bodies, stats.skipped_bodies
    );
    eprintln!("  Attributes scrubbed: {}", stats.scrubbed_attributes);
}

fn file_display_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}
