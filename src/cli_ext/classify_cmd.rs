//! `classify` and `sort`, plus the input and reporting helpers the other
//! batch commands share.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::{OwoColorize, Stream};
use serde_json::json;
use tabled::{Table, Tabled};
use tracing::instrument;

use crate::cli::{AppContext, ClassifyArgs, InputArgs, OutputFormat, SortArgs};
use crate::core::factory::{BatchReport, PathHeaderFactory};
use crate::core::header::PathHeader;
use crate::infra::config::{CollisionPolicy, Config, load_config};
use crate::infra::io::read_paths;

#[derive(Tabled)]
struct HeaderRow {
    section: String,
    page: String,
    header: String,
    code: String,
    status: String,
    path: String,
}

impl From<&PathHeader> for HeaderRow {
    fn from(h: &PathHeader) -> Self {
        Self {
            section: h.section().to_string(),
            page: h.page().to_string(),
            header: h.header().to_string(),
            code: h.code().to_string(),
            status: h.status().to_string(),
            path: h.original_path().to_string(),
        }
    }
}

#[instrument(skip_all, fields(paths = args.paths.len()))]
pub fn run_classify(args: ClassifyArgs, ctx: &AppContext) -> Result<()> {
    let config = load_config()?;
    let factory = config.factory(ctx)?;

    let mut headers = Vec::with_capacity(args.paths.len());
    for path in &args.paths {
        let header = match &args.value {
            Some(value) => factory.classify_with_value(path, value),
            None => factory.classify(path),
        }
        .with_context(|| format!("Failed to classify {path}"))?;
        headers.push(header);
    }

    match args.format {
        OutputFormat::Json => {
            let items: Vec<&PathHeader> = headers.iter().map(Arc::as_ref).collect();
            println!("{}", serde_json::to_string_pretty(&items)?);
        }
        format => print_headers(&headers, format),
    }
    Ok(())
}

#[instrument(skip_all)]
pub fn run_sort(args: SortArgs, ctx: &AppContext) -> Result<()> {
    let config = load_config()?;
    let factory = config.factory(ctx)?;
    let report = classify_input(&factory, &config, &args.input, ctx)?;

    match args.format {
        OutputFormat::Json => {
            let headers: Vec<&PathHeader> = report.headers.iter().map(Arc::as_ref).collect();
            let output = json!({
                "headers": headers,
                "unmatched": report.unmatched,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        format => {
            // Results on stdout, unmatched summary on stderr
            print_headers(&report.headers, format);
            report_unmatched(&report, ctx);
        }
    }
    Ok(())
}

/// Read the input list, classify it in parallel and apply the collision policy.
pub(crate) fn classify_input(
    factory: &PathHeaderFactory,
    config: &Config,
    input: &InputArgs,
    ctx: &AppContext,
) -> Result<BatchReport> {
    // Load input
    let paths = read_paths(input.input.as_deref())?;
    let policy = input.no_match.unwrap_or(config.no_match);

    // Classify with a spinner on stderr
    let spinner = spinner(ctx, paths.len());
    let report = factory.classify_batch(&paths, policy);
    spinner.finish_and_clear();
    let report = report.context("Failed to classify input paths")?;

    // Collisions only show up once the whole batch is in
    check_collisions(factory, config, ctx)?;
    Ok(report)
}

fn spinner(ctx: &AppContext, count: usize) -> ProgressBar {
    if ctx.quiet {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}") {
        pb.set_style(style);
    }
    pb.set_message(format!("Classifying {count} paths"));
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn check_collisions(factory: &PathHeaderFactory, config: &Config, ctx: &AppContext) -> Result<()> {
    let collisions = factory.display_collisions();
    if collisions.is_empty() {
        return Ok(());
    }

    if !ctx.quiet {
        for c in &collisions {
            eprintln!(
                "{} {}\n  {}\n  {}",
                "collision".if_supports_color(Stream::Stderr, |t| t.yellow()),
                c.label.replace('\t', " | "),
                c.first_path,
                c.second_path
            );
        }
    }
    if config.collisions == CollisionPolicy::Deny {
        anyhow::bail!("{} display collision(s) found", collisions.len());
    }
    Ok(())
}

pub(crate) fn report_unmatched(report: &BatchReport, ctx: &AppContext) {
    if ctx.quiet || report.unmatched.is_empty() {
        return;
    }
    eprintln!(
        "{} {} path(s) matched no rule",
        "warning".if_supports_color(Stream::Stderr, |t| t.yellow()),
        report.unmatched.len()
    );
    for path in &report.unmatched {
        eprintln!("  {path}");
    }
}

fn print_headers(headers: &[Arc<PathHeader>], format: OutputFormat) {
    if let OutputFormat::Table = format {
        let rows: Vec<HeaderRow> = headers.iter().map(|h| HeaderRow::from(h.as_ref())).collect();
        println!("{}", Table::new(rows));
        return;
    }

    for h in headers {
        println!(
            "{}\t{}\t{}\t{}\t{}\t{}",
            h.section().if_supports_color(Stream::Stdout, |t| t.bold()),
            h.page().if_supports_color(Stream::Stdout, |t| t.cyan()),
            h.header(),
            h.code().if_supports_color(Stream::Stdout, |t| t.green()),
            h.status().if_supports_color(Stream::Stdout, |t| t.dimmed()),
            h.original_path()
        );
    }
}
