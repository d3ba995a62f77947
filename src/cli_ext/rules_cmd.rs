//! `rules`: the loaded table with per-rule hit counts.

use anyhow::Result;
use owo_colors::{OwoColorize, Stream};
use serde::Serialize;
use tabled::{Table, Tabled};

use crate::cli::{AppContext, InputArgs, OutputFormat, RulesArgs};
use crate::cli_ext::classify_cmd::classify_input;
use crate::core::factory::{NoMatchPolicy, PathHeaderFactory};
use crate::infra::config::load_config;

#[derive(Debug, Serialize, Tabled)]
pub struct RuleRow {
    pub line: usize,
    pub hits: u64,
    pub status: String,
    pub template: String,
    pub pattern: String,
}

pub fn run(args: RulesArgs, ctx: &AppContext) -> Result<()> {
    let config = load_config()?;
    let factory = config.factory(ctx)?;

    // Hits only mean something after a pass over real paths
    if args.input.is_some() {
        let input = InputArgs {
            input: args.input.clone(),
            no_match: Some(NoMatchPolicy::Collect),
        };
        classify_input(&factory, &config, &input, ctx)?;
    }

    let rows = rule_rows(&factory, args.unused);

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
        OutputFormat::Table => println!("{}", Table::new(&rows)),
        OutputFormat::Text => {
            for row in &rows {
                println!(
                    "{}\t{}\t{}\t{}",
                    row.line.if_supports_color(Stream::Stdout, |t| t.dimmed()),
                    row.hits,
                    row.pattern,
                    row.template.if_supports_color(Stream::Stdout, |t| t.cyan())
                );
            }
        }
    }

    // Summary
    if !ctx.quiet {
        let unused = factory.unmatched_rules().len();
        eprintln!(
            "{} rules, {} unused",
            factory.table().len(),
            unused.if_supports_color(Stream::Stderr, |t| t.yellow())
        );
    }
    Ok(())
}

/// One row per rule in table order; `unused_only` keeps rules with no hits.
pub fn rule_rows(factory: &PathHeaderFactory, unused_only: bool) -> Vec<RuleRow> {
    factory
        .rule_hits()
        .into_iter()
        .filter(|(_, hits)| !unused_only || *hits == 0)
        .map(|(rule, hits)| RuleRow {
            line: rule.line_no(),
            hits,
            status: rule.status().to_string(),
            template: rule.template().raw().to_string(),
            pattern: rule.pattern().to_string(),
        })
        .collect()
}
