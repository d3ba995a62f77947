//! `tree`: the sorted classification as Section → Page → Header → Code.

use std::sync::Arc;

use anyhow::Result;
use owo_colors::{OwoColorize, Stream};
use ptree::TreeBuilder;
use serde::Serialize;

use crate::cli::{AppContext, OutputFormat, SortArgs};
use crate::cli_ext::classify_cmd::{classify_input, report_unmatched};
use crate::core::header::PathHeader;
use crate::infra::config::load_config;

#[derive(Debug, Serialize)]
pub struct SectionNode {
    pub section: String,
    pub pages: Vec<PageNode>,
}

#[derive(Debug, Serialize)]
pub struct PageNode {
    pub page: String,
    pub headers: Vec<HeaderNode>,
}

#[derive(Debug, Serialize)]
pub struct HeaderNode {
    pub header: String,
    pub codes: Vec<CodeLeaf>,
}

#[derive(Debug, Serialize)]
pub struct CodeLeaf {
    pub code: String,
    pub path: String,
}

pub fn run(args: SortArgs, ctx: &AppContext) -> Result<()> {
    let config = load_config()?;
    let factory = config.factory(ctx)?;
    let report = classify_input(&factory, &config, &args.input, ctx)?;
    let sections = group(&report.headers);

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&sections)?),
        _ => {
            print_tree(&sections)?;
            report_unmatched(&report, ctx);
        }
    }
    Ok(())
}

/// Fold headers, already in display order, into nested levels.
pub fn group(headers: &[Arc<PathHeader>]) -> Vec<SectionNode> {
    let mut sections: Vec<SectionNode> = Vec::new();

    for h in headers {
        // Open a new node whenever a level changes
        let section = h.section().to_string();
        if sections.last().is_none_or(|s| s.section != section) {
            sections.push(SectionNode { section, pages: Vec::new() });
        }
        let last = sections.len() - 1;
        let pages = &mut sections[last].pages;

        let page = h.page().to_string();
        if pages.last().is_none_or(|p| p.page != page) {
            pages.push(PageNode { page, headers: Vec::new() });
        }
        let last = pages.len() - 1;
        let groups = &mut pages[last].headers;

        if groups.last().is_none_or(|g| g.header != h.header()) {
            groups.push(HeaderNode { header: h.header().to_string(), codes: Vec::new() });
        }
        let last = groups.len() - 1;
        groups[last].codes.push(CodeLeaf {
            code: h.code().to_string(),
            path: h.original_path().to_string(),
        });
    }

    sections
}

fn print_tree(sections: &[SectionNode]) -> Result<()> {
    let mut builder = TreeBuilder::new("PathHeader".to_string());

    for s in sections {
        builder.begin_child(format!("{}", s.section.if_supports_color(Stream::Stdout, |t| t.bold())));
        for p in &s.pages {
            builder.begin_child(format!("{}", p.page.if_supports_color(Stream::Stdout, |t| t.cyan())));
            for g in &p.headers {
                builder.begin_child(g.header.clone());
                for c in &g.codes {
                    builder.add_empty_child(format!(
                        "{}  {}",
                        c.code.if_supports_color(Stream::Stdout, |t| t.green()),
                        c.path.if_supports_color(Stream::Stdout, |t| t.dimmed())
                    ));
                }
                builder.end_child();
            }
            builder.end_child();
        }
        builder.end_child();
    }

    let tree = builder.build();
    ptree::print_tree(&tree)?;
    Ok(())
}
