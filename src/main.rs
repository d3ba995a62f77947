use anyhow::Result;
use clap::Parser;
use pathheader::cli::{AppContext, Cli, Commands};
use pathheader::cli_ext::{classify_cmd, rules_cmd, tree_cmd};
use pathheader::core::PathHeaderError;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.no_color {
        owo_colors::set_override(false);
    }

    // Build a context once, pass everywhere
    let ctx = AppContext {
        quiet: cli.quiet,
        no_color: cli.no_color,
        rules: cli.rules,
    };

    let result = match cli.command {
        Commands::Classify(args) => classify_cmd::run_classify(args, &ctx),
        Commands::Sort(args) => classify_cmd::run_sort(args, &ctx),
        Commands::Tree(args) => tree_cmd::run(args, &ctx),
        Commands::Rules(args) => rules_cmd::run(args, &ctx),
        Commands::Init(args) => pathheader::infra::config::init(args, &ctx),
        Commands::Completions(args) => pathheader::completion::run(args, &ctx),
    };

    // Rule table defects get the labeled source view
    if let Err(err) = &result {
        if let Some(PathHeaderError::RuleLoad(diag)) = err.downcast_ref::<PathHeaderError>() {
            eprintln!("{:?}", miette::Report::new((**diag).clone()));
            std::process::exit(1);
        }
    }
    result
}

/// RUST_LOG wins; otherwise warn, raised by each `-v`.
fn init_tracing(verbose: u8) {
    let filter = match std::env::var("RUST_LOG") {
        Ok(_) => EnvFilter::from_default_env(),
        Err(_) => EnvFilter::new(match verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
