use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::cli::{AppContext, InitArgs};
use crate::core::factory::{NoMatchPolicy, PathHeaderFactory};

const CONFIG_FILES: [&str; 4] = [
    "pathheader.toml",
    ".pathheader.toml",
    "pathheader.yaml",
    "pathheader.json",
];

/// How batch commands treat two paths that render to the same label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum CollisionPolicy
{
    /// Log and carry on
    #[default]
    Warn,
    /// Fail the command after reporting
    Deny,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config
{
    /// Rule table to load instead of the embedded one; `~` is expanded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules_file: Option<String>,

    /// What batch commands do with paths no rule matches
    pub no_match: NoMatchPolicy,

    /// Upper bound on cached classifications; unset keeps every result
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_capacity: Option<u64>,

    /// Display collision handling for batch commands
    pub collisions: CollisionPolicy,
}

impl Config
{
    /// Rule file to use: `--rules` first, then the config value.
    pub fn resolved_rules_file(
        &self,
        ctx: &AppContext,
    ) -> Option<PathBuf>
    {
        if let Some(path) = &ctx.rules
        {
            return Some(path.clone());
        }
        self.rules_file
            .as_deref()
            .map(|raw| PathBuf::from(shellexpand::tilde(raw).into_owned()))
    }

    /// Build an engine from this configuration.
    pub fn factory(
        &self,
        ctx: &AppContext,
    ) -> Result<PathHeaderFactory>
    {
        let mut builder = PathHeaderFactory::builder().cache_capacity(self.cache_capacity);
        if let Some(path) = self.resolved_rules_file(ctx)
        {
            builder = builder.rules_file(path);
        }
        builder
            .build()
            .context("Failed to load rule table")
    }
}

pub fn load_config() -> Result<Config>
{
    load_config_from(Path::new("."))
}

/// Layer the first config file found in `dir` under `PATHHEADER_*` env vars.
pub fn load_config_from(dir: &Path) -> Result<Config>
{
    let mut builder = config::Config::builder();

    for name in CONFIG_FILES
    {
        let path = dir.join(name);
        if path.exists()
        {
            builder = builder.add_source(config::File::from(path));
            break;
        }
    }

    // PATHHEADER_RULES_FILE, PATHHEADER_CACHE_CAPACITY, ...
    builder = builder.add_source(
        config::Environment::with_prefix("PATHHEADER")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let cfg = builder
        .build()
        .context("Failed to load configuration")?;
    let parsed: Config = cfg
        .try_deserialize()
        .context("Failed to parse configuration")?;

    Ok(parsed)
}

pub fn init(
    args: InitArgs,
    ctx: &AppContext,
) -> Result<()>
{
    let config_path = args
        .path
        .join(CONFIG_FILES[0]);

    if config_path.exists() && !args.force
    {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    let config = Config::default();
    let toml_string =
        toml::to_string_pretty(&config).context("Failed to serialize default config")?;

    std::fs::write(&config_path, toml_string).context("Failed to write config file")?;

    if !ctx.quiet
    {
        println!("Created config file at {}", config_path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests
{
    use super::*;

    fn ctx(rules: Option<&str>) -> AppContext
    {
        AppContext {
            quiet: true,
            no_color: true,
            rules: rules.map(PathBuf::from),
        }
    }

    #[test]
    fn default_config_round_trips_through_toml()
    {
        let text = toml::to_string_pretty(&Config::default()).unwrap();
        assert!(text.contains("no_match = \"fail\""));
        assert!(!text.contains("rules_file"));
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back.collisions, CollisionPolicy::Warn);
    }

    #[test]
    fn file_values_are_read()
    {
        let dir = assert_fs::TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("pathheader.toml"),
            "no_match = \"collect\"\ncache_capacity = 500\ncollisions = \"deny\"\n",
        )
        .unwrap();

        let cfg = load_config_from(dir.path()).unwrap();
        assert_eq!(cfg.no_match, NoMatchPolicy::Collect);
        assert_eq!(cfg.cache_capacity, Some(500));
        assert_eq!(cfg.collisions, CollisionPolicy::Deny);
    }

    #[test]
    fn cli_rules_flag_wins()
    {
        let cfg = Config {
            rules_file: Some("~/rules.txt".into()),
            ..Config::default()
        };
        assert_eq!(
            cfg.resolved_rules_file(&ctx(Some("mine.txt"))),
            Some(PathBuf::from("mine.txt"))
        );
        let expanded = cfg
            .resolved_rules_file(&ctx(None))
            .unwrap();
        assert!(expanded.ends_with("rules.txt"));
    }
}
