//! Rule table loader.
//!
//! A table is a sequence of `PATTERN<TAB>TEMPLATE` lines. Order is priority:
//! the first pattern that matches a whole path decides its classification.
//!
//! ```text
//! # comment
//! %CAL=(gregorian|buddhist|japanese)
//! //ldml/dates/calendars/calendar[@type="%CAL"]/months/.*	Date & Time;&calendar($1);...
//! ```
//!
//! Loading also drives the [`OrderingRegistrar`]: each rule's raw Header and
//! Code text is registered in file order, so chronological orders depend only
//! on the table and never on which paths happen to be classified first.

use std::path::Path;
use std::sync::LazyLock;

use regex::{Regex, RegexSet};
use tracing::{debug, info, instrument};

use crate::core::error::{PathHeaderError, Result, RuleLoadError};
use crate::core::functions::FunctionRegistry;
use crate::core::ids::{PageId, SectionId, SurveyToolStatus};
use crate::core::registrar::{OrderingRegistrar, Scope};
use crate::core::template::Template;

/// The rule table compiled into the binary.
pub const BUILTIN_RULES: &str = include_str!("../../data/PathHeader.txt");

/// One compiled rule.
#[derive(Debug, Clone)]
pub struct Rule {
    line_no: usize,
    pattern: String,
    regex: Regex,
    template: Template,
    header_order: i32,
    code_order: i32,
}

impl Rule {
    /// 1-based line in the source table
    pub fn line_no(&self) -> usize {
        self.line_no
    }

    /// Pattern after variable expansion, before anchoring
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    pub fn status(&self) -> SurveyToolStatus {
        self.template.status.unwrap_or_default()
    }

    /// Chronological order of this rule's Header text within its page
    pub fn header_order(&self) -> i32 {
        self.header_order
    }

    /// Chronological order of this rule's Code text within its page
    pub fn code_order(&self) -> i32 {
        self.code_order
    }
}

/// Immutable, ordered list of rules plus a set matcher over all patterns.
#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: Vec<Rule>,
    set: RegexSet,
}

impl RuleTable {
    /// Parse `source`, resolving function names against `functions` and
    /// registering chronological orders in `registrar`.
    ///
    /// # Errors
    ///
    /// [`PathHeaderError::RuleLoad`] for any malformed line,
    /// [`PathHeaderError::OrderingConsistency`] for a `*value` reference to a
    /// value no earlier rule declared.
    #[instrument(skip_all, fields(bytes = source.len()))]
    pub fn parse(
        source: &str,
        functions: &FunctionRegistry,
        registrar: &mut OrderingRegistrar,
    ) -> Result<Self> {
        let mut vars: Vec<(String, String)> = Vec::new();
        let mut rules = Vec::new();

        for (i, line) in source.lines().enumerate() {
            let line_no = i + 1;
            let trimmed = line.trim_end();
            if trimmed.trim_start().is_empty() || trimmed.starts_with('#') {
                continue;
            }

            // A rule may open with a variable reference; only tab-free lines define one
            if let Some(def) = trimmed.strip_prefix('%').filter(|d| !d.contains('\t')) {
                let (name, value) = parse_variable(def)
                    .ok_or_else(|| RuleLoadError::new(line_no, line, "variable must be %NAME=REGEX"))?;
                let value = expand_variables(value, &vars)
                    .map_err(|reason| RuleLoadError::new(line_no, line, reason))?;
                debug!(name = %name, value = %value, "rule variable");
                vars.retain(|(n, _)| n != name);
                vars.push((name.to_string(), value));
                // Longest first so %CALENDAR is not eaten by %CAL
                vars.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
                continue;
            }

            let rule = compile_rule(line_no, line, &vars, functions)?;
            let rule = register_orders(rule, registrar)?;
            rules.push(rule);
        }

        // Indexes line up with `rules`
        let set = RegexSet::new(rules.iter().map(|r| r.regex.as_str()))
            .map_err(|e| RuleLoadError::new(0, "", format!("cannot build rule set: {e}")))?;

        info!(rules = rules.len(), "rule table loaded");
        Ok(Self { rules, set })
    }

    /// Read and parse a table from disk.
    pub fn load(
        path: &Path,
        functions: &FunctionRegistry,
        registrar: &mut OrderingRegistrar,
    ) -> Result<Self> {
        let source = std::fs::read_to_string(path).map_err(|e| PathHeaderError::Io {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
        Self::parse(&source, functions, registrar)
    }

    /// Parse the embedded table.
    pub fn builtin(functions: &FunctionRegistry, registrar: &mut OrderingRegistrar) -> Result<Self> {
        Self::parse(BUILTIN_RULES, functions, registrar)
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Set matcher whose indexes line up with [`RuleTable::rules`].
    pub fn set(&self) -> &RegexSet {
        &self.set
    }
}

fn parse_variable(def: &str) -> Option<(&str, &str)> {
    let (name, value) = def.split_once('=')?;
    let valid = !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    valid.then_some((name, value.trim()))
}

/// Replace `%NAME` references. `vars` is already longest-name-first.
fn expand_variables(pattern: &str, vars: &[(String, String)]) -> std::result::Result<String, String> {
    let mut out = pattern.to_string();
    for (name, value) in vars {
        out = out.replace(&format!("%{name}"), value);
    }
    // Any name still standing after substitution was never defined
    match UNDEFINED_VARIABLE.find(&out) {
        Some(m) => Err(format!("undefined variable {}", m.as_str())),
        None => Ok(out),
    }
}

static UNDEFINED_VARIABLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%[A-Za-z][A-Za-z0-9_]*").expect("valid variable regex"));

/// `[@` starts an attribute selector, never a character class.
fn escape_attribute_brackets(pattern: &str) -> String {
    pattern.replace(r"\[@", "[@").replace("[@", r"\[@")
}

fn compile_rule(
    line_no: usize,
    line: &str,
    vars: &[(String, String)],
    functions: &FunctionRegistry,
) -> Result<Rule> {
    let fail = |reason: String| RuleLoadError::new(line_no, line, reason);

    let (pattern, template) = line
        .split_once('\t')
        .ok_or_else(|| fail("expected PATTERN<TAB>TEMPLATE".into()))?;
    let template = template.trim_start_matches('\t').trim();
    if pattern.is_empty() || template.is_empty() {
        return Err(fail("expected PATTERN<TAB>TEMPLATE".into()).into());
    }

    let pattern = escape_attribute_brackets(&expand_variables(pattern, vars).map_err(fail)?);
    let regex = Regex::new(&format!("^(?:{pattern})$")).map_err(|e| fail(format!("bad pattern: {e}")))?;
    let template = Template::parse(template, functions).map_err(fail)?;

    // Every $n must name a real group
    let groups = regex.captures_len() - 1;
    if template.max_group() > groups {
        return Err(fail(format!(
            "template uses ${} but the pattern has {groups} group(s)",
            template.max_group()
        ))
        .into());
    }

    // Literal Section/Page are checked now rather than on first use
    if template.section.is_literal() {
        let section = SectionId::parse(template.section.raw()).map_err(|e| fail(e.to_string()))?;
        if template.page.is_literal() {
            PageId::parse(section, template.page.raw()).map_err(|e| fail(e.to_string()))?;
        }
    }

    Ok(Rule { line_no, pattern, regex, template, header_order: 0, code_order: 0 })
}

fn register_orders(mut rule: Rule, registrar: &mut OrderingRegistrar) -> Result<Rule> {
    // Page spellings repeat across sections, so the scope is both
    let page = format!("{};{}", rule.template.section.raw(), rule.template.page.raw());
    rule.header_order = registrar
        .resolve(Scope::Header { page: &page }, rule.template.header.raw())?
        .order;
    rule.code_order = registrar
        .resolve(Scope::Code { page: &page }, rule.template.code.raw())?
        .order;
    Ok(rule)
}
