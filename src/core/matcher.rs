//! Path cleaning and first-match rule lookup.

use std::sync::LazyLock;

use regex::Regex;

use crate::core::rules::{Rule, RuleTable};

static QUALIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\[@(alt|draft|references)="([^"]*)"\]"#).expect("valid qualifier regex")
});

/// A path with its orthogonal qualifiers pulled out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanPath {
    /// Path handed to the rule patterns: no alt, draft or references
    pub path: String,
    /// Alt form to re-append to the Code as `-alt`
    pub alt: Option<String>,
    /// Cache key and stored original path: draft and references removed, alt
    /// normalised to its kept form
    pub key: String,
}

/// Strip `alt`, `draft` and `references` qualifiers.
///
/// `alt="proposed..."` is dropped entirely; `alt="X-proposed..."` keeps `X`.
pub fn clean_path(path: &str) -> CleanPath {
    // Fast path: no attributes at all
    if !path.contains("[@") {
        return CleanPath { path: path.to_string(), alt: None, key: path.to_string() };
    }

    let mut alt = None;
    let mut clean = String::with_capacity(path.len());
    let mut key = String::with_capacity(path.len());
    let mut last = 0;

    for caps in QUALIFIER.captures_iter(path) {
        let Some(whole) = caps.get(0) else { continue };
        clean.push_str(&path[last..whole.start()]);
        key.push_str(&path[last..whole.start()]);
        last = whole.end();

        // draft and references vanish from both forms
        if &caps[1] == "alt" {
            if let Some(kept) = kept_alt(&caps[2]) {
                key.push_str(&format!("[@alt=\"{kept}\"]"));
                alt = Some(kept.to_string());
            }
        }
    }
    clean.push_str(&path[last..]);
    key.push_str(&path[last..]);

    CleanPath { path: clean, alt, key }
}

fn kept_alt(value: &str) -> Option<&str> {
    if value.starts_with("proposed") {
        return None;
    }
    match value.find("-proposed") {
        Some(at) => Some(&value[..at]),
        None => Some(value),
    }
}

/// The winning rule for a path and the text of its capture groups.
#[derive(Debug)]
pub struct Match<'t, 'p> {
    /// Position of the rule in its table
    pub index: usize,
    pub rule: &'t Rule,
    /// Group 0 is the whole path; groups that did not participate are empty
    pub groups: Vec<&'p str>,
}

/// First rule, in table order, whose pattern matches the whole path.
pub fn first_match<'t, 'p>(table: &'t RuleTable, path: &'p str) -> Option<Match<'t, 'p>> {
    // One pass over every pattern, then captures from the winner only
    let index = table.set().matches(path).iter().next()?;
    let rule = &table.rules()[index];
    let caps = rule.regex().captures(path)?;
    let groups = caps
        .iter()
        .map(|m| m.map_or("", |m| m.as_str()))
        .collect();
    Some(Match { index, rule, groups })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::functions::FunctionRegistry;
    use crate::core::registrar::OrderingRegistrar;

    #[test]
    fn plain_paths_pass_through() {
        let c = clean_path("//ldml/numbers/symbols/decimal");
        assert_eq!(c.path, c.key);
        assert_eq!(c.alt, None);
    }

    #[test]
    fn alt_is_pulled_out_and_kept_in_the_key() {
        let c = clean_path(r#"//ldml/localeDisplayNames/territories/territory[@type="HK"][@alt="short"]"#);
        assert_eq!(c.path, r#"//ldml/localeDisplayNames/territories/territory[@type="HK"]"#);
        assert_eq!(c.alt.as_deref(), Some("short"));
        assert!(c.key.ends_with(r#"[@alt="short"]"#));
    }

    #[test]
    fn proposed_alts_are_dropped() {
        let c = clean_path(r#"//ldml/x[@type="a"][@alt="proposed-x10"]"#);
        assert_eq!(c.alt, None);
        assert_eq!(c.key, r#"//ldml/x[@type="a"]"#);

        let v = clean_path(r#"//ldml/x[@type="a"][@alt="variant-proposed-u1"]"#);
        assert_eq!(v.alt.as_deref(), Some("variant"));
        assert_eq!(v.key, r#"//ldml/x[@type="a"][@alt="variant"]"#);
    }

    #[test]
    fn draft_and_references_never_reach_the_key() {
        let c = clean_path(r#"//ldml/x[@draft="contributed"][@references="R1"]/y"#);
        assert_eq!(c.path, "//ldml/x/y");
        assert_eq!(c.key, "//ldml/x/y");
    }

    #[test]
    fn first_rule_in_table_order_wins() {
        let src = "//ldml/(a)\tSpecial;Unknown;first;$1\n//ldml/(.*)\tSpecial;Unknown;second;$1";
        let table =
            RuleTable::parse(src, &FunctionRegistry::builtin(), &mut OrderingRegistrar::new()).unwrap();

        let m = first_match(&table, "//ldml/a").unwrap();
        assert_eq!(m.index, 0);
        assert_eq!(m.groups, ["//ldml/a", "a"]);

        let m = first_match(&table, "//ldml/b/c").unwrap();
        assert_eq!(m.index, 1);
        assert_eq!(m.groups[1], "b/c");

        assert!(first_match(&table, "//other").is_none());
    }

    #[test]
    fn optional_groups_are_empty() {
        let src = "//ldml/a(/b)?\tSpecial;Unknown;A;x$1";
        let table =
            RuleTable::parse(src, &FunctionRegistry::builtin(), &mut OrderingRegistrar::new()).unwrap();
        let m = first_match(&table, "//ldml/a").unwrap();
        assert_eq!(m.groups, ["//ldml/a", ""]);
    }
}
