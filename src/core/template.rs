//! Rule templates and their two-pass interpreter.
//!
//! A template is `Section;Page;Header;Code[;Status]`. Each field is parsed
//! once, at load, into literal text, `$n` capture references and
//! `&name(arg)` calls bound to a registered [`TransformFn`]. Expansion first
//! substitutes captures, then runs the calls left to right. Because calls are
//! resolved at parse time, captured text that happens to contain `&` is never
//! executed.

use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::core::error::{PathHeaderError, Result};
use crate::core::functions::{FunctionRegistry, OrderHint, TransformFn};
use crate::core::ids::{PageId, SectionId, SurveyToolStatus};

static CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&([A-Za-z][A-Za-z0-9_]*)\(([^)]*)\)").expect("valid call regex"));

static OPEN_CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&[A-Za-z][A-Za-z0-9_]*\(").expect("valid open-call regex"));

static GROUP_REF: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$[0-9]").expect("valid group regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Text(String),
    Group(usize),
}

#[derive(Clone)]
enum Piece {
    Text(Vec<Part>),
    Call {
        function: Arc<dyn TransformFn>,
        arg: Vec<Part>,
    },
}

impl std::fmt::Debug for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Piece::Text(parts) => f.debug_tuple("Text").field(parts).finish(),
            Piece::Call { function, arg } => f
                .debug_struct("Call")
                .field("function", &function.name())
                .field("arg", arg)
                .finish(),
        }
    }
}

/// One parsed template field.
#[derive(Debug, Clone)]
pub struct Field {
    raw: String,
    lookup_only: bool,
    pieces: Vec<Piece>,
}

impl Field {
    /// Parse a field. A leading `*` marks a lookup-only ordering reference and
    /// is not part of the displayed text.
    pub fn parse(raw: &str, functions: &FunctionRegistry) -> std::result::Result<Self, String> {
        let (lookup_only, body) = match raw.strip_prefix('*') {
            Some(rest) => (true, rest),
            None => (false, raw),
        };

        // Split into literal runs and &name(arg) calls
        let mut pieces = Vec::new();
        let mut last = 0;
        for caps in CALL.captures_iter(body) {
            let Some(whole) = caps.get(0) else { continue };
            push_text(&mut pieces, &body[last..whole.start()])?;

            let name = &caps[1];
            let function = functions
                .get(name)
                .ok_or_else(|| format!("unknown function &{name}"))?;
            pieces.push(Piece::Call { function, arg: parse_parts(&caps[2]) });
            last = whole.end();
        }
        push_text(&mut pieces, &body[last..])?;

        Ok(Self { raw: raw.to_string(), lookup_only, pieces })
    }

    /// Field text as written in the rule table, `*` included.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn is_lookup_only(&self) -> bool {
        self.lookup_only
    }

    /// True when the field has neither captures nor calls.
    pub fn is_literal(&self) -> bool {
        self.pieces.iter().all(|p| match p {
            Piece::Text(parts) => parts.iter().all(|x| matches!(x, Part::Text(_))),
            Piece::Call { .. } => false,
        })
    }

    /// Highest `$n` referenced anywhere in the field.
    pub fn max_group(&self) -> usize {
        self.pieces
            .iter()
            .flat_map(|p| match p {
                Piece::Text(parts) | Piece::Call { arg: parts, .. } => parts.iter(),
            })
            .filter_map(|x| match x {
                Part::Group(n) => Some(*n),
                Part::Text(_) => None,
            })
            .max()
            .unwrap_or(0)
    }

    /// Substitute `groups` (index 0 is the whole match) and run the calls.
    ///
    /// The returned hint is the left-to-right fold of every call's hint, so
    /// the last call that sets an order decides it.
    pub fn expand(&self, groups: &[&str]) -> Result<(String, OrderHint)> {
        let mut out = String::new();
        let mut hint = OrderHint::default();

        for piece in &self.pieces {
            match piece {
                Piece::Text(parts) => render(parts, groups, &mut out),
                Piece::Call { function, arg } => {
                    // Substitute captures first, then call
                    let mut text = String::new();
                    render(arg, groups, &mut text);
                    let done = function
                        .apply(&text)
                        .map_err(|e| PathHeaderError::Function {
                            name: function.name().to_string(),
                            arg: text.clone(),
                            reason: e.to_string(),
                        })?;
                    out.push_str(&done.text);
                    // Later calls override earlier hints
                    hint = hint.then(done.hint);
                }
            }
        }

        Ok((out, hint))
    }
}

fn push_text(pieces: &mut Vec<Piece>, text: &str) -> std::result::Result<(), String> {
    if OPEN_CALL.is_match(text) {
        return Err(format!("unterminated function call in `{text}`"));
    }
    if !text.is_empty() {
        pieces.push(Piece::Text(parse_parts(text)));
    }
    Ok(())
}

fn parse_parts(text: &str) -> Vec<Part> {
    let mut parts = Vec::new();
    let mut last = 0;
    for m in GROUP_REF.find_iter(text) {
        if m.start() > last {
            parts.push(Part::Text(text[last..m.start()].to_string()));
        }
        let digit = m.as_str().as_bytes()[1] - b'0';
        parts.push(Part::Group(digit as usize));
        last = m.end();
    }
    if last < text.len() {
        parts.push(Part::Text(text[last..].to_string()));
    }
    parts
}

fn render(parts: &[Part], groups: &[&str], out: &mut String) {
    for part in parts {
        match part {
            Part::Text(t) => out.push_str(t),
            Part::Group(n) => out.push_str(groups.get(*n).copied().unwrap_or("")),
        }
    }
}

/// A fully parsed `Section;Page;Header;Code[;Status]` template.
#[derive(Debug, Clone)]
pub struct Template {
    raw: String,
    pub section: Field,
    pub page: Field,
    pub header: Field,
    pub code: Field,
    pub status: Option<SurveyToolStatus>,
}

/// Template output before ordering is settled.
#[derive(Debug, Clone)]
pub struct Expanded {
    pub section: SectionId,
    pub page: PageId,
    pub header: String,
    pub header_hint: OrderHint,
    pub code: String,
    pub code_hint: OrderHint,
}

impl Template {
    pub fn parse(text: &str, functions: &FunctionRegistry) -> std::result::Result<Self, String> {
        let fields: Vec<&str> = text.split(';').map(str::trim).collect();
        if !(4..=5).contains(&fields.len()) {
            return Err(format!(
                "template needs Section;Page;Header;Code[;Status], found {} field(s)",
                fields.len()
            ));
        }

        let section = Field::parse(fields[0], functions)?;
        let page = Field::parse(fields[1], functions)?;
        if section.is_lookup_only() || page.is_lookup_only() {
            return Err("`*` only applies to the header and code fields".into());
        }

        // Optional fifth field
        let status = match fields.get(4) {
            Some(s) if !s.is_empty() => Some(SurveyToolStatus::parse(s).map_err(|e| e.to_string())?),
            _ => None,
        };

        Ok(Self {
            raw: text.trim().to_string(),
            section,
            page,
            header: Field::parse(fields[2], functions)?,
            code: Field::parse(fields[3], functions)?,
            status,
        })
    }

    /// Template text as written in the rule table.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn max_group(&self) -> usize {
        [&self.section, &self.page, &self.header, &self.code]
            .iter()
            .map(|f| f.max_group())
            .max()
            .unwrap_or(0)
    }

    /// Expand every field and resolve Section and Page against their
    /// vocabularies.
    pub fn expand(&self, groups: &[&str]) -> Result<Expanded> {
        // Section and page only need their text; their order comes from the enums
        let (section, _) = self.section.expand(groups)?;
        let (page, _) = self.page.expand(groups)?;
        let section = SectionId::parse(&section)?;
        let page = PageId::parse(section, &page)?;
        let (header, header_hint) = self.header.expand(groups)?;
        let (code, code_hint) = self.code.expand(groups)?;

        Ok(Expanded { section, page, header, header_hint, code, code_hint })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reg() -> FunctionRegistry {
        FunctionRegistry::builtin()
    }

    #[test]
    fn literal_fields() {
        let f = Field::parse("Symbols", &reg()).unwrap();
        assert!(f.is_literal());
        assert_eq!(f.expand(&[]).unwrap(), ("Symbols".to_string(), OrderHint::default()));
    }

    #[test]
    fn groups_are_substituted_positionally() {
        let f = Field::parse("$2-$1", &reg()).unwrap();
        assert!(!f.is_literal());
        assert_eq!(f.max_group(), 2);
        let (text, _) = f.expand(&["whole", "a", "b"]).unwrap();
        assert_eq!(text, "b-a");
    }

    #[test]
    fn calls_run_after_substitution_and_carry_order() {
        let f = Field::parse("Month &month($1)", &reg()).unwrap();
        let (text, hint) = f.expand(&["", "3"]).unwrap();
        assert_eq!(text, "Month Mar");
        assert_eq!(hint.order, Some(3));
    }

    #[test]
    fn last_call_wins() {
        let f = Field::parse("&day($1) &month($2)", &reg()).unwrap();
        let (text, hint) = f.expand(&["", "sat", "2"]).unwrap();
        assert_eq!(text, "Sat Feb");
        assert_eq!(hint.order, Some(2));
    }

    #[test]
    fn captured_ampersand_is_not_executed() {
        let f = Field::parse("$1", &reg()).unwrap();
        let (text, hint) = f.expand(&["", "&month(1)"]).unwrap();
        assert_eq!(text, "&month(1)");
        assert_eq!(hint, OrderHint::default());
    }

    #[test]
    fn plain_ampersand_is_text() {
        let f = Field::parse("Date & Time", &reg()).unwrap();
        assert!(f.is_literal());
    }

    #[test]
    fn bad_calls_are_rejected() {
        assert!(Field::parse("&nosuch($1)", &reg()).unwrap_err().contains("unknown function"));
        assert!(Field::parse("&month($1", &reg()).unwrap_err().contains("unterminated"));
    }

    #[test]
    fn star_is_stripped_from_display() {
        let f = Field::parse("*Symbols", &reg()).unwrap();
        assert!(f.is_lookup_only());
        assert_eq!(f.raw(), "*Symbols");
        assert_eq!(f.expand(&[]).unwrap().0, "Symbols");
    }

    #[test]
    fn function_failures_name_the_call() {
        let f = Field::parse("&month($1)", &reg()).unwrap();
        let err = f.expand(&["", "13x"]).unwrap_err();
        assert!(matches!(err, PathHeaderError::Function { ref name, .. } if name == "month"));
    }

    #[test]
    fn template_shape() {
        let t = Template::parse("Numbers;Symbols;Symbols;$1;read-only", &reg()).unwrap();
        assert_eq!(t.status, Some(SurveyToolStatus::ReadOnly));
        assert_eq!(t.max_group(), 1);
        let out = t.expand(&["", "decimal"]).unwrap();
        assert_eq!((out.section, out.page), (SectionId::Numbers, PageId::Symbols));
        assert_eq!(out.code, "decimal");

        assert!(Template::parse("Numbers;Symbols;Symbols", &reg()).is_err());
        assert!(Template::parse("Numbers;Symbols;H;C;writable", &reg()).is_err());
        assert!(Template::parse("*Numbers;Symbols;H;C", &reg()).is_err());
    }

    #[test]
    fn page_must_belong_to_section() {
        let t = Template::parse("Numbers;Gregorian;H;C", &reg()).unwrap();
        assert!(matches!(t.expand(&[""]), Err(PathHeaderError::InvalidId { kind: "page", .. })));
    }
}
