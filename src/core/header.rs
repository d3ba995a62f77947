//! The classification record and its canonical display order.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use serde::Serialize;

use crate::core::ids::{PageId, SectionId, SurveyToolStatus};

/// Secondary code ordering for closed vocabularies such as plural categories.
///
/// Compares by `(class, rank, variant)`: keyword forms first in their fixed
/// sequence, then numeric literals by magnitude, then everything else. The
/// variant is whatever trailed the first `-`; the bare base has an empty
/// variant and therefore sorts before its variants. Numeric variants compare
/// by value (`one-2` < `one-10`) and precede spelled ones.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Suborder {
    pub class: u8,
    pub rank: u64,
    #[serde(skip)]
    variant_rank: u64,
    pub variant: String,
}

impl Suborder {
    pub fn new(class: u8, rank: u64, variant: impl Into<String>) -> Self {
        let variant = variant.into();
        let variant_rank = if variant.is_empty() {
            0
        } else {
            variant.parse::<u64>().unwrap_or(u64::MAX)
        };
        Self { class, rank, variant_rank, variant }
    }
}

/// Immutable Section/Page/Header/Code label for one path.
#[derive(Debug, Clone, Serialize)]
pub struct PathHeader {
    pub(crate) section: SectionId,
    pub(crate) page: PageId,
    pub(crate) header: String,
    pub(crate) code: String,
    pub(crate) status: SurveyToolStatus,
    pub(crate) header_order: i32,
    pub(crate) code_order: i32,
    pub(crate) code_suborder: Option<Suborder>,
    pub(crate) original_path: String,
}

impl PathHeader {
    pub fn section(&self) -> SectionId {
        self.section
    }

    pub fn page(&self) -> PageId {
        self.page
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn status(&self) -> SurveyToolStatus {
        self.status
    }

    pub fn header_order(&self) -> i32 {
        self.header_order
    }

    pub fn code_order(&self) -> i32 {
        self.code_order
    }

    pub fn code_suborder(&self) -> Option<&Suborder> {
        self.code_suborder.as_ref()
    }

    pub fn original_path(&self) -> &str {
        &self.original_path
    }

    /// The four display levels; unique per path outside Special.
    pub fn label(&self) -> (SectionId, PageId, &str, &str) {
        (self.section, self.page, &self.header, &self.code)
    }

    pub(crate) fn with_status(&self, status: SurveyToolStatus) -> Self {
        Self { status, ..self.clone() }
    }
}

impl std::fmt::Display for PathHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\t{}\t{}\t{}", self.section, self.page, self.header, self.code)
    }
}

impl PartialEq for PathHeader {
    fn eq(&self, other: &Self) -> bool {
        self.section == other.section
            && self.page == other.page
            && self.header == other.header
            && self.code == other.code
            && self.original_path == other.original_path
    }
}

impl Eq for PathHeader {}

impl Hash for PathHeader {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.section.hash(state);
        self.page.hash(state);
        self.header.hash(state);
        self.code.hash(state);
        self.original_path.hash(state);
    }
}

impl PartialOrd for PathHeader {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PathHeader {
    fn cmp(&self, other: &Self) -> Ordering {
        self.section
            .cmp(&other.section)
            .then_with(|| self.page.cmp(&other.page))
            .then_with(|| self.header_order.cmp(&other.header_order))
            .then_with(|| collate(&self.header, &other.header))
            .then_with(|| self.code_order.cmp(&other.code_order))
            .then_with(|| compare_suborders(self.code_suborder.as_ref(), other.code_suborder.as_ref()))
            .then_with(|| collate(&self.code, &other.code))
            .then_with(|| self.original_path.cmp(&other.original_path))
    }
}

/// A present suborder sorts ahead of an absent one.
fn compare_suborders(a: Option<&Suborder>, b: Option<&Suborder>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Locale-style comparison in three levels: base letters (accents and case
/// folded away, digit runs by value), then accents, then case. Distinct inputs
/// never compare equal.
///
/// `"Égypte"` sorts with `E`, `"Item 9"` before `"Item 10"`.
pub fn collate(a: &str, b: &str) -> Ordering {
    compare_runs(&primary_key(a), &primary_key(b))
        .then_with(|| compare_runs(&a.to_lowercase(), &b.to_lowercase()))
        .then_with(|| a.cmp(b))
}

fn primary_key(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars().flat_map(char::to_lowercase) {
        match fold_latin(c) {
            Some(base) => out.push_str(base),
            None => out.push(c),
        }
    }
    out
}

/// Base letters for the accented Latin-1 and Latin Extended-A lowercase range.
fn fold_latin(c: char) -> Option<&'static str> {
    Some(match c {
        'à'..='å' | 'ā' | 'ă' | 'ą' => "a",
        'æ' => "ae",
        'ç' | 'ć' | 'ĉ' | 'ċ' | 'č' => "c",
        'ď' | 'đ' | 'ð' => "d",
        'è'..='ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => "e",
        'ĝ' | 'ğ' | 'ġ' | 'ģ' => "g",
        'ĥ' | 'ħ' => "h",
        'ì'..='ï' | 'ĩ' | 'ī' | 'ĭ' | 'į' | 'ı' => "i",
        'ĵ' => "j",
        'ķ' => "k",
        'ĺ' | 'ļ' | 'ľ' | 'ŀ' | 'ł' => "l",
        'ñ' | 'ń' | 'ņ' | 'ň' => "n",
        'ò'..='ö' | 'ø' | 'ō' | 'ŏ' | 'ő' => "o",
        'œ' => "oe",
        'ŕ' | 'ŗ' | 'ř' => "r",
        'ś' | 'ŝ' | 'ş' | 'š' => "s",
        'ß' => "ss",
        'ţ' | 'ť' | 'ŧ' => "t",
        'þ' => "th",
        'ù'..='ü' | 'ũ' | 'ū' | 'ŭ' | 'ů' | 'ű' | 'ų' => "u",
        'ŵ' => "w",
        'ý' | 'ÿ' | 'ŷ' => "y",
        'ź' | 'ż' | 'ž' => "z",
        _ => return None,
    })
}

/// Char-by-char, except that digit runs compare by numeric value.
fn compare_runs(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();

    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let lhs = take_digits(&mut left);
                let rhs = take_digits(&mut right);
                let (lhs, rhs) = (lhs.trim_start_matches('0'), rhs.trim_start_matches('0'));
                // Longer run without leading zeros is the larger number
                let by_value = lhs.len().cmp(&rhs.len()).then_with(|| lhs.cmp(rhs));
                if by_value != Ordering::Equal {
                    return by_value;
                }
            }
            (Some(x), Some(y)) => {
                if x != y {
                    return x.cmp(&y);
                }
                left.next();
                right.next();
            }
        }
    }
}

fn take_digits(it: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut out = String::new();
    while let Some(c) = it.next_if(|c| c.is_ascii_digit()) {
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ph(header: &str, header_order: i32, code: &str, code_order: i32) -> PathHeader {
        PathHeader {
            section: SectionId::Numbers,
            page: PageId::Symbols,
            header: header.into(),
            code: code.into(),
            status: SurveyToolStatus::ReadWrite,
            header_order,
            code_order,
            code_suborder: None,
            original_path: format!("//ldml/{header}/{code}"),
        }
    }

    #[test]
    fn collate_is_numeric_aware_and_case_insensitive() {
        assert_eq!(collate("Item 9", "Item 10"), Ordering::Less);
        assert_eq!(collate("apple", "Banana"), Ordering::Less);
        assert_eq!(collate("a007", "a7"), "a007".cmp("a7"));
        assert_eq!(collate("same", "same"), Ordering::Equal);
    }

    #[test]
    fn accented_letters_sort_with_their_base() {
        assert_eq!(collate("Égypte", "Zulu"), Ordering::Less);
        assert_eq!(collate("Öst", "Paris"), Ordering::Less);
        assert_eq!(collate("Ålesund", "Bergen"), Ordering::Less);
        assert_eq!(collate("e", "é"), Ordering::Less);
        assert_eq!(collate("é", "f"), Ordering::Less);
        assert_ne!(collate("Straße", "Strasse"), Ordering::Equal);

        let mut headers: Vec<_> = ["Zulu", "Öst", "Égypte", "Egypt"]
            .into_iter()
            .map(|h| ph(h, 0, "x", 0))
            .collect();
        headers.sort();
        let names: Vec<&str> = headers.iter().map(|h| h.header()).collect();
        assert_eq!(names, ["Egypt", "Égypte", "Öst", "Zulu"]);
    }

    #[test]
    fn header_order_beats_alphabet() {
        let late = ph("Alpha", 5, "x", 0);
        let early = ph("Zulu", 1, "x", 0);
        assert!(early < late);
    }

    #[test]
    fn section_and_page_dominate() {
        let mut currency = ph("A", 0, "a", 0);
        currency.section = SectionId::Currencies;
        currency.page = PageId::C_Africa;
        assert!(ph("Z", 99, "z", 99) < currency);
    }

    #[test]
    fn present_suborder_sorts_first() {
        let mut with = ph("H", 0, "zzz", 0);
        with.code_suborder = Some(Suborder::new(0, 5, ""));
        let without = ph("H", 0, "aaa", 0);
        assert!(with < without);
    }

    #[test]
    fn equality_ignores_order_fields() {
        let a = ph("H", 0, "c", 0);
        let mut b = a.clone();
        b.status = SurveyToolStatus::Hide;
        assert_eq!(a, b);
        b.original_path.push('x');
        assert_ne!(a, b);
    }

    #[test]
    fn original_path_breaks_full_ties() {
        let a = ph("H", 0, "c", 0);
        let mut b = a.clone();
        b.original_path = "//ldml/z".into();
        assert_eq!(a.cmp(&b), a.original_path.cmp(&b.original_path));
    }
}
