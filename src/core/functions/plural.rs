//! Plural category suborder.

use super::{FunctionError, Transformed};
use crate::core::header::Suborder;

pub const PLURAL_KEYWORDS: [&str; 6] = ["zero", "one", "two", "few", "many", "other"];

/// Pass the category through unchanged and attach its suborder.
pub fn count(arg: &str) -> Result<Transformed, FunctionError> {
    Ok(Transformed::with_suborder(arg, plural_suborder(arg)))
}

/// Keyword categories first (zero..other), then explicit numbers by value,
/// then anything else by spelling. `one-2` style variants trail their base,
/// numeric ones by value.
pub fn plural_suborder(value: &str) -> Suborder {
    let (head, tail) = value.split_once('-').unwrap_or((value, ""));

    if let Some(i) = PLURAL_KEYWORDS.iter().position(|k| *k == head) {
        return Suborder::new(0, i as u64, tail);
    }

    match head.trim_start_matches('=').parse::<u64>() {
        Ok(n) => Suborder::new(1, n, tail),
        Err(_) => Suborder::new(2, 0, value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_then_numbers_then_other() {
        let mut input = vec!["1000", "other", "zero", "many", "one", "few", "two", "0", "odd"];
        input.sort_by_key(|v| plural_suborder(v));
        assert_eq!(input, ["zero", "one", "two", "few", "many", "other", "0", "1000", "odd"]);
    }

    #[test]
    fn numbers_sort_by_magnitude_not_spelling() {
        assert!(plural_suborder("9") < plural_suborder("10"));
        assert!(plural_suborder("=1") < plural_suborder("2"));
    }

    #[test]
    fn variants_trail_their_base() {
        assert!(plural_suborder("one") < plural_suborder("one-2"));
        assert!(plural_suborder("one-2") < plural_suborder("two"));
        assert!(plural_suborder("few-feminine") < plural_suborder("many"));
    }

    #[test]
    fn numeric_variants_sort_by_value() {
        let mut input = vec!["one-10", "one-feminine", "one-2", "one", "one-1"];
        input.sort_by_key(|v| plural_suborder(v));
        assert_eq!(input, ["one", "one-1", "one-2", "one-10", "one-feminine"]);
        assert!(plural_suborder("1-9") < plural_suborder("1-10"));
    }

    #[test]
    fn count_keeps_text() {
        let t = count("few").unwrap();
        assert_eq!(t.text, "few");
        assert_eq!(t.hint.order, None);
        assert_eq!(t.hint.suborder, Some(plural_suborder("few")));
    }
}
