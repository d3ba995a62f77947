//! Chronological (first-seen-wins) ordering for Header and Code values.
//!
//! Orders are handed out per page. Header order is monotonic for the life of
//! the registrar; the first sighting of a new Header in a page restarts that
//! page's Code numbering. A leading `*` looks a value up without registering
//! it, so a later rule can line up with an earlier declaration.

use std::collections::HashMap;

use indexmap::IndexSet;

use crate::core::error::OrderingError;

/// Which counter a value is registered against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope<'a> {
    Header { page: &'a str },
    Code { page: &'a str },
}

impl std::fmt::Display for Scope<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scope::Header { page } => write!(f, "header scope of page `{page}`"),
            Scope::Code { page } => write!(f, "code scope of page `{page}`"),
        }
    }
}

/// A value with its `*` marker stripped, plus the order it resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub value: String,
    pub order: i32,
}

/// Per-engine chronological counters. Insertion index is the order.
#[derive(Debug, Default)]
pub struct OrderingRegistrar {
    headers: HashMap<String, IndexSet<String>>,
    codes: HashMap<String, IndexSet<String>>,
}

impl OrderingRegistrar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `value` in `scope`, registering it on first sight.
    ///
    /// # Errors
    ///
    /// Returns [`OrderingError::UnseenReference`] when a `*value` lookup names
    /// a value that is not registered in that scope.
    pub fn resolve(&mut self, scope: Scope<'_>, value: &str) -> Result<Resolved, OrderingError> {
        // `*value` looks up, never registers
        if let Some(bare) = value.strip_prefix('*') {
            let order = self
                .peek(scope, bare)
                .ok_or_else(|| OrderingError::UnseenReference {
                    scope: scope.to_string(),
                    value: bare.to_string(),
                })?;
            return Ok(Resolved { value: bare.to_string(), order });
        }

        let (page, seen) = match scope {
            Scope::Header { page } => (page, self.headers.entry(page.to_string()).or_default()),
            Scope::Code { page } => (page, self.codes.entry(page.to_string()).or_default()),
        };

        let (index, fresh) = seen.insert_full(value.to_string());
        if fresh && matches!(scope, Scope::Header { .. }) {
            // New header: codes under it number from zero again
            if let Some(codes) = self.codes.get_mut(page) {
                codes.clear();
            }
        }

        Ok(Resolved { value: value.to_string(), order: index as i32 })
    }

    /// Order of an already-registered value, without side effects.
    pub fn peek(&self, scope: Scope<'_>, value: &str) -> Option<i32> {
        let map = match scope {
            Scope::Header { .. } => &self.headers,
            Scope::Code { .. } => &self.codes,
        };
        let page = match scope {
            Scope::Header { page } | Scope::Code { page } => page,
        };
        map.get(page)?
            .get_index_of(value)
            .map(|i| i as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "Symbols";

    fn header(r: &mut OrderingRegistrar, v: &str) -> Result<i32, OrderingError> {
        r.resolve(Scope::Header { page: PAGE }, v).map(|x| x.order)
    }

    fn code(r: &mut OrderingRegistrar, v: &str) -> Result<i32, OrderingError> {
        r.resolve(Scope::Code { page: PAGE }, v).map(|x| x.order)
    }

    #[test]
    fn first_seen_wins_not_alphabetic() {
        let mut r = OrderingRegistrar::new();
        assert_eq!(header(&mut r, "Zeta").unwrap(), 0);
        assert_eq!(header(&mut r, "Alpha").unwrap(), 1);
        assert_eq!(header(&mut r, "Zeta").unwrap(), 0);
    }

    #[test]
    fn new_header_restarts_codes_in_that_page_only() {
        let mut r = OrderingRegistrar::new();
        header(&mut r, "H1").unwrap();
        code(&mut r, "a").unwrap();
        assert_eq!(code(&mut r, "b").unwrap(), 1);
        r.resolve(Scope::Code { page: "Other" }, "x").unwrap();

        header(&mut r, "H2").unwrap();
        assert_eq!(code(&mut r, "b").unwrap(), 0);
        assert_eq!(r.peek(Scope::Code { page: "Other" }, "x"), Some(0));
    }

    #[test]
    fn revisiting_a_header_keeps_codes() {
        let mut r = OrderingRegistrar::new();
        header(&mut r, "H1").unwrap();
        code(&mut r, "a").unwrap();
        header(&mut r, "H1").unwrap();
        assert_eq!(code(&mut r, "*a").unwrap(), 0);
    }

    #[test]
    fn star_reuses_without_inserting() {
        let mut r = OrderingRegistrar::new();
        header(&mut r, "H1").unwrap();
        header(&mut r, "H2").unwrap();
        let got = r.resolve(Scope::Header { page: PAGE }, "*H1").unwrap();
        assert_eq!(got, Resolved { value: "H1".into(), order: 0 });
        assert_eq!(header(&mut r, "H3").unwrap(), 2);
    }

    #[test]
    fn star_on_unseen_value_is_an_error() {
        let mut r = OrderingRegistrar::new();
        let err = header(&mut r, "*Ghost").unwrap_err();
        assert!(matches!(err, OrderingError::UnseenReference { ref value, .. } if value == "Ghost"));
    }

    #[test]
    fn code_seen_under_old_header_is_gone_after_new_header() {
        let mut r = OrderingRegistrar::new();
        header(&mut r, "H1").unwrap();
        code(&mut r, "c").unwrap();
        header(&mut r, "H2").unwrap();
        assert!(code(&mut r, "*c").is_err());
    }
}
