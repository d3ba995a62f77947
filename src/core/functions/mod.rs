//! Transform functions callable from rule templates as `&name(arg)`.
//!
//! A function rewrites its argument and may attach an [`OrderHint`]. When a
//! field calls several functions, hints fold left to right and a later
//! function's order or suborder replaces an earlier one.

use std::{collections::HashMap, sync::Arc};

use crate::core::header::Suborder;

pub mod calendar;
pub mod geo;
pub mod plural;
pub mod text;

/// Order side value produced by a transform.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderHint {
    pub order: Option<i32>,
    pub suborder: Option<Suborder>,
}

impl OrderHint {
    /// Fold a later hint over this one; whatever the later one sets wins.
    pub fn then(self, later: OrderHint) -> OrderHint {
        OrderHint {
            order: later.order.or(self.order),
            suborder: later.suborder.or(self.suborder),
        }
    }
}

/// Rewritten text plus its ordering side value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transformed {
    pub text: String,
    pub hint: OrderHint,
}

impl Transformed {
    pub fn plain(text: impl Into<String>) -> Self {
        Self { text: text.into(), hint: OrderHint::default() }
    }

    pub fn ordered(text: impl Into<String>, order: usize) -> Self {
        Self {
            text: text.into(),
            hint: OrderHint { order: Some(order as i32), suborder: None },
        }
    }

    pub fn with_suborder(text: impl Into<String>, suborder: Suborder) -> Self {
        Self {
            text: text.into(),
            hint: OrderHint { order: None, suborder: Some(suborder) },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct FunctionError(pub String);

impl FunctionError {
    pub fn unknown(what: &str, arg: &str) -> Self {
        Self(format!("unknown {what} `{arg}`"))
    }
}

/// A named template function.
pub trait TransformFn: Send + Sync {
    /// Name used after `&` in templates
    fn name(&self) -> &'static str;

    /// Rewrite `arg`, optionally attaching an order hint
    fn apply(&self, arg: &str) -> Result<Transformed, FunctionError>;
}

/// Adapter for the plain-function built-ins.
struct Builtin {
    name: &'static str,
    apply: fn(&str) -> Result<Transformed, FunctionError>,
}

impl TransformFn for Builtin {
    fn name(&self) -> &'static str {
        self.name
    }

    fn apply(&self, arg: &str) -> Result<Transformed, FunctionError> {
        (self.apply)(arg)
    }
}

/// Name → function table consulted while parsing templates.
#[derive(Clone, Default)]
pub struct FunctionRegistry {
    functions: HashMap<&'static str, Arc<dyn TransformFn>>,
}

impl FunctionRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry preloaded with every built-in function.
    pub fn builtin() -> Self {
        let mut reg = Self::empty();
        let builtins: [(&'static str, fn(&str) -> Result<Transformed, FunctionError>); 20] = [
            ("month", calendar::month),
            ("day", calendar::day),
            ("dayPeriod", calendar::day_period),
            ("quarter", calendar::quarter),
            ("calendar", calendar::calendar),
            ("calField", calendar::cal_field),
            ("field", calendar::field),
            ("width", calendar::width),
            ("count", plural::count),
            ("territory", geo::territory),
            ("continent", geo::continent),
            ("territoryPage", geo::territory_page),
            ("currencyRegion", geo::currency_region),
            ("currencyPage", geo::currency_page),
            ("tzPage", geo::tz_page),
            ("tzCity", text::tz_city),
            ("languagePage", text::language_page),
            ("alpha", text::alpha),
            ("unitPage", text::unit_page),
            ("unitName", text::unit_name),
        ];
        for (name, apply) in builtins {
            reg.register(Builtin { name, apply });
        }
        reg
    }

    /// Add or replace a function. Must happen before a rule table is parsed.
    pub fn register(&mut self, function: impl TransformFn + 'static) -> &mut Self {
        self.functions
            .insert(function.name(), Arc::new(function));
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn TransformFn>> {
        self.functions.get(name).cloned()
    }

    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.functions.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

impl std::fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionRegistry")
            .field("functions", &self.names())
            .finish()
    }
}

/// Position of `arg` in `vocab`, or an error naming the vocabulary.
pub(crate) fn index_in(vocab: &[&str], what: &str, arg: &str) -> Result<usize, FunctionError> {
    vocab
        .iter()
        .position(|v| *v == arg)
        .ok_or_else(|| FunctionError::unknown(what, arg))
}
