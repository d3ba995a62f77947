//! Classification engine: rule table, ordering registrar and result cache.
//!
//! One [`PathHeaderFactory`] owns everything it needs; independent instances
//! never share ordering state. The cache is a `moka` cache used in
//! single-flight mode, so concurrent callers asking for the same uncached
//! path wait on one computation and all receive the same `Arc`.

use std::{
    collections::{BTreeSet, HashMap, hash_map::Entry},
    path::PathBuf,
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicU64, Ordering},
    },
};

use moka::sync::Cache;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::core::error::{OrderingError, PathHeaderError, Result};
use crate::core::functions::FunctionRegistry;
use crate::core::header::PathHeader;
use crate::core::ids::{PageId, SectionId, SurveyToolStatus};
use crate::core::matcher::{CleanPath, clean_path, first_match};
use crate::core::registrar::OrderingRegistrar;
use crate::core::rules::{Rule, RuleTable};

/// Stored value meaning "explicitly no value, do not inherit".
pub const NO_INHERITANCE_MARKER: &str = "∅∅∅";

/// What a batch does with a path no rule matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum NoMatchPolicy {
    /// Abort on the first unmatched path
    #[default]
    Fail,
    /// Keep going and report unmatched paths at the end
    Collect,
}

/// Sorted batch output.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// Classified paths in canonical display order, duplicates removed
    pub headers: Vec<Arc<PathHeader>>,
    /// Paths no rule matched, in input order
    pub unmatched: Vec<String>,
}

/// Two distinct paths that render to the same Section/Page/Header/Code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayCollision {
    pub label: String,
    pub first_path: String,
    pub second_path: String,
}

#[derive(Debug, Default)]
struct FactoryState {
    by_page: HashMap<(SectionId, PageId), BTreeSet<String>>,
    /// label → first path that produced it
    labels: HashMap<String, String>,
    /// path → label it produced
    computed: HashMap<String, String>,
    collisions: Vec<DisplayCollision>,
    unmatched: BTreeSet<String>,
}

#[derive(Debug, Clone, Default)]
enum RuleSource {
    #[default]
    Builtin,
    Text(String),
    File(PathBuf),
}

/// Configures and builds a [`PathHeaderFactory`].
#[derive(Debug, Clone, Default)]
pub struct PathHeaderFactoryBuilder {
    source: RuleSource,
    functions: Option<FunctionRegistry>,
    cache_capacity: Option<u64>,
}

impl PathHeaderFactoryBuilder {
    /// Use rules from a string instead of the embedded table.
    pub fn rules_text(mut self, text: impl Into<String>) -> Self {
        self.source = RuleSource::Text(text.into());
        self
    }

    /// Use rules from a file instead of the embedded table.
    pub fn rules_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = RuleSource::File(path.into());
        self
    }

    /// Functions available to templates; defaults to the built-ins.
    pub fn functions(mut self, functions: FunctionRegistry) -> Self {
        self.functions = Some(functions);
        self
    }

    /// Bound the cache. `None` keeps every result for the life of the engine.
    pub fn cache_capacity(mut self, capacity: Option<u64>) -> Self {
        self.cache_capacity = capacity;
        self
    }

    #[instrument(skip(self), fields(source = ?self.source))]
    pub fn build(self) -> Result<PathHeaderFactory> {
        let functions = self.functions.unwrap_or_else(FunctionRegistry::builtin);
        let mut registrar = OrderingRegistrar::new();
        let table = match &self.source {
            RuleSource::Builtin => RuleTable::builtin(&functions, &mut registrar)?,
            RuleSource::Text(text) => RuleTable::parse(text, &functions, &mut registrar)?,
            RuleSource::File(path) => RuleTable::load(path, &functions, &mut registrar)?,
        };

        let cache = match self.cache_capacity {
            Some(n) => Cache::builder().max_capacity(n).build(),
            None => Cache::builder().build(),
        };
        let hits = table.rules().iter().map(|_| AtomicU64::new(0)).collect();

        Ok(PathHeaderFactory {
            table,
            registrar,
            cache,
            hits,
            state: Mutex::new(FactoryState::default()),
        })
    }
}

/// Classifies paths into [`PathHeader`]s and remembers what it has seen.
pub struct PathHeaderFactory {
    table: RuleTable,
    registrar: OrderingRegistrar,
    cache: Cache<String, Arc<PathHeader>>,
    hits: Vec<AtomicU64>,
    state: Mutex<FactoryState>,
}

impl std::fmt::Debug for PathHeaderFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathHeaderFactory")
            .field("rules", &self.table.len())
            .field("cached", &self.cache.entry_count())
            .finish()
    }
}

impl PathHeaderFactory {
    pub fn builder() -> PathHeaderFactoryBuilder {
        PathHeaderFactoryBuilder::default()
    }

    /// Engine over the embedded rule table and built-in functions.
    pub fn builtin() -> Result<Self> {
        Self::builder().build()
    }

    pub fn table(&self) -> &RuleTable {
        &self.table
    }

    /// Chronological orders registered while the table loaded.
    pub fn registrar(&self) -> &OrderingRegistrar {
        &self.registrar
    }

    /// Classify one path. Repeated calls return the same `Arc`.
    ///
    /// # Errors
    ///
    /// [`PathHeaderError::NoMatch`] when no rule covers the path; function,
    /// vocabulary and ordering failures as they occur.
    pub fn classify(&self, path: &str) -> Result<Arc<PathHeader>> {
        let clean = clean_path(path);
        self.cache
            .try_get_with_by_ref(clean.key.as_str(), || self.compute(&clean).map(Arc::new))
            .map_err(|e| PathHeaderError::clone(&e))
    }

    /// Classify with the stored value in view. The no-inheritance marker
    /// hides the item; such adjusted results bypass the cache.
    pub fn classify_with_value(&self, path: &str, value: &str) -> Result<Arc<PathHeader>> {
        let header = self.classify(path)?;
        if value == NO_INHERITANCE_MARKER && header.status() != SurveyToolStatus::Hide {
            return Ok(Arc::new(header.with_status(SurveyToolStatus::Hide)));
        }
        Ok(header)
    }

    /// Like [`classify`](Self::classify), but an unmatched path is recorded
    /// and returned as `None` instead of failing.
    pub fn classify_lenient(&self, path: &str) -> Result<Option<Arc<PathHeader>>> {
        match self.classify(path) {
            Ok(header) => Ok(Some(header)),
            Err(e) if e.is_recoverable() => {
                debug!(path, "no rule matches");
                self.lock_state().unmatched.insert(path.to_string());
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Classify many paths in parallel and return them in display order.
    #[instrument(skip_all, fields(paths = paths.len(), ?policy))]
    pub fn classify_batch<S>(&self, paths: &[S], policy: NoMatchPolicy) -> Result<BatchReport>
    where
        S: AsRef<str> + Sync,
    {
        let results: Vec<Result<Option<Arc<PathHeader>>>> = paths
            .par_iter()
            .map(|p| match policy {
                NoMatchPolicy::Fail => self.classify(p.as_ref()).map(Some),
                NoMatchPolicy::Collect => self.classify_lenient(p.as_ref()),
            })
            .collect();

        // Sequential pass keeps unmatched paths in input order
        let mut report = BatchReport::default();
        for (path, result) in paths.iter().zip(results) {
            match result? {
                Some(header) => report.headers.push(header),
                None => report.unmatched.push(path.as_ref().to_string()),
            }
        }

        report.headers.par_sort();
        report.headers.dedup();
        info!(
            classified = report.headers.len(),
            unmatched = report.unmatched.len(),
            "batch classified"
        );
        Ok(report)
    }

    /// Paths classified so far under one page.
    pub fn paths_for(&self, section: SectionId, page: PageId) -> Vec<String> {
        self.lock_state()
            .by_page
            .get(&(section, page))
            .map(|paths| paths.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Rules no computed classification has used yet, in table order.
    pub fn unmatched_rules(&self) -> Vec<&Rule> {
        self.rule_hits()
            .into_iter()
            .filter(|(_, hits)| *hits == 0)
            .map(|(rule, _)| rule)
            .collect()
    }

    /// Patterns of [`unmatched_rules`](Self::unmatched_rules).
    pub fn unmatched_patterns(&self) -> Vec<&str> {
        self.unmatched_rules()
            .into_iter()
            .map(Rule::pattern)
            .collect()
    }

    /// Every rule with the number of distinct paths it classified.
    pub fn rule_hits(&self) -> Vec<(&Rule, u64)> {
        self.table
            .rules()
            .iter()
            .zip(&self.hits)
            .map(|(rule, hits)| (rule, hits.load(Ordering::Relaxed)))
            .collect()
    }

    /// Paths recorded by lenient classification, sorted.
    pub fn unmatched_paths(&self) -> Vec<String> {
        self.lock_state()
            .unmatched
            .iter()
            .cloned()
            .collect()
    }

    pub fn display_collisions(&self) -> Vec<DisplayCollision> {
        self.lock_state().collisions.clone()
    }

    /// Forget every cached result and index. Rule orders are kept.
    pub fn clear_cache(&self) {
        self.cache.invalidate_all();
        *self.lock_state() = FactoryState::default();
        debug!("classification cache cleared");
    }

    fn compute(&self, clean: &CleanPath) -> Result<PathHeader> {
        // Match against the cleaned path
        let found = first_match(&self.table, &clean.path).ok_or_else(|| PathHeaderError::NoMatch {
            path: clean.key.clone(),
        })?;
        self.hits[found.index].fetch_add(1, Ordering::Relaxed);

        // Expand fields
        let rule = found.rule;
        let out = rule.template().expand(&found.groups)?;

        // Kept alt forms ride on the code
        let mut code = out.code;
        if let Some(alt) = &clean.alt {
            code.push('-');
            code.push_str(alt);
        }

        let header = PathHeader {
            section: out.section,
            page: out.page,
            header: out.header,
            code,
            status: rule.status(),
            header_order: out.header_hint.order.unwrap_or(rule.header_order()),
            code_order: out.code_hint.order.unwrap_or(rule.code_order()),
            code_suborder: out.code_hint.suborder,
            original_path: clean.key.clone(),
        };

        // Index and collision checks
        self.record(&header)?;
        Ok(header)
    }

    /// Index a fresh result and check it against earlier ones.
    fn record(&self, header: &PathHeader) -> Result<()> {
        let label = header.to_string();
        let path = header.original_path();
        let mut guard = self.lock_state();
        let state = &mut *guard;

        // Same path, different label
        if let Some(cached) = state.computed.get(path) {
            if *cached != label {
                return Err(OrderingError::CacheCollision {
                    path: path.to_string(),
                    cached: cached.clone(),
                    computed: label,
                }
                .into());
            }
        }
        state.computed.insert(path.to_string(), label.clone());
        state
            .by_page
            .entry((header.section(), header.page()))
            .or_default()
            .insert(path.to_string());

        // Collisions under Special are not reported
        if header.section() == SectionId::Special {
            return Ok(());
        }
        match state.labels.entry(label) {
            Entry::Vacant(slot) => {
                slot.insert(path.to_string());
            }
            Entry::Occupied(slot) if slot.get() != path => {
                warn!(label = %slot.key(), first = %slot.get(), second = path, "display collision");
                let collision = DisplayCollision {
                    label: slot.key().clone(),
                    first_path: slot.get().clone(),
                    second_path: path.to_string(),
                };
                state.collisions.push(collision);
            }
            Entry::Occupied(_) => {}
        }
        Ok(())
    }

    fn lock_state(&self) -> MutexGuard<'_, FactoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
