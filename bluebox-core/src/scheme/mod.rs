use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::error::{Error, Result};

pub mod dtmf;
pub mod mf;

pub use dtmf::Dtmf;
pub use mf::Mf;

/// The two frequencies (Hz) sounded together for one code.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct FrequencyPair {
    pub low: f64,
    pub high: f64,
}

impl FrequencyPair {
    pub const fn new(low: f64, high: f64) -> Self {
        Self {
            low,
            high,
        }
    }
}

impl fmt::Display for FrequencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Hz + {} Hz", self.low, self.high)
    }
}

/// A signaling standard: an ordered table of codes, each sounding one
/// frequency pair. Codes may have aliases that sound the same pair.
///
/// Implementors provide the canonical code table and the pair for each
/// table index; lookup and validation come for free.
pub trait FrequencyScheme: fmt::Debug + Send + Sync {
    fn name(&self) -> &'static str;

    /// Canonical codes, in table order.
    fn codes(&self) -> &[&'static str];

    /// `(alias, canonical)` pairs.
    fn aliases(&self) -> &[(&'static str, &'static str)] {
        &[]
    }

    /// Frequency pair for the canonical code at `index`.
    fn pair(&self, index: usize) -> FrequencyPair;

    /// Every code accepted by `lookup`, aliases included.
    fn valid_codes(&self) -> BTreeSet<&'static str> {
        self.codes().iter()
            .chain(self.aliases().iter().map(|(alias, _)| alias))
            .copied()
            .collect()
    }

    /// Resolves an alias to its canonical code. Canonical codes resolve to themselves.
    fn canonical(&self, code: &str) -> Option<&'static str> {
        if let Some(c) = self.codes().iter().find(|c| **c == code) {
            return Some(*c);
        }
        self.aliases().iter()
            .find(|(alias, _)| *alias == code)
            .map(|(_, canonical)| *canonical)
    }

    fn lookup(&self, code: &str) -> Result<FrequencyPair> {
        let canonical = self.canonical(code)
            .ok_or_else(|| Error::invalid_code(code, None))?;
        let index = self.codes().iter()
            .position(|c| *c == canonical)
            .ok_or_else(|| Error::invalid_code(code, None))?;
        Ok(self.pair(index))
    }

    fn contains(&self, code: &str) -> bool {
        self.canonical(code).is_some()
    }

    /// Number of distinct (canonical) codes.
    fn size(&self) -> usize {
        self.codes().len()
    }
}

///////////////////////////////////////////////////////////////////////
// Registry

pub type SchemeFactory = fn() -> Arc<dyn FrequencyScheme>;

/// Name-keyed scheme factories.
#[derive(Clone, Default)]
pub struct SchemeRegistry {
    factories: BTreeMap<&'static str, SchemeFactory>,
}

impl SchemeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in `dtmf` and `mf` schemes.
    pub fn with_standard_schemes() -> Self {
        let mut registry = Self::new();
        registry.register("dtmf", || Arc::new(Dtmf));
        registry.register("mf", || Arc::new(Mf));
        registry
    }

    /// Adds or replaces the factory for `name`.
    pub fn register(&mut self, name: &'static str, factory: SchemeFactory) {
        self.factories.insert(name, factory);
    }

    pub fn create(&self, name: &str) -> Result<Arc<dyn FrequencyScheme>> {
        self.factories.get(name)
            .map(|factory| factory())
            .ok_or_else(|| Error::UnknownScheme {
                name: name.to_string(),
                available: self.names(),
            })
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.factories.keys().copied().collect()
    }
}

impl fmt::Debug for SchemeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.factories.keys()).finish()
    }
}

static REGISTRY: Lazy<SchemeRegistry> = Lazy::new(SchemeRegistry::with_standard_schemes);

/// The process-wide registry. Built on first use, read-only afterwards.
pub fn registry() -> &'static SchemeRegistry {
    Lazy::force(&REGISTRY)
}
