//! Flag folding for resolver implementations
//!
//! A [`FlagSet`] is declared up front with every flag the resolver can
//! produce, all `false`. Lookups then only ever flip flags to their
//! resolved value, so a resolution that fails midway is still total.

use golden_path_types::FlagMap;

use crate::store::StoreResult;

/// Default-false set of named flags
#[derive(Clone, Debug)]
pub struct FlagSet {
    module: &'static str,
    flags: FlagMap,
}

impl FlagSet {
    /// Declare every producible flag, initialized to `false`
    pub fn declare(module: &'static str, names: &[&str]) -> Self {
        Self {
            module,
            flags: names.iter().map(|name| ((*name).to_string(), false)).collect(),
        }
    }

    /// Set a declared flag
    pub fn set(&mut self, name: &str, value: bool) {
        match self.flags.get_mut(name) {
            Some(slot) => *slot = value,
            None => {
                tracing::warn!(module_code = self.module, flag = name, "Undeclared flag ignored");
            }
        }
    }

    /// Fold a lookup result. A failed lookup leaves the flag `false`.
    pub fn record(&mut self, name: &str, result: StoreResult<bool>) {
        match result {
            Ok(value) => self.set(name, value),
            Err(err) => {
                tracing::warn!(
                    module_code = self.module,
                    flag = name,
                    error = %err,
                    "Lookup failed, flag resolved to false"
                );
                self.set(name, false);
            }
        }
    }

    pub fn get(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }

    pub fn into_map(self) -> FlagMap {
        self.flags
    }
}

/// Universal check: at least one value, and every value equals `expected`
pub fn all_equal(values: &[Option<String>], expected: &str) -> bool {
    !values.is_empty() && values.iter().all(|v| v.as_deref() == Some(expected))
}
