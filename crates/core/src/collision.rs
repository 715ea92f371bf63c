//! Output identifier collision resolution.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Derives a unique identifier from `declared` given the identifiers already
/// used in this run: `declared` itself when free, otherwise the first free
/// `declared_N` for N = 2, 3, ...
pub fn resolve_identifier(declared: &str, used: &HashSet<String>) -> String {
    if !used.contains(declared) {
        return declared.to_string();
    }

    (2u64..)
        .map(|n| format!("{}_{}", declared, n))
        .find(|candidate| !used.contains(candidate))
        .unwrap_or_else(|| declared.to_string())
}

/// Outcome of resolving one record's identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedIdentifier {
    pub declared: String,
    pub final_id: String,
}

impl ResolvedIdentifier {
    /// Whether a suffix had to be appended.
    pub fn is_renamed(&self) -> bool {
        self.declared != self.final_id
    }
}

/// The set of identifiers used during one run.
///
/// Owned by a single orchestrator run; never shared between runs.
#[derive(Debug, Default)]
pub struct IdentifierRegistry {
    used: HashSet<String>,
}

impl IdentifierRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves and claims an identifier.
    pub fn claim(&mut self, declared: &str) -> ResolvedIdentifier {
        let final_id = resolve_identifier(declared, &self.used);
        self.used.insert(final_id.clone());
        ResolvedIdentifier {
            declared: declared.to_string(),
            final_id,
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.used.contains(id)
    }

    pub fn len(&self) -> usize {
        self.used.len()
    }

    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }
}
