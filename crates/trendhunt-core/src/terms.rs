use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// A demand term the collector scores every cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedTerm {
    pub term: String,
    pub category: String,
    pub region: String,
    pub neighborhood: String,
}

impl TrackedTerm {
    /// Case-insensitive identity used for uniqueness and storage keys.
    #[must_use]
    pub fn key(&self) -> String {
        normalize_term(&self.term)
    }
}

/// Canonical form of a term: trimmed, lowercased, single-spaced.
#[must_use]
pub fn normalize_term(term: &str) -> String {
    term.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Clone, Deserialize)]
pub struct TermEntry {
    pub term: String,
    pub category: String,
    pub neighborhood: String,
    /// Overrides the configured default region for this term.
    pub region: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TermsFile {
    pub terms: Vec<TermEntry>,
}

impl TermsFile {
    /// Resolve entries into tracked terms, stamping `default_region` where unset.
    #[must_use]
    pub fn into_tracked(self, default_region: &str) -> Vec<TrackedTerm> {
        self.terms
            .into_iter()
            .map(|entry| TrackedTerm {
                term: entry.term.trim().to_string(),
                category: entry.category,
                region: entry
                    .region
                    .unwrap_or_else(|| default_region.to_string()),
                neighborhood: entry.neighborhood,
            })
            .collect()
    }
}

/// Load and validate the tracked-terms configuration from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_terms(path: &Path, default_region: &str) -> Result<Vec<TrackedTerm>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::TermsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let terms_file: TermsFile = serde_yaml::from_str(&content)?;
    validate_terms(&terms_file)?;

    Ok(terms_file.into_tracked(default_region))
}

fn validate_terms(terms_file: &TermsFile) -> Result<(), ConfigError> {
    if terms_file.terms.is_empty() {
        return Err(ConfigError::Validation(
            "terms file must list at least one term".to_string(),
        ));
    }

    let mut seen = HashSet::new();

    for entry in &terms_file.terms {
        let key = normalize_term(&entry.term);
        if key.is_empty() {
            return Err(ConfigError::Validation(
                "term must be non-empty".to_string(),
            ));
        }
        let blank_field = [
            ("category", Some(entry.category.as_str())),
            ("neighborhood", Some(entry.neighborhood.as_str())),
            ("region", entry.region.as_deref()),
        ]
        .into_iter()
        .find(|(_, value)| value.is_some_and(|v| v.trim().is_empty()));
        if let Some((field, _)) = blank_field {
            return Err(ConfigError::Validation(format!(
                "{field} must be non-empty for term '{}'",
                entry.term
            )));
        }
        if !seen.insert(key) {
            return Err(ConfigError::Validation(format!(
                "duplicate term: '{}'",
                entry.term
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "terms_test.rs"]
mod tests;
