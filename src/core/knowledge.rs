//! Knowledge base
//!
//! The fixed, ordered FAQ table the matcher scores queries against.
//! It is loaded once at startup and never mutated afterwards.

use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::errors::{AssistantError, Result};

/// Table compiled into the binary
const BUILTIN_TABLE: &str = include_str!("../../data/knowledge_base.yaml");

/// One FAQ record
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Entry {
    /// Display label, not used for matching
    pub question: String,
    /// Returned verbatim when the entry matches
    pub answer: String,
    /// Case-insensitive trigger strings
    pub keywords: Vec<String>,
}

impl Entry {
    /// Build an entry from string slices
    pub fn new(
        question: impl Into<String>,
        answer: impl Into<String>,
        keywords: &[&str],
    ) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    fn validate(&self, index: usize) -> Result<()> {
        if self.answer.trim().is_empty() {
            return Err(AssistantError::KnowledgeBase(format!(
                "entry #{} ({:?}) has an empty answer",
                index, self.question
            )));
        }

        if self.keywords.is_empty() {
            return Err(AssistantError::KnowledgeBase(format!(
                "entry #{} ({:?}) has no keywords",
                index, self.question
            )));
        }

        // a blank keyword is contained in every query
        if self.keywords.iter().any(|k| k.trim().is_empty()) {
            return Err(AssistantError::KnowledgeBase(format!(
                "entry #{} ({:?}) has a blank keyword",
                index, self.question
            )));
        }

        Ok(())
    }
}

/// Read-only, ordered collection of entries
///
/// Iteration order is the tie-break order used by the matcher.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    entries: Vec<Entry>,
}

impl KnowledgeBase {
    /// Validate and wrap a list of entries
    pub fn new(entries: Vec<Entry>) -> Result<Self> {
        if entries.is_empty() {
            return Err(AssistantError::KnowledgeBase(
                "knowledge base has no entries".to_string(),
            ));
        }

        for (index, entry) in entries.iter().enumerate() {
            entry.validate(index)?;
        }

        Ok(Self { entries })
    }

    /// Parse a YAML table
    pub fn from_yaml(source: &str) -> Result<Self> {
        let entries: Vec<Entry> = serde_yaml::from_str(source)?;
        Self::new(entries)
    }

    /// Table shipped with the binary
    pub fn builtin() -> Result<Self> {
        Self::from_yaml(BUILTIN_TABLE)
    }

    /// Load a table from disk
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| {
            AssistantError::KnowledgeBase(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&source)
    }

    /// Load the configured table, falling back to the built-in one
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let kb = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::builtin()?,
        };

        info!(entries = kb.len(), "knowledge base loaded");
        Ok(kb)
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a KnowledgeBase {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
