//! Core data model: discovered documents, per-project result tables and the
//! run-wide set of identity keys already committed.

use std::collections::{BTreeMap, HashSet};

/// A discovered paper. `url` is its identity key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub title: String,
    pub url: String,
    /// Abstract with embedded line breaks removed. Only used for matching.
    pub summary: String,
}

impl Document {
    pub fn new(title: impl Into<String>, url: impl Into<String>, summary: &str) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            summary: strip_line_breaks(summary),
        }
    }

    pub fn key(&self) -> &str {
        &self.url
    }
}

/// Replace embedded line breaks with spaces and trim the ends.
pub fn strip_line_breaks(text: &str) -> String {
    text.replace("\r\n", " ")
        .replace(['\n', '\r'], " ")
        .trim()
        .to_string()
}

/// Documents for one project in insertion order, plus their keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Bucket {
    docs: Vec<Document>,
    keys: HashSet<String>,
}

/// Project name -> documents verified to match that project.
///
/// A given identity key appears at most once per project.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultTable {
    buckets: BTreeMap<String, Bucket>,
}

impl ResultTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `doc` under `project`. Returns false if the project already
    /// holds a document with the same identity key.
    pub fn push(&mut self, project: &str, doc: Document) -> bool {
        let bucket = self.buckets.entry(project.to_string()).or_default();
        if !bucket.keys.insert(doc.url.clone()) {
            return false;
        }
        bucket.docs.push(doc);
        true
    }

    pub fn contains(&self, project: &str, key: &str) -> bool {
        self.buckets
            .get(project)
            .is_some_and(|bucket| bucket.keys.contains(key))
    }

    pub fn get(&self, project: &str) -> &[Document] {
        self.buckets
            .get(project)
            .map(|bucket| bucket.docs.as_slice())
            .unwrap_or(&[])
    }

    /// Iterate `(project, documents)` in project-name order.
    pub fn projects(&self) -> impl Iterator<Item = (&str, &[Document])> {
        self.buckets
            .iter()
            .map(|(project, bucket)| (project.as_str(), bucket.docs.as_slice()))
    }

    /// Iterate every `(project, document)` row.
    pub fn rows(&self) -> impl Iterator<Item = (&str, &Document)> {
        self.buckets.iter().flat_map(|(project, bucket)| {
            bucket.docs.iter().map(move |d| (project.as_str(), d))
        })
    }

    pub fn row_count(&self) -> usize {
        self.buckets.values().map(|bucket| bucket.docs.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }
}

/// Identity keys committed so far in this run. Owned by the orchestrator and
/// never reset between passes.
#[derive(Debug, Clone, Default)]
pub struct SeenSet {
    keys: HashSet<String>,
}

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn insert(&mut self, key: impl Into<String>) -> bool {
        self.keys.insert(key.into())
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
