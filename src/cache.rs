//! In-process memoization of search results.
//!
//! Documents are immutable for the lifetime of a run, so entries never
//! expire. Keys use the full document identity (canonical path), never the
//! bare filename, so same-named issues under different years cannot collide.
//! The cache is read-mostly shared state behind `RwLock`s; concurrent misses
//! on one key may recompute redundantly, which is accepted. Disabling the
//! cache changes only latency, never results.

use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;

use crate::models::{CorpusHits, DocRef, SearchHits};

/// Full identity of a document: the canonicalized path, falling back to the
/// given path when canonicalization fails (e.g. the file is gone).
pub fn document_identity(path: &Path) -> String {
    std::fs::canonicalize(path)
        .unwrap_or_else(|_| path.to_path_buf())
        .to_string_lossy()
        .into_owned()
}

/// Identity of an ordered document set. Order matters: corpus results are
/// merged in caller-supplied order.
pub fn corpus_identity(docs: &[DocRef]) -> String {
    docs.iter()
        .map(|d| document_identity(&d.path))
        .collect::<Vec<_>>()
        .join("\n")
}

type Key = (String, String);

/// Shared memo of `(identity, keyword)` → result, for single documents and
/// ordered corpora.
pub struct SearchCache {
    enabled: bool,
    docs: RwLock<HashMap<Key, SearchHits>>,
    corpora: RwLock<HashMap<Key, CorpusHits>>,
}

impl SearchCache {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            docs: RwLock::new(HashMap::new()),
            corpora: RwLock::new(HashMap::new()),
        }
    }

    pub fn get_doc(&self, identity: &str, keyword: &str) -> Option<SearchHits> {
        if !self.enabled {
            return None;
        }
        let docs = self.docs.read().unwrap();
        let hit = docs.get(&(identity.to_string(), keyword.to_string())).cloned();
        if hit.is_some() {
            tracing::debug!(identity, keyword, "document cache hit");
        }
        hit
    }

    pub fn put_doc(&self, identity: String, keyword: String, hits: &SearchHits) {
        if !self.enabled {
            return;
        }
        let mut docs = self.docs.write().unwrap();
        docs.insert((identity, keyword), hits.clone());
    }

    pub fn get_corpus(&self, identity: &str, keyword: &str) -> Option<CorpusHits> {
        if !self.enabled {
            return None;
        }
        let corpora = self.corpora.read().unwrap();
        let hit = corpora
            .get(&(identity.to_string(), keyword.to_string()))
            .cloned();
        if hit.is_some() {
            tracing::debug!(keyword, "corpus cache hit");
        }
        hit
    }

    pub fn put_corpus(&self, identity: String, keyword: String, hits: &CorpusHits) {
        if !self.enabled {
            return;
        }
        let mut corpora = self.corpora.write().unwrap();
        corpora.insert((identity, keyword), hits.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ContentHit, SearchHits};

    fn one_hit() -> SearchHits {
        SearchHits {
            contents: vec![ContentHit {
                section: "一、通知".to_string(),
                topic: "（一）会议".to_string(),
                matched: "会议定于周五召开".to_string(),
            }],
            ..SearchHits::default()
        }
    }

    #[test]
    fn hit_after_put_miss_before() {
        let cache = SearchCache::new(true);
        assert!(cache.get_doc("/books/2023/第1期.docx", "会议").is_none());
        cache.put_doc(
            "/books/2023/第1期.docx".to_string(),
            "会议".to_string(),
            &one_hit(),
        );
        let hit = cache.get_doc("/books/2023/第1期.docx", "会议").unwrap();
        assert_eq!(hit.len(), 1);
    }

    #[test]
    fn same_filename_different_year_does_not_collide() {
        let cache = SearchCache::new(true);
        cache.put_doc(
            "/books/2023/第1期.docx".to_string(),
            "会议".to_string(),
            &one_hit(),
        );
        assert!(cache.get_doc("/books/2024/第1期.docx", "会议").is_none());
    }

    #[test]
    fn keyword_is_part_of_the_key() {
        let cache = SearchCache::new(true);
        cache.put_doc(
            "/books/2023/第1期.docx".to_string(),
            "会议".to_string(),
            &one_hit(),
        );
        assert!(cache.get_doc("/books/2023/第1期.docx", "通知").is_none());
    }

    #[test]
    fn disabled_cache_never_stores() {
        let cache = SearchCache::new(false);
        cache.put_doc("/a".to_string(), "k".to_string(), &one_hit());
        assert!(cache.get_doc("/a", "k").is_none());
    }

    #[test]
    fn identity_falls_back_to_given_path() {
        let identity = document_identity(Path::new("/no/such/file.docx"));
        assert_eq!(identity, "/no/such/file.docx");
    }
}
