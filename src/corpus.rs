//! Corpus aggregation: fan one keyword search over many documents.
//!
//! Documents are searched independently on a bounded worker pool and merged
//! back into caller-supplied order, never arrival order. Each hit is stamped
//! with the document's year/issue provenance from the catalog. A document
//! that fails to open or parse is logged and skipped; one bad file never
//! aborts the batch.

use std::path::Path;

use tokio::task::JoinSet;
use tracing::warn;

use crate::cache::{corpus_identity, document_identity, SearchCache};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::{CorpusHits, DocRef, SearchHits, Stamped};
use crate::outline;
use crate::search;

/// Search one document: open, index, search.
pub fn search_one(config: &Config, path: &Path, keyword: &str) -> Result<SearchHits> {
    let index = outline::build_index(config, path)?;
    search::search(&index, keyword, config.search.case_insensitive)
}

/// Search every document in `docs`, in the given order, and merge the hits
/// with provenance stamps.
pub async fn search_corpus(
    config: &Config,
    docs: &[DocRef],
    keyword: &str,
    cache: &SearchCache,
) -> Result<CorpusHits> {
    let keyword = keyword.trim().to_string();
    if keyword.is_empty() {
        return Err(Error::InvalidArgument("keyword must not be empty".into()));
    }

    let corpus_key = corpus_identity(docs);
    if let Some(hits) = cache.get_corpus(&corpus_key, &keyword) {
        return Ok(hits);
    }

    let identities: Vec<String> = docs.iter().map(|d| document_identity(&d.path)).collect();

    // Result slot per document; filled from cache or from the worker pool,
    // so output order is the caller's order regardless of completion order.
    let mut slots: Vec<Option<SearchHits>> = vec![None; docs.len()];
    let mut pending: Vec<usize> = Vec::new();
    for (pos, identity) in identities.iter().enumerate() {
        match cache.get_doc(identity, &keyword) {
            Some(hits) => slots[pos] = Some(hits),
            None => pending.push(pos),
        }
    }

    let workers = config.search.workers.max(1);
    for batch in pending.chunks(workers) {
        let mut set: JoinSet<(usize, Result<SearchHits>)> = JoinSet::new();
        for &pos in batch {
            let config = config.clone();
            let path = docs[pos].path.clone();
            let keyword = keyword.clone();
            set.spawn_blocking(move || (pos, search_one(&config, &path, &keyword)));
        }
        while let Some(joined) = set.join_next().await {
            let (pos, result) = match joined {
                Ok(pair) => pair,
                Err(e) => {
                    warn!("corpus search task failed: {}", e);
                    continue;
                }
            };
            match result {
                Ok(hits) => {
                    cache.put_doc(identities[pos].clone(), keyword.clone(), &hits);
                    slots[pos] = Some(hits);
                }
                Err(Error::DocumentUnreadable { path, reason }) => {
                    warn!(path = %path.display(), "skipping unreadable document: {}", reason);
                }
                Err(e) => return Err(e),
            }
        }
    }

    let mut merged = CorpusHits::default();
    for (doc, slot) in docs.iter().zip(slots) {
        let Some(hits) = slot else { continue };
        for hit in hits.titles {
            merged.titles.push(Stamped {
                year: doc.year.clone(),
                issue: doc.issue.clone(),
                hit,
            });
        }
        for hit in hits.contents {
            merged.contents.push(Stamped {
                year: doc.year.clone(),
                issue: doc.issue.clone(),
                hit,
            });
        }
        for hit in hits.tables {
            merged.tables.push(Stamped {
                year: doc.year.clone(),
                issue: doc.issue.clone(),
                hit,
            });
        }
    }

    cache.put_corpus(corpus_key, keyword, &merged);
    Ok(merged)
}
