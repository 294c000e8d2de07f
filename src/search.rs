//! Keyword search over a [`DocumentIndex`].
//!
//! Matching is plain substring containment — no tokenization, ranking, or
//! relevance scoring. Case folding is configurable and defaults to
//! insensitive. Two modes:
//!
//! - [`search`] tests headings, body paragraphs, and table cells, returning
//!   three sequences in document order. A table emits at most one hit per
//!   query, carrying a snapshot and the 1-based coordinates of the first
//!   matching cell.
//! - [`search_with_context`] scans paragraphs only (headings and body) and
//!   returns each match with a window of neighbouring paragraphs, clipped at
//!   document boundaries.

use crate::content::resolve_range;
use crate::error::{Error, Result};
use crate::models::{
    Block, BlockClass, ContentHit, ContentItem, ContextualHit, DocumentIndex, SearchHits, TableHit,
    TitleHit, TitleKind,
};

struct Matcher {
    needle: String,
    case_insensitive: bool,
}

impl Matcher {
    fn new(keyword: &str, case_insensitive: bool) -> Result<Self> {
        let trimmed = keyword.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidArgument("keyword must not be empty".into()));
        }
        let needle = if case_insensitive {
            trimmed.to_lowercase()
        } else {
            trimmed.to_string()
        };
        Ok(Self {
            needle,
            case_insensitive,
        })
    }

    fn hit(&self, haystack: &str) -> bool {
        if self.case_insensitive {
            haystack.to_lowercase().contains(&self.needle)
        } else {
            haystack.contains(&self.needle)
        }
    }
}

/// Primary keyword search: title, content, and table hits in document order.
pub fn search(index: &DocumentIndex, keyword: &str, case_insensitive: bool) -> Result<SearchHits> {
    let matcher = Matcher::new(keyword, case_insensitive)?;
    let mut hits = SearchHits::default();

    for section in &index.sections {
        if matcher.hit(&section.title) {
            hits.titles.push(TitleHit {
                section: section.title.clone(),
                topic: None,
                matched: section.title.clone(),
                kind: TitleKind::Section,
            });
        }
        for topic in &section.topics {
            if matcher.hit(&topic.title) {
                hits.titles.push(TitleHit {
                    section: section.title.clone(),
                    topic: Some(topic.title.clone()),
                    matched: topic.title.clone(),
                    kind: TitleKind::Topic,
                });
            }
        }
    }

    for section in &index.sections {
        for topic in &section.topics {
            for item in resolve_range(index, topic.start + 1, topic.end) {
                match item {
                    ContentItem::Text(text) => {
                        if matcher.hit(&text) {
                            hits.contents.push(ContentHit {
                                section: section.title.clone(),
                                topic: topic.title.clone(),
                                matched: text,
                            });
                        }
                    }
                    ContentItem::Table(rows) => {
                        // One hit per table: the first matching cell,
                        // row-major, 1-based.
                        if let Some((row, col)) = first_matching_cell(&matcher, &rows) {
                            hits.tables.push(TableHit {
                                section: section.title.clone(),
                                topic: topic.title.clone(),
                                row,
                                col,
                                rows,
                            });
                        }
                    }
                }
            }
        }
    }

    Ok(hits)
}

fn first_matching_cell(matcher: &Matcher, rows: &[Vec<String>]) -> Option<(usize, usize)> {
    for (r, row) in rows.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            if matcher.hit(cell) {
                return Some((r + 1, c + 1));
            }
        }
    }
    None
}

/// Contextual search: each matching paragraph with up to `window` paragraphs
/// of context on each side, in document order. Tables are excluded.
pub fn search_with_context(
    index: &DocumentIndex,
    keyword: &str,
    window: usize,
    case_insensitive: bool,
) -> Result<Vec<ContextualHit>> {
    let matcher = Matcher::new(keyword, case_insensitive)?;

    // Flatten the indexed region to non-empty paragraphs (headings included,
    // tables and stray skip markers excluded).
    let mut paragraphs: Vec<(usize, String)> = Vec::new();
    for offset in index.skip_prefix_end..index.raw_blocks.len() {
        if let Block::Text { content, .. } = &index.raw_blocks[offset] {
            if index.classes[offset] == BlockClass::SkipMarker {
                continue;
            }
            let trimmed = content.trim();
            if !trimmed.is_empty() {
                paragraphs.push((offset, trimmed.to_string()));
            }
        }
    }

    let mut hits = Vec::new();
    for (pos, (offset, text)) in paragraphs.iter().enumerate() {
        if !matcher.hit(text) {
            continue;
        }
        let before_start = pos.saturating_sub(window);
        let after_end = (pos + 1 + window).min(paragraphs.len());
        hits.push(ContextualHit {
            section: index.section_at(*offset).map(|(_, s)| s.title.clone()),
            topic: index.topic_at(*offset).map(|t| t.title.clone()),
            matched: text.clone(),
            before: paragraphs[before_start..pos]
                .iter()
                .map(|(_, t)| t.clone())
                .collect(),
            after: paragraphs[pos + 1..after_end]
                .iter()
                .map(|(_, t)| t.clone())
                .collect(),
        });
    }
    Ok(hits)
}
