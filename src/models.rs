//! Core data models used throughout shelf-search.
//!
//! These types represent the document blocks, the two-level Section → Topic
//! hierarchy recovered from them, and the search results that flow out of the
//! query engine.

use std::path::PathBuf;

/// One paragraph or table as emitted by the document extractor, in document
/// order. Blocks are read-only once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// A paragraph with its raw text and the style label carried by the
    /// document (e.g. `Heading1`). Empty paragraphs are kept so that block
    /// offsets match the document.
    Text { content: String, style_label: String },
    /// A table as a row-major matrix of cell strings.
    Table { rows: Vec<Vec<String>> },
}

impl Block {
    pub fn text(content: impl Into<String>) -> Self {
        Block::Text {
            content: content.into(),
            style_label: String::new(),
        }
    }

    pub fn styled(content: impl Into<String>, style_label: impl Into<String>) -> Self {
        Block::Text {
            content: content.into(),
            style_label: style_label.into(),
        }
    }
}

/// Classification assigned to each block by a heading classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockClass {
    SectionHeading,
    TopicHeading,
    Body,
    /// Sentinel paragraph (a long run of one filler character) marking the
    /// end of a disposable preamble.
    SkipMarker,
}

/// Second-level heading nested in a [`Section`]; the unit of readable content.
///
/// `start` is the offset of the topic-heading block; the topic's body spans
/// `start + 1 .. end`. `section` is the index of the owning section in
/// [`DocumentIndex::sections`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    pub title: String,
    pub start: usize,
    /// Exclusive end offset: the next topic's start, the section's end, or
    /// the document length.
    pub end: usize,
    pub section: usize,
}

/// Top-level heading grouping (a "column" in the source journals).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    pub start: usize,
    /// Exclusive end offset: the next section's start or the document length.
    pub end: usize,
    pub topics: Vec<Topic>,
}

/// Immutable structural index of one document.
///
/// Built fresh per open request and never mutated; membership of body blocks
/// is determined by offset range rather than eager copying. Blocks before
/// `skip_prefix_end` are excluded from indexing entirely.
#[derive(Debug, Clone)]
pub struct DocumentIndex {
    /// Full document identity (canonical path), not just the filename.
    pub identity: String,
    pub sections: Vec<Section>,
    pub raw_blocks: Vec<Block>,
    /// Classification of each raw block, aligned by offset. Retained so that
    /// content resolution and search need no classifier.
    pub classes: Vec<BlockClass>,
    pub skip_prefix_end: usize,
}

/// One resolved content item of a topic, in original order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentItem {
    Text(String),
    Table(Vec<Vec<String>>),
}

/// Whether a title hit matched a section or a topic heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleKind {
    Section,
    Topic,
}

/// A keyword match on a section or topic title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleHit {
    pub section: String,
    /// `None` when the section title itself matched.
    pub topic: Option<String>,
    pub matched: String,
    pub kind: TitleKind,
}

/// A keyword match in a body paragraph. Carries the full paragraph; callers
/// recompute highlighting from the keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentHit {
    pub section: String,
    pub topic: String,
    pub matched: String,
}

/// A keyword match in a table. At most one hit is emitted per table per
/// query; `row`/`col` are the 1-based coordinates of the first matching cell
/// and `rows` is a full snapshot of the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableHit {
    pub section: String,
    pub topic: String,
    pub row: usize,
    pub col: usize,
    pub rows: Vec<Vec<String>>,
}

/// Result of a primary search over one document: three sequences, each in
/// document order. Display concatenation order is titles → contents → tables.
#[derive(Debug, Clone, Default)]
pub struct SearchHits {
    pub titles: Vec<TitleHit>,
    pub contents: Vec<ContentHit>,
    pub tables: Vec<TableHit>,
}

impl SearchHits {
    pub fn len(&self) -> usize {
        self.titles.len() + self.contents.len() + self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A contextual-search match: the paragraph plus a window of neighbouring
/// paragraphs in document order, clipped at document boundaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextualHit {
    /// Enclosing section, if the paragraph falls inside one.
    pub section: Option<String>,
    /// Enclosing topic, if the paragraph falls inside one.
    pub topic: Option<String>,
    pub matched: String,
    pub before: Vec<String>,
    pub after: Vec<String>,
}

/// Year/issue provenance attached to a hit during corpus aggregation. The
/// stamp is derived from the catalog, never parsed from document content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stamped<T> {
    pub year: String,
    pub issue: String,
    pub hit: T,
}

/// Merged result of a corpus-wide search. Within each sequence, hits appear
/// in caller-supplied document order, then engine order within a document.
#[derive(Debug, Clone, Default)]
pub struct CorpusHits {
    pub titles: Vec<Stamped<TitleHit>>,
    pub contents: Vec<Stamped<ContentHit>>,
    pub tables: Vec<Stamped<TableHit>>,
}

impl CorpusHits {
    pub fn len(&self) -> usize {
        self.titles.len() + self.contents.len() + self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A document scheduled for corpus search, with its catalog provenance.
#[derive(Debug, Clone)]
pub struct DocRef {
    pub year: String,
    pub issue: String,
    pub path: PathBuf,
}
