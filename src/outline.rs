//! Structure builder: classified blocks → [`DocumentIndex`].
//!
//! One left-to-right pass over the post-skip block stream tracks the current
//! section and topic. Section and topic ranges tile the indexed region with
//! no gaps or overlaps; a topic heading seen before any section heading is
//! dropped rather than promoted to an implicit section.

use std::path::Path;

use crate::cache::document_identity;
use crate::classify::{self, HeadingClassifier};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::extract;
use crate::models::{Block, BlockClass, DocumentIndex, Section, Topic};

/// Open a document and build its structural index.
pub fn build_index(config: &Config, path: &Path) -> Result<DocumentIndex> {
    let blocks = extract::extract_blocks(path)?;
    let classifier = classify::from_config(&config.classifier)?;
    Ok(index_blocks(
        document_identity(path),
        blocks,
        classifier.as_ref(),
    ))
}

/// Build an index from an already-extracted block stream.
pub fn index_blocks(
    identity: String,
    blocks: Vec<Block>,
    classifier: &dyn HeadingClassifier,
) -> DocumentIndex {
    let classes: Vec<BlockClass> = blocks.iter().map(|b| classifier.classify(b)).collect();

    // Everything up to and including the first skip marker is preamble.
    // Without a marker nothing is discarded.
    let skip_prefix_end = classes
        .iter()
        .position(|c| *c == BlockClass::SkipMarker)
        .map(|i| i + 1)
        .unwrap_or(0);

    let len = blocks.len();
    let mut sections: Vec<Section> = Vec::new();
    let mut open_topic: Option<Topic> = None;

    for offset in skip_prefix_end..len {
        match classes[offset] {
            BlockClass::SectionHeading => {
                if let Some(mut topic) = open_topic.take() {
                    topic.end = offset;
                    if let Some(section) = sections.last_mut() {
                        section.topics.push(topic);
                    }
                }
                if let Some(section) = sections.last_mut() {
                    section.end = offset;
                }
                sections.push(Section {
                    title: block_title(&blocks[offset]),
                    start: offset,
                    end: len,
                    topics: Vec::new(),
                });
            }
            BlockClass::TopicHeading => {
                // A topic needs an open section; otherwise it is dropped.
                if sections.is_empty() {
                    continue;
                }
                if let Some(mut topic) = open_topic.take() {
                    topic.end = offset;
                    if let Some(section) = sections.last_mut() {
                        section.topics.push(topic);
                    }
                }
                open_topic = Some(Topic {
                    title: block_title(&blocks[offset]),
                    start: offset,
                    end: len,
                    section: sections.len() - 1,
                });
            }
            // Body blocks and stray skip markers are located later by
            // offset range, never copied eagerly.
            BlockClass::Body | BlockClass::SkipMarker => {}
        }
    }

    if let Some(mut topic) = open_topic.take() {
        topic.end = len;
        if let Some(section) = sections.last_mut() {
            section.topics.push(topic);
        }
    }

    DocumentIndex {
        identity,
        sections,
        raw_blocks: blocks,
        classes,
        skip_prefix_end,
    }
}

fn block_title(block: &Block) -> String {
    match block {
        Block::Text { content, .. } => content.trim().to_string(),
        Block::Table { .. } => String::new(),
    }
}

impl DocumentIndex {
    /// Section titles in document order.
    pub fn section_titles(&self) -> Vec<String> {
        self.sections.iter().map(|s| s.title.clone()).collect()
    }

    /// Topic titles of one section, in document order. Duplicate titles are
    /// kept as-is.
    pub fn topic_titles(&self, section_title: &str) -> Result<Vec<String>> {
        let section = self
            .find_section(section_title)
            .ok_or_else(|| Error::section_not_found(section_title))?;
        Ok(section.topics.iter().map(|t| t.title.clone()).collect())
    }

    /// First section with the given title.
    pub fn find_section(&self, title: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.title == title)
    }

    /// First topic with the given title under a section. Title lookup always
    /// resolves to the first occurrence; topics are unambiguous only by index.
    pub fn find_topic<'a>(&self, section: &'a Section, title: &str) -> Option<&'a Topic> {
        section.topics.iter().find(|t| t.title == title)
    }

    /// Section enclosing the given block offset, with its index.
    pub(crate) fn section_at(&self, offset: usize) -> Option<(usize, &Section)> {
        self.sections
            .iter()
            .enumerate()
            .find(|(_, s)| s.start <= offset && offset < s.end)
    }

    /// Topic enclosing the given block offset.
    pub(crate) fn topic_at(&self, offset: usize) -> Option<&Topic> {
        let (_, section) = self.section_at(offset)?;
        section
            .topics
            .iter()
            .find(|t| t.start <= offset && offset < t.end)
    }
}
