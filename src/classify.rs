//! Heading classification strategies.
//!
//! Two interchangeable strategies decide whether a paragraph is a section
//! heading, a topic heading, or body text:
//!
//! - [`StyleClassifier`] tests the paragraph's style label against
//!   configurable alias sets (exact membership).
//! - [`PatternClassifier`] tests the trimmed text against ordered regular
//!   expression lists; section patterns are checked before topic patterns
//!   and the first match wins.
//!
//! Both recognize skip markers (a run of one repeated filler character of at
//! least `skip_marker_min_len` characters). Classification is total: anything
//! unmatched is body text, and tables are always body.

use std::collections::HashSet;

use regex::Regex;

use crate::config::ClassifierConfig;
use crate::error::{Error, Result};
use crate::models::{Block, BlockClass};

pub trait HeadingClassifier: Send + Sync {
    fn classify(&self, block: &Block) -> BlockClass;
}

/// Build the classifier selected by configuration.
pub fn from_config(config: &ClassifierConfig) -> Result<Box<dyn HeadingClassifier>> {
    match config.strategy.as_str() {
        "style" => Ok(Box::new(StyleClassifier::new(
            &config.section_styles,
            &config.topic_styles,
            config.skip_marker_min_len,
        ))),
        "pattern" => Ok(Box::new(PatternClassifier::new(
            &config.section_patterns,
            &config.topic_patterns,
            config.skip_marker_min_len,
        )?)),
        other => Err(Error::InvalidArgument(format!(
            "unknown classifier strategy: {}",
            other
        ))),
    }
}

/// True when the trimmed text is one repeated filler character of at least
/// `min_len` characters.
fn is_skip_marker(trimmed: &str, min_len: usize) -> bool {
    let mut chars = trimmed.chars();
    let first = match chars.next() {
        Some(c) => c,
        None => return false,
    };
    let mut count = 1usize;
    for c in chars {
        if c != first {
            return false;
        }
        count += 1;
    }
    count >= min_len
}

/// Classifies headings by the paragraph style label.
pub struct StyleClassifier {
    section_styles: HashSet<String>,
    topic_styles: HashSet<String>,
    skip_marker_min_len: usize,
}

impl StyleClassifier {
    pub fn new(section_styles: &[String], topic_styles: &[String], skip_marker_min_len: usize) -> Self {
        Self {
            section_styles: section_styles.iter().cloned().collect(),
            topic_styles: topic_styles.iter().cloned().collect(),
            skip_marker_min_len,
        }
    }
}

impl HeadingClassifier for StyleClassifier {
    fn classify(&self, block: &Block) -> BlockClass {
        let (content, style_label) = match block {
            Block::Text {
                content,
                style_label,
            } => (content, style_label),
            Block::Table { .. } => return BlockClass::Body,
        };
        let trimmed = content.trim();
        if is_skip_marker(trimmed, self.skip_marker_min_len) {
            return BlockClass::SkipMarker;
        }
        if trimmed.is_empty() {
            return BlockClass::Body;
        }
        if self.section_styles.contains(style_label) {
            BlockClass::SectionHeading
        } else if self.topic_styles.contains(style_label) {
            BlockClass::TopicHeading
        } else {
            BlockClass::Body
        }
    }
}

/// Classifies headings by text patterns, for corpora without reliable styles.
pub struct PatternClassifier {
    section_patterns: Vec<Regex>,
    topic_patterns: Vec<Regex>,
    skip_marker_min_len: usize,
}

impl PatternClassifier {
    pub fn new(
        section_patterns: &[String],
        topic_patterns: &[String],
        skip_marker_min_len: usize,
    ) -> Result<Self> {
        Ok(Self {
            section_patterns: compile(section_patterns)?,
            topic_patterns: compile(topic_patterns)?,
            skip_marker_min_len,
        })
    }
}

fn compile(patterns: &[String]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|p| {
            Regex::new(p)
                .map_err(|e| Error::InvalidArgument(format!("invalid pattern {}: {}", p, e)))
        })
        .collect()
}

impl HeadingClassifier for PatternClassifier {
    fn classify(&self, block: &Block) -> BlockClass {
        let content = match block {
            Block::Text { content, .. } => content,
            Block::Table { .. } => return BlockClass::Body,
        };
        let trimmed = content.trim();
        if is_skip_marker(trimmed, self.skip_marker_min_len) {
            return BlockClass::SkipMarker;
        }
        if trimmed.is_empty() {
            return BlockClass::Body;
        }
        // Section patterns take precedence; first match wins.
        if self.section_patterns.iter().any(|re| re.is_match(trimmed)) {
            BlockClass::SectionHeading
        } else if self.topic_patterns.iter().any(|re| re.is_match(trimmed)) {
            BlockClass::TopicHeading
        } else {
            BlockClass::Body
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClassifierConfig;

    fn style_classifier() -> Box<dyn HeadingClassifier> {
        from_config(&ClassifierConfig::default()).unwrap()
    }

    fn pattern_classifier() -> Box<dyn HeadingClassifier> {
        let config = ClassifierConfig {
            strategy: "pattern".to_string(),
            ..ClassifierConfig::default()
        };
        from_config(&config).unwrap()
    }

    #[test]
    fn style_labels_decide_headings() {
        let c = style_classifier();
        assert_eq!(
            c.classify(&Block::styled("一、通知", "Heading 1")),
            BlockClass::SectionHeading
        );
        assert_eq!(
            c.classify(&Block::styled("一、通知", "Heading1")),
            BlockClass::SectionHeading
        );
        assert_eq!(
            c.classify(&Block::styled("（一）会议", "Heading 2")),
            BlockClass::TopicHeading
        );
        assert_eq!(
            c.classify(&Block::styled("正文内容", "Normal")),
            BlockClass::Body
        );
    }

    #[test]
    fn style_heading_with_empty_text_is_body() {
        let c = style_classifier();
        assert_eq!(
            c.classify(&Block::styled("   ", "Heading 1")),
            BlockClass::Body
        );
    }

    #[test]
    fn patterns_decide_headings_section_first() {
        let c = pattern_classifier();
        assert_eq!(
            c.classify(&Block::text("三、科研动态")),
            BlockClass::SectionHeading
        );
        assert_eq!(
            c.classify(&Block::text("（二）学术讲座")),
            BlockClass::TopicHeading
        );
        assert_eq!(c.classify(&Block::text("1.2 子条目")), BlockClass::TopicHeading);
        assert_eq!(c.classify(&Block::text("① 第一项")), BlockClass::TopicHeading);
        assert_eq!(c.classify(&Block::text("普通正文段落")), BlockClass::Body);
    }

    #[test]
    fn skip_marker_threshold_is_inclusive() {
        let style = style_classifier();
        let pattern = pattern_classifier();
        let at = "0".repeat(20);
        let below = "0".repeat(19);
        for c in [&style, &pattern] {
            assert_eq!(c.classify(&Block::text(at.clone())), BlockClass::SkipMarker);
            assert_eq!(c.classify(&Block::text(below.clone())), BlockClass::Body);
        }
    }

    #[test]
    fn skip_marker_any_single_filler_char() {
        let c = style_classifier();
        assert_eq!(
            c.classify(&Block::text("-".repeat(30))),
            BlockClass::SkipMarker
        );
        // Mixed characters never qualify.
        let mut mixed = "0".repeat(29);
        mixed.push('1');
        assert_eq!(c.classify(&Block::text(mixed)), BlockClass::Body);
    }

    #[test]
    fn skip_marker_trims_surrounding_whitespace() {
        let c = style_classifier();
        let padded = format!("  {}  ", "0".repeat(25));
        assert_eq!(c.classify(&Block::text(padded)), BlockClass::SkipMarker);
    }

    #[test]
    fn tables_are_always_body() {
        let c = pattern_classifier();
        let table = Block::Table {
            rows: vec![vec!["一、通知".to_string()]],
        };
        assert_eq!(c.classify(&table), BlockClass::Body);
    }
}
