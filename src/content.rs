//! Content resolution: `(section, topic)` → ordered text and table items.
//!
//! A topic's body spans `start + 1 .. end` in the raw block stream. Heading
//! and skip-marker blocks inside the range are filtered out defensively,
//! text is trimmed and empty paragraphs dropped; tables pass through as
//! row-major matrices.

use crate::error::{Error, Result};
use crate::models::{Block, BlockClass, ContentItem, DocumentIndex};

/// Resolve the ordered content of one topic.
///
/// Fails with `NotFound` when the section or topic title does not exist. A
/// topic with no body yields an empty sequence.
pub fn get_content(
    index: &DocumentIndex,
    section_title: &str,
    topic_title: &str,
) -> Result<Vec<ContentItem>> {
    let section = index
        .find_section(section_title)
        .ok_or_else(|| Error::section_not_found(section_title))?;
    let topic = index
        .find_topic(section, topic_title)
        .ok_or_else(|| Error::topic_not_found(topic_title))?;
    Ok(resolve_range(index, topic.start + 1, topic.end))
}

/// Collect body content in `[start, end)`, skipping non-body blocks.
pub(crate) fn resolve_range(index: &DocumentIndex, start: usize, end: usize) -> Vec<ContentItem> {
    let end = end.min(index.raw_blocks.len());
    let mut items = Vec::new();
    for offset in start..end {
        match &index.raw_blocks[offset] {
            Block::Text { content, .. } => {
                if index.classes[offset] != BlockClass::Body {
                    continue;
                }
                let trimmed = content.trim();
                if !trimmed.is_empty() {
                    items.push(ContentItem::Text(trimmed.to_string()));
                }
            }
            Block::Table { rows } => items.push(ContentItem::Table(rows.clone())),
        }
    }
    items
}

/// Flatten a topic's resolved text into one string, for use as AI context.
/// Table cells are joined row by row.
pub fn flatten_content(items: &[ContentItem]) -> String {
    let mut parts = Vec::new();
    for item in items {
        match item {
            ContentItem::Text(text) => parts.push(text.clone()),
            ContentItem::Table(rows) => {
                for row in rows {
                    parts.push(row.join(" "));
                }
            }
        }
    }
    parts.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify;
    use crate::config::ClassifierConfig;
    use crate::models::Block;
    use crate::outline::index_blocks;

    fn build(blocks: Vec<Block>) -> DocumentIndex {
        let classifier = classify::from_config(&ClassifierConfig::default()).unwrap();
        index_blocks("test".to_string(), blocks, classifier.as_ref())
    }

    #[test]
    fn resolves_text_and_tables_in_order() {
        let index = build(vec![
            Block::styled("一、通知", "Heading 1"),
            Block::styled("（一）会议", "Heading 2"),
            Block::text("  会议定于周五召开  "),
            Block::Table {
                rows: vec![vec!["姓名".to_string(), "部门".to_string()]],
            },
            Block::text("请准时参加"),
        ]);
        let items = get_content(&index, "一、通知", "（一）会议").unwrap();
        assert_eq!(
            items,
            vec![
                ContentItem::Text("会议定于周五召开".to_string()),
                ContentItem::Table(vec![vec!["姓名".to_string(), "部门".to_string()]]),
                ContentItem::Text("请准时参加".to_string()),
            ]
        );
    }

    #[test]
    fn empty_topic_yields_empty_sequence() {
        let index = build(vec![
            Block::styled("一、通知", "Heading 1"),
            Block::styled("（一）空主题", "Heading 2"),
            Block::styled("二、动态", "Heading 1"),
        ]);
        let items = get_content(&index, "一、通知", "（一）空主题").unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn empty_paragraphs_are_dropped() {
        let index = build(vec![
            Block::styled("一、通知", "Heading 1"),
            Block::styled("（一）会议", "Heading 2"),
            Block::text(""),
            Block::text("正文"),
            Block::text("   "),
        ]);
        let items = get_content(&index, "一、通知", "（一）会议").unwrap();
        assert_eq!(items, vec![ContentItem::Text("正文".to_string())]);
    }

    #[test]
    fn missing_section_or_topic_is_not_found() {
        let index = build(vec![
            Block::styled("一、通知", "Heading 1"),
            Block::styled("（一）会议", "Heading 2"),
        ]);
        assert!(matches!(
            get_content(&index, "三、不存在", "（一）会议"),
            Err(Error::NotFound { kind: "section", .. })
        ));
        assert!(matches!(
            get_content(&index, "一、通知", "（九）不存在"),
            Err(Error::NotFound { kind: "topic", .. })
        ));
    }

    #[test]
    fn flatten_joins_text_and_table_rows() {
        let items = vec![
            ContentItem::Text("第一段".to_string()),
            ContentItem::Table(vec![vec!["甲".to_string(), "乙".to_string()]]),
        ];
        assert_eq!(flatten_content(&items), "第一段\n甲 乙");
    }
}
