//! End-to-end tests over a temporary shelf of generated `.docx` issues.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::TempDir;

use shelf_search::cache::SearchCache;
use shelf_search::catalog;
use shelf_search::config::{AiConfig, ClassifierConfig, Config, LibraryConfig, SearchConfig};
use shelf_search::content::get_content;
use shelf_search::corpus::search_corpus;
use shelf_search::models::{ContentItem, TitleKind};
use shelf_search::outline::build_index;
use shelf_search::search::{search, search_with_context};

enum Piece<'a> {
    Para(&'a str),
    Styled(&'a str, &'a str),
    Table(Vec<Vec<&'a str>>),
}

/// Minimal docx (ZIP with `word/document.xml`) built from pieces.
fn build_docx(pieces: &[Piece<'_>]) -> Vec<u8> {
    let mut body = String::new();
    for piece in pieces {
        match piece {
            Piece::Para(text) => {
                body.push_str(&format!("<w:p><w:r><w:t>{}</w:t></w:r></w:p>", text));
            }
            Piece::Styled(text, style) => {
                body.push_str(&format!(
                    "<w:p><w:pPr><w:pStyle w:val=\"{}\"/></w:pPr><w:r><w:t>{}</w:t></w:r></w:p>",
                    style, text
                ));
            }
            Piece::Table(rows) => {
                body.push_str("<w:tbl>");
                for cells in rows {
                    body.push_str("<w:tr>");
                    for cell in cells {
                        body.push_str(&format!(
                            "<w:tc><w:p><w:r><w:t>{}</w:t></w:r></w:p></w:tc>",
                            cell
                        ));
                    }
                    body.push_str("</w:tr>");
                }
                body.push_str("</w:tbl>");
            }
        }
    }
    let xml = format!(
        "<?xml version=\"1.0\"?><w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\"><w:body>{}</w:body></w:document>",
        body
    );

    let mut buf = Vec::new();
    {
        let mut zip = zip::ZipWriter::new(std::io::Cursor::new(&mut buf));
        zip.start_file(
            "word/document.xml",
            zip::write::SimpleFileOptions::default(),
        )
        .unwrap();
        zip.write_all(xml.as_bytes()).unwrap();
        zip.finish().unwrap();
    }
    buf
}

fn issue_2023_1() -> Vec<u8> {
    let marker = "0".repeat(60);
    build_docx(&[
        Piece::Para("扉页说明，不应被索引"),
        Piece::Para(&marker),
        Piece::Styled("一、通知", "Heading1"),
        Piece::Styled("（一）会议", "Heading2"),
        Piece::Para("会议定于周五召开"),
        Piece::Table(vec![
            vec!["姓名", "部门"],
            vec!["张三", "技术部"],
            vec!["李四", "综合部"],
        ]),
        Piece::Styled("二、动态", "Heading1"),
    ])
}

fn issue_2024_1() -> Vec<u8> {
    let marker = "0".repeat(30);
    build_docx(&[
        Piece::Para(&marker),
        Piece::Styled("一、要闻", "Heading1"),
        Piece::Styled("（一）总结", "Heading2"),
        Piece::Para("年度会议总结发布"),
    ])
}

fn seed_shelf(root: &Path) {
    fs::create_dir_all(root.join("2023年")).unwrap();
    fs::create_dir_all(root.join("2024年")).unwrap();
    fs::write(root.join("2023年/第1期.docx"), issue_2023_1()).unwrap();
    fs::write(root.join("2024年/第1期.docx"), issue_2024_1()).unwrap();
    fs::write(root.join("2024年/第2期.docx"), b"corrupted, not a zip").unwrap();
}

fn shelf_config(root: &Path) -> Config {
    Config {
        library: LibraryConfig {
            root: root.to_path_buf(),
            year_dir_suffix: "年".to_string(),
        },
        classifier: ClassifierConfig::default(),
        search: SearchConfig::default(),
        ai: AiConfig::default(),
    }
}

#[test]
fn outline_and_content_of_a_generated_issue() {
    let tmp = TempDir::new().unwrap();
    seed_shelf(tmp.path());
    let config = shelf_config(tmp.path());

    let path = catalog::resolve_path(&config, "2023", "第1期.docx").unwrap();
    let index = build_index(&config, &path).unwrap();

    assert_eq!(index.section_titles(), vec!["一、通知", "二、动态"]);
    assert_eq!(index.topic_titles("一、通知").unwrap(), vec!["（一）会议"]);
    assert_eq!(
        index.topic_titles("二、动态").unwrap(),
        Vec::<String>::new()
    );

    let items = get_content(&index, "一、通知", "（一）会议").unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0], ContentItem::Text("会议定于周五召开".to_string()));
    assert!(matches!(items[1], ContentItem::Table(_)));
}

#[test]
fn preamble_before_skip_marker_is_invisible() {
    let tmp = TempDir::new().unwrap();
    seed_shelf(tmp.path());
    let config = shelf_config(tmp.path());

    let path = catalog::resolve_path(&config, "2023", "第1期.docx").unwrap();
    let index = build_index(&config, &path).unwrap();

    let hits = search(&index, "扉页", true).unwrap();
    assert!(hits.is_empty());
    let hits = search_with_context(&index, "扉页", 2, true).unwrap();
    assert!(hits.is_empty());
}

#[test]
fn single_issue_search_hits_all_three_granularities() {
    let tmp = TempDir::new().unwrap();
    seed_shelf(tmp.path());
    let config = shelf_config(tmp.path());

    let path = catalog::resolve_path(&config, "2023", "第1期.docx").unwrap();
    let index = build_index(&config, &path).unwrap();

    let hits = search(&index, "会议", true).unwrap();
    assert_eq!(hits.titles.len(), 1);
    assert_eq!(hits.titles[0].kind, TitleKind::Topic);
    assert_eq!(hits.contents.len(), 1);

    // Both 技术部 and 综合部 cells contain 部, but one table yields one hit.
    let hits = search(&index, "部", true).unwrap();
    assert_eq!(hits.tables.len(), 1);
    assert_eq!((hits.tables[0].row, hits.tables[0].col), (1, 2));
    assert_eq!(hits.tables[0].rows.len(), 3);
}

#[test]
fn contextual_search_clips_to_available_paragraphs() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    fs::create_dir_all(root.join("2025年")).unwrap();
    fs::write(
        root.join("2025年/第1期.docx"),
        build_docx(&[Piece::Para("仅有一段的文档")]),
    )
    .unwrap();
    let config = shelf_config(root);

    let path = catalog::resolve_path(&config, "2025", "第1期.docx").unwrap();
    let index = build_index(&config, &path).unwrap();

    let hits = search_with_context(&index, "文档", 2, true).unwrap();
    assert_eq!(hits.len(), 1);
    assert!(hits[0].before.is_empty());
    assert!(hits[0].after.is_empty());
}

#[tokio::test]
async fn corpus_search_survives_a_corrupt_issue_and_stamps_provenance() {
    let tmp = TempDir::new().unwrap();
    seed_shelf(tmp.path());
    let config = shelf_config(tmp.path());

    let docs = catalog::collect_docs(&config, None, None);
    assert_eq!(docs.len(), 3); // includes the corrupt 2024/第2期.docx

    let cache = SearchCache::new(true);
    let hits = search_corpus(&config, &docs, "会议", &cache).await.unwrap();

    // Title hit from 2023, content hits from both readable issues, in
    // caller-supplied (year, issue) order.
    assert_eq!(hits.titles.len(), 1);
    assert_eq!(hits.titles[0].year, "2023");
    assert_eq!(hits.titles[0].issue, "第1期.docx");

    let provenance: Vec<_> = hits
        .contents
        .iter()
        .map(|s| (s.year.as_str(), s.issue.as_str()))
        .collect();
    assert_eq!(
        provenance,
        vec![("2023", "第1期.docx"), ("2024", "第1期.docx")]
    );

    // The memoized second run returns the same merged result.
    let again = search_corpus(&config, &docs, "会议", &cache).await.unwrap();
    assert_eq!(again.len(), hits.len());
}

#[tokio::test]
async fn scoping_to_one_year_restricts_provenance() {
    let tmp = TempDir::new().unwrap();
    seed_shelf(tmp.path());
    let config = shelf_config(tmp.path());

    let docs = catalog::collect_docs(&config, Some("2024"), None);
    let cache = SearchCache::new(false);
    let hits = search_corpus(&config, &docs, "会议", &cache).await.unwrap();

    assert!(!hits.is_empty());
    assert!(hits.contents.iter().all(|s| s.year == "2024"));
}
