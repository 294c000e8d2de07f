//! Block extraction from `.docx` documents.
//!
//! A document is a ZIP archive whose body lives in `word/document.xml`. This
//! module walks that XML once and yields the ordered [`Block`] stream the
//! indexer consumes: paragraphs (`w:p`) with their style label
//! (`w:pPr/w:pStyle`) and tables (`w:tbl`) as row-major cell matrices.
//! Paragraphs inside table cells belong to the cell, not the block stream.
//!
//! Any open or parse failure surfaces as [`Error::DocumentUnreadable`].

use std::io::Read;
use std::path::Path;

use crate::error::{Error, Result};
use crate::models::Block;

/// Maximum decompressed bytes to read from the document entry (zip-bomb
/// protection).
const MAX_XML_ENTRY_BYTES: u64 = 50 * 1024 * 1024;

/// Extract the ordered block stream of one document.
pub fn extract_blocks(path: &Path) -> Result<Vec<Block>> {
    let bytes = std::fs::read(path).map_err(|e| Error::unreadable(path, e))?;
    blocks_from_bytes(&bytes).map_err(|reason| Error::unreadable(path, reason))
}

/// Extract blocks from in-memory docx bytes.
pub fn blocks_from_bytes(bytes: &[u8]) -> std::result::Result<Vec<Block>, String> {
    let mut archive =
        zip::ZipArchive::new(std::io::Cursor::new(bytes)).map_err(|e| e.to_string())?;
    let entry = archive
        .by_name("word/document.xml")
        .map_err(|_| "word/document.xml not found".to_string())?;
    let mut doc_xml = Vec::new();
    entry
        .take(MAX_XML_ENTRY_BYTES)
        .read_to_end(&mut doc_xml)
        .map_err(|e| e.to_string())?;
    if doc_xml.len() as u64 >= MAX_XML_ENTRY_BYTES {
        return Err("word/document.xml exceeds size limit".to_string());
    }
    walk_document_xml(&doc_xml)
}

/// Single pass over the document XML, collecting paragraph and table blocks
/// in document order.
fn walk_document_xml(xml: &[u8]) -> std::result::Result<Vec<Block>, String> {
    use quick_xml::events::Event;

    let mut reader = quick_xml::Reader::from_reader(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();

    let mut blocks = Vec::new();
    let mut table_depth = 0usize;
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut cell = String::new();
    let mut para = String::new();
    let mut style = String::new();
    let mut in_para = false;
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"tbl" => {
                    table_depth += 1;
                    if table_depth == 1 {
                        rows.clear();
                    }
                }
                b"tr" if table_depth == 1 => row.clear(),
                b"tc" if table_depth == 1 => cell.clear(),
                b"p" => {
                    if table_depth == 0 {
                        in_para = true;
                        para.clear();
                        style.clear();
                    }
                }
                b"pStyle" => {
                    if table_depth == 0 && in_para {
                        if let Some(val) = attr_val(&e) {
                            style = val;
                        }
                    }
                }
                b"t" => in_text = true,
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"p" if table_depth == 0 => {
                    // Empty paragraph, kept so offsets match the document.
                    blocks.push(Block::text(""));
                }
                b"pStyle" => {
                    if table_depth == 0 && in_para {
                        if let Some(val) = attr_val(&e) {
                            style = val;
                        }
                    }
                }
                _ => {}
            },
            Ok(Event::Text(te)) if in_text => {
                let text = te.unescape().unwrap_or_default();
                if table_depth > 0 {
                    cell.push_str(&text);
                } else if in_para {
                    para.push_str(&text);
                }
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => {
                    if table_depth == 0 {
                        if in_para {
                            blocks.push(Block::Text {
                                content: std::mem::take(&mut para),
                                style_label: std::mem::take(&mut style),
                            });
                            in_para = false;
                        }
                    } else {
                        // Separate paragraphs within one cell.
                        cell.push('\n');
                    }
                }
                b"tc" if table_depth == 1 => {
                    row.push(cell.trim().to_string());
                }
                b"tr" if table_depth == 1 => {
                    rows.push(std::mem::take(&mut row));
                }
                b"tbl" => {
                    table_depth = table_depth.saturating_sub(1);
                    if table_depth == 0 {
                        blocks.push(Block::Table {
                            rows: std::mem::take(&mut rows),
                        });
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.to_string()),
            _ => {}
        }
        buf.clear();
    }

    Ok(blocks)
}

fn attr_val(e: &quick_xml::events::BytesStart<'_>) -> Option<String> {
    e.attributes()
        .filter_map(|a| a.ok())
        .find(|a| a.key.local_name().as_ref() == b"val")
        .map(|a| String::from_utf8_lossy(&a.value).into_owned())
}
