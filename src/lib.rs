//! # Shelf Search
//!
//! Structure-aware indexing and keyword search for shelves of journal issues
//! in Word format.
//!
//! Each issue is a `.docx` whose body is a flat stream of paragraphs and
//! tables. Shelf Search recovers a two-level Section → Topic hierarchy from
//! heading metadata (or text patterns), resolves topic content by offset
//! range, and answers keyword queries at three granularities — headings,
//! paragraphs, and table cells — within one issue or across the whole shelf,
//! with year/issue provenance on every corpus hit.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌───────────┐   ┌──────────┐   ┌─────────┐
//! │ extract  │──▶│ classify  │──▶│ outline  │──▶│ content │
//! │ docx→blk │   │ headings  │   │ Sec→Top  │   │ resolve │
//! └──────────┘   └───────────┘   └────┬─────┘   └────┬────┘
//!                                     ▼              ▼
//!                               ┌──────────┐   ┌──────────┐
//!                               │  search  │◀──│  corpus   │──▶ cache
//!                               └──────────┘   └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! shelf years                          # list years on the shelf
//! shelf issues 2023                    # list issues of one year
//! shelf sections --year 2023 --issue 第1期.docx
//! shelf search "会议" --year 2023      # corpus keyword search
//! shelf context "会议" --year 2023 --issue 第1期.docx
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`error`] | Error taxonomy |
//! | [`extract`] | `.docx` → block stream |
//! | [`catalog`] | Year/issue/document listing |
//! | [`classify`] | Heading classification strategies |
//! | [`outline`] | Structure building |
//! | [`content`] | Topic content resolution |
//! | [`search`] | Keyword and contextual search |
//! | [`corpus`] | Corpus-wide aggregation |
//! | [`cache`] | In-process result memoization |
//! | [`ai`] | External text-analysis client |

pub mod ai;
pub mod cache;
pub mod catalog;
pub mod classify;
pub mod config;
pub mod content;
pub mod corpus;
pub mod error;
pub mod extract;
pub mod models;
pub mod outline;
pub mod search;

pub use error::{Error, Result};
