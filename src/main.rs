//! # Shelf Search CLI (`shelf`)
//!
//! The `shelf` binary browses and searches a shelf of journal issues stored
//! as `.docx` files under `<root>/<year>年/<issue>.docx`.
//!
//! ## Usage
//!
//! ```bash
//! shelf --config ./config/shelf.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `shelf years` | List years on the shelf |
//! | `shelf issues <year>` | List issues of one year |
//! | `shelf sections` | List sections (columns) of one issue |
//! | `shelf topics <section>` | List topics of one section |
//! | `shelf read <section> <topic>` | Print one topic's content |
//! | `shelf search "<keyword>"` | Keyword search across the shelf |
//! | `shelf context "<keyword>"` | Contextual search within one issue |
//! | `shelf summarize <section> <topic>` | AI summary of one topic |
//! | `shelf analyze <section> <topic>` | AI analysis of one topic |
//! | `shelf keywords <section> <topic>` | AI keyword extraction |
//! | `shelf ask "<question>" <section> <topic>` | AI Q&A over one topic |

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use shelf_search::ai::AiClient;
use shelf_search::cache::SearchCache;
use shelf_search::catalog;
use shelf_search::config::{load_config, Config};
use shelf_search::content::{flatten_content, get_content};
use shelf_search::corpus;
use shelf_search::models::{ContentItem, CorpusHits, DocumentIndex, TitleKind};
use shelf_search::outline;
use shelf_search::search;

/// Shelf Search — structure-aware search over journal issues in Word format.
#[derive(Parser)]
#[command(
    name = "shelf",
    about = "Shelf Search — structure-aware indexing and keyword search over journal issues",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/shelf.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// List years on the shelf.
    Years,

    /// List issues of one year.
    Issues { year: String },

    /// List the sections (columns) of one issue.
    Sections {
        #[arg(long)]
        year: String,
        #[arg(long)]
        issue: String,
    },

    /// List the topics of one section.
    Topics {
        #[arg(long)]
        year: String,
        #[arg(long)]
        issue: String,
        section: String,
    },

    /// Print the content of one topic.
    Read {
        #[arg(long)]
        year: String,
        #[arg(long)]
        issue: String,
        section: String,
        topic: String,
    },

    /// Keyword search across the shelf (optionally narrowed to one year or
    /// one issue). Results carry year/issue provenance.
    Search {
        keyword: String,
        #[arg(long)]
        year: Option<String>,
        #[arg(long)]
        issue: Option<String>,
    },

    /// Contextual search within one issue: each match with neighbouring
    /// paragraphs.
    Context {
        keyword: String,
        #[arg(long)]
        year: String,
        #[arg(long)]
        issue: String,
        /// Paragraphs of context on each side (defaults to the configured
        /// window).
        #[arg(long)]
        window: Option<usize>,
    },

    /// AI summary of one topic.
    Summarize {
        #[arg(long)]
        year: String,
        #[arg(long)]
        issue: String,
        section: String,
        topic: String,
    },

    /// AI analysis (theme / viewpoints / conclusions) of one topic.
    Analyze {
        #[arg(long)]
        year: String,
        #[arg(long)]
        issue: String,
        section: String,
        topic: String,
    },

    /// AI keyword extraction from one topic.
    Keywords {
        #[arg(long)]
        year: String,
        #[arg(long)]
        issue: String,
        section: String,
        topic: String,
    },

    /// AI question answering over one topic's content.
    Ask {
        question: String,
        #[arg(long)]
        year: String,
        #[arg(long)]
        issue: String,
        section: String,
        topic: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    match cli.command {
        Commands::Years => {
            for year in catalog::list_years(&config) {
                println!("{}", year);
            }
        }
        Commands::Issues { year } => {
            for issue in catalog::list_issues(&config, &year) {
                println!("{}", issue);
            }
        }
        Commands::Sections { year, issue } => {
            let index = open_issue(&config, &year, &issue)?;
            for section in index.section_titles() {
                println!("{}", section);
            }
        }
        Commands::Topics {
            year,
            issue,
            section,
        } => {
            let index = open_issue(&config, &year, &issue)?;
            for topic in index.topic_titles(&section)? {
                println!("{}", topic);
            }
        }
        Commands::Read {
            year,
            issue,
            section,
            topic,
        } => {
            let index = open_issue(&config, &year, &issue)?;
            for item in get_content(&index, &section, &topic)? {
                match item {
                    ContentItem::Text(text) => println!("{}", text),
                    ContentItem::Table(rows) => {
                        for row in rows {
                            println!("{}", row.join(" | "));
                        }
                    }
                }
            }
        }
        Commands::Search {
            keyword,
            year,
            issue,
        } => {
            let docs = catalog::collect_docs(&config, year.as_deref(), issue.as_deref());
            if docs.is_empty() {
                bail!("No documents in scope");
            }
            let cache = SearchCache::new(config.search.cache);
            let hits = corpus::search_corpus(&config, &docs, &keyword, &cache).await?;
            print_corpus_hits(&hits);
        }
        Commands::Context {
            keyword,
            year,
            issue,
            window,
        } => {
            let index = open_issue(&config, &year, &issue)?;
            let window = window.unwrap_or(config.search.context_window);
            let hits = search::search_with_context(
                &index,
                &keyword,
                window,
                config.search.case_insensitive,
            )?;
            if hits.is_empty() {
                println!("No results.");
            }
            for (i, hit) in hits.iter().enumerate() {
                println!("{}. {}", i + 1, caption(hit.section.as_deref(), hit.topic.as_deref()));
                for line in &hit.before {
                    println!("      {}", line);
                }
                println!("   >> {}", hit.matched);
                for line in &hit.after {
                    println!("      {}", line);
                }
                println!();
            }
        }
        Commands::Summarize {
            year,
            issue,
            section,
            topic,
        } => {
            let context = topic_text(&config, &year, &issue, &section, &topic)?;
            let client = AiClient::new(&config.ai)?;
            println!("{}", client.summarize(&context).await?);
        }
        Commands::Analyze {
            year,
            issue,
            section,
            topic,
        } => {
            let context = topic_text(&config, &year, &issue, &section, &topic)?;
            let client = AiClient::new(&config.ai)?;
            println!("{}", client.analyze(&context).await?);
        }
        Commands::Keywords {
            year,
            issue,
            section,
            topic,
        } => {
            let context = topic_text(&config, &year, &issue, &section, &topic)?;
            let client = AiClient::new(&config.ai)?;
            println!("{}", client.keywords(&context).await?);
        }
        Commands::Ask {
            question,
            year,
            issue,
            section,
            topic,
        } => {
            let context = topic_text(&config, &year, &issue, &section, &topic)?;
            let client = AiClient::new(&config.ai)?;
            println!("{}", client.ask(&question, &context).await?);
        }
    }

    Ok(())
}

fn open_issue(config: &Config, year: &str, issue: &str) -> Result<DocumentIndex> {
    let path = catalog::resolve_path(config, year, issue)
        .with_context(|| format!("Issue not found: {}/{}", year, issue))?;
    Ok(outline::build_index(config, &path)?)
}

fn topic_text(
    config: &Config,
    year: &str,
    issue: &str,
    section: &str,
    topic: &str,
) -> Result<String> {
    let index = open_issue(config, year, issue)?;
    let items = get_content(&index, section, topic)?;
    Ok(flatten_content(&items))
}

fn caption(section: Option<&str>, topic: Option<&str>) -> String {
    match (section, topic) {
        (Some(s), Some(t)) => format!("{} → {}", s, t),
        (Some(s), None) => s.to_string(),
        _ => "(前言)".to_string(),
    }
}

/// Print merged corpus hits in title → content → table order, numbered, with
/// provenance on every entry.
fn print_corpus_hits(hits: &CorpusHits) {
    if hits.is_empty() {
        println!("No results.");
        return;
    }
    println!("Found {} results", hits.len());
    println!();

    let mut n = 0usize;
    for stamped in &hits.titles {
        n += 1;
        let hit = &stamped.hit;
        let kind = match hit.kind {
            TitleKind::Section => "section",
            TitleKind::Topic => "topic",
        };
        println!(
            "{}. {}   [{} title]",
            n,
            caption(Some(&hit.section), hit.topic.as_deref()),
            kind
        );
        println!("   {}年 / {}", stamped.year, stamped.issue);
        println!();
    }
    for stamped in &hits.contents {
        n += 1;
        let hit = &stamped.hit;
        println!("{}. {}", n, caption(Some(&hit.section), Some(&hit.topic)));
        println!("   {}年 / {}", stamped.year, stamped.issue);
        println!("   {}", hit.matched);
        println!();
    }
    for stamped in &hits.tables {
        n += 1;
        let hit = &stamped.hit;
        println!(
            "{}. {}   [table, match at row {}, col {}]",
            n,
            caption(Some(&hit.section), Some(&hit.topic)),
            hit.row,
            hit.col
        );
        println!("   {}年 / {}", stamped.year, stamped.issue);
        for row in &hit.rows {
            println!("   {}", row.join(" | "));
        }
        println!();
    }
}
