use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub library: LibraryConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub ai: AiConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LibraryConfig {
    /// Root directory of the shelf: one subdirectory per year, one `.docx`
    /// file per issue.
    pub root: PathBuf,
    /// Suffix that marks a subdirectory as a year (e.g. `2023年`). Stripped
    /// from the listed year names.
    #[serde(default = "default_year_suffix")]
    pub year_dir_suffix: String,
}

fn default_year_suffix() -> String {
    "年".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct ClassifierConfig {
    /// Heading recognition strategy: "style" or "pattern".
    #[serde(default = "default_strategy")]
    pub strategy: String,
    /// Style labels accepted as section headings (exact membership).
    #[serde(default = "default_section_styles")]
    pub section_styles: Vec<String>,
    /// Style labels accepted as topic headings (exact membership).
    #[serde(default = "default_topic_styles")]
    pub topic_styles: Vec<String>,
    /// Ordered regular expressions matched against trimmed paragraph text
    /// to recognize section headings. Checked before topic patterns.
    #[serde(default = "default_section_patterns")]
    pub section_patterns: Vec<String>,
    /// Ordered regular expressions recognizing topic headings.
    #[serde(default = "default_topic_patterns")]
    pub topic_patterns: Vec<String>,
    /// Minimum length of a repeated-filler run to count as a skip marker.
    #[serde(default = "default_skip_marker_min_len")]
    pub skip_marker_min_len: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            strategy: default_strategy(),
            section_styles: default_section_styles(),
            topic_styles: default_topic_styles(),
            section_patterns: default_section_patterns(),
            topic_patterns: default_topic_patterns(),
            skip_marker_min_len: default_skip_marker_min_len(),
        }
    }
}

fn default_strategy() -> String {
    "style".to_string()
}

fn default_section_styles() -> Vec<String> {
    // Word exposes both display names and style IDs depending on locale.
    vec![
        "Heading 1".to_string(),
        "Heading1".to_string(),
        "标题 1".to_string(),
    ]
}

fn default_topic_styles() -> Vec<String> {
    vec![
        "Heading 2".to_string(),
        "Heading2".to_string(),
        "标题 2".to_string(),
    ]
}

fn default_section_patterns() -> Vec<String> {
    // CJK numeral + 、 separator, e.g. 一、通知
    vec!["^[一二三四五六七八九十百]+、".to_string()]
}

fn default_topic_patterns() -> Vec<String> {
    vec![
        // Parenthesized CJK numeral, e.g. （一）会议
        "^（[一二三四五六七八九十]+）".to_string(),
        // Decimal sub-numbering, e.g. 1.2
        r"^\d+\.\d+".to_string(),
        // Circled digits ①–⑳
        "^[①-⑳]".to_string(),
    ]
}

fn default_skip_marker_min_len() -> usize {
    20
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    /// Case-insensitive substring matching for both primary and contextual
    /// search.
    #[serde(default = "default_case_insensitive")]
    pub case_insensitive: bool,
    /// Default number of paragraphs of context on each side of a match.
    #[serde(default = "default_context_window")]
    pub context_window: usize,
    /// Upper bound on concurrent per-document searches during corpus
    /// aggregation.
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// Memoize per-document and corpus results for the lifetime of the run.
    /// Disabling only changes latency, never results.
    #[serde(default = "default_cache")]
    pub cache: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            case_insensitive: default_case_insensitive(),
            context_window: default_context_window(),
            workers: default_workers(),
            cache: default_cache(),
        }
    }
}

fn default_case_insensitive() -> bool {
    true
}

fn default_context_window() -> usize {
    2
}

fn default_workers() -> usize {
    4
}

fn default_cache() -> bool {
    true
}

#[derive(Debug, Deserialize, Clone)]
pub struct AiConfig {
    /// Chat model used for summarize/analyze/keywords/ask.
    #[serde(default = "default_model")]
    pub model: String,
    /// OpenAI-compatible chat-completions endpoint.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_url: default_api_url(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_api_url() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_max_retries() -> u32 {
    3
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    // Validate classifier
    match config.classifier.strategy.as_str() {
        "style" | "pattern" => {}
        other => anyhow::bail!(
            "Unknown classifier strategy: '{}'. Must be style or pattern.",
            other
        ),
    }

    if config.classifier.skip_marker_min_len == 0 {
        anyhow::bail!("classifier.skip_marker_min_len must be > 0");
    }

    for pattern in config
        .classifier
        .section_patterns
        .iter()
        .chain(config.classifier.topic_patterns.iter())
    {
        regex::Regex::new(pattern)
            .with_context(|| format!("Invalid classifier pattern: {}", pattern))?;
    }

    // Validate search
    if config.search.workers == 0 {
        anyhow::bail!("search.workers must be >= 1");
    }

    // Validate ai
    if config.ai.timeout_secs == 0 {
        anyhow::bail!("ai.timeout_secs must be > 0");
    }

    Ok(config)
}
