//! Shelf catalog: years, issues, and document paths.
//!
//! The shelf is a directory tree of `<root>/<year><suffix>/<issue>.docx`
//! (suffix `年` by default). Listings are sorted for deterministic output;
//! a missing root or year directory yields an empty listing, not an error.

use std::path::PathBuf;

use walkdir::WalkDir;

use crate::config::Config;
use crate::models::DocRef;

/// Years on the shelf, suffix stripped, sorted.
pub fn list_years(config: &Config) -> Vec<String> {
    let suffix = &config.library.year_dir_suffix;
    let mut years: Vec<String> = WalkDir::new(&config.library.root)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_dir())
        .filter_map(|e| {
            e.file_name()
                .to_str()
                .and_then(|name| name.strip_suffix(suffix.as_str()))
                .map(str::to_string)
        })
        .collect();
    years.sort();
    years
}

/// Issue filenames of one year, sorted.
pub fn list_issues(config: &Config, year: &str) -> Vec<String> {
    let dir = year_dir(config, year);
    let mut issues: Vec<String> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| e.file_name().to_str().map(str::to_string))
        .filter(|name| name.ends_with(".docx"))
        .collect();
    issues.sort();
    issues
}

/// Path of one issue, or `None` when it does not exist on disk.
pub fn resolve_path(config: &Config, year: &str, issue: &str) -> Option<PathBuf> {
    let path = year_dir(config, year).join(issue);
    path.is_file().then_some(path)
}

/// All documents in scope, optionally narrowed to one year and/or one issue,
/// in year-then-issue order.
pub fn collect_docs(config: &Config, year: Option<&str>, issue: Option<&str>) -> Vec<DocRef> {
    let years: Vec<String> = match year {
        Some(y) => vec![y.to_string()],
        None => list_years(config),
    };
    let mut docs = Vec::new();
    for y in years {
        let issues: Vec<String> = match issue {
            Some(i) => vec![i.to_string()],
            None => list_issues(config, &y),
        };
        for i in issues {
            if let Some(path) = resolve_path(config, &y, &i) {
                docs.push(DocRef {
                    year: y.clone(),
                    issue: i,
                    path,
                });
            }
        }
    }
    docs
}

fn year_dir(config: &Config, year: &str) -> PathBuf {
    config
        .library
        .root
        .join(format!("{}{}", year, config.library.year_dir_suffix))
}
