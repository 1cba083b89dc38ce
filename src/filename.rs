//! Output filename construction

use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

/// Builds dated, storage-safe filenames from episode titles
#[derive(Debug, Clone, Copy, Default)]
pub struct FilenameBuilder;

fn source_credit() -> &'static Regex {
    static SOURCE_CREDIT: OnceLock<Regex> = OnceLock::new();
    SOURCE_CREDIT.get_or_init(|| Regex::new(r"\s*\(Quelle.*\)").expect("valid source credit pattern"))
}

impl FilenameBuilder {
    pub fn new() -> Self {
        Self
    }

    /// `YYYY-MM-DD <sanitized title>`, without extension
    pub fn build(&self, title: &str, date: NaiveDate) -> String {
        let fragment = self.sanitize_title(title);
        format!("{} {}", date.format("%Y-%m-%d"), fragment)
            .trim_end()
            .to_string()
    }

    /// Title with separators replaced and the source credit removed
    pub fn sanitize_title(&self, title: &str) -> String {
        let sanitized = title.replace(['/', '\\'], "").replace(':', " -");
        source_credit().replace_all(&sanitized, "").trim().to_string()
    }
}
