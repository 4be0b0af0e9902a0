//! Keyword and builtin name tables.
//!
//! The tables are plain data files under `data/`, one identifier per line,
//! with `#` comment lines and a `# version:` header naming the Python
//! release they were taken from. They are embedded at compile time, so the
//! highlighter never depends on whatever interpreter happens to be around.

use once_cell::sync::Lazy;
use std::sync::Arc;

const PYTHON_KEYWORDS: &str = include_str!("../data/python.keywords");
const PYTHON_BUILTINS: &str = include_str!("../data/python.builtins");

static PYTHON: Lazy<Arc<Lexicon>> = Lazy::new(|| {
    Arc::new(Lexicon {
        version: parse_version(PYTHON_KEYWORDS),
        keywords: parse_table(PYTHON_KEYWORDS),
        builtins: parse_table(PYTHON_BUILTINS),
    })
});

/// The KeywordSet and BuiltinSet of one language version.
///
/// Identifiers are case-sensitive. Keyword order is canonical and is the
/// order autocomplete presents candidates in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexicon {
    version: String,
    keywords: Vec<String>,
    builtins: Vec<String>,
}

impl Lexicon {
    /// The shared Python table.
    pub fn python() -> Arc<Lexicon> {
        Arc::clone(&PYTHON)
    }

    /// Builds a custom table.
    pub fn new<K, B>(keywords: K, builtins: B) -> Self
    where
        K: IntoIterator,
        K::Item: Into<String>,
        B: IntoIterator,
        B::Item: Into<String>,
    {
        Self {
            version: "custom".to_string(),
            keywords: keywords.into_iter().map(Into::into).collect(),
            builtins: builtins.into_iter().map(Into::into).collect(),
        }
    }

    /// Version tag from the data file header.
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn builtins(&self) -> &[String] {
        &self.builtins
    }

    pub fn is_keyword(&self, word: &str) -> bool {
        self.keywords.iter().any(|k| k == word)
    }

    pub fn is_builtin(&self, word: &str) -> bool {
        self.builtins.iter().any(|b| b == word)
    }

    /// Keywords starting with `prefix`, in canonical order.
    pub fn completions<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.keywords
            .iter()
            .map(String::as_str)
            .filter(move |k| k.starts_with(prefix))
    }
}

fn parse_table(data: &str) -> Vec<String> {
    data.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

fn parse_version(data: &str) -> String {
    data.lines()
        .find_map(|line| line.strip_prefix("# version:"))
        .map(|v| v.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
