//! Classifier passes.
//!
//! A pass is one scan over the text that tags every match with a single
//! category. Matches of one pass never overlap each other; overlap between
//! passes is resolved later by pass order.

use regex::Regex;

use crate::{Lexicon, Span, SyntaxError, TokenCategory};

/// Triple-quoted strings, non-greedy across newlines. A missing closer runs
/// to the end of the text.
const TRIPLE_QUOTED: &str = r#"(?s)"""(?:.*?)(?:"""|\z)|'''(?:.*?)(?:'''|\z)"#;
/// Single-line strings; a quote with no closer on its line is not a string.
const SINGLE_LINE_STRING: &str = r#""[^"\n]*"|'[^'\n]*'"#;
const NUMBER: &str = r"\b[0-9]+(?:\.[0-9]+)?\b";
const IMAGINARY: &str = r"\b[0-9]+(?:\.[0-9]+)?[jJ]\b";
const BOOLEAN: &str = r"\b(?:True|False)\b";
const NULL: &str = r"\bNone\b";
const BRACKET: &str = r"[\[\]{}()]";
const COMMENT: &str = r"#[^\n]*";
const OPERATOR: &str = r"[=+\-*/<>!%^&|]";

#[derive(Debug, Clone)]
enum Matcher {
    Pattern(Regex),
    /// `rest` only runs over the gaps `claim` leaves behind.
    Claimed { claim: Regex, rest: Regex },
}

/// One classifier pass.
#[derive(Debug, Clone)]
pub struct Pass {
    category: TokenCategory,
    matcher: Matcher,
}

impl Pass {
    /// String literals: triple-quoted first, single-line in the remainder.
    pub fn strings() -> Result<Self, SyntaxError> {
        Ok(Self {
            category: TokenCategory::String,
            matcher: Matcher::Claimed {
                claim: compile(TokenCategory::String, TRIPLE_QUOTED)?,
                rest: compile(TokenCategory::String, SINGLE_LINE_STRING)?,
            },
        })
    }

    pub fn keywords(lexicon: &Lexicon) -> Result<Self, SyntaxError> {
        Self::words(TokenCategory::Keyword, lexicon.keywords())
    }

    pub fn builtins(lexicon: &Lexicon) -> Result<Self, SyntaxError> {
        Self::words(TokenCategory::KnownBuiltin, lexicon.builtins())
    }

    pub fn numbers() -> Result<Self, SyntaxError> {
        Self::pattern(TokenCategory::Number, NUMBER)
    }

    pub fn imaginary_numbers() -> Result<Self, SyntaxError> {
        Self::pattern(TokenCategory::ImaginaryNumber, IMAGINARY)
    }

    pub fn booleans() -> Result<Self, SyntaxError> {
        Self::pattern(TokenCategory::Boolean, BOOLEAN)
    }

    pub fn null_literal() -> Result<Self, SyntaxError> {
        Self::pattern(TokenCategory::NullLiteral, NULL)
    }

    pub fn brackets() -> Result<Self, SyntaxError> {
        Self::pattern(TokenCategory::Collection, BRACKET)
    }

    pub fn comments() -> Result<Self, SyntaxError> {
        Self::pattern(TokenCategory::Comment, COMMENT)
    }

    pub fn operators() -> Result<Self, SyntaxError> {
        Self::pattern(TokenCategory::Operator, OPERATOR)
    }

    /// A pass for an arbitrary pattern.
    pub fn pattern(category: TokenCategory, pattern: &str) -> Result<Self, SyntaxError> {
        Ok(Self {
            category,
            matcher: Matcher::Pattern(compile(category, pattern)?),
        })
    }

    /// Whole-word matches of any of `words`.
    pub fn words<S: AsRef<str>>(category: TokenCategory, words: &[S]) -> Result<Self, SyntaxError> {
        if words.is_empty() {
            // A word boundary that is also not one: never matches
            return Self::pattern(category, r"\b\B");
        }
        let alternation = words
            .iter()
            .map(|w| regex::escape(w.as_ref()))
            .collect::<Vec<_>>()
            .join("|");
        Self::pattern(category, &format!(r"\b(?:{alternation})\b"))
    }

    pub fn category(&self) -> TokenCategory {
        self.category
    }

    /// Runs the pass, appending its spans (ascending, non-overlapping).
    pub fn run(&self, text: &str, out: &mut Vec<Span>) {
        match &self.matcher {
            Matcher::Pattern(re) => {
                out.extend(
                    re.find_iter(text)
                        .filter(|m| !m.is_empty())
                        .map(|m| Span::new(m.start(), m.end(), self.category)),
                );
            }
            Matcher::Claimed { claim, rest } => {
                let mut gap_start = 0;
                for claimed in claim.find_iter(text) {
                    self.run_gap(rest, text, gap_start, claimed.start(), out);
                    out.push(Span::new(claimed.start(), claimed.end(), self.category));
                    gap_start = claimed.end();
                }
                self.run_gap(rest, text, gap_start, text.len(), out);
            }
        }
    }

    fn run_gap(&self, re: &Regex, text: &str, start: usize, end: usize, out: &mut Vec<Span>) {
        if start >= end {
            return;
        }
        out.extend(
            re.find_iter(&text[start..end])
                .map(|m| Span::new(start + m.start(), start + m.end(), self.category)),
        );
    }
}

fn compile(category: TokenCategory, pattern: &str) -> Result<Regex, SyntaxError> {
    Regex::new(pattern).map_err(|source| SyntaxError::InvalidPattern { category, source })
}
