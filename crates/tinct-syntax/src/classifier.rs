//! The token classifier.
//!
//! Classification is an explicit, ordered list of passes. Each pass scans the
//! whole text once; the output is every pass's spans concatenated in pass
//! order. Where passes overlap, the later one wins when resolved through an
//! [`Overlay`]:
//!
//! | # | pass | notes |
//! |---|------|-------|
//! | 1 | String | triple-quoted first, single-line in the gaps |
//! | 2 | Keyword | whole words from the lexicon |
//! | 3 | Number | `12`, `3.5` |
//! | 4 | ImaginaryNumber | `3j`, `2.5J`; overrides Number |
//! | 5 | Boolean | `True`, `False` |
//! | 6 | NullLiteral | `None` |
//! | 7 | Collection | each bracket character |
//! | 8 | Comment | `#` to end of line, even inside strings |
//! | 9 | Operator | each operator character |
//! | 10 | KnownBuiltin | last unless configured first |

use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::{Lexicon, Overlay, Pass, Span, SyntaxError, TokenCategory};

/// Where the builtin-name pass sits in the pass list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuiltinPlacement {
    /// Before strings; anything else overrides builtins.
    First,
    /// After operators; builtins override everything.
    #[default]
    Last,
}

/// Options that shape the pass list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifierOptions {
    /// Tag builtin names at all
    pub builtins: bool,
    pub builtin_placement: BuiltinPlacement,
}

impl Default for ClassifierOptions {
    fn default() -> Self {
        Self {
            builtins: true,
            builtin_placement: BuiltinPlacement::Last,
        }
    }
}

/// Classifies text into layered category spans.
///
/// A `Classifier` is immutable once built, so one instance can serve any
/// number of snapshots, from any number of threads.
#[derive(Debug, Clone)]
pub struct Classifier {
    passes: Vec<Pass>,
    lexicon: Arc<Lexicon>,
}

impl Classifier {
    /// The default Python classifier.
    pub fn python() -> Result<Self, SyntaxError> {
        Self::new(Lexicon::python(), ClassifierOptions::default())
    }

    /// Builds the standard pass list over `lexicon`.
    pub fn new(lexicon: Arc<Lexicon>, options: ClassifierOptions) -> Result<Self, SyntaxError> {
        let mut passes = vec![
            Pass::strings()?,
            Pass::keywords(&lexicon)?,
            Pass::numbers()?,
            Pass::imaginary_numbers()?,
            Pass::booleans()?,
            Pass::null_literal()?,
            Pass::brackets()?,
            Pass::comments()?,
            Pass::operators()?,
        ];

        if options.builtins {
            let builtins = Pass::builtins(&lexicon)?;
            match options.builtin_placement {
                BuiltinPlacement::First => passes.insert(0, builtins),
                BuiltinPlacement::Last => passes.push(builtins),
            }
        }

        Ok(Self::with_passes(lexicon, passes))
    }

    /// Uses an explicit pass list, applied in the given order.
    pub fn with_passes(lexicon: Arc<Lexicon>, passes: Vec<Pass>) -> Self {
        Self { passes, lexicon }
    }

    pub fn passes(&self) -> &[Pass] {
        &self.passes
    }

    pub fn lexicon(&self) -> &Arc<Lexicon> {
        &self.lexicon
    }

    /// Classifies `text` into layered spans.
    ///
    /// Spans are grouped by pass in pass order and ascending within a pass.
    /// Spans from one pass never overlap; spans from different passes may.
    pub fn classify(&self, text: &str) -> Vec<Span> {
        let started = Instant::now();
        let mut spans = Vec::new();
        if text.is_empty() {
            return spans;
        }

        for pass in &self.passes {
            pass.run(text, &mut spans);
        }

        tracing::debug!(
            bytes = text.len(),
            spans = spans.len(),
            elapsed_us = started.elapsed().as_micros() as u64,
            "classified buffer"
        );
        spans
    }

    /// Classifies `text` and resolves the layers into non-overlapping runs.
    pub fn highlight(&self, text: &str) -> Vec<Span> {
        Overlay::from_layers(text, &self.classify(text)).runs()
    }

    /// The categories in the order their passes run.
    pub fn order(&self) -> Vec<TokenCategory> {
        self.passes.iter().map(Pass::category).collect()
    }
}
