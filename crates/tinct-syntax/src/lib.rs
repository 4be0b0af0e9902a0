//! # Tinct Syntax
//!
//! Lexical highlighting for Python source using layered regex passes.
//!
//! ## How it works
//!
//! There is no parser here. Every refresh re-scans the whole snapshot with a
//! fixed list of passes, one per [`TokenCategory`]:
//! - **Layered**: each pass produces its own spans, and passes may overlap
//! - **Ordered**: a later pass paints over an earlier one
//! - **Stateless**: a [`Classifier`] is immutable and can be shared
//!
//! ## Learning: byte offsets vs char offsets
//!
//! Spans carry byte offsets because that is what `regex` reports. The text
//! buffer works in characters, so renderers convert with
//! [`Span::char_range`] before applying a span.

mod category;
mod classifier;
mod lexicon;
mod overlay;
mod pass;

pub use category::{Span, TokenCategory};
pub use classifier::{BuiltinPlacement, Classifier, ClassifierOptions};
pub use lexicon::Lexicon;
pub use overlay::Overlay;
pub use pass::Pass;

/// Errors that can occur while building or applying a classifier.
#[derive(Debug, thiserror::Error)]
pub enum SyntaxError {
    #[error("Invalid {category} pattern: {source}")]
    InvalidPattern {
        category: TokenCategory,
        #[source]
        source: regex::Error,
    },

    #[error("Span {start}..{end} does not fit text of {len} bytes")]
    SpanOutOfBounds { start: usize, end: usize, len: usize },
}
