//! Last-write-wins resolution of layered spans.
//!
//! Each byte of the text carries at most one category tag. Painting spans in
//! pass order makes later passes overwrite earlier ones, which turns the
//! layered classifier output into the flat run list a renderer can draw
//! without knowing anything about pass priority.

use crate::{Span, SyntaxError, TokenCategory};

/// A per-byte category tag buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlay {
    tags: Vec<Option<TokenCategory>>,
}

impl Overlay {
    /// An untagged overlay for `len` bytes of text.
    pub fn new(len: usize) -> Self {
        Self {
            tags: vec![None; len],
        }
    }

    /// Paints `spans` over `text` in order, skipping any span that does not
    /// fit the text.
    pub fn from_layers(text: &str, spans: &[Span]) -> Self {
        let mut overlay = Self::new(text.len());
        for span in spans {
            let painted = if span.fits(text) {
                overlay.paint(span)
            } else {
                Err(SyntaxError::SpanOutOfBounds {
                    start: span.start,
                    end: span.end,
                    len: text.len(),
                })
            };
            if let Err(err) = painted {
                tracing::trace!("dropping span: {}", err);
            }
        }
        overlay
    }

    /// Tags every byte of `span` with its category.
    pub fn paint(&mut self, span: &Span) -> Result<(), SyntaxError> {
        if span.is_empty() || span.end > self.tags.len() {
            return Err(SyntaxError::SpanOutOfBounds {
                start: span.start,
                end: span.end,
                len: self.tags.len(),
            });
        }
        self.tags[span.range()].fill(Some(span.category));
        Ok(())
    }

    /// Category visible at a byte offset.
    pub fn category_at(&self, offset: usize) -> Option<TokenCategory> {
        self.tags.get(offset).copied().flatten()
    }

    /// Maximal runs of equally tagged bytes, in text order.
    pub fn runs(&self) -> Vec<Span> {
        let mut runs = Vec::new();
        let mut current: Option<Span> = None;

        for (offset, tag) in self.tags.iter().enumerate() {
            let Some(category) = *tag else {
                runs.extend(current.take());
                continue;
            };
            if let Some(run) = current.as_mut().filter(|run| run.category == category) {
                run.end = offset + 1;
                continue;
            }
            runs.extend(current.take());
            current = Some(Span::new(offset, offset + 1, category));
        }
        runs.extend(current);
        runs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use TokenCategory::*;

    #[test]
    fn test_later_layers_win() {
        let text = "x = 3j";
        let layers = [Span::new(4, 5, Number), Span::new(4, 6, ImaginaryNumber)];
        let overlay = Overlay::from_layers(text, &layers);

        assert_eq!(overlay.runs(), [Span::new(4, 6, ImaginaryNumber)]);
        assert_eq!(overlay.category_at(4), Some(ImaginaryNumber));
        assert_eq!(overlay.category_at(0), None);
    }

    #[test]
    fn test_runs_split_at_category_changes() {
        let text = "'a#b'";
        let layers = [Span::new(0, 5, String), Span::new(2, 5, Comment)];
        let runs = Overlay::from_layers(text, &layers).runs();

        assert_eq!(runs, [Span::new(0, 2, String), Span::new(2, 5, Comment)]);
    }

    #[test]
    fn test_out_of_bounds_spans_are_dropped() {
        let text = "(x)";
        let layers = [
            Span::new(0, 1, Collection),
            Span::new(2, 9, Collection),
            Span::new(2, 3, Collection),
        ];
        let runs = Overlay::from_layers(text, &layers).runs();
        assert_eq!(runs, [Span::new(0, 1, Collection), Span::new(2, 3, Collection)]);
    }

    #[test]
    fn test_paint_reports_bounds() {
        let mut overlay = Overlay::new(2);
        let err = overlay.paint(&Span::new(1, 3, Operator)).unwrap_err();
        assert!(matches!(err, SyntaxError::SpanOutOfBounds { len: 2, .. }));
        assert!(overlay.paint(&Span::new(1, 1, Operator)).is_err());
    }

    #[test]
    fn test_adjacent_spans_of_one_category_merge() {
        let overlay = Overlay::from_layers("()", &[Span::new(0, 1, Collection), Span::new(1, 2, Collection)]);
        assert_eq!(overlay.runs(), [Span::new(0, 2, Collection)]);
    }
}
