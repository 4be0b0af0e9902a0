//! Helpers shared by every front end: gutter text, the status line and
//! span clipping.

use std::fmt;

use serde::Serialize;
use tinct_buffer::Position;
use tinct_syntax::{Overlay, Span};

/// Cursor position as the status bar shows it.
///
/// Lines count from 1, columns from 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CursorPosition {
    pub line: usize,
    pub column: usize,
}

impl CursorPosition {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// `Line L, Col C`
    pub fn status_text(&self) -> String {
        self.to_string()
    }
}

impl From<Position> for CursorPosition {
    fn from(pos: Position) -> Self {
        Self {
            line: pos.line + 1,
            column: pos.column,
        }
    }
}

impl fmt::Display for CursorPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Line {}, Col {}", self.line, self.column)
    }
}

/// Line numbers `1..=line_count`, one per line.
pub fn gutter_text(line_count: usize) -> String {
    (1..=line_count)
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Keeps the spans that can be applied to `text` as-is.
///
/// Spans from an older snapshot may reach past the end of the text or split
/// a character. Those are dropped and logged, the rest are kept.
pub fn clip_spans(text: &str, spans: &[Span]) -> Vec<Span> {
    spans
        .iter()
        .filter(|span| {
            let fits = span.fits(text);
            if !fits {
                tracing::debug!(
                    start = span.start,
                    end = span.end,
                    len = text.len(),
                    "dropping span outside text"
                );
            }
            fits
        })
        .copied()
        .collect()
}

/// Resolves layered spans into the flat runs a renderer paints.
pub fn resolve_runs(text: &str, spans: &[Span]) -> Vec<Span> {
    Overlay::from_layers(text, &clip_spans(text, spans)).runs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tinct_syntax::TokenCategory;

    #[test]
    fn test_status_text() {
        let pos = CursorPosition::from(Position::new(0, 0));
        assert_eq!(pos.status_text(), "Line 1, Col 0");
        assert_eq!(CursorPosition::new(12, 4).to_string(), "Line 12, Col 4");
    }

    #[test]
    fn test_gutter_text() {
        assert_eq!(gutter_text(1), "1");
        assert_eq!(gutter_text(4), "1\n2\n3\n4");
        assert_eq!(gutter_text(0), "");
    }

    #[test]
    fn test_clip_spans_drops_misfits() {
        let text = "é(x)";
        let spans = [
            Span::new(2, 3, TokenCategory::Collection),
            Span::new(1, 2, TokenCategory::Operator),
            Span::new(4, 9, TokenCategory::Collection),
        ];
        assert_eq!(clip_spans(text, &spans), [spans[0]]);
    }

    #[test]
    fn test_resolve_runs() {
        let text = "3j";
        let spans = [
            Span::new(0, 1, TokenCategory::Number),
            Span::new(0, 2, TokenCategory::ImaginaryNumber),
        ];
        assert_eq!(
            resolve_runs(text, &spans),
            [Span::new(0, 2, TokenCategory::ImaginaryNumber)]
        );
    }
}
