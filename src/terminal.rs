//! Terminal rendering of an editor snapshot.
//!
//! Draws the same three areas a windowed front end has: the line-number
//! gutter, the highlighted text and the status bar, plus the suggestion list
//! when autocomplete is showing.

use std::io::{self, Write};

use crossterm::QueueableCommand;
use crossterm::style::{self, Color};
use tinct_core::{AutocompleteState, Editor, Theme};
use tinct_syntax::Span;

/// What to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Emit color escapes
    pub color: bool,
    pub line_numbers: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            color: true,
            line_numbers: true,
        }
    }
}

/// Writes a full snapshot of `editor` to `out`.
pub fn render(out: &mut impl Write, editor: &Editor, options: RenderOptions) -> io::Result<()> {
    let mut painter = Painter {
        out,
        theme: editor.theme(),
        color: options.color,
    };

    let text = editor.text();
    let runs = editor.runs();
    let width = editor.line_count().to_string().len();

    let mut line_start = 0;
    for (idx, line) in text.split('\n').enumerate() {
        if options.line_numbers {
            painter.gutter(idx + 1, width)?;
        }
        painter.line(line, line_start, &runs)?;
        painter.newline()?;
        line_start += line.len() + 1;
    }

    painter.status(editor)?;
    if let AutocompleteState::Visible(suggestions) = editor.autocomplete() {
        painter.plain(&format!(
            "Suggestions for '{}' at {}:\n",
            suggestions.prefix, suggestions.anchor
        ))?;
        for (idx, candidate) in suggestions.candidates.iter().enumerate() {
            painter.plain(&format!("  [{idx}] {candidate}\n"))?;
        }
    }
    painter.out.flush()
}

struct Painter<'a, W: Write> {
    out: &'a mut W,
    theme: &'a Theme,
    color: bool,
}

impl<W: Write> Painter<'_, W> {
    fn gutter(&mut self, number: usize, width: usize) -> io::Result<()> {
        let label = format!("{number:>width$} │ ");
        if !self.color {
            return self.plain(&label);
        }
        self.out
            .queue(style::SetBackgroundColor(term_color(self.theme.gutter_background)))?
            .queue(style::SetForegroundColor(term_color(self.theme.gutter_foreground)))?
            .queue(style::Print(label))?
            .queue(style::ResetColor)?;
        Ok(())
    }

    /// Paints one line whose first byte sits at `start` in the full text.
    fn line(&mut self, line: &str, start: usize, runs: &[Span]) -> io::Result<()> {
        let end = start + line.len();
        let mut pos = start;

        let first = runs.partition_point(|run| run.end <= start);
        for run in runs[first..].iter().take_while(|run| run.start < end) {
            let from = run.start.max(start);
            let to = run.end.min(end);
            if from > pos {
                self.text(&line[pos - start..from - start], None)?;
            }
            let color = self.theme.color_for(run.category);
            self.text(&line[from - start..to - start], Some(color))?;
            pos = to;
        }
        if pos < end {
            self.text(&line[pos - start..], None)?;
        }
        Ok(())
    }

    fn text(&mut self, s: &str, color: Option<tinct_core::Color>) -> io::Result<()> {
        if !self.color {
            return self.plain(s);
        }
        let fg = color.unwrap_or(self.theme.foreground);
        self.out
            .queue(style::SetBackgroundColor(term_color(self.theme.background)))?
            .queue(style::SetForegroundColor(term_color(fg)))?
            .queue(style::Print(s))?;
        Ok(())
    }

    fn status(&mut self, editor: &Editor) -> io::Result<()> {
        let file = editor
            .file_path()
            .map_or_else(|| "[untitled]".to_string(), |p| p.display().to_string());
        let modified = if editor.is_modified() { " *" } else { "" };
        let status = format!(
            "{} | {} | {}{}",
            editor.status_text(),
            editor.theme().name,
            file,
            modified
        );

        if self.color {
            self.out
                .queue(style::SetAttribute(style::Attribute::Reverse))?
                .queue(style::Print(status))?
                .queue(style::SetAttribute(style::Attribute::Reset))?;
        } else {
            self.plain(&status)?;
        }
        self.newline()
    }

    fn newline(&mut self) -> io::Result<()> {
        if self.color {
            self.out.queue(style::ResetColor)?;
        }
        self.plain("\n")
    }

    fn plain(&mut self, s: &str) -> io::Result<()> {
        self.out.write_all(s.as_bytes())
    }
}

fn term_color(color: tinct_core::Color) -> Color {
    Color::Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
    }
}
