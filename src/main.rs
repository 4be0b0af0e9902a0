//! # Tinct - Python highlighting in the terminal
//!
//! Loads a file (or a sample document), replays keystrokes through the
//! editor core, and prints the highlighted result.
//!
//! ## Quick Start
//!
//! ```bash
//! # Show the sample document
//! cargo run
//!
//! # Highlight a file with another theme
//! cargo run -- --theme Nord path/to/script.py
//!
//! # Type at the end of the document and accept the first suggestion
//! cargo run -- --type 'cl' --accept 0
//!
//! # Dump the span set as JSON
//! cargo run -- --spans path/to/script.py
//! ```

mod sample;
mod terminal;

use std::io::{self, BufWriter};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tinct_core::{AutocompleteState, Config, CursorPosition, Editor};
use tinct_syntax::Span;

use crate::terminal::RenderOptions;

/// Tinct - incremental Python syntax highlighting
#[derive(Parser, Debug)]
#[command(name = "tinct")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// File to open
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Color theme (Light, Dark, Monokai, Solarized Light, Solarized Dark, Dracula, Nord)
    #[arg(short, long)]
    theme: Option<String>,

    /// Custom theme as a JSON file, applied after --theme
    #[arg(long, value_name = "PATH")]
    theme_file: Option<PathBuf>,

    /// Text to type at the end of the document, one keystroke per character
    #[arg(long = "type", value_name = "TEXT")]
    type_text: Option<String>,

    /// Accept this suggestion after typing
    #[arg(long, value_name = "INDEX")]
    accept: Option<usize>,

    /// Config file instead of the default location
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Save the result to a file
    #[arg(long, value_name = "PATH")]
    save_as: Option<PathBuf>,

    /// Print spans as JSON instead of rendering
    #[arg(long)]
    spans: bool,

    /// Render without color escapes
    #[arg(long)]
    no_color: bool,

    /// Verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// JSON dump of an editor snapshot.
#[derive(Serialize)]
struct Snapshot<'a> {
    spans: &'a [Span],
    runs: Vec<Span>,
    line_count: usize,
    cursor: CursorPosition,
    autocomplete: &'a AutocompleteState,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = match args.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false)
                .with_level(true),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    tracing::info!("Starting tinct v{}", env!("CARGO_PKG_VERSION"));

    let config = match &args.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::load(),
    };
    let line_numbers = config.ui.line_numbers;

    let editor = run(&args, config)?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    if args.spans {
        let text = editor.text();
        let snapshot = Snapshot {
            spans: editor.spans(),
            runs: tinct_core::resolve_runs(&text, editor.spans()),
            line_count: editor.line_count(),
            cursor: editor.cursor_position(),
            autocomplete: editor.autocomplete(),
        };
        serde_json::to_writer_pretty(&mut out, &snapshot)?;
        io::Write::write_all(&mut out, b"\n")?;
        io::Write::flush(&mut out)?;
    } else {
        let options = RenderOptions {
            color: !args.no_color,
            line_numbers,
        };
        terminal::render(&mut out, &editor, options)?;
    }

    Ok(())
}

/// Builds the editor and replays the requested actions.
fn run(args: &Args, config: Config) -> anyhow::Result<Editor> {
    let mut editor = Editor::new(config)?;

    match &args.file {
        Some(path) => editor
            .open_file(path)
            .with_context(|| format!("Failed to open {}", path.display()))?,
        None => editor.load_text(sample::SAMPLE)?,
    }

    if let Some(theme) = &args.theme {
        editor.set_theme(theme)?;
    }

    if let Some(path) = &args.theme_file {
        editor
            .load_theme_file(path)
            .with_context(|| format!("Failed to load theme {}", path.display()))?;
    }

    if let Some(text) = &args.type_text {
        editor.move_cursor_to(editor.buffer().len_chars())?;
        editor.type_str(text)?;
    }

    if let Some(index) = args.accept {
        if !editor.accept_completion(index)? {
            tracing::warn!("No suggestion {} to accept", index);
        }
    }

    if let Some(path) = &args.save_as {
        editor
            .save_as(path)
            .with_context(|| format!("Failed to save {}", path.display()))?;
    }

    Ok(editor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parsing() {
        let args = Args::parse_from(["tinct"]);
        assert!(args.file.is_none());
        assert!(!args.spans);
        assert_eq!(args.verbose, 0);
    }

    #[test]
    fn test_args_with_file_and_options() {
        let args = Args::parse_from([
            "tinct", "--theme", "Nord", "--type", "cl", "--accept", "0", "-vv", "demo.py",
        ]);
        assert_eq!(args.file, Some(PathBuf::from("demo.py")));
        assert_eq!(args.theme.as_deref(), Some("Nord"));
        assert_eq!(args.type_text.as_deref(), Some("cl"));
        assert_eq!(args.accept, Some(0));
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_run_types_and_accepts() {
        let args = Args::parse_from(["tinct", "--type", "cl", "--accept", "0"]);
        let editor = run(&args, Config::default()).unwrap();
        assert!(editor.text().ends_with("\nclass"));
        assert!(!editor.autocomplete().is_visible());
    }

    #[test]
    fn test_run_with_file_and_save() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.py");
        let output = dir.path().join("out.py");
        std::fs::write(&input, "x = ").unwrap();

        let argv: Vec<std::ffi::OsString> = vec![
            "tinct".into(),
            "--type".into(),
            "[1".into(),
            "--save-as".into(),
            output.clone().into(),
            input.into(),
        ];
        let args = Args::parse_from(argv);
        run(&args, Config::default()).unwrap();
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "x = [1]");
    }

    #[test]
    fn test_sample_covers_every_category() {
        let editor = Editor::with_text(Config::default(), sample::SAMPLE).unwrap();
        for category in tinct_syntax::TokenCategory::ALL {
            assert!(
                editor.runs().iter().any(|r| r.category == category),
                "sample has no {category}"
            );
        }
    }

    #[test]
    fn test_run_with_theme_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.json");
        let mut theme = tinct_core::Theme::dracula();
        theme.name = "Custom".to_string();
        std::fs::write(&path, serde_json::to_string_pretty(&theme).unwrap()).unwrap();

        let argv: Vec<std::ffi::OsString> =
            vec!["tinct".into(), "--theme-file".into(), path.into()];
        let editor = run(&Args::parse_from(argv), Config::default()).unwrap();
        assert_eq!(editor.theme(), &theme);
    }

    #[test]
    fn test_unknown_theme_is_an_error() {
        let args = Args::parse_from(["tinct", "--theme", "Vaporwave"]);
        assert!(run(&args, Config::default()).is_err());
    }
}
