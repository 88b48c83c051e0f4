//! Scour - Main Entry Point
//!
//! Find and replace in a text file from the command line.

use clap::Parser;
use log::{error, info};
use scour::config::load_config;
use scour::document::{Document, TextAccess};
use scour::error::{Error, Result};
use scour::find::{FindPanel, SearchStartPolicy};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

/// Application name constant.
const APP_NAME: &str = "Scour";

#[derive(Parser)]
#[command(name = "scour")]
#[command(about = "Find and replace in a text file", long_about = None)]
#[command(version)]
struct Cli {
    /// File to search
    file: PathBuf,

    /// Text (or regular expression with --regex) to find
    find: String,

    /// Replace every match with this text
    #[arg(short, long)]
    replace: Option<String>,

    /// Treat FIND as a regular expression
    #[arg(short = 'e', long)]
    regex: bool,

    /// Match case exactly
    #[arg(short, long)]
    case: bool,

    /// Match whole words only
    #[arg(short, long)]
    word: bool,

    /// Limit the search to the character range START:END
    #[arg(long, value_name = "START:END")]
    range: Option<String>,

    /// List matches from the bottom up
    #[arg(long)]
    last: bool,

    /// Replace without asking for confirmation
    #[arg(short, long)]
    yes: bool,

    /// Show what would be replaced without writing the file
    #[arg(long)]
    dry_run: bool,
}

fn main() -> ExitCode {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    info!("Starting {}", APP_NAME);
    let settings = load_config();

    let text = std::fs::read_to_string(&cli.file).map_err(|source| Error::FileRead {
        path: cli.file.clone(),
        source,
    })?;
    let mut doc = Document::new(text);
    let mut panel = FindPanel::new(&settings);

    panel.set_pattern(&cli.find, cli.regex, cli.case, cli.word)?;

    if let Some(spec) = &cli.range {
        let (start, end) = parse_range(spec)?;
        doc.set_selection(start, end);
        panel.activate_range(&doc)?;
    }

    match &cli.replace {
        None => {
            list_matches(&mut panel, &mut doc, cli.last);
            Ok(())
        }
        Some(replacement) => {
            let confirm = settings.confirm_replace_all && !cli.yes && !cli.dry_run;
            replace_in_file(&cli, &mut panel, &mut doc, replacement, confirm)
        }
    }
}

/// Print every match as `line:column: text`, one per line.
fn list_matches(panel: &mut FindPanel, doc: &mut Document, from_bottom: bool) {
    let (first, step) = if from_bottom {
        (SearchStartPolicy::Last, SearchStartPolicy::Prior)
    } else {
        (SearchStartPolicy::First, SearchStartPolicy::Next)
    };

    let mut policy = first;
    let mut previous = None;
    let mut count = 0;
    while let Some(region) = panel.search(doc, policy) {
        if previous == Some(region) {
            break;
        }
        previous = Some(region);
        policy = step;
        count += 1;

        let (line, column) = line_and_column(doc.full_text(), region.start);
        let content = doc.block_text(line).unwrap_or("");
        println!("{}:{}: {}", line + 1, column + 1, content);
    }
    info!("{} match(es) in {} line(s)", count, doc.line_count());
}

fn replace_in_file(
    cli: &Cli,
    panel: &mut FindPanel,
    doc: &mut Document,
    replacement: &str,
    confirm: bool,
) -> Result<()> {
    panel.set_replace_text(0, replacement)?;
    let preview = panel.replace_all(doc, 0)?;
    if preview.count == 0 {
        println!("No occurrences of '{}'", preview.find_text);
        return Ok(());
    }

    println!(
        "Replace {} occurrence(s) of '{}' with '{}'",
        preview.count, preview.find_text, preview.replace_text
    );
    if cli.dry_run {
        panel.cancel_replace_all();
        return Ok(());
    }
    if confirm && !ask_confirmation()? {
        panel.cancel_replace_all();
        println!("Cancelled");
        return Ok(());
    }

    let count = panel.confirm_replace_all(doc);
    std::fs::write(&cli.file, doc.text()).map_err(|source| Error::FileWrite {
        path: cli.file.clone(),
        source,
    })?;
    println!("Replaced {} occurrence(s) in {}", count, cli.file.display());
    Ok(())
}

fn ask_confirmation() -> Result<bool> {
    print!("Proceed? [y/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

/// Parse `START:END` character offsets.
fn parse_range(spec: &str) -> Result<(usize, usize)> {
    let invalid = || Error::Application(format!("Invalid range '{}', expected START:END", spec));
    let (start, end) = spec.split_once(':').ok_or_else(invalid)?;
    let start = start.trim().parse::<usize>().map_err(|_| invalid())?;
    let end = end.trim().parse::<usize>().map_err(|_| invalid())?;
    Ok((start, end))
}

/// Zero-based line and column (in characters) of a character offset.
fn line_and_column(text: &str, char_offset: usize) -> (usize, usize) {
    let mut line = 0;
    let mut column = 0;
    for c in text.chars().take(char_offset) {
        if c == '\n' {
            line += 1;
            column = 0;
        } else {
            column += 1;
        }
    }
    (line, column)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_range() {
        assert_eq!(parse_range("10:250").unwrap(), (10, 250));
        assert_eq!(parse_range(" 3 : 4 ").unwrap(), (3, 4));
        assert!(parse_range("10-250").is_err());
        assert!(parse_range("a:b").is_err());
    }

    #[test]
    fn test_line_and_column() {
        let text = "ab\ncdé\nf";
        assert_eq!(line_and_column(text, 0), (0, 0));
        assert_eq!(line_and_column(text, 4), (1, 1));
        assert_eq!(line_and_column(text, 7), (2, 0));
    }

    #[test]
    fn test_cli_parses_flags() {
        let cli = Cli::parse_from([
            "scour", "notes.txt", "cat", "--replace", "dog", "-e", "--case", "--range", "0:200",
            "--yes",
        ]);
        assert_eq!(cli.find, "cat");
        assert_eq!(cli.replace.as_deref(), Some("dog"));
        assert!(cli.regex && cli.case && cli.yes);
        assert!(!cli.word && !cli.last && !cli.dry_run);
        assert_eq!(cli.range.as_deref(), Some("0:200"));
    }
}
