use std::fmt;
use std::io::{self, Write};

use console::{measure_text_width, pad_str, style, Alignment};
use scenecopy_core::scene::AssetEntry;

const HEADERS: [&str; 3] = ["Type", "Name", "Group"];

/// Width used when wrapping file paths in headings.
pub const PATH_WRAP_WIDTH: usize = 72;

/// Progress lines of a command. Nothing is written when quiet.
pub struct Progress<W = io::Stdout> {
    out: W,
    quiet: bool,
}

impl Progress {
    pub fn stdout(quiet: bool) -> Self {
        Progress::new(io::stdout(), quiet)
    }
}

impl<W: Write> Progress<W> {
    pub fn new(out: W, quiet: bool) -> Self {
        Progress { out, quiet }
    }

    pub fn line(&mut self, line: impl fmt::Display) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        writeln!(self.out, "{line}")
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Renders assets as an aligned three-column table. Column widths account for
/// double-width characters.
pub fn asset_table(entries: &[AssetEntry]) -> String {
    if entries.is_empty() {
        return "  (no assets)\n".to_string();
    }

    let rows: Vec<[String; 3]> = entries.iter()
        .map(|entry| [entry.kind.to_string(), entry.name.clone(), entry.hierarchy.to_string()])
        .collect();

    let mut widths = HEADERS.map(measure_text_width);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(measure_text_width(cell));
        }
    }

    let mut out = String::new();
    push_row(&mut out, &HEADERS.map(str::to_string), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&format!("  {}\n", rule.join("-+-")));
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row(out: &mut String, cells: &[String; 3], widths: &[usize; 3]) {
    let padded: Vec<_> = cells.iter()
        .zip(widths)
        .map(|(cell, width)| pad_str(cell, *width, Alignment::Left, None).into_owned())
        .collect();
    out.push_str(&format!("  {}\n", padded.join(" | ").trim_end()));
}

/// One line per asset, for selection prompts.
pub fn asset_label(entry: &AssetEntry) -> String {
    if entry.hierarchy.is_empty() {
        format!("[{}] {}", entry.kind, entry.name)
    } else {
        format!("[{}] {}  ({})", entry.kind, entry.name, entry.hierarchy)
    }
}

/// A heading naming a side and its file, with long paths wrapped.
pub fn heading(title: &str, path: Option<&std::path::Path>) -> String {
    let location = match path {
        Some(path) => path.display().to_string(),
        None => "No file selected".to_string(),
    };
    format!(
        "{}\n{}",
        style(title).bold(),
        textwrap::indent(&textwrap::fill(&location, PATH_WRAP_WIDTH), "  ")
    )
}
