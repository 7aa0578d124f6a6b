//! Reporting for finished index builds

use crate::index::{BuildSummary, BuiltIndex, WorkerExit};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Machine-readable form of a finished build
#[derive(Debug, Serialize)]
pub struct IndexReport {
    pub summary: BuildSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub words: Option<BTreeMap<String, Vec<PathBuf>>>,
}

impl IndexReport {
    pub fn new(built: &BuiltIndex, include_words: bool) -> Self {
        Self {
            summary: built.summary.clone(),
            words: include_words.then(|| built.postings()),
        }
    }
}

/// Print the build summary
pub fn print_summary(built: &BuiltIndex, choice: ColorChoice) -> io::Result<()> {
    let mut stdout = StandardStream::stdout(choice);
    write_summary(&mut stdout, built)
}

pub fn write_summary<W: WriteColor>(out: &mut W, built: &BuiltIndex) -> io::Result<()> {
    let summary = &built.summary;

    write_field(out, "Unique words", &summary.unique_words.to_string())?;
    write_field(out, "Threads", &summary.threads.to_string())?;
    write_field(out, "Files", &summary.files.to_string())?;
    write_field(
        out,
        "Word table",
        &format!("{} slots ({} growths)", summary.capacity, summary.growths),
    )?;
    write_field(out, "Elapsed", &format!("{:.2?}", summary.elapsed))?;

    if summary.files_failed > 0 {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
        writeln!(out, "({} files could not be read)", summary.files_failed)?;
        out.reset()?;
    }

    for worker in built.aborted_workers() {
        if let WorkerExit::Aborted { path } = &worker.exit {
            out.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
            writeln!(out, "(worker {} stopped at {})", worker.id, path.display())?;
            out.reset()?;
        }
    }

    Ok(())
}

fn write_field<W: WriteColor>(out: &mut W, label: &str, value: &str) -> io::Result<()> {
    write!(out, "{:<14}", format!("{label}:"))?;
    out.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true))?;
    writeln!(out, "{value}")?;
    out.reset()
}

/// Print every word followed by the files it occurs in
pub fn print_postings(
    postings: &BTreeMap<String, Vec<PathBuf>>,
    choice: ColorChoice,
) -> io::Result<()> {
    let mut stdout = StandardStream::stdout(choice);
    write_postings(&mut stdout, postings)
}

pub fn write_postings<W: WriteColor>(
    out: &mut W,
    postings: &BTreeMap<String, Vec<PathBuf>>,
) -> io::Result<()> {
    for (word, files) in postings {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)).set_bold(true))?;
        write!(out, "{word}")?;
        out.reset()?;
        write!(out, " ->")?;

        for file in files {
            write!(out, " {}", display_name(file))?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Print the report as pretty JSON on stdout
pub fn print_json(report: &IndexReport) -> io::Result<()> {
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    serde_json::to_writer_pretty(&mut lock, report)?;
    writeln!(lock)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use termcolor::NoColor;

    #[test]
    fn test_write_postings_uses_file_names() {
        let mut postings = BTreeMap::new();
        postings.insert(
            "dog".to_string(),
            vec![PathBuf::from("/tmp/x/a.txt"), PathBuf::from("/tmp/x/b.txt")],
        );
        postings.insert("cat".to_string(), vec![PathBuf::from("/tmp/x/a.txt")]);

        let mut out = NoColor::new(Vec::new());
        write_postings(&mut out, &postings).unwrap();
        let text = String::from_utf8(out.into_inner()).unwrap();

        assert_eq!(text, "cat -> a.txt\ndog -> a.txt b.txt\n");
    }
}
