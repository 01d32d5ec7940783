//! Output formatting for the non-interactive commands

use crate::index::{FileRecord, IndexSummary};
use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Print the one-line scan summary
pub fn print_summary(root: &Path, summary: &IndexSummary, choice: ColorChoice) -> io::Result<()> {
    let mut stdout = StandardStream::stdout(choice);
    write_summary(&mut stdout, root, summary)
}

fn write_summary<W: WriteColor>(out: &mut W, root: &Path, summary: &IndexSummary) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)).set_bold(true))?;
    write!(out, "{}", root.display())?;
    out.reset()?;
    writeln!(
        out,
        ": found {} parts among {} files in {:.2} seconds",
        group_thousands(summary.part_count as u64),
        group_thousands(summary.file_count as u64),
        summary.elapsed_seconds()
    )?;

    if summary.unreadable_sizes > 0 {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
        writeln!(out, "({} file sizes could not be read)", summary.unreadable_sizes)?;
        out.reset()?;
    }

    Ok(())
}

/// Print parts, one per line
pub fn print_parts<S: AsRef<str>>(parts: &[S], choice: ColorChoice) -> io::Result<()> {
    let mut stdout = StandardStream::stdout(choice);
    write_parts(&mut stdout, parts)
}

fn write_parts<W: WriteColor, S: AsRef<str>>(out: &mut W, parts: &[S]) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)))?;
    for part in parts {
        writeln!(out, "{}", part.as_ref())?;
    }
    out.reset()?;
    Ok(())
}

/// Print a file listing as `path  TYPE  size` columns
pub fn print_files(files: &[&FileRecord], choice: ColorChoice) -> io::Result<()> {
    let mut stdout = StandardStream::stdout(choice);
    write_files(&mut stdout, files)
}

fn write_files<W: WriteColor>(out: &mut W, files: &[&FileRecord]) -> io::Result<()> {
    let path_width = files
        .iter()
        .map(|f| f.relative_path.chars().count())
        .max()
        .unwrap_or(0);
    let type_width = files
        .iter()
        .map(|f| f.extension.chars().count())
        .max()
        .unwrap_or(0)
        .max(4);

    for file in files {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)))?;
        write!(out, "{:<width$}", file.relative_path, width = path_width)?;
        out.reset()?;
        write!(out, "  ")?;

        out.set_color(ColorSpec::new().set_fg(Some(Color::Blue)))?;
        write!(out, "{:<width$}", file.extension, width = type_width)?;
        out.reset()?;
        write!(out, "  ")?;

        out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
        writeln!(out, "{:>15}", group_thousands(file.size_bytes))?;
        out.reset()?;
    }

    Ok(())
}

/// Pretty-print any serializable value as JSON on stdout
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> io::Result<()> {
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    serde_json::to_writer_pretty(&mut lock, value)?;
    writeln!(lock)
}

/// Format a count with `,` every three digits
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use termcolor::NoColor;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1234567), "1,234,567");
    }

    #[test]
    fn test_write_files_columns() {
        let a = FileRecord::new("docs/a.txt".to_string(), 1500);
        let b = FileRecord::new("b".to_string(), 2);
        let mut out = NoColor::new(Vec::new());
        write_files(&mut out, &[&a, &b]).unwrap();

        let text = String::from_utf8(out.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("docs/a.txt  TXT "));
        assert!(lines[0].ends_with("1,500"));
        assert!(lines[1].starts_with("b           "));
        assert!(lines[1].ends_with(" 2"));
    }

    #[test]
    fn test_write_summary() {
        let summary = IndexSummary {
            part_count: 1200,
            file_count: 3,
            unreadable_sizes: 1,
            elapsed: Duration::from_millis(250),
        };
        let mut out = NoColor::new(Vec::new());
        write_summary(&mut out, Path::new("/data"), &summary).unwrap();

        let text = String::from_utf8(out.into_inner()).unwrap();
        assert!(text.starts_with("/data: found 1,200 parts among 3 files in 0.25 seconds"));
        assert!(text.contains("1 file sizes could not be read"));
    }

    #[test]
    fn test_write_parts() {
        let mut out = NoColor::new(Vec::new());
        write_parts(&mut out, &["alpha", "beta"]).unwrap();
        assert_eq!(String::from_utf8(out.into_inner()).unwrap(), "alpha\nbeta\n");
    }
}
