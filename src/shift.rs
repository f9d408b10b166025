//! File transformation.
//!
//! [`shift_text`] rewrites every timing line of a subtitle document held in
//! memory. [`adjust`] and [`adjust_with_config`] wrap it with file reading and
//! an all-or-nothing write.
//!
//! # Example
//!
//! ```no_run
//! use subshift::{Offset, ShiftError};
//!
//! let offset: Offset = "+00:00:05,000".parse()?;
//! let report = subshift::adjust("movie.srt", offset, "movie.fixed.srt")?;
//! println!("shifted {} time ranges", report.stats.time_ranges);
//! # Ok::<(), ShiftError>(())
//! ```

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::fs;
use std::io::{Error as IoError, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::config::ShiftConfig;
use crate::error::ShiftError;
use crate::offset::Offset;
use crate::timestamp::{ARROW, match_timing_line};

/// Counts gathered while shifting one document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShiftStats {
    /// Total lines in the document.
    pub lines: usize,
    /// Timing lines that were rewritten.
    pub time_ranges: usize,
    /// Timestamps floored at `00:00:00,000`.
    pub clamped: usize,
}

/// Outcome of [`adjust_with_config`].
#[derive(Debug, Clone)]
pub struct ShiftReport {
    /// File that was read.
    pub input: PathBuf,
    /// File that was (or, for a dry run, would have been) written.
    pub output: PathBuf,
    /// Offset applied.
    pub offset: Offset,
    /// Line counts.
    pub stats: ShiftStats,
    /// `false` for a dry run.
    pub written: bool,
}

impl Display for ShiftReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "{} -> {}: shifted {} time range(s) by {} ({} line(s), {} clamped)",
            self.input.display(),
            self.output.display(),
            self.stats.time_ranges,
            self.offset,
            self.stats.lines,
            self.stats.clamped,
        )
    }
}

/// Shift the subtitle file at `input` by `offset` and write it to `output`.
///
/// `output` may equal `input`; the original is only replaced once the new
/// content has been fully written.
///
/// # Errors
///
/// - [`ShiftError::FileRead`] or [`ShiftError::NotText`] if `input` cannot be read as text.
/// - [`ShiftError::InvalidTimeRange`] if a timing line holds an undecodable timestamp.
/// - [`ShiftError::FileWrite`] if `output` cannot be written.
pub fn adjust<P: AsRef<Path>, Q: Into<PathBuf>>(
    input: P,
    offset: Offset,
    output: Q,
) -> Result<ShiftReport, ShiftError> {
    adjust_with_config(input, &ShiftConfig::new(offset).with_output(output))
}

/// Shift the subtitle file at `input` according to `config`.
///
/// # Errors
///
/// Same as [`adjust`].
pub fn adjust_with_config<P: AsRef<Path>>(
    input: P,
    config: &ShiftConfig,
) -> Result<ShiftReport, ShiftError> {
    let input = input.as_ref();
    let output = config.output_path(input);

    let content = read_text(input)?;
    let (shifted, stats) = shift_text(&content, config.offset)?;

    if stats.clamped > 0 {
        log::warn!(
            "{} timestamp(s) would precede the start of the media and were set to 00:00:00,000",
            stats.clamped
        );
    }
    if stats.time_ranges == 0 {
        log::warn!("No time ranges found in {}", input.display());
    }

    if config.dry_run {
        log::debug!("Dry run, leaving {} untouched", output.display());
    } else {
        write_atomically(output, &shifted)?;
    }

    let report = ShiftReport {
        input: input.to_path_buf(),
        output: output.to_path_buf(),
        offset: config.offset,
        stats,
        written: !config.dry_run,
    };
    log::info!("{report}");
    Ok(report)
}

/// Shift every timing line in `content` by `offset`.
///
/// Lines keep their own terminators, so `\n` and `\r\n` documents come back
/// in the convention they went in with. Non-timing lines are copied
/// unchanged.
///
/// # Errors
///
/// [`ShiftError::InvalidTimeRange`] if a timing line holds a timestamp too
/// large to represent.
pub fn shift_text(content: &str, offset: Offset) -> Result<(String, ShiftStats), ShiftError> {
    let mut output = String::with_capacity(content.len());
    let mut stats = ShiftStats::default();

    for (index, raw_line) in content.split_inclusive('\n').enumerate() {
        stats.lines += 1;
        let (line, terminator) = split_terminator(raw_line);
        let (marker, line) = match line.strip_prefix(BYTE_ORDER_MARK) {
            Some(rest) if index == 0 => (BYTE_ORDER_MARK, rest),
            _ => ("", line),
        };

        let Some(timing) = match_timing_line(line) else {
            output.push_str(raw_line);
            continue;
        };

        let line_number = index + 1;
        let range = timing
            .decode()
            .map_err(|error| ShiftError::InvalidTimeRange {
                line_number,
                reason: error.to_string(),
            })?;

        let (shifted, clamped) = range.shift(offset);
        if clamped > 0 {
            log::debug!("Line {line_number}: clamped {range} to {shifted}");
        }
        stats.time_ranges += 1;
        stats.clamped += clamped;

        output.push_str(marker);
        output.push_str(&shifted.start.to_string());
        output.push_str(ARROW);
        output.push_str(&shifted.end.to_string());
        output.push_str(timing.trailing);
        output.push_str(terminator);
    }

    Ok((output, stats))
}

const BYTE_ORDER_MARK: &str = "\u{feff}";

/// Split a line from `split_inclusive('\n')` into its body and terminator.
fn split_terminator(raw_line: &str) -> (&str, &str) {
    let body = raw_line
        .strip_suffix("\r\n")
        .or_else(|| raw_line.strip_suffix('\n'))
        .unwrap_or(raw_line);
    (body, &raw_line[body.len()..])
}

fn read_text(path: &Path) -> Result<String, ShiftError> {
    log::debug!("Reading {}", path.display());
    let bytes = fs::read(path).map_err(|source| ShiftError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    String::from_utf8(bytes).map_err(|_| ShiftError::NotText {
        path: path.to_path_buf(),
    })
}

/// Write `content` to a temporary file next to `path`, then rename it over
/// `path`. Symlinks are followed so the link target is replaced, not the
/// link. Existing permissions on the target are carried over.
fn write_atomically(path: &Path, content: &str) -> Result<(), ShiftError> {
    let to_error = |source: IoError| ShiftError::FileWrite {
        path: path.to_path_buf(),
        source,
    };

    let target = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    let directory = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    log::debug!("Writing {} via {}", target.display(), directory.display());
    let mut temporary = NamedTempFile::new_in(directory).map_err(to_error)?;
    temporary.write_all(content.as_bytes()).map_err(to_error)?;
    if let Ok(metadata) = fs::metadata(&target) {
        temporary
            .as_file()
            .set_permissions(metadata.permissions())
            .map_err(to_error)?;
    }
    temporary.as_file().sync_all().map_err(to_error)?;
    temporary
        .persist(&target)
        .map_err(|error| to_error(error.error))?;
    Ok(())
}
