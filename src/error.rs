//! Error types for the `subshift` crate.
//!
//! This module defines [`ShiftError`], the unified error type returned by all
//! fallible operations in the crate. Variants fall into two kinds, reported by
//! [`ShiftError::kind`]: malformed text ([`ErrorKind::Format`]) and file
//! access failures ([`ErrorKind::Io`]).

use std::{io::Error as IoError, path::PathBuf};

use thiserror::Error;

/// Broad classification of a [`ShiftError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// An offset expression or timestamp could not be parsed.
    Format,
    /// The subtitle file could not be read or written.
    Io,
}

/// The unified error type for all `subshift` operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ShiftError {
    /// The offset expression does not match `[sign]HH:MM:SS,MS` or `[sign]SS,MS`.
    #[error("Invalid offset '{input}': {reason}")]
    InvalidOffset {
        /// The expression as given by the user.
        input: String,
        /// What was wrong with it.
        reason: String,
    },

    /// A subtitle timestamp does not match `HH:MM:SS,MS`.
    #[error("Invalid timestamp '{input}': {reason}")]
    InvalidTimestamp {
        /// The timestamp text.
        input: String,
        /// What was wrong with it.
        reason: String,
    },

    /// A line shaped like a time range held a timestamp that could not be decoded.
    #[error("Malformed time range on line {line_number}: {reason}")]
    InvalidTimeRange {
        /// 1-based line number in the input file.
        line_number: usize,
        /// Underlying timestamp error message.
        reason: String,
    },

    /// The input file could not be read.
    #[error("Failed to read subtitle file at {path}: {source}")]
    FileRead {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: IoError,
    },

    /// The input file is not valid UTF-8 text.
    #[error("Subtitle file at {path} is not valid UTF-8 text")]
    NotText {
        /// Path that was read.
        path: PathBuf,
    },

    /// The output file could not be written.
    #[error("Failed to write subtitle file at {path}: {source}")]
    FileWrite {
        /// Destination path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: IoError,
    },
}

impl ShiftError {
    /// Whether this error came from parsing text or from file access.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ShiftError::InvalidOffset { .. }
            | ShiftError::InvalidTimestamp { .. }
            | ShiftError::InvalidTimeRange { .. } => ErrorKind::Format,
            ShiftError::FileRead { .. } | ShiftError::NotText { .. } | ShiftError::FileWrite { .. } => {
                ErrorKind::Io
            }
        }
    }

    pub(crate) fn invalid_offset(input: &str, reason: impl Into<String>) -> Self {
        ShiftError::InvalidOffset {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_timestamp(input: &str, reason: impl Into<String>) -> Self {
        ShiftError::InvalidTimestamp {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}
