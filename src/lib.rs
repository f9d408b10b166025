//! # subshift
//!
//! Shift subtitle timestamps forward or backward by a fixed offset to fix
//! audio/subtitle desynchronization.
//!
//! `subshift` finds every `HH:MM:SS,mmm --> HH:MM:SS,mmm` timing line in a
//! subtitle file, moves both timestamps by the same signed offset, and
//! writes the file back out. Every other line (indices, caption text, blank
//! separators) is copied byte for byte.
//!
//! ## Quick Start
//!
//! ### Delay a File In Place
//!
//! ```no_run
//! use subshift::{Offset, ShiftConfig};
//!
//! let offset: Offset = "+00:00:05,000".parse().unwrap();
//! subshift::adjust_with_config("movie.srt", &ShiftConfig::new(offset)).unwrap();
//! ```
//!
//! ### Advance Into a New File
//!
//! ```no_run
//! use subshift::Offset;
//!
//! let offset = Offset::parse_directional("A00:00:02,500").unwrap();
//! subshift::adjust("movie.srt", offset, "movie.synced.srt").unwrap();
//! ```
//!
//! ### Shift Text in Memory
//!
//! ```
//! use subshift::Offset;
//!
//! let offset: Offset = "+05,000".parse().unwrap();
//! let (shifted, stats) =
//!     subshift::shift_text("1\n00:00:10,000 --> 00:00:12,000\nHi\n", offset).unwrap();
//! assert_eq!(shifted, "1\n00:00:15,000 --> 00:00:17,000\nHi\n");
//! assert_eq!(stats.time_ranges, 1);
//! ```
//!
//! ## Offset Notation
//!
//! | Expression | Meaning |
//! |------------|---------|
//! | `+HH:MM:SS,mmm`, `DHH:MM:SS,mmm` | delay (show later) |
//! | `-HH:MM:SS,mmm`, `AHH:MM:SS,mmm` | advance (show earlier) |
//! | `SS,mmm` with any of the signs above | short form |
//!
//! Timestamps that an advance would push before the start of the media are
//! set to `00:00:00,000`.

pub mod config;
pub mod error;
pub mod offset;
pub mod shift;
pub mod timestamp;

pub use config::ShiftConfig;
pub use error::{ErrorKind, ShiftError};
pub use offset::{Direction, Offset, SignNotation};
pub use shift::{ShiftReport, ShiftStats, adjust, adjust_with_config, shift_text};
pub use timestamp::{TimeRange, Timestamp};
