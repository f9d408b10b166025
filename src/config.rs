//! Shift configuration.
//!
//! [`ShiftConfig`] is a builder that carries the offset and the output
//! settings through [`adjust_with_config`](crate::adjust_with_config)
//! without growing its signature.
//!
//! # Example
//!
//! ```
//! use std::path::Path;
//!
//! use subshift::{Offset, ShiftConfig};
//!
//! let config = ShiftConfig::new("D00:00:01,500".parse::<Offset>()?)
//!     .with_output("fixed.srt")
//!     .with_dry_run(false);
//! assert_eq!(config.output_path(Path::new("movie.srt")), Path::new("fixed.srt"));
//! # Ok::<(), subshift::ShiftError>(())
//! ```

use std::path::{Path, PathBuf};

use crate::offset::Offset;

/// Settings for one shift operation.
#[derive(Debug, Clone, Default)]
pub struct ShiftConfig {
    /// Offset applied to every timestamp.
    pub offset: Offset,
    /// Destination file. `None` rewrites the input in place.
    pub output: Option<PathBuf>,
    /// When `true` the file is transformed and reported on but not written.
    pub dry_run: bool,
}

impl ShiftConfig {
    /// Shift by `offset`, in place, for real.
    pub fn new(offset: Offset) -> Self {
        Self {
            offset,
            output: None,
            dry_run: false,
        }
    }

    /// Write the result to `path` instead of the input file.
    pub fn with_output<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.output = Some(path.into());
        self
    }

    /// Skip the write step.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Where the result for `input` goes.
    pub fn output_path<'a>(&'a self, input: &'a Path) -> &'a Path {
        self.output.as_deref().unwrap_or(input)
    }
}
