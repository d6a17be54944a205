//! Parsers and writers for the experiment log formats.
//!
//! Two plain-text formats exist, both whitespace-delimited with one
//! record per line:
//!
//! - Run logs: `<iteration> <distance> <temperature>` per line, the
//!   per-step trace of a single annealing run.
//! - Distance logs: one `<distance>` per line, the final costs of
//!   repeated runs of one configuration.
//!
//! Parsing is strict: the first short or non-numeric line aborts the
//! whole load. The one deliberate exception is the distance ceiling on
//! run logs: a well-formed line whose distance exceeds the ceiling is
//! silently dropped, which filters the divergent cost spikes some runs
//! emit. Equality with the ceiling retains the line.

use std::io::{self, Write};
use std::path::Path;

use thiserror::Error;

use super::error::{self, AppError};
use super::run_log::{DistanceGroup, RunSample};

/// Column count of the run log format.
pub const RUN_LOG_COLUMNS: usize = 3;

/// Errors that can occur while parsing a log or instance file.
///
/// Lines and columns are 1-indexed.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ParseError {
    /// A line has fewer whitespace-separated columns than the format requires
    #[error("line {line}: expected {expected} columns, found {found}")]
    MissingColumn {
        line: usize,
        found: usize,
        expected: usize,
    },

    /// An iteration or id column did not parse as a non-negative integer
    #[error("line {line}: invalid integer '{token}'")]
    InvalidInteger { line: usize, token: String },

    /// A numeric column did not parse as a float
    #[error("line {line}, column {column}: invalid number '{token}'")]
    InvalidFloat {
        line: usize,
        column: usize,
        token: String,
    },

    /// An instance file node id falls outside `1..=node_count`
    #[error("line {line}: node id {id} out of range for {count} nodes")]
    InvalidNodeId { line: usize, id: u32, count: usize },
}

impl ParseError {
    /// 1-indexed line the error occurred on.
    pub fn line(&self) -> usize {
        match self {
            Self::MissingColumn { line, .. }
            | Self::InvalidInteger { line, .. }
            | Self::InvalidFloat { line, .. }
            | Self::InvalidNodeId { line, .. } => *line,
        }
    }

    /// 1-indexed column for errors that pinpoint one, `None` otherwise.
    pub fn column(&self) -> Option<usize> {
        match self {
            Self::InvalidFloat { column, .. } => Some(*column),
            _ => None,
        }
    }
}

/// Parse a run log from text.
///
/// Each line must carry at least [`RUN_LOG_COLUMNS`] whitespace-separated
/// tokens: an integer iteration followed by float distance and
/// temperature. Extra tokens are ignored. With `ceiling = Some(c)`,
/// lines whose distance is strictly greater than `c` produce no sample;
/// `None` disables filtering entirely.
///
/// The returned samples preserve input line order, so the output is at
/// most as long as the input and iteration ordering is exactly whatever
/// the file had.
pub fn parse_run_log(content: &str, ceiling: Option<f64>) -> Result<Vec<RunSample>, ParseError> {
    let mut samples = Vec::new();

    for (index, line) in content.lines().enumerate() {
        let line_no = index + 1;
        let tokens: Vec<&str> = line.split_whitespace().collect();

        if tokens.len() < RUN_LOG_COLUMNS {
            return Err(ParseError::MissingColumn {
                line: line_no,
                found: tokens.len(),
                expected: RUN_LOG_COLUMNS,
            });
        }

        let iteration: u64 = tokens[0].parse().map_err(|_| ParseError::InvalidInteger {
            line: line_no,
            token: tokens[0].to_string(),
        })?;
        let distance = parse_float(tokens[1], line_no, 2)?;
        let temperature = parse_float(tokens[2], line_no, 3)?;

        // The ceiling skip happens after the full line has parsed, so a
        // malformed line still aborts even when its distance would have
        // been filtered out.
        if let Some(c) = ceiling {
            if distance > c {
                continue;
            }
        }

        samples.push(RunSample::new(iteration, distance, temperature));
    }

    Ok(samples)
}

/// Parse a distance log from text.
///
/// Only the first token of each line is read, as a float. No filtering
/// is applied: well-formed input yields exactly one value per line.
pub fn parse_distances(content: &str) -> Result<Vec<f64>, ParseError> {
    let mut values = Vec::new();

    for (index, line) in content.lines().enumerate() {
        let line_no = index + 1;
        let token = line.split_whitespace().next().ok_or(ParseError::MissingColumn {
            line: line_no,
            found: 0,
            expected: 1,
        })?;
        values.push(parse_float(token, line_no, 1)?);
    }

    Ok(values)
}

/// Load a run log from a file.
///
/// Reads the whole file, then parses it with [`parse_run_log`]. Path
/// and format failures are mapped to the user-facing [`AppError`]
/// carrying the path and, for format errors, the offending line.
pub fn load_run_log(path: impl AsRef<Path>, ceiling: Option<f64>) -> Result<Vec<RunSample>, AppError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .map_err(|e| error::from_io_error(path.to_path_buf(), e))?;
    parse_run_log(&content, ceiling)
        .map_err(|e| error::from_parse_error(Some(path.to_path_buf()), &e))
}

/// Load a distance log from a file into a group labeled after the file.
pub fn load_distances(path: impl AsRef<Path>) -> Result<DistanceGroup, AppError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .map_err(|e| error::from_io_error(path.to_path_buf(), e))?;
    let values = parse_distances(&content)
        .map_err(|e| error::from_parse_error(Some(path.to_path_buf()), &e))?;
    Ok(DistanceGroup::from_path(path, values))
}

/// Write samples in the run log format, one line per sample.
pub fn write_run_log<W: Write>(writer: &mut W, samples: &[RunSample]) -> io::Result<()> {
    for sample in samples {
        writeln!(
            writer,
            "{} {} {}",
            sample.iteration, sample.distance, sample.temperature
        )?;
    }
    Ok(())
}

/// Write values in the distance log format, one line per value.
pub fn write_distances<W: Write>(writer: &mut W, values: &[f64]) -> io::Result<()> {
    for value in values {
        writeln!(writer, "{}", value)?;
    }
    Ok(())
}

fn parse_float(token: &str, line: usize, column: usize) -> Result<f64, ParseError> {
    token.parse().map_err(|_| ParseError::InvalidFloat {
        line,
        column,
        token: token.to_string(),
    })
}
