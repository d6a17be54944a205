//! Application error types for user-facing error handling.
//!
//! This module defines error types that are designed to be displayed to
//! users in error dialogs, with detailed information and recovery
//! options. Parse-level errors from the loader are converted into these
//! before they reach the GUI.

use std::path::{Path, PathBuf};
use thiserror::Error;

use super::loader::ParseError;

/// Application-level errors that can be displayed to users.
///
/// These errors are designed to provide clear, actionable information
/// to help users understand and resolve issues.
#[derive(Debug, Clone, Error)]
pub enum AppError {
    /// File was not found at the specified path
    #[error("File not found")]
    FileNotFound {
        /// Path to the file that was not found
        path: PathBuf,
    },

    /// File exists but cannot be read (permissions, locked, etc.)
    #[error("Cannot read file")]
    FileReadError {
        /// Path to the file that could not be read
        path: PathBuf,
        /// Reason for the failure
        reason: String,
    },

    /// File content does not match the expected log format
    #[error("Invalid file format")]
    InvalidFormat {
        /// Path to the file with invalid format
        path: Option<PathBuf>,
        /// Description of what's wrong
        message: String,
        /// Line number where the error occurred (1-indexed)
        line: Option<usize>,
        /// Column (whitespace-separated token position) of the error
        column: Option<usize>,
    },

    /// Generic I/O error
    #[error("I/O error")]
    IoError {
        /// Path related to the error, if any
        path: Option<PathBuf>,
        /// Description of what went wrong
        reason: String,
    },

    /// Settings could not be saved
    #[error("Settings save error")]
    SettingsSaveError {
        /// Description of the failure
        reason: String,
    },

    /// Settings could not be loaded
    #[error("Settings load error")]
    SettingsLoadError {
        /// Description of the failure
        reason: String,
    },
}

impl AppError {
    /// Returns true if the error is recoverable (user can continue using the app).
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::FileNotFound { .. }
                | Self::FileReadError { .. }
                | Self::InvalidFormat { .. }
                | Self::IoError { .. }
                | Self::SettingsSaveError { .. }
                | Self::SettingsLoadError { .. }
        )
    }

    /// Returns true if this error supports retry operation.
    ///
    /// File-related errors can potentially be retried after the user
    /// fixes the underlying issue (e.g., file permissions, file location).
    /// Format errors cannot; retrying the same malformed file would
    /// fail identically.
    pub fn supports_retry(&self) -> bool {
        matches!(
            self,
            Self::FileNotFound { .. }
                | Self::FileReadError { .. }
                | Self::IoError { path: Some(_), .. }
        )
    }

    /// Get the file path associated with this error, if any.
    pub fn file_path(&self) -> Option<&PathBuf> {
        match self {
            Self::FileNotFound { path } => Some(path),
            Self::FileReadError { path, .. } => Some(path),
            Self::InvalidFormat { path, .. } => path.as_ref(),
            Self::IoError { path, .. } => path.as_ref(),
            Self::SettingsSaveError { .. } | Self::SettingsLoadError { .. } => None,
        }
    }

    /// Get the title for the error dialog.
    pub fn dialog_title(&self) -> &'static str {
        match self {
            Self::FileNotFound { .. } => "File Not Found",
            Self::FileReadError { .. } => "Cannot Read File",
            Self::InvalidFormat { .. } => "Invalid File Format",
            Self::IoError { .. } => "I/O Error",
            Self::SettingsSaveError { .. } => "Settings Error",
            Self::SettingsLoadError { .. } => "Settings Error",
        }
    }

    /// Get a brief description of the error suitable for display.
    pub fn brief_description(&self) -> String {
        match self {
            Self::FileNotFound { path } => {
                format!("The file '{}' could not be found.", file_name(path))
            }
            Self::FileReadError { path, .. } => {
                format!("Could not read the file '{}'.", file_name(path))
            }
            Self::InvalidFormat { message, line, .. } => match line {
                Some(l) => format!("Line {}: {}", l, message),
                None => message.clone(),
            },
            Self::IoError { reason, .. } => reason.clone(),
            Self::SettingsSaveError { reason } => format!("Could not save settings: {}", reason),
            Self::SettingsLoadError { reason } => format!("Could not load settings: {}", reason),
        }
    }

    /// Get detailed error information for technical support / bug reports.
    ///
    /// This includes full paths, line numbers, and other technical
    /// details that can help diagnose issues.
    pub fn detailed_info(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Error Type: {}", self.dialog_title()));
        lines.push(format!("Description: {}", self.brief_description()));

        match self {
            Self::FileNotFound { path } => {
                lines.push(format!("Full Path: {}", path.display()));
            }
            Self::FileReadError { path, reason } => {
                lines.push(format!("Full Path: {}", path.display()));
                lines.push(format!("Reason: {}", reason));
            }
            Self::InvalidFormat {
                path,
                message,
                line,
                column,
            } => {
                if let Some(p) = path {
                    lines.push(format!("File: {}", p.display()));
                }
                if let Some(l) = line {
                    lines.push(format!("Line: {}", l));
                }
                if let Some(c) = column {
                    lines.push(format!("Column: {}", c));
                }
                lines.push(format!("Details: {}", message));
            }
            Self::IoError { path, reason } => {
                if let Some(p) = path {
                    lines.push(format!("Path: {}", p.display()));
                }
                lines.push(format!("Details: {}", reason));
            }
            Self::SettingsSaveError { reason } | Self::SettingsLoadError { reason } => {
                lines.push(format!("Details: {}", reason));
            }
        }

        lines.join("\n")
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

/// Create an AppError from a file path and I/O error.
pub fn from_io_error(path: PathBuf, error: std::io::Error) -> AppError {
    match error.kind() {
        std::io::ErrorKind::NotFound => AppError::FileNotFound { path },
        std::io::ErrorKind::PermissionDenied => AppError::FileReadError {
            path,
            reason: "Permission denied".to_string(),
        },
        _ => AppError::FileReadError {
            path,
            reason: error.to_string(),
        },
    }
}

/// Create an AppError from a parse error with optional path context.
pub fn from_parse_error(path: Option<PathBuf>, error: &ParseError) -> AppError {
    AppError::InvalidFormat {
        path,
        message: error.to_string(),
        line: Some(error.line()),
        column: error.column(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_not_found_error() {
        let error = AppError::FileNotFound {
            path: PathBuf::from("/path/to/run.txt"),
        };
        assert!(error.is_recoverable());
        assert!(error.supports_retry());
        assert_eq!(error.dialog_title(), "File Not Found");
        assert!(error.file_path().is_some());
    }

    #[test]
    fn test_invalid_format_error() {
        let error = AppError::InvalidFormat {
            path: Some(PathBuf::from("/path/to/run.txt")),
            message: "invalid number 'oops'".to_string(),
            line: Some(10),
            column: Some(3),
        };
        assert!(error.is_recoverable());
        assert!(!error.supports_retry());
        assert_eq!(error.dialog_title(), "Invalid File Format");
        let details = error.detailed_info();
        assert!(details.contains("Line: 10"));
        assert!(details.contains("Column: 3"));
    }

    #[test]
    fn test_brief_description_includes_line() {
        let error = AppError::InvalidFormat {
            path: None,
            message: "expected 3 columns, found 1".to_string(),
            line: Some(7),
            column: None,
        };
        assert!(error.brief_description().starts_with("Line 7:"));
    }

    #[test]
    fn test_from_io_error_not_found() {
        let path = PathBuf::from("/test/run.txt");
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error = from_io_error(path.clone(), io_error);

        match error {
            AppError::FileNotFound { path: p } => assert_eq!(p, path),
            _ => panic!("Expected FileNotFound error"),
        }
    }

    #[test]
    fn test_from_io_error_permission_denied() {
        let path = PathBuf::from("/test/run.txt");
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let error = from_io_error(path.clone(), io_error);

        match error {
            AppError::FileReadError { path: p, reason } => {
                assert_eq!(p, path);
                assert!(reason.contains("Permission"));
            }
            _ => panic!("Expected FileReadError error"),
        }
    }

    #[test]
    fn test_from_parse_error_carries_position() {
        let parse = ParseError::InvalidFloat {
            line: 4,
            column: 2,
            token: "abc".to_string(),
        };
        let error = from_parse_error(Some(PathBuf::from("/test/run.txt")), &parse);

        match error {
            AppError::InvalidFormat {
                line,
                column,
                message,
                ..
            } => {
                assert_eq!(line, Some(4));
                assert_eq!(column, Some(2));
                assert!(message.contains("abc"));
            }
            _ => panic!("Expected InvalidFormat error"),
        }
    }
}
