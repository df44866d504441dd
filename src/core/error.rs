//! Error handling for solution-templates
//!
//! Domain irregularities (dependency cycles, missing dependencies, absent
//! structures, unresolved placeholders) are returned as data by the engines
//! and are never errors. What remains here are the failures around them:
//! unreadable input files, JSON that is not a template, bad configuration.
//!
//! The error system follows two layers:
//! - [`SolutionError`] - enumerated error types for precise handling in code
//! - [`ErrorContext`] - wrapper adding user-facing details and suggestions
//!
//! Use [`user_friendly_error`] to turn any `anyhow::Error` into an
//! [`ErrorContext`] for display in the CLI.
//!
//! # Examples
//!
//! ```rust,no_run
//! use solution_templates::core::{ErrorContext, SolutionError};
//!
//! let context = ErrorContext::new(SolutionError::TemplateParse {
//!     path: "templates.json".to_string(),
//!     reason: "expected an array".to_string(),
//! })
//! .with_suggestion("Pass the `templates` array of a Solution item's data");
//!
//! context.display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for solution-templates operations.
#[derive(Error, Debug)]
pub enum SolutionError {
    /// The input could not be read as a list of item templates.
    #[error("Invalid template input '{path}': {reason}")]
    TemplateParse {
        /// Input file
        path: String,
        /// Why it was rejected
        reason: String,
    },

    /// The input could not be read as a template dictionary.
    #[error("Invalid template dictionary '{path}': {reason}")]
    DictionaryParse {
        /// Input file
        path: String,
        /// Why it was rejected
        reason: String,
    },

    /// Placeholders remain after resolution and strict mode was requested.
    #[error("{count} placeholder(s) could not be resolved")]
    UnresolvedPlaceholders {
        /// Number of remaining tokens
        count: usize,
        /// The remaining tokens
        tokens: Vec<String>,
    },

    /// Configuration file problem.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the problem
        message: String,
    },

    /// File system failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parse failure.
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Error wrapper carrying user-facing details and a suggestion.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: SolutionError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details.
    #[must_use]
    pub const fn new(error: SolutionError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add details explaining the error.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr: message in red, details in yellow,
    /// suggestion in green.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into an [`ErrorContext`] with a suggestion where one is
/// known.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let chain = format!("{error:#}");

    match error.downcast::<SolutionError>() {
        Ok(solution_error) => create_error_context(solution_error),
        Err(error) => {
            if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
                let kind = io_error.kind();
                let context = ErrorContext::new(SolutionError::Io(std::io::Error::new(
                    kind,
                    io_error.to_string(),
                )))
                .with_details(chain);
                return match kind {
                    std::io::ErrorKind::NotFound => context
                        .with_suggestion("Check that the file exists and the path is correct"),
                    std::io::ErrorKind::PermissionDenied => {
                        context.with_suggestion("Check the file permissions")
                    }
                    _ => context,
                };
            }

            if error.downcast_ref::<serde_json::Error>().is_some() {
                return ErrorContext::new(SolutionError::TemplateParse {
                    path: "input".to_string(),
                    reason: "invalid JSON".to_string(),
                })
                .with_details(chain)
                .with_suggestion("Validate the input file with a JSON linter");
            }

            if error.downcast_ref::<toml::de::Error>().is_some() {
                return ErrorContext::new(SolutionError::Config {
                    message: error.to_string(),
                })
                .with_details(chain)
                .with_suggestion("Check soltpl.toml or the file passed with --config");
            }

            ErrorContext::new(SolutionError::Config {
                message: error.to_string(),
            })
            .with_details(chain)
        }
    }
}

fn create_error_context(error: SolutionError) -> ErrorContext {
    match &error {
        SolutionError::TemplateParse {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Provide a JSON array of item templates, or an object with a `templates` array"),
        SolutionError::DictionaryParse {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Provide a JSON object keyed by source item id"),
        SolutionError::UnresolvedPlaceholders {
            tokens,
            ..
        } => {
            let details = tokens.join(", ");
            ErrorContext::new(error)
                .with_details(details)
                .with_suggestion("Record the missing items in the dictionary or drop --strict")
        }
        SolutionError::Config {
            ..
        }
        | SolutionError::Toml(_) => ErrorContext::new(error)
            .with_suggestion("Check soltpl.toml or the file passed with --config"),
        SolutionError::Io(_) | SolutionError::Json(_) => ErrorContext::new(error),
    }
}
