//! Configuration management for the todo application.
//!
//! Loads configuration from environment variables with sensible defaults.
//! Unlike a missing variable, a variable that is set but cannot be parsed is
//! an error.

use crate::types::{AppState, ParseFilterError, VisibilityFilter};
use std::env;
use thiserror::Error;

/// Default `RUST_LOG` directive for the binary
pub const DEFAULT_LOG_FILTER: &str = "todo=info,rxtodo_runtime=info";

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// `TODO_INITIAL_FILTER` is not a known filter
    #[error("TODO_INITIAL_FILTER: {0}")]
    InitialFilter(#[from] ParseFilterError),

    /// A numeric variable could not be parsed
    #[error("{var}: `{value}` is not a non-negative integer")]
    InvalidNumber {
        /// Variable name
        var: &'static str,
        /// Offending value
        value: String,
    },

    /// A boolean variable could not be parsed
    #[error("{var}: `{value}` is not a boolean (expected true/false, 1/0, yes/no, on/off)")]
    InvalidBool {
        /// Variable name
        var: &'static str,
        /// Offending value
        value: String,
    },
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Filter the app starts with (`TODO_INITIAL_FILTER`, default `SHOW_ALL`)
    pub initial_filter: VisibilityFilter,
    /// First id handed to a new todo (`TODO_FIRST_ID`, default 0)
    pub first_id: u64,
    /// Log every reduced action at info (`TODO_ACTION_LOG`, default false)
    pub action_log: bool,
    /// Install the Prometheus recorder (`TODO_METRICS`, default false)
    pub metrics: bool,
    /// tracing filter directive (`RUST_LOG`)
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            initial_filter: VisibilityFilter::ShowAll,
            first_id: 0,
            action_log: false,
            metrics: false,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable is set to a value that cannot be
    /// parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Load configuration through `lookup` instead of the process environment
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable is set to a value that cannot be
    /// parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let initial_filter = match lookup("TODO_INITIAL_FILTER") {
            Some(value) => value.parse::<VisibilityFilter>()?,
            None => defaults.initial_filter,
        };

        let first_id = match lookup("TODO_FIRST_ID") {
            Some(value) => value
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidNumber {
                    var: "TODO_FIRST_ID",
                    value,
                })?,
            None => defaults.first_id,
        };

        Ok(Self {
            initial_filter,
            first_id,
            action_log: parse_bool("TODO_ACTION_LOG", lookup("TODO_ACTION_LOG"))?
                .unwrap_or(defaults.action_log),
            metrics: parse_bool("TODO_METRICS", lookup("TODO_METRICS"))?
                .unwrap_or(defaults.metrics),
            log_filter: lookup("RUST_LOG").unwrap_or(defaults.log_filter),
        })
    }

    /// State the store starts from
    #[must_use]
    pub const fn initial_state(&self) -> AppState {
        AppState::with_filter(self.initial_filter)
    }
}

fn parse_bool(var: &'static str, value: Option<String>) -> Result<Option<bool>, ConfigError> {
    let Some(value) = value else {
        return Ok(None);
    };

    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(Some(true)),
        "0" | "false" | "no" | "off" | "" => Ok(Some(false)),
        _ => Err(ConfigError::InvalidBool { var, value }),
    }
}
