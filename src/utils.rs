//! Miscellaneous utility functions for mediascope.
//!
//! This module holds the [helpers] submodule, which provides path utilities such as:
//! - Shortening the home directory path to "~" and expanding it back
//! - Parsing pasted or dropped paths
//! - Locating the log file
//!
//! The [cli] submodule parses the command line.

pub mod cli;
pub mod helpers;

pub use helpers::{
    LOG_FILE_NAME, expand_home_path, log_file_path, parse_dropped_paths, readable_path,
    shorten_home_path,
};
