//! filesorter - sort the files of a directory into category folders
//!
//! This library classifies files by extension, moves them into category
//! subdirectories of the directory they live in, writes an append-only run
//! log, and keeps per-category counts and sizes for every run.

pub mod cli;
pub mod config;
pub mod error;
pub mod mover;
pub mod organizer;
pub mod report;
pub mod rules;
pub mod run_log;
pub mod stats;

pub use config::{CompiledFilters, Config};
pub use error::{CliError, ConfigError, MoveError, OrganizeError};
pub use mover::{MovedFile, Mover};
pub use organizer::Organizer;
pub use rules::ExtensionRules;
pub use run_log::RunLog;
pub use stats::{CategoryStats, RunSummary};

pub use cli::{Cli, run};
