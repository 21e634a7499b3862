//! Command-line front end.
//!
//! Two modes share the same per-run logic:
//! - directories given as arguments are organized one after another;
//! - without arguments the user is prompted for a directory until they enter
//!   an empty line or close the input.
//!
//! Every run gets its own [`Organizer`], its own handle on the run log and
//! its own statistics.

use crate::config::{CompiledFilters, Config};
use crate::error::{CliError, OrganizeError};
use crate::organizer::Organizer;
use crate::report::{JsonReport, write_report};
use crate::rules::ExtensionRules;
use crate::run_log::RunLog;
use crate::stats::RunSummary;
use clap::Parser;
use colored::*;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Sort files into category folders by extension.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "filesorter", version, about)]
pub struct Cli {
    /// Directories to organize. Without any, you are prompted for them.
    pub dirs: Vec<PathBuf>,

    /// Path to a TOML configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Run log location (overrides the configuration file).
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Print reports as JSON.
    #[arg(long)]
    pub json: bool,

    /// Enable debug diagnostics on stderr.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Everything that stays fixed across the runs of one program invocation.
pub struct Session {
    rules: ExtensionRules,
    filters: CompiledFilters,
    log_path: PathBuf,
    json: bool,
}

impl Session {
    /// Builds a session and checks that the run log can be opened.
    pub fn new(
        rules: ExtensionRules,
        filters: CompiledFilters,
        log_path: PathBuf,
        json: bool,
    ) -> Result<Self, CliError> {
        RunLog::open(&log_path).map_err(|source| CliError::LogOpen {
            path: log_path.clone(),
            source,
        })?;
        Ok(Self {
            rules,
            filters,
            log_path,
            json,
        })
    }

    /// Builds a session from parsed arguments and the loaded configuration.
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let config = Config::load(cli.config.as_deref())?;
        let filters = config.filters.compile()?;
        let log_path = cli.log_file.clone().unwrap_or(config.log.file);
        Self::new(ExtensionRules::default(), filters, log_path, cli.json)
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Organizes one directory and writes its report to `out`.
    ///
    /// A directory that cannot be read is reported to `out` and yields
    /// `Ok(None)`; the caller may continue with the next one.
    pub fn run_once<O: Write>(
        &self,
        dir: &Path,
        out: &mut O,
    ) -> Result<Option<RunSummary>, CliError> {
        let log = RunLog::open(&self.log_path).map_err(|source| CliError::LogOpen {
            path: self.log_path.clone(),
            source,
        })?;

        let mut organizer = Organizer::new(dir, self.rules.clone(), log)
            .with_filters(self.filters.clone())
            .ignoring(&self.log_path);

        writeln!(out, "Organizing {} ...", dir.display())?;
        match organizer.organize() {
            Ok(_) => {}
            Err(e @ OrganizeError::ReadDir { .. }) => {
                writeln!(out, "{} {}", "✗".red(), e)?;
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        }

        let summary = organizer.finish()?;
        if self.json {
            writeln!(out, "{}", JsonReport::new(dir, &summary).to_json()?)?;
        } else {
            write_report(out, dir, &summary)?;
        }
        Ok(Some(summary))
    }

    /// Organizes each directory in turn.
    pub fn run_batch<O: Write>(&self, dirs: &[PathBuf], out: &mut O) -> Result<(), CliError> {
        for dir in dirs {
            self.run_once(dir, out)?;
        }
        Ok(())
    }

    /// Prompts for directories until an empty line or end of input.
    pub fn prompt_loop<R: BufRead, O: Write>(
        &self,
        input: &mut R,
        out: &mut O,
    ) -> Result<(), CliError> {
        writeln!(out, "{}", "File organizer".bold())?;
        loop {
            writeln!(out, "Enter the path of a directory to organize (empty to quit):")?;
            out.flush()?;

            let mut line = String::new();
            let read = input.read_line(&mut line)?;
            let dir = line.trim();
            if read == 0 || dir.is_empty() {
                debug!("prompt loop finished");
                writeln!(out, "Bye.")?;
                return Ok(());
            }

            self.run_once(Path::new(dir), out)?;
        }
    }
}

/// Runs the program for already parsed arguments.
pub fn run(cli: &Cli) -> Result<(), CliError> {
    let session = Session::from_cli(cli)?;
    debug!(log = %session.log_path().display(), "run log");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if cli.dirs.is_empty() {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        session.prompt_loop(&mut input, &mut out)
    } else {
        session.run_batch(&cli.dirs, &mut out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn session(log_path: PathBuf) -> Session {
        Session::new(
            ExtensionRules::default(),
            CompiledFilters::default(),
            log_path,
            false,
        )
        .unwrap()
    }

    #[test]
    fn test_cli_parses_flags() {
        let cli = Cli::parse_from([
            "filesorter",
            "--json",
            "--log-file",
            "x.log",
            "-v",
            "/a",
            "/b",
        ]);
        assert!(cli.json);
        assert!(cli.verbose);
        assert_eq!(cli.log_file, Some(PathBuf::from("x.log")));
        assert_eq!(cli.dirs, vec![PathBuf::from("/a"), PathBuf::from("/b")]);
    }

    #[test]
    fn test_log_open_failure_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let bad = temp_dir.path().join("missing").join("organizer.log");
        let result = Session::new(
            ExtensionRules::default(),
            CompiledFilters::default(),
            bad,
            false,
        );
        assert!(matches!(result, Err(CliError::LogOpen { .. })));
    }

    #[test]
    fn test_prompt_loop_stops_on_empty_line() {
        let temp_dir = TempDir::new().unwrap();
        let work = temp_dir.path().join("work");
        fs::create_dir(&work).unwrap();
        fs::write(work.join("a.jpg"), "x").unwrap();
        let session = session(temp_dir.path().join("organizer.log"));

        let mut input = Cursor::new(format!("{}\n\n{}\n", work.display(), work.display()));
        let mut out = Vec::new();
        session.prompt_loop(&mut input, &mut out).unwrap();

        let text = String::from_utf8_lossy(&out);
        assert!(work.join("Images/a.jpg").is_file());
        assert_eq!(text.matches("Organizing").count(), 1);
        assert!(text.contains("Bye."));
    }

    #[test]
    fn test_prompt_loop_stops_on_eof_and_survives_bad_dir() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing");
        let session = session(temp_dir.path().join("organizer.log"));

        let mut input = Cursor::new(format!("{}\n", missing.display()));
        let mut out = Vec::new();
        session.prompt_loop(&mut input, &mut out).unwrap();

        let text = String::from_utf8_lossy(&out);
        assert!(text.contains("error reading source directory"));
        assert!(!text.contains("Files processed"));
        assert!(text.contains("Bye."));
    }

    #[test]
    fn test_batch_runs_are_isolated() {
        let temp_dir = TempDir::new().unwrap();
        let first = temp_dir.path().join("first");
        let second = temp_dir.path().join("second");
        fs::create_dir(&first).unwrap();
        fs::create_dir(&second).unwrap();
        fs::write(first.join("a.jpg"), "x").unwrap();
        fs::write(first.join("b.jpg"), "x").unwrap();
        fs::write(second.join("c.mp3"), "x").unwrap();
        let session = session(temp_dir.path().join("organizer.log"));

        let mut out = Vec::new();
        let one = session.run_once(&first, &mut out).unwrap().unwrap();
        let two = session.run_once(&second, &mut out).unwrap().unwrap();

        assert_eq!(one.processed_files(), 2);
        assert_eq!(two.processed_files(), 1);
        assert!(two.category("Images").is_none());
    }

    #[test]
    fn test_log_file_inside_source_dir_is_left_alone() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        let log_path = dir.join("organizer.txt");
        fs::write(dir.join("b.pdf"), "x").unwrap();
        let session = session(log_path.clone());

        let mut out = Vec::new();
        let summary = session.run_once(dir, &mut out).unwrap().unwrap();

        assert_eq!(summary.processed_files(), 1);
        assert!(log_path.is_file());
        let log = fs::read_to_string(&log_path).unwrap();
        assert!(log.contains("[SUCCESS] moved: "));
    }
}
