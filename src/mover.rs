/// Moving files into category subdirectories.
///
/// The mover creates `<source_dir>/<category>` on demand and renames the file
/// into it. When a file with the same name already sits at the destination,
/// the incoming file gets a timestamp inserted before its extension so nothing
/// is ever overwritten.
use crate::error::{MoveError, MoveResult};
use chrono::{DateTime, Local};
use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Format of the timestamp inserted into colliding file names.
const COLLISION_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Describes a completed move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovedFile {
    /// Where the file was before the move.
    pub original_path: PathBuf,
    /// Where the file ended up.
    pub new_path: PathBuf,
    /// The category folder it was moved into.
    pub category: String,
    /// True if the name had to be disambiguated.
    pub renamed: bool,
}

/// Moves files into category directories beneath a source directory.
pub struct Mover;

impl Mover {
    /// Moves `file_path` into `<source_dir>/<category>`.
    ///
    /// The category directory (and any missing parents) is created if needed.
    /// Name collisions are resolved with the current local time.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use filesorter::mover::Mover;
    /// use std::path::Path;
    ///
    /// let moved = Mover::move_to_category(
    ///     Path::new("/path/to/downloads"),
    ///     Path::new("/path/to/downloads/photo.png"),
    ///     "Images",
    /// );
    ///
    /// match moved {
    ///     Ok(m) => println!("moved to {}", m.new_path.display()),
    ///     Err(e) => eprintln!("move failed: {}", e),
    /// }
    /// ```
    pub fn move_to_category(
        source_dir: &Path,
        file_path: &Path,
        category: &str,
    ) -> MoveResult<MovedFile> {
        Self::move_to_category_at(source_dir, file_path, category, Local::now())
    }

    /// Same as [`Mover::move_to_category`] but with an explicit clock reading
    /// for collision timestamps.
    pub fn move_to_category_at(
        source_dir: &Path,
        file_path: &Path,
        category: &str,
        now: DateTime<Local>,
    ) -> MoveResult<MovedFile> {
        let category_path = source_dir.join(category);

        fs::create_dir_all(&category_path).map_err(|e| MoveError::DirectoryCreationFailed {
            path: category_path.clone(),
            source: e,
        })?;

        let file_name = file_path
            .file_name()
            .ok_or_else(|| MoveError::NoFileName {
                path: file_path.to_path_buf(),
            })?;

        let direct = category_path.join(file_name);
        let (destination, renamed) = if is_occupied(&direct) {
            let free = free_destination(&category_path, file_name, now);
            debug!(
                from = %file_path.display(),
                to = %free.display(),
                "destination taken, disambiguating"
            );
            (free, true)
        } else {
            (direct, false)
        };

        fs::rename(file_path, &destination).map_err(|e| MoveError::RenameFailed {
            from: file_path.to_path_buf(),
            to: destination.clone(),
            source: e,
        })?;

        Ok(MovedFile {
            original_path: file_path.to_path_buf(),
            new_path: destination,
            category: category.to_string(),
            renamed,
        })
    }
}

/// Builds `<stem>_<timestamp>.<ext>`, keeping the name's raw bytes.
///
/// ```
/// use chrono::{Local, TimeZone};
/// use filesorter::mover::timestamped_name;
/// use std::ffi::{OsStr, OsString};
///
/// let now = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).single().unwrap();
/// assert_eq!(
///     timestamped_name(OsStr::new("report.txt"), now),
///     OsString::from("report_20240309_140507.txt")
/// );
/// assert_eq!(
///     timestamped_name(OsStr::new("LICENSE"), now),
///     OsString::from("LICENSE_20240309_140507")
/// );
/// ```
pub fn timestamped_name(file_name: &OsStr, now: DateTime<Local>) -> OsString {
    let suffix = format!("_{}", now.format(COLLISION_TIMESTAMP_FORMAT));
    suffixed_name(file_name, &suffix)
}

/// Inserts `suffix` between the stem and the extension of `file_name`.
///
/// Dotfiles such as `.bashrc` have no extension here, so the suffix goes
/// at the end.
fn suffixed_name(file_name: &OsStr, suffix: &str) -> OsString {
    let as_path = Path::new(file_name);
    let mut name = as_path.file_stem().unwrap_or(file_name).to_os_string();
    name.push(suffix);
    if let Some(ext) = as_path.extension() {
        name.push(".");
        name.push(ext);
    }
    name
}

/// True if anything sits at `path`, including a dangling symlink.
fn is_occupied(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Finds a name in `dir` that is not taken yet, starting from the
/// timestamped variant and then appending `_1`, `_2`, ... to its stem.
fn free_destination(dir: &Path, file_name: &OsStr, now: DateTime<Local>) -> PathBuf {
    let stamp = format!("_{}", now.format(COLLISION_TIMESTAMP_FORMAT));
    let candidate = dir.join(suffixed_name(file_name, &stamp));
    if !is_occupied(&candidate) {
        return candidate;
    }

    let mut counter: u32 = 1;
    loop {
        let path = dir.join(suffixed_name(file_name, &format!("{}_{}", stamp, counter)));
        if !is_occupied(&path) {
            return path;
        }
        counter += 1;
    }
}
