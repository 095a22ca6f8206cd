//! Prioritized base directories and the filesystem operations scoped to them.
//!
//! A [`BaseDir`] wraps an ordered list of candidate directories for one role
//! (configuration, data, cache, ...). Lookups walk the whole list because secondary
//! entries such as `/etc/xdg` or `/usr/share` are shared, often read-only locations
//! that may hold the sought resource; mutations only ever touch the first entry, the
//! per-user home directory, which is the only one presumed writable.

use std::fs::{self, File};
use std::io;
use std::path::{MAIN_SEPARATOR_STR, Path, PathBuf};

pub mod resolve;

/// Permission mode used when missing base directories are created on demand.
pub const DIR_MODE: u32 = 0o700;

/// An ordered list of base directories for one role, highest priority first.
///
/// The list is never empty: construction guarantees at least one entry, falling back
/// to the current working directory when the environment yields nothing. The first
/// entry is the role's home directory and the target of every mutating operation.
///
/// ```rust,no_run
/// # use dirstack::os::env::Env;
/// # use dirstack::platform::BaseDirs;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dirs = BaseDirs::resolve(&Env::new());
/// let file = dirs.config.open("myapp/settings.toml")?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct BaseDir {
    dirs: Vec<PathBuf>,
}

impl BaseDir {
    /// Build a base directory list from caller-supplied paths.
    ///
    /// Empty paths are skipped. If nothing remains, the current working directory
    /// (or `.` when it cannot be determined) becomes the only entry.
    pub fn from_paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut dirs = Vec::new();
        for path in paths {
            push_non_empty(&mut dirs, path.into());
        }
        Self::with_fallback(dirs)
    }

    fn with_fallback(mut dirs: Vec<PathBuf>) -> Self {
        if dirs.is_empty() {
            dirs.push(std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
        }
        Self { dirs }
    }

    /// The role's home directory: the highest-priority, writable entry.
    pub fn home(&self) -> &Path {
        &self.dirs[0]
    }

    /// Every candidate directory, highest priority first.
    pub fn paths(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Open `subpath` for reading, searching every base directory in priority order.
    ///
    /// # Returns
    /// The first file that opens. If no directory yields one, the error from the
    /// *first* directory tried.
    pub fn open(&self, subpath: impl AsRef<Path>) -> io::Result<File> {
        let subpath = subpath.as_ref();
        let mut first_err = None;
        for base in &self.dirs {
            match File::open(base.join(subpath)) {
                Ok(file) => return Ok(file),
                Err(err) => {
                    first_err.get_or_insert(err);
                }
            }
        }
        Err(first_err.unwrap_or_else(|| io::Error::from(io::ErrorKind::NotFound)))
    }

    /// Open `subpath` in every base directory it exists in.
    ///
    /// Every directory is attempted regardless of earlier failures. The error from
    /// the first directory is returned only when no file opened at all.
    pub fn open_all(&self, subpath: impl AsRef<Path>) -> io::Result<Vec<File>> {
        let subpath = subpath.as_ref();
        let mut files = Vec::new();
        let mut first_err = None;
        for base in &self.dirs {
            match File::open(base.join(subpath)) {
                Ok(file) => files.push(file),
                Err(err) => {
                    first_err.get_or_insert(err);
                }
            }
        }
        if files.is_empty() {
            if let Some(err) = first_err {
                return Err(err);
            }
        }
        Ok(files)
    }

    /// Create (or truncate) the file `subpath` under the home directory.
    ///
    /// Missing parent directories, the home directory included, are created with
    /// [`DIR_MODE`].
    pub fn create(&self, subpath: impl AsRef<Path>) -> io::Result<File> {
        let path = self.home().join(subpath);
        if let Some(parent) = path.parent() {
            make_dirs(parent, DIR_MODE, true)?;
        }
        File::create(path)
    }

    /// Create the directory `subpath` under the home directory, without parents.
    ///
    /// The home directory itself is created with [`DIR_MODE`] if missing; `subpath`
    /// is created with `mode` (ignored on non-unix targets). Fails if the directory
    /// already exists or an intermediate component of `subpath` is missing.
    pub fn mkdir(&self, subpath: impl AsRef<Path>, mode: u32) -> io::Result<()> {
        make_dirs(self.home(), DIR_MODE, true)?;
        make_dirs(&self.home().join(subpath), mode, false)
    }

    /// Create the directory `subpath` under the home directory, along with any
    /// missing parents.
    ///
    /// The home directory itself is created with [`DIR_MODE`] if missing; every
    /// component of `subpath` is created with `mode` (ignored on non-unix targets).
    /// Pre-existing directories are not an error.
    pub fn mkdir_all(&self, subpath: impl AsRef<Path>, mode: u32) -> io::Result<()> {
        make_dirs(self.home(), DIR_MODE, true)?;
        make_dirs(&self.home().join(subpath), mode, true)
    }

    /// Remove the file or empty directory `subpath` under the home directory.
    pub fn remove(&self, subpath: impl AsRef<Path>) -> io::Result<()> {
        let path = self.home().join(subpath);
        if fs::symlink_metadata(&path)?.is_dir() {
            fs::remove_dir(path)
        } else {
            fs::remove_file(path)
        }
    }

    /// Remove `subpath` under the home directory and all its contents.
    ///
    /// A missing path is not an error.
    pub fn remove_all(&self, subpath: impl AsRef<Path>) -> io::Result<()> {
        let path = self.home().join(subpath);
        match fs::symlink_metadata(&path) {
            Ok(meta) if meta.is_dir() => fs::remove_dir_all(path),
            Ok(_) => fs::remove_file(path),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err),
        }
    }

    /// Resolve `subpath` to the first base directory where it exists as a directory.
    ///
    /// # Returns
    /// The absolute path, always terminated with a path separator. An entry that
    /// exists but is not a directory counts as a failure for that base, reported as
    /// [`io::ErrorKind::NotADirectory`]. On total failure the error from the first
    /// base is returned.
    pub fn resolve_dir(&self, subpath: impl AsRef<Path>) -> io::Result<PathBuf> {
        let subpath = subpath.as_ref();
        let mut first_err = None;
        for base in &self.dirs {
            let candidate = base.join(subpath);
            match fs::metadata(&candidate) {
                Ok(meta) if meta.is_dir() => return Ok(with_trailing_sep(candidate)),
                Ok(_) => {
                    let err = io::Error::new(
                        io::ErrorKind::NotADirectory,
                        format!("{}: not a directory", candidate.display()),
                    );
                    first_err.get_or_insert(err);
                }
                Err(err) => {
                    first_err.get_or_insert(err);
                }
            }
        }
        Err(first_err.unwrap_or_else(|| io::Error::from(io::ErrorKind::NotFound)))
    }

    /// Resolve `subpath` like [`resolve_dir`](Self::resolve_dir), creating it under
    /// the home directory when it exists nowhere.
    ///
    /// Creation goes through [`mkdir_all`](Self::mkdir_all) with `mode`; the returned
    /// path is separator-terminated either way.
    pub fn ensure_dir(&self, subpath: impl AsRef<Path>, mode: u32) -> io::Result<PathBuf> {
        let subpath = subpath.as_ref();
        match self.resolve_dir(subpath) {
            Ok(path) => Ok(path),
            Err(_) => {
                self.mkdir_all(subpath, mode)?;
                Ok(with_trailing_sep(self.home().join(subpath)))
            }
        }
    }
}

fn push_non_empty(dirs: &mut Vec<PathBuf>, path: PathBuf) {
    if !path.as_os_str().is_empty() {
        dirs.push(path);
    }
}

fn make_dirs(path: &Path, mode: u32, recursive: bool) -> io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(recursive);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;
    builder.create(path)
}

fn with_trailing_sep(path: PathBuf) -> PathBuf {
    let mut raw = path.into_os_string();
    // Candidate paths always have at least a base component at this point.
    assert!(!raw.is_empty(), "empty path in separator normalization");
    let ends_with_sep = raw
        .as_encoded_bytes()
        .last()
        .is_some_and(|&byte| byte.is_ascii() && std::path::is_separator(byte as char));
    if !ends_with_sep {
        raw.push(MAIN_SEPARATOR_STR);
    }
    PathBuf::from(raw)
}
