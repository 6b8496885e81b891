#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{
    ffi::OsStr,
    fs,
    path::{Path, PathBuf},
};

use walkdir::{DirEntry, WalkDir};

use crate::error::DocCheckError;

/// Suffix used when none is given on the command line.
pub const DEFAULT_SUFFIX: &str = ".java";

#[derive(Debug, Clone)]
/// Full contents of one file discovered under the root directory.
pub struct SourceFile {
    /// Where the file was read from.
    path:     PathBuf,
    /// Text of the file.
    contents: String,
}

impl SourceFile {
    /// Creates a source file from an already read path and text.
    pub fn new(path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        Self {
            path:     path.into(),
            contents: contents.into(),
        }
    }

    /// Path the contents were read from.
    pub fn path(&self) -> &Path {
        self.path.as_path()
    }

    /// Text of the file.
    pub fn contents(&self) -> &str {
        &self.contents
    }
}

/// Checks that `root` names an existing directory.
pub fn validate_root(root: &Path) -> Result<(), DocCheckError> {
    if !root.exists() {
        return Err(DocCheckError::Input(format!(
            "root directory `{}` does not exist",
            root.display()
        )));
    }
    if !root.is_dir() {
        return Err(DocCheckError::Input(format!(
            "root path `{}` is not a directory",
            root.display()
        )));
    }
    Ok(())
}

#[derive(Debug, Clone)]
/// Recursively finds files under a root whose names end with a suffix.
///
/// Entries are visited in file name order within each directory. Linked
/// directories are not descended into, but a symbolic link that does not
/// point at a directory is treated as a file and read through, so a dangling
/// link fails the run. Matching is an exact, case-sensitive suffix test on the
/// file name.
pub struct Collector {
    /// Directory the walk starts from.
    root:   PathBuf,
    /// Required file name suffix, for example `.java`.
    suffix: String,
}

impl Collector {
    /// Creates a collector for files under `root` ending in `suffix`.
    pub fn new(root: impl Into<PathBuf>, suffix: impl Into<String>) -> Self {
        Self {
            root:   root.into(),
            suffix: suffix.into(),
        }
    }

    /// Directory the walk starts from.
    pub fn root(&self) -> &Path {
        self.root.as_path()
    }

    /// Required file name suffix.
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Returns true if `name` ends with the configured suffix.
    fn matches(&self, name: &OsStr) -> bool {
        name.to_string_lossy().ends_with(self.suffix.as_str())
    }

    /// Returns true if `entry` is a matching regular file or a matching link
    /// to anything other than a directory.
    fn selects(&self, entry: &DirEntry) -> bool {
        let file_like = entry.file_type().is_file()
            || (entry.path_is_symlink() && !entry.path().is_dir());
        file_like && self.matches(entry.file_name())
    }

    /// Lazily yields the paths of matching files.
    ///
    /// A traversal failure is yielded in place and is expected to end the
    /// caller's iteration.
    pub fn paths(&self) -> impl Iterator<Item = Result<PathBuf, DocCheckError>> + '_ {
        WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_map(move |entry| match entry {
                Ok(entry) => self.selects(&entry).then(|| Ok(entry.into_path())),
                Err(err) => {
                    let path = err
                        .path()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| self.root.clone());
                    Some(Err(DocCheckError::Read {
                        path,
                        source: err.into(),
                    }))
                }
            })
    }

    /// Lazily yields the contents of matching files.
    ///
    /// Each file is read only when the iterator is advanced to it, so a
    /// consumer that stops on the first error never touches later files.
    pub fn files(&self) -> impl Iterator<Item = Result<SourceFile, DocCheckError>> + '_ {
        self.paths().map(|path| path.and_then(read_source))
    }

    /// Reads every matching file, stopping at the first failure.
    pub fn collect_all(&self) -> Result<Vec<SourceFile>, DocCheckError> {
        self.files().collect()
    }
}

/// Reads `path` as UTF-8 text.
fn read_source(path: PathBuf) -> Result<SourceFile, DocCheckError> {
    match fs::read_to_string(&path) {
        Ok(contents) => {
            tracing::debug!("Read {} ({} bytes)", path.display(), contents.len());
            Ok(SourceFile { path, contents })
        }
        Err(source) => Err(DocCheckError::Read { path, source }),
    }
}
