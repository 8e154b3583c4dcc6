use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::constants::output::SOURCE_EXTENSION;
use crate::error::SinkError;
use crate::render::ImageFormat;

/// Destination for rendered artifacts.
///
/// Existing files are overwritten.
pub trait OutputSink {
    fn create_dir_all(&self, dir: &Path) -> Result<(), SinkError>;

    fn write(&self, path: &Path, contents: &[u8]) -> Result<(), SinkError>;
}

/// Writes artifacts to the real filesystem
#[derive(Debug, Default, Clone, Copy)]
pub struct FsSink;

impl OutputSink for FsSink {
    fn create_dir_all(&self, dir: &Path) -> Result<(), SinkError> {
        fs::create_dir_all(dir).map_err(|source| SinkError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<(), SinkError> {
        fs::write(path, contents).map_err(|source| SinkError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Keeps artifacts in memory.
///
/// Mirrors the filesystem closely enough for tests: a file can only be
/// written once its directory was created.
#[derive(Debug, Default)]
pub struct MemorySink {
    dirs: RefCell<BTreeSet<PathBuf>>,
    files: RefCell<BTreeMap<PathBuf, Vec<u8>>>,
    read_only: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink on which every directory creation fails with permission denied
    pub fn read_only() -> Self {
        Self {
            read_only: true,
            ..Self::default()
        }
    }

    pub fn contents(&self, path: &Path) -> Option<Vec<u8>> {
        self.files.borrow().get(path).cloned()
    }

    pub fn contents_string(&self, path: &Path) -> Option<String> {
        self.contents(path)
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.borrow().keys().cloned().collect()
    }

    pub fn has_dir(&self, dir: &Path) -> bool {
        self.dirs.borrow().contains(dir)
    }
}

impl OutputSink for MemorySink {
    fn create_dir_all(&self, dir: &Path) -> Result<(), SinkError> {
        if self.read_only {
            return Err(SinkError::CreateDir {
                path: dir.to_path_buf(),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "read-only sink"),
            });
        }

        let mut dirs = self.dirs.borrow_mut();
        for ancestor in dir.ancestors() {
            if !ancestor.as_os_str().is_empty() {
                dirs.insert(ancestor.to_path_buf());
            }
        }
        Ok(())
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<(), SinkError> {
        let parent = path.parent().unwrap_or_else(|| Path::new(""));
        if !parent.as_os_str().is_empty() && !self.dirs.borrow().contains(parent) {
            return Err(SinkError::Write {
                path: path.to_path_buf(),
                source: io::Error::new(io::ErrorKind::NotFound, "directory does not exist"),
            });
        }

        self.files
            .borrow_mut()
            .insert(path.to_path_buf(), contents.to_vec());
        Ok(())
    }
}

/// Output directory and the naming rule for artifacts inside it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLocation {
    dir: PathBuf,
}

impl OutputLocation {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `<dir>/<name>.<format>`
    pub fn image_path(&self, name: &str, format: ImageFormat) -> Result<PathBuf, SinkError> {
        self.artifact_path(name, format.as_str())
    }

    /// `<dir>/<name>.source`
    pub fn source_path(&self, name: &str) -> Result<PathBuf, SinkError> {
        self.artifact_path(name, SOURCE_EXTENSION)
    }

    fn artifact_path(&self, name: &str, extension: &str) -> Result<PathBuf, SinkError> {
        validate_name(name)?;
        Ok(self.dir.join(format!("{name}.{extension}")))
    }
}

fn validate_name(name: &str) -> Result<(), SinkError> {
    let invalid = |reason| SinkError::InvalidName {
        name: name.to_string(),
        reason,
    };

    if name.trim().is_empty() {
        return Err(invalid("names cannot be empty"));
    }
    if name.contains(['/', '\\']) {
        return Err(invalid("names cannot contain path separators"));
    }
    if Path::new(name)
        .components()
        .any(|component| !matches!(component, Component::Normal(_)))
    {
        return Err(invalid("names cannot be relative path components"));
    }
    Ok(())
}
