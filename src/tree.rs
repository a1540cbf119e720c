//! The output tree: the only place the build deletes or writes files.
//!
//! [`OutputTree::prepare`] wipes and recreates the output directory. After
//! that, [`OutputTree::write`] and [`OutputTree::copy_file`] only accept plain
//! file names and always land directly inside the output directory.
//!
//! There is no rollback. If a build fails after `prepare`, the output
//! directory is left incomplete until the next successful build.

use crate::config::is_plain_file_name;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TreeError {
    #[error("cannot remove output directory {path}: {source}")]
    Remove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot create output directory {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot copy {from} to {to}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("output path exists and is not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("refusing to write {0:?}: not a plain file name")]
    InvalidFileName(String),
}

/// What [`OutputTree::prepare`] did, for progress reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prepared {
    /// An output directory from a previous run was deleted first.
    pub removed_previous: bool,
}

/// A freshly prepared output directory.
#[derive(Debug)]
pub struct OutputTree {
    dir: PathBuf,
}

impl OutputTree {
    /// Delete `dir` if it is a directory, then create it empty.
    ///
    /// A non-directory at `dir` is an error and is left in place.
    pub fn prepare(dir: &Path) -> Result<(Self, Prepared), TreeError> {
        let mut removed_previous = false;
        match fs::symlink_metadata(dir) {
            Ok(meta) if meta.is_dir() => {
                fs::remove_dir_all(dir).map_err(|source| TreeError::Remove {
                    path: dir.to_path_buf(),
                    source,
                })?;
                removed_previous = true;
            }
            Ok(_) => return Err(TreeError::NotADirectory(dir.to_path_buf())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(source) => {
                return Err(TreeError::Remove {
                    path: dir.to_path_buf(),
                    source,
                });
            }
        }

        fs::create_dir_all(dir).map_err(|source| TreeError::Create {
            path: dir.to_path_buf(),
            source,
        })?;

        Ok((
            Self {
                dir: dir.to_path_buf(),
            },
            Prepared { removed_previous },
        ))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn target(&self, file_name: &str) -> Result<PathBuf, TreeError> {
        if !is_plain_file_name(file_name) {
            return Err(TreeError::InvalidFileName(file_name.to_string()));
        }
        Ok(self.dir.join(file_name))
    }

    /// Write `contents` to `<output>/<file_name>`, replacing any existing file.
    pub fn write(&self, file_name: &str, contents: &str) -> Result<PathBuf, TreeError> {
        let path = self.target(file_name)?;
        fs::write(&path, contents).map_err(|source| TreeError::Write {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }

    /// Copy `source` byte-for-byte into the output root under its own name.
    pub fn copy_file(&self, source: &Path) -> Result<PathBuf, TreeError> {
        let file_name = source
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let path = self.target(&file_name)?;
        fs::copy(source, &path).map_err(|e| TreeError::Copy {
            from: source.to_path_buf(),
            to: path.clone(),
            source: e,
        })?;
        Ok(path)
    }
}
