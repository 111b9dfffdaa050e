// SPDX-License-Identifier: MIT OR Apache-2.0

//! An append-only file that survives being deleted or rotated away.
//!
//! Before each write the path is stat'ed and compared against the handle that is
//! currently open. If the file is gone, or the path now names a different file,
//! the old handle is dropped and the path is opened again (creating it). Without
//! this check, writes after an external `rm` or `mv` would land in an unlinked
//! inode and never be seen.

use std::fs::{self, File, Metadata, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::error::SinkError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FileIdentity {
    #[cfg(unix)]
    dev: u64,
    #[cfg(unix)]
    ino: u64,
}

impl FileIdentity {
    #[cfg(unix)]
    fn of(metadata: &Metadata) -> Self {
        use std::os::unix::fs::MetadataExt;
        FileIdentity {
            dev: metadata.dev(),
            ino: metadata.ino(),
        }
    }

    #[cfg(not(unix))]
    fn of(_metadata: &Metadata) -> Self {
        FileIdentity {}
    }
}

#[derive(Debug)]
struct OpenFile {
    file: File,
    identity: FileIdentity,
}

/// A log file opened for appending, reopened whenever it disappears.
#[derive(Debug)]
pub struct WatchedFile {
    path: PathBuf,
    open: Mutex<Option<OpenFile>>,
}

impl WatchedFile {
    /// Opens `path` for appending, creating it and its parent directory if needed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SinkError> {
        let path = path.into();
        let file = Self::open_path(&path)?;
        Ok(Self {
            path,
            open: Mutex::new(Some(file)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open_path(path: &Path) -> Result<OpenFile, SinkError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| SinkError::io(path, e))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| SinkError::io(path, e))?;
        let identity = FileIdentity::of(&file.metadata().map_err(|e| SinkError::io(path, e))?);
        Ok(OpenFile { file, identity })
    }

    /// Whether the open handle still refers to the file at `path`.
    fn still_current(&self, open: &OpenFile) -> bool {
        match fs::metadata(&self.path) {
            Ok(metadata) => FileIdentity::of(&metadata) == open.identity,
            Err(_) => false,
        }
    }

    /**
    Appends `line` followed by a newline.

    The whole line goes out in one `write_all` while the lock is held, so
    concurrent writers never interleave within a line.
    */
    pub fn write_line(&self, line: &str) -> Result<(), SinkError> {
        let mut buf = String::with_capacity(line.len() + 1);
        buf.push_str(line);
        buf.push('\n');

        let mut open = self.open.lock();
        // a failed reopen leaves `None` behind, so the next write tries again
        let current = match open.take() {
            Some(file) if self.still_current(&file) => open.insert(file),
            _ => open.insert(Self::open_path(&self.path)?),
        };
        current
            .file
            .write_all(buf.as_bytes())
            .and_then(|_| current.file.flush())
            .map_err(|e| SinkError::io(&self.path, e))
    }

    pub fn flush(&self) {
        if let Some(open) = self.open.lock().as_mut() {
            let _ = open.file.flush();
        }
    }
}
