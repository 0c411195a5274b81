//! Atomic registry writes.
//!
//! The registry is written to a hidden sibling file first and renamed over
//! the target, so a reader never observes a half-written registry.

use std::io::{self, Write};
use std::process;
use std::sync::atomic::{AtomicU64, Ordering};

use camino::{Utf8Component, Utf8Path};
use cap_std::fs::{Dir, OpenOptions};

use crate::error::RegistryError;

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Writes `contents` to `path` (a bare file name within `dir`) atomically.
///
/// # Errors
///
/// Returns [`RegistryError::WriteError`] if `path` is not a bare file name or
/// the temp file cannot be written or renamed.
pub(crate) fn write_atomic(
    dir: &Dir,
    path: &Utf8Path,
    contents: &str,
) -> Result<(), RegistryError> {
    let write_error = |message: String| RegistryError::WriteError {
        path: path.to_path_buf(),
        message,
    };

    let mut components = path.components();
    let (Some(Utf8Component::Normal(file_name)), None) = (components.next(), components.next())
    else {
        return Err(write_error("registry path must be a bare file name".to_owned()));
    };

    let temp = PendingFile::create(dir, file_name).map_err(|err| write_error(err.to_string()))?;
    temp.fill(contents)
        .and_then(|pending| pending.commit(file_name))
        .map_err(|err| write_error(err.to_string()))?;

    // Directory sync is best effort; some filesystems refuse it.
    if let Ok(handle) = dir.open(".") {
        drop(handle.sync_all());
    }
    Ok(())
}

/// A temp file that is removed on drop unless it has been committed.
struct PendingFile<'dir> {
    dir: &'dir Dir,
    name: String,
    file: Option<cap_std::fs::File>,
}

impl<'dir> PendingFile<'dir> {
    fn create(dir: &'dir Dir, target_name: &str) -> io::Result<Self> {
        let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        let name = format!(".{target_name}.tmp.{}.{counter}", process::id());
        let mut options = OpenOptions::new();
        options.write(true).create_new(true);
        let file = dir.open_with(&name, &options)?;
        Ok(Self {
            dir,
            name,
            file: Some(file),
        })
    }

    fn fill(mut self, contents: &str) -> io::Result<Self> {
        if let Some(file) = self.file.as_mut() {
            file.write_all(contents.as_bytes())?;
            file.sync_all()?;
        }
        Ok(self)
    }

    fn commit(mut self, target_name: &str) -> io::Result<()> {
        drop(self.file.take());
        replace_target(self.dir, &self.name, target_name)?;
        self.name.clear();
        Ok(())
    }
}

impl Drop for PendingFile<'_> {
    fn drop(&mut self) {
        drop(self.file.take());
        if !self.name.is_empty() {
            drop(self.dir.remove_file(&self.name));
        }
    }
}

#[cfg(windows)]
fn replace_target(dir: &Dir, temp_name: &str, target_name: &str) -> io::Result<()> {
    // Windows rename fails if the target exists.
    match dir.remove_file(target_name) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(err),
    }
    dir.rename(temp_name, dir, target_name)
}

#[cfg(not(windows))]
fn replace_target(dir: &Dir, temp_name: &str, target_name: &str) -> io::Result<()> {
    dir.rename(temp_name, dir, target_name)
}
