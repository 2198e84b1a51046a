//! Rotating log file writer with size-based rotation and backup retention.
//!
//! The menu owns stdout, so log output goes to a file instead. This writer
//! rotates that file once it passes a size threshold and keeps a fixed number
//! of backups.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing_subscriber::fmt::MakeWriter;

/// Default size before rotation (10 MB).
const MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// Number of backup files to retain after rotation.
const MAX_BACKUP_FILES: usize = 3;

/// Thread-safe rotating file writer.
///
/// Plugs into `tracing_subscriber::fmt` as a [`MakeWriter`]. Before each
/// write the file size is checked; past the threshold the file is renamed to
/// `<name>.log.<unix_timestamp>` and a fresh file is opened. Backups beyond
/// the retention limit are removed, oldest first.
pub struct FileWriter {
    file_path: PathBuf,
    max_bytes: u64,
    /// Opened lazily on the first write.
    writer: Mutex<Option<File>>,
}

impl FileWriter {
    pub const fn new(file_path: PathBuf) -> Self {
        Self {
            file_path,
            max_bytes: MAX_FILE_SIZE_BYTES,
            writer: Mutex::new(None),
        }
    }

    /// Overrides the rotation threshold.
    #[must_use]
    pub const fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn lock(&self) -> io::Result<MutexGuard<'_, Option<File>>> {
        self.writer
            .lock()
            .map_err(|e| io::Error::other(format!("Mutex poisoned: {e}")))
    }

    fn write_locked(&self, buf: &[u8]) -> io::Result<usize> {
        let mut writer = self.lock()?;

        self.check_and_rotate(&mut writer)?;

        if writer.is_none() {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.file_path)?;
            *writer = Some(file);
        }

        let file = writer
            .as_mut()
            .ok_or_else(|| io::Error::other("No file available"))?;
        file.write_all(buf)?;
        file.flush()?;
        drop(writer);

        Ok(buf.len())
    }

    /// Drops the handle and rotates if the current file is over the limit.
    fn check_and_rotate(&self, writer: &mut Option<File>) -> io::Result<()> {
        if let Ok(metadata) = fs::metadata(&self.file_path) {
            if metadata.len() > self.max_bytes {
                *writer = None;
                self.rotate_files()?;
            }
        }
        Ok(())
    }

    fn rotate_files(&self) -> io::Result<()> {
        let timestamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|elapsed| elapsed.as_nanos())
            .unwrap_or(0);

        let backup_path = self.file_path.with_extension(format!("log.{timestamp}"));

        if self.file_path.exists() {
            fs::rename(&self.file_path, &backup_path)?;
        }

        self.cleanup_old_backups()
    }

    /// Removes backups beyond the retention limit, newest kept.
    ///
    /// Individual deletion errors are ignored.
    fn cleanup_old_backups(&self) -> io::Result<()> {
        let parent_dir = self
            .file_path
            .parent()
            .ok_or_else(|| io::Error::other("No parent directory"))?;

        let file_stem = self
            .file_path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| io::Error::other("Invalid file name"))?;

        let mut backups: Vec<PathBuf> = fs::read_dir(parent_dir)?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.starts_with(file_stem) && name.contains(".log."))
            })
            .collect();

        // Timestamp suffixes sort chronologically within a second; names break ties.
        backups.sort_by(|a, b| {
            let a_time = fs::metadata(a).and_then(|m| m.modified()).ok();
            let b_time = fs::metadata(b).and_then(|m| m.modified()).ok();
            b_time.cmp(&a_time).then_with(|| b.cmp(a))
        });

        for old_backup in backups.iter().skip(MAX_BACKUP_FILES) {
            let _ = fs::remove_file(old_backup);
        }

        Ok(())
    }
}

impl Write for &FileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_locked(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut writer = self.lock()?;
        writer.as_mut().map_or(Ok(()), |file| file.flush())
    }
}

impl<'a> MakeWriter<'a> for FileWriter {
    type Writer = &'a FileWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self
    }
}

impl std::fmt::Debug for FileWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileWriter")
            .field("file_path", &self.file_path)
            .field("max_bytes", &self.max_bytes)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backups(dir: &Path) -> usize {
        fs::read_dir(dir)
            .unwrap()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_name().to_string_lossy().contains(".log."))
            .count()
    }

    #[test]
    fn appends_to_the_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let writer = FileWriter::new(dir.path().join("menu.log"));

        (&writer).write_all(b"first\n").unwrap();
        (&writer).write_all(b"second\n").unwrap();

        let contents = fs::read_to_string(writer.path()).unwrap();
        assert_eq!(contents, "first\nsecond\n");
    }

    #[test]
    fn rotates_past_the_threshold() {
        let dir = tempfile::tempdir().unwrap();
        let writer = FileWriter::new(dir.path().join("menu.log")).with_max_bytes(8);

        (&writer).write_all(b"0123456789\n").unwrap();
        (&writer).write_all(b"fresh\n").unwrap();

        assert_eq!(fs::read_to_string(writer.path()).unwrap(), "fresh\n");
        assert_eq!(backups(dir.path()), 1);
    }

    #[test]
    fn keeps_a_bounded_number_of_backups() {
        let dir = tempfile::tempdir().unwrap();
        let writer = FileWriter::new(dir.path().join("menu.log")).with_max_bytes(1);

        for _ in 0..8 {
            (&writer).write_all(b"line\n").unwrap();
        }

        assert!(backups(dir.path()) <= MAX_BACKUP_FILES);
    }
}
