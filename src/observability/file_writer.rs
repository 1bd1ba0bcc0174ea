//! Append-only line file with size-based rotation.
//!
//! When appending a line would push the active file past the size limit, the
//! file is rotated first: `trace.json` becomes `trace.json.1`, an existing
//! `trace.json.1` becomes `trace.json.2`, and so on. Only the configured number
//! of backups is kept; the oldest one is deleted.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// When to rotate and how many old files to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationPolicy {
    pub max_bytes: u64,
    pub backups: usize,
}

impl Default for RotationPolicy {
    /// 10 MB per file, 3 backups.
    fn default() -> Self {
        Self {
            max_bytes: 10 * 1024 * 1024,
            backups: 3,
        }
    }
}

struct Active {
    file: File,
    len: u64,
}

/// A line-oriented writer that rotates its file by size.
///
/// The file is opened lazily on the first write. Access is serialized through
/// an internal mutex so one writer can be shared between threads.
pub struct RotatingFile {
    path: PathBuf,
    policy: RotationPolicy,
    active: Mutex<Option<Active>>,
}

impl RotatingFile {
    #[must_use]
    pub const fn new(path: PathBuf, policy: RotationPolicy) -> Self {
        Self {
            path,
            policy,
            active: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the `n`th backup (1 = newest).
    #[must_use]
    pub fn backup_path(&self, n: usize) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(format!(".{n}"));
        PathBuf::from(name)
    }

    /// Appends `line` and a newline, rotating first if the file would grow
    /// past the limit.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if rotating, opening or writing fails, or if the
    /// lock was poisoned by a panicking writer.
    pub fn write_line(&self, line: &str) -> io::Result<()> {
        let mut active = self
            .active
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "trace writer lock poisoned"))?;

        let incoming = line.len() as u64 + 1;
        if active.is_none() {
            *active = Some(self.open()?);
        }
        if let Some(current) = active.as_ref() {
            if current.len > 0 && current.len + incoming > self.policy.max_bytes {
                *active = None;
                self.rotate()?;
                *active = Some(self.open()?);
            }
        }

        let current = active
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "trace file unavailable"))?;
        writeln!(current.file, "{line}")?;
        current.file.flush()?;
        current.len += incoming;
        Ok(())
    }

    fn open(&self) -> io::Result<Active> {
        let file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        let len = file.metadata()?.len();
        Ok(Active { file, len })
    }

    fn rotate(&self) -> io::Result<()> {
        if self.policy.backups == 0 {
            return fs::remove_file(&self.path);
        }

        let oldest = self.backup_path(self.policy.backups);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }
        for n in (1..self.policy.backups).rev() {
            let from = self.backup_path(n);
            if from.exists() {
                fs::rename(&from, self.backup_path(n + 1))?;
            }
        }
        fs::rename(&self.path, self.backup_path(1))
    }
}

impl std::fmt::Debug for RotatingFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RotatingFile")
            .field("path", &self.path)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(path: &Path) -> Vec<String> {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(String::from)
            .collect()
    }

    #[test]
    fn appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let writer = RotatingFile::new(dir.path().join("trace.json"), RotationPolicy::default());

        writer.write_line("{\"a\":1}").unwrap();
        writer.write_line("{\"b\":2}").unwrap();
        assert_eq!(lines(writer.path()), ["{\"a\":1}", "{\"b\":2}"]);
    }

    #[test]
    fn rotates_and_keeps_limited_backups() {
        let dir = tempfile::tempdir().unwrap();
        let policy = RotationPolicy { max_bytes: 8, backups: 2 };
        let writer = RotatingFile::new(dir.path().join("trace.json"), policy);

        for line in ["first", "second", "third", "fourth"] {
            writer.write_line(line).unwrap();
        }

        assert_eq!(lines(writer.path()), ["fourth"]);
        assert_eq!(lines(&writer.backup_path(1)), ["third"]);
        assert_eq!(lines(&writer.backup_path(2)), ["second"]);
        assert!(!writer.backup_path(3).exists());
    }

    #[test]
    fn oversized_line_goes_into_an_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let policy = RotationPolicy { max_bytes: 4, backups: 1 };
        let writer = RotatingFile::new(dir.path().join("trace.json"), policy);

        writer.write_line("much too long").unwrap();
        assert_eq!(lines(writer.path()), ["much too long"]);
        assert!(!writer.backup_path(1).exists());
    }

    #[test]
    fn continues_an_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trace.json");
        fs::write(&path, "old\n").unwrap();

        let writer = RotatingFile::new(path, RotationPolicy { max_bytes: 6, backups: 1 });
        writer.write_line("new").unwrap();

        assert_eq!(lines(writer.path()), ["new"]);
        assert_eq!(lines(&writer.backup_path(1)), ["old"]);
    }
}
