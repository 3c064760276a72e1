use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::subscriber::DefaultGuard;
use tracing_subscriber::{fmt, fmt::MakeWriter, layer::SubscriberExt, EnvFilter};

pub static LOG_FILE_NAME: &str = "app.log";
pub static MAX_LOG_BYTES: u64 = 1024 * 1024;
pub static MAX_ARCHIVES: usize = 10;

// Rolling file
//------------------------------------------------------------------------------

/// Append-only log file capped at `max_bytes`. When a write would cross the cap the file
/// is moved to `<path>.1`, existing archives shift up by one and anything past
/// `max_archives` is deleted.
#[derive(Debug)]
pub struct RollingFile {
    path: PathBuf,
    file: File,
    size: u64,
    max_bytes: u64,
    max_archives: usize,
}

impl RollingFile {
    pub fn open(path: impl Into<PathBuf>, max_bytes: u64, max_archives: usize) -> io::Result<Self> {
        let path = path.into();
        let file = open_append(&path)?;
        let size = file.metadata()?.len();
        Ok(Self { path, file, size, max_bytes, max_archives })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn archive_path(&self, n: usize) -> PathBuf {
        let mut path = OsString::from(self.path.as_os_str());
        path.push(format!(".{n}"));
        PathBuf::from(path)
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;

        if self.max_archives == 0 {
            self.file = File::create(&self.path)?;
            self.size = 0;
            return Ok(());
        }

        let oldest = self.archive_path(self.max_archives);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }
        for n in (1..self.max_archives).rev() {
            let from = self.archive_path(n);
            if from.exists() {
                fs::rename(&from, self.archive_path(n + 1))?;
            }
        }
        fs::rename(&self.path, self.archive_path(1))?;

        self.file = open_append(&self.path)?;
        self.size = 0;
        Ok(())
    }
}

impl Write for RollingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.size > 0 && self.size + buf.len() as u64 > self.max_bytes {
            self.rotate()?;
        }
        let n = self.file.write(buf)?;
        self.size += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

#[cfg(test)]
mod rolling_file_tests {
    use std::fs;
    use std::io::Write;
    use std::path::PathBuf;

    use super::RollingFile;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("urlqr-log-{}-{name}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_appends_below_cap() {
        let dir = temp_dir("append");
        let path = dir.join("app.log");
        fs::write(&path, "old\n").unwrap();

        let mut file = RollingFile::open(&path, 64, 3).unwrap();
        file.write_all(b"new\n").unwrap();
        file.flush().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "old\nnew\n");
        assert!(!file.archive_path(1).exists());
    }

    #[test]
    fn test_rotates_at_cap() {
        let dir = temp_dir("rotate");
        let mut file = RollingFile::open(dir.join("app.log"), 10, 3).unwrap();
        file.write_all(b"first-\n").unwrap();
        file.write_all(b"second\n").unwrap();
        file.flush().unwrap();

        assert_eq!(fs::read_to_string(file.path()).unwrap(), "second\n");
        assert_eq!(fs::read_to_string(file.archive_path(1)).unwrap(), "first-\n");
        assert_eq!(file.archive_path(2), dir.join("app.log.2"));
    }

    #[test]
    fn test_keeps_max_archives() {
        let dir = temp_dir("retain");
        let mut file = RollingFile::open(dir.join("app.log"), 4, 3).unwrap();
        for i in 0..6 {
            file.write_all(format!("{i}{i}{i}\n").as_bytes()).unwrap();
        }
        file.flush().unwrap();

        assert_eq!(fs::read_to_string(file.path()).unwrap(), "555\n");
        assert_eq!(fs::read_to_string(file.archive_path(1)).unwrap(), "444\n");
        assert_eq!(fs::read_to_string(file.archive_path(3)).unwrap(), "222\n");
        assert!(!file.archive_path(4).exists());
        assert_eq!(fs::read_dir(&dir).unwrap().count(), 4);
    }

    #[test]
    fn test_oversized_record_goes_to_empty_file() {
        let dir = temp_dir("oversized");
        let mut file = RollingFile::open(dir.join("app.log"), 4, 2).unwrap();
        file.write_all(b"a record longer than the cap\n").unwrap();
        file.flush().unwrap();

        assert_eq!(fs::read_to_string(file.path()).unwrap(), "a record longer than the cap\n");
        assert!(!file.archive_path(1).exists());
    }

    #[test]
    fn test_no_archives() {
        let dir = temp_dir("truncate");
        let mut file = RollingFile::open(dir.join("app.log"), 4, 0).unwrap();
        file.write_all(b"one\n").unwrap();
        file.write_all(b"two\n").unwrap();
        file.flush().unwrap();

        assert_eq!(fs::read_to_string(file.path()).unwrap(), "two\n");
        assert_eq!(fs::read_dir(&dir).unwrap().count(), 1);
    }
}

// Rolling writer
//------------------------------------------------------------------------------

/// Shared handle to a [`RollingFile`] that the fmt layer locks once per event.
#[derive(Debug, Clone)]
pub struct RollingWriter(Arc<Mutex<RollingFile>>);

impl RollingWriter {
    pub fn new(file: RollingFile) -> Self {
        Self(Arc::new(Mutex::new(file)))
    }

    fn lock(&self) -> MutexGuard<'_, RollingFile> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub struct RollingWriterGuard<'a>(MutexGuard<'a, RollingFile>);

impl Write for RollingWriterGuard<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.flush()
    }
}

impl<'a> MakeWriter<'a> for RollingWriter {
    type Writer = RollingWriterGuard<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        RollingWriterGuard(self.lock())
    }
}

// Subscriber
//------------------------------------------------------------------------------

/// Keeps the subscriber installed for the current thread. Dropping it flushes the log
/// file and restores the previous subscriber.
pub struct LogGuard {
    writer: RollingWriter,
    _default: DefaultGuard,
}

impl LogGuard {
    pub fn log_file(&self) -> PathBuf {
        self.writer.lock().path().to_path_buf()
    }
}

impl Drop for LogGuard {
    fn drop(&mut self) {
        let mut file = self.writer.lock();
        if let Err(e) = file.flush() {
            eprintln!("Failed to flush {}: {e}", file.path().display());
        }
    }
}

/// Logs to stderr and to `<log_dir>/app.log`. The level defaults to `info` and can be
/// overridden with `RUST_LOG`.
pub fn init(log_dir: &Path) -> io::Result<LogGuard> {
    fs::create_dir_all(log_dir)?;
    let file = RollingFile::open(log_dir.join(LOG_FILE_NAME), MAX_LOG_BYTES, MAX_ARCHIVES)?;
    let writer = RollingWriter::new(file);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr).with_ansi(io::stderr().is_terminal()))
        .with(fmt::layer().with_writer(writer.clone()).with_ansi(false));

    let default = tracing::subscriber::set_default(subscriber);
    Ok(LogGuard { writer, _default: default })
}
