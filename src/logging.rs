use chrono::Local;
use log::{LevelFilter, SetLoggerError};
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Log target that opens the file for every record and closes it right after.
pub struct AppendFile {
    path: PathBuf,
}

impl AppendFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl Write for AppendFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub fn format_line(message: &str) -> String {
    format!("{}  {}", Local::now().format(TIMESTAMP_FORMAT), message)
}

/// Installs the process logger. When `enabled` is false nothing is ever written.
///
/// Fails if a logger is already installed.
pub fn init(enabled: bool, path: &Path) -> Result<(), SetLoggerError> {
    let mut builder = env_logger::Builder::new();
    if enabled {
        builder.filter_level(LevelFilter::Debug);
        if let Ok(filters) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filters);
        }
    } else {
        builder.filter_level(LevelFilter::Off);
    }

    builder
        .format(|buf, record| writeln!(buf, "{}", format_line(&record.args().to_string())))
        .write_style(env_logger::WriteStyle::Never)
        .target(env_logger::Target::Pipe(Box::new(AppendFile::new(
            path.to_path_buf(),
        ))))
        .try_init()
}
