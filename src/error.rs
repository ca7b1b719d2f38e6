use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShimError {
    #[error("Failed to resolve executable path: {0}")]
    ExecutablePath(#[source] io::Error),

    #[error("Failed to read configuration file at {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to start downloader '{}': {source}", .program.display())]
    DownloadSpawn {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Downloader exited with {status}")]
    DownloadFailed { status: ExitStatus },

    #[error("ffprobe failed: {reason} ({output})")]
    Inspection { reason: String, output: String },

    #[error("Failed to start encoder '{}': {source}", .program.display())]
    EncodeSpawn {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Encoder exited with {status}")]
    EncodeFailed { status: ExitStatus },

    #[error("Could not replace '{}' with '{}': {source}", .target.display(), .temp.display())]
    Replace {
        target: PathBuf,
        temp: PathBuf,
        #[source]
        source: io::Error,
    },
}
