//! Locations of the external programs the shim drives.

use std::env::consts::EXE_SUFFIX;
use std::path::{Path, PathBuf};

pub const DOWNLOADER_NAME: &str = "yt-dlp";
pub const FFPROBE_NAME: &str = "ffprobe";
pub const FFMPEG_NAME: &str = "ffmpeg";

/// `dir/name` with the platform executable suffix; a bare name (PATH lookup) without `dir`.
pub fn tool_path(dir: Option<&Path>, name: &str) -> PathBuf {
    let file_name = format!("{}{}", name, EXE_SUFFIX);
    match dir {
        Some(dir) => dir.join(file_name),
        None => PathBuf::from(file_name),
    }
}

pub fn downloader(dir: Option<&Path>) -> PathBuf {
    tool_path(dir, DOWNLOADER_NAME)
}

pub fn ffprobe(dir: &Path) -> PathBuf {
    tool_path(Some(dir), FFPROBE_NAME)
}

pub fn ffmpeg(dir: &Path) -> PathBuf {
    tool_path(Some(dir), FFMPEG_NAME)
}
