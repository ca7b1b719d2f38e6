//! Downloader format-selection expressions.

use clap::ValueEnum;
use strum_macros::Display;

/// Height ceiling requested for the download.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum, Display)]
pub enum MaxResolution {
    #[value(name = "480p")]
    #[strum(serialize = "480p")]
    P480,
    #[value(name = "720p")]
    #[strum(serialize = "720p")]
    P720,
    #[value(name = "1080p")]
    #[strum(serialize = "1080p")]
    P1080,
    #[value(name = "4k", alias = "2160p")]
    #[strum(serialize = "4k")]
    P2160,
    /// No ceiling.
    #[value(name = "best")]
    #[strum(serialize = "best")]
    Best,
}

impl MaxResolution {
    pub fn max_height(self) -> Option<u32> {
        match self {
            MaxResolution::P480 => Some(480),
            MaxResolution::P720 => Some(720),
            MaxResolution::P1080 => Some(1080),
            MaxResolution::P2160 => Some(2160),
            MaxResolution::Best => None,
        }
    }
}

/// Builds the `-f` expression handed to the downloader.
///
/// Compatibility mode restricts both the merged pair and the single-file
/// fallback to the `avc1` (H.264) family; otherwise the downloader is free to
/// pick AV1/VP9 streams under the same height ceiling.
pub fn select_format(resolution: MaxResolution, compatibility_mode: bool) -> String {
    let mut filter = String::new();
    if compatibility_mode {
        filter.push_str("[vcodec^=avc1]");
    }
    if let Some(height) = resolution.max_height() {
        filter.push_str(&format!("[height<={}]", height));
    }
    format!("bestvideo{filter}+bestaudio/best{filter}")
}
