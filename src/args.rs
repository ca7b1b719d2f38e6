//! Structured view over the downloader command line.
//!
//! Only the handful of flags the shim rewrites are recognized; every other
//! token is carried through untouched and in its original position.

use log::info;
use std::env;
use std::path::{Path, PathBuf};

pub const FORMAT_FLAG: &str = "-f";
pub const OUTPUT_FLAG: &str = "-o";
pub const FFMPEG_LOCATION_FLAG: &str = "--ffmpeg-location";

/// Container the downloader is told to merge into.
pub const MERGE_CONTAINER: &str = "mp4";
pub const EXT_TEMPLATE: &str = "%(ext)s";
const TEMPLATE_MARKER: &str = "%(";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Arg {
    Format(String),
    Output(String),
    FfmpegLocation(String),
    Passthrough(String),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DownloaderArgs {
    args: Vec<Arg>,
}

impl DownloaderArgs {
    pub fn parse<S: AsRef<str>>(raw: &[S]) -> Self {
        let mut args = Vec::with_capacity(raw.len());
        let mut tokens = raw.iter().map(|s| s.as_ref());

        while let Some(token) = tokens.next() {
            let ctor = match token {
                FORMAT_FLAG => Some(Arg::Format as fn(String) -> Arg),
                OUTPUT_FLAG => Some(Arg::Output as fn(String) -> Arg),
                FFMPEG_LOCATION_FLAG => Some(Arg::FfmpegLocation as fn(String) -> Arg),
                _ => None,
            };

            match ctor {
                Some(ctor) => match tokens.next() {
                    Some(value) => args.push(ctor(value.to_string())),
                    // Dangling flag: leave it for the downloader to complain about.
                    None => args.push(Arg::Passthrough(token.to_string())),
                },
                None => args.push(Arg::Passthrough(token.to_string())),
            }
        }

        Self { args }
    }

    #[cfg(test)]
    fn args(&self) -> &[Arg] {
        &self.args
    }

    /// Rewrites the caller's arguments for a download with `format`.
    ///
    /// A caller-forced `-f mp4` is dropped, the computed format and merge
    /// flags are appended, and static `-o` paths gain an `%(ext)s` suffix.
    /// Other `-f` values are kept, so running this twice yields two format
    /// flags.
    pub fn rewrite(mut self, format: &str, ffmpeg_dir: Option<&Path>) -> Self {
        self.args.retain(|arg| {
            let forced_mp4 = matches!(arg, Arg::Format(value) if value == MERGE_CONTAINER);
            if forced_mp4 {
                info!("Stripped -f mp4");
            }
            !forced_mp4
        });

        self.args.push(Arg::Format(format.to_string()));

        if let Some(dir) = ffmpeg_dir {
            let dir = dir.to_string_lossy().into_owned();
            info!("Set ffmpeg path: {}", dir);
            self.args.push(Arg::FfmpegLocation(dir));
        }

        self.args.push(Arg::Passthrough("--merge-output-format".to_string()));
        self.args.push(Arg::Passthrough(MERGE_CONTAINER.to_string()));
        self.args.push(Arg::Passthrough("--no-keep-video".to_string()));

        for arg in self.args.iter_mut() {
            if let Arg::Output(path) = arg {
                if let Some(adjusted) = templated_output(path) {
                    info!("Adjusted output to: {}", adjusted);
                    *path = adjusted;
                }
            }
        }

        self
    }

    /// Value of the first `-o` flag, if any.
    pub fn output_template(&self) -> Option<&str> {
        self.args.iter().find_map(|arg| match arg {
            Arg::Output(path) => Some(path.as_str()),
            _ => None,
        })
    }

    pub fn to_vec(&self) -> Vec<String> {
        let mut out = Vec::with_capacity(self.args.len() * 2);
        for arg in &self.args {
            match arg {
                Arg::Format(value) => out.extend([FORMAT_FLAG.to_string(), value.clone()]),
                Arg::Output(value) => out.extend([OUTPUT_FLAG.to_string(), value.clone()]),
                Arg::FfmpegLocation(value) => {
                    out.extend([FFMPEG_LOCATION_FLAG.to_string(), value.clone()])
                }
                Arg::Passthrough(value) => out.push(value.clone()),
            }
        }
        out
    }
}

/// `VideoTemp.mp4` -> `VideoTemp.%(ext)s`; `None` when the path is already templated.
fn templated_output(path: &str) -> Option<String> {
    if path.contains(TEMPLATE_MARKER) {
        return None;
    }

    let suffix = format!(".{}", MERGE_CONTAINER);
    let mut base = path;
    if path.len() >= suffix.len() {
        let split = path.len() - suffix.len();
        if path.is_char_boundary(split) && path[split..].eq_ignore_ascii_case(&suffix) {
            info!("Stripped .{} extension from output path", MERGE_CONTAINER);
            base = &path[..split];
        }
    }

    Some(format!("{}.{}", base, EXT_TEMPLATE))
}

/// Maps an output template back to the file the downloader produced.
///
/// Only `%(ext)s` is substituted; any other template token, or a path naming a
/// directory, makes the result unknowable and yields `None`.
pub fn resolve_output_path(template: &str) -> Option<PathBuf> {
    let resolved = template.replace(EXT_TEMPLATE, MERGE_CONTAINER);
    if resolved.contains(TEMPLATE_MARKER) {
        return None;
    }
    if resolved.ends_with('/') || resolved.ends_with(std::path::MAIN_SEPARATOR) {
        return None;
    }

    let path = PathBuf::from(resolved);
    if path.is_dir() {
        return None;
    }
    if path.is_absolute() {
        return Some(path);
    }
    match env::current_dir() {
        Ok(cwd) => Some(cwd.join(path)),
        Err(_) => Some(path),
    }
}
