use crate::encoder::{EncoderParams, OutputCodec};
use crate::error::ShimError;
use crate::format::MaxResolution;
use crate::gpu::EncoderMode;
use clap::ValueEnum;
use std::collections::BTreeMap;
use std::env;
use std::fmt::Display;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV_VAR: &str = "YTDLP_SHIM_CONFIG";
pub const CONFIG_FILE_NAME: &str = "yt-dlp.ini";
pub const LOG_FILE_NAME: &str = "yt-dlp.log";

/// Built-in values, applied before the override file is read.
const DEFAULTS: &[(&str, &str)] = &[
    ("maxres", "best"),
    ("yt-dlp-path", ""),
    ("ffmpeg-path", ""),
    ("debug", "true"),
    ("always_compatible", "false"),
    ("output_codec", "h264"),
    ("encoder", "auto"),
    ("x264_preset", "fast"),
    ("x264_crf", "18"),
    ("x265_preset", "medium"),
    ("x265_crf", "23"),
    ("nvenc_preset", "p5"),
    ("nvenc_cq", "23"),
    ("audio_bitrate", "192k"),
    ("log_path", ""),
];

#[derive(Debug)]
pub struct FileConfig {
    pub path: PathBuf,
    pub found: bool,
    pub values: BTreeMap<String, String>,
    /// 1-based numbers of non-empty lines that had no `=` separator.
    pub ignored_lines: Vec<usize>,
}

impl FileConfig {
    pub fn defaults(path: PathBuf) -> Self {
        Self {
            path,
            found: false,
            values: DEFAULTS
                .iter()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect(),
            ignored_lines: Vec::new(),
        }
    }

    pub fn get(&self, key: &str) -> &str {
        self.values.get(key).map(|s| s.as_str()).unwrap_or("")
    }

    fn apply_overrides(&mut self, contents: &str) {
        for (idx, raw_line) in contents.lines().enumerate() {
            let trimmed = raw_line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let Some((key_part, value_part)) = trimmed.split_once('=') else {
                self.ignored_lines.push(idx + 1);
                continue;
            };

            let key = key_part.trim();
            if key.is_empty() {
                self.ignored_lines.push(idx + 1);
                continue;
            }

            self.values
                .insert(key.to_ascii_lowercase(), value_part.trim().to_string());
        }
    }
}

/// Where the override file is looked for: `$YTDLP_SHIM_CONFIG`, else next to the executable.
pub fn config_path(exe_dir: &Path) -> PathBuf {
    match env::var_os(CONFIG_ENV_VAR).filter(|value| !value.is_empty()) {
        Some(env_path) => PathBuf::from(env_path),
        None => exe_dir.join(CONFIG_FILE_NAME),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfig, ShimError> {
    let mut config = FileConfig::defaults(path.to_path_buf());

    match fs::read(path) {
        Ok(bytes) => {
            config.found = true;
            let decoded = String::from_utf8_lossy(&bytes);
            let contents = decoded.strip_prefix('\u{feff}').unwrap_or(&decoded);
            config.apply_overrides(contents);
        }
        Err(err) if err.kind() == ErrorKind::NotFound => {}
        Err(source) => {
            return Err(ShimError::ConfigRead {
                path: path.to_path_buf(),
                source,
            })
        }
    }

    Ok(config)
}

fn debug_enabled(config: &FileConfig) -> bool {
    !config.get("debug").eq_ignore_ascii_case("false")
}

fn log_path(config: &FileConfig, exe_dir: &Path) -> PathBuf {
    match config.get("log_path") {
        "" => exe_dir.join(LOG_FILE_NAME),
        custom => PathBuf::from(custom),
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub max_resolution: MaxResolution,
    pub always_compatible: bool,
    pub ytdlp_dir: Option<PathBuf>,
    pub ffmpeg_dir: Option<PathBuf>,
    pub debug: bool,
    pub output_codec: OutputCodec,
    pub encoder_mode: EncoderMode,
    pub encoder_params: EncoderParams,
    pub log_path: PathBuf,
}

impl Settings {
    /// Normalizes the raw key/value table. Values that fell back to a default
    /// are reported in the returned list, since the logger is not up yet.
    pub fn from_file(config: &FileConfig, exe_dir: &Path) -> (Self, Vec<String>) {
        let mut fallbacks = Vec::new();
        let settings = Self {
            max_resolution: parse_choice(config, "maxres", MaxResolution::Best, &mut fallbacks),
            always_compatible: config.get("always_compatible").eq_ignore_ascii_case("true"),
            ytdlp_dir: non_empty_dir(config.get("yt-dlp-path")),
            ffmpeg_dir: non_empty_dir(config.get("ffmpeg-path")),
            debug: debug_enabled(config),
            output_codec: parse_choice(config, "output_codec", OutputCodec::H264, &mut fallbacks),
            encoder_mode: parse_choice(config, "encoder", EncoderMode::Auto, &mut fallbacks),
            encoder_params: EncoderParams {
                x264_preset: config.get("x264_preset").to_string(),
                x264_crf: config.get("x264_crf").to_string(),
                x265_preset: config.get("x265_preset").to_string(),
                x265_crf: config.get("x265_crf").to_string(),
                nvenc_preset: config.get("nvenc_preset").to_string(),
                nvenc_cq: config.get("nvenc_cq").to_string(),
                audio_bitrate: config.get("audio_bitrate").to_string(),
            },
            log_path: log_path(config, exe_dir),
        };
        (settings, fallbacks)
    }

    /// Compatibility mode pins the output to H.264 whatever codec was requested.
    pub fn target_codec(&self) -> OutputCodec {
        if self.always_compatible {
            OutputCodec::H264
        } else {
            self.output_codec
        }
    }
}

fn non_empty_dir(value: &str) -> Option<PathBuf> {
    if value.is_empty() {
        None
    } else {
        Some(PathBuf::from(value))
    }
}

fn parse_choice<T: ValueEnum + Display>(
    config: &FileConfig,
    key: &str,
    fallback: T,
    fallbacks: &mut Vec<String>,
) -> T {
    let raw = config.get(key);
    match T::from_str(raw, true) {
        Ok(value) => value,
        Err(_) => {
            fallbacks.push(format!(
                "Unrecognized {} value '{}' in config; using {}",
                key, raw, fallback
            ));
            fallback
        }
    }
}
