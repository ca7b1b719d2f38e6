#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// A scratch directory holding fake yt-dlp/ffprobe/ffmpeg scripts, a config
/// file and a working directory for downloads.
pub struct Sandbox {
    pub tmp: TempDir,
    pub tools: PathBuf,
    pub work: PathBuf,
    pub config: PathBuf,
    pub log: PathBuf,
}

impl Sandbox {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let tools = tmp.path().join("tools");
        let work = tmp.path().join("work");
        fs::create_dir_all(&tools).unwrap();
        fs::create_dir_all(&work).unwrap();
        let config = tmp.path().join("yt-dlp.ini");
        let log = tmp.path().join("yt-dlp.log");
        Self {
            tmp,
            tools,
            work,
            config,
            log,
        }
    }

    /// Writes the config with tool paths pointing at the sandbox, then `extra` lines.
    pub fn write_config(&self, extra: &str) {
        let contents = format!(
            "yt-dlp-path = {}\nffmpeg-path = {}\nlog_path = {}\n{}",
            self.tools.display(),
            self.tools.display(),
            self.log.display(),
            extra
        );
        fs::write(&self.config, contents).unwrap();
    }

    /// Appends raw bytes to the config, for encodings `write_config` cannot express.
    pub fn append_config_bytes(&self, bytes: &[u8]) {
        let mut contents = fs::read(&self.config).unwrap_or_default();
        contents.extend_from_slice(bytes);
        fs::write(&self.config, contents).unwrap();
    }

    /// Fake downloader: records its args, writes "downloaded" to the `-o` path
    /// (with `%(ext)s` resolved to mp4) when `writes_output`, exits with `code`.
    pub fn fake_ytdlp(&self, writes_output: bool, code: i32) {
        let write_step = if writes_output {
            "if [ -n \"$out\" ]; then\n  out=$(printf '%s' \"$out\" | sed 's/%(ext)s/mp4/')\n  printf downloaded > \"$out\"\nfi\n"
        } else {
            ""
        };
        let body = format!(
            "printf '%s\\n' \"$@\" > '{}'\nout=\"\"\nprev=\"\"\nfor arg in \"$@\"; do\n  if [ \"$prev\" = \"-o\" ]; then out=\"$arg\"; fi\n  prev=\"$arg\"\ndone\n{}exit {}",
            self.ytdlp_args_file().display(),
            write_step,
            code
        );
        write_script(&self.tools.join("yt-dlp"), &body);
    }

    pub fn fake_ffprobe(&self, codec: &str) {
        let body = format!(
            "touch '{}'\nprintf '%s\\n' '{}'",
            self.ffprobe_marker().display(),
            codec
        );
        write_script(&self.tools.join("ffprobe"), &body);
    }

    /// Fake encoder: answers `-encoders` with `encoders`, otherwise records its
    /// args, writes "reencoded" to the last argument and exits with `code`.
    pub fn fake_ffmpeg(&self, encoders: &str, code: i32) {
        let body = format!(
            "if [ \"$2\" = \"-encoders\" ]; then\n  printf '%s\\n' '{}'\n  exit 0\nfi\nprintf '%s\\n' \"$@\" > '{}'\nfor last; do :; done\nprintf reencoded > \"$last\"\nexit {}",
            encoders,
            self.ffmpeg_args_file().display(),
            code
        );
        write_script(&self.tools.join("ffmpeg"), &body);
    }

    pub fn command(&self) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("ytdlp_shim"));
        cmd.env("YTDLP_SHIM_CONFIG", &self.config)
            .env_remove("RUST_LOG")
            .current_dir(&self.work);
        cmd
    }

    pub fn ytdlp_args_file(&self) -> PathBuf {
        self.tmp.path().join("ytdlp-args.txt")
    }

    pub fn ffmpeg_args_file(&self) -> PathBuf {
        self.tmp.path().join("ffmpeg-args.txt")
    }

    pub fn ffprobe_marker(&self) -> PathBuf {
        self.tmp.path().join("ffprobe-called")
    }

    pub fn ytdlp_args(&self) -> Vec<String> {
        read_lines(&self.ytdlp_args_file())
    }

    pub fn ffmpeg_args(&self) -> Option<Vec<String>> {
        let path = self.ffmpeg_args_file();
        path.exists().then(|| read_lines(&path))
    }
}

pub fn value_after<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(|s| s.as_str())
}

fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap_or_else(|err| panic!("read {}: {}", path.display(), err))
        .lines()
        .map(String::from)
        .collect()
}

fn write_script(path: &Path, body: &str) {
    fs::write(path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}
