use anyhow::{Context, Result};
use log::{debug, error, info, warn};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitCode};

use ytdlp_shim::args::{resolve_output_path, DownloaderArgs};
use ytdlp_shim::config::{self, Settings};
use ytdlp_shim::encoder::select_encoder;
use ytdlp_shim::error::ShimError;
use ytdlp_shim::format::select_format;
use ytdlp_shim::gpu::is_hw_encoder;
use ytdlp_shim::{logging, probe, reencode, tools};

/// How a successful run ended.
#[derive(Debug)]
enum Outcome {
    CompatibilityModeSkip,
    NoFfmpeg,
    PathUnresolved,
    FileMissing(PathBuf),
    ProbeFailed,
    AlreadyTargetCodec(String),
    Reencoded { from: String, encoder: &'static str },
}

impl Outcome {
    fn summary(&self) -> String {
        match self {
            Outcome::CompatibilityModeSkip => "compatibility mode, no post-processing".to_string(),
            Outcome::NoFfmpeg => "no ffmpeg-path configured, no post-processing".to_string(),
            Outcome::PathUnresolved => "output path unresolved, no post-processing".to_string(),
            Outcome::FileMissing(path) => format!("'{}' not found, nothing to do", path.display()),
            Outcome::ProbeFailed => "codec probe failed, left file as downloaded".to_string(),
            Outcome::AlreadyTargetCodec(codec) => format!("already {}", codec),
            Outcome::Reencoded { from, encoder } => {
                format!("re-encoded from {} with {}", from, encoder)
            }
        }
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(outcome) => {
            debug!("Done: {}", outcome.summary());
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{:#}", err);
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<Outcome> {
    let exe_path = env::current_exe().map_err(ShimError::ExecutablePath)?;
    let exe_dir = exe_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();

    let file_config = match config::load_config(&config::config_path(&exe_dir)) {
        Ok(file_config) => file_config,
        Err(err) => {
            // Nothing is known about the log settings yet; report through the default log.
            logging::init(true, &exe_dir.join(config::LOG_FILE_NAME))
                .context("Failed to install logger")?;
            return Err(err.into());
        }
    };
    let (settings, fallbacks) = Settings::from_file(&file_config, &exe_dir);
    logging::init(settings.debug, &settings.log_path).context("Failed to install logger")?;

    if file_config.found {
        info!("Loaded configuration from '{}'", file_config.path.display());
    } else {
        info!("INI not found, using default settings");
    }
    for line_no in &file_config.ignored_lines {
        warn!(
            "Ignored config line {}:{}: expected 'key = value'",
            file_config.path.display(),
            line_no
        );
    }
    for fallback in &fallbacks {
        warn!("{}", fallback);
    }

    let caller_args: Vec<String> = env::args_os()
        .skip(1)
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();
    info!("Original args: {}", caller_args.join(" "));
    info!(
        "Config: maxres={} always_compatible={} output_codec={} encoder={}",
        settings.max_resolution,
        settings.always_compatible,
        settings.output_codec,
        settings.encoder_mode
    );

    let format = select_format(settings.max_resolution, settings.always_compatible);
    let final_args = DownloaderArgs::parse(caller_args.as_slice())
        .rewrite(&format, settings.ffmpeg_dir.as_deref());
    let argv = final_args.to_vec();
    info!("Final yt-dlp args: {}", argv.join(" "));

    download(&tools::downloader(settings.ytdlp_dir.as_deref()), &argv)?;

    post_process(&settings, &final_args)
}

fn download(program: &Path, args: &[String]) -> Result<(), ShimError> {
    debug!("Running {}", program.display());
    let status = Command::new(program)
        .args(args)
        .status()
        .map_err(|source| ShimError::DownloadSpawn {
            program: program.to_path_buf(),
            source,
        })?;

    if !status.success() {
        return Err(ShimError::DownloadFailed { status });
    }
    Ok(())
}

/// Codec check and optional re-encode after a successful download.
///
/// Only a failed re-encode is an error here; every other miss leaves the
/// downloaded file as it is.
fn post_process(settings: &Settings, args: &DownloaderArgs) -> Result<Outcome> {
    if settings.always_compatible {
        info!("Compatibility mode: output is H.264 by construction, skipping codec check.");
        return Ok(Outcome::CompatibilityModeSkip);
    }

    let Some(ffmpeg_dir) = settings.ffmpeg_dir.as_deref() else {
        info!("No ffmpeg-path configured; skipping codec check/re-encode.");
        return Ok(Outcome::NoFfmpeg);
    };

    let Some(output) = args.output_template().and_then(resolve_output_path) else {
        info!("Could not resolve output path from -o; skipping codec check/re-encode.");
        return Ok(Outcome::PathUnresolved);
    };

    if let Err(err) = fs::metadata(&output) {
        info!(
            "Output file not found for codec check: {} ({})",
            output.display(),
            err
        );
        return Ok(Outcome::FileMissing(output));
    }

    let codec = match probe::probe_video_codec(&tools::ffprobe(ffmpeg_dir), &output) {
        Ok(codec) => codec,
        Err(err) => {
            warn!("{}", err);
            return Ok(Outcome::ProbeFailed);
        }
    };
    info!("Detected video codec: {}", codec);

    let target = settings.target_codec();
    if target.matches_probe(&codec) {
        info!("Already {}, skipping re-encode.", target);
        return Ok(Outcome::AlreadyTargetCodec(codec));
    }

    let ffmpeg = tools::ffmpeg(ffmpeg_dir);
    let choice = select_encoder(
        &settings.encoder_params,
        target,
        settings.encoder_mode,
        |name| probe::has_encoder(&ffmpeg, name),
    );

    info!(
        "Re-encoding to {} with {} ({})...",
        target,
        choice.label,
        if is_hw_encoder(choice.label) {
            "hardware"
        } else {
            "software"
        }
    );
    reencode::reencode(&ffmpeg, &output, &choice.args)
        .with_context(|| format!("Re-encode of '{}' failed", output.display()))?;
    info!("Re-encode done.");

    Ok(Outcome::Reencoded {
        from: codec,
        encoder: choice.label,
    })
}
