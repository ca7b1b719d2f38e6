use crate::error::ShimError;
use log::{debug, info, warn};
use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Sibling path the encoder writes to before the swap: `clip.mp4` -> `clip.mp4.tmp.mp4`.
pub fn temp_path(input: &Path) -> PathBuf {
    let mut name = OsString::from(input.as_os_str());
    name.push(".tmp.mp4");
    PathBuf::from(name)
}

/// Re-encodes `input` in place with `encoder_args`.
///
/// The original is only touched once ffmpeg has succeeded. On failure the
/// temporary file is removed as long as the original is still intact.
pub fn reencode(ffmpeg: &Path, input: &Path, encoder_args: &[String]) -> Result<(), ShimError> {
    let temp = temp_path(input);
    debug!(
        "Encoding '{}' -> '{}' with {}",
        input.display(),
        temp.display(),
        ffmpeg.display()
    );

    let status = Command::new(ffmpeg)
        .arg("-y")
        .arg("-i")
        .arg(input)
        .args(encoder_args)
        .arg(&temp)
        .status()
        .map_err(|source| ShimError::EncodeSpawn {
            program: ffmpeg.to_path_buf(),
            source,
        })?;

    if !status.success() {
        discard_temp(&temp);
        return Err(ShimError::EncodeFailed { status });
    }

    // rename overwrites the original in a single step.
    if let Err(source) = fs::rename(&temp, input) {
        discard_temp(&temp);
        return Err(ShimError::Replace {
            target: input.to_path_buf(),
            temp,
            source,
        });
    }

    info!("Replaced '{}' with re-encoded output", input.display());
    Ok(())
}

fn discard_temp(temp: &Path) {
    match fs::remove_file(temp) {
        Ok(()) => debug!("Removed temporary file '{}'", temp.display()),
        Err(err) if err.kind() == ErrorKind::NotFound => {}
        Err(err) => warn!(
            "Failed to remove temporary file '{}': {}",
            temp.display(),
            err
        ),
    }
}
