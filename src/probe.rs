use crate::error::ShimError;
use log::{debug, warn};
use std::path::Path;
use std::process::Command;

/// Codec name of the first video stream, e.g. `h264`, `vp9`, `av1`.
pub fn probe_video_codec(ffprobe: &Path, file: &Path) -> Result<String, ShimError> {
    let output = Command::new(ffprobe)
        .arg("-v")
        .arg("error")
        .arg("-select_streams")
        .arg("v:0")
        .arg("-show_entries")
        .arg("stream=codec_name")
        .arg("-of")
        .arg("default=noprint_wrappers=1:nokey=1")
        .arg(file)
        .output()
        .map_err(|err| ShimError::Inspection {
            reason: err.to_string(),
            output: String::new(),
        })?;

    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));

    if !output.status.success() {
        return Err(ShimError::Inspection {
            reason: output.status.to_string(),
            output: combined.trim().to_string(),
        });
    }

    Ok(combined.trim().to_string())
}

/// Whether `ffmpeg -encoders` lists `encoder`. Listing failures count as absent.
pub fn has_encoder(ffmpeg: &Path, encoder: &str) -> bool {
    let output = match Command::new(ffmpeg)
        .args(["-hide_banner", "-encoders"])
        .output()
    {
        Ok(output) => output,
        Err(err) => {
            warn!(
                "Could not list encoders with '{}': {}",
                ffmpeg.display(),
                err
            );
            return false;
        }
    };

    if !output.status.success() {
        warn!(
            "Encoder listing with '{}' exited with {}",
            ffmpeg.display(),
            output.status
        );
        return false;
    }

    let listing = String::from_utf8_lossy(&output.stdout);
    let present = listing.contains(encoder);
    debug!("Encoder {} present: {}", encoder, present);
    present
}
