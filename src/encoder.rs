use crate::gpu::{nvenc_encoder, EncoderMode};
use clap::ValueEnum;
use log::{debug, info};
use strum_macros::Display;

#[derive(Copy, Clone, Eq, PartialEq, Debug, ValueEnum, Display)]
pub enum OutputCodec {
    #[value(name = "h264", alias = "avc", alias = "x264")]
    #[strum(serialize = "H.264")]
    H264,
    #[value(name = "h265", alias = "hevc", alias = "x265")]
    #[strum(serialize = "H.265")]
    H265,
}

impl OutputCodec {
    /// Codec name ffprobe reports for streams already in this codec.
    pub fn probe_name(self) -> &'static str {
        match self {
            OutputCodec::H264 => "h264",
            OutputCodec::H265 => "hevc",
        }
    }

    pub fn software_encoder(self) -> &'static str {
        match self {
            OutputCodec::H264 => "libx264",
            OutputCodec::H265 => "libx265",
        }
    }

    pub fn matches_probe(self, probed: &str) -> bool {
        probed.trim().eq_ignore_ascii_case(self.probe_name())
    }
}

/// Preset/quality slots per encoder family. Values are handed to ffmpeg as-is.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EncoderParams {
    pub x264_preset: String,
    pub x264_crf: String,
    pub x265_preset: String,
    pub x265_crf: String,
    /// Shared by both NVENC encoders.
    pub nvenc_preset: String,
    pub nvenc_cq: String,
    pub audio_bitrate: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncoderChoice {
    /// Encoder id, e.g. `libx265` or `h264_nvenc`.
    pub label: &'static str,
    pub args: Vec<String>,
}

/// Picks the video encoder for `codec` and builds its ffmpeg arguments.
///
/// `hw_available` is consulted only in [`EncoderMode::Auto`] and receives the
/// NVENC encoder id to look for.
pub fn select_encoder<F>(
    params: &EncoderParams,
    codec: OutputCodec,
    mode: EncoderMode,
    hw_available: F,
) -> EncoderChoice
where
    F: FnOnce(&str) -> bool,
{
    let use_hw = match mode {
        EncoderMode::Nvenc => true,
        EncoderMode::Cpu => false,
        EncoderMode::Auto => {
            let wanted = nvenc_encoder(codec);
            let found = hw_available(wanted);
            if found {
                info!("{} is available; using hardware encoding", wanted);
            } else {
                info!("{} not available; falling back to {}", wanted, codec.software_encoder());
            }
            found
        }
    };

    let mut args: Vec<String> = Vec::new();
    let label = if use_hw {
        let name = nvenc_encoder(codec);
        args.extend(
            [
                "-c:v",
                name,
                "-preset",
                params.nvenc_preset.as_str(),
                "-rc",
                "vbr",
                "-cq",
                params.nvenc_cq.as_str(),
            ]
            .map(String::from),
        );
        name
    } else {
        let name = codec.software_encoder();
        let (preset, crf) = match codec {
            OutputCodec::H264 => (params.x264_preset.as_str(), params.x264_crf.as_str()),
            OutputCodec::H265 => (params.x265_preset.as_str(), params.x265_crf.as_str()),
        };
        args.extend(["-c:v", name, "-preset", preset, "-crf", crf].map(String::from));
        name
    };

    if codec == OutputCodec::H265 {
        args.extend(["-tag:v", "hvc1"].map(String::from));
    }

    args.extend(
        [
            "-c:a",
            "aac",
            "-b:a",
            params.audio_bitrate.as_str(),
            "-movflags",
            "+faststart",
        ]
        .map(String::from),
    );

    debug!("Encoder {} ({:?}) args: {}", label, mode, args.join(" "));
    EncoderChoice { label, args }
}
