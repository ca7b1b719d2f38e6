use crate::encoder::OutputCodec;
use clap::ValueEnum;
use strum_macros::Display;

/// Which encoder family the re-encode may use.
#[derive(Copy, Clone, Eq, PartialEq, Debug, ValueEnum, Display)]
#[strum(serialize_all = "lowercase")]
pub enum EncoderMode {
    /// Use NVENC when ffmpeg reports it, otherwise fall back to the CPU.
    Auto,
    #[value(alias = "software", alias = "x264", alias = "x265")]
    Cpu,
    #[value(alias = "gpu", alias = "hardware", alias = "hw")]
    Nvenc,
}

/// NVENC encoder id for `codec`, as listed by `ffmpeg -encoders`.
pub fn nvenc_encoder(codec: OutputCodec) -> &'static str {
    match codec {
        OutputCodec::H264 => "h264_nvenc",
        OutputCodec::H265 => "hevc_nvenc",
    }
}

pub fn is_hw_encoder(name: &str) -> bool {
    name.contains("nvenc")
}
