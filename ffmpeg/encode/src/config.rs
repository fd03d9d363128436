/*!
    Encoder configuration types.
*/

use ffmpeg_types::{ChannelLayout, CodecId, PixelFormat, Rational, SampleFormat};

/**
    One entry of an encoder fallback chain.

    Chains are tried in order and the first encoder FFmpeg knows about wins.
*/
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EncoderChoice {
    /// A specific encoder implementation, e.g. `libx264` or `h264_videotoolbox`.
    Named(String),
    /// Whatever encoder FFmpeg registers as the default for a codec.
    Codec(CodecId),
}

impl EncoderChoice {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }
}

impl std::fmt::Display for EncoderChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Named(name) => f.write_str(name),
            Self::Codec(id) => write!(f, "default {id} encoder"),
        }
    }
}

/**
    The video encoder chain for the current platform.

    Apple targets try VideoToolbox, then libx264, then the default H.264
    encoder. Everything else tries libx264 and falls back to MPEG-4 Part 2,
    which FFmpeg always ships.
*/
pub fn platform_video_candidates() -> Vec<EncoderChoice> {
    let apple = cfg!(any(target_os = "macos", target_os = "ios"));

    let mut candidates = Vec::with_capacity(4);
    if apple {
        candidates.push(EncoderChoice::named("h264_videotoolbox"));
    } else if cfg!(feature = "nvenc") {
        candidates.push(EncoderChoice::named("h264_nvenc"));
    }
    candidates.push(EncoderChoice::named("libx264"));
    candidates.push(EncoderChoice::Codec(if apple {
        CodecId::H264
    } else {
        CodecId::Mpeg4
    }));
    candidates
}

/**
    Configuration for video encoding.
*/
#[derive(Clone, Debug)]
pub struct VideoEncoderConfig {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Frame rate. The encoder time base is its reciprocal.
    pub frame_rate: Rational,
    /// Expected input pixel format.
    pub pixel_format: PixelFormat,
    /// Target average bitrate in bits per second (None = encoder default).
    pub bitrate: Option<u64>,
    /// Put codec headers in extradata instead of the bitstream.
    pub global_header: bool,
}

impl VideoEncoderConfig {
    /**
        Create a new video encoder configuration for YUV420P input.
    */
    pub fn new(width: u32, height: u32, frame_rate: Rational) -> Self {
        Self {
            width,
            height,
            frame_rate,
            pixel_format: PixelFormat::Yuv420p,
            bitrate: None,
            global_header: false,
        }
    }

    /**
        Set the target bitrate in bits per second.
    */
    pub fn with_bitrate(mut self, bitrate: u64) -> Self {
        self.bitrate = Some(bitrate);
        self
    }

    /**
        Set the input pixel format.
    */
    pub fn with_pixel_format(mut self, format: PixelFormat) -> Self {
        self.pixel_format = format;
        self
    }

    /**
        Mirror the container's global-header requirement.
    */
    pub fn with_global_header(mut self, global_header: bool) -> Self {
        self.global_header = global_header;
        self
    }

    /**
        Time base of the encoder, one tick per frame.
    */
    pub fn time_base(&self) -> Rational {
        self.frame_rate.invert()
    }
}

/**
    Configuration for audio encoding.
*/
#[derive(Clone, Debug)]
pub struct AudioEncoderConfig {
    /// Sample rate in Hz. The encoder time base is 1/sample_rate.
    pub sample_rate: u32,
    /// Channel layout.
    pub channels: ChannelLayout,
    /// Expected input sample format.
    pub sample_format: SampleFormat,
    /// Target bitrate in bits per second (None = codec default).
    pub bitrate: Option<u64>,
    /// Samples per frame to request (None = codec decides).
    pub frame_size: Option<usize>,
    /// Put codec headers in extradata instead of the bitstream.
    pub global_header: bool,
}

impl AudioEncoderConfig {
    /**
        Create a new audio encoder configuration for planar float input.
    */
    pub fn new(sample_rate: u32, channels: ChannelLayout) -> Self {
        Self {
            sample_rate,
            channels,
            sample_format: SampleFormat::F32p,
            bitrate: None,
            frame_size: None,
            global_header: false,
        }
    }

    /**
        Set the target bitrate in bits per second.
    */
    pub fn with_bitrate(mut self, bitrate: u64) -> Self {
        self.bitrate = Some(bitrate);
        self
    }

    /**
        Set the input sample format.
    */
    pub fn with_sample_format(mut self, format: SampleFormat) -> Self {
        self.sample_format = format;
        self
    }

    /**
        Request a fixed number of samples per frame.
    */
    pub fn with_frame_size(mut self, samples: usize) -> Self {
        self.frame_size = Some(samples);
        self
    }

    /**
        Mirror the container's global-header requirement.
    */
    pub fn with_global_header(mut self, global_header: bool) -> Self {
        self.global_header = global_header;
        self
    }

    pub fn time_base(&self) -> Rational {
        Rational::new(1, self.sample_rate as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_chain_ends_with_a_codec_default() {
        let candidates = platform_video_candidates();
        assert!(candidates.contains(&EncoderChoice::named("libx264")));
        assert!(matches!(candidates.last(), Some(EncoderChoice::Codec(_))));
    }

    #[cfg(not(any(target_os = "macos", target_os = "ios")))]
    #[test]
    fn non_apple_chain_falls_back_to_mpeg4() {
        let candidates = platform_video_candidates();
        assert_eq!(candidates.last(), Some(&EncoderChoice::Codec(CodecId::Mpeg4)));
        assert!(!candidates.contains(&EncoderChoice::named("h264_videotoolbox")));
    }

    #[cfg(any(target_os = "macos", target_os = "ios"))]
    #[test]
    fn apple_chain_prefers_videotoolbox() {
        let candidates = platform_video_candidates();
        assert_eq!(candidates[0], EncoderChoice::named("h264_videotoolbox"));
        assert_eq!(candidates.last(), Some(&EncoderChoice::Codec(CodecId::H264)));
    }

    #[test]
    fn video_config_builders() {
        let config = VideoEncoderConfig::new(320, 240, Rational::new(30, 1))
            .with_bitrate(400_000)
            .with_global_header(true);
        assert_eq!(config.bitrate, Some(400_000));
        assert!(config.global_header);
        assert_eq!(config.pixel_format, PixelFormat::Yuv420p);
        assert_eq!(config.time_base(), Rational::new(1, 30));
    }

    #[test]
    fn audio_config_builders() {
        let config = AudioEncoderConfig::new(48000, ChannelLayout::Mono)
            .with_bitrate(64_000)
            .with_frame_size(1024);
        assert_eq!(config.sample_format, SampleFormat::F32p);
        assert_eq!(config.frame_size, Some(1024));
        assert_eq!(config.time_base(), Rational::new(1, 48000));
    }

    #[test]
    fn choices_display_readably() {
        assert_eq!(EncoderChoice::named("libx264").to_string(), "libx264");
        assert_eq!(
            EncoderChoice::Codec(CodecId::Mpeg4).to_string(),
            "default mpeg4 encoder"
        );
    }
}
