/*!
    Test clip configuration.
*/

use ffmpeg_encode::{
    AudioEncoderConfig, EncoderChoice, VideoEncoderConfig, platform_video_candidates,
};
use ffmpeg_types::{ChannelLayout, Error, PixelFormat, Rational, Result, SampleFormat};

use crate::synth::Tone;

/**
    Everything that shapes the synthesized clip.

    The defaults produce the reference clip: two seconds of 320x240 video at
    30 fps and 400 kbps, with a 440 Hz mono tone at 48 kHz and 64 kbps.
*/
#[derive(Clone, Debug)]
pub struct ClipConfig {
    /// Length of the clip in whole seconds.
    pub duration_seconds: u32,
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    /// Video bitrate in bits per second.
    pub video_bitrate: u64,
    pub sample_rate: u32,
    /// Audio bitrate in bits per second.
    pub audio_bitrate: u64,
    /// Samples per audio frame to request from the encoder.
    pub audio_frame_size: usize,
    pub tone: Tone,
    /// Encoder name to try before the platform chain, e.g. `libx264`.
    pub preferred_video_encoder: Option<String>,
    /// Write the MP4 index at the front of the file.
    pub fast_start: bool,
}

impl Default for ClipConfig {
    fn default() -> Self {
        Self {
            duration_seconds: 2,
            width: 320,
            height: 240,
            fps: 30,
            video_bitrate: 400_000,
            sample_rate: 48_000,
            audio_bitrate: 64_000,
            audio_frame_size: 1024,
            tone: Tone::default(),
            preferred_video_encoder: None,
            fast_start: false,
        }
    }
}

impl ClipConfig {
    pub fn with_duration(mut self, seconds: u32) -> Self {
        self.duration_seconds = seconds;
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_tone(mut self, tone: Tone) -> Self {
        self.tone = tone;
        self
    }

    /**
        Try the named encoder before the platform's own chain.
    */
    pub fn with_preferred_video_encoder(mut self, name: impl Into<String>) -> Self {
        self.preferred_video_encoder = Some(name.into());
        self
    }

    pub fn with_fast_start(mut self, fast_start: bool) -> Self {
        self.fast_start = fast_start;
        self
    }

    /**
        Reject configurations that cannot produce a clip.
    */
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("duration", self.duration_seconds as u64),
            ("width", self.width as u64),
            ("height", self.height as u64),
            ("fps", self.fps as u64),
            ("sample rate", self.sample_rate as u64),
            ("audio frame size", self.audio_frame_size as u64),
        ];
        if let Some((name, _)) = fields.iter().find(|(_, value)| *value == 0) {
            return Err(Error::invalid_data(format!("{name} must be positive")));
        }
        Ok(())
    }

    pub fn frame_rate(&self) -> Rational {
        Rational::new(self.fps as i32, 1)
    }

    /**
        Number of video frames, one per tick of the frame clock.
    */
    pub fn video_frame_count(&self) -> i64 {
        self.duration_seconds as i64 * self.fps as i64
    }

    /**
        Number of whole audio frames of `frame_size` samples that fit in the
        clip. The remainder is dropped, so audio may end slightly before video.
    */
    pub fn audio_frame_count(&self, frame_size: usize) -> i64 {
        let total_samples = self.duration_seconds as i64 * self.sample_rate as i64;
        total_samples / frame_size.max(1) as i64
    }

    /**
        Video encoders to try, in order.
    */
    pub fn video_encoder_candidates(&self) -> Vec<EncoderChoice> {
        let mut candidates = Vec::new();
        if let Some(name) = &self.preferred_video_encoder {
            candidates.push(EncoderChoice::named(name.clone()));
        }
        for choice in platform_video_candidates() {
            if !candidates.contains(&choice) {
                candidates.push(choice);
            }
        }
        candidates
    }

    pub fn video_encoder_config(&self, global_header: bool) -> VideoEncoderConfig {
        VideoEncoderConfig::new(self.width, self.height, self.frame_rate())
            .with_pixel_format(PixelFormat::Yuv420p)
            .with_bitrate(self.video_bitrate)
            .with_global_header(global_header)
    }

    pub fn audio_encoder_config(&self, global_header: bool) -> AudioEncoderConfig {
        AudioEncoderConfig::new(self.sample_rate, ChannelLayout::Mono)
            .with_sample_format(SampleFormat::F32p)
            .with_bitrate(self.audio_bitrate)
            .with_frame_size(self.audio_frame_size)
            .with_global_header(global_header)
    }
}
