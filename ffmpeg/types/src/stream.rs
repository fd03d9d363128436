/*!
    Stream information types.
*/

use std::time::Duration;

use crate::{ChannelLayout, CodecId, PixelFormat, Rational, SampleFormat};

/**
    Information about a video stream.
*/
#[derive(Clone, Debug)]
pub struct VideoStreamInfo {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Pixel format (None when not one of ours).
    pub pixel_format: Option<PixelFormat>,
    /// Frame rate (may be approximate or unavailable).
    pub frame_rate: Option<Rational>,
    /// Time base for timestamps.
    pub time_base: Rational,
    /// Total duration (may be unavailable for some streams).
    pub duration: Option<Duration>,
    /// Codec used (None when not one of ours).
    pub codec_id: Option<CodecId>,
    /// Bitrate in bits per second (if known).
    pub bitrate: Option<u64>,
}

impl VideoStreamInfo {
    /**
        Returns the frame rate as fps, if available.
    */
    pub fn fps(&self) -> Option<f64> {
        self.frame_rate.map(|r| r.to_f64())
    }
}

/**
    Information about an audio stream.
*/
#[derive(Clone, Debug)]
pub struct AudioStreamInfo {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Number of channels.
    pub channel_count: u16,
    /// Sample format (None when not one of ours).
    pub sample_format: Option<SampleFormat>,
    /// Time base for timestamps.
    pub time_base: Rational,
    /// Total duration (may be unavailable for some streams).
    pub duration: Option<Duration>,
    /// Codec used (None when not one of ours).
    pub codec_id: Option<CodecId>,
    /// Bitrate in bits per second (if known).
    pub bitrate: Option<u64>,
}

impl AudioStreamInfo {
    /**
        Returns the channel layout, if it is one of ours.
    */
    pub fn channels(&self) -> Option<ChannelLayout> {
        ChannelLayout::from_count(self.channel_count)
    }
}

/**
    Combined information about a media file.
*/
#[derive(Clone, Debug, Default)]
pub struct MediaInfo {
    /// Total duration of the media (may be unavailable).
    pub duration: Option<Duration>,
    /// Number of streams of any kind in the container.
    pub stream_count: usize,
    /// Best video stream (if video is present).
    pub video: Option<VideoStreamInfo>,
    /// Best audio stream (if audio is present).
    pub audio: Option<AudioStreamInfo>,
}

impl MediaInfo {
    /**
        Returns true if this media has video.
    */
    pub fn has_video(&self) -> bool {
        self.video.is_some()
    }

    /**
        Returns true if this media has audio.
    */
    pub fn has_audio(&self) -> bool {
        self.audio.is_some()
    }
}
