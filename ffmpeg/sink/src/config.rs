/*!
    Sink configuration.
*/

/**
    Configuration for an MP4 file sink.
*/
#[derive(Clone, Debug, Default)]
pub struct SinkConfig {
    /// Move the index to the front of the file once writing finishes.
    pub fast_start: bool,
}

impl SinkConfig {
    /**
        The FFmpeg muxer every sink writes with, regardless of the file
        extension.
    */
    pub const MUXER: &'static str = "mp4";

    pub fn mp4() -> Self {
        Self::default()
    }

    /**
        Enable `movflags +faststart` so playback can begin before the whole
        file has been downloaded.
    */
    pub fn with_fast_start(mut self, fast_start: bool) -> Self {
        self.fast_start = fast_start;
        self
    }
}
