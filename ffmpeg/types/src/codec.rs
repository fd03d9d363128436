/*!
    Codec identifiers.
*/

/**
    Codecs the crates know how to name.

    Encoders selected by name (e.g. `libx264`, `h264_videotoolbox`) report the
    codec they implement through this type.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CodecId {
    /// H.264 / AVC
    H264,
    /// MPEG-4 Part 2
    Mpeg4,
    /// AAC
    Aac,
}

impl CodecId {
    pub const fn is_video(self) -> bool {
        matches!(self, Self::H264 | Self::Mpeg4)
    }

    pub const fn is_audio(self) -> bool {
        matches!(self, Self::Aac)
    }

    /**
        Short human-readable name, as FFmpeg prints it.
    */
    pub const fn name(self) -> &'static str {
        match self {
            Self::H264 => "h264",
            Self::Mpeg4 => "mpeg4",
            Self::Aac => "aac",
        }
    }
}

impl std::fmt::Display for CodecId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_kinds() {
        assert!(CodecId::Mpeg4.is_video());
        assert!(!CodecId::Mpeg4.is_audio());
        assert!(CodecId::Aac.is_audio());
        assert_eq!(CodecId::H264.to_string(), "h264");
    }
}
