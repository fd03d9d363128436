/*!
    Pixel and sample format types.
*/

/**
    Video pixel formats the encoders here accept as input.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// Planar YUV 4:2:0, 12bpp (most common video format)
    Yuv420p,
}

impl PixelFormat {
    /**
        Returns the number of planes.
    */
    pub const fn plane_count(self) -> usize {
        3
    }

    /**
        Returns the dimensions of a plane for a frame of the given size.

        Chroma dimensions round up, so odd sizes keep their last column/row.
    */
    pub const fn plane_size(self, plane: usize, width: u32, height: u32) -> (usize, usize) {
        let (w, h) = (width as usize, height as usize);
        match (self, plane) {
            (_, 0) => (w, h),
            (Self::Yuv420p, _) => (w.div_ceil(2), h.div_ceil(2)),
        }
    }
}

/**
    Audio sample formats.

    Planar variants store each channel in its own plane.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SampleFormat {
    /// Signed 16-bit integer, interleaved
    S16,
    /// 32-bit floating point, interleaved, range [-1.0, 1.0]
    F32,
    /// 32-bit floating point, one plane per channel
    F32p,
}

impl SampleFormat {
    /**
        Returns the number of bytes per sample.
    */
    pub const fn bytes_per_sample(self) -> usize {
        match self {
            Self::S16 => 2,
            Self::F32 | Self::F32p => 4,
        }
    }

    /**
        Returns true if this is a floating-point format.
    */
    pub const fn is_float(self) -> bool {
        matches!(self, Self::F32 | Self::F32p)
    }

    /**
        Returns true if each channel lives in a separate plane.
    */
    pub const fn is_planar(self) -> bool {
        matches!(self, Self::F32p)
    }
}

/**
    Audio channel layout.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChannelLayout {
    /// Single channel
    Mono,
    /// Left and right channels
    Stereo,
}

impl ChannelLayout {
    /**
        Returns the number of channels.
    */
    pub const fn channels(self) -> u16 {
        match self {
            Self::Mono => 1,
            Self::Stereo => 2,
        }
    }

    /**
        Create a channel layout from a channel count.
    */
    pub const fn from_count(count: u16) -> Option<Self> {
        match count {
            1 => Some(Self::Mono),
            2 => Some(Self::Stereo),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yuv420p_plane_sizes() {
        assert_eq!(PixelFormat::Yuv420p.plane_size(0, 320, 240), (320, 240));
        assert_eq!(PixelFormat::Yuv420p.plane_size(1, 320, 240), (160, 120));
        assert_eq!(PixelFormat::Yuv420p.plane_size(2, 321, 241), (161, 121));
    }

    #[test]
    fn sample_format_properties() {
        assert_eq!(SampleFormat::S16.bytes_per_sample(), 2);
        assert_eq!(SampleFormat::F32p.bytes_per_sample(), 4);
        assert!(SampleFormat::F32p.is_planar());
        assert!(!SampleFormat::F32.is_planar());
        assert!(SampleFormat::F32p.is_float());
        assert!(!SampleFormat::S16.is_float());
    }

    #[test]
    fn channel_layout_counts() {
        assert_eq!(ChannelLayout::Mono.channels(), 1);
        assert_eq!(ChannelLayout::from_count(2), Some(ChannelLayout::Stereo));
        assert_eq!(ChannelLayout::from_count(6), None);
    }
}
