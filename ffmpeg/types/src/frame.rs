/*!
    Raw (uncompressed) frames handed to encoders.

    Frames own a single tightly packed buffer holding every plane back to back,
    with no row padding. They are meant to be allocated once and overwritten in
    place for each new picture or block of samples.
*/

use crate::{ChannelLayout, PixelFormat, Pts, SampleFormat};

/**
    A raw planar video frame.
*/
#[derive(Clone, Debug)]
pub struct VideoFrame {
    /// Plane data, planes stored consecutively without row padding.
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    /// Presentation timestamp in the encoder's time base.
    pub pts: Option<Pts>,
}

impl VideoFrame {
    /**
        Allocate a zeroed frame of the given format and size.
    */
    pub fn new(format: PixelFormat, width: u32, height: u32) -> Self {
        let len = (0..format.plane_count())
            .map(|plane| {
                let (w, h) = format.plane_size(plane, width, height);
                w * h
            })
            .sum();

        Self {
            data: vec![0; len],
            width,
            height,
            format,
            pts: None,
        }
    }

    /**
        Returns the (width, height) of a plane in bytes/rows.
    */
    pub fn plane_size(&self, plane: usize) -> (usize, usize) {
        self.format.plane_size(plane, self.width, self.height)
    }

    fn plane_range(&self, plane: usize) -> std::ops::Range<usize> {
        let start = (0..plane)
            .map(|p| {
                let (w, h) = self.plane_size(p);
                w * h
            })
            .sum();
        let (w, h) = self.plane_size(plane);
        start..start + w * h
    }

    pub fn plane(&self, plane: usize) -> &[u8] {
        let range = self.plane_range(plane);
        &self.data[range]
    }

    pub fn plane_mut(&mut self, plane: usize) -> &mut [u8] {
        let range = self.plane_range(plane);
        &mut self.data[range]
    }
}

/**
    A raw audio frame.

    Interleaved formats keep every channel in plane 0; planar formats keep one
    plane per channel, each `samples * bytes_per_sample` long.
*/
#[derive(Clone, Debug)]
pub struct AudioFrame {
    pub data: Vec<u8>,
    /// Number of samples per channel.
    pub samples: usize,
    pub sample_rate: u32,
    pub channels: ChannelLayout,
    pub format: SampleFormat,
    /// Presentation timestamp in the encoder's time base.
    pub pts: Option<Pts>,
}

impl AudioFrame {
    /**
        Allocate a silent frame.
    */
    pub fn new(
        format: SampleFormat,
        channels: ChannelLayout,
        sample_rate: u32,
        samples: usize,
    ) -> Self {
        let len = samples * channels.channels() as usize * format.bytes_per_sample();
        Self {
            data: vec![0; len],
            samples,
            sample_rate,
            channels,
            format,
            pts: None,
        }
    }

    pub fn plane_count(&self) -> usize {
        if self.format.is_planar() {
            self.channels.channels() as usize
        } else {
            1
        }
    }

    fn plane_len(&self) -> usize {
        self.data.len() / self.plane_count()
    }

    pub fn plane(&self, plane: usize) -> &[u8] {
        let len = self.plane_len();
        &self.data[plane * len..(plane + 1) * len]
    }

    pub fn plane_mut(&mut self, plane: usize) -> &mut [u8] {
        let len = self.plane_len();
        &mut self.data[plane * len..(plane + 1) * len]
    }

    /**
        Overwrite a plane of a float frame with native-endian `f32` samples.
    */
    pub fn write_f32_plane(&mut self, plane: usize, samples: impl IntoIterator<Item = f32>) {
        debug_assert!(self.format.is_float() && self.format.bytes_per_sample() == 4);
        for (dst, sample) in self.plane_mut(plane).chunks_exact_mut(4).zip(samples) {
            dst.copy_from_slice(&sample.to_ne_bytes());
        }
    }

    /**
        Read back a plane of a float frame.
    */
    pub fn f32_plane(&self, plane: usize) -> Vec<f32> {
        self.plane(plane)
            .chunks_exact(4)
            .map(|b| f32::from_ne_bytes([b[0], b[1], b[2], b[3]]))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn video_frame_allocates_all_planes() {
        let frame = VideoFrame::new(PixelFormat::Yuv420p, 320, 240);
        assert_eq!(frame.data.len(), 320 * 240 + 2 * 160 * 120);
        assert_eq!(frame.plane(0).len(), 320 * 240);
        assert_eq!(frame.plane(1).len(), 160 * 120);
        assert_eq!(frame.plane(2).len(), 160 * 120);
    }

    #[test]
    fn video_planes_do_not_overlap() {
        let mut frame = VideoFrame::new(PixelFormat::Yuv420p, 4, 2);
        frame.plane_mut(0).fill(1);
        frame.plane_mut(1).fill(2);
        frame.plane_mut(2).fill(3);
        assert_eq!(frame.data, vec![1, 1, 1, 1, 1, 1, 1, 1, 2, 2, 3, 3]);
    }

    #[test]
    fn planar_audio_has_one_plane_per_channel() {
        let mono = AudioFrame::new(SampleFormat::F32p, ChannelLayout::Mono, 48000, 1024);
        assert_eq!(mono.plane_count(), 1);
        assert_eq!(mono.plane(0).len(), 4096);

        let stereo = AudioFrame::new(SampleFormat::F32p, ChannelLayout::Stereo, 48000, 1024);
        assert_eq!(stereo.plane_count(), 2);
        assert_eq!(stereo.plane(1).len(), 4096);

        let packed = AudioFrame::new(SampleFormat::F32, ChannelLayout::Stereo, 48000, 1024);
        assert_eq!(packed.plane_count(), 1);
        assert_eq!(packed.plane(0).len(), 8192);
    }

    #[test]
    fn f32_plane_round_trip() {
        let mut frame = AudioFrame::new(SampleFormat::F32p, ChannelLayout::Mono, 48000, 3);
        frame.write_f32_plane(0, [0.5, -0.25, 0.125]);
        assert_eq!(frame.f32_plane(0), vec![0.5, -0.25, 0.125]);
    }
}
