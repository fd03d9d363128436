/*!
    Audio encoder implementation.
*/

use ffmpeg_next::{
    codec::{self, encoder::Audio as AudioEncoderFFmpeg},
    util::frame::audio::Audio as AudioFrameFFmpeg,
};
use tracing::debug;

use ffmpeg_types::{
    AudioFrame, ChannelLayout, CodecId, Error, MediaDuration, Packet, Pts, Rational, Result,
    SampleFormat, StreamType,
};

use crate::config::AudioEncoderConfig;
use crate::convert::{
    channel_layout_to_ffmpeg, ffmpeg_error, make_writable, rational_from_ffi, rational_to_ffmpeg,
    sample_format_to_ffmpeg,
};
use crate::parameters::StreamParameters;
use crate::select::SelectedEncoder;

/**
    Audio encoder.

    Encodes raw audio frames into compressed packets. Codecs such as AAC
    consume a fixed number of samples per frame; see [`frame_size`](Self::frame_size).
*/
pub struct AudioEncoder {
    encoder: AudioEncoderFFmpeg,
    frame: AudioFrameFFmpeg,
    name: String,
    codec_id: Option<CodecId>,
    time_base: Rational,
    sample_format: SampleFormat,
    channels: ChannelLayout,
    frame_size: usize,
    sample_count: i64,
    frames_submitted: u64,
    flushed: bool,
}

impl AudioEncoder {
    /**
        Configure and open the selected encoder.

        When the codec does not dictate a frame size, the configured one is
        used; opening fails if neither is known.
    */
    pub fn open(selected: &SelectedEncoder, config: AudioEncoderConfig) -> Result<Self> {
        let codec = selected.codec();

        let context = codec::context::Context::new_with_codec(codec);
        let mut encoder = context
            .encoder()
            .audio()
            .map_err(|e| ffmpeg_error("failed to create audio encoder context", e))?;

        encoder.set_rate(config.sample_rate as i32);
        encoder.set_format(sample_format_to_ffmpeg(config.sample_format));
        encoder.set_channel_layout(channel_layout_to_ffmpeg(config.channels));
        encoder.set_time_base(rational_to_ffmpeg(config.time_base()));

        if let Some(bitrate) = config.bitrate {
            encoder.set_bit_rate(bitrate as usize);
        }
        if let Some(frame_size) = config.frame_size {
            unsafe {
                (*encoder.as_mut_ptr()).frame_size = frame_size as i32;
            }
        }
        if config.global_header {
            encoder.set_flags(codec::Flags::GLOBAL_HEADER);
        }

        let encoder = encoder
            .open_as(codec)
            .map_err(|e| ffmpeg_error(&format!("failed to open {}", selected.name()), e))?;

        let time_base = unsafe { rational_from_ffi((*encoder.as_ptr()).time_base) };
        let frame_size = match encoder.frame_size() as usize {
            0 => config.frame_size.ok_or_else(|| {
                Error::invalid_data(format!(
                    "{} accepts any frame size and none was configured",
                    selected.name()
                ))
            })?,
            negotiated => negotiated,
        };

        let mut frame = AudioFrameFFmpeg::new(
            sample_format_to_ffmpeg(config.sample_format),
            frame_size,
            channel_layout_to_ffmpeg(config.channels),
        );
        frame.set_rate(config.sample_rate);

        debug!(
            encoder = selected.name(),
            sample_rate = config.sample_rate,
            frame_size,
            %time_base,
            "opened audio encoder"
        );

        Ok(Self {
            encoder,
            frame,
            name: selected.name().to_owned(),
            codec_id: selected.codec_id(),
            time_base,
            sample_format: config.sample_format,
            channels: config.channels,
            frame_size,
            sample_count: 0,
            frames_submitted: 0,
            flushed: false,
        })
    }

    pub fn codec_name(&self) -> &str {
        &self.name
    }

    pub fn codec_id(&self) -> Option<CodecId> {
        self.codec_id
    }

    /**
        Get the time base for encoded packets.
    */
    pub fn time_base(&self) -> Rational {
        self.time_base
    }

    /**
        Samples per channel the encoder consumes per frame.
    */
    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    /**
        Number of frames submitted so far.
    */
    pub fn frames_submitted(&self) -> u64 {
        self.frames_submitted
    }

    /**
        Parameters to describe this encoder's output stream to a muxer.
    */
    pub fn parameters(&self) -> Result<StreamParameters> {
        StreamParameters::from_context(&self.encoder, StreamType::Audio)
    }

    /**
        Encode an audio frame, returning encoded packets.

        Frames may be shorter than [`frame_size`](Self::frame_size) (the last
        frame of a stream usually is) but never longer. Frames without a
        timestamp continue from the samples already submitted.
    */
    pub fn encode(&mut self, frame: &AudioFrame) -> Result<Vec<Packet>> {
        if self.flushed {
            return Err(Error::invalid_data("audio encoder already flushed"));
        }
        if frame.samples > self.frame_size {
            return Err(Error::invalid_data(format!(
                "frame has {} samples, encoder takes at most {}",
                frame.samples, self.frame_size
            )));
        }
        if frame.format != self.sample_format || frame.channels != self.channels {
            return Err(Error::unsupported_format(format!(
                "frame is {:?} {:?}, encoder expects {:?} {:?}",
                frame.format, frame.channels, self.sample_format, self.channels
            )));
        }

        make_writable(&mut self.frame)?;
        self.frame.set_samples(frame.samples);
        for plane in 0..frame.plane_count() {
            let src = frame.plane(plane);
            self.frame.data_mut(plane)[..src.len()].copy_from_slice(src);
        }

        let pts = frame.pts.map_or(self.sample_count, |p| p.0);
        self.frame.set_pts(Some(pts));
        self.sample_count = pts + frame.samples as i64;
        self.frames_submitted += 1;

        self.encoder
            .send_frame(&self.frame)
            .map_err(|e| ffmpeg_error("failed to send audio frame", e))?;

        self.receive_packets()
    }

    /**
        Flush the encoder to get any remaining buffered packets.

        Call this at end of stream. Flushing twice yields nothing the second time.
    */
    pub fn flush(&mut self) -> Result<Vec<Packet>> {
        if self.flushed {
            return Ok(Vec::new());
        }
        self.flushed = true;

        self.encoder
            .send_eof()
            .map_err(|e| ffmpeg_error("failed to flush audio encoder", e))?;

        self.receive_packets()
    }

    fn receive_packets(&mut self) -> Result<Vec<Packet>> {
        let mut packets = Vec::new();
        let mut encoded = ffmpeg_next::Packet::empty();

        loop {
            match self.encoder.receive_packet(&mut encoded) {
                Ok(()) => packets.push(self.convert_packet(&encoded)),
                Err(ffmpeg_next::Error::Other { errno })
                    if errno == ffmpeg_next::util::error::EAGAIN =>
                {
                    break;
                }
                Err(ffmpeg_next::Error::Eof) => break,
                Err(e) => return Err(ffmpeg_error("failed to receive audio packet", e)),
            }
        }

        Ok(packets)
    }

    fn convert_packet(&self, pkt: &ffmpeg_next::Packet) -> Packet {
        Packet {
            data: pkt.data().map(|d| d.to_vec()).unwrap_or_default(),
            pts: pkt.pts().map(Pts),
            dts: pkt.dts().map(Pts),
            duration: MediaDuration(pkt.duration()),
            time_base: self.time_base,
            is_keyframe: pkt.is_key(),
            stream_type: StreamType::Audio,
        }
    }
}

impl std::fmt::Debug for AudioEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioEncoder")
            .field("name", &self.name)
            .field("time_base", &self.time_base)
            .field("frame_size", &self.frame_size)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EncoderChoice, select_encoder};

    fn aac_encoder() -> AudioEncoder {
        let selected = select_encoder(&[EncoderChoice::Codec(CodecId::Aac)], StreamType::Audio)
            .expect("aac encoder");
        let config = AudioEncoderConfig::new(48000, ChannelLayout::Mono)
            .with_bitrate(64_000)
            .with_frame_size(1024);
        AudioEncoder::open(&selected, config).expect("open aac")
    }

    #[test]
    fn aac_uses_1024_sample_frames() {
        let encoder = aac_encoder();
        assert_eq!(encoder.frame_size(), 1024);
        assert_eq!(encoder.time_base(), Rational::new(1, 48000));
    }

    #[test]
    fn flush_drains_delayed_packets() {
        let mut encoder = aac_encoder();
        let mut frame = AudioFrame::new(SampleFormat::F32p, ChannelLayout::Mono, 48000, 1024);

        let mut packets = Vec::new();
        for i in 0..20 {
            frame.write_f32_plane(0, (0..1024).map(|j| ((i * 1024 + j) as f32 * 0.01).sin() * 0.1));
            frame.pts = Some(Pts(i * 1024));
            packets.extend(encoder.encode(&frame).expect("encode"));
        }
        let before_flush = packets.len();
        packets.extend(encoder.flush().expect("flush"));

        assert_eq!(encoder.frames_submitted(), 20);
        assert!(packets.len() > before_flush);
        assert!(packets.len() >= 20);
        assert!(packets.iter().all(|p| p.stream_type == StreamType::Audio));
    }

    #[test]
    fn rejects_oversized_frames() {
        let mut encoder = aac_encoder();
        let frame = AudioFrame::new(SampleFormat::F32p, ChannelLayout::Mono, 48000, 2048);
        assert!(matches!(encoder.encode(&frame), Err(Error::InvalidData(_))));
    }

    #[test]
    fn rejects_wrong_layout() {
        let mut encoder = aac_encoder();
        let frame = AudioFrame::new(SampleFormat::F32p, ChannelLayout::Stereo, 48000, 1024);
        assert!(matches!(
            encoder.encode(&frame),
            Err(Error::UnsupportedFormat(_))
        ));
    }
}
