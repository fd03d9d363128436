/*!
    Video encoder implementation.
*/

use ffmpeg_next::{
    codec::{self, encoder::Video as VideoEncoderFFmpeg},
    util::frame::video::Video as VideoFrameFFmpeg,
};
use tracing::debug;

use ffmpeg_types::{
    CodecId, Error, MediaDuration, Packet, PixelFormat, Pts, Rational, Result, StreamType,
    VideoFrame,
};

use crate::config::VideoEncoderConfig;
use crate::convert::{
    ffmpeg_error, make_writable, pixel_format_to_ffmpeg, rational_from_ffi, rational_to_ffmpeg,
};
use crate::parameters::StreamParameters;
use crate::select::SelectedEncoder;

/**
    Video encoder.

    Encodes raw video frames into compressed packets. One native frame is
    allocated at open time and refilled for every call to [`encode`](Self::encode).
*/
pub struct VideoEncoder {
    encoder: VideoEncoderFFmpeg,
    frame: VideoFrameFFmpeg,
    name: String,
    codec_id: Option<CodecId>,
    time_base: Rational,
    pixel_format: PixelFormat,
    frame_count: i64,
    flushed: bool,
}

impl VideoEncoder {
    /**
        Configure and open the selected encoder.
    */
    pub fn open(selected: &SelectedEncoder, config: VideoEncoderConfig) -> Result<Self> {
        let codec = selected.codec();

        let context = codec::context::Context::new_with_codec(codec);
        let mut encoder = context
            .encoder()
            .video()
            .map_err(|e| ffmpeg_error("failed to create video encoder context", e))?;

        encoder.set_width(config.width);
        encoder.set_height(config.height);
        encoder.set_format(pixel_format_to_ffmpeg(config.pixel_format));
        encoder.set_frame_rate(Some(rational_to_ffmpeg(config.frame_rate)));
        encoder.set_time_base(rational_to_ffmpeg(config.time_base()));

        if let Some(bitrate) = config.bitrate {
            encoder.set_bit_rate(bitrate as usize);
        }
        if config.global_header {
            encoder.set_flags(codec::Flags::GLOBAL_HEADER);
        }

        let encoder = encoder
            .open_as(codec)
            .map_err(|e| ffmpeg_error(&format!("failed to open {}", selected.name()), e))?;

        // Encoders may adjust the time base while opening
        let time_base = unsafe { rational_from_ffi((*encoder.as_ptr()).time_base) };

        let frame = VideoFrameFFmpeg::new(
            pixel_format_to_ffmpeg(config.pixel_format),
            config.width,
            config.height,
        );

        debug!(
            encoder = selected.name(),
            width = config.width,
            height = config.height,
            %time_base,
            "opened video encoder"
        );

        Ok(Self {
            encoder,
            frame,
            name: selected.name().to_owned(),
            codec_id: selected.codec_id(),
            time_base,
            pixel_format: config.pixel_format,
            frame_count: 0,
            flushed: false,
        })
    }

    /**
        FFmpeg's name for the encoder, e.g. `libx264` or `mpeg4`.
    */
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
        Number of frames submitted so far.
    */
    pub fn frames_submitted(&self) -> i64 {
        self.frame_count
    }

    /**
        Parameters to describe this encoder's output stream to a muxer.
    */
    pub fn parameters(&self) -> Result<StreamParameters> {
        StreamParameters::from_context(&self.encoder, StreamType::Video)
    }

    /**
        Encode a video frame, returning encoded packets.

        May return zero, one, or multiple packets depending on encoder buffering.
        Frames without a timestamp are numbered by submission order.
    */
    pub fn encode(&mut self, frame: &VideoFrame) -> Result<Vec<Packet>> {
        if self.flushed {
            return Err(Error::invalid_data("video encoder already flushed"));
        }
        if frame.width != self.encoder.width() || frame.height != self.encoder.height() {
            return Err(Error::invalid_data(format!(
                "frame dimensions {}x{} don't match encoder {}x{}",
                frame.width,
                frame.height,
                self.encoder.width(),
                self.encoder.height()
            )));
        }
        if frame.format != self.pixel_format {
            return Err(Error::unsupported_format(format!(
                "frame is {:?}, encoder expects {:?}",
                frame.format, self.pixel_format
            )));
        }

        make_writable(&mut self.frame)?;
        copy_planes(&mut self.frame, frame);

        let pts = frame.pts.map_or(self.frame_count, |p| p.0);
        self.frame.set_pts(Some(pts));
        self.frame_count += 1;

        self.encoder
            .send_frame(&self.frame)
            .map_err(|e| ffmpeg_error("failed to send video frame", e))?;

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
            .map_err(|e| ffmpeg_error("failed to flush video encoder", e))?;

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
                Err(e) => return Err(ffmpeg_error("failed to receive video packet", e)),
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
            stream_type: StreamType::Video,
        }
    }
}

impl std::fmt::Debug for VideoEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoEncoder")
            .field("name", &self.name)
            .field("time_base", &self.time_base)
            .field("frame_count", &self.frame_count)
            .finish_non_exhaustive()
    }
}

/**
    Copy tightly packed planes into the native frame, honoring its row stride.
*/
fn copy_planes(dst: &mut VideoFrameFFmpeg, src: &VideoFrame) {
    for plane in 0..src.format.plane_count() {
        let (width, height) = src.plane_size(plane);
        let stride = dst.stride(plane);
        let src_plane = src.plane(plane);
        let dst_plane = dst.data_mut(plane);

        for row in 0..height {
            dst_plane[row * stride..row * stride + width]
                .copy_from_slice(&src_plane[row * width..(row + 1) * width]);
        }
    }
}
