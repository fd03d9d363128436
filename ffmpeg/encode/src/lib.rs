/*!
    Media encoding for the helloworld ffmpeg crates.

    This crate turns raw frames into compressed packets. Encoders are chosen
    from a fallback chain, opened once, and then fed frames that are copied
    into a single reusable native frame.

    # Choosing an encoder

    ```ignore
    use ffmpeg_encode::{EncoderChoice, platform_video_candidates, select_encoder};
    use ffmpeg_types::{CodecId, StreamType};

    // VideoToolbox / libx264 / default H.264 on Apple, libx264 / MPEG-4 elsewhere
    let video = select_encoder(&platform_video_candidates(), StreamType::Video)?;

    // AAC has no fallback
    let audio = select_encoder(&[EncoderChoice::Codec(CodecId::Aac)], StreamType::Audio)?;
    ```

    # Encoding

    ```ignore
    use ffmpeg_encode::{VideoEncoder, VideoEncoderConfig};
    use ffmpeg_types::Rational;

    let config = VideoEncoderConfig::new(320, 240, Rational::new(30, 1))
        .with_bitrate(400_000)
        .with_global_header(sink.needs_global_header());

    let mut encoder = VideoEncoder::open(&video, config)?;

    for frame in video_frames {
        for packet in encoder.encode(&frame)? {
            sink.write(&packet)?;
        }
    }

    // Drain whatever the encoder is still holding
    for packet in encoder.flush()? {
        sink.write(&packet)?;
    }
    ```

    Packets carry the encoder's time base; the muxer rescales them to the
    track's time base.

    # Features

    - `nvenc`: try NVIDIA NVENC before libx264 on non-Apple targets
*/

pub use ffmpeg_types::{
    AudioFrame, ChannelLayout, CodecId, Error, Packet, PixelFormat, Rational, Result,
    SampleFormat, StreamType, VideoFrame,
};

mod audio;
mod config;
mod convert;
mod parameters;
mod select;
mod video;

pub use audio::AudioEncoder;
pub use config::{AudioEncoderConfig, EncoderChoice, VideoEncoderConfig, platform_video_candidates};
pub use convert::{codec_id_from_ffmpeg, ffmpeg_error};
pub use parameters::StreamParameters;
pub use select::{SelectedEncoder, select_encoder};
pub use video::VideoEncoder;
