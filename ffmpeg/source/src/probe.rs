/*!
    Probing functionality for extracting media metadata.
*/

use std::path::Path;
use std::time::Duration;

use ffmpeg_next::{format::context::Input as InputContext, media::Type};

use ffmpeg_types::{AudioStreamInfo, Error, MediaInfo, Result, VideoStreamInfo};

use crate::convert::{
    codec_id_from_ffmpeg, duration_from_ticks, ffmpeg_error, pixel_format_from_ffmpeg,
    rational_from_ffmpeg, sample_format_from_ffmpeg,
};

/**
    Probe a media file to extract metadata.

    This reads just enough of the file to determine stream information,
    duration, and codec details.

    # Example

    ```ignore
    let info = probe("clip.mp4")?;
    if let Some(video) = &info.video {
        println!("Video: {}x{}", video.width, video.height);
    }
    ```
*/
pub fn probe<P: AsRef<Path>>(path: P) -> Result<MediaInfo> {
    let input = open_input(path.as_ref())?;
    Ok(extract_media_info(&input))
}

pub(crate) fn open_input(path: &Path) -> Result<InputContext> {
    if !path.exists() {
        return Err(Error::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} does not exist", path.display()),
        )));
    }

    ffmpeg_next::init().map_err(|e| ffmpeg_error("failed to initialize FFmpeg", e))?;
    ffmpeg_next::format::input(path)
        .map_err(|e| ffmpeg_error(&format!("failed to open {}", path.display()), e))
}

fn extract_media_info(input_ctx: &InputContext) -> MediaInfo {
    let video = extract_video_stream_info(input_ctx);
    let audio = extract_audio_stream_info(input_ctx);

    // Container duration is in microseconds
    let duration = if input_ctx.duration() > 0 {
        Some(Duration::from_micros(input_ctx.duration() as u64))
    } else {
        video
            .as_ref()
            .and_then(|v| v.duration)
            .or_else(|| audio.as_ref().and_then(|a| a.duration))
    };

    MediaInfo {
        duration,
        stream_count: input_ctx.streams().count(),
        video,
        audio,
    }
}

fn stream_bitrate(stream: &ffmpeg_next::format::stream::Stream) -> Option<u64> {
    // SAFETY: the parameters pointer is owned by the open input context
    let bit_rate = unsafe { (*stream.parameters().as_ptr()).bit_rate };
    (bit_rate > 0).then_some(bit_rate as u64)
}

fn extract_video_stream_info(input_ctx: &InputContext) -> Option<VideoStreamInfo> {
    let stream = input_ctx.streams().best(Type::Video)?;
    let time_base = rational_from_ffmpeg(stream.time_base());

    let decoder_ctx =
        ffmpeg_next::codec::context::Context::from_parameters(stream.parameters()).ok()?;
    let decoder = decoder_ctx.decoder().video().ok()?;

    let frame_rate = if stream.avg_frame_rate().numerator() != 0 {
        Some(rational_from_ffmpeg(stream.avg_frame_rate()))
    } else if stream.rate().numerator() != 0 {
        Some(rational_from_ffmpeg(stream.rate()))
    } else {
        None
    };

    Some(VideoStreamInfo {
        width: decoder.width(),
        height: decoder.height(),
        pixel_format: pixel_format_from_ffmpeg(decoder.format()),
        frame_rate,
        time_base,
        duration: duration_from_ticks(stream.duration(), time_base),
        codec_id: codec_id_from_ffmpeg(stream.parameters().id()),
        bitrate: stream_bitrate(&stream),
    })
}

fn extract_audio_stream_info(input_ctx: &InputContext) -> Option<AudioStreamInfo> {
    let stream = input_ctx.streams().best(Type::Audio)?;
    let time_base = rational_from_ffmpeg(stream.time_base());

    let decoder_ctx =
        ffmpeg_next::codec::context::Context::from_parameters(stream.parameters()).ok()?;
    let decoder = decoder_ctx.decoder().audio().ok()?;

    Some(AudioStreamInfo {
        sample_rate: decoder.rate(),
        channel_count: decoder.channels(),
        sample_format: sample_format_from_ffmpeg(decoder.format()),
        time_base,
        duration: duration_from_ticks(stream.duration(), time_base),
        codec_id: codec_id_from_ffmpeg(stream.parameters().id()),
        bitrate: stream_bitrate(&stream),
    })
}
