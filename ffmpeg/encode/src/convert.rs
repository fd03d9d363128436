/*!
    Conversions between our types and FFmpeg's.
*/

use ffmpeg_next::{
    ChannelLayout as FFmpegChannelLayout, Rational as FFmpegRational,
    codec::Id as CodecIdFFmpeg,
    ffi,
    format::{Pixel, Sample, sample::Type},
};

use ffmpeg_types::{ChannelLayout, CodecId, Error, PixelFormat, Rational, Result, SampleFormat};

pub(crate) fn codec_id_to_ffmpeg(codec: CodecId) -> CodecIdFFmpeg {
    match codec {
        CodecId::H264 => CodecIdFFmpeg::H264,
        CodecId::Mpeg4 => CodecIdFFmpeg::MPEG4,
        CodecId::Aac => CodecIdFFmpeg::AAC,
    }
}

/**
    Map an FFmpeg codec ID back to ours, if it is one we name.
*/
pub fn codec_id_from_ffmpeg(codec: CodecIdFFmpeg) -> Option<CodecId> {
    match codec {
        CodecIdFFmpeg::H264 => Some(CodecId::H264),
        CodecIdFFmpeg::MPEG4 => Some(CodecId::Mpeg4),
        CodecIdFFmpeg::AAC => Some(CodecId::Aac),
        _ => None,
    }
}

pub(crate) fn pixel_format_to_ffmpeg(format: PixelFormat) -> Pixel {
    match format {
        PixelFormat::Yuv420p => Pixel::YUV420P,
    }
}

pub(crate) fn sample_format_to_ffmpeg(format: SampleFormat) -> Sample {
    match format {
        SampleFormat::S16 => Sample::I16(Type::Packed),
        SampleFormat::F32 => Sample::F32(Type::Packed),
        SampleFormat::F32p => Sample::F32(Type::Planar),
    }
}

pub(crate) fn channel_layout_to_ffmpeg(layout: ChannelLayout) -> FFmpegChannelLayout {
    match layout {
        ChannelLayout::Mono => FFmpegChannelLayout::MONO,
        ChannelLayout::Stereo => FFmpegChannelLayout::STEREO,
    }
}

pub(crate) fn rational_to_ffmpeg(r: Rational) -> FFmpegRational {
    FFmpegRational::new(r.num, r.den)
}

pub(crate) fn rational_from_ffi(r: ffi::AVRational) -> Rational {
    Rational::new(r.num, r.den)
}

/**
    Wrap a failing FFmpeg call, keeping the AVERROR code.
*/
pub fn ffmpeg_error(context: &str, error: ffmpeg_next::Error) -> Error {
    let description = error.to_string();
    Error::ffmpeg(context, i32::from(error), description)
}

/**
    Ensure a reusable frame's buffers are not shared with an encoder that
    still holds a reference to them.
*/
pub(crate) fn make_writable(frame: &mut ffmpeg_next::Frame) -> Result<()> {
    let ret = unsafe { ffi::av_frame_make_writable(frame.as_mut_ptr()) };
    if ret < 0 {
        return Err(ffmpeg_error(
            "failed to make frame writable",
            ffmpeg_next::Error::from(ret),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codec_ids_map_both_ways() {
        for id in [CodecId::H264, CodecId::Mpeg4, CodecId::Aac] {
            assert_eq!(codec_id_from_ffmpeg(codec_id_to_ffmpeg(id)), Some(id));
        }
        assert_eq!(codec_id_from_ffmpeg(CodecIdFFmpeg::HEVC), None);
    }

    #[test]
    fn planar_float_maps_to_fltp() {
        assert_eq!(
            sample_format_to_ffmpeg(SampleFormat::F32p),
            Sample::F32(Type::Planar)
        );
    }

    #[test]
    fn ffmpeg_errors_keep_their_code() {
        let err = ffmpeg_error("failed to open encoder", ffmpeg_next::Error::InvalidData);
        assert!(err.status() < 0);
        assert!(err.to_string().starts_with("failed to open encoder: "));
    }
}
