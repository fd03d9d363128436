/*!
    Conversion utilities between ffmpeg-next types and ffmpeg-types.
*/

use std::time::Duration;

use ffmpeg_next::{
    codec::Id,
    format::{Pixel, Sample, sample::Type},
};

use ffmpeg_types::{CodecId, Error, PixelFormat, Rational, SampleFormat};

pub fn rational_from_ffmpeg(r: ffmpeg_next::Rational) -> Rational {
    Rational::new(r.numerator(), r.denominator())
}

pub fn pixel_format_from_ffmpeg(format: Pixel) -> Option<PixelFormat> {
    match format {
        Pixel::YUV420P => Some(PixelFormat::Yuv420p),
        _ => None,
    }
}

pub fn sample_format_from_ffmpeg(format: Sample) -> Option<SampleFormat> {
    match format {
        Sample::I16(Type::Packed) => Some(SampleFormat::S16),
        Sample::F32(Type::Packed) => Some(SampleFormat::F32),
        Sample::F32(Type::Planar) => Some(SampleFormat::F32p),
        _ => None,
    }
}

pub fn codec_id_from_ffmpeg(id: Id) -> Option<CodecId> {
    match id {
        Id::H264 => Some(CodecId::H264),
        Id::MPEG4 => Some(CodecId::Mpeg4),
        Id::AAC => Some(CodecId::Aac),
        _ => None,
    }
}

/**
    Convert a tick count in `time_base` to wall-clock time.

    Returns None for unknown (non-positive) durations.
*/
pub fn duration_from_ticks(ticks: i64, time_base: Rational) -> Option<Duration> {
    if ticks <= 0 || time_base.den == 0 {
        return None;
    }
    Some(Duration::from_secs_f64(ticks as f64 * time_base.to_f64()))
}

pub fn ffmpeg_error(context: &str, error: ffmpeg_next::Error) -> Error {
    let description = error.to_string();
    Error::ffmpeg(context, i32::from(error), description)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_to_duration() {
        let d = duration_from_ticks(30720, Rational::new(1, 15360)).expect("duration");
        assert_eq!(d, Duration::from_secs(2));
        assert_eq!(duration_from_ticks(0, Rational::new(1, 15360)), None);
        assert_eq!(duration_from_ticks(-5, Rational::new(1, 1000)), None);
    }

    #[test]
    fn planar_float_is_recognized() {
        assert_eq!(
            sample_format_from_ffmpeg(Sample::F32(Type::Planar)),
            Some(SampleFormat::F32p)
        );
        assert_eq!(sample_format_from_ffmpeg(Sample::F64(Type::Packed)), None);
    }
}
