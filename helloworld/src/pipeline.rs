/*!
    The media synthesis pipeline.

    Writes a short MP4 with a generated picture and tone straight through the
    FFmpeg libraries: pick and open the encoders, open the file and write the
    header, encode every video frame, then every audio frame, flush both
    encoders and finalize the file.
    Each step runs only if the previous one succeeded, and everything opened
    along the way is released when the function returns, whichever step
    failed.
*/

use std::path::Path;

use ffmpeg_next::util::log;
use tracing::{error, info};

use ffmpeg_encode::{AudioEncoder, EncoderChoice, VideoEncoder, ffmpeg_error, select_encoder};
use ffmpeg_sink::{Sink, SinkConfig};
use ffmpeg_types::{
    AudioFrame, ChannelLayout, CodecId, Packet, PixelFormat, Pts, Result, SampleFormat,
    StreamType, VideoFrame,
};

use crate::config::ClipConfig;
use crate::synth::{fill_test_pattern, fill_tone};

/**
    What a successful run produced.
*/
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClipSummary {
    /// Name of the video encoder that was used, e.g. `libx264`.
    pub video_encoder: String,
    pub audio_encoder: String,
    pub video_frames: i64,
    pub audio_frames: u64,
    pub video_packets: u64,
    pub audio_packets: u64,
}

/**
    Synthesize a clip into `path`, creating or overwriting it.

    Both encoders are selected and opened before the file is opened, so a
    missing or unusable encoder leaves an existing file untouched and creates
    no new one. A failure after the header leaves a file that is not a valid
    MP4.
*/
pub fn write_test_clip(path: &Path, config: &ClipConfig) -> Result<ClipSummary> {
    config.validate()?;

    ffmpeg_next::init().map_err(|e| ffmpeg_error("failed to initialize FFmpeg", e))?;
    log::set_level(log::Level::Error);

    let video_choice = select_encoder(&config.video_encoder_candidates(), StreamType::Video)?;
    let audio_choice = select_encoder(&[EncoderChoice::Codec(CodecId::Aac)], StreamType::Audio)?;

    // Allocates the muxer only; the file is opened by `write_header`
    let mut sink = Sink::file(path, SinkConfig::mp4().with_fast_start(config.fast_start))?;
    let global_header = sink.needs_global_header();

    let mut video = VideoEncoder::open(&video_choice, config.video_encoder_config(global_header))?;
    let mut audio = AudioEncoder::open(&audio_choice, config.audio_encoder_config(global_header))?;

    sink.add_video_stream(&video)?;
    sink.add_audio_stream(&audio)?;
    sink.write_header()?;

    let mut picture = VideoFrame::new(PixelFormat::Yuv420p, config.width, config.height);
    for index in 0..config.video_frame_count() {
        fill_test_pattern(&mut picture, index);
        picture.pts = Some(Pts(index));
        write_packets(&mut sink, video.encode(&picture)?)?;
    }

    let frame_size = audio.frame_size();
    let mut samples = AudioFrame::new(
        SampleFormat::F32p,
        ChannelLayout::Mono,
        config.sample_rate,
        frame_size,
    );
    for index in 0..config.audio_frame_count(frame_size) {
        let first_sample = index * frame_size as i64;
        fill_tone(&mut samples, first_sample, config.tone)?;
        samples.pts = Some(Pts(first_sample));
        write_packets(&mut sink, audio.encode(&samples)?)?;
    }

    write_packets(&mut sink, video.flush()?)?;
    write_packets(&mut sink, audio.flush()?)?;

    let stats = sink.finish()?;

    let summary = ClipSummary {
        video_encoder: video.codec_name().to_owned(),
        audio_encoder: audio.codec_name().to_owned(),
        video_frames: video.frames_submitted(),
        audio_frames: audio.frames_submitted(),
        video_packets: stats.video_packets,
        audio_packets: stats.audio_packets,
    };
    info!(
        path = %path.display(),
        video_encoder = %summary.video_encoder,
        video_packets = summary.video_packets,
        audio_packets = summary.audio_packets,
        "wrote test clip"
    );
    Ok(summary)
}

fn write_packets(sink: &mut Sink, packets: Vec<Packet>) -> Result<()> {
    packets.iter().try_for_each(|packet| sink.write(packet))
}

/**
    Write the reference clip into `path` and report an integer status.

    Returns `0` on success, FFmpeg's own (negative) error code when an FFmpeg
    call failed, and `-1` for anything else.
*/
pub fn run_native(path: &str) -> i32 {
    match write_test_clip(Path::new(path), &ClipConfig::default()) {
        Ok(_) => 0,
        Err(e) => {
            error!(path, "native clip synthesis failed: {e}");
            e.status()
        }
    }
}

/**
    Render the test clip into `path` with the `ffmpeg` tool instead of the
    libraries.
*/
pub fn run_cli(path: &str) -> i32 {
    ffmpeg_cli::create_test_video(path)
}
