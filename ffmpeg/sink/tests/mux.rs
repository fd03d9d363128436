use std::path::Path;

use ffmpeg_encode::{
    AudioEncoder, AudioEncoderConfig, EncoderChoice, VideoEncoder, VideoEncoderConfig,
    select_encoder,
};
use ffmpeg_sink::{Error, Sink, SinkConfig, SinkStats};
use ffmpeg_types::{
    AudioFrame, ChannelLayout, CodecId, MediaDuration, Packet, PixelFormat, Pts, Rational,
    SampleFormat, StreamType, VideoFrame,
};

fn video_encoder(global_header: bool) -> VideoEncoder {
    let selected = select_encoder(&[EncoderChoice::Codec(CodecId::Mpeg4)], StreamType::Video)
        .expect("mpeg4 encoder");
    let config = VideoEncoderConfig::new(64, 48, Rational::new(30, 1))
        .with_bitrate(200_000)
        .with_global_header(global_header);
    VideoEncoder::open(&selected, config).expect("open video encoder")
}

fn audio_encoder(global_header: bool) -> AudioEncoder {
    let selected = select_encoder(&[EncoderChoice::Codec(CodecId::Aac)], StreamType::Audio)
        .expect("aac encoder");
    let config = AudioEncoderConfig::new(48000, ChannelLayout::Mono)
        .with_bitrate(64_000)
        .with_frame_size(1024)
        .with_global_header(global_header);
    AudioEncoder::open(&selected, config).expect("open audio encoder")
}

fn raw_packet(kind: StreamType, dts: i64, time_base: Rational) -> Packet {
    Packet {
        data: vec![0; 8],
        pts: Some(Pts(dts)),
        dts: Some(Pts(dts)),
        duration: MediaDuration(1),
        time_base,
        is_keyframe: true,
        stream_type: kind,
    }
}

#[test]
fn muxes_video_and_audio_into_mp4() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("clip.mp4");

    let mut sink = Sink::file(&path, SinkConfig::mp4()).expect("open sink");
    assert!(sink.needs_global_header());

    let mut video = video_encoder(true);
    let mut audio = audio_encoder(true);
    sink.add_video_stream(&video).expect("add video");
    sink.add_audio_stream(&audio).expect("add audio");
    sink.write_header().expect("header");

    let video_tb = sink.time_base(StreamType::Video).expect("video track");
    assert_ne!(video_tb, Rational::new(0, 1));

    let mut frame = VideoFrame::new(PixelFormat::Yuv420p, 64, 48);
    for i in 0..15 {
        frame.plane_mut(0).fill((i * 8) as u8);
        frame.pts = Some(Pts(i));
        for packet in video.encode(&frame).expect("encode video") {
            sink.write(&packet).expect("write video");
        }
    }
    for packet in video.flush().expect("flush video") {
        sink.write(&packet).expect("write video");
    }

    let mut samples = AudioFrame::new(SampleFormat::F32p, ChannelLayout::Mono, 48000, 1024);
    for i in 0..23 {
        samples.pts = Some(Pts(i * 1024));
        for packet in audio.encode(&samples).expect("encode audio") {
            sink.write(&packet).expect("write audio");
        }
    }
    for packet in audio.flush().expect("flush audio") {
        sink.write(&packet).expect("write audio");
    }

    let stats = sink.finish().expect("finish");
    assert_eq!(stats.video_packets, 15);
    assert!(stats.audio_packets >= 23);
    assert!(std::fs::metadata(&path).expect("output exists").len() > 0);
}

#[test]
fn rejects_packets_before_header() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut sink = Sink::file(dir.path().join("early.mp4"), SinkConfig::mp4()).expect("open sink");
    sink.add_stream(video_encoder(true).parameters().expect("parameters"))
        .expect("add video");

    let packet = raw_packet(StreamType::Video, 0, Rational::new(1, 30));
    assert!(matches!(sink.write(&packet), Err(Error::InvalidData(_))));
}

#[test]
fn rejects_streams_after_header() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut sink = Sink::file(dir.path().join("late.mp4"), SinkConfig::mp4()).expect("open sink");
    sink.add_stream(video_encoder(true).parameters().expect("parameters"))
        .expect("add video");
    sink.write_header().expect("header");

    let audio = audio_encoder(true).parameters().expect("parameters");
    assert!(matches!(sink.add_stream(audio), Err(Error::InvalidData(_))));
}

#[test]
fn rejects_duplicate_stream_kinds() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut sink = Sink::file(dir.path().join("dup.mp4"), SinkConfig::mp4()).expect("open sink");
    let parameters = video_encoder(true).parameters().expect("parameters");
    sink.add_stream(parameters.clone()).expect("add video");
    assert!(sink.add_stream(parameters).is_err());
}

#[test]
fn header_requires_a_stream() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut sink = Sink::file(dir.path().join("empty.mp4"), SinkConfig::mp4()).expect("open sink");
    assert!(matches!(sink.write_header(), Err(Error::InvalidData(_))));
}

#[test]
fn rejects_non_increasing_dts() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut sink = Sink::file(dir.path().join("dts.mp4"), SinkConfig::mp4()).expect("open sink");
    let encoder = video_encoder(true);
    sink.add_stream(encoder.parameters().expect("parameters")).expect("add video");
    sink.write_header().expect("header");

    let tb = encoder.time_base();
    sink.write(&raw_packet(StreamType::Video, 1, tb)).expect("first packet");
    assert!(sink.write(&raw_packet(StreamType::Video, 1, tb)).is_err());
    assert_eq!(sink.packets_written(StreamType::Video), 1);
}

#[test]
fn rejects_packets_for_missing_tracks() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut sink = Sink::file(dir.path().join("novideo.mp4"), SinkConfig::mp4()).expect("open sink");
    sink.add_stream(audio_encoder(true).parameters().expect("parameters"))
        .expect("add audio");
    sink.write_header().expect("header");

    let packet = raw_packet(StreamType::Video, 0, Rational::new(1, 30));
    assert!(matches!(sink.write(&packet), Err(Error::InvalidData(_))));
}

fn mux_video(path: &Path, frames: i64) -> Result<SinkStats, Error> {
    let mut sink = Sink::file(path, SinkConfig::mp4())?;
    let mut video = video_encoder(sink.needs_global_header());
    sink.add_video_stream(&video)?;
    sink.write_header()?;

    let mut frame = VideoFrame::new(PixelFormat::Yuv420p, 64, 48);
    for i in 0..frames {
        frame.plane_mut(0).fill((i * 8) as u8);
        frame.pts = Some(Pts(i));
        for packet in video.encode(&frame)? {
            sink.write(&packet)?;
        }
    }
    for packet in video.flush()? {
        sink.write(&packet)?;
    }
    sink.finish()
}

#[test]
fn allocating_a_sink_leaves_the_path_alone() {
    let dir = tempfile::tempdir().expect("tempdir");
    let existing = dir.path().join("existing.mp4");
    std::fs::write(&existing, b"keep me").expect("seed file");

    let mut sink = Sink::file(&existing, SinkConfig::mp4()).expect("allocate sink");
    sink.add_video_stream(&video_encoder(true)).expect("add video");
    drop(sink);
    assert_eq!(std::fs::read(&existing).expect("read back"), b"keep me");

    let missing = dir.path().join("missing").join("clip.mp4");
    let sink = Sink::file(&missing, SinkConfig::mp4()).expect("allocate sink");
    drop(sink);
    assert!(!missing.exists());
}

#[test]
fn unwritable_path_fails_at_the_header() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("missing").join("clip.mp4");

    let mut sink = Sink::file(&path, SinkConfig::mp4()).expect("allocate sink");
    sink.add_video_stream(&video_encoder(true)).expect("add video");
    let err = sink.write_header().unwrap_err();
    assert!(err.status() < 0);
    assert!(!path.exists());

    let err = mux_video(&path, 5).unwrap_err();
    assert!(err.status() < 0);
}

#[test]
fn encoder_failure_mid_stream_stops_the_writes() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut sink = Sink::file(dir.path().join("aborted.mp4"), SinkConfig::mp4()).expect("open sink");
    let mut video = video_encoder(true);
    sink.add_video_stream(&video).expect("add video");
    sink.write_header().expect("header");

    let mut frame = VideoFrame::new(PixelFormat::Yuv420p, 64, 48);
    frame.pts = Some(Pts(0));
    for packet in video.encode(&frame).expect("encode") {
        sink.write(&packet).expect("write");
    }
    for packet in video.flush().expect("flush") {
        sink.write(&packet).expect("write");
    }
    let written = sink.packets_written(StreamType::Video);

    frame.pts = Some(Pts(1));
    assert!(matches!(video.encode(&frame), Err(Error::InvalidData(_))));
    assert_eq!(sink.packets_written(StreamType::Video), written);
}

#[cfg(target_os = "linux")]
#[test]
fn write_failures_are_reported() {
    let full = Path::new("/dev/full");
    if !full.exists() {
        return;
    }
    let err = mux_video(full, 30).unwrap_err();
    assert!(err.status() < 0, "{err}");
}

#[test]
fn muxes_a_video_only_clip() {
    let dir = tempfile::tempdir().expect("tempdir");
    let stats = mux_video(&dir.path().join("short.mp4"), 10).expect("mux");
    assert_eq!(stats.video_packets, 10);
    assert_eq!(stats.audio_packets, 0);
}
