/*!
    Container output and muxing for the helloworld ffmpeg crates.

    This crate handles the output side of the pipeline. It takes encoded
    packets from `ffmpeg-encode` and writes them into MP4 files.

    ```ignore
    use ffmpeg_sink::{Sink, SinkConfig};

    let mut sink = Sink::file("out.mp4", SinkConfig::mp4())?;
    sink.add_stream(video_encoder.parameters()?)?;
    sink.add_stream(audio_encoder.parameters()?)?;
    sink.write_header()?;

    for packet in packets {
        sink.write(&packet)?;
    }

    let stats = sink.finish()?;
    ```
*/

pub use ffmpeg_types::{Error, Packet, Rational, Result, StreamType};

mod config;
mod sink;

pub use config::SinkConfig;
pub use sink::{Sink, SinkStats};
