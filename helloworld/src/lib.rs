/*!
    Writes a short test MP4 two ways: through the FFmpeg libraries, or by
    running the `ffmpeg` tool.

    The library path ([`write_test_clip`]) encodes a generated grey-scale
    gradient and a 440 Hz tone with the best video encoder available (hardware
    first on Apple targets) and AAC, and muxes them into MP4. The tool path
    ([`run_cli`]) hands an equivalent `lavfi` command to `ffmpeg`.

    Both are also exported with a C ABI (`helloworld_av_write`,
    `ffmpeg_execute`, `create_test_video_cli`) and, with the `android`
    feature, as JNI methods of `com.example.helloworldffmpeg.HelloWorldFFmpeg`.

    ```ignore
    use helloworld_ffmpeg::{ClipConfig, write_test_clip};

    let summary = write_test_clip("hello.mp4".as_ref(), &ClipConfig::default())?;
    println!("encoded with {}", summary.video_encoder);
    ```
*/

mod c_api;
mod config;
mod pipeline;
mod synth;

#[cfg(feature = "android")]
mod jni_bridge;

pub use c_api::{create_test_video_cli, ffmpeg_execute, helloworld_av_write};
pub use config::ClipConfig;
pub use pipeline::{ClipSummary, run_cli, run_native, write_test_clip};
pub use synth::{Tone, fill_test_pattern, fill_tone};

#[cfg(feature = "android")]
pub use jni_bridge::VERSION_STRING;
