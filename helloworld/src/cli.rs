use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use ffmpeg_cli::Executor;
use helloworld_ffmpeg::{ClipConfig, write_test_clip};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Use the FFmpeg libraries directly
    Native,
    /// Run the ffmpeg command-line tool
    Cli,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Native => f.write_str("native"),
            Self::Cli => f.write_str("cli"),
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "helloworld-ffmpeg")]
#[command(about = "Write a short test MP4 through the FFmpeg libraries or the ffmpeg tool")]
pub struct Args {
    /// How to produce the file
    #[arg(value_enum)]
    pub mode: Mode,

    /// Output file (created or overwritten)
    pub output: PathBuf,

    /// Video encoder to try first, e.g. libx264 (native mode)
    #[arg(long, value_name = "NAME")]
    pub video_encoder: Option<String>,

    /// Clip length in seconds (native mode)
    #[arg(long, value_name = "SECS", default_value_t = 2)]
    pub duration: u32,

    /// Put the MP4 index at the front of the file (native mode)
    #[arg(long)]
    pub fast_start: bool,

    /// Print what ended up in the file after a successful run
    #[arg(long)]
    pub probe: bool,

    /// ffmpeg executable to run (cli mode)
    #[arg(long, value_name = "PATH")]
    pub ffmpeg_bin: Option<PathBuf>,
}

impl Args {
    pub fn run(self) -> Result<i32> {
        let output = self
            .output
            .to_str()
            .context("output path must be valid UTF-8")?;

        println!("FFmpeg Hello World Test - {}", std::env::consts::OS);
        println!("Mode: {}", self.mode);
        println!("Output: {output}");
        println!("=====================================");

        let status = match self.mode {
            Mode::Native => {
                println!("Using FFmpeg native API...");
                self.run_native()
            }
            Mode::Cli => {
                println!("Using embedded FFmpeg CLI...");
                let executor = match &self.ffmpeg_bin {
                    Some(program) => Executor::new().with_program(program),
                    None => Executor::new(),
                };
                executor.create_test_video(output)
            }
        };

        if status == 0 {
            println!("✅ Success: Created {output} using {} method", self.mode);
            if self.probe {
                print_probe(&self.output)?;
            }
        } else {
            println!("❌ Failed: Error {status} creating {output}");
        }

        Ok(status)
    }

    fn run_native(&self) -> i32 {
        let mut config = ClipConfig::default()
            .with_duration(self.duration)
            .with_fast_start(self.fast_start);
        if let Some(name) = &self.video_encoder {
            config = config.with_preferred_video_encoder(name);
        }

        match write_test_clip(&self.output, &config) {
            Ok(summary) => {
                println!(
                    "Encoded {} video frames with {} and {} audio frames with {}",
                    summary.video_frames,
                    summary.video_encoder,
                    summary.audio_frames,
                    summary.audio_encoder
                );
                0
            }
            Err(e) => {
                eprintln!("Error: {e}");
                e.status()
            }
        }
    }
}

fn print_probe(path: &Path) -> Result<()> {
    let info = ffmpeg_source::probe(path)
        .with_context(|| format!("failed to probe {}", path.display()))?;
    let scan = ffmpeg_source::scan_packets(path)
        .with_context(|| format!("failed to read packets of {}", path.display()))?;

    println!();
    println!("Streams: {}", info.stream_count);
    if let Some(duration) = info.duration {
        println!("Duration: {:.3}s", duration.as_secs_f64());
    }

    if let Some(video) = &info.video {
        let codec = video.codec_id.map_or("unknown".to_owned(), |c| c.to_string());
        let fps = video.fps().map_or("?".to_owned(), |fps| format!("{fps:.2}"));
        println!(
            "Video: {codec} {}x{} @ {fps} fps, time base {}",
            video.width, video.height, video.time_base
        );
    }
    if let Some(stream) = &scan.video {
        println!(
            "  {} packets, {} keyframes, dts increasing: {}",
            stream.packets, stream.keyframes, stream.dts_monotonic
        );
    }

    if let Some(audio) = &info.audio {
        let codec = audio.codec_id.map_or("unknown".to_owned(), |c| c.to_string());
        println!(
            "Audio: {codec} {} Hz, {} channel(s), time base {}",
            audio.sample_rate, audio.channel_count, audio.time_base
        );
    }
    if let Some(stream) = &scan.audio {
        println!(
            "  {} packets, dts increasing: {}",
            stream.packets, stream.dts_monotonic
        );
    }

    Ok(())
}
