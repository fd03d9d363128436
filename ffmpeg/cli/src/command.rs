/*!
    Flat command strings turned into an argument vector.
*/

use ffmpeg_types::{Error, Result};

/**
    Program name placed in `argv[0]`.
*/
pub const PROGRAM_NAME: &str = "ffmpeg";

/**
    An `ffmpeg` invocation split into arguments.

    The command string is split on single spaces only. Runs of spaces collapse,
    but quotes, escapes and tabs are not interpreted, so an argument can never
    contain a space. Paths with spaces need the library API instead.
*/
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandLine {
    argv: Vec<String>,
}

impl CommandLine {
    /**
        Build the argument vector for a command string given without the
        leading program name.

        A missing command is rejected before anything is built.
    */
    pub fn parse(command: Option<&str>) -> Result<Self> {
        let command = command.ok_or_else(|| Error::invalid_data("command line is missing"))?;

        let argv = std::iter::once(PROGRAM_NAME.to_owned())
            .chain(
                command
                    .split(' ')
                    .filter(|token| !token.is_empty())
                    .map(str::to_owned),
            )
            .collect();

        Ok(Self { argv })
    }

    /**
        The full argument vector, program name first.
    */
    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    /**
        The arguments after the program name.
    */
    pub fn args(&self) -> &[String] {
        &self.argv[1..]
    }

    pub fn argc(&self) -> usize {
        self.argv.len()
    }
}

impl std::fmt::Display for CommandLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.argv.join(" "))
    }
}

/**
    The command that renders a two second 320x240@30 test pattern with a
    silent mono 48 kHz track into `output`.

    Apple targets encode with VideoToolbox; everything else uses MPEG-4 Part 2
    at fixed quality.
*/
pub fn test_video_command(output: &str) -> String {
    let video_codec = if cfg!(any(target_os = "macos", target_os = "ios")) {
        "h264_videotoolbox"
    } else {
        "mpeg4 -q:v 5"
    };

    format!(
        "-hide_banner -f lavfi -i testsrc=size=320x240:rate=30 \
         -f lavfi -i anullsrc=channel_layout=mono:sample_rate=48000 \
         -t 2 -shortest -c:v {video_codec} -c:a aac -y {output}"
    )
}
