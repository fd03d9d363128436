/*!
    Running the `ffmpeg` command-line tool from a flat command string.

    A command such as `"-i in.mp4 -c:v copy out.mp4"` is split on spaces,
    prefixed with the program name, and handed to the `ffmpeg` executable.
    The tool's exit code is returned as an integer status, with `-1` for a
    missing command or a tool that could not be started.

    ```ignore
    let status = ffmpeg_cli::execute(Some("-i in.mp4 -c:v copy out.mp4"));

    let status = ffmpeg_cli::Executor::new()
        .with_program("/opt/ffmpeg/bin/ffmpeg")
        .create_test_video("test.mp4");
    ```
*/

pub use ffmpeg_types::{Error, Result};

mod command;
mod executor;

pub use command::{CommandLine, PROGRAM_NAME, test_video_command};
pub use executor::{Executor, create_test_video, execute};
