/*!
    Running the `ffmpeg` tool.
*/

use std::path::PathBuf;
use std::process::{Command, Stdio};

use tracing::{debug, info, warn};

use ffmpeg_types::{GENERIC_FAILURE, Result};

use crate::command::{CommandLine, PROGRAM_NAME, test_video_command};

/**
    Runs [`CommandLine`]s through an `ffmpeg` executable.

    The child inherits stdin, stdout and stderr, so FFmpeg's own progress and
    error output reach the terminal unchanged.
*/
#[derive(Clone, Debug)]
pub struct Executor {
    program: PathBuf,
}

impl Default for Executor {
    fn default() -> Self {
        Self {
            program: PathBuf::from(PROGRAM_NAME),
        }
    }
}

impl Executor {
    pub fn new() -> Self {
        Self::default()
    }

    /**
        Use a specific executable instead of `ffmpeg` from `PATH`.
    */
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    /**
        Run the command and wait for it.

        Returns the tool's exit code, or `-1` when it was killed by a signal.
        Failing to start the tool at all is an error.
    */
    pub fn run(&self, command: &CommandLine) -> Result<i32> {
        info!(argc = command.argc(), "executing {}", command);
        for (index, arg) in command.argv().iter().enumerate() {
            debug!("argv[{index}] = '{arg}'");
        }

        let status = Command::new(&self.program)
            .args(command.args())
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()?;

        let code = status.code().unwrap_or(GENERIC_FAILURE);
        if code != 0 {
            warn!(code, program = %self.program.display(), "ffmpeg exited with failure");
        }
        Ok(code)
    }

    /**
        Parse and run a flat command string, reporting an integer status.

        A missing command, or a tool that cannot be started, yields `-1`.
    */
    pub fn execute(&self, command: Option<&str>) -> i32 {
        let result = CommandLine::parse(command).and_then(|command| self.run(&command));
        match result {
            Ok(code) => code,
            Err(e) => {
                warn!("ffmpeg command failed: {e}");
                e.status()
            }
        }
    }

    /**
        Render the built-in test clip into `output`.
    */
    pub fn create_test_video(&self, output: &str) -> i32 {
        let command = test_video_command(output);
        info!(output, "creating test video with the ffmpeg tool");
        self.execute(Some(&command))
    }
}

/**
    [`Executor::execute`] with the default `ffmpeg` from `PATH`.
*/
pub fn execute(command: Option<&str>) -> i32 {
    Executor::default().execute(command)
}

/**
    [`Executor::create_test_video`] with the default `ffmpeg` from `PATH`.
*/
pub fn create_test_video(output: &str) -> i32 {
    Executor::default().create_test_video(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_command_returns_generic_failure() {
        assert_eq!(execute(None), -1);
    }

    #[test]
    fn unstartable_program_returns_generic_failure() {
        let executor = Executor::new().with_program("/nonexistent/bin/ffmpeg");
        assert_eq!(executor.execute(Some("-version")), -1);
    }

    #[cfg(unix)]
    #[test]
    fn forwards_exit_codes() {
        assert_eq!(Executor::new().with_program("true").execute(Some("-y out.mp4")), 0);
        assert_eq!(Executor::new().with_program("false").execute(Some("")), 1);
    }

    #[cfg(unix)]
    #[test]
    fn passes_arguments_without_program_name() {
        // `test` fails unless it receives exactly the two equal arguments
        let executor = Executor::new().with_program("test");
        assert_eq!(executor.execute(Some("a = a")), 0);
        assert_ne!(executor.execute(Some("a = b")), 0);
    }
}
