/*!
    C ABI exports.

    Each function takes a NUL-terminated UTF-8 string and returns an integer
    status: `0` on success, `-1` for a null or non-UTF-8 argument.
*/

use std::ffi::{CStr, c_char, c_int};

use ffmpeg_types::GENERIC_FAILURE;
use tracing::warn;

/**
    Borrow a C string argument as `&str`.

    # Safety

    `ptr` must be null or point to a NUL-terminated string that stays valid
    for the returned lifetime.
*/
unsafe fn borrow_str<'a>(ptr: *const c_char, what: &str) -> Option<&'a str> {
    if ptr.is_null() {
        warn!("{what} is null");
        return None;
    }
    match unsafe { CStr::from_ptr(ptr) }.to_str() {
        Ok(s) => Some(s),
        Err(_) => {
            warn!("{what} is not valid UTF-8");
            None
        }
    }
}

/**
    Synthesize the reference clip into `output_filename` through the FFmpeg
    libraries.

    # Safety

    `output_filename` must be null or a valid NUL-terminated string.
*/
#[unsafe(no_mangle)]
pub unsafe extern "C" fn helloworld_av_write(output_filename: *const c_char) -> c_int {
    match unsafe { borrow_str(output_filename, "output filename") } {
        Some(path) => crate::run_native(path),
        None => GENERIC_FAILURE,
    }
}

/**
    Run the `ffmpeg` tool with a space-separated command line (without the
    leading program name) and return its exit code.

    # Safety

    `command_line` must be null or a valid NUL-terminated string.
*/
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ffmpeg_execute(command_line: *const c_char) -> c_int {
    let command = unsafe { borrow_str(command_line, "command line") };
    if command.is_none() {
        return GENERIC_FAILURE;
    }
    ffmpeg_cli::execute(command)
}

/**
    Render the test clip into `output_filename` with the `ffmpeg` tool.

    # Safety

    `output_filename` must be null or a valid NUL-terminated string.
*/
#[unsafe(no_mangle)]
pub unsafe extern "C" fn create_test_video_cli(output_filename: *const c_char) -> c_int {
    match unsafe { borrow_str(output_filename, "output filename") } {
        Some(path) => crate::run_cli(path),
        None => GENERIC_FAILURE,
    }
}
