/*!
    Error type shared by all crates.
*/

use thiserror::Error;

/**
    Status returned to C-style callers for failures that carry no FFmpeg code.
*/
pub const GENERIC_FAILURE: i32 = -1;

/**
    Errors produced while selecting encoders, encoding, muxing, or dispatching
    the command-line tool.
*/
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A failing FFmpeg call. `code` is the negative AVERROR value when known.
    #[error("{message}")]
    Codec { message: String, code: Option<i32> },

    #[error("no usable encoder (tried {0})")]
    EncoderNotFound(String),

    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("invalid data: {0}")]
    InvalidData(String),
}

impl Error {
    pub fn codec(message: impl Into<String>) -> Self {
        Self::Codec {
            message: message.into(),
            code: None,
        }
    }

    /**
        Wrap a failing FFmpeg call, keeping its numeric code for status reporting.
    */
    pub fn ffmpeg(context: impl AsRef<str>, code: i32, description: impl std::fmt::Display) -> Self {
        Self::Codec {
            message: format!("{}: {}", context.as_ref(), description),
            code: Some(code),
        }
    }

    pub fn unsupported_format(message: impl Into<String>) -> Self {
        Self::UnsupportedFormat(message.into())
    }

    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData(message.into())
    }

    /**
        Integer status for C-style callers.

        FFmpeg failures forward the library's own (negative) code, everything
        else collapses to [`GENERIC_FAILURE`]. Never returns zero.
    */
    pub fn status(&self) -> i32 {
        match self {
            Self::Codec {
                code: Some(code), ..
            } if *code != 0 => *code,
            _ => GENERIC_FAILURE,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ffmpeg_errors_forward_their_code() {
        let err = Error::ffmpeg("failed to write header", -22, "Invalid argument");
        assert_eq!(err.status(), -22);
        assert_eq!(err.to_string(), "failed to write header: Invalid argument");
    }

    #[test]
    fn other_errors_use_generic_status() {
        assert_eq!(Error::codec("boom").status(), GENERIC_FAILURE);
        assert_eq!(Error::invalid_data("null").status(), GENERIC_FAILURE);
        assert_eq!(
            Error::EncoderNotFound("libx264, mpeg4".into()).status(),
            GENERIC_FAILURE
        );

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert_eq!(Error::from(io).status(), GENERIC_FAILURE);
    }

    #[test]
    fn zero_code_is_never_reported_as_success() {
        let err = Error::Codec {
            message: "odd".into(),
            code: Some(0),
        };
        assert_eq!(err.status(), GENERIC_FAILURE);
    }
}
