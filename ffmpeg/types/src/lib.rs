/*!
    Shared types for the helloworld ffmpeg crates.

    This crate defines the vocabulary that crosses crate boundaries: raw frames
    going into encoders, packets coming out of them, the rationals used to
    express their timestamps, and the error type every crate returns. It has no
    dependency on FFmpeg, so it can be tested and consumed without the native
    libraries.
*/

mod codec;
mod error;
mod format;
mod frame;
mod packet;
mod rational;
mod stream;

pub use self::codec::CodecId;
pub use self::error::{Error, GENERIC_FAILURE, Result};
pub use self::format::{ChannelLayout, PixelFormat, SampleFormat};
pub use self::frame::{AudioFrame, VideoFrame};
pub use self::packet::{MediaDuration, Packet, Pts, StreamType};
pub use self::rational::Rational;
pub use self::stream::{AudioStreamInfo, MediaInfo, VideoStreamInfo};
