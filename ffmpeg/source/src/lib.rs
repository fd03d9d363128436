/*!
    Reading back written media for the helloworld ffmpeg crates.

    This crate opens finished files and reports what is in them: stream
    metadata through [`probe`], and packet counts and timestamp ordering
    through [`scan_packets`]. Nothing is decoded.
*/

pub use ffmpeg_types::{AudioStreamInfo, Error, MediaInfo, Result, VideoStreamInfo};

mod convert;
mod probe;
mod scan;

pub use probe::probe;
pub use scan::{PacketScan, StreamScan, scan_packets};
