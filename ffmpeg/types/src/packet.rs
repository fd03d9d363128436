/*!
    Encoded packets and their timing.
*/

use crate::Rational;

/**
    A timestamp in some time base.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pts(pub i64);

/**
    A duration in some time base.
*/
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MediaDuration(pub i64);

/**
    Which elementary stream a packet belongs to.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StreamType {
    Video,
    Audio,
}

impl std::fmt::Display for StreamType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Video => f.write_str("video"),
            Self::Audio => f.write_str("audio"),
        }
    }
}

/**
    One compressed unit produced by an encoder.

    Timestamps are expressed in `time_base`, which is the producing encoder's
    time base. The sink rescales them to the track's time base on write.
*/
#[derive(Clone, Debug)]
pub struct Packet {
    pub data: Vec<u8>,
    pub pts: Option<Pts>,
    pub dts: Option<Pts>,
    pub duration: MediaDuration,
    pub time_base: Rational,
    pub is_keyframe: bool,
    pub stream_type: StreamType,
}

impl Packet {
    /**
        Timestamps and duration rescaled into another time base.
    */
    pub fn rescaled_timing(&self, to: Rational) -> (Option<Pts>, Option<Pts>, MediaDuration) {
        let from = self.time_base;
        let pts = self.pts.map(|p| Pts(Rational::rescale(p.0, from, to)));
        let dts = self.dts.map(|d| Pts(Rational::rescale(d.0, from, to)));
        let duration = MediaDuration(Rational::rescale(self.duration.0, from, to));
        (pts, dts, duration)
    }
}
