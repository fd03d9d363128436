/*!
    Packet-level inspection of a written file.
*/

use std::path::Path;
use std::time::Duration;

use ffmpeg_next::media::Type;
use tracing::debug;

use ffmpeg_types::{Rational, Result};

use crate::convert::{duration_from_ticks, rational_from_ffmpeg};
use crate::probe::open_input;

/**
    What was seen in one stream while reading every packet.
*/
#[derive(Clone, Debug)]
pub struct StreamScan {
    pub time_base: Rational,
    pub packets: u64,
    pub keyframes: u64,
    /// False once any decode timestamp fails to increase.
    pub dts_monotonic: bool,
    last_dts: Option<i64>,
    first_pts: Option<i64>,
    end_pts: Option<i64>,
}

impl StreamScan {
    fn new(time_base: Rational) -> Self {
        Self {
            time_base,
            packets: 0,
            keyframes: 0,
            dts_monotonic: true,
            last_dts: None,
            first_pts: None,
            end_pts: None,
        }
    }

    fn observe(&mut self, pts: Option<i64>, dts: Option<i64>, duration: i64, is_key: bool) {
        self.packets += 1;
        if is_key {
            self.keyframes += 1;
        }

        if let Some(dts) = dts {
            if self.last_dts.is_some_and(|last| dts <= last) {
                self.dts_monotonic = false;
            }
            self.last_dts = Some(dts);
        }

        if let Some(pts) = pts {
            let end = pts + duration.max(0);
            self.first_pts = Some(self.first_pts.map_or(pts, |first| first.min(pts)));
            self.end_pts = Some(self.end_pts.map_or(end, |last| last.max(end)));
        }
    }

    /**
        Span from the earliest presentation timestamp to the end of the
        latest packet.
    */
    pub fn duration(&self) -> Option<Duration> {
        let (first, end) = (self.first_pts?, self.end_pts?);
        duration_from_ticks(end - first, self.time_base)
    }
}

/**
    Per-stream packet statistics for the best video and audio streams.
*/
#[derive(Clone, Debug, Default)]
pub struct PacketScan {
    pub video: Option<StreamScan>,
    pub audio: Option<StreamScan>,
}

/**
    Read every packet of a file without decoding.

    Used to check a written file: packet counts, keyframes, and whether decode
    timestamps increase strictly within each stream.
*/
pub fn scan_packets<P: AsRef<Path>>(path: P) -> Result<PacketScan> {
    let mut input = open_input(path.as_ref())?;

    let video_index = input.streams().best(Type::Video).map(|s| s.index());
    let audio_index = input.streams().best(Type::Audio).map(|s| s.index());

    let time_base_of = |index: usize| {
        input
            .stream(index)
            .map(|s| rational_from_ffmpeg(s.time_base()))
            .unwrap_or(Rational::new(1, 1))
    };
    let mut scan = PacketScan {
        video: video_index.map(|i| StreamScan::new(time_base_of(i))),
        audio: audio_index.map(|i| StreamScan::new(time_base_of(i))),
    };

    for (stream, packet) in input.packets() {
        let index = stream.index();
        let target = if Some(index) == video_index {
            scan.video.as_mut()
        } else if Some(index) == audio_index {
            scan.audio.as_mut()
        } else {
            None
        };

        if let Some(target) = target {
            target.observe(packet.pts(), packet.dts(), packet.duration(), packet.is_key());
        }
    }

    debug!(
        video_packets = scan.video.as_ref().map_or(0, |s| s.packets),
        audio_packets = scan.audio.as_ref().map_or(0, |s| s.packets),
        "scanned packets"
    );
    Ok(scan)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_packets_and_keyframes() {
        let mut scan = StreamScan::new(Rational::new(1, 30));
        scan.observe(Some(0), Some(0), 1, true);
        scan.observe(Some(1), Some(1), 1, false);
        scan.observe(Some(2), Some(2), 1, false);

        assert_eq!(scan.packets, 3);
        assert_eq!(scan.keyframes, 1);
        assert!(scan.dts_monotonic);
        assert_eq!(scan.duration(), Some(Duration::from_millis(100)));
    }

    #[test]
    fn repeated_dts_is_not_monotonic() {
        let mut scan = StreamScan::new(Rational::new(1, 1000));
        scan.observe(Some(0), Some(0), 10, true);
        scan.observe(Some(10), Some(0), 10, false);
        assert!(!scan.dts_monotonic);
    }

    #[test]
    fn reordered_pts_spans_the_whole_stream() {
        let mut scan = StreamScan::new(Rational::new(1, 10));
        scan.observe(Some(0), Some(-1), 1, true);
        scan.observe(Some(2), Some(0), 1, false);
        scan.observe(Some(1), Some(1), 1, false);
        assert!(scan.dts_monotonic);
        assert_eq!(scan.duration(), Some(Duration::from_millis(300)));
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = scan_packets("/nonexistent/clip.mp4").unwrap_err();
        assert!(matches!(err, ffmpeg_types::Error::Io(_)));
    }
}
