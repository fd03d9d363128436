/*!
    Media sink implementation.
*/

use std::ffi::CString;
use std::path::{Path, PathBuf};
use std::ptr;

use ffmpeg_next::{
    Dictionary, Rational as FFmpegRational, ffi,
    format::{self, context::Output as OutputContext},
};
use tracing::{debug, info};

use ffmpeg_encode::{AudioEncoder, StreamParameters, VideoEncoder, ffmpeg_error};
use ffmpeg_types::{Error, Packet, Rational, Result, StreamType};

use crate::config::SinkConfig;

/**
    Media sink for writing to container files.

    A sink is built in three steps: add one stream per encoder, write the
    header, then write packets. The file is opened by the header write, so a
    sink that never gets that far leaves the path untouched. Packets arrive in
    their encoder's time base and are rescaled to the time base the muxer
    picked for the track.
*/
pub struct Sink {
    output: OutputContext,
    path: PathBuf,
    c_path: CString,
    config: SinkConfig,
    video: Option<Track>,
    audio: Option<Track>,
    header_written: bool,
}

#[derive(Debug)]
struct Track {
    index: usize,
    time_base: Rational,
    packets: u64,
    last_dts: Option<i64>,
}

/**
    Packet counts reported when a sink is finished.
*/
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SinkStats {
    pub video_packets: u64,
    pub audio_packets: u64,
}

impl Sink {
    /**
        Allocate the muxer for a file at `path`.

        Nothing is created or truncated here; the file is opened by
        [`write_header`](Self::write_header).
    */
    pub fn file<P: AsRef<Path>>(path: P, config: SinkConfig) -> Result<Self> {
        ffmpeg_next::init().map_err(|e| ffmpeg_error("failed to initialize FFmpeg", e))?;

        let path = path.as_ref();
        let c_path = path
            .to_str()
            .and_then(|p| CString::new(p).ok())
            .ok_or_else(|| {
                Error::invalid_data(format!("{} is not a usable output path", path.display()))
            })?;
        let output = allocate_output(&c_path, SinkConfig::MUXER)?;

        debug!(path = %path.display(), format = SinkConfig::MUXER, "allocated output");

        Ok(Self {
            output,
            path: path.to_path_buf(),
            c_path,
            config,
            video: None,
            audio: None,
            header_written: false,
        })
    }

    /**
        Whether the container wants codec headers out of band.

        Encoders feeding this sink should be opened with global headers when
        this is true.
    */
    pub fn needs_global_header(&self) -> bool {
        self.output
            .format()
            .flags()
            .contains(format::Flags::GLOBAL_HEADER)
    }

    /**
        Add the video track, fed by `encoder`.
    */
    pub fn add_video_stream(&mut self, encoder: &VideoEncoder) -> Result<usize> {
        self.add_stream(encoder.parameters()?)
    }

    /**
        Add the audio track, fed by `encoder`.
    */
    pub fn add_audio_stream(&mut self, encoder: &AudioEncoder) -> Result<usize> {
        self.add_stream(encoder.parameters()?)
    }

    /**
        Add a track described by an opened encoder's parameters.

        At most one video and one audio track are supported. Returns the
        track's stream index.
    */
    pub fn add_stream(&mut self, parameters: StreamParameters) -> Result<usize> {
        if self.header_written {
            return Err(Error::invalid_data("cannot add streams after the header"));
        }

        let kind = parameters.stream_type();
        if self.track(kind).is_some() {
            return Err(Error::invalid_data(format!("{kind} stream already added")));
        }

        let time_base = parameters.time_base();
        let parameters = parameters.into_parameters();

        let mut stream = self
            .output
            .add_stream(parameters.id())
            .map_err(|e| ffmpeg_error(&format!("failed to add {kind} stream"), e))?;
        stream.set_time_base(FFmpegRational::new(time_base.num, time_base.den));
        stream.set_parameters(parameters);
        unsafe {
            (*stream.parameters().as_mut_ptr()).codec_tag = 0;
        }
        let index = stream.index();

        let track = Track {
            index,
            time_base,
            packets: 0,
            last_dts: None,
        };
        match kind {
            StreamType::Video => self.video = Some(track),
            StreamType::Audio => self.audio = Some(track),
        }

        debug!(index, %time_base, "added {kind} stream");
        Ok(index)
    }

    /**
        Open the file for writing, creating or truncating it, and write the
        container header.

        The muxer may replace the requested track time bases here (MP4 uses
        a finer video clock), so the actual ones are read back afterwards.
    */
    pub fn write_header(&mut self) -> Result<()> {
        if self.header_written {
            return Err(Error::invalid_data("header already written"));
        }
        if self.video.is_none() && self.audio.is_none() {
            return Err(Error::invalid_data("no streams added"));
        }

        self.open_file()?;

        let mut options = Dictionary::new();
        if self.config.fast_start {
            options.set("movflags", "+faststart");
        }

        self.output
            .write_header_with(options)
            .map_err(|e| ffmpeg_error("failed to write header", e))?;
        self.header_written = true;

        for track in [self.video.as_mut(), self.audio.as_mut()].into_iter().flatten() {
            if let Some(stream) = self.output.stream(track.index) {
                let tb = stream.time_base();
                track.time_base = Rational::new(tb.numerator(), tb.denominator());
            }
        }

        info!(
            path = %self.path.display(),
            video_time_base = ?self.video.as_ref().map(|t| t.time_base),
            audio_time_base = ?self.audio.as_ref().map(|t| t.time_base),
            "wrote header"
        );
        Ok(())
    }

    /**
        Write a packet to the sink.

        Packets are routed by their stream type and rescaled into the track's
        time base. Decode timestamps must increase strictly within a track.
    */
    pub fn write(&mut self, packet: &Packet) -> Result<()> {
        if !self.header_written {
            return Err(Error::invalid_data("header not written"));
        }

        let kind = packet.stream_type;
        let (index, time_base, last_dts) = self
            .track(kind)
            .map(|t| (t.index, t.time_base, t.last_dts))
            .ok_or_else(|| Error::invalid_data(format!("no {kind} stream added")))?;

        let (pts, dts, duration) = packet.rescaled_timing(time_base);
        if let (Some(dts), Some(last)) = (dts, last_dts) {
            if dts.0 <= last {
                return Err(Error::invalid_data(format!(
                    "{kind} dts {} does not follow {last}",
                    dts.0
                )));
            }
        }

        let mut ffmpeg_pkt = if packet.data.is_empty() {
            ffmpeg_next::Packet::empty()
        } else {
            ffmpeg_next::Packet::copy(&packet.data)
        };
        ffmpeg_pkt.set_stream(index);
        ffmpeg_pkt.set_pts(pts.map(|p| p.0));
        ffmpeg_pkt.set_dts(dts.map(|d| d.0));
        ffmpeg_pkt.set_duration(duration.0);
        if packet.is_keyframe {
            ffmpeg_pkt.set_flags(ffmpeg_next::packet::Flags::KEY);
        }

        ffmpeg_pkt
            .write_interleaved(&mut self.output)
            .map_err(|e| ffmpeg_error(&format!("failed to write {kind} packet"), e))?;

        if let Some(track) = self.track_mut(kind) {
            track.packets += 1;
            if let Some(dts) = dts {
                track.last_dts = Some(dts.0);
            }
        }
        Ok(())
    }

    /**
        Number of packets written to a track so far.
    */
    pub fn packets_written(&self, kind: StreamType) -> u64 {
        self.track(kind).map_or(0, |t| t.packets)
    }

    /**
        The track's time base, as chosen by the muxer once the header is out.
    */
    pub fn time_base(&self, kind: StreamType) -> Option<Rational> {
        self.track(kind).map(|t| t.time_base)
    }

    /**
        Finish writing and close the sink.

        This writes any trailing metadata (duration, seeking index) and
        finalizes the container. The file is unplayable if this is not called.
    */
    pub fn finish(mut self) -> Result<SinkStats> {
        if !self.header_written {
            return Err(Error::invalid_data("header not written"));
        }

        self.output
            .write_trailer()
            .map_err(|e| ffmpeg_error("failed to write trailer", e))?;

        let stats = SinkStats {
            video_packets: self.packets_written(StreamType::Video),
            audio_packets: self.packets_written(StreamType::Audio),
        };
        info!(
            path = %self.path.display(),
            video_packets = stats.video_packets,
            audio_packets = stats.audio_packets,
            "finished output"
        );
        Ok(stats)
    }

    fn open_file(&mut self) -> Result<()> {
        if self.output.format().flags().contains(format::Flags::NO_FILE) {
            return Ok(());
        }

        // SAFETY: `pb` belongs to the output context, whose destructor closes it
        let code = unsafe {
            ffi::avio_open(
                &mut (*self.output.as_mut_ptr()).pb,
                self.c_path.as_ptr(),
                ffi::AVIO_FLAG_WRITE as i32,
            )
        };
        if code < 0 {
            return Err(ffmpeg_error(
                &format!("failed to open {}", self.path.display()),
                ffmpeg_next::Error::from(code),
            ));
        }

        debug!(path = %self.path.display(), "opened output file");
        Ok(())
    }

    fn track(&self, kind: StreamType) -> Option<&Track> {
        match kind {
            StreamType::Video => self.video.as_ref(),
            StreamType::Audio => self.audio.as_ref(),
        }
    }

    fn track_mut(&mut self, kind: StreamType) -> Option<&mut Track> {
        match kind {
            StreamType::Video => self.video.as_mut(),
            StreamType::Audio => self.audio.as_mut(),
        }
    }
}

/**
    Allocate a muxer context for `path` without opening any I/O.
*/
fn allocate_output(path: &CString, muxer: &str) -> Result<OutputContext> {
    let muxer_name = CString::new(muxer)
        .map_err(|_| Error::unsupported_format(format!("invalid muxer name {muxer:?}")))?;

    let mut context = ptr::null_mut();
    // SAFETY: both strings outlive the call; on success FFmpeg hands over a
    // context that `OutputContext` frees on drop
    let code = unsafe {
        ffi::avformat_alloc_output_context2(
            &mut context,
            ptr::null_mut(),
            muxer_name.as_ptr(),
            path.as_ptr(),
        )
    };
    if code < 0 {
        return Err(ffmpeg_error(
            &format!("failed to allocate {muxer} muxer"),
            ffmpeg_next::Error::from(code),
        ));
    }
    if context.is_null() {
        return Err(Error::codec(format!("{muxer} muxer was not allocated")));
    }

    Ok(unsafe { OutputContext::wrap(context) })
}

impl std::fmt::Debug for Sink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sink")
            .field("path", &self.path)
            .field("video", &self.video)
            .field("audio", &self.audio)
            .field("header_written", &self.header_written)
            .finish_non_exhaustive()
    }
}
