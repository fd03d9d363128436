/*!
    Opaque stream parameters for handing an opened encoder to a muxer.
*/

use ffmpeg_next::{codec, ffi};

use ffmpeg_types::{Rational, Result, StreamType};

use crate::convert::{ffmpeg_error, rational_from_ffi};

/**
    Codec parameters captured from an opened encoder.

    Dimensions, formats, bitrate and extradata (when the encoder was opened
    with global headers) travel together to the output stream. Kept opaque so
    ffmpeg-next types stay out of the public API.
*/
pub struct StreamParameters {
    parameters: codec::Parameters,
    time_base: Rational,
    stream_type: StreamType,
}

impl StreamParameters {
    /**
        Copy the parameters out of an opened encoder context.
    */
    pub(crate) fn from_context(
        context: &codec::Context,
        stream_type: StreamType,
    ) -> Result<Self> {
        let mut parameters = codec::Parameters::new();
        let (ret, time_base) = unsafe {
            let ctx = context.as_ptr();
            let ret = ffi::avcodec_parameters_from_context(parameters.as_mut_ptr(), ctx);
            (ret, rational_from_ffi((*ctx).time_base))
        };
        if ret < 0 {
            return Err(ffmpeg_error(
                "failed to copy encoder parameters",
                ffmpeg_next::Error::from(ret),
            ));
        }

        Ok(Self {
            parameters,
            time_base,
            stream_type,
        })
    }

    /**
        The encoder's time base, which a muxer should request for the track.
    */
    pub fn time_base(&self) -> Rational {
        self.time_base
    }

    pub fn stream_type(&self) -> StreamType {
        self.stream_type
    }

    /**
        Consume the wrapper, yielding the raw FFmpeg parameters for
        `ffmpeg-sink`.
    */
    pub fn into_parameters(self) -> codec::Parameters {
        self.parameters
    }
}

impl Clone for StreamParameters {
    fn clone(&self) -> Self {
        Self {
            parameters: self.parameters.clone(),
            time_base: self.time_base,
            stream_type: self.stream_type,
        }
    }
}

impl std::fmt::Debug for StreamParameters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamParameters")
            .field("codec_id", &self.parameters.id())
            .field("time_base", &self.time_base)
            .field("stream_type", &self.stream_type)
            .finish_non_exhaustive()
    }
}
