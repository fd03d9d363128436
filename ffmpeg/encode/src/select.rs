/*!
    Encoder lookup over a fallback chain.
*/

use ffmpeg_next::{codec::Codec, media};
use tracing::{debug, info};

use ffmpeg_types::{CodecId, Error, Result, StreamType};

use crate::config::EncoderChoice;
use crate::convert::{codec_id_from_ffmpeg, codec_id_to_ffmpeg, ffmpeg_error};

/**
    An encoder found by [`select_encoder`], ready to be opened.
*/
#[derive(Clone)]
pub struct SelectedEncoder {
    codec: Codec,
    choice: EncoderChoice,
}

impl SelectedEncoder {
    pub(crate) fn codec(&self) -> Codec {
        self.codec
    }

    /**
        The chain entry that matched.
    */
    pub fn choice(&self) -> &EncoderChoice {
        &self.choice
    }

    /**
        FFmpeg's name for the encoder implementation, e.g. `libx264`.
    */
    pub fn name(&self) -> &str {
        self.codec.name()
    }

    /**
        The codec the encoder produces, if it is one we name.
    */
    pub fn codec_id(&self) -> Option<CodecId> {
        codec_id_from_ffmpeg(self.codec.id())
    }
}

impl std::fmt::Debug for SelectedEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectedEncoder")
            .field("name", &self.name())
            .field("choice", &self.choice)
            .finish_non_exhaustive()
    }
}

/**
    Pick the first encoder in `candidates` that FFmpeg provides for the
    requested kind of stream.

    Entries that are missing from the build, or that encode the wrong kind of
    media, are skipped. Fails with [`Error::EncoderNotFound`] listing every
    entry when nothing matches.
*/
pub fn select_encoder(candidates: &[EncoderChoice], kind: StreamType) -> Result<SelectedEncoder> {
    ffmpeg_next::init().map_err(|e| ffmpeg_error("failed to initialize FFmpeg", e))?;

    let wanted = match kind {
        StreamType::Video => media::Type::Video,
        StreamType::Audio => media::Type::Audio,
    };

    for choice in candidates {
        let found = match choice {
            EncoderChoice::Named(name) => ffmpeg_next::encoder::find_by_name(name),
            EncoderChoice::Codec(id) => ffmpeg_next::encoder::find(codec_id_to_ffmpeg(*id)),
        };

        match found {
            Some(codec) if codec.is_encoder() && codec.medium() == wanted => {
                info!(encoder = codec.name(), %choice, "selected {kind} encoder");
                return Ok(SelectedEncoder {
                    codec,
                    choice: choice.clone(),
                });
            }
            Some(codec) => {
                debug!(encoder = codec.name(), %choice, "skipping, not a {kind} encoder");
            }
            None => {
                debug!(%choice, "encoder not available");
            }
        }
    }

    let tried = candidates
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    Err(Error::EncoderNotFound(tried))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aac_is_always_available() {
        let selected = select_encoder(&[EncoderChoice::Codec(CodecId::Aac)], StreamType::Audio)
            .expect("aac encoder");
        assert_eq!(selected.codec_id(), Some(CodecId::Aac));
    }

    #[test]
    fn missing_entries_fall_through() {
        let chain = [
            EncoderChoice::named("definitely_not_an_encoder"),
            EncoderChoice::Codec(CodecId::Mpeg4),
        ];
        let selected = select_encoder(&chain, StreamType::Video).expect("mpeg4 encoder");
        assert_eq!(selected.choice(), &chain[1]);
        assert_eq!(selected.codec_id(), Some(CodecId::Mpeg4));
    }

    #[test]
    fn wrong_media_type_is_skipped() {
        let err = select_encoder(&[EncoderChoice::Codec(CodecId::Aac)], StreamType::Video)
            .unwrap_err();
        assert!(matches!(err, Error::EncoderNotFound(_)));
    }

    #[test]
    fn exhausted_chain_lists_every_candidate() {
        let chain = [EncoderChoice::named("nope_a"), EncoderChoice::named("nope_b")];
        match select_encoder(&chain, StreamType::Video) {
            Err(Error::EncoderNotFound(tried)) => assert_eq!(tried, "nope_a, nope_b"),
            other => panic!("expected EncoderNotFound, got {other:?}"),
        }
    }
}
