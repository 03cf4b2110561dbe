use thiserror::Error;

/// Reasons a selected file never makes it into the track store.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("unsupported or corrupt audio: {0}")]
    Decoder(#[from] rodio::decoder::DecoderError),

    #[error("file decoded to no audio")]
    Empty,
}

/// A track with this name is already in the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("track already loaded: {0}")]
pub struct DuplicateTrack(pub String);
