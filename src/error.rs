//! The error type shared by the encoder, the decoder and the pipeline.

use thiserror::Error;

/// Everything that can go wrong while compressing or decompressing. None of
/// these errors are recoverable: the pipeline stops at the first one.
#[derive(Error, Debug)]
pub enum Error {
    /// The compressed stream ended in the middle of a block, or a block header
    /// could not be interpreted. 'position' is the offset of the block in the
    /// compressed stream.
    #[error("malformed stream at byte {position}: {reason}")]
    MalformedStream { position: u64, reason: &'static str },

    /// A block referenced bytes that were not decoded yet.
    #[error("block copies {length} bytes from {offset}, history has {history}")]
    OutOfRangeReference {
        offset: usize,
        length: usize,
        history: usize,
    },

    /// The encoder broke one of its own invariants.
    #[error("internal encoder error: {0}")]
    EncoderInternal(&'static str),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
