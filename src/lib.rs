//! plz is a streaming Lempel–Ziv compressor whose back-references are
//! absolute offsets into everything that was decoded so far.

pub mod block;
mod error;
pub mod history;
pub mod lz;
pub mod pipeline;
pub mod utils;

pub use error::{Error, Result};
pub use lz::{compress_stream, decompress_stream};

/// The strategy used to search the history for matches. All strategies find
/// the same matches; they only differ in speed and memory.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum MatchStrategy {
    /// Compare the input against every offset in the history.
    Naive,
    /// Look up candidate offsets in an index of the history.
    #[default]
    Indexed,
}

impl MatchStrategy {
    /// Parse the name used on the command line.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "naive" => Some(Self::Naive),
            "indexed" => Some(Self::Indexed),
            _ => None,
        }
    }
}

/// The default number of bytes read from the source at a time.
pub const DEFAULT_CHUNK_SIZE: usize = 512;

/// Stores information about the environment.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Context {
    /// Selects the matcher.
    strategy: MatchStrategy,
    /// Specifies how many bytes are read from the source at a time.
    chunk_size: usize,
}

impl Context {
    pub fn new(strategy: MatchStrategy, chunk_size: usize) -> Self {
        Self {
            strategy,
            chunk_size: chunk_size.max(1),
        }
    }

    pub fn strategy(&self) -> MatchStrategy {
        self.strategy
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new(MatchStrategy::default(), DEFAULT_CHUNK_SIZE)
    }
}

/// A trait that defines the interface for encoding buffers.
pub trait Encoder<'a> {
    /// Creates a new Encoder that reads from 'input' and writes into 'output',
    /// with the encoder context 'ctx'.
    fn new(input: &'a [u8], output: &'a mut Vec<u8>, ctx: Context) -> Self;

    /// Encode the whole input buffer and return the number of bytes that were
    /// written into the output stream.
    fn encode(&mut self) -> Result<usize>;
}

/// A trait that defines the interface for decoding buffers.
pub trait Decoder<'a> {
    /// Creates a new Decoder that reads from 'input' and writes into 'output'.
    fn new(input: &'a [u8], output: &'a mut Vec<u8>) -> Self;

    /// Try to decode the buffer 'input', and return the number of input bytes
    /// that were consumed followed by the number of bytes written.
    fn decode(&mut self) -> Result<(usize, usize)>;
}
