//! The plz encoder and decoder. The encoder splits its input into blocks: the
//! longest prefix of the pending input that already occurs in the consumed
//! input, followed by the next byte. The decoder replays the blocks.
//!
//! Both directions run as pipelines of stages:
//!   encoder: bytes -> BlockProducer -> BlockWriter -> bytes
//!   decoder: bytes -> BlockReader -> Expander -> bytes

use std::io::{Read, Write};

use crate::block::{Block, BlockReader, BlockWriter};
use crate::history::Expander;
use crate::lz::matcher::{select_matcher, MatchFinder};
use crate::pipeline::{compose, pump, Chain, Stage, Step};
use crate::{Context, Decoder, Encoder, Error, Result};

/// The pipeline stage that turns raw bytes into blocks.
pub struct BlockProducer {
    /// The input. Bytes before 'cursor' were consumed and form the history,
    /// and the rest is pending.
    data: Vec<u8>,
    cursor: usize,
    matcher: Box<dyn MatchFinder>,
    finished: bool,
    blocks: usize,
}

impl BlockProducer {
    pub fn new(ctx: Context) -> Self {
        Self::with_matcher(select_matcher(ctx.strategy))
    }

    pub fn with_matcher(matcher: Box<dyn MatchFinder>) -> Self {
        Self {
            data: Vec::new(),
            cursor: 0,
            matcher,
            finished: false,
            blocks: 0,
        }
    }

    /// Returns the number of blocks produced so far.
    pub fn blocks(&self) -> usize {
        self.blocks
    }

    /// Consume the bytes that 'block' covers and hand it downstream.
    fn emit(&mut self, block: Block) -> Step<Block> {
        self.cursor += block.expanded_len();
        self.blocks += 1;
        log::trace!("Produced {:?}.", block);
        Step::Emit(block)
    }
}

impl Stage for BlockProducer {
    type Input = Vec<u8>;
    type Output = Block;

    fn feed(&mut self, bytes: Vec<u8>) {
        self.data.extend(bytes);
    }

    fn finish(&mut self) {
        self.finished = true;
    }

    fn poll(&mut self) -> Result<Step<Block>> {
        let (history, pending) = self.data.split_at(self.cursor);
        if pending.is_empty() {
            if !self.finished {
                return Ok(Step::NeedInput);
            }
            log::info!(
                "Encoded {} bytes into {} blocks.",
                self.data.len(),
                self.blocks
            );
            return Ok(Step::Done);
        }

        let mat = self.matcher.find_match(history, pending);
        if mat.end > history.len() || mat.len() > pending.len() {
            return Err(Error::EncoderInternal(
                "match is outside of the history",
            ));
        }

        // The match stops before the end of the pending input, so more input
        // can't make it longer. The byte that broke the match is the literal.
        if mat.len() < pending.len() {
            let literal = pending[mat.len()];
            let block = Block::new(mat.len(), mat.start, Some(literal));
            return Ok(self.emit(block));
        }

        // The whole pending input matched. Wait for more input to see if the
        // match grows, unless there is none.
        if !self.finished {
            return Ok(Step::NeedInput);
        }
        let block = Block::new(mat.len(), mat.start, None);
        Ok(self.emit(block))
    }
}

/// The full compression pipeline.
pub type EncodePipeline = Chain<BlockProducer, BlockWriter>;
/// The full decompression pipeline.
pub type DecodePipeline = Chain<BlockReader, Expander>;

pub fn encode_pipeline(ctx: Context) -> EncodePipeline {
    compose(BlockProducer::new(ctx), BlockWriter::new())
}

pub fn decode_pipeline() -> DecodePipeline {
    compose(BlockReader::new(), Expander::new())
}

/// Compress everything that 'input' yields into 'output'. Returns the number
/// of bytes read and written.
pub fn compress_stream<R: Read, W: Write>(
    mut input: R,
    mut output: W,
    ctx: Context,
) -> Result<(u64, u64)> {
    let mut pipeline = encode_pipeline(ctx);
    pump(&mut pipeline, &mut input, &mut output, ctx.chunk_size)
}

/// Decompress everything that 'input' yields into 'output'. Returns the
/// number of bytes read and written. On failure, 'output' may hold the bytes
/// that were decoded before the error.
pub fn decompress_stream<R: Read, W: Write>(
    mut input: R,
    mut output: W,
    ctx: Context,
) -> Result<(u64, u64)> {
    let mut pipeline = decode_pipeline();
    pump(&mut pipeline, &mut input, &mut output, ctx.chunk_size)
}

/// Encodes a buffer with the plz pipeline.
pub struct PlzEncoder<'a> {
    /// The uncompressed input.
    input: &'a [u8],
    /// The output stream.
    output: &'a mut Vec<u8>,
    /// Encoder context.
    ctx: Context,
}

impl<'a> PlzEncoder<'a> {
    pub fn new(input: &'a [u8], output: &'a mut Vec<u8>, ctx: Context) -> Self {
        Self { input, output, ctx }
    }

    fn encode_impl(&mut self) -> Result<usize> {
        let (_, written) =
            compress_stream(self.input, &mut *self.output, self.ctx)?;
        Ok(written as usize)
    }
}

/// Decodes a buffer with the plz pipeline.
pub struct PlzDecoder<'a> {
    /// The compressed input.
    input: &'a [u8],
    /// The output stream.
    output: &'a mut Vec<u8>,
}

impl<'a> PlzDecoder<'a> {
    pub fn new(input: &'a [u8], output: &'a mut Vec<u8>) -> Self {
        Self { input, output }
    }

    fn decode_impl(&mut self) -> Result<(usize, usize)> {
        let ctx = Context::default();
        let (read, written) =
            decompress_stream(self.input, &mut *self.output, ctx)?;
        Ok((read as usize, written as usize))
    }
}

impl<'a> Encoder<'a> for PlzEncoder<'a> {
    fn new(input: &'a [u8], output: &'a mut Vec<u8>, ctx: Context) -> Self {
        PlzEncoder { input, output, ctx }
    }

    fn encode(&mut self) -> Result<usize> {
        self.encode_impl()
    }
}

impl<'a> Decoder<'a> for PlzDecoder<'a> {
    fn new(input: &'a [u8], output: &'a mut Vec<u8>) -> Self {
        PlzDecoder { input, output }
    }

    fn decode(&mut self) -> Result<(usize, usize)> {
        self.decode_impl()
    }
}
