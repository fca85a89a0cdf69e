//! This module handles the encoding and decoding of blocks, the unit of the
//! compressed stream. Each block copies a prefix out of the history and then
//! appends one new byte. The stream is a plain concatenation of blocks.
//!
//! A block is serialized as [prefix length][prefix offset][literal], where the
//! two numbers use 'int_encoding'. Only the last block of a stream may lack a
//! literal, and it is marked with 'TERMINAL_TAG' in the header of its length.

use std::collections::VecDeque;

use crate::pipeline::{Stage, Step};
use crate::utils::int_encoding::{self, Decoded};
use crate::{Error, Result};

/// Marks the block that has no literal. It must be the last one.
pub const TERMINAL_TAG: u8 = 0x80;

/// A single unit of compression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    /// The number of bytes to copy from the history.
    pub prefix_length: usize,
    /// The absolute offset of the copy in the history. Zero when there is no
    /// prefix.
    pub prefix_offset: usize,
    /// The byte that follows the prefix.
    pub literal: Option<u8>,
}

impl Block {
    pub fn new(
        prefix_length: usize,
        prefix_offset: usize,
        literal: Option<u8>,
    ) -> Self {
        // Offsets of empty prefixes are never dereferenced; keep them uniform.
        let prefix_offset = if prefix_length == 0 { 0 } else { prefix_offset };
        Self {
            prefix_length,
            prefix_offset,
            literal,
        }
    }

    /// A block without a prefix.
    pub fn literal(byte: u8) -> Self {
        Self::new(0, 0, Some(byte))
    }

    pub fn is_terminal(&self) -> bool {
        self.literal.is_none()
    }

    /// The number of bytes that the block expands to.
    pub fn expanded_len(&self) -> usize {
        self.prefix_length + self.literal.is_some() as usize
    }

    /// Serialize the block into 'stream'. Returns the number of bytes written.
    pub fn encode(&self, stream: &mut Vec<u8>) -> usize {
        let tag = if self.is_terminal() { TERMINAL_TAG } else { 0 };
        let mut written =
            int_encoding::encode_tagged(self.prefix_length as u64, tag, stream);
        written += int_encoding::encode(self.prefix_offset as u64, stream);
        if let Some(literal) = self.literal {
            stream.push(literal);
            written += 1;
        }
        written
    }

    /// Try to deserialize a block from the beginning of 'input'. Returns the
    /// number of bytes consumed and the block, or None if 'input' ends before
    /// the block does. Fails with the reason if the bytes can't be a block.
    pub fn decode(
        input: &[u8],
    ) -> std::result::Result<Option<(usize, Block)>, &'static str> {
        let (read0, length, tag) = match int_encoding::decode(input) {
            Decoded::Complete { read, val, tag } => (read, val, tag),
            Decoded::Incomplete => return Ok(None),
            Decoded::Invalid => return Err("invalid prefix length header"),
        };
        if tag & !TERMINAL_TAG != 0 {
            return Err("unknown tag in block header");
        }

        let (read1, offset) = match int_encoding::decode(&input[read0..]) {
            Decoded::Complete { read, val, tag: 0 } => (read, val),
            Decoded::Complete { .. } => {
                return Err("unknown tag in offset header")
            }
            Decoded::Incomplete => return Ok(None),
            Decoded::Invalid => return Err("invalid prefix offset header"),
        };

        let length = usize::try_from(length)
            .map_err(|_| "prefix length does not fit in memory")?;
        let offset = usize::try_from(offset)
            .map_err(|_| "prefix offset does not fit in memory")?;
        if length == 0 && offset != 0 {
            return Err("offset given for an empty prefix");
        }
        if length == 0 && tag == TERMINAL_TAG {
            return Err("terminal block is empty");
        }

        let mut read = read0 + read1;
        let literal = if tag == TERMINAL_TAG {
            None
        } else {
            match input.get(read) {
                Some(byte) => {
                    read += 1;
                    Some(*byte)
                }
                None => return Ok(None),
            }
        };

        Ok(Some((read, Block::new(length, offset, literal))))
    }
}

/// A pipeline stage that serializes blocks.
#[derive(Debug, Default)]
pub struct BlockWriter {
    queue: VecDeque<Block>,
    finished: bool,
    /// Set after the block without a literal was written.
    terminated: bool,
}

impl BlockWriter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Stage for BlockWriter {
    type Input = Block;
    type Output = Vec<u8>;

    fn feed(&mut self, block: Block) {
        self.queue.push_back(block);
    }

    fn finish(&mut self) {
        self.finished = true;
    }

    fn poll(&mut self) -> Result<Step<Vec<u8>>> {
        if let Some(block) = self.queue.pop_front() {
            if self.terminated {
                return Err(Error::EncoderInternal(
                    "block emitted after the terminal block",
                ));
            }
            self.terminated = block.is_terminal();
            let mut encoded = Vec::new();
            block.encode(&mut encoded);
            return Ok(Step::Emit(encoded));
        }
        if self.finished {
            Ok(Step::Done)
        } else {
            Ok(Step::NeedInput)
        }
    }
}

/// A pipeline stage that parses blocks out of a byte stream.
#[derive(Debug, Default)]
pub struct BlockReader {
    /// Bytes that were fed but not parsed yet start at 'cursor'.
    buffer: Vec<u8>,
    cursor: usize,
    /// The position of 'buffer[cursor]' in the compressed stream.
    position: u64,
    finished: bool,
    /// Set after the block without a literal was parsed.
    terminated: bool,
}

impl BlockReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of bytes that were parsed into blocks.
    pub fn position(&self) -> u64 {
        self.position
    }

    fn malformed(&self, reason: &'static str) -> Error {
        Error::MalformedStream {
            position: self.position,
            reason,
        }
    }
}

impl Stage for BlockReader {
    type Input = Vec<u8>;
    type Output = Block;

    fn feed(&mut self, bytes: Vec<u8>) {
        // Drop the parsed bytes before growing the buffer.
        self.buffer.drain(..self.cursor);
        self.cursor = 0;
        self.buffer.extend(bytes);
    }

    fn finish(&mut self) {
        self.finished = true;
    }

    fn poll(&mut self) -> Result<Step<Block>> {
        let exhausted = self.cursor == self.buffer.len();

        if self.terminated {
            if !exhausted {
                return Err(self.malformed("data after the terminal block"));
            }
            return Ok(if self.finished {
                Step::Done
            } else {
                Step::NeedInput
            });
        }

        match Block::decode(&self.buffer[self.cursor..]) {
            Ok(Some((read, block))) => {
                log::trace!("Parsed {:?} at byte {}.", block, self.position);
                self.cursor += read;
                self.position += read as u64;
                self.terminated = block.is_terminal();
                Ok(Step::Emit(block))
            }
            Ok(None) if !self.finished => Ok(Step::NeedInput),
            Ok(None) if exhausted => Ok(Step::Done),
            Ok(None) => Err(self.malformed("stream ends inside a block")),
            Err(reason) => Err(self.malformed(reason)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_layout() {
        let mut stream = Vec::new();
        assert_eq!(Block::literal(b'a').encode(&mut stream), 3);
        assert_eq!(stream, [0, 0, b'a']);

        stream.clear();
        assert_eq!(Block::new(2, 300, None).encode(&mut stream), 5);
        assert_eq!(stream, [0x81, 2, 2, 1, 44]);
    }

    #[test]
    fn test_empty_prefix_ignores_offset() {
        let block = Block::new(0, 17, Some(1));
        assert_eq!(block.prefix_offset, 0);
        assert_eq!(block.expanded_len(), 1);
    }
}
