//! The decoder's history: every byte decompressed so far. Blocks copy their
//! prefix out of it using absolute offsets, so nothing is ever evicted.

use std::collections::VecDeque;
use std::ops::Range;

use crate::block::Block;
use crate::pipeline::{Stage, Step};
use crate::{Error, Result};

/// An append-only byte buffer addressed from the start of the stream.
#[derive(Debug, Default, Clone)]
pub struct History {
    data: Vec<u8>,
}

impl History {
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Returns the number of bytes in the history.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn append(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    /// Return the 'length' bytes that start at 'offset'.
    pub fn copy_range(&self, offset: usize, length: usize) -> Result<&[u8]> {
        let range = self.check_range(offset, length)?;
        Ok(&self.data[range])
    }

    fn check_range(
        &self,
        offset: usize,
        length: usize,
    ) -> Result<Range<usize>> {
        match offset.checked_add(length) {
            Some(end) if end <= self.data.len() => Ok(offset..end),
            _ => Err(Error::OutOfRangeReference {
                offset,
                length,
                history: self.data.len(),
            }),
        }
    }

    /// Expand 'block' at the end of the history. Returns the range of the
    /// bytes that the block produced.
    pub fn apply(&mut self, block: &Block) -> Result<Range<usize>> {
        let start = self.data.len();
        let prefix =
            self.check_range(block.prefix_offset, block.prefix_length)?;
        self.data.extend_from_within(prefix);
        if let Some(literal) = block.literal {
            self.data.push(literal);
        }
        Ok(start..self.data.len())
    }
}

/// A pipeline stage that expands blocks into the bytes they stand for.
#[derive(Debug, Default)]
pub struct Expander {
    history: History,
    /// Blocks that were fed but not expanded yet.
    queue: VecDeque<Block>,
    finished: bool,
    blocks: usize,
}

impl Expander {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> &History {
        &self.history
    }
}

impl Stage for Expander {
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
            let produced = self.history.apply(&block)?;
            self.blocks += 1;
            return Ok(Step::Emit(self.history.as_slice()[produced].to_vec()));
        }
        if !self.finished {
            return Ok(Step::NeedInput);
        }
        log::info!(
            "Expanded {} blocks into {} bytes.",
            self.blocks,
            self.history.len()
        );
        Ok(Step::Done)
    }
}
