//! Cooperative streaming stages. Each stage is a small state machine that is
//! fed input, told when the input ends, and polled for output. A poll either
//! produces one unit of output, asks for more input, or reports that the stage
//! is done. Stages are chained with 'compose' and driven by 'pump', which pulls
//! from a reader only when the pipeline asks for more input.

use std::io::{ErrorKind, Read, Write};

use crate::{Error, Result};

/// The outcome of polling a stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step<T> {
    /// One unit of output is ready.
    Emit(T),
    /// The stage can't make progress until it is fed more input.
    NeedInput,
    /// The input ended and everything was flushed.
    Done,
}

/// A suspendable unit of work in the pipeline.
///
/// After 'finish' is called, 'poll' must never return 'NeedInput' again: the
/// stage either flushes what it holds, or fails.
pub trait Stage {
    type Input;
    type Output;

    /// Hand the next piece of input to the stage.
    fn feed(&mut self, input: Self::Input);

    /// Signal that there is no more input.
    fn finish(&mut self);

    /// Try to make progress.
    fn poll(&mut self) -> Result<Step<Self::Output>>;
}

/// Two stages where the output of 'first' is the input of 'second'. The first
/// stage is only polled when the second one asks for input.
pub struct Chain<A, B> {
    first: A,
    second: B,
    /// Set when 'first' reported that it is done.
    upstream_done: bool,
}

impl<A, B> Chain<A, B>
where
    A: Stage,
    B: Stage<Input = A::Output>,
{
    pub fn new(first: A, second: B) -> Self {
        Self {
            first,
            second,
            upstream_done: false,
        }
    }

    pub fn first(&self) -> &A {
        &self.first
    }

    pub fn second(&self) -> &B {
        &self.second
    }
}

/// Chain 'first' into 'second'.
pub fn compose<A, B>(first: A, second: B) -> Chain<A, B>
where
    A: Stage,
    B: Stage<Input = A::Output>,
{
    Chain::new(first, second)
}

impl<A, B> Stage for Chain<A, B>
where
    A: Stage,
    B: Stage<Input = A::Output>,
{
    type Input = A::Input;
    type Output = B::Output;

    fn feed(&mut self, input: Self::Input) {
        self.first.feed(input);
    }

    fn finish(&mut self) {
        self.first.finish();
    }

    fn poll(&mut self) -> Result<Step<Self::Output>> {
        loop {
            match self.second.poll()? {
                Step::NeedInput => {}
                step => return Ok(step),
            }
            if self.upstream_done {
                return Err(Error::EncoderInternal(
                    "stage asked for input after the end of the stream",
                ));
            }
            // Drive the upstream stage just enough to feed one item down.
            match self.first.poll()? {
                Step::Emit(item) => self.second.feed(item),
                Step::NeedInput => return Ok(Step::NeedInput),
                Step::Done => {
                    self.upstream_done = true;
                    self.second.finish();
                }
            }
        }
    }
}

/// Read from 'input' until EOF, retrying interrupted reads.
fn read_chunk<R: Read>(input: &mut R, buffer: &mut [u8]) -> Result<usize> {
    loop {
        match input.read(buffer) {
            Ok(n) => return Ok(n),
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
}

/// Run the pipeline 'stage' to completion. Chunks of up to 'chunk_size' bytes
/// are read from 'input' whenever the pipeline needs input, and everything the
/// pipeline emits is written to 'output' in order. Returns the number of bytes
/// read and written.
pub fn pump<S, R, W>(
    stage: &mut S,
    input: &mut R,
    output: &mut W,
    chunk_size: usize,
) -> Result<(u64, u64)>
where
    S: Stage<Input = Vec<u8>, Output = Vec<u8>>,
    R: Read,
    W: Write,
{
    let mut buffer = vec![0; chunk_size.max(1)];
    let mut read = 0;
    let mut written = 0;

    loop {
        match stage.poll()? {
            Step::Emit(bytes) => {
                output.write_all(&bytes)?;
                written += bytes.len() as u64;
            }
            Step::NeedInput => {
                let n = read_chunk(input, &mut buffer)?;
                if n == 0 {
                    log::debug!("Source reached EOF after {} bytes.", read);
                    stage.finish();
                } else {
                    read += n as u64;
                    stage.feed(buffer[..n].to_vec());
                }
            }
            Step::Done => {
                output.flush()?;
                log::debug!("Sink flushed after {} bytes.", written);
                return Ok((read, written));
            }
        }
    }
}
