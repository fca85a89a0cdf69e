//! A collection of modules that implement Lempel–Ziv matching and coding.

pub mod matcher;
mod plz;
pub use plz::{
    compress_stream, decode_pipeline, decompress_stream, encode_pipeline,
    BlockProducer, DecodePipeline, EncodePipeline, PlzDecoder, PlzEncoder,
};
