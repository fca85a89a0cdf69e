#![no_main]

use libfuzzer_sys::fuzz_target;
use plz::lz::{PlzDecoder, PlzEncoder};
use plz::{Context, Decoder, Encoder, MatchStrategy};

fuzz_target!(|data: &[u8]| {
    let mut compressed: Vec<u8> = Vec::new();

    {
        let ctx = Context::new(MatchStrategy::Indexed, 64);
        let mut encoder = PlzEncoder::new(data, &mut compressed, ctx);
        let written = encoder.encode().unwrap();
        assert_eq!(written, compressed.len());
    }

    let mut decompressed: Vec<u8> = Vec::new();
    {
        let mut decoder = PlzDecoder::new(&compressed, &mut decompressed);
        let (consumed, written) = decoder.decode().unwrap();
        assert_eq!(consumed, compressed.len());
        assert_eq!(written, decompressed.len());
    }
    assert_eq!(decompressed, data);
});
