#![no_main]

use libfuzzer_sys::fuzz_target;
use plz::lz::PlzDecoder;
use plz::Decoder;

fuzz_target!(|data: &[u8]| {
    let mut decompressed: Vec<u8> = Vec::new();
    {
        let mut decoder = PlzDecoder::new(data, &mut decompressed);
        let _ = decoder.decode();
    }
});
