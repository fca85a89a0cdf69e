//! A collection of utilities for handling numbers and file names.

/// Constants that identify compressed files.
pub mod signatures {
    /// The suffix of compressed files.
    pub const FILE_EXTENSION: &str = ".plz";

    /// Return True if 'path' ends with the compressed file suffix (and has a
    /// name in front of it).
    pub fn has_extension(path: &str) -> bool {
        path.len() > FILE_EXTENSION.len() && path.ends_with(FILE_EXTENSION)
    }

    /// Return the name of the file that 'path' decompresses into, or None if
    /// 'path' does not carry the suffix.
    pub fn strip_extension(path: &str) -> Option<&str> {
        if !has_extension(path) {
            return None;
        }
        Some(&path[..path.len() - FILE_EXTENSION.len()])
    }

    /// Return the name of the file that 'path' compresses into, or None if
    /// 'path' is already compressed.
    pub fn add_extension(path: &str) -> Option<String> {
        if has_extension(path) {
            return None;
        }
        Some(String::from(path) + FILE_EXTENSION)
    }
}

/// Implements the encoding of unsigned integers with the minimal number of
/// bytes. The magnitude is written big-endian and is preceded by a header byte
/// that holds the number of magnitude bytes in the low nibble. The high nibble
/// is free for the caller to use as tag bits.
/// The number 0 is serialized as [0], and the number 640 is serialized as
/// [2, 2, 128].
pub mod int_encoding {
    /// The widest magnitude that fits in a u64.
    pub const MAX_WIDTH: usize = 8;
    /// The header bits that hold the width.
    pub const WIDTH_MASK: u8 = 0x0f;
    /// The header bits that are reserved for tags.
    pub const TAG_MASK: u8 = 0xf0;

    /// The result of decoding a number from a possibly incomplete stream.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Decoded {
        /// A number was decoded. 'read' is the number of bytes consumed.
        Complete { read: usize, val: u64, tag: u8 },
        /// The stream ended before the number was complete.
        Incomplete,
        /// The header carries a width that no u64 has, or the magnitude
        /// starts with a zero byte.
        Invalid,
    }

    /// Return the number of significant bits in 'val'.
    pub fn bitwidth(val: u64) -> usize {
        (u64::BITS - val.leading_zeros()) as usize
    }

    /// Return the number of bytes needed to represent 'val'.
    pub fn bytewidth(val: u64) -> usize {
        (bitwidth(val) + 7) / 8
    }

    /// Write the magnitude of 'val' with the minimal number of big-endian
    /// bytes, and return the number of bytes written. Zero writes nothing.
    pub fn to_bytes(val: u64, stream: &mut Vec<u8>) -> usize {
        let width = bytewidth(val);
        let bytes = val.to_be_bytes();
        stream.extend_from_slice(&bytes[MAX_WIDTH - width..]);
        width
    }

    /// Convert big-endian bytes to the number they represent.
    pub fn from_bytes(bytes: &[u8]) -> u64 {
        bytes.iter().fold(0, |acc, &b| (acc << 8) | b as u64)
    }

    /// Encode the number 'num' into the stream and return the number of bytes
    /// written.
    pub fn encode(num: u64, stream: &mut Vec<u8>) -> usize {
        encode_tagged(num, 0, stream)
    }

    /// Encode the number 'num' with the tag bits 'tag' in the header.
    pub fn encode_tagged(num: u64, tag: u8, stream: &mut Vec<u8>) -> usize {
        debug_assert_eq!(tag & WIDTH_MASK, 0, "Tag overlaps the width bits");
        let width = bytewidth(num) as u8;
        stream.push((tag & TAG_MASK) | width);
        1 + to_bytes(num, stream)
    }

    /// Decode a number from the beginning of 'stream'.
    pub fn decode(stream: &[u8]) -> Decoded {
        let header = match stream.first() {
            Some(header) => *header,
            None => return Decoded::Incomplete,
        };
        let width = (header & WIDTH_MASK) as usize;
        if width > MAX_WIDTH {
            return Decoded::Invalid;
        }
        if stream.len() < 1 + width {
            return Decoded::Incomplete;
        }
        // The encoder never writes leading zero bytes.
        if width > 0 && stream[1] == 0 {
            return Decoded::Invalid;
        }
        Decoded::Complete {
            read: 1 + width,
            val: from_bytes(&stream[1..1 + width]),
            tag: header & TAG_MASK,
        }
    }

    #[test]
    fn test_widths() {
        assert_eq!(bitwidth(0b0), 0);
        assert_eq!(bitwidth(0b1), 1);
        assert_eq!(bitwidth(0b11), 2);
        assert_eq!(bitwidth(0b110100101), 9);
        assert_eq!(bytewidth(0), 0);
        assert_eq!(bytewidth(0b10110111), 1);
        assert_eq!(bytewidth(0b101101010), 2);
        assert_eq!(bytewidth(0b1010111010001000010), 3);
        assert_eq!(bytewidth(u64::MAX), 8);
    }

    #[test]
    fn test_to_bytes() {
        let mut stream = Vec::new();
        assert_eq!(to_bytes(0, &mut stream), 0);
        assert_eq!(to_bytes(97, &mut stream), 1);
        assert_eq!(to_bytes(495891539314, &mut stream), 5);
        assert_eq!(stream, b"asuper");
        assert_eq!(from_bytes(b""), 0);
        assert_eq!(from_bytes(&[0, 2, 128]), 640);
    }
}
