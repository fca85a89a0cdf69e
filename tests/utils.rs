use plz::utils::int_encoding::{decode, encode, encode_tagged, Decoded};
use plz::utils::signatures::{add_extension, has_extension, strip_extension};

#[test]
fn test_int_encoding() {
    fn test_round_trip(val: u64, expected_len: usize) {
        let mut stream = Vec::new();
        let wrote = encode(val, &mut stream);
        assert_eq!(wrote, expected_len);
        assert_eq!(stream.len(), wrote);
        assert_eq!(
            decode(&stream),
            Decoded::Complete {
                read: wrote,
                val,
                tag: 0
            }
        );
    }

    test_round_trip(0, 1);
    test_round_trip(1, 2);
    test_round_trip(255, 2);
    test_round_trip(256, 3);
    test_round_trip(640, 3);
    test_round_trip(1 << 20, 4);
    test_round_trip(u32::MAX as u64, 5);
    test_round_trip(u64::MAX, 9);
}

#[test]
fn test_int_encoding_layout() {
    let mut stream = Vec::new();
    encode(640, &mut stream);
    assert_eq!(stream, [2, 2, 128]);

    stream.clear();
    encode_tagged(7, 0x80, &mut stream);
    assert_eq!(stream, [0x81, 7]);
    assert_eq!(
        decode(&stream),
        Decoded::Complete {
            read: 2,
            val: 7,
            tag: 0x80
        }
    );
}

#[test]
fn test_int_decoding_errors() {
    assert_eq!(decode(&[]), Decoded::Incomplete);
    assert_eq!(decode(&[2, 1]), Decoded::Incomplete);
    assert_eq!(decode(&[9, 1, 2, 3, 4, 5, 6, 7, 8, 9]), Decoded::Invalid);
    assert_eq!(decode(&[2, 0, 1]), Decoded::Invalid);
    assert_eq!(decode(&[1, 0]), Decoded::Invalid);
    // Trailing bytes are not consumed.
    assert_eq!(
        decode(&[1, 5, 99]),
        Decoded::Complete {
            read: 2,
            val: 5,
            tag: 0
        }
    );
}

#[test]
fn test_file_extension() {
    assert!(has_extension("data.plz"));
    assert!(!has_extension(".plz"));
    assert!(!has_extension("data.txt"));
    assert_eq!(strip_extension("data.plz"), Some("data"));
    assert_eq!(strip_extension("data.txt"), None);
    assert_eq!(add_extension("data.txt"), Some(String::from("data.txt.plz")));
    assert_eq!(add_extension("data.plz"), None);
}
