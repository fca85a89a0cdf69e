use plz::block::{Block, BlockReader, BlockWriter, TERMINAL_TAG};
use plz::history::{Expander, History};
use plz::pipeline::{Stage, Step};
use plz::Error;

#[test]
fn test_block_decode() {
    let mut stream = Vec::new();
    let blocks = [
        Block::literal(7),
        Block::new(1, 0, Some(9)),
        Block::new(300, 1 << 20, Some(0)),
        Block::new(2, 1, None),
    ];
    for block in &blocks {
        block.encode(&mut stream);
    }

    let mut cursor = 0;
    for block in &blocks {
        let (read, decoded) = Block::decode(&stream[cursor..]).unwrap().unwrap();
        assert_eq!(*block, decoded);
        cursor += read;
    }
    assert_eq!(cursor, stream.len());
}

#[test]
fn test_block_decode_incomplete() {
    let mut stream = Vec::new();
    Block::new(300, 70000, Some(5)).encode(&mut stream);
    for len in 0..stream.len() {
        assert_eq!(Block::decode(&stream[..len]), Ok(None));
    }
    let terminal = Block::decode(&[TERMINAL_TAG | 1, 1, 0]).unwrap().unwrap();
    assert_eq!(terminal, (3, Block::new(1, 0, None)));
}

#[test]
fn test_block_decode_invalid() {
    assert!(Block::decode(&[0x0c, 0, 0]).is_err());
    assert!(Block::decode(&[0x40, 0, 0]).is_err());
    assert!(Block::decode(&[0, 0x80, 0]).is_err());
    assert!(Block::decode(&[0, 0x0c]).is_err());
}

#[test]
fn test_block_decode_non_canonical() {
    // An offset on an empty prefix.
    assert!(Block::decode(&[0, 1, 5, b'a']).is_err());
    // A length with a leading zero byte.
    assert!(Block::decode(&[2, 0, 1, 0, b'a']).is_err());
    // A terminal block that expands to nothing.
    assert!(Block::decode(&[TERMINAL_TAG, 0]).is_err());
}

#[test]
fn test_block_writer() {
    let mut writer = BlockWriter::new();
    assert_eq!(writer.poll().unwrap(), Step::NeedInput);
    writer.feed(Block::literal(b'a'));
    assert_eq!(writer.poll().unwrap(), Step::Emit(vec![0, 0, b'a']));
    writer.feed(Block::new(1, 0, None));
    assert_eq!(writer.poll().unwrap(), Step::Emit(vec![0x81, 1, 0]));

    // Nothing may follow the terminal block.
    writer.feed(Block::literal(b'b'));
    assert!(matches!(writer.poll(), Err(Error::EncoderInternal(_))));
}

#[test]
fn test_block_reader_incremental() {
    let mut reader = BlockReader::new();
    reader.feed(vec![0]);
    assert_eq!(reader.poll().unwrap(), Step::NeedInput);
    reader.feed(vec![0]);
    assert_eq!(reader.poll().unwrap(), Step::NeedInput);
    reader.feed(vec![b'a', 1]);
    assert_eq!(reader.poll().unwrap(), Step::Emit(Block::literal(b'a')));
    assert_eq!(reader.position(), 3);
    assert_eq!(reader.poll().unwrap(), Step::NeedInput);
    reader.feed(vec![1, 0, b'b']);
    assert_eq!(reader.poll().unwrap(), Step::Emit(Block::new(1, 0, Some(b'b'))));
    reader.finish();
    assert_eq!(reader.poll().unwrap(), Step::Done);
}

#[test]
fn test_block_reader_truncated() {
    let mut reader = BlockReader::new();
    reader.feed(vec![0, 0, b'a', 2, 1]);
    assert_eq!(reader.poll().unwrap(), Step::Emit(Block::literal(b'a')));
    reader.finish();
    match reader.poll() {
        Err(Error::MalformedStream { position, .. }) => assert_eq!(position, 3),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_block_reader_trailing_data() {
    let mut reader = BlockReader::new();
    reader.feed(vec![0x81, 1, 0, 5]);
    assert_eq!(reader.poll().unwrap(), Step::Emit(Block::new(1, 0, None)));
    assert!(matches!(
        reader.poll(),
        Err(Error::MalformedStream { position: 3, .. })
    ));
}

#[test]
fn test_history() {
    let mut history = History::new();
    assert!(history.is_empty());
    history.append(b"abc");
    assert_eq!(history.copy_range(1, 2).unwrap(), b"bc");
    assert_eq!(history.copy_range(3, 0).unwrap(), b"");
    assert!(matches!(
        history.copy_range(2, 2),
        Err(Error::OutOfRangeReference {
            offset: 2,
            length: 2,
            history: 3
        })
    ));
    assert!(history.copy_range(usize::MAX, 2).is_err());

    let produced = history.apply(&Block::new(3, 0, Some(b'd'))).unwrap();
    assert_eq!(produced, 3..7);
    assert_eq!(history.as_slice(), b"abcabcd");
    let produced = history.apply(&Block::new(2, 5, None)).unwrap();
    assert_eq!(&history.as_slice()[produced], b"cd");
    assert_eq!(history.len(), 9);
}

#[test]
fn test_expander() {
    let mut expander = Expander::new();
    assert_eq!(expander.poll().unwrap(), Step::NeedInput);
    expander.feed(Block::literal(b'x'));
    expander.feed(Block::new(1, 0, Some(b'y')));
    assert_eq!(expander.poll().unwrap(), Step::Emit(vec![b'x']));
    assert_eq!(expander.poll().unwrap(), Step::Emit(vec![b'x', b'y']));
    expander.finish();
    assert_eq!(expander.poll().unwrap(), Step::Done);
    assert_eq!(expander.history().as_slice(), b"xxy");

    let mut expander = Expander::new();
    expander.feed(Block::new(1, 0, Some(b'y')));
    assert!(matches!(
        expander.poll(),
        Err(Error::OutOfRangeReference { .. })
    ));
}
