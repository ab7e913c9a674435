#![no_main]

use arbitrary::Arbitrary;
use chewtext::{
    Action, ActionTable, ParseMode, ParseOptions, SENTINEL_SIZE, Scanner, TextBuffer, normalize,
};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input<'a> {
    trim: bool,
    comments: bool,
    paragraphs: bool,
    /// Extra bytes of scratch capacity past the sentinel.
    slack: u8,
    bytes: &'a [u8],
}

fn run(input: &Input<'_>) {
    let mut buffer = TextBuffer::from_bytes_with_capacity(
        input.bytes,
        input.bytes.len() + SENTINEL_SIZE + usize::from(input.slack),
    )
    .unwrap();

    let stats = normalize(&mut buffer);
    assert!(buffer.is_sealed());
    assert!(buffer.capacity() >= buffer.len() + SENTINEL_SIZE);
    assert_eq!(stats.consumed, input.bytes.len());
    assert!(stats.is_valid_output(buffer.content()), "{stats:?}");

    let mode = if input.paragraphs {
        ParseMode::PARAGRAPHS
    } else {
        ParseMode::LINES
    };
    let options = ParseOptions::default()
        .with_mode(mode)
        .with_trim(input.trim)
        .with_comments(input.comments);
    let table = ActionTable::new(&options);
    let scanner = Scanner::new(&buffer, &options);
    let slices = if input.paragraphs {
        scanner.paragraphs()
    } else {
        scanner.lines()
    };
    for slice in slices {
        assert!(!slice.is_empty());
        assert!(slice.iter().all(|&b| table[b] != Action::EndOfLine));
    }
}

fuzz_target!(|input: Input<'_>| run(&input));
