use alloc::{vec, vec::Vec};

use bstr::ByteSlice;
use rstest::rstest;

use super::*;
use crate::options::ParseMode;

fn buffer(content: &[u8]) -> TextBuffer {
    TextBuffer::from_bytes(content).unwrap()
}

fn lines(content: &[u8], options: &ParseOptions) -> Vec<Vec<u8>> {
    let buf = buffer(content);
    split_lines(&buf, options)
        .into_iter()
        .map(<[u8]>::to_vec)
        .collect()
}

fn paragraphs(content: &[u8], options: &ParseOptions) -> Vec<Vec<u8>> {
    let buf = buffer(content);
    split_paragraphs(&buf, options)
        .into_iter()
        .map(<[u8]>::to_vec)
        .collect()
}

fn trimmed() -> ParseOptions {
    ParseOptions::default().with_trim(true)
}

#[test]
fn table_defaults() {
    let table = ActionTable::new(&ParseOptions::default());
    assert_eq!(table[b'\r'], Action::EndOfLine);
    assert_eq!(table[b'\n'], Action::EndOfLine);
    assert_eq!(table[0], Action::EndOfLine);
    assert_eq!(table[b' '], Action::NoAction);
    assert_eq!(table[b'#'], Action::NoAction);
    assert_eq!(table[b'a'], Action::NoAction);
}

#[test]
fn table_follows_options() {
    let table = ActionTable::new(&ParseOptions::response_file());
    assert_eq!(table[b' '], Action::SkipWhitespace);
    assert_eq!(table[b'\t'], Action::SkipWhitespace);
    assert_eq!(table[0x0B], Action::SkipWhitespace);
    assert_eq!(table[b'#'], Action::SkipComment);
    assert_eq!(table[0x0C], Action::NoAction);
}

#[test]
#[should_panic(expected = "NUL must stay")]
fn table_refuses_to_reclassify_nul() {
    ActionTable::bare().set(0, Action::NoAction);
}

#[test]
fn table_debug_lists_only_classified_bytes() {
    let rendered = alloc::format!("{:?}", ActionTable::bare());
    assert_eq!(rendered, r"{'\0': EndOfLine, '\n': EndOfLine, '\r': EndOfLine}");
}

#[test]
fn simple_lines() {
    assert_eq!(lines(b"a\nb\n", &trimmed()), vec![b"a".to_vec(), b"b".to_vec()]);
}

#[test]
fn comment_lines_toggle() {
    let with = ParseOptions::default().with_comments(true);
    assert_eq!(lines(b"# c\nkeep\n", &with), vec![b"keep".to_vec()]);
    let without = ParseOptions::default();
    assert_eq!(
        lines(b"# c\nkeep\n", &without),
        vec![b"# c".to_vec(), b"keep".to_vec()]
    );
}

#[test]
fn comment_only_at_line_start() {
    let options = ParseOptions::response_file();
    assert_eq!(
        lines(b"path/a # not a comment\n   # indented comment\n", &options),
        vec![b"path/a # not a comment".to_vec()]
    );
}

#[test]
fn trimming() {
    assert_eq!(lines(b"  padded  \n", &trimmed()), vec![b"padded".to_vec()]);
    // leading blanks go regardless; trailing ones stay without the flag
    assert_eq!(
        lines(b"  padded  \n", &ParseOptions::default()),
        vec![b"padded  ".to_vec()]
    );
}

#[test]
fn vertical_tab_is_whitespace_only_when_trimming() {
    assert_eq!(lines(b"\x0Bx\x0B\n", &trimmed()), vec![b"x".to_vec()]);
    assert_eq!(
        lines(b"\x0Bx\x0B\n", &ParseOptions::default()),
        vec![b"\x0Bx\x0B".to_vec()]
    );
}

#[test]
fn internal_whitespace_is_kept() {
    assert_eq!(
        lines(b"\t C:/Program Files/x.txt \t\n", &trimmed()),
        vec![b"C:/Program Files/x.txt".to_vec()]
    );
}

#[rstest]
#[case::crlf(b"a\r\nb")]
#[case::cr(b"a\rb")]
#[case::lf(b"a\nb")]
#[case::blank_lines(b"\n\na\r\n\r\n\r\nb\n\n")]
#[case::nul_separated(b"a\0b")]
#[case::lfcr(b"a\n\rb\r")]
fn line_terminators(#[case] input: &[u8]) {
    let expected = vec![b"a".to_vec(), b"b".to_vec()];
    assert_eq!(lines(input, &trimmed()), expected);
    assert_eq!(paragraphs(input, &trimmed()), expected);
}

#[test]
fn last_line_without_terminator_is_emitted() {
    assert_eq!(lines(b"only", &trimmed()), vec![b"only".to_vec()]);
    assert_eq!(lines(b"x\ntail  ", &trimmed()), vec![b"x".to_vec(), b"tail".to_vec()]);
}

#[rstest]
#[case::empty(b"")]
#[case::blanks(b"   \t  ")]
#[case::terminators(b"\r\n\r\n\n\0\n")]
#[case::comments(b"# one\n#two\r\n   # three")]
fn nothing_to_emit(#[case] input: &[u8]) {
    assert!(lines(input, &ParseOptions::response_file()).is_empty());
    assert!(paragraphs(input, &ParseOptions::response_file()).is_empty());
}

#[test]
fn empty_unallocated_buffer() {
    let buf = TextBuffer::new();
    assert!(split_lines(&buf, &trimmed()).is_empty());
    assert!(split_paragraphs(&buf, &trimmed()).is_empty());
}

#[test]
fn utf8_content_passes_through() {
    let input = "  grüße  \nпривет\n😀\n".as_bytes();
    let out = lines(input, &trimmed());
    let out: Vec<&str> = out.iter().map(|l| l.to_str().unwrap()).collect();
    assert_eq!(out, ["grüße", "привет", "😀"]);
}

#[test]
fn slices_borrow_the_buffer() {
    let buf = buffer(b"alpha\nbeta\n");
    let out = split_lines(&buf, &trimmed());
    let base = buf.content().as_ptr() as usize;
    assert_eq!(out[0].as_ptr() as usize, base);
    assert_eq!(out[1].as_ptr() as usize, base + 6);
}

#[test]
fn spans_match_slices() {
    let buf = buffer(b" one \r\n\r\ntwo\n# c\nthree");
    let scanner = Scanner::new(&buf, &ParseOptions::response_file());
    let slices = scanner.lines();
    let spans = scanner.line_spans();
    assert_eq!(spans.len(), slices.len());
    for (span, slice) in spans.iter().zip(&slices) {
        assert_eq!(span.resolve(buf.content()), *slice);
    }
    assert_eq!(spans[0], Span { start: 1, len: 3 });
    assert_eq!(scanner.paragraph_spans(), spans);
}

#[test]
fn scanning_twice_is_idempotent() {
    let buf = buffer(b"x\r\n  y \n#z\n\n w");
    let options = ParseOptions::response_file();
    let first = split_lines(&buf, &options);
    let second = split_lines(&buf, &options);
    assert_eq!(first, second);
}

#[test]
fn patched_table_splits_on_extra_terminator() {
    let buf = buffer(b"a;b; c");
    let mut table = ActionTable::new(&trimmed());
    table.set(b';', Action::EndOfLine);
    let out = Scanner::with_table(&buf, table).lines();
    assert_eq!(out, [&b"a"[..], &b"b"[..], &b"c"[..]]);
}

#[test]
fn window_scanner_respects_length() {
    let mut window = vec![0u8; 4 + SENTINEL_SIZE];
    window[..4].copy_from_slice(b"ab\nc");
    let scanner = Scanner::from_window(&window, 4, ActionTable::default());
    assert_eq!(scanner.lines(), [&b"ab"[..], &b"c"[..]]);
}

#[test]
#[should_panic(expected = "plus the sentinel")]
fn window_without_sentinel_panics() {
    let window = b"abc";
    let _ = Scanner::from_window(window, 3, ActionTable::default());
}

#[test]
fn every_emitted_line_is_non_empty() {
    let input = b" \t\r\n\x0B\n#\n \n\t\tz\t \r\r\n\n";
    for mode in [ParseMode::LINES, ParseMode::PARAGRAPHS] {
        let options = ParseOptions::response_file().with_mode(mode);
        let buf = buffer(input);
        let scanner = Scanner::new(&buf, &options);
        let out = if mode == ParseMode::LINES {
            scanner.lines()
        } else {
            scanner.paragraphs()
        };
        assert_eq!(out, [&b"z"[..]]);
    }
}
