use alloc::vec::Vec;

use quickcheck::QuickCheck;

use super::arbitrary::MixedText;
use crate::{
    Action, ActionTable, ParseOptions, Scanner, TextBuffer, normalize, split_lines,
    split_paragraphs,
};

/// Property: every emitted slice is non-empty, holds no end-of-line byte,
/// starts with a non-blank byte and, when trimming, ends with one too.
#[test]
fn emitted_slices_are_trimmed_and_non_empty() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(input: MixedText, trim: bool, comments: bool, normalize_first: bool) -> bool {
        let mut buf = TextBuffer::from_bytes(&input.0).unwrap();
        if normalize_first {
            normalize(&mut buf);
        }
        let options = ParseOptions::default()
            .with_trim(trim)
            .with_comments(comments);
        let table = ActionTable::new(&options);

        let well_formed = |slice: &&[u8]| {
            let (Some(&first), Some(&last)) = (slice.first(), slice.last()) else {
                return false;
            };
            first != b' '
                && first != b'\t'
                && table[first] == Action::NoAction
                && table[last] != Action::SkipWhitespace
                && slice.iter().all(|&b| table[b] != Action::EndOfLine)
        };
        split_lines(&buf, &options).iter().all(well_formed)
            && split_paragraphs(&buf, &options).iter().all(well_formed)
    }

    QuickCheck::new()
        .tests(if is_ci::cached() { 10_000 } else { 1_000 })
        .quickcheck(prop as fn(MixedText, bool, bool, bool) -> bool);
}

/// Property: scanning an unchanged buffer twice gives the same result, and
/// spans resolve to the slices.
#[test]
fn scanning_is_repeatable() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(input: MixedText) -> bool {
        let buf = TextBuffer::from_bytes(&input.0).unwrap();
        let scanner = Scanner::new(&buf, &ParseOptions::response_file());
        let first = scanner.lines();
        let second = scanner.lines();
        let resolved: Vec<&[u8]> = scanner
            .line_spans()
            .iter()
            .map(|span| span.resolve(buf.content()))
            .collect();
        first == second && first == resolved
    }

    QuickCheck::new()
        .tests(if is_ci::cached() { 10_000 } else { 1_000 })
        .quickcheck(prop as fn(MixedText) -> bool);
}

/// Property: lines mode only merges what paragraphs mode would report as an
/// empty terminator, so both modes agree on the emitted text.
#[test]
fn lines_and_paragraphs_agree() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(input: MixedText, trim: bool) -> bool {
        let buf = TextBuffer::from_bytes(&input.0).unwrap();
        let options = ParseOptions::default().with_trim(trim);
        split_lines(&buf, &options) == split_paragraphs(&buf, &options)
    }

    QuickCheck::new()
        .tests(if is_ci::cached() { 10_000 } else { 1_000 })
        .quickcheck(prop as fn(MixedText, bool) -> bool);
}
