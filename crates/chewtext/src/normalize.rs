//! In-place binary-to-text normalizer.
//!
//! Rewrites a sealed window into UTF-8 with LF-only line endings in one
//! forward pass. A read cursor `i` and a write cursor `j` move over the same
//! slice and `j <= i` holds after every step, so the pass never needs a
//! second allocation.
//!
//! | input at `i`                         | output                        |
//! |--------------------------------------|-------------------------------|
//! | printable ASCII, `\t`, `\n`          | copied                        |
//! | `\r`, other controls, DEL            | `\n`                          |
//! | valid UTF-8 sequence                 | copied                        |
//! | invalid UTF-8 lead or continuation   | `\n`, advance one byte        |
//! | NUL opening a UTF-16LE run           | the run, re-encoded as UTF-8  |
//! | any other NUL                        | `\n`                          |
//!
//! A UTF-16LE run is recognized at a NUL whose preceding byte was copied as
//! plain ASCII and which is followed by `<ascii> 0x00`. The run starts at that
//! preceding byte and extends over 16-bit units up to a `00 00` terminator
//! (written as one `\n`) or the end of the content. The whole run is decoded
//! into a scratch list of code points before anything is written, and it is
//! only committed when its total UTF-8 length fits between the write cursor
//! and the end of the run. A malformed surrogate sequence or a failed fit
//! rejects the whole run; its NUL then becomes `\n` like any other and no NUL
//! before the point where the rejected run stopped tries again.

use alloc::vec::Vec;

use crate::{
    buffer::{SENTINEL_SIZE, TextBuffer},
    codec::{DecodeState, Utf16Step, decode_utf16_unit, decode_utf8, encode_utf8, utf8_len},
};

/// Counters describing one normalizer pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct NormalizeStats {
    /// Input bytes read (the content length before the pass).
    pub consumed: usize,
    /// Output bytes written (the content length after the pass).
    pub written: usize,
    /// Bytes or code points replaced by `\n`, line-ending rewrites included.
    pub substitutions: usize,
    /// UTF-16LE runs decoded.
    pub utf16_runs: usize,
    /// UTF-16LE runs detected but left alone.
    pub utf16_rejected: usize,
}

impl NormalizeStats {
    /// Whether the pass left the content byte for byte unchanged.
    #[must_use]
    pub fn is_unchanged(&self) -> bool {
        self.substitutions == 0 && self.utf16_runs == 0 && self.written == self.consumed
    }

    /// Whether `content` is something a pass reporting these counters may
    /// leave behind: `written` bytes of valid UTF-8, no longer than the input,
    /// with `\t` and `\n` as the only control bytes.
    #[cfg(any(test, feature = "fuzzing"))]
    #[must_use]
    pub fn is_valid_output(&self, content: &[u8]) -> bool {
        content.len() == self.written
            && self.written <= self.consumed
            && core::str::from_utf8(content).is_ok()
            && content
                .iter()
                .all(|&b| b == b'\n' || b == b'\t' || (b >= 0x20 && b != 0x7F))
    }
}

/// Normalizes the content of `buffer` in place and re-seals it.
///
/// The empty buffer is left untouched.
///
/// # Examples
///
/// ```rust
/// use chewtext::{TextBuffer, normalize};
///
/// let mut buffer = TextBuffer::from_bytes(b"A\0B\0\0\0").unwrap();
/// let stats = normalize(&mut buffer);
/// assert_eq!(buffer.content(), b"AB\n");
/// assert_eq!(stats.utf16_runs, 1);
/// ```
pub fn normalize(buffer: &mut TextBuffer) -> NormalizeStats {
    if !buffer.is_allocated() {
        return NormalizeStats::default();
    }
    debug_assert!(buffer.is_sealed(), "normalizing an unsealed buffer");
    let len = buffer.len();
    let stats = normalize_bytes(buffer.capacity_view_mut(), len);
    buffer.set_length(stats.written);
    buffer.seal();
    stats
}

/// Normalizes `window[..len]` in place.
///
/// `window` must hold at least [`SENTINEL_SIZE`] zero bytes past `len`. On
/// return the new content is `window[..stats.written]` and every byte from
/// there up to `len + SENTINEL_SIZE` is zero, so the window is sealed again.
///
/// # Panics
///
/// Panics when `window` is shorter than `len + SENTINEL_SIZE`.
pub fn normalize_bytes(window: &mut [u8], len: usize) -> NormalizeStats {
    assert!(
        window.len() >= len + SENTINEL_SIZE,
        "window of {} bytes cannot hold {len} content bytes plus the sentinel",
        window.len()
    );
    debug_assert!(window[len..len + SENTINEL_SIZE].iter().all(|&b| b == 0));

    let mut stats = NormalizeStats {
        consumed: len,
        ..NormalizeStats::default()
    };
    let (mut i, mut j) = (0, 0);
    // the previous step copied window[i - 1] to window[j - 1] unchanged
    let mut after_ascii = false;
    let mut retry_floor = 0;
    let mut decoded = Vec::new();

    while i < len {
        let b = window[i];
        if is_kept(b) {
            window[j] = b;
            i += 1;
            j += 1;
            after_ascii = true;
            continue;
        }
        after_ascii = match b {
            0 if after_ascii && i >= retry_floor && opens_utf16_run(window, i) => {
                let (start, out) = (i - 1, j - 1);
                let fit = decode_utf16_run(window, len, start, &mut decoded).and_then(|run| {
                    if out + run.encoded_len <= run.end {
                        Ok(run)
                    } else {
                        Err(run.end)
                    }
                });
                match fit {
                    Ok(run) => {
                        // every unit of the run is in `decoded`, so writing may clobber it
                        let mut w = out;
                        for &cp in &decoded {
                            w += encode_utf8(cp, &mut window[w..]);
                        }
                        debug_assert_eq!(w, out + run.encoded_len);
                        i = run.end;
                        j = w;
                        stats.substitutions += run.substitutions;
                        stats.utf16_runs += 1;
                    }
                    Err(stop) => {
                        retry_floor = stop;
                        stats.utf16_rejected += 1;
                        substitute(window, &mut i, &mut j, &mut stats);
                    }
                }
                false
            }
            0x00..=0x1F | 0x7F => {
                substitute(window, &mut i, &mut j, &mut stats);
                false
            }
            _ => {
                match decode_utf8(&window[i..len]) {
                    Some((_, n)) => {
                        if i != j {
                            window.copy_within(i..i + n, j);
                        }
                        i += n;
                        j += n;
                    }
                    None => substitute(window, &mut i, &mut j, &mut stats),
                }
                false
            }
        };
    }

    window[j..len].fill(0);
    stats.written = j;
    tracing::debug!(
        consumed = stats.consumed,
        written = stats.written,
        substitutions = stats.substitutions,
        utf16_runs = stats.utf16_runs,
        utf16_rejected = stats.utf16_rejected,
        "content normalized"
    );
    stats
}

#[inline]
fn is_kept(b: u8) -> bool {
    matches!(b, b'\t' | b'\n' | 0x20..=0x7E)
}

#[inline]
fn is_utf16_low_byte(b: u8) -> bool {
    is_kept(b) || b == b'\r'
}

/// `window[i]` is a NUL; checks for `<ascii> 0x00` right after it. Reads at
/// most two bytes past `i`, which the sentinel covers.
fn opens_utf16_run(window: &[u8], i: usize) -> bool {
    is_utf16_low_byte(window[i + 1]) && window[i + 2] == 0
}

fn substitute(window: &mut [u8], i: &mut usize, j: &mut usize, stats: &mut NormalizeStats) {
    window[*j] = b'\n';
    *i += 1;
    *j += 1;
    stats.substitutions += 1;
}

struct Utf16Run {
    /// Read position after the run.
    end: usize,
    /// UTF-8 length of the decoded run.
    encoded_len: usize,
    substitutions: usize,
}

/// Decodes the UTF-16LE run whose first unit sits at `start` into `decoded`,
/// controls already folded to `\n`. `Err` carries the read position where the
/// run was found to be malformed.
fn decode_utf16_run(
    window: &[u8],
    len: usize,
    start: usize,
    decoded: &mut Vec<u32>,
) -> Result<Utf16Run, usize> {
    decoded.clear();
    let mut state = DecodeState::new();
    let mut r = start;
    let mut run = Utf16Run {
        end: start,
        encoded_len: 0,
        substitutions: 0,
    };

    while r + 2 <= len {
        let unit = u16::from_le_bytes([window[r], window[r + 1]]);
        r += 2;
        if unit == 0 {
            if state.is_pending() {
                return Err(r);
            }
            decoded.push(u32::from(b'\n'));
            run.encoded_len += 1;
            run.end = r;
            return Ok(run);
        }
        let mut cp = match decode_utf16_unit(&mut state, unit) {
            Utf16Step::CodePoint(cp) => cp,
            Utf16Step::AwaitingLowSurrogate => continue,
            Utf16Step::Error => return Err(r),
        };
        if u8::try_from(cp).is_ok_and(|b| b < 0x80 && !is_kept(b)) {
            cp = u32::from(b'\n');
            run.substitutions += 1;
        }
        decoded.push(cp);
        run.encoded_len += utf8_len(cp);
    }

    // content ended inside the run
    if state.is_pending() {
        return Err(r);
    }
    run.end = r;
    Ok(run)
}
