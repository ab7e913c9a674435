//! Stateless UTF-8 and UTF-16 primitives.
//!
//! These work on raw `u32` code points instead of `char` because the
//! normalizer needs to talk about values that are not (yet) scalar values,
//! e.g. a high surrogate waiting for its partner.

/// Largest Unicode code point.
pub const MAX_CODE_POINT: u32 = 0x10_FFFF;

/// Longest UTF-8 encoding of a single code point.
pub const MAX_UTF8_LEN: usize = 4;

const HIGH_SURROGATES: core::ops::RangeInclusive<u32> = 0xD800..=0xDBFF;
const LOW_SURROGATES: core::ops::RangeInclusive<u32> = 0xDC00..=0xDFFF;

/// Whether `cp` lies in the UTF-16 surrogate range `U+D800..=U+DFFF`.
#[inline]
#[must_use]
pub fn is_surrogate(cp: u32) -> bool {
    (0xD800..=0xDFFF).contains(&cp)
}

#[inline]
fn is_continuation(b: u8) -> bool {
    b & 0xC0 == 0x80
}

/// Decodes the UTF-8 sequence at the start of `bytes` per RFC 3629.
///
/// Returns the code point and the number of bytes it occupies, or `None` when
/// the sequence is truncated, overlong, encodes a surrogate, exceeds
/// `U+10FFFF`, or starts with a continuation byte or a 5+-byte lead byte.
#[must_use]
pub fn decode_utf8(bytes: &[u8]) -> Option<(u32, usize)> {
    let &b0 = bytes.first()?;
    if b0 < 0x80 {
        return Some((u32::from(b0), 1));
    }
    let (len, init, min) = match b0 {
        0xC2..=0xDF => (2, u32::from(b0 & 0x1F), 0x80),
        0xE0..=0xEF => (3, u32::from(b0 & 0x0F), 0x800),
        0xF0..=0xF4 => (4, u32::from(b0 & 0x07), 0x1_0000),
        // continuation bytes, overlong 2-byte leads (C0, C1), 5+-byte leads
        _ => return None,
    };
    let tail = bytes.get(1..len)?;
    let mut cp = init;
    for &b in tail {
        if !is_continuation(b) {
            return None;
        }
        cp = (cp << 6) | u32::from(b & 0x3F);
    }
    if cp < min || cp > MAX_CODE_POINT || is_surrogate(cp) {
        return None;
    }
    Some((cp, len))
}

/// Number of bytes [`encode_utf8`] writes for `cp`.
#[inline]
#[must_use]
pub fn utf8_len(cp: u32) -> usize {
    match cp {
        0..=0x7F => 1,
        0x80..=0x7FF => 2,
        0x800..=0xFFFF => 3,
        _ => 4,
    }
}

/// Encodes `cp` as UTF-8 into the front of `dst`, returning the byte count.
///
/// Callers pass scalar values; the length table alone decides the shape,
/// so surrogates are encoded as (invalid) 3-byte sequences rather than
/// rejected here.
///
/// # Panics
///
/// Panics if `dst` is shorter than [`utf8_len`]`(cp)`.
#[inline]
#[allow(clippy::cast_possible_truncation)]
pub fn encode_utf8(cp: u32, dst: &mut [u8]) -> usize {
    // every `as u8` below is masked or shifted into range first
    match utf8_len(cp) {
        1 => {
            dst[0] = cp as u8;
            1
        }
        2 => {
            dst[0] = 0xC0 | (cp >> 6) as u8;
            dst[1] = 0x80 | (cp & 0x3F) as u8;
            2
        }
        3 => {
            dst[0] = 0xE0 | (cp >> 12) as u8;
            dst[1] = 0x80 | ((cp >> 6) & 0x3F) as u8;
            dst[2] = 0x80 | (cp & 0x3F) as u8;
            3
        }
        _ => {
            dst[0] = 0xF0 | ((cp >> 18) & 0x07) as u8;
            dst[1] = 0x80 | ((cp >> 12) & 0x3F) as u8;
            dst[2] = 0x80 | ((cp >> 6) & 0x3F) as u8;
            dst[3] = 0x80 | (cp & 0x3F) as u8;
            4
        }
    }
}

/// Pending-surrogate bookkeeping for [`decode_utf16_unit`].
///
/// Holds the 10 payload bits of a high surrogate until its low surrogate
/// arrives. Reset on every completed code point and on every error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeState {
    pending_high: Option<u16>,
}

impl DecodeState {
    /// A state with nothing pending.
    #[must_use]
    pub const fn new() -> Self {
        Self { pending_high: None }
    }

    /// Whether a high surrogate is waiting for its low half.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending_high.is_some()
    }
}

/// Result of feeding one UTF-16 code unit to [`decode_utf16_unit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Utf16Step {
    /// A complete code point.
    CodePoint(u32),
    /// A high surrogate was stored; the next unit must be a low surrogate.
    AwaitingLowSurrogate,
    /// A low surrogate without a pending high surrogate, or a unit other than
    /// a low surrogate while one was pending.
    Error,
}

/// Feeds one UTF-16 code unit through the surrogate-pair state machine.
///
/// High `0xD800..=0xDBFF` followed by low `0xDC00..=0xDFFF` combine into
/// `((high - 0xD800) << 10 | (low - 0xDC00)) + 0x10000`.
pub fn decode_utf16_unit(state: &mut DecodeState, unit: u16) -> Utf16Step {
    let u = u32::from(unit);
    match state.pending_high.take() {
        Some(high) => {
            if LOW_SURROGATES.contains(&u) {
                let cp = ((u32::from(high) << 10) | (u - 0xDC00)) + 0x1_0000;
                Utf16Step::CodePoint(cp)
            } else {
                Utf16Step::Error
            }
        }
        None if HIGH_SURROGATES.contains(&u) => {
            state.pending_high = Some(unit - 0xD800);
            Utf16Step::AwaitingLowSurrogate
        }
        None if LOW_SURROGATES.contains(&u) => Utf16Step::Error,
        None => Utf16Step::CodePoint(u),
    }
}
