//! `TextBuffer`: one contiguous byte allocation with a zeroed sentinel region
//! past its content.
//!
//! Layout
//! ```text
//! 0                length         length + SENTINEL_SIZE         capacity
//! |---- content ----|---- zeros ----|---------- scratch ----------|
//! ```
//!
//! Invariants
//! - An allocated buffer always satisfies
//!   `capacity >= length + SENTINEL_SIZE`.
//! - While the buffer is sealed, bytes `[length, length + SENTINEL_SIZE)` are
//!   zero. Construction, [`TextBuffer::seal`] and every normalizer pass leave
//!   the buffer sealed. Raw fills through [`TextBuffer::spare_mut`] or
//!   [`TextBuffer::capacity_view_mut`] unseal it until the next `seal()`.
//! - The empty state (`length == capacity == 0`, no allocation) is the only
//!   state that has no sentinel region. It is what `Default`, `clear()` and
//!   `take()` produce, and the only state [`TextBuffer::reserve`] accepts.
//!
//! Readers (the scanner, the normalizer) rely on the sentinel to look ahead a
//! bounded number of bytes past `length` without checking for the end of the
//! content first: a zero byte always terminates a line and a UTF-16 run.
//!
//! The whole allocation is kept initialized (`Vec<u8>` with
//! `len == capacity`), so every view is a plain safe slice.

use alloc::vec::Vec;
use core::fmt;

use bstr::ByteSlice;

use crate::error::{Error, Result};

/// Number of zero bytes guaranteed to follow the content of a sealed buffer.
pub const SENTINEL_SIZE: usize = 16;

/// Smallest allocation handed out by [`TextBuffer::allocate`].
pub const MIN_CAPACITY: usize = 4 * SENTINEL_SIZE;

/// A growable byte buffer with a guaranteed zero margin past its content.
#[derive(Default, PartialEq, Eq)]
pub struct TextBuffer {
    data: Vec<u8>,
    length: usize,
}

impl TextBuffer {
    /// Creates the empty, unallocated buffer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            data: Vec::new(),
            length: 0,
        }
    }

    /// Allocates a buffer with `capacity >= max(capacity_hint, MIN_CAPACITY)`
    /// and no content. The sentinel region is zeroed.
    ///
    /// # Errors
    ///
    /// [`crate::ErrorKind::OutOfMemory`] when the allocation fails.
    pub fn allocate(capacity_hint: usize) -> Result<Self> {
        let mut buf = Self::new();
        buf.data = zeroed(capacity_hint.max(MIN_CAPACITY))?;
        Ok(buf)
    }

    /// Copies `bytes` into a fresh buffer and seals it.
    ///
    /// # Errors
    ///
    /// [`crate::ErrorKind::OutOfMemory`] when the allocation fails.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_bytes_with_capacity(bytes, 0)
    }

    /// Like [`TextBuffer::from_bytes`], but leaves room for at least
    /// `requested_capacity` bytes in total, so a later pass can use the space
    /// past the sentinel as scratch.
    ///
    /// # Errors
    ///
    /// [`crate::ErrorKind::OutOfMemory`] when the allocation fails.
    pub fn from_bytes_with_capacity(bytes: &[u8], requested_capacity: usize) -> Result<Self> {
        let capacity = bytes
            .len()
            .checked_add(SENTINEL_SIZE)
            .ok_or_else(|| Error::out_of_memory(usize::MAX))?
            .max(requested_capacity);
        let mut data = zeroed(capacity)?;
        data[..bytes.len()].copy_from_slice(bytes);
        Ok(Self {
            data,
            length: bytes.len(),
        })
    }

    /// Allocates room for `n` content bytes plus the sentinel.
    ///
    /// Only valid on an empty buffer: reserving never moves existing content.
    ///
    /// # Errors
    ///
    /// [`crate::ErrorKind::OutOfMemory`] when the allocation fails.
    ///
    /// # Panics
    ///
    /// Panics if the buffer already holds an allocation.
    pub fn reserve(&mut self, n: usize) -> Result<()> {
        assert!(
            self.data.is_empty() && self.length == 0,
            "TextBuffer::reserve() on an allocated buffer"
        );
        let capacity = n
            .checked_add(SENTINEL_SIZE)
            .ok_or_else(|| Error::out_of_memory(usize::MAX))?;
        self.data = zeroed(capacity)?;
        Ok(())
    }

    /// Grows the allocation so that at least `n` content bytes fit in front of
    /// the sentinel. Content and sentinel are preserved; an empty buffer gets
    /// a fresh allocation.
    ///
    /// # Errors
    ///
    /// [`crate::ErrorKind::OutOfMemory`] when the reallocation fails.
    pub fn grow(&mut self, n: usize) -> Result<()> {
        let needed = n
            .checked_add(SENTINEL_SIZE)
            .ok_or_else(|| Error::out_of_memory(usize::MAX))?;
        if needed <= self.data.len() {
            return Ok(());
        }
        let additional = needed - self.data.len();
        self.data
            .try_reserve_exact(additional)
            .map_err(|e| Error::from_reserve(needed, &e))?;
        self.data.resize(needed, 0);
        Ok(())
    }

    /// Replaces the content with a copy of `bytes`, reusing the allocation
    /// when it is large enough, and seals.
    ///
    /// # Errors
    ///
    /// [`crate::ErrorKind::OutOfMemory`] when the buffer has to grow and
    /// cannot.
    pub fn assign(&mut self, bytes: &[u8]) -> Result<()> {
        self.length = 0;
        self.grow(bytes.len())?;
        self.data[..bytes.len()].copy_from_slice(bytes);
        self.length = bytes.len();
        self.seal();
        Ok(())
    }

    /// Records how many bytes of a just-filled region are content.
    ///
    /// Follow with [`TextBuffer::seal`] unless the trailing bytes are known to
    /// be zero.
    ///
    /// # Panics
    ///
    /// Panics if `n + SENTINEL_SIZE` exceeds the capacity.
    pub fn set_length(&mut self, n: usize) {
        assert!(
            n.checked_add(SENTINEL_SIZE)
                .is_some_and(|end| end <= self.data.len()),
            "TextBuffer::set_length({n}) exceeds capacity {} minus sentinel",
            self.data.len()
        );
        self.length = n;
    }

    /// Zeroes the `SENTINEL_SIZE` bytes that follow the content.
    ///
    /// Must be called after any raw fill before the buffer is scanned or
    /// normalized. A no-op on the empty buffer.
    pub fn seal(&mut self) {
        if self.data.is_empty() {
            return;
        }
        self.data[self.length..self.length + SENTINEL_SIZE].fill(0);
    }

    /// Whether the sentinel region is currently all zeros.
    #[must_use]
    pub fn is_sealed(&self) -> bool {
        self.data.is_empty()
            || self.data[self.length..self.length + SENTINEL_SIZE]
                .iter()
                .all(|&b| b == 0)
    }

    /// Number of content bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.length
    }

    /// Whether there is no content.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Total allocation size, sentinel and scratch included.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Whether the buffer holds an allocation at all.
    #[must_use]
    pub fn is_allocated(&self) -> bool {
        !self.data.is_empty()
    }

    /// The content, `[0, length)`.
    #[must_use]
    pub fn content(&self) -> &[u8] {
        &self.data[..self.length]
    }

    /// The whole allocation, `[0, capacity)`.
    #[must_use]
    pub fn capacity_view(&self) -> &[u8] {
        &self.data
    }

    /// Mutable view over the whole allocation, for in-place rewrites.
    ///
    /// Callers that change the content must finish with
    /// [`TextBuffer::set_length`] and [`TextBuffer::seal`].
    pub fn capacity_view_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// The fill region past the content that leaves room for the sentinel:
    /// `[length, capacity - SENTINEL_SIZE)`. Empty for the empty buffer.
    pub fn spare_mut(&mut self) -> &mut [u8] {
        let end = self.data.len().saturating_sub(SENTINEL_SIZE);
        let start = self.length.min(end);
        &mut self.data[start..end]
    }

    /// Copies the occupied region (`length + SENTINEL_SIZE`) into a fresh,
    /// tightly sized allocation.
    ///
    /// # Errors
    ///
    /// [`crate::ErrorKind::OutOfMemory`] when the allocation fails.
    pub fn try_clone(&self) -> Result<Self> {
        if self.data.is_empty() {
            return Ok(Self::new());
        }
        let occupied = self.length + SENTINEL_SIZE;
        let mut data = zeroed(occupied)?;
        data.copy_from_slice(&self.data[..occupied]);
        Ok(Self {
            data,
            length: self.length,
        })
    }

    /// Moves the allocation out, leaving `self` empty.
    #[must_use]
    pub fn take(&mut self) -> Self {
        core::mem::take(self)
    }

    /// Releases the allocation and returns to the empty state.
    pub fn clear(&mut self) {
        self.data = Vec::new();
        self.length = 0;
    }
}

impl Clone for TextBuffer {
    /// Same as [`TextBuffer::try_clone`] but aborts on allocation failure, like
    /// `Vec::clone`.
    fn clone(&self) -> Self {
        if self.data.is_empty() {
            return Self::new();
        }
        let occupied = self.length + SENTINEL_SIZE;
        Self {
            data: self.data[..occupied].to_vec(),
            length: self.length,
        }
    }
}

impl fmt::Debug for TextBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextBuffer")
            .field("content", &self.content().as_bstr())
            .field("length", &self.length)
            .field("capacity", &self.data.len())
            .finish()
    }
}

fn zeroed(capacity: usize) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    data.try_reserve_exact(capacity)
        .map_err(|e| Error::from_reserve(capacity, &e))?;
    data.resize(capacity, 0);
    Ok(data)
}
