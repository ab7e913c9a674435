use core::{fmt, ops::Index};

use crate::options::ParseOptions;

/// What the scanner does when it meets a byte.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Action {
    /// Ordinary content.
    #[default]
    NoAction,
    /// Terminates the current line. The sentinel's zero bytes carry this
    /// action, which is what bounds every forward scan.
    EndOfLine,
    /// Blank: skipped at a line start, trimmed at a line end.
    SkipWhitespace,
    /// Starts a comment line when it is the first non-blank byte of a line.
    SkipComment,
}

/// A 256-entry byte to [`Action`] map.
///
/// Built per scan from [`ParseOptions`]; plain data, so specialized scanners
/// can patch individual entries with [`ActionTable::set`] before use.
#[derive(Clone, PartialEq, Eq)]
pub struct ActionTable([Action; 256]);

impl ActionTable {
    /// Builds the table for `options`:
    ///
    /// - `\r`, `\n` and NUL end a line;
    /// - space, tab and vertical tab are whitespace when
    ///   `trim_outer_whitespace` is set;
    /// - `#` starts a comment when `accept_comment_lines` is set;
    /// - everything else is content.
    #[must_use]
    pub fn new(options: &ParseOptions) -> Self {
        let mut table = Self::bare();
        if options.trim_outer_whitespace {
            for b in [b' ', b'\t', 0x0B] {
                table.set(b, Action::SkipWhitespace);
            }
        }
        if options.accept_comment_lines {
            table.set(b'#', Action::SkipComment);
        }
        table
    }

    /// The minimal table: only `\r`, `\n` and NUL are classified.
    #[must_use]
    pub fn bare() -> Self {
        let mut actions = [Action::NoAction; 256];
        actions[usize::from(b'\r')] = Action::EndOfLine;
        actions[usize::from(b'\n')] = Action::EndOfLine;
        actions[0] = Action::EndOfLine;
        Self(actions)
    }

    /// Overrides the action for one byte value.
    ///
    /// NUL must stay [`Action::EndOfLine`]: the sentinel relies on it.
    ///
    /// # Panics
    ///
    /// Panics when asked to reclassify NUL.
    pub fn set(&mut self, byte: u8, action: Action) {
        assert!(
            byte != 0 || action == Action::EndOfLine,
            "NUL must stay an end-of-line byte"
        );
        self.0[usize::from(byte)] = action;
    }

    /// The action for `byte`.
    #[inline]
    #[must_use]
    pub fn get(&self, byte: u8) -> Action {
        self.0[usize::from(byte)]
    }
}

impl Default for ActionTable {
    fn default() -> Self {
        Self::new(&ParseOptions::default())
    }
}

impl Index<u8> for ActionTable {
    type Output = Action;

    #[inline]
    fn index(&self, byte: u8) -> &Action {
        &self.0[usize::from(byte)]
    }
}

impl fmt::Debug for ActionTable {
    /// Lists only the bytes that are not [`Action::NoAction`].
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                (0u8..=255)
                    .filter(|&b| self.get(b) != Action::NoAction)
                    .map(|b| (char::from(b), self.get(b))),
            )
            .finish()
    }
}
