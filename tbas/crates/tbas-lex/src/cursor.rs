//! Byte cursor for traversing BASIC source text.
//!
//! The cursor maintains the single program position that the whole
//! interpreter shares. Jumps are expressed as snapshots taken earlier and
//! restored later, never as raw offsets handed around on their own.

/// Read position within a source buffer.
///
/// The dialect is ASCII and newline is the only byte with structural
/// meaning, so the cursor works on bytes. Past the end of the source it
/// reports the sentinel `0`, which the scanner treats as end of program.
pub struct Cursor<'a> {
    /// The source text being traversed.
    source: &'a str,

    /// Current byte position in the source.
    position: usize,

    /// Current line number (1-based).
    line: u32,
}

impl<'a> Cursor<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            position: 0,
            line: 1,
        }
    }

    /// Byte at the cursor, or `0` at end of source.
    #[inline]
    pub fn current(&self) -> u8 {
        self.source
            .as_bytes()
            .get(self.position)
            .copied()
            .unwrap_or(0)
    }

    /// Moves to the next byte. Does nothing at end of source.
    #[inline]
    pub fn advance(&mut self) {
        if let Some(&byte) = self.source.as_bytes().get(self.position) {
            self.position += 1;
            if byte == b'\n' {
                self.line += 1;
            }
        }
    }

    pub fn is_at_end(&self) -> bool {
        self.position >= self.source.len()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    /// Source text between `start` and the current position.
    pub fn slice_from(&self, start: usize) -> &'a str {
        &self.source[start..self.position]
    }

    /// Moves to the first byte of the next line, or to end of source when
    /// there is no further newline.
    pub fn seek_next_line(&mut self) {
        while self.current() != b'\n' && !self.is_at_end() {
            self.advance();
        }
        if self.current() == b'\n' {
            self.advance();
        }
    }

    /// Saves the current position as a jump target.
    pub fn snapshot(&self) -> CursorSnapshot {
        CursorSnapshot {
            position: self.position,
            line: self.line,
        }
    }

    /// Restores a previously saved position.
    pub fn restore(&mut self, snapshot: CursorSnapshot) {
        self.position = snapshot.position;
        self.line = snapshot.line;
    }
}

/// Saved cursor state. Control flow stores these and restores them instead
/// of reconstructing positions by hand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CursorSnapshot {
    /// Byte position in the source.
    pub position: usize,
    /// Line number (1-based).
    pub line: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_cursor() {
        let cursor = Cursor::new("10 PRINT A");
        assert_eq!(cursor.current(), b'1');
        assert_eq!(cursor.position(), 0);
        assert_eq!(cursor.line(), 1);
    }

    #[test]
    fn test_advance() {
        let mut cursor = Cursor::new("ab");
        assert_eq!(cursor.current(), b'a');
        cursor.advance();
        assert_eq!(cursor.current(), b'b');
        cursor.advance();
        assert_eq!(cursor.current(), 0);
        cursor.advance();
        assert!(cursor.is_at_end());
    }

    #[test]
    fn test_sentinel_at_end() {
        let mut cursor = Cursor::new("");
        assert!(cursor.is_at_end());
        assert_eq!(cursor.current(), 0);
        cursor.advance();
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_line_tracking() {
        let mut cursor = Cursor::new("10 A\n20 B\n");
        assert_eq!(cursor.line(), 1);
        cursor.seek_next_line();
        assert_eq!(cursor.line(), 2);
        assert_eq!(cursor.current(), b'2');
        cursor.seek_next_line();
        assert_eq!(cursor.line(), 3);
        assert!(cursor.is_at_end());
    }

    #[test]
    fn test_seek_next_line_without_newline() {
        let mut cursor = Cursor::new("10 END");
        cursor.seek_next_line();
        assert!(cursor.is_at_end());
    }

    #[test]
    fn test_slice_from() {
        let mut cursor = Cursor::new("PRINT 42");
        let start = cursor.position();
        for _ in 0..5 {
            cursor.advance();
        }
        assert_eq!(cursor.slice_from(start), "PRINT");
    }

    #[test]
    fn test_snapshot_restore() {
        let mut cursor = Cursor::new("10 A\n20 B\n");
        let saved = cursor.snapshot();
        cursor.seek_next_line();
        assert_eq!(cursor.line(), 2);

        cursor.restore(saved);
        assert_eq!(cursor.position(), 0);
        assert_eq!(cursor.line(), 1);
        assert_eq!(cursor.current(), b'1');
    }
}
