/// A byte cursor over the HTML being tokenized.
///
/// Only ever stops on ASCII structural bytes (`<`, `>`) or at the end of the
/// input, so every position it reports is a UTF-8 char boundary.
#[derive(Clone)]
pub struct Cursor<'a> {
    /// The string being scanned.
    pub s: &'a str,
    /// Current byte index into `s`.
    pub i: usize,
}

impl<'a> Cursor<'a> {
    /// Creates a new cursor at the start of `s`.
    pub fn new(s: &'a str) -> Self {
        Self { s, i: 0 }
    }

    /// Returns the current byte position.
    pub fn pos(&self) -> usize {
        self.i
    }

    /// Absolute position of the next `byte` at or after `from`.
    pub fn find_from(&self, from: usize, byte: u8) -> Option<usize> {
        let bytes = self.s.as_bytes();
        if from >= bytes.len() {
            return None;
        }
        bytes[from..].iter().position(|&b| b == byte).map(|rel| from + rel)
    }

    /// Moves to an absolute byte position, clamped to the end of input.
    pub fn seek(&mut self, pos: usize) {
        self.i = pos.min(self.s.len());
    }

    /// Moves to the end of input.
    pub fn finish(&mut self) {
        self.i = self.s.len();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seek_moves_the_position() {
        let mut cur = Cursor::new("a<b>");
        assert_eq!(cur.pos(), 0);
        cur.seek(1);
        assert_eq!(cur.pos(), 1);
    }

    #[test]
    fn find_from_returns_absolute_positions() {
        let cur = Cursor::new("x<y>z>");
        assert_eq!(cur.find_from(0, b'<'), Some(1));
        assert_eq!(cur.find_from(2, b'>'), Some(3));
        assert_eq!(cur.find_from(4, b'>'), Some(5));
        assert_eq!(cur.find_from(6, b'>'), None);
    }

    #[test]
    fn empty_string_input() {
        let cur = Cursor::new("");
        assert_eq!(cur.find_from(0, b'<'), None);
    }

    #[test]
    fn seek_past_end_is_clamped() {
        let mut cur = Cursor::new("hi");
        cur.seek(10);
        assert_eq!(cur.pos(), 2);
    }

    #[test]
    fn finish_moves_to_end() {
        let mut cur = Cursor::new("hello");
        cur.finish();
        assert_eq!(cur.pos(), 5);
    }
}
