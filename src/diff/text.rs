// Line-oriented text sequences.

use super::sequence::{Sequence, SequenceComparator};

/// A byte buffer viewed as a sequence of lines.
///
/// Each line includes its terminating `\n`; the last line may lack one.
#[derive(Debug, Clone)]
pub struct RawText<'a> {
    content: &'a [u8],
    /// `lines[i]..lines[i + 1]` is line `i`.
    lines: Vec<usize>,
}

impl<'a> RawText<'a> {
    pub fn new(content: &'a [u8]) -> Self {
        let mut lines = Vec::with_capacity(content.len() / 32 + 2);
        lines.push(0);
        lines.extend(
            content
                .iter()
                .enumerate()
                .filter(|&(_, &c)| c == b'\n')
                .map(|(i, _)| i + 1),
        );
        if lines.last() != Some(&content.len()) {
            lines.push(content.len());
        }
        Self { content, lines }
    }

    pub fn content(&self) -> &'a [u8] {
        self.content
    }

    /// Line `i`, terminator included.
    pub fn line(&self, i: usize) -> &'a [u8] {
        &self.content[self.lines[i]..self.lines[i + 1]]
    }

    /// Line `i` without its `\n`.
    pub fn line_text(&self, i: usize) -> &'a [u8] {
        let line = self.line(i);
        line.strip_suffix(b"\n").unwrap_or(line)
    }

    /// Whether the buffer ends without a line terminator.
    pub fn is_missing_newline_at_end(&self) -> bool {
        !self.content.is_empty() && !self.content.ends_with(b"\n")
    }

    /// Heuristic binary check: a NUL byte in the first 8000 bytes.
    pub fn is_binary(content: &[u8]) -> bool {
        content.iter().take(8000).any(|&b| b == 0)
    }
}

impl Sequence for RawText<'_> {
    fn len(&self) -> usize {
        self.lines.len() - 1
    }
}

/// Line equality rules for `RawText`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RawTextComparator {
    /// Lines compare byte for byte.
    #[default]
    Default,
    /// All whitespace is ignored.
    IgnoreAllWhitespace,
    /// Whitespace at the end of a line is ignored.
    IgnoreTrailingWhitespace,
}

fn is_ws(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n' | 0x0b | 0x0c)
}

fn trim_end(line: &[u8]) -> &[u8] {
    let end = line.iter().rposition(|&b| !is_ws(b)).map_or(0, |p| p + 1);
    &line[..end]
}

/// djb2, one byte at a time.
fn hash_bytes(bytes: impl Iterator<Item = u8>) -> u32 {
    bytes.fold(5381u32, |h, b| h.wrapping_mul(33).wrapping_add(u32::from(b)))
}

impl SequenceComparator<RawText<'_>> for RawTextComparator {
    fn equals(&self, a: &RawText<'_>, ai: usize, b: &RawText<'_>, bi: usize) -> bool {
        let (la, lb) = (a.line(ai), b.line(bi));
        match self {
            RawTextComparator::Default => la == lb,
            RawTextComparator::IgnoreAllWhitespace => la
                .iter()
                .copied()
                .filter(|&c| !is_ws(c))
                .eq(lb.iter().copied().filter(|&c| !is_ws(c))),
            RawTextComparator::IgnoreTrailingWhitespace => trim_end(la) == trim_end(lb),
        }
    }

    fn hash(&self, seq: &RawText<'_>, i: usize) -> u32 {
        let line = seq.line(i);
        match self {
            RawTextComparator::Default => hash_bytes(line.iter().copied()),
            RawTextComparator::IgnoreAllWhitespace => {
                hash_bytes(line.iter().copied().filter(|&c| !is_ws(c)))
            }
            RawTextComparator::IgnoreTrailingWhitespace => hash_bytes(trim_end(line).iter().copied()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_lines_keeping_terminators() {
        let t = RawText::new(b"a\nbb\nccc");
        assert_eq!(t.len(), 3);
        assert_eq!(t.line(0), b"a\n");
        assert_eq!(t.line(1), b"bb\n");
        assert_eq!(t.line(2), b"ccc");
        assert_eq!(t.line_text(1), b"bb");
        assert!(t.is_missing_newline_at_end());
    }

    #[test]
    fn trailing_newline_adds_no_line() {
        let t = RawText::new(b"a\nb\n");
        assert_eq!(t.len(), 2);
        assert!(!t.is_missing_newline_at_end());
        assert_eq!(RawText::new(b"").len(), 0);
        assert_eq!(RawText::new(b"\n").len(), 1);
    }

    #[test]
    fn default_is_exact() {
        let a = RawText::new(b"x \n");
        let b = RawText::new(b"x\n");
        assert!(!RawTextComparator::Default.equals(&a, 0, &b, 0));
        assert!(RawTextComparator::Default.equals(&a, 0, &a, 0));
    }

    #[test]
    fn ignore_trailing_whitespace() {
        let a = RawText::new(b"x \t\n");
        let b = RawText::new(b"x");
        let c = RawText::new(b" x\n");
        let cmp = RawTextComparator::IgnoreTrailingWhitespace;
        assert!(cmp.equals(&a, 0, &b, 0));
        assert_eq!(cmp.hash(&a, 0), cmp.hash(&b, 0));
        assert!(!cmp.equals(&a, 0, &c, 0));
    }

    #[test]
    fn ignore_all_whitespace() {
        let a = RawText::new(b"f(a, b)\n");
        let b = RawText::new(b" f( a,b )");
        let cmp = RawTextComparator::IgnoreAllWhitespace;
        assert!(cmp.equals(&a, 0, &b, 0));
        assert_eq!(cmp.hash(&a, 0), cmp.hash(&b, 0));
    }

    #[test]
    fn binary_detection() {
        assert!(RawText::is_binary(b"ab\0cd"));
        assert!(!RawText::is_binary(b"plain text\n"));
    }
}
