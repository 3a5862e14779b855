// Edit regions and edit lists.

use std::fmt;
use std::ops::Deref;

/// Shape of an edit, derived from which of its two spans are empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditKind {
    /// Elements of B were added; the A span is empty.
    Insert,
    /// Elements of A were removed; the B span is empty.
    Delete,
    /// Elements of A were replaced by elements of B.
    Replace,
    /// Both spans are empty.
    Empty,
}

impl fmt::Display for EditKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EditKind::Insert => "INSERT",
            EditKind::Delete => "DELETE",
            EditKind::Replace => "REPLACE",
            EditKind::Empty => "EMPTY",
        })
    }
}

/// A pair of half-open spans: `A[begin_a..end_a]` becomes `B[begin_b..end_b]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Edit {
    pub begin_a: usize,
    pub end_a: usize,
    pub begin_b: usize,
    pub end_b: usize,
}

impl Edit {
    pub fn new(begin_a: usize, end_a: usize, begin_b: usize, end_b: usize) -> Self {
        debug_assert!(begin_a <= end_a, "begin_a {begin_a} > end_a {end_a}");
        debug_assert!(begin_b <= end_b, "begin_b {begin_b} > end_b {end_b}");
        Self {
            begin_a,
            end_a,
            begin_b,
            end_b,
        }
    }

    /// An empty edit positioned at `(a, b)`.
    pub fn empty_at(a: usize, b: usize) -> Self {
        Self::new(a, a, b, b)
    }

    pub fn kind(&self) -> EditKind {
        match (self.begin_a < self.end_a, self.begin_b < self.end_b) {
            (false, true) => EditKind::Insert,
            (true, false) => EditKind::Delete,
            (true, true) => EditKind::Replace,
            (false, false) => EditKind::Empty,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.begin_a == self.end_a && self.begin_b == self.end_b
    }

    pub fn len_a(&self) -> usize {
        self.end_a - self.begin_a
    }

    pub fn len_b(&self) -> usize {
        self.end_b - self.begin_b
    }

    /// The part of this region that lies before `cut`.
    pub fn before(&self, cut: &Edit) -> Edit {
        Edit::new(self.begin_a, cut.begin_a, self.begin_b, cut.begin_b)
    }

    /// The part of this region that lies after `cut`.
    pub fn after(&self, cut: &Edit) -> Edit {
        Edit::new(cut.end_a, self.end_a, cut.end_b, self.end_b)
    }

    /// Move both spans forward by `da` and `db`.
    pub fn shift(&self, da: usize, db: usize) -> Edit {
        Edit::new(
            self.begin_a + da,
            self.end_a + da,
            self.begin_b + db,
            self.end_b + db,
        )
    }
}

/// `REPLACE(3-5,3-4)`.
impl fmt::Display for Edit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({}-{},{}-{})",
            self.kind(),
            self.begin_a,
            self.end_a,
            self.begin_b,
            self.end_b
        )
    }
}

/// Ordered, non-overlapping edits transforming A into B.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditList(Vec<Edit>);

impl EditList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub(crate) fn push(&mut self, edit: Edit) {
        debug_assert!(
            self.0.last().is_none_or(|last| last.end_a <= edit.begin_a
                && last.end_b <= edit.begin_b),
            "edit {edit} out of order after {:?}",
            self.0.last()
        );
        self.0.push(edit);
    }

    pub(crate) fn extend(&mut self, edits: impl IntoIterator<Item = Edit>) {
        for e in edits {
            self.push(e);
        }
    }

    pub fn into_vec(self) -> Vec<Edit> {
        self.0
    }
}

impl Deref for EditList {
    type Target = [Edit];

    fn deref(&self) -> &[Edit] {
        &self.0
    }
}

impl From<Vec<Edit>> for EditList {
    fn from(edits: Vec<Edit>) -> Self {
        let mut list = EditList::new();
        list.extend(edits);
        list
    }
}

impl IntoIterator for EditList {
    type Item = Edit;
    type IntoIter = std::vec::IntoIter<Edit>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a EditList {
    type Item = &'a Edit;
    type IntoIter = std::slice::Iter<'a, Edit>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for EditList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EditList[")?;
        for (i, e) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{e}")?;
        }
        f.write_str("]")
    }
}
