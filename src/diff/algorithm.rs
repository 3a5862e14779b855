// The capability shared by every diff algorithm in the crate.

use super::edit::{Edit, EditKind, EditList};
use super::sequence::{Sequence, SequenceComparator, Subsequence, SubsequenceComparator, to_base};

/// Computes an edit list between two sequences.
///
/// Implementors provide `diff_non_common`, which may assume its inputs
/// share no common prefix or suffix.  `diff` strips those first.
pub trait DiffAlgorithm {
    /// Edits transforming `a` into `b`.
    fn diff<S, C>(&self, cmp: &C, a: &S, b: &S) -> EditList
    where
        S: Sequence + ?Sized,
        C: SequenceComparator<S>,
    {
        let region = cmp.reduce_common_start_end(a, b, Edit::new(0, a.len(), 0, b.len()));
        let mut edits = EditList::new();
        match region.kind() {
            EditKind::Empty => {}
            EditKind::Insert | EditKind::Delete => edits.push(region),
            EditKind::Replace => {
                let sa = Subsequence::a(a, &region);
                let sb = Subsequence::b(b, &region);
                let cs = SubsequenceComparator::new(cmp);
                edits = to_base(self.diff_non_common(&cs, &sa, &sb), &sa, &sb);
            }
        }
        edits
    }

    /// Edits transforming `a` into `b`, without first trimming what they
    /// share at either end.
    fn diff_non_common<S, C>(&self, cmp: &C, a: &S, b: &S) -> EditList
    where
        S: Sequence + ?Sized,
        C: SequenceComparator<S>;
}
