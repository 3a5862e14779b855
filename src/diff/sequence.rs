// Sequences and the comparators that define element equality over them.
//
// The diff algorithms never look at elements directly.  They see a
// `Sequence` (something with a length) and a `SequenceComparator` that can
// test two positions for equality and hash one position.  Wrappers here
// cache hashes (`HashedSequence`) and re-project a region of a sequence as
// a sequence of its own (`Subsequence`).

use std::hash::{Hash, Hasher};

use rustc_hash::FxHasher;

use super::edit::{Edit, EditList};

/// An indexable run of elements.
pub trait Sequence {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Sequence for [T] {
    fn len(&self) -> usize {
        <[T]>::len(self)
    }
}

/// Equality and hashing over positions of a sequence type.
///
/// `equals(a, ai, b, bi)` implies `hash(a, ai) == hash(b, bi)`.
pub trait SequenceComparator<S: Sequence + ?Sized> {
    fn equals(&self, a: &S, ai: usize, b: &S, bi: usize) -> bool;

    fn hash(&self, seq: &S, i: usize) -> u32;

    /// Shrink `e` past the elements `a` and `b` share at its start and end.
    fn reduce_common_start_end(&self, a: &S, b: &S, mut e: Edit) -> Edit {
        while e.begin_a < e.end_a && e.begin_b < e.end_b && self.equals(a, e.begin_a, b, e.begin_b)
        {
            e.begin_a += 1;
            e.begin_b += 1;
        }
        while e.begin_a < e.end_a
            && e.begin_b < e.end_b
            && self.equals(a, e.end_a - 1, b, e.end_b - 1)
        {
            e.end_a -= 1;
            e.end_b -= 1;
        }
        e
    }
}

/// Compares slice elements with `Eq` and hashes them with `FxHasher`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SliceComparator;

impl<T: Eq + Hash> SequenceComparator<[T]> for SliceComparator {
    fn equals(&self, a: &[T], ai: usize, b: &[T], bi: usize) -> bool {
        a[ai] == b[bi]
    }

    fn hash(&self, seq: &[T], i: usize) -> u32 {
        let mut h = FxHasher::default();
        seq[i].hash(&mut h);
        let v = h.finish();
        (v ^ (v >> 32)) as u32
    }
}

// ---------------------------------------------------------------------------
// Hash cache
// ---------------------------------------------------------------------------

/// A sequence with every element's hash computed once up front.
pub struct HashedSequence<'a, S: Sequence + ?Sized> {
    base: &'a S,
    hashes: Vec<u32>,
}

impl<'a, S: Sequence + ?Sized> HashedSequence<'a, S> {
    pub fn new<C: SequenceComparator<S>>(cmp: &C, base: &'a S) -> Self {
        let hashes = (0..base.len()).map(|i| cmp.hash(base, i)).collect();
        Self { base, hashes }
    }

    pub fn base(&self) -> &'a S {
        self.base
    }
}

impl<S: Sequence + ?Sized> Sequence for HashedSequence<'_, S> {
    fn len(&self) -> usize {
        self.hashes.len()
    }
}

/// Comparator over `HashedSequence`s: hashes come from the cache, and
/// unequal hashes short-circuit equality.
pub struct HashedSequenceComparator<'c, C> {
    cmp: &'c C,
}

impl<'c, C> HashedSequenceComparator<'c, C> {
    pub fn new(cmp: &'c C) -> Self {
        Self { cmp }
    }
}

impl<S, C> SequenceComparator<HashedSequence<'_, S>> for HashedSequenceComparator<'_, C>
where
    S: Sequence + ?Sized,
    C: SequenceComparator<S>,
{
    fn equals(
        &self,
        a: &HashedSequence<'_, S>,
        ai: usize,
        b: &HashedSequence<'_, S>,
        bi: usize,
    ) -> bool {
        a.hashes[ai] == b.hashes[bi] && self.cmp.equals(a.base, ai, b.base, bi)
    }

    fn hash(&self, seq: &HashedSequence<'_, S>, i: usize) -> u32 {
        seq.hashes[i]
    }
}

// ---------------------------------------------------------------------------
// Region reprojection
// ---------------------------------------------------------------------------

/// `base[begin..begin + len]` viewed as a sequence indexed from zero.
pub struct Subsequence<'a, S: Sequence + ?Sized> {
    base: &'a S,
    begin: usize,
    len: usize,
}

impl<'a, S: Sequence + ?Sized> Subsequence<'a, S> {
    pub fn new(base: &'a S, begin: usize, end: usize) -> Self {
        assert!(
            begin <= end && end <= base.len(),
            "subsequence {begin}..{end} out of bounds for length {}",
            base.len()
        );
        Self {
            base,
            begin,
            len: end - begin,
        }
    }

    /// The A side of `region`.
    pub fn a(base: &'a S, region: &Edit) -> Self {
        Self::new(base, region.begin_a, region.end_a)
    }

    /// The B side of `region`.
    pub fn b(base: &'a S, region: &Edit) -> Self {
        Self::new(base, region.begin_b, region.end_b)
    }

    pub fn begin(&self) -> usize {
        self.begin
    }
}

impl<S: Sequence + ?Sized> Sequence for Subsequence<'_, S> {
    fn len(&self) -> usize {
        self.len
    }
}

/// Lifts a comparator over `S` to `Subsequence`s of `S`.
pub struct SubsequenceComparator<'c, C> {
    cmp: &'c C,
}

impl<'c, C> SubsequenceComparator<'c, C> {
    pub fn new(cmp: &'c C) -> Self {
        Self { cmp }
    }
}

impl<S, C> SequenceComparator<Subsequence<'_, S>> for SubsequenceComparator<'_, C>
where
    S: Sequence + ?Sized,
    C: SequenceComparator<S>,
{
    fn equals(&self, a: &Subsequence<'_, S>, ai: usize, b: &Subsequence<'_, S>, bi: usize) -> bool {
        self.cmp.equals(a.base, a.begin + ai, b.base, b.begin + bi)
    }

    fn hash(&self, seq: &Subsequence<'_, S>, i: usize) -> u32 {
        self.cmp.hash(seq.base, seq.begin + i)
    }
}

/// Translate edits made between two subsequences back into coordinates of
/// their base sequences.
pub fn to_base<S: Sequence + ?Sized>(
    edits: EditList,
    a: &Subsequence<'_, S>,
    b: &Subsequence<'_, S>,
) -> EditList {
    edits
        .into_iter()
        .map(|e| e.shift(a.begin, b.begin))
        .collect::<Vec<_>>()
        .into()
}
