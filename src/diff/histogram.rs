//! Histogram diff.
//!
//! An extended form of patience diff: rather than requiring elements that
//! are unique on both sides, each region is split at the common run whose
//! elements occur least often in A.  The regions before and after that run
//! are then processed the same way until they are pure inserts, pure
//! deletes, or have nothing in common at all.
//!
//! Regions whose elements are too repetitive for the histogram to stay
//! within `max_chain_length` are handed to the fallback algorithm, or
//! reported as one replace when there is none.
//!
//! This implementation is based on the following sources:
//! 1. [Bram Cohen's blog](https://bramcohen.livejournal.com/73318.html).
//! 2. [Git implementation in C](https://github.com/git/git/blob/master/xdiff/xhistogram.c)

use super::algorithm::DiffAlgorithm;
use super::edit::{Edit, EditKind, EditList};
use super::histogram_index::{HistogramIndex, Lcs};
use super::myers::MyersDiff;
use super::sequence::{
    HashedSequence, HashedSequenceComparator, Sequence, SequenceComparator, Subsequence,
    SubsequenceComparator, to_base,
};

/// Default bound on distinct elements per histogram bucket.
pub const DEFAULT_MAX_CHAIN_LENGTH: usize = 64;

/// Histogram diff with an optional fallback for repetitive regions.
///
/// # Example
/// ```
/// use histdelta::diff::{DiffAlgorithm, Edit, HistogramDiff, SliceComparator};
///
/// let a = ["fn a() {", "}", "fn b() {", "}"];
/// let b = ["fn a() {", "}", "fn c() {", "}", "fn b() {", "}"];
/// let edits = HistogramDiff::new().diff(&SliceComparator, &a[..], &b[..]);
/// assert_eq!(&*edits, &[Edit::new(2, 2, 2, 4)]);
/// ```
#[derive(Debug, Clone)]
pub struct HistogramDiff<F = MyersDiff> {
    max_chain_length: usize,
    fallback: Option<F>,
}

impl HistogramDiff<MyersDiff> {
    pub fn new() -> Self {
        Self {
            max_chain_length: DEFAULT_MAX_CHAIN_LENGTH,
            fallback: Some(MyersDiff),
        }
    }
}

impl Default for HistogramDiff<MyersDiff> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: DiffAlgorithm> HistogramDiff<F> {
    /// Set the per-bucket bound.
    ///
    /// # Panics
    /// If `max_chain_length` is zero.
    pub fn with_max_chain_length(mut self, max_chain_length: usize) -> Self {
        assert!(max_chain_length > 0, "max_chain_length must be positive");
        self.max_chain_length = max_chain_length;
        self
    }

    /// Replace the fallback algorithm.
    pub fn with_fallback<G: DiffAlgorithm>(self, fallback: G) -> HistogramDiff<G> {
        HistogramDiff {
            max_chain_length: self.max_chain_length,
            fallback: Some(fallback),
        }
    }

    /// Report repetitive regions as a single replace.
    pub fn without_fallback(mut self) -> Self {
        self.fallback = None;
        self
    }

    pub fn max_chain_length(&self) -> usize {
        self.max_chain_length
    }

    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }
}

impl<F: DiffAlgorithm> DiffAlgorithm for HistogramDiff<F> {
    fn diff_non_common<S, C>(&self, cmp: &C, a: &S, b: &S) -> EditList
    where
        S: Sequence + ?Sized,
        C: SequenceComparator<S>,
    {
        let ha = HashedSequence::new(cmp, a);
        let hb = HashedSequence::new(cmp, b);
        let hc = HashedSequenceComparator::new(cmp);
        let mut state = State {
            alg: self,
            cmp: &hc,
            a: &ha,
            b: &hb,
            stack: Vec::new(),
            edits: EditList::new(),
        };
        state.run(Edit::new(0, a.len(), 0, b.len()));
        state.edits
    }
}

/// One diff in progress.  Regions wait on an explicit stack so deeply
/// nested splits never grow the call stack.
struct State<'s, 'a, F, S: Sequence + ?Sized, C> {
    alg: &'s HistogramDiff<F>,
    cmp: &'s HashedSequenceComparator<'s, C>,
    a: &'s HashedSequence<'a, S>,
    b: &'s HashedSequence<'a, S>,
    /// Pending regions; the top is the leftmost.
    stack: Vec<Edit>,
    edits: EditList,
}

impl<F, S, C> State<'_, '_, F, S, C>
where
    F: DiffAlgorithm,
    S: Sequence + ?Sized,
    C: SequenceComparator<S>,
{
    fn run(&mut self, region: Edit) {
        if !region.is_empty() {
            self.stack.push(region);
        }
        while let Some(r) = self.stack.pop() {
            self.diff(r);
        }
    }

    fn diff(&mut self, r: Edit) {
        match r.kind() {
            EditKind::Insert | EditKind::Delete => self.edits.push(r),
            EditKind::Replace => self.diff_replace(r),
            EditKind::Empty => panic!("empty region {r} reached the histogram dispatcher"),
        }
    }

    fn diff_replace(&mut self, r: Edit) {
        let lcs = HistogramIndex::new(self.alg.max_chain_length, self.cmp, self.a, self.b, r)
            .find_longest_common_sequence();
        match lcs {
            Lcs::Found(lcs) if lcs.is_empty() => self.edits.push(r),
            Lcs::Found(lcs) => {
                // After first so the region before pops next.
                for part in [r.after(&lcs), r.before(&lcs)] {
                    if !part.is_empty() {
                        self.stack.push(part);
                    }
                }
            }
            Lcs::TooCommon => match &self.alg.fallback {
                Some(fallback) => {
                    log::debug!("histogram: region {r} too repetitive, using fallback");
                    let sa = Subsequence::a(self.a, &r);
                    let sb = Subsequence::b(self.b, &r);
                    let cs = SubsequenceComparator::new(self.cmp);
                    let res = fallback.diff_non_common(&cs, &sa, &sb);
                    self.edits.extend(to_base(res, &sa, &sb));
                }
                None => {
                    log::debug!("histogram: region {r} too repetitive, replacing");
                    self.edits.push(r);
                }
            },
        }
    }
}
