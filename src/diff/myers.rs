//! Myers' O(ND) difference algorithm, linear-space refinement.
//!
//! Each step runs the greedy search from both ends of a region at once,
//! over diagonals `k = x - y`, until the forward and reverse frontiers
//! overlap.  The overlap (the middle snake) lies on some optimal path, so
//! the region splits there into two halves of roughly `D / 2` edits each,
//! and each half is solved the same way.
//!
//! The two frontiers are sized once for the whole input and reused by every
//! subproblem, so space is O(N + M).  Time stays O((N + M) D).
//!
//! # References
//!
//! - Myers, E.W. "An O(ND) Difference Algorithm and Its Variations" (1986),
//!   section 4b

use std::ops::{Index, IndexMut};

use super::algorithm::DiffAlgorithm;
use super::edit::{Edit, EditList};
use super::sequence::{Sequence, SequenceComparator};

/// Minimal edit script search.
#[derive(Debug, Clone, Copy, Default)]
pub struct MyersDiff;

impl MyersDiff {
    pub fn new() -> Self {
        Self
    }
}

impl DiffAlgorithm for MyersDiff {
    fn diff_non_common<S, C>(&self, cmp: &C, a: &S, b: &S) -> EditList
    where
        S: Sequence + ?Sized,
        C: SequenceComparator<S>,
    {
        let (n, m) = (a.len(), b.len());
        let mut edits = EditList::new();
        if n == 0 && m == 0 {
            return edits;
        }
        if n == 0 || m == 0 {
            edits.push(Edit::new(0, n, 0, m));
            return edits;
        }

        let max_d = (n + m).div_ceil(2) + 1;
        let mut search = Search {
            cmp,
            a,
            b,
            fwd: Frontier::new(max_d),
            rev: Frontier::new(max_d),
            edits: Vec::new(),
            splits: 0,
        };
        search.conquer(Edit::new(0, n, 0, m));
        log::trace!(
            "myers: {n}x{m}, {} splits, {} edits",
            search.splits,
            search.edits.len()
        );
        edits.extend(search.edits);
        edits
    }
}

/// Furthest-reaching `x` per diagonal, indexed by `k` in `-max_d..=max_d`.
struct Frontier {
    offset: isize,
    v: Vec<usize>,
}

impl Frontier {
    fn new(max_d: usize) -> Self {
        Self {
            offset: max_d as isize,
            v: vec![0; 2 * max_d + 1],
        }
    }
}

impl Index<isize> for Frontier {
    type Output = usize;

    fn index(&self, k: isize) -> &usize {
        &self.v[(k + self.offset) as usize]
    }
}

impl IndexMut<isize> for Frontier {
    fn index_mut(&mut self, k: isize) -> &mut usize {
        &mut self.v[(k + self.offset) as usize]
    }
}

struct Search<'s, S: ?Sized, C> {
    cmp: &'s C,
    a: &'s S,
    b: &'s S,
    fwd: Frontier,
    rev: Frontier,
    edits: Vec<Edit>,
    splits: usize,
}

impl<S, C> Search<'_, S, C>
where
    S: Sequence + ?Sized,
    C: SequenceComparator<S>,
{
    /// Emit the edits for `region`, in order, merging any that touch.
    fn conquer(&mut self, region: Edit) {
        let region = self.cmp.reduce_common_start_end(self.a, self.b, region);
        if region.is_empty() {
            return;
        }
        if region.len_a() == 0 || region.len_b() == 0 {
            self.push(region);
            return;
        }
        match self.middle_snake(&region) {
            Some((x, y)) => {
                self.splits += 1;
                self.conquer(Edit::new(region.begin_a, x, region.begin_b, y));
                self.conquer(Edit::new(x, region.end_a, y, region.end_b));
            }
            None => self.push(region),
        }
    }

    fn push(&mut self, e: Edit) {
        match self.edits.last_mut() {
            Some(last) if last.end_a == e.begin_a && last.end_b == e.begin_b => {
                last.end_a = e.end_a;
                last.end_b = e.end_b;
            }
            _ => self.edits.push(e),
        }
    }

    /// Find the start of a snake on an optimal path through `r`.
    ///
    /// `r` must have both sides non-empty and differ at both ends.  The
    /// reverse frontier counts `x` from `r.end_a` backwards; reverse
    /// diagonal `k` meets forward diagonal `delta - k`.
    fn middle_snake(&mut self, r: &Edit) -> Option<(usize, usize)> {
        let (n, m) = (r.len_a(), r.len_b());
        let (cmp, a, b) = (self.cmp, self.a, self.b);
        let delta = n as isize - m as isize;
        let odd = delta & 1 != 0;
        let max_d = ((n + m).div_ceil(2) + 1) as isize;
        self.fwd[1] = 0;
        self.rev[1] = 0;

        for d in 0..max_d {
            for k in (-d..=d).rev().step_by(2) {
                let mut x = if k == -d || (k != d && self.fwd[k - 1] < self.fwd[k + 1]) {
                    self.fwd[k + 1]
                } else {
                    self.fwd[k - 1] + 1
                };
                let (x0, y0) = (x, (x as isize - k) as usize);
                let mut y = y0;
                while x < n && y < m && cmp.equals(a, r.begin_a + x, b, r.begin_b + y) {
                    x += 1;
                    y += 1;
                }
                self.fwd[k] = x;
                if odd && (k - delta).abs() < d && x + self.rev[delta - k] >= n {
                    return Some((r.begin_a + x0, r.begin_b + y0));
                }
            }

            for k in (-d..=d).rev().step_by(2) {
                let mut x = if k == -d || (k != d && self.rev[k - 1] < self.rev[k + 1]) {
                    self.rev[k + 1]
                } else {
                    self.rev[k - 1] + 1
                };
                let mut y = (x as isize - k) as usize;
                while x < n && y < m && cmp.equals(a, r.end_a - x - 1, b, r.end_b - y - 1) {
                    x += 1;
                    y += 1;
                }
                self.rev[k] = x;
                if !odd && (k - delta).abs() <= d && x + self.fwd[delta - k] >= n {
                    return Some((r.end_a - x, r.end_b - y));
                }
            }
        }
        None
    }
}
