// Occurrence histogram of one region of A, and the search for the
// lowest-occurrence common run between that region and the same region of B.
//
// Layout:
//   - `table[bucket]` is the index of the first record in the bucket, or 0.
//   - `recs[i]` describes one distinct element of A: the next record in the
//     same bucket, the element's earliest position, and how often it occurs
//     (saturating at MAX_CNT).  Slot 0 is unused.
//   - `next[ptr]` links each position of A to the next later position of the
//     same element; `rec_of[ptr]` maps a position back to its record.
//
// Positions in `next`/`rec_of` are relative to the region start.

use super::edit::Edit;
use super::sequence::{HashedSequence, HashedSequenceComparator, Sequence, SequenceComparator};

/// Occurrence counts saturate here.
const MAX_CNT: u32 = 255;

/// End of a position chain.
const NONE: usize = usize::MAX;

#[derive(Debug, Clone, Copy)]
struct Rec {
    next: usize,
    ptr: usize,
    cnt: u32,
}

/// Outcome of a common-run search over one region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lcs {
    /// The best split point.  An empty edit means the region has nothing in
    /// common and is one replace.
    Found(Edit),
    /// The region is too repetitive to search within the chain bound.
    TooCommon,
}

pub struct HistogramIndex<'s, 'a, S: Sequence + ?Sized, C> {
    max_chain_length: usize,
    cmp: &'s HashedSequenceComparator<'s, C>,
    a: &'s HashedSequence<'a, S>,
    b: &'s HashedSequence<'a, S>,
    region: Edit,

    table: Vec<usize>,
    key_shift: u32,
    recs: Vec<Rec>,
    next: Vec<usize>,
    rec_of: Vec<usize>,

    lcs: Edit,
    cnt: u32,
    has_common: bool,
}

impl<'s, 'a, S, C> HistogramIndex<'s, 'a, S, C>
where
    S: Sequence + ?Sized,
    C: SequenceComparator<S>,
{
    pub fn new(
        max_chain_length: usize,
        cmp: &'s HashedSequenceComparator<'s, C>,
        a: &'s HashedSequence<'a, S>,
        b: &'s HashedSequence<'a, S>,
        region: Edit,
    ) -> Self {
        let sz = region.len_a();
        let bits = table_bits(sz);
        let mut recs = Vec::with_capacity((sz >> 3).max(4));
        recs.push(Rec {
            next: 0,
            ptr: 0,
            cnt: 0,
        });
        Self {
            max_chain_length,
            cmp,
            a,
            b,
            region,
            table: vec![0; 1 << bits],
            key_shift: 32 - bits,
            recs,
            next: vec![NONE; sz],
            rec_of: vec![0; sz],
            lcs: Edit::empty_at(0, 0),
            cnt: 0,
            has_common: false,
        }
    }

    /// Find the region's best split point.
    ///
    /// Among the runs common to both sides, the one made of the rarest
    /// elements of A wins; equally rare runs are decided by length, with the
    /// first found kept on a tie.
    pub fn find_longest_common_sequence(mut self) -> Lcs {
        if !self.scan_a() {
            return Lcs::TooCommon;
        }

        self.lcs = Edit::empty_at(0, 0);
        self.cnt = self.max_chain_length.saturating_add(1).min(u32::MAX as usize) as u32;
        let mut b_ptr = self.region.begin_b;
        while b_ptr < self.region.end_b {
            b_ptr = self.try_longest_common_sequence(b_ptr);
        }

        if self.has_common && (self.max_chain_length as u64) < u64::from(self.cnt) {
            Lcs::TooCommon
        } else {
            Lcs::Found(self.lcs)
        }
    }

    fn bucket(&self, seq: &HashedSequence<'_, S>, ptr: usize) -> usize {
        (self.cmp.hash(seq, ptr).wrapping_mul(0x9e37_0001) >> self.key_shift) as usize
    }

    /// Build the histogram.  Walking A backwards leaves every chain starting
    /// at the element's earliest position.  Returns false once a bucket
    /// holds `max_chain_length` distinct elements.
    fn scan_a(&mut self) -> bool {
        let base = self.region.begin_a;
        'scan: for ptr in (self.region.begin_a..self.region.end_a).rev() {
            let t = self.bucket(self.a, ptr);
            let mut chain_len = 0;
            let mut r = self.table[t];
            while r != 0 {
                let rec = self.recs[r];
                if self.cmp.equals(self.a, rec.ptr, self.a, ptr) {
                    self.recs[r] = Rec {
                        next: rec.next,
                        ptr,
                        cnt: (rec.cnt + 1).min(MAX_CNT),
                    };
                    self.next[ptr - base] = rec.ptr;
                    self.rec_of[ptr - base] = r;
                    continue 'scan;
                }
                r = rec.next;
                chain_len += 1;
            }

            if chain_len == self.max_chain_length {
                return false;
            }

            self.recs.push(Rec {
                next: self.table[t],
                ptr,
                cnt: 1,
            });
            let r = self.recs.len() - 1;
            self.rec_of[ptr - base] = r;
            self.table[t] = r;
        }
        true
    }

    /// Try every occurrence in A of the element at `b_ptr`, stretching each
    /// hit both ways.  Returns the next B position worth trying.
    fn try_longest_common_sequence(&mut self, b_ptr: usize) -> usize {
        let base = self.region.begin_a;
        let mut b_next = b_ptr + 1;
        let mut r = self.table[self.bucket(self.b, b_ptr)];

        while r != 0 {
            let rec = self.recs[r];
            r = rec.next;

            // Too frequent in A to beat the current candidate.
            if rec.cnt > self.cnt {
                if !self.has_common {
                    self.has_common = self.cmp.equals(self.a, rec.ptr, self.b, b_ptr);
                }
                continue;
            }

            let mut as_ = rec.ptr;
            if !self.cmp.equals(self.a, as_, self.b, b_ptr) {
                continue;
            }
            self.has_common = true;

            loop {
                let np = self.next[as_ - base];
                let mut bs = b_ptr;
                let mut ae = as_ + 1;
                let mut be = bs + 1;
                let mut rc = rec.cnt;

                while self.region.begin_a < as_
                    && self.region.begin_b < bs
                    && self.cmp.equals(self.a, as_ - 1, self.b, bs - 1)
                {
                    as_ -= 1;
                    bs -= 1;
                    if rc > 1 {
                        rc = rc.min(self.recs[self.rec_of[as_ - base]].cnt);
                    }
                }
                while ae < self.region.end_a
                    && be < self.region.end_b
                    && self.cmp.equals(self.a, ae, self.b, be)
                {
                    if rc > 1 {
                        rc = rc.min(self.recs[self.rec_of[ae - base]].cnt);
                    }
                    ae += 1;
                    be += 1;
                }

                b_next = b_next.max(be);
                if self.lcs.len_a() < ae - as_ || rc < self.cnt {
                    self.lcs = Edit::new(as_, ae, bs, be);
                    self.cnt = rc;
                }

                // Skip later occurrences already covered by this run.
                let mut np = np;
                while np != NONE && np < ae {
                    np = self.next[np - base];
                }
                if np == NONE {
                    break;
                }
                as_ = np;
            }
        }
        b_next
    }
}

/// log2 of the bucket count for a region of `sz` elements of A.
fn table_bits(sz: usize) -> u32 {
    let mut bits = usize::BITS - 1 - sz.max(1).leading_zeros();
    if bits == 0 {
        bits = 1;
    }
    if (1usize << bits) < sz {
        bits += 1;
    }
    bits.min(31)
}
