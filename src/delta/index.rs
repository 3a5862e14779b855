// Block hash index over a delta base buffer.
//
// Construction runs in two passes:
//   1. `BlockScanner` walks the base backwards in BLOCK_SIZE steps, pushing
//      each block onto the front of its bucket chain.  A block whose hash
//      equals the block just after it replaces that entry instead of adding
//      one, so long runs of identical blocks collapse to their earliest
//      occurrence.
//   2. The chains are cut at MAX_CHAIN_LENGTH and flattened into one entry
//      array with each bucket's entries stored contiguously.  `table[b]`
//      then holds the first entry of bucket `b`, or 0 when it is empty.
//
// Each entry packs `(hash << 32) | block_offset`.

use std::fmt;
use std::io::Write;

use super::config::{BLOCK_SIZE, LONG_ENOUGH, MAX_CHAIN_LENGTH, MAX_COPY_OFFSET};
use super::encoder::{DeltaEncoder, EncodeError};
use super::rolling;

#[inline(always)]
fn key_of(entry: u64) -> u32 {
    (entry >> 32) as u32
}

#[inline(always)]
fn offset_of(entry: u64) -> usize {
    entry as u32 as usize
}

/// Bucket count for `blocks` blocks: the next power of two.
fn table_size(blocks: usize) -> usize {
    blocks.next_power_of_two()
}

// ---------------------------------------------------------------------------
// Scanner (construction pass 1)
// ---------------------------------------------------------------------------

struct BlockScanner {
    table: Vec<u32>,
    mask: u32,
    /// Slot 0 is the end-of-chain sentinel.
    entries: Vec<u64>,
    next: Vec<u32>,
}

impl BlockScanner {
    fn scan(src: &[u8]) -> Self {
        // Only full blocks are indexed, and only where a COPY can address
        // them.
        let len = src.len().min(copy_room(0));
        let len = len - len % BLOCK_SIZE;
        let blocks = len / BLOCK_SIZE;
        if blocks == 0 {
            return Self {
                table: Vec::new(),
                mask: 0,
                entries: Vec::new(),
                next: Vec::new(),
            };
        }

        let size = table_size(blocks);
        let mut scanner = Self {
            table: vec![0; size],
            mask: (size - 1) as u32,
            entries: vec![0; 1],
            next: vec![0; 1],
        };
        scanner.entries.reserve(blocks);
        scanner.next.reserve(blocks);

        let mut last_hash = None;
        for ptr in (0..len).step_by(BLOCK_SIZE).rev() {
            let key = rolling::hash_block(&src[ptr..]);
            let bucket = (key & scanner.mask) as usize;
            let head = scanner.table[bucket];
            let entry = (u64::from(key) << 32) | ptr as u64;

            if head != 0 && last_hash == Some(key) {
                // Same content hash as the following block: keep the earlier
                // block so encoding can copy the longer run from it.
                scanner.entries[head as usize] = entry;
            } else {
                scanner.entries.push(entry);
                scanner.next.push(head);
                scanner.table[bucket] = (scanner.entries.len() - 1) as u32;
            }
            last_hash = Some(key);
        }
        scanner
    }
}

// ---------------------------------------------------------------------------
// DeltaIndex
// ---------------------------------------------------------------------------

/// Index of a base buffer's blocks, used to delta-encode targets against it.
///
/// # Example
/// ```
/// use histdelta::delta::{binary, DeltaIndex};
///
/// let base = b"the quick brown fox jumps over the lazy dog";
/// let target = b"the quick brown fox jumps over the lazy cat";
/// let index = DeltaIndex::new(base);
/// let delta = index.encode(target).unwrap();
/// assert_eq!(binary::apply(base, &delta).unwrap(), target);
/// ```
pub struct DeltaIndex<'a> {
    src: &'a [u8],
    table: Vec<u32>,
    mask: u32,
    /// Slot 0 is unused so a table value of 0 can mean "empty".
    entries: Vec<u64>,
}

impl<'a> DeltaIndex<'a> {
    /// Build the index for `src`.
    pub fn new(src: &'a [u8]) -> Self {
        let mut scan = BlockScanner::scan(src);
        let (count, truncated) = Self::truncate_chains(&mut scan);
        let (table, entries) = Self::flatten(scan, count);

        log::debug!(
            "indexed {} bytes: {} entries in {} buckets ({} chains truncated)",
            src.len(),
            entries.len().saturating_sub(1),
            table.len(),
            truncated
        );

        let mask = table.len().saturating_sub(1) as u32;
        Self {
            src,
            table,
            mask,
            entries,
        }
    }

    /// Cut every chain at MAX_CHAIN_LENGTH.
    /// Returns `(surviving entries, chains cut)`.
    fn truncate_chains(scan: &mut BlockScanner) -> (usize, usize) {
        let mut count = 0;
        let mut truncated = 0;
        for &head in &scan.table {
            let mut h = head;
            let mut len = 0;
            while h != 0 {
                len += 1;
                if len == MAX_CHAIN_LENGTH {
                    if scan.next[h as usize] != 0 {
                        truncated += 1;
                    }
                    scan.next[h as usize] = 0;
                    break;
                }
                h = scan.next[h as usize];
            }
            count += len;
        }
        (count, truncated)
    }

    /// Lay each bucket's chain out contiguously.
    fn flatten(scan: BlockScanner, count: usize) -> (Vec<u32>, Vec<u64>) {
        let BlockScanner {
            mut table,
            entries: scanned,
            next,
            ..
        } = scan;

        let mut entries = Vec::with_capacity(1 + count);
        entries.push(0);
        for slot in table.iter_mut() {
            let mut h = *slot;
            if h == 0 {
                continue;
            }
            *slot = entries.len() as u32;
            while h != 0 {
                entries.push(scanned[h as usize]);
                h = next[h as usize];
            }
        }
        (table, entries)
    }

    /// Size in bytes of the base buffer.
    pub fn source_len(&self) -> usize {
        self.src.len()
    }

    /// Approximate memory held by this index, base buffer included.
    pub fn index_size(&self) -> u64 {
        Self::footprint(self.table.len(), self.entries.len(), self.src.len())
    }

    /// Upper bound on `index_size` for a base of `source_len` bytes, i.e.
    /// the size with one entry per block and no truncation.
    pub fn estimate_index_size(source_len: usize) -> u64 {
        let blocks = source_len / BLOCK_SIZE;
        let buckets = if blocks == 0 { 0 } else { table_size(blocks) };
        let entries = if blocks == 0 { 0 } else { 1 + blocks };
        Self::footprint(buckets, entries, source_len)
    }

    fn footprint(buckets: usize, entries: usize, source_len: usize) -> u64 {
        (std::mem::size_of::<DeltaIndex<'_>>()
            + buckets * std::mem::size_of::<u32>()
            + entries * std::mem::size_of::<u64>()
            + source_len) as u64
    }

    /// Encode `target` as a delta against the indexed base.
    pub fn encode(&self, target: &[u8]) -> Result<Vec<u8>, EncodeError> {
        let mut out = Vec::with_capacity(target.len() / 4 + 16);
        self.encode_to(&mut out, target, None)?;
        Ok(out)
    }

    /// Encode `target` into `out`.
    ///
    /// With a `limit`, returns `Ok(false)` as soon as the next opcode would
    /// push the stream past `limit` bytes.  The partial stream must then be
    /// discarded; only its length (at least the header) is meaningful.
    pub fn encode_to<W: Write>(
        &self,
        out: W,
        target: &[u8],
        limit: Option<usize>,
    ) -> Result<bool, EncodeError> {
        let mut enc = DeltaEncoder::new(out, self.src.len() as u64, target.len() as u64, limit)?;
        let end = target.len();

        // Either side smaller than one block: a literal is all we can do.
        if end < BLOCK_SIZE || self.table.is_empty() {
            return Ok(enc.insert(target)?);
        }

        let mut blk_ptr = 0usize;
        let mut res_ptr = 0usize;
        let mut hash = rolling::hash_block(target);

        loop {
            let blk_end = blk_ptr + BLOCK_SIZE;
            let found = match self.best_match(target, hash, blk_ptr, res_ptr) {
                Some(m) if m.len >= BLOCK_SIZE => Some(m),
                _ => None,
            };

            let Some(m) = found else {
                if blk_end >= end {
                    break;
                }
                hash = rolling::step(hash, target[blk_ptr], target[blk_end]);
                blk_ptr += 1;
                continue;
            };

            let start = blk_ptr - m.neg;
            if res_ptr < start && !enc.insert(&target[res_ptr..start])? {
                return Ok(false);
            }
            if !enc.copy((m.src_ptr - m.neg) as u64, m.len)? {
                return Ok(false);
            }

            blk_ptr = start + m.len;
            res_ptr = blk_ptr;
            if blk_ptr + BLOCK_SIZE > end {
                break;
            }
            hash = rolling::hash_block(&target[blk_ptr..]);
        }

        if res_ptr < end {
            return Ok(enc.insert(&target[res_ptr..])?);
        }
        Ok(true)
    }

    /// Walk the bucket for `hash` and return the longest verified match for
    /// the block at `target[blk_ptr..]`, stretched backwards as far as the
    /// pending literal bytes (`res_ptr..blk_ptr`) allow.
    ///
    /// Ties keep the first chain entry.
    fn best_match(&self, target: &[u8], hash: u32, blk_ptr: usize, res_ptr: usize) -> Option<Match> {
        let bucket = hash & self.mask;
        let mut idx = self.table[bucket as usize] as usize;
        if idx == 0 {
            return None;
        }

        let mut best: Option<Match> = None;
        while idx < self.entries.len() {
            let entry = self.entries[idx];
            idx += 1;

            let key = key_of(entry);
            if key != hash {
                if key & self.mask != bucket {
                    // Walked into the next bucket's entries.
                    break;
                }
                continue;
            }

            let src_ptr = offset_of(entry);
            let neg = if res_ptr < blk_ptr {
                neg_match(target, blk_ptr, self.src, src_ptr, blk_ptr - res_ptr)
            } else {
                0
            };
            // A COPY cannot reach past the last addressable source byte.
            let len = neg + fwd_match(target, blk_ptr, self.src, src_ptr, copy_room(src_ptr));
            if best.is_none_or(|b| b.len < len) {
                best = Some(Match { src_ptr, neg, len });
            }
            if best.is_some_and(|b| b.len >= LONG_ENOUGH) {
                break;
            }
        }
        best
    }
}

impl fmt::Debug for DeltaIndex<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeltaIndex")
            .field("source_len", &self.src.len())
            .field("buckets", &self.table.len())
            .field("entries", &self.entries.len().saturating_sub(1))
            .finish()
    }
}

/// `DeltaIndex[N unit]`, with the size rounded up to whole units.
impl fmt::Display for DeltaIndex<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const UNITS: [&str; 4] = ["bytes", "KiB", "MiB", "GiB"];
        let mut sz = self.index_size();
        let mut unit = 0;
        while sz >= 1024 && unit < UNITS.len() - 1 {
            sz = sz.div_ceil(1024);
            unit += 1;
        }
        write!(f, "DeltaIndex[{sz} {}]", UNITS[unit])
    }
}

#[derive(Debug, Clone, Copy)]
struct Match {
    /// Block offset in the base where the hash hit.
    src_ptr: usize,
    /// Bytes the match extends before the block.
    neg: usize,
    /// Total match length, `neg` included.
    len: usize,
}

/// Length of the common run starting at `res[res_ptr..]` and `src[src_ptr..]`,
/// at most `limit` bytes.
fn fwd_match(res: &[u8], res_ptr: usize, src: &[u8], src_ptr: usize, limit: usize) -> usize {
    res[res_ptr..]
        .iter()
        .zip(&src[src_ptr..])
        .take(limit)
        .take_while(|(a, b)| a == b)
        .count()
}

/// Source bytes a COPY starting at `src_ptr` can still address.
fn copy_room(src_ptr: usize) -> usize {
    let room = (MAX_COPY_OFFSET + 1).saturating_sub(src_ptr as u64);
    usize::try_from(room).unwrap_or(usize::MAX)
}

/// Length of the common run ending just before `res_ptr` and `src_ptr`,
/// at most `limit` bytes.
fn neg_match(res: &[u8], res_ptr: usize, src: &[u8], src_ptr: usize, limit: usize) -> usize {
    res[..res_ptr]
        .iter()
        .rev()
        .zip(src[..src_ptr].iter().rev())
        .take(limit)
        .take_while(|(a, b)| a == b)
        .count()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
