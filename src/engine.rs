// High-level entry points.
//
// Line diffs of two text buffers, and whole-buffer delta encode/decode,
// with the knobs the CLI exposes gathered into option structs.

use crate::delta::{DeltaIndex, EncodeError, FormatError, binary};
use crate::diff::{
    DEFAULT_MAX_CHAIN_LENGTH, DiffAlgorithm, EditList, HistogramDiff, MyersDiff, RawText,
    RawTextComparator,
};

// ---------------------------------------------------------------------------
// Diff options
// ---------------------------------------------------------------------------

/// Which diff algorithm drives a text diff.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Algorithm {
    #[default]
    Histogram,
    Myers,
}

/// Configuration for a text diff.
#[derive(Debug, Clone)]
pub struct DiffOptions {
    pub algorithm: Algorithm,
    /// Histogram bucket bound. Ignored by Myers.
    pub max_chain_length: usize,
    /// Whether histogram falls back to Myers on repetitive regions.
    pub fallback: bool,
    pub comparator: RawTextComparator,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::Histogram,
            max_chain_length: DEFAULT_MAX_CHAIN_LENGTH,
            fallback: true,
            comparator: RawTextComparator::Default,
        }
    }
}

// ---------------------------------------------------------------------------
// Diff
// ---------------------------------------------------------------------------

/// Line diff of `a` against `b` with default options.
pub fn diff_text(a: &[u8], b: &[u8]) -> EditList {
    diff_text_with_options(a, b, &DiffOptions::default())
}

/// Line diff with custom options.
///
/// # Panics
/// If `opts.max_chain_length` is zero and the histogram algorithm is used.
pub fn diff_text_with_options(a: &[u8], b: &[u8], opts: &DiffOptions) -> EditList {
    let ta = RawText::new(a);
    let tb = RawText::new(b);
    let cmp = &opts.comparator;
    match opts.algorithm {
        Algorithm::Myers => MyersDiff.diff(cmp, &ta, &tb),
        Algorithm::Histogram => {
            let alg = HistogramDiff::new().with_max_chain_length(opts.max_chain_length);
            if opts.fallback {
                alg.diff(cmp, &ta, &tb)
            } else {
                alg.without_fallback().diff(cmp, &ta, &tb)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Delta
// ---------------------------------------------------------------------------

/// Encode `target` as a delta against `source`.
pub fn encode(source: &[u8], target: &[u8]) -> Result<Vec<u8>, EncodeError> {
    DeltaIndex::new(source).encode(target)
}

/// Encode with a ceiling on the delta size.
///
/// Returns `Ok(None)` when the delta would exceed `limit` bytes; the caller
/// should then store `target` whole.
pub fn encode_with_limit(
    source: &[u8],
    target: &[u8],
    limit: usize,
) -> Result<Option<Vec<u8>>, EncodeError> {
    let mut out = Vec::new();
    if DeltaIndex::new(source).encode_to(&mut out, target, Some(limit))? {
        Ok(Some(out))
    } else {
        log::debug!(
            "delta of {} bytes against {} exceeded limit {limit}",
            target.len(),
            source.len()
        );
        Ok(None)
    }
}

/// Reconstruct the target of `delta` from `source`.
pub fn decode(source: &[u8], delta: &[u8]) -> Result<Vec<u8>, FormatError> {
    binary::apply(source, delta)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
