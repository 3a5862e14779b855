// Sequence diff engine.
//
// # Modules
//
// - `edit`            : `Edit` regions and the ordered `EditList`
// - `sequence`        : `Sequence`/`SequenceComparator` plus hash-cache and
//                       sub-region wrappers
// - `algorithm`       : the `DiffAlgorithm` trait
// - `histogram_index` : per-region occurrence histogram and split search
// - `histogram`       : `HistogramDiff`
// - `myers`           : `MyersDiff`, the default fallback
// - `text`            : `RawText` lines and `RawTextComparator`

pub mod algorithm;
pub mod edit;
pub mod histogram;
pub mod histogram_index;
pub mod myers;
pub mod sequence;
pub mod text;

pub use algorithm::DiffAlgorithm;
pub use edit::{Edit, EditKind, EditList};
pub use histogram::{DEFAULT_MAX_CHAIN_LENGTH, HistogramDiff};
pub use myers::MyersDiff;
pub use sequence::{
    HashedSequence, HashedSequenceComparator, Sequence, SequenceComparator, SliceComparator,
    Subsequence, SubsequenceComparator,
};
pub use text::{RawText, RawTextComparator};
