//! histdelta: histogram diff and git-style binary deltas in Rust.
//!
//! The crate provides:
//! - A sequence diff engine (`diff`): histogram diff with a Myers fallback
//! - A binary delta engine (`delta`): block index, encoder and applier for
//!   the git pack delta format
//! - Convenience entry points over both (`engine`)
//! - An optional CLI (`cli` feature)
//!
//! # Quick Start
//!
//! ```
//! use histdelta::engine;
//!
//! let source = b"hello old world, hello old friends";
//! let target = b"hello new world, hello old friends";
//!
//! let delta = engine::encode(source, target).unwrap();
//! assert_eq!(engine::decode(source, &delta).unwrap(), target);
//!
//! let edits = engine::diff_text(b"a\nb\nc\n", b"a\nB\nc\n");
//! assert_eq!(edits.len(), 1);
//! ```

pub mod delta;
pub mod diff;
pub mod engine;

#[cfg(feature = "cli")]
pub mod cli;
