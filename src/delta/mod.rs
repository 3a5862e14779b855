// Binary delta compression in the git pack delta format.
//
// # Modules
//
// - `config`  : block size, chain cap and opcode limits
// - `varint`  : little-endian base-128 header sizes
// - `rolling` : 16-byte Rabin block hash with a one-byte rolling step
// - `index`   : `DeltaIndex`, the block hash table over a base buffer
// - `encoder` : `DeltaEncoder`, the size-limited opcode writer
// - `opcode`  : COPY/INSERT parsing
// - `binary`  : apply, header introspection and listings

pub mod binary;
pub mod config;
pub mod encoder;
pub mod index;
pub mod opcode;
pub mod rolling;
pub mod varint;

pub use encoder::{DeltaEncoder, EncodeError};
pub use index::DeltaIndex;
pub use opcode::{CopyFlags, FormatError, Opcode, Opcodes};
