// Delta format and indexing constants.
//
// The opcode stream is the git pack delta format: a COPY opcode carries at
// most 4 offset bytes and 3 length bytes, an INSERT opcode carries at most
// 127 literal bytes.

/// Width of a source block hashed into the index.
pub const BLOCK_SIZE: usize = 16;

/// Maximum entries kept per hash bucket of the index.
///
/// Longer chains are truncated during construction, keeping encoding linear
/// in the size of the target rather than quadratic.
pub const MAX_CHAIN_LENGTH: usize = 64;

/// Largest span a single COPY opcode can describe.
///
/// A length field of zero decodes as this value.
pub const MAX_COPY_SIZE: usize = 0x10000;

/// Largest literal run a single INSERT opcode can carry.
pub const MAX_INSERT_SIZE: usize = 127;

/// Largest source offset a COPY opcode can address (4 offset bytes).
pub const MAX_COPY_OFFSET: u64 = u32::MAX as u64;

/// Once a candidate match reaches this length the chain walk stops.
pub const LONG_ENOUGH: usize = 4096;

/// Worst-case encoded size of one COPY opcode: command byte, 4 offset
/// bytes, 3 length bytes.
pub const MAX_COPY_CMD_SIZE: usize = 8;

// INSERT lengths must never set the COPY bit of the command byte.
const _: () = assert!(MAX_INSERT_SIZE < 0x80);
