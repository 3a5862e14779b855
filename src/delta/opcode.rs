// Delta opcode body parsing.
//
// After the two header sizes, the stream is a run of opcodes told apart by
// the high bit of the command byte:
//
//   1xxxxxxx  COPY: low 7 bits select which offset (4) and length (3)
//             bytes follow, little-endian, absent bytes are zero.
//             A decoded length of 0 means MAX_COPY_SIZE.
//   0nnnnnnn  INSERT: n literal bytes follow (n in 1..=127).
//   00000000  reserved.

use bitflags::bitflags;

use super::config::MAX_COPY_SIZE;
use super::varint::VarIntError;

bitflags! {
    /// Command byte of a COPY opcode.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CopyFlags: u8 {
        const OFFSET_0 = 0x01;
        const OFFSET_1 = 0x02;
        const OFFSET_2 = 0x04;
        const OFFSET_3 = 0x08;
        const SIZE_0 = 0x10;
        const SIZE_1 = 0x20;
        const SIZE_2 = 0x40;
        const COPY = 0x80;
    }
}

impl CopyFlags {
    const OFFSET_BITS: [CopyFlags; 4] = [
        CopyFlags::OFFSET_0,
        CopyFlags::OFFSET_1,
        CopyFlags::OFFSET_2,
        CopyFlags::OFFSET_3,
    ];
    const SIZE_BITS: [CopyFlags; 3] = [CopyFlags::SIZE_0, CopyFlags::SIZE_1, CopyFlags::SIZE_2];

    /// Number of operand bytes following the command byte.
    pub fn operand_len(self) -> usize {
        (self.bits() & 0x7F).count_ones() as usize
    }
}

/// One decoded delta instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode<'a> {
    /// Copy `len` bytes of the base buffer starting at `offset`.
    Copy { offset: u64, len: usize },
    /// Append the literal bytes.
    Insert(&'a [u8]),
}

impl Opcode<'_> {
    /// Bytes this opcode contributes to the result.
    pub fn output_len(&self) -> usize {
        match self {
            Opcode::Copy { len, .. } => *len,
            Opcode::Insert(data) => data.len(),
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A malformed delta stream.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("truncated delta header")]
    TruncatedHeader,
    #[error("delta header size overflows")]
    VarIntOverflow,
    #[error("base size mismatch: delta expects {expected} bytes, base has {actual}")]
    BaseSizeMismatch { expected: u64, actual: u64 },
    #[error("truncated COPY opcode at byte {pos}")]
    TruncatedCopy { pos: usize },
    #[error("INSERT of {len} bytes at byte {pos} runs past the end of the delta")]
    TruncatedInsert { pos: usize, len: usize },
    #[error("COPY of {len} bytes at offset {offset} exceeds base of {base_len} bytes")]
    CopyOutOfRange { offset: u64, len: usize, base_len: usize },
    #[error("reserved opcode 0 at byte {pos}")]
    ReservedOpcode { pos: usize },
    #[error("result size mismatch: header declares {expected} bytes, opcodes produce {actual}")]
    ResultSizeMismatch { expected: u64, actual: u64 },
    #[error("declared result size {0} does not fit in memory")]
    ResultTooLarge(u64),
}

impl From<VarIntError> for FormatError {
    fn from(e: VarIntError) -> Self {
        match e {
            VarIntError::Underflow => FormatError::TruncatedHeader,
            VarIntError::Overflow => FormatError::VarIntOverflow,
        }
    }
}

// ---------------------------------------------------------------------------
// Opcode iterator
// ---------------------------------------------------------------------------

/// Iterate over the opcodes of a delta body (the bytes after the header).
///
/// Yields an error and then stops at the first malformed opcode.
pub struct Opcodes<'a> {
    body: &'a [u8],
    pos: usize,
    /// Offset of `body` within the full delta, for error positions.
    base_pos: usize,
    failed: bool,
}

impl<'a> Opcodes<'a> {
    pub fn new(body: &'a [u8]) -> Self {
        Self::with_offset(body, 0)
    }

    pub(crate) fn with_offset(body: &'a [u8], base_pos: usize) -> Self {
        Self {
            body,
            pos: 0,
            base_pos,
            failed: false,
        }
    }

    fn parse_copy(&mut self, cmd: CopyFlags, at: usize) -> Result<Opcode<'a>, FormatError> {
        let operands = self
            .body
            .get(self.pos..self.pos + cmd.operand_len())
            .ok_or(FormatError::TruncatedCopy { pos: at })?;
        self.pos += operands.len();

        let mut bytes = operands.iter();
        let mut offset = 0u64;
        for (i, flag) in CopyFlags::OFFSET_BITS.iter().enumerate() {
            if cmd.contains(*flag) {
                if let Some(&b) = bytes.next() {
                    offset |= u64::from(b) << (8 * i);
                }
            }
        }
        let mut len = 0usize;
        for (i, flag) in CopyFlags::SIZE_BITS.iter().enumerate() {
            if cmd.contains(*flag) {
                if let Some(&b) = bytes.next() {
                    len |= usize::from(b) << (8 * i);
                }
            }
        }
        if len == 0 {
            len = MAX_COPY_SIZE;
        }
        Ok(Opcode::Copy { offset, len })
    }
}

impl<'a> Iterator for Opcodes<'a> {
    type Item = Result<Opcode<'a>, FormatError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos >= self.body.len() {
            return None;
        }

        let at = self.base_pos + self.pos;
        let cmd = self.body[self.pos];
        self.pos += 1;

        let res = if cmd & 0x80 != 0 {
            self.parse_copy(CopyFlags::from_bits_retain(cmd), at)
        } else if cmd != 0 {
            let len = cmd as usize;
            match self.body.get(self.pos..self.pos + len) {
                Some(data) => {
                    self.pos += len;
                    Ok(Opcode::Insert(data))
                }
                None => Err(FormatError::TruncatedInsert { pos: at, len }),
            }
        } else {
            Err(FormatError::ReservedOpcode { pos: at })
        };

        if res.is_err() {
            self.failed = true;
        }
        Some(res)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(body: &[u8]) -> Vec<Result<Opcode<'_>, FormatError>> {
        Opcodes::new(body).collect()
    }

    #[test]
    fn parses_insert() {
        let ops = collect(&[3, b'f', b'o', b'o']);
        assert_eq!(ops, vec![Ok(Opcode::Insert(b"foo"))]);
    }

    #[test]
    fn parses_copy_with_sparse_operands() {
        // offset byte 1 only (0x0200), size byte 0 only (0x10).
        let ops = collect(&[0x80 | 0x02 | 0x10, 0x02, 0x10]);
        assert_eq!(
            ops,
            vec![Ok(Opcode::Copy {
                offset: 0x200,
                len: 0x10
            })]
        );
    }

    #[test]
    fn empty_copy_length_means_max() {
        let ops = collect(&[0x80]);
        assert_eq!(
            ops,
            vec![Ok(Opcode::Copy {
                offset: 0,
                len: MAX_COPY_SIZE
            })]
        );
    }

    #[test]
    fn all_operand_bytes() {
        let ops = collect(&[0xFF, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07]);
        assert_eq!(
            ops,
            vec![Ok(Opcode::Copy {
                offset: 0x0403_0201,
                len: 0x07_0605
            })]
        );
    }

    #[test]
    fn truncated_copy_is_reported_once() {
        let ops = collect(&[0x91, 0x00]);
        assert_eq!(ops, vec![Err(FormatError::TruncatedCopy { pos: 0 })]);
    }

    #[test]
    fn truncated_insert() {
        let ops = collect(&[5, b'a', b'b']);
        assert_eq!(ops, vec![Err(FormatError::TruncatedInsert { pos: 0, len: 5 })]);
    }

    #[test]
    fn reserved_opcode_stops_iteration() {
        let ops = collect(&[1, b'x', 0, 1, b'y']);
        assert_eq!(
            ops,
            vec![
                Ok(Opcode::Insert(b"x")),
                Err(FormatError::ReservedOpcode { pos: 2 })
            ]
        );
    }

    #[test]
    fn operand_len_counts_low_bits() {
        assert_eq!(CopyFlags::COPY.operand_len(), 0);
        assert_eq!(CopyFlags::all().operand_len(), 7);
        assert_eq!((CopyFlags::COPY | CopyFlags::SIZE_1).operand_len(), 1);
    }
}
