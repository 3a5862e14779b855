// Delta opcode writer.
//
// DeltaEncoder writes the header (base size, result size) on construction
// and then appends COPY and INSERT opcodes.  An optional size limit bounds
// the total stream length; an opcode that would cross it is refused before
// any of its bytes reach the sink, and the caller sees `Ok(false)`.

use std::io::{self, Write};

use super::config::{MAX_COPY_CMD_SIZE, MAX_COPY_OFFSET, MAX_COPY_SIZE, MAX_INSERT_SIZE};
use super::opcode::CopyFlags;
use super::varint;

/// Scratch space for batching split COPY opcodes before a write.
const COPY_BUF_SIZE: usize = 64;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

// ---------------------------------------------------------------------------
// DeltaEncoder
// ---------------------------------------------------------------------------

/// Writes a delta opcode stream into `W`.
///
/// # Example
/// ```
/// use histdelta::delta::{binary, DeltaEncoder};
///
/// let base = b"0123456789abcdef";
/// let mut out = Vec::new();
/// let mut enc = DeltaEncoder::new(&mut out, 16, 20, None).unwrap();
/// assert!(enc.insert(b"new:").unwrap());
/// assert!(enc.copy(0, 16).unwrap());
/// assert_eq!(binary::apply(base, &out).unwrap(), b"new:0123456789abcdef");
/// ```
pub struct DeltaEncoder<W: Write> {
    out: W,
    limit: Option<usize>,
    size: usize,
    buf: [u8; COPY_BUF_SIZE],
}

impl<W: Write> DeltaEncoder<W> {
    /// Create an encoder and write the stream header.
    ///
    /// `limit`, when set, caps the total stream length in bytes (header
    /// included).  The header itself is always written.
    pub fn new(
        mut out: W,
        base_size: u64,
        result_size: u64,
        limit: Option<usize>,
    ) -> io::Result<Self> {
        let mut size = varint::write_u64(&mut out, base_size)?;
        size += varint::write_u64(&mut out, result_size)?;
        Ok(Self {
            out,
            limit,
            size,
            buf: [0u8; COPY_BUF_SIZE],
        })
    }

    /// Bytes written so far, header included.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Configured size limit.
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Consume the encoder, returning the sink.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn fits(&self, extra: usize) -> bool {
        self.limit.is_none_or(|limit| self.size + extra <= limit)
    }

    /// Append literal bytes, split into INSERT opcodes of at most 127 bytes.
    ///
    /// Returns `Ok(false)` without writing anything if the limit would be
    /// exceeded.
    pub fn insert(&mut self, text: &[u8]) -> io::Result<bool> {
        if text.is_empty() {
            return Ok(true);
        }
        let headers = text.len().div_ceil(MAX_INSERT_SIZE);
        if !self.fits(headers + text.len()) {
            log::debug!(
                "insert of {} bytes refused at {} (limit {:?})",
                text.len(),
                self.size,
                self.limit
            );
            return Ok(false);
        }

        for chunk in text.chunks(MAX_INSERT_SIZE) {
            log::trace!("INSERT {}", chunk.len());
            self.out.write_all(&[chunk.len() as u8])?;
            self.out.write_all(chunk)?;
            self.size += 1 + chunk.len();
        }
        Ok(true)
    }

    /// Append a copy of `len` base bytes starting at `offset`, split into
    /// COPY opcodes of at most `MAX_COPY_SIZE` bytes.
    ///
    /// Returns `Ok(false)` if the limit would be exceeded; pieces of an
    /// oversized span already flushed before the refusal stay in the sink.
    /// Spans reaching past 4 GiB of base cannot be addressed and fail with
    /// `InvalidInput`.
    pub fn copy(&mut self, mut offset: u64, mut len: usize) -> io::Result<bool> {
        if len == 0 {
            return Ok(true);
        }
        if offset.saturating_add(len as u64) > MAX_COPY_OFFSET + 1 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("copy of {len} bytes at {offset} exceeds 32-bit base offsets"),
            ));
        }
        log::trace!("COPY {offset} {len}");

        let mut p = 0;
        while len > MAX_COPY_SIZE {
            p = encode_copy(&mut self.buf, p, offset, MAX_COPY_SIZE);
            offset += MAX_COPY_SIZE as u64;
            len -= MAX_COPY_SIZE;

            if self.buf.len() < p + MAX_COPY_CMD_SIZE {
                if !self.flush_buf(p)? {
                    return Ok(false);
                }
                p = 0;
            }
        }
        p = encode_copy(&mut self.buf, p, offset, len);
        self.flush_buf(p)
    }

    fn flush_buf(&mut self, p: usize) -> io::Result<bool> {
        if !self.fits(p) {
            log::debug!(
                "copy of {p} opcode bytes refused at {} (limit {:?})",
                self.size,
                self.limit
            );
            return Ok(false);
        }
        self.out.write_all(&self.buf[..p])?;
        self.size += p;
        Ok(true)
    }
}

/// Encode one COPY opcode at `buf[p..]`, returning the new end position.
///
/// Only non-zero operand bytes are emitted.  A length of exactly
/// `MAX_COPY_SIZE` is written with no length bytes at all.
fn encode_copy(buf: &mut [u8], mut p: usize, offset: u64, len: usize) -> usize {
    debug_assert!((1..=MAX_COPY_SIZE).contains(&len));
    let cmd_pos = p;
    let mut cmd = CopyFlags::COPY;
    p += 1;

    for (i, flag) in [
        CopyFlags::OFFSET_0,
        CopyFlags::OFFSET_1,
        CopyFlags::OFFSET_2,
        CopyFlags::OFFSET_3,
    ]
    .into_iter()
    .enumerate()
    {
        let b = (offset >> (8 * i)) as u8;
        if b != 0 {
            cmd |= flag;
            buf[p] = b;
            p += 1;
        }
    }

    if len != MAX_COPY_SIZE {
        for (i, flag) in [CopyFlags::SIZE_0, CopyFlags::SIZE_1, CopyFlags::SIZE_2]
            .into_iter()
            .enumerate()
        {
            let b = (len >> (8 * i)) as u8;
            if b != 0 {
                cmd |= flag;
                buf[p] = b;
                p += 1;
            }
        }
    }

    buf[cmd_pos] = cmd.bits();
    p
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
