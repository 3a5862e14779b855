// Delta stream interpretation.
//
// `apply` replays a delta against its base; `base_size`/`result_size` read
// only the header; `format` renders a listing for diagnostics.  Every offset
// and length is checked against the buffers before it is used, so a
// malformed stream yields a `FormatError` and never panics.

use super::opcode::{FormatError, Opcode, Opcodes};
use super::varint;

/// Decoded delta header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub base_size: u64,
    pub result_size: u64,
    /// Length of the encoded header; the opcode body starts here.
    pub len: usize,
}

/// Parse the two size integers at the front of `delta`.
pub fn header(delta: &[u8]) -> Result<Header, FormatError> {
    let (base_size, a) = varint::read_u64(delta)?;
    let (result_size, b) = varint::read_u64(&delta[a..])?;
    Ok(Header {
        base_size,
        result_size,
        len: a + b,
    })
}

/// Size of the base buffer the delta was made against.
pub fn base_size(delta: &[u8]) -> Result<u64, FormatError> {
    let (size, _) = varint::read_u64(delta)?;
    Ok(size)
}

/// Size of the buffer the delta reconstructs.
pub fn result_size(delta: &[u8]) -> Result<u64, FormatError> {
    header(delta).map(|h| h.result_size)
}

/// Iterate over the opcodes of `delta`, skipping its header.
pub fn opcodes(delta: &[u8]) -> Result<Opcodes<'_>, FormatError> {
    let hdr = header(delta)?;
    Ok(Opcodes::with_offset(&delta[hdr.len..], hdr.len))
}

/// Reconstruct the result of `delta` applied to `base`.
pub fn apply(base: &[u8], delta: &[u8]) -> Result<Vec<u8>, FormatError> {
    let mut out = Vec::new();
    apply_into(base, delta, &mut out)?;
    Ok(out)
}

/// Append the result of `delta` applied to `base` to `out`.
///
/// On error `out` may hold a partial result past its original length.
pub fn apply_into(base: &[u8], delta: &[u8], out: &mut Vec<u8>) -> Result<(), FormatError> {
    let hdr = header(delta)?;
    if hdr.base_size != base.len() as u64 {
        return Err(FormatError::BaseSizeMismatch {
            expected: hdr.base_size,
            actual: base.len() as u64,
        });
    }
    let expected = usize::try_from(hdr.result_size)
        .map_err(|_| FormatError::ResultTooLarge(hdr.result_size))?;

    let start = out.len();
    // The header is untrusted: don't let it drive a huge allocation.
    out.reserve(expected.min(delta.len().saturating_mul(64)));

    for op in Opcodes::with_offset(&delta[hdr.len..], hdr.len) {
        match op? {
            Opcode::Copy { offset, len } => {
                let range = usize::try_from(offset)
                    .ok()
                    .and_then(|off| Some(off..off.checked_add(len)?))
                    .filter(|r| r.end <= base.len())
                    .ok_or(FormatError::CopyOutOfRange {
                        offset,
                        len,
                        base_len: base.len(),
                    })?;
                out.extend_from_slice(&base[range]);
            }
            Opcode::Insert(data) => out.extend_from_slice(data),
        }
        if out.len() - start > expected {
            break;
        }
    }

    let produced = out.len() - start;
    if produced != expected {
        return Err(FormatError::ResultSizeMismatch {
            expected: hdr.result_size,
            actual: produced as u64,
        });
    }
    Ok(())
}

/// Render `delta` as a listing, one opcode per line.
///
/// ```text
/// DELTA( BASE=128 RESULT=131 )
///   INSERT("foo")
///   COPY  (0, 128)
/// ```
///
/// The listing is for people and tests; it is not a storage format.
pub fn format(delta: &[u8], include_header: bool) -> Result<String, FormatError> {
    let hdr = header(delta)?;
    let mut r = String::new();
    if include_header {
        r.push_str(&format!(
            "DELTA( BASE={} RESULT={} )\n",
            hdr.base_size, hdr.result_size
        ));
    }
    for op in Opcodes::with_offset(&delta[hdr.len..], hdr.len) {
        match op? {
            Opcode::Copy { offset, len } => {
                r.push_str(&format!("  COPY  ({offset}, {len})\n"));
            }
            Opcode::Insert(data) => {
                r.push_str(&format!("  INSERT(\"{}\")\n", data.escape_ascii()));
            }
        }
    }
    Ok(r)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delta::encoder::DeltaEncoder;

    fn build(base: u64, result: u64, ops: &[Opcode<'_>]) -> Vec<u8> {
        let mut out = Vec::new();
        let mut enc = DeltaEncoder::new(&mut out, base, result, None).unwrap();
        for op in ops {
            let ok = match *op {
                Opcode::Copy { offset, len } => enc.copy(offset, len).unwrap(),
                Opcode::Insert(data) => enc.insert(data).unwrap(),
            };
            assert!(ok);
        }
        out
    }

    #[test]
    fn applies_copy_and_insert() {
        let base = b"0123456789";
        let delta = build(
            10,
            9,
            &[
                Opcode::Copy { offset: 7, len: 3 },
                Opcode::Insert(b"--"),
                Opcode::Copy { offset: 0, len: 4 },
            ],
        );
        assert_eq!(apply(base, &delta).unwrap(), b"789--0123");
    }

    #[test]
    fn header_sizes() {
        let delta = build(300, 70000, &[]);
        assert_eq!(base_size(&delta).unwrap(), 300);
        assert_eq!(result_size(&delta).unwrap(), 70000);
        let hdr = header(&delta).unwrap();
        assert_eq!(hdr.len, delta.len());
    }

    #[test]
    fn truncated_header() {
        assert_eq!(base_size(&[]), Err(FormatError::TruncatedHeader));
        assert_eq!(result_size(&[0x05]), Err(FormatError::TruncatedHeader));
        assert_eq!(result_size(&[0x05, 0x80]), Err(FormatError::TruncatedHeader));
    }

    #[test]
    fn base_length_is_checked() {
        let delta = build(11, 0, &[]);
        assert_eq!(
            apply(b"0123456789", &delta),
            Err(FormatError::BaseSizeMismatch {
                expected: 11,
                actual: 10
            })
        );
    }

    #[test]
    fn copy_out_of_range() {
        let delta = build(4, 4, &[Opcode::Copy { offset: 2, len: 4 }]);
        assert_eq!(
            apply(b"abcd", &delta),
            Err(FormatError::CopyOutOfRange {
                offset: 2,
                len: 4,
                base_len: 4
            })
        );
    }

    #[test]
    fn result_length_is_checked() {
        let short = build(0, 5, &[Opcode::Insert(b"abc")]);
        assert_eq!(
            apply(b"", &short),
            Err(FormatError::ResultSizeMismatch {
                expected: 5,
                actual: 3
            })
        );

        let long = build(0, 2, &[Opcode::Insert(b"abc")]);
        assert!(matches!(
            apply(b"", &long),
            Err(FormatError::ResultSizeMismatch { expected: 2, .. })
        ));
    }

    #[test]
    fn reserved_opcode_is_rejected() {
        let mut delta = build(0, 1, &[]);
        delta.push(0);
        assert_eq!(
            apply(b"", &delta),
            Err(FormatError::ReservedOpcode { pos: 2 })
        );
    }

    #[test]
    fn apply_into_appends() {
        let delta = build(3, 3, &[Opcode::Copy { offset: 0, len: 3 }]);
        let mut out = b">>".to_vec();
        apply_into(b"abc", &delta, &mut out).unwrap();
        assert_eq!(out, b">>abc");
    }

    #[test]
    fn format_listing() {
        let delta = build(
            10,
            8,
            &[
                Opcode::Insert(b"a\"b\n"),
                Opcode::Copy { offset: 6, len: 4 },
            ],
        );
        assert_eq!(
            format(&delta, true).unwrap(),
            "DELTA( BASE=10 RESULT=8 )\n  INSERT(\"a\\\"b\\n\")\n  COPY  (6, 4)\n"
        );
        assert_eq!(
            format(&delta, false).unwrap(),
            "  INSERT(\"a\\\"b\\n\")\n  COPY  (6, 4)\n"
        );
    }

    #[test]
    fn format_header_only_and_truncated() {
        let delta = build(5, 0, &[]);
        assert_eq!(format(&delta, true).unwrap(), "DELTA( BASE=5 RESULT=0 )\n");
        assert_eq!(format(&delta, false).unwrap(), "");
        // COPY command announcing offset and size bytes that never arrive.
        assert!(format(&[5, 3, 0x91], true).is_err());
    }
}
