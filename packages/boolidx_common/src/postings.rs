//! Byte layout of a single term's postings.
//!
//! ```text
//! vbyte(doc_count)
//! repeated doc_count times, by ascending doc id:
//!     vbyte(doc_id) vbyte(position_count) vbyte(first position) vbyte(gap) ...
//! ```

use thiserror::Error;

use crate::utils::varint::{decode_var_int, get_var_int_vec};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("variable integer starting at byte {pos} is truncated")]
    Truncated { pos: usize },

    #[error("variable integer starting at byte {pos} does not fit into 32 bits")]
    Overflow { pos: usize },

    #[error("positions of doc {doc_id} are not strictly increasing")]
    UnsortedPositions { doc_id: u32 },

    #[error("postings decoded after {consumed} of {len} bytes")]
    TrailingBytes { consumed: usize, len: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocPostings {
    pub doc_id: u32,
    pub positions: Vec<u32>,
}

/// Appends the encoded postings of one term to `output_buf`.
///
/// `docs` must yield documents in ascending doc id order.
/// Nothing is appended if an error is returned.
pub fn encode_term_postings<'a, I>(docs: I, output_buf: &mut Vec<u8>) -> Result<(), CodecError>
where
    I: ExactSizeIterator<Item = (u32, &'a [u32])>,
{
    let start_len = output_buf.len();
    get_var_int_vec(docs.len() as u32, output_buf);

    #[cfg(debug_assertions)]
    let mut prev_doc_id: Option<u32> = None;

    for (doc_id, positions) in docs {
        #[cfg(debug_assertions)]
        {
            debug_assert!(prev_doc_id.map_or(true, |prev| prev < doc_id));
            prev_doc_id = Some(doc_id);
        }

        get_var_int_vec(doc_id, output_buf);
        get_var_int_vec(positions.len() as u32, output_buf);

        let mut prev_pos = None;
        for &pos in positions {
            let gap = match prev_pos {
                None => pos,
                Some(prev) if pos > prev => pos - prev,
                Some(_) => {
                    output_buf.truncate(start_len);
                    return Err(CodecError::UnsortedPositions { doc_id });
                }
            };
            get_var_int_vec(gap, output_buf);
            prev_pos = Some(pos);
        }
    }

    Ok(())
}

/// Decodes exactly one term's postings from `buf`, which must be that term's slice.
pub fn decode_term_postings(buf: &[u8]) -> Result<Vec<DocPostings>, CodecError> {
    let mut pos = 0;
    let doc_count = decode_var_int(buf, &mut pos)? as usize;

    // Every document takes at least 2 bytes, don't trust the count for the allocation
    let mut docs = Vec::with_capacity(doc_count.min(buf.len() / 2));

    for _i in 0..doc_count {
        let doc_id = decode_var_int(buf, &mut pos)?;
        let position_count = decode_var_int(buf, &mut pos)? as usize;

        let mut positions = Vec::with_capacity(position_count.min(buf.len() - pos));
        let mut prev_pos: u32 = 0;
        for i in 0..position_count {
            let delta_start = pos;
            let delta = decode_var_int(buf, &mut pos)?;
            prev_pos = if i == 0 {
                delta
            } else {
                prev_pos.checked_add(delta).ok_or(CodecError::Overflow { pos: delta_start })?
            };
            positions.push(prev_pos);
        }

        docs.push(DocPostings { doc_id, positions });
    }

    if pos != buf.len() {
        return Err(CodecError::TrailingBytes { consumed: pos, len: buf.len() });
    }

    Ok(docs)
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::{decode_term_postings, encode_term_postings, CodecError, DocPostings};

    fn encode(docs: &[(u32, Vec<u32>)]) -> Result<Vec<u8>, CodecError> {
        let mut buf = Vec::new();
        encode_term_postings(docs.iter().map(|(doc_id, positions)| (*doc_id, positions.as_slice())), &mut buf)?;
        Ok(buf)
    }

    fn to_doc_postings(docs: &[(u32, Vec<u32>)]) -> Vec<DocPostings> {
        docs.iter()
            .map(|(doc_id, positions)| DocPostings { doc_id: *doc_id, positions: positions.clone() })
            .collect()
    }

    #[test]
    fn test_encode_layout() {
        // 2 docs | doc 0, 1 position: 3 | doc 2, 3 positions: 1, 5 (+4), 300 (+295)
        assert_eq!(
            encode(&[(0, vec![3]), (2, vec![1, 5, 300])]).unwrap(),
            vec![2, 0, 1, 3, 2, 3, 1, 4, 0x80 | 39, 2],
        );

        assert_eq!(encode(&[]).unwrap(), vec![0]);
    }

    #[test]
    fn test_round_trip() {
        let docs = vec![
            (0, vec![0]),
            (1, vec![]),
            (7, vec![0, 1, 2, 3, 127, 128, 16384, 16385]),
            (200, vec![5, 1_000_000, u32::MAX]),
        ];

        let encoded = encode(&docs).unwrap();
        assert_eq!(decode_term_postings(&encoded).unwrap(), to_doc_postings(&docs));
    }

    #[test]
    fn test_unsorted_positions() {
        let mut buf = vec![42];
        let docs = [(1, vec![4, 2])];
        let result = encode_term_postings(docs.iter().map(|(doc_id, positions)| (*doc_id, positions.as_slice())), &mut buf);

        assert_eq!(result, Err(CodecError::UnsortedPositions { doc_id: 1 }));
        assert_eq!(buf, vec![42]);

        assert_eq!(encode(&[(3, vec![2, 2])]), Err(CodecError::UnsortedPositions { doc_id: 3 }));
    }

    #[test]
    fn test_decode_stays_within_slice() {
        let encoded = encode(&[(0, vec![3]), (2, vec![1, 5, 300])]).unwrap();

        // Cutting the slice short must error instead of reading on
        assert_eq!(
            decode_term_postings(&encoded[..encoded.len() - 1]),
            Err(CodecError::Truncated { pos: 8 }),
        );
        assert_eq!(decode_term_postings(&[]), Err(CodecError::Truncated { pos: 0 }));

        let mut with_extra = encoded.clone();
        with_extra.push(0);
        assert_eq!(
            decode_term_postings(&with_extra),
            Err(CodecError::TrailingBytes { consumed: encoded.len(), len: encoded.len() + 1 }),
        );
    }

    #[test]
    fn test_decode_position_overflow() {
        // 1 doc, doc 0, 2 positions: u32::MAX then +1
        let buf = vec![1, 0, 2, 0xFF, 0xFF, 0xFF, 0xFF, 0x0F, 1];
        assert_eq!(decode_term_postings(&buf), Err(CodecError::Overflow { pos: 8 }));
    }
}
