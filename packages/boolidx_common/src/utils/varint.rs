use crate::postings::CodecError;

const VALUE_MASK: u32 = 127; // 0111 1111
const CONTINUATION_MASK: u8 = 128; // 1000 0000

/// Appends `value` to `output_buf`.
///
/// The continuation bit is set on every byte except the last one.
pub fn get_var_int_vec(mut value: u32, output_buf: &mut Vec<u8>) {
    while value > VALUE_MASK {
        output_buf.push((value & VALUE_MASK) as u8 | CONTINUATION_MASK);
        value >>= 7;
    }

    output_buf.push(value as u8);
}

/// Decodes one variable integer starting at `pos`, advancing it past the integer.
///
/// Never reads outside of `buf`: a slice ending before the terminating byte is `Truncated`,
/// and an integer wider than 32 bits is an `Overflow`.
pub fn decode_var_int(buf: &[u8], pos: &mut usize) -> Result<u32, CodecError> {
    let start = *pos;
    let mut value: u32 = 0;
    let mut shift: u32 = 0;

    loop {
        let byte = *buf.get(*pos).ok_or(CodecError::Truncated { pos: start })?;
        *pos += 1;

        let bits = (byte as u32) & VALUE_MASK;
        // Only the low 4 bits of the 5th byte still fit into a u32
        if shift > 28 || (shift == 28 && bits > 0b1111) {
            return Err(CodecError::Overflow { pos: start });
        }

        value |= bits << shift;

        if byte & CONTINUATION_MASK == 0 {
            return Ok(value);
        }

        shift += 7;
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::{decode_var_int, get_var_int_vec, CONTINUATION_MASK};
    use crate::postings::CodecError;

    fn encode(value: u32) -> Vec<u8> {
        let mut output_buf = Vec::new();
        get_var_int_vec(value, &mut output_buf);
        output_buf
    }

    #[test]
    fn test_encode() {
        assert_eq!(encode(0), vec![0]);

        assert_eq!(encode(64), vec![64]);

        assert_eq!(encode(127), vec![127]);

        assert_eq!(encode(128), vec![CONTINUATION_MASK | 0, 1]);

        assert_eq!(encode(300), vec![CONTINUATION_MASK | 44, 2]);

        assert_eq!(encode(16383), vec![CONTINUATION_MASK | 127, 127]);

        assert_eq!(
            encode(u32::MAX),
            vec![CONTINUATION_MASK | 127, CONTINUATION_MASK | 127, CONTINUATION_MASK | 127, CONTINUATION_MASK | 127, 15],
        );

        let mut output_buf = vec![9];
        get_var_int_vec(1, &mut output_buf);
        assert_eq!(output_buf, vec![9, 1]);
    }

    #[test]
    fn test_decode() {
        let mut buf = Vec::new();
        let values = [0, 5, 127, 128, 300, 16383, 16384, 1 << 21, (1 << 28) + 3, u32::MAX];
        for &value in &values {
            get_var_int_vec(value, &mut buf);
        }

        let mut pos = 0;
        for &value in &values {
            assert_eq!(decode_var_int(&buf, &mut pos), Ok(value));
        }
        assert_eq!(pos, buf.len());
    }

    #[test]
    fn test_decode_truncated() {
        let mut pos = 0;
        assert_eq!(decode_var_int(&[], &mut pos), Err(CodecError::Truncated { pos: 0 }));

        let mut pos = 1;
        assert_eq!(
            decode_var_int(&[3, CONTINUATION_MASK | 1, CONTINUATION_MASK | 1], &mut pos),
            Err(CodecError::Truncated { pos: 1 }),
        );
    }

    #[test]
    fn test_decode_overflow() {
        let mut pos = 0;
        assert_eq!(
            decode_var_int(&[0xFF, 0xFF, 0xFF, 0xFF, 0x1F], &mut pos),
            Err(CodecError::Overflow { pos: 0 }),
        );

        let mut pos = 0;
        assert_eq!(
            decode_var_int(&[0x80, 0x80, 0x80, 0x80, 0x80, 0x01], &mut pos),
            Err(CodecError::Overflow { pos: 0 }),
        );
    }
}
