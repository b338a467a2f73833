//! Byte layout of a compressed artifact:
//!
//! ```text
//! [padding: u8 in 0..=7][payload bits, MSB first, zero filled to a byte boundary]
//! ```
//!
//! The payload length is always derived from the bit length, so runs of zero bits
//! (including an all-zero payload) survive the trip intact.

use bit_vec::BitVec;

use crate::error::{CodecError, Result};

const BITS_PER_BYTE: usize = 8;

/// Zero bits needed to round `bit_len` up to a whole number of bytes.
pub fn padding_for(bit_len: usize) -> u8 {
    ((BITS_PER_BYTE - bit_len % BITS_PER_BYTE) % BITS_PER_BYTE) as u8
}

pub fn pack(bits: &BitVec) -> Vec<u8> {
    let padding = padding_for(bits.len());
    // to_bytes zero fills the final partial byte
    let payload = bits.to_bytes();

    let mut packed = Vec::with_capacity(payload.len() + 1);
    packed.push(padding);
    packed.extend(payload);
    packed
}

pub fn unpack(packed: &[u8]) -> Result<BitVec> {
    let (&padding, payload) = packed
        .split_first()
        .ok_or(CodecError::MissingPaddingHeader)?;

    let payload_bits = payload.len() * BITS_PER_BYTE;
    if usize::from(padding) >= BITS_PER_BYTE || usize::from(padding) > payload_bits {
        return Err(CodecError::InvalidPadding {
            padding,
            payload_bits,
        });
    }

    let mut bits = BitVec::from_bytes(payload);
    bits.truncate(payload_bits - usize::from(padding));
    Ok(bits)
}

#[cfg(test)]
mod tests {
    use bit_vec::BitVec;
    use proptest::prelude::*;
    use rstest::rstest;

    use crate::{
        bits::{parse_bit_string, to_bit_string},
        error::CodecError,
    };

    use super::{pack, padding_for, unpack};

    #[rstest]
    #[case(0, 0)]
    #[case(1, 7)]
    #[case(7, 1)]
    #[case(8, 0)]
    #[case(9, 7)]
    #[case(64, 0)]
    fn test_padding_for(#[case] bit_len: usize, #[case] expected: u8) {
        assert_eq!(padding_for(bit_len), expected);
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(7)]
    #[case(8)]
    #[case(9)]
    #[case(64)]
    fn test_unpack_restores_bit_length(#[case] bit_len: usize) {
        let bits: BitVec = (0..bit_len).map(|i| i % 3 == 0).collect();

        let packed = pack(&bits);
        assert_eq!(packed.len(), 1 + bit_len.div_ceil(8));
        assert_eq!(packed[0], padding_for(bit_len));

        assert_eq!(unpack(&packed).unwrap(), bits);
    }

    #[test]
    fn test_packs_msb_first() {
        let bits = parse_bit_string("1010000011").unwrap();
        assert_eq!(pack(&bits), vec![6, 0b1010_0000, 0b1100_0000]);
    }

    #[rstest]
    #[case("0")]
    #[case("00000000")]
    #[case("000000000000")]
    #[case("10000000")]
    fn test_leading_and_trailing_zeros_survive(#[case] input: &str) {
        let bits = parse_bit_string(input).unwrap();
        let unpacked = unpack(&pack(&bits)).unwrap();
        assert_eq!(to_bit_string(&unpacked), input);
    }

    #[test]
    fn test_empty_stream_has_no_header() {
        assert_eq!(unpack(&[]), Err(CodecError::MissingPaddingHeader));
    }

    #[rstest]
    #[case(vec![8, 0xff])]
    #[case(vec![3])]
    #[case(vec![200, 0, 0])]
    fn test_rejects_invalid_padding(#[case] packed: Vec<u8>) {
        assert!(matches!(
            unpack(&packed),
            Err(CodecError::InvalidPadding { .. })
        ));
    }

    proptest! {
        #[test]
        fn prop_unpack_inverts_pack(bits in proptest::collection::vec(any::<bool>(), 0..200)) {
            let bits: BitVec = bits.into_iter().collect();
            let packed = pack(&bits);
            prop_assert!(packed[0] < 8);
            prop_assert_eq!(unpack(&packed).unwrap(), bits);
        }
    }
}
