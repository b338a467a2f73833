use bit_vec::BitVec;

/// Renders bits as a string of `0` and `1` characters, most significant first.
pub fn to_bit_string(bits: &BitVec) -> String {
    bits.iter().map(|bit| if bit { '1' } else { '0' }).collect()
}

/// Parses a string made only of `0` and `1` characters.
/// Returns `None` when any other character is present.
pub fn parse_bit_string(input: &str) -> Option<BitVec> {
    let mut bits = BitVec::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '0' => bits.push(false),
            '1' => bits.push(true),
            _ => return None,
        }
    }
    Some(bits)
}

pub fn starts_with(bits: &BitVec, prefix: &BitVec) -> bool {
    prefix.len() <= bits.len() && prefix.iter().zip(bits.iter()).all(|(a, b)| a == b)
}
