use bit_vec::BitVec;
use log::debug;

use crate::{
    bits::to_bit_string,
    code_table::CodeTable,
    error::{CodecError, Result},
    packing::{pack, unpack},
};

/// Concatenates the code of every symbol of `text`, in order.
pub fn encode(text: &str, table: &CodeTable) -> Result<BitVec> {
    let mut encoded = BitVec::new();
    for (position, symbol) in text.chars().enumerate() {
        let code = table
            .code(symbol)
            .ok_or(CodecError::UnknownSymbol { symbol, position })?;
        encoded.extend(code.iter());
    }
    Ok(encoded)
}

/// Greedy prefix matching: bits accumulate into a chunk until the chunk is a known code.
///
/// Padding must already be stripped, so a chunk left over at the end of the stream means
/// the stream was cut short or does not belong to this table. A chunk that grows as long as
/// the longest code without matching fails straight away.
pub fn decode(bits: &BitVec, table: &CodeTable) -> Result<String> {
    let mut decoded = String::new();
    let mut chunk = BitVec::new();
    let mut chunk_start = 0;

    for (position, bit) in bits.iter().enumerate() {
        chunk.push(bit);
        if let Some(symbol) = table.symbol(&chunk) {
            decoded.push(symbol);
            chunk.truncate(0);
            chunk_start = position + 1;
        } else if chunk.len() >= table.longest_code() {
            return Err(corrupt(&chunk, chunk_start));
        }
    }

    if !chunk.is_empty() {
        return Err(corrupt(&chunk, chunk_start));
    }

    Ok(decoded)
}

fn corrupt(chunk: &BitVec, bit_position: usize) -> CodecError {
    CodecError::TruncatedOrCorruptStream {
        chunk: to_bit_string(chunk),
        bit_position,
    }
}

/// Output of [`compress`]: the table needed to read the data back, plus the packed bytes.
#[derive(Debug, Clone)]
pub struct Compressed {
    pub table: CodeTable,
    pub packed: Vec<u8>,
    /// Length of the encoded bit string before padding.
    pub bit_len: usize,
}

pub fn compress(text: &str) -> Result<Compressed> {
    let table = CodeTable::from_text(text)?;
    let encoded = encode(text, &table)?;
    let packed = pack(&encoded);
    debug!(
        "compressed {} symbols into {} bits ({} bytes packed)",
        text.chars().count(),
        encoded.len(),
        packed.len()
    );

    Ok(Compressed {
        table,
        packed,
        bit_len: encoded.len(),
    })
}

pub fn decompress(packed: &[u8], table: &CodeTable) -> Result<String> {
    let bits = unpack(packed)?;
    decode(&bits, table)
}
