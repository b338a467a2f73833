use derive_more::{Display, Error};

/// The pipeline step an error was raised in. Counting, code assignment and packing
/// cannot fail, so they have no stage of their own.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    #[display(fmt = "building")]
    Building,
    #[display(fmt = "encoding")]
    Encoding,
    #[display(fmt = "decoding")]
    Decoding,
    #[display(fmt = "unpacking")]
    Unpacking,
    #[display(fmt = "loading")]
    Loading,
}

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[display(fmt = "cannot build a huffman tree from an empty alphabet")]
    EmptyAlphabet,

    #[display(fmt = "symbol {:?} at position {} has no code in the table", symbol, position)]
    UnknownSymbol { symbol: char, position: usize },

    #[display(
        fmt = "bit stream ended with unmatched chunk {:?} starting at bit {}",
        chunk,
        bit_position
    )]
    TruncatedOrCorruptStream { chunk: String, bit_position: usize },

    #[display(fmt = "malformed code table: {}", _0)]
    MalformedCodeTable(#[error(not(source))] String),

    #[display(fmt = "packed stream is empty, expected a padding header byte")]
    MissingPaddingHeader,

    #[display(
        fmt = "invalid padding {} for a payload of {} bits",
        padding,
        payload_bits
    )]
    InvalidPadding { padding: u8, payload_bits: usize },
}

impl CodecError {
    pub fn stage(&self) -> Stage {
        match self {
            CodecError::EmptyAlphabet => Stage::Building,
            CodecError::UnknownSymbol { .. } => Stage::Encoding,
            CodecError::TruncatedOrCorruptStream { .. } => Stage::Decoding,
            CodecError::MalformedCodeTable(_) => Stage::Loading,
            CodecError::MissingPaddingHeader | CodecError::InvalidPadding { .. } => {
                Stage::Unpacking
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, CodecError>;
