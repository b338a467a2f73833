//! Huffman coding of single-line texts.
//!
//! text -> [`FrequencyTable`] -> [`HuffmanTree`] -> [`CodeTable`] -> bits -> packed bytes,
//! and back again with either the in-memory table or one loaded from its JSON form.

pub mod bits;
pub mod code_table;
pub mod codec;
pub mod driver;
pub mod error;
pub mod frequency;
pub mod packing;
pub mod settings;
pub mod tree;

pub use code_table::CodeTable;
pub use codec::{compress, decode, decompress, encode, Compressed};
pub use error::{CodecError, Stage};
pub use frequency::FrequencyTable;
pub use packing::{pack, unpack};
pub use settings::Settings;
pub use tree::{HuffmanTree, Node};
