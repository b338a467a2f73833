use std::{
    collections::{BTreeMap, HashMap},
    fmt,
};

use bit_vec::BitVec;
use itertools::Itertools;
use log::debug;
use serde::{
    de::{MapAccess, Visitor},
    Deserialize, Deserializer,
};

use crate::{
    bits::{parse_bit_string, starts_with, to_bit_string},
    error::{CodecError, Result},
    tree::{HuffmanTree, Node},
};

const LEFT: bool = true;
const RIGHT: bool = false;

/// Bijective mapping between symbols and their prefix-free codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    encoding: HashMap<char, BitVec>,
    decoding: HashMap<BitVec, char>,
    longest_code: usize,
}

impl CodeTable {
    /// Walks the tree depth first. A left edge appends `1`, a right edge appends `0`.
    pub fn from_tree(tree: &HuffmanTree) -> Self {
        let mut encoding = HashMap::new();
        match tree.root() {
            // a lone symbol still needs a non-empty code for decoding to make progress
            Node::Leaf { symbol, .. } => {
                encoding.insert(*symbol, BitVec::from_elem(1, LEFT));
            }
            root => {
                let mut code = BitVec::new();
                generate_codes(root, &mut code, &mut encoding);
            }
        }

        let decoding = encoding
            .iter()
            .map(|(&symbol, code)| (code.clone(), symbol))
            .collect();

        debug!("assigned {} codes", encoding.len());
        Self::with_maps(encoding, decoding)
    }

    pub fn from_text(text: &str) -> Result<Self> {
        HuffmanTree::from_text(text).map(|tree| Self::from_tree(&tree))
    }

    /// Rebuilds a table from persisted `symbol -> code` pairs, checking that the codes
    /// are non-empty, distinct and prefix free.
    pub fn from_codes(codes: impl IntoIterator<Item = (char, BitVec)>) -> Result<Self> {
        let mut encoding = HashMap::new();
        let mut decoding = HashMap::new();

        for (symbol, code) in codes {
            if code.is_empty() {
                return Err(malformed(format!("symbol {symbol:?} has an empty code")));
            }
            if encoding.contains_key(&symbol) {
                return Err(malformed(format!("symbol {symbol:?} appears twice")));
            }
            if let Some(other) = decoding.insert(code.clone(), symbol) {
                return Err(malformed(format!(
                    "symbols {other:?} and {symbol:?} share the code {}",
                    to_bit_string(&code)
                )));
            }
            encoding.insert(symbol, code);
        }

        if encoding.is_empty() {
            return Err(malformed("the table has no entries".to_owned()));
        }

        // once sorted, any code that prefixes another sits right before a code it prefixes
        let sorted_codes = decoding.keys().sorted_by_key(|code| to_bit_string(code));
        for (shorter, longer) in sorted_codes.tuple_windows() {
            if starts_with(longer, shorter) {
                return Err(malformed(format!(
                    "code {} is a prefix of {}",
                    to_bit_string(shorter),
                    to_bit_string(longer)
                )));
            }
        }

        Ok(Self::with_maps(encoding, decoding))
    }

    fn with_maps(encoding: HashMap<char, BitVec>, decoding: HashMap<BitVec, char>) -> Self {
        let longest_code = encoding.values().map(BitVec::len).max().unwrap_or_default();
        Self {
            encoding,
            decoding,
            longest_code,
        }
    }

    /// Parses the JSON object written by [`Self::to_json`].
    pub fn from_json(content: &str) -> Result<Self> {
        let persisted: PersistedEntries =
            serde_json::from_str(content).map_err(|err| malformed(err.to_string()))?;

        let codes = persisted
            .0
            .into_iter()
            .map(|(key, code)| -> Result<(char, BitVec)> {
                let symbol = key
                    .chars()
                    .exactly_one()
                    .map_err(|_| malformed(format!("key {key:?} is not a single character")))?;
                let code = parse_bit_string(&code).ok_or_else(|| {
                    malformed(format!("code {code:?} for {symbol:?} is not made of bits"))
                })?;
                Ok((symbol, code))
            })
            .collect::<Result<Vec<_>>>()?;

        Self::from_codes(codes)
    }

    /// Serializes the table as a JSON object of `symbol -> code`, ordered by symbol.
    pub fn to_json(&self) -> serde_json::Result<String> {
        let persisted: BTreeMap<String, String> = self
            .iter()
            .map(|(symbol, code)| (symbol.to_string(), to_bit_string(code)))
            .collect();
        serde_json::to_string_pretty(&persisted)
    }

    pub fn code(&self, symbol: char) -> Option<&BitVec> {
        self.encoding.get(&symbol)
    }

    pub fn symbol(&self, code: &BitVec) -> Option<char> {
        self.decoding.get(code).copied()
    }

    /// Length of the longest code. A chunk this long that matches nothing never will.
    pub fn longest_code(&self) -> usize {
        self.longest_code
    }

    pub fn len(&self) -> usize {
        self.encoding.len()
    }

    pub fn is_empty(&self) -> bool {
        self.encoding.is_empty()
    }

    /// Entries in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (char, &BitVec)> + Clone {
        self.encoding
            .iter()
            .map(|(&symbol, code)| (symbol, code))
            .sorted_by_key(|&(symbol, _)| symbol)
    }
}

fn generate_codes(node: &Node, current_code: &mut BitVec, result: &mut HashMap<char, BitVec>) {
    match node {
        Node::Leaf { symbol, .. } => {
            result.insert(*symbol, current_code.clone());
        }
        Node::Internal { left, right, .. } => {
            current_code.push(LEFT);
            generate_codes(left, current_code, result);
            current_code.pop();

            current_code.push(RIGHT);
            generate_codes(right, current_code, result);
            current_code.pop();
        }
    }
}

/// The persisted JSON object, entries kept in file order so that a repeated key is
/// reported rather than silently overwritten.
struct PersistedEntries(Vec<(String, String)>);

impl<'de> Deserialize<'de> for PersistedEntries {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = PersistedEntries;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("an object mapping symbols to codes")
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or_default());
                while let Some(entry) = map.next_entry::<String, String>()? {
                    entries.push(entry);
                }
                Ok(PersistedEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

fn malformed(reason: String) -> CodecError {
    CodecError::MalformedCodeTable(reason)
}
