use std::{
    fs::{self, File},
    io::{BufRead, BufReader},
    path::Path,
};

use anyhow::{bail, Context};
use log::info;

use crate::{
    code_table::CodeTable,
    codec::{self, Compressed},
    error::CodecError,
    settings::Settings,
};

const BITS_PER_UNCOMPRESSED_SYMBOL: usize = 8;

#[derive(Debug, Clone, PartialEq)]
pub struct CompressionStats {
    pub input_symbols: usize,
    pub distinct_symbols: usize,
    pub encoded_bits: usize,
    pub packed_bytes: usize,
}

impl CompressionStats {
    fn new(text: &str, compressed: &Compressed) -> Self {
        Self {
            input_symbols: text.chars().count(),
            distinct_symbols: compressed.table.len(),
            encoded_bits: compressed.bit_len,
            packed_bytes: compressed.packed.len(),
        }
    }

    /// Encoded size relative to one byte per input symbol.
    pub fn ratio(&self) -> f64 {
        if self.input_symbols == 0 {
            return 0.0;
        }
        self.encoded_bits as f64 / (self.input_symbols * BITS_PER_UNCOMPRESSED_SYMBOL) as f64
    }
}

/// Returns the first line of the file, without its line terminator.
///
/// A trailing `\n` or `\r\n` is not part of the compressed text, so the decompressed
/// file holds the line alone.
pub fn read_first_line(path: impl AsRef<Path>) -> anyhow::Result<String> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;

    let mut line = String::new();
    BufReader::new(file)
        .read_line(&mut line)
        .with_context(|| format!("Failed to read a line from {}", path.display()))?;

    let trimmed = line.trim_end_matches(['\n', '\r']).len();
    line.truncate(trimmed);
    Ok(line)
}

/// Compresses the first line of the input file, writing the packed bytes and the code table.
pub fn compress_file(settings: &Settings) -> anyhow::Result<(String, CompressionStats)> {
    let text = read_first_line(&settings.input_path)?;

    let compressed = codec::compress(&text).map_err(stage_error)?;
    let stats = CompressionStats::new(&text, &compressed);

    fs::write(&settings.compressed_path, &compressed.packed).with_context(|| {
        format!("Failed to write {}", settings.compressed_path.display())
    })?;
    info!(
        "wrote {} packed bytes to {}",
        compressed.packed.len(),
        settings.compressed_path.display()
    );

    let json = compressed
        .table
        .to_json()
        .context("Failed to serialize the code table")?;
    fs::write(&settings.code_table_path, json).with_context(|| {
        format!("Failed to write {}", settings.code_table_path.display())
    })?;
    info!(
        "wrote {} codes to {}",
        compressed.table.len(),
        settings.code_table_path.display()
    );

    Ok((text, stats))
}

/// Reads the persisted code table and packed bytes back and writes the recovered text.
pub fn decompress_file(settings: &Settings) -> anyhow::Result<String> {
    let json = fs::read_to_string(&settings.code_table_path).with_context(|| {
        format!("Failed to read {}", settings.code_table_path.display())
    })?;
    let table = CodeTable::from_json(&json).map_err(stage_error)?;

    let packed = fs::read(&settings.compressed_path)
        .with_context(|| format!("Failed to read {}", settings.compressed_path.display()))?;
    let text = codec::decompress(&packed, &table).map_err(stage_error)?;

    fs::write(&settings.decompressed_path, &text).with_context(|| {
        format!("Failed to write {}", settings.decompressed_path.display())
    })?;
    info!(
        "wrote {} symbols to {}",
        text.chars().count(),
        settings.decompressed_path.display()
    );

    Ok(text)
}

/// Compresses, decompresses from the written artifacts and checks that nothing was lost.
pub fn run(settings: &Settings) -> anyhow::Result<CompressionStats> {
    let (original, stats) = compress_file(settings)?;
    println!("Compressed file written to {}", settings.compressed_path.display());
    println!("Huffman dictionary written to {}", settings.code_table_path.display());

    let decompressed = decompress_file(settings)?;
    println!("Decompressed text: {decompressed}");

    if decompressed != original {
        bail!(
            "Decompressed text does not match the original ({} vs {} symbols)",
            decompressed.chars().count(),
            original.chars().count()
        );
    }

    println!(
        "{} symbols ({} distinct) -> {} bits ({} bytes with header), ratio {:.3}",
        stats.input_symbols,
        stats.distinct_symbols,
        stats.encoded_bits,
        stats.packed_bytes,
        stats.ratio()
    );
    println!("Huffman compression & decompression successful.");
    Ok(stats)
}

fn stage_error(err: CodecError) -> anyhow::Error {
    let stage = err.stage();
    anyhow::Error::new(err).context(format!("{stage} stage failed"))
}
