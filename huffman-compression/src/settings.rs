use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File, FileFormat};

/// Optional settings file looked up in the working directory (`huffman.toml`).
const CONFIG_FILE: &str = "huffman";
const ENV_PREFIX: &str = "HUFFMAN";

/// Where the driver reads its input and writes its artifacts.
///
/// Values come from the built-in defaults, then `huffman.toml`, then `HUFFMAN_*`
/// environment variables (e.g. `HUFFMAN_INPUT_PATH`).
#[derive(Clone, serde::Deserialize, Debug, PartialEq, Eq)]
pub struct Settings {
    pub input_path: PathBuf,
    pub compressed_path: PathBuf,
    pub code_table_path: PathBuf,
    pub decompressed_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input_path: "input.txt".into(),
            compressed_path: "output.bin".into(),
            code_table_path: "overhead.json".into(),
            decompressed_path: "decompressed.txt".into(),
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_file(File::with_name(CONFIG_FILE).required(false))
    }

    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        Self::from_file(File::from(path).format(FileFormat::Toml))
    }

    fn from_file<F>(file: F) -> Result<Self, ConfigError>
    where
        F: config::Source + Send + Sync + 'static,
    {
        let defaults = Settings::default();
        Config::builder()
            .set_default("input_path", path_value(&defaults.input_path))?
            .set_default("compressed_path", path_value(&defaults.compressed_path))?
            .set_default("code_table_path", path_value(&defaults.code_table_path))?
            .set_default("decompressed_path", path_value(&defaults.decompressed_path))?
            .add_source(file)
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?
            .try_deserialize()
    }

    /// Same file names, placed under `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        let defaults = Settings::default();
        Self {
            input_path: dir.join(defaults.input_path),
            compressed_path: dir.join(defaults.compressed_path),
            code_table_path: dir.join(defaults.code_table_path),
            decompressed_path: dir.join(defaults.decompressed_path),
        }
    }
}

fn path_value(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use std::{fs, path::PathBuf};

    use super::Settings;

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("huffman.toml");
        fs::write(
            &path,
            "input_path = \"book.txt\"\ncode_table_path = \"codes.json\"\n",
        )
        .unwrap();

        let settings = Settings::from_toml_file(&path).unwrap();

        assert_eq!(settings.input_path, PathBuf::from("book.txt"));
        assert_eq!(settings.code_table_path, PathBuf::from("codes.json"));
        assert_eq!(settings.compressed_path, PathBuf::from("output.bin"));
        assert_eq!(settings.decompressed_path, PathBuf::from("decompressed.txt"));
    }

    #[test]
    fn test_in_dir_keeps_file_names() {
        let settings = Settings::in_dir(&PathBuf::from("/tmp/run"));
        assert_eq!(settings.input_path, PathBuf::from("/tmp/run/input.txt"));
        assert_eq!(settings.compressed_path, PathBuf::from("/tmp/run/output.bin"));
    }
}
