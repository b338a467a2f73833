use anyhow::Context;
use huffman_compression::{driver, Settings};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let settings = Settings::load().context("Failed to load settings")?;
    driver::run(&settings)?;
    Ok(())
}
