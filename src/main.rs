use std::{env, path::PathBuf};

use anyhow::Context as _;
use cardpress::{CardConfig, CardPress};

fn main() -> anyhow::Result<()> {
    simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .env()
        .init()?;

    let config = match env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => CardConfig::load(&path)?,
        None => CardConfig::default(),
    };

    let issued = CardPress::new(config)
        .issue()
        .context("failed to issue ID card")?;
    for omitted in &issued.omitted {
        log::warn!(
            "{} missing from the card (payload {:?})",
            omitted.symbology(),
            omitted.payload()
        );
    }
    Ok(())
}
