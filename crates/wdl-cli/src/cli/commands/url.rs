//! `wdl url` – print where a model is fetched from.

use anyhow::Result;
use wdl_core::config::WdlConfig;
use wdl_core::ModelLocator;

use super::warn_if_unknown;

pub fn run_url(cfg: &WdlConfig, model: &str) -> Result<()> {
    warn_if_unknown(model);
    let locator = ModelLocator::new(&cfg.base_url)?;
    println!("{}", locator.locate(model));
    Ok(())
}
