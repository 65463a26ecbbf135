//! `wdl get` – download an arbitrary URL.

use anyhow::Result;
use wdl_core::config::WdlConfig;

use super::transfer::transfer;

pub async fn run_get(cfg: &WdlConfig, url: &str) -> Result<()> {
    let path = transfer(cfg, url).await?;
    println!("{}", path.display());
    Ok(())
}
