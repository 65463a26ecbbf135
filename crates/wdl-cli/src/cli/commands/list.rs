//! `wdl list` – known models and local presence.

use std::io::{self, Write};
use std::path::Path;

use anyhow::Result;
use wdl_core::config::WdlConfig;
use wdl_core::locator::{model_file_name, KNOWN_MODELS};
use wdl_core::resolve_output_dir;

use super::is_present;

pub fn run_list(cfg: &WdlConfig) -> Result<()> {
    let dir = resolve_output_dir(cfg.output_dir.as_deref())?;
    let stdout = io::stdout();
    write_list(&mut stdout.lock(), &dir)?;
    Ok(())
}

fn write_list<W: Write>(out: &mut W, dir: &Path) -> io::Result<()> {
    writeln!(out, "{:<16} {:>10}  PATH", "MODEL", "SIZE")?;
    for model in KNOWN_MODELS {
        let path = dir.join(model_file_name(model));
        if is_present(&path) {
            let size = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
            let mib = size as f64 / 1_048_576.0;
            writeln!(out, "{:<16} {:>6.1} MiB  {}", model, mib, path.display())?;
        } else {
            writeln!(out, "{:<16} {:>10}  -", model, "missing")?;
        }
    }
    Ok(())
}
