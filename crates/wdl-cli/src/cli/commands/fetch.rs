//! `wdl fetch` – download a model by name.

use std::path::{Path, PathBuf};

use anyhow::Result;
use wdl_core::config::WdlConfig;
use wdl_core::locator::filename_from_url;
use wdl_core::{resolve_output_dir, ModelLocator, ResolutionError};

use super::transfer::transfer;
use super::{is_present, warn_if_unknown};

/// Resolve `model` to its URL and download it unless a non-empty copy is
/// already in the output folder. Prints the local path.
pub async fn run_fetch(cfg: &WdlConfig, model: &str) -> Result<()> {
    warn_if_unknown(model);
    let locator = ModelLocator::new(&cfg.base_url)?;
    let url = locator.locate(model);

    let dir = resolve_output_dir(cfg.output_dir.as_deref())?;
    let local = local_path(&dir, url.as_str())?;
    if is_present(&local) {
        tracing::info!(path = %local.display(), "using local model");
        println!("Use local model: {}", local.display());
        return Ok(());
    }

    let path = transfer(cfg, url.as_str()).await?;
    println!("{}", path.display());
    Ok(())
}

/// Where the downloader would put `url` inside `dir`.
fn local_path(dir: &Path, url: &str) -> Result<PathBuf, ResolutionError> {
    let name = filename_from_url(url).ok_or_else(|| ResolutionError::NoFileName(url.to_string()))?;
    Ok(dir.join(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_config(dir: &Path) -> WdlConfig {
        WdlConfig {
            // Nothing listens on the discard port; any request fails.
            base_url: "http://127.0.0.1:9/models".to_string(),
            output_dir: Some(dir.to_path_buf()),
            quiet: true,
            ..WdlConfig::default()
        }
    }

    #[tokio::test]
    async fn local_copy_short_circuits_the_network() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("ggml-tiny.en.bin"), b"weights").unwrap();

        run_fetch(&offline_config(dir.path()), "ggml-tiny.en").await.unwrap();

        assert_eq!(std::fs::read(dir.path().join("ggml-tiny.en.bin")).unwrap(), b"weights");
    }

    #[tokio::test]
    async fn missing_copy_goes_to_the_network() {
        let dir = tempfile::tempdir().unwrap();
        assert!(run_fetch(&offline_config(dir.path()), "ggml-tiny.en").await.is_err());
    }

    #[test]
    fn local_path_matches_the_download_name() {
        let dir = Path::new("/models");
        let locator = ModelLocator::new("https://example.com/resolve/main").unwrap();

        let url = locator.locate("my model");
        assert_eq!(local_path(dir, url.as_str()).unwrap(), dir.join("my%20model.bin"));

        // Separators are encoded into the single segment, never followed.
        let url = locator.locate("../escape");
        let path = local_path(dir, url.as_str()).unwrap();
        assert_eq!(path.parent(), Some(dir));
    }
}
