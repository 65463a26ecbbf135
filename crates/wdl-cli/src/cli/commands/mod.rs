//! CLI command handlers, one per file.

mod fetch;
mod get;
mod list;
mod transfer;
mod url;

pub use fetch::run_fetch;
pub use get::run_get;
pub use list::run_list;
pub use url::run_url;

use std::path::Path;

/// A non-empty regular file counts as downloaded.
pub(crate) fn is_present(path: &Path) -> bool {
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.len() > 0)
        .unwrap_or(false)
}

/// Warn, but carry on: the origin may publish models this build does not know.
pub(crate) fn warn_if_unknown(model: &str) {
    if !wdl_core::locator::is_known_model(model) {
        tracing::warn!(model, "not a known model name");
        eprintln!("warning: {} is not a known model name", model);
    }
}
