//! Model name → source URL mapping and URL-derived file names.

use std::path::Path;
use url::Url;

use crate::error::ResolutionError;

/// Where whisper.cpp publishes its ggml models.
pub const DEFAULT_SOURCE_URL: &str = "https://huggingface.co/ggerganov/whisper.cpp/resolve/main";

/// Extension every model file carries.
pub const MODEL_EXTENSION: &str = ".bin";

/// Models published at the default origin. Other names are still resolved.
pub const KNOWN_MODELS: &[&str] = &[
    "ggml-tiny.en",
    "ggml-tiny",
    "ggml-base.en",
    "ggml-base",
    "ggml-small.en",
    "ggml-small",
    "ggml-medium.en",
    "ggml-medium",
    "ggml-large-v1",
    "ggml-large",
];

pub fn is_known_model(name: &str) -> bool {
    let stem = name.strip_suffix(MODEL_EXTENSION).unwrap_or(name);
    KNOWN_MODELS.contains(&stem)
}

/// Resolves symbolic model names against a fixed origin.
#[derive(Debug, Clone)]
pub struct ModelLocator {
    base: Url,
}

impl ModelLocator {
    /// Parses `base_url` once. A malformed base is a startup error, never a per-call one.
    pub fn new(base_url: &str) -> Result<Self, ResolutionError> {
        let base = Url::parse(base_url).map_err(|source| ResolutionError::InvalidBaseUrl {
            url: base_url.to_string(),
            source,
        })?;
        if base.cannot_be_a_base() {
            return Err(ResolutionError::InvalidBaseUrl {
                url: base_url.to_string(),
                source: url::ParseError::RelativeUrlWithCannotBeABaseBase,
            });
        }
        Ok(Self { base })
    }

    /// `<base>/<model>.bin`; the extension is appended only when missing.
    pub fn locate(&self, model: &str) -> Url {
        let file_name = model_file_name(model);
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(&file_name);
        }
        url
    }
}

impl Default for ModelLocator {
    fn default() -> Self {
        Self {
            base: Url::parse(DEFAULT_SOURCE_URL).expect("default source URL is valid"),
        }
    }
}

/// Model name with the `.bin` extension ensured.
pub fn model_file_name(model: &str) -> String {
    let has_ext = Path::new(model)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()) == MODEL_EXTENSION)
        .unwrap_or(false);
    if has_ext {
        model.to_string()
    } else {
        format!("{}{}", model, MODEL_EXTENSION)
    }
}

/// Extracts the last path segment from a URL for use as the local file name.
///
/// Returns `None` if the URL cannot be parsed or the path is empty/root.
pub fn filename_from_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let segment = parsed.path_segments()?.filter(|s| !s.is_empty()).last()?;
    if segment == "." || segment == ".." {
        return None;
    }
    Some(segment.to_string())
}
