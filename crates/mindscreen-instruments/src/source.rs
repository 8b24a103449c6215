//! Discovery and parsing of configuration documents.
//!
//! Expected layout under a config root:
//!
//! ```text
//! instruments/*.yaml|*.yml|*.json   one instrument per file
//! safety.yaml                       optional safety rules
//! crosswalk.yaml                    optional severity tiers
//! ```

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::document::{CrosswalkDocument, InstrumentDocument, SafetyDocument};
use crate::error::ConfigError;

const INSTRUMENTS_DIR: &str = "instruments";
const SAFETY_STEM: &str = "safety";
const CROSSWALK_STEM: &str = "crosswalk";

/// Unvalidated documents ready for [`Registry::load`](crate::registry::Registry::load).
#[derive(Debug, Clone, Default)]
pub struct ConfigBundle {
    pub instruments: Vec<InstrumentDocument>,
    pub safety: SafetyDocument,
    pub crosswalk: CrosswalkDocument,
}

impl ConfigBundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_instrument(mut self, doc: InstrumentDocument) -> Self {
        self.instruments.push(doc);
        self
    }

    pub fn with_safety(mut self, doc: SafetyDocument) -> Self {
        self.safety = doc;
        self
    }

    pub fn with_crosswalk(mut self, doc: CrosswalkDocument) -> Self {
        self.crosswalk = doc;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Json,
}

impl Format {
    pub fn from_path(path: &Path) -> Option<Format> {
        match path.extension()?.to_str()? {
            "yaml" | "yml" => Some(Format::Yaml),
            "json" => Some(Format::Json),
            _ => None,
        }
    }
}

/// Parse an in-memory document.
pub fn parse<T: DeserializeOwned>(contents: &str, format: Format) -> Result<T, ConfigError> {
    parse_at(contents, format, Path::new("<inline>"))
}

fn parse_at<T: DeserializeOwned>(
    contents: &str,
    format: Format,
    path: &Path,
) -> Result<T, ConfigError> {
    match format {
        Format::Yaml => serde_yaml::from_str(contents).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        }),
        Format::Json => serde_json::from_str(contents).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Read and parse one document, picking the format from the file extension.
pub fn read_file<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let format =
        Format::from_path(path).ok_or_else(|| ConfigError::UnsupportedFormat(path.to_path_buf()))?;
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let doc = parse_at(&contents, format, path)?;
    debug!(path = %path.display(), "config document parsed");
    Ok(doc)
}

/// Load every document under `root`.
///
/// Instrument files are read in sorted path order so registry order is stable
/// across platforms. Files with other extensions are skipped.
pub fn from_dir(root: impl AsRef<Path>) -> Result<ConfigBundle, ConfigError> {
    let root = root.as_ref();
    let instruments_dir = root.join(INSTRUMENTS_DIR);

    let entries = std::fs::read_dir(&instruments_dir).map_err(|source| ConfigError::Io {
        path: instruments_dir.clone(),
        source,
    })?;
    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| ConfigError::Io {
            path: instruments_dir.clone(),
            source,
        })?;
        let path = entry.path();
        if path.is_file() && Format::from_path(&path).is_some() {
            paths.push(path);
        } else {
            debug!(path = %path.display(), "skipping non-config entry");
        }
    }
    paths.sort();

    let mut bundle = ConfigBundle::new();
    for path in &paths {
        bundle.instruments.push(read_file(path)?);
    }
    if let Some(path) = find_document(root, SAFETY_STEM) {
        bundle.safety = read_file(&path)?;
    }
    if let Some(path) = find_document(root, CROSSWALK_STEM) {
        bundle.crosswalk = read_file(&path)?;
    }

    Ok(bundle)
}

fn find_document(root: &Path, stem: &str) -> Option<PathBuf> {
    ["yaml", "yml", "json"]
        .iter()
        .map(|ext| root.join(format!("{stem}.{ext}")))
        .find(|p| p.is_file())
}
