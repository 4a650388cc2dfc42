//! Asynchronous byte sources for images and fonts.
//!
//! The core never does I/O on its own; everything that needs bytes goes
//! through an [`AssetSource`]. Renders are user-triggered and short-lived,
//! so sources are not cancellable; callers may drop the returned future's
//! result but in-flight reads run to completion.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use base64::Engine as _;
use futures::future::BoxFuture;
use futures::FutureExt;

use crate::element::ImageSource;
use crate::error::AssetError;

/// Resolves a location string to bytes.
///
/// Implementations decide what a location means: a key in memory, a path
/// under a directory, a URL. `fetch` suspends while bytes are retrieved.
pub trait AssetSource: Send + Sync {
    fn fetch(&self, location: &str) -> BoxFuture<'_, Result<Vec<u8>, AssetError>>;
}

/// Decode the payload of a `data:` URL (base64 payloads only).
pub fn decode_data_url(url: &str) -> Option<Vec<u8>> {
    let rest = url.strip_prefix("data:")?;
    let (_, payload) = rest.split_once(";base64,")?;
    base64::engine::general_purpose::STANDARD.decode(payload).ok()
}

/// Resolve an [`ImageSource`] to bytes, consulting `assets` only when the
/// source is a non-`data:` location.
pub async fn resolve_image_bytes(
    source: &ImageSource,
    assets: &dyn AssetSource,
) -> Result<Arc<Vec<u8>>, AssetError> {
    match source {
        ImageSource::Bytes(bytes) => Ok(Arc::clone(bytes)),
        ImageSource::Location(location) => {
            if location.starts_with("data:") {
                decode_data_url(location)
                    .map(Arc::new)
                    .ok_or_else(|| AssetError::Unsupported(location.clone()))
            } else {
                assets.fetch(location).await.map(Arc::new)
            }
        }
    }
}

/// In-memory asset map, for embedded assets and tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryAssets {
    entries: HashMap<String, Arc<Vec<u8>>>,
}

impl MemoryAssets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, location: impl Into<String>, bytes: Vec<u8>) {
        self.entries.insert(location.into(), Arc::new(bytes));
    }

    pub fn with(mut self, location: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.insert(location, bytes);
        self
    }
}

impl AssetSource for MemoryAssets {
    fn fetch(&self, location: &str) -> BoxFuture<'_, Result<Vec<u8>, AssetError>> {
        let result = self
            .entries
            .get(location)
            .map(|bytes| bytes.as_ref().clone())
            .ok_or_else(|| AssetError::NotFound(location.to_owned()));
        async move { result }.boxed()
    }
}

/// Assets laid out under a root directory.
///
/// Locations are interpreted as relative paths; anything that escapes the
/// root (absolute paths, `..` components) is rejected.
#[derive(Debug, Clone)]
pub struct DirectoryAssets {
    root: PathBuf,
}

impl DirectoryAssets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, location: &str) -> Result<PathBuf, AssetError> {
        let relative = Path::new(location);
        let escapes = relative.is_absolute()
            || relative
                .components()
                .any(|component| matches!(component, Component::ParentDir));
        if escapes {
            return Err(AssetError::Unsupported(location.to_owned()));
        }
        Ok(self.root.join(relative))
    }
}

impl AssetSource for DirectoryAssets {
    fn fetch(&self, location: &str) -> BoxFuture<'_, Result<Vec<u8>, AssetError>> {
        let location = location.to_owned();
        let path = self.resolve(&location);
        async move {
            let path = path?;
            match std::fs::read(&path) {
                Ok(bytes) => Ok(bytes),
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                    Err(AssetError::NotFound(location))
                }
                Err(err) => Err(AssetError::Io {
                    location,
                    reason: err.to_string(),
                }),
            }
        }
        .boxed()
    }
}
