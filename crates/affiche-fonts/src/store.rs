//! The process-wide font byte store.
//!
//! Created once and injected into the backends that need font data. The
//! first requester for a family triggers the fetch; every other requester,
//! racing or late, receives the same shared future, so one family costs one
//! fetch for the lifetime of the store.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use parking_lot::Mutex;

use affiche_core::assets::AssetSource;
use affiche_core::error::FontError;
use affiche_core::text::{MeasuredLine, TextMeasurer};

use crate::metrics;
use crate::FontCatalog;

/// Resolved bytes for one family. Cheap to clone; every requester holds the
/// same underlying buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct FontData {
    family: Arc<str>,
    bytes: Arc<Vec<u8>>,
}

impl FontData {
    pub fn new(family: &str, bytes: Vec<u8>) -> Self {
        Self {
            family: Arc::from(family),
            bytes: Arc::new(bytes),
        }
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

type FontFuture = Shared<BoxFuture<'static, Result<FontData, FontError>>>;

/// Memoize-on-first-call font resolution over an [`AssetSource`].
pub struct FontStore {
    catalog: FontCatalog,
    source: Arc<dyn AssetSource>,
    cache: Mutex<HashMap<String, FontFuture>>,
}

impl FontStore {
    pub fn new(catalog: FontCatalog, source: Arc<dyn AssetSource>) -> Self {
        Self {
            catalog,
            source,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn catalog(&self) -> &FontCatalog {
        &self.catalog
    }

    /// The shared resolution future for `family`.
    ///
    /// Failed resolutions are memoized too: a family that could not be
    /// fetched once keeps failing without new fetch attempts, which keeps
    /// error ordering deterministic across render passes.
    pub fn family_data(&self, family: &str) -> FontFuture {
        let mut cache = self.cache.lock();
        if let Some(pending) = cache.get(family) {
            return pending.clone();
        }

        let fetch: BoxFuture<'static, Result<FontData, FontError>> =
            match self.catalog.locate(family) {
                Ok(location) => {
                    log::debug!("fetching font '{family}' from {location}");
                    let source = Arc::clone(&self.source);
                    let location = location.to_owned();
                    let family = family.to_owned();
                    async move {
                        let bytes = source.fetch(&location).await.map_err(|err| {
                            FontError::Fetch {
                                family: family.clone(),
                                reason: err.to_string(),
                            }
                        })?;
                        Ok(FontData::new(&family, bytes))
                    }
                    .boxed()
                }
                Err(err) => futures::future::ready(Err(err)).boxed(),
            };

        let shared = fetch.shared();
        cache.insert(family.to_owned(), shared.clone());
        shared
    }
}

impl TextMeasurer for FontStore {
    fn measure(
        &self,
        family: &str,
        size: f32,
        text: &str,
    ) -> BoxFuture<'_, Result<MeasuredLine, FontError>> {
        let pending = self.family_data(family);
        let text = text.to_owned();
        async move {
            let data = pending.await?;
            metrics::measure_line(&data, size, &text)
        }
        .boxed()
    }
}
