//! Registry mapping provider classes to the sources that serve them.

use std::collections::HashMap;
use std::sync::Arc;

use super::{AdsSource, InspireSource, Source, SourceError};
use crate::config::ProvidersConfig;
use crate::models::{BibRecord, CiteKey, ProviderClass};
use crate::utils::HttpClient;

/// Registry for the available metadata sources
///
/// Holds at most one source per [`ProviderClass`] and dispatches resolution
/// requests to it.
#[derive(Debug, Clone, Default)]
pub struct SourceRegistry {
    sources: HashMap<ProviderClass, Arc<dyn Source>>,
}

impl SourceRegistry {
    /// Create a registry with INSPIRE and ADS at their configured endpoints
    pub fn new(client: Arc<HttpClient>, providers: &ProvidersConfig) -> Self {
        let mut registry = Self::empty();
        registry.register(Arc::new(InspireSource::with_base_url(
            Arc::clone(&client),
            providers.inspire_url.clone(),
        )));
        registry.register(Arc::new(AdsSource::with_base_url(
            client,
            providers.ads_url.clone(),
        )));
        registry
    }

    /// Create a registry with no sources
    pub fn empty() -> Self {
        Self {
            sources: HashMap::new(),
        }
    }

    /// Register a source for the class it reports, replacing any previous one
    pub fn register(&mut self, source: Arc<dyn Source>) {
        self.sources.insert(source.class(), source);
    }

    /// Get the source serving `class`
    pub fn get(&self, class: ProviderClass) -> Option<&Arc<dyn Source>> {
        self.sources.get(&class)
    }

    /// Fetch the record for `key` from the source serving `class`
    pub async fn resolve(
        &self,
        key: &CiteKey,
        class: ProviderClass,
    ) -> Result<BibRecord, SourceError> {
        let source = self.get(class).ok_or(SourceError::Unsupported(class))?;
        tracing::debug!("Resolving {} via {}", key, source.name());
        source.fetch(key).await
    }

    /// Get the number of registered sources
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::MockSource;

    #[test]
    fn test_new_registers_both_providers() {
        let client = Arc::new(HttpClient::new().unwrap());
        let registry = SourceRegistry::new(client, &ProvidersConfig::default());

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get(ProviderClass::InspireLike).unwrap().id(), "inspire");
        assert_eq!(registry.get(ProviderClass::AdsLike).unwrap().id(), "ads");
    }

    #[tokio::test]
    async fn test_resolve_dispatches_by_class() {
        let inspire = Arc::new(MockSource::new(ProviderClass::InspireLike));
        let ads = Arc::new(MockSource::new(ProviderClass::AdsLike));
        let mut registry = SourceRegistry::empty();
        registry.register(inspire.clone());
        registry.register(ads.clone());

        let key = CiteKey::parse("2016PhRvL.116f1102A").unwrap();
        registry.resolve(&key, ProviderClass::AdsLike).await.unwrap();

        assert_eq!(ads.call_count(), 1);
        assert_eq!(inspire.call_count(), 0);
    }

    #[tokio::test]
    async fn test_resolve_without_source() {
        let registry = SourceRegistry::empty();
        let key = CiteKey::parse("Smith:2020abc").unwrap();
        let err = registry
            .resolve(&key, ProviderClass::InspireLike)
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::Unsupported(ProviderClass::InspireLike)));
    }
}
