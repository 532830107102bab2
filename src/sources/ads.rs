//! NASA ADS research source implementation.
//!
//! ADS has no key-only JSON endpoint, so the BibTeX record is scraped from
//! the abstract page's citation export view.

use async_trait::async_trait;
use scraper::{Html, Selector};
use std::sync::Arc;

use crate::config::ProvidersConfig;
use crate::models::{BibRecord, CiteKey, ProviderClass};
use crate::sources::{check_status, Source, SourceError};
use crate::utils::HttpClient;

/// Element holding the exported citation on the export page
const EXPORT_SELECTOR: &str = ".export-textarea";

/// NASA ADS research source
#[derive(Debug, Clone)]
pub struct AdsSource {
    client: Arc<HttpClient>,
    base_url: String,
}

impl AdsSource {
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self::with_base_url(client, ProvidersConfig::default().ads_url)
    }

    pub fn with_base_url(client: Arc<HttpClient>, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn export_url(&self, key: &CiteKey) -> String {
        format!(
            "{}/abs/{}/exportcitation",
            self.base_url,
            urlencoding::encode(key.as_str())
        )
    }

    /// Pull the BibTeX text out of an export page.
    ///
    /// The text must start with `@`; anything else (an empty element, an error
    /// message) means ADS has no record for the key.
    fn parse_export_page(key: &CiteKey, html: &str) -> Result<BibRecord, SourceError> {
        let document = Html::parse_document(html);
        let selector = Selector::parse(EXPORT_SELECTOR)
            .map_err(|e| SourceError::Parse(format!("Invalid selector: {:?}", e)))?;

        let text: String = document
            .select(&selector)
            .flat_map(|element| element.text())
            .collect();
        let text = text.trim();

        if !text.starts_with('@') {
            return Err(SourceError::NotFound {
                key: key.to_string(),
                detail: format!("found {:?} from ADS query, expected a BibTeX record", text),
            });
        }

        Ok(BibRecord::new(text))
    }
}

#[async_trait]
impl Source for AdsSource {
    fn id(&self) -> &str {
        "ads"
    }

    fn name(&self) -> &str {
        "NASA ADS"
    }

    fn class(&self) -> ProviderClass {
        ProviderClass::AdsLike
    }

    async fn fetch(&self, key: &CiteKey) -> Result<BibRecord, SourceError> {
        let url = self.export_url(key);
        tracing::debug!("Fetching ADS export page: {}", url);

        let response = self.client.get(&url).send().await?;
        let html = check_status(response, key, self.name())?.text().await?;

        Self::parse_export_page(key, &html)
    }
}
