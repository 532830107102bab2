//! INSPIRE-HEP research source implementation.
//!
//! Uses the INSPIRE literature search API. A key is resolved only when the
//! search returns exactly one hit; the record is then downloaded from that
//! hit's BibTeX export link.
//! API documentation: https://github.com/inspirehep/rest-api-doc

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

use crate::config::ProvidersConfig;
use crate::models::{BibRecord, CiteKey, ProviderClass};
use crate::sources::{check_status, Source, SourceError};
use crate::utils::HttpClient;

/// INSPIRE-HEP research source
#[derive(Debug, Clone)]
pub struct InspireSource {
    client: Arc<HttpClient>,
    base_url: String,
}

impl InspireSource {
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self::with_base_url(client, ProvidersConfig::default().inspire_url)
    }

    pub fn with_base_url(client: Arc<HttpClient>, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn search_url(&self, key: &CiteKey) -> String {
        format!(
            "{}/api/literature?q={}",
            self.base_url,
            urlencoding::encode(key.as_str())
        )
    }

    /// BibTeX export link of the single hit, or why there isn't one.
    fn single_bibtex_link(key: &CiteKey, response: LiteratureResponse) -> Result<String, SourceError> {
        if response.hits.total != 1 {
            return Err(SourceError::Ambiguous {
                key: key.to_string(),
                count: response.hits.total,
            });
        }

        response
            .hits
            .hits
            .into_iter()
            .next()
            .and_then(|hit| hit.links.bibtex)
            .ok_or_else(|| {
                SourceError::Parse(format!("INSPIRE hit for key {} has no bibtex link", key))
            })
    }
}

#[async_trait]
impl Source for InspireSource {
    fn id(&self) -> &str {
        "inspire"
    }

    fn name(&self) -> &str {
        "INSPIRE-HEP"
    }

    fn class(&self) -> ProviderClass {
        ProviderClass::InspireLike
    }

    async fn fetch(&self, key: &CiteKey) -> Result<BibRecord, SourceError> {
        let url = self.search_url(key);
        tracing::debug!("Searching INSPIRE: {}", url);

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;
        let body = check_status(response, key, self.name())?.text().await?;
        let literature: LiteratureResponse = serde_json::from_str(&body)?;

        let bibtex_url = Self::single_bibtex_link(key, literature)?;
        tracing::debug!("Fetching INSPIRE BibTeX export: {}", bibtex_url);

        let response = self.client.get(&bibtex_url).send().await?;
        let text = check_status(response, key, self.name())?.text().await?;

        Ok(BibRecord::new(text))
    }
}

#[derive(Debug, Deserialize)]
struct LiteratureResponse {
    hits: Hits,
}

#[derive(Debug, Deserialize)]
struct Hits {
    total: u64,
    #[serde(default)]
    hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
struct Hit {
    #[serde(default)]
    links: HitLinks,
}

#[derive(Debug, Default, Deserialize)]
struct HitLinks {
    bibtex: Option<String>,
}
