use crate::error::{Error, Result};
use crate::product::{CatalogPayload, Product};
use std::path::PathBuf;
use tracing::info;
use url::Url;

/// Where the static catalog lives
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogSource {
    /// Fetched with an HTTP GET
    Url(Url),
    /// Read from the local filesystem
    File(PathBuf),
}

impl CatalogSource {
    /// Interpret `location` as a URL when it has an http(s) scheme, otherwise as a path
    ///
    /// # Example
    ///
    /// ```rust
    /// use routine_builder::CatalogSource;
    ///
    /// assert!(matches!(CatalogSource::parse("https://example.com/products.json"), CatalogSource::Url(_)));
    /// assert!(matches!(CatalogSource::parse("data/products.json"), CatalogSource::File(_)));
    /// ```
    pub fn parse(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            if let Ok(url) = Url::parse(location) {
                return CatalogSource::Url(url);
            }
        }
        CatalogSource::File(PathBuf::from(location))
    }
}

/// Loads the full product catalog from its static source
#[derive(Debug, Clone)]
pub struct CatalogLoader {
    source: CatalogSource,
    client: reqwest::Client,
}

impl CatalogLoader {
    pub fn new(source: CatalogSource) -> Self {
        Self {
            source,
            client: reqwest::Client::new(),
        }
    }

    pub fn source(&self) -> &CatalogSource {
        &self.source
    }

    /// Retrieve every product in the catalog
    ///
    /// # Errors
    ///
    /// Returns [`Error::Fetch`] when the source cannot be reached, answers with a
    /// non-success status, or does not hold a `{ "products": [...] }` document.
    pub async fn fetch_all(&self) -> Result<Vec<Product>> {
        let body = match &self.source {
            CatalogSource::Url(url) => self.fetch_url(url).await?,
            CatalogSource::File(path) => tokio::fs::read_to_string(path)
                .await
                .map_err(|e| Error::Fetch(format!("failed to read {}: {}", path.display(), e)))?,
        };

        let payload: CatalogPayload = serde_json::from_str(&body)
            .map_err(|e| Error::Fetch(format!("malformed catalog: {}", e)))?;

        info!(count = payload.products.len(), "loaded product catalog");
        Ok(payload.products)
    }

    async fn fetch_url(&self, url: &Url) -> Result<String> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| Error::Fetch(format!("request to {} failed: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Fetch(format!(
                "{} answered with status {}",
                url,
                status.as_u16()
            )));
        }

        response
            .text()
            .await
            .map_err(|e| Error::Fetch(format!("failed to read body from {}: {}", url, e)))
    }
}

/// Products whose category equals `category` exactly, in catalog order
pub fn filter_by_category(products: &[Product], category: &str) -> Vec<Product> {
    products
        .iter()
        .filter(|p| p.category == category)
        .cloned()
        .collect()
}

/// Distinct categories in the order they first appear
pub fn categories(products: &[Product]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for product in products {
        if !seen.iter().any(|c| c == &product.category) {
            seen.push(product.category.clone());
        }
    }
    seen
}
