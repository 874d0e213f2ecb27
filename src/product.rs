use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Text shown in the detail view when a product has no description
pub const NO_DESCRIPTION_AVAILABLE: &str = "No description available.";

/// Product as published by the catalog
///
/// The catalog has no stable identifier, so a product is identified by its
/// [`SelectionKey`], the (name, brand) pair. Selections store full copies of
/// products rather than positions in a rendered list.
///
/// # Example
///
/// ```rust
/// use routine_builder::Product;
///
/// let product: Product = serde_json::from_str(r#"{
///     "name": "Foam Wash",
///     "brand": "CeraVe",
///     "category": "Cleanser",
///     "image": "https://example.com/foam.png"
/// }"#).unwrap();
///
/// assert_eq!(product.key().name, "Foam Wash");
/// assert_eq!(product.description_or_placeholder(), "No description available.");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub brand: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub category: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Product {
    pub fn new(
        name: impl Into<String>,
        brand: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            brand: brand.into(),
            category: category.into(),
            image: String::new(),
            description: None,
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Composite identity used across renders and sessions
    pub fn key(&self) -> SelectionKey {
        SelectionKey::new(&self.name, &self.brand)
    }

    /// Whether this product has the given (name, brand) identity
    pub fn has_key(&self, key: &SelectionKey) -> bool {
        self.name == key.name && self.brand == key.brand
    }

    /// The description as published, unless it is missing or blank
    pub fn description(&self) -> Option<&str> {
        self.description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
    }

    pub fn description_or_placeholder(&self) -> &str {
        self.description().unwrap_or(NO_DESCRIPTION_AVAILABLE)
    }
}

// Catalog entries may carry `null` for text fields; treat them as empty.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// The (name, brand) pair identifying a product
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SelectionKey {
    pub name: String,
    pub brand: String,
}

impl SelectionKey {
    pub fn new(name: impl Into<String>, brand: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            brand: brand.into(),
        }
    }
}

impl fmt::Display for SelectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.brand)
    }
}

/// Body of the static catalog resource: `{ "products": [...] }`
#[derive(Debug, Serialize, Deserialize)]
pub struct CatalogPayload {
    pub products: Vec<Product>,
}
