//! Read-only product catalog.
//!
//! The catalog is validated once on construction (unique IDs, non-negative
//! prices) and never mutated afterwards. Callers share it behind an `Arc`
//! and pass it explicitly to whatever needs lookups.

use std::collections::HashMap;

use thiserror::Error;

use crate::types::{Category, CategoryFilter, Product, ProductId};

/// Errors raised while building a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Two products share an ID.
    #[error("duplicate product id: {0}")]
    DuplicateId(ProductId),

    /// Catalog JSON could not be parsed.
    #[error("invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Immutable, ordered product catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
    index: HashMap<ProductId, usize>,
}

impl Catalog {
    /// Build a catalog from products in display order.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::DuplicateId` if two products share an ID.
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(products.len());
        for (position, product) in products.iter().enumerate() {
            if index.insert(product.id.clone(), position).is_some() {
                return Err(CatalogError::DuplicateId(product.id.clone()));
            }
        }
        Ok(Self { products, index })
    }

    /// Parse a JSON array of products.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Json` for malformed input (including negative
    /// prices) and `CatalogError::DuplicateId` for repeated IDs.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let products: Vec<Product> = serde_json::from_str(json)?;
        Self::new(products)
    }

    /// All products in catalog order.
    #[must_use]
    pub fn all(&self) -> &[Product] {
        &self.products
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Look up a product by ID.
    #[must_use]
    pub fn find_by_id(&self, id: &str) -> Option<&Product> {
        self.index
            .get(id)
            .and_then(|&position| self.products.get(position))
    }

    /// Products in `category`, in catalog order.
    #[must_use]
    pub fn filter_by_category(&self, category: Category) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| p.category == category)
            .collect()
    }

    /// Products matching a navigation filter; `All` returns everything.
    #[must_use]
    pub fn filter(&self, filter: CategoryFilter) -> Vec<&Product> {
        match filter {
            CategoryFilter::All => self.products.iter().collect(),
            CategoryFilter::Only(category) => self.filter_by_category(category),
        }
    }

    /// Resolve recommended IDs to products, keeping order and silently
    /// dropping IDs the catalog does not know.
    #[must_use]
    pub fn resolve<'c, 'i>(&'c self, ids: &'i [ProductId]) -> Vec<(&'i ProductId, &'c Product)> {
        ids.iter()
            .filter_map(|id| self.find_by_id(id.as_str()).map(|product| (id, product)))
            .collect()
    }
}
