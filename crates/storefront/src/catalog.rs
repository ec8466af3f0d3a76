//! Catalog loading.
//!
//! The storefront ships with the LumiStyle catalog compiled in;
//! `CATALOG_PATH` swaps in a JSON file with the same shape.

use std::path::{Path, PathBuf};

use lumistyle_core::{Catalog, CatalogError};
use thiserror::Error;

use crate::config::StorefrontConfig;

/// Catalog compiled into the binary.
pub const BUNDLED_CATALOG: &str = include_str!("../data/catalog.json");

/// Error loading the catalog at start-up.
#[derive(Debug, Error)]
pub enum CatalogLoadError {
    #[error("failed to read catalog file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid catalog: {0}")]
    Invalid(#[from] CatalogError),
}

/// Load the configured catalog.
///
/// # Errors
///
/// Returns an error if the catalog file cannot be read or is invalid.
pub fn load_catalog(config: &StorefrontConfig) -> Result<Catalog, CatalogLoadError> {
    let catalog = match &config.catalog_path {
        Some(path) => load_catalog_file(path)?,
        None => bundled_catalog()?,
    };

    tracing::info!(products = catalog.len(), "Catalog loaded");
    Ok(catalog)
}

/// Parse the compiled-in catalog.
///
/// # Errors
///
/// Returns an error if the bundled JSON is invalid.
pub fn bundled_catalog() -> Result<Catalog, CatalogError> {
    Catalog::from_json(BUNDLED_CATALOG)
}

fn load_catalog_file(path: &Path) -> Result<Catalog, CatalogLoadError> {
    let json = std::fs::read_to_string(path).map_err(|source| CatalogLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Catalog::from_json(&json)?)
}

#[cfg(test)]
mod tests {
    use lumistyle_core::Category;

    use super::*;

    #[test]
    fn test_bundled_catalog_has_eight_products() {
        let catalog = bundled_catalog().expect("bundled catalog");
        assert_eq!(catalog.len(), 8);

        let tee = catalog.find_by_id("p1").expect("p1");
        assert_eq!(tee.name, "Classic White Tee");
        assert_eq!(tee.price.display(), "$29.99");
        assert_eq!(tee.default_size(), Some("S"));
    }

    #[test]
    fn test_bundled_catalog_covers_every_category() {
        let catalog = bundled_catalog().expect("bundled catalog");
        for category in Category::ALL {
            assert!(
                !catalog.filter_by_category(category).is_empty(),
                "no products in {category}"
            );
        }
    }

    #[test]
    fn test_missing_catalog_file() {
        let config = StorefrontConfig {
            catalog_path: Some(PathBuf::from("/nonexistent/catalog.json")),
            ..StorefrontConfig::default()
        };

        assert!(matches!(
            load_catalog(&config),
            Err(CatalogLoadError::Io { .. })
        ));
    }
}
