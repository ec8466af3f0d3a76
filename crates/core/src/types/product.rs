//! Catalog product records.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::id::ProductId;
use super::price::Price;

/// Product category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Tops,
    Bottoms,
    Outerwear,
    Shoes,
    Accessories,
}

impl Category {
    /// All categories in navigation order.
    pub const ALL: [Self; 5] = [
        Self::Tops,
        Self::Bottoms,
        Self::Outerwear,
        Self::Shoes,
        Self::Accessories,
    ];

    /// Display name, identical to the serialized form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Tops => "Tops",
            Self::Bottoms => "Bottoms",
            Self::Outerwear => "Outerwear",
            Self::Shoes => "Shoes",
            Self::Accessories => "Accessories",
        }
    }
}

impl ::core::fmt::Display for Category {
    fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown category name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown category: {0}")]
pub struct ParseCategoryError(pub String);

impl FromStr for Category {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseCategoryError(s.to_string()))
    }
}

/// Category selection as offered by the storefront navigation.
///
/// `All` is a UI-level passthrough, never a stored category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    /// Navigation label: `All` or the category name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Only(category) => category.as_str(),
        }
    }
}

impl ::core::fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CategoryFilter {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse().map(Self::Only)
    }
}

/// Product style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Style {
    Casual,
    Formal,
    Sporty,
    Streetwear,
}

/// A catalog product. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub category: Category,
    pub style: Style,
    pub color: String,
    pub description: String,
    /// Image reference (URL).
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_sizes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_colors: Option<Vec<String>>,
}

impl Product {
    /// First offered size, if the product declares any.
    #[must_use]
    pub fn default_size(&self) -> Option<&str> {
        first_option(self.available_sizes.as_deref())
    }

    /// First offered color, if the product declares any.
    #[must_use]
    pub fn default_color(&self) -> Option<&str> {
        first_option(self.available_colors.as_deref())
    }
}

fn first_option(options: Option<&[String]>) -> Option<&str> {
    options.and_then(<[String]>::first).map(String::as_str)
}
