//! Variant-aware cart ledger.
//!
//! A cart line is identified by `(product id, selected size, selected color)`.
//! Adding with a key already in the ledger increments that line in place;
//! any other key appends a new line, even for the same product.
//!
//! `remove` and `update_quantity` match on product ID alone and so touch
//! every variant line of that product. `remove_line` and
//! `set_line_quantity` match the full identity key. `remove_matching` and
//! `set_matching_quantity` take a [`LineFilter`], where a named size or
//! color must match the stored value exactly and an omitted one matches any.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::types::{Product, ProductId};

/// Identity key of a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineKey {
    pub product_id: ProductId,
    pub size: Option<String>,
    pub color: Option<String>,
}

impl LineKey {
    /// Create a key from raw parts.
    #[must_use]
    pub fn new(
        product_id: impl Into<ProductId>,
        size: Option<&str>,
        color: Option<&str>,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            size: size.map(str::to_string),
            color: color.map(str::to_string),
        }
    }

    /// Key a shopper's selection resolves to for `product`.
    #[must_use]
    pub fn resolve(product: &Product, size: Option<&str>, color: Option<&str>) -> Self {
        Self {
            product_id: product.id.clone(),
            size: resolve_option(size, product.available_sizes.as_deref()),
            color: resolve_option(color, product.available_colors.as_deref()),
        }
    }
}

/// Selection of lines for a shopper-facing edit.
///
/// Unlike [`LineKey::resolve`], nothing is normalised: a size the product
/// does not offer matches no line rather than its default line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineFilter {
    pub product_id: ProductId,
    /// `None` matches any size.
    pub size: Option<String>,
    /// `None` matches any color.
    pub color: Option<String>,
}

impl LineFilter {
    /// Create a filter; blank values are treated as omitted.
    #[must_use]
    pub fn new(product_id: impl Into<ProductId>, size: Option<&str>, color: Option<&str>) -> Self {
        let named = |value: Option<&str>| {
            value
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        Self {
            product_id: product_id.into(),
            size: named(size),
            color: named(color),
        }
    }

    fn matches(&self, line: &CartItem) -> bool {
        line.product.id == self.product_id
            && self
                .size
                .as_ref()
                .is_none_or(|size| line.selected_size.as_ref() == Some(size))
            && self
                .color
                .as_ref()
                .is_none_or(|color| line.selected_color.as_ref() == Some(color))
    }
}

/// One cart row: the product snapshot plus the chosen variant and quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    #[serde(flatten)]
    pub product: Product,
    /// Always at least 1.
    pub quantity: u32,
    pub selected_size: Option<String>,
    pub selected_color: Option<String>,
}

impl CartItem {
    /// This line's identity key.
    #[must_use]
    pub fn key(&self) -> LineKey {
        LineKey {
            product_id: self.product.id.clone(),
            size: self.selected_size.clone(),
            color: self.selected_color.clone(),
        }
    }

    fn matches(&self, key: &LineKey) -> bool {
        self.product.id == key.product_id
            && self.selected_size == key.size
            && self.selected_color == key.color
    }

    /// Price × quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product.price.times(self.quantity)
    }
}

/// Point-in-time view of the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshot {
    pub items: Vec<CartItem>,
    pub total: Decimal,
    pub item_count: u64,
}

/// In-memory ordered list of cart lines.
///
/// Single-owner: callers that share it across tasks wrap it in a mutex.
#[derive(Debug, Clone, Default)]
pub struct CartLedger {
    lines: Vec<CartItem>,
}

impl CartLedger {
    /// Create an empty ledger.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartItem] {
        &self.lines
    }

    /// Whether the ledger has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Add one unit of `product` with the given variant.
    ///
    /// Size and color resolve to the product's first offered value when
    /// absent, blank, or not offered. Never fails.
    pub fn add(
        &mut self,
        product: &Product,
        size: Option<&str>,
        color: Option<&str>,
    ) -> &[CartItem] {
        let key = LineKey::resolve(product, size, color);

        if let Some(line) = self.lines.iter_mut().find(|line| line.matches(&key)) {
            line.quantity = line.quantity.saturating_add(1);
        } else {
            self.lines.push(CartItem {
                product: product.clone(),
                quantity: 1,
                selected_size: key.size,
                selected_color: key.color,
            });
        }

        &self.lines
    }

    /// Remove every line of `product_id`, whatever its variant.
    ///
    /// Returns the number of lines removed; unknown IDs are a no-op.
    pub fn remove(&mut self, product_id: &str) -> usize {
        let before = self.lines.len();
        self.lines.retain(|line| line.product.id != product_id);
        before - self.lines.len()
    }

    /// Remove the single line with this identity key.
    pub fn remove_line(&mut self, key: &LineKey) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| !line.matches(key));
        before != self.lines.len()
    }

    /// Set the quantity of every line of `product_id`, clamped to at least 1.
    ///
    /// Returns the number of lines updated.
    pub fn update_quantity(&mut self, product_id: &str, quantity: i64) -> usize {
        let quantity = clamp_quantity(quantity);
        let mut updated = 0;
        for line in self.lines.iter_mut().filter(|l| l.product.id == product_id) {
            line.quantity = quantity;
            updated += 1;
        }
        updated
    }

    /// Set the quantity of the line with this identity key, clamped to at
    /// least 1.
    pub fn set_line_quantity(&mut self, key: &LineKey, quantity: i64) -> bool {
        match self.lines.iter_mut().find(|line| line.matches(key)) {
            Some(line) => {
                line.quantity = clamp_quantity(quantity);
                true
            }
            None => false,
        }
    }

    /// Remove every line the filter selects.
    ///
    /// Returns the number of lines removed.
    pub fn remove_matching(&mut self, filter: &LineFilter) -> usize {
        let before = self.lines.len();
        self.lines.retain(|line| !filter.matches(line));
        before - self.lines.len()
    }

    /// Set the quantity of every line the filter selects, clamped to at
    /// least 1.
    ///
    /// Returns the number of lines updated.
    pub fn set_matching_quantity(&mut self, filter: &LineFilter, quantity: i64) -> usize {
        let quantity = clamp_quantity(quantity);
        let mut updated = 0;
        for line in self.lines.iter_mut().filter(|l| filter.matches(l)) {
            line.quantity = quantity;
            updated += 1;
        }
        updated
    }

    /// Sum of price × quantity over all lines.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.lines.iter().map(CartItem::line_total).sum()
    }

    /// Sum of quantities over all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Copy of the current state with totals.
    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            items: self.lines.clone(),
            total: self.total(),
            item_count: self.item_count(),
        }
    }
}

fn clamp_quantity(quantity: i64) -> u32 {
    u32::try_from(quantity.max(1)).unwrap_or(u32::MAX)
}

fn resolve_option(requested: Option<&str>, offered: Option<&[String]>) -> Option<String> {
    let requested = requested.map(str::trim).filter(|v| !v.is_empty());
    match offered {
        Some(options) if !options.is_empty() => requested
            .and_then(|r| options.iter().find(|o| o.as_str() == r))
            .or_else(|| options.first())
            .cloned(),
        _ => requested.map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::product;
    use crate::types::{Category, Price};

    fn tee() -> Product {
        product("p1", Category::Tops, 2999)
    }

    fn jeans() -> Product {
        product("p2", Category::Bottoms, 8999)
    }

    #[test]
    fn test_repeated_adds_merge_into_one_line() {
        let mut cart = CartLedger::new();
        for _ in 0..5 {
            cart.add(&tee(), Some("M"), Some("Black"));
        }

        assert_eq!(cart.lines().len(), 1);
        let line = cart.lines().first().expect("line");
        assert_eq!(line.quantity, 5);
        assert_eq!(line.selected_size.as_deref(), Some("M"));
        assert_eq!(line.selected_color.as_deref(), Some("Black"));
    }

    #[test]
    fn test_different_sizes_are_distinct_lines() {
        let mut cart = CartLedger::new();
        cart.add(&tee(), Some("S"), Some("White"));
        cart.add(&tee(), Some("L"), Some("White"));

        assert_eq!(cart.lines().len(), 2);
        assert!(cart.lines().iter().all(|line| line.quantity == 1));
    }

    #[test]
    fn test_merge_preserves_position() {
        let mut cart = CartLedger::new();
        cart.add(&tee(), None, None);
        cart.add(&jeans(), None, None);
        cart.add(&tee(), None, None);

        let ids: Vec<&str> = cart.lines().iter().map(|l| l.product.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p2"]);
        assert_eq!(cart.lines().first().map(|l| l.quantity), Some(2));
    }

    #[test]
    fn test_absent_variant_resolves_to_first_offered() {
        let mut cart = CartLedger::new();
        cart.add(&tee(), None, None);
        // Explicitly choosing the defaults lands on the same line.
        cart.add(&tee(), Some("S"), Some("White"));

        assert_eq!(cart.lines().len(), 1);
        let line = cart.lines().first().expect("line");
        assert_eq!(line.selected_size.as_deref(), Some("S"));
        assert_eq!(line.selected_color.as_deref(), Some("White"));
        assert_eq!(line.quantity, 2);
    }

    #[test]
    fn test_unoffered_or_blank_variant_falls_back() {
        let mut cart = CartLedger::new();
        cart.add(&tee(), Some("XXL"), Some("  "));

        let line = cart.lines().first().expect("line");
        assert_eq!(line.selected_size.as_deref(), Some("S"));
        assert_eq!(line.selected_color.as_deref(), Some("White"));
    }

    #[test]
    fn test_product_without_options_keeps_absent_variant() {
        let mut bag = tee();
        bag.available_sizes = None;
        bag.available_colors = None;

        let mut cart = CartLedger::new();
        cart.add(&bag, None, None);
        cart.add(&bag, None, Some("Red"));

        assert_eq!(cart.lines().len(), 2);
        let first = cart.lines().first().expect("line");
        assert_eq!(first.selected_size, None);
        assert_eq!(first.selected_color, None);
    }

    #[test]
    fn test_total_and_item_count() {
        let mut cart = CartLedger::new();
        assert_eq!(cart.total(), Decimal::ZERO);
        assert_eq!(cart.item_count(), 0);

        cart.add(&tee(), Some("M"), None);
        cart.add(&tee(), Some("M"), None);
        cart.add(&jeans(), None, None);

        assert_eq!(cart.total(), Decimal::new(2999 * 2 + 8999, 2));
        assert_eq!(cart.item_count(), 3);

        let snapshot = cart.snapshot();
        assert_eq!(snapshot.total, cart.total());
        assert_eq!(snapshot.items.len(), 2);
    }

    #[test]
    fn test_update_quantity_clamps_to_one() {
        let mut cart = CartLedger::new();
        cart.add(&tee(), None, None);

        assert_eq!(cart.update_quantity("p1", 0), 1);
        assert_eq!(cart.lines().first().map(|l| l.quantity), Some(1));

        cart.update_quantity("p1", -7);
        assert_eq!(cart.lines().first().map(|l| l.quantity), Some(1));

        cart.update_quantity("p1", 4);
        assert_eq!(cart.item_count(), 4);
    }

    #[test]
    fn test_coarse_operations_touch_every_variant() {
        let mut cart = CartLedger::new();
        cart.add(&tee(), Some("S"), None);
        cart.add(&tee(), Some("M"), None);
        cart.add(&jeans(), None, None);

        assert_eq!(cart.update_quantity("p1", 3), 2);
        assert_eq!(cart.item_count(), 7);

        assert_eq!(cart.remove("p1"), 2);
        assert_eq!(cart.lines().len(), 1);
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let mut cart = CartLedger::new();
        assert_eq!(cart.remove("p1"), 0);

        cart.add(&jeans(), None, None);
        assert_eq!(cart.remove("nope"), 0);
        assert_eq!(cart.lines().len(), 1);
    }

    #[test]
    fn test_line_operations_match_full_key() {
        let mut cart = CartLedger::new();
        cart.add(&tee(), Some("S"), Some("White"));
        cart.add(&tee(), Some("M"), Some("White"));

        let medium = LineKey::new("p1", Some("M"), Some("White"));
        assert!(cart.set_line_quantity(&medium, 0));
        assert!(cart.set_line_quantity(&medium, 5));
        assert_eq!(cart.item_count(), 6);

        assert!(cart.remove_line(&medium));
        assert!(!cart.remove_line(&medium));
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(
            cart.lines().first().and_then(|l| l.selected_size.as_deref()),
            Some("S")
        );
    }

    #[test]
    fn test_filter_does_not_normalise_unoffered_size() {
        let mut cart = CartLedger::new();
        cart.add(&tee(), Some("S"), Some("White"));
        cart.add(&tee(), Some("M"), Some("Black"));

        let unoffered = LineFilter::new("p1", Some("XXL"), None);
        assert_eq!(cart.remove_matching(&unoffered), 0);
        assert_eq!(cart.set_matching_quantity(&unoffered, 9), 0);
        assert_eq!(cart.lines().len(), 2);
        assert_eq!(cart.item_count(), 2);
    }

    #[test]
    fn test_filter_omitted_color_matches_any() {
        let mut cart = CartLedger::new();
        cart.add(&tee(), Some("S"), Some("White"));
        cart.add(&tee(), Some("M"), Some("Black"));

        let medium = LineFilter::new("p1", Some("M"), None);
        assert_eq!(cart.set_matching_quantity(&medium, 3), 1);
        assert_eq!(cart.item_count(), 4);

        assert_eq!(cart.remove_matching(&medium), 1);
        let remaining = cart.lines().first().expect("line");
        assert_eq!(remaining.selected_size.as_deref(), Some("S"));
        assert_eq!(remaining.selected_color.as_deref(), Some("White"));
    }

    #[test]
    fn test_filter_without_variant_matches_every_line() {
        let mut cart = CartLedger::new();
        cart.add(&tee(), Some("S"), None);
        cart.add(&tee(), Some("M"), None);
        cart.add(&jeans(), None, None);

        let all_tees = LineFilter::new("p1", Some(" "), None);
        assert_eq!(all_tees.size, None);
        assert_eq!(cart.remove_matching(&all_tees), 2);
        assert_eq!(cart.lines().len(), 1);
    }

    #[test]
    fn test_cart_item_serializes_product_fields_flat() {
        let mut cart = CartLedger::new();
        cart.add(&tee(), Some("M"), None);

        let json = serde_json::to_value(cart.lines().first().expect("line")).expect("serialize");
        assert_eq!(json["id"], "p1");
        assert_eq!(json["quantity"], 1);
        assert_eq!(json["selectedSize"], "M");
        assert_eq!(
            json["price"],
            serde_json::to_value(Price::from_cents(2999)).expect("price")
        );
    }
}
